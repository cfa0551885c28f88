use axum::extract::{Path, Query, State};
use axum::Json;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::model::FilmPatch;
use crate::state::AppState;
use crate::types::{
    parse_id, parse_page_param, parse_sort, ApiJson, ApiResponse, CreateFilmRequest, FilmView,
    FilmsListResponse, ListFilmsQuery, MessageResponse, SearchFilmsQuery, UpdateFilmRequest,
    DEFAULT_LIST_LIMIT, DEFAULT_LIST_OFFSET,
};

pub async fn create_film(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiJson(body): ApiJson<CreateFilmRequest>,
) -> AppResult<Json<ApiResponse<FilmView>>> {
    body.validate()?;

    let film = state
        .films
        .create(
            &body.title,
            body.description.as_deref(),
            body.release_date,
            body.rating,
            &body.actor_ids,
        )
        .await?;

    Ok(Json(ApiResponse::ok(film.into())))
}

pub async fn update_film(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateFilmRequest>,
) -> AppResult<Json<ApiResponse<FilmView>>> {
    body.validate()?;
    let id = parse_id(&id)?;

    let patch = FilmPatch {
        title: body.title,
        description: body.description,
        release_date: body.release_date,
        rating: body.rating,
        actor_ids: body.actor_ids,
    };
    let film = state.films.update(id, &patch).await?;

    Ok(Json(ApiResponse::ok(film.into())))
}

pub async fn delete_film(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    let id = parse_id(&id)?;

    state.films.delete(id).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: format!("film with id '{id}' has been deleted"),
    })))
}

pub async fn list_films(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
    Query(query): Query<ListFilmsQuery>,
) -> AppResult<Json<ApiResponse<FilmsListResponse>>> {
    let limit = parse_page_param(query.limit.as_deref(), "limit", DEFAULT_LIST_LIMIT)?;
    let offset = parse_page_param(query.offset.as_deref(), "offset", DEFAULT_LIST_OFFSET)?;
    let sort = parse_sort(query.sort.as_deref())?;

    let films = state.films.list_with_sort(&sort, limit, offset).await?;

    Ok(Json(ApiResponse::ok(FilmsListResponse {
        films: films.into_iter().map(FilmView::from).collect(),
    })))
}

pub async fn search_films(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
    Query(query): Query<SearchFilmsQuery>,
) -> AppResult<Json<ApiResponse<FilmsListResponse>>> {
    let limit = parse_page_param(query.limit.as_deref(), "limit", DEFAULT_LIST_LIMIT)?;
    let offset = parse_page_param(query.offset.as_deref(), "offset", DEFAULT_LIST_OFFSET)?;
    let title = query.film_title.unwrap_or_default();
    let actor_name = query.actor_name.unwrap_or_default();

    let films = state.films.search_by_filters(&title, &actor_name, limit, offset).await?;

    Ok(Json(ApiResponse::ok(FilmsListResponse {
        films: films.into_iter().map(FilmView::from).collect(),
    })))
}

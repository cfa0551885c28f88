use axum::extract::{Path, Query, State};
use axum::Json;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::model::ActorPatch;
use crate::state::AppState;
use crate::types::{
    parse_id, parse_page_param, ActorView, ActorsListResponse, ApiJson, ApiResponse,
    CreateActorRequest, MessageResponse, PageQuery, UpdateActorRequest, DEFAULT_LIST_LIMIT,
    DEFAULT_LIST_OFFSET,
};

pub async fn create_actor(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiJson(body): ApiJson<CreateActorRequest>,
) -> AppResult<Json<ApiResponse<ActorView>>> {
    body.validate()?;

    let actor = state.actors.create(&body.name, body.sex, body.birthdate).await?;

    Ok(Json(ApiResponse::ok(actor.into())))
}

pub async fn update_actor(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateActorRequest>,
) -> AppResult<Json<ApiResponse<ActorView>>> {
    body.validate()?;
    let id = parse_id(&id)?;

    let patch = ActorPatch { name: body.name, sex: body.sex, birthdate: body.birthdate };
    let actor = state.actors.update(id, &patch).await?;

    Ok(Json(ApiResponse::ok(actor.into())))
}

pub async fn delete_actor(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    let id = parse_id(&id)?;

    state.actors.delete(id).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: format!("actor with id '{id}' has been deleted"),
    })))
}

pub async fn list_actors(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<ActorsListResponse>>> {
    let limit = parse_page_param(query.limit.as_deref(), "limit", DEFAULT_LIST_LIMIT)?;
    let offset = parse_page_param(query.offset.as_deref(), "offset", DEFAULT_LIST_OFFSET)?;

    let actors = state.actors.list(limit, offset).await?;

    Ok(Json(ApiResponse::ok(ActorsListResponse {
        actors: actors.into_iter().map(ActorView::from).collect(),
    })))
}

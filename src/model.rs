use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sex of an actor, stored and transmitted as the numeric code defined by
/// ISO/IEC 5218: 0 unknown, 1 male, 2 female, 9 not applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Unknown,
    Male,
    Female,
    NotApplicable,
}

impl Sex {
    pub fn code(self) -> u8 {
        match self {
            Sex::Unknown => 0,
            Sex::Male => 1,
            Sex::Female => 2,
            Sex::NotApplicable => 9,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Sex::Unknown),
            1 => Some(Sex::Male),
            2 => Some(Sex::Female),
            9 => Some(Sex::NotApplicable),
            _ => None,
        }
    }
}

impl Serialize for Sex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for Sex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Sex::from_code(code as i64).ok_or_else(|| {
            D::Error::custom(format!("invalid sex code '{code}', expected one of 0, 1, 2, 9"))
        })
    }
}

/// Role of an API user. Stored as lowercase text in the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: i64,
    pub name: String,
    pub sex: Sex,
    pub birthdate: NaiveDate,
    /// Films this actor stars in. The nested films carry no actor lists.
    pub films: Vec<Film>,
}

#[derive(Debug, Clone)]
pub struct Film {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub release_date: NaiveDate,
    pub rating: u8,
    /// Actors starring in this film. The nested actors carry no film lists.
    pub actors: Vec<Actor>,
}

/// Partial update of an actor. `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ActorPatch {
    pub name: Option<String>,
    pub sex: Option<Sex>,
    pub birthdate: Option<NaiveDate>,
}

/// Partial update of a film. `None` fields keep their stored value;
/// `actor_ids` replaces the linked actor set wholesale when present.
#[derive(Debug, Clone, Default)]
pub struct FilmPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub rating: Option<u8>,
    pub actor_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Sortable film columns exposed by the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    ReleaseDate,
    Rating,
}

impl SortField {
    pub fn column(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::ReleaseDate => "release_date",
            SortField::Rating => "rating",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// One `field:direction` pair from the `sort` query parameter. The sequence
/// of pairs is significant: earlier pairs take precedence in the ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilmSort {
    pub field: SortField,
    pub dir: SortDir,
}

//! Domain services wrapping the storage adapters with business invariants:
//! referenced actors must exist before a film may point at them, absence
//! becomes a domain-level not-found error, and authentication never reveals
//! which credential half was wrong.

pub mod actors;
pub mod auth;
pub mod films;
pub mod password;

pub use actors::ActorService;
pub use auth::AuthService;
pub use films::FilmService;

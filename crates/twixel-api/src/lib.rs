//! Twixel web application: session handling, route loaders/actions, and
//! server-rendered views.
//!
//! Every route follows the same lifecycle: the loader (GET) or action (POST)
//! reads the session cookie and the database, then either renders HTML,
//! redirects, or throws an [`error::AppError`] that the route's catch
//! boundary turns into a response.

pub mod auth;
pub mod error;
pub mod routes;
pub mod session;
pub mod views;

pub use auth::{AppState, AppStateInner};
pub use routes::router;
pub use session::SessionKeys;

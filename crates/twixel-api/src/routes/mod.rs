pub mod index;
pub mod login;
pub mod logout;
pub mod new_twix;
pub mod rss;
pub mod twix;
pub mod twixes;

use axum::{Router, routing::get};

use crate::auth::AppState;
use crate::error::AppError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index))
        .route("/login", get(login::login_page).post(login::login_action))
        .route("/logout", get(logout::logout_page).post(logout::logout_action))
        .route("/twixes", get(twixes::random_twix))
        .route("/twixes.rss", get(rss::feed))
        .route("/twixes/new", get(new_twix::new_twix_page).post(new_twix::create_twix))
        .route("/twixes/{twix_id}", get(twix::twix_page).post(twix::twix_action))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Pagina non trovata".into())
}

use axum::response::{IntoResponse, Redirect};
use axum_extra::extract::cookie::CookieJar;

use crate::session;

/// POST /logout drops the session cookie.
pub async fn logout_action(jar: CookieJar) -> impl IntoResponse {
    session::logout(jar)
}

/// GET /logout has nothing to show.
pub async fn logout_page() -> Redirect {
    Redirect::to("/")
}

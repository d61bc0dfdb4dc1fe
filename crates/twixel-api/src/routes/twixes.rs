use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use maud::Markup;
use rand::Rng;
use tracing::error;

use twixel_types::models::{TwixListItem, User};

use crate::auth::{AppState, with_db};
use crate::error::AppError;
use crate::session::get_user;
use crate::views::{self, Meta, error_container};

/// How many of the newest twixes the sidebar lists.
pub const LAYOUT_LIST_LEN: u32 = 5;

/// Data every `/twixes*` page renders around its own content.
pub struct Layout {
    pub user: Option<User>,
    pub items: Vec<TwixListItem>,
}

pub async fn load_layout(state: &AppState, jar: &CookieJar) -> Result<Layout, AppError> {
    let items = with_db(state, |db| db.list_recent_twixes(LAYOUT_LIST_LEN)).await?;
    let user = get_user(state, jar).await?;
    Ok(Layout { user, items })
}

/// Content produced by a nested route's loader or action.
pub struct Page {
    pub status: StatusCode,
    pub meta: Meta,
    pub body: Markup,
}

impl Page {
    pub fn ok(meta: Meta, body: Markup) -> Self {
        Self {
            status: StatusCode::OK,
            meta,
            body,
        }
    }

    pub fn bad_request(meta: Meta, body: Markup) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            meta,
            body,
        }
    }
}

/// Route-scoped rendering of thrown errors.
pub trait Boundary {
    fn meta(&self) -> Meta {
        Meta::site()
    }

    /// Markup for a typed 4xx error this route knows how to show, `None` to
    /// escalate to [`Boundary::error`].
    fn catch(&self, err: &AppError) -> Option<Markup>;

    /// Fallback for unexpected failures.
    fn error(&self) -> Markup;
}

pub fn render(layout: &Layout, outcome: Result<Page, AppError>, boundary: &impl Boundary) -> Response {
    let (status, meta, body) = match outcome {
        Ok(page) => (page.status, page.meta, page.body),
        Err(err) => {
            let caught = if err.is_caught() { boundary.catch(&err) } else { None };
            match caught {
                Some(body) => (err.status(), boundary.meta(), body),
                None => {
                    error!("Unhandled error ({}): {:#}", err.status(), err);
                    (StatusCode::INTERNAL_SERVER_ERROR, boundary.meta(), boundary.error())
                }
            }
        }
    };

    let html = views::twixes::layout(&meta, layout.user.as_ref(), &layout.items, body);
    (status, html).into_response()
}

struct RandomTwixBoundary;

impl Boundary for RandomTwixBoundary {
    fn catch(&self, err: &AppError) -> Option<Markup> {
        match err {
            AppError::NotFound(_) => Some(error_container("There are no twixes to display.")),
            _ => None,
        }
    }

    fn error(&self) -> Markup {
        error_container("Ooops! C'è stato un problema")
    }
}

/// GET /twixes: layout plus one uniformly random twix.
pub async fn random_twix(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    let layout = load_layout(&state, &jar).await?;
    let outcome = load_random_twix(&state).await;
    Ok(render(&layout, outcome, &RandomTwixBoundary))
}

async fn load_random_twix(state: &AppState) -> Result<Page, AppError> {
    let twix = with_db(state, |db| {
        let count = db.count_twixes()?;
        if count == 0 {
            return Ok(None);
        }
        let offset = rand::rng().random_range(0..count);
        db.get_twix_at_offset(offset)
    })
    .await?
    .ok_or_else(|| AppError::NotFound("No random twix found".into()))?;

    Ok(Page::ok(Meta::site(), views::twixes::random_twix(&twix)))
}

use axum::{
    Form,
    extract::{Path, State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use maud::Markup;
use tracing::{info, warn};

use twixel_types::api::MethodOverrideForm;

use crate::auth::{AppState, with_db};
use crate::error::AppError;
use crate::routes::twixes::{Boundary, Page, load_layout, render};
use crate::session::{get_user_id, require_user_id};
use crate::views::{self, Meta, error_container};

struct TwixBoundary<'a> {
    twix_id: &'a str,
}

impl Boundary for TwixBoundary<'_> {
    fn meta(&self) -> Meta {
        Meta::new("No twix", "No twix found")
    }

    fn catch(&self, err: &AppError) -> Option<Markup> {
        let message = match err {
            AppError::BadRequest(_) => "Quello che stai provando a fare non è permesso.".to_string(),
            AppError::NotFound(_) => format!("Huh? Che cosa sarebbe un {}?", self.twix_id),
            AppError::Unauthorized(_) => format!("Ci dispiace, ma {} non è un tuo Twix.", self.twix_id),
            AppError::Internal(_) => return None,
        };
        Some(error_container(&message))
    }

    fn error(&self) -> Markup {
        error_container(&format!(
            "C'è stato un errore nel caricare il twix con l'id {}. Ci dispiace.",
            self.twix_id
        ))
    }
}

/// GET /twixes/{twix_id}
pub async fn twix_page(
    State(state): State<AppState>,
    Path(twix_id): Path<String>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let layout = load_layout(&state, &jar).await?;
    let outcome = load_twix(&state, &jar, &twix_id).await;
    Ok(render(&layout, outcome, &TwixBoundary { twix_id: &twix_id }))
}

async fn load_twix(state: &AppState, jar: &CookieJar, twix_id: &str) -> Result<Page, AppError> {
    let user_id = get_user_id(state, jar);
    let id = twix_id.to_string();
    let twix = with_db(state, move |db| db.get_twix(&id))
        .await?
        .ok_or_else(|| AppError::NotFound("Ma che twix! Non ho trovato niente.".into()))?;

    let is_owner = user_id == Some(twix.twixester_id);
    let meta = Meta::new(
        format!("\"{}\" twix", twix.title),
        format!("Enjoy the \"{}\" twix and much more", twix.title),
    );
    Ok(Page::ok(meta, views::twixes::twix_detail(&twix, is_owner)))
}

/// POST /twixes/{twix_id}: only `_method=delete` is supported.
pub async fn twix_action(
    State(state): State<AppState>,
    Path(twix_id): Path<String>,
    jar: CookieJar,
    form: Result<Form<MethodOverrideForm>, FormRejection>,
) -> Result<Response, AppError> {
    let outcome = match form {
        Ok(Form(form)) => delete_twix(&state, &jar, &twix_id, form).await,
        Err(rejection) => {
            warn!("Rejected action form for twix {}: {}", twix_id, rejection);
            Err(AppError::BadRequest(rejection.body_text()))
        }
    };
    match outcome {
        Ok(response) => Ok(response),
        Err(err) => {
            let layout = load_layout(&state, &jar).await?;
            Ok(render(&layout, Err(err), &TwixBoundary { twix_id: &twix_id }))
        }
    }
}

async fn delete_twix(
    state: &AppState,
    jar: &CookieJar,
    twix_id: &str,
    form: MethodOverrideForm,
) -> Result<Response, AppError> {
    let method = form.method.unwrap_or_default();
    if method != "delete" {
        return Err(AppError::BadRequest(format!("The _method {method} is not supported")));
    }

    let user_id = match require_user_id(state, jar, &format!("/twixes/{twix_id}")) {
        Ok(id) => id,
        Err(redirect) => return Ok(redirect.into_response()),
    };

    let id = twix_id.to_string();
    let twix = with_db(state, move |db| db.get_twix(&id))
        .await?
        .ok_or_else(|| AppError::NotFound("Non puoi eliminare ciò che non esiste".into()))?;

    if twix.twixester_id != user_id {
        warn!("User {} tried to delete twix {} owned by {}", user_id, twix.id, twix.twixester_id);
        return Err(AppError::Unauthorized(
            "Bel tentativo! Ma non quello non è un tuo twix".into(),
        ));
    }

    let id = twix_id.to_string();
    let deleted = with_db(state, move |db| db.delete_twix(&id)).await?;
    if !deleted {
        return Err(AppError::NotFound("Non puoi eliminare ciò che non esiste".into()));
    }
    info!("Twix {} deleted by {}", twix.id, user_id);

    Ok(Redirect::to("/twixes").into_response())
}

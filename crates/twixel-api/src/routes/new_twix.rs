use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use maud::Markup;
use tracing::{info, warn};
use uuid::Uuid;

use twixel_types::api::{NewTwixActionData, NewTwixFieldErrors, NewTwixFields, NewTwixForm};

use crate::auth::{AppState, with_db};
use crate::error::AppError;
use crate::routes::twixes::{Boundary, Page, load_layout, render};
use crate::session::{get_user_id, require_user_id};
use crate::views::{self, Meta, error_container};

const NEW_TWIX_PATH: &str = "/twixes/new";
const FORM_ERROR: &str = "Il form non è stato inviato correttamente";

fn meta() -> Meta {
    Meta::new("Nuovo Twix", "Aggiungi un nuovo Twix!")
}

struct NewTwixBoundary;

impl Boundary for NewTwixBoundary {
    fn meta(&self) -> Meta {
        meta()
    }

    fn catch(&self, err: &AppError) -> Option<Markup> {
        match err {
            AppError::Unauthorized(_) => Some(views::twixes::login_required()),
            _ => None,
        }
    }

    fn error(&self) -> Markup {
        error_container("Qualcosa è andato storto, ci scusiamo.")
    }
}

/// GET /twixes/new: the form is only for logged-in users; everyone else
/// gets a 401 with a link to the login page.
pub async fn new_twix_page(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    let layout = load_layout(&state, &jar).await?;
    let outcome = match get_user_id(&state, &jar) {
        Some(_) => Ok(Page::ok(meta(), views::twixes::new_twix_form(None))),
        None => Err(AppError::Unauthorized("Unauthorized".into())),
    };
    Ok(render(&layout, outcome, &NewTwixBoundary))
}

/// POST /twixes/new
pub async fn create_twix(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<NewTwixForm>, FormRejection>,
) -> Result<Response, AppError> {
    let user_id = match require_user_id(&state, &jar, NEW_TWIX_PATH) {
        Ok(id) => id,
        Err(redirect) => return Ok(redirect.into_response()),
    };

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!("Rejected new twix form from {}: {}", user_id, rejection);
            NewTwixForm::default()
        }
    };
    let (Some(title), Some(content)) = (form.title, form.content) else {
        let data = NewTwixActionData {
            form_error: Some(FORM_ERROR.into()),
            ..Default::default()
        };
        return bad_request(&state, &jar, data).await;
    };

    let fields = NewTwixFields { title, content };
    let field_errors = NewTwixFieldErrors::check(&fields);
    if !field_errors.is_empty() {
        let data = NewTwixActionData {
            form_error: None,
            field_errors: Some(field_errors),
            fields: Some(fields),
        };
        return bad_request(&state, &jar, data).await;
    }

    let twix_id = Uuid::new_v4();
    let id = twix_id.to_string();
    let author_id = user_id.to_string();
    with_db(&state, move |db| {
        db.insert_twix(&id, &fields.title, &fields.content, &author_id, Utc::now())
    })
    .await?;
    info!("Twix {} created by {}", twix_id, user_id);

    Ok(Redirect::to(&format!("/twixes/{twix_id}")).into_response())
}

async fn bad_request(state: &AppState, jar: &CookieJar, data: NewTwixActionData) -> Result<Response, AppError> {
    let layout = load_layout(state, jar).await?;
    let page = Page::bad_request(meta(), views::twixes::new_twix_form(Some(&data)));
    Ok(render(&layout, Ok(page), &NewTwixBoundary))
}

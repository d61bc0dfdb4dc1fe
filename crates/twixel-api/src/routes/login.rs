use axum::{
    Form,
    extract::{Query, State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use maud::Markup;
use serde::Deserialize;
use tracing::warn;

use twixel_db::models::UserRow;
use twixel_types::api::{LoginActionData, LoginFieldErrors, LoginFields, LoginForm, LoginType};
use twixel_types::models::User;

use crate::auth::{self, AppState, Credentials, with_db};
use crate::error::AppError;
use crate::session::{create_user_session, safe_redirect};
use crate::views;

const FORM_ERROR: &str = "Form not submitted correctly.";

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

/// GET /login
pub async fn login_page(Query(query): Query<LoginQuery>) -> Markup {
    views::login::page(query.redirect_to.as_deref(), None)
}

fn bad_request(redirect_to: Option<&str>, data: LoginActionData) -> Response {
    (StatusCode::BAD_REQUEST, views::login::page(redirect_to, Some(&data))).into_response()
}

/// POST /login: logs in or registers depending on `loginType`.
pub async fn login_action(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!("Rejected login form: {}", rejection);
            return Ok(bad_request(None, LoginActionData::form_error(FORM_ERROR)));
        }
    };
    let LoginForm {
        login_type,
        username,
        password,
        redirect_to,
    } = form;
    let (Some(login_type), Some(username), Some(password)) = (login_type, username, password) else {
        return Ok(bad_request(
            redirect_to.as_deref(),
            LoginActionData::form_error(FORM_ERROR),
        ));
    };

    let fields = LoginFields {
        login_type,
        username,
        password,
    };
    let field_errors = LoginFieldErrors::check(&fields);
    if !field_errors.is_empty() {
        return Ok(bad_request(
            redirect_to.as_deref(),
            LoginActionData {
                form_error: None,
                field_errors: Some(field_errors),
                fields: Some(fields),
            },
        ));
    }

    let target = safe_redirect(redirect_to.as_deref()).to_string();
    let with_form_error = |fields: LoginFields, message: String| {
        bad_request(
            redirect_to.as_deref(),
            LoginActionData {
                form_error: Some(message),
                field_errors: None,
                fields: Some(fields),
            },
        )
    };

    let user = match LoginType::parse(&fields.login_type) {
        Some(LoginType::Login) => {
            let (username, password) = (fields.username.clone(), fields.password.clone());
            let user = with_db(&state, move |db| {
                let credentials = Credentials {
                    username: &username,
                    password: &password,
                };
                auth::login(db, &credentials)?.map(UserRow::into_user).transpose()
            })
            .await?;

            match user {
                Some(user) => user,
                None => {
                    return Ok(with_form_error(
                        fields,
                        "Username/Password combination is incorrect".into(),
                    ));
                }
            }
        }
        Some(LoginType::Register) => match register_new(&state, &fields).await? {
            Some(user) => user,
            None => {
                let message = format!("User with username {} already exists", fields.username);
                return Ok(with_form_error(fields, message));
            }
        },
        None => return Ok(with_form_error(fields, "Login type invalid".into())),
    };

    let session = create_user_session(&state, jar, user.id, &user.username, &target)?;
    Ok(session.into_response())
}

/// `None` when the username is already taken.
async fn register_new(state: &AppState, fields: &LoginFields) -> Result<Option<User>, AppError> {
    let (username, password) = (fields.username.clone(), fields.password.clone());
    with_db(state, move |db| {
        if db.get_user_by_username(&username)?.is_some() {
            return Ok(None);
        }
        let credentials = Credentials {
            username: &username,
            password: &password,
        };
        auth::register(db, &credentials)?.into_user().map(Some)
    })
    .await
}

use axum::{
    http::{HeaderValue, Uri},
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::warn;
use uuid::Uuid;

use twixel_types::api::Claims;
use twixel_types::models::User;

use crate::auth::{AppState, with_db};
use crate::error::AppError;

pub const SESSION_COOKIE: &str = "twixel_session";
const SESSION_DAYS: i64 = 30;

/// Where a successful login goes when the form does not say otherwise.
pub const DEFAULT_REDIRECT: &str = "/twixes";

/// Outcome of checking the session cookie on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Valid(Claims),
    Absent,
    /// Present but malformed, expired or signed with another secret.
    Invalid,
}

impl SessionState {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Valid(claims) => Some(claims.sub),
            Self::Absent | Self::Invalid => None,
        }
    }
}

/// Signs and verifies session tokens.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    secure: bool,
}

impl SessionKeys {
    pub fn new(secret: &str, secure: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            secure,
        }
    }

    pub fn issue(&self, user_id: Uuid, username: &str) -> anyhow::Result<String> {
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::days(SESSION_DAYS)).timestamp() as usize,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify_token(&self, token: &str) -> SessionState {
        match decode::<Claims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => SessionState::Valid(data.claims),
            Err(e) => {
                warn!("Rejected session token: {}", e);
                SessionState::Invalid
            }
        }
    }

    pub fn verify(&self, jar: &CookieJar) -> SessionState {
        match jar.get(SESSION_COOKIE) {
            Some(cookie) => self.verify_token(cookie.value()),
            None => SessionState::Absent,
        }
    }

    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::days(SESSION_DAYS))
            .build()
    }
}

pub fn get_user_id(state: &AppState, jar: &CookieJar) -> Option<Uuid> {
    state.session.verify(jar).user_id()
}

/// The session user, or a redirect to the login page that brings the
/// visitor back to `redirect_to` afterwards.
pub fn require_user_id(state: &AppState, jar: &CookieJar, redirect_to: &str) -> Result<Uuid, Redirect> {
    get_user_id(state, jar).ok_or_else(|| Redirect::to(&login_url(redirect_to)))
}

pub fn login_url(redirect_to: &str) -> String {
    format!("/login?redirectTo={}", urlencoding::encode(redirect_to))
}

/// Full record of the session user; `None` when logged out or when the
/// account behind the cookie no longer exists.
pub async fn get_user(state: &AppState, jar: &CookieJar) -> Result<Option<User>, AppError> {
    let Some(user_id) = get_user_id(state, jar) else {
        return Ok(None);
    };

    with_db(state, move |db| {
        db.get_user_by_id(&user_id.to_string())?
            .map(|row| row.into_user())
            .transpose()
    })
    .await
}

pub fn create_user_session(
    state: &AppState,
    jar: CookieJar,
    user_id: Uuid,
    username: &str,
    redirect_to: &str,
) -> Result<(CookieJar, Redirect), AppError> {
    let token = state.session.issue(user_id, username)?;
    Ok((jar.add(state.session.cookie(token)), Redirect::to(redirect_to)))
}

pub fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Redirect::to("/login"),
    )
}

/// Accept only same-site paths as a post-login destination. Anything that
/// could leave the site or cannot go into a `Location` header falls back to
/// [`DEFAULT_REDIRECT`].
pub fn safe_redirect(redirect_to: Option<&str>) -> &str {
    match redirect_to {
        Some(path) if is_local_path(path) => path,
        _ => DEFAULT_REDIRECT,
    }
}

fn is_local_path(path: &str) -> bool {
    // Browsers read `/\host` as `//host`.
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
        && HeaderValue::from_str(path).is_ok()
        && path.parse::<Uri>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let keys = SessionKeys::new("test-secret", false);
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id, "kody").unwrap();

        match keys.verify_token(&token) {
            SessionState::Valid(claims) => {
                assert_eq!(claims.sub, user_id);
                assert_eq!(claims.username, "kody");
            }
            other => panic!("expected valid session, got {other:?}"),
        }
    }

    #[test]
    fn foreign_or_garbage_tokens_are_invalid() {
        let keys = SessionKeys::new("test-secret", false);
        let other = SessionKeys::new("another-secret", false);
        let token = other.issue(Uuid::new_v4(), "kody").unwrap();

        assert_eq!(keys.verify_token(&token), SessionState::Invalid);
        assert_eq!(keys.verify_token("not.a.token"), SessionState::Invalid);
        assert_eq!(SessionState::Invalid.user_id(), None);
    }

    #[test]
    fn missing_cookie_is_absent() {
        let keys = SessionKeys::new("test-secret", false);
        assert_eq!(keys.verify(&CookieJar::new()), SessionState::Absent);
    }

    #[test]
    fn cookie_attributes() {
        let keys = SessionKeys::new("test-secret", true);
        let cookie = keys.cookie("abc".into());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
    }

    #[test]
    fn redirect_targets_stay_local() {
        assert_eq!(safe_redirect(Some("/twixes/new")), "/twixes/new");
        assert_eq!(safe_redirect(Some("https://evil.example")), DEFAULT_REDIRECT);
        assert_eq!(safe_redirect(Some("//evil.example")), DEFAULT_REDIRECT);
        assert_eq!(safe_redirect(None), DEFAULT_REDIRECT);
    }

    #[test]
    fn redirect_targets_must_fit_a_location_header() {
        assert_eq!(safe_redirect(Some("/\\evil.example")), DEFAULT_REDIRECT);
        assert_eq!(safe_redirect(Some("/x\ty\u{7f}")), DEFAULT_REDIRECT);
        assert_eq!(safe_redirect(Some("/a\nb")), DEFAULT_REDIRECT);
        assert_eq!(safe_redirect(Some("/twixes/new?x=1&y=a+b")), "/twixes/new?x=1&y=a+b");
    }

    #[test]
    fn login_url_escapes_query_delimiters() {
        assert_eq!(login_url("/twixes/new"), "/login?redirectTo=%2Ftwixes%2Fnew");
        assert_eq!(login_url("/a?b=1&c=2"), "/login?redirectTo=%2Fa%3Fb%3D1%26c%3D2");
        assert_eq!(login_url("/twixes/a\nb"), "/login?redirectTo=%2Ftwixes%2Fa%0Ab");
        assert!(HeaderValue::from_str(&login_url("/twixes/\u{1}\u{7f} x")).is_ok());
    }
}

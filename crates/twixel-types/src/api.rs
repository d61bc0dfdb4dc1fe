use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Session claims --

/// Claims carried by the signed session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Validation rules --

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_TITLE_LEN: usize = 3;
pub const MIN_CONTENT_LEN: usize = 10;

pub fn validate_username(username: &str) -> Option<String> {
    (username.chars().count() < MIN_USERNAME_LEN)
        .then(|| format!("Usernames must be at least {MIN_USERNAME_LEN} characters long"))
}

pub fn validate_password(password: &str) -> Option<String> {
    (password.chars().count() < MIN_PASSWORD_LEN)
        .then(|| format!("Passwords must be at least {MIN_PASSWORD_LEN} characters long"))
}

pub fn validate_twix_title(title: &str) -> Option<String> {
    (title.chars().count() < MIN_TITLE_LEN).then(|| "Il titolo è troppo corto".to_string())
}

pub fn validate_twix_content(content: &str) -> Option<String> {
    (content.chars().count() < MIN_CONTENT_LEN).then(|| "Il twix è troppo corto".to_string())
}

// -- Login / register --

/// Raw `POST /login` body. Every field is optional so a malformed submission
/// can be answered with a form-level error instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub login_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub redirect_to: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginType {
    Login,
    Register,
}

impl LoginType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "login" => Some(Self::Login),
            "register" => Some(Self::Register),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginFields {
    pub login_type: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoginFieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl LoginFieldErrors {
    pub fn check(fields: &LoginFields) -> Self {
        Self {
            username: validate_username(&fields.username),
            password: validate_password(&fields.password),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

/// Payload returned with a 400 from the login action.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginActionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<LoginFieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<LoginFields>,
}

impl LoginActionData {
    pub fn form_error(message: impl Into<String>) -> Self {
        Self {
            form_error: Some(message.into()),
            ..Default::default()
        }
    }
}

// -- New twix --

#[derive(Debug, Default, Deserialize)]
pub struct NewTwixForm {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewTwixFields {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewTwixFieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NewTwixFieldErrors {
    pub fn check(fields: &NewTwixFields) -> Self {
        Self {
            title: validate_twix_title(&fields.title),
            content: validate_twix_content(&fields.content),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Payload returned with a 400 from the new-twix action.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTwixActionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<NewTwixFieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<NewTwixFields>,
}

// -- Twix detail --

/// `POST /twixes/{id}` body; HTML forms cannot send DELETE, so the verb
/// travels in `_method`.
#[derive(Debug, Default, Deserialize)]
pub struct MethodOverrideForm {
    #[serde(rename = "_method")]
    pub method: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_credentials_are_flagged() {
        let fields = LoginFields {
            login_type: "login".into(),
            username: "ab".into(),
            password: "12345".into(),
        };
        let errors = LoginFieldErrors::check(&fields);
        assert_eq!(
            errors.username.as_deref(),
            Some("Usernames must be at least 3 characters long")
        );
        assert_eq!(
            errors.password.as_deref(),
            Some("Passwords must be at least 6 characters long")
        );
        assert!(!errors.is_empty());
    }

    #[test]
    fn boundary_lengths_pass() {
        let fields = LoginFields {
            login_type: "register".into(),
            username: "abc".into(),
            password: "123456".into(),
        };
        assert!(LoginFieldErrors::check(&fields).is_empty());

        let twix = NewTwixFields {
            title: "abc".into(),
            content: "0123456789".into(),
        };
        assert!(NewTwixFieldErrors::check(&twix).is_empty());
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        // three two-byte characters
        assert!(validate_username("èèè").is_none());
        assert!(validate_twix_title("àé").is_some());
    }

    #[test]
    fn login_type_parsing() {
        assert_eq!(LoginType::parse("login"), Some(LoginType::Login));
        assert_eq!(LoginType::parse("register"), Some(LoginType::Register));
        assert_eq!(LoginType::parse("admin"), None);
    }

    #[test]
    fn action_data_omits_empty_entries() {
        let data = NewTwixActionData {
            field_errors: Some(NewTwixFieldErrors {
                title: Some("Il titolo è troppo corto".into()),
                content: None,
            }),
            fields: Some(NewTwixFields {
                title: "ab".into(),
                content: "long enough content".into(),
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("formError").is_none());
        assert_eq!(json["fieldErrors"]["title"], "Il titolo è troppo corto");
        assert!(json["fieldErrors"].get("content").is_none());
        assert_eq!(json["fields"]["title"], "ab");
    }
}

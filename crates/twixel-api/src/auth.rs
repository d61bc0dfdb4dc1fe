use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use tracing::info;
use uuid::Uuid;

use twixel_db::Database;
use twixel_db::models::UserRow;

use crate::error::AppError;
use crate::session::SessionKeys;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub session: SessionKeys,
}

impl AppStateInner {
    pub fn new(db: Database, session: SessionKeys) -> AppState {
        Arc::new(Self { db, session })
    }
}

/// Run blocking DB work (and password hashing) off the async runtime.
pub async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    Ok(tokio::task::spawn_blocking(move || f(&state.db)).await??)
}

pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Returns the user when the username exists and the password matches its hash.
pub fn login(db: &Database, credentials: &Credentials<'_>) -> anyhow::Result<Option<UserRow>> {
    let Some(user) = db.get_user_by_username(credentials.username)? else {
        return Ok(None);
    };

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| anyhow::anyhow!("stored hash for '{}' is corrupt: {}", user.username, e))?;

    let valid = Argon2::default()
        .verify_password(credentials.password.as_bytes(), &parsed_hash)
        .is_ok();

    Ok(valid.then_some(user))
}

/// Creates the user. The caller checks the username is still free; a race
/// loses on the UNIQUE constraint and surfaces as an error.
pub fn register(db: &Database, credentials: &Credentials<'_>) -> anyhow::Result<UserRow> {
    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(credentials.password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();

    let user_id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now();
    db.create_user(&user_id, credentials.username, &password_hash, now)?;
    info!("Registered user {} ({})", credentials.username, user_id);

    db.get_user_by_id(&user_id)?
        .ok_or_else(|| anyhow::anyhow!("user {} vanished after insert", user_id))
}

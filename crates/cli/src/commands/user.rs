//! User management commands.

use storekeep_server::services::auth::AuthService;

use super::{CommandError, connect};

/// Create a user with a password login. Returns the new user's ID.
pub async fn create(email: &str, username: &str, password: &str) -> Result<i32, CommandError> {
    let pool = connect().await?;
    let mut conn = pool.acquire().await?;

    let user = AuthService::new(&mut conn)
        .register(email, username, password)
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Username: {}",
        user.id,
        user.email.as_str(),
        user.username
    );
    Ok(user.id.as_i32())
}

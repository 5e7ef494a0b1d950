use crate::error::Result;

/// Hashes a plaintext password into an argon2 PHC string.
///
/// `password_auth::generate_hash()` is blocking, hence using `tokio::task::spawn_blocking()`
pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || password_auth::generate_hash(password)).await?;
    Ok(hash)
}

use anyhow::Result;

pub async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_owned();

    // bcrypt blocks, run it on the blocking pool
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;

    Ok(hash)
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_owned();
    let hash = hash.to_owned();

    let is_valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;

    Ok(is_valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashes_and_verifies() {
        let hash = hash_password("segredo123", 4).await.unwrap();

        assert_ne!(hash, "segredo123");
        assert!(verify_password("segredo123", &hash).await.unwrap());
        assert!(!verify_password("outra", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        assert!(verify_password("x", "not-a-bcrypt-hash").await.is_err());
    }
}

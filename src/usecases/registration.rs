//! Allowlist-gated account creation.
//!
//! Claiming the allowlist entry and inserting the user happen as one unit
//! inside [`MemberDirectory::enroll`]: an entry is only ever marked used by
//! a registration that also commits its user row.

use async_trait::async_trait;

use crate::{
    dto::auth::RegisterRequest,
    error::AppError,
    infrastructure::database::DbPoolManager,
    models::Slug,
    repository::{
        self,
        user::{EnrollOutcome, Enrollment},
    },
    usecases::password::hash_password,
};

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn active_slug(&self, slug: &str) -> anyhow::Result<Option<Slug>>;

    /// Claims the CPF's allowlist entry and creates the account, or
    /// changes nothing.
    async fn enroll(&self, enrollment: &Enrollment) -> anyhow::Result<EnrollOutcome>;
}

#[async_trait]
impl MemberDirectory for DbPoolManager {
    async fn active_slug(&self, slug: &str) -> anyhow::Result<Option<Slug>> {
        repository::slug::fetch_active(self, slug).await
    }

    async fn enroll(&self, enrollment: &Enrollment) -> anyhow::Result<EnrollOutcome> {
        repository::user::enroll(self, enrollment).await
    }
}

pub const NOT_ALLOWED: &str = "CPF não autorizado ou já utilizado. Entre em contato com a comissão.";

pub async fn register<D>(
    directory: &D,
    request: &RegisterRequest,
    bcrypt_cost: u32,
) -> Result<u64, AppError>
where
    D: MemberDirectory + ?Sized,
{
    let registration = request.validate()?;

    if let Some(slug) = &registration.slug
        && directory.active_slug(slug).await?.is_none()
    {
        return Err(AppError::NotFound("Associação não encontrada".into()));
    }

    let password_hash = hash_password(&registration.password, bcrypt_cost).await?;

    let enrollment = Enrollment {
        name: registration.name,
        email: registration.email,
        cpf: registration.cpf,
        password_hash,
    };

    match directory.enroll(&enrollment).await? {
        EnrollOutcome::Created(user_id) => {
            tracing::info!(user_id, "registered new member");
            Ok(user_id)
        },
        EnrollOutcome::NotAllowed => Err(AppError::Forbidden(NOT_ALLOWED.into())),
        EnrollOutcome::EmailTaken => Err(AppError::Conflict("Email já cadastrado".into())),
        EnrollOutcome::CpfTaken => Err(AppError::Conflict("CPF já cadastrado".into())),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use chrono::Utc;

    use super::*;

    #[derive(Default)]
    struct Tables {
        allowed: HashMap<String, bool>,
        users: Vec<Enrollment>,
    }

    #[derive(Default)]
    struct MemoryDirectory {
        tables: Mutex<Tables>,
    }

    impl MemoryDirectory {
        fn allowing(cpfs: &[&str]) -> Self {
            let dir = Self::default();
            {
                let mut tables = dir.tables.lock().unwrap();
                for cpf in cpfs {
                    tables.allowed.insert(cpf.to_string(), false);
                }
            }
            dir
        }

        fn is_used(&self, cpf: &str) -> bool {
            self.tables.lock().unwrap().allowed[cpf]
        }

        fn user_count(&self) -> usize {
            self.tables.lock().unwrap().users.len()
        }
    }

    #[async_trait]
    impl MemberDirectory for MemoryDirectory {
        async fn active_slug(&self, slug: &str) -> anyhow::Result<Option<Slug>> {
            Ok((slug == "porto-dos-santos").then(|| Slug {
                id: 1,
                slug: slug.to_string(),
                association_id: 1,
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        }

        async fn enroll(&self, enrollment: &Enrollment) -> anyhow::Result<EnrollOutcome> {
            let mut tables = self.tables.lock().unwrap();

            match tables.allowed.get(&enrollment.cpf) {
                Some(false) => {},
                _ => return Ok(EnrollOutcome::NotAllowed),
            }

            if tables.users.iter().any(|u| u.email == enrollment.email) {
                return Ok(EnrollOutcome::EmailTaken);
            }
            if tables.users.iter().any(|u| u.cpf == enrollment.cpf) {
                return Ok(EnrollOutcome::CpfTaken);
            }

            tables.allowed.insert(enrollment.cpf.clone(), true);
            tables.users.push(enrollment.clone());

            Ok(EnrollOutcome::Created(tables.users.len() as u64))
        }
    }

    fn request(cpf: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some("Maria Souza".into()),
            email: Some(email.into()),
            password: Some("segredo".into()),
            cpf: Some(cpf.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn creates_user_and_consumes_entry() {
        let dir = MemoryDirectory::allowing(&["52998224725"]);

        let id = register(&dir, &request("529.982.247-25", "maria@example.com"), 4)
            .await
            .unwrap();

        assert_eq!(id, 1);
        assert!(dir.is_used("52998224725"));

        let stored = &dir.tables.lock().unwrap().users[0];
        assert_ne!(stored.password_hash, "segredo");
        assert_eq!(stored.cpf, "52998224725");
    }

    #[tokio::test]
    async fn entry_is_single_use() {
        let dir = MemoryDirectory::allowing(&["52998224725"]);

        register(&dir, &request("52998224725", "a@example.com"), 4)
            .await
            .unwrap();
        let err = register(&dir, &request("52998224725", "b@example.com"), 4)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.to_string(), NOT_ALLOWED);
        assert_eq!(dir.user_count(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_leaves_entry_unused() {
        let dir = MemoryDirectory::allowing(&["52998224725", "11144477735"]);

        register(&dir, &request("52998224725", "dup@example.com"), 4)
            .await
            .unwrap();
        let err = register(&dir, &request("11144477735", "DUP@example.com"), 4)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.to_string(), "Email já cadastrado");
        assert!(!dir.is_used("11144477735"));
    }

    #[tokio::test]
    async fn cpf_outside_allowlist_is_forbidden() {
        let dir = MemoryDirectory::allowing(&["52998224725"]);

        let err = register(&dir, &request("39053344705", "x@example.com"), 4)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn invalid_cpf_is_rejected_before_lookup() {
        let dir = MemoryDirectory::allowing(&["12345678901"]);

        let err = register(&dir, &request("12345678901", "x@example.com"), 4)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "CPF inválido");
        assert!(!dir.is_used("12345678901"));
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let dir = MemoryDirectory::allowing(&["52998224725"]);
        let req = RegisterRequest {
            slug: Some("outra-associacao".into()),
            ..request("52998224725", "x@example.com")
        };

        let err = register(&dir, &req, 4).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!dir.is_used("52998224725"));
    }

    /// Use-case contract only: the in-memory directory serializes claims.
    /// The SQL claim itself is raced in `repository::user` tests.
    #[tokio::test]
    async fn concurrent_claims_admit_exactly_one() {
        let dir = Arc::new(MemoryDirectory::allowing(&["52998224725"]));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let dir = dir.clone();
                tokio::spawn(async move {
                    let req = request("52998224725", &format!("user{i}@example.com"));
                    register(dir.as_ref(), &req, 4).await
                })
            })
            .collect();

        let mut created = 0;
        let mut forbidden = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::Forbidden(_)) => forbidden += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(forbidden, 7);
        assert_eq!(dir.user_count(), 1);
    }
}

use async_trait::async_trait;

use crate::{
    dto::auth::{LoginRequest, normalize_email},
    error::AppError,
    infrastructure::database::DbPoolManager,
    models::User,
    repository,
    usecases::{cpf, password::verify_password},
};

/// What a member typed into the login box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Cpf(String),
    Email(String),
}

impl Identifier {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();

        if input.is_empty() {
            None
        } else if input.contains('@') {
            Some(Identifier::Email(normalize_email(input)))
        } else {
            Some(Identifier::Cpf(cpf::normalize(input)))
        }
    }

    fn not_found(&self) -> AppError {
        match self {
            Identifier::Cpf(_) => AppError::Unauthorized("CPF não encontrado".into()),
            Identifier::Email(_) => AppError::Unauthorized("Usuário não encontrado".into()),
        }
    }
}

#[async_trait]
pub trait Accounts: Send + Sync {
    async fn find_user(&self, identifier: &Identifier) -> anyhow::Result<Option<User>>;

    async fn player_id(&self, user_id: u64) -> anyhow::Result<Option<u64>>;

    /// False for deactivated and deleted accounts.
    async fn is_active(&self, user_id: u64) -> anyhow::Result<bool>;
}

#[async_trait]
impl Accounts for DbPoolManager {
    async fn find_user(&self, identifier: &Identifier) -> anyhow::Result<Option<User>> {
        match identifier {
            Identifier::Cpf(cpf) => repository::user::fetch_by_cpf(self, cpf).await,
            Identifier::Email(email) => repository::user::fetch_by_email(self, email).await,
        }
    }

    async fn player_id(&self, user_id: u64) -> anyhow::Result<Option<u64>> {
        let player = repository::player::fetch_by_user(self, user_id).await?;

        Ok(player.map(|p| p.id))
    }

    async fn is_active(&self, user_id: u64) -> anyhow::Result<bool> {
        let is_active = repository::user::fetch_is_active(self, user_id).await?;

        Ok(is_active.unwrap_or(false))
    }
}

#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: User,
    pub player_id: Option<u64>,
}

pub async fn login<A>(accounts: &A, request: &LoginRequest) -> Result<Authenticated, AppError>
where
    A: Accounts + ?Sized,
{
    let (Some(identifier), Some(password)) = (
        request.identifier().and_then(Identifier::parse),
        request.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::validation("Todos os campos são obrigatórios"));
    };

    let Some(user) = accounts.find_user(&identifier).await? else {
        return Err(identifier.not_found());
    };

    if !verify_password(password, &user.password_hash).await? {
        return Err(AppError::Unauthorized("Senha incorreta".into()));
    }

    if !user.is_active {
        return Err(AppError::Forbidden("Usuário inativo".into()));
    }

    let player_id = accounts.player_id(user.id).await?;

    Ok(Authenticated { user, player_id })
}

/// Backs the two-step login: the CPF must belong to an account first.
pub async fn verify_cpf(db: &DbPoolManager, raw_cpf: &str) -> Result<(), AppError> {
    let unauthorized = || AppError::Unauthorized("CPF não autorizado".into());

    if !cpf::validate(raw_cpf) {
        return Err(unauthorized());
    }

    match repository::user::fetch_by_cpf(db, &cpf::normalize(raw_cpf)).await? {
        Some(_) => Ok(()),
        None => Err(unauthorized()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::usecases::password::hash_password;

    struct OneAccount {
        user: User,
    }

    #[async_trait]
    impl Accounts for OneAccount {
        async fn find_user(&self, identifier: &Identifier) -> anyhow::Result<Option<User>> {
            let hit = match identifier {
                Identifier::Cpf(cpf) => self.user.cpf.as_deref() == Some(cpf.as_str()),
                Identifier::Email(email) => self.user.email == *email,
            };

            Ok(hit.then(|| self.user.clone()))
        }

        async fn player_id(&self, _user_id: u64) -> anyhow::Result<Option<u64>> {
            Ok(Some(42))
        }

        async fn is_active(&self, user_id: u64) -> anyhow::Result<bool> {
            Ok(user_id == self.user.id && self.user.is_active)
        }
    }

    async fn account(is_active: bool) -> OneAccount {
        OneAccount {
            user: User {
                id: 9,
                name: "Stivie".into(),
                email: "stivie@example.com".into(),
                cpf: Some("52998224725".into()),
                password_hash: hash_password("segredo", 4).await.unwrap(),
                role: "jogador".into(),
                is_active,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        }
    }

    fn attempt(login: &str, password: &str) -> LoginRequest {
        LoginRequest {
            login: Some(login.into()),
            password: Some(password.into()),
            ..Default::default()
        }
    }

    #[test]
    fn parses_identifiers() {
        assert_eq!(
            Identifier::parse("529.982.247-25"),
            Some(Identifier::Cpf("52998224725".into()))
        );
        assert_eq!(
            Identifier::parse(" Stivie@Example.com"),
            Some(Identifier::Email("stivie@example.com".into()))
        );
        assert_eq!(Identifier::parse("  "), None);
    }

    #[tokio::test]
    async fn logs_in_by_cpf_or_email() {
        let accounts = account(true).await;

        let by_cpf = login(&accounts, &attempt("529.982.247-25", "segredo")).await.unwrap();
        let by_email = login(&accounts, &attempt("STIVIE@example.com", "segredo")).await.unwrap();

        assert_eq!(by_cpf.user.id, 9);
        assert_eq!(by_cpf.player_id, Some(42));
        assert_eq!(by_email.user.id, 9);
    }

    #[tokio::test]
    async fn rejects_bad_credentials() {
        let accounts = account(true).await;

        let unknown = login(&accounts, &attempt("11144477735", "segredo")).await.unwrap_err();
        assert_eq!(unknown.to_string(), "CPF não encontrado");

        let wrong = login(&accounts, &attempt("52998224725", "errada")).await.unwrap_err();
        assert!(matches!(wrong, AppError::Unauthorized(_)));
        assert_eq!(wrong.to_string(), "Senha incorreta");

        let empty = login(&accounts, &LoginRequest::default()).await.unwrap_err();
        assert!(matches!(empty, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn inactive_users_cannot_log_in() {
        let accounts = account(false).await;

        let err = login(&accounts, &attempt("52998224725", "segredo")).await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }
}

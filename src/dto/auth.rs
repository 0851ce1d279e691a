use serde::Deserialize;

use crate::{constants::MIN_PASSWORD_LEN, error::AppError, usecases::cpf};

/// Registration payload, accepted as JSON and as a form.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: Option<String>,
    pub cpf: Option<String>,
    pub slug: Option<String>,
}

/// A registration that passed field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub cpf: String,
    pub slug: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

pub fn check_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "A senha deve ter pelo menos {MIN_PASSWORD_LEN} caracteres"
        )));
    }

    Ok(())
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<Registration, AppError> {
        let (Some(name), Some(email), Some(password), Some(raw_cpf)) = (
            present(&self.name),
            present(&self.email),
            self.password.as_deref().filter(|p| !p.is_empty()),
            present(&self.cpf),
        ) else {
            return Err(AppError::validation("Todos os campos são obrigatórios"));
        };

        if !cpf::validate(raw_cpf) {
            return Err(AppError::validation("CPF inválido"));
        }

        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AppError::validation("Email inválido"));
        }

        check_password(password)?;

        if let Some(confirm) = self.confirm_password.as_deref()
            && confirm != password
        {
            return Err(AppError::validation("As senhas não coincidem"));
        }

        Ok(Registration {
            name: name.to_string(),
            email,
            password: password.to_string(),
            cpf: cpf::normalize(raw_cpf),
            slug: present(&self.slug).map(|s| s.to_lowercase()),
        })
    }
}

/// The identifier may arrive as `login`, `cpf` or `email`; when several
/// are sent the first non-blank one in that order wins.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    /// CPF or email.
    pub login: Option<String>,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

impl LoginRequest {
    pub fn identifier(&self) -> Option<&str> {
        [&self.login, &self.cpf, &self.email]
            .into_iter()
            .find_map(present)
    }
}

#[derive(Debug, Deserialize)]
pub struct VerifyCpf {
    pub cpf: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginPageQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
    pub error: Option<String>,
    pub registered: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterPageQuery {
    pub slug: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthErrorQuery {
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_identifier_precedence() {
        let both: LoginRequest = serde_json::from_str(
            r#"{"cpf":"529.982.247-25","email":"ana@example.com","password":"segredo"}"#,
        )
        .unwrap();
        assert_eq!(both.identifier(), Some("529.982.247-25"));

        let email_only: LoginRequest =
            serde_json::from_str(r#"{"cpf":"  ","email":"ana@example.com"}"#).unwrap();
        assert_eq!(email_only.identifier(), Some("ana@example.com"));

        let form = LoginRequest {
            login: Some("ana@example.com".into()),
            cpf: Some("52998224725".into()),
            ..Default::default()
        };
        assert_eq!(form.identifier(), Some("ana@example.com"));

        assert_eq!(LoginRequest::default().identifier(), None);
    }

    fn request() -> RegisterRequest {
        RegisterRequest {
            name: Some("João Silva".into()),
            email: Some(" Joao@Example.com ".into()),
            password: Some("segredo".into()),
            confirm_password: None,
            cpf: Some("529.982.247-25".into()),
            slug: Some("Porto-dos-Santos".into()),
        }
    }

    #[test]
    fn normalizes_valid_payload() {
        let reg = request().validate().unwrap();

        assert_eq!(reg.email, "joao@example.com");
        assert_eq!(reg.cpf, "52998224725");
        assert_eq!(reg.slug.as_deref(), Some("porto-dos-santos"));
    }

    #[test]
    fn missing_fields_are_rejected_first() {
        let req = RegisterRequest {
            cpf: Some("123".into()),
            name: Some("   ".into()),
            ..request()
        };

        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "Todos os campos são obrigatórios");
    }

    #[test]
    fn invalid_cpf() {
        let req = RegisterRequest {
            cpf: Some("123.456.789-01".into()),
            ..request()
        };

        assert_eq!(req.validate().unwrap_err().to_string(), "CPF inválido");
    }

    #[test]
    fn short_password_and_mismatch() {
        let req = RegisterRequest {
            password: Some("12345".into()),
            ..request()
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        let req = RegisterRequest {
            confirm_password: Some("outra-senha".into()),
            ..request()
        };
        assert_eq!(req.validate().unwrap_err().to_string(), "As senhas não coincidem");
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@.co"));
    }

    #[test]
    fn slug_is_optional() {
        let req = RegisterRequest {
            slug: None,
            ..request()
        };

        assert_eq!(req.validate().unwrap().slug, None);
    }

    #[test]
    fn login_accepts_cpf_or_email_keys() {
        let by_cpf: LoginRequest =
            serde_json::from_str(r#"{"cpf":"52998224725","password":"x"}"#).unwrap();
        let by_email: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.co","password":"x"}"#).unwrap();

        assert_eq!(by_cpf.login.as_deref(), Some("52998224725"));
        assert_eq!(by_email.login.as_deref(), Some("a@b.co"));
    }
}

use serde::Deserialize;

use crate::{
    constants::Role,
    dto::auth::{check_password, is_valid_email, normalize_email},
    error::AppError,
    usecases::cpf,
};

#[derive(Debug, Deserialize)]
pub struct AllowedUserForm {
    pub cpf: String,
    pub name: String,
}

impl AllowedUserForm {
    /// `(normalized cpf, name)`.
    pub fn validate(&self) -> Result<(String, String), AppError> {
        let name = self.name.trim();
        if self.cpf.trim().is_empty() || name.is_empty() {
            return Err(AppError::validation("CPF e nome são obrigatórios"));
        }

        if !cpf::validate(&self.cpf) {
            return Err(AppError::validation("CPF inválido"));
        }

        Ok((cpf::normalize(&self.cpf), name.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct NewUserForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    #[serde(default)]
    pub cpf: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub cpf: Option<String>,
}

impl NewUserForm {
    pub fn validate(&self) -> Result<UserDraft, AppError> {
        let name = self.name.trim();
        if name.is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::validation("Todos os campos são obrigatórios"));
        }

        let role = Role::parse(&self.role).ok_or_else(|| AppError::validation("Papel inválido"))?;

        let email = normalize_email(&self.email);
        if !is_valid_email(&email) {
            return Err(AppError::validation("Email inválido"));
        }

        check_password(&self.password)?;

        let cpf = match self.cpf.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(raw) if cpf::validate(raw) => Some(cpf::normalize(raw)),
            Some(_) => return Err(AppError::validation("CPF inválido")),
            None => None,
        };

        Ok(UserDraft {
            name: name.to_string(),
            email,
            password: self.password.clone(),
            role,
            cpf,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UserStatusForm {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyFeeForm {
    pub amount: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_user_needs_valid_cpf_and_name() {
        let ok = AllowedUserForm {
            cpf: "111.444.777-35".into(),
            name: " Mauricio Porto ".into(),
        };
        assert_eq!(
            ok.validate().unwrap(),
            ("11144477735".to_string(), "Mauricio Porto".to_string())
        );

        let no_name = AllowedUserForm {
            cpf: "11144477735".into(),
            name: "  ".into(),
        };
        assert!(no_name.validate().is_err());

        let bad_cpf = AllowedUserForm {
            cpf: "11144477736".into(),
            name: "X".into(),
        };
        assert_eq!(bad_cpf.validate().unwrap_err().to_string(), "CPF inválido");
    }

    #[test]
    fn user_form_parses_role() {
        let form = NewUserForm {
            name: "Comissão".into(),
            email: "Comissao@Example.com".into(),
            password: "segredo".into(),
            role: "comissao".into(),
            cpf: Some(String::new()),
        };

        let draft = form.validate().unwrap();
        assert_eq!(draft.role, Role::Committee);
        assert_eq!(draft.email, "comissao@example.com");
        assert_eq!(draft.cpf, None);

        let form = NewUserForm {
            role: "admin".into(),
            ..form
        };
        assert!(form.validate().is_err());
    }
}

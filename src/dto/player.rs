use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    constants::{MAX_SHIRT_NUMBER, MIN_SHIRT_NUMBER, Position},
    dto::auth::{check_password, is_valid_email, normalize_email},
    error::AppError,
    usecases::cpf,
};

#[derive(Debug, Default, Deserialize)]
pub struct PlayerQuery {
    pub q: Option<String>,
}

/// Committee form for a new player and their login.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NewPlayerForm {
    pub full_name: String,
    pub nickname: String,
    pub position: String,
    pub shirt_number: String,
    pub birth_date: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub cpf: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerDraft {
    pub full_name: String,
    pub nickname: String,
    pub position: Position,
    pub shirt_number: u8,
    pub birth_date: NaiveDate,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub cpf: String,
    pub password: String,
}

impl NewPlayerForm {
    pub fn validate(&self, today: NaiveDate) -> Result<PlayerDraft, AppError> {
        let required = [
            &self.full_name,
            &self.nickname,
            &self.position,
            &self.shirt_number,
            &self.birth_date,
            &self.phone,
            &self.address,
            &self.email,
            &self.cpf,
            &self.password,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(AppError::validation("Todos os campos são obrigatórios"));
        }

        let position = Position::parse(&self.position)
            .ok_or_else(|| AppError::validation("Posição inválida"))?;

        let shirt_number = self
            .shirt_number
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|n| (MIN_SHIRT_NUMBER..=MAX_SHIRT_NUMBER).contains(n))
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Número da camisa deve estar entre {MIN_SHIRT_NUMBER} e {MAX_SHIRT_NUMBER}"
                ))
            })?;

        let birth_date = NaiveDate::parse_from_str(self.birth_date.trim(), "%Y-%m-%d")
            .ok()
            .filter(|d| *d < today)
            .ok_or_else(|| AppError::validation("Data de nascimento inválida"))?;

        if !cpf::validate(&self.cpf) {
            return Err(AppError::validation("CPF inválido"));
        }

        let email = normalize_email(&self.email);
        if !is_valid_email(&email) {
            return Err(AppError::validation("Email inválido"));
        }

        check_password(&self.password)?;

        Ok(PlayerDraft {
            full_name: self.full_name.trim().to_string(),
            nickname: self.nickname.trim().to_string(),
            position,
            shirt_number,
            birth_date,
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            email,
            cpf: cpf::normalize(&self.cpf),
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn form() -> NewPlayerForm {
        NewPlayerForm {
            full_name: "Carlos Bugari".into(),
            nickname: "Bugari".into(),
            position: "meia".into(),
            shirt_number: "10".into(),
            birth_date: "1990-04-12".into(),
            phone: "(71) 98888-7777".into(),
            address: "Rua do Porto, 12".into(),
            email: "bugari@example.com".into(),
            cpf: "390.533.447-05".into(),
            password: "segredo".into(),
        }
    }

    #[test]
    fn accepts_complete_form() {
        let draft = form().validate(today()).unwrap();

        assert_eq!(draft.position, Position::Midfielder);
        assert_eq!(draft.shirt_number, 10);
        assert_eq!(draft.cpf, "39053344705");
    }

    #[test]
    fn shirt_number_range() {
        for bad in ["0", "100", "-1", "dez"] {
            let f = NewPlayerForm {
                shirt_number: bad.into(),
                ..form()
            };
            assert!(f.validate(today()).is_err(), "{bad} should be rejected");
        }

        let f = NewPlayerForm {
            shirt_number: "99".into(),
            ..form()
        };
        assert!(f.validate(today()).is_ok());
    }

    #[test]
    fn unknown_position() {
        let f = NewPlayerForm {
            position: "Ponta".into(),
            ..form()
        };

        assert_eq!(f.validate(today()).unwrap_err().to_string(), "Posição inválida");
    }

    #[test]
    fn birth_date_must_be_in_the_past() {
        let f = NewPlayerForm {
            birth_date: "2030-01-01".into(),
            ..form()
        };

        assert!(f.validate(today()).is_err());
    }
}

use std::collections::HashMap;

use axum::body::Bytes;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    constants::{MonthlyStatus, TransactionKind},
    error::AppError,
    utils::{parse_cents, parse_reference_month, reference_month},
};

fn parse_amount(input: &str) -> Result<i64, AppError> {
    parse_cents(input)
        .filter(|cents| *cents > 0)
        .ok_or_else(|| AppError::validation("Valor inválido"))
}

fn parse_date(input: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation("Data inválida"))
}

fn parse_month(input: &str) -> Result<String, AppError> {
    parse_reference_month(input)
        .map(reference_month)
        .ok_or_else(|| AppError::validation("Mês de referência inválido (use AAAA-MM)"))
}

/// A transaction as submitted from the multipart form.
#[derive(Debug, Clone)]
pub struct TransactionUpload {
    pub kind: TransactionKind,
    pub category: String,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub description: String,
    pub receipt: Option<Bytes>,
}

fn text(fields: &HashMap<String, Bytes>, name: &str) -> String {
    fields
        .get(name)
        .map(|v| String::from_utf8_lossy(v).trim().to_string())
        .unwrap_or_default()
}

impl TransactionUpload {
    pub fn from_fields(fields: HashMap<String, Bytes>) -> Result<Self, AppError> {
        let kind = TransactionKind::parse(&text(&fields, "kind"))
            .ok_or_else(|| AppError::validation("Tipo inválido"))?;

        let category = text(&fields, "category");
        let description = text(&fields, "description");
        if category.is_empty() || description.is_empty() {
            return Err(AppError::validation("Todos os campos são obrigatórios"));
        }

        Ok(Self {
            kind,
            amount_cents: parse_amount(&text(&fields, "amount"))?,
            date: parse_date(&text(&fields, "date"))?,
            receipt: fields.get("receipt").filter(|r| !r.is_empty()).cloned(),
            category,
            description,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct NewMonthlyForm {
    pub player_id: u64,
    pub amount: String,
    pub reference_month: String,
    pub due_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyDraft {
    pub player_id: u64,
    pub amount_cents: i64,
    pub reference_month: String,
    pub due_date: NaiveDate,
}

impl NewMonthlyForm {
    pub fn validate(&self) -> Result<MonthlyDraft, AppError> {
        Ok(MonthlyDraft {
            player_id: self.player_id,
            amount_cents: parse_amount(&self.amount)?,
            reference_month: parse_month(&self.reference_month)?,
            due_date: parse_date(&self.due_date)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct MonthlyStatusForm {
    pub status: String,
}

impl MonthlyStatusForm {
    pub fn validate(&self) -> Result<MonthlyStatus, AppError> {
        MonthlyStatus::parse(&self.status).ok_or_else(|| AppError::validation("Status inválido"))
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateMonthliesForm {
    pub reference_month: String,
    pub due_date: String,
}

impl GenerateMonthliesForm {
    pub fn validate(&self) -> Result<(String, NaiveDate), AppError> {
        Ok((
            parse_month(&self.reference_month)?,
            parse_date(&self.due_date)?,
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct NewCardForm {
    pub player_id: u64,
    pub description: String,
    pub amount: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub player_id: u64,
    pub description: String,
    pub amount_cents: i64,
    pub date: NaiveDate,
}

impl NewCardForm {
    pub fn validate(&self) -> Result<CardDraft, AppError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(AppError::validation("Todos os campos são obrigatórios"));
        }

        Ok(CardDraft {
            player_id: self.player_id,
            description: description.to_string(),
            amount_cents: parse_amount(&self.amount)?,
            date: parse_date(&self.date)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, Bytes> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Bytes::copy_from_slice(v.as_bytes())))
            .collect()
    }

    #[test]
    fn builds_transaction_from_multipart_fields() {
        let upload = TransactionUpload::from_fields(fields(&[
            ("kind", "saida"),
            ("category", "Arbitragem"),
            ("amount", "160,00"),
            ("date", "2025-12-14"),
            ("description", "Trio de arbitragem"),
            ("receipt", ""),
        ]))
        .unwrap();

        assert_eq!(upload.kind, TransactionKind::Outflow);
        assert_eq!(upload.amount_cents, 16_000);
        assert!(upload.receipt.is_none());
    }

    #[test]
    fn rejects_bad_transaction_fields() {
        let err = TransactionUpload::from_fields(fields(&[
            ("kind", "transferencia"),
            ("category", "x"),
            ("amount", "1"),
            ("date", "2025-12-14"),
            ("description", "x"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "Tipo inválido");

        let err = TransactionUpload::from_fields(fields(&[
            ("kind", "entrada"),
            ("category", "x"),
            ("amount", "abc"),
            ("date", "2025-12-14"),
            ("description", "x"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "Valor inválido");
    }

    #[test]
    fn monthly_form_normalizes_month() {
        let draft = NewMonthlyForm {
            player_id: 3,
            amount: "50".into(),
            reference_month: "2025-12".into(),
            due_date: "2025-12-10".into(),
        }
        .validate()
        .unwrap();

        assert_eq!(draft.amount_cents, 5_000);
        assert_eq!(draft.reference_month, "2025-12");

        let bad = NewMonthlyForm {
            player_id: 3,
            amount: "50".into(),
            reference_month: "12/2025".into(),
            due_date: "2025-12-10".into(),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn status_values() {
        let form = |s: &str| MonthlyStatusForm { status: s.into() };

        assert_eq!(form("pago").validate().unwrap(), MonthlyStatus::Paid);
        assert!(form("quitado").validate().is_err());
    }
}

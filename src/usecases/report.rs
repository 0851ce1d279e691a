use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{
    constants::{CardStatus, MonthlyStatus},
    infrastructure::database::DbPoolManager,
    models::{CardListing, Transaction},
    repository,
    usecases::dashboard::{Totals, summarize},
    utils::{next_month_start, reference_month},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub kind: String,
    pub category: String,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub paid: i64,
    pub open: i64,
    pub overdue: i64,
}

impl StatusCounts {
    pub fn from_rows(rows: &[(String, i64)]) -> Self {
        rows.iter().fold(Self::default(), |mut counts, (status, n)| {
            match MonthlyStatus::from_db(status) {
                MonthlyStatus::Paid => counts.paid += n,
                MonthlyStatus::Open => counts.open += n,
                MonthlyStatus::Overdue => counts.overdue += n,
            }
            counts
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub month: String,
    pub totals: Totals,
    pub categories: Vec<CategoryTotal>,
    pub monthlies: StatusCounts,
    pub cards: Vec<CardListing>,
    pub cards_pending_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub month: String,
    pub totals: Totals,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnualReport {
    pub year: i32,
    pub months: Vec<MonthTotals>,
    pub totals: Totals,
}

/// Per kind and category, in kind then category order.
pub fn by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut grouped: BTreeMap<(String, String), i64> = BTreeMap::new();

    for t in transactions {
        *grouped
            .entry((t.kind().as_str().to_string(), t.category.clone()))
            .or_default() += t.amount_cents;
    }

    grouped
        .into_iter()
        .map(|((kind, category), amount_cents)| CategoryTotal {
            kind,
            category,
            amount_cents,
        })
        .collect()
}

/// Twelve entries, January first, empty months included.
pub fn by_month(year: i32, transactions: &[Transaction]) -> Vec<MonthTotals> {
    (1..=12)
        .filter_map(|month| NaiveDate::from_ymd_opt(year, month, 1))
        .map(|start| MonthTotals {
            month: reference_month(start),
            totals: summarize(
                transactions
                    .iter()
                    .filter(|t| t.date.year() == year && t.date.month() == start.month()),
            ),
        })
        .collect()
}

pub async fn monthly(db: &DbPoolManager, month_start: NaiveDate) -> Result<MonthlyReport> {
    let month = reference_month(month_start);
    let until = next_month_start(month_start);

    let (transactions, status_rows, cards) = tokio::try_join!(
        repository::transaction::fetch_between(db, month_start, until),
        repository::monthly::count_by_status(db, Some(&month)),
        repository::card::fetch_between(db, month_start, until),
    )?;

    let cards_pending_cents = cards
        .iter()
        .filter(|c| c.status() == CardStatus::Pending)
        .map(|c| c.amount_cents)
        .sum();

    Ok(MonthlyReport {
        totals: summarize(&transactions),
        categories: by_category(&transactions),
        monthlies: StatusCounts::from_rows(&status_rows),
        cards,
        cards_pending_cents,
        month,
    })
}

/// `[Jan 1st of year, Jan 1st of the next)`, or `None` outside chrono's range.
pub fn year_range(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let from = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let until = NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?;

    Some((from, until))
}

pub async fn annual(db: &DbPoolManager, year: i32) -> Result<Option<AnnualReport>> {
    let Some((from, until)) = year_range(year) else {
        return Ok(None);
    };

    let transactions = repository::transaction::fetch_between(db, from, until).await?;

    Ok(Some(AnnualReport {
        year,
        months: by_month(year, &transactions),
        totals: summarize(&transactions),
    }))
}

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    constants::TransactionKind,
    infrastructure::database::DbPoolManager,
    models::{Card, Monthly, Player, Transaction},
    repository,
    utils::{month_start, reference_month},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub revenue_cents: i64,
    pub expenses_cents: i64,
    pub balance_cents: i64,
}

impl Totals {
    pub fn add(&mut self, kind: TransactionKind, amount_cents: i64) {
        match kind {
            TransactionKind::Inflow => self.revenue_cents += amount_cents,
            TransactionKind::Outflow => self.expenses_cents += amount_cents,
        }

        self.balance_cents = self.revenue_cents - self.expenses_cents;
    }
}

pub fn summarize<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Totals {
    transactions.into_iter().fold(Totals::default(), |mut totals, t| {
        totals.add(t.kind(), t.amount_cents);
        totals
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_players: i64,
    pub active_players: i64,
    pub pending_monthlies: i64,
    /// `YYYY-MM` the totals cover.
    pub month: String,
    pub totals: Totals,
}

/// Headline numbers; the current month is taken from `today`.
pub async fn load_summary(db: &DbPoolManager, today: NaiveDate) -> Result<DashboardSummary> {
    let (total_players, active_players, pending_monthlies, transactions) = tokio::try_join!(
        repository::player::count_all(db),
        repository::player::count_active(db),
        repository::monthly::count_pending(db),
        repository::transaction::fetch_since(db, month_start(today)),
    )?;

    Ok(DashboardSummary {
        total_players,
        active_players,
        pending_monthlies,
        month: reference_month(today),
        totals: summarize(&transactions),
    })
}

/// A player's own record, dues and cards.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerOverview {
    pub player: Option<Player>,
    pub monthlies: Vec<Monthly>,
    pub cards: Vec<Card>,
}

impl PlayerOverview {
    pub fn pending_cents(&self) -> i64 {
        self.monthlies
            .iter()
            .filter(|m| m.status().is_pending())
            .map(|m| m.amount_cents)
            .sum()
    }
}

pub async fn load_player_overview(db: &DbPoolManager, player_id: u64) -> Result<PlayerOverview> {
    let (player, monthlies, cards) = tokio::try_join!(
        repository::player::fetch_by_id(db, player_id),
        repository::monthly::fetch_by_player(db, player_id),
        repository::card::fetch_by_player(db, player_id),
    )?;

    Ok(PlayerOverview {
        player,
        monthlies,
        cards,
    })
}


#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{fixtures::*, *};
    use crate::models::Monthly;

    #[test]
    fn sums_fixture_ledger() {
        let totals = summarize(&december());

        assert_eq!(totals.revenue_cents, 125_000);
        assert_eq!(totals.expenses_cents, 48_050);
        assert_eq!(totals.balance_cents, 76_950);
    }

    #[test]
    fn empty_ledger_is_zero() {
        assert_eq!(summarize(&[]), Totals::default());
    }

    #[test]
    fn balance_can_go_negative() {
        let ledger = [
            transaction(1, "entrada", "Mensalidades", 5_000, "2025-12-01"),
            transaction(2, "saida", "Aluguel do campo", 20_000, "2025-12-02"),
        ];

        assert_eq!(summarize(&ledger).balance_cents, -15_000);
    }

    #[test]
    fn overview_counts_open_and_overdue_dues() {
        let monthly = |id: u64, status: &str, cents: i64| Monthly {
            id,
            player_id: 1,
            amount_cents: cents,
            reference_month: format!("2025-{id:02}"),
            status: status.into(),
            payment_date: None,
            due_date: NaiveDate::from_ymd_opt(2025, id as u32, 10).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let overview = PlayerOverview {
            player: None,
            monthlies: vec![
                monthly(1, "pago", 5_000),
                monthly(2, "vencido", 5_000),
                monthly(3, "em_aberto", 6_000),
            ],
            cards: vec![],
        };

        assert_eq!(overview.pending_cents(), 11_000);
    }
}

use std::time::Duration;

use crate::{infrastructure::database::DbPoolManager, repository, utils::local_today};

/// Flips open dues past their due date to overdue, forever.
pub async fn sweep_overdue_monthlies(db: DbPoolManager, every: Duration, utc_offset_hours: i32) {
    let mut interval = tokio::time::interval(every);

    loop {
        interval.tick().await;

        let today = local_today(utc_offset_hours);

        match repository::monthly::mark_overdue(&db, today).await {
            Ok(0) => {},
            Ok(n) => tracing::info!("marked {n} monthlies as overdue"),
            Err(e) => tracing::warn!("overdue sweep failed: {e}"),
        }
    }
}

use std::sync::Arc;

use dogstatsd::Client;
use storage::Storage;

use crate::{config::Config, infrastructure::database::DbPoolManager, usecases::auth::Accounts};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: DbPoolManager,
    pub metrics: Arc<Client>,
    pub storage: Storage,
    /// Account lookups for login and session checks.
    pub accounts: Arc<dyn Accounts>,
}

impl AppState {
    pub fn new(config: Arc<Config>, db: DbPoolManager, metrics: Client, storage: Storage) -> Self {
        Self {
            config,
            accounts: Arc::new(db.clone()),
            db,
            metrics: Arc::new(metrics),
            storage,
        }
    }
}

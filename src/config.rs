use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub port: u16,
    pub default_slug: String,
    /// Offset of the association's local time from UTC, used for
    /// calendar-month boundaries and due dates.
    pub utc_offset_hours: i32,
    pub overdue_sweep_secs: u64,
    pub receipt_path: PathBuf,
    pub database: DatabaseConfig,
    pub datadog: DatadogConfig,
    pub session: SessionConfig,
    pub r2: CloudflareR2Config,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatadogConfig {
    pub host: String,
    pub port: u16,
    pub namespace: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_secs: i64,
    pub secure_cookie: bool,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudflareR2Config {
    pub account_id: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            default_slug: "porto-dos-santos".into(),
            utc_offset_hours: -3,
            overdue_sweep_secs: 60 * 60,
            receipt_path: PathBuf::from(".data/receipts"),
            database: DatabaseConfig::default(),
            datadog: DatadogConfig::default(),
            session: SessionConfig::default(),
            r2: CloudflareR2Config::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 3306,
            username: "root".into(),
            password: "password".into(),
            database: "porto".into(),
            max_connections: 10,
            min_connections: 2,
            run_migrations: true,
        }
    }
}

impl Default for DatadogConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8125,
            namespace: "porto".into(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            // overridden in every real deployment
            secret: "change-me".into(),
            ttl_secs: 30 * 24 * 60 * 60,
            secure_cookie: false,
            bcrypt_cost: 12,
        }
    }
}

impl Default for CloudflareR2Config {
    fn default() -> Self {
        Self {
            account_id: "account_id".into(),
            access_key: "access_key".into(),
            secret_key: "secret_key".into(),
            bucket: "none".into(),
        }
    }
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

impl CloudflareR2Config {
    pub fn endpoint(&self) -> String {
        format!("https://{}.r2.cloudflarestorage.com", self.account_id)
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(port) = std::env::var("PORT") {
            config.port = port.parse()?;
        }
        if let Ok(default_slug) = std::env::var("DEFAULT_SLUG") {
            config.default_slug = default_slug.trim().to_lowercase();
        }
        if let Ok(offset) = std::env::var("UTC_OFFSET_HOURS") {
            config.utc_offset_hours = offset.parse()?;
        }
        if let Ok(sweep) = std::env::var("OVERDUE_SWEEP_SECS") {
            config.overdue_sweep_secs = sweep.parse()?;
        }
        if let Ok(receipt_path) = std::env::var("RECEIPT_PATH") {
            config.receipt_path = PathBuf::from(receipt_path);
        }

        if let Ok(db_host) = std::env::var("DATABASE_HOST") {
            config.database.host = db_host;
        }
        if let Ok(db_port) = std::env::var("DATABASE_PORT") {
            config.database.port = db_port.parse()?;
        }
        if let Ok(db_user) = std::env::var("DATABASE_USERNAME") {
            config.database.username = db_user;
        }
        if let Ok(db_pass) = std::env::var("DATABASE_PASSWORD") {
            config.database.password = db_pass;
        }
        if let Ok(db_name) = std::env::var("DATABASE_NAME") {
            config.database.database = db_name;
        }
        if let Ok(max_conn) = std::env::var("DATABASE_MAX_CONNECTIONS") {
            config.database.max_connections = max_conn.parse()?;
        }
        if let Ok(min_conn) = std::env::var("DATABASE_MIN_CONNECTIONS") {
            config.database.min_connections = min_conn.parse()?;
        }
        if let Ok(run_migrations) = std::env::var("DATABASE_RUN_MIGRATIONS") {
            config.database.run_migrations = run_migrations.parse()?;
        }

        if let Ok(datadog_host) = std::env::var("DATADOG_HOST") {
            config.datadog.host = datadog_host;
        }
        if let Ok(datadog_port) = std::env::var("DATADOG_PORT") {
            config.datadog.port = datadog_port.parse()?;
        }
        if let Ok(datadog_namespace) = std::env::var("DATADOG_NAMESPACE") {
            config.datadog.namespace = datadog_namespace;
        }

        if let Ok(secret) = std::env::var("SESSION_SECRET") {
            config.session.secret = secret;
        }
        if let Ok(ttl) = std::env::var("SESSION_TTL_SECS") {
            config.session.ttl_secs = ttl.parse()?;
        }
        if let Ok(secure) = std::env::var("SESSION_SECURE_COOKIE") {
            config.session.secure_cookie = secure.parse()?;
        }
        if let Ok(cost) = std::env::var("BCRYPT_COST") {
            config.session.bcrypt_cost = cost.parse()?;
        }

        if let Ok(r2_account_id) = std::env::var("R2_ACCOUNT_ID") {
            config.r2.account_id = r2_account_id;
        }
        if let Ok(r2_access_key) = std::env::var("R2_ACCESS_KEY") {
            config.r2.access_key = r2_access_key;
        }
        if let Ok(r2_secret_key) = std::env::var("R2_SECRET_KEY") {
            config.r2.secret_key = r2_secret_key;
        }
        if let Ok(r2_bucket) = std::env::var("R2_BUCKET") {
            config.r2.bucket = r2_bucket;
        }

        Ok(config)
    }
}

pub mod database;
pub mod datadog;
pub mod tasks;

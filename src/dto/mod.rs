pub mod admin;
pub mod auth;
pub mod financial;
pub mod flash;
pub mod player;
pub mod report;

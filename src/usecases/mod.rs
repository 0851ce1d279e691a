pub mod auth;
pub mod cpf;
pub mod dashboard;
pub mod password;
pub mod registration;
pub mod report;
pub mod session;

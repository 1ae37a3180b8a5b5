pub mod accounts;
pub mod ratings;
pub mod server;

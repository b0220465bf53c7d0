pub mod account;
pub mod auth;
pub mod customer;
pub mod dashboard;
pub mod date;
pub mod response;
pub mod session;
pub mod transfer;

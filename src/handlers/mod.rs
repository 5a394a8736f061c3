pub mod admin;
pub mod auth;
pub mod catalog;
pub mod customer;
pub mod driver;

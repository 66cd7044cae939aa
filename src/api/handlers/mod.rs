pub mod admin;
pub mod auth;
pub mod export;
pub mod health;
pub mod import;
pub mod member;

pub mod auth_service;
pub mod expiry;
pub mod export;
pub mod mapping;
pub mod table_view;
pub mod token;

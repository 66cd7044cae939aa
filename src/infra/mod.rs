pub mod factory;
pub mod files;
pub mod repositories;

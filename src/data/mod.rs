pub mod files;
pub mod loader;
pub mod models;

pub mod drive;
pub mod models;
pub mod radar;
pub mod settings;

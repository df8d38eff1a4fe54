pub mod radar;
pub mod settings;

//! Reader configuration (`.kdb1.toml`).

pub mod settings;

pub use settings::Settings;

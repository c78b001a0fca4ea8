//! Project configuration (`.kvx.toml`).

pub mod settings;

pub use settings::Settings;

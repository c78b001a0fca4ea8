#[cfg(feature = "audit-log")]
pub mod audit;
pub mod cli;
pub mod config;
pub mod content;
pub mod errors;
pub mod sync;
pub mod vault;

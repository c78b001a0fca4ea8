//! One module per `kvx` subcommand.

pub mod add;
#[cfg(feature = "audit-log")]
pub mod audit_cmd;
pub mod completions;
pub mod copy;
pub mod delete;
pub mod edit;
pub mod list;
pub mod save;
pub mod show;
pub mod toggle;

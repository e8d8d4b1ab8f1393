//! One module per `kdb1` subcommand.

pub mod completions;
pub mod info;
pub mod keyfile;
pub mod list;
pub mod show;
pub mod tree;

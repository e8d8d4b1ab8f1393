//! Reader for KeePass 1.x (`.kdb`) password databases.
//!
//! ```no_run
//! use std::path::Path;
//! use kdb1::Kdb1Reader;
//!
//! let mut reader = Kdb1Reader::new();
//! let db = reader.read_database(Path::new("passwords.kdb"), Some("secret"), None)?;
//! for (group, entry) in db.entries() {
//!     println!("{}/{}", group.name(), entry.title());
//! }
//! # Ok::<(), kdb1::errors::Kdb1Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod db;
pub mod errors;
pub mod format;
pub mod reader;

pub use db::Database;
pub use errors::{Kdb1Error, Result};
pub use reader::Kdb1Reader;

//! # pubharvest
//!
//! Harvest bibliographic records from PubMed's E-utilities service, load
//! them into a two-table SQLite schema, and look publications up by author
//! name prefix.
//!
//! ## Architecture
//!
//! The pipeline is fully sequential with blocking I/O:
//!
//! - [`utils`]: date normalization and interactive prompts
//! - [`entrez`]: the [`Entrez`] capability trait, the HTTP E-utilities
//!   client, and the paginating [`Harvester`]
//! - [`medline`]: MEDLINE field-tagged text parsing and tolerant record
//!   normalization
//! - [`models`]: normalized records and expanded author rows
//! - [`interchange`]: the CSV file handed from the harvest stage to the
//!   load stage
//! - [`store`]: SQLite schema creation, full-refresh load, and the author
//!   query
//! - [`config`]: configuration management

pub mod config;
pub mod entrez;
pub mod interchange;
pub mod medline;
pub mod models;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use entrez::{DateWindow, Entrez, EUtilsClient, Harvester};
pub use models::{AuthorRow, ParsedRecord};
pub use store::Store;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Core data models for harvested publications and their authors.

mod author;
mod record;

pub use author::{expand_authors, split_full_name, AuthorRow};
pub use record::{Outcome, ParsedRecord, SkipReason};

//! Utility modules supporting the harvest pipeline.
//!
//! - [`normalize_date`] / [`denormalize_date`]: reorder user-entered
//!   `MM/DD/YYYY` dates into the `YYYY/MM/DD` form E-utilities expects
//! - [`prompt`]: one-line interactive stdin prompt

mod dates;
mod prompt;

pub use dates::{denormalize_date, normalize_date, DateError};
pub use prompt::prompt;

//! Salary signal extraction from free-text job descriptions.
//!
//! Each detector runs independently over the same text, so one description
//! can be flagged for several categories at once.

pub mod aggregate;
pub mod anchor;
pub mod classify;
pub mod exclusion;
pub mod phrases;
pub mod range;
pub mod types;
pub mod window;

pub use aggregate::{Detector, SalaryExtractor, SalaryRecord};
pub use types::{Category, ExtractorConfig, SalaryMention};

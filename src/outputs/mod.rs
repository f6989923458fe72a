//! Output generation for scraped articles.
//!
//! # Submodules
//!
//! - [`json`]: Writes the aggregated article array to a JSON file that the
//!   read path (and the browse UI) can consume later

pub mod json;

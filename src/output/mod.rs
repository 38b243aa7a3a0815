//! Output formatters for scan and dedupe results.
//!
//! This module provides two output formats:
//! - Text for people, with optional colors
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::duplicates::DuplicateFinder;
//! use dupsweep::error::ExitCode;
//! use dupsweep::output::{JsonOutput, TextOutput};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! TextOutput::new(false)
//!     .write_scan(&mut std::io::stdout(), &groups, &summary)
//!     .unwrap();
//!
//! let output = JsonOutput::new(&groups, &summary, ExitCode::for_scan(&summary));
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::{write_json, JsonOutput, JsonOutputError};
pub use text::{TextOutput, NO_DUPLICATES};

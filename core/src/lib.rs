//! Turns Mr. DLib recommendation responses into ordered bibliographic records.
//!
//! ```
//! let body = r#"{"recommendations": {"a": {"title": "T", "recommendation_id": 2}}}"#;
//! assert!(mdl_core::is_recognized_format(body));
//! let records = mdl_core::parse(body).unwrap();
//! assert_eq!(records.records()[0].title(), "T");
//! ```

use serde::{Deserialize, Serialize};

pub mod display;
pub mod error;
pub mod importer;
pub mod message;
pub mod parser;
pub mod recognizer;
pub mod record;
mod strict;

pub use error::{ImportError, Result};
pub use importer::{read_payload, FileType, Importer, MrDlibImporter};
pub use message::{extract_error_message, DEFAULT_ERROR_MESSAGE};
pub use parser::{parse, parse_with, DEFAULT_RANK};
pub use recognizer::is_recognized_format;
pub use record::{Field, Record, ResultSet};

/// Top-level key holding the recommendation entries.
pub const RECOMMENDATIONS_KEY: &str = "recommendations";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Escape `& < > " '` in field values before they go into the display string.
    #[serde(default)]
    pub escape_html: bool,
}

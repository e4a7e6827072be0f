use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::parser::parse_with;
use crate::recognizer::is_recognized_format;
use crate::record::ResultSet;
use crate::ParseOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Json,
}

impl FileType {
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileType::Json => &["json"],
        }
    }
}

/// A reader-based import format, as the reference manager sees it.
pub trait Importer {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn file_type(&self) -> FileType;
    fn is_recognized_format<R: BufRead>(&self, input: R) -> Result<bool>;
    fn import_database<R: BufRead>(&self, input: R) -> Result<ResultSet>;
}

/// Importer for Mr. DLib recommendation responses.
#[derive(Debug, Clone, Default)]
pub struct MrDlibImporter {
    options: ParseOptions,
}

impl MrDlibImporter {
    pub fn new() -> Self { Self::default() }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions { &self.options }
}

impl Importer for MrDlibImporter {
    fn name(&self) -> &str {
        "MrDLibImporter"
    }

    fn description(&self) -> &str {
        "Takes valid JSON documents from the Mr. DLib API and parses them into a BibEntry"
    }

    fn file_type(&self) -> FileType {
        FileType::Json
    }

    /// Unreadable input, including bytes that are not UTF-8, is not recognized.
    fn is_recognized_format<R: BufRead>(&self, input: R) -> Result<bool> {
        match read_payload(input) {
            Ok(payload) => Ok(is_recognized_format(&payload)),
            Err(e) => {
                tracing::debug!(error = %e, "payload unreadable, not recognized");
                Ok(false)
            }
        }
    }

    fn import_database<R: BufRead>(&self, input: R) -> Result<ResultSet> {
        let payload = read_payload(input)?;
        let records = parse_with(&payload, &self.options)?;
        tracing::info!(count = records.len(), importer = self.name(), "imported recommendations");
        Ok(records)
    }
}

/// Drain a reader into one string; lines are joined without separators.
pub fn read_payload<R: BufRead>(input: R) -> Result<String> {
    let mut payload = String::new();
    for line in input.lines() {
        payload.push_str(&line?);
    }
    Ok(payload)
}

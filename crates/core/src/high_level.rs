//! One-call extraction helpers.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::extract::TextExtractor;
use crate::field::PtocaDecoder;

/// Lazily extract every transparent data run from `input`.
pub fn extract_text<R: Read>(input: R, config: ParserConfig) -> TextExtractor<R, PtocaDecoder> {
    TextExtractor::new(input, config)
}

/// Extract all text from the AFP file at `path`.
///
/// The file handle is dropped when extraction finishes, on the error path
/// included.
pub fn extract_text_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let file = File::open(path)?;
    TextExtractor::new(BufReader::new(file), ParserConfig::default()).collect()
}

//! afplite - AFP/MO:DCA presentation text extraction.
//!
//! Scans a stream of length-prefixed structured fields, skips everything
//! that is not presentation text, and yields the transparent data runs as
//! a lazy, forward-only sequence of strings.

pub mod config;
pub mod cursor;
pub mod error;
pub mod extract;
pub mod field;
pub mod high_level;
pub mod introducer;
pub mod padding;
pub mod ptoca;
pub mod scanner;

pub use config::ParserConfig;
pub use cursor::ByteCursor;
pub use error::{AfpError, Result};
pub use extract::TextExtractor;
pub use field::{PtocaDecoder, StructuredField, StructuredFieldDecoder};
pub use high_level::{extract_text, extract_text_from_file};
pub use introducer::{FIELD_MARKER, SfFlags, SfIntroducer, SfTypeId};
pub use ptoca::{ControlSequence, PresentationTextData};
pub use scanner::{FieldEvent, FieldScanner};

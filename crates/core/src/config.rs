//! Parser configuration.

/// Decoding options for text extraction.
///
/// The byte source is passed to the extractor separately; the parser never
/// owns or closes it, so the caller decides its lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserConfig {
    /// Tolerate a truncated trailing control sequence at the end of a text
    /// field's content instead of failing the session.
    pub lenient: bool,
}

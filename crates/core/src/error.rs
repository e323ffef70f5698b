//! Error types for AFP structured field parsing.

use thiserror::Error;

use crate::introducer::SfTypeId;

/// Primary error type for AFP parsing operations.
#[derive(Error, Debug)]
pub enum AfpError {
    /// Raw end-of-stream from the byte cursor. The scanner turns this into
    /// either a clean end (while resynchronizing on a field marker) or
    /// [`AfpError::Truncated`] (anywhere after a marker was found).
    #[error("unexpected end of stream at byte {offset}")]
    UnexpectedEof { offset: u64 },

    /// End of stream reached inside a structured field.
    #[error("structured field truncated at byte {offset}")]
    Truncated { offset: u64 },

    /// A declared length or padding value that contradicts the field's
    /// own structure.
    #[error("malformed structured field at byte {offset}: {msg}")]
    MalformedField { offset: u64, msg: String },

    /// PTOCA decode failure inside a text field's content.
    #[error("control sequence error at content offset {offset}: {msg}")]
    ControlSequence { offset: usize, msg: String },

    /// The injected decoder produced a non-text field for a type code the
    /// dispatcher had already classified as presentation text.
    #[error("decoder returned a non-text field for type {type_id}")]
    UnexpectedFieldKind { type_id: SfTypeId },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for AfpError.
pub type Result<T> = std::result::Result<T, AfpError>;

//! Structured field introducer metadata.

use bitflags::bitflags;
use std::fmt;

use crate::error::{AfpError, Result};

/// Carriage control byte opening every structured field.
pub const FIELD_MARKER: u8 = 0x5A;

/// Introducer bytes covered by the declared length when no extension is
/// present: 2 length bytes, 3 type bytes, flag byte, 2 reserved bytes.
pub const BASE_INTRODUCER_LEN: usize = 8;

/// Smallest declared length the scanner accepts. The skip length of a
/// non-text field is `declared length - 4`.
pub const MIN_SF_LENGTH: u16 = 4;

bitflags! {
    /// Structured field introducer flag byte (MO:DCA bit numbering,
    /// bit 0 is the most significant bit).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SfFlags: u8 {
        /// An introducer extension follows the reserved bytes.
        const HAS_EXTENSION = 0x80;
        /// The field's data is split across segments.
        const SEGMENTED = 0x20;
        /// The payload carries trailing padding.
        const PADDED = 0x08;
    }
}

/// Three-byte structured field type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SfTypeId(pub [u8; 3]);

impl SfTypeId {
    /// PTX - Presentation Text Data.
    pub const PRESENTATION_TEXT_DATA: SfTypeId = SfTypeId([0xD3, 0xEE, 0x9B]);

    pub fn is_presentation_text(self) -> bool {
        self == Self::PRESENTATION_TEXT_DATA
    }
}

impl fmt::Display for SfTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

/// Parsed structured field introducer.
#[derive(Debug, Clone)]
pub struct SfIntroducer {
    /// Declared field length. Counts the introducer from its own two
    /// length bytes onward, but not the marker.
    pub sf_length: u16,
    pub type_id: SfTypeId,
    pub flags: SfFlags,
    /// Reserved pair, kept verbatim.
    pub reserved: [u8; 2],
    /// Extension bytes, present iff [`SfFlags::HAS_EXTENSION`] is set.
    pub extension: Option<Vec<u8>>,
    /// Stream offset of the field's marker byte.
    pub file_offset: u64,
}

impl SfIntroducer {
    pub fn has_extension(&self) -> bool {
        self.flags.contains(SfFlags::HAS_EXTENSION)
    }

    pub fn is_padded(&self) -> bool {
        self.flags.contains(SfFlags::PADDED)
    }

    /// Introducer size covered by `sf_length`, extension included. The
    /// extension's own length byte counts along with its data.
    pub fn introducer_len(&self) -> usize {
        BASE_INTRODUCER_LEN + self.extension.as_ref().map_or(0, |ext| ext.len() + 1)
    }

    /// Payload size implied by the declared length.
    pub fn payload_len(&self) -> Result<usize> {
        let header = self.introducer_len();
        (self.sf_length as usize)
            .checked_sub(header)
            .ok_or_else(|| AfpError::MalformedField {
                offset: self.file_offset,
                msg: format!(
                    "declared length {} shorter than the {header}-byte introducer",
                    self.sf_length
                ),
            })
    }
}

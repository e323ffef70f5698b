//! Structured field scanning and dispatch.

use log::{debug, trace};
use std::io::Read;

use crate::config::ParserConfig;
use crate::cursor::ByteCursor;
use crate::error::{AfpError, Result};
use crate::field::{PtocaDecoder, StructuredField, StructuredFieldDecoder};
use crate::introducer::{FIELD_MARKER, MIN_SF_LENGTH, SfFlags, SfIntroducer, SfTypeId};
use crate::padding::trailing_padding;

/// Result of driving the scanner over one structured field.
#[derive(Debug)]
pub enum FieldEvent {
    /// A presentation text field; transparent data runs in stream order.
    Text(Vec<String>),
    /// A non-text field, skipped without decoding.
    Skipped(SfTypeId),
    /// Clean end of stream: no further marker found.
    End,
}

/// Forward scanner that classifies structured fields and decodes only
/// presentation text.
///
/// Non-text fields cost a length read and a skip; their contents are never
/// allocated or interpreted.
pub struct FieldScanner<R, D = PtocaDecoder> {
    cursor: ByteCursor<R>,
    config: ParserConfig,
    decoder: D,
}

impl<R: Read> FieldScanner<R, PtocaDecoder> {
    pub fn new(input: R, config: ParserConfig) -> Self {
        Self::with_decoder(input, config, PtocaDecoder)
    }
}

impl<R: Read, D: StructuredFieldDecoder> FieldScanner<R, D> {
    pub fn with_decoder(input: R, config: ParserConfig, decoder: D) -> Self {
        Self {
            cursor: ByteCursor::new(input),
            config,
            decoder,
        }
    }

    /// Bytes consumed from the input so far.
    pub fn consumed(&self) -> u64 {
        self.cursor.consumed()
    }

    /// Process exactly one structured field.
    ///
    /// Bytes before the next marker are discarded. Running out of input
    /// while looking for a marker is the one clean way the stream ends;
    /// running out anywhere inside a field is a truncation failure.
    pub fn next_field(&mut self) -> Result<FieldEvent> {
        loop {
            match self.cursor.read_u8() {
                Ok(FIELD_MARKER) => break,
                Ok(_) => continue,
                Err(AfpError::UnexpectedEof { .. }) => return Ok(FieldEvent::End),
                Err(e) => return Err(e),
            }
        }
        let field_offset = self.cursor.consumed() - 1;

        self.read_field(field_offset).map_err(|e| match e {
            AfpError::UnexpectedEof { offset } => AfpError::Truncated { offset },
            other => other,
        })
    }

    fn read_field(&mut self, field_offset: u64) -> Result<FieldEvent> {
        let sf_length = self.cursor.read_u16_be()?;
        if sf_length < MIN_SF_LENGTH {
            return Err(AfpError::MalformedField {
                offset: field_offset,
                msg: format!("declared length {sf_length} below the {MIN_SF_LENGTH}-byte minimum"),
            });
        }
        let type_bytes = self.cursor.read_exact(3)?;
        let type_id = SfTypeId([type_bytes[0], type_bytes[1], type_bytes[2]]);

        // Everything that is not presentation text is skipped by length.
        if !type_id.is_presentation_text() {
            self.cursor.skip(sf_length as usize - 4)?;
            trace!("skipped {type_id} field at offset {field_offset}");
            return Ok(FieldEvent::Skipped(type_id));
        }

        let flags = SfFlags::from_bits_retain(self.cursor.read_u8()?);
        let reserved = self.cursor.read_exact(2)?;
        let extension = if flags.contains(SfFlags::HAS_EXTENSION) {
            let ext_len = self.cursor.read_u8()?;
            if ext_len == 0 {
                return Err(AfpError::MalformedField {
                    offset: field_offset,
                    msg: "extension length byte of zero".to_string(),
                });
            }
            Some(self.cursor.read_exact(ext_len as usize - 1)?)
        } else {
            None
        };

        let introducer = SfIntroducer {
            sf_length,
            type_id,
            flags,
            reserved: [reserved[0], reserved[1]],
            extension,
            file_offset: field_offset,
        };

        let payload = self.cursor.read_exact(introducer.payload_len()?)?;
        let padding = trailing_padding(&payload, introducer.flags, field_offset)?;
        let content = &payload[..payload.len() - padding];

        let field = self.decoder.decode(&introducer, content, &self.config)?;
        let StructuredField::PresentationText(text) = field else {
            // The type code already said text; anything else means the
            // decoder broke its contract.
            return Err(AfpError::UnexpectedFieldKind { type_id });
        };

        let strings: Vec<String> = text.transparent_data().map(str::to_owned).collect();
        debug!(
            "decoded PTX field at offset {field_offset}: {} transparent data run(s)",
            strings.len()
        );
        Ok(FieldEvent::Text(strings))
    }
}

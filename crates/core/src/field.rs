//! Structured field classification and the decoder seam.

use crate::config::ParserConfig;
use crate::error::Result;
use crate::introducer::{SfIntroducer, SfTypeId};
use crate::ptoca::PresentationTextData;

/// A decoded structured field, tagged by kind.
#[derive(Debug, Clone)]
pub enum StructuredField {
    /// PTX - decoded presentation text content.
    PresentationText(PresentationTextData),
    /// Any field the decoder chose not to interpret.
    Opaque(SfTypeId),
}

/// Decodes the content of a structured field the dispatcher did not skip.
///
/// The scanner hands over the introducer and the payload with trailing
/// padding already removed. Implementations must return
/// [`StructuredField::PresentationText`] for the PTX type code; anything
/// else there is a contract violation the scanner refuses to recover from.
pub trait StructuredFieldDecoder {
    fn decode(
        &self,
        introducer: &SfIntroducer,
        content: &[u8],
        config: &ParserConfig,
    ) -> Result<StructuredField>;
}

/// Default decoder: PTOCA for presentation text, opaque for the rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct PtocaDecoder;

impl StructuredFieldDecoder for PtocaDecoder {
    fn decode(
        &self,
        introducer: &SfIntroducer,
        content: &[u8],
        config: &ParserConfig,
    ) -> Result<StructuredField> {
        if introducer.type_id.is_presentation_text() {
            let text = PresentationTextData::decode(content, config)?;
            Ok(StructuredField::PresentationText(text))
        } else {
            Ok(StructuredField::Opaque(introducer.type_id))
        }
    }
}

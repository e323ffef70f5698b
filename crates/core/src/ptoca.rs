//! Minimal PTOCA control sequence decoding.
//!
//! Decodes exactly enough of the presentation text grammar to isolate
//! transparent data runs; every other function type is carried along
//! uninterpreted.

use crate::config::ParserConfig;
use crate::error::{AfpError, Result};

/// First byte of the control sequence prefix.
pub const CS_PREFIX: u8 = 0x2B;
/// Second byte of the control sequence prefix (the control sequence class).
pub const CS_CLASS: u8 = 0xD3;

/// TRN - Transparent Data, unchained.
pub const TRN: u8 = 0xDA;
/// TRN - Transparent Data, chained.
pub const TRN_CHAINED: u8 = 0xDB;

/// One PTOCA control sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlSequence {
    /// TRN - literal character codes to emit verbatim.
    TransparentData(String),
    /// Any other function type, isolated but not interpreted.
    Other { function: u8, data: Vec<u8> },
}

/// Decoded content of a PTX (Presentation Text Data) field.
#[derive(Debug, Clone, Default)]
pub struct PresentationTextData {
    sequences: Vec<ControlSequence>,
}

impl PresentationTextData {
    /// Decode PTX content with trailing padding already removed.
    ///
    /// Each control sequence is `[length][function][data]` where the
    /// length byte counts itself and the function byte. The first sequence
    /// and every sequence following an unchained one must open with the
    /// `2B D3` prefix; a chained sequence (odd function byte) lets the
    /// next one follow without it.
    pub fn decode(content: &[u8], config: &ParserConfig) -> Result<Self> {
        let mut sequences = Vec::new();
        let mut pos = 0usize;
        let mut chained = false;

        while pos < content.len() {
            if !chained {
                if content.len() - pos < 2 {
                    if config.lenient {
                        break;
                    }
                    return Err(cs_error(pos, "dangling byte where a prefix was expected"));
                }
                if content[pos] != CS_PREFIX || content[pos + 1] != CS_CLASS {
                    return Err(cs_error(
                        pos,
                        format!(
                            "expected control sequence prefix 2BD3, found {:02X}{:02X}",
                            content[pos],
                            content[pos + 1]
                        ),
                    ));
                }
                pos += 2;
            }

            let rest = content.len() - pos;
            if rest < 2 {
                if config.lenient {
                    break;
                }
                return Err(cs_error(pos, "truncated control sequence header"));
            }
            let length = content[pos] as usize;
            let function = content[pos + 1];
            if length < 2 {
                return Err(cs_error(
                    pos,
                    format!("control sequence length {length} below the 2-byte minimum"),
                ));
            }
            if length > rest {
                if config.lenient {
                    break;
                }
                return Err(cs_error(
                    pos,
                    format!("control sequence length {length} overruns the field content"),
                ));
            }

            let data = &content[pos + 2..pos + length];
            match function {
                TRN | TRN_CHAINED => {
                    sequences.push(ControlSequence::TransparentData(latin1(data)));
                }
                _ => sequences.push(ControlSequence::Other {
                    function,
                    data: data.to_vec(),
                }),
            }

            chained = function & 0x01 != 0;
            pos += length;
        }

        Ok(Self { sequences })
    }

    /// Ordered control sequences as they appeared in the field.
    pub fn control_sequences(&self) -> &[ControlSequence] {
        &self.sequences
    }

    /// Transparent data runs in stream order.
    pub fn transparent_data(&self) -> impl Iterator<Item = &str> {
        self.sequences.iter().filter_map(|cs| match cs {
            ControlSequence::TransparentData(text) => Some(text.as_str()),
            ControlSequence::Other { .. } => None,
        })
    }
}

fn cs_error(offset: usize, msg: impl Into<String>) -> AfpError {
    AfpError::ControlSequence {
        offset,
        msg: msg.into(),
    }
}

/// Lossless byte-to-char widening. Code page interpretation of the raw
/// character codes is the caller's concern.
fn latin1(data: &[u8]) -> String {
    data.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> ParserConfig {
        ParserConfig::default()
    }

    fn trn(text: &str, function: u8) -> Vec<u8> {
        let mut seq = vec![(text.len() + 2) as u8, function];
        seq.extend_from_slice(text.as_bytes());
        seq
    }

    #[test]
    fn single_transparent_data_run() {
        let mut content = vec![CS_PREFIX, CS_CLASS];
        content.extend(trn("Hello", TRN));
        let ptx = PresentationTextData::decode(&content, &strict()).unwrap();
        let runs: Vec<&str> = ptx.transparent_data().collect();
        assert_eq!(runs, ["Hello"]);
    }

    #[test]
    fn chained_sequences_need_no_second_prefix() {
        let mut content = vec![CS_PREFIX, CS_CLASS];
        content.extend(trn("Hello", TRN_CHAINED));
        content.extend(trn("World", TRN));
        let ptx = PresentationTextData::decode(&content, &strict()).unwrap();
        let runs: Vec<&str> = ptx.transparent_data().collect();
        assert_eq!(runs, ["Hello", "World"]);
    }

    #[test]
    fn unchained_sequence_requires_fresh_prefix() {
        let mut content = vec![CS_PREFIX, CS_CLASS];
        content.extend(trn("a", TRN));
        content.extend(trn("b", TRN)); // no prefix before this one
        assert!(matches!(
            PresentationTextData::decode(&content, &strict()),
            Err(AfpError::ControlSequence { .. })
        ));
    }

    #[test]
    fn other_functions_are_preserved_in_order() {
        let mut content = vec![CS_PREFIX, CS_CLASS];
        // AMB (absolute move baseline, chained) then a TRN.
        content.extend_from_slice(&[0x04, 0xD3, 0x01, 0x2C]);
        content.extend(trn("x", TRN));
        let ptx = PresentationTextData::decode(&content, &strict()).unwrap();
        assert_eq!(ptx.control_sequences().len(), 2);
        assert_eq!(
            ptx.control_sequences()[0],
            ControlSequence::Other {
                function: 0xD3,
                data: vec![0x01, 0x2C],
            }
        );
    }

    #[test]
    fn overrunning_length_fails_strict_but_not_lenient() {
        let content = vec![CS_PREFIX, CS_CLASS, 0x09, TRN, b'H', b'i'];
        assert!(PresentationTextData::decode(&content, &strict()).is_err());

        let lenient = ParserConfig { lenient: true };
        let ptx = PresentationTextData::decode(&content, &lenient).unwrap();
        assert_eq!(ptx.control_sequences().len(), 0);
    }

    #[test]
    fn undersized_length_is_always_an_error() {
        let content = vec![CS_PREFIX, CS_CLASS, 0x01, TRN];
        let lenient = ParserConfig { lenient: true };
        assert!(matches!(
            PresentationTextData::decode(&content, &lenient),
            Err(AfpError::ControlSequence { .. })
        ));
    }

    #[test]
    fn empty_content_decodes_to_no_sequences() {
        let ptx = PresentationTextData::decode(&[], &strict()).unwrap();
        assert!(ptx.control_sequences().is_empty());
    }
}

//! Lazy pull iteration over extracted text.

use std::collections::VecDeque;
use std::io::Read;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::field::{PtocaDecoder, StructuredFieldDecoder};
use crate::scanner::{FieldEvent, FieldScanner};

/// Refill state of the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Queue empty, stream not yet finished.
    Scanning,
    /// At least one extracted string is buffered.
    FieldReady,
    /// Clean end reached or the session failed. Terminal.
    Ended,
}

/// Forward-only, single-pass iterator over the transparent data runs of an
/// AFP stream.
///
/// Strings are pulled lazily: each refill drives the scanner one field at
/// a time until a text field contributes at least one run or the stream
/// ends. A session that hits a truncation or decode failure stays ended;
/// nothing is retried.
pub struct TextExtractor<R, D = PtocaDecoder> {
    scanner: FieldScanner<R, D>,
    queue: VecDeque<String>,
    state: ScanState,
}

impl<R: Read> TextExtractor<R, PtocaDecoder> {
    pub fn new(input: R, config: ParserConfig) -> Self {
        Self::with_decoder(input, config, PtocaDecoder)
    }
}

impl<R: Read, D: StructuredFieldDecoder> TextExtractor<R, D> {
    pub fn with_decoder(input: R, config: ParserConfig, decoder: D) -> Self {
        Self {
            scanner: FieldScanner::with_decoder(input, config, decoder),
            queue: VecDeque::new(),
            state: ScanState::Scanning,
        }
    }

    /// Bytes consumed from the input so far.
    pub fn consumed(&self) -> u64 {
        self.scanner.consumed()
    }

    /// True if another string is available.
    ///
    /// Repeated calls without an intervening [`Iterator::next`] are free
    /// of side effects: once the answer is known, the stream is not
    /// advanced again.
    pub fn has_next(&mut self) -> Result<bool> {
        match self.state {
            ScanState::FieldReady => Ok(true),
            ScanState::Ended => Ok(false),
            ScanState::Scanning => match self.refill() {
                Ok(ready) => Ok(ready),
                Err(e) => {
                    self.state = ScanState::Ended;
                    Err(e)
                }
            },
        }
    }

    /// Drive the scanner until the queue gains an entry or the stream
    /// ends. Each pass handles exactly one field, text or skipped.
    fn refill(&mut self) -> Result<bool> {
        while self.queue.is_empty() {
            match self.scanner.next_field()? {
                FieldEvent::Text(strings) => self.queue.extend(strings),
                FieldEvent::Skipped(_) => continue,
                FieldEvent::End => {
                    self.state = ScanState::Ended;
                    return Ok(false);
                }
            }
        }
        self.state = ScanState::FieldReady;
        Ok(true)
    }
}

impl<R: Read, D: StructuredFieldDecoder> Iterator for TextExtractor<R, D> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Err(e) => Some(Err(e)),
            Ok(false) => None,
            Ok(true) => {
                let head = self.queue.pop_front()?;
                if self.queue.is_empty() && self.state == ScanState::FieldReady {
                    self.state = ScanState::Scanning;
                }
                Some(Ok(head))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_never_has_next() {
        let mut ex = TextExtractor::new(&b""[..], ParserConfig::default());
        assert!(!ex.has_next().unwrap());
        assert!(!ex.has_next().unwrap());
        assert!(ex.next().is_none());
    }

    #[test]
    fn markerless_garbage_is_a_clean_end() {
        let input = [0x00u8, 0x13, 0x37, 0xD3, 0xEE];
        let mut ex = TextExtractor::new(&input[..], ParserConfig::default());
        assert!(!ex.has_next().unwrap());
    }
}

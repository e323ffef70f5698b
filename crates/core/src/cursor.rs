//! Sequential byte cursor over an untrusted input stream.

use byteorder::{BigEndian, ByteOrder};
use std::io::{ErrorKind, Read};

use crate::error::{AfpError, Result};

/// Forward-only reader that counts every byte it hands out.
///
/// End of stream is a terminal state: once any read has failed with
/// [`AfpError::UnexpectedEof`], all further reads fail the same way without
/// touching the underlying source again.
pub struct ByteCursor<R> {
    inner: R,
    consumed: u64,
    exhausted: bool,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            consumed: 0,
            exhausted: false,
        }
    }

    /// Number of bytes consumed from the source so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// True once end of stream has been observed.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn end_of_stream(&mut self) -> AfpError {
        self.exhausted = true;
        AfpError::UnexpectedEof {
            offset: self.consumed,
        }
    }

    /// Read the next byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        if self.exhausted {
            return Err(AfpError::UnexpectedEof {
                offset: self.consumed,
            });
        }
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Err(self.end_of_stream()),
                Ok(_) => {
                    self.consumed += 1;
                    return Ok(buf[0]);
                }
                // An interrupted read supplied nothing but the source is
                // not exhausted; retry it.
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(AfpError::Io(e)),
            }
        }
    }

    /// Read exactly `n` bytes.
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        if n > 0 && self.exhausted {
            return Err(AfpError::UnexpectedEof {
                offset: self.consumed,
            });
        }
        let mut data = vec![0u8; n];
        let mut filled = 0;
        while filled < n {
            match self.inner.read(&mut data[filled..]) {
                Ok(0) => return Err(self.end_of_stream()),
                Ok(read) => {
                    filled += read;
                    self.consumed += read as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(AfpError::Io(e)),
            }
        }
        Ok(data)
    }

    /// Read a big-endian unsigned 16-bit value.
    pub fn read_u16_be(&mut self) -> Result<u16> {
        let bytes = self.read_exact(2)?;
        Ok(BigEndian::read_u16(&bytes))
    }

    /// Advance `n` bytes without retaining them.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        if n > 0 && self.exhausted {
            return Err(AfpError::UnexpectedEof {
                offset: self.consumed,
            });
        }
        let mut scratch = [0u8; 512];
        let mut remaining = n;
        while remaining > 0 {
            let want = remaining.min(scratch.len());
            match self.inner.read(&mut scratch[..want]) {
                Ok(0) => return Err(self.end_of_stream()),
                Ok(read) => {
                    remaining -= read;
                    self.consumed += read as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(AfpError::Io(e)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn reads_count_consumed_bytes() {
        let mut cursor = ByteCursor::new(&[1u8, 2, 3, 4, 5, 6][..]);
        assert_eq!(cursor.read_u8().unwrap(), 1);
        assert_eq!(cursor.read_u16_be().unwrap(), 0x0203);
        cursor.skip(2).unwrap();
        assert_eq!(cursor.consumed(), 5);
        assert_eq!(cursor.read_exact(1).unwrap(), vec![6]);
        assert_eq!(cursor.consumed(), 6);
    }

    #[test]
    fn end_of_stream_is_terminal() {
        let mut cursor = ByteCursor::new(&[0xAAu8][..]);
        cursor.read_u8().unwrap();
        assert!(matches!(
            cursor.read_u8(),
            Err(AfpError::UnexpectedEof { offset: 1 })
        ));
        assert!(cursor.is_exhausted());
        // Exhaustion sticks for every kind of read.
        assert!(cursor.read_exact(3).is_err());
        assert!(cursor.skip(1).is_err());
    }

    #[test]
    fn zero_length_reads_succeed_after_exhaustion() {
        let mut cursor = ByteCursor::new(&[][..]);
        assert!(cursor.read_u8().is_err());
        assert!(cursor.read_exact(0).is_ok());
        assert!(cursor.skip(0).is_ok());
    }

    #[test]
    fn short_source_fails_exact_read() {
        let mut cursor = ByteCursor::new(&[1u8, 2][..]);
        assert!(matches!(
            cursor.read_exact(4),
            Err(AfpError::UnexpectedEof { offset: 2 })
        ));
    }

    /// Reader that yields `Interrupted` before every successful read.
    struct Flaky<'a> {
        data: &'a [u8],
        interrupt_next: bool,
    }

    impl Read for Flaky<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.interrupt_next {
                self.interrupt_next = false;
                return Err(io::Error::new(ErrorKind::Interrupted, "interrupted"));
            }
            self.interrupt_next = true;
            self.data.read(buf)
        }
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let mut cursor = ByteCursor::new(Flaky {
            data: &[0x5A, 0x01],
            interrupt_next: true,
        });
        assert_eq!(cursor.read_u8().unwrap(), 0x5A);
        assert_eq!(cursor.read_exact(1).unwrap(), vec![0x01]);
    }
}

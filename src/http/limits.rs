//! Request body limits.
//!
//! # Responsibilities
//! - Enforce maximum request body size while the decoder pulls bytes
//! - Remember whether the body carried anything besides JSON whitespace
//!
//! # Design Decisions
//! - The cap is checked on every read, so an oversized body is rejected
//!   without ever being buffered in full
//! - A body of exactly `limit` bytes is allowed; the reader probes one byte
//!   past the cap to tell "at the limit" from "over the limit"

use std::io::{self, Read};

/// A reader that limits the total number of bytes read and fails explicitly on overflow.
pub struct LimitReader<R> {
    inner: R,
    limit: u64,
    read: u64,
    exceeded: bool,
    saw_content: bool,
}

impl<R: Read> LimitReader<R> {
    pub fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            limit,
            read: 0,
            exceeded: false,
            saw_content: false,
        }
    }

    /// Bytes handed out so far.
    pub fn bytes_read(&self) -> u64 {
        self.read
    }

    /// Whether a read failed because the body went past the limit.
    pub fn exceeded(&self) -> bool {
        self.exceeded
    }

    /// Whether any non-whitespace byte has been read.
    pub fn saw_content(&self) -> bool {
        self.saw_content
    }

    fn overflow(&mut self) -> io::Error {
        self.exceeded = true;
        io::Error::other(format!("body exceeded limit of {} bytes", self.limit))
    }
}

impl<R: Read> Read for LimitReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.exceeded {
            return Err(self.overflow());
        }
        if buf.is_empty() {
            return Ok(0);
        }

        if self.read >= self.limit {
            let mut probe = [0u8; 1];
            return match self.inner.read(&mut probe)? {
                0 => Ok(0),
                _ => Err(self.overflow()),
            };
        }

        let max_to_read = (self.limit - self.read).min(buf.len() as u64) as usize;
        let n = self.inner.read(&mut buf[..max_to_read])?;
        self.read += n as u64;

        if !self.saw_content {
            self.saw_content = buf[..n].iter().any(|b| !is_json_whitespace(*b));
        }

        Ok(n)
    }
}

fn is_json_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

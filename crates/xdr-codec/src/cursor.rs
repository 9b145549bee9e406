//! Bounds-checked cursor over a caller-owned buffer.
//!
//! A [`Cursor`] is bound to exactly one buffer and one direction for its
//! whole life. It never grows the buffer: every access is checked against
//! the capacity declared at construction.

use std::fmt;

use crate::error::{Error, Result};

/// Direction a cursor moves data in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Native values are written into the buffer.
    Encode,
    /// Native values are read out of the buffer.
    Decode,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Encode => f.write_str("encode"),
            Mode::Decode => f.write_str("decode"),
        }
    }
}

enum Window<'a> {
    Writable(&'a mut [u8]),
    ReadOnly(&'a [u8]),
}

/// Position tracker bound to one buffer and one [`Mode`].
///
/// Invariant: `position <= capacity`. An operation that would overrun fails
/// without moving the position.
pub struct Cursor<'a> {
    window: Window<'a>,
    capacity: usize,
    position: usize,
    mode: Mode,
}

impl<'a> Cursor<'a> {
    /// Bind a cursor to the first `capacity` bytes of `buffer`.
    ///
    /// Fails with [`Error::InvalidArgument`] if `capacity` is zero or larger
    /// than the buffer.
    pub fn new(buffer: &'a mut [u8], capacity: usize, mode: Mode) -> Result<Self> {
        check_capacity(buffer.len(), capacity)?;
        Ok(Self::bind(Window::Writable(&mut buffer[..capacity]), capacity, mode))
    }

    /// Encode cursor spanning the whole buffer.
    pub fn encoder(buffer: &'a mut [u8]) -> Result<Self> {
        let capacity = buffer.len();
        Self::new(buffer, capacity, Mode::Encode)
    }

    /// Decode cursor spanning the whole buffer. Only needs a shared borrow.
    pub fn decoder(buffer: &'a [u8]) -> Result<Self> {
        let capacity = buffer.len();
        check_capacity(buffer.len(), capacity)?;
        Ok(Self::bind(Window::ReadOnly(buffer), capacity, Mode::Decode))
    }

    fn bind(window: Window<'a>, capacity: usize, mode: Mode) -> Self {
        tracing::trace!(%mode, capacity, "xdr cursor bound");
        Self {
            window,
            capacity,
            position: 0,
            mode,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes left before the capacity is reached.
    pub fn remaining(&self) -> usize {
        self.capacity - self.position
    }

    /// Reserve the next `n` bytes for writing and return them.
    pub fn write_bytes(&mut self, n: usize) -> Result<&mut [u8]> {
        match &mut self.window {
            Window::Writable(buf) if self.mode == Mode::Encode => {
                let start = advance(&mut self.position, self.capacity, self.mode, n)?;
                Ok(&mut buf[start..start + n])
            }
            _ => Err(Error::WrongMode {
                expected: Mode::Encode,
                actual: self.mode,
            }),
        }
    }

    /// Consume the next `n` bytes and return them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&[u8]> {
        if self.mode != Mode::Decode {
            return Err(Error::WrongMode {
                expected: Mode::Decode,
                actual: self.mode,
            });
        }
        let start = advance(&mut self.position, self.capacity, self.mode, n)?;
        let buf: &[u8] = match &self.window {
            Window::Writable(buf) => &buf[..],
            Window::ReadOnly(buf) => &buf[..],
        };
        Ok(&buf[start..start + n])
    }

    /// Release the cursor. Equivalent to dropping it.
    pub fn destroy(self) {}
}

impl Drop for Cursor<'_> {
    fn drop(&mut self) {
        tracing::trace!(mode = %self.mode, position = self.position, "xdr cursor released");
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("mode", &self.mode)
            .field("position", &self.position)
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// Move `position` forward by `n`, returning the start of the claimed range.
fn advance(position: &mut usize, capacity: usize, mode: Mode, n: usize) -> Result<usize> {
    let start = *position;
    match start.checked_add(n) {
        Some(end) if end <= capacity => {
            *position = end;
            Ok(start)
        }
        _ => {
            tracing::debug!(%mode, position = start, requested = n, capacity, "xdr buffer overrun");
            Err(Error::BufferOverrun {
                position: start,
                requested: n,
                capacity,
            })
        }
    }
}

fn check_capacity(len: usize, capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(Error::InvalidArgument("capacity must be non-zero".into()));
    }
    if len < capacity {
        return Err(Error::InvalidArgument(format!(
            "buffer of {} bytes is smaller than capacity {}",
            len, capacity
        )));
    }
    Ok(())
}

use crate::err::{DecodeError, Result};
use crate::utils::bytes;

/// A lightweight cursor over an immutable byte slice.
///
/// This is the slice/offset equivalent of `Cursor<&[u8]>`, used for decoding object pools where
/// the whole pool is already in memory and we want explicit bounds/offset control.
///
/// All reads are little-endian and advance the cursor on success. A read that would run past the
/// end of the slice fails with [`DecodeError::Truncated`] and leaves the cursor at the end, so a
/// caller that ignores the error can never read further.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    #[inline]
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub(crate) fn position(&self) -> u64 {
        self.pos as u64
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    #[inline]
    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Look at the byte `ahead` positions past the cursor without consuming anything.
    #[inline]
    pub(crate) fn peek_u8_at(&self, ahead: usize, what: &'static str) -> Result<u8> {
        let offset = self.pos.saturating_add(ahead);
        bytes::read_u8(self.buf, offset)
            .ok_or_else(|| bytes::truncated(what, offset, 1, self.buf.len()))
    }

    #[inline]
    fn exhaust<T>(&mut self, err: DecodeError) -> Result<T> {
        self.pos = self.buf.len();
        Err(err)
    }

    /// Ensure that at least `need` bytes remain, without consuming them.
    #[inline]
    pub(crate) fn require(&self, need: usize, what: &'static str) -> Result<()> {
        bytes::slice_r(self.buf, self.pos, need, what).map(|_| ())
    }

    #[inline]
    pub(crate) fn array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N]> {
        match bytes::read_array_r::<N>(self.buf, self.pos, what) {
            Ok(v) => {
                self.pos += N;
                Ok(v)
            }
            Err(e) => self.exhaust(e),
        }
    }

    #[inline]
    pub(crate) fn u8_named(&mut self, what: &'static str) -> Result<u8> {
        match bytes::read_u8(self.buf, self.pos) {
            Some(b) => {
                self.pos += 1;
                Ok(b)
            }
            None => {
                let err = bytes::truncated(what, self.pos, 1, self.buf.len());
                self.exhaust(err)
            }
        }
    }

    /// Reads a single byte as a boolean; any non-zero value is `true`.
    #[inline]
    pub(crate) fn bool_named(&mut self, what: &'static str) -> Result<bool> {
        Ok(self.u8_named(what)? != 0)
    }

    #[inline]
    pub(crate) fn u16_named(&mut self, what: &'static str) -> Result<u16> {
        match bytes::read_u16_le_r(self.buf, self.pos, what) {
            Ok(v) => {
                self.pos += 2;
                Ok(v)
            }
            Err(e) => self.exhaust(e),
        }
    }

    #[inline]
    pub(crate) fn i16_named(&mut self, what: &'static str) -> Result<i16> {
        match bytes::read_i16_le_r(self.buf, self.pos, what) {
            Ok(v) => {
                self.pos += 2;
                Ok(v)
            }
            Err(e) => self.exhaust(e),
        }
    }

    /// Read `count` fixed-width entries, after a single bounds check for the whole run.
    pub(crate) fn read_counted_vec<T>(
        &mut self,
        count: usize,
        elem_bytes: usize,
        what: &'static str,
        mut read_one: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let Some(total) = count.checked_mul(elem_bytes) else {
            let e = bytes::truncated(what, self.pos, usize::MAX, self.buf.len());
            return self.exhaust(e);
        };
        if let Err(e) = self.require(total, what) {
            return self.exhaust(e);
        }

        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(read_one(self)?);
        }
        Ok(out)
    }
}

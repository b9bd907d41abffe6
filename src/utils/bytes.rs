//! Byte-slice utilities for bounds-oriented parsing.
//!
//! There are two layers:
//! - **Option layer** (`read_*`): zero-cost helpers that return `Option<T>`.
//! - **Result layer** (`*_r`): wrappers that map `None` to `DecodeError::Truncated`.
//!
//! All multi-byte reads are **little-endian**; object pools are LE throughout.

use byteorder::{ByteOrder, LittleEndian};

use crate::err::DecodeError;

/// Read `N` raw bytes at `offset`.
///
/// Returns `None` if the range is out of bounds.
pub(crate) fn read_array<const N: usize>(buf: &[u8], offset: usize) -> Option<[u8; N]> {
    let end = offset.checked_add(N)?;
    let bytes: [u8; N] = buf.get(offset..end)?.try_into().ok()?;
    Some(bytes)
}

/// Read a single byte at `offset`.
pub(crate) fn read_u8(buf: &[u8], offset: usize) -> Option<u8> {
    buf.get(offset).copied()
}

/// Read a `u16` (little-endian) at `offset`.
pub(crate) fn read_u16_le(buf: &[u8], offset: usize) -> Option<u16> {
    Some(LittleEndian::read_u16(&read_array::<2>(buf, offset)?))
}

/// Read an `i16` (little-endian) at `offset`.
pub(crate) fn read_i16_le(buf: &[u8], offset: usize) -> Option<i16> {
    Some(LittleEndian::read_i16(&read_array::<2>(buf, offset)?))
}

#[inline]
pub(crate) fn truncated(what: &'static str, offset: usize, need: usize, len: usize) -> DecodeError {
    DecodeError::Truncated {
        what,
        offset: offset as u64,
        need,
        have: len.saturating_sub(offset),
    }
}

pub(crate) fn slice_r<'a>(
    buf: &'a [u8],
    offset: usize,
    len: usize,
    what: &'static str,
) -> Result<&'a [u8], DecodeError> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| truncated(what, offset, len, buf.len()))?;
    buf.get(offset..end)
        .ok_or_else(|| truncated(what, offset, len, buf.len()))
}

/// Read `N` raw bytes at `offset`, or return `DecodeError::Truncated`.
pub(crate) fn read_array_r<const N: usize>(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<[u8; N], DecodeError> {
    read_array::<N>(buf, offset).ok_or_else(|| truncated(what, offset, N, buf.len()))
}

/// Read a `u16` (little-endian) at `offset`, or return `DecodeError::Truncated`.
pub(crate) fn read_u16_le_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<u16, DecodeError> {
    read_u16_le(buf, offset).ok_or_else(|| truncated(what, offset, 2, buf.len()))
}

/// Read an `i16` (little-endian) at `offset`, or return `DecodeError::Truncated`.
pub(crate) fn read_i16_le_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<i16, DecodeError> {
    read_i16_le(buf, offset).ok_or_else(|| truncated(what, offset, 2, buf.len()))
}

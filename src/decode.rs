//! Typed item decoders.
//!
//! Each reader takes `(data, pos)` with `pos` at an item head and returns
//! the decoded value together with the offset one past the item. The major
//! type is checked first; a mismatch yields the corresponding `Expected*`
//! error without consuming input.
//!
//! Definite-length strings borrow the input; indefinite-length strings are
//! concatenated from their chunks into an owned buffer.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use crate::stream::CborStream;
use crate::walk::item_end;
use crate::{CborError, DecodeLimits, ErrorCode};

/// Reads an unsigned integer (major type 0).
///
/// # Errors
///
/// `ExpectedUnsigned` on any other major type; `UnexpectedEof` on truncation.
pub fn read_uint(data: &[u8], pos: usize) -> Result<(u64, usize), CborError> {
    let mut s = CborStream::new(data, pos);
    let ib = s.read_u8()?;
    if ib >> 5 != 0 {
        return Err(CborError::new(ErrorCode::ExpectedUnsigned, pos));
    }
    let v = s.read_uint_arg(ib & 0x1f, pos)?;
    Ok((v, s.position()))
}

/// Reads a signed integer (major type 0 or 1).
///
/// Major type 1 encodes `-1 - n`; either direction fails with
/// `NumberOutOfRange` when the value does not fit an `i64`.
///
/// # Errors
///
/// `ExpectedInteger` on any other major type.
pub fn read_int(data: &[u8], pos: usize) -> Result<(i64, usize), CborError> {
    let mut s = CborStream::new(data, pos);
    let ib = s.read_u8()?;
    let n = match ib >> 5 {
        0 | 1 => s.read_uint_arg(ib & 0x1f, pos)?,
        _ => return Err(CborError::new(ErrorCode::ExpectedInteger, pos)),
    };
    let n = i64::try_from(n).map_err(|_| CborError::new(ErrorCode::NumberOutOfRange, pos))?;
    let v = if ib >> 5 == 1 { -1 - n } else { n };
    Ok((v, s.position()))
}

/// Reads a floating-point value (major type 7, additional info 25/26/27).
///
/// Half- and single-precision encodings are widened to `f64`.
///
/// # Errors
///
/// `ExpectedFloat` on any other head, including non-float simple values.
pub fn read_double(data: &[u8], pos: usize) -> Result<(f64, usize), CborError> {
    let mut s = CborStream::new(data, pos);
    let ib = s.read_u8()?;
    if ib >> 5 != 7 {
        return Err(CborError::new(ErrorCode::ExpectedFloat, pos));
    }
    let v = match ib & 0x1f {
        25 => s.read_be_f16()?,
        26 => f64::from(s.read_be_f32()?),
        27 => s.read_be_f64()?,
        _ => return Err(CborError::new(ErrorCode::ExpectedFloat, pos)),
    };
    Ok((v, s.position()))
}

/// Reads a text string (major type 3).
///
/// A definite-length string borrows the input; an indefinite-length string
/// concatenates its chunks. Every chunk must itself be valid UTF-8.
///
/// # Errors
///
/// `ExpectedText` on any other major type, `Utf8Invalid` on malformed text,
/// `InvalidChunk` when an indefinite string contains a non-text or nested
/// indefinite chunk.
pub fn read_text(data: &[u8], pos: usize) -> Result<(Cow<'_, str>, usize), CborError> {
    let mut s = CborStream::new(data, pos);
    let ib = s.read_u8()?;
    if ib >> 5 != 3 {
        return Err(CborError::new(ErrorCode::ExpectedText, pos));
    }
    if ib & 0x1f != 31 {
        let len = s.read_len(ib & 0x1f, pos)?;
        let payload_off = s.position();
        let bytes = s.read_exact(len)?;
        let text = crate::utf8::validate(bytes)
            .map_err(|()| CborError::new(ErrorCode::Utf8Invalid, payload_off))?;
        return Ok((Cow::Borrowed(text), s.position()));
    }

    let mut out = String::new();
    while let Some(bytes) = next_chunk(&mut s, 3)? {
        let chunk_off = s.position() - bytes.len();
        let text = crate::utf8::validate(bytes)
            .map_err(|()| CborError::new(ErrorCode::Utf8Invalid, chunk_off))?;
        out.push_str(text);
    }
    Ok((Cow::Owned(out), s.position()))
}

/// Reads a byte string (major type 2).
///
/// A definite-length string borrows the input; an indefinite-length string
/// concatenates its chunks.
///
/// # Errors
///
/// `ExpectedBytes` on any other major type, `InvalidChunk` for malformed
/// chunked encodings.
pub fn read_bytes(data: &[u8], pos: usize) -> Result<(Cow<'_, [u8]>, usize), CborError> {
    let mut s = CborStream::new(data, pos);
    let ib = s.read_u8()?;
    if ib >> 5 != 2 {
        return Err(CborError::new(ErrorCode::ExpectedBytes, pos));
    }
    if ib & 0x1f != 31 {
        let len = s.read_len(ib & 0x1f, pos)?;
        let bytes = s.read_exact(len)?;
        return Ok((Cow::Borrowed(bytes), s.position()));
    }

    let mut out = Vec::new();
    while let Some(bytes) = next_chunk(&mut s, 2)? {
        out.extend_from_slice(bytes);
    }
    Ok((Cow::Owned(out), s.position()))
}

/// Reads an array head (major type 4) and returns `(count, items_start)`.
///
/// For a definite-length array the count comes from the head. For an
/// indefinite-length array the whole container is walked to count its
/// elements. Either way the returned offset addresses the array's first
/// element, which is what makes indefinite containers iterable downstream:
/// callers step from `items_start` exactly `count` times.
///
/// # Errors
///
/// `ExpectedArray` on any other major type, plus any walker error while
/// counting an indefinite array.
pub fn read_array_len(
    data: &[u8],
    pos: usize,
    limits: DecodeLimits,
) -> Result<(usize, usize), CborError> {
    let mut s = CborStream::new(data, pos);
    let ib = s.read_u8()?;
    if ib >> 5 != 4 {
        return Err(CborError::new(ErrorCode::ExpectedArray, pos));
    }
    if ib & 0x1f != 31 {
        let len = s.read_len(ib & 0x1f, pos)?;
        return Ok((len, s.position()));
    }

    let items_start = s.position();
    let mut p = items_start;
    let mut count = 0usize;
    loop {
        match data.get(p) {
            None => return Err(CborError::new(ErrorCode::UnexpectedEof, p)),
            Some(0xff) => return Ok((count, items_start)),
            Some(_) => {
                p = item_end(data, p, limits)?;
                count += 1;
            }
        }
    }
}

/// Reads a map head (major type 5) and returns `(pair_count, entries_start)`.
///
/// Same post-condition as [`read_array_len`]: the returned offset addresses
/// the first key, and indefinite-length maps are counted by walking their
/// entries. A key without a value is `SourceError`.
///
/// # Errors
///
/// `ExpectedMap` on any other major type, plus any walker error while
/// counting an indefinite map.
pub fn read_map_len(
    data: &[u8],
    pos: usize,
    limits: DecodeLimits,
) -> Result<(usize, usize), CborError> {
    let mut s = CborStream::new(data, pos);
    let ib = s.read_u8()?;
    if ib >> 5 != 5 {
        return Err(CborError::new(ErrorCode::ExpectedMap, pos));
    }
    if ib & 0x1f != 31 {
        let len = s.read_len(ib & 0x1f, pos)?;
        return Ok((len, s.position()));
    }

    let entries_start = s.position();
    let mut p = entries_start;
    let mut count = 0usize;
    loop {
        match data.get(p) {
            None => return Err(CborError::new(ErrorCode::UnexpectedEof, p)),
            Some(0xff) => return Ok((count, entries_start)),
            Some(_) => {
                p = item_end(data, p, limits)?;
                match data.get(p) {
                    None => return Err(CborError::new(ErrorCode::UnexpectedEof, p)),
                    Some(0xff) => return Err(CborError::new(ErrorCode::SourceError, p)),
                    Some(_) => p = item_end(data, p, limits)?,
                }
                count += 1;
            }
        }
    }
}

/// Consumes the next chunk of an indefinite-length string, or the break
/// byte terminating it (returning `None`).
fn next_chunk<'a>(s: &mut CborStream<'a>, major: u8) -> Result<Option<&'a [u8]>, CborError> {
    let off = s.position();
    let ib = s.read_u8()?;
    if ib == 0xff {
        return Ok(None);
    }
    if ib >> 5 != major || ib & 0x1f == 31 {
        return Err(CborError::new(ErrorCode::InvalidChunk, off));
    }
    let len = s.read_len(ib & 0x1f, off)?;
    Ok(Some(s.read_exact(len)?))
}

//! Decimal-fraction synthesis (tag 4).
//!
//! A decimal fraction is a tag-4 item wrapping a two-element array
//! `[exponent, mantissa]` with the value `mantissa * 10^exponent`. Rather
//! than losing precision in a float, the decoder renders it to a decimal
//! string: `[-2, 27315]` becomes `"273.15"`.

use alloc::string::{String, ToString};

use num_bigint::{BigInt, Sign};

use crate::decode::{read_bytes, read_int, read_uint};
use crate::stream::CborStream;
use crate::{CborError, ErrorCode};

/// Decodes the `[exponent, mantissa]` array of a decimal fraction into its
/// decimal string rendering.
///
/// `pos` addresses the item following the tag-4 head, which must be a
/// definite-length array of exactly two elements. The exponent is an
/// integer (major type 0 or 1); the mantissa is an integer or a tag-2 /
/// tag-3 bignum. Returns the rendered string and the offset one past the
/// array.
///
/// # Errors
///
/// `InvalidDecimal` when the item does not have the shape above;
/// `NumberOutOfRange` when the exponent or an integer mantissa exceeds
/// `i64`.
pub fn decimal_to_string(data: &[u8], pos: usize) -> Result<(String, usize), CborError> {
    let mut s = CborStream::new(data, pos);
    let ib = s.read_u8()?;
    if ib >> 5 != 4 || ib & 0x1f == 31 {
        return Err(CborError::new(ErrorCode::InvalidDecimal, pos));
    }
    if s.read_len(ib & 0x1f, pos)? != 2 {
        return Err(CborError::new(ErrorCode::InvalidDecimal, pos));
    }

    let exp_off = s.position();
    match data.get(exp_off).map(|b| b >> 5) {
        Some(0 | 1) => {}
        _ => return Err(CborError::new(ErrorCode::InvalidDecimal, exp_off)),
    }
    let (exponent, mantissa_off) = read_int(data, exp_off)?;

    let (mut out, end) = render_mantissa(data, mantissa_off)?;
    apply_exponent(&mut out, exponent);
    Ok((out, end))
}

/// Renders the mantissa item into its decimal digits (with a leading `-`
/// when negative) and returns the offset past it.
fn render_mantissa(data: &[u8], pos: usize) -> Result<(String, usize), CborError> {
    let ib = *data
        .get(pos)
        .ok_or_else(|| CborError::new(ErrorCode::UnexpectedEof, pos))?;

    match ib >> 5 {
        0 => {
            let (v, end) = read_uint(data, pos)?;
            Ok((v.to_string(), end))
        }
        1 => {
            let (v, end) = read_int(data, pos)?;
            Ok((v.to_string(), end))
        }
        6 => {
            let mut s = CborStream::new(data, pos);
            let head = s.read_u8()?;
            let tag = s.read_uint_arg(head & 0x1f, pos)?;
            let negative = match tag {
                2 => false,
                3 => true,
                _ => return Err(CborError::new(ErrorCode::InvalidDecimal, pos)),
            };
            let mag_off = s.position();
            if data.get(mag_off).map(|b| b >> 5) != Some(2) {
                return Err(CborError::new(ErrorCode::InvalidDecimal, mag_off));
            }
            let (mag, end) = read_bytes(data, mag_off)?;
            let mut n = BigInt::from_bytes_be(Sign::Plus, &mag);
            if negative {
                n = -(n + 1u32);
            }
            Ok((n.to_string(), end))
        }
        _ => Err(CborError::new(ErrorCode::InvalidDecimal, pos)),
    }
}

/// Scales the rendered digits by `10^exponent` in place.
fn apply_exponent(s: &mut String, exponent: i64) {
    if exponent == 0 {
        s.push_str(".0");
        return;
    }
    if exponent > 0 {
        s.push('e');
        s.push_str(&exponent.to_string());
        return;
    }

    let neg = usize::from(s.starts_with('-'));
    let digits = (s.len() - neg) as i128;
    let k = digits + i128::from(exponent);
    if k > 0 {
        // 27315 * 10^-2 => 273.15
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        s.insert(neg + k as usize, '.');
    } else if k == 0 {
        // 27315 * 10^-5 => 0.27315
        s.insert_str(neg, "0.");
    } else {
        // 27315 * 10^-7 => 0.27315e-2
        s.insert_str(neg, "0.");
        s.push_str("e-");
        s.push_str(&(-k).to_string());
    }
}

use crate::{CborError, ErrorCode};

/// A bounded cursor over the input bytes.
///
/// All multi-byte reads are big-endian, per RFC 8949. Reads that run past
/// the end of the buffer fail with `UnexpectedEof` and leave the position
/// unchanged.
#[derive(Clone, Copy)]
pub struct CborStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> CborStream<'a> {
    pub const fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub const fn position(&self) -> usize {
        self.pos
    }

    pub fn read_u8(&mut self) -> Result<u8, CborError> {
        let off = self.pos;
        let b = *self
            .data
            .get(self.pos)
            .ok_or_else(|| CborError::new(ErrorCode::UnexpectedEof, off))?;
        self.pos += 1;
        Ok(b)
    }

    /// Returns the byte at the cursor without advancing.
    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8], CborError> {
        let off = self.pos;
        let end = self
            .pos
            .checked_add(n)
            .ok_or_else(|| CborError::new(ErrorCode::LengthOverflow, off))?;
        if end > self.data.len() {
            return Err(CborError::new(ErrorCode::UnexpectedEof, off));
        }
        let s = &self.data[self.pos..end];
        self.pos = end;
        Ok(s)
    }

    pub fn read_be_u16(&mut self) -> Result<u16, CborError> {
        let s = self.read_exact(2)?;
        Ok(u16::from_be_bytes([s[0], s[1]]))
    }

    pub fn read_be_u32(&mut self) -> Result<u32, CborError> {
        let s = self.read_exact(4)?;
        Ok(u32::from_be_bytes([s[0], s[1], s[2], s[3]]))
    }

    pub fn read_be_u64(&mut self) -> Result<u64, CborError> {
        let s = self.read_exact(8)?;
        Ok(u64::from_be_bytes([
            s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7],
        ]))
    }

    /// Reads a big-endian IEEE-754 half-precision float, widened to `f64`.
    ///
    /// Subnormals, infinities, and NaN all widen faithfully.
    pub fn read_be_f16(&mut self) -> Result<f64, CborError> {
        let bits = self.read_be_u16()?;
        Ok(half::f16::from_bits(bits).into())
    }

    pub fn read_be_f32(&mut self) -> Result<f32, CborError> {
        let bits = self.read_be_u32()?;
        Ok(f32::from_bits(bits))
    }

    pub fn read_be_f64(&mut self) -> Result<f64, CborError> {
        let bits = self.read_be_u64()?;
        Ok(f64::from_bits(bits))
    }

    /// Decodes the unsigned argument selected by the additional-info bits
    /// of the head at `off`.
    ///
    /// Values 0..=23 are immediate; 24/25/26/27 read a 1/2/4/8-byte
    /// big-endian payload. Any encoding of the argument is accepted; this
    /// decoder does not insist on shortest form. 28..=30 are reserved and
    /// 31 (indefinite) is never a numeric argument.
    pub fn read_uint_arg(&mut self, ai: u8, off: usize) -> Result<u64, CborError> {
        match ai {
            0..=23 => Ok(u64::from(ai)),
            24 => Ok(u64::from(self.read_u8()?)),
            25 => Ok(u64::from(self.read_be_u16()?)),
            26 => Ok(u64::from(self.read_be_u32()?)),
            27 => Ok(self.read_be_u64()?),
            28..=30 => Err(CborError::new(ErrorCode::ReservedAdditionalInfo, off)),
            _ => Err(CborError::new(ErrorCode::SourceError, off)),
        }
    }

    /// Reads a definite length argument as `usize`.
    ///
    /// The caller handles indefinite encodings (ai 31) before calling this.
    pub fn read_len(&mut self, ai: u8, off: usize) -> Result<usize, CborError> {
        let len = self.read_uint_arg(ai, off)?;
        usize::try_from(len).map_err(|_| CborError::new(ErrorCode::LengthOverflow, off))
    }
}

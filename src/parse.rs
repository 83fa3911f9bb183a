//! The event parser.
//!
//! [`EventParser`] drives an [`EventSink`] through a pre-order walk of one
//! CBOR item per [`parse_some`](EventParser::parse_some) call. Containers
//! are bracketed by begin/end events; recognized semantic tags (0, 1, 2,
//! 3, 4) fold into the tagged item's event as a [`TagKind`] annotation or,
//! for decimal fractions, divert to the decimal renderer. Nesting is
//! tracked with an explicit frame stack bounded by
//! [`DecodeLimits::max_depth`].

use alloc::vec::Vec;

use crate::decimal::decimal_to_string;
use crate::decode::{read_bytes, read_double, read_int, read_text, read_uint};
use crate::handler::{EventSink, Position, TagKind};
use crate::stream::CborStream;
use crate::{CborError, DecodeLimits, ErrorCode};

#[derive(Clone, Copy)]
enum Frame {
    /// `remaining` is `None` for indefinite-length arrays.
    Array { remaining: Option<usize> },
    /// `remaining` counts pairs; `expecting_key` is true between a value
    /// and the next key.
    Map {
        remaining: Option<usize>,
        expecting_key: bool,
    },
}

/// A push parser that decodes one CBOR item at a time into an event sink.
///
/// The parser borrows the input buffer and owns its sink. A buffer is
/// installed with [`update`](Self::update); each
/// [`parse_some`](Self::parse_some) call then consumes exactly one
/// top-level item.
pub struct EventParser<'a, S> {
    data: &'a [u8],
    pos: usize,
    limits: DecodeLimits,
    sink: S,
}

impl<'a, S: EventSink> EventParser<'a, S> {
    /// Creates a parser over an empty buffer with default limits.
    pub fn new(sink: S) -> Self {
        Self::with_limits(sink, DecodeLimits::default())
    }

    /// Creates a parser over an empty buffer with explicit limits.
    pub const fn with_limits(sink: S, limits: DecodeLimits) -> Self {
        Self {
            data: &[],
            pos: 0,
            limits,
            sink,
        }
    }

    /// Installs a new input buffer and resets the cursor.
    pub fn update(&mut self, data: &'a [u8]) {
        self.data = data;
        self.pos = 0;
    }

    /// Rewinds the cursor to the start of the current buffer.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// The current byte offset into the input.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Whether the cursor has consumed the whole buffer.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Borrows the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the parser, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Parses exactly one top-level item, driving the sink, then flushes.
    ///
    /// On error the parse stops immediately; events already emitted remain
    /// emitted and the cursor position is unspecified. The parser does not
    /// resynchronize after a malformed item.
    ///
    /// # Errors
    ///
    /// Any `CborError` raised while decoding the item.
    pub fn parse_some(&mut self) -> Result<(), CborError> {
        let mut stack: Vec<Frame> = Vec::new();

        loop {
            if let Some(&frame) = stack.last() {
                if self.frame_done(frame)? {
                    let pos = self.event_pos(self.pos);
                    match stack.pop() {
                        Some(Frame::Array { .. }) => self.sink.end_array(pos),
                        Some(Frame::Map { .. }) => self.sink.end_map(pos),
                        None => unreachable!(),
                    }
                    if stack.is_empty() {
                        break;
                    }
                    continue;
                }
            }

            if let Some(Frame::Map { expecting_key, .. }) = stack.last_mut() {
                if *expecting_key {
                    *expecting_key = false;
                    self.parse_name()?;
                    continue;
                }
            }

            // The upcoming child is accounted to its parent up front, so a
            // closing frame never has to reach back down the stack.
            if let Some(frame) = stack.last_mut() {
                match frame {
                    Frame::Array { remaining } => {
                        if let Some(n) = remaining {
                            *n -= 1;
                        }
                    }
                    Frame::Map {
                        remaining,
                        expecting_key,
                    } => {
                        if let Some(n) = remaining {
                            *n -= 1;
                        }
                        *expecting_key = true;
                    }
                }
            }

            self.parse_item(&mut stack)?;
            if stack.is_empty() {
                break;
            }
        }

        self.sink.flush();
        Ok(())
    }

    /// Parses one item and then requires the buffer to be fully consumed.
    ///
    /// # Errors
    ///
    /// `TrailingBytes` when input remains after the item, plus any
    /// [`parse_some`](Self::parse_some) error.
    pub fn parse_to_end(&mut self) -> Result<(), CborError> {
        self.parse_some()?;
        if !self.is_done() {
            return Err(CborError::new(ErrorCode::TrailingBytes, self.pos));
        }
        Ok(())
    }

    /// Whether the top frame has consumed all of its children. Consumes
    /// the break byte of a finished indefinite container.
    fn frame_done(&mut self, frame: Frame) -> Result<bool, CborError> {
        let (remaining, expecting_key) = match frame {
            Frame::Array { remaining } => (remaining, true),
            Frame::Map {
                remaining,
                expecting_key,
            } => (remaining, expecting_key),
        };

        match remaining {
            Some(n) => Ok(n == 0 && expecting_key),
            None => {
                if self.peek_byte()? != 0xff {
                    return Ok(false);
                }
                if !expecting_key {
                    // Break between a key and its value.
                    return Err(CborError::new(ErrorCode::SourceError, self.pos));
                }
                self.pos += 1;
                Ok(true)
            }
        }
    }

    /// The restricted key parse: map keys must be text strings.
    fn parse_name(&mut self) -> Result<(), CborError> {
        let off = self.pos;
        if self.peek_byte()? >> 5 != 3 {
            return Err(CborError::new(ErrorCode::MapKeyMustBeText, off));
        }
        let (text, end) = read_text(self.data, off)?;
        self.sink.name(&text, self.event_pos(off));
        self.pos = end;
        Ok(())
    }

    /// Parses one item head (with any stacked tags) and emits its event,
    /// pushing a frame when the item is a container.
    fn parse_item(&mut self, stack: &mut Vec<Frame>) -> Result<(), CborError> {
        let item_off = self.pos;

        // Consume stacked tag heads; the innermost one decides the
        // annotation, everything unrecognized is stripped.
        let mut tag: Option<u64> = None;
        while self.peek_byte()? >> 5 == 6 {
            let off = self.pos;
            let mut s = CborStream::new(self.data, self.pos);
            let ib = s.read_u8()?;
            tag = Some(s.read_uint_arg(ib & 0x1f, off)?);
            self.pos = s.position();
        }

        if tag == Some(4) {
            let (text, end) = decimal_to_string(self.data, self.pos)?;
            self.sink
                .string_value(&text, TagKind::Decimal, self.event_pos(item_off));
            self.pos = end;
            return Ok(());
        }

        let off = self.pos;
        let ib = self.peek_byte()?;
        if ib == 0xff {
            // Break outside an indefinite-length container.
            return Err(CborError::new(ErrorCode::SourceError, off));
        }
        let pos = self.event_pos(item_off);

        match ib >> 5 {
            0 => {
                let (v, end) = read_uint(self.data, off)?;
                self.sink.uint64_value(v, epoch_kind(tag), pos);
                self.pos = end;
            }
            1 => {
                let (v, end) = read_int(self.data, off)?;
                self.sink.int64_value(v, epoch_kind(tag), pos);
                self.pos = end;
            }
            2 => {
                let (bytes, end) = read_bytes(self.data, off)?;
                match tag {
                    Some(2) => self.sink.bignum_value(false, &bytes, pos),
                    Some(3) => self.sink.bignum_value(true, &bytes, pos),
                    _ => self.sink.byte_string_value(&bytes, TagKind::None, pos),
                }
                self.pos = end;
            }
            3 => {
                let (text, end) = read_text(self.data, off)?;
                let kind = if tag == Some(0) {
                    TagKind::DateTime
                } else {
                    TagKind::None
                };
                self.sink.string_value(&text, kind, pos);
                self.pos = end;
            }
            4 => {
                let len = self.container_len(ib, off)?;
                self.ensure_depth(stack, off)?;
                self.sink.begin_array(len, pos);
                stack.push(Frame::Array { remaining: len });
            }
            5 => {
                let len = self.container_len(ib, off)?;
                self.ensure_depth(stack, off)?;
                self.sink.begin_map(len, pos);
                stack.push(Frame::Map {
                    remaining: len,
                    expecting_key: true,
                });
            }
            6 => unreachable!("tags consumed above"),
            7 => match ib & 0x1f {
                20 => {
                    self.sink.bool_value(false, pos);
                    self.pos = off + 1;
                }
                21 => {
                    self.sink.bool_value(true, pos);
                    self.pos = off + 1;
                }
                22 => {
                    self.sink.null_value(pos);
                    self.pos = off + 1;
                }
                25..=27 => {
                    let (v, end) = read_double(self.data, off)?;
                    self.sink.double_value(v, epoch_kind(tag), pos);
                    self.pos = end;
                }
                28..=30 => {
                    return Err(CborError::new(ErrorCode::ReservedAdditionalInfo, off));
                }
                _ => {
                    return Err(CborError::new(ErrorCode::UnsupportedSimpleValue, off));
                }
            },
            _ => unreachable!("major out of range"),
        }
        Ok(())
    }

    /// Reads a container length argument, consuming the head: `None` for
    /// indefinite encodings.
    fn container_len(&mut self, ib: u8, off: usize) -> Result<Option<usize>, CborError> {
        let mut s = CborStream::new(self.data, self.pos);
        s.read_u8()?;
        let len = if ib & 0x1f == 31 {
            None
        } else {
            Some(s.read_len(ib & 0x1f, off)?)
        };
        self.pos = s.position();
        Ok(len)
    }

    fn ensure_depth(&self, stack: &[Frame], off: usize) -> Result<(), CborError> {
        if stack.len() >= self.limits.max_depth {
            return Err(CborError::new(ErrorCode::DepthLimitExceeded, off));
        }
        Ok(())
    }

    fn peek_byte(&self) -> Result<u8, CborError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| CborError::new(ErrorCode::UnexpectedEof, self.pos))
    }

    /// Binary input has no lines: line 1, column = byte offset + 1.
    const fn event_pos(&self, off: usize) -> Position {
        Position {
            line: 1,
            column: off + 1,
        }
    }
}

const fn epoch_kind(tag: Option<u64>) -> TagKind {
    match tag {
        Some(1) => TagKind::EpochTime,
        _ => TagKind::None,
    }
}

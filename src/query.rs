//! Zero-copy cursors over a CBOR document.
//!
//! This layer navigates a buffer in place, without producing events and
//! without decoding items eagerly. [`ItemRef`] is a borrowed view of one
//! item; [`ArrayRef`] and [`MapRef`] iterate containers by stepping the
//! walker over siblings. Nothing is copied while navigating; payload bytes
//! are materialized only by the typed accessors.

use alloc::borrow::Cow;

use crate::decode::{
    read_array_len, read_bytes, read_double, read_int, read_map_len, read_text, read_uint,
};
use crate::stream::CborStream;
use crate::walk::item_end;
use crate::{CborError, DecodeLimits, ErrorCode};

/// The kind of a CBOR item as seen by cursors, before any tag stripping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CborKind {
    /// Major type 0.
    Unsigned,
    /// Major type 1.
    Negative,
    /// Major type 2.
    Bytes,
    /// Major type 3.
    Text,
    /// Major type 4.
    Array,
    /// Major type 5.
    Map,
    /// Major type 6; see [`ItemRef::untag`].
    Tag,
    /// Simple value true/false.
    Bool,
    /// Simple value null.
    Null,
    /// Major type 7, additional info 25/26/27.
    Float,
}

/// A borrowed view of one CBOR item.
///
/// The view carries the full document bytes plus a `(start, end)` range, so
/// nested views returned from navigation keep borrowing the original
/// buffer; the lifetime of every view is bounded by the document.
#[derive(Debug, Clone, Copy)]
pub struct ItemRef<'a> {
    data: &'a [u8],
    start: usize,
    end: usize,
    limits: DecodeLimits,
}

impl<'a> ItemRef<'a> {
    /// Walks the item whose head is at `pos` and returns a view of it.
    ///
    /// # Errors
    ///
    /// Any walker error for a truncated or malformed item.
    pub fn parse(data: &'a [u8], pos: usize, limits: DecodeLimits) -> Result<Self, CborError> {
        let end = item_end(data, pos, limits)?;
        Ok(Self {
            data,
            start: pos,
            end,
            limits,
        })
    }

    /// Returns the raw encoded bytes of this item.
    #[must_use]
    pub fn as_bytes(self) -> &'a [u8] {
        &self.data[self.start..self.end]
    }

    /// Returns the starting offset of this item within the document.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.start
    }

    /// Returns the byte length of this item's encoding.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    /// Returns whether the encoding is empty (never true for a parsed item).
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start >= self.end
    }

    /// Returns the kind of this item.
    ///
    /// # Errors
    ///
    /// `UnsupportedSimpleValue` for simple values this decoder rejects.
    pub fn kind(self) -> Result<CborKind, CborError> {
        let ib = *self
            .data
            .get(self.start)
            .ok_or_else(|| CborError::new(ErrorCode::UnexpectedEof, self.start))?;
        match ib >> 5 {
            0 => Ok(CborKind::Unsigned),
            1 => Ok(CborKind::Negative),
            2 => Ok(CborKind::Bytes),
            3 => Ok(CborKind::Text),
            4 => Ok(CborKind::Array),
            5 => Ok(CborKind::Map),
            6 => Ok(CborKind::Tag),
            _ => match ib & 0x1f {
                20 | 21 => Ok(CborKind::Bool),
                22 => Ok(CborKind::Null),
                25..=27 => Ok(CborKind::Float),
                28..=30 => Err(CborError::new(
                    ErrorCode::ReservedAdditionalInfo,
                    self.start,
                )),
                _ => Err(CborError::new(
                    ErrorCode::UnsupportedSimpleValue,
                    self.start,
                )),
            },
        }
    }

    /// Steps past any tag heads, returning a view of the innermost tagged
    /// item. A view that is not a tag is returned unchanged.
    ///
    /// # Errors
    ///
    /// Any error raised while reading a tag head.
    pub fn untag(self) -> Result<Self, CborError> {
        let mut s = CborStream::new(self.data, self.start);
        loop {
            let off = s.position();
            match s.peek_u8() {
                Some(ib) if ib >> 5 == 6 => {
                    s.read_u8()?;
                    s.read_uint_arg(ib & 0x1f, off)?;
                }
                _ => {
                    return Ok(Self {
                        data: self.data,
                        start: off,
                        end: self.end,
                        limits: self.limits,
                    })
                }
            }
        }
    }

    /// Decodes this item as an unsigned integer.
    ///
    /// # Errors
    ///
    /// `ExpectedUnsigned` when the item is not major type 0.
    pub fn uint(self) -> Result<u64, CborError> {
        read_uint(self.data, self.start).map(|(v, _)| v)
    }

    /// Decodes this item as a signed integer (major type 0 or 1).
    ///
    /// # Errors
    ///
    /// `ExpectedInteger` on other kinds, `NumberOutOfRange` past `i64`.
    pub fn int(self) -> Result<i64, CborError> {
        read_int(self.data, self.start).map(|(v, _)| v)
    }

    /// Decodes this item as a float, widening half and single precision.
    ///
    /// # Errors
    ///
    /// `ExpectedFloat` when the item is not a float.
    pub fn double(self) -> Result<f64, CborError> {
        read_double(self.data, self.start).map(|(v, _)| v)
    }

    /// Decodes this item as a text string.
    ///
    /// # Errors
    ///
    /// `ExpectedText` on other kinds, `Utf8Invalid` on malformed text.
    pub fn text(self) -> Result<Cow<'a, str>, CborError> {
        read_text(self.data, self.start).map(|(v, _)| v)
    }

    /// Decodes this item as a byte string.
    ///
    /// # Errors
    ///
    /// `ExpectedBytes` when the item is not a byte string.
    pub fn bytes(self) -> Result<Cow<'a, [u8]>, CborError> {
        read_bytes(self.data, self.start).map(|(v, _)| v)
    }

    /// Decodes this item as a boolean.
    ///
    /// # Errors
    ///
    /// `ExpectedBool` when the item is not true or false.
    pub fn bool(self) -> Result<bool, CborError> {
        match self.data.get(self.start) {
            Some(0xf4) => Ok(false),
            Some(0xf5) => Ok(true),
            _ => Err(CborError::new(ErrorCode::ExpectedBool, self.start)),
        }
    }

    /// Returns `true` if this item is CBOR `null`.
    #[must_use]
    pub fn is_null(self) -> bool {
        self.data.get(self.start) == Some(&0xf6)
    }

    /// Interprets this item as an array and returns a borrowed array view.
    ///
    /// Indefinite-length arrays are counted up front by walking them.
    ///
    /// # Errors
    ///
    /// `ExpectedArray` when the item is not an array.
    pub fn array(self) -> Result<ArrayRef<'a>, CborError> {
        let (len, items_start) = read_array_len(self.data, self.start, self.limits)?;
        Ok(ArrayRef {
            data: self.data,
            items_start,
            len,
            limits: self.limits,
        })
    }

    /// Interprets this item as a map and returns a borrowed map view.
    ///
    /// Indefinite-length maps are counted up front by walking them.
    ///
    /// # Errors
    ///
    /// `ExpectedMap` when the item is not a map.
    pub fn map(self) -> Result<MapRef<'a>, CborError> {
        let (len, entries_start) = read_map_len(self.data, self.start, self.limits)?;
        Ok(MapRef {
            data: self.data,
            entries_start,
            len,
            limits: self.limits,
        })
    }
}

impl PartialEq for ItemRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ItemRef<'_> {}

/// A borrowed view into a CBOR array.
#[derive(Debug, Clone, Copy)]
pub struct ArrayRef<'a> {
    data: &'a [u8],
    items_start: usize,
    len: usize,
    limits: DecodeLimits,
}

impl<'a> ArrayRef<'a> {
    /// Returns the number of items in the array.
    #[must_use]
    pub const fn len(self) -> usize {
        self.len
    }

    /// Returns whether the array is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Returns the array item at `index`, or `None` if out of bounds.
    ///
    /// Access is sequential: the walker steps over the preceding siblings.
    ///
    /// # Errors
    ///
    /// Any walker error for malformed elements.
    pub fn get(self, index: usize) -> Result<Option<ItemRef<'a>>, CborError> {
        if index >= self.len {
            return Ok(None);
        }
        let mut pos = self.items_start;
        for _ in 0..index {
            pos = item_end(self.data, pos, self.limits)?;
        }
        ItemRef::parse(self.data, pos, self.limits).map(Some)
    }

    /// Iterates over array items in order.
    ///
    /// The iterator yields `Result` so malformed elements surface mid-walk.
    #[must_use]
    pub const fn iter(self) -> ArrayIter<'a> {
        ArrayIter {
            data: self.data,
            pos: self.items_start,
            remaining: self.len,
            limits: self.limits,
        }
    }
}

impl<'a> IntoIterator for ArrayRef<'a> {
    type Item = Result<ItemRef<'a>, CborError>;
    type IntoIter = ArrayIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A forward iterator over array elements.
///
/// Cheap to clone; each step invokes the walker once.
#[derive(Debug, Clone)]
pub struct ArrayIter<'a> {
    data: &'a [u8],
    pos: usize,
    remaining: usize,
    limits: DecodeLimits,
}

impl<'a> Iterator for ArrayIter<'a> {
    type Item = Result<ItemRef<'a>, CborError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match ItemRef::parse(self.data, self.pos, self.limits) {
            Ok(item) => {
                self.pos = item.end;
                self.remaining -= 1;
                Some(Ok(item))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// A borrowed view into a CBOR map.
#[derive(Debug, Clone, Copy)]
pub struct MapRef<'a> {
    data: &'a [u8],
    entries_start: usize,
    len: usize,
    limits: DecodeLimits,
}

impl<'a> MapRef<'a> {
    /// Returns the number of entries in the map.
    #[must_use]
    pub const fn len(self) -> usize {
        self.len
    }

    /// Returns whether the map is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Looks up a text key, scanning entries in document order.
    ///
    /// Entries whose key is not a text string are skipped; the first match
    /// wins.
    ///
    /// # Errors
    ///
    /// Any walker or decode error for malformed entries.
    pub fn get(self, key: &str) -> Result<Option<ItemRef<'a>>, CborError> {
        for entry in self.iter() {
            let entry = entry?;
            if entry.key_item().kind()? != CborKind::Text {
                continue;
            }
            if entry.key()? == key {
                return Ok(Some(entry.value()));
            }
        }
        Ok(None)
    }

    /// Iterates over `(key, value)` entry views in document order.
    ///
    /// The iterator yields `Result` so malformed entries surface mid-walk.
    #[must_use]
    pub const fn iter(self) -> MapIter<'a> {
        MapIter {
            data: self.data,
            pos: self.entries_start,
            remaining: self.len,
            limits: self.limits,
        }
    }
}

impl<'a> IntoIterator for MapRef<'a> {
    type Item = Result<MapEntryRef<'a>, CborError>;
    type IntoIter = MapIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A borrowed view of one map entry.
#[derive(Debug, Clone, Copy)]
pub struct MapEntryRef<'a> {
    key: ItemRef<'a>,
    value: ItemRef<'a>,
}

impl<'a> MapEntryRef<'a> {
    /// Decodes the key as a text string on demand.
    ///
    /// # Errors
    ///
    /// `ExpectedText` when the key is not a text string.
    pub fn key(self) -> Result<Cow<'a, str>, CborError> {
        self.key.text()
    }

    /// Returns the undecoded key item.
    #[must_use]
    pub const fn key_item(self) -> ItemRef<'a> {
        self.key
    }

    /// Returns the value item.
    #[must_use]
    pub const fn value(self) -> ItemRef<'a> {
        self.value
    }
}

/// A forward iterator over map entries.
///
/// Cheap to clone; each step invokes the walker twice (key, then value).
#[derive(Debug, Clone)]
pub struct MapIter<'a> {
    data: &'a [u8],
    pos: usize,
    remaining: usize,
    limits: DecodeLimits,
}

impl<'a> Iterator for MapIter<'a> {
    type Item = Result<MapEntryRef<'a>, CborError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let mut step = || -> Result<MapEntryRef<'a>, CborError> {
            let key = ItemRef::parse(self.data, self.pos, self.limits)?;
            let value = ItemRef::parse(self.data, key.end, self.limits)?;
            self.pos = value.end;
            Ok(MapEntryRef { key, value })
        };
        match step() {
            Ok(entry) => {
                self.remaining -= 1;
                Some(Ok(entry))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

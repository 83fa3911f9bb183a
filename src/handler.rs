//! The event sink contract.
//!
//! The event parser drives an [`EventSink`] through a pre-order walk of the
//! document: containers are bracketed by begin/end events, scalars arrive
//! as leaf events, and map keys arrive as `name` events. Every method has
//! an empty default body so sinks implement only what they observe.

/// The semantic-tag kind folded into a value event.
///
/// Tags are not independently observable; their effect is carried as an
/// annotation on the event for the tagged item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagKind {
    /// No recognized tag.
    #[default]
    None,
    /// Tag 0: RFC 3339 date-time string.
    DateTime,
    /// Tag 1: numeric epoch time.
    EpochTime,
    /// Tag 4: decimal fraction, rendered as a decimal string.
    Decimal,
}

/// The source position attached to every event.
///
/// Binary input has no lines; the parser always reports line 1 and a
/// column equal to the byte offset of the item head plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// One-based line number (always 1 for binary input).
    pub line: usize,
    /// One-based column number (byte offset of the item head + 1).
    pub column: usize,
}

/// A sink for decode events.
///
/// Events arrive in document order. Every `begin_array` pairs with one
/// `end_array` at the same nesting depth, likewise for maps, and within a
/// map each `name` is immediately followed by its value's event subtree.
/// `flush` fires once the nesting depth returns to zero.
#[allow(unused_variables)]
pub trait EventSink {
    /// An unsigned integer (major type 0).
    fn uint64_value(&mut self, value: u64, tag: TagKind, pos: Position) {}

    /// A negative integer (major type 1).
    fn int64_value(&mut self, value: i64, tag: TagKind, pos: Position) {}

    /// A floating-point value; half and single precision are widened.
    fn double_value(&mut self, value: f64, tag: TagKind, pos: Position) {}

    /// A boolean simple value.
    fn bool_value(&mut self, value: bool, pos: Position) {}

    /// The null simple value.
    fn null_value(&mut self, pos: Position) {}

    /// A text string. Chunked strings arrive already concatenated.
    fn string_value(&mut self, value: &str, tag: TagKind, pos: Position) {}

    /// A byte string. Chunked strings arrive already concatenated.
    fn byte_string_value(&mut self, value: &[u8], tag: TagKind, pos: Position) {}

    /// A bignum (tag 2 or 3): sign plus big-endian magnitude bytes.
    ///
    /// A negative bignum represents `-1 - magnitude`.
    fn bignum_value(&mut self, negative: bool, magnitude: &[u8], pos: Position) {}

    /// Start of an array; `len` is `None` for indefinite-length encodings.
    fn begin_array(&mut self, len: Option<usize>, pos: Position) {}

    /// End of the innermost open array.
    fn end_array(&mut self, pos: Position) {}

    /// Start of a map; `len` is the pair count, `None` when indefinite.
    fn begin_map(&mut self, len: Option<usize>, pos: Position) {}

    /// End of the innermost open map.
    fn end_map(&mut self, pos: Position) {}

    /// A map key.
    fn name(&mut self, name: &str, pos: Position) {}

    /// The nesting depth has returned to zero; one top-level item is complete.
    fn flush(&mut self) {}
}

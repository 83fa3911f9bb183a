use core::fmt;

/// A structured error code identifying the reason decoding stopped.
///
/// This enum is intentionally stable and string-free to support `no_std` and to remain hot-path friendly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Unexpected end-of-input while decoding.
    UnexpectedEof,
    /// Structurally malformed input (e.g. a break byte where an item is expected).
    SourceError,
    /// Arithmetic overflow while computing a length/offset.
    LengthOverflow,
    /// Input contains trailing bytes after the single CBOR data item.
    TrailingBytes,

    /// Nesting depth limit exceeded.
    DepthLimitExceeded,

    /// Reserved additional-info value (28..30) was used.
    ReservedAdditionalInfo,
    /// CBOR simple value this decoder does not accept (including `undefined`).
    UnsupportedSimpleValue,
    /// An indefinite-length string contains a chunk that is not a
    /// definite-length string of the same major type.
    InvalidChunk,

    /// Map key was not a CBOR text string.
    MapKeyMustBeText,

    /// Integer does not fit the requested representation.
    NumberOutOfRange,
    /// Invalid UTF-8 in a text string.
    Utf8Invalid,
    /// A tag-4 item is not a two-element `[exponent, mantissa]` array of the
    /// expected shapes.
    InvalidDecimal,

    /// Expected an unsigned integer at the current location.
    ExpectedUnsigned,
    /// Expected an integer at the current location.
    ExpectedInteger,
    /// Expected a text string at the current location.
    ExpectedText,
    /// Expected a byte string at the current location.
    ExpectedBytes,
    /// Expected an array at the current location.
    ExpectedArray,
    /// Expected a map at the current location.
    ExpectedMap,
    /// Expected a floating-point value at the current location.
    ExpectedFloat,
    /// Expected a boolean at the current location.
    ExpectedBool,
}

/// A decode error with a stable code and a byte offset.
///
/// Offsets refer to the byte position where the error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CborError {
    /// The error code.
    pub code: ErrorCode,
    /// Byte offset into the input where the error was detected.
    pub offset: usize,
}

impl CborError {
    /// Construct a decode error at `offset`.
    #[inline]
    #[must_use]
    pub const fn new(code: ErrorCode, offset: usize) -> Self {
        Self { code, offset }
    }
}

impl fmt::Display for CborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.code {
            ErrorCode::UnexpectedEof => "unexpected end of input",
            ErrorCode::SourceError => "malformed CBOR item",
            ErrorCode::LengthOverflow => "length overflow",
            ErrorCode::TrailingBytes => "trailing bytes after single CBOR item",

            ErrorCode::DepthLimitExceeded => "nesting depth limit exceeded",

            ErrorCode::ReservedAdditionalInfo => "reserved additional info value",
            ErrorCode::UnsupportedSimpleValue => "unsupported CBOR simple value",
            ErrorCode::InvalidChunk => "chunked string contains an invalid chunk",

            ErrorCode::MapKeyMustBeText => "map keys must be text strings",

            ErrorCode::NumberOutOfRange => "number outside representable range",
            ErrorCode::Utf8Invalid => "text must be valid UTF-8",
            ErrorCode::InvalidDecimal => "malformed decimal fraction",

            ErrorCode::ExpectedUnsigned => "expected CBOR unsigned integer",
            ErrorCode::ExpectedInteger => "expected CBOR integer",
            ErrorCode::ExpectedText => "expected CBOR text string",
            ErrorCode::ExpectedBytes => "expected CBOR byte string",
            ErrorCode::ExpectedArray => "expected CBOR array",
            ErrorCode::ExpectedMap => "expected CBOR map",
            ErrorCode::ExpectedFloat => "expected CBOR float",
            ErrorCode::ExpectedBool => "expected CBOR bool",
        };

        write!(f, "cbor error at {}: {msg}", self.offset)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CborError {}

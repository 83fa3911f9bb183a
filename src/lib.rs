//! # arbor-cbor
//!
//! Streaming CBOR (RFC 7049 / RFC 8949) decoding and zero-copy navigation
//! for the **Arbor** document toolkit.
//!
//! The crate consumes a fully loaded byte buffer containing one CBOR data
//! item and offers two ways in:
//!
//! - **Events.** [`EventParser`] drives any [`EventSink`] through a
//!   pre-order walk of the document: begin/end events bracket arrays and
//!   maps, scalars arrive as leaf events, and the recognized semantic tags
//!   (0 date-time, 1 epoch time, 2/3 bignum, 4 decimal fraction) fold into
//!   the tagged item's event. Decimal fractions are rendered to decimal
//!   strings without going through a float.
//! - **Cursors.** [`ItemRef`], [`ArrayRef`], and [`MapRef`] navigate the
//!   same bytes in place. Iteration steps the item walker over siblings
//!   without decoding them; payloads are materialized only through the
//!   typed accessors.
//!
//! ## Design principles
//!
//! - **The walker never allocates.** Skipping an item is O(size) over an
//!   explicit frame stack with an inline default capacity; only raising
//!   [`DecodeLimits::max_depth`] past the default can spill to the heap.
//! - **Bytes are borrowed, not copied.** Definite-length strings decode to
//!   borrowed slices of the input; only chunked (indefinite-length)
//!   strings are concatenated into owned buffers.
//! - **Depth is a limit, not a stack overflow.** Both the walker and the
//!   event parser replace recursion with frame stacks bounded by
//!   [`DecodeLimits`].
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`CborError`].
//! - `simdutf8`: SIMD-accelerated UTF-8 validation of text strings.
//!
//! ## Safety
//!
//! This crate forbids `unsafe` code.
//!
//! ## `no_std`
//!
//! The crate is `no_std` compatible and requires `alloc` (chunked strings
//! and decimal rendering materialize owned buffers).

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

extern crate alloc;

pub mod decimal;
pub mod decode;
mod error;
mod handler;
mod limits;
mod parse;
mod query;
mod stream;
mod utf8;
pub mod walk;

pub use crate::error::{CborError, ErrorCode};
pub use crate::handler::{EventSink, Position, TagKind};
pub use crate::limits::{DecodeLimits, DEFAULT_MAX_DEPTH};
pub use crate::parse::EventParser;
pub use crate::query::{ArrayIter, ArrayRef, CborKind, ItemRef, MapEntryRef, MapIter, MapRef};

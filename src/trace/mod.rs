//! API for tracing applications and libraries.
//!
//! This module holds the propagation-relevant portion of a trace: the
//! [`SpanContext`] identifying a span within a trace, and the id and flag
//! types it is built from. Span lifecycle concerns (timing, attributes,
//! events) are deliberately absent; a propagation crate only ever sees the
//! immutable context that crosses process boundaries.
//!
//! Ids are 64-bit values rendered as hexadecimal strings on the wire, per the
//! B3 format. [`TraceId::from_hex`] and [`SpanId::from_hex`] accept padded,
//! unpadded, and mixed-case input; formatting via [`std::fmt::LowerHex`]
//! produces the unpadded form, while `Display` zero-pads to 16 characters.

mod span_context;

pub use span_context::{SpanContext, SpanId, TraceFlags, TraceId};

//! # B3 Propagator
//!
//! The `Propagator` facilitates [`SpanContext`] propagation using B3 multiple
//! headers:
//!   X-B3-TraceId: {trace_id}
//!   X-B3-SpanId: {span_id}
//!   X-B3-ParentSpanId: {parent_span_id}
//!   X-B3-Sampled: {sampling_state}
//!   X-B3-Flags: {debug_flag}
//!
//! The same five logical fields appear under two key spellings, selected with
//! [`B3Keys`]: the lowercase hyphenated names above for HTTP headers and
//! generic text maps, or the CGI-style `HTTP_X_B3_*` names under which server
//! environments expose request headers.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::propagation::{text_map_propagator::FieldIter, Extractor, Injector, TextMapPropagator};
use crate::trace::{SpanContext, SpanId, TraceFlags, TraceId};

// B3 spells these `X-B3-TraceId` and friends, but HTTP matches header names
// case-insensitively while gRPC metadata requires lowercase, so the lowercase
// form is the one that travels everywhere.
const B3_DEBUG_FLAG_HEADER: &str = "x-b3-flags";
const B3_TRACE_ID_HEADER: &str = "x-b3-traceid";
const B3_SPAN_ID_HEADER: &str = "x-b3-spanid";
const B3_SAMPLED_HEADER: &str = "x-b3-sampled";
const B3_PARENT_SPAN_ID_HEADER: &str = "x-b3-parentspanid";

// The same headers after CGI meta-variable normalization (uppercased,
// underscored, `HTTP_` prefix), the spelling Rack-style server environments
// hand to applications.
const ENV_DEBUG_FLAG_HEADER: &str = "HTTP_X_B3_FLAGS";
const ENV_TRACE_ID_HEADER: &str = "HTTP_X_B3_TRACEID";
const ENV_SPAN_ID_HEADER: &str = "HTTP_X_B3_SPANID";
const ENV_SAMPLED_HEADER: &str = "HTTP_X_B3_SAMPLED";
const ENV_PARENT_SPAN_ID_HEADER: &str = "HTTP_X_B3_PARENTSPANID";

/// The literal the debug-flag header carries; any other value is ignored.
const DEBUG_FLAG_SET: &str = "1";

/// The carrier key names a [`Propagator`] reads and writes.
///
/// B3 fixes the logical fields while the key spelling depends on where the
/// carrier came from, so the keyset is a value handed to the propagator at
/// construction rather than a second code path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct B3Keys {
    trace_id: &'static str,
    span_id: &'static str,
    parent_span_id: &'static str,
    sampled: &'static str,
    debug_flag: &'static str,
}

impl B3Keys {
    /// Lowercase hyphenated keys (`x-b3-traceid`, ...) for HTTP headers and
    /// generic text maps. This is the default keyset.
    pub const fn text_map() -> Self {
        B3Keys {
            trace_id: B3_TRACE_ID_HEADER,
            span_id: B3_SPAN_ID_HEADER,
            parent_span_id: B3_PARENT_SPAN_ID_HEADER,
            sampled: B3_SAMPLED_HEADER,
            debug_flag: B3_DEBUG_FLAG_HEADER,
        }
    }

    /// CGI-style keys (`HTTP_X_B3_TRACEID`, ...) as server environments
    /// expose request headers to applications.
    pub const fn http_env() -> Self {
        B3Keys {
            trace_id: ENV_TRACE_ID_HEADER,
            span_id: ENV_SPAN_ID_HEADER,
            parent_span_id: ENV_PARENT_SPAN_ID_HEADER,
            sampled: ENV_SAMPLED_HEADER,
            debug_flag: ENV_DEBUG_FLAG_HEADER,
        }
    }

    /// A custom keyset, in the order trace id, span id, parent span id,
    /// sampled, debug flag.
    pub const fn new(
        trace_id: &'static str,
        span_id: &'static str,
        parent_span_id: &'static str,
        sampled: &'static str,
        debug_flag: &'static str,
    ) -> Self {
        B3Keys {
            trace_id,
            span_id,
            parent_span_id,
            sampled,
            debug_flag,
        }
    }
}

impl Default for B3Keys {
    fn default() -> Self {
        B3Keys::text_map()
    }
}

/// Reasons a carrier yields no span context.
///
/// Never surfaced to callers: carriers without B3 data are the normal case
/// for requests from uninstrumented peers and collapse silently to `None` at
/// the trait boundary, while carriers with present but unusable data are
/// logged at debug level first.
#[derive(Error, Debug)]
enum ExtractError {
    /// The carrier has no trace-id or no span-id key at all.
    #[error("carrier does not carry a b3 context")]
    NotPresent,
    #[error("trace id is not a valid hex string")]
    InvalidTraceId,
    #[error("span id is not a valid hex string")]
    InvalidSpanId,
    #[error("trace id and span id must be nonzero")]
    InvalidSpanContext,
}

/// Extracts and injects `SpanContext`s into `Extractor`s or `Injector`s using
/// the B3 multi-header format.
///
/// ## Id encoding
///
/// Ids are written as unpadded lowercase hex (a trace id of `255` becomes
/// `"ff"`); [`with_zero_padded_ids`](Propagator::with_zero_padded_ids) opts
/// into the fixed 16-character spelling some peers require. Extraction
/// accepts either convention, in either case.
///
/// ## Debug flag
///
/// A context whose flags are exactly [`TraceFlags::DEBUG`] is written as the
/// literal `"1"` in the debug-flag header and nothing in the sampled header;
/// every other flags value is written as hex in the sampled header and the
/// debug-flag header is left unset. On extraction the debug header wins over
/// the sampled header.
/// [`without_debug_flag`](Propagator::without_debug_flag) restores the older
/// convention in which the sampled header always carries the flags value and
/// the debug-flag header is neither written nor read.
#[derive(Clone, Debug)]
pub struct Propagator {
    keys: B3Keys,
    debug_flag: bool,
    zero_padded_ids: bool,
    fields: Vec<String>,
}

impl Default for Propagator {
    fn default() -> Self {
        Propagator::new()
    }
}

impl Propagator {
    /// Create a new propagator using the text-map keyset.
    pub fn new() -> Self {
        Propagator::with_keys(B3Keys::text_map())
    }

    /// Create a new propagator using the given keyset.
    pub fn with_keys(keys: B3Keys) -> Self {
        let fields = Self::field_names(&keys, true);
        Propagator {
            keys,
            debug_flag: true,
            zero_padded_ids: false,
            fields,
        }
    }

    /// Disable the dedicated debug-flag header.
    ///
    /// Injection then always writes the flags value into the sampled header,
    /// even for debug contexts, and extraction ignores the debug-flag header
    /// entirely. The header also disappears from [`fields`].
    ///
    /// [`fields`]: TextMapPropagator::fields
    pub fn without_debug_flag(mut self) -> Self {
        self.debug_flag = false;
        self.fields = Self::field_names(&self.keys, false);
        self
    }

    /// Zero-pad injected ids to 16 characters.
    pub fn with_zero_padded_ids(mut self) -> Self {
        self.zero_padded_ids = true;
        self
    }

    fn field_names(keys: &B3Keys, debug_flag: bool) -> Vec<String> {
        let mut fields = vec![
            keys.trace_id.to_string(),
            keys.span_id.to_string(),
            keys.parent_span_id.to_string(),
            keys.sampled.to_string(),
        ];
        if debug_flag {
            fields.push(keys.debug_flag.to_string());
        }
        fields
    }

    fn encode_id<T: fmt::LowerHex>(&self, id: T) -> String {
        if self.zero_padded_ids {
            format!("{:016x}", id)
        } else {
            format!("{:x}", id)
        }
    }

    /// Resolve trace flags from the debug-flag and sampled headers.
    ///
    /// A debug header carrying exactly [`DEBUG_FLAG_SET`] forces
    /// [`TraceFlags::DEBUG`]; anything else falls back to the sampled header,
    /// whose value decodes as hex. A malformed sampled value degrades to the
    /// default flags instead of discarding the rest of the context.
    fn extract_trace_flags(&self, extractor: &dyn Extractor) -> TraceFlags {
        if self.debug_flag && extractor.get(self.keys.debug_flag) == Some(DEBUG_FLAG_SET) {
            return TraceFlags::DEBUG;
        }
        match extractor.get(self.keys.sampled) {
            Some(sampled) => match u64::from_str_radix(sampled, 16) {
                Ok(flags) => TraceFlags::new(flags),
                Err(_) => {
                    debug!(
                        header = self.keys.sampled,
                        value = sampled,
                        "unparsable sampled value, treating as not sampled"
                    );
                    TraceFlags::default()
                }
            },
            None => TraceFlags::default(),
        }
    }

    /// Extract a `SpanContext` from B3 multi-header values.
    fn extract_span_context(
        &self,
        extractor: &dyn Extractor,
    ) -> Result<SpanContext, ExtractError> {
        let trace_id = match extractor.get(self.keys.trace_id) {
            Some(trace_id) => {
                TraceId::from_hex(trace_id).map_err(|_| ExtractError::InvalidTraceId)?
            }
            None => return Err(ExtractError::NotPresent),
        };
        let span_id = match extractor.get(self.keys.span_id) {
            Some(span_id) => SpanId::from_hex(span_id).map_err(|_| ExtractError::InvalidSpanId)?,
            None => return Err(ExtractError::NotPresent),
        };
        // A missing or malformed parent means a root span, never a failed
        // extraction.
        let parent_id = extractor
            .get(self.keys.parent_span_id)
            .and_then(|parent_id| SpanId::from_hex(parent_id).ok())
            .unwrap_or(SpanId::INVALID);

        let trace_flags = self.extract_trace_flags(extractor);

        let span_context = SpanContext::new(trace_id, span_id, parent_id, trace_flags);
        if span_context.is_valid() {
            Ok(span_context)
        } else {
            Err(ExtractError::InvalidSpanContext)
        }
    }
}

impl TextMapPropagator for Propagator {
    /// Writes the context's four fields under the configured keyset.
    ///
    /// Invalid contexts (zero trace or span id) are not written at all.
    fn inject_context(&self, span_context: &SpanContext, injector: &mut dyn Injector) {
        if !span_context.is_valid() {
            return;
        }
        injector.set(self.keys.trace_id, self.encode_id(span_context.trace_id()));
        injector.set(self.keys.span_id, self.encode_id(span_context.span_id()));
        injector.set(
            self.keys.parent_span_id,
            self.encode_id(span_context.parent_id()),
        );
        // The debug-flag and sampled headers are mutually exclusive.
        if self.debug_flag && span_context.trace_flags().is_debug() {
            injector.set(self.keys.debug_flag, DEBUG_FLAG_SET.to_string());
        } else {
            injector.set(
                self.keys.sampled,
                format!("{:x}", span_context.trace_flags()),
            );
        }
    }

    /// Reads a context back out of the carrier, returning `None` when no
    /// valid context is present.
    fn extract(&self, extractor: &dyn Extractor) -> Option<SpanContext> {
        match self.extract_span_context(extractor) {
            Ok(span_context) => Some(span_context),
            Err(ExtractError::NotPresent) => None,
            Err(error) => {
                debug!(%error, "discarding unusable b3 carrier data");
                None
            }
        }
    }

    fn fields(&self) -> FieldIter<'_> {
        FieldIter::new(self.fields.as_slice())
    }
}

//! # Text Propagator
//!
//! [`TextMapPropagator`] performs the injection and extraction of a
//! cross-cutting concern value as string key/values into carriers that travel
//! in-band across process boundaries.
//!
//! The carrier of propagated data on both the client (injector) and server
//! (extractor) side is usually an HTTP request. Propagation is usually
//! implemented via library-specific request interceptors, where the
//! client-side injects values and the server-side extracts them.

use std::fmt::Debug;
use std::slice;

use crate::propagation::{Extractor, Injector};
use crate::trace::SpanContext;

/// Methods to inject and extract a value as text into injectors and extractors.
pub trait TextMapPropagator: Debug {
    /// Properly encodes the values of the given [`SpanContext`] and injects
    /// them into the [`Injector`].
    ///
    /// Contexts that are not valid (zero trace or span id) are not injected.
    fn inject_context(&self, span_context: &SpanContext, injector: &mut dyn Injector);

    /// Retrieves encoded data using the provided [`Extractor`].
    ///
    /// Returns `None` if no data was retrieved or if the retrieved data is
    /// invalid; the caller then proceeds as the root of a new trace. A miss
    /// is the normal signal for an unpropagated request, never a panic.
    fn extract(&self, extractor: &dyn Extractor) -> Option<SpanContext>;

    /// Returns iter of fields used by [`TextMapPropagator`]
    ///
    /// Transport middleware can use this to clear stale values from a carrier
    /// before injecting into it.
    fn fields(&self) -> FieldIter<'_>;
}

/// An iterator over fields of a [`TextMapPropagator`]
#[derive(Debug)]
pub struct FieldIter<'a>(slice::Iter<'a, String>);

impl<'a> FieldIter<'a> {
    /// Create a new `FieldIter` from a slice of propagator fields
    pub(crate) fn new(fields: &'a [String]) -> Self {
        FieldIter(fields.iter())
    }
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|field| field.as_str())
    }
}

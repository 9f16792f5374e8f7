//! Propagation of B3 trace context over string-keyed carriers.
//!
//! [B3] is a Zipkin-originated propagation format that carries a trace id,
//! span id, parent span id, and a sampling decision across process boundaries
//! as a set of text headers, so that spans created in different services join
//! the same trace. This crate implements the multi-header form of the format
//! behind the [`TextMapPropagator`] interface: [`inject_context`] writes a
//! [`SpanContext`] into any [`Injector`] carrier, and [`extract`] rebuilds one
//! from any [`Extractor`] carrier, returning `None` when the carrier holds no
//! valid context.
//!
//! Extraction never panics on malformed data: a missing header, non-hex id,
//! or zero trace/span id all collapse into the `None` result, which callers
//! treat as "start a new root trace".
//!
//! # Examples
//!
//! ```
//! use b3_propagator::{
//!     propagation::TextMapPropagator,
//!     trace::{SpanContext, SpanId, TraceFlags, TraceId},
//!     Propagator,
//! };
//! use std::collections::HashMap;
//!
//! let propagator = Propagator::new();
//!
//! // Before sending a request to a downstream service:
//! let span_context = SpanContext::new(
//!     TraceId::from(0xff),
//!     SpanId::from(0x10),
//!     SpanId::INVALID,
//!     TraceFlags::SAMPLED,
//! );
//! let mut headers = HashMap::new(); // replace with the outgoing request's header map
//! propagator.inject_context(&span_context, &mut headers);
//! assert_eq!(headers["x-b3-traceid"], "ff");
//!
//! // On the service receiving that request:
//! let parent = propagator.extract(&headers);
//! assert_eq!(parent, Some(span_context));
//! ```
//!
//! Carriers keyed in the CGI style (`HTTP_X_B3_TRACEID`, ...), as server
//! environments expose request headers, use the same propagator with a
//! different keyset:
//!
//! ```
//! use b3_propagator::{propagation::TextMapPropagator, B3Keys, Propagator};
//!
//! let propagator = Propagator::with_keys(B3Keys::http_env());
//! assert!(propagator.fields().all(|field| field.starts_with("HTTP_X_B3_")));
//! ```
//!
//! See [`Propagator`] for the id padding and debug-flag conventions and the
//! options selecting their legacy variants.
//!
//! *Compiler support: [requires `rustc` 1.65+][msrv]*
//!
//! [B3]: https://github.com/openzipkin/b3-propagation
//! [`inject_context`]: propagation::TextMapPropagator::inject_context
//! [`extract`]: propagation::TextMapPropagator::extract
//! [`TextMapPropagator`]: propagation::TextMapPropagator
//! [`Injector`]: propagation::Injector
//! [`Extractor`]: propagation::Extractor
//! [`SpanContext`]: trace::SpanContext
//! [msrv]: #supported-rust-versions
//!
//! # Supported Rust Versions
//!
//! This crate is built against the latest stable release. The minimum
//! supported version is 1.65. The current version is not guaranteed to build
//! on Rust versions earlier than the minimum supported version.
//!
//! The current stable Rust compiler and the three most recent minor versions
//! before it will always be supported. For example, if the current stable
//! compiler version is 1.65, the minimum supported version will not be
//! increased past 1.62, three minor versions prior. Increasing the minimum
//! supported compiler version is not considered a semver breaking change as
//! long as doing so complies with this policy.
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(
    docsrs,
    feature(doc_cfg, doc_auto_cfg),
    deny(rustdoc::broken_intra_doc_links)
)]
#![cfg_attr(test, deny(warnings))]

pub mod propagation;
pub mod propagator;
pub mod trace;

pub use propagator::{B3Keys, Propagator};

//! Reduction of quasiquotations.
//!
//! Reduction eliminates every quoted, deferred and nested hole, leaving a
//! flat segment model whose remaining holes are opaque values ready for a
//! tag-style consumer.
//!
//! # Components
//!
//! ## Reducer
//! Drives the left-to-right scan. [`Reducer::evaluate`] and
//! [`Reducer::export`] run it synchronously; the `_async` variants also
//! await deferred sources that produce futures.
//!
//! ## Segment builder
//! The growable output buffer the scan writes into. Fusing text and splicing
//! nested models happens here, in parallel for cooked and raw segments.
//!
//! # Failure
//!
//! Reduction is all or nothing. A failing source, an async source met by the
//! synchronous engine, or a breached [`ReductionConfig`](crate::ReductionConfig)
//! limit aborts the pass; the input quasiquotation is untouched and can be
//! reduced again.

mod builder;
pub mod reducer;

pub use reducer::Reducer;

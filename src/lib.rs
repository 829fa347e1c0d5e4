//! # qqtag: lazy quasiquotation for text templates
//!
//! A [`QuasiQuote`] is a partially built template: literal segments (kept in
//! both cooked and raw form) alternating with holes. Holes can carry
//!
//! - a quoted value ([`quote`]) that is fused into the surrounding text,
//! - a deferred computation ([`unquote`], [`unquote_fn`], [`unquote_async`],
//!   [`unquote_future`]) resolved only when the template is reduced,
//! - another quasiquotation, spliced in place,
//! - or any other value, passed through to the consumer untouched.
//!
//! ## Reduction
//!
//! Nothing is resolved at construction. [`QuasiQuote::export`] and
//! [`QuasiQuote::dispatch`] reduce on every call, so deferred holes observe
//! the state they close over at that moment. [`QuasiQuote::evaluated`]
//! reduces once and returns a frozen snapshot.
//!
//! ```text
//! segments + holes ──► Reducer (sync | async) ──► Tagged { strings, values } ──► consumer
//! ```
//!
//! The asynchronous variants additionally await deferred sources that produce
//! futures. The synchronous engine rejects such sources with
//! [`QqError::AsyncSourceInSyncReduction`].
//!
//! ## Absent vs. null
//!
//! A deferred source returning `None` removes its hole and merges the two
//! neighbouring segments. Returning `Some(Value::Null.into())` keeps the hole.
//!
//! ## Configuration
//!
//! [`ReductionConfig`] bounds unquote chains, nesting depth and (async only)
//! the time spent awaiting one source. Build a [`Reducer`] from it to apply
//! the limits; the convenience methods on [`QuasiQuote`] use the defaults.

pub mod concat;
pub mod config;
pub mod error;
pub mod eval;
pub mod hole;
pub mod quasiquote;
pub mod segments;
pub mod value;


// Re-exports
pub use concat::{concat, stringify};
pub use config::ReductionConfig;
pub use error::{QqError, QqResult};
pub use eval::Reducer;
pub use hole::{
    quote, unquote, unquote_async, unquote_fn, unquote_future, Hole, HoleKind, HoleSourceKind,
    ResolvedHole, Unquote,
};
pub use quasiquote::{quasiquote, QuasiQuote};
pub use segments::{Tagged, TemplateStrings};
pub use value::Value;

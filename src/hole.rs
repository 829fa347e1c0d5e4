//! Hole values and their classification.
//!
//! A hole sits between two literal segments. Reduction looks at its
//! [`HoleKind`] to decide whether to fuse it into text (`Quoted`), resolve it
//! first (`Deferred`), splice another template in its place (`Nested`), or
//! leave it for the consumer (`Opaque`).

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use strum::Display;

use crate::error::QqResult;
use crate::quasiquote::QuasiQuote;
use crate::value::Value;

/// What a deferred source produces. `Ok(None)` is the absent sentinel.
pub type ResolvedHole = QqResult<Option<Hole>>;

pub type SyncThunk = Arc<dyn Fn() -> Option<Hole> + Send + Sync>;
pub type AsyncThunk = Arc<dyn Fn() -> BoxFuture<'static, ResolvedHole> + Send + Sync>;
pub type PendingHole = Shared<BoxFuture<'static, ResolvedHole>>;

#[derive(Clone, Debug)]
pub enum Hole {
    /// quote: stringified and fused into the adjoining segments.
    Literal(Value),
    /// unquote: resolved at reduction time, then reclassified.
    Deferred(Unquote),
    /// An embedded quasiquotation spliced in at this position.
    Nested(QuasiQuote),
    /// Passed through to the consumer unchanged.
    Opaque(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HoleKind {
    #[strum(serialize = "quoted")]
    Quoted,
    #[strum(serialize = "deferred")]
    Deferred,
    #[strum(serialize = "nested")]
    Nested,
    #[strum(serialize = "opaque")]
    Opaque,
}

impl Hole {
    pub fn kind(&self) -> HoleKind {
        match self {
            Hole::Literal(_) => HoleKind::Quoted,
            Hole::Deferred(_) => HoleKind::Deferred,
            Hole::Nested(_) => HoleKind::Nested,
            Hole::Opaque(_) => HoleKind::Opaque,
        }
    }

    pub fn as_opaque(&self) -> Option<&Value> {
        match self {
            Hole::Opaque(value) => Some(value),
            _ => None,
        }
    }
}

/// Source of a deferred hole.
///
/// Every variant is cheap to clone, so an unreduced quasiquotation can be
/// reduced repeatedly. Thunks run again on each reduction.
#[derive(Clone)]
pub enum Unquote {
    /// An already produced quasiquotation or literal.
    Ready(Box<Hole>),
    Thunk(SyncThunk),
    /// Async path only.
    AsyncThunk(AsyncThunk),
    /// An awaitable that can be awaited any number of times. Async path only.
    Pending(PendingHole),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HoleSourceKind {
    #[strum(serialize = "ready")]
    Ready,
    #[strum(serialize = "thunk")]
    Thunk,
    #[strum(serialize = "async thunk")]
    AsyncThunk,
    #[strum(serialize = "awaitable")]
    Pending,
}

impl Unquote {
    pub fn source_kind(&self) -> HoleSourceKind {
        match self {
            Unquote::Ready(_) => HoleSourceKind::Ready,
            Unquote::Thunk(_) => HoleSourceKind::Thunk,
            Unquote::AsyncThunk(_) => HoleSourceKind::AsyncThunk,
            Unquote::Pending(_) => HoleSourceKind::Pending,
        }
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Unquote::AsyncThunk(_) | Unquote::Pending(_))
    }
}

impl fmt::Debug for Unquote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unquote::Ready(hole) => f.debug_tuple("Ready").field(hole).finish(),
            other => write!(f, "Unquote({})", other.source_kind()),
        }
    }
}

impl From<Hole> for Unquote {
    fn from(hole: Hole) -> Self {
        Unquote::Ready(Box::new(hole))
    }
}

impl From<QuasiQuote> for Unquote {
    fn from(q: QuasiQuote) -> Self {
        Unquote::Ready(Box::new(Hole::Nested(q)))
    }
}

impl From<Value> for Hole {
    fn from(value: Value) -> Self {
        Hole::Opaque(value)
    }
}

impl From<QuasiQuote> for Hole {
    fn from(q: QuasiQuote) -> Self {
        Hole::Nested(q)
    }
}

impl From<Unquote> for Hole {
    fn from(source: Unquote) -> Self {
        Hole::Deferred(source)
    }
}

macro_rules! opaque_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Hole {
                fn from(v: $ty) -> Self {
                    Hole::Opaque(Value::from(v))
                }
            }
        )*
    };
}

opaque_from!(i64, i32, f64, bool, &str, String);

pub fn quote(value: impl Into<Value>) -> Hole {
    Hole::Literal(value.into())
}

pub fn unquote(source: impl Into<Unquote>) -> Hole {
    Hole::Deferred(source.into())
}

/// Deferred hole computed on every reduction. Returning `None` removes the
/// hole and merges its neighbouring segments.
pub fn unquote_fn<F>(thunk: F) -> Hole
where
    F: Fn() -> Option<Hole> + Send + Sync + 'static,
{
    Hole::Deferred(Unquote::Thunk(Arc::new(thunk)))
}

pub fn unquote_async<F, Fut>(thunk: F) -> Hole
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ResolvedHole> + Send + 'static,
{
    Hole::Deferred(Unquote::AsyncThunk(Arc::new(move || thunk().boxed())))
}

/// Wraps an awaitable. The future runs at most once; later reductions reuse
/// its output.
pub fn unquote_future<Fut>(future: Fut) -> Hole
where
    Fut: Future<Output = ResolvedHole> + Send + 'static,
{
    Hole::Deferred(Unquote::Pending(future.boxed().shared()))
}

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::error::QqResult;
use crate::eval::Reducer;
use crate::hole::Hole;
use crate::segments::{Segments, Tagged, TemplateStrings};
use crate::value::Value;

/// A lazily reduced text template.
///
/// Literal segments alternate with holes; holes may quote values into the
/// text, defer a computation, embed another quasiquotation or carry an opaque
/// value. Nothing is resolved until the value is exported or dispatched, and
/// every export of an unreduced value resolves its deferred holes again.
/// [`evaluated`](QuasiQuote::evaluated) takes a frozen snapshot instead.
///
/// Values are immutable: every transform returns a new `QuasiQuote`.
#[derive(Clone)]
pub struct QuasiQuote {
    model: Arc<Segments>,
}

impl QuasiQuote {
    /// Builds a quasiquotation from captured literal segments and holes.
    ///
    /// Fails with [`QqError::Arity`](crate::QqError::Arity) unless there is
    /// exactly one more segment than there are holes, in both cooked and raw
    /// form.
    pub fn new(strings: TemplateStrings, values: Vec<Hole>) -> QqResult<Self> {
        Ok(Self::from_segments(Arc::new(Segments::new(strings, values)?)))
    }

    /// One empty segment, no holes, already reduced.
    pub fn empty() -> Self {
        Self::from_segments(Arc::new(Segments::empty()))
    }

    pub(crate) fn from_segments(model: Arc<Segments>) -> Self {
        Self { model }
    }

    pub(crate) fn segments(&self) -> &Arc<Segments> {
        &self.model
    }

    /// True for a single empty segment. Does not reduce, so a template whose
    /// holes would all vanish is still reported non-empty.
    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }

    pub fn is_reduced(&self) -> bool {
        self.model.reduced
    }

    pub fn segment_count(&self) -> usize {
        self.model.cooked.len()
    }

    pub fn hole_count(&self) -> usize {
        self.model.values.len()
    }

    /// Reduces once and returns the frozen result. Later exports of the
    /// snapshot never re-run deferred holes.
    pub fn evaluated(&self) -> QqResult<Self> {
        Reducer::default().evaluate(self)
    }

    pub async fn evaluated_async(&self) -> QqResult<Self> {
        Reducer::default().evaluate_async(self).await
    }

    /// Reduces with the default [`ReductionConfig`](crate::ReductionConfig)
    /// and returns the tag-style form.
    ///
    /// The defaults cap a chain of deferred sources at one hole to 64
    /// resolutions and nested quasiquotations to 128 levels. Deeper input
    /// fails with [`QqError::UnquoteChainLimit`](crate::QqError::UnquoteChainLimit)
    /// or [`QqError::DepthLimit`](crate::QqError::DepthLimit); use a
    /// [`Reducer`] with a larger config for it.
    pub fn export(&self) -> QqResult<Tagged> {
        Reducer::default().export(self)
    }

    /// Async counterpart of [`export`](QuasiQuote::export), with the same
    /// default limits.
    pub async fn export_async(&self) -> QqResult<Tagged> {
        Reducer::default().export_async(self).await
    }

    /// Reduces and hands the segments and values to `consumer`.
    pub fn dispatch<T, F>(&self, consumer: F) -> QqResult<T>
    where
        F: FnOnce(TemplateStrings, Vec<Value>) -> T,
    {
        let Tagged { strings, values } = self.export()?;
        Ok(consumer(strings, values))
    }

    pub async fn dispatch_async<T, F, Fut>(&self, consumer: F) -> QqResult<T>
    where
        F: FnOnce(TemplateStrings, Vec<Value>) -> Fut,
        Fut: Future<Output = T>,
    {
        let Tagged { strings, values } = self.export_async().await?;
        Ok(consumer(strings, values).await)
    }

    /// `a`, then `separator`, then `b`, fused at the boundary segment. The
    /// result is not reduced, even when both inputs are.
    pub fn join(separator: &str, a: &QuasiQuote, b: &QuasiQuote) -> Self {
        Self::from_segments(Arc::new(Segments::join(separator, &a.model, &b.model)))
    }
}

impl Default for QuasiQuote {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for QuasiQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuasiQuote")
            .field("cooked", &self.model.cooked)
            .field("raw", &self.model.raw)
            .field("values", &self.model.values)
            .field("reduced", &self.model.reduced)
            .finish()
    }
}

pub fn quasiquote(strings: TemplateStrings, values: Vec<Hole>) -> QqResult<QuasiQuote> {
    QuasiQuote::new(strings, values)
}

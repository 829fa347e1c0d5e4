use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_recursion::async_recursion;
use tracing::{debug, trace, warn};

use super::builder::SegmentBuilder;
use crate::config::ReductionConfig;
use crate::error::{QqError, QqResult};
use crate::hole::{Hole, ResolvedHole, Unquote};
use crate::quasiquote::QuasiQuote;
use crate::segments::{Segments, Tagged};

/// Reduction engine.
///
/// Walks the holes left to right. A quoted or nested hole is folded into the
/// surrounding text, an opaque one is kept, and a deferred one is resolved and
/// then classified again at the same position until it lands in one of the
/// other three kinds or resolves to nothing.
#[derive(Debug, Clone, Default)]
pub struct Reducer {
    config: ReductionConfig,
}

// What to do at the cursor after looking at the current hole.
enum Step {
    Done,
    Reclassify(Hole),
}

impl Reducer {
    pub fn new(config: ReductionConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, q: &QuasiQuote) -> QqResult<QuasiQuote> {
        Ok(QuasiQuote::from_segments(self.reduce(q.segments())?))
    }

    pub async fn evaluate_async(&self, q: &QuasiQuote) -> QqResult<QuasiQuote> {
        Ok(QuasiQuote::from_segments(
            self.reduce_async(q.segments()).await?,
        ))
    }

    pub fn export(&self, q: &QuasiQuote) -> QqResult<Tagged> {
        self.reduce(q.segments())?.to_tagged()
    }

    pub async fn export_async(&self, q: &QuasiQuote) -> QqResult<Tagged> {
        self.reduce_async(q.segments()).await?.to_tagged()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(holes = model.values.len()))]
    pub(crate) fn reduce(&self, model: &Arc<Segments>) -> QqResult<Arc<Segments>> {
        self.reduce_at(model, 0)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(holes = model.values.len()))]
    pub(crate) async fn reduce_async(&self, model: &Arc<Segments>) -> QqResult<Arc<Segments>> {
        self.reduce_at_async(model, 0).await
    }

    fn reduce_at(&self, model: &Arc<Segments>, depth: usize) -> QqResult<Arc<Segments>> {
        if model.reduced {
            return Ok(Arc::clone(model));
        }
        self.check_depth(depth)?;

        let mut builder = SegmentBuilder::new(&model.cooked[0], &model.raw[0], model.values.len());
        for (i, hole) in model.values.iter().enumerate() {
            let mut current = Cow::Borrowed(hole);
            let mut resolutions = 0;
            loop {
                let step = match current.as_ref() {
                    Hole::Deferred(source) => {
                        self.track_resolution(&mut resolutions)?;
                        Self::after_resolution(i, self.resolve(source)?)
                    }
                    Hole::Nested(q) => {
                        let nested = self.reduce_at(q.segments(), depth + 1)?;
                        trace!(position = i, holes = nested.values.len(), "splicing nested");
                        builder.splice(&nested);
                        Step::Done
                    }
                    other => Self::settle(&mut builder, other),
                };
                match step {
                    Step::Done => break,
                    Step::Reclassify(next) => current = Cow::Owned(next),
                }
            }
            builder.fuse_text(&model.cooked[i + 1], &model.raw[i + 1]);
        }
        Ok(Arc::new(builder.finish()))
    }

    #[async_recursion]
    async fn reduce_at_async(
        &self,
        model: &Arc<Segments>,
        depth: usize,
    ) -> QqResult<Arc<Segments>> {
        if model.reduced {
            return Ok(Arc::clone(model));
        }
        self.check_depth(depth)?;

        let mut builder = SegmentBuilder::new(&model.cooked[0], &model.raw[0], model.values.len());
        for (i, hole) in model.values.iter().enumerate() {
            let mut current = Cow::Borrowed(hole);
            let mut resolutions = 0;
            loop {
                let step = match current.as_ref() {
                    Hole::Deferred(source) => {
                        self.track_resolution(&mut resolutions)?;
                        Self::after_resolution(i, self.resolve_async(source).await?)
                    }
                    Hole::Nested(q) => {
                        let nested = self.reduce_at_async(q.segments(), depth + 1).await?;
                        trace!(position = i, holes = nested.values.len(), "splicing nested");
                        builder.splice(&nested);
                        Step::Done
                    }
                    other => Self::settle(&mut builder, other),
                };
                match step {
                    Step::Done => break,
                    Step::Reclassify(next) => current = Cow::Owned(next),
                }
            }
            builder.fuse_text(&model.cooked[i + 1], &model.raw[i + 1]);
        }
        Ok(Arc::new(builder.finish()))
    }

    // Quoted and opaque holes need no further work.
    fn settle(builder: &mut SegmentBuilder, hole: &Hole) -> Step {
        match hole {
            Hole::Literal(value) => builder.fuse_literal(value),
            other => builder.push_hole(other.clone()),
        }
        Step::Done
    }

    fn after_resolution(position: usize, resolved: Option<Hole>) -> Step {
        match resolved {
            Some(next) => Step::Reclassify(next),
            None => {
                debug!(position, "deferred hole resolved to nothing, merging segments");
                Step::Done
            }
        }
    }

    fn resolve(&self, source: &Unquote) -> ResolvedHole {
        match source {
            Unquote::Ready(hole) => Ok(Some(hole.as_ref().clone())),
            Unquote::Thunk(thunk) => Ok(thunk()),
            other => {
                warn!(source = %other.source_kind(), "async source in synchronous reduction");
                Err(QqError::AsyncSourceInSyncReduction(other.source_kind()))
            }
        }
    }

    async fn resolve_async(&self, source: &Unquote) -> ResolvedHole {
        match source {
            Unquote::Ready(hole) => Ok(Some(hole.as_ref().clone())),
            Unquote::Thunk(thunk) => Ok(thunk()),
            Unquote::AsyncThunk(thunk) => self.await_source(thunk()).await,
            Unquote::Pending(pending) => self.await_source(pending.clone()).await,
        }
    }

    async fn await_source<F>(&self, source: F) -> ResolvedHole
    where
        F: Future<Output = ResolvedHole>,
    {
        match self.config.resolution_timeout {
            Some(limit) => tokio::time::timeout(limit, source).await.map_err(|_| {
                warn!(?limit, "deferred source timed out");
                QqError::Timeout(limit)
            })?,
            None => source.await,
        }
    }

    fn track_resolution(&self, resolutions: &mut usize) -> QqResult<()> {
        *resolutions += 1;
        if *resolutions > self.config.max_unquote_chain {
            warn!(limit = self.config.max_unquote_chain, "unquote chain limit reached");
            return Err(QqError::UnquoteChainLimit(self.config.max_unquote_chain));
        }
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> QqResult<()> {
        if depth > self.config.max_depth {
            warn!(limit = self.config.max_depth, "nesting depth limit reached");
            return Err(QqError::DepthLimit(self.config.max_depth));
        }
        Ok(())
    }
}

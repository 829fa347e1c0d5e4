use crate::hole::Hole;
use crate::segments::Segments;
use crate::value::Value;

/// Output buffer for one reduction pass.
///
/// The last segment stays open: text fused at the cursor is appended to it,
/// and pushing a hole closes it and opens a fresh empty segment.
#[derive(Debug)]
pub(crate) struct SegmentBuilder {
    cooked: Vec<String>,
    raw: Vec<String>,
    values: Vec<Hole>,
}

impl SegmentBuilder {
    pub(crate) fn new(cooked: &str, raw: &str, capacity: usize) -> Self {
        let mut builder = Self {
            cooked: Vec::with_capacity(capacity + 1),
            raw: Vec::with_capacity(capacity + 1),
            values: Vec::with_capacity(capacity),
        };
        builder.cooked.push(cooked.to_string());
        builder.raw.push(raw.to_string());
        builder
    }

    pub(crate) fn fuse_text(&mut self, cooked: &str, raw: &str) {
        // Both vectors start with one segment and only ever grow.
        if let (Some(c), Some(r)) = (self.cooked.last_mut(), self.raw.last_mut()) {
            c.push_str(cooked);
            r.push_str(raw);
        }
    }

    /// Quoted values land in both cooked and raw text as their string form.
    pub(crate) fn fuse_literal(&mut self, value: &Value) {
        let text = value.to_string();
        self.fuse_text(&text, &text);
    }

    pub(crate) fn push_hole(&mut self, hole: Hole) {
        self.values.push(hole);
        self.cooked.push(String::new());
        self.raw.push(String::new());
    }

    /// Splices an already reduced model at the cursor: its first segment
    /// fuses onto the open segment, its last stays open for the right
    /// boundary, interior segments and values go in between.
    pub(crate) fn splice(&mut self, nested: &Segments) {
        self.fuse_text(&nested.cooked[0], &nested.raw[0]);
        for (i, hole) in nested.values.iter().enumerate() {
            self.push_hole(hole.clone());
            self.fuse_text(&nested.cooked[i + 1], &nested.raw[i + 1]);
        }
    }

    pub(crate) fn finish(self) -> Segments {
        Segments {
            cooked: self.cooked,
            raw: self.raw,
            values: self.values,
            reduced: true,
        }
    }
}

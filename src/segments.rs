use std::ops::Deref;

use crate::concat::stringify;
use crate::error::{QqError, QqResult};
use crate::hole::Hole;
use crate::value::Value;

/// Literal segments in both cooked and raw form.
///
/// Dereferences to the cooked segments; the raw segments ride along as a
/// sidecar, the way a tag function receives them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateStrings {
    cooked: Vec<String>,
    raw: Vec<String>,
}

impl TemplateStrings {
    pub fn new<C, R>(cooked: C, raw: R) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            cooked: cooked.into_iter().map(Into::into).collect(),
            raw: raw.into_iter().map(Into::into).collect(),
        }
    }

    /// Segments without escapes, where raw and cooked text coincide.
    pub fn from_cooked<C>(cooked: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let cooked: Vec<String> = cooked.into_iter().map(Into::into).collect();
        Self {
            raw: cooked.clone(),
            cooked,
        }
    }

    pub fn cooked(&self) -> &[String] {
        &self.cooked
    }

    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.cooked, self.raw)
    }
}

impl Deref for TemplateStrings {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.cooked
    }
}

/// The form handed to a tag-style consumer: segments plus positional values.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    pub strings: TemplateStrings,
    pub values: Vec<Value>,
}

impl Tagged {
    pub fn stringify(&self) -> String {
        stringify(&self.strings, &self.values)
    }
}

/// Segment model shared by every quasiquotation.
///
/// `cooked.len() == raw.len() == values.len() + 1` always holds.
#[derive(Debug, Clone)]
pub(crate) struct Segments {
    pub(crate) cooked: Vec<String>,
    pub(crate) raw: Vec<String>,
    pub(crate) values: Vec<Hole>,
    pub(crate) reduced: bool,
}

impl Segments {
    pub(crate) fn new(strings: TemplateStrings, values: Vec<Hole>) -> QqResult<Self> {
        let (cooked, raw) = strings.into_parts();
        if cooked.is_empty() || cooked.len() != raw.len() || cooked.len() != values.len() + 1 {
            return Err(QqError::Arity {
                cooked: cooked.len(),
                raw: raw.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            cooked,
            raw,
            values,
            reduced: false,
        })
    }

    pub(crate) fn empty() -> Self {
        Self {
            cooked: vec![String::new()],
            raw: vec![String::new()],
            values: vec![],
            reduced: true,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cooked.len() == 1 && self.cooked[0].is_empty()
    }

    /// Fuses `a`'s last segment, `separator` and `b`'s first segment.
    /// The result is left unreduced.
    pub(crate) fn join(separator: &str, a: &Segments, b: &Segments) -> Self {
        Self {
            cooked: join_strings(separator, &a.cooked, &b.cooked),
            raw: join_strings(separator, &a.raw, &b.raw),
            values: a.values.iter().chain(b.values.iter()).cloned().collect(),
            reduced: false,
        }
    }

    pub(crate) fn to_tagged(&self) -> QqResult<Tagged> {
        let values = self
            .values
            .iter()
            .map(|hole| {
                hole.as_opaque().cloned().ok_or_else(|| {
                    QqError::internal(format!("{} hole left after reduction", hole.kind()))
                })
            })
            .collect::<QqResult<Vec<_>>>()?;
        Ok(Tagged {
            strings: TemplateStrings {
                cooked: self.cooked.clone(),
                raw: self.raw.clone(),
            },
            values,
        })
    }
}

fn join_strings(separator: &str, left: &[String], right: &[String]) -> Vec<String> {
    let (left_last, left_init) = match left.split_last() {
        Some(parts) => parts,
        None => return right.to_vec(),
    };
    let (right_first, right_rest) = match right.split_first() {
        Some(parts) => parts,
        None => return left.to_vec(),
    };
    let mut joined = Vec::with_capacity(left.len() + right.len() - 1);
    joined.extend_from_slice(left_init);
    joined.push(format!("{}{}{}", left_last, separator, right_first));
    joined.extend_from_slice(right_rest);
    joined
}

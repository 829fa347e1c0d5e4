use crate::quasiquote::QuasiQuote;
use crate::value::Value;

/// Folds [`QuasiQuote::join`] left to right. An empty list gives
/// [`QuasiQuote::empty`].
pub fn concat<I>(separator: &str, quotes: I) -> QuasiQuote
where
    I: IntoIterator<Item = QuasiQuote>,
{
    let mut quotes = quotes.into_iter();
    match quotes.next() {
        Some(first) => quotes.fold(first, |acc, q| QuasiQuote::join(separator, &acc, &q)),
        None => QuasiQuote::empty(),
    }
}

/// Interleaves segments and values into one string.
///
/// Meant for a fully reduced export: each value is written with its
/// `Display` form. Segments beyond `values.len() + 1` are ignored.
pub fn stringify(segments: &[String], values: &[Value]) -> String {
    let mut out = segments.first().cloned().unwrap_or_default();
    for (value, segment) in values.iter().zip(segments.iter().skip(1)) {
        out.push_str(&value.to_string());
        out.push_str(segment);
    }
    out
}

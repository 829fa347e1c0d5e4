use pretty_assertions::assert_eq;
use qqtag::{Hole, QuasiQuote, Tagged, TemplateStrings, Value};

pub mod async_test;

/// Template without escapes: raw text equals cooked text.
pub fn qq<const N: usize>(strings: [&str; N], values: Vec<Hole>) -> QuasiQuote {
    QuasiQuote::new(TemplateStrings::from_cooked(strings), values).unwrap()
}

/// Template whose raw text differs from its cooked text.
pub fn qq_raw<const N: usize>(cooked: [&str; N], raw: [&str; N], values: Vec<Hole>) -> QuasiQuote {
    QuasiQuote::new(TemplateStrings::new(cooked, raw), values).unwrap()
}

pub fn assert_tagged(tagged: &Tagged, cooked: &[&str], raw: &[&str], values: &[Value]) {
    assert_eq!(tagged.strings.cooked(), cooked);
    assert_eq!(tagged.strings.raw(), raw);
    assert_eq!(tagged.values, values);
}

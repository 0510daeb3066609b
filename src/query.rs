//! Query-string parsing and encoding.

use std::borrow::Cow;
use std::collections::BTreeMap;

/// A parsed query value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// Key without a value (`?flag`).
    Flag,
    /// Single value.
    Scalar(String),
    /// Repeated `key[]=` values.
    List(Vec<String>),
}

impl QueryValue {
    /// Whether the value is dropped by `skip_empty` parsing.
    fn is_empty(&self) -> bool {
        match self {
            Self::Flag => true,
            Self::Scalar(value) => value.is_empty(),
            Self::List(values) => values.is_empty(),
        }
    }
}

/// Parse a query string (without the leading `?`).
///
/// `key[]=` components accumulate into lists; a list left with a single
/// element collapses back to a scalar. With `skip_empty`, flags and empty
/// scalars are dropped from the result. Components that are not `key` or
/// `key=value` shaped are ignored.
#[must_use]
pub fn parse(query: &str, skip_empty: bool) -> BTreeMap<String, QueryValue> {
    let mut result: BTreeMap<String, QueryValue> = BTreeMap::new();

    for component in query.split('&') {
        let parts: Vec<&str> = component.split('=').collect();
        match *parts.as_slice() {
            [key] if !key.is_empty() => {
                result.insert(decode(key), QueryValue::Flag);
            }
            [key, value] => {
                let key = decode(key);
                let value = decode(value);
                match list_key(&key) {
                    Some(key) => push_list_value(&mut result, key, value),
                    None => {
                        result.insert(key, QueryValue::Scalar(value));
                    }
                }
            }
            _ => {}
        }
    }

    // 1要素のリストはスカラーに畳む
    for value in result.values_mut() {
        if let QueryValue::List(values) = value
            && values.len() == 1
            && let Some(only) = values.pop()
        {
            *value = QueryValue::Scalar(only);
        }
    }

    if skip_empty {
        result.retain(|_, value| !value.is_empty());
    }

    result
}

/// Encode a query map back into a `&`-joined string.
///
/// List values repeat their key with the `[]` suffix; flags encode as a bare
/// key.
#[must_use]
pub fn encode(query: &BTreeMap<String, QueryValue>) -> String {
    let mut pairs: Vec<String> = Vec::new();
    for (key, value) in query {
        let key = urlencoding::encode(key);
        match value {
            QueryValue::Flag => pairs.push(key.into_owned()),
            QueryValue::Scalar(value) => {
                pairs.push(format!("{key}={}", urlencoding::encode(value)));
            }
            QueryValue::List(values) => {
                for value in values {
                    pairs.push(format!("{key}[]={}", urlencoding::encode(value)));
                }
            }
        }
    }
    pairs.join("&")
}

/// Strip the list marker from a key: `tags[]` → `tags`. A leading marker is
/// not a list key.
fn list_key(key: &str) -> Option<String> {
    key.find("[]").filter(|pos| *pos > 0).map(|_| key.replacen("[]", "", 1))
}

/// Append a value to a (possibly not yet listy) entry.
fn push_list_value(result: &mut BTreeMap<String, QueryValue>, key: String, value: String) {
    let entry = result.entry(key).or_insert_with(|| QueryValue::List(Vec::new()));
    match entry {
        QueryValue::List(values) => values.push(value),
        // A scalar seen earlier under the same key joins the list.
        QueryValue::Scalar(existing) => {
            let existing = std::mem::take(existing);
            *entry = QueryValue::List(vec![existing, value]);
        }
        QueryValue::Flag => {
            *entry = QueryValue::List(vec![value]);
        }
    }
}

/// Percent-decode a component, with `+` as space. Undecodable input is kept
/// as is.
fn decode(component: &str) -> String {
    let component = component.replace('+', " ");
    let decoded = urlencoding::decode(&component).map(Cow::into_owned).ok();
    decoded.unwrap_or(component)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[googletest::test]
    fn parses_scalars() {
        let result = parse("a=1&b=two", true);

        expect_that!(result.get("a"), some(eq(&QueryValue::Scalar("1".to_string()))));
        expect_that!(result.get("b"), some(eq(&QueryValue::Scalar("two".to_string()))));
    }

    #[googletest::test]
    fn parses_lists() {
        let result = parse("tags[]=a&tags[]=b", true);

        expect_that!(
            result.get("tags"),
            some(eq(&QueryValue::List(vec!["a".to_string(), "b".to_string()])))
        );
    }

    #[googletest::test]
    fn single_element_list_collapses_to_scalar() {
        let result = parse("tags[]=a", true);

        expect_that!(result.get("tags"), some(eq(&QueryValue::Scalar("a".to_string()))));
    }

    #[googletest::test]
    fn flag_without_value() {
        let result = parse("debug&a=1", false);

        expect_that!(result.get("debug"), some(eq(&QueryValue::Flag)));
    }

    #[googletest::test]
    fn skip_empty_drops_flags_and_empty_scalars() {
        let result = parse("debug&a=&b=1", true);

        expect_that!(result.get("debug"), none());
        expect_that!(result.get("a"), none());
        expect_that!(result.get("b"), some(eq(&QueryValue::Scalar("1".to_string()))));
    }

    #[googletest::test]
    fn decodes_percent_escapes_and_plus() {
        let result = parse("greeting=hello+world&name=J%C3%BCrgen", true);

        expect_that!(
            result.get("greeting"),
            some(eq(&QueryValue::Scalar("hello world".to_string())))
        );
        expect_that!(result.get("name"), some(eq(&QueryValue::Scalar("Jürgen".to_string()))));
    }

    #[rstest]
    #[case("")]
    #[case("&&&")]
    #[case("a=b=c")]
    fn malformed_components_are_ignored(#[case] query: &str) {
        assert_that!(parse(query, false), len(eq(0)));
    }

    #[googletest::test]
    fn encode_scalars_and_flags() {
        let mut query = BTreeMap::new();
        query.insert("a".to_string(), QueryValue::Scalar("1 2".to_string()));
        query.insert("debug".to_string(), QueryValue::Flag);

        expect_that!(encode(&query), eq("a=1%202&debug"));
    }

    #[googletest::test]
    fn encode_lists_repeat_the_key() {
        let mut query = BTreeMap::new();
        query
            .insert("tags".to_string(), QueryValue::List(vec!["a".to_string(), "b".to_string()]));

        expect_that!(encode(&query), eq("tags[]=a&tags[]=b"));
    }

    #[googletest::test]
    fn parse_then_encode_round_trips() {
        let parsed = parse("a=1&tags[]=x&tags[]=y", true);

        expect_that!(encode(&parsed), eq("a=1&tags[]=x&tags[]=y"));
    }
}

//! Rule identity
//!
//! A rule's identity is its text with the `important` token hidden from the
//! modifier clause. `||ads.example^` and `||ads.example^$important` therefore
//! share the base key `||ads.example^`, while `||ads.example^$script` keeps
//! its own identity. Nothing else in the line is normalized.

use std::borrow::Cow;

use crate::types::{MODIFIER_DELIMITER, MODIFIER_SEPARATOR, PRIORITY_TOKEN};

/// Compute the base key of a rule line.
///
/// Borrows the input when the line carries no priority token, which is the
/// common case for every list.
pub fn base_key(line: &str) -> Cow<'_, str> {
    if !line.contains(PRIORITY_TOKEN) {
        return Cow::Borrowed(line);
    }

    let (pattern, options) = match split_rule_options(line) {
        (pattern, Some(options)) => (pattern, options),
        (_, None) => return Cow::Borrowed(line),
    };

    let tokens: Vec<&str> = options.split(MODIFIER_DELIMITER).map(str::trim).collect();
    if !tokens.iter().any(|token| *token == PRIORITY_TOKEN) {
        return Cow::Borrowed(line);
    }

    let remaining: Vec<&str> = tokens
        .into_iter()
        .filter(|token| *token != PRIORITY_TOKEN)
        .collect();

    if remaining.is_empty() {
        return Cow::Owned(pattern.to_string());
    }

    let mut key = String::with_capacity(line.len());
    key.push_str(pattern);
    key.push(MODIFIER_SEPARATOR);
    key.push_str(&remaining.join(","));
    Cow::Owned(key)
}

/// True when the line differs from its own base key.
#[inline]
pub fn has_priority_flag(line: &str) -> bool {
    base_key(line) != line
}

/// A rule line together with its derived identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleLine<'a> {
    pub raw: &'a str,
    pub key: Cow<'a, str>,
}

impl<'a> RuleLine<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            key: base_key(raw),
        }
    }

    #[inline]
    pub fn has_priority_flag(&self) -> bool {
        self.key != self.raw
    }
}

fn split_rule_options(line: &str) -> (&str, Option<&str>) {
    match line.find(MODIFIER_SEPARATOR) {
        Some(pos) => (&line[..pos], Some(&line[pos + 1..])),
        None => (line, None),
    }
}

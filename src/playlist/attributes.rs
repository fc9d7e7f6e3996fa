//! Attribute list codec
//!
//! Tag bodies such as `TYPE=AUDIO,GROUP-ID="aac",NAME="English"` are
//! comma-separated `NAME=VALUE` pairs. Commas inside double quotes belong to
//! the value (`CODECS="avc1.4d001f,mp4a.40.2"`).

use std::fmt;

use crate::error::AttributeError;

/// A decoded attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Was written between double quotes; the quotes are stripped.
    Quoted(String),
    /// Bare value: numbers, resolutions, enumerated strings.
    Enumerated(String),
}

impl AttributeValue {
    pub fn as_str(&self) -> &str {
        match self {
            AttributeValue::Quoted(s) | AttributeValue::Enumerated(s) => s,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AttributeValue::Quoted(s) => write!(f, "\"{}\"", s),
            AttributeValue::Enumerated(s) => f.write_str(s),
        }
    }
}

/// Decoded attribute list, in the order the attributes appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList {
    pairs: Vec<(String, AttributeValue)>,
}

impl AttributeList {
    /// Decode a tag body.
    pub fn parse(body: &str) -> Result<Self, AttributeError> {
        let mut pairs = Vec::new();
        if body.is_empty() {
            return Ok(Self { pairs });
        }
        for token in split_unquoted_commas(body)? {
            let (name, raw) = token
                .split_once('=')
                .ok_or_else(|| AttributeError::MissingEquals(token.to_string()))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(AttributeError::MissingEquals(token.to_string()));
            }
            pairs.push((name.to_string(), decode_value(raw)?));
        }
        Ok(Self { pairs })
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).map(AttributeValue::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.pairs.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn split_unquoted_commas(body: &str) -> Result<Vec<&str>, AttributeError> {
    let mut tokens = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (idx, ch) in body.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                tokens.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if in_quotes {
        return Err(AttributeError::UnterminatedQuote);
    }
    tokens.push(&body[start..]);
    Ok(tokens)
}

fn decode_value(raw: &str) -> Result<AttributeValue, AttributeError> {
    match raw.strip_prefix('"') {
        Some(rest) => match rest.strip_suffix('"') {
            Some(inner) if !inner.contains('"') => Ok(AttributeValue::Quoted(inner.to_string())),
            _ => Err(AttributeError::UnterminatedQuote),
        },
        None => Ok(AttributeValue::Enumerated(raw.to_string())),
    }
}

/// Encodes an attribute list in call order. Absent values are skipped
/// entirely, so the order of calls is the canonical attribute order.
#[derive(Debug, Default)]
pub struct AttributeWriter {
    out: String,
}

impl AttributeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `NAME="value"`
    pub fn quoted(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.push(name, format_args!("\"{}\"", v)),
            None => self,
        }
    }

    /// `NAME=value`
    pub fn enumerated<T: fmt::Display>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.push(name, format_args!("{}", v)),
            None => self,
        }
    }

    /// Write whatever representation the value carries.
    pub fn value(self, name: &str, value: Option<&AttributeValue>) -> Self {
        self.enumerated(name, value)
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn push(mut self, name: &str, value: fmt::Arguments<'_>) -> Self {
        if !self.out.is_empty() {
            self.out.push(',');
        }
        self.out.push_str(&format!("{}={}", name, value));
        self
    }
}

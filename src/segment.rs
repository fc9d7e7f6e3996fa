//! Media playlist segments

use chrono::{DateTime, FixedOffset};

use crate::error::InvalidEntry;
use crate::types::{
    check_enumerated, check_quoted, check_uri_line, is_line_tail, join_uri, ByteRange,
};

/// `#EXT-X-KEY` attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// `NONE`, `AES-128`, `SAMPLE-AES`, ...
    pub method: String,
    pub uri: Option<String>,
    pub iv: Option<String>,
    pub keyformat: Option<String>,
    pub keyformatversions: Option<String>,
}

impl Key {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: None,
            iv: None,
            keyformat: None,
            keyformatversions: None,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidEntry> {
        check_enumerated("METHOD", Some(self.method.as_str()))?;
        check_quoted("URI", self.uri.as_deref())?;
        check_enumerated("IV", self.iv.as_deref())?;
        check_quoted("KEYFORMAT", self.keyformat.as_deref())?;
        check_quoted("KEYFORMATVERSIONS", self.keyformatversions.as_deref())
    }
}

/// One segment: the URI line and the tags that precede it.
#[derive(Debug, Clone, Default)]
pub struct Segment {
    pub uri: String,
    pub base_uri: Option<String>,
    /// `#EXTINF` duration in seconds.
    pub duration: Option<f64>,
    /// `#EXTINF` title.
    pub title: Option<String>,
    pub key: Option<Key>,
    pub discontinuity: bool,
    pub byterange: Option<ByteRange>,
    pub program_date_time: Option<DateTime<FixedOffset>>,
}

impl Segment {
    pub fn new(uri: impl Into<String>, base_uri: Option<&str>) -> Self {
        Self {
            uri: uri.into(),
            base_uri: base_uri.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn absolute_uri(&self) -> String {
        join_uri(self.base_uri.as_deref(), &self.uri)
    }

    /// Check that the segment can be written and read back unchanged.
    ///
    /// A title is only written as part of `#EXTINF`, so it needs a duration.
    pub fn validate(&self) -> Result<(), InvalidEntry> {
        check_uri_line(&self.uri)?;
        if let Some(title) = &self.title {
            if self.duration.is_none() {
                return Err(InvalidEntry::TitleWithoutDuration(self.uri.clone()));
            }
            if !is_line_tail(title) {
                return Err(InvalidEntry::UnwritableLine {
                    field: "EXTINF",
                    value: title.clone(),
                });
            }
        }
        match &self.key {
            Some(key) => key.validate(),
            None => Ok(()),
        }
    }

    /// Key URI resolved against the segment's base URI.
    pub fn key_uri(&self) -> Option<String> {
        let key_uri = self.key.as_ref()?.uri.as_deref()?;
        Some(join_uri(self.base_uri.as_deref(), key_uri))
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
            && self.duration == other.duration
            && self.title == other.title
            && self.key == other.key
            && self.discontinuity == other.discontinuity
            && self.byterange == other.byterange
            && self.program_date_time == other.program_date_time
    }
}

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{InvalidEntry, InvalidValue};

/// Video resolution, written as `<width>x<height>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = regex!(r"^(\d+)x(\d+)$")
            .captures(s)
            .ok_or_else(|| InvalidValue(s.to_string()))?;
        let dim = |i: usize| caps[i].parse::<u32>().map_err(|_| InvalidValue(s.to_string()));
        Ok(Resolution {
            width: dim(1)?,
            height: dim(2)?,
        })
    }
}

/// Sub-range of a resource, `<length>[@<offset>]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    pub length: u64,
    pub offset: Option<u64>,
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.length)?;
        if let Some(offset) = self.offset {
            write!(f, "@{}", offset)?;
        }
        Ok(())
    }
}

impl FromStr for ByteRange {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = regex!(r"^(\d+)(?:@(\d+))?$")
            .captures(s)
            .ok_or_else(|| InvalidValue(s.to_string()))?;
        let number = |m: &str| m.parse::<u64>().map_err(|_| InvalidValue(s.to_string()));
        Ok(ByteRange {
            length: number(&caps[1])?,
            offset: caps.get(2).map(|m| number(m.as_str())).transpose()?,
        })
    }
}

/// Value of `#EXT-X-PLAYLIST-TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaylistType {
    Vod,
    Event,
}

impl PlaylistType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaylistType::Vod => "VOD",
            PlaylistType::Event => "EVENT",
        }
    }
}

impl fmt::Display for PlaylistType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaylistType {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VOD" => Ok(PlaylistType::Vod),
            "EVENT" => Ok(PlaylistType::Event),
            _ => Err(InvalidValue(s.to_string())),
        }
    }
}

/// Whether `value` can sit between the double quotes of a quoted-string
/// attribute.
pub(crate) fn is_quotable(value: &str) -> bool {
    !value.contains(['"', '\r', '\n'])
}

/// Whether `value` can be written as a bare enumerated attribute value.
pub(crate) fn is_enumerable(value: &str) -> bool {
    !value.is_empty() && !value.contains([',', '"', '\r', '\n'])
}

/// Whether `value` survives being written as the end of a manifest line.
/// Lines are trimmed on input and split on line breaks.
pub(crate) fn is_line_tail(value: &str) -> bool {
    !value.contains(['\r', '\n']) && value.trim_end() == value
}

/// Whether `value` reads back as a URI line rather than a blank line, a
/// comment or a tag.
pub(crate) fn is_uri_line(value: &str) -> bool {
    is_line_tail(value) && value.trim_start() == value && !value.is_empty() && !value.starts_with('#')
}

pub(crate) fn check_quoted(field: &'static str, value: Option<&str>) -> Result<(), InvalidEntry> {
    match value {
        Some(v) if !is_quotable(v) => Err(InvalidEntry::UnquotableValue {
            field,
            value: v.to_string(),
        }),
        _ => Ok(()),
    }
}

pub(crate) fn check_enumerated(
    field: &'static str,
    value: Option<&str>,
) -> Result<(), InvalidEntry> {
    match value {
        Some(v) if !is_enumerable(v) => Err(InvalidEntry::InvalidEnumerated {
            field,
            value: v.to_string(),
        }),
        _ => Ok(()),
    }
}

pub(crate) fn check_uri_line(uri: &str) -> Result<(), InvalidEntry> {
    if is_uri_line(uri) {
        Ok(())
    } else {
        Err(InvalidEntry::UnwritableLine {
            field: "URI",
            value: uri.to_string(),
        })
    }
}

/// Resolve `uri` against `base_uri` the way a browser resolves a link
/// (RFC 3986).
///
/// Without a usable base the URI is returned unchanged.
pub(crate) fn join_uri(base_uri: Option<&str>, uri: &str) -> String {
    let Some(base) = base_uri.filter(|b| !b.is_empty()) else {
        return uri.to_string();
    };
    match Url::parse(base).and_then(|base| base.join(uri)) {
        Ok(url) => url.into(),
        Err(err) => {
            tracing::debug!("Cannot resolve {} against {}: {}", uri, base, err);
            uri.to_string()
        }
    }
}

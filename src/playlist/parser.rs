//! M3U8 parser
//!
//! A single pass over the manifest, one line at a time:
//! - `#EXT-X-MEDIA` and the header tags take effect immediately
//! - `#EXT-X-STREAM-INF` waits for the URI line that follows it
//! - segment tags (`#EXTINF`, `#EXT-X-KEY`, ...) are buffered until the next
//!   URI line, which turns them into one [`Segment`]

use std::str::FromStr;

use chrono::DateTime;

use super::attributes::AttributeList;
use crate::config::{ParserConfig, UnknownAttributePolicy, UnknownTagPolicy};
use crate::error::{ParseError, ParseErrorKind};
use crate::m3u8::M3u8;
use crate::media::Media;
use crate::media_list::MergePolicy;
use crate::segment::{Key, Segment};
use crate::stream::{IFramePlaylist, IFrameStreamInfo, Playlist, StreamInfo};
use crate::types::ByteRange;

const MEDIA_ATTRIBUTES: &[&str] = &[
    "URI",
    "TYPE",
    "GROUP-ID",
    "LANGUAGE",
    "ASSOC-LANGUAGE",
    "NAME",
    "DEFAULT",
    "AUTOSELECT",
    "FORCED",
    "INSTREAM-ID",
    "CHARACTERISTICS",
];

const STREAM_INF_ATTRIBUTES: &[&str] = &[
    "PROGRAM-ID",
    "BANDWIDTH",
    "AVERAGE-BANDWIDTH",
    "RESOLUTION",
    "CODECS",
    "FRAME-RATE",
    "AUDIO",
    "VIDEO",
    "SUBTITLES",
    "CLOSED-CAPTIONS",
];

const IFRAME_STREAM_INF_ATTRIBUTES: &[&str] = &[
    "PROGRAM-ID",
    "BANDWIDTH",
    "AVERAGE-BANDWIDTH",
    "RESOLUTION",
    "CODECS",
    "URI",
];

const KEY_ATTRIBUTES: &[&str] = &["METHOD", "URI", "IV", "KEYFORMAT", "KEYFORMATVERSIONS"];

/// Classified manifest line.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Blank,
    Header,
    Tag { name: &'a str, value: Option<&'a str> },
    Comment,
    Uri(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let line = line.trim();
    if line.is_empty() {
        Line::Blank
    } else if line == "#EXTM3U" {
        Line::Header
    } else if line.starts_with("#EXT") {
        let tag = &line[1..];
        match tag.split_once(':') {
            Some((name, value)) => Line::Tag {
                name,
                value: Some(value),
            },
            None => Line::Tag {
                name: tag,
                value: None,
            },
        }
    } else if line.starts_with('#') {
        Line::Comment
    } else {
        Line::Uri(line)
    }
}

/// Segment tags seen since the last URI line.
#[derive(Debug, Default)]
struct PendingSegment {
    duration: Option<f64>,
    title: Option<String>,
    key: Option<Key>,
    discontinuity: bool,
    byterange: Option<ByteRange>,
    program_date_time: Option<chrono::DateTime<chrono::FixedOffset>>,
}

impl PendingSegment {
    fn into_segment(self, uri: &str, base_uri: Option<&str>) -> Segment {
        Segment {
            duration: self.duration,
            title: self.title,
            key: self.key,
            discontinuity: self.discontinuity,
            byterange: self.byterange,
            program_date_time: self.program_date_time,
            ..Segment::new(uri, base_uri)
        }
    }
}

/// Segment buffering state: idle until a segment tag arrives, then
/// accumulating until the next URI line.
#[derive(Debug, Default)]
struct SegmentState(Option<PendingSegment>);

impl SegmentState {
    fn pending(&mut self) -> &mut PendingSegment {
        self.0.get_or_insert_with(PendingSegment::default)
    }

    /// Take everything buffered and go back to idle.
    fn flush(&mut self) -> Option<PendingSegment> {
        self.0.take()
    }
}

/// A tag line with its attribute list decoded.
struct TagAttributes<'a> {
    line: usize,
    tag: &'a str,
    attrs: AttributeList,
}

impl<'a> TagAttributes<'a> {
    fn decode(
        line: usize,
        tag: &'a str,
        value: Option<&str>,
        known: &[&str],
        policy: UnknownAttributePolicy,
    ) -> Result<Self, ParseError> {
        let attrs = AttributeList::parse(value.unwrap_or_default())
            .map_err(|e| ParseError::new(line, Some(tag), e))?;
        let decoded = Self { line, tag, attrs };
        if let Some(unknown) = decoded.attrs.names().find(|n| !known.contains(n)) {
            match policy {
                UnknownAttributePolicy::Reject => {
                    return Err(decoded.error(ParseErrorKind::UnknownAttribute(unknown.to_string())));
                }
                UnknownAttributePolicy::Ignore => {
                    tracing::debug!("Ignoring unknown attribute {} on line {}", unknown, line);
                }
            }
        }
        Ok(decoded)
    }

    fn error(&self, kind: impl Into<ParseErrorKind>) -> ParseError {
        ParseError::new(self.line, Some(self.tag), kind)
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get_str(name)
    }

    fn required(&self, name: &'static str) -> Result<&str, ParseError> {
        self.get(name)
            .ok_or_else(|| self.error(ParseErrorKind::MissingAttribute(name)))
    }

    fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, ParseError> {
        self.get(name)
            .map(|value| {
                value.parse().map_err(|_| {
                    self.error(ParseErrorKind::InvalidAttribute {
                        name: name.to_string(),
                        value: value.to_string(),
                    })
                })
            })
            .transpose()
    }

    fn parse_required<T: FromStr>(&self, name: &'static str) -> Result<T, ParseError> {
        self.required(name)?;
        self.parse(name)?
            .ok_or_else(|| self.error(ParseErrorKind::MissingAttribute(name)))
    }

    fn string(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }
}

struct Parser<'c> {
    config: &'c ParserConfig,
    m3u8: M3u8,
    segment: SegmentState,
    /// `#EXT-X-STREAM-INF` waiting for its URI line, with its line number.
    pending_variant: Option<(usize, StreamInfo)>,
}

/// Parse manifest text.
pub(crate) fn parse(text: &str, config: &ParserConfig) -> Result<M3u8, ParseError> {
    let mut parser = Parser {
        config,
        m3u8: M3u8::new(),
        segment: SegmentState::default(),
        pending_variant: None,
    };
    for (idx, line) in text.lines().enumerate() {
        parser.line(idx + 1, line)?;
    }
    parser.finish()
}

impl<'c> Parser<'c> {
    fn base_uri(&self) -> Option<&str> {
        self.config.base_uri.as_deref()
    }

    fn line(&mut self, lineno: usize, raw: &str) -> Result<(), ParseError> {
        match classify(raw) {
            Line::Blank | Line::Comment | Line::Header => Ok(()),
            Line::Uri(uri) => self.uri(lineno, uri),
            Line::Tag { name, value } => {
                if let Some((variant_line, _)) = &self.pending_variant {
                    return Err(ParseError::new(
                        *variant_line,
                        Some("EXT-X-STREAM-INF"),
                        ParseErrorKind::MissingUri,
                    ));
                }
                self.tag(lineno, raw.trim(), name, value)
            }
        }
    }

    fn uri(&mut self, lineno: usize, uri: &str) -> Result<(), ParseError> {
        if let Some((variant_line, stream_info)) = self.pending_variant.take() {
            tracing::debug!("Variant stream {} ({} bps)", uri, stream_info.bandwidth);
            let mut playlist = Playlist::new(uri, stream_info);
            playlist.base_uri = self.config.base_uri.clone();
            return self
                .m3u8
                .add_playlist(playlist)
                .map_err(|e| ParseError::new(variant_line, Some("EXT-X-STREAM-INF"), e));
        }
        let segment = self
            .segment
            .flush()
            .unwrap_or_default()
            .into_segment(uri, self.base_uri());
        tracing::trace!("Segment {} ({:?}s)", uri, segment.duration);
        self.m3u8
            .add_segment(segment)
            .map_err(|e| ParseError::new(lineno, None, e))
    }

    fn tag(
        &mut self,
        lineno: usize,
        raw: &str,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), ParseError> {
        let policy = self.config.unknown_attributes;
        match name {
            "EXT-X-VERSION" => self.m3u8.version = Some(scalar(lineno, name, value)?),
            "EXT-X-TARGETDURATION" => self.m3u8.target_duration = Some(scalar(lineno, name, value)?),
            "EXT-X-MEDIA-SEQUENCE" => self.m3u8.media_sequence = Some(scalar(lineno, name, value)?),
            "EXT-X-PLAYLIST-TYPE" => self.m3u8.playlist_type = Some(scalar(lineno, name, value)?),
            "EXT-X-INDEPENDENT-SEGMENTS" => self.m3u8.independent_segments = true,
            "EXT-X-I-FRAMES-ONLY" => self.m3u8.iframes_only = true,
            "EXT-X-ENDLIST" => self.m3u8.endlist = true,
            "EXT-X-MEDIA" => {
                let tag = TagAttributes::decode(lineno, name, value, MEDIA_ATTRIBUTES, policy)?;
                let media = media_from(&tag)?;
                if !self.m3u8.add_media(media, MergePolicy::KeepExisting) {
                    tracing::warn!(
                        "Duplicate rendition on line {}, keeping the first one",
                        lineno
                    );
                }
            }
            "EXT-X-STREAM-INF" => {
                let tag = TagAttributes::decode(lineno, name, value, STREAM_INF_ATTRIBUTES, policy)?;
                self.pending_variant = Some((lineno, stream_info_from(&tag)?));
            }
            "EXT-X-I-FRAME-STREAM-INF" => {
                let tag =
                    TagAttributes::decode(lineno, name, value, IFRAME_STREAM_INF_ATTRIBUTES, policy)?;
                let info = IFrameStreamInfo {
                    bandwidth: tag.parse_required("BANDWIDTH")?,
                    program_id: tag.parse("PROGRAM-ID")?,
                    average_bandwidth: tag.parse("AVERAGE-BANDWIDTH")?,
                    codecs: tag.string("CODECS"),
                    resolution: tag.parse("RESOLUTION")?,
                };
                let mut playlist = IFramePlaylist::new(tag.required("URI")?, info);
                playlist.base_uri = self.config.base_uri.clone();
                tracing::debug!("I-frame stream {}", playlist.uri);
                self.m3u8
                    .add_iframe_playlist(playlist)
                    .map_err(|e| tag.error(e))?;
            }
            "EXTINF" => {
                let value = value.unwrap_or_default();
                let (duration, title) = value.split_once(',').unwrap_or((value, ""));
                let duration = duration
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| invalid_value(lineno, name, value))?;
                let pending = self.segment.pending();
                pending.duration = Some(duration);
                pending.title = Some(title.to_string()).filter(|t| !t.is_empty());
            }
            "EXT-X-KEY" => {
                let tag = TagAttributes::decode(lineno, name, value, KEY_ATTRIBUTES, policy)?;
                let key = Key {
                    method: tag.required("METHOD")?.to_string(),
                    uri: tag.string("URI"),
                    iv: tag.string("IV"),
                    keyformat: tag.string("KEYFORMAT"),
                    keyformatversions: tag.string("KEYFORMATVERSIONS"),
                };
                self.segment.pending().key = Some(key);
            }
            "EXT-X-DISCONTINUITY" => self.segment.pending().discontinuity = true,
            "EXT-X-BYTERANGE" => {
                self.segment.pending().byterange = Some(scalar(lineno, name, value)?);
            }
            "EXT-X-PROGRAM-DATE-TIME" => {
                let value = value.unwrap_or_default();
                let timestamp = DateTime::parse_from_rfc3339(value)
                    .map_err(|_| invalid_value(lineno, name, value))?;
                self.segment.pending().program_date_time = Some(timestamp);
            }
            _ => self.unknown_tag(lineno, raw, name, value)?,
        }
        Ok(())
    }

    fn unknown_tag(
        &mut self,
        lineno: usize,
        raw: &str,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), ParseError> {
        // Bodies that look like attribute lists must at least decode.
        if let Some(body) = value.filter(|v| v.contains('=')) {
            AttributeList::parse(body).map_err(|e| ParseError::new(lineno, Some(name), e))?;
        }
        match self.config.unknown_tags {
            UnknownTagPolicy::Ignore => {
                tracing::warn!("Ignoring unknown tag #{} on line {}", name, lineno);
            }
            UnknownTagPolicy::Preserve => self.m3u8.push_unknown_tag(raw),
            UnknownTagPolicy::Reject => {
                return Err(ParseError::new(lineno, Some(name), ParseErrorKind::UnknownTag));
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<M3u8, ParseError> {
        if let Some((line, _)) = self.pending_variant {
            return Err(ParseError::new(
                line,
                Some("EXT-X-STREAM-INF"),
                ParseErrorKind::MissingUri,
            ));
        }
        if let Some(pending) = self.segment.flush() {
            tracing::warn!("Dropping segment tags with no URI line: {:?}", pending);
        }
        self.m3u8.link_media();
        self.m3u8.set_base_uri(self.config.base_uri.clone());
        tracing::debug!(
            "Parsed playlist: {} media, {} variants, {} i-frame variants, {} segments",
            self.m3u8.media().len(),
            self.m3u8.playlists().len(),
            self.m3u8.iframe_playlists().len(),
            self.m3u8.segments().len()
        );
        Ok(self.m3u8)
    }
}

fn invalid_value(line: usize, tag: &str, value: &str) -> ParseError {
    ParseError::new(line, Some(tag), ParseErrorKind::InvalidValue(value.to_string()))
}

/// Single-value tag body, e.g. `#EXT-X-VERSION:3`.
fn scalar<T: FromStr>(line: usize, tag: &str, value: Option<&str>) -> Result<T, ParseError> {
    let value = value.unwrap_or_default().trim();
    value.parse().map_err(|_| invalid_value(line, tag, value))
}

fn media_from(tag: &TagAttributes<'_>) -> Result<Media, ParseError> {
    let mut builder = Media::builder();
    macro_rules! attr {
        ($name:literal => $setter:ident) => {
            if let Some(v) = tag.get($name) {
                builder = builder.$setter(v);
            }
        };
    }
    attr!("TYPE" => media_type);
    attr!("GROUP-ID" => group_id);
    attr!("NAME" => name);
    attr!("URI" => uri);
    attr!("LANGUAGE" => language);
    attr!("ASSOC-LANGUAGE" => assoc_language);
    attr!("CHARACTERISTICS" => characteristics);
    attr!("DEFAULT" => default);
    attr!("AUTOSELECT" => autoselect);
    attr!("FORCED" => forced);
    attr!("INSTREAM-ID" => instream_id);
    builder.build().map_err(|e| tag.error(e))
}

fn stream_info_from(tag: &TagAttributes<'_>) -> Result<StreamInfo, ParseError> {
    Ok(StreamInfo {
        bandwidth: tag.parse_required("BANDWIDTH")?,
        program_id: tag.parse("PROGRAM-ID")?,
        average_bandwidth: tag.parse("AVERAGE-BANDWIDTH")?,
        codecs: tag.string("CODECS"),
        resolution: tag.parse("RESOLUTION")?,
        frame_rate: tag.parse("FRAME-RATE")?,
        audio: tag.string("AUDIO"),
        video: tag.string("VIDEO"),
        subtitles: tag.string("SUBTITLES"),
        closed_captions: tag.attrs.get("CLOSED-CAPTIONS").cloned(),
    })
}

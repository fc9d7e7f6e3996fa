//! Variant streams of a master playlist
//!
//! - [`Playlist`]: `#EXT-X-STREAM-INF` plus the URI line after it
//! - [`IFramePlaylist`]: `#EXT-X-I-FRAME-STREAM-INF`, URI carried inline

use crate::error::InvalidEntry;
use crate::media::{Media, MediaType};
use crate::playlist::attributes::AttributeValue;
use crate::types::{check_enumerated, check_quoted, check_uri_line, join_uri, Resolution};

/// Attributes of `#EXT-X-STREAM-INF`.
///
/// The group-id references (`audio`, `video`, `subtitles`,
/// `closed_captions`) name `#EXT-X-MEDIA` groups. `closed_captions` may also
/// be the enumerated `NONE`, which is not a group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamInfo {
    pub bandwidth: u64,
    pub program_id: Option<u64>,
    pub average_bandwidth: Option<u64>,
    pub codecs: Option<String>,
    pub resolution: Option<Resolution>,
    pub frame_rate: Option<f64>,
    pub audio: Option<String>,
    pub video: Option<String>,
    pub subtitles: Option<String>,
    pub closed_captions: Option<AttributeValue>,
}

impl StreamInfo {
    pub fn new(bandwidth: u64) -> Self {
        Self {
            bandwidth,
            ..Default::default()
        }
    }

    /// The group this variant references for a rendition type.
    pub fn group_for(&self, media_type: MediaType) -> Option<&str> {
        match media_type {
            MediaType::Audio => self.audio.as_deref(),
            MediaType::Video => self.video.as_deref(),
            MediaType::Subtitles => self.subtitles.as_deref(),
            MediaType::ClosedCaptions => match &self.closed_captions {
                Some(AttributeValue::Quoted(group)) => Some(group.as_str()),
                _ => None,
            },
        }
    }

    /// Check that every string attribute can be written and read back.
    pub fn validate(&self) -> Result<(), InvalidEntry> {
        check_quoted("CODECS", self.codecs.as_deref())?;
        check_quoted("AUDIO", self.audio.as_deref())?;
        check_quoted("VIDEO", self.video.as_deref())?;
        check_quoted("SUBTITLES", self.subtitles.as_deref())?;
        match &self.closed_captions {
            Some(AttributeValue::Quoted(group)) => {
                check_quoted("CLOSED-CAPTIONS", Some(group.as_str()))
            }
            Some(AttributeValue::Enumerated(value)) => {
                check_enumerated("CLOSED-CAPTIONS", Some(value.as_str()))
            }
            None => Ok(()),
        }
    }
}

/// One entry of a master playlist's variant list.
#[derive(Debug, Clone)]
pub struct Playlist {
    pub uri: String,
    pub stream_info: StreamInfo,
    /// Renditions referenced through the group-ids in `stream_info`.
    pub media: Vec<Media>,
    pub base_uri: Option<String>,
}

impl Playlist {
    pub fn new(uri: impl Into<String>, stream_info: StreamInfo) -> Self {
        Self {
            uri: uri.into(),
            stream_info,
            media: Vec::new(),
            base_uri: None,
        }
    }

    pub fn with_media(mut self, media: Vec<Media>) -> Self {
        self.media = media;
        self
    }

    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// `uri` resolved against `base_uri`.
    pub fn absolute_uri(&self) -> String {
        join_uri(self.base_uri.as_deref(), &self.uri)
    }

    pub fn validate(&self) -> Result<(), InvalidEntry> {
        check_uri_line(&self.uri)?;
        self.stream_info.validate()
    }

    /// Whether `media` belongs to one of the groups this variant references.
    pub fn references(&self, media: &Media) -> bool {
        self.stream_info.group_for(media.media_type()) == Some(media.group_id())
    }
}

// base_uri only matters for resolution, it is not part of the value.
impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && self.stream_info == other.stream_info && self.media == other.media
    }
}

/// Attributes of `#EXT-X-I-FRAME-STREAM-INF` other than URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IFrameStreamInfo {
    pub bandwidth: u64,
    pub program_id: Option<u64>,
    pub average_bandwidth: Option<u64>,
    pub codecs: Option<String>,
    pub resolution: Option<Resolution>,
}

impl IFrameStreamInfo {
    pub fn new(bandwidth: u64) -> Self {
        Self {
            bandwidth,
            ..Default::default()
        }
    }
}

/// An I-frame only variant.
#[derive(Debug, Clone)]
pub struct IFramePlaylist {
    pub uri: String,
    pub iframe_stream_info: IFrameStreamInfo,
    pub base_uri: Option<String>,
}

impl IFramePlaylist {
    pub fn new(uri: impl Into<String>, iframe_stream_info: IFrameStreamInfo) -> Self {
        Self {
            uri: uri.into(),
            iframe_stream_info,
            base_uri: None,
        }
    }

    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    pub fn absolute_uri(&self) -> String {
        join_uri(self.base_uri.as_deref(), &self.uri)
    }

    pub fn validate(&self) -> Result<(), InvalidEntry> {
        check_quoted("URI", Some(self.uri.as_str()))?;
        check_quoted("CODECS", self.iframe_stream_info.codecs.as_deref())
    }
}

impl PartialEq for IFramePlaylist {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && self.iframe_stream_info == other.iframe_stream_info
    }
}

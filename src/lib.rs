//! HLS playlist model, parser and serializer.
//!
//! This crate reads and writes M3U8 manifests:
//! - Master playlists with `#EXT-X-MEDIA` renditions, `#EXT-X-STREAM-INF`
//!   variants and `#EXT-X-I-FRAME-STREAM-INF` trick-play variants
//! - Media playlists with segments and their `#EXTINF`, `#EXT-X-KEY`,
//!   `#EXT-X-BYTERANGE`, `#EXT-X-DISCONTINUITY` and
//!   `#EXT-X-PROGRAM-DATE-TIME` annotations
//!
//! It never performs network or file I/O on manifests: text goes in through
//! [`M3u8::loads`] and comes out of [`M3u8::dumps`].
//!
//! ```
//! use hls_m3u8::{M3u8, MergePolicy, Media, Playlist, StreamInfo};
//!
//! let mut m3u8 = M3u8::new();
//! let subs = Media::builder()
//!     .media_type("SUBTITLES")
//!     .group_id("subs")
//!     .name("English")
//!     .uri("english_sub.m3u8")
//!     .build()
//!     .unwrap();
//! m3u8.add_media(subs, MergePolicy::KeepExisting);
//! m3u8.add_playlist(Playlist::new(
//!     "low.m3u8",
//!     StreamInfo {
//!         subtitles: Some("subs".to_string()),
//!         ..StreamInfo::new(1280000)
//!     },
//! )).unwrap();
//!
//! let text = m3u8.dumps();
//! assert_eq!(M3u8::loads(&text).unwrap().dumps(), text);
//! ```

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod m3u8;
pub(crate) mod media;
pub(crate) mod media_list;
pub(crate) mod playlist;
pub(crate) mod segment;
pub(crate) mod stream;
pub(crate) mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use config::{ParserConfig, UnknownAttributePolicy, UnknownTagPolicy};
pub use error::{
    AttributeError, Error, InvalidEntry, InvalidMedia, InvalidValue, ParseError, ParseErrorKind,
    Result,
};
pub use m3u8::M3u8;
pub use media::{Flag, InstreamId, Media, MediaBuilder, MediaKey, MediaType};
pub use media_list::{MediaList, MergePolicy};
pub use playlist::attributes::{AttributeList, AttributeValue, AttributeWriter};
pub use segment::{Key, Segment};
pub use stream::{IFramePlaylist, IFrameStreamInfo, Playlist, StreamInfo};
pub use types::{ByteRange, PlaylistType, Resolution};

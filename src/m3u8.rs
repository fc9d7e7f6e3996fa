//! The M3U8 aggregate
//!
//! Owns the renditions, variant streams, I-frame variants and segments of one
//! manifest, in insertion order, plus the playlist-level header tags.

use std::fmt;
use std::str::FromStr;

use crate::config::ParserConfig;
use crate::error::{InvalidEntry, ParseError};
use crate::media::{Media, MediaType};
use crate::media_list::{MediaList, MergePolicy};
use crate::playlist;
use crate::segment::Segment;
use crate::stream::{IFramePlaylist, Playlist};
use crate::types::PlaylistType;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct M3u8 {
    /// `#EXT-X-VERSION`
    pub version: Option<u32>,
    /// `#EXT-X-INDEPENDENT-SEGMENTS`
    pub independent_segments: bool,
    /// `#EXT-X-TARGETDURATION`
    pub target_duration: Option<u64>,
    /// `#EXT-X-MEDIA-SEQUENCE`
    pub media_sequence: Option<u64>,
    /// `#EXT-X-PLAYLIST-TYPE`
    pub playlist_type: Option<PlaylistType>,
    /// `#EXT-X-I-FRAMES-ONLY`
    pub iframes_only: bool,
    /// `#EXT-X-ENDLIST`
    pub endlist: bool,

    media: MediaList,
    playlists: Vec<Playlist>,
    iframe_playlists: Vec<IFramePlaylist>,
    segments: Vec<Segment>,
    unknown_tags: Vec<String>,
    base_uri: Option<String>,
}

impl M3u8 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse manifest text with the default configuration.
    pub fn loads(text: &str) -> Result<Self, ParseError> {
        Self::loads_with(text, &ParserConfig::default())
    }

    pub fn loads_with(text: &str, config: &ParserConfig) -> Result<Self, ParseError> {
        playlist::parser::parse(text, config)
    }

    /// Serialize to canonical manifest text.
    pub fn dumps(&self) -> String {
        playlist::dumps(self)
    }

    /// Add a rendition. Returns `false` when an existing rendition with the
    /// same identity was kept instead.
    pub fn add_media(&mut self, media: Media, policy: MergePolicy) -> bool {
        self.media.add(media, policy)
    }

    pub fn remove_media(&mut self, media: &Media) -> Option<Media> {
        self.media.remove(media)
    }

    /// Append a variant stream. Fails if it could not be written out and
    /// parsed back unchanged.
    pub fn add_playlist(&mut self, playlist: Playlist) -> Result<(), InvalidEntry> {
        playlist.validate()?;
        self.playlists.push(playlist);
        Ok(())
    }

    pub fn remove_playlist(&mut self, playlist: &Playlist) -> Option<Playlist> {
        let idx = self.playlists.iter().position(|p| p == playlist)?;
        Some(self.playlists.remove(idx))
    }

    pub fn add_iframe_playlist(&mut self, playlist: IFramePlaylist) -> Result<(), InvalidEntry> {
        playlist.validate()?;
        self.iframe_playlists.push(playlist);
        Ok(())
    }

    pub fn remove_iframe_playlist(&mut self, playlist: &IFramePlaylist) -> Option<IFramePlaylist> {
        let idx = self.iframe_playlists.iter().position(|p| p == playlist)?;
        Some(self.iframe_playlists.remove(idx))
    }

    /// Append a segment. An empty title is stored as no title, which is
    /// how `#EXTINF:<duration>,` reads back.
    pub fn add_segment(&mut self, mut segment: Segment) -> Result<(), InvalidEntry> {
        segment.title = segment.title.filter(|title| !title.is_empty());
        segment.validate()?;
        self.segments.push(segment);
        Ok(())
    }

    pub fn remove_segment(&mut self, segment: &Segment) -> Option<Segment> {
        let idx = self.segments.iter().position(|s| s == segment)?;
        Some(self.segments.remove(idx))
    }

    pub fn media(&self) -> &MediaList {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut MediaList {
        &mut self.media
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn iframe_playlists(&self) -> &[IFramePlaylist] {
        &self.iframe_playlists
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Tag lines kept verbatim under [`UnknownTagPolicy::Preserve`].
    ///
    /// [`UnknownTagPolicy::Preserve`]: crate::UnknownTagPolicy::Preserve
    pub fn unknown_tags(&self) -> &[String] {
        &self.unknown_tags
    }

    pub fn push_unknown_tag(&mut self, line: &str) {
        self.unknown_tags.push(line.to_string());
    }

    /// A master playlist: it lists variant streams rather than segments.
    pub fn is_variant(&self) -> bool {
        !self.playlists.is_empty() || !self.iframe_playlists.is_empty()
    }

    /// Renditions of one group, in container order.
    pub fn media_for_group<'a>(
        &'a self,
        media_type: MediaType,
        group_id: &'a str,
    ) -> impl Iterator<Item = &'a Media> + 'a {
        self.media
            .iter()
            .filter(move |m| m.media_type() == media_type && m.group_id() == group_id)
    }

    pub fn base_uri(&self) -> Option<&str> {
        self.base_uri.as_deref()
    }

    /// Set the base URI and stamp it on every variant and segment.
    pub fn set_base_uri(&mut self, base_uri: Option<String>) {
        for playlist in &mut self.playlists {
            playlist.base_uri = base_uri.clone();
        }
        for playlist in &mut self.iframe_playlists {
            playlist.base_uri = base_uri.clone();
        }
        for segment in &mut self.segments {
            segment.base_uri = base_uri.clone();
        }
        self.base_uri = base_uri;
    }

    /// Fill each variant's `media` with the renditions its group-ids name.
    pub(crate) fn link_media(&mut self) {
        let media = &self.media;
        for playlist in &mut self.playlists {
            playlist.media = media
                .iter()
                .filter(|m| playlist.references(m))
                .cloned()
                .collect();
        }
    }
}

impl fmt::Display for M3u8 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.dumps())
    }
}

impl FromStr for M3u8 {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::loads(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{IFrameStreamInfo, StreamInfo};

    fn low() -> Playlist {
        Playlist::new(
            "http://example.com/low.m3u8",
            StreamInfo {
                program_id: Some(1),
                average_bandwidth: Some(1257891),
                subtitles: Some("subs".to_string()),
                ..StreamInfo::new(1280000)
            },
        )
    }

    fn iframes() -> IFramePlaylist {
        IFramePlaylist::new(
            "video-1200k-iframes.m3u8",
            IFrameStreamInfo {
                codecs: Some("avc1.4d001f".to_string()),
                ..IFrameStreamInfo::new(193350)
            },
        )
        .with_base_uri("http://example.com/")
    }

    #[test]
    fn test_remove_playlist() {
        let mut m3u8 = M3u8::new();
        m3u8.add_playlist(low()).unwrap();
        assert!(m3u8.is_variant());
        assert_eq!(m3u8.remove_playlist(&low()), Some(low()));
        assert!(m3u8.playlists().is_empty());
        assert!(!m3u8.is_variant());

        // Not registered: nothing happens.
        assert_eq!(m3u8.remove_playlist(&low()), None);
        assert!(m3u8.playlists().is_empty());
    }

    #[test]
    fn test_remove_iframe_playlist() {
        let mut m3u8 = M3u8::new();
        assert_eq!(m3u8.remove_iframe_playlist(&iframes()), None);

        m3u8.add_iframe_playlist(iframes()).unwrap();
        assert!(m3u8.is_variant());
        assert!(m3u8.remove_iframe_playlist(&iframes()).is_some());
        assert!(m3u8.iframe_playlists().is_empty());
    }

    #[test]
    fn test_add_and_remove_segment() {
        let mut m3u8 = M3u8::new();
        let seg = Segment::new("smth.ts", Some("http://example.com/"));
        assert_eq!(m3u8.remove_segment(&seg), None);

        m3u8.add_segment(seg.clone()).unwrap();
        assert_eq!(m3u8.segments().len(), 1);
        assert!(!m3u8.is_variant());

        m3u8.remove_segment(&seg);
        assert!(m3u8.segments().is_empty());
    }

    #[test]
    fn test_remove_only_first_equal_segment() {
        let mut m3u8 = M3u8::new();
        let seg = Segment::new("a.ts", None).with_duration(4.0);
        m3u8.add_segment(seg.clone()).unwrap();
        m3u8.add_segment(seg.clone()).unwrap();
        m3u8.remove_segment(&seg);
        assert_eq!(m3u8.segments(), [seg]);
    }

    #[test]
    fn test_media_for_group() {
        let mut m3u8 = M3u8::new();
        let en = Media::new(MediaType::Audio, "aac", "English").unwrap();
        let fr = Media::new(MediaType::Audio, "aac", "French").unwrap();
        let subs = Media::new(MediaType::Subtitles, "aac", "English").unwrap();
        for media in [en.clone(), fr.clone(), subs] {
            m3u8.add_media(media, MergePolicy::KeepExisting);
        }

        let group: Vec<&Media> = m3u8.media_for_group(MediaType::Audio, "aac").collect();
        assert_eq!(group, vec![&en, &fr]);
        assert_eq!(m3u8.media_for_group(MediaType::Video, "aac").count(), 0);
    }

    #[test]
    fn test_link_media() {
        let mut m3u8 = M3u8::new();
        m3u8.add_playlist(low()).unwrap();
        m3u8.add_media(
            Media::new(MediaType::Subtitles, "subs", "English").unwrap(),
            MergePolicy::KeepExisting,
        );
        m3u8.add_media(
            Media::new(MediaType::Audio, "subs", "English").unwrap(),
            MergePolicy::KeepExisting,
        );
        m3u8.link_media();

        let linked = &m3u8.playlists()[0].media;
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].media_type(), MediaType::Subtitles);
    }

    #[test]
    fn test_set_base_uri_restamps() {
        let mut m3u8 = M3u8::new();
        m3u8.add_playlist(Playlist::new("low.m3u8", StreamInfo::new(1))).unwrap();
        m3u8.add_iframe_playlist(iframes()).unwrap();
        m3u8.add_segment(Segment::new("a.ts", None)).unwrap();

        m3u8.set_base_uri(Some("http://cdn.example.com/hls/master.m3u8".to_string()));
        assert_eq!(m3u8.base_uri(), Some("http://cdn.example.com/hls/master.m3u8"));
        assert_eq!(m3u8.playlists()[0].absolute_uri(), "http://cdn.example.com/hls/low.m3u8");
        assert_eq!(
            m3u8.iframe_playlists()[0].absolute_uri(),
            "http://cdn.example.com/hls/video-1200k-iframes.m3u8"
        );
        assert_eq!(m3u8.segments()[0].absolute_uri(), "http://cdn.example.com/hls/a.ts");

        m3u8.set_base_uri(None);
        assert_eq!(m3u8.segments()[0].absolute_uri(), "a.ts");
    }

    #[test]
    fn test_display_and_from_str() {
        let text = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1280000\nlow.m3u8\n";
        let m3u8: M3u8 = text.parse().unwrap();
        assert_eq!(m3u8.to_string(), text);
        assert!("#EXT-X-STREAM-INF:BANDWIDTH=1\n".parse::<M3u8>().is_err());
    }
}

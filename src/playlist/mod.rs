//! M3U8 text format
//!
//! - [`attributes`]: the `NAME=VALUE,...` codec shared by both directions
//! - [`parser`]: text to [`M3u8`]
//! - [`master`], [`variant`]: [`M3u8`] to text

use crate::m3u8::M3u8;

pub mod attributes;
pub mod master;
pub mod parser;
pub mod variant;

/// Serialize in canonical order: header tags, renditions, variants, I-frame
/// variants, segments, end marker.
pub(crate) fn dumps(m3u8: &M3u8) -> String {
    let mut output = String::new();
    variant::write_header(&mut output, m3u8);
    for media in m3u8.media() {
        master::write_media(&mut output, media);
    }
    for playlist in m3u8.playlists() {
        master::write_stream_inf(&mut output, playlist);
    }
    for playlist in m3u8.iframe_playlists() {
        master::write_iframe_stream_inf(&mut output, playlist);
    }
    for segment in m3u8.segments() {
        variant::write_segment(&mut output, segment);
    }
    variant::write_endlist(&mut output, m3u8);
    output
}

//! Media playlist writer
//!
//! Writes the header tags, the segment list and the end marker.

use chrono::SecondsFormat;

use super::attributes::AttributeWriter;
use crate::m3u8::M3u8;
use crate::segment::{Key, Segment};

/// Append `#EXTM3U` and whichever header tags are set.
pub fn write_header(output: &mut String, m3u8: &M3u8) {
    output.push_str("#EXTM3U\n");
    if let Some(version) = m3u8.version {
        output.push_str(&format!("#EXT-X-VERSION:{}\n", version));
    }
    if m3u8.independent_segments {
        output.push_str("#EXT-X-INDEPENDENT-SEGMENTS\n");
    }
    if let Some(target_duration) = m3u8.target_duration {
        output.push_str(&format!("#EXT-X-TARGETDURATION:{}\n", target_duration));
    }
    if let Some(media_sequence) = m3u8.media_sequence {
        output.push_str(&format!("#EXT-X-MEDIA-SEQUENCE:{}\n", media_sequence));
    }
    if let Some(playlist_type) = m3u8.playlist_type {
        output.push_str(&format!("#EXT-X-PLAYLIST-TYPE:{}\n", playlist_type));
    }
    if m3u8.iframes_only {
        output.push_str("#EXT-X-I-FRAMES-ONLY\n");
    }
    for tag in m3u8.unknown_tags() {
        output.push_str(tag);
        output.push('\n');
    }
}

fn key_attributes(key: &Key) -> String {
    AttributeWriter::new()
        .enumerated("METHOD", Some(&key.method))
        .quoted("URI", key.uri.as_deref())
        .enumerated("IV", key.iv.as_deref())
        .quoted("KEYFORMAT", key.keyformat.as_deref())
        .quoted("KEYFORMATVERSIONS", key.keyformatversions.as_deref())
        .finish()
}

/// Append a segment's tags followed by its URI line.
pub fn write_segment(output: &mut String, segment: &Segment) {
    if let Some(key) = &segment.key {
        output.push_str(&format!("#EXT-X-KEY:{}\n", key_attributes(key)));
    }
    if segment.discontinuity {
        output.push_str("#EXT-X-DISCONTINUITY\n");
    }
    if let Some(program_date_time) = &segment.program_date_time {
        output.push_str(&format!(
            "#EXT-X-PROGRAM-DATE-TIME:{}\n",
            program_date_time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        ));
    }
    if let Some(duration) = segment.duration {
        output.push_str(&format!(
            "#EXTINF:{},{}\n",
            duration,
            segment.title.as_deref().unwrap_or_default()
        ));
    }
    if let Some(byterange) = &segment.byterange {
        output.push_str(&format!("#EXT-X-BYTERANGE:{}\n", byterange));
    }
    output.push_str(&format!("{}\n", segment.uri));
}

pub fn write_endlist(output: &mut String, m3u8: &M3u8) {
    if m3u8.endlist {
        output.push_str("#EXT-X-ENDLIST\n");
    }
}

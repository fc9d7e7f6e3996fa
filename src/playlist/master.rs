//! Master playlist writer
//!
//! Writes the rendition and variant tags of a master playlist:
//! - `#EXT-X-MEDIA` per rendition
//! - `#EXT-X-STREAM-INF` plus URI line per variant
//! - `#EXT-X-I-FRAME-STREAM-INF` per I-frame variant

use super::attributes::AttributeWriter;
use crate::media::Media;
use crate::stream::{IFramePlaylist, Playlist};

/// Append one `#EXT-X-MEDIA` line.
pub fn write_media(output: &mut String, media: &Media) {
    let instream_id = media.instream_id().map(|id| id.to_string());
    let attrs = AttributeWriter::new()
        .quoted("URI", media.uri())
        .enumerated("TYPE", Some(media.media_type()))
        .quoted("GROUP-ID", Some(media.group_id()))
        .quoted("LANGUAGE", media.language())
        .quoted("ASSOC-LANGUAGE", media.assoc_language())
        .quoted("NAME", Some(media.name()))
        .enumerated("DEFAULT", media.default().as_str())
        .enumerated("AUTOSELECT", media.autoselect().as_str())
        .enumerated("FORCED", media.forced().as_str())
        .quoted("INSTREAM-ID", instream_id.as_deref())
        .quoted("CHARACTERISTICS", media.characteristics())
        .finish();
    output.push_str(&format!("#EXT-X-MEDIA:{}\n", attrs));
}

/// Append `#EXT-X-STREAM-INF` and the variant URI.
pub fn write_stream_inf(output: &mut String, playlist: &Playlist) {
    let info = &playlist.stream_info;
    let attrs = AttributeWriter::new()
        .enumerated("PROGRAM-ID", info.program_id)
        .enumerated("BANDWIDTH", Some(info.bandwidth))
        .enumerated("AVERAGE-BANDWIDTH", info.average_bandwidth)
        .enumerated("RESOLUTION", info.resolution)
        .quoted("CODECS", info.codecs.as_deref())
        .enumerated("FRAME-RATE", info.frame_rate)
        .quoted("AUDIO", info.audio.as_deref())
        .quoted("VIDEO", info.video.as_deref())
        .quoted("SUBTITLES", info.subtitles.as_deref())
        .value("CLOSED-CAPTIONS", info.closed_captions.as_ref())
        .finish();
    output.push_str(&format!("#EXT-X-STREAM-INF:{}\n", attrs));
    output.push_str(&format!("{}\n", playlist.uri));
}

/// Append one `#EXT-X-I-FRAME-STREAM-INF` line.
pub fn write_iframe_stream_inf(output: &mut String, playlist: &IFramePlaylist) {
    let info = &playlist.iframe_stream_info;
    let attrs = AttributeWriter::new()
        .enumerated("PROGRAM-ID", info.program_id)
        .enumerated("BANDWIDTH", Some(info.bandwidth))
        .enumerated("AVERAGE-BANDWIDTH", info.average_bandwidth)
        .enumerated("RESOLUTION", info.resolution)
        .quoted("CODECS", info.codecs.as_deref())
        .quoted("URI", Some(playlist.uri.as_str()))
        .finish();
    output.push_str(&format!("#EXT-X-I-FRAME-STREAM-INF:{}\n", attrs));
}

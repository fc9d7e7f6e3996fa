//! Parse/serialize round trips

use super::fixtures::{
    MESSY_MASTER_PLAYLIST, MESSY_MASTER_PLAYLIST_CANONICAL, MULTI_MEDIA_PLAYLIST,
    VOD_MEDIA_PLAYLIST,
};
use super::init_tracing;
use super::validation::{validate_master_playlist, validate_media_playlist};
use crate::config::{ParserConfig, UnknownTagPolicy};
use crate::error::{InvalidEntry, InvalidMedia, ParseErrorKind};
use crate::m3u8::M3u8;
use crate::media::{Flag, InstreamId, Media, MediaType};
use crate::media_list::MergePolicy;
use crate::playlist::attributes::AttributeValue;
use crate::segment::{Key, Segment};
use crate::stream::{IFramePlaylist, IFrameStreamInfo, Playlist, StreamInfo};
use crate::types::{ByteRange, PlaylistType, Resolution};

#[test]
fn test_multi_media_playlist_is_canonical() {
    init_tracing();
    let m3u8 = M3u8::loads(MULTI_MEDIA_PLAYLIST).unwrap();
    assert_eq!(m3u8.dumps(), MULTI_MEDIA_PLAYLIST);

    let again = M3u8::loads(&m3u8.dumps()).unwrap();
    assert_eq!(again.dumps(), MULTI_MEDIA_PLAYLIST);
    assert_eq!(again, m3u8);
}

#[test]
fn test_multi_media_playlist_model() {
    let m3u8 = M3u8::loads(MULTI_MEDIA_PLAYLIST).unwrap();
    assert!(m3u8.is_variant());
    assert_eq!(m3u8.version, Some(4));
    assert!(m3u8.independent_segments);
    assert_eq!(m3u8.media().len(), 7);
    assert_eq!(m3u8.playlists().len(), 3);
    assert_eq!(m3u8.iframe_playlists().len(), 2);
    assert!(m3u8.segments().is_empty());

    let sd = &m3u8.playlists()[0];
    assert_eq!(sd.stream_info.average_bandwidth, Some(760000));
    assert_eq!(sd.stream_info.frame_rate, Some(25.0));
    // 3 audio + 2 subtitles + 2 closed captions
    assert_eq!(sd.media.len(), 7);

    let hd = &m3u8.playlists()[2];
    assert_eq!(
        hd.stream_info.closed_captions,
        Some(AttributeValue::Enumerated("NONE".to_string()))
    );
    assert_eq!(hd.media.len(), 5);

    let cc: Vec<&Media> = m3u8.media_for_group(MediaType::ClosedCaptions, "cc").collect();
    assert_eq!(cc.len(), 2);
    assert_eq!(cc[0].instream_id(), Some(InstreamId::Cc(1)));
    assert_eq!(cc[1].instream_id(), Some(InstreamId::Service(3)));
    assert_eq!(cc[1].default(), Flag::Unset);

    let forced = m3u8
        .media()
        .iter()
        .find(|m| m.forced() == Flag::Yes)
        .unwrap();
    assert_eq!(forced.assoc_language(), Some("fr-CA"));

    let sorted: Vec<MediaType> = m3u8.media().sorted().iter().map(|m| m.media_type()).collect();
    assert_eq!(
        sorted,
        vec![
            MediaType::Audio,
            MediaType::Audio,
            MediaType::Audio,
            MediaType::ClosedCaptions,
            MediaType::ClosedCaptions,
            MediaType::Subtitles,
            MediaType::Subtitles,
        ]
    );
}

#[test]
fn test_vod_media_playlist_is_canonical() {
    init_tracing();
    let m3u8 = M3u8::loads(VOD_MEDIA_PLAYLIST).unwrap();
    assert!(!m3u8.is_variant());
    assert_eq!(m3u8.playlist_type, Some(PlaylistType::Vod));
    assert_eq!(m3u8.segments().len(), 4);
    assert_eq!(m3u8.segments()[2].title.as_deref(), Some("ad break"));
    assert_eq!(m3u8.dumps(), VOD_MEDIA_PLAYLIST);
}

#[test]
fn test_messy_input_is_normalized() {
    let m3u8 = M3u8::loads(MESSY_MASTER_PLAYLIST).unwrap();
    assert_eq!(m3u8.dumps(), MESSY_MASTER_PLAYLIST_CANONICAL);
}

#[test]
fn test_built_master_round_trips() {
    let mut m3u8 = M3u8::new();
    m3u8.version = Some(3);

    let audio = Media::builder()
        .media_type("AUDIO")
        .group_id("aac")
        .name("English")
        .language("en")
        .uri("audio/en.m3u8")
        .default("YES")
        .build()
        .unwrap();
    let subs = Media::builder()
        .media_type("SUBTITLES")
        .group_id("subs")
        .name("English")
        .uri("subs/en.m3u8")
        .forced("NO")
        .build()
        .unwrap();
    m3u8.add_media(audio.clone(), MergePolicy::KeepExisting);
    m3u8.add_media(subs.clone(), MergePolicy::KeepExisting);

    m3u8.add_playlist(
        Playlist::new(
            "low/prog.m3u8",
            StreamInfo {
                resolution: Some(Resolution::new(640, 360)),
                codecs: Some("avc1.4d401e,mp4a.40.2".to_string()),
                audio: Some("aac".to_string()),
                subtitles: Some("subs".to_string()),
                ..StreamInfo::new(900000)
            },
        )
        .with_media(vec![audio.clone(), subs]),
    ).unwrap();
    m3u8.add_playlist(
        Playlist::new(
            "audio-only.m3u8",
            StreamInfo {
                codecs: Some("mp4a.40.2".to_string()),
                audio: Some("aac".to_string()),
                ..StreamInfo::new(64000)
            },
        )
        .with_media(vec![audio]),
    ).unwrap();
    m3u8.add_iframe_playlist(IFramePlaylist::new(
        "low/iframes.m3u8",
        IFrameStreamInfo::new(90000),
    )).unwrap();

    let text = m3u8.dumps();
    let result = validate_master_playlist(&text);
    assert!(result.is_valid, "{:?}", result.errors);

    let loaded = M3u8::loads(&text).unwrap();
    assert_eq!(loaded, m3u8);
    assert_eq!(loaded.dumps(), text);
}

#[test]
fn test_built_media_playlist_round_trips() {
    let mut m3u8 = M3u8::new();
    m3u8.version = Some(3);
    m3u8.target_duration = Some(6);
    m3u8.media_sequence = Some(0);
    m3u8.playlist_type = Some(PlaylistType::Event);

    m3u8.add_segment(Segment {
        key: Some(Key {
            uri: Some("keys/1.key".to_string()),
            ..Key::new("AES-128")
        }),
        ..Segment::new("seg0.ts", None).with_duration(6.0)
    }).unwrap();
    m3u8.add_segment(Segment {
        byterange: Some(ByteRange {
            length: 4096,
            offset: None,
        }),
        ..Segment::new("seg1.ts", None).with_duration(5.5)
    }).unwrap();
    m3u8.add_segment(Segment {
        discontinuity: true,
        key: Some(Key::new("NONE")),
        ..Segment::new("seg2.ts", None).with_duration(2.25)
    }).unwrap();

    let text = m3u8.dumps();
    let result = validate_media_playlist(&text);
    assert!(result.is_valid, "{:?}", result.errors);

    let loaded = M3u8::loads(&text).unwrap();
    assert_eq!(loaded, m3u8);
    assert_eq!(loaded.segments()[1].byterange.unwrap().offset, None);
}

#[test]
fn test_preserved_unknown_tags_round_trip() {
    let text = "#EXTM3U\n\
                #EXT-X-VERSION:6\n\
                #EXT-X-SESSION-DATA:DATA-ID=\"com.example.title\",VALUE=\"Example\"\n\
                #EXT-X-STREAM-INF:BANDWIDTH=1280000\n\
                low.m3u8\n";
    let config = ParserConfig {
        unknown_tags: UnknownTagPolicy::Preserve,
        ..Default::default()
    };
    let m3u8 = M3u8::loads_with(text, &config).unwrap();
    assert_eq!(m3u8.unknown_tags().len(), 1);
    assert_eq!(m3u8.dumps(), text);

    // Ignored by default.
    let m3u8 = M3u8::loads(text).unwrap();
    assert!(m3u8.unknown_tags().is_empty());
    assert!(!m3u8.dumps().contains("SESSION-DATA"));
}

#[test]
fn test_base_uri_survives_mutation() {
    let config = ParserConfig::default().with_base_uri("https://cdn.example.com/vod/");
    let mut m3u8 = M3u8::loads_with(MULTI_MEDIA_PLAYLIST, &config).unwrap();
    assert_eq!(
        m3u8.playlists()[1].absolute_uri(),
        "https://cdn.example.com/vod/720p/prog.m3u8"
    );

    // Equality ignores where the manifest came from.
    let plain = M3u8::loads(MULTI_MEDIA_PLAYLIST).unwrap();
    let first = plain.playlists()[0].clone();
    assert!(m3u8.remove_playlist(&first).is_some());
    assert_eq!(m3u8.playlists().len(), 2);
    assert!(!m3u8.dumps().contains("360p/prog.m3u8\n"));
}

#[test]
fn test_unwritable_quoted_values_are_refused() {
    let err = Media::builder()
        .media_type("AUDIO")
        .group_id("aac")
        .name("The \"Director\" cut")
        .build()
        .unwrap_err();
    assert!(matches!(err, InvalidMedia::UnquotableValue { field: "NAME", .. }));

    let mut m3u8 = M3u8::new();
    let broken = Playlist::new(
        "low.m3u8",
        StreamInfo {
            codecs: Some("avc1.4d401e\",mp4a.40.2".to_string()),
            ..StreamInfo::new(900000)
        },
    );
    assert_eq!(
        m3u8.add_playlist(broken),
        Err(InvalidEntry::UnquotableValue {
            field: "CODECS",
            value: "avc1.4d401e\",mp4a.40.2".to_string(),
        })
    );
    let split_group = Playlist::new(
        "low.m3u8",
        StreamInfo {
            audio: Some("aac\nlow.m3u8".to_string()),
            ..StreamInfo::new(900000)
        },
    );
    assert!(m3u8.add_playlist(split_group).is_err());

    // Nothing was stored, so the aggregate still reads back.
    assert!(m3u8.playlists().is_empty());
    assert_eq!(M3u8::loads(&m3u8.dumps()).unwrap(), m3u8);
}

#[test]
fn test_closed_captions_turned_audio_round_trips() {
    let mut media = Media::builder()
        .media_type("CLOSED-CAPTIONS")
        .group_id("cc")
        .name("English")
        .instream_id("CC1")
        .build()
        .unwrap();
    media.set_media_type("AUDIO").unwrap();

    let mut m3u8 = M3u8::new();
    m3u8.add_media(media, MergePolicy::KeepExisting);
    let text = m3u8.dumps();
    assert!(!text.contains("INSTREAM-ID"), "{}", text);
    assert_eq!(M3u8::loads(&text).unwrap(), m3u8);
}

#[test]
fn test_segment_titles_round_trip() {
    let mut m3u8 = M3u8::new();
    let untimed = Segment {
        title: Some("intro".to_string()),
        ..Segment::new("a.ts", None)
    };
    assert_eq!(
        m3u8.add_segment(untimed),
        Err(InvalidEntry::TitleWithoutDuration("a.ts".to_string()))
    );

    m3u8.add_segment(Segment {
        title: Some(String::new()),
        ..Segment::new("a.ts", None).with_duration(4.0)
    })
    .unwrap();
    assert_eq!(m3u8.segments()[0].title, None);
    assert_eq!(M3u8::loads(&m3u8.dumps()).unwrap(), m3u8);
}

#[test]
fn test_quoted_none_closed_captions_round_trips() {
    let text = "#EXTM3U\n\
                #EXT-X-MEDIA:TYPE=CLOSED-CAPTIONS,GROUP-ID=\"NONE\",NAME=\"English\",INSTREAM-ID=\"CC1\"\n\
                #EXT-X-STREAM-INF:BANDWIDTH=1280000,CLOSED-CAPTIONS=\"NONE\"\n\
                low.m3u8\n";
    let m3u8 = M3u8::loads(text).unwrap();
    let info = &m3u8.playlists()[0].stream_info;
    assert_eq!(
        info.closed_captions,
        Some(AttributeValue::Quoted("NONE".to_string()))
    );
    // A quoted NONE names a group, so the rendition links.
    assert_eq!(m3u8.playlists()[0].media.len(), 1);
    assert_eq!(m3u8.dumps(), text);
    assert_eq!(M3u8::loads(&m3u8.dumps()).unwrap(), m3u8);
}

#[test]
fn test_unwritable_entries_fail_the_parse() {
    let text = "#EXTM3U\n\
                #EXT-X-TARGETDURATION:6\n\
                #EXT-X-KEY:METHOD=AES-128,IV=\"0x1,2\"\n\
                #EXTINF:6.0,\n\
                a.ts\n";
    let err = M3u8::loads(text).unwrap_err();
    assert_eq!(err.line, 5);
    assert!(matches!(err.kind, ParseErrorKind::InvalidEntry(_)));
}

//! Alternative renditions (`#EXT-X-MEDIA`)
//!
//! A [`Media`] is identified by its [`MediaKey`] `(type, group-id, name)`.
//! Equality, hashing and ordering all go through that key, so two renditions
//! that differ only in URI, language or flags are the same rendition.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::InvalidMedia;
use crate::types::is_quotable;

/// Rendition type. Variants are declared in the lexical order of their
/// wire names so the derived ordering matches string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MediaType {
    Audio,
    ClosedCaptions,
    Subtitles,
    Video,
}

impl MediaType {
    pub const ALL: [MediaType; 4] = [
        MediaType::Audio,
        MediaType::ClosedCaptions,
        MediaType::Subtitles,
        MediaType::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Audio => "AUDIO",
            MediaType::ClosedCaptions => "CLOSED-CAPTIONS",
            MediaType::Subtitles => "SUBTITLES",
            MediaType::Video => "VIDEO",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = InvalidMedia;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| InvalidMedia::InvalidType(s.to_string()))
    }
}

/// YES/NO attribute that may also be left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flag {
    Yes,
    No,
    #[default]
    Unset,
}

impl Flag {
    /// The only accepted spellings are `YES`, `NO`, or no value at all.
    pub fn parse(field: &'static str, value: Option<&str>) -> Result<Flag, InvalidMedia> {
        match value {
            None => Ok(Flag::Unset),
            Some("YES") => Ok(Flag::Yes),
            Some("NO") => Ok(Flag::No),
            Some(other) => Err(InvalidMedia::InvalidFlag {
                field,
                value: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Flag::Yes => Some("YES"),
            Flag::No => Some("NO"),
            Flag::Unset => None,
        }
    }

    pub fn is_yes(&self) -> bool {
        *self == Flag::Yes
    }
}

/// Closed-caption channel inside the video stream: `CC1`..`CC4` or
/// `SERVICE1`..`SERVICE63`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstreamId {
    Cc(u8),
    Service(u8),
}

impl fmt::Display for InstreamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InstreamId::Cc(n) => write!(f, "CC{}", n),
            InstreamId::Service(n) => write!(f, "SERVICE{}", n),
        }
    }
}

impl FromStr for InstreamId {
    type Err = InvalidMedia;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidMedia::InvalidInstreamId(s.to_string());
        let caps = regex!(r"^(?:CC([1-4])|SERVICE([1-9]|[1-5][0-9]|6[0-3]))$")
            .captures(s)
            .ok_or_else(invalid)?;
        match (caps.get(1), caps.get(2)) {
            (Some(n), _) => n.as_str().parse().map(InstreamId::Cc).map_err(|_| invalid()),
            (_, Some(n)) => n.as_str().parse().map(InstreamId::Service).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

/// Identity of a rendition.
///
/// Field order is the sort order: type, then group-id, then name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaKey<'a> {
    pub media_type: MediaType,
    pub group_id: &'a str,
    pub name: &'a str,
}

/// One alternative rendition.
#[derive(Debug, Clone)]
pub struct Media {
    media_type: MediaType,
    group_id: String,
    name: String,
    uri: Option<String>,
    language: Option<String>,
    assoc_language: Option<String>,
    characteristics: Option<String>,
    default: Flag,
    autoselect: Flag,
    forced: Flag,
    instream_id: Option<InstreamId>,
}

fn required(field: &'static str, value: Option<&str>) -> Result<String, InvalidMedia> {
    match value {
        Some(v) if !v.is_empty() => Ok(quoted(field, Some(v))?.unwrap_or_default()),
        _ => Err(InvalidMedia::MissingField(field)),
    }
}

/// Quoted-string attribute value.
fn quoted(field: &'static str, value: Option<&str>) -> Result<Option<String>, InvalidMedia> {
    match value {
        Some(v) if !is_quotable(v) => Err(InvalidMedia::UnquotableValue {
            field,
            value: v.to_string(),
        }),
        _ => Ok(value.map(str::to_string)),
    }
}

fn check_instream_id(
    media_type: MediaType,
    value: Option<&str>,
) -> Result<Option<InstreamId>, InvalidMedia> {
    match (media_type, value.filter(|v| !v.is_empty())) {
        (MediaType::ClosedCaptions, None) => Err(InvalidMedia::MissingInstreamId),
        (MediaType::ClosedCaptions, Some(v)) => v.parse().map(Some),
        (_, None) => Ok(None),
        (other, Some(_)) => Err(InvalidMedia::InstreamIdNotAllowed(other.to_string())),
    }
}

impl Media {
    /// Create a rendition with just its identity fields.
    ///
    /// Fails for `CLOSED-CAPTIONS`, which also needs an INSTREAM-ID; use
    /// [`Media::builder`] for those.
    pub fn new(media_type: MediaType, group_id: &str, name: &str) -> Result<Media, InvalidMedia> {
        Media::builder()
            .media_type(media_type.as_str())
            .group_id(group_id)
            .name(name)
            .build()
    }

    pub fn builder() -> MediaBuilder {
        Default::default()
    }

    pub fn key(&self) -> MediaKey<'_> {
        MediaKey {
            media_type: self.media_type,
            group_id: &self.group_id,
            name: &self.name,
        }
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn assoc_language(&self) -> Option<&str> {
        self.assoc_language.as_deref()
    }

    pub fn characteristics(&self) -> Option<&str> {
        self.characteristics.as_deref()
    }

    pub fn default(&self) -> Flag {
        self.default
    }

    pub fn autoselect(&self) -> Flag {
        self.autoselect
    }

    pub fn forced(&self) -> Flag {
        self.forced
    }

    pub fn instream_id(&self) -> Option<InstreamId> {
        self.instream_id
    }

    /// Change the rendition type.
    ///
    /// Only the type itself is checked here. Leaving CLOSED-CAPTIONS drops
    /// the INSTREAM-ID; entering it needs one from [`Media::set_instream_id`]
    /// before [`Media::validate`] passes.
    pub fn set_media_type(&mut self, value: &str) -> Result<(), InvalidMedia> {
        self.media_type = value.parse()?;
        if self.media_type != MediaType::ClosedCaptions {
            self.instream_id = None;
        }
        Ok(())
    }

    pub fn set_group_id(&mut self, value: Option<&str>) -> Result<(), InvalidMedia> {
        self.group_id = required("GROUP-ID", value)?;
        Ok(())
    }

    pub fn set_name(&mut self, value: Option<&str>) -> Result<(), InvalidMedia> {
        self.name = required("NAME", value)?;
        Ok(())
    }

    pub fn set_default(&mut self, value: Option<&str>) -> Result<(), InvalidMedia> {
        self.default = Flag::parse("DEFAULT", value)?;
        Ok(())
    }

    pub fn set_autoselect(&mut self, value: Option<&str>) -> Result<(), InvalidMedia> {
        self.autoselect = Flag::parse("AUTOSELECT", value)?;
        Ok(())
    }

    pub fn set_forced(&mut self, value: Option<&str>) -> Result<(), InvalidMedia> {
        self.forced = Flag::parse("FORCED", value)?;
        Ok(())
    }

    pub fn set_instream_id(&mut self, value: Option<&str>) -> Result<(), InvalidMedia> {
        self.instream_id = check_instream_id(self.media_type, value)?;
        Ok(())
    }

    pub fn set_uri(&mut self, value: Option<&str>) -> Result<(), InvalidMedia> {
        self.uri = quoted("URI", value)?;
        Ok(())
    }

    pub fn set_language(&mut self, value: Option<&str>) -> Result<(), InvalidMedia> {
        self.language = quoted("LANGUAGE", value)?;
        Ok(())
    }

    pub fn set_assoc_language(&mut self, value: Option<&str>) -> Result<(), InvalidMedia> {
        self.assoc_language = quoted("ASSOC-LANGUAGE", value)?;
        Ok(())
    }

    pub fn set_characteristics(&mut self, value: Option<&str>) -> Result<(), InvalidMedia> {
        self.characteristics = quoted("CHARACTERISTICS", value)?;
        Ok(())
    }

    /// Re-check the rules that span several fields.
    pub fn validate(&self) -> Result<(), InvalidMedia> {
        let instream_id = self.instream_id.map(|id| id.to_string());
        check_instream_id(self.media_type, instream_id.as_deref()).map(|_| ())
    }
}

impl PartialEq for Media {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Media {}

impl Hash for Media {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Media {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Media {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Collects raw attribute values and validates them all at once in
/// [`MediaBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct MediaBuilder {
    media_type: Option<String>,
    group_id: Option<String>,
    name: Option<String>,
    uri: Option<String>,
    language: Option<String>,
    assoc_language: Option<String>,
    characteristics: Option<String>,
    default: Option<String>,
    autoselect: Option<String>,
    forced: Option<String>,
    instream_id: Option<String>,
}

macro_rules! builder_setter {
    ($($field:ident),* $(,)?) => {
        $(
            pub fn $field(mut self, value: impl Into<String>) -> Self {
                self.$field = Some(value.into());
                self
            }
        )*
    };
}

impl MediaBuilder {
    builder_setter!(
        media_type,
        group_id,
        name,
        uri,
        language,
        assoc_language,
        characteristics,
        default,
        autoselect,
        forced,
        instream_id,
    );

    pub fn build(self) -> Result<Media, InvalidMedia> {
        let media_type: MediaType = self
            .media_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(InvalidMedia::MissingField("TYPE"))?
            .parse()?;
        Ok(Media {
            media_type,
            group_id: required("GROUP-ID", self.group_id.as_deref())?,
            name: required("NAME", self.name.as_deref())?,
            default: Flag::parse("DEFAULT", self.default.as_deref())?,
            autoselect: Flag::parse("AUTOSELECT", self.autoselect.as_deref())?,
            forced: Flag::parse("FORCED", self.forced.as_deref())?,
            instream_id: check_instream_id(media_type, self.instream_id.as_deref())?,
            uri: quoted("URI", self.uri.as_deref())?,
            language: quoted("LANGUAGE", self.language.as_deref())?,
            assoc_language: quoted("ASSOC-LANGUAGE", self.assoc_language.as_deref())?,
            characteristics: quoted("CHARACTERISTICS", self.characteristics.as_deref())?,
        })
    }
}

//! Ordered rendition container
//!
//! Holds at most one [`Media`] per [`MediaKey`]. What happens when a second
//! rendition with the same key arrives is chosen by the caller through
//! [`MergePolicy`].

use crate::media::{Media, MediaKey};

/// Conflict resolution when adding a rendition whose key is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// First one wins, the incoming rendition is dropped.
    #[default]
    KeepExisting,
    /// The incoming rendition takes the place of the existing one.
    Replace,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaList {
    items: Vec<Media>,
}

impl MediaList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rendition. Returns `false` when it was dropped in favour of an
    /// existing one.
    ///
    /// A replacement keeps the position of the element it replaces.
    pub fn add(&mut self, media: Media, policy: MergePolicy) -> bool {
        match (self.position(&media.key()), policy) {
            (None, _) => {
                self.items.push(media);
                true
            }
            (Some(_), MergePolicy::KeepExisting) => false,
            (Some(idx), MergePolicy::Replace) => {
                self.items[idx] = media;
                true
            }
        }
    }

    /// Remove the rendition sharing `media`'s key. Absent renditions are
    /// not an error.
    pub fn remove(&mut self, media: &Media) -> Option<Media> {
        let idx = self.position(&media.key())?;
        Some(self.items.remove(idx))
    }

    /// Remove and return the most recently inserted rendition.
    pub fn pop(&mut self) -> Option<Media> {
        self.items.pop()
    }

    pub fn get(&self, key: &MediaKey<'_>) -> Option<&Media> {
        self.position(key).map(|idx| &self.items[idx])
    }

    pub fn contains(&self, media: &Media) -> bool {
        self.position(&media.key()).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Media> {
        self.items.iter()
    }

    /// Renditions ordered by `(type, group-id, name)`.
    pub fn sorted(&self) -> Vec<&Media> {
        let mut sorted: Vec<&Media> = self.items.iter().collect();
        sorted.sort_by(|a, b| a.key().cmp(&b.key()));
        sorted
    }

    fn position(&self, key: &MediaKey<'_>) -> Option<usize> {
        self.items.iter().position(|m| m.key() == *key)
    }
}

impl<'a> IntoIterator for &'a MediaList {
    type Item = &'a Media;
    type IntoIter = std::slice::Iter<'a, Media>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Media> for MediaList {
    fn from_iter<I: IntoIterator<Item = Media>>(iter: I) -> Self {
        let mut list = MediaList::new();
        for media in iter {
            list.add(media, MergePolicy::KeepExisting);
        }
        list
    }
}

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::palette::{DisplayColor, Palette};
use super::tags::normalize_tag;

pub type PersonId = u64;

/// Converts a tag count into a person's radius: `count * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeScale {
    pub scale: f32,
    pub offset: f32,
}

impl Default for SizeScale {
    fn default() -> Self {
        Self {
            scale: 0.3,
            offset: 4.0,
        }
    }
}

impl SizeScale {
    pub fn radius_for(self, tag_count: usize) -> f32 {
        tag_count as f32 * self.scale + self.offset
    }
}

/// Normalized tags of one person, in insertion order and without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Inserts an already-normalized tag. Returns `false` for duplicates and
    /// empty strings.
    pub fn insert(&mut self, tag: String) -> bool {
        if tag.is_empty() || self.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|existing| existing == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Person {
    pub id: PersonId,
    pub tags: TagSet,
    pub radius: f32,
    pub following: BTreeSet<PersonId>,
    pub followed: BTreeSet<PersonId>,
    pub color: DisplayColor,
}

impl Person {
    fn new(id: PersonId, color: DisplayColor) -> Self {
        Self {
            id,
            tags: TagSet::default(),
            radius: 0.0,
            following: BTreeSet::new(),
            followed: BTreeSet::new(),
            color,
        }
    }

    /// Replaces the tag set with the normalized, deduplicated `raw_tags`.
    pub fn set_tags<I, S>(&mut self, raw_tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags = TagSet::default();
        for raw in raw_tags {
            tags.insert(normalize_tag(raw.as_ref()));
        }
        self.tags = tags;
    }

    pub fn resize(&mut self, size: SizeScale) {
        self.radius = size.radius_for(self.tags.len());
    }
}

/// Every person seen this session, keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct People {
    entries: BTreeMap<PersonId, Person>,
}

impl People {
    /// Returns the person with `id`, creating an empty one first if needed.
    ///
    /// A newly created person draws its color from `palette`; an existing one
    /// is returned untouched.
    pub fn upsert(&mut self, id: PersonId, palette: &mut Palette) -> &mut Person {
        self.entries
            .entry(id)
            .or_insert_with(|| Person::new(id, palette.next_color()))
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: PersonId) -> Option<&mut Person> {
        self.entries.get_mut(&id)
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Person> {
        self.entries.values()
    }

    /// Ids `id` follows or is followed by. Empty for unknown ids.
    pub fn neighbors(&self, id: PersonId) -> BTreeSet<PersonId> {
        self.get(id)
            .map(|person| person.following.union(&person.followed).copied().collect())
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

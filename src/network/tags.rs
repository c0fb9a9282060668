use std::collections::HashMap;

use serde::Serialize;

use super::palette::{DisplayColor, Palette};
use super::people::Person;

pub const TAG_SEPARATOR: char = ':';

/// One canonical tag and how often it occurs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TagFrequency {
    pub tag: String,
    pub count: usize,
    pub color: DisplayColor,
}

impl TagFrequency {
    pub fn key(&self) -> String {
        tag_key(&self.tag)
    }
}

/// Comparison key for a tag: case-insensitive.
pub fn tag_key(tag: &str) -> String {
    tag.to_lowercase()
}

/// Strips the trailing run of separators from a raw tag.
///
/// `"@TechCrunch:"` becomes `"@TechCrunch"`, `"@Tech:Crunch"` is left alone.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim_end_matches(TAG_SEPARATOR).to_owned()
}

/// Counts tags over `people`, folding case variants into the first-seen spelling.
///
/// Output is in order of first sighting. Each new entry draws one color from
/// `palette`.
pub fn compute_tag_frequencies<'a, I>(people: I, palette: &mut Palette) -> Vec<TagFrequency>
where
    I: IntoIterator<Item = &'a Person>,
{
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut frequencies: Vec<TagFrequency> = Vec::new();

    for person in people {
        for tag in person.tags.iter() {
            let key = tag_key(tag);
            if let Some(&index) = index_by_key.get(&key) {
                frequencies[index].count += 1;
                continue;
            }

            index_by_key.insert(key, frequencies.len());
            frequencies.push(TagFrequency {
                tag: tag.to_owned(),
                count: 1,
                color: palette.next_color(),
            });
        }
    }

    frequencies
}

/// Combines two frequency tables without touching either.
///
/// On a case-insensitive collision the `base` spelling and color are kept and
/// the counts are summed.
pub fn merge_tag_frequencies(
    base: &[TagFrequency],
    incoming: &[TagFrequency],
) -> Vec<TagFrequency> {
    let mut index_by_key: HashMap<String, usize> =
        HashMap::with_capacity(base.len() + incoming.len());
    let mut merged: Vec<TagFrequency> = Vec::with_capacity(base.len() + incoming.len());

    for entry in base.iter().chain(incoming) {
        let key = entry.key();
        if let Some(&index) = index_by_key.get(&key) {
            merged[index].count += entry.count;
        } else {
            index_by_key.insert(key, merged.len());
            merged.push(entry.clone());
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::people::People;

    fn people_with_tags(tag_lists: &[&[&str]]) -> People {
        let mut people = People::default();
        let mut palette = Palette::seeded(1);
        for (id, tags) in tag_lists.iter().enumerate() {
            people.upsert(id as u64, &mut palette).set_tags(tags.iter().copied());
        }
        people
    }

    fn counts(frequencies: &[TagFrequency]) -> Vec<(&str, usize)> {
        frequencies
            .iter()
            .map(|entry| (entry.tag.as_str(), entry.count))
            .collect()
    }

    fn entry(tag: &str, count: usize) -> TagFrequency {
        TagFrequency {
            tag: tag.to_owned(),
            count,
            color: DisplayColor::new(0, 0, 0),
        }
    }

    #[test]
    fn normalize_leaves_valid_tags_alone() {
        assert_eq!(normalize_tag("@TechCrunch"), "@TechCrunch");
    }

    #[test]
    fn normalize_trims_trailing_separator() {
        assert_eq!(normalize_tag("@TechCrunch:"), "@TechCrunch");
        assert_eq!(normalize_tag("@TechCrunch:::"), "@TechCrunch");
    }

    #[test]
    fn normalize_ignores_embedded_separator() {
        assert_eq!(normalize_tag("@Tech:Crunch"), "@Tech:Crunch");
        assert_eq!(normalize_tag(":lead"), ":lead");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["", ":", "::", "a", "a:", "a::", ":a:", "a:b:", " x : ", "Ünï:"] {
            let once = normalize_tag(raw);
            assert_eq!(normalize_tag(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn counts_single_tag_with_single_person() {
        let people = people_with_tags(&[&["1"]]);
        let result = compute_tag_frequencies(people.values(), &mut Palette::seeded(0));
        assert_eq!(counts(&result), vec![("1", 1)]);
    }

    #[test]
    fn counts_distinct_and_shared_tags() {
        let people = people_with_tags(&[&["1", "2"], &["2", "1"]]);
        let result = compute_tag_frequencies(people.values(), &mut Palette::seeded(0));
        assert_eq!(counts(&result), vec![("1", 2), ("2", 2)]);

        let people = people_with_tags(&[&["1"], &["2"]]);
        let result = compute_tag_frequencies(people.values(), &mut Palette::seeded(0));
        assert_eq!(counts(&result), vec![("1", 1), ("2", 1)]);
    }

    #[test]
    fn ignores_case_and_keeps_first_spelling() {
        let people = people_with_tags(&[&["a", "A"]]);
        let result = compute_tag_frequencies(people.values(), &mut Palette::seeded(0));
        assert_eq!(counts(&result), vec![("a", 2)]);

        let people = people_with_tags(&[&["Rust"], &["rust", "RUST"]]);
        let result = compute_tag_frequencies(people.values(), &mut Palette::seeded(0));
        assert_eq!(counts(&result), vec![("Rust", 3)]);
    }

    #[test]
    fn colors_do_not_affect_counts() {
        let people = people_with_tags(&[&["x", "y"], &["y", "z"]]);
        let first = compute_tag_frequencies(people.values(), &mut Palette::seeded(1));
        let second = compute_tag_frequencies(people.values(), &mut Palette::seeded(99));
        assert_eq!(counts(&first), counts(&second));
    }

    #[test]
    fn aggregation_is_additive_across_disjoint_people() {
        let left = people_with_tags(&[&["x", "y"], &["x"]]);
        let right = people_with_tags(&[&["y", "z"]]);
        let mut palette = Palette::seeded(0);

        let left_counts = compute_tag_frequencies(left.values(), &mut palette);
        let right_counts = compute_tag_frequencies(right.values(), &mut palette);
        let combined = compute_tag_frequencies(
            left.values().chain(right.values()),
            &mut palette,
        );

        for entry in &combined {
            let sum: usize = left_counts
                .iter()
                .chain(&right_counts)
                .filter(|other| other.key() == entry.key())
                .map(|other| other.count)
                .sum();
            assert_eq!(entry.count, sum, "tag {}", entry.tag);
        }
    }

    #[test]
    fn merge_adds_same_tag() {
        let merged = merge_tag_frequencies(&[entry("1", 1)], &[entry("1", 2)]);
        assert_eq!(counts(&merged), vec![("1", 3)]);
    }

    #[test]
    fn merge_keeps_different_tags_apart() {
        let merged = merge_tag_frequencies(&[entry("1", 1)], &[entry("2", 2)]);
        assert_eq!(counts(&merged), vec![("1", 1), ("2", 2)]);
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let table = vec![entry("a", 2), entry("b", 1)];
        assert_eq!(merge_tag_frequencies(&table, &[]), table);
        assert_eq!(merge_tag_frequencies(&[], &table), table);
    }

    #[test]
    fn merge_prefers_base_spelling_and_color() {
        let mut base = entry("Rust", 2);
        base.color = DisplayColor::new(1, 2, 3);
        let mut incoming = entry("rust", 5);
        incoming.color = DisplayColor::new(9, 9, 9);

        let merged = merge_tag_frequencies(&[base.clone()], &[incoming.clone()]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].tag, "Rust");
        assert_eq!(merged[0].count, 7);
        assert_eq!(merged[0].color, DisplayColor::new(1, 2, 3));

        let swapped = merge_tag_frequencies(&[incoming], &[base]);
        assert_eq!(swapped[0].tag, "rust");
        assert_eq!(swapped[0].count, 7);
    }

    #[test]
    fn merge_leaves_inputs_untouched() {
        let base = vec![entry("a", 1)];
        let incoming = vec![entry("A", 4), entry("b", 1)];
        let _ = merge_tag_frequencies(&base, &incoming);
        assert_eq!(base, vec![entry("a", 1)]);
        assert_eq!(incoming, vec![entry("A", 4), entry("b", 1)]);
    }
}

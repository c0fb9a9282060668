use std::collections::HashSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::people::{People, PersonId};
use super::tags::TagFrequency;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// People with at least one tag matching `query`. Empty for a blank query.
pub fn people_matching(people: &People, query: &str) -> HashSet<PersonId> {
    let query = query.trim();
    if query.is_empty() {
        return HashSet::new();
    }

    let matcher = SkimMatcherV2::default();
    people
        .values()
        .filter(|person| {
            person
                .tags
                .iter()
                .any(|tag| fuzzy_match_score(&matcher, tag, query).is_some())
        })
        .map(|person| person.id)
        .collect()
}

/// Tags matching `query`, best match first.
pub fn tags_matching<'a>(frequencies: &'a [TagFrequency], query: &str) -> Vec<&'a TagFrequency> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = frequencies
        .iter()
        .filter_map(|entry| {
            fuzzy_match_score(&matcher, &entry.tag, query).map(|score| (score, entry))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.count.cmp(&a.1.count)));
    scored.into_iter().map(|(_, entry)| entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::palette::{DisplayColor, Palette};

    #[test]
    fn finds_people_by_tag_fragment() {
        let mut people = People::default();
        let mut palette = Palette::seeded(0);
        people.upsert(1, &mut palette).set_tags(["@TechCrunch"]);
        people.upsert(2, &mut palette).set_tags(["@rustlang", "systems"]);
        people.upsert(3, &mut palette);

        assert_eq!(people_matching(&people, "crunch"), HashSet::from([1]));
        assert_eq!(people_matching(&people, "rust"), HashSet::from([2]));
        assert!(people_matching(&people, "   ").is_empty());
        assert!(people_matching(&people, "zzzz").is_empty());
    }

    #[test]
    fn ranks_tags_by_match_quality() {
        let entry = |tag: &str, count| TagFrequency {
            tag: tag.to_owned(),
            count,
            color: DisplayColor::new(0, 0, 0),
        };
        let table = vec![entry("rustacean", 1), entry("rust", 4), entry("go", 3)];

        let matches = tags_matching(&table, "rust");
        let tags = matches.iter().map(|entry| entry.tag.as_str()).collect::<Vec<_>>();
        assert_eq!(tags.len(), 2);
        assert!(tags.contains(&"rust"));
        assert!(tags.contains(&"rustacean"));
        assert!(tags_matching(&table, "").is_empty());
    }
}

use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use super::palette::Palette;
use super::people::{People, Person, PersonId, SizeScale};

/// "`source` follows `target`", as observed once by the sampler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FollowRelationship {
    pub source: PersonId,
    pub target: PersonId,
}

impl From<(PersonId, PersonId)> for FollowRelationship {
    fn from((source, target): (PersonId, PersonId)) -> Self {
        Self { source, target }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchOutcome {
    pub new_people: Vec<Person>,
    pub new_edges: Vec<FollowRelationship>,
}

/// Every id referenced by `pairs`, deduplicated, in first-reference order.
pub fn referenced_ids(pairs: &[(PersonId, PersonId)]) -> Vec<PersonId> {
    let mut seen = HashSet::with_capacity(pairs.len() * 2);
    pairs
        .iter()
        .flat_map(|&(source, target)| [source, target])
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Folds one sampled batch of follow pairs into `people`.
///
/// Tags for ids not yet in `people` are fetched through `fetch_tags` in a
/// single call. Nothing in `people` or `palette` changes unless that call
/// succeeds with one tag list per requested id. Every pair becomes an edge,
/// repeated pairs included.
pub fn apply_batch<F>(
    pairs: &[(PersonId, PersonId)],
    people: &mut People,
    palette: &mut Palette,
    size: SizeScale,
    fetch_tags: F,
) -> Result<BatchOutcome>
where
    F: FnOnce(&[PersonId]) -> Result<Vec<Vec<String>>>,
{
    let new_ids = referenced_ids(pairs)
        .into_iter()
        .filter(|id| !people.contains(*id))
        .collect::<Vec<_>>();

    let fetched = fetch_tags(&new_ids)
        .with_context(|| format!("failed to fetch tags for {} new people", new_ids.len()))?;
    if fetched.len() != new_ids.len() {
        return Err(anyhow!(
            "tag lookup returned {} entries for {} requested ids",
            fetched.len(),
            new_ids.len()
        ));
    }

    for (&id, raw_tags) in new_ids.iter().zip(&fetched) {
        let person = people.upsert(id, palette);
        person.set_tags(raw_tags);
        person.resize(size);
    }

    let mut new_edges = Vec::with_capacity(pairs.len());
    for &(source, target) in pairs {
        people
            .get_mut(source)
            .expect("follower resolved earlier in this batch")
            .following
            .insert(target);
        people
            .get_mut(target)
            .expect("followee resolved earlier in this batch")
            .followed
            .insert(source);
        new_edges.push(FollowRelationship { source, target });
    }

    let new_people = new_ids
        .iter()
        .filter_map(|&id| people.get(id).cloned())
        .collect();

    Ok(BatchOutcome {
        new_people,
        new_edges,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::BTreeSet;

    use super::*;

    fn tags_of(people: &People, id: PersonId) -> Vec<&str> {
        people
            .get(id)
            .map(|person| person.tags.iter().collect())
            .unwrap_or_default()
    }

    fn set(ids: &[PersonId]) -> BTreeSet<PersonId> {
        ids.iter().copied().collect()
    }

    fn lists(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|tags| tags.iter().map(|tag| tag.to_string()).collect())
            .collect()
    }

    #[test]
    fn referenced_ids_keep_first_reference_order() {
        assert_eq!(referenced_ids(&[(3, 1), (1, 2), (2, 3)]), vec![3, 1, 2]);
        assert!(referenced_ids(&[]).is_empty());
    }

    #[test]
    fn builds_people_and_edges_from_empty_registry() {
        let mut people = People::default();
        let mut palette = Palette::seeded(0);
        let calls = Cell::new(0);

        let outcome = apply_batch(
            &[(1, 2), (2, 3)],
            &mut people,
            &mut palette,
            SizeScale::default(),
            |ids| {
                calls.set(calls.get() + 1);
                assert_eq!(ids, &[1, 2, 3]);
                Ok(lists(&[&["x"], &["x", "y"], &["y"]]))
            },
        )
        .expect("batch applies");

        assert_eq!(calls.get(), 1);
        assert_eq!(outcome.new_people.len(), 3);
        assert_eq!(
            outcome.new_edges,
            vec![
                FollowRelationship { source: 1, target: 2 },
                FollowRelationship { source: 2, target: 3 },
            ]
        );

        assert_eq!(tags_of(&people, 1), vec!["x"]);
        assert_eq!(tags_of(&people, 2), vec!["x", "y"]);
        assert_eq!(tags_of(&people, 3), vec!["y"]);

        let one = people.get(1).expect("person 1");
        let two = people.get(2).expect("person 2");
        let three = people.get(3).expect("person 3");
        assert_eq!(one.following, set(&[2]));
        assert!(one.followed.is_empty());
        assert_eq!(two.following, set(&[3]));
        assert_eq!(two.followed, set(&[1]));
        assert!(three.following.is_empty());
        assert_eq!(three.followed, set(&[2]));

        assert!((two.radius - 4.6).abs() < 1e-5);
    }

    #[test]
    fn repeated_pairs_between_known_people_duplicate_edges_only() {
        let mut people = People::default();
        let mut palette = Palette::seeded(0);
        apply_batch(&[(1, 2)], &mut people, &mut palette, SizeScale::default(), |_| {
            Ok(lists(&[&[], &[]]))
        })
        .expect("seed batch applies");
        let before = people.clone();

        let outcome = apply_batch(
            &[(1, 2), (1, 2)],
            &mut people,
            &mut palette,
            SizeScale::default(),
            |ids| {
                assert!(ids.is_empty());
                Ok(Vec::new())
            },
        )
        .expect("batch applies");

        assert!(outcome.new_people.is_empty());
        assert_eq!(outcome.new_edges.len(), 2);
        assert!(outcome.new_edges.iter().all(|edge| *edge == FollowRelationship::from((1, 2))));
        assert_eq!(people, before);
    }

    #[test]
    fn existing_people_keep_their_tags() {
        let mut people = People::default();
        let mut palette = Palette::seeded(0);
        apply_batch(&[(1, 2)], &mut people, &mut palette, SizeScale::default(), |_| {
            Ok(lists(&[&["a"], &["b"]]))
        })
        .expect("seed batch applies");

        apply_batch(&[(2, 3)], &mut people, &mut palette, SizeScale::default(), |ids| {
            assert_eq!(ids, &[3]);
            Ok(lists(&[&["c:"]]))
        })
        .expect("second batch applies");

        assert_eq!(tags_of(&people, 2), vec!["b"]);
        assert_eq!(tags_of(&people, 3), vec!["c"]);
        assert_eq!(people.get(2).map(|p| p.following.clone()), Some(set(&[3])));
        assert_eq!(people.get(2).map(|p| p.followed.clone()), Some(set(&[1])));
    }

    #[test]
    fn failed_fetch_leaves_registry_untouched() {
        let mut people = People::default();
        let mut palette = Palette::seeded(0);
        apply_batch(&[(1, 2)], &mut people, &mut palette, SizeScale::default(), |_| {
            Ok(lists(&[&["a"], &["b"]]))
        })
        .expect("seed batch applies");
        let people_before = people.clone();
        let palette_before = palette.clone();

        let result = apply_batch(
            &[(2, 3), (1, 3)],
            &mut people,
            &mut palette,
            SizeScale::default(),
            |_| Err(anyhow!("lookup service unavailable")),
        );

        assert!(result.is_err());
        assert_eq!(people, people_before);
        assert_eq!(palette, palette_before);
    }

    #[test]
    fn short_tag_response_is_rejected() {
        let mut people = People::default();
        let mut palette = Palette::seeded(0);

        let result = apply_batch(
            &[(1, 2)],
            &mut people,
            &mut palette,
            SizeScale::default(),
            |_| Ok(lists(&[&["only one"]])),
        );

        assert!(result.is_err());
        assert!(people.is_empty());
    }

    #[test]
    fn self_follow_is_recorded_on_both_sides() {
        let mut people = People::default();
        let mut palette = Palette::seeded(0);

        apply_batch(&[(5, 5)], &mut people, &mut palette, SizeScale::default(), |ids| {
            assert_eq!(ids, &[5]);
            Ok(lists(&[&[]]))
        })
        .expect("batch applies");

        let person = people.get(5).expect("person 5");
        assert_eq!(person.following, set(&[5]));
        assert_eq!(person.followed, set(&[5]));
    }
}

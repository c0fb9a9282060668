use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use super::people::PersonId;

/// The external source of follow observations and profile tags.
pub trait Sampler: Send + Sync {
    /// One batch of `(follower, followee)` pairs.
    fn sample(&self) -> Result<Vec<(PersonId, PersonId)>>;

    /// Raw tags for each of `ids`, in the same order.
    fn tags(&self, ids: &[PersonId]) -> Result<Vec<Vec<String>>>;
}

#[derive(Clone, Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    people: Vec<RawProfile>,
    follows: Vec<(PersonId, PersonId)>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawProfile {
    id: PersonId,
    #[serde(default)]
    tags: Vec<String>,
}

/// Samples follow pairs out of a JSON dump of a social network.
///
/// ```json
/// { "people": [{ "id": 1, "tags": ["@rust:"] }], "follows": [[1, 2]] }
/// ```
///
/// People missing from `people` have no tags.
pub struct SnapshotSampler {
    tags_by_id: HashMap<PersonId, Vec<String>>,
    follows: Vec<(PersonId, PersonId)>,
    batch_size: usize,
    rng: Mutex<StdRng>,
}

impl SnapshotSampler {
    pub fn load(path: &Path, batch_size: usize, seed: u64) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let sampler = Self::from_json(&raw, batch_size, seed)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;

        log::info!(
            "loaded snapshot {} with {} profiles and {} follows",
            path.display(),
            sampler.tags_by_id.len(),
            sampler.follow_count()
        );
        Ok(sampler)
    }

    pub fn from_json(raw: &str, batch_size: usize, seed: u64) -> Result<Self> {
        let snapshot: RawSnapshot = serde_json::from_str(raw).context("invalid snapshot JSON")?;
        if snapshot.follows.is_empty() {
            return Err(anyhow!("snapshot contains no follow relationships"));
        }

        let tags_by_id = snapshot
            .people
            .into_iter()
            .map(|profile| (profile.id, profile.tags))
            .collect();

        Ok(Self {
            tags_by_id,
            follows: snapshot.follows,
            batch_size: batch_size.max(1),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }

    pub fn follow_count(&self) -> usize {
        self.follows.len()
    }
}

impl Sampler for SnapshotSampler {
    fn sample(&self) -> Result<Vec<(PersonId, PersonId)>> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow!("snapshot sampler lock poisoned"))?;

        Ok((0..self.batch_size)
            .map(|_| self.follows[rng.gen_range(0..self.follows.len())])
            .collect())
    }

    fn tags(&self, ids: &[PersonId]) -> Result<Vec<Vec<String>>> {
        Ok(ids
            .iter()
            .map(|id| self.tags_by_id.get(id).cloned().unwrap_or_default())
            .collect())
    }
}

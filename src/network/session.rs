use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use super::follow::{FollowRelationship, apply_batch};
use super::palette::Palette;
use super::people::{People, SizeScale};
use super::sampler::Sampler;
use super::tags::{TagFrequency, compute_tag_frequencies, merge_tag_frequencies};

/// Everything consumers of the session get to see.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NetworkState {
    pub people: People,
    pub follows: Vec<FollowRelationship>,
    pub tag_frequencies: Vec<TagFrequency>,
}

/// Size of the drawing surface. Carried for consumers, not used by the core.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub center: (f32, f32),
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            center: (width / 2.0, height / 2.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    pub size: SizeScale,
    pub palette_seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            size: SizeScale::default(),
            palette_seed: 0x5eed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchSummary {
    pub new_people: usize,
    pub new_edges: usize,
}

struct PreparedBatch {
    state: NetworkState,
    palette: Palette,
    summary: BatchSummary,
}

/// Runs one add cycle against a private copy of `base`.
fn prepare_batch(
    sampler: &dyn Sampler,
    base: &NetworkState,
    mut palette: Palette,
    size: SizeScale,
) -> Result<PreparedBatch> {
    let pairs = sampler.sample().context("failed to sample follow pairs")?;

    let mut state = base.clone();
    let outcome = apply_batch(&pairs, &mut state.people, &mut palette, size, |ids| {
        sampler.tags(ids)
    })?;

    let batch_frequencies = compute_tag_frequencies(&outcome.new_people, &mut palette);
    state.tag_frequencies = merge_tag_frequencies(&base.tag_frequencies, &batch_frequencies);
    state.follows.extend_from_slice(&outcome.new_edges);

    Ok(PreparedBatch {
        state,
        palette,
        summary: BatchSummary {
            new_people: outcome.new_people.len(),
            new_edges: outcome.new_edges.len(),
        },
    })
}

/// Owns the published network state and drives add/clear cycles.
///
/// Published state is only ever replaced wholesale, so a reader holding an
/// `Arc<NetworkState>` never sees a half-applied batch. At most one batch is
/// in flight at a time.
pub struct Session {
    sampler: Arc<dyn Sampler>,
    size: SizeScale,
    palette: Palette,
    state: Arc<NetworkState>,
    viewport: Viewport,
    pending: Option<Receiver<Result<PreparedBatch>>>,
}

impl Session {
    pub fn new(sampler: Arc<dyn Sampler>, config: SessionConfig) -> Self {
        Self {
            sampler,
            size: config.size,
            palette: Palette::seeded(config.palette_seed),
            state: Arc::new(NetworkState::default()),
            viewport: Viewport::new(0.0, 0.0),
            pending: None,
        }
    }

    pub fn state(&self) -> Arc<NetworkState> {
        Arc::clone(&self.state)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn is_adding(&self) -> bool {
        self.pending.is_some()
    }

    /// Samples and applies one batch on the calling thread.
    ///
    /// Failures are logged and leave the published state as it was.
    pub fn add(&mut self) -> Option<BatchSummary> {
        if self.pending.is_some() {
            log::warn!("ignoring add while a background batch is in flight");
            return None;
        }

        let result = prepare_batch(
            self.sampler.as_ref(),
            &self.state,
            self.palette.clone(),
            self.size,
        );
        self.commit(result)
    }

    /// Runs `batches` adds back to back and returns how many committed.
    ///
    /// Fails when at least one batch was requested and none committed.
    pub fn add_batches(&mut self, batches: usize) -> Result<usize> {
        let committed = (0..batches).filter(|_| self.add().is_some()).count();
        if committed < batches {
            log::warn!("{} of {batches} batches failed", batches - committed);
        }
        if batches > 0 && committed == 0 {
            return Err(anyhow!("none of the {batches} requested batches committed"));
        }
        Ok(committed)
    }

    /// Starts one add cycle on a worker thread. Returns `false` if one is
    /// already running.
    pub fn request_add(&mut self) -> bool {
        if self.pending.is_some() {
            log::debug!("add requested while a batch is in flight");
            return false;
        }

        let (tx, rx) = mpsc::channel();
        let sampler = Arc::clone(&self.sampler);
        let base = Arc::clone(&self.state);
        let palette = self.palette.clone();
        let size = self.size;

        thread::spawn(move || {
            let result = prepare_batch(sampler.as_ref(), &base, palette, size);
            let _ = tx.send(result);
        });

        self.pending = Some(rx);
        true
    }

    /// Publishes the in-flight batch if it has finished.
    pub fn poll(&mut self) -> Option<BatchSummary> {
        let rx = self.pending.take()?;
        match rx.try_recv() {
            Ok(result) => self.commit(result),
            Err(TryRecvError::Empty) => {
                self.pending = Some(rx);
                None
            }
            Err(TryRecvError::Disconnected) => {
                log::error!("background batch worker disconnected");
                None
            }
        }
    }

    /// Blocks until the in-flight batch, if any, finishes and publishes it.
    pub fn finish_pending(&mut self) -> Option<BatchSummary> {
        let rx = self.pending.take()?;
        match rx.recv() {
            Ok(result) => self.commit(result),
            Err(_) => {
                log::error!("background batch worker disconnected");
                None
            }
        }
    }

    /// Publishes an empty network. Any batch still in flight is dropped.
    pub fn clear(&mut self) {
        if self.pending.take().is_some() {
            log::debug!("discarding in-flight batch on clear");
        }
        self.state = Arc::new(NetworkState::default());
        log::info!("cleared network");
    }

    fn commit(&mut self, result: Result<PreparedBatch>) -> Option<BatchSummary> {
        match result {
            Ok(batch) => {
                self.palette = batch.palette;
                self.state = Arc::new(batch.state);
                log::info!(
                    "added batch: {} new people, {} new follows ({} people, {} follows total)",
                    batch.summary.new_people,
                    batch.summary.new_edges,
                    self.state.people.len(),
                    self.state.follows.len()
                );
                log::debug!("{} display colors assigned so far", self.palette.drawn());
                Some(batch.summary)
            }
            Err(error) => {
                log::error!("failed to add batch: {error:#}");
                None
            }
        }
    }
}

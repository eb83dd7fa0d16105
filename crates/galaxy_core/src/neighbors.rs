//! Approximate k-nearest-neighbor search
//!
//! Each point searches only the points whose flat index lies within
//! `search_buffer` of its own. Because the grid is stored column-major, this
//! window covers a band of neighboring columns. Quality degrades gracefully as
//! `accuracy` drops.
//!
//! Searches are independent units: each one owns the neighbor list of a
//! single point and reads positions only, so they can settle in any order
//! and a failing unit leaves its point's previous list in place.

use crate::error::{GalaxyError, Result};
use galaxy_paint::Point;
use smallvec::SmallVec;
use std::ops::Range;

pub type NeighborList = SmallVec<[usize; 8]>;

/// Search unit for a single point
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborJob {
    pub id: usize,
    pub window: Range<usize>,
    pub links: usize,
}

impl NeighborJob {
    /// Build the search unit for point `id` among `len` points
    pub fn new(id: usize, len: usize, buffer: usize, links: usize) -> Self {
        Self {
            id,
            window: id.saturating_sub(buffer)..id.saturating_add(buffer).min(len),
            links,
        }
    }

    /// Collect up to `links` near points from the window.
    ///
    /// Candidates fill empty slots first; after that a candidate replaces
    /// the first slot that is farther away than it.
    pub fn run(&self, positions: &[Point]) -> Result<NeighborList> {
        let origin = positions
            .get(self.id)
            .copied()
            .ok_or_else(|| GalaxyError::NeighborSearch {
                id: self.id,
                reason: format!("index outside {} points", positions.len()),
            })?;
        if !origin.x.is_finite() || !origin.y.is_finite() {
            return Err(GalaxyError::NeighborSearch {
                id: self.id,
                reason: "non-finite position".to_string(),
            });
        }

        let mut closest = NeighborList::new();
        let end = self.window.end.min(positions.len());
        for candidate in self.window.start..end {
            if candidate == self.id {
                continue;
            }
            let distance = origin.distance(positions[candidate]);
            if !distance.is_finite() {
                continue;
            }
            if closest.len() < self.links {
                closest.push(candidate);
                continue;
            }
            let farther = closest
                .iter()
                .position(|near| distance < origin.distance(positions[*near]));
            if let Some(slot) = farther {
                closest[slot] = candidate;
            }
        }
        Ok(closest)
    }
}

/// One unit per point
pub fn plan(len: usize, buffer: usize, links: usize) -> Vec<NeighborJob> {
    (0..len)
        .map(|id| NeighborJob::new(id, len, buffer, links))
        .collect()
}

/// Run every unit and collect each outcome, failures included
pub fn settle_all(jobs: &[NeighborJob], positions: &[Point]) -> Vec<(usize, Result<NeighborList>)> {
    jobs.iter().map(|job| (job.id, job.run(positions))).collect()
}

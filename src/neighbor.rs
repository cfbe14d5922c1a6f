use crate::roadway::StraightRoadway;
use crate::scene::Scene;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How far ahead or behind to look for a neighbor by default, in m.
pub const DEFAULT_SEARCH_DISTANCE: f64 = 250.0; // m

/// The nearest vehicle ahead of or behind another.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NeighborLongitudinalResult {
    /// The neighbor's slot, or 0 if there is none.
    pub index: usize,
    /// The longitudinal distance to the neighbor in m.
    /// Only meaningful if `index` is not 0.
    pub distance: f64,
}

/// Locates the nearest neighbors of a vehicle along its lane.
pub trait NeighborSearch {
    /// Finds the nearest vehicle ahead of the one in `slot`.
    fn fore(
        &self,
        scene: &Scene,
        roadway: &StraightRoadway,
        slot: usize,
    ) -> NeighborLongitudinalResult;

    /// Finds the nearest vehicle behind the one in `slot`.
    fn rear(
        &self,
        scene: &Scene,
        roadway: &StraightRoadway,
        slot: usize,
    ) -> NeighborLongitudinalResult;
}

/// Searches for neighbors along a [StraightRoadway], wrapping around its ends.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RingRoadNeighborSearch {
    /// Vehicles further away than this, in m, are not neighbors.
    pub max_distance: f64,
}

/// The fore and rear neighbors of every vehicle in a scene.
///
/// This is a snapshot: it is not updated if the scene changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeadFollowRelationships {
    /// The slot of the vehicle ahead of each slot, or 0 if there is none.
    fore_index: Vec<usize>,
    /// The slot of the vehicle behind each slot, or 0 if there is none.
    rear_index: Vec<usize>,
}

impl NeighborLongitudinalResult {
    /// A result with no neighbor.
    pub const fn none(distance: f64) -> Self {
        Self { index: 0, distance }
    }

    /// The neighbor's slot, if one was found.
    pub fn neighbor(&self) -> Option<usize> {
        Some(self.index).filter(|index| *index != 0)
    }
}

impl Default for RingRoadNeighborSearch {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_SEARCH_DISTANCE,
        }
    }
}

impl RingRoadNeighborSearch {
    /// Creates a search limited to the given distance in m.
    pub fn new(max_distance: f64) -> Self {
        Self { max_distance }
    }

    /// Finds the closest other vehicle, where `dist` measures how far ahead
    /// a position is from the ego position in the search direction.
    fn nearest(
        &self,
        scene: &Scene,
        roadway: &StraightRoadway,
        slot: usize,
        dist: impl Fn(f64, f64) -> f64,
    ) -> NeighborLongitudinalResult {
        let none = NeighborLongitudinalResult::none(self.max_distance);
        let Some(ego) = scene.get(slot) else {
            return none;
        };
        let ego_s = ego.state.frenet(roadway).s;

        scene
            .iter()
            .filter(|(other_slot, _)| *other_slot != slot)
            .map(|(other_slot, other)| (other_slot, dist(ego_s, other.state.frenet(roadway).s)))
            .filter(|(_, distance)| *distance > 0.0 && *distance <= self.max_distance)
            .fold(none, |best, (index, distance)| {
                if best.index == 0 || distance < best.distance {
                    NeighborLongitudinalResult { index, distance }
                } else {
                    best
                }
            })
    }
}

impl NeighborSearch for RingRoadNeighborSearch {
    fn fore(
        &self,
        scene: &Scene,
        roadway: &StraightRoadway,
        slot: usize,
    ) -> NeighborLongitudinalResult {
        self.nearest(scene, roadway, slot, |ego, other| roadway.normalize(other - ego))
    }

    fn rear(
        &self,
        scene: &Scene,
        roadway: &StraightRoadway,
        slot: usize,
    ) -> NeighborLongitudinalResult {
        self.nearest(scene, roadway, slot, |ego, other| roadway.normalize(ego - other))
    }
}

impl LeadFollowRelationships {
    /// Finds the neighbors of every vehicle in the scene.
    pub fn compute<S>(scene: &Scene, roadway: &StraightRoadway, search: &S) -> Self
    where
        S: NeighborSearch + ?Sized,
    {
        Self::compute_for(scene, roadway, search, 1..=scene.len())
    }

    /// Finds the neighbors of the vehicles in the given slots.
    /// Every other slot is left without neighbors, and slots not in the scene are ignored.
    pub fn compute_for<S>(
        scene: &Scene,
        roadway: &StraightRoadway,
        search: &S,
        slots: impl IntoIterator<Item = usize>,
    ) -> Self
    where
        S: NeighborSearch + ?Sized,
    {
        let mut fore_index = vec![0; scene.len()];
        let mut rear_index = vec![0; scene.len()];

        for slot in slots {
            if scene.get(slot).is_none() {
                continue;
            }
            fore_index[slot - 1] = search.fore(scene, roadway, slot).index;
            rear_index[slot - 1] = search.rear(scene, roadway, slot).index;
        }

        Self {
            fore_index,
            rear_index,
        }
    }

    /// The slot ahead of each slot, 0 meaning none.
    pub fn fore_index(&self) -> &[usize] {
        &self.fore_index
    }

    /// The slot behind each slot, 0 meaning none.
    pub fn rear_index(&self) -> &[usize] {
        &self.rear_index
    }

    /// The slot of the vehicle ahead of the one in `slot`.
    pub fn fore(&self, slot: usize) -> Option<usize> {
        Self::lookup(&self.fore_index, slot)
    }

    /// The slot of the vehicle behind the one in `slot`.
    pub fn rear(&self, slot: usize) -> Option<usize> {
        Self::lookup(&self.rear_index, slot)
    }

    fn lookup(indices: &[usize], slot: usize) -> Option<usize> {
        slot.checked_sub(1)
            .and_then(|idx| indices.get(idx))
            .copied()
            .filter(|index| *index != 0)
    }
}

//! Kinematic and relational features of recorded vehicle trajectories.
//!
//! Vehicle slots are numbered from 1 wherever they cross the public API;
//! a slot of 0 always means "none".

pub use cgmath;
pub use collision::{first_collision, has_collision, BoundingBoxOverlap, CollisionPredicate};
pub use error::{FeatureError, Result};
pub use feature::{
    derivative_of, features, standard, Feature, FeatureAttributes, FeatureDescriptor,
    FeatureRegistry, FeatureState, FeatureType, FeatureValue, FeatureVec, Strategy, Symbol,
};
pub use neighbor::{
    LeadFollowRelationships, NeighborLongitudinalResult, NeighborSearch, RingRoadNeighborSearch,
};
pub use record::{FrameSequence, SceneRecord};
pub use roadway::{normalize_position, Frenet, StraightRoadway};
pub use scene::{Entity, Scene, VehicleDef, VehicleState};
pub use slotmap::{Key, KeyData};
pub use util::Interval;

mod collision;
mod error;
mod feature;
pub mod math;
mod neighbor;
mod record;
mod roadway;
mod scene;
mod util;

slotmap::new_key_type! {
    /// Tracked identity of a vehicle, stable across frames.
    pub struct VehicleId;
}

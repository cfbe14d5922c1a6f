//! The standard kinematic and relational features.
//!
//! Longitudinal (`fs`) and lateral (`ft`) components are measured relative to the roadway.

use super::{
    FeatureAttributes, FeatureDescriptor, FeatureRegistry, FeatureType, FeatureValue, Symbol,
};
use crate::collision::{BoundingBoxOverlap, CollisionPredicate};
use crate::error::Result;
use crate::math::rot90;
use crate::neighbor::{NeighborSearch, RingRoadNeighborSearch};
use crate::record::FrameSequence;
use crate::roadway::StraightRoadway;
use crate::scene::{Entity, Scene};
use cgmath::InnerSpace;

pub const SPEED: Symbol = Symbol("speed");
pub const POSFT: Symbol = Symbol("posft");
pub const VELFS: Symbol = Symbol("velfs");
pub const VELFT: Symbol = Symbol("velft");
pub const ACC: Symbol = Symbol("acc");
pub const ACCFS: Symbol = Symbol("accfs");
pub const ACCFT: Symbol = Symbol("accft");
pub const JERK: Symbol = Symbol("jerk");
pub const JERKFS: Symbol = Symbol("jerkfs");
pub const JERKFT: Symbol = Symbol("jerkft");
pub const DIST_FRONT: Symbol = Symbol("dist_front");
pub const IS_COLLIDING: Symbol = Symbol("is_colliding");

pub const SPEED_ATTRIBUTES: FeatureAttributes = FeatureAttributes {
    name: "Speed",
    symbol: SPEED,
    inherent_type: FeatureType::Float,
    units: "m/s",
    lower_bound: -5.0,
    upper_bound: 40.0,
    can_be_missing: false,
    censor_low: -5.0,
    censor_high: 40.0,
    history: 1,
};

pub const POSFT_ATTRIBUTES: FeatureAttributes = FeatureAttributes {
    name: "Lateral offset",
    symbol: POSFT,
    units: "m",
    lower_bound: -5.0,
    upper_bound: 5.0,
    censor_low: -5.0,
    censor_high: 5.0,
    ..SPEED_ATTRIBUTES
};

pub const VELFS_ATTRIBUTES: FeatureAttributes = FeatureAttributes {
    name: "Longitudinal velocity",
    symbol: VELFS,
    ..SPEED_ATTRIBUTES
};

pub const VELFT_ATTRIBUTES: FeatureAttributes = FeatureAttributes {
    name: "Lateral velocity",
    symbol: VELFT,
    lower_bound: -5.0,
    upper_bound: 5.0,
    censor_low: -5.0,
    censor_high: 5.0,
    ..SPEED_ATTRIBUTES
};

pub const ACC_ATTRIBUTES: FeatureAttributes = FeatureAttributes {
    name: "Acceleration",
    symbol: ACC,
    units: "m/s^2",
    lower_bound: -9.0,
    upper_bound: 7.0,
    censor_low: -9.0,
    censor_high: 7.0,
    history: 2,
    ..SPEED_ATTRIBUTES
};

pub const ACCFS_ATTRIBUTES: FeatureAttributes = FeatureAttributes {
    name: "Longitudinal acceleration",
    symbol: ACCFS,
    ..ACC_ATTRIBUTES
};

pub const ACCFT_ATTRIBUTES: FeatureAttributes = FeatureAttributes {
    name: "Lateral acceleration",
    symbol: ACCFT,
    lower_bound: -2.0,
    upper_bound: 2.0,
    censor_low: -2.0,
    censor_high: 2.0,
    ..ACC_ATTRIBUTES
};

pub const JERK_ATTRIBUTES: FeatureAttributes = FeatureAttributes {
    name: "Jerk",
    symbol: JERK,
    units: "m/s^3",
    lower_bound: -75.0,
    upper_bound: 75.0,
    censor_low: -75.0,
    censor_high: 75.0,
    history: 3,
    ..SPEED_ATTRIBUTES
};

pub const JERKFS_ATTRIBUTES: FeatureAttributes = FeatureAttributes {
    name: "Longitudinal jerk",
    symbol: JERKFS,
    ..JERK_ATTRIBUTES
};

pub const JERKFT_ATTRIBUTES: FeatureAttributes = FeatureAttributes {
    name: "Lateral jerk",
    symbol: JERKFT,
    ..JERK_ATTRIBUTES
};

pub const DIST_FRONT_ATTRIBUTES: FeatureAttributes = FeatureAttributes {
    name: "Gap to the vehicle in front",
    symbol: DIST_FRONT,
    inherent_type: FeatureType::Float,
    units: "m",
    lower_bound: 0.0,
    upper_bound: 250.0,
    can_be_missing: true,
    censor_low: 0.0,
    censor_high: 100.0,
    history: 1,
};

pub const IS_COLLIDING_ATTRIBUTES: FeatureAttributes = FeatureAttributes {
    name: "Is colliding",
    symbol: IS_COLLIDING,
    inherent_type: FeatureType::Bool,
    units: "",
    lower_bound: 0.0,
    upper_bound: 1.0,
    can_be_missing: false,
    censor_low: 0.0,
    censor_high: 1.0,
    history: 1,
};

/// Declares every standard feature in the registry.
pub fn declare_all(registry: &mut FeatureRegistry) -> Result<()> {
    registry.declare(&SPEED_ATTRIBUTES, speed)?;
    registry.declare(&POSFT_ATTRIBUTES, posft)?;
    registry.declare(&VELFS_ATTRIBUTES, velfs)?;
    registry.declare(&VELFT_ATTRIBUTES, velft)?;

    registry.declare_derivative(&ACC_ATTRIBUTES, SPEED)?;
    registry.declare_derivative(&ACCFS_ATTRIBUTES, VELFS)?;
    registry.declare_derivative(&ACCFT_ATTRIBUTES, VELFT)?;
    registry.declare_derivative(&JERK_ATTRIBUTES, ACC)?;
    registry.declare_derivative(&JERKFS_ATTRIBUTES, ACCFS)?;
    registry.declare_derivative(&JERKFT_ATTRIBUTES, ACCFT)?;

    registry.declare(&DIST_FRONT_ATTRIBUTES, dist_front)?;
    registry.declare(&IS_COLLIDING_ATTRIBUTES, is_colliding)?;
    Ok(())
}

/// Gets the scene at `pastframe` and the entity in `slot` of it.
fn entity_at(rec: &dyn FrameSequence, slot: usize, pastframe: i32) -> Option<(&Scene, &Entity)> {
    let scene = rec.scene(pastframe)?;
    scene.get(slot).map(|entity| (scene, entity))
}

fn speed(
    _: &FeatureDescriptor,
    rec: &dyn FrameSequence,
    _: &StraightRoadway,
    slot: usize,
    pastframe: i32,
) -> FeatureValue {
    entity_at(rec, slot, pastframe)
        .map(|(_, entity)| FeatureValue::new(entity.state.vel))
        .unwrap_or_else(FeatureValue::missing)
}

fn posft(
    _: &FeatureDescriptor,
    rec: &dyn FrameSequence,
    roadway: &StraightRoadway,
    slot: usize,
    pastframe: i32,
) -> FeatureValue {
    entity_at(rec, slot, pastframe)
        .map(|(_, entity)| FeatureValue::new(entity.state.frenet(roadway).t))
        .unwrap_or_else(FeatureValue::missing)
}

fn velfs(
    _: &FeatureDescriptor,
    rec: &dyn FrameSequence,
    roadway: &StraightRoadway,
    slot: usize,
    pastframe: i32,
) -> FeatureValue {
    entity_at(rec, slot, pastframe)
        .map(|(_, entity)| FeatureValue::new(entity.state.velocity().dot(roadway.tangent())))
        .unwrap_or_else(FeatureValue::missing)
}

fn velft(
    _: &FeatureDescriptor,
    rec: &dyn FrameSequence,
    roadway: &StraightRoadway,
    slot: usize,
    pastframe: i32,
) -> FeatureValue {
    let normal = rot90(roadway.tangent());
    entity_at(rec, slot, pastframe)
        .map(|(_, entity)| FeatureValue::new(entity.state.velocity().dot(normal)))
        .unwrap_or_else(FeatureValue::missing)
}

/// The bumper to bumper gap to the vehicle in front.
fn dist_front(
    descriptor: &FeatureDescriptor,
    rec: &dyn FrameSequence,
    roadway: &StraightRoadway,
    slot: usize,
    pastframe: i32,
) -> FeatureValue {
    let Some((scene, entity)) = entity_at(rec, slot, pastframe) else {
        return FeatureValue::missing();
    };
    let fore = RingRoadNeighborSearch::default().fore(scene, roadway, slot);
    match scene.get(fore.index) {
        Some(leader) => {
            let gap = fore.distance - 0.5 * (entity.def.length + leader.def.length);
            descriptor.censor(gap)
        }
        None => FeatureValue::censored_high(),
    }
}

fn is_colliding(
    _: &FeatureDescriptor,
    rec: &dyn FrameSequence,
    roadway: &StraightRoadway,
    slot: usize,
    pastframe: i32,
) -> FeatureValue {
    let Some((scene, entity)) = entity_at(rec, slot, pastframe) else {
        return FeatureValue::missing();
    };
    let colliding = scene
        .iter()
        .filter(|(other_slot, _)| *other_slot != slot)
        .any(|(_, other)| BoundingBoxOverlap.is_colliding(entity, other, roadway));
    FeatureValue::new(if colliding { 1.0 } else { 0.0 })
}

use crate::math::{Point2d, Vector2d};
use crate::roadway::{Frenet, StraightRoadway};
use crate::VehicleId;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The physical attributes of a vehicle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleDef {
    /// The vehicle length in m.
    pub length: f64,
    /// The vehicle width in m.
    pub width: f64,
}

/// The kinematic state of a vehicle in a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleState {
    /// The world space coordinates of the centre of the vehicle.
    pub pos: Point2d,
    /// The heading in world space, in radians anticlockwise from the x axis.
    pub heading: f64,
    /// The velocity in m/s.
    pub vel: f64,
}

/// A tracked vehicle as recorded in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entity {
    /// The vehicle's tracked identity.
    pub id: VehicleId,
    /// The vehicle's physical attributes.
    pub def: VehicleDef,
    /// The vehicle's kinematic state.
    pub state: VehicleState,
}

/// The vehicles recorded in a single frame.
///
/// Slots are numbered from 1 and are not stable across frames;
/// use [Scene::find] to relocate a vehicle by its identity.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scene {
    entities: Vec<Entity>,
}

impl VehicleDef {
    /// A typical passenger car.
    pub const CAR: VehicleDef = VehicleDef {
        length: 4.0,
        width: 1.8,
    };
}

impl VehicleState {
    /// Creates a new vehicle state.
    pub fn new(pos: Point2d, heading: f64, vel: f64) -> Self {
        Self { pos, heading, vel }
    }

    /// The vehicle's velocity vector in world space, in m/s.
    pub fn velocity(&self) -> Vector2d {
        self.vel * Vector2d::new(self.heading.cos(), self.heading.sin())
    }

    /// The vehicle's pose relative to the roadway.
    pub fn frenet(&self, roadway: &StraightRoadway) -> Frenet {
        roadway.frenet(self.pos, self.heading)
    }
}

impl Entity {
    /// Creates a new entity.
    pub fn new(id: VehicleId, def: VehicleDef, state: VehicleState) -> Self {
        Self { id, def, state }
    }
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds an entity to the end of the scene, returning its slot.
    pub fn push(&mut self, entity: Entity) -> usize {
        self.entities.push(entity);
        self.entities.len()
    }

    /// The number of occupied slots.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Gets the entity in the given slot.
    pub fn get(&self, slot: usize) -> Option<&Entity> {
        slot.checked_sub(1).and_then(|idx| self.entities.get(idx))
    }

    /// Gets the tracked identity of the entity in the given slot.
    pub fn id_at(&self, slot: usize) -> Option<VehicleId> {
        self.get(slot).map(|entity| entity.id)
    }

    /// Finds the slot holding the entity with the given identity.
    pub fn find(&self, id: VehicleId) -> Option<usize> {
        self.entities
            .iter()
            .position(|entity| entity.id == id)
            .map(|idx| idx + 1)
    }

    /// Iterates over the occupied slots and their entities, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(idx, entity)| (idx + 1, entity))
    }
}

impl FromIterator<Entity> for Scene {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}

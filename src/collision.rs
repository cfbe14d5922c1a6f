use crate::roadway::StraightRoadway;
use crate::scene::{Entity, Scene};
use crate::util::Interval;
use itertools::Itertools;

/// Decides whether two vehicles overlap.
pub trait CollisionPredicate {
    fn is_colliding(&self, a: &Entity, b: &Entity, roadway: &StraightRoadway) -> bool;
}

impl<F> CollisionPredicate for F
where
    F: Fn(&Entity, &Entity, &StraightRoadway) -> bool,
{
    fn is_colliding(&self, a: &Entity, b: &Entity, roadway: &StraightRoadway) -> bool {
        self(a, b, roadway)
    }
}

/// Treats each vehicle as a box aligned with the roadway.
/// Two vehicles collide if their boxes overlap both longitudinally and laterally.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundingBoxOverlap;

impl CollisionPredicate for BoundingBoxOverlap {
    fn is_colliding(&self, a: &Entity, b: &Entity, roadway: &StraightRoadway) -> bool {
        let (fa, fb) = (a.state.frenet(roadway), b.state.frenet(roadway));

        // Measure the longitudinal separation the short way round the ring
        let length = roadway.length();
        let ds = roadway.normalize(fb.s - fa.s);
        let ds = if ds > 0.5 * length { ds - length } else { ds };

        let long_a = Interval::disc(0.0, 0.5 * a.def.length);
        let long_b = Interval::disc(ds, 0.5 * b.def.length);
        let lat_a = Interval::disc(fa.t, 0.5 * a.def.width);
        let lat_b = Interval::disc(fb.t, 0.5 * b.def.width);
        long_a.overlaps(&long_b) && lat_a.overlaps(&lat_b)
    }
}

/// Finds the first pair of colliding vehicles in the scene.
///
/// Pairs are tested in the order (1, 2), (1, 3), ..., (2, 3), ..., stopping at the first collision.
/// Returns `(0, 0)` if no vehicles collide.
pub fn first_collision<P>(scene: &Scene, roadway: &StraightRoadway, predicate: &P) -> (usize, usize)
where
    P: CollisionPredicate + ?Sized,
{
    let found = (1..=scene.len())
        .tuple_combinations::<(usize, usize)>()
        .find(|&(i, j)| {
            matches!(
                (scene.get(i), scene.get(j)),
                (Some(a), Some(b)) if predicate.is_colliding(a, b, roadway)
            )
        });

    match found {
        Some((i, j)) => {
            log::debug!("Vehicles in slots {} and {} are colliding", i, j);
            (i, j)
        }
        None => (0, 0),
    }
}

/// Whether any pair of vehicles in the scene collide.
pub fn has_collision<P>(scene: &Scene, roadway: &StraightRoadway, predicate: &P) -> bool
where
    P: CollisionPredicate + ?Sized,
{
    first_collision(scene, roadway, predicate) != (0, 0)
}

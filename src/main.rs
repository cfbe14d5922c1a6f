use std::time::Instant;

use slotmap::SlotMap;
use traffic_features::math::Point2d;
use traffic_features::{
    features, has_collision, standard, BoundingBoxOverlap, Entity, FrameSequence,
    LeadFollowRelationships, RingRoadNeighborSearch, SceneRecord, StraightRoadway, VehicleDef,
    VehicleId, VehicleState,
};

const TIMESTEP: f64 = 0.1; // s
const NUM_VEHICLES: usize = 100;
const NUM_FRAMES: usize = 1000;

fn main() {
    let roadway = StraightRoadway::new(10.0 * NUM_VEHICLES as f64);
    let mut ids = SlotMap::<VehicleId, ()>::with_key();
    let vehicles = (0..NUM_VEHICLES)
        .map(|i| (ids.insert(()), 10.0 * i as f64))
        .collect::<Vec<_>>();

    let symbols = [
        standard::SPEED,
        standard::ACC,
        standard::JERK,
        standard::VELFT,
        standard::DIST_FRONT,
    ];
    let search = RingRoadNeighborSearch::default();
    let mut rec = SceneRecord::new(4, TIMESTEP);

    println!("Extracting...");
    let start = Instant::now();
    let mut collisions = 0;
    let mut led = 0;
    for frame in 0..NUM_FRAMES {
        let t = frame as f64 * TIMESTEP;
        rec.update(
            vehicles
                .iter()
                .map(|(id, s0)| {
                    let vel = 15.0 + (t + s0).sin();
                    let pos = Point2d::new(s0 + 15.0 * t - (t + s0).cos(), 0.0);
                    Entity::new(*id, VehicleDef::CAR, VehicleState::new(pos, 0.0, vel))
                })
                .collect(),
        );

        let Some(scene) = rec.scene(0) else {
            continue;
        };
        let rel = LeadFollowRelationships::compute(scene, &roadway, &search);
        led += rel.fore_index().iter().filter(|index| **index != 0).count();
        if has_collision(scene, &roadway, &BoundingBoxOverlap) {
            collisions += 1;
        }
        for (slot, _) in scene.iter() {
            if let Err(err) = features().extract(&symbols, &rec, &roadway, slot, 0) {
                eprintln!("{}", err);
                return;
            }
        }
    }

    let frame = start.elapsed() / NUM_FRAMES as u32;
    println!(
        "Avg. frame: {:?} --> {:.0} vehicle frames/s ({} collision frames, {} with a leader)",
        frame,
        NUM_VEHICLES as f64 / frame.as_secs_f64(),
        collisions,
        led,
    );
}

use super::{Feature, FeatureValue};
use crate::record::FrameSequence;
use crate::roadway::StraightRoadway;

/// Computes the backward difference of `base` for a vehicle.
///
/// The vehicle in `slot` of the frame at offset `pastframe` is relocated by its identity
/// in the frame `frames_back` frames earlier, since slots are not stable across frames.
/// If either frame is unavailable, the vehicle does not appear in the earlier frame,
/// or `frames_back` is 0, the result is `0.0` with insufficient history.
///
/// # Parameters
/// * `base` - The feature to differentiate
/// * `rec` - The recorded frames
/// * `roadway` - The roadway the frames were recorded on
/// * `slot` - The vehicle's slot in the frame at `pastframe`
/// * `pastframe` - The frame offset to differentiate at, 0 being the most recent
/// * `frames_back` - How many frames back to difference against
pub fn derivative_of(
    base: &Feature,
    rec: &dyn FrameSequence,
    roadway: &StraightRoadway,
    slot: usize,
    pastframe: i32,
    frames_back: u32,
) -> FeatureValue {
    let earlier = i32::try_from(frames_back)
        .ok()
        .filter(|frames_back| *frames_back > 0)
        .and_then(|frames_back| pastframe.checked_sub(frames_back));

    let located = earlier.and_then(|earlier| {
        if !rec.pastframe_inbounds(pastframe) || !rec.pastframe_inbounds(earlier) {
            return None;
        }
        let elapsed = Some(rec.elapsed_time(earlier, pastframe)).filter(|dt| *dt > 0.0)?;
        let id = rec.scene(pastframe)?.id_at(slot)?;
        let earlier_slot = rec.scene(earlier)?.find(id)?;
        Some((earlier, earlier_slot, elapsed))
    });

    let Some((earlier, earlier_slot, elapsed)) = located else {
        log::trace!(
            "{}: insufficient history for slot {} at frame {}",
            base.symbol(),
            slot,
            pastframe
        );
        return FeatureValue::insufficient_history();
    };

    let current = base.get(rec, roadway, slot, pastframe).value;
    let past = base.get(rec, roadway, earlier_slot, earlier).value;
    FeatureValue::new((current - past) / elapsed)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::feature::{standard::SPEED_ATTRIBUTES, FeatureDescriptor, FeatureState};
    use crate::math::Point2d;
    use crate::{Entity, SceneRecord, VehicleDef, VehicleId, VehicleState};
    use assert_approx_eq::assert_approx_eq;
    use slotmap::SlotMap;

    fn speed_feature() -> Feature {
        Feature::new(
            FeatureDescriptor::new(SPEED_ATTRIBUTES),
            |_, rec, _, slot, pastframe| {
                rec.scene(pastframe)
                    .and_then(|scene| scene.get(slot))
                    .map(|entity| FeatureValue::new(entity.state.vel))
                    .unwrap_or_else(FeatureValue::missing)
            },
        )
    }

    fn entity(id: VehicleId, x: f64, vel: f64) -> Entity {
        let state = VehicleState::new(Point2d::new(x, 0.0), 0.0, vel);
        Entity::new(id, VehicleDef::CAR, state)
    }

    #[test]
    fn backward_difference() {
        let mut ids = SlotMap::<VehicleId, ()>::with_key();
        let (a, b) = (ids.insert(()), ids.insert(()));
        let roadway = StraightRoadway::new(100.0);
        let mut rec = SceneRecord::new(5, 0.1);
        rec.update([entity(a, 0.0, 10.0), entity(b, 20.0, 5.0)].into_iter().collect());
        // Slot order is swapped in the newer frame
        rec.update([entity(b, 20.5, 5.0), entity(a, 1.0, 12.0)].into_iter().collect());

        let speed = speed_feature();
        let acc = derivative_of(&speed, &rec, &roadway, 2, 0, 1);
        assert_eq!(acc.state, FeatureState::Good);
        assert_approx_eq!(acc.value, 20.0);

        let acc = derivative_of(&speed, &rec, &roadway, 1, 0, 1);
        assert_eq!(acc.state, FeatureState::Good);
        assert_approx_eq!(acc.value, 0.0);
    }

    #[test]
    fn spans_several_frames() {
        let mut ids = SlotMap::<VehicleId, ()>::with_key();
        let a = ids.insert(());
        let roadway = StraightRoadway::new(100.0);
        let mut rec = SceneRecord::new(5, 0.5);
        for vel in [1.0, 2.0, 4.0] {
            rec.update(std::iter::once(entity(a, 0.0, vel)).collect());
        }
        let acc = derivative_of(&speed_feature(), &rec, &roadway, 1, 0, 2);
        assert_approx_eq!(acc.value, 3.0);
        let acc = derivative_of(&speed_feature(), &rec, &roadway, 1, -1, 1);
        assert_approx_eq!(acc.value, 2.0);
    }

    #[test]
    fn identity_lost() {
        let mut ids = SlotMap::<VehicleId, ()>::with_key();
        let (a, b) = (ids.insert(()), ids.insert(()));
        let roadway = StraightRoadway::new(100.0);
        let mut rec = SceneRecord::new(5, 0.1);
        rec.update(std::iter::once(entity(a, 0.0, 10.0)).collect());
        rec.update([entity(a, 1.0, 10.0), entity(b, 50.0, 8.0)].into_iter().collect());

        let acc = derivative_of(&speed_feature(), &rec, &roadway, 2, 0, 1);
        assert_eq!(acc, FeatureValue::insufficient_history());
    }

    #[test]
    fn frames_out_of_range() {
        let mut ids = SlotMap::<VehicleId, ()>::with_key();
        let a = ids.insert(());
        let roadway = StraightRoadway::new(100.0);
        let mut rec = SceneRecord::new(5, 0.1);
        rec.update(std::iter::once(entity(a, 0.0, 10.0)).collect());
        rec.update(std::iter::once(entity(a, 1.0, 11.0)).collect());

        let speed = speed_feature();
        let cases = [(0, 2), (-1, 1), (1, 1), (-5, 1), (0, u32::MAX), (0, 0), (-1, 0)];
        for (pastframe, frames_back) in cases {
            let acc = derivative_of(&speed, &rec, &roadway, 1, pastframe, frames_back);
            assert_eq!(acc, FeatureValue::insufficient_history());
        }
    }

    #[test]
    fn slot_not_in_frame() {
        let mut ids = SlotMap::<VehicleId, ()>::with_key();
        let a = ids.insert(());
        let roadway = StraightRoadway::new(100.0);
        let mut rec = SceneRecord::new(5, 0.1);
        rec.update(std::iter::once(entity(a, 0.0, 10.0)).collect());
        rec.update(std::iter::once(entity(a, 1.0, 11.0)).collect());

        let speed = speed_feature();
        for slot in [0, 2, usize::MAX] {
            let acc = derivative_of(&speed, &rec, &roadway, slot, 0, 1);
            assert_eq!(acc, FeatureValue::insufficient_history());
        }
        assert!(derivative_of(&speed, &rec, &roadway, 1, 0, 1).is_valid());
    }
}

use super::{
    derivative_of, standard, Feature, FeatureAttributes, FeatureDescriptor, FeatureValue, Symbol,
};
use crate::error::{FeatureError, Result};
use crate::record::FrameSequence;
use crate::roadway::StraightRoadway;
use once_cell::sync::Lazy;
use smallvec::SmallVec;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// The values of several features for one vehicle, in request order.
pub type FeatureVec = SmallVec<[FeatureValue; 8]>;

/// The process-wide registry, built from the standard feature set on first use.
static FEATURES: Lazy<FeatureRegistry> =
    Lazy::new(|| FeatureRegistry::standard().expect("Standard feature set is inconsistent"));

/// Gets the process-wide feature registry.
///
/// The registry is fully populated before this returns and is never mutated afterwards,
/// so it may be shared freely between threads.
pub fn features() -> &'static FeatureRegistry {
    &FEATURES
}

/// A catalog of declared features, keyed by symbol.
///
/// A registry is populated with [FeatureRegistry::declare] during initialization
/// and only read from afterwards.
#[derive(Clone, Debug, Default)]
pub struct FeatureRegistry {
    features: HashMap<Symbol, Feature>,
}

impl FeatureRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a registry holding the [standard] feature set.
    pub fn standard() -> Result<Self> {
        let mut registry = Self::new();
        standard::declare_all(&mut registry)?;
        Ok(registry)
    }

    /// Declares a feature and binds it to the strategy that computes it.
    ///
    /// Fails if the symbol is already declared or the bounds are inverted.
    pub fn declare<F>(
        &mut self,
        attributes: &FeatureAttributes,
        strategy: F,
    ) -> Result<&FeatureDescriptor>
    where
        F: Fn(&FeatureDescriptor, &dyn FrameSequence, &StraightRoadway, usize, i32) -> FeatureValue
            + Send
            + Sync
            + 'static,
    {
        let symbol = attributes.symbol;
        if attributes.lower_bound > attributes.upper_bound {
            return Err(FeatureError::InvalidBounds {
                symbol,
                lower: attributes.lower_bound,
                upper: attributes.upper_bound,
            });
        }

        match self.features.entry(symbol) {
            Entry::Occupied(_) => Err(FeatureError::DuplicateSymbol(symbol)),
            Entry::Vacant(entry) => {
                log::debug!("Declared feature `{}` ({})", symbol, attributes.name);
                let descriptor = FeatureDescriptor::new(*attributes);
                let feature = entry.insert(Feature::new(descriptor, strategy));
                Ok(feature.descriptor())
            }
        }
    }

    /// Declares the first time derivative of an already declared feature.
    pub fn declare_derivative(
        &mut self,
        attributes: &FeatureAttributes,
        base: Symbol,
    ) -> Result<&FeatureDescriptor> {
        let base = self.feature(base)?.clone();
        self.declare(attributes, move |_, rec, roadway, slot, pastframe| {
            derivative_of(&base, rec, roadway, slot, pastframe, 1)
        })
    }

    /// Whether a feature with the given symbol has been declared.
    pub fn is_declared(&self, symbol: Symbol) -> bool {
        self.features.contains_key(&symbol)
    }

    /// Gets the descriptor of a declared feature.
    pub fn lookup(&self, symbol: Symbol) -> Result<&FeatureDescriptor> {
        self.feature(symbol).map(Feature::descriptor)
    }

    /// Gets a declared feature, ready to be evaluated.
    pub fn feature(&self, symbol: Symbol) -> Result<&Feature> {
        self.features
            .get(&symbol)
            .ok_or(FeatureError::NotFound(symbol))
    }

    /// Iterates over the descriptors of every declared feature, in no particular order.
    pub fn all(&self) -> impl Iterator<Item = &FeatureDescriptor> {
        self.features.values().map(Feature::descriptor)
    }

    /// The number of declared features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether no features have been declared.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Computes a feature for the vehicle in `slot` of the frame at offset `pastframe`.
    pub fn evaluate(
        &self,
        symbol: Symbol,
        rec: &dyn FrameSequence,
        roadway: &StraightRoadway,
        slot: usize,
        pastframe: i32,
    ) -> Result<FeatureValue> {
        Ok(self.feature(symbol)?.get(rec, roadway, slot, pastframe))
    }

    /// Computes several features for one vehicle, in the order requested.
    pub fn extract(
        &self,
        symbols: &[Symbol],
        rec: &dyn FrameSequence,
        roadway: &StraightRoadway,
        slot: usize,
        pastframe: i32,
    ) -> Result<FeatureVec> {
        symbols
            .iter()
            .map(|symbol| self.evaluate(*symbol, rec, roadway, slot, pastframe))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::feature::{FeatureState, FeatureType};
    use crate::math::Point2d;
    use crate::{Entity, SceneRecord, VehicleDef, VehicleId, VehicleState};
    use assert_approx_eq::assert_approx_eq;
    use slotmap::SlotMap;

    const GAP: FeatureAttributes = FeatureAttributes {
        name: "Gap",
        symbol: Symbol("gap"),
        inherent_type: FeatureType::Float,
        units: "m",
        lower_bound: 0.0,
        upper_bound: 50.0,
        can_be_missing: false,
        censor_low: 0.0,
        censor_high: 50.0,
        history: 1,
    };

    const GAP_RATE: FeatureAttributes = FeatureAttributes {
        name: "Gap rate",
        symbol: Symbol("gap_rate"),
        units: "m/s",
        lower_bound: -20.0,
        upper_bound: 20.0,
        censor_low: -20.0,
        censor_high: 20.0,
        history: 2,
        ..GAP
    };

    /// A toy feature: the x coordinate of the vehicle.
    fn x_coord(
        _: &FeatureDescriptor,
        rec: &dyn FrameSequence,
        _: &StraightRoadway,
        slot: usize,
        pastframe: i32,
    ) -> FeatureValue {
        rec.scene(pastframe)
            .and_then(|scene| scene.get(slot))
            .map(|entity| FeatureValue::new(entity.state.pos.x))
            .unwrap_or_else(FeatureValue::missing)
    }

    #[test]
    fn duplicate_symbol() {
        let mut registry = FeatureRegistry::new();
        registry.declare(&GAP, x_coord).unwrap();
        let err = registry.declare(&GAP, x_coord).unwrap_err();
        assert_eq!(err, FeatureError::DuplicateSymbol(Symbol("gap")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn inverted_bounds() {
        let mut registry = FeatureRegistry::new();
        let attributes = FeatureAttributes {
            lower_bound: 1.0,
            upper_bound: -1.0,
            ..GAP
        };
        let err = registry.declare(&attributes, x_coord).unwrap_err();
        assert!(matches!(err, FeatureError::InvalidBounds { .. }));
        assert!(!registry.is_declared(Symbol("gap")));
    }

    #[test]
    fn lookup() {
        let mut registry = FeatureRegistry::new();
        assert!(registry.is_empty());
        registry.declare(&GAP, x_coord).unwrap();

        assert!(registry.is_declared(Symbol("gap")));
        let descriptor = registry.lookup(Symbol("gap")).unwrap();
        assert_eq!(descriptor.units(), "m");
        assert_eq!(descriptor.upper_bound(), 50.0);
        assert_eq!(
            registry.lookup(Symbol("nope")).unwrap_err(),
            FeatureError::NotFound(Symbol("nope"))
        );
        assert_eq!(registry.all().count(), 1);
    }

    #[test]
    fn derivative_of_declared_feature() {
        let mut registry = FeatureRegistry::new();
        assert_eq!(
            registry.declare_derivative(&GAP_RATE, Symbol("gap")).unwrap_err(),
            FeatureError::NotFound(Symbol("gap"))
        );
        registry.declare(&GAP, x_coord).unwrap();
        let descriptor = registry.declare_derivative(&GAP_RATE, Symbol("gap")).unwrap();
        assert_eq!(descriptor.history(), 2);

        let mut ids = SlotMap::<VehicleId, ()>::with_key();
        let id = ids.insert(());
        let roadway = StraightRoadway::new(100.0);
        let mut rec = SceneRecord::new(4, 0.5);
        for x in [10.0, 13.0] {
            let state = VehicleState::new(Point2d::new(x, 0.0), 0.0, 6.0);
            rec.update(std::iter::once(Entity::new(id, VehicleDef::CAR, state)).collect());
        }

        let rate = registry.evaluate(Symbol("gap_rate"), &rec, &roadway, 1, 0).unwrap();
        assert_eq!(rate.state, FeatureState::Good);
        assert_approx_eq!(rate.value, 6.0);

        let rate = registry.evaluate(Symbol("gap_rate"), &rec, &roadway, 1, -1).unwrap();
        assert_eq!(rate, FeatureValue::insufficient_history());

        let values = registry
            .extract(&[Symbol("gap_rate"), Symbol("gap")], &rec, &roadway, 1, 0)
            .unwrap();
        assert_eq!(values.len(), 2);
        assert_approx_eq!(values[1].value, 13.0);
        assert!(registry
            .extract(&[Symbol("gap"), Symbol("nope")], &rec, &roadway, 1, 0)
            .is_err());
    }

    #[test]
    fn shared_across_threads() {
        let registry = features();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    assert!(registry.is_declared(standard::SPEED));
                    assert!(registry.lookup(standard::JERK).is_ok());
                });
            }
        });
    }
}

//! Feature values, descriptors and the feature registry.

use crate::record::FrameSequence;
use crate::roadway::StraightRoadway;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use derivative::derivative_of;
pub use registry::{features, FeatureRegistry, FeatureVec};

mod derivative;
mod registry;
pub mod standard;

/// The quality of a computed feature value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FeatureState {
    /// The value is trustworthy.
    #[default]
    Good,
    /// A best-effort value produced despite missing prior data.
    InsufficientHistory,
    /// No value could be computed.
    Missing,
    /// The value was clipped against the upper operating bound.
    CensoredHigh,
    /// The value was clipped against the lower operating bound.
    CensoredLow,
}

/// A scalar feature value tagged with its quality.
///
/// The state is the only source of truth for validity; never test the value for NaN instead.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeatureValue {
    pub value: f64,
    pub state: FeatureState,
}

/// The kind of scalar a feature inherently produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureType {
    Float,
    Int,
    Bool,
}

/// The unique key a feature is registered under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(pub &'static str);

/// The attributes a feature is declared with.
#[derive(Clone, Copy, Debug)]
pub struct FeatureAttributes {
    /// A human readable name.
    pub name: &'static str,
    /// The unique key of the feature.
    pub symbol: Symbol,
    /// The kind of scalar produced.
    pub inherent_type: FeatureType,
    /// The units of the value, or an empty string if dimensionless.
    pub units: &'static str,
    /// The smallest value the feature is expected to take.
    pub lower_bound: f64,
    /// The largest value the feature is expected to take.
    pub upper_bound: f64,
    /// Whether the feature may legitimately be missing.
    pub can_be_missing: bool,
    /// Values below this are reported as censored low.
    pub censor_low: f64,
    /// Values above this are reported as censored high.
    pub censor_high: f64,
    /// The number of frames of history the feature needs, including the current one.
    pub history: usize,
}

/// The immutable metadata of a declared feature.
#[derive(Clone, Debug)]
pub struct FeatureDescriptor {
    attributes: FeatureAttributes,
}

/// Computes a feature for the vehicle in `slot` of the frame at offset `pastframe`.
pub type Strategy = Arc<
    dyn Fn(&FeatureDescriptor, &dyn FrameSequence, &StraightRoadway, usize, i32) -> FeatureValue
        + Send
        + Sync,
>;

/// A declared feature: its descriptor bound to the strategy that computes it.
#[derive(Clone)]
pub struct Feature {
    descriptor: Arc<FeatureDescriptor>,
    strategy: Strategy,
}

impl FeatureValue {
    /// Creates a trustworthy value.
    pub const fn new(value: f64) -> Self {
        Self {
            value,
            state: FeatureState::Good,
        }
    }

    /// Creates a value with an explicit state.
    pub const fn with_state(value: f64, state: FeatureState) -> Self {
        Self { value, state }
    }

    /// The best-effort result when prior frames are unavailable.
    pub const fn insufficient_history() -> Self {
        Self::with_state(0.0, FeatureState::InsufficientHistory)
    }

    /// The result when no value can be computed.
    pub const fn missing() -> Self {
        Self::with_state(f64::NAN, FeatureState::Missing)
    }

    /// The result when the value exceeds the upper censoring bound.
    pub const fn censored_high() -> Self {
        Self::with_state(f64::NAN, FeatureState::CensoredHigh)
    }

    /// The result when the value falls below the lower censoring bound.
    pub const fn censored_low() -> Self {
        Self::with_state(f64::NAN, FeatureState::CensoredLow)
    }

    /// Whether the value may be used.
    pub fn is_valid(&self) -> bool {
        matches!(
            self.state,
            FeatureState::Good | FeatureState::InsufficientHistory
        )
    }
}

impl Default for FeatureValue {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<FeatureValue> for f64 {
    fn from(value: FeatureValue) -> Self {
        value.value
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FeatureDescriptor {
    pub(crate) fn new(attributes: FeatureAttributes) -> Self {
        Self { attributes }
    }

    pub fn name(&self) -> &'static str {
        self.attributes.name
    }

    pub fn symbol(&self) -> Symbol {
        self.attributes.symbol
    }

    pub fn inherent_type(&self) -> FeatureType {
        self.attributes.inherent_type
    }

    pub fn units(&self) -> &'static str {
        self.attributes.units
    }

    pub fn lower_bound(&self) -> f64 {
        self.attributes.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.attributes.upper_bound
    }

    pub fn can_be_missing(&self) -> bool {
        self.attributes.can_be_missing
    }

    pub fn censor_low(&self) -> f64 {
        self.attributes.censor_low
    }

    pub fn censor_high(&self) -> f64 {
        self.attributes.censor_high
    }

    /// The number of frames of history the feature needs, including the current one.
    pub fn history(&self) -> usize {
        self.attributes.history
    }

    /// Tags a raw value as censored if it lies outside the censoring bounds.
    pub fn censor(&self, value: f64) -> FeatureValue {
        if value > self.attributes.censor_high {
            FeatureValue::censored_high()
        } else if value < self.attributes.censor_low {
            FeatureValue::censored_low()
        } else {
            FeatureValue::new(value)
        }
    }
}

impl Feature {
    pub(crate) fn new<F>(descriptor: FeatureDescriptor, strategy: F) -> Self
    where
        F: Fn(&FeatureDescriptor, &dyn FrameSequence, &StraightRoadway, usize, i32) -> FeatureValue
            + Send
            + Sync
            + 'static,
    {
        Self {
            descriptor: Arc::new(descriptor),
            strategy: Arc::new(strategy),
        }
    }

    /// The feature's metadata.
    pub fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    /// The feature's symbol.
    pub fn symbol(&self) -> Symbol {
        self.descriptor.symbol()
    }

    /// Computes the feature for the vehicle in `slot` of the frame at offset `pastframe`.
    pub fn get(
        &self,
        rec: &dyn FrameSequence,
        roadway: &StraightRoadway,
        slot: usize,
        pastframe: i32,
    ) -> FeatureValue {
        (self.strategy)(&self.descriptor, rec, roadway, slot, pastframe)
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Feature({})", self.descriptor.symbol())
    }
}

use crate::scene::Scene;
use std::collections::VecDeque;

/// An ordered, time-indexed history of scenes.
///
/// Frames are addressed by a non-positive offset relative to the most recent
/// frame: 0 is the current frame, -1 the one before it, and so on.
pub trait FrameSequence {
    /// Gets the scene at the given offset, if it has been recorded.
    fn scene(&self, pastframe: i32) -> Option<&Scene>;

    /// Whether a scene has been recorded at the given offset.
    fn pastframe_inbounds(&self, pastframe: i32) -> bool {
        self.scene(pastframe).is_some()
    }

    /// The time elapsed between two frame offsets, in s.
    fn elapsed_time(&self, from: i32, to: i32) -> f64;
}

/// A bounded record of the most recent scenes, sampled at a fixed timestep.
#[derive(Clone, Debug)]
pub struct SceneRecord {
    /// The recorded scenes, most recent first.
    frames: VecDeque<Scene>,
    /// The maximum number of scenes retained.
    capacity: usize,
    /// The time between consecutive frames in s.
    timestep: f64,
}

impl SceneRecord {
    /// Creates an empty record.
    ///
    /// # Parameters
    /// * `capacity` - The number of frames to retain; must be at least one.
    /// * `timestep` - The time between frames in s; must be positive.
    pub fn new(capacity: usize, timestep: f64) -> Self {
        if capacity == 0 {
            panic!("Scene record must retain at least one frame");
        }
        if !(timestep > 0.0) {
            panic!("Scene record timestep must be positive, got {}", timestep);
        }
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
            timestep,
        }
    }

    /// Records a new current frame, discarding the oldest if the record is full.
    pub fn update(&mut self, scene: Scene) {
        if self.frames.len() == self.capacity {
            self.frames.pop_back();
        }
        self.frames.push_front(scene);
    }

    /// Discards every recorded frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// The number of frames currently recorded.
    pub fn nframes(&self) -> usize {
        self.frames.len()
    }

    /// The maximum number of frames retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The time between consecutive frames in s.
    pub fn timestep(&self) -> f64 {
        self.timestep
    }
}

impl FrameSequence for SceneRecord {
    fn scene(&self, pastframe: i32) -> Option<&Scene> {
        if pastframe > 0 {
            return None;
        }
        self.frames.get(pastframe.unsigned_abs() as usize)
    }

    fn pastframe_inbounds(&self, pastframe: i32) -> bool {
        pastframe <= 0 && (pastframe.unsigned_abs() as usize) < self.frames.len()
    }

    fn elapsed_time(&self, from: i32, to: i32) -> f64 {
        (f64::from(to) - f64::from(from)) * self.timestep
    }
}

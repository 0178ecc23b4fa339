use serde::{Deserialize, Serialize};

/// Landmark indices in the 21-point hand model published by the tracker.
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;

/// Number of landmarks a complete hand observation carries.
pub const LANDMARK_COUNT: usize = 21;

/// A single hand landmark, normalized to [0, 1] relative to the frame.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar distance to another landmark (depth is ignored, matching
    /// the tracker's 2D gesture geometry).
    pub fn distance_to(&self, other: &Landmark) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(&self, other: &Landmark) -> (f64, f64) {
        ((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// One entry of a confidence-ranked classification list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CategoryScore {
    pub label: String,
    #[serde(default)]
    pub score: f32,
}

impl CategoryScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Everything the tracker reports about one detected hand in one frame.
///
/// `handedness` and `gestures` are ranked best-first. The engine only
/// ever reads the top entry of each; the full lists are kept so the
/// status surface can show runners-up.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct HandObservation {
    pub landmarks: Vec<Landmark>,
    pub handedness: Vec<CategoryScore>,
    pub gestures: Vec<CategoryScore>,
}

impl HandObservation {
    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    pub fn top_handedness(&self) -> Option<&str> {
        self.handedness.first().map(|c| c.label.as_str())
    }

    pub fn top_gesture(&self) -> Option<&str> {
        self.gestures.first().map(|c| c.label.as_str())
    }
}

/// The per-frame result published by the external tracker process.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RecognitionResult {
    pub hands: Vec<HandObservation>,
}

impl RecognitionResult {
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}

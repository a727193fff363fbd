use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Position or direction in simulation space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit vector pointing the same way, or `None` for the zero vector.
    /// A zero-length direction cannot determine a facing.
    pub fn normalized(self) -> Option<Self> {
        let len_sq = self.length_squared();
        if len_sq <= f32::EPSILON {
            return None;
        }
        let inv = len_sq.sqrt().recip();
        Some(Self::new(self.x * inv, self.y * inv, self.z * inv))
    }

    /// Linear interpolation from `self` to `other`. `t = 0` yields `self`
    /// exactly and `t = 1` yields `other` exactly.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        if t >= 1.0 {
            return other;
        }
        self + (other - self) * t
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Robot positions reported by one poll. The length is fixed for the whole
/// session at `num_agents`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RobotsSnapshot {
    pub positions: Vec<Vec3>,
}

/// Box positions reported by one poll. `num_boxes` is the authoritative
/// count and may shrink between polls as boxes are delivered server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoxesSnapshot {
    pub positions: Vec<Vec3>,
    #[serde(rename = "numBoxes")]
    pub num_boxes: usize,
}

/// The single goal location.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ObjectiveSnapshot {
    pub position: Vec3,
}

/// Session parameters sent once at startup, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    #[serde(rename = "numAgents")]
    pub num_agents: usize,
    pub width: u32,
    pub height: u32,
    pub density: f32,
}

impl SessionConfig {
    /// Key/value pairs for the form-encoded init request body.
    pub fn form_fields(&self) -> [(&'static str, String); 4] {
        [
            ("numAgents", self.num_agents.to_string()),
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
            ("density", self.density.to_string()),
        ]
    }
}

pub fn decode_robots_json(data: &str) -> serde_json::Result<RobotsSnapshot> {
    serde_json::from_str(data)
}

pub fn decode_boxes_json(data: &str) -> serde_json::Result<BoxesSnapshot> {
    serde_json::from_str(data)
}

pub fn decode_objective_json(data: &str) -> serde_json::Result<ObjectiveSnapshot> {
    serde_json::from_str(data)
}

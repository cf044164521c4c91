//! 3-D vector type and ground-plane utilities.
//!
//! The ground plane is `x`/`z`; `y` is height.  Almost every movement
//! decision (arrival, formation spacing, reservation overlap) is made on the
//! ground plane, so the `planar_*` helpers ignore `y`.  Full 3-D distance is
//! only used where height genuinely matters.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A position or direction in world space, single precision.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// A point on the ground plane at height 0.
    #[inline]
    pub const fn ground(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    /// Copy of `self` with the height replaced.
    #[inline]
    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }

    /// Projection onto the ground plane (`y = 0`).
    #[inline]
    pub fn planar(self) -> Self {
        Self { y: 0.0, ..self }
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    /// Distance on the ground plane, ignoring height.
    #[inline]
    pub fn planar_distance(self, other: Vec3) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Unit-length copy, or `None` for (near-)zero vectors.
    pub fn try_normalize(self) -> Option<Vec3> {
        let len = self.length();
        if len <= f32::EPSILON {
            None
        } else {
            Some(self * (1.0 / len))
        }
    }

    /// Ground-plane heading in radians, measured from +z towards +x.
    /// Returns `None` when the planar component is zero.
    pub fn yaw(self) -> Option<f32> {
        if self.x.abs() <= f32::EPSILON && self.z.abs() <= f32::EPSILON {
            None
        } else {
            Some(self.x.atan2(self.z))
        }
    }

    /// Unit ground-plane direction for a heading in radians (inverse of [`yaw`](Self::yaw)).
    #[inline]
    pub fn from_yaw(yaw: f32) -> Vec3 {
        Vec3::ground(yaw.sin(), yaw.cos())
    }

    /// Unit vector perpendicular to `self` on the ground plane (rotated
    /// 90° clockwise when seen from above).
    #[inline]
    pub fn planar_right(self) -> Vec3 {
        Vec3::ground(self.z, -self.x)
    }

    #[inline]
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self + (other - self) * t
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Signed smallest difference `to - from` between two angles, in `(-π, π]`.
pub fn angle_delta(from: f32, to: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut d = (to - from) % TAU;
    if d > PI {
        d -= TAU;
    } else if d <= -PI {
        d += TAU;
    }
    d
}

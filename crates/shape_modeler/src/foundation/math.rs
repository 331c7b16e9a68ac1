//! Math utilities and types
//!
//! Provides the matrix and vector types used by the scene graph, plus the
//! axis-aligned transform builders the editor's incremental operations use.

use std::fmt;
use std::str::FromStr;

pub use nalgebra::{Matrix4, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (used for RGBA colors)
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// One of the three world axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The X axis
    X,
    /// The Y axis
    Y,
    /// The Z axis
    Z,
}

impl Axis {
    /// All axes in X, Y, Z order
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Component index of this axis in a vector
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Normalized direction of this axis
    pub fn unit(self) -> Unit<Vec3> {
        match self {
            Self::X => Vec3::x_axis(),
            Self::Y => Vec3::y_axis(),
            Self::Z => Vec3::z_axis(),
        }
    }

    /// Vector with `value` on this axis and `fill` on the other two
    pub fn select(self, value: f32, fill: f32) -> Vec3 {
        let mut v = Vec3::repeat(fill);
        v[self.index()] = value;
        v
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        };
        f.write_str(name)
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            other => Err(format!("unknown axis '{other}'")),
        }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

/// Extension trait for Mat4 with the builders the modeler needs
pub trait Mat4Ext {
    /// Translation by `offset`
    fn translation(offset: Vec3) -> Mat4;

    /// Rotation of `degrees` around a world axis
    fn rotation_deg(axis: Axis, degrees: f32) -> Mat4;

    /// Non-uniform scaling by `factors`
    fn scaling(factors: Vec3) -> Mat4;

    /// Conjugate `self` so it acts around `pivot` instead of the origin:
    /// `translate(pivot) * self * translate(-pivot)`
    fn about_pivot(&self, pivot: Vec3) -> Mat4;

    /// Offset held in the fourth column
    fn translation_part(&self) -> Vec3;

    /// Diagonal entries of the upper 3x3 block
    fn scale_diagonal(&self) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn translation(offset: Vec3) -> Mat4 {
        Mat4::new_translation(&offset)
    }

    fn rotation_deg(axis: Axis, degrees: f32) -> Mat4 {
        Mat4::from_axis_angle(&axis.unit(), utils::deg_to_rad(degrees))
    }

    fn scaling(factors: Vec3) -> Mat4 {
        Mat4::new_nonuniform_scaling(&factors)
    }

    fn about_pivot(&self, pivot: Vec3) -> Mat4 {
        Mat4::new_translation(&pivot) * self * Mat4::new_translation(&(-pivot))
    }

    fn translation_part(&self) -> Vec3 {
        Vec3::new(self[(0, 3)], self[(1, 3)], self[(2, 3)])
    }

    fn scale_diagonal(&self) -> Vec3 {
        Vec3::new(self[(0, 0)], self[(1, 1)], self[(2, 2)])
    }
}

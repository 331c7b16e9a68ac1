//! # Procedural Geometry Generation
//!
//! Pure functions that tessellate the four modeler primitives into flat
//! triangle lists in their canonical local frame, plus the immutable
//! [`Shape`] asset that wraps one generated list.
//!
//! ## Supported Primitives
//!
//! - **Sphere**: unit-radius UV sphere, `6 * 2^level` stacks and slices
//! - **Cylinder**: radius 0.5, height 1 along Y, `8 * 2^level` slices
//! - **Box**: unit cube of half-extent 0.5, level is ignored
//! - **Cone**: radius 0.5, height 1 along Y, `8 * 2^level` slices
//!
//! ## Usage
//!
//! ```rust
//! use shape_modeler::geometry::{generate, ShapeKind, TessellationLevel};
//!
//! let mesh = generate(ShapeKind::Box, TessellationLevel::new(3));
//! assert_eq!(mesh.vertex_count(), 36);
//! ```

pub mod primitives;
mod shape;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Vec3, Vec4};

pub use primitives::{generate_box, generate_cone, generate_cylinder, generate_sphere};
pub use shape::Shape;

/// Closed set of primitive kinds the modeler can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// UV sphere
    Sphere,
    /// Capped cylinder
    Cylinder,
    /// Axis-aligned cube
    Box,
    /// Capped cone
    Cone,
}

impl ShapeKind {
    /// All kinds in type-code order
    pub const ALL: [Self; 4] = [Self::Sphere, Self::Cylinder, Self::Box, Self::Cone];

    /// Integer type code written to model files
    pub const fn code(self) -> i32 {
        match self {
            Self::Sphere => 0,
            Self::Cylinder => 1,
            Self::Box => 2,
            Self::Cone => 3,
        }
    }

    /// Kind for a model-file type code
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Sphere),
            1 => Some(Self::Cylinder),
            2 => Some(Self::Box),
            3 => Some(Self::Cone),
            _ => None,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sphere => "sphere",
            Self::Cylinder => "cylinder",
            Self::Box => "box",
            Self::Cone => "cone",
        };
        f.write_str(name)
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sphere" => Ok(Self::Sphere),
            "cylinder" => Ok(Self::Cylinder),
            "box" | "cube" => Ok(Self::Box),
            "cone" => Ok(Self::Cone),
            other => Err(format!("unknown shape kind '{other}'")),
        }
    }
}

/// Tessellation level, always within `0..=TessellationLevel::MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct TessellationLevel(u32);

impl TessellationLevel {
    /// Highest supported level
    pub const MAX: u32 = 4;

    /// Create a level, clamping anything above [`Self::MAX`]
    pub const fn new(level: u32) -> Self {
        if level > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(level)
        }
    }

    /// Raw level value
    pub const fn get(self) -> u32 {
        self.0
    }

    /// `base * 2^level`, never less than `base`
    pub const fn divisions(self, base: u32) -> u32 {
        base << self.0
    }
}

impl From<u32> for TessellationLevel {
    fn from(level: u32) -> Self {
        Self::new(level)
    }
}

impl From<TessellationLevel> for u32 {
    fn from(level: TessellationLevel) -> Self {
        level.0
    }
}

/// Generated triangle list, three consecutive positions per triangle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Triangle corner positions in the primitive's local frame
    pub positions: Vec<Vec3>,
    /// Per-vertex debug tints, parallel to `positions`
    pub tints: Vec<Vec4>,
}

impl MeshData {
    /// Create an empty mesh with room for `vertices` corners
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            tints: Vec::with_capacity(vertices),
        }
    }

    /// Append one triangle with a tint per corner
    pub fn push_triangle(&mut self, corners: [Vec3; 3], tints: [Vec4; 3]) {
        self.positions.extend_from_slice(&corners);
        self.tints.extend_from_slice(&tints);
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Tessellate `kind` at `level`
pub fn generate(kind: ShapeKind, level: TessellationLevel) -> MeshData {
    match kind {
        ShapeKind::Sphere => generate_sphere(level),
        ShapeKind::Cylinder => generate_cylinder(level),
        ShapeKind::Box => generate_box(),
        ShapeKind::Cone => generate_cone(level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_clamps() {
        assert_eq!(TessellationLevel::new(7).get(), 4);
        assert_eq!(TessellationLevel::from(2).get(), 2);
        assert_eq!(TessellationLevel::new(0).divisions(6), 6);
        assert_eq!(TessellationLevel::new(3).divisions(8), 64);
    }

    #[test]
    fn test_kind_codes_roundtrip() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ShapeKind::from_code(-1), None);
        assert_eq!(ShapeKind::from_code(4), None);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Cone".parse::<ShapeKind>(), Ok(ShapeKind::Cone));
        assert_eq!("cube".parse::<ShapeKind>(), Ok(ShapeKind::Box));
        assert!("torus".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn test_every_kind_is_flat_triangle_list() {
        for kind in ShapeKind::ALL {
            for level in 0..=TessellationLevel::MAX {
                let mesh = generate(kind, TessellationLevel::new(level));
                assert!(mesh.vertex_count() > 0, "{kind} at level {level} is empty");
                assert_eq!(mesh.vertex_count() % 3, 0);
                assert_eq!(mesh.tints.len(), mesh.positions.len());
            }
        }
    }

    #[test]
    fn test_vertex_count_grows_with_level() {
        for kind in [ShapeKind::Sphere, ShapeKind::Cylinder, ShapeKind::Cone] {
            let counts: Vec<usize> = (0..=TessellationLevel::MAX)
                .map(|level| generate(kind, TessellationLevel::new(level)).vertex_count())
                .collect();
            assert!(counts.windows(2).all(|w| w[0] < w[1]), "{kind}: {counts:?}");
        }
    }

    #[test]
    fn test_box_ignores_level() {
        for level in 0..=6 {
            assert_eq!(generate(ShapeKind::Box, TessellationLevel::new(level)).vertex_count(), 36);
        }
    }

    #[test]
    fn test_level_above_max_matches_max() {
        let clamped = generate(ShapeKind::Sphere, TessellationLevel::new(9));
        let max = generate(ShapeKind::Sphere, TessellationLevel::new(4));
        assert_eq!(clamped, max);
    }
}

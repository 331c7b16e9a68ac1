use super::{generate, MeshData, ShapeKind, TessellationLevel};
use crate::foundation::math::{Vec3, Vec4};

/// Immutable tessellated primitive
///
/// Built once from a kind and a level; the scene graph pools these and nodes
/// refer to them by id.
#[derive(Debug, Clone)]
pub struct Shape {
    kind: ShapeKind,
    level: TessellationLevel,
    mesh: MeshData,
    centroid: Vec3,
}

impl Shape {
    /// Tessellate a new shape
    pub fn new(kind: ShapeKind, level: TessellationLevel) -> Self {
        let mesh = generate(kind, level);
        let centroid = centroid_of(&mesh.positions);
        Self {
            kind,
            level,
            mesh,
            centroid,
        }
    }

    /// Kind tag
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Level the mesh was built with
    pub fn level(&self) -> TessellationLevel {
        self.level
    }

    /// Triangle list in the local frame, three vertices per triangle
    pub fn vertices(&self) -> &[Vec3] {
        &self.mesh.positions
    }

    /// Per-vertex debug tints
    pub fn tints(&self) -> &[Vec4] {
        &self.mesh.tints
    }

    /// Mean of the raw local-frame vertices
    pub fn centroid(&self) -> Vec3 {
        self.centroid
    }
}

fn centroid_of(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::zeros();
    }
    points.iter().sum::<Vec3>() / points.len() as f32
}

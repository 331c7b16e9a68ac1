//! Scene node and its transform state
//!
//! A node keeps three independent matrices, each starting at identity and
//! only ever mutated incrementally:
//! - `translation`: accumulated offsets
//! - `rotation`: accumulated pivot-corrected rotations
//! - `scale`: accumulated pivot-corrected scalings
//!
//! They are never decomposed back into vectors or quaternions. The local
//! matrix is always `translation * rotation * scale`.

use crate::foundation::math::{Axis, Mat4, Mat4Ext, Vec3, Vec4};

use super::{NodeId, ShapeId};

/// One element of the scene tree
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    shape: Option<ShapeId>,
    translation: Mat4,
    rotation: Mat4,
    scale: Mat4,
    color: Vec4,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl SceneNode {
    /// Opaque white
    pub const DEFAULT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    pub(super) fn new(shape: Option<ShapeId>, parent: Option<NodeId>) -> Self {
        Self {
            shape,
            translation: Mat4::identity(),
            rotation: Mat4::identity(),
            scale: Mat4::identity(),
            color: Vec4::from(Self::DEFAULT_COLOR),
            parent,
            children: Vec::new(),
        }
    }

    /// Pooled shape this node draws, `None` for the root and group nodes
    pub fn shape(&self) -> Option<ShapeId> {
        self.shape
    }

    /// Parent back-reference, `None` only for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Accumulated translation matrix
    pub fn translation(&self) -> &Mat4 {
        &self.translation
    }

    /// Accumulated rotation matrix
    pub fn rotation(&self) -> &Mat4 {
        &self.rotation
    }

    /// Accumulated scale matrix
    pub fn scale(&self) -> &Mat4 {
        &self.scale
    }

    /// RGBA color; channels are not clamped here
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Replace the translation matrix
    pub fn set_translation(&mut self, translation: Mat4) {
        self.translation = translation;
    }

    /// Replace the rotation matrix
    pub fn set_rotation(&mut self, rotation: Mat4) {
        self.rotation = rotation;
    }

    /// Replace the scale matrix
    pub fn set_scale(&mut self, scale: Mat4) {
        self.scale = scale;
    }

    /// Replace the color
    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
    }

    /// `translation * rotation * scale`
    pub fn local_matrix(&self) -> Mat4 {
        self.translation * self.rotation * self.scale
    }

    /// Rotate by `degrees` about a world axis through `pivot`
    ///
    /// The pivot-corrected delta is left-multiplied onto the accumulated
    /// rotation, so the shape spins about its own centroid.
    pub fn apply_rotation(&mut self, pivot: Vec3, axis: Axis, degrees: f32) {
        let delta = Mat4::rotation_deg(axis, degrees).about_pivot(pivot);
        self.rotation = delta * self.rotation;
    }

    /// Scale by `factor` along one axis about `pivot`, other axes unchanged
    pub fn apply_scale(&mut self, pivot: Vec3, axis: Axis, factor: f32) {
        let delta = Mat4::scaling(axis.select(factor, 1.0)).about_pivot(pivot);
        self.scale = delta * self.scale;
    }

    /// Offset by `delta` along one axis of the current translation frame
    ///
    /// Right-multiplied; a translation has no pivot.
    pub fn apply_translation(&mut self, axis: Axis, delta: f32) {
        self.translation *= Mat4::translation(axis.select(delta, 0.0));
    }
}

//! # Shape Modeler
//!
//! Core of an interactive modeler that assembles spheres, cylinders, boxes
//! and cones into a transform hierarchy.
//!
//! ## Features
//!
//! - **Procedural Tessellation**: every primitive is generated at one of five
//!   subdivision levels
//! - **Scene Graph**: arena-backed node tree with translation, rotation and
//!   scale matrices composed as `T * R * S`
//! - **Pivot-Centered Editing**: rotation and scale steps act about each
//!   shape's own centroid
//! - **Flat-File Persistence**: one line per node in pre-order (`.mod`)
//! - **Headless Editor**: mode/axis/selection state machine driven by commands
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shape_modeler::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut graph = SceneGraph::new();
//!     let body = graph.create_box(None)?;
//!     let head = graph.create_sphere(TessellationLevel::new(2), Some(body))?;
//!
//!     graph.apply_translation(head, Axis::Y, 1.0)?;
//!     graph.apply_rotation(body, Axis::Y, 10.0)?;
//!
//!     let world = graph.world_matrix(head)?;
//!     println!("head at {:?}", world.column(3));
//!
//!     graph.save("robot.mod")?;
//!     let reloaded = SceneGraph::load("robot.mod")?;
//!     assert_eq!(reloaded.len(), graph.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod editor;
pub mod foundation;
pub mod geometry;
pub mod scene;

/// Common imports for modeler users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, EditorConfig},
        editor::{AppMode, Command, Editor, EditorError, Outcome, TransformMode},
        foundation::math::{Axis, Mat4, Mat4Ext, Point3, Vec3, Vec4},
        geometry::{generate, MeshData, Shape, ShapeKind, TessellationLevel},
        scene::{NodeId, SceneError, SceneGraph, SceneNode, ShapeId},
    };
}

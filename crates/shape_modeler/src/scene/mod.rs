//! Scene graph with hierarchical transform composition
//!
//! ## Architecture
//!
//! ```text
//! SceneGraph
//!   ├── nodes:     SlotMap<NodeId, SceneNode>   (tree, root first)
//!   ├── all_nodes: Vec<NodeId>                 (flat registry)
//!   └── shapes:    SlotMap<ShapeId, Shape>      (tessellated primitives)
//! ```
//!
//! A node owns its ordered child list and points back at its parent by id.
//! The world matrix of a node is the product of the local matrices from the
//! root down to it, recomputed on every call.
//!
//! The [`model_file`] module reads and writes the flat `.mod` text format.

mod error;
pub mod model_file;
mod node;
mod scene_graph;

pub use error::SceneError;
pub use model_file::NodeRecord;
pub use node::SceneNode;
pub use scene_graph::SceneGraph;

slotmap::new_key_type! {
    /// Handle to a node in a [`SceneGraph`]
    pub struct NodeId;

    /// Handle to a pooled [`Shape`](crate::geometry::Shape)
    pub struct ShapeId;
}

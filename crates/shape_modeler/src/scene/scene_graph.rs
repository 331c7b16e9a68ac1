//! Scene graph: node tree, flat registry, and shape pool
//!
//! Nodes live in a slot map arena. Each node owns its ordered child list and
//! holds a plain id back to its parent. The graph also keeps `all_nodes`, an
//! insertion-ordered registry whose membership always equals the set of nodes
//! reachable from the root, and the pool of tessellated shapes the nodes
//! reference.

use std::collections::HashSet;

use slotmap::SlotMap;

use crate::foundation::math::{Axis, Mat4, Mat4Ext, Point3, Vec3, Vec4};
use crate::geometry::{Shape, ShapeKind, TessellationLevel};

use super::{NodeId, SceneError, SceneNode, ShapeId};

/// The current document: one root and everything under it
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    shapes: SlotMap<ShapeId, Shape>,
    root: NodeId,
    all_nodes: Vec<NodeId>,
}

impl SceneGraph {
    /// Create a graph holding only an empty root
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new(None, None));
        Self {
            nodes,
            shapes: SlotMap::with_key(),
            root,
            all_nodes: vec![root],
        }
    }

    /// Root node id
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Tessellate a shape and hang a new node for it under `parent`
    ///
    /// `None` as parent means the root. Fails only when `parent` is not a
    /// live node of this graph.
    pub fn create(
        &mut self,
        kind: ShapeKind,
        level: TessellationLevel,
        parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        let parent = parent.unwrap_or(self.root);
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }

        let shape = self.shapes.insert(Shape::new(kind, level));
        let id = self.attach(Some(shape), parent);
        log::debug!("Created {kind} node {id:?} at level {} under {parent:?}", level.get());
        Ok(id)
    }

    /// Add a sphere under `parent` (root when `None`)
    pub fn create_sphere(&mut self, level: TessellationLevel, parent: Option<NodeId>) -> Result<NodeId, SceneError> {
        self.create(ShapeKind::Sphere, level, parent)
    }

    /// Add a cylinder under `parent` (root when `None`)
    pub fn create_cylinder(&mut self, level: TessellationLevel, parent: Option<NodeId>) -> Result<NodeId, SceneError> {
        self.create(ShapeKind::Cylinder, level, parent)
    }

    /// Add a box under `parent` (root when `None`)
    pub fn create_box(&mut self, parent: Option<NodeId>) -> Result<NodeId, SceneError> {
        self.create(ShapeKind::Box, TessellationLevel::default(), parent)
    }

    /// Add a cone under `parent` (root when `None`)
    pub fn create_cone(&mut self, level: TessellationLevel, parent: Option<NodeId>) -> Result<NodeId, SceneError> {
        self.create(ShapeKind::Cone, level, parent)
    }

    /// Link a new node under a parent already known to be live
    pub(super) fn attach(&mut self, shape: Option<ShapeId>, parent: NodeId) -> NodeId {
        let id = self.nodes.insert(SceneNode::new(shape, Some(parent)));
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(id);
        }
        self.all_nodes.push(id);
        id
    }

    /// Pool a shape without attaching it to a node yet
    pub(super) fn pool_shape(&mut self, shape: Shape) -> ShapeId {
        self.shapes.insert(shape)
    }

    /// Remove `id` and its whole subtree
    ///
    /// Returns how many nodes were removed. The root and unknown ids are
    /// rejected without touching the graph. Shapes referenced by the removed
    /// nodes are released from the pool.
    pub fn remove(&mut self, id: NodeId) -> Result<usize, SceneError> {
        if id == self.root {
            return Err(SceneError::CannotRemoveRoot);
        }
        let parent = self.nodes.get(id).ok_or(SceneError::NodeNotFound(id))?.parent;

        if let Some(parent_node) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent_node.children.retain(|&child| child != id);
        }

        let mut subtree = Vec::new();
        self.collect_into(id, &mut subtree);
        let doomed: HashSet<NodeId> = subtree.iter().copied().collect();
        self.all_nodes.retain(|n| !doomed.contains(n));

        for node_id in &subtree {
            if let Some(shape) = self.nodes.remove(*node_id).and_then(|n| n.shape()) {
                self.shapes.remove(shape);
            }
        }

        log::debug!("Removed node {id:?} and {} descendant(s)", subtree.len() - 1);
        Ok(subtree.len())
    }

    /// Node by id
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Mutable node by id
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    fn try_node(&self, id: NodeId) -> Result<&SceneNode, SceneError> {
        self.nodes.get(id).ok_or(SceneError::NodeNotFound(id))
    }

    fn try_node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Pooled shape by id
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Shape drawn by a node, if any
    pub fn shape_of(&self, node: NodeId) -> Option<&Shape> {
        self.nodes.get(node)?.shape().and_then(|s| self.shapes.get(s))
    }

    /// Number of pooled shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Flat registry in insertion order
    pub fn all_nodes(&self) -> &[NodeId] {
        &self.all_nodes
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.all_nodes.len()
    }

    /// Always false: a graph has at least its root
    pub fn is_empty(&self) -> bool {
        self.all_nodes.is_empty()
    }

    /// Node ids in pre-order: a node, then each child subtree in order
    pub fn collect_pre_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.all_nodes.len());
        self.collect_into(self.root, &mut out);
        out
    }

    fn collect_into(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        out.push(id);
        for &child in &node.children {
            self.collect_into(child, out);
        }
    }

    /// Local matrix of `id`
    pub fn local_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        Ok(self.try_node(id)?.local_matrix())
    }

    /// Product of the local matrices from the root down to `id`
    ///
    /// Walks the full ancestor chain on every call; nothing is cached.
    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let node = self.try_node(id)?;
        let mut world = node.local_matrix();
        let mut ancestor = node.parent();
        while let Some(parent_id) = ancestor {
            let parent = self.try_node(parent_id)?;
            world = parent.local_matrix() * world;
            ancestor = parent.parent();
        }
        Ok(world)
    }

    /// Local centroid of the node's shape; zero when it has none
    pub fn pivot(&self, id: NodeId) -> Result<Vec3, SceneError> {
        self.try_node(id)?;
        Ok(self.shape_of(id).map_or_else(Vec3::zeros, Shape::centroid))
    }

    /// Rotate a node by `degrees` about `axis` through its own centroid
    pub fn apply_rotation(&mut self, id: NodeId, axis: Axis, degrees: f32) -> Result<(), SceneError> {
        let pivot = self.pivot(id)?;
        self.try_node_mut(id)?.apply_rotation(pivot, axis, degrees);
        Ok(())
    }

    /// Scale a node by `factor` along `axis` about its own centroid
    pub fn apply_scale(&mut self, id: NodeId, axis: Axis, factor: f32) -> Result<(), SceneError> {
        let pivot = self.pivot(id)?;
        self.try_node_mut(id)?.apply_scale(pivot, axis, factor);
        Ok(())
    }

    /// Offset a node by `delta` along `axis`
    pub fn apply_translation(&mut self, id: NodeId, axis: Axis, delta: f32) -> Result<(), SceneError> {
        self.try_node_mut(id)?.apply_translation(axis, delta);
        Ok(())
    }

    /// Replace a node's color
    pub fn set_color(&mut self, id: NodeId, color: Vec4) -> Result<(), SceneError> {
        self.try_node_mut(id)?.set_color(color);
        Ok(())
    }

    /// Mean world-space centroid over every node that draws a shape
    pub fn model_centroid(&self) -> Vec3 {
        let centers: Vec<Vec3> = self
            .collect_pre_order()
            .into_iter()
            .filter_map(|id| {
                let shape = self.shape_of(id).filter(|s| !s.vertices().is_empty())?;
                let world = self.world_matrix(id).ok()?;
                Some(world.transform_point(&Point3::from(shape.centroid())).coords)
            })
            .collect();

        if centers.is_empty() {
            return Vec3::zeros();
        }
        centers.iter().sum::<Vec3>() / centers.len() as f32
    }

    /// Rotate the whole model about its centroid by turning the root
    pub fn rotate_model(&mut self, axis: Axis, degrees: f32) {
        let centroid = self.model_centroid();
        let root = self.root;
        if let Some(root) = self.nodes.get_mut(root) {
            root.set_rotation(Mat4::rotation_deg(axis, degrees).about_pivot(centroid) * root.rotation());
        }
    }

    /// One summary line per node, in pre-order
    pub fn describe(&self) -> Vec<String> {
        self.collect_pre_order()
            .into_iter()
            .enumerate()
            .filter_map(|(i, id)| {
                let node = self.nodes.get(id)?;
                let code = self.shape_of(id).map_or(-1, |s| s.kind().code());
                Some(format!("Node {i} type={code} children={}", node.children().len()))
            })
            .collect()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn level(l: u32) -> TessellationLevel {
        TessellationLevel::new(l)
    }

    #[test]
    fn test_new_graph_has_bare_root() {
        let graph = SceneGraph::new();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.all_nodes(), &[graph.root()]);
        let root = graph.node(graph.root()).unwrap();
        assert!(root.shape().is_none());
        assert!(root.parent().is_none());
        assert_eq!(graph.shape_count(), 0);
    }

    #[test]
    fn test_create_defaults_to_root() {
        let mut graph = SceneGraph::new();
        let sphere = graph.create_sphere(level(1), None).unwrap();

        assert_eq!(graph.node(sphere).unwrap().parent(), Some(graph.root()));
        assert_eq!(graph.node(graph.root()).unwrap().children(), &[sphere]);
        assert_eq!(graph.shape_of(sphere).unwrap().kind(), ShapeKind::Sphere);
        assert_eq!(graph.shape_count(), 1);
    }

    #[test]
    fn test_create_under_stale_parent_fails() {
        let mut graph = SceneGraph::new();
        let cone = graph.create_cone(level(0), None).unwrap();
        graph.remove(cone).unwrap();

        let result = graph.create_box(Some(cone));
        assert!(matches!(result, Err(SceneError::NodeNotFound(id)) if id == cone));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.shape_count(), 0);
    }

    #[test]
    fn test_pre_order_and_registry_agree() {
        let mut graph = SceneGraph::new();
        let a = graph.create_box(None).unwrap();
        let b = graph.create_sphere(level(0), None).unwrap();
        let a1 = graph.create_cone(level(0), Some(a)).unwrap();
        let a1x = graph.create_cylinder(level(0), Some(a1)).unwrap();
        let a2 = graph.create_box(Some(a)).unwrap();

        assert_eq!(graph.collect_pre_order(), vec![graph.root(), a, a1, a1x, a2, b]);

        let registry: HashSet<_> = graph.all_nodes().iter().copied().collect();
        let reachable: HashSet<_> = graph.collect_pre_order().into_iter().collect();
        assert_eq!(registry, reachable);
    }

    #[test]
    fn test_remove_drops_whole_subtree() {
        let mut graph = SceneGraph::new();
        let a = graph.create_box(None).unwrap();
        let keep = graph.create_sphere(level(0), None).unwrap();
        let a1 = graph.create_cone(level(0), Some(a)).unwrap();
        graph.create_cylinder(level(0), Some(a1)).unwrap();
        graph.create_box(Some(a)).unwrap();

        let before = graph.len();
        let root_children = graph.node(graph.root()).unwrap().children().len();

        // `a` has three descendants
        assert_eq!(graph.remove(a).unwrap(), 4);
        assert_eq!(graph.len(), before - 4);
        assert_eq!(graph.node(graph.root()).unwrap().children().len(), root_children - 1);
        assert_eq!(graph.all_nodes(), &[graph.root(), keep]);
        assert_eq!(graph.shape_count(), 1);
        assert!(graph.node(a1).is_none());
    }

    #[test]
    fn test_remove_root_and_unknown_are_rejected() {
        let mut graph = SceneGraph::new();
        let node = graph.create_box(None).unwrap();

        assert!(matches!(graph.remove(graph.root()), Err(SceneError::CannotRemoveRoot)));
        graph.remove(node).unwrap();
        assert!(matches!(graph.remove(node), Err(SceneError::NodeNotFound(_))));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_world_matrix_is_ancestor_product() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.create_box(None).unwrap();
        let b = graph.create_cone(level(0), Some(a)).unwrap();
        let c = graph.create_sphere(level(0), Some(b)).unwrap();

        graph.apply_translation(a, Axis::X, 1.0).unwrap();
        graph.apply_rotation(b, Axis::Z, 30.0).unwrap();
        graph.apply_scale(c, Axis::Y, 2.0).unwrap();
        graph.apply_translation(c, Axis::Y, -0.5).unwrap();
        graph.rotate_model(Axis::Y, 10.0);

        let expected = graph.local_matrix(root).unwrap()
            * graph.local_matrix(a).unwrap()
            * graph.local_matrix(b).unwrap()
            * graph.local_matrix(c).unwrap();
        assert_relative_eq!(graph.world_matrix(c).unwrap(), expected, epsilon = EPSILON);
        assert_eq!(graph.world_matrix(root).unwrap(), graph.local_matrix(root).unwrap());
    }

    #[test]
    fn test_rotation_about_centroid_round_trips() {
        let mut graph = SceneGraph::new();
        let sphere = graph.create_sphere(level(1), None).unwrap();
        let before = *graph.node(sphere).unwrap().rotation();

        graph.apply_rotation(sphere, Axis::Y, 10.0).unwrap();
        graph.apply_rotation(sphere, Axis::Y, -10.0).unwrap();
        assert_relative_eq!(*graph.node(sphere).unwrap().rotation(), before, epsilon = EPSILON);
    }

    #[test]
    fn test_cone_spins_about_its_own_centroid() {
        let mut graph = SceneGraph::new();
        let cone = graph.create_cone(level(2), None).unwrap();
        let pivot = graph.pivot(cone).unwrap();

        graph.apply_rotation(cone, Axis::X, 10.0).unwrap();
        let moved = graph.world_matrix(cone).unwrap().transform_point(&Point3::from(pivot));
        assert_relative_eq!(moved.coords, pivot, epsilon = EPSILON);
    }

    #[test]
    fn test_root_pivot_is_zero() {
        let graph = SceneGraph::new();
        assert_eq!(graph.pivot(graph.root()).unwrap(), Vec3::zeros());
    }

    #[test]
    fn test_model_centroid_uses_world_positions() {
        let mut graph = SceneGraph::new();
        assert_eq!(graph.model_centroid(), Vec3::zeros());

        let a = graph.create_box(None).unwrap();
        let b = graph.create_box(None).unwrap();
        for _ in 0..10 {
            graph.apply_translation(a, Axis::X, 0.1).unwrap();
            graph.apply_translation(b, Axis::Z, -0.1).unwrap();
        }
        assert_relative_eq!(graph.model_centroid(), Vec3::new(0.5, 0.0, -0.5), epsilon = EPSILON);
    }

    #[test]
    fn test_rotate_model_keeps_centroid() {
        let mut graph = SceneGraph::new();
        let a = graph.create_box(None).unwrap();
        graph.apply_translation(a, Axis::X, 2.0).unwrap();
        let before = graph.model_centroid();

        graph.rotate_model(Axis::Z, 10.0);
        assert_relative_eq!(graph.model_centroid(), before, epsilon = EPSILON);
        assert_ne!(*graph.node(graph.root()).unwrap().rotation(), Mat4::identity());
    }

    #[test]
    fn test_set_color_is_unclamped() {
        let mut graph = SceneGraph::new();
        let node = graph.create_box(None).unwrap();
        graph.set_color(node, Vec4::new(2.0, -1.0, 0.5, 0.25)).unwrap();
        assert_eq!(graph.node(node).unwrap().color(), Vec4::new(2.0, -1.0, 0.5, 0.25));
    }

    #[test]
    fn test_describe_lists_pre_order() {
        let mut graph = SceneGraph::new();
        let a = graph.create_box(None).unwrap();
        graph.create_sphere(level(0), Some(a)).unwrap();

        assert_eq!(
            graph.describe(),
            vec![
                "Node 0 type=-1 children=1".to_string(),
                "Node 1 type=2 children=1".to_string(),
                "Node 2 type=0 children=0".to_string(),
            ]
        );
    }
}

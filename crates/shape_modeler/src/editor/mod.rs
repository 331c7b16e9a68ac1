//! Headless editor state machine
//!
//! Holds the current document, the selected node, the active modes and the
//! selected axis, and applies [`Command`]s to them. A windowing layer maps
//! key presses to commands; the `modeler` binary reads them from a script.
//!
//! # Usage
//! ```no_run
//! use shape_modeler::config::EditorConfig;
//! use shape_modeler::editor::{Command, Editor};
//!
//! let mut editor = Editor::new(EditorConfig::default());
//! for line in ["mode modelling", "add cone", "rotate", "axis x", "+", "save cone"] {
//!     let command: Command = line.parse()?;
//!     let outcome = editor.execute(command)?;
//!     println!("{outcome}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod command;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::EditorConfig;
use crate::foundation::math::{Axis, Vec4};
use crate::geometry::ShapeKind;
use crate::scene::{NodeId, SceneError, SceneGraph};

pub use command::{AppMode, Command, ParseCommandError, TransformMode};

/// Errors from executing an editor command
///
/// A failed command leaves the editor unchanged, except for `Load`, which
/// drops the previous document before reading the file.
#[derive(Error, Debug)]
pub enum EditorError {
    /// There is no current document
    #[error("No model loaded")]
    NoDocument,

    /// The command needs a selected node
    #[error("No current node selected")]
    NoSelection,

    /// The command needs a selected axis
    #[error("No axis selected")]
    NoAxis,

    /// The command needs an active transform mode
    #[error("No transform mode active")]
    NoTransformMode,

    /// The command is not available in the current mode
    #[error("Command '{command}' is not available in {mode} mode")]
    WrongMode {
        /// Command keyword
        command: &'static str,
        /// Mode the editor was in
        mode: AppMode,
    },

    /// The scene graph rejected the operation
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// What a successful command did
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Mode switched
    ModeChanged(AppMode),
    /// A shape was added and selected
    ShapeAdded {
        /// New node
        node: NodeId,
        /// Its shape kind
        kind: ShapeKind,
    },
    /// A subtree was removed
    Removed {
        /// Nodes removed, subtree root included
        count: usize,
        /// Selection after removal
        selection: Option<NodeId>,
    },
    /// Transform mode switched
    TransformModeChanged(TransformMode),
    /// Axis switched
    AxisSelected(Axis),
    /// The selected node was rotated, moved or scaled
    NodeTransformed {
        /// Transform applied
        mode: TransformMode,
        /// Axis used
        axis: Axis,
        /// Degrees, distance or factor applied
        amount: f32,
    },
    /// The whole model was rotated about its centroid
    ModelRotated {
        /// Axis used
        axis: Axis,
        /// Degrees applied
        degrees: f32,
    },
    /// The selected node was recolored
    ColorChanged(NodeId),
    /// The document was written
    Saved(PathBuf),
    /// A document was read and is now current
    Loaded {
        /// File read
        path: PathBuf,
        /// Node count, root included
        nodes: usize,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModeChanged(mode) => write!(f, "Mode: {mode}"),
            Self::ShapeAdded { kind, .. } => write!(f, "Added {kind} (current shape updated)"),
            Self::Removed { count, .. } => write!(f, "Removed selected node ({count} node(s))"),
            Self::TransformModeChanged(mode) => write!(f, "{mode} mode activated"),
            Self::AxisSelected(axis) => write!(f, "Axis {axis} selected"),
            Self::NodeTransformed { mode, axis, amount } => {
                write!(f, "Applied {mode} of {amount} along {axis} to current shape")
            }
            Self::ModelRotated { axis, degrees } => write!(f, "Rotated entire model {degrees} deg about {axis}"),
            Self::ColorChanged(_) => write!(f, "Updated color of current shape"),
            Self::Saved(path) => write!(f, "Saved model to {}", path.display()),
            Self::Loaded { path, nodes } => write!(f, "Loaded model: {} (nodes: {nodes})", path.display()),
        }
    }
}

/// Editor state: document, selection, modes, axis
#[derive(Debug)]
pub struct Editor {
    document: Option<SceneGraph>,
    selection: Option<NodeId>,
    mode: AppMode,
    transform: TransformMode,
    axis: Option<Axis>,
    config: EditorConfig,
}

impl Editor {
    /// Create an editor with an empty document and nothing selected
    pub fn new(config: EditorConfig) -> Self {
        Self {
            document: Some(SceneGraph::new()),
            selection: None,
            mode: AppMode::None,
            transform: TransformMode::None,
            axis: None,
            config,
        }
    }

    /// Current document
    pub fn document(&self) -> Option<&SceneGraph> {
        self.document.as_ref()
    }

    /// Selected node
    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    /// Active application mode
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Active transform mode
    pub fn transform_mode(&self) -> TransformMode {
        self.transform
    }

    /// Selected axis
    pub fn axis(&self) -> Option<Axis> {
        self.axis
    }

    /// Editor settings
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Apply one command
    pub fn execute(&mut self, command: Command) -> Result<Outcome, EditorError> {
        if let Command::SetMode(mode) = command {
            self.mode = mode;
            log::info!("Mode: {mode}");
            return Ok(Outcome::ModeChanged(mode));
        }

        match self.mode {
            AppMode::Modelling => self.execute_modelling(command),
            AppMode::Inspection => self.execute_inspection(command),
            AppMode::None => Err(EditorError::WrongMode {
                command: command.name(),
                mode: self.mode,
            }),
        }
    }

    fn execute_modelling(&mut self, command: Command) -> Result<Outcome, EditorError> {
        match command {
            Command::AddShape(kind) => self.add_shape(kind),
            Command::RemoveCurrent => self.remove_current(),
            Command::SetTransformMode(mode) => Ok(self.set_transform_mode(mode)),
            Command::SelectAxis(axis) => Ok(self.select_axis(axis)),
            Command::Increase => self.step_node(true),
            Command::Decrease => self.step_node(false),
            Command::SetColor([r, g, b]) => {
                let node = self.selected()?;
                self.graph_mut()?.set_color(node, Vec4::new(r, g, b, 1.0))?;
                Ok(Outcome::ColorChanged(node))
            }
            Command::Save(path) => {
                let path = self.normalize_path(&path);
                self.graph()?.save(&path)?;
                Ok(Outcome::Saved(path))
            }
            other => Err(EditorError::WrongMode {
                command: other.name(),
                mode: self.mode,
            }),
        }
    }

    fn execute_inspection(&mut self, command: Command) -> Result<Outcome, EditorError> {
        match command {
            Command::Load(path) => self.load(&path),
            Command::SetTransformMode(TransformMode::Rotate) => Ok(self.set_transform_mode(TransformMode::Rotate)),
            Command::SelectAxis(axis) => Ok(self.select_axis(axis)),
            Command::Increase => self.step_model(true),
            Command::Decrease => self.step_model(false),
            other => Err(EditorError::WrongMode {
                command: other.name(),
                mode: self.mode,
            }),
        }
    }

    fn graph(&self) -> Result<&SceneGraph, EditorError> {
        self.document.as_ref().ok_or(EditorError::NoDocument)
    }

    fn graph_mut(&mut self) -> Result<&mut SceneGraph, EditorError> {
        self.document.as_mut().ok_or(EditorError::NoDocument)
    }

    fn selected(&self) -> Result<NodeId, EditorError> {
        self.graph()?;
        self.selection.ok_or(EditorError::NoSelection)
    }

    fn add_shape(&mut self, kind: ShapeKind) -> Result<Outcome, EditorError> {
        let level = self.config.default_level;
        let graph = self.document.get_or_insert_with(|| {
            log::info!("Created new model");
            SceneGraph::new()
        });

        let node = graph.create(kind, level, None)?;
        self.selection = Some(node);
        log_tree(graph);
        Ok(Outcome::ShapeAdded { node, kind })
    }

    fn remove_current(&mut self) -> Result<Outcome, EditorError> {
        let node = self.selected()?;
        let graph = self.graph_mut()?;

        // Previous registry entry, unless that is the root
        let successor = graph
            .all_nodes()
            .iter()
            .rposition(|&n| n == node)
            .filter(|&index| index > 1)
            .map(|index| graph.all_nodes()[index - 1]);

        let count = graph.remove(node)?;
        log_tree(graph);
        self.selection = successor;
        Ok(Outcome::Removed {
            count,
            selection: successor,
        })
    }

    fn set_transform_mode(&mut self, mode: TransformMode) -> Outcome {
        self.transform = mode;
        log::debug!("{mode} mode activated");
        Outcome::TransformModeChanged(mode)
    }

    fn select_axis(&mut self, axis: Axis) -> Outcome {
        self.axis = Some(axis);
        log::debug!("Axis {axis} selected");
        Outcome::AxisSelected(axis)
    }

    fn step_node(&mut self, increase: bool) -> Result<Outcome, EditorError> {
        let node = self.selected()?;
        let axis = self.axis.ok_or(EditorError::NoAxis)?;
        let sign = if increase { 1.0 } else { -1.0 };
        let mode = self.transform;

        let amount = match mode {
            TransformMode::None => return Err(EditorError::NoTransformMode),
            TransformMode::Rotate => sign * self.config.rotation_step_degrees,
            TransformMode::Translate => sign * self.config.translation_step,
            TransformMode::Scale if increase => self.config.scale_up_factor,
            TransformMode::Scale => self.config.scale_down_factor,
        };

        let graph = self.graph_mut()?;
        match mode {
            TransformMode::Rotate => graph.apply_rotation(node, axis, amount)?,
            TransformMode::Translate => graph.apply_translation(node, axis, amount)?,
            TransformMode::Scale => graph.apply_scale(node, axis, amount)?,
            TransformMode::None => {}
        }
        Ok(Outcome::NodeTransformed { mode, axis, amount })
    }

    fn step_model(&mut self, increase: bool) -> Result<Outcome, EditorError> {
        self.graph()?;
        if self.transform != TransformMode::Rotate {
            return Err(EditorError::NoTransformMode);
        }
        let axis = self.axis.ok_or(EditorError::NoAxis)?;
        let degrees = if increase {
            self.config.rotation_step_degrees
        } else {
            -self.config.rotation_step_degrees
        };

        self.graph_mut()?.rotate_model(axis, degrees);
        Ok(Outcome::ModelRotated { axis, degrees })
    }

    fn load(&mut self, path: &str) -> Result<Outcome, EditorError> {
        let path = self.normalize_path(path);
        self.document = None;
        self.selection = None;

        let graph = SceneGraph::load_with_level(&path, self.config.load_level)?;
        let nodes = graph.len();
        let centroid = graph.model_centroid();
        log::info!("Model centroid: {} {} {}", centroid.x, centroid.y, centroid.z);

        self.selection = graph.all_nodes().last().copied();
        self.document = Some(graph);
        Ok(Outcome::Loaded { path, nodes })
    }

    /// Append the model file extension unless the path already mentions it
    pub fn normalize_path(&self, path: &str) -> PathBuf {
        let extension = format!(".{}", self.config.file_extension);
        if path.contains(&extension) {
            PathBuf::from(path)
        } else {
            PathBuf::from(format!("{path}{extension}"))
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

fn log_tree(graph: &SceneGraph) {
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("Model tree ({} nodes):", graph.len());
        for line in graph.describe() {
            log::debug!("  {line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
    use approx::assert_relative_eq;

    fn run(editor: &mut Editor, script: &[&str]) {
        for line in script {
            editor.execute(line.parse().unwrap()).unwrap();
        }
    }

    fn modelling() -> Editor {
        let mut editor = Editor::default();
        editor.execute(Command::SetMode(AppMode::Modelling)).unwrap();
        editor
    }

    #[test]
    fn test_starts_with_empty_document() {
        let editor = Editor::default();
        assert_eq!(editor.mode(), AppMode::None);
        assert_eq!(editor.document().unwrap().len(), 1);
        assert!(editor.selection().is_none());
    }

    #[test]
    fn test_commands_rejected_outside_modes() {
        let mut editor = Editor::default();
        let result = editor.execute(Command::AddShape(ShapeKind::Box));
        assert!(matches!(result, Err(EditorError::WrongMode { command: "add", mode: AppMode::None })));
        assert_eq!(editor.document().unwrap().len(), 1);
    }

    #[test]
    fn test_add_selects_new_node() {
        let mut editor = modelling();
        let outcome = editor.execute(Command::AddShape(ShapeKind::Cone)).unwrap();
        let Outcome::ShapeAdded { node, kind } = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert_eq!(kind, ShapeKind::Cone);
        assert_eq!(editor.selection(), Some(node));
        let graph = editor.document().unwrap();
        assert_eq!(graph.shape_of(node).unwrap().level(), editor.config().default_level);
    }

    #[test]
    fn test_remove_selects_previous_node() {
        let mut editor = modelling();
        run(&mut editor, &["add box", "add sphere", "add cone"]);
        let nodes = editor.document().unwrap().all_nodes().to_vec();

        let outcome = editor.execute(Command::RemoveCurrent).unwrap();
        assert_eq!(outcome, Outcome::Removed { count: 1, selection: Some(nodes[2]) });
        assert_eq!(editor.selection(), Some(nodes[2]));

        editor.execute(Command::RemoveCurrent).unwrap();
        assert_eq!(editor.selection(), Some(nodes[1]));

        // The first shape has only the root before it
        editor.execute(Command::RemoveCurrent).unwrap();
        assert_eq!(editor.selection(), None);
        assert!(matches!(editor.execute(Command::RemoveCurrent), Err(EditorError::NoSelection)));
        assert_eq!(editor.document().unwrap().len(), 1);
    }

    #[test]
    fn test_step_needs_mode_and_axis() {
        let mut editor = modelling();
        run(&mut editor, &["add sphere"]);
        assert!(matches!(editor.execute(Command::Increase), Err(EditorError::NoAxis)));
        run(&mut editor, &["axis y"]);
        assert!(matches!(editor.execute(Command::Increase), Err(EditorError::NoTransformMode)));
    }

    #[test]
    fn test_rotate_steps_cancel() {
        let mut editor = modelling();
        run(&mut editor, &["add sphere", "rotate", "axis y", "+"]);
        let node = editor.selection().unwrap();
        let rotated = *editor.document().unwrap().node(node).unwrap().rotation();
        assert_ne!(rotated, Mat4::identity());

        run(&mut editor, &["-"]);
        let rotation = *editor.document().unwrap().node(node).unwrap().rotation();
        assert_relative_eq!(rotation, Mat4::identity(), epsilon = 1e-5);
    }

    #[test]
    fn test_translate_and_scale_steps() {
        let mut editor = modelling();
        run(&mut editor, &["add box", "translate", "axis x", "+", "+", "scale", "axis z", "+", "-"]);
        let node = editor.document().unwrap().node(editor.selection().unwrap()).unwrap();
        assert_relative_eq!(node.translation().translation_part(), Vec3::new(0.2, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(node.scale().scale_diagonal(), Vec3::new(1.0, 1.0, 0.99), epsilon = 1e-6);
    }

    #[test]
    fn test_color_forces_opaque() {
        let mut editor = modelling();
        run(&mut editor, &["add cylinder", "color 0.1 0.2 0.3"]);
        let node = editor.document().unwrap().node(editor.selection().unwrap()).unwrap();
        assert_eq!(node.color(), Vec4::new(0.1, 0.2, 0.3, 1.0));
    }

    #[test]
    fn test_inspection_only_rotates() {
        let mut editor = Editor::default();
        run(&mut editor, &["mode inspection"]);
        let result = editor.execute(Command::SetTransformMode(TransformMode::Scale));
        assert!(matches!(result, Err(EditorError::WrongMode { command: "scale", .. })));
        assert!(matches!(editor.execute(Command::AddShape(ShapeKind::Box)), Err(EditorError::WrongMode { .. })));

        run(&mut editor, &["rotate", "axis z", "+"]);
        let root = editor.document().unwrap().root();
        assert_ne!(*editor.document().unwrap().node(root).unwrap().rotation(), Mat4::identity());
    }

    #[test]
    fn test_failed_load_drops_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = Editor::default();
        run(&mut editor, &["mode inspection"]);

        let missing = dir.path().join("missing");
        let result = editor.execute(Command::Load(missing.display().to_string()));
        assert!(matches!(result, Err(EditorError::Scene(SceneError::Io(_)))));
        assert!(editor.document().is_none());
        assert!(matches!(editor.execute(Command::Increase), Err(EditorError::NoDocument)));

        // Adding a shape starts a fresh document
        run(&mut editor, &["mode modelling", "add box"]);
        assert_eq!(editor.document().unwrap().len(), 2);
    }

    #[test]
    fn test_save_then_load_selects_last_node() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("scene").display().to_string();

        let mut editor = modelling();
        run(&mut editor, &["add box", "add cone"]);
        let outcome = editor.execute(Command::Save(base.clone())).unwrap();
        assert_eq!(outcome, Outcome::Saved(PathBuf::from(format!("{base}.mod"))));

        run(&mut editor, &["mode inspection"]);
        let outcome = editor.execute(Command::Load(base)).unwrap();
        assert!(matches!(outcome, Outcome::Loaded { nodes: 3, .. }));
        let graph = editor.document().unwrap();
        assert_eq!(editor.selection(), graph.all_nodes().last().copied());
        assert_eq!(graph.shape_of(editor.selection().unwrap()).unwrap().kind(), ShapeKind::Cone);
    }

    #[test]
    fn test_normalize_path() {
        let editor = Editor::default();
        assert_eq!(editor.normalize_path("robot"), PathBuf::from("robot.mod"));
        assert_eq!(editor.normalize_path("robot.mod"), PathBuf::from("robot.mod"));
        assert_eq!(editor.normalize_path("a.model"), PathBuf::from("a.model"));
    }
}

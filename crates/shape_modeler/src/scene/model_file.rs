//! `.mod` model file reader and writer
//!
//! One whitespace-separated record per node, in pre-order, root first:
//!
//! ```text
//! type parent tx ty tz qx qy qz qw sx sy sz r g b
//! ```
//!
//! `type` is a [`ShapeKind`] code or `-1` for a node without a shape, and
//! `parent` is the 0-based index of the parent's record or `-1` for the root.
//! Only the translation offset, the scale diagonal and the RGB color are
//! stored. The rotation is always written as the identity quaternion and
//! the tessellation level is not stored at all, so both are lost on reload.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec4};
use crate::geometry::{Shape, ShapeKind, TessellationLevel};

use super::{NodeId, SceneError, SceneGraph};

const FIELD_COUNT: usize = 15;

/// Type code for a node without a shape
pub const NO_SHAPE: i32 = -1;

/// One parsed line of a model file
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    /// Shape type code, [`NO_SHAPE`] for none
    pub kind_code: i32,
    /// Index of the parent record, `None` for the root
    pub parent: Option<usize>,
    /// Translation offset
    pub translation: Vec3,
    /// Scale diagonal
    pub scale: Vec3,
    /// RGB color
    pub color: Vec3,
}

impl NodeRecord {
    /// Parse one record; `line` is the 1-based line number used in errors
    pub fn parse(text: &str, line: usize) -> Result<Self, SceneError> {
        let malformed = |reason: String| SceneError::MalformedRecord { line, reason };

        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != FIELD_COUNT {
            return Err(malformed(format!("expected {FIELD_COUNT} fields, found {}", fields.len())));
        }

        let int = |i: usize| {
            fields[i]
                .parse::<i32>()
                .map_err(|e| malformed(format!("field {} '{}': {e}", i + 1, fields[i])))
        };
        let float = |i: usize| {
            fields[i]
                .parse::<f32>()
                .map_err(|e| malformed(format!("field {} '{}': {e}", i + 1, fields[i])))
        };
        let vec3 = |i: usize| -> Result<Vec3, SceneError> { Ok(Vec3::new(float(i)?, float(i + 1)?, float(i + 2)?)) };

        let kind_code = int(0)?;
        // Other negative indices never name a record and fall back to the root on load
        let parent = match int(1)? {
            -1 => None,
            index => Some(usize::try_from(index).unwrap_or(usize::MAX)),
        };
        // Quaternion is validated but never used
        for i in 5..9 {
            float(i)?;
        }

        Ok(Self {
            kind_code,
            parent,
            translation: vec3(2)?,
            scale: vec3(9)?,
            color: vec3(12)?,
        })
    }
}

impl fmt::Display for NodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent = self.parent.map_or(-1, |p| p as i64);
        let (t, s, c) = (self.translation, self.scale, self.color);
        write!(
            f,
            "{} {parent} {} {} {} 0 0 0 1 {} {} {} {} {} {}",
            self.kind_code, t.x, t.y, t.z, s.x, s.y, s.z, c.x, c.y, c.z
        )
    }
}

impl SceneGraph {
    /// Snapshot every node as a record, in pre-order
    pub fn records(&self) -> Vec<NodeRecord> {
        let order = self.collect_pre_order();
        let index: HashMap<NodeId, usize> = order.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        order
            .iter()
            .filter_map(|&id| {
                let node = self.node(id)?;
                Some(NodeRecord {
                    kind_code: self.shape_of(id).map_or(NO_SHAPE, |s| s.kind().code()),
                    parent: node.parent().and_then(|p| index.get(&p).copied()),
                    translation: node.translation().translation_part(),
                    scale: node.scale().scale_diagonal(),
                    color: node.color().xyz(),
                })
            })
            .collect()
    }

    /// Write the whole tree to `writer`
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), SceneError> {
        for record in self.records() {
            writeln!(writer, "{record}")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Save the whole tree to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;
        log::info!("Saved {} nodes to {}", self.len(), path.display());
        Ok(())
    }

    /// Load a model file, rebuilding every shape at level 1
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        Self::load_with_level(path, TessellationLevel::new(1))
    }

    /// Load a model file, rebuilding every shape at `level`
    pub fn load_with_level(path: impl AsRef<Path>, level: TessellationLevel) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let graph = Self::read_from(BufReader::new(file), level)?;
        log::info!("Loaded {} nodes from {}", graph.len(), path.display());
        Ok(graph)
    }

    /// Build a fresh graph from model file text
    ///
    /// Malformed lines are skipped with a warning. Parent indices refer to
    /// the records built so far, root at index 0; an index past that range
    /// hangs the node under the root. Only IO failures abort the read.
    pub fn read_from<R: BufRead>(mut reader: R, level: TessellationLevel) -> Result<Self, SceneError> {
        let mut graph = Self::new();
        let mut built = vec![graph.root()];
        let mut root_seen = false;

        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let Ok(line) = std::str::from_utf8(&buf) else {
                let e = SceneError::MalformedRecord {
                    line: line_no,
                    reason: "not valid UTF-8".to_string(),
                };
                log::warn!("Skipping record: {e}");
                continue;
            };
            if line.trim().is_empty() {
                continue;
            }

            let record = match NodeRecord::parse(line, line_no) {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("Skipping record: {e}");
                    continue;
                }
            };

            let Some(parent_index) = record.parent else {
                if root_seen {
                    log::warn!("Skipping record on line {line_no}: second root");
                } else {
                    if record.kind_code != NO_SHAPE {
                        log::warn!("Line {line_no}: root record has type {}, ignoring it", record.kind_code);
                    }
                    root_seen = true;
                    graph.apply_record(graph.root(), &record);
                }
                continue;
            };

            let shape = match record.kind_code {
                NO_SHAPE => None,
                code => match ShapeKind::from_code(code) {
                    Some(kind) => Some(graph.pool_shape(Shape::new(kind, level))),
                    None => {
                        log::warn!("Skipping record on line {line_no}: unknown type {code}");
                        continue;
                    }
                },
            };

            let parent = built.get(parent_index).copied().unwrap_or_else(|| {
                log::warn!("Line {line_no}: parent index {parent_index} out of range, attaching to root");
                graph.root()
            });

            let id = graph.attach(shape, parent);
            graph.apply_record(id, &record);
            built.push(id);
        }

        Ok(graph)
    }

    fn apply_record(&mut self, id: NodeId, record: &NodeRecord) {
        if let Some(node) = self.node_mut(id) {
            node.set_translation(Mat4::translation(record.translation));
            node.set_scale(Mat4::scaling(record.scale));
            let c = record.color;
            node.set_color(Vec4::new(c.x, c.y, c.z, 1.0));
        }
    }
}

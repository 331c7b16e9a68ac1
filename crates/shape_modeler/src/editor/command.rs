//! Editor commands and the modes they switch between

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::foundation::math::Axis;
use crate::geometry::ShapeKind;

/// Top-level editor mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppMode {
    /// Nothing but mode switches is accepted
    #[default]
    None,
    /// Build and edit individual nodes
    Modelling,
    /// Load models and turn the whole assembly
    Inspection,
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "NONE",
            Self::Modelling => "MODELLING",
            Self::Inspection => "INSPECTION",
        };
        f.write_str(name)
    }
}

impl FromStr for AppMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "m" | "modelling" | "modeling" => Ok(Self::Modelling),
            "i" | "inspection" => Ok(Self::Inspection),
            other => Err(format!("unknown mode '{other}'")),
        }
    }
}

/// What `Increase` and `Decrease` act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformMode {
    /// No transform selected yet
    #[default]
    None,
    /// Rotate about the selected axis
    Rotate,
    /// Move along the selected axis
    Translate,
    /// Stretch along the selected axis
    Scale,
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Rotate => "rotation",
            Self::Translate => "translation",
            Self::Scale => "scaling",
        };
        f.write_str(name)
    }
}

/// One user action
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Switch the application mode
    SetMode(AppMode),
    /// Add a shape under the root and select it
    AddShape(ShapeKind),
    /// Remove the selected node and its subtree
    RemoveCurrent,
    /// Choose what `Increase`/`Decrease` do
    SetTransformMode(TransformMode),
    /// Choose the axis for transforms
    SelectAxis(Axis),
    /// Apply one positive step
    Increase,
    /// Apply one negative step
    Decrease,
    /// Recolor the selected node; alpha is always 1
    SetColor([f32; 3]),
    /// Save the document
    Save(String),
    /// Replace the document with a model file
    Load(String),
}

impl Command {
    /// Short keyword used in logs and errors
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetMode(_) => "mode",
            Self::AddShape(_) => "add",
            Self::RemoveCurrent => "remove",
            Self::SetTransformMode(TransformMode::Rotate) => "rotate",
            Self::SetTransformMode(TransformMode::Translate) => "translate",
            Self::SetTransformMode(TransformMode::Scale) => "scale",
            Self::SetTransformMode(TransformMode::None) => "transform",
            Self::SelectAxis(_) => "axis",
            Self::Increase => "+",
            Self::Decrease => "-",
            Self::SetColor(_) => "color",
            Self::Save(_) => "save",
            Self::Load(_) => "load",
        }
    }
}

/// Errors from parsing a command line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    /// Blank input
    #[error("Empty command")]
    Empty,

    /// First word is not a known command
    #[error("Unknown command: {0}")]
    Unknown(String),

    /// A required argument is absent
    #[error("Command '{command}' is missing its argument")]
    MissingArgument {
        /// Command keyword
        command: String,
    },

    /// An argument did not parse
    #[error("Invalid argument for '{command}': {reason}")]
    InvalidArgument {
        /// Command keyword
        command: String,
        /// Parse failure
        reason: String,
    },
}

impl FromStr for Command {
    type Err = ParseCommandError;

    /// Parse `keyword [arguments]`, e.g. `add cone`, `axis y`, `color 1 0 0`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (keyword, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let rest = rest.trim();
        let keyword = keyword.to_ascii_lowercase();

        let argument = || {
            if rest.is_empty() {
                Err(ParseCommandError::MissingArgument { command: keyword.clone() })
            } else {
                Ok(rest)
            }
        };
        let invalid = |reason: String| ParseCommandError::InvalidArgument {
            command: keyword.clone(),
            reason,
        };

        match keyword.as_str() {
            "" => Err(ParseCommandError::Empty),
            "mode" => argument()?.parse().map(Self::SetMode).map_err(invalid),
            "add" => argument()?.parse().map(Self::AddShape).map_err(invalid),
            "remove" => Ok(Self::RemoveCurrent),
            "rotate" => Ok(Self::SetTransformMode(TransformMode::Rotate)),
            "translate" => Ok(Self::SetTransformMode(TransformMode::Translate)),
            "scale" => Ok(Self::SetTransformMode(TransformMode::Scale)),
            "axis" => argument()?.parse().map(Self::SelectAxis).map_err(invalid),
            "+" | "increase" => Ok(Self::Increase),
            "-" | "decrease" => Ok(Self::Decrease),
            "color" | "colour" => {
                let channels = argument()?
                    .split_whitespace()
                    .map(str::parse::<f32>)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| invalid(e.to_string()))?;
                let rgb: [f32; 3] = channels
                    .try_into()
                    .map_err(|v: Vec<f32>| invalid(format!("expected 3 channels, found {}", v.len())))?;
                Ok(Self::SetColor(rgb))
            }
            "save" => Ok(Self::Save(argument()?.to_string())),
            "load" => Ok(Self::Load(argument()?.to_string())),
            _ => Err(ParseCommandError::Unknown(keyword.clone())),
        }
    }
}

//! Launch entity data structures
//!
//! Descriptions only: none of these start a process themselves. The external
//! launch runtime consumes the serialized description and owns every process
//! lifecycle from there on.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A declared, externally-settable launch argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchArgument {
    pub name: String,
    pub description: String,
    pub default: Option<String>,
}

impl LaunchArgument {
    /// An argument the caller must supply.
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default: None,
        }
    }

    /// An argument with a default value.
    pub fn with_default(
        name: impl Into<String>,
        description: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default: Some(default.into()),
        }
    }
}

/// Delegation to another launch descriptor.
///
/// Args are a Vec to preserve forwarding order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeRecord {
    pub file: PathBuf,
    pub args: Vec<(String, String)>,
}

/// One process to start, with its resolved parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub package: String,
    pub executable: String,
    pub name: Option<String>,
    pub output: String,
    /// Inline parameters, name to value.
    pub params: Vec<(String, String)>,
    /// Paths to parameter files passed through verbatim.
    pub params_files: Vec<String>,
}

/// Any entity a launch description can contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LaunchEntity {
    Argument(LaunchArgument),
    Include(IncludeRecord),
    Node(NodeRecord),
}

/// The assembled, ordered description handed to the launch runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaunchDescription {
    pub entities: Vec<LaunchEntity>,
}

impl LaunchDescription {
    pub fn new(entities: Vec<LaunchEntity>) -> Self {
        Self { entities }
    }

    /// All argument declarations, in description order.
    pub fn arguments(&self) -> Vec<&LaunchArgument> {
        self.entities
            .iter()
            .filter_map(|e| match e {
                LaunchEntity::Argument(arg) => Some(arg),
                _ => None,
            })
            .collect()
    }

    /// All nested-launch inclusions, in description order.
    pub fn includes(&self) -> Vec<&IncludeRecord> {
        self.entities
            .iter()
            .filter_map(|e| match e {
                LaunchEntity::Include(include) => Some(include),
                _ => None,
            })
            .collect()
    }

    /// All node records, in description order.
    pub fn nodes(&self) -> Vec<&NodeRecord> {
        self.entities
            .iter()
            .filter_map(|e| match e {
                LaunchEntity::Node(node) => Some(node),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

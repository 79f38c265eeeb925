use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier of an object in the scene
pub type ObjectId = String;

/// Kind discriminator for scene entries shown in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Built-in scene helper (grid, axes)
    Helper,
    /// Polyline placed by the user
    Sketch,
}

impl EntryKind {
    pub fn icon(&self) -> &'static str {
        match self {
            EntryKind::Helper => "#",
            EntryKind::Sketch => "✏",
        }
    }
}

/// Entry as seen by the scene tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntryInfo {
    pub id: ObjectId,
    pub kind: EntryKind,
    pub name: String,
    pub visible: bool,
}

/// Named camera preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewName {
    /// Camera directly above the origin
    Top,
    /// Camera offset diagonally above and to the side
    Iso3d,
}

impl ViewName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewName::Top => "top",
            ViewName::Iso3d => "iso3d",
        }
    }

    pub fn all() -> &'static [ViewName] {
        &[ViewName::Top, ViewName::Iso3d]
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(ViewName::Top),
            "iso3d" | "3d" => Ok(ViewName::Iso3d),
            other => Err(format!("unknown view '{other}'")),
        }
    }
}

/// Polyline shipped inside an external scene bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundlePolyline {
    #[serde(default)]
    pub name: String,
    /// World-space points, consecutive pairs form segments
    pub points: Vec<[f32; 3]>,
}

/// Document served at the external renderer URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneBundle {
    pub name: String,
    #[serde(default)]
    pub polylines: Vec<BundlePolyline>,
    /// Line color override (RGB)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_color: Option<[u8; 3]>,
}

impl SceneBundle {
    pub fn segment_count(&self) -> usize {
        self.polylines
            .iter()
            .map(|p| p.points.len().saturating_sub(1))
            .sum()
    }
}

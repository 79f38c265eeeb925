//! Scene graph: named entries and the line geometry they own

use std::collections::BTreeMap;
use std::sync::Arc;

use shared::{EntryKind, ObjectId, SceneEntryInfo};

use super::settings::{rgba, SceneSettings};
use crate::error::ViewportError;
use crate::viewport::mesh::{self, LineMeshData};

/// Stable handle of one piece of line geometry in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineHandle(u64);

impl LineHandle {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Geometry handed to a render target
#[derive(Debug, Clone)]
pub struct LineBatch {
    pub handle: LineHandle,
    pub data: Arc<LineMeshData>,
}

/// A drawable listed in the scene tree
#[derive(Debug, Clone)]
pub struct SceneEntry {
    pub id: ObjectId,
    pub kind: EntryKind,
    pub name: String,
    pub visible: bool,
    lines: Vec<LineHandle>,
}

impl SceneEntry {
    pub fn lines(&self) -> &[LineHandle] {
        &self.lines
    }

    pub fn info(&self) -> SceneEntryInfo {
        SceneEntryInfo {
            id: self.id.clone(),
            kind: self.kind,
            name: self.name.clone(),
            visible: self.visible,
        }
    }
}

/// Scene graph owned by the viewport controller
pub struct SceneGraph {
    entries: Vec<SceneEntry>,
    geometry: BTreeMap<LineHandle, Arc<LineMeshData>>,
    next_handle: u64,
    sketch_counter: usize,
    version: u64,
}

impl SceneGraph {
    /// Scene with no entries
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            geometry: BTreeMap::new(),
            next_handle: 1,
            sketch_counter: 0,
            version: 0,
        }
    }

    /// Scene with the grid and axes helpers
    pub fn new(settings: &SceneSettings) -> Self {
        let mut scene = Self::empty();
        let grid_color = rgba(settings.grid_color, 1.0);
        scene.add_helper(
            "Grid",
            mesh::grid(settings.grid_size, settings.grid_divisions, grid_color, grid_color),
        );
        scene.add_helper("Axes", mesh::axes(settings.axes_length));
        scene
    }

    /// Monotonic counter bumped on every change
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn add_helper(&mut self, name: &str, data: LineMeshData) -> ObjectId {
        let id = self.push_entry(EntryKind::Helper, name.to_string());
        let handle = self.insert_geometry(data);
        if let Some(entry) = self.entries.last_mut() {
            entry.lines.push(handle);
        }
        id
    }

    /// Create an empty sketch entry named "Sketch N"
    pub fn create_sketch(&mut self) -> ObjectId {
        self.sketch_counter += 1;
        let name = format!("Sketch {}", self.sketch_counter);
        self.push_entry(EntryKind::Sketch, name)
    }

    /// Create an empty sketch entry with an explicit name
    pub fn add_sketch(&mut self, name: &str) -> ObjectId {
        self.push_entry(EntryKind::Sketch, name.to_string())
    }

    /// Attach line geometry to an entry
    pub fn add_line(&mut self, owner: &str, data: LineMeshData) -> Result<LineHandle, ViewportError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == owner)
            .ok_or_else(|| ViewportError::UnknownEntry(owner.to_string()))?;
        let handle = self.insert_geometry(data);
        self.entries[index].lines.push(handle);
        Ok(handle)
    }

    /// Release line geometry immediately
    pub fn remove_line(&mut self, handle: LineHandle) -> bool {
        for entry in &mut self.entries {
            entry.lines.retain(|h| *h != handle);
        }
        let removed = self.geometry.remove(&handle).is_some();
        if removed {
            self.version += 1;
        }
        removed
    }

    pub fn line(&self, handle: LineHandle) -> Option<&Arc<LineMeshData>> {
        self.geometry.get(&handle)
    }

    /// Number of live line geometries
    pub fn line_count(&self) -> usize {
        self.geometry.len()
    }

    pub fn entry(&self, id: &str) -> Option<&SceneEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> Vec<SceneEntryInfo> {
        self.entries.iter().map(SceneEntry::info).collect()
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), ViewportError> {
        let entry = self.entry_mut(id)?;
        if entry.visible != visible {
            entry.visible = visible;
            self.version += 1;
        }
        Ok(())
    }

    /// Flip visibility, returning the new flag
    pub fn toggle_visibility(&mut self, id: &str) -> Result<bool, ViewportError> {
        let entry = self.entry_mut(id)?;
        entry.visible = !entry.visible;
        let visible = entry.visible;
        self.version += 1;
        Ok(visible)
    }

    /// Remove a sketch entry and release its geometry. Helpers are protected.
    pub fn remove_entry(&mut self, id: &str) -> Result<SceneEntry, ViewportError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ViewportError::UnknownEntry(id.to_string()))?;
        if self.entries[index].kind == EntryKind::Helper {
            return Err(ViewportError::ProtectedEntry(self.entries[index].name.clone()));
        }
        let entry = self.entries.remove(index);
        for handle in &entry.lines {
            self.geometry.remove(handle);
        }
        self.version += 1;
        Ok(entry)
    }

    /// Remove every sketch entry, returning their ids
    pub fn remove_sketches(&mut self) -> Vec<ObjectId> {
        let ids: Vec<ObjectId> = self
            .entries
            .iter()
            .filter(|e| e.kind == EntryKind::Sketch)
            .map(|e| e.id.clone())
            .collect();
        for id in &ids {
            let _ = self.remove_entry(id);
        }
        ids
    }

    /// Geometry of all visible entries, in entry order
    pub fn visible_batches(&self) -> Vec<LineBatch> {
        self.entries
            .iter()
            .filter(|e| e.visible)
            .flat_map(|e| e.lines.iter())
            .filter_map(|handle| {
                self.geometry.get(handle).map(|data| LineBatch {
                    handle: *handle,
                    data: Arc::clone(data),
                })
            })
            .collect()
    }

    fn push_entry(&mut self, kind: EntryKind, name: String) -> ObjectId {
        let id = uuid::Uuid::new_v4().to_string();
        self.entries.push(SceneEntry {
            id: id.clone(),
            kind,
            name,
            visible: true,
            lines: Vec::new(),
        });
        self.version += 1;
        id
    }

    fn insert_geometry(&mut self, data: LineMeshData) -> LineHandle {
        let handle = LineHandle(self.next_handle);
        self.next_handle += 1;
        self.geometry.insert(handle, Arc::new(data));
        self.version += 1;
        handle
    }

    fn entry_mut(&mut self, id: &str) -> Result<&mut SceneEntry, ViewportError> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ViewportError::UnknownEntry(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn line() -> LineMeshData {
        mesh::segment(Vec3::ZERO, Vec3::X, [1.0; 4])
    }

    #[test]
    fn test_new_scene_has_helpers() {
        let scene = SceneGraph::new(&SceneSettings::default());
        let entries = scene.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Grid");
        assert_eq!(entries[1].name, "Axes");
        assert!(entries.iter().all(|e| e.kind == EntryKind::Helper && e.visible));
        assert_eq!(scene.line_count(), 2);
    }

    #[test]
    fn test_sketch_names_are_sequential() {
        let mut scene = SceneGraph::empty();
        let a = scene.create_sketch();
        let b = scene.create_sketch();
        assert_ne!(a, b);
        assert_eq!(scene.entry(&a).unwrap().name, "Sketch 1");
        assert_eq!(scene.entry(&b).unwrap().name, "Sketch 2");
    }

    #[test]
    fn test_hidden_entries_are_not_rendered() {
        let mut scene = SceneGraph::empty();
        let id = scene.create_sketch();
        scene.add_line(&id, line()).unwrap();
        assert_eq!(scene.visible_batches().len(), 1);

        assert!(!scene.toggle_visibility(&id).unwrap());
        assert!(scene.visible_batches().is_empty());

        scene.set_visible(&id, true).unwrap();
        assert_eq!(scene.visible_batches().len(), 1);
    }

    #[test]
    fn test_unknown_entry_errors() {
        let mut scene = SceneGraph::empty();
        assert_eq!(
            scene.set_visible("missing", false),
            Err(ViewportError::UnknownEntry("missing".into()))
        );
        assert!(scene.add_line("missing", line()).is_err());
        assert_eq!(scene.line_count(), 0);
    }

    #[test]
    fn test_remove_entry_releases_geometry() {
        let mut scene = SceneGraph::empty();
        let id = scene.create_sketch();
        scene.add_line(&id, line()).unwrap();
        scene.add_line(&id, line()).unwrap();
        assert_eq!(scene.line_count(), 2);

        let removed = scene.remove_entry(&id).unwrap();
        assert_eq!(removed.lines().len(), 2);
        assert_eq!(scene.line_count(), 0);
        assert!(scene.entry(&id).is_none());
    }

    #[test]
    fn test_helpers_are_protected() {
        let mut scene = SceneGraph::new(&SceneSettings::default());
        let grid_id = scene.entries()[0].id.clone();
        assert!(matches!(
            scene.remove_entry(&grid_id),
            Err(ViewportError::ProtectedEntry(_))
        ));
        scene.set_visible(&grid_id, false).unwrap();
        assert_eq!(scene.visible_batches().len(), 1);
    }

    #[test]
    fn test_remove_line_and_sketches() {
        let mut scene = SceneGraph::new(&SceneSettings::default());
        let id = scene.create_sketch();
        let h = scene.add_line(&id, line()).unwrap();
        assert!(scene.remove_line(h));
        assert!(!scene.remove_line(h));
        assert!(scene.entry(&id).unwrap().lines().is_empty());

        scene.create_sketch();
        let removed = scene.remove_sketches();
        assert_eq!(removed.len(), 2);
        assert_eq!(scene.entries().len(), 2);
    }
}

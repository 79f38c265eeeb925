//! Polyline drawing state machine

use glam::Vec3;
use shared::ObjectId;

use super::scene::{LineHandle, SceneGraph};
use super::settings::{rgba, DrawingSettings};
use super::snap::SnapIndex;
use crate::error::ViewportError;
use crate::viewport::mesh;

/// Sub-state while drawing mode is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePhase {
    /// Nothing to preview from yet
    NoVertex,
    /// Current polyline has at least one vertex
    HasVertex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingState {
    Idle,
    Active(ActivePhase),
}

/// Committed segment between two vertices of a polyline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Index of the start vertex in the polyline
    pub start: usize,
    /// Index of the end vertex in the polyline
    pub end: usize,
    pub handle: LineHandle,
}

/// Transient line from the last committed vertex to the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewSegment {
    pub start: Vec3,
    pub end: Vec3,
}

/// One connected run of committed vertices, shown as a sketch entry
#[derive(Debug, Clone)]
pub struct Polyline {
    pub entry_id: ObjectId,
    vertices: Vec<Vec3>,
    segments: Vec<Segment>,
}

impl Polyline {
    fn new(entry_id: ObjectId) -> Self {
        Self {
            entry_id,
            vertices: Vec::new(),
            segments: Vec::new(),
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn last_vertex(&self) -> Option<Vec3> {
        self.vertices.last().copied()
    }

    /// World-space endpoints of a segment
    pub fn segment_points(&self, segment: &Segment) -> (Vec3, Vec3) {
        (self.vertices[segment.start], self.vertices[segment.end])
    }
}

/// Result of committing a vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitOutcome {
    /// Final vertex position
    pub point: Vec3,
    /// True if the candidate was coalesced onto an existing vertex
    pub snapped: bool,
    pub segment: Option<Segment>,
}

/// Drawing session: mode flag, committed polylines, live preview and snap index
#[derive(Debug, Default)]
pub struct DrawingSession {
    active: bool,
    polylines: Vec<Polyline>,
    /// Polyline receiving new vertices; None until the first pointer-down
    current: Option<ObjectId>,
    preview: Option<PreviewSegment>,
    snap: SnapIndex,
}

impl DrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DrawingState {
        if !self.active {
            DrawingState::Idle
        } else if self.current_polyline().is_some_and(|p| !p.vertices.is_empty()) {
            DrawingState::Active(ActivePhase::HasVertex)
        } else {
            DrawingState::Active(ActivePhase::NoVertex)
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn preview(&self) -> Option<&PreviewSegment> {
        self.preview.as_ref()
    }

    pub fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }

    pub fn current_polyline(&self) -> Option<&Polyline> {
        let id = self.current.as_ref()?;
        self.polylines.iter().find(|p| &p.entry_id == id)
    }

    pub fn snap_index(&self) -> &SnapIndex {
        &self.snap
    }

    /// Vertices across all polylines
    pub fn vertex_count(&self) -> usize {
        self.polylines.iter().map(|p| p.vertices.len()).sum()
    }

    /// Segments across all polylines
    pub fn segment_count(&self) -> usize {
        self.polylines.iter().map(|p| p.segments.len()).sum()
    }

    /// Flip drawing mode. Entering starts a fresh polyline; leaving drops the
    /// preview but keeps committed geometry. Returns the new mode.
    pub fn toggle(&mut self) -> bool {
        if self.active {
            self.stop();
        } else {
            self.active = true;
            self.current = None;
        }
        self.active
    }

    /// Escape: leave drawing mode if active. Returns true if anything changed.
    pub fn cancel(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.stop();
        true
    }

    /// Commit a vertex at `candidate`, snapping onto an existing vertex within
    /// `settings.snap_tolerance`. Returns None while idle.
    pub fn commit(
        &mut self,
        candidate: Vec3,
        settings: &DrawingSettings,
        scene: &mut SceneGraph,
    ) -> Result<Option<CommitOutcome>, ViewportError> {
        if !self.active {
            return Ok(None);
        }

        let snapped_to = self.snap.find_snap(candidate, settings.snap_tolerance);
        let point = snapped_to.unwrap_or(candidate);

        let index = self.ensure_current(scene);
        let entry_id = self.polylines[index].entry_id.clone();
        let previous = self.polylines[index].last_vertex();

        let marker = scene.add_line(
            &entry_id,
            mesh::joint_marker(
                point,
                settings.joint_radius,
                settings.joint_segments,
                rgba(settings.joint_color, 1.0),
            ),
        )?;

        let segment = match previous {
            Some(prev) => {
                let added = scene.add_line(
                    &entry_id,
                    mesh::segment(prev, point, rgba(settings.line_color, 1.0)),
                );
                let handle = match added {
                    Ok(handle) => handle,
                    Err(e) => {
                        scene.remove_line(marker);
                        return Err(e);
                    }
                };
                let end = self.polylines[index].vertices.len();
                Some(Segment {
                    start: end - 1,
                    end,
                    handle,
                })
            }
            None => None,
        };

        let polyline = &mut self.polylines[index];
        polyline.vertices.push(point);
        if let Some(segment) = segment {
            polyline.segments.push(segment);
        }
        self.snap.insert(point);
        self.preview = Some(PreviewSegment {
            start: point,
            end: candidate,
        });

        Ok(Some(CommitOutcome {
            point,
            snapped: snapped_to.is_some(),
            segment,
        }))
    }

    /// Replace the preview with a line from the last vertex to `candidate`.
    /// No-op unless a vertex has been committed. Returns true if updated.
    pub fn update_preview(&mut self, candidate: Vec3) -> bool {
        if self.state() != DrawingState::Active(ActivePhase::HasVertex) {
            return false;
        }
        let Some(start) = self.current_polyline().and_then(Polyline::last_vertex) else {
            return false;
        };
        self.preview = Some(PreviewSegment {
            start,
            end: candidate,
        });
        true
    }

    /// Pointer release. Reserved for polyline finalization gestures.
    pub fn pointer_up(&mut self) {}

    /// Forget a polyline whose sketch entry was removed from the scene
    pub fn remove_polyline(&mut self, entry_id: &str) -> bool {
        let before = self.polylines.len();
        self.polylines.retain(|p| p.entry_id != entry_id);
        if before == self.polylines.len() {
            return false;
        }
        if self.current.as_deref() == Some(entry_id) {
            self.current = None;
            self.preview = None;
        }
        self.rebuild_snap();
        true
    }

    /// Drop every polyline (scene clear)
    pub fn clear(&mut self) {
        self.polylines.clear();
        self.current = None;
        self.preview = None;
        self.snap.clear();
    }

    fn stop(&mut self) {
        self.active = false;
        self.current = None;
        self.preview = None;
    }

    fn ensure_current(&mut self, scene: &mut SceneGraph) -> usize {
        if let Some(id) = &self.current {
            if let Some(index) = self.polylines.iter().position(|p| &p.entry_id == id) {
                return index;
            }
        }
        let id = scene.create_sketch();
        self.polylines.push(Polyline::new(id.clone()));
        self.current = Some(id);
        self.polylines.len() - 1
    }

    fn rebuild_snap(&mut self) {
        let points: Vec<Vec3> = self
            .polylines
            .iter()
            .flat_map(|p| p.vertices.iter().copied())
            .collect();
        self.snap.rebuild(points);
    }
}

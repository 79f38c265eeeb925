use glam::Vec3;

/// Committed vertices available as snap targets.
///
/// Lookup is a linear scan in insertion order and returns the first vertex
/// within tolerance, not the nearest one.
#[derive(Debug, Clone, Default)]
pub struct SnapIndex {
    points: Vec<Vec3>,
}

impl SnapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a committed vertex
    pub fn insert(&mut self, point: Vec3) {
        self.points.push(point);
    }

    /// First registered vertex strictly closer than `tolerance` to `candidate`
    pub fn find_snap(&self, candidate: Vec3, tolerance: f32) -> Option<Vec3> {
        self.points
            .iter()
            .copied()
            .find(|p| p.distance(candidate) < tolerance)
    }

    /// Snap target if one exists, otherwise the candidate itself
    pub fn resolve(&self, candidate: Vec3, tolerance: f32) -> Vec3 {
        self.find_snap(candidate, tolerance).unwrap_or(candidate)
    }

    /// Replace the registered vertices
    pub fn rebuild(&mut self, points: impl IntoIterator<Item = Vec3>) {
        self.points.clear();
        self.points.extend(points);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snaps_within_tolerance() {
        let mut index = SnapIndex::new();
        index.insert(Vec3::new(100.0, 0.0, 100.0));

        let snapped = index.find_snap(Vec3::new(105.0, 0.0, 103.0), 10.0);
        assert_eq!(snapped, Some(Vec3::new(100.0, 0.0, 100.0)));

        assert_eq!(index.find_snap(Vec3::new(115.0, 0.0, 100.0), 10.0), None);
        assert_eq!(
            index.resolve(Vec3::new(115.0, 0.0, 100.0), 10.0),
            Vec3::new(115.0, 0.0, 100.0)
        );
    }

    #[test]
    fn test_tolerance_is_strict() {
        let mut index = SnapIndex::new();
        index.insert(Vec3::ZERO);
        assert_eq!(index.find_snap(Vec3::new(10.0, 0.0, 0.0), 10.0), None);
        assert_eq!(index.find_snap(Vec3::new(9.99, 0.0, 0.0), 10.0), Some(Vec3::ZERO));
    }

    #[test]
    fn test_first_hit_wins_over_nearest() {
        let mut index = SnapIndex::new();
        let far = Vec3::new(8.0, 0.0, 0.0);
        let near = Vec3::new(1.0, 0.0, 0.0);
        index.insert(far);
        index.insert(near);
        assert_eq!(index.find_snap(Vec3::ZERO, 10.0), Some(far));
    }

    #[test]
    fn test_rebuild_replaces_points() {
        let mut index = SnapIndex::new();
        index.insert(Vec3::ZERO);
        index.rebuild([Vec3::new(50.0, 0.0, 0.0)]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.find_snap(Vec3::ZERO, 10.0), None);
        index.clear();
        assert!(index.is_empty());
    }
}

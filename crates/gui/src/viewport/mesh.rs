use glam::Vec3;

/// Lines mesh: interleaved [pos.x, pos.y, pos.z, r, g, b, a], drawn as GL_LINES pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineMeshData {
    /// 7 floats per vertex: position(3) + color(4)
    pub vertices: Vec<f32>,
}

impl LineMeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 7
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append one line from `a` to `b`
    pub fn push_line(&mut self, a: Vec3, b: Vec3, color: [f32; 4]) {
        push_line_vert(&mut self.vertices, a.x, a.y, a.z, color);
        push_line_vert(&mut self.vertices, b.x, b.y, b.z, color);
    }
}

/// Square grid on the reference plane, centered on the origin
pub fn grid(size: f32, divisions: u32, center_color: [f32; 4], color: [f32; 4]) -> LineMeshData {
    let mut vertices = Vec::new();
    let divisions = divisions.max(1);
    let half = size * 0.5;
    let step = size / divisions as f32;

    for i in 0..=divisions {
        let f = -half + i as f32 * step;
        let c = if i * 2 == divisions { center_color } else { color };
        // Line along Z
        push_line_vert(&mut vertices, f, 0.0, -half, c);
        push_line_vert(&mut vertices, f, 0.0, half, c);
        // Line along X
        push_line_vert(&mut vertices, -half, 0.0, f, c);
        push_line_vert(&mut vertices, half, 0.0, f, c);
    }

    LineMeshData { vertices }
}

pub fn axes(length: f32) -> LineMeshData {
    let mut vertices = Vec::new();
    let r = [0.9_f32, 0.2, 0.2, 1.0];
    let g = [0.2_f32, 0.8, 0.2, 1.0];
    let b = [0.2_f32, 0.3, 0.9, 1.0];

    // X axis
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, r);
    push_line_vert(&mut vertices, length, 0.0, 0.0, r);
    // Y axis
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, g);
    push_line_vert(&mut vertices, 0.0, length, 0.0, g);
    // Z axis
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, b);
    push_line_vert(&mut vertices, 0.0, 0.0, length, b);

    LineMeshData { vertices }
}

pub fn segment(start: Vec3, end: Vec3, color: [f32; 4]) -> LineMeshData {
    let mut data = LineMeshData::default();
    data.push_line(start, end, color);
    data
}

/// Circle outline on the reference plane marking a committed vertex
pub fn joint_marker(center: Vec3, radius: f32, segments: u32, color: [f32; 4]) -> LineMeshData {
    let segments = segments.max(3);
    let mut data = LineMeshData::default();
    let point = |i: u32| {
        let a = i as f32 * std::f32::consts::TAU / segments as f32;
        center + Vec3::new(a.cos() * radius, 0.0, a.sin() * radius)
    };
    for i in 0..segments {
        data.push_line(point(i), point(i + 1), color);
    }
    data
}

/// Concatenate consecutive points into line pairs
pub fn polyline(points: &[Vec3], color: [f32; 4]) -> LineMeshData {
    let mut data = LineMeshData::default();
    for pair in points.windows(2) {
        data.push_line(pair[0], pair[1], color);
    }
    data
}

// ── Helpers ──────────────────────────────────────────────────

fn push_line_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, c: [f32; 4]) {
    v.extend_from_slice(&[px, py, pz, c[0], c[1], c[2], c[3]]);
}

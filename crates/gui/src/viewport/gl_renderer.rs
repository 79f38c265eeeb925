use std::collections::HashMap;

use glow::HasContext;

use super::mesh::LineMeshData;
use super::render_loop::{FrameData, PreviewLine};
use crate::state::scene::{LineBatch, LineHandle};

/// Floats per line vertex: position(3) + color(4)
const LINE_STRIDE: usize = 7;

// ── GPU handles ──────────────────────────────────────────────

struct GpuLines {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: i32,
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    line_program: glow::Program,
    /// Scene geometry keyed by line handle
    lines: HashMap<LineHandle, GpuLines>,
    /// Two-vertex buffer rewritten in place while the preview follows the pointer
    preview: GpuLines,
    destroyed: bool,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context) -> Result<Self, String> {
        let line_program = compile_program(gl, LINE_VERT, LINE_FRAG)?;
        let preview = create_dynamic_lines(gl, 2)?;
        Ok(Self {
            line_program,
            lines: HashMap::new(),
            preview,
            destroyed: false,
        })
    }

    /// Upload new batches and free buffers whose geometry left the frame
    fn sync(&mut self, gl: &glow::Context, batches: &[LineBatch]) {
        self.lines.retain(|handle, lines| {
            let keep = batches.iter().any(|b| b.handle == *handle);
            if !keep {
                unsafe { delete_lines(gl, lines) };
            }
            keep
        });
        for batch in batches {
            if self.lines.contains_key(&batch.handle) || batch.data.is_empty() {
                continue;
            }
            match upload_lines(gl, &batch.data) {
                Ok(lines) => {
                    self.lines.insert(batch.handle, lines);
                }
                Err(e) => tracing::error!("Line upload failed for {}: {e}", batch.handle.raw()),
            }
        }
    }

    fn write_preview(&mut self, gl: &glow::Context, preview: &PreviewLine) {
        let mut data = LineMeshData::default();
        data.push_line(preview.start, preview.end, preview.color);
        unsafe {
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.preview.vbo));
            gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, 0, bytemuck_cast_slice(&data.vertices));
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    /// Render one frame into `viewport` ([x, y, width, height] in pixels)
    pub fn paint(&mut self, gl: &glow::Context, frame: &FrameData, viewport: [f32; 4]) {
        if self.destroyed {
            return;
        }
        self.sync(gl, &frame.batches);
        if let Some(preview) = &frame.preview {
            self.write_preview(gl, preview);
        }

        unsafe {
            gl.viewport(
                viewport[0] as i32,
                viewport[1] as i32,
                viewport[2] as i32,
                viewport[3] as i32,
            );
            gl.scissor(
                viewport[0] as i32,
                viewport[1] as i32,
                viewport[2] as i32,
                viewport[3] as i32,
            );
            gl.enable(glow::SCISSOR_TEST);

            let [r, g, b] = frame.clear_color;
            gl.clear_color(r, g, b, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            // Everything lies on or near the reference plane; draw order decides overlap
            gl.disable(glow::DEPTH_TEST);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            gl.use_program(Some(self.line_program));
            set_uniform_mat4(gl, self.line_program, "u_mvp", &frame.view_projection);

            for batch in &frame.batches {
                if let Some(lines) = self.lines.get(&batch.handle) {
                    draw_lines(gl, lines);
                }
            }

            if frame.preview.is_some() {
                draw_lines(gl, &self.preview);
            }

            gl.disable(glow::SCISSOR_TEST);
            gl.use_program(None);
        }
    }

    /// Free every program and buffer. Later calls do nothing.
    pub fn destroy(&mut self, gl: &glow::Context) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        unsafe {
            gl.delete_program(self.line_program);
            for lines in self.lines.values() {
                delete_lines(gl, lines);
            }
            delete_lines(gl, &self.preview);
        }
        self.lines.clear();
        tracing::info!("GL resources released");
    }
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_lines(gl: &glow::Context, data: &LineMeshData) -> Result<GpuLines, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );
        set_line_attributes(gl);

        gl.bind_vertex_array(None);

        Ok(GpuLines {
            vao,
            vbo,
            vertex_count: data.vertex_count() as i32,
        })
    }
}

fn create_dynamic_lines(gl: &glow::Context, vertex_count: usize) -> Result<GpuLines, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_size(
            glow::ARRAY_BUFFER,
            (vertex_count * LINE_STRIDE * 4) as i32,
            glow::DYNAMIC_DRAW,
        );
        set_line_attributes(gl);

        gl.bind_vertex_array(None);

        Ok(GpuLines {
            vao,
            vbo,
            vertex_count: vertex_count as i32,
        })
    }
}

unsafe fn set_line_attributes(gl: &glow::Context) {
    let stride = (LINE_STRIDE * 4) as i32;
    // position: location 0
    gl.enable_vertex_attrib_array(0);
    gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
    // color: location 1
    gl.enable_vertex_attrib_array(1);
    gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, stride, 3 * 4);
}

unsafe fn delete_lines(gl: &glow::Context, lines: &GpuLines) {
    gl.delete_vertex_array(lines.vao);
    gl.delete_buffer(lines.vbo);
}

// ── Draw calls ───────────────────────────────────────────────

unsafe fn draw_lines(gl: &glow::Context, lines: &GpuLines) {
    gl.bind_vertex_array(Some(lines.vao));
    gl.draw_arrays(glow::LINES, 0, lines.vertex_count);
    gl.bind_vertex_array(None);
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Result<glow::Program, String> {
    unsafe {
        let program = gl.create_program()?;

        let vert = gl.create_shader(glow::VERTEX_SHADER)?;
        gl.shader_source(vert, vert_src);
        gl.compile_shader(vert);
        if !gl.get_shader_compile_status(vert) {
            let log = gl.get_shader_info_log(vert);
            tracing::error!("Vertex shader error: {log}");
        }

        let frag = gl.create_shader(glow::FRAGMENT_SHADER)?;
        gl.shader_source(frag, frag_src);
        gl.compile_shader(frag);
        if !gl.get_shader_compile_status(frag) {
            let log = gl.get_shader_info_log(frag);
            tracing::error!("Fragment shader error: {log}");
        }

        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);
        let linked = gl.get_program_link_status(program);
        if !linked {
            let log = gl.get_program_info_log(program);
            tracing::error!("Program link error: {log}");
        }

        gl.delete_shader(vert);
        gl.delete_shader(frag);

        if !linked {
            gl.delete_program(program);
            return Err("line shader failed to link".into());
        }
        Ok(program)
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &glam::Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            slice.as_ptr() as *const u8,
            std::mem::size_of_val(slice),
        )
    }
}

// ── Shaders ──────────────────────────────────────────────────

const LINE_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

out vec4 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_color = a_color;
}
"#;

const LINE_FRAG: &str = r#"#version 330 core
in vec4 v_color;
out vec4 frag_color;

void main() {
    frag_color = v_color;
}
"#;

use log::warn;

mod buffer;
mod generate;
mod light;
mod line;
mod scanline;
mod util;

pub use buffer::{PointBuffer, Segment, Segments, Triangle, Triangles};
pub use generate::{
    add_box, add_circle, add_curve, add_sphere, add_torus, generate_sphere, generate_torus,
    CurveType,
};
pub use light::{flat_color, set_in_range, Color, Light, Reflectance};

use util::from_hom_point;

/// Canvas and depth buffer of one render pass: a flat rgb8 pixel array with
/// a co-indexed z-buffer deciding per pixel whether a new sample is in front
/// of what is already there.
/// (0, 0) is the bottom left coordinate.
pub struct Scene {
    pub width: u32,
    pub height: u32,
    z_buffer: Vec<f32>,    // Continuously fills out after a clear() call with every primitive drawn.
    depth_data: Vec<u8>,   // Normalized values of the z-buffer for visualization.
    render_data: Vec<u8>,  // Storing flat array.
}

impl Scene {
    /// Generates new Scene struct with specified width and height.
    /// Pixel data format is assumed to be rgb8; every depth starts out
    /// maximally far, so the first real sample at a pixel always lands.
    pub fn new(width: u32, height: u32) -> Scene {
        let n_pixels = (width * height) as usize;
        return Scene {
            width,
            height,
            z_buffer: vec![f32::MIN; n_pixels],
            depth_data: vec![0; 3 * n_pixels],
            render_data: vec![0; 3 * n_pixels],
        };
    }

    /// Get rendered scene as a slice of color values of size 3 * (number of pixels).
    pub fn as_render_data(&self) -> &[u8] {
        return &self.render_data[..];
    }

    /// Get image, representing z-buffer values.
    /// Lazy in a sense, that color data for the image is calculated only if this call is made.
    pub fn as_depth_data(&mut self) -> &[u8] {
        let z_max = self.z_buffer.iter().fold(f32::MIN, |max_value, value| value.max(max_value));
        let z_min = self.z_buffer.iter().fold(f32::MAX, |min_value, value| value.min(min_value));
        let scale = z_max - z_min;
        for i in 0..self.z_buffer.len() {
            let scaled_z = ((self.z_buffer[i] - z_min) / scale) * 255.0;
            self.depth_data[3 * i] = scaled_z as u8;
            self.depth_data[3 * i + 1] = scaled_z as u8;
            self.depth_data[3 * i + 2] = scaled_z as u8;
        }
        return &self.depth_data[..];
    }

    /// Sets all rendered pixels data to (0, 0, 0) and resets every depth to
    /// the maximally far sentinel.
    pub fn clear(&mut self) {
        let capacity = (self.width * self.height) as usize;
        for i in 0..capacity {
            self.z_buffer[i] = f32::MIN;
            self.render_data[3 * i] = 0;
            self.render_data[3 * i + 1] = 0;
            self.render_data[3 * i + 2] = 0;
        }
    }

    /// Color currently stored at a pixel, or None outside the canvas.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return None;
        }
        let index = (3 * (x + (self.height as i32 - 1 - y) * self.width as i32)) as usize;
        return Some(Color {
            r: self.render_data[index],
            g: self.render_data[index + 1],
            b: self.render_data[index + 2],
        });
    }

    /// Sets Scene pixel to a color at specifed coordinate.
    ///
    /// Assumes, that pixel data is rgb8. Forcing (0, 0) to be in the bottom
    /// left here by inverting y.
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let index = (3 * (x + (self.height as i32 - 1 - y) * self.width as i32)) as usize;
        self.render_data[index] = color.r;
        self.render_data[index + 1] = color.g;
        self.render_data[index + 2] = color.b;
    }

    /// Depth-tested pixel write, the primitive every draw call bottoms out
    /// in: the color lands only if z is in front of the stored depth, and
    /// then both buffers update together. Coordinates outside the canvas are
    /// ignored silently - the incremental algorithms wander off-canvas on
    /// axis-aligned edge cases and that must not fault.
    pub fn plot(&mut self, color: Color, x: i32, y: i32, z: f32) {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return;
        }
        let index = (x + y * self.width as i32) as usize;
        if z > self.z_buffer[index] {
            self.z_buffer[index] = z;
            self.set_pixel(x, y, color);
        }
    }

    /// Goes through the buffer 2 points at a time, drawing each stored line
    /// segment with the given color.
    pub fn draw_edges(&mut self, points: &PointBuffer, color: Color) {
        if points.used() < 2 {
            warn!("need at least 2 points to draw a line, have {}", points.used());
            return;
        }

        for segment in points.segments() {
            let start = from_hom_point(*segment.start);
            let end = from_hom_point(*segment.end);
            self.draw_line(
                start.x as i32,
                start.y as i32,
                start.z,
                end.x as i32,
                end.y as i32,
                end.z,
                color,
            );
        }
    }

    /// Goes through the buffer 3 points at a time, filling each front-facing
    /// triangle with one uniform color. Triangles whose face normal does not
    /// point towards the viewer are culled here, before the filler ever sees
    /// them.
    pub fn draw_polygons(&mut self, points: &PointBuffer, color: Color, step: f32) {
        if points.used() < 3 {
            warn!("need at least 3 points to draw a polygon, have {}", points.used());
            return;
        }

        for triangle in points.triangles() {
            if triangle.normal().z > 0.0 {
                self.fill_triangle(&triangle, color, step);
            }
        }
    }

    /// Same traversal as draw_polygons, but every front-facing triangle gets
    /// its own color from the flat illumination model.
    pub fn draw_polygons_flat(
        &mut self,
        points: &PointBuffer,
        lights: &[Light],
        ambient: Color,
        reflect: &Reflectance,
        step: f32,
    ) {
        if points.used() < 3 {
            warn!("need at least 3 points to draw a polygon, have {}", points.used());
            return;
        }

        for triangle in points.triangles() {
            if triangle.normal().z > 0.0 {
                let color = flat_color(&triangle, lights, ambient, reflect);
                self.fill_triangle(&triangle, color, step);
            }
        }
    }
}

use std::f32::consts::PI;

use nalgebra as na;
use na::{matrix, vector, Matrix4, Vector4};

use super::buffer::PointBuffer;

/// Number of parameter intervals a step size divides the domain into.
/// The step should evenly divide 1 within a small tolerance; anything else
/// silently rounds the tessellation resolution.
fn step_count(step: f32) -> usize {
    return (1.0 / step + 0.1) as usize;
}

/// Copies the grid points at the given indices into the target buffer as one
/// triangle surface.
fn add_grid_polygon(points: &mut PointBuffer, grid: &PointBuffer, i0: usize, i1: usize, i2: usize) {
    let p0 = grid.point(i0);
    let p1 = grid.point(i1);
    let p2 = grid.point(i2);
    points.add_polygon(p0.x, p0.y, p0.z, p1.x, p1.y, p1.z, p2.x, p2.y, p2.z);
}

/// Generates all the points along the surface of a sphere with center
/// (cx, cy, cz) and radius r, returning them as an owned grid buffer.
///
/// The grid is sampled over (rotation in [0, 1), circle in [0, 1]) in
/// spherical coordinates; every rotation column carries both poles, so a
/// column holds one point more than there are intervals.
pub fn generate_sphere(cx: f32, cy: f32, cz: f32, r: f32, step: f32) -> PointBuffer {
    let steps = step_count(step);
    let mut points = PointBuffer::new(steps * (steps + 1));

    for rotation in 0..steps {
        let rot = rotation as f32 / steps as f32;
        for circle in 0..=steps {
            let circ = circle as f32 / steps as f32;
            let x = r * (PI * circ).cos() + cx;
            let y = r * (PI * circ).sin() * (2.0 * PI * rot).cos() + cy;
            let z = r * (PI * circ).sin() * (2.0 * PI * rot).sin() + cz;
            points.add_point(x, y, z);
        }
    }

    return points;
}

/// Adds the triangle mesh of a sphere with center (cx, cy, cz) and radius r
/// to the buffer, connecting adjacent grid cells with wraparound in the
/// rotation axis. The intermediate grid from generate_sphere is dropped once
/// its triangles are extracted.
pub fn add_sphere(points: &mut PointBuffer, cx: f32, cy: f32, cz: f32, r: f32, step: f32) {
    let grid = generate_sphere(cx, cy, cz, r, step);
    let steps = step_count(step);
    let per_rotation = steps + 1;
    let total = steps * per_rotation;

    for lat in 0..steps {
        for longt in 0..steps {
            let p0 = lat * per_rotation + longt;
            let p1 = p0 + 1;
            let p2 = (p1 + per_rotation) % total;
            let p3 = (p0 + per_rotation) % total;

            // Each pole row collapses one cell edge to a point; the triangle
            // touching it with that edge would have zero area, so it is
            // skipped.
            if longt < steps - 1 {
                add_grid_polygon(points, &grid, p0, p1, p2);
            }
            if longt > 0 {
                add_grid_polygon(points, &grid, p0, p2, p3);
            }
        }
    }
}

/// Generates all the points along the surface of a torus with center
/// (cx, cy, cz), tube radius r1 and ring radius r2, returning them as an
/// owned grid buffer. Both parameters run over [0, 1), so the grid is
/// steps x steps with no singular rows.
pub fn generate_torus(cx: f32, cy: f32, cz: f32, r1: f32, r2: f32, step: f32) -> PointBuffer {
    let steps = step_count(step);
    let mut points = PointBuffer::new(steps * steps);

    for rotation in 0..steps {
        let rot = rotation as f32 / steps as f32;
        for circle in 0..steps {
            let circ = circle as f32 / steps as f32;
            let x = (2.0 * PI * rot).cos() * (r1 * (2.0 * PI * circ).cos() + r2) + cx;
            let y = r1 * (2.0 * PI * circ).sin() + cy;
            let z = -1.0 * (2.0 * PI * rot).sin() * (r1 * (2.0 * PI * circ).cos() + r2) + cz;
            points.add_point(x, y, z);
        }
    }

    return points;
}

/// Adds the triangle mesh of a torus to the buffer, two triangles per quad
/// cell, wrapping in both grid axes.
pub fn add_torus(points: &mut PointBuffer, cx: f32, cy: f32, cz: f32, r1: f32, r2: f32, step: f32) {
    let grid = generate_torus(cx, cy, cz, r1, r2, step);
    let steps = step_count(step);
    let total = steps * steps;

    for lat in 0..steps {
        for longt in 0..steps {
            let p0 = lat * steps + longt;
            let p1 = if longt == steps - 1 { p0 - longt } else { p0 + 1 };
            let p2 = (p0 + steps) % total;
            let p3 = (p1 + steps) % total;

            add_grid_polygon(points, &grid, p0, p2, p3);
            add_grid_polygon(points, &grid, p0, p3, p1);
        }
    }
}

/// Adds a closed polyline approximating the circle at (cx, cy, cz) with
/// radius r, one edge per parameter step.
pub fn add_circle(points: &mut PointBuffer, cx: f32, cy: f32, cz: f32, r: f32, step: f32) {
    let mut x0 = r + cx;
    let mut y0 = cy;

    let mut t = step;
    while t <= 1.00001 {
        let x1 = r * (2.0 * PI * t).cos() + cx;
        let y1 = r * (2.0 * PI * t).sin() + cy;
        points.add_edge(x0, y0, cz, x1, y1, cz);
        x0 = x1;
        y0 = y1;
        t += step;
    }
}

/// Cubic curve families the curve generator knows how to sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveType {
    /// Controls are the two endpoints followed by the two endpoint rates.
    Hermite,
    /// Controls are the four Bezier control points.
    Bezier,
}

/// Cubic coefficients along one axis: the family's basis matrix applied to
/// the four control values. The sampler in add_curve only evaluates the
/// resulting polynomial.
fn curve_coefs(p0: f32, p1: f32, p2: f32, p3: f32, curve_type: CurveType) -> Vector4<f32> {
    let basis: Matrix4<f32> = match curve_type {
        CurveType::Hermite => matrix![ 2.0, -2.0,  1.0,  1.0;
                                      -3.0,  3.0, -2.0, -1.0;
                                       0.0,  0.0,  1.0,  0.0;
                                       1.0,  0.0,  0.0,  0.0],
        CurveType::Bezier => matrix![-1.0,  3.0, -3.0,  1.0;
                                      3.0, -6.0,  3.0,  0.0;
                                     -3.0,  3.0,  0.0,  0.0;
                                      1.0,  0.0,  0.0,  0.0],
    };
    return basis * vector![p0, p1, p2, p3];
}

/// Adds the cubic curve defined by 4 control values per axis to the buffer,
/// one line segment per parameter step. The curve starts at (x0, y0) and is
/// sampled in the z = 0 plane.
pub fn add_curve(
    points: &mut PointBuffer,
    x0: f32, y0: f32,
    x1: f32, y1: f32,
    x2: f32, y2: f32,
    x3: f32, y3: f32,
    step: f32,
    curve_type: CurveType,
) {
    let xcoefs = curve_coefs(x0, x1, x2, x3, curve_type);
    let ycoefs = curve_coefs(y0, y1, y2, y3, curve_type);

    let mut x_prev = x0;
    let mut y_prev = y0;

    let mut t = step;
    while t <= 1.000001 {
        let x = xcoefs.x * t * t * t + xcoefs.y * t * t + xcoefs.z * t + xcoefs.w;
        let y = ycoefs.x * t * t * t + ycoefs.y * t * t + ycoefs.z * t + ycoefs.w;
        points.add_edge(x_prev, y_prev, 0.0, x, y, 0.0);
        x_prev = x;
        y_prev = y;
        t += step;
    }
}

/// Adds the 12 triangles of a rectangular box whose upper-left-front corner
/// is (x, y, z) with the given width, height and depth.
pub fn add_box(points: &mut PointBuffer, x: f32, y: f32, z: f32, width: f32, height: f32, depth: f32) {
    let x1 = x + width;
    let y1 = y - height;
    let z1 = z - depth;

    // front
    points.add_polygon(x, y, z, x1, y1, z, x1, y, z);
    points.add_polygon(x, y, z, x, y1, z, x1, y1, z);
    // back
    points.add_polygon(x1, y, z1, x, y1, z1, x, y, z1);
    points.add_polygon(x1, y, z1, x1, y1, z1, x, y1, z1);
    // right side
    points.add_polygon(x1, y, z, x1, y1, z1, x1, y, z1);
    points.add_polygon(x1, y, z, x1, y1, z, x1, y1, z1);
    // left side
    points.add_polygon(x, y, z1, x, y1, z, x, y, z);
    points.add_polygon(x, y, z1, x, y1, z1, x, y1, z);
    // top
    points.add_polygon(x, y, z1, x1, y, z, x1, y, z1);
    points.add_polygon(x, y, z1, x, y, z, x1, y, z);
    // bottom
    points.add_polygon(x, y1, z, x1, y1, z1, x1, y1, z);
    points.add_polygon(x, y1, z, x, y1, z1, x1, y1, z1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_count_rounds_near_divisors() {
        assert_eq!(step_count(0.25), 4);
        assert_eq!(step_count(0.1), 10);
        // 1/0.33 = 3.03..., silently rounds down to 3 intervals.
        assert_eq!(step_count(0.33), 3);
    }

    #[test]
    fn sphere_grid_points_sit_on_the_surface() {
        let grid = generate_sphere(3.0, -2.0, 7.0, 10.0, 0.25);
        assert_eq!(grid.used(), 4 * 5);
        for i in 0..grid.used() {
            let p = grid.point(i);
            let distance = ((p.x - 3.0).powi(2) + (p.y + 2.0).powi(2) + (p.z - 7.0).powi(2)).sqrt();
            assert!((distance - 10.0).abs() < 1e-3, "point {i} off the sphere");
        }
    }

    #[test]
    fn sphere_mesh_is_closed_and_three_aligned() {
        let mut points = PointBuffer::new(10);
        add_sphere(&mut points, 0.0, 0.0, 0.0, 10.0, 0.25);
        // steps * (steps - 1) * 2 triangles: a full band per rotation minus
        // the skipped pole cells.
        assert_eq!(points.used(), 4 * 3 * 2 * 3);
        assert_eq!(points.used() % 3, 0);
        // Every emitted vertex came from the grid, so it sits on the sphere.
        for i in 0..points.used() {
            let p = points.point(i);
            let distance = (p.x * p.x + p.y * p.y + p.z * p.z).sqrt();
            assert!((distance - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn torus_mesh_is_closed_and_on_the_surface() {
        let mut points = PointBuffer::new(10);
        add_torus(&mut points, 0.0, 0.0, 0.0, 2.0, 6.0, 0.25);
        // Two triangles per quad cell, wrapping in both axes.
        assert_eq!(points.used(), 4 * 4 * 2 * 3);
        for i in 0..points.used() {
            let p = points.point(i);
            let ring = (p.x * p.x + p.z * p.z).sqrt() - 6.0;
            let tube = (ring * ring + p.y * p.y).sqrt();
            assert!((tube - 2.0).abs() < 1e-3, "point {i} off the torus");
        }
    }

    #[test]
    fn circle_polyline_closes_on_its_starting_point() {
        let mut points = PointBuffer::new(10);
        add_circle(&mut points, 5.0, 5.0, 0.0, 3.0, 0.25);
        assert_eq!(points.used(), 8);
        let first = points.point(0);
        let last = points.point(points.used() - 1);
        assert!((first.x - last.x).abs() < 1e-4);
        assert!((first.y - last.y).abs() < 1e-4);
        assert_eq!(first.x, 8.0);
        assert_eq!(first.y, 5.0);
    }

    #[test]
    fn bezier_curve_ends_on_the_last_control_point() {
        let mut points = PointBuffer::new(10);
        add_curve(&mut points, 0.0, 0.0, 10.0, 20.0, 30.0, 20.0, 40.0, 0.0, 0.25, CurveType::Bezier);
        assert_eq!(points.used(), 8);
        let last = points.point(points.used() - 1);
        assert!((last.x - 40.0).abs() < 1e-3);
        assert!(last.y.abs() < 1e-3);
    }

    #[test]
    fn hermite_curve_spans_its_endpoints() {
        // Controls: endpoints (0, 0) and (20, 10), then the two rates.
        let mut points = PointBuffer::new(10);
        add_curve(&mut points, 0.0, 0.0, 20.0, 10.0, 5.0, 0.0, 5.0, 0.0, 0.5, CurveType::Hermite);
        assert_eq!(points.used(), 4);
        let first = points.point(0);
        let last = points.point(points.used() - 1);
        assert_eq!(first.x, 0.0);
        assert!((last.x - 20.0).abs() < 1e-3);
        assert!((last.y - 10.0).abs() < 1e-3);
    }

    #[test]
    fn box_emits_twelve_triangles() {
        let mut points = PointBuffer::new(10);
        add_box(&mut points, 0.0, 10.0, 0.0, 4.0, 5.0, 6.0);
        assert_eq!(points.used(), 12 * 3);
    }
}

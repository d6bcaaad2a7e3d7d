use nalgebra as na;
use na::Vector3;

use super::buffer::Triangle;
use super::light::Color;
use super::Scene;

/// Sorts vertices ascending by their y coordinate. Bounded bubble passes
/// with an early exit once a full pass performs zero swaps; ties keep their
/// buffer order.
fn sort_points_y(vertices: &mut [Vector3<f32>; 3]) {
    for _ in 0..vertices.len() {
        let mut swap_count = 0;
        for j in 0..vertices.len() - 1 {
            if vertices[j].y > vertices[j + 1].y {
                vertices.swap(j, j + 1);
                swap_count += 1;
            }
        }
        if swap_count == 0 {
            break;
        }
    }
}

impl Scene {
    /// Fills the projected interior of a triangle with one color by
    /// decomposing it into horizontal spans, each drawn through draw_line so
    /// the depth buffer is honored per pixel.
    ///
    /// Vertices are sorted into bottom B, middle M and top T. The left
    /// endpoint of every span interpolates along B->T; the right endpoint
    /// interpolates along B->M below M, along M->T above it, and pins
    /// exactly to M on M's own scanline, which also keeps every denominator
    /// away from zero when two vertices share a row.
    ///
    /// Back-face culling is the caller's job - this fills whatever it gets.
    pub fn fill_triangle(&mut self, triangle: &Triangle<'_>, color: Color, step: f32) {
        let mut vertices = triangle.vertices();
        sort_points_y(&mut vertices);
        let b = vertices[0];
        let m = vertices[1];
        let t = vertices[2];

        // A zero-height triangle has no interior, and B->T would divide by
        // zero below.
        if t.y == b.y {
            return;
        }

        let mut y = b.y;
        while y <= t.y {
            let left_x = b.x + (t.x - b.x) * (y - b.y) / (t.y - b.y);
            let left_z = b.z + (t.z - b.z) * (y - b.y) / (t.y - b.y);

            let (right_x, right_z) = if y < m.y {
                (
                    b.x + (m.x - b.x) * (y - b.y) / (m.y - b.y),
                    b.z + (m.z - b.z) * (y - b.y) / (m.y - b.y),
                )
            } else if y > m.y {
                (
                    m.x + (t.x - m.x) * (y - m.y) / (t.y - m.y),
                    m.z + (t.z - m.z) * (y - m.y) / (t.y - m.y),
                )
            } else {
                (m.x, m.z)
            };

            self.draw_line(
                left_x as i32,
                y as i32,
                left_z,
                right_x as i32,
                y as i32,
                right_z,
                color,
            );
            y += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::buffer::PointBuffer;
    use super::super::light::Color;
    use super::super::Scene;
    use super::sort_points_y;

    use nalgebra as na;
    use na::vector;

    const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    fn span_at(scene: &Scene, y: i32) -> Vec<i32> {
        return (0..scene.width as i32)
            .filter(|&x| scene.pixel(x, y) != Some(BLACK))
            .collect();
    }

    fn single_triangle(coords: [f32; 9]) -> PointBuffer {
        let mut points = PointBuffer::new(3);
        points.add_polygon(
            coords[0], coords[1], coords[2],
            coords[3], coords[4], coords[5],
            coords[6], coords[7], coords[8],
        );
        return points;
    }

    #[test]
    fn sort_orders_ascending_and_keeps_tied_rows_stable() {
        let mut vertices = [
            vector![5.0, 10.0, 0.0],
            vector![0.0, 0.0, 0.0],
            vector![10.0, 0.0, 0.0],
        ];
        sort_points_y(&mut vertices);
        assert_eq!(vertices[0], vector![0.0, 0.0, 0.0]);
        assert_eq!(vertices[1], vector![10.0, 0.0, 0.0]);
        assert_eq!(vertices[2], vector![5.0, 10.0, 0.0]);
    }

    #[test]
    fn filler_covers_the_base_and_the_apex() {
        let points = single_triangle([0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 5.0, 10.0, 0.0]);
        let triangle = points.triangles().next().unwrap();
        let mut scene = Scene::new(20, 20);
        scene.fill_triangle(&triangle, WHITE, 1.0);

        // The base spans x = 0..=10, the apex row holds the single apex pixel.
        assert_eq!(span_at(&scene, 0), (0..=10).collect::<Vec<i32>>());
        assert_eq!(span_at(&scene, 10), vec![5]);
    }

    #[test]
    fn every_scanline_between_bottom_and_top_is_covered() {
        let points = single_triangle([2.0, 1.0, 0.0, 17.0, 6.0, 0.0, 9.0, 15.0, 0.0]);
        let triangle = points.triangles().next().unwrap();
        let mut scene = Scene::new(20, 20);
        scene.fill_triangle(&triangle, WHITE, 1.0);

        for y in 1..=15 {
            assert!(!span_at(&scene, y).is_empty(), "gap at scanline {y}");
        }
    }

    #[test]
    fn zero_height_triangle_is_skipped() {
        let points = single_triangle([0.0, 5.0, 0.0, 10.0, 5.0, 0.0, 20.0, 5.0, 0.0]);
        let triangle = points.triangles().next().unwrap();
        let mut scene = Scene::new(30, 30);
        scene.fill_triangle(&triangle, WHITE, 1.0);
        for y in 0..30 {
            assert!(span_at(&scene, y).is_empty());
        }
    }

    #[test]
    fn nearer_triangle_overwrites_and_farther_redraw_changes_nothing() {
        let red = Color { r: 255, g: 0, b: 0 };
        let blue = Color { r: 0, g: 0, b: 255 };
        let far = single_triangle([0.0, 0.0, 1.0, 10.0, 0.0, 1.0, 5.0, 10.0, 1.0]);
        let near = single_triangle([0.0, 0.0, 8.0, 10.0, 0.0, 8.0, 5.0, 10.0, 8.0]);

        let mut scene = Scene::new(20, 20);
        scene.fill_triangle(&far.triangles().next().unwrap(), red, 1.0);
        scene.fill_triangle(&near.triangles().next().unwrap(), blue, 1.0);
        assert_eq!(scene.pixel(5, 4), Some(blue));

        // Same footprint from farther away loses every depth test.
        scene.fill_triangle(&far.triangles().next().unwrap(), red, 1.0);
        assert_eq!(scene.pixel(5, 4), Some(blue));
        assert_eq!(span_at(&scene, 0), (0..=10).collect::<Vec<i32>>());
    }
}

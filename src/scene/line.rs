use super::light::Color;
use super::Scene;

impl Scene {
    /// Draws every pixel on the discrete line between (x0, y0) and (x1, y1)
    /// via the 8-octant incremental midpoint algorithm, interpolating depth
    /// along the way. Each pixel goes through the plot depth test, so the
    /// line respects anything already drawn in front of it.
    ///
    /// Both endpoints are always included; identical endpoints plot exactly
    /// one pixel.
    pub fn draw_line(&mut self, x0: i32, y0: i32, z0: f32, x1: i32, y1: i32, z1: f32, color: Color) {
        // Swap endpoints if going right -> left, so iteration always walks
        // left -> right in x.
        let (x0, y0, z0, x1, y1, z1) = if x0 > x1 {
            (x1, y1, z1, x0, y0, z0)
        } else {
            (x0, y0, z0, x1, y1, z1)
        };

        let mut x = x0;
        let mut y = y0;
        let mut z = z0;
        // Depth advances per x-step taken, not per iteration. A vertical
        // segment takes no x-steps, so its slope never gets used - but the
        // division still has to be guarded.
        let dz = if x1 == x0 {
            0.0
        } else {
            (z1 - z0) / (x1 - x0) as f32
        };

        let a = 2 * (y1 - y0);
        let b = -2 * (x1 - x0);

        let loop_start: i32;
        let loop_end: i32;
        let dx_east: i32;
        let dy_east: i32;
        let d_east: i32;
        let dy_northeast: i32;
        let d_northeast: i32;
        let mut d: i32;
        let dx_northeast: i32 = 1;

        let wide = (x1 - x0).abs() >= (y1 - y0).abs();
        if wide {
            // Octants 1 and 8: unit steps in x.
            loop_start = x;
            loop_end = x1;
            dx_east = 1;
            dy_east = 0;
            d_east = a;
            if a > 0 {
                // octant 1
                d = a + b / 2;
                dy_northeast = 1;
                d_northeast = a + b;
            } else {
                // octant 8
                d = a - b / 2;
                dy_northeast = -1;
                d_northeast = a - b;
            }
        } else {
            // Octants 2 and 7: unit steps in y, from the smaller-y endpoint
            // to the larger.
            dx_east = 0;
            if a > 0 {
                // octant 2
                d = a / 2 + b;
                dy_east = 1;
                dy_northeast = 1;
                d_northeast = a + b;
                d_east = b;
                loop_start = y;
                loop_end = y1;
            } else {
                // octant 7
                d = a / 2 - b;
                dy_east = -1;
                dy_northeast = -1;
                d_northeast = a - b;
                d_east = -b;
                loop_start = y1;
                loop_end = y;
            }
        }

        let mut i = loop_start;
        while i < loop_end {
            self.plot(color, x, y, z);
            if (wide && ((a > 0 && d > 0) || (a < 0 && d < 0)))
                || (!wide && ((a > 0 && d < 0) || (a < 0 && d > 0)))
            {
                x += dx_northeast;
                y += dy_northeast;
                d += d_northeast;
                z += dz * dx_northeast as f32;
            } else {
                x += dx_east;
                y += dy_east;
                d += d_east;
                z += dz * dx_east as f32;
            }
            i += 1;
        }
        // The loop bound cuts iteration one pixel short, so the second
        // endpoint is plotted explicitly.
        self.plot(color, x1, y1, z);
    }
}

#[cfg(test)]
mod tests {
    use super::super::light::Color;
    use super::super::Scene;

    const WHITE: Color = Color { r: 255, g: 255, b: 255 };

    fn lit_pixels(scene: &Scene) -> Vec<(i32, i32)> {
        let mut lit = Vec::new();
        for y in 0..scene.height as i32 {
            for x in 0..scene.width as i32 {
                if scene.pixel(x, y) != Some(Color { r: 0, g: 0, b: 0 }) {
                    lit.push((x, y));
                }
            }
        }
        return lit;
    }

    #[test]
    fn both_endpoints_are_plotted() {
        let endpoint_pairs = [
            ((1, 1), (17, 5)),   // octant 1
            ((1, 5), (17, 1)),   // octant 8
            ((3, 1), (7, 18)),   // octant 2
            ((3, 18), (7, 1)),   // octant 7
            ((2, 9), (15, 9)),   // horizontal
            ((9, 2), (9, 15)),   // vertical
        ];
        for ((x0, y0), (x1, y1)) in endpoint_pairs {
            let mut scene = Scene::new(20, 20);
            scene.draw_line(x0, y0, 0.0, x1, y1, 0.0, WHITE);
            let lit = lit_pixels(&scene);
            assert!(lit.contains(&(x0, y0)), "missing start of ({x0},{y0})->({x1},{y1})");
            assert!(lit.contains(&(x1, y1)), "missing end of ({x0},{y0})->({x1},{y1})");
        }
    }

    #[test]
    fn identical_endpoints_plot_one_pixel() {
        let mut scene = Scene::new(20, 20);
        scene.draw_line(7, 7, 0.0, 7, 7, 0.0, WHITE);
        assert_eq!(lit_pixels(&scene), vec![(7, 7)]);
    }

    #[test]
    fn reversed_endpoints_plot_the_same_pixels() {
        let endpoint_pairs = [
            ((0, 0), (19, 7)),
            ((0, 7), (19, 0)),
            ((4, 0), (11, 19)),
            ((2, 2), (2, 17)),
            ((2, 5), (18, 5)),
            ((0, 0), (19, 19)),
        ];
        for ((x0, y0), (x1, y1)) in endpoint_pairs {
            let mut forward = Scene::new(20, 20);
            forward.draw_line(x0, y0, 0.0, x1, y1, 0.0, WHITE);
            let mut backward = Scene::new(20, 20);
            backward.draw_line(x1, y1, 0.0, x0, y0, 0.0, WHITE);
            assert_eq!(
                lit_pixels(&forward),
                lit_pixels(&backward),
                "asymmetry for ({x0},{y0})<->({x1},{y1})"
            );
        }
    }

    #[test]
    fn off_canvas_pixels_are_dropped_silently() {
        let mut scene = Scene::new(10, 10);
        scene.draw_line(-5, -5, 0.0, 14, 14, 0.0, WHITE);
        // Only the on-canvas diagonal remains.
        assert_eq!(lit_pixels(&scene).len(), 10);
    }

    #[test]
    fn nearer_line_wins_the_depth_test() {
        let mut scene = Scene::new(10, 10);
        let red = Color { r: 255, g: 0, b: 0 };
        let blue = Color { r: 0, g: 0, b: 255 };
        scene.draw_line(0, 5, 10.0, 9, 5, 10.0, red);
        scene.draw_line(0, 5, 1.0, 9, 5, 1.0, blue);
        assert_eq!(scene.pixel(4, 5), Some(red));
    }
}

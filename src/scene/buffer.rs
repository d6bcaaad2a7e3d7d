use std::cell::OnceCell;

use nalgebra as na;
use na::{vector, Vector3, Vector4};

use super::util::{from_hom_point, to_hom_point};

/// How many point slots a full buffer gains on append.
const GROWTH_CHUNK: usize = 100;

/// Ordered, growable sequence of homogenous points, the shared input of every
/// draw operation. Consumers read consecutive runs of 3 points as one triangle
/// and runs of 2 points as one line segment, so point order is load-bearing.
///
/// The buffer tracks a used count separate from its allocated capacity and
/// never shrinks; indices below the used count stay valid across growth for
/// the whole render pass.
pub struct PointBuffer {
    data: Vec<Vector4<f32>>,
    used: usize,
}

impl PointBuffer {
    pub fn new(capacity: usize) -> PointBuffer {
        return PointBuffer {
            data: vec![Vector4::zeros(); capacity],
            used: 0,
        };
    }

    /// Number of points stored so far.
    pub fn used(&self) -> usize {
        return self.used;
    }

    pub fn capacity(&self) -> usize {
        return self.data.len();
    }

    /// Grows the allocation to hold at least new_capacity points. Growing
    /// preserves every stored point; a request below the current capacity
    /// does nothing.
    pub fn grow(&mut self, new_capacity: usize) {
        if new_capacity > self.data.len() {
            self.data.resize(new_capacity, Vector4::zeros());
        }
    }

    /// Point at index, with the homogenous w stripped off.
    pub fn point(&self, index: usize) -> Vector3<f32> {
        return from_hom_point(self.data[index]);
    }

    /// Appends the point (x, y, z, 1) at the logical end, growing the
    /// allocation first if it is exhausted.
    pub fn add_point(&mut self, x: f32, y: f32, z: f32) {
        if self.used == self.data.len() {
            self.grow(self.used + GROWTH_CHUNK);
        }
        self.data[self.used] = to_hom_point(vector![x, y, z]);
        self.used += 1;
    }

    /// Appends the line segment (x0, y0, z0) -> (x1, y1, z1).
    pub fn add_edge(&mut self, x0: f32, y0: f32, z0: f32, x1: f32, y1: f32, z1: f32) {
        self.add_point(x0, y0, z0);
        self.add_point(x1, y1, z1);
    }

    /// Appends the three vertices of a single triangle surface.
    pub fn add_polygon(
        &mut self,
        x0: f32, y0: f32, z0: f32,
        x1: f32, y1: f32, z1: f32,
        x2: f32, y2: f32, z2: f32,
    ) {
        self.add_point(x0, y0, z0);
        self.add_point(x1, y1, z1);
        self.add_point(x2, y2, z2);
    }

    /// Iterator over stored triangles, 3 consecutive points each.
    /// A trailing run of fewer than 3 points yields nothing.
    pub fn triangles(&self) -> Triangles<'_> {
        return Triangles {
            points: self,
            index: 0,
        };
    }

    /// Iterator over stored line segments, 2 consecutive points each.
    pub fn segments(&self) -> Segments<'_> {
        return Segments {
            points: self,
            index: 0,
        };
    }
}

/// View of one triangle in a PointBuffer: three borrowed vertices plus the
/// derived face normal, computed on first access and cached.
pub struct Triangle<'a> {
    pub a: &'a Vector4<f32>,
    pub b: &'a Vector4<f32>,
    pub c: &'a Vector4<f32>,
    normal: OnceCell<Vector3<f32>>,
}

impl<'a> Triangle<'a> {
    fn new(a: &'a Vector4<f32>, b: &'a Vector4<f32>, c: &'a Vector4<f32>) -> Triangle<'a> {
        return Triangle {
            a,
            b,
            c,
            normal: OnceCell::new(),
        };
    }

    pub fn vertices(&self) -> [Vector3<f32>; 3] {
        return [
            from_hom_point(*self.a),
            from_hom_point(*self.b),
            from_hom_point(*self.c),
        ];
    }

    /// Face normal (b - a) x (c - a), not normalized. Only its direction and
    /// magnitude carry meaning; a zero vector marks a degenerate triangle.
    pub fn normal(&self) -> Vector3<f32> {
        return *self.normal.get_or_init(|| {
            let u = from_hom_point(*self.b) - from_hom_point(*self.a);
            let v = from_hom_point(*self.c) - from_hom_point(*self.a);
            u.cross(&v)
        });
    }

    /// Mean of the three vertices.
    pub fn centroid(&self) -> Vector3<f32> {
        let [a, b, c] = self.vertices();
        return (a + b + c) / 3.0;
    }
}

/// View of one line segment in a PointBuffer.
pub struct Segment<'a> {
    pub start: &'a Vector4<f32>,
    pub end: &'a Vector4<f32>,
}

pub struct Triangles<'a> {
    points: &'a PointBuffer,
    index: usize,
}

impl<'a> Iterator for Triangles<'a> {
    type Item = Triangle<'a>;

    fn next(&mut self) -> Option<Triangle<'a>> {
        if self.index + 3 > self.points.used {
            return None;
        }
        let triangle = Triangle::new(
            &self.points.data[self.index],
            &self.points.data[self.index + 1],
            &self.points.data[self.index + 2],
        );
        self.index += 3;
        return Some(triangle);
    }
}

pub struct Segments<'a> {
    points: &'a PointBuffer,
    index: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        if self.index + 2 > self.points.used {
            return None;
        }
        let segment = Segment {
            start: &self.points.data[self.index],
            end: &self.points.data[self.index + 1],
        };
        self.index += 2;
        return Some(segment);
    }
}

use nalgebra as na;
use na::Vector3;

use super::buffer::Triangle;

/// Struct, representing raw rgb8 pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Builds a color from accumulated channel sums, clamping each channel
    /// into range once, after all additive contributions.
    pub fn from_channels(r: f32, g: f32, b: f32) -> Color {
        return Color {
            r: set_in_range(r as i32) as u8,
            g: set_in_range(g as i32) as u8,
            b: set_in_range(b as i32) as u8,
        };
    }
}

/// Clamps an accumulated channel value into the displayable [0, 255] range.
/// Values above saturate to 255, values below to 0.
pub fn set_in_range(value: i32) -> i32 {
    if value > 255 {
        return 255;
    }
    if value < 0 {
        return 0;
    }
    return value;
}

/// Point light source: a color and a position in scene space. Any number may
/// exist at once; their contributions are additive and commute.
pub struct Light {
    pub color: Color,
    pub position: Vector3<f32>,
}

/// Reflectance coefficients of the rendered surface, one triple per term
/// with the channels ordered red, green, blue. Constant for a render pass.
pub struct Reflectance {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

/// Computes the single flat-shading color of a triangle: the ambient term
/// plus diffuse and specular contributions from every light source that
/// actually illuminates the face.
///
/// A source behind the face (cosine <= 0) is skipped outright - no diffuse,
/// and no reflection vector to build a specular term from. A reflection
/// pointing away from the viewer (negative z) skips only the specular term.
/// Channels accumulate unclamped and are clamped once at the end.
///
/// The triangle must have a nonzero face normal; callers cull degenerate
/// faces before shading.
pub fn flat_color(
    triangle: &Triangle<'_>,
    lights: &[Light],
    ambient: Color,
    reflect: &Reflectance,
) -> Color {
    let normal = triangle.normal().normalize();
    let centroid = triangle.centroid();

    let mut r = ambient.r as f32 * reflect.ambient.x;
    let mut g = ambient.g as f32 * reflect.ambient.y;
    let mut b = ambient.b as f32 * reflect.ambient.z;

    for light in lights {
        let mut to_light = light.position - centroid;
        let magnitude = to_light.norm();
        if magnitude == 0.0 {
            // The source sits exactly on the face.
            continue;
        }
        to_light /= magnitude;

        let cos = to_light.dot(&normal);
        if cos <= 0.0 {
            // The face points away from this source.
            continue;
        }
        r += light.color.r as f32 * reflect.diffuse.x * cos;
        g += light.color.g as f32 * reflect.diffuse.y * cos;
        b += light.color.b as f32 * reflect.diffuse.z * cos;

        // Path the light takes after bouncing off the face, reflected about
        // the normal: R = 2(N.L)N - L.
        let reflected = (2.0 * cos * normal - to_light).normalize();
        if reflected.z < 0.0 {
            // Reflection points away from the viewer.
            continue;
        }
        r += light.color.r as f32 * reflect.specular.x * reflected.z;
        g += light.color.g as f32 * reflect.specular.y * reflected.z;
        b += light.color.b as f32 * reflect.specular.z * reflected.z;
    }

    return Color::from_channels(r, g, b);
}

use std::fs::File;
use std::io::BufReader;
use std::time;

use log::info;
use nalgebra as na;
use na::vector;
use obj::{load_obj, Obj};
use show_image::{create_window, event, ImageInfo, ImageView, WindowOptions};

use crate::scene::{
    add_box, add_circle, add_curve, add_sphere, add_torus, CurveType, Color, Light, PointBuffer,
    Reflectance, Scene,
};

const WHITE: Color = Color { r: 255, g: 255, b: 255 };
const CYAN: Color = Color { r: 0, g: 255, b: 255 };
const AMBIENT: Color = Color { r: 50, g: 50, b: 50 };

pub struct Params {
    pub width: u32,
    pub height: u32,
    pub scene_name: String,
    pub model_path: String,
    pub output_path: Option<String>,
    pub show_depth: bool,
    pub print_fps: bool,
}

/// Geometry of one demo scene: triangles to fill and edges to stroke.
struct Geometry {
    polygons: PointBuffer,
    edges: PointBuffer,
    // The box demo is drawn with one uniform color instead of the
    // illumination model, to keep a wireframe-era code path exercised.
    uniform_color: Option<Color>,
}

/// Helper, defining exit event to be an Escape key press.
fn is_exit_event(window_event: event::WindowEvent) -> bool {
    if let event::WindowEvent::KeyboardInput(event) = window_event {
        if event.input.key_code == Some(event::VirtualKeyCode::Escape)
            && event.input.state.is_released()
        {
            return true;
        }
    }

    return false;
}

/// Builds the point buffers for the named demo scene.
fn build_geometry(params: &Params) -> Result<Geometry, Box<dyn std::error::Error>> {
    let w = params.width as f32;
    let h = params.height as f32;
    let mut polygons = PointBuffer::new(100);
    let mut edges = PointBuffer::new(100);
    let mut uniform_color = None;

    match params.scene_name.as_str() {
        "sphere" => {
            add_sphere(&mut polygons, w / 2.0, h / 2.0, 0.0, 0.35 * w.min(h), 0.02);
        }
        "torus" => {
            add_torus(&mut polygons, w / 2.0, h / 2.0, 0.0, 0.1 * w.min(h), 0.3 * w.min(h), 0.02);
        }
        "box" => {
            add_box(&mut polygons, 0.2 * w, 0.8 * h, 0.0, 0.6 * w, 0.6 * h, 0.3 * w.min(h));
            uniform_color = Some(CYAN);
        }
        "curves" => {
            add_circle(&mut edges, w / 2.0, h / 2.0, 0.0, 0.4 * w.min(h), 0.01);
            add_curve(
                &mut edges,
                0.1 * w, 0.1 * h,
                0.9 * w, 0.1 * h,
                0.0, 3.0 * h,
                0.0, -3.0 * h,
                0.01,
                CurveType::Hermite,
            );
            add_curve(
                &mut edges,
                0.1 * w, 0.9 * h,
                0.35 * w, 0.2 * h,
                0.65 * w, 0.2 * h,
                0.9 * w, 0.9 * h,
                0.01,
                CurveType::Bezier,
            );
        }
        "mesh" => {
            load_model(&mut polygons, params)?;
        }
        name => {
            return Err(format!("unknown scene \"{name}\"").into());
        }
    }

    return Ok(Geometry {
        polygons,
        edges,
        uniform_color,
    });
}

/// Loads an OBJ model and appends its triangles to the polygon buffer,
/// scaled from model space in [-1, 1] onto the canvas.
fn load_model(polygons: &mut PointBuffer, params: &Params) -> Result<(), Box<dyn std::error::Error>> {
    let model: Obj = load_obj(BufReader::new(File::open(&params.model_path)?))?;
    info!("number of vertices - {}", model.vertices.len());
    info!("number of indices  - {}", model.indices.len());

    let scale = 0.4 * params.width.min(params.height) as f32;
    let center_x = params.width as f32 / 2.0;
    let center_y = params.height as f32 / 2.0;

    for i in 0..model.indices.len() / 3 {
        let mut canvas_points = [vector![0.0_f32, 0.0, 0.0]; 3];
        for (j, canvas_point) in canvas_points.iter_mut().enumerate() {
            let index = *model.indices.get(3 * i + j).unwrap() as usize;
            let position = model.vertices.get(index).unwrap().position;
            *canvas_point = vector![
                position[0] * scale + center_x,
                position[1] * scale + center_y,
                position[2] * scale
            ];
        }
        polygons.add_polygon(
            canvas_points[0].x, canvas_points[0].y, canvas_points[0].z,
            canvas_points[1].x, canvas_points[1].y, canvas_points[1].z,
            canvas_points[2].x, canvas_points[2].y, canvas_points[2].z,
        );
    }

    return Ok(());
}

/// One full render pass over the prepared geometry.
fn render(scene: &mut Scene, geometry: &Geometry, lights: &[Light], reflect: &Reflectance) {
    scene.clear();
    if geometry.polygons.used() > 0 {
        match geometry.uniform_color {
            Some(color) => scene.draw_polygons(&geometry.polygons, color, 1.0),
            None => scene.draw_polygons_flat(&geometry.polygons, lights, AMBIENT, reflect, 1.0),
        }
    }
    if geometry.edges.used() > 0 {
        scene.draw_edges(&geometry.edges, WHITE);
    }
}

/// Actualy launches the window, showing the rendered scene.
/// Takes struct, defining execution context.
pub fn run(params: Params) -> Result<(), Box<dyn std::error::Error>> {
    let mut scene = Scene::new(params.width, params.height);
    let geometry = build_geometry(&params)?;
    info!(
        "scene \"{}\": {} polygon points, {} edge points",
        params.scene_name,
        geometry.polygons.used(),
        geometry.edges.used()
    );

    // One warm light from the upper right, one cool fill from the left.
    let lights = [
        Light {
            color: Color { r: 255, g: 220, b: 180 },
            position: vector![params.width as f32, params.height as f32, 600.0],
        },
        Light {
            color: Color { r: 60, g: 80, b: 130 },
            position: vector![-200.0, params.height as f32 / 2.0, 400.0],
        },
    ];
    let reflect = Reflectance {
        ambient: vector![0.4, 0.4, 0.4],
        diffuse: vector![0.6, 0.6, 0.6],
        specular: vector![0.5, 0.5, 0.5],
    };

    // Headless path: render once, write the image, skip the window.
    if let Some(path) = &params.output_path {
        render(&mut scene, &geometry, &lights, &reflect);
        let data = if params.show_depth {
            scene.as_depth_data().to_vec()
        } else {
            scene.as_render_data().to_vec()
        };
        let png = image::RgbImage::from_raw(params.width, params.height, data)
            .ok_or("render data does not fill the image")?;
        png.save(path)?;
        info!("wrote {path}");
        return Ok(());
    }

    let window_options: WindowOptions = WindowOptions {
        size: Some([params.width, params.height]),
        ..Default::default()
    };
    let window = create_window("output", window_options)?;
    let event_channel = window.event_channel()?;

    let mut exit = false;
    let mut frame_counter_time_begin = time::Instant::now();
    let mut frame_counter: u32 = 0;
    while !exit {
        render(&mut scene, &geometry, &lights, &reflect);

        let image_data = if params.show_depth {
            ImageView::new(
                ImageInfo::rgb8(params.width, params.height),
                scene.as_depth_data(),
            )
        } else {
            ImageView::new(
                ImageInfo::rgb8(params.width, params.height),
                scene.as_render_data(),
            )
        };
        window.set_image("image", image_data)?;

        // Unloading all the garbage from event channel, that has piled up, looking for exit event.
        let exit_poll_result = event_channel
            .try_iter()
            .map(is_exit_event)
            .reduce(|was_exit_event, is_exit_event| was_exit_event || is_exit_event);

        // If any event is Escape key press, then exiting.
        exit = exit_poll_result.unwrap_or(false);

        if params.print_fps {
            // Counting frames to printout stats every second.
            frame_counter += 1;
            if time::Instant::now()
                .duration_since(frame_counter_time_begin)
                .as_secs_f32()
                > 1.0
            {
                println!("FPS --- {}", frame_counter);
                frame_counter_time_begin = time::Instant::now();
                frame_counter = 0;
            }
        }
    }

    return Ok(());
}

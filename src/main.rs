mod app;
mod scene;

use std::env;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 800;

#[show_image::main]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Default values.
    let mut scene_name = String::from("sphere");
    let mut model_path = String::from("assets/model.obj");
    let mut output_path: Option<String> = None;
    let mut show_depth = false;
    let mut print_fps = false;

    let args: Vec<String> = env::args().collect();
    for i in 1..args.len() {
        match args[i].as_str() {
            "-s" => { scene_name = args[i + 1].clone(); }
            "-p" => { model_path = args[i + 1].clone(); }
            "-o" => { output_path = Some(args[i + 1].clone()); }
            "-d" => { show_depth = true; }
            "--fps" => { print_fps = true; }
            _ => ()
        }
    }

    let params = app::Params {
        width: WIDTH,
        height: HEIGHT,
        scene_name,
        model_path,
        output_path,
        show_depth,
        print_fps,
    };

    app::run(params)?;

    return Ok(());
}

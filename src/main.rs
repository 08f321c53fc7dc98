use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use lumen::camera::{Camera, CameraParameters};
use lumen::materials::{Glass, Material, Matte, Metal};
use lumen::math::{Spectrum, Vec3};
use lumen::renderer::{Prefs, RenderController};
use lumen::scene::{Environment, Scene};
use lumen::shapes::{Shape, Sphere};
use lumen::{expect, lumen_error, lumen_info};

fn setup_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    expect!(dispatch.apply(), "failed to initialize logger");
}

fn print_help() {
    println!(
        "lumen - offline physically-based path tracer\n\n\
         USAGE:\n    lumen [OPTIONS]\n\n\
         OPTIONS:\n    \
         --prefs <FILE>          load render preferences from a YAML file\n    \
         --resolution <W>x<H>    output resolution (default 640x480)\n    \
         --samples <N>           samples per pixel (default 64)\n    \
         --bounces <N>           maximum path depth (default 8)\n    \
         --tile <W>x<H>          tile size (default 32x32)\n    \
         --threads <N>           worker thread count, 0 = all cores (default 0)\n    \
         --out <FILE>            output PPM path (default out.ppm)\n    \
         -v, --verbose           debug-level logging\n    \
         -h, --help              print this message"
    );
}

fn parse_resolution(raw: &str) -> Result<(u32, u32), String> {
    let (w, h) = raw
        .split_once('x')
        .ok_or_else(|| format!("expected WxH, got '{raw}'"))?;
    let w: u32 = w.parse().map_err(|_| format!("invalid width '{w}'"))?;
    let h: u32 = h.parse().map_err(|_| format!("invalid height '{h}'"))?;
    Ok((w, h))
}

fn parse_settings(mut args: pico_args::Arguments) -> Result<(Prefs, PathBuf, bool), String> {
    if args.contains(["-h", "--help"]) {
        print_help();
        std::process::exit(0);
    }
    let verbose = args.contains(["-v", "--verbose"]);

    let mut prefs = if let Some(path) = args
        .opt_value_from_str::<_, String>("--prefs")
        .map_err(|e| e.to_string())?
    {
        Prefs::from_yaml_file(&PathBuf::from(path)).map_err(|e| e.to_string())?
    } else {
        Prefs::default()
    };

    if let Some(raw) = args
        .opt_value_from_str::<_, String>("--resolution")
        .map_err(|e| e.to_string())?
    {
        let (w, h) = parse_resolution(&raw)?;
        prefs.image_width = w;
        prefs.image_height = h;
    }
    if let Some(raw) = args
        .opt_value_from_str::<_, String>("--tile")
        .map_err(|e| e.to_string())?
    {
        let (w, h) = parse_resolution(&raw)?;
        prefs.tile_width = w;
        prefs.tile_height = h;
    }
    if let Some(samples) = args
        .opt_value_from_str::<_, u32>("--samples")
        .map_err(|e| e.to_string())?
    {
        prefs.sample_count = samples;
    }
    if let Some(bounces) = args
        .opt_value_from_str::<_, u32>("--bounces")
        .map_err(|e| e.to_string())?
    {
        prefs.bounces = bounces;
    }
    if let Some(threads) = args
        .opt_value_from_str::<_, usize>("--threads")
        .map_err(|e| e.to_string())?
    {
        prefs.thread_count = threads;
    }

    let out = args
        .opt_value_from_str::<_, String>("--out")
        .map_err(|e| e.to_string())?
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("out.ppm"));

    let remaining = args.finish();
    if !remaining.is_empty() {
        return Err(format!("unrecognized arguments: {remaining:?}"));
    }

    Ok((prefs, out, verbose))
}

/// A fixed three-sphere demo scene (one matte, one metal, one glass, over a
/// matte ground sphere) -- scene-file parsing is out of scope (§1), so this
/// is the only scene `lumen` ever renders.
fn demo_scene(prefs: &Prefs) -> Result<Scene, lumen::scene::SceneError> {
    let camera = Camera::new(CameraParameters {
        position: Vec3::new(0.0, 1.0, -4.0),
        forward: Vec3::new(0.0, -0.1, 1.0),
        up_hint: Vec3::new(0.0, 1.0, 0.0),
        focal_length: (prefs.image_width as f32) * 0.9,
        aperture: 0.02,
        focal_distance: 4.0,
    });

    let materials = vec![
        Material::Matte(Matte {
            albedo: Spectrum::new(0.6, 0.6, 0.6),
            emission: Spectrum::zeros(),
        }),
        Material::Matte(Matte {
            albedo: Spectrum::new(0.8, 0.2, 0.2),
            emission: Spectrum::zeros(),
        }),
        Material::Metal(Metal {
            albedo: Spectrum::new(0.8, 0.8, 0.9),
            fuzz: 0.05,
        }),
        Material::Glass(Glass { ior: 1.5 }),
        Material::Matte(Matte {
            albedo: Spectrum::zeros(),
            emission: Spectrum::new(4.0, 4.0, 4.0),
        }),
    ];

    let shapes = vec![
        Shape::Sphere(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, 0)),
        Shape::Sphere(Sphere::new(Vec3::new(-1.1, 0.5, 2.0), 0.5, 1)),
        Shape::Sphere(Sphere::new(Vec3::new(0.0, 0.5, 2.0), 0.5, 2)),
        Shape::Sphere(Sphere::new(Vec3::new(1.1, 0.5, 2.0), 0.5, 3)),
        Shape::Sphere(Sphere::new(Vec3::new(0.0, 3.0, 0.0), 0.75, 4)),
    ];

    Scene::new(
        camera,
        shapes,
        materials,
        Environment::Constant(Spectrum::new(0.4, 0.55, 0.8)),
    )
}

fn write_ppm(path: &std::path::Path, width: u32, height: u32, pixels: &[[u8; 3]]) -> std::io::Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    writeln!(file, "P6")?;
    writeln!(file, "{width} {height}")?;
    writeln!(file, "255")?;
    for pixel in pixels {
        file.write_all(pixel)?;
    }
    Ok(())
}

fn main() {
    let args = pico_args::Arguments::from_env();
    let (prefs, out_path, verbose) = match parse_settings(args) {
        Ok(parsed) => parsed,
        Err(why) => {
            eprintln!("error: {why}");
            print_help();
            std::process::exit(1);
        }
    };

    setup_logger(verbose);
    lumen_info!(
        "starting render: {}x{}, {} spp, {} bounces, tile {}x{}",
        prefs.image_width,
        prefs.image_height,
        prefs.sample_count,
        prefs.bounces,
        prefs.tile_width,
        prefs.tile_height
    );

    let scene = match demo_scene(&prefs) {
        Ok(scene) => Arc::new(scene),
        Err(why) => {
            lumen_error!("invalid scene: {why}");
            std::process::exit(1);
        }
    };

    let film = Arc::new(lumen::film::Film::new(&prefs.film_settings()));
    let controller = match RenderController::launch(scene, prefs, Arc::clone(&film), None) {
        Ok(controller) => controller,
        Err(why) => {
            lumen_error!("{why}");
            std::process::exit(1);
        }
    };

    let output = controller.join();
    lumen_info!(
        "render {} in {:?} ({} samples)",
        if output.aborted { "aborted" } else { "complete" },
        output.elapsed,
        output.total_samples
    );

    if output.save_image {
        if let Err(why) = write_ppm(&out_path, output.width, output.height, &output.pixels) {
            lumen_error!("failed to write {}: {why}", out_path.display());
            std::process::exit(1);
        }
        lumen_info!("wrote {}", out_path.display());
    }
}

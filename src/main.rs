use std::fs::File;

use clap::Parser;
use glam::Vec3A;
use log::{error, info, LevelFilter};

mod cli;

use cli::Args;
use scanray::camera::Camera;
use scanray::hittable::HittableList;
use scanray::instrument::{self, ScopeTimer};
use scanray::material::{Color, Material};
use scanray::output::{send_image_to_tev, write_image, ImageFileWriter, PpmWriter};
use scanray::renderer::Renderer;
use scanray::sphere::Sphere;

/// Build the fixed four-sphere scene: a matte ground, a matte center sphere,
/// and two polished metal spheres flanking it.
fn build_scene() -> HittableList {
    let ground_material = Material::Lambertian {
        albedo: Color::new(0.8, 0.8, 0.0),
    };
    let center_material = Material::Lambertian {
        albedo: Color::new(0.7, 0.3, 0.3),
    };
    let left_material = Material::Metal {
        albedo: Color::new(0.8, 0.8, 0.8),
        fuzz: 0.0,
    };
    let right_material = Material::Metal {
        albedo: Color::new(0.8, 0.6, 0.2),
        fuzz: 0.0,
    };

    let mut world = HittableList::new();
    world.add(Box::new(Sphere::new(Vec3A::new(0.0, -100.5, -1.0), 100.0, ground_material)));
    world.add(Box::new(Sphere::new(Vec3A::new(0.0, 0.0, -1.0), 0.5, center_material)));
    world.add(Box::new(Sphere::new(Vec3A::new(-1.0, 0.0, -1.0), 0.5, left_material)));
    world.add(Box::new(Sphere::new(Vec3A::new(1.0, 0.0, -1.0), 0.5, right_material)));
    world
}

/// Initialize env_logger at the CLI-selected level; `RUST_LOG` still wins
/// for per-module overrides.
fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    info!("scanray - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));
    info!(
        "Image resolution: {}x{}, samples per pixel: {}, max depth: {}",
        args.width, args.height, args.samples_per_pixel, args.max_depth
    );

    if let Some(trace_path) = &args.trace {
        instrument::begin_session("main", trace_path);
    }

    let world = build_scene();

    let camera = Camera::new(
        Vec3A::ZERO,
        Vec3A::new(0.0, 0.0, -1.0),
        Vec3A::new(0.0, 1.0, 0.0),
        90.0,
        args.width as f32 / args.height as f32,
    );

    let mut renderer = Renderer::new(args.width, args.height);
    renderer.samples_per_pixel = args.samples_per_pixel;
    renderer.max_depth = args.max_depth;
    renderer.threads = args.threads;

    let image = {
        let _timer = ScopeTimer::new("render");
        renderer.render(&camera, &world)
    };

    // Send image to TEV if requested
    if let Some(tev_address) = &args.tev_address {
        send_image_to_tev(&image, tev_address, args.width, args.height);
    }

    // Write output files; the render is already complete in memory, so writer
    // failures only affect the exit code
    let mut output_failed = false;
    {
        let _timer = ScopeTimer::new("write_output");

        let mut primary = ImageFileWriter::new(&args.output, args.width, args.height);
        match write_image(&image, &mut primary) {
            Ok(_) => info!("Image generated successfully"),
            Err(e) => {
                error!("An error occurred while generating the image: {}", e);
                output_failed = true;
            }
        }

        if let Some(jpg_path) = &args.jpg {
            let mut jpg = ImageFileWriter::new(jpg_path, args.width, args.height);
            match write_image(&image, &mut jpg) {
                Ok(_) => info!("JPG image generated successfully"),
                Err(e) => {
                    error!("An error occurred while generating the JPG image: {}", e);
                    output_failed = true;
                }
            }
        }

        if let Some(ppm_path) = &args.ppm {
            match File::create(ppm_path) {
                Ok(file) => {
                    let mut ppm = PpmWriter::new(file, args.width, args.height);
                    match write_image(&image, &mut ppm) {
                        Ok(_) => info!("PPM image written to {}", ppm_path),
                        Err(e) => {
                            error!("An error occurred while writing the PPM image: {}", e);
                            output_failed = true;
                        }
                    }
                }
                Err(e) => {
                    error!("Failed to create PPM file {}: {}", ppm_path, e);
                    output_failed = true;
                }
            }
        }
    }

    instrument::end_session();

    if output_failed {
        std::process::exit(1);
    }
}

//! scanterrain CLI - turns scanned ground surfaces into stylized terrain.
//!
//! Reads ground point clouds (OBJ or XYZ), runs the generation pipeline and
//! writes the finished mesh as OBJ and/or a binary buffer dump.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;

use scanterrain::config::{TerrainConfig, PARAM_KEYS};
use scanterrain::export::{export_buffers_raw, export_obj};
use scanterrain::noise::NoiseLayerConfig;
use scanterrain::scan::{collect_ground_vertices, deduplicate, load_ground_meshes};
use scanterrain::terrain::{ElevationBounds, TerrainGenerator, TerrainMesh};

/// Scanned-surface to terrain mesh generator.
#[derive(Parser)]
#[command(name = "scanterrain")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a terrain mesh from a scanned ground surface.
    Generate {
        /// Input point cloud (.obj or .xyz).
        input: PathBuf,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "terrain")]
        name: String,

        /// Export format.
        #[arg(short, long, default_value = "obj")]
        format: ExportFormat,

        /// JSON configuration file. Missing fields take defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed for noise and erosion. Erosion uses it as is; the
        /// noise layer folds it to 32 bits.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Horizontal deduplication tolerance.
        #[arg(long)]
        precision: Option<f32>,

        /// Noise strength.
        #[arg(long)]
        noise_strength: Option<f32>,

        /// Minimum triangle angle in degrees for refinement.
        #[arg(long)]
        min_angle: Option<f64>,

        /// Droplet lifespan in steps.
        #[arg(long)]
        lifespan: Option<u32>,

        /// Skip droplet erosion.
        #[arg(long)]
        skip_erosion: bool,

        /// Extra parameter overrides as key=value. Invalid ones are skipped.
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Display information about an input point cloud.
    Info {
        /// Input point cloud (.obj or .xyz).
        input: PathBuf,

        /// Horizontal deduplication tolerance.
        #[arg(long, default_value = "0.011")]
        precision: f32,
    },

    /// Print the default configuration as JSON and the parameter keys.
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// Wavefront OBJ with normals.
    Obj,
    /// Binary vertex/index buffer dump.
    Raw,
    /// Both OBJ and RAW.
    All,
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            name,
            format,
            config,
            seed,
            precision,
            noise_strength,
            min_angle,
            lifespan,
            skip_erosion,
            params,
        } => {
            let mut overrides: Vec<String> = Vec::new();
            if let Some(seed) = seed {
                overrides.push(format!("noise.seed={}", NoiseLayerConfig::seed_from_u64(seed)));
                overrides.push(format!("erosion.seed={seed}"));
            }
            if let Some(v) = precision {
                overrides.push(format!("collector.precision={v}"));
            }
            if let Some(v) = noise_strength {
                overrides.push(format!("noise.strength={v}"));
            }
            if let Some(v) = min_angle {
                overrides.push(format!("triangulation.min_angle_deg={v}"));
            }
            if let Some(v) = lifespan {
                overrides.push(format!("erosion.lifespan={v}"));
            }
            if skip_erosion {
                overrides.push("erosion.droplets_per_vertex=0".to_string());
            }
            overrides.extend(params);

            run_generate(&input, &output, &name, format, config.as_deref(), &overrides);
        }
        Commands::Info { input, precision } => {
            run_info(&input, precision);
        }
        Commands::Config => {
            run_config();
        }
    }
}

fn run_generate(
    input: &Path,
    output: &Path,
    name: &str,
    format: ExportFormat,
    config_path: Option<&Path>,
    overrides: &[String],
) {
    let mut config = match config_path {
        Some(path) => TerrainConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading config {}: {}", path.display(), e);
            std::process::exit(1);
        }),
        None => TerrainConfig::default(),
    };

    let rejected = config.apply_assignments(overrides.iter().map(String::as_str));

    println!("scanterrain - Scan to Terrain Generator");
    println!("=======================================");
    println!("Input: {}", input.display());
    println!("Output: {}", output.display());
    println!("Noise seed: {}, erosion seed: {}", config.noise.seed, config.erosion.seed);
    if !rejected.is_empty() {
        println!("Skipped {} invalid parameter(s)", rejected.len());
    }

    let start = Instant::now();

    println!("\nLoading ground surface...");
    let meshes = load_ground_meshes(input).unwrap_or_else(|e| {
        eprintln!("Error reading input: {}", e);
        std::process::exit(1);
    });
    let points = collect_ground_vertices(&meshes);
    println!("  {} ground mesh(es), {} vertices", meshes.len(), points.len());

    println!("Running generation pipeline...");
    let curve = config.height_curve.clone();
    let mut generator = TerrainGenerator::new(config);

    let generated = generator
        .generate_with_callbacks(
            &meshes,
            curve,
            |name, i, total| {
                println!("  [{}/{}] Starting: {}", i + 1, total, name);
            },
            |name, i, total| {
                println!("  [{}/{}] Completed: {}", i + 1, total, name);
            },
        )
        .unwrap_or_else(|e| {
            eprintln!("Error during generation: {}", e);
            std::process::exit(1);
        });

    let Some(mesh) = generated else {
        println!("No ground surface detected, nothing to generate.");
        return;
    };

    println!("Generation completed in {:.2?}", start.elapsed());
    print_mesh_summary(mesh);

    println!("\nExporting mesh...");
    std::fs::create_dir_all(output).unwrap_or_else(|e| {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    });

    if matches!(format, ExportFormat::Obj | ExportFormat::All) {
        let path = output.join(format!("{name}.obj"));
        export_obj(mesh, &path).unwrap_or_else(|e| {
            eprintln!("Error exporting OBJ: {}", e);
            std::process::exit(1);
        });
        println!("  Exported {}", path.display());
    }
    if matches!(format, ExportFormat::Raw | ExportFormat::All) {
        let path = output.join(format!("{name}.bin"));
        export_buffers_raw(mesh, &path).unwrap_or_else(|e| {
            eprintln!("Error exporting RAW: {}", e);
            std::process::exit(1);
        });
        println!("  Exported {}", path.display());
    }

    println!("\nDone in {:.2?}", start.elapsed());
}

fn print_mesh_summary(mesh: &TerrainMesh) {
    let bounds = mesh.bounds();
    let shading = mesh.shading_thresholds();
    println!("Vertices: {}", mesh.vertex_count());
    println!("Triangles: {}", mesh.triangle_count());
    println!("Elevation range: [{:.4}, {:.4}]", bounds.min, bounds.max);
    println!("Water level: {:.4}", shading.water);
    println!("Sand below: {:.4}, snow above: {:.4}", shading.sand, shading.snow);
}

fn run_info(input: &Path, precision: f32) {
    let meshes = load_ground_meshes(input).unwrap_or_else(|e| {
        eprintln!("Error reading input: {}", e);
        std::process::exit(1);
    });
    let points = collect_ground_vertices(&meshes);
    let kept = deduplicate(&points, precision);

    println!("scanterrain - Input Info");
    println!("========================");
    println!();
    println!("File: {}", input.display());
    println!("Ground meshes: {}", meshes.len());
    for (i, mesh) in meshes.iter().enumerate() {
        println!("  [{}] {:>10} vertices", i, mesh.vertex_count());
    }
    println!();
    println!("Vertices:");
    println!("  Raw:          {:>10}", points.len());
    println!("  Deduplicated: {:>10} (precision {})", kept.len(), precision);

    if kept.is_empty() {
        println!();
        println!("No ground surface detected.");
        return;
    }

    let bounds = ElevationBounds::from_vertices(&kept);
    let (mut min_x, mut max_x, mut min_z, mut max_z) = (f32::MAX, f32::MIN, f32::MAX, f32::MIN);
    for v in &kept {
        min_x = min_x.min(v.x);
        max_x = max_x.max(v.x);
        min_z = min_z.min(v.z);
        max_z = max_z.max(v.z);
    }
    println!();
    println!("Extent:");
    println!("  X:         [{:.4}, {:.4}]", min_x, max_x);
    println!("  Z:         [{:.4}, {:.4}]", min_z, max_z);
    println!("  Elevation: [{:.4}, {:.4}]", bounds.min, bounds.max);
    if kept.len() < 3 {
        println!();
        println!("Too few vertices to triangulate.");
    }
}

fn run_config() {
    match TerrainConfig::default().to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            std::process::exit(1);
        }
    }
    println!();
    println!("Parameter keys for --param:");
    for key in PARAM_KEYS {
        println!("  {key}");
    }
}

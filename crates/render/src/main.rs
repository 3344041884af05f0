//! nosecone CLI - export rocket nose cones and implicit surfaces as binary STL.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nosecone_harness::MeshReport;
use nosecone_kernel::{AxisymmetricSolidSpec, Point3d, SphereField, TorusField};
use nosecone_tessellation::{
    ContourConfig, ExportConfig, GridBounds, NormalMode, Orientation, QuadWinding, ShellAssembler,
    StepPolicy, TriangleSoup, VertexPlacement, export_contour, export_nose_cone_to_path,
};

mod svg;

#[derive(Parser)]
#[command(name = "nosecone")]
#[command(about = "Export axisymmetric shells and implicit surfaces as binary STL", long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Draft,
    Default,
    Fine,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Identity,
    Print,
}

#[derive(Clone, Copy, ValueEnum)]
enum SurfaceArg {
    Sphere,
    Torus,
}

/// Mesh density and output overrides shared by nose-cone subcommands.
#[derive(clap::Args)]
struct MeshArgs {
    /// Starting configuration
    #[arg(long, value_enum, default_value = "default")]
    preset: Preset,
    /// JSON export configuration; replaces the preset
    #[arg(long)]
    config: Option<PathBuf>,
    /// Segments around each ring
    #[arg(long)]
    segments: Option<usize>,
    /// Split the length into this many axial steps
    #[arg(long, conflicts_with = "step")]
    divisions: Option<u32>,
    /// Fixed axial step in meters
    #[arg(long)]
    step: Option<f64>,
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,
    /// Write facet normals computed from the winding instead of zero
    #[arg(long)]
    compute_normals: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a nose cone described by a JSON spec
    NoseCone {
        /// Input spec (.json)
        spec: PathBuf,
        /// Output file (.stl)
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        mesh: MeshArgs,
    },
    /// Contour a built-in implicit surface
    Contour {
        #[arg(value_enum)]
        surface: SurfaceArg,
        /// Output file (.stl)
        #[arg(short, long)]
        output: PathBuf,
        /// Sphere radius, or torus major radius
        #[arg(long, default_value_t = 1.0)]
        radius: f64,
        /// Torus tube radius
        #[arg(long, default_value_t = 0.25)]
        minor_radius: f64,
        /// Cells per axis
        #[arg(long, default_value_t = 48)]
        span: usize,
        /// Bisection tolerance
        #[arg(long, default_value_t = 1e-4)]
        tolerance: f64,
        /// Keep the fixed per-axis quad order instead of facing outward
        #[arg(long)]
        lattice_winding: bool,
        /// Place vertices of cells without a crossing at the cell center
        #[arg(long)]
        cell_center: bool,
        /// Unit conversion applied to vertices
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
    },
    /// Check an STL file and print a report
    Inspect {
        /// Input file (.stl)
        file: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a nose cone spec to an SVG preview
    Preview {
        /// Input spec (.json)
        spec: PathBuf,
        /// Output file (.svg)
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        mesh: MeshArgs,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_spec(path: &Path) -> Result<AxisymmetricSolidSpec> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn export_config(args: &MeshArgs) -> Result<ExportConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => match args.preset {
            Preset::Draft => ExportConfig::draft(),
            Preset::Default => ExportConfig::default(),
            Preset::Fine => ExportConfig::fine(),
        },
    };
    if let Some(segments) = args.segments {
        config.segments = segments;
    }
    if let Some(divisions) = args.divisions {
        config.step = StepPolicy::Divisions(divisions);
    }
    if let Some(step) = args.step {
        config.step = StepPolicy::Fixed(step);
    }
    if let Some(orientation) = args.orientation {
        config.writer.orientation = match orientation {
            OrientationArg::Identity => Orientation::Identity,
            OrientationArg::Print => Orientation::Print,
        };
    }
    if args.compute_normals {
        config.writer.normals = NormalMode::Computed;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::NoseCone { spec, output, mesh } => {
            let solid = load_spec(&spec)?;
            let config = export_config(&mesh)?;
            let summary = export_nose_cone_to_path(&solid, &config, &output)
                .with_context(|| format!("exporting {}", output.display()))?;
            println!(
                "Wrote {} ({} triangles)",
                output.display(),
                summary.triangles
            );
        }
        Commands::Contour {
            surface,
            output,
            radius,
            minor_radius,
            span,
            tolerance,
            lattice_winding,
            cell_center,
            scale,
        } => {
            let config = ContourConfig {
                tolerance,
                placement: if cell_center {
                    VertexPlacement::CellCenter
                } else {
                    VertexPlacement::Corner
                },
                winding: if lattice_winding {
                    QuadWinding::Lattice
                } else {
                    QuadWinding::InsideOut
                },
                writer: ContourConfig::default().writer.with_scale(scale),
            };
            let file = std::io::BufWriter::new(
                fs::File::create(&output)
                    .with_context(|| format!("creating {}", output.display()))?,
            );
            let summary = match surface {
                SurfaceArg::Sphere => {
                    let field = SphereField::new(Point3d::ORIGIN, radius);
                    let bounds = GridBounds::cube(Point3d::ORIGIN, radius * 1.25, span);
                    export_contour(&field, Some(&field), bounds, &config, file)?.1
                }
                SurfaceArg::Torus => {
                    if minor_radius >= radius {
                        bail!("torus tube radius {minor_radius} must be below {radius}");
                    }
                    let field = TorusField::new(Point3d::ORIGIN, radius, minor_radius);
                    let half = (radius + minor_radius) * 1.25;
                    let bounds = GridBounds::cube(Point3d::ORIGIN, half, span);
                    export_contour(&field, Some(&field), bounds, &config, file)?.1
                }
            };
            println!(
                "Wrote {} ({} quads, {} active cells)",
                output.display(),
                summary.quads,
                summary.active_cells
            );
        }
        Commands::Inspect { file, json } => {
            let bytes = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let report = MeshReport::from_stl_bytes(&name, &bytes)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
            if !report.all_passed() {
                bail!("{} failed one or more checks", file.display());
            }
        }
        Commands::Preview { spec, output, mesh } => {
            let solid = load_spec(&spec)?;
            let config = export_config(&mesh)?;
            let mut soup = TriangleSoup::new();
            let summary = ShellAssembler::new(config.segments, config.step)
                .assemble(&solid, &mut soup)?;
            let title = format!("{:?} nose cone", solid.shape);
            fs::write(&output, svg::soup_to_svg(&soup, 800.0, 600.0, &title))
                .with_context(|| format!("writing {}", output.display()))?;
            info!(triangles = summary.triangles, "preview rendered");
            println!("Wrote {}", output.display());
        }
    }

    Ok(())
}

//! isovox - command line meshing of narrow band level sets
//!
//! Provides subcommands for:
//! - `sphere`: Build a sphere level set, mesh it and write an OBJ file
//! - `blend`: Blend two sphere level sets and mesh the result
//! - `leaves`: Summarize the stacked leaf and dense exports of a sphere
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release --bin isovox -- sphere --radius 0.5 -o output/sphere.obj
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use instant::Instant;

use isovox::{
    blend_into, export_leaves, export_obj_to_file, level_set_sphere, to_dense, Fit, Mesher,
    NarrowBandConfig, Point3, SparseGrid, TriangleMesh,
};

#[derive(Parser, Debug)]
#[command(name = "isovox")]
#[command(about = "Mesh sparse narrow band level sets with marching cubes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mesh a sphere level set and write it as OBJ
    Sphere(SphereArgs),
    /// Blend two offset spheres and write the mesh as OBJ
    Blend(BlendArgs),
    /// Print the leaf export summary of a sphere level set
    Leaves(LeavesArgs),
}

#[derive(clap::Args, Debug)]
struct GridArgs {
    /// Sphere radius in world units
    #[arg(long, default_value = "0.5")]
    radius: f64,

    /// Voxel size in world units
    #[arg(long, default_value = "0.02")]
    voxel_size: f64,

    /// Half width of the active band in voxels
    #[arg(long, default_value = "3.0")]
    half_width: f32,

    /// Voxels per leaf side
    #[arg(long, default_value = "8")]
    leaf_dim: u32,
}

impl GridArgs {
    fn band(&self) -> NarrowBandConfig {
        NarrowBandConfig::new(self.voxel_size, self.half_width, self.leaf_dim)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FitMode {
    /// Keep world coordinates
    None,
    /// Fit into the unit sphere
    Sphere,
    /// Fit into the cube [-1, 1]³
    Cube,
}

#[derive(clap::Args, Debug)]
struct MeshArgs {
    /// Output OBJ file path
    #[arg(short, long)]
    output: PathBuf,

    /// Divide values by the background before meshing
    #[arg(long)]
    normalize: bool,

    /// Placement of the output mesh
    #[arg(long, value_enum, default_value_t = FitMode::None)]
    fit: FitMode,

    /// Fraction of the fit volume left empty
    #[arg(long, default_value = "0.1")]
    padding: f64,
}

impl MeshArgs {
    fn mesher(&self) -> Mesher {
        let fit = match self.fit {
            FitMode::None => Fit::None,
            FitMode::Sphere => Fit::UnitSphere {
                scale: 1.0,
                padding: self.padding,
            },
            FitMode::Cube => Fit::UnitCube {
                scale: 1.0,
                padding: self.padding,
            },
        };
        Mesher::new().with_normalize(self.normalize).with_fit(fit)
    }
}

#[derive(clap::Args, Debug)]
struct SphereArgs {
    #[command(flatten)]
    grid: GridArgs,

    #[command(flatten)]
    mesh: MeshArgs,
}

#[derive(clap::Args, Debug)]
struct BlendArgs {
    #[command(flatten)]
    grid: GridArgs,

    #[command(flatten)]
    mesh: MeshArgs,

    /// Distance between the two sphere centres
    #[arg(long, default_value = "0.4")]
    offset: f64,

    /// Weight of the first sphere
    #[arg(long, default_value = "0.9")]
    eta: f32,
}

#[derive(clap::Args, Debug)]
struct LeavesArgs {
    #[command(flatten)]
    grid: GridArgs,

    /// Divide values by the background
    #[arg(long)]
    normalize: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sphere(args) => run_sphere(&args),
        Commands::Blend(args) => run_blend(&args),
        Commands::Leaves(args) => run_leaves(&args),
    }
}

fn build_sphere(grid: &GridArgs, center: Point3) -> Result<SparseGrid> {
    let start = Instant::now();
    let sphere = level_set_sphere(center, grid.radius, &grid.band())
        .context("Failed to build sphere level set")?;
    log::info!(
        "built sphere at ({}, {}, {}): {} leaves, {} active voxels in {:.2?}",
        center.x,
        center.y,
        center.z,
        sphere.leaf_count(),
        sphere.active_voxel_count(),
        start.elapsed()
    );
    Ok(sphere)
}

fn mesh_and_write(grid: &SparseGrid, args: &MeshArgs) -> Result<TriangleMesh> {
    let start = Instant::now();
    let mesh = args.mesher().mesh(grid).context("Failed to mesh grid")?;
    let elapsed = start.elapsed();

    if let Some(parent) = args.output.parent() {
        if parent != Path::new("") {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
    }
    let stats = export_obj_to_file(&mesh, &args.output)
        .with_context(|| format!("Failed to write {:?}", args.output))?;

    println!("Mesh:      {} vertices, {} triangles", stats.vertex_count, stats.triangle_count);
    println!("Area:      {:.6}", stats.surface_area);
    println!(
        "Bounds:    ({:.4}, {:.4}, {:.4}) - ({:.4}, {:.4}, {:.4})",
        stats.bbox_min.x,
        stats.bbox_min.y,
        stats.bbox_min.z,
        stats.bbox_max.x,
        stats.bbox_max.y,
        stats.bbox_max.z
    );
    println!("Extracted: {:.2?}", elapsed);
    println!("Written:   {:?}", args.output);

    Ok(mesh)
}

fn run_sphere(args: &SphereArgs) -> Result<()> {
    let grid = build_sphere(&args.grid, Point3::splat(0.0))?;
    mesh_and_write(&grid, &args.mesh)?;
    Ok(())
}

fn run_blend(args: &BlendArgs) -> Result<()> {
    let half = args.offset * 0.5;
    let mut a = build_sphere(&args.grid, Point3::new(-half, 0.0, 0.0))?;
    let b = build_sphere(&args.grid, Point3::new(half, 0.0, 0.0))?;

    let start = Instant::now();
    blend_into(&mut a, &b, args.eta).context("Failed to blend level sets")?;
    println!(
        "Blended:   eta {}, {} leaves, {} active voxels in {:.2?}",
        args.eta,
        a.leaf_count(),
        a.active_voxel_count(),
        start.elapsed()
    );

    mesh_and_write(&a, &args.mesh)?;
    Ok(())
}

fn run_leaves(args: &LeavesArgs) -> Result<()> {
    let grid = build_sphere(&args.grid, Point3::splat(0.0))?;

    let start = Instant::now();
    let leaves = export_leaves(&grid, args.normalize).context("Failed to export leaves")?;
    let elapsed = start.elapsed();

    let active = leaves.active.iter().filter(|&&a| a).count();
    let (min, max) = leaves
        .values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    println!("Leaves:    {}", leaves.len());
    println!("Shape:     {:?}", leaves.leaf_shape());
    println!("Active:    {}", active);
    println!("SDF trunc: {}", leaves.sdf_trunc());
    println!("Range:     [{}, {}]", min, max);
    println!("Exported:  {:.2?}", elapsed);

    if let Some(dense) = to_dense(&grid) {
        println!(
            "Dense:     {:?} at voxel ({}, {}, {})",
            dense.shape, dense.origin.x, dense.origin.y, dense.origin.z
        );
    }

    Ok(())
}

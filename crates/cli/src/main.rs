use anyhow::Result;
use brep::api::{draw_points, BBox3, CloudShape, KernelCfg, Polyhedron, ReplayToken};
use clap::{Args, Parser, Subcommand};
use nalgebra::{vector, Vector3};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod record;
mod summary;

use record::{KernelInfo, RunRecord};
use summary::{parse_vec3, read_points, Summary};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Build, heal and inspect convex polyhedra")]
struct Cmd {
    /// Write the JSON summary here, with a `.run.json` record beside it, instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Axis-aligned box from two corners
    Box {
        #[arg(long, value_parser = parse_vec3)]
        min: Vector3<f64>,
        #[arg(long, value_parser = parse_vec3)]
        max: Vector3<f64>,
    },
    /// Convex hull of a point set
    Hull {
        #[command(flatten)]
        source: PointSource,
    },
    /// Convex hull followed by edge healing and optional position snapping
    Heal {
        #[command(flatten)]
        source: PointSource,
        #[arg(long, default_value_t = KernelCfg::default().min_edge_length)]
        min_length: f64,
        /// Snap coordinates to multiples of 2^-N before healing
        #[arg(long)]
        snap_decimals: Option<u32>,
        #[arg(long, default_value_t = KernelCfg::default().eps_correct)]
        snap_eps: f64,
    },
    /// Print the kernel version, commit and tolerances
    Report,
}

#[derive(Args)]
struct PointSource {
    /// JSON array of `[x, y, z]` points
    #[arg(long, conflicts_with = "random", required_unless_present = "random")]
    input: Option<PathBuf>,
    /// Draw N points uniformly in the unit cube instead of reading a file
    #[arg(long)]
    random: Option<usize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl PointSource {
    fn load(&self) -> Result<Vec<Vector3<f64>>> {
        match (&self.input, self.random) {
            (Some(path), _) => read_points(path),
            (None, Some(n)) => Ok(draw_points(
                CloudShape::InBox(BBox3::new(vector![0.0, 0.0, 0.0], vector![1.0, 1.0, 1.0])),
                n,
                ReplayToken::new(self.seed, 0),
            )),
            (None, None) => anyhow::bail!("either --input or --random is required"),
        }
    }

    fn params(&self) -> Value {
        json!({
            "input": self.input.as_ref().map(|p| p.to_string_lossy().into_owned()),
            "random": self.random,
            "seed": self.seed,
        })
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let out = cmd.out.as_deref();
    match cmd.action {
        Action::Box { min, max } => build_box(min, max, out),
        Action::Hull { source } => hull(&source, out),
        Action::Heal {
            source,
            min_length,
            snap_decimals,
            snap_eps,
        } => heal(&source, min_length, snap_decimals, snap_eps, out),
        Action::Report => report(),
    }
}

fn build_box(min: Vector3<f64>, max: Vector3<f64>, out: Option<&Path>) -> Result<()> {
    tracing::info!(?min, ?max, "box");
    if (0..3).any(|i| min[i] > max[i]) {
        anyhow::bail!("--min must not exceed --max in any coordinate");
    }
    let p = Polyhedron::from_min_max(min, max);
    let params = json!({
        "command": "box",
        "min": [min.x, min.y, min.z],
        "max": [max.x, max.y, max.z],
    });
    emit(&Summary::of(&p), params, None, out)
}

fn hull(source: &PointSource, out: Option<&Path>) -> Result<()> {
    let points = source.load()?;
    tracing::info!(points = points.len(), "hull");
    let p = Polyhedron::from_points(&points);
    let mut params = source.params();
    params["command"] = json!("hull");
    emit(&Summary::of(&p), params, Some(points.as_slice()), out)
}

fn heal(
    source: &PointSource,
    min_length: f64,
    snap_decimals: Option<u32>,
    snap_eps: f64,
    out: Option<&Path>,
) -> Result<()> {
    let points = source.load()?;
    tracing::info!(points = points.len(), min_length, ?snap_decimals, "heal");
    let mut p = Polyhedron::from_points(&points);
    let before = p.edge_count();
    if let Some(decimals) = snap_decimals {
        p.correct_vertex_positions(decimals, snap_eps);
    }
    let healed = p.heal_edges(min_length);
    tracing::info!(
        removed_edges = before.saturating_sub(p.edge_count()),
        healed,
        "heal_done"
    );
    let mut params = source.params();
    params["command"] = json!("heal");
    params["min_length"] = json!(min_length);
    params["snap_decimals"] = json!(snap_decimals);
    params["snap_eps"] = json!(snap_eps);
    emit(
        &Summary::of(&p).with_healed(healed),
        params,
        Some(points.as_slice()),
        out,
    )
}

fn report() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&KernelInfo::current())?);
    Ok(())
}

fn emit(
    summary: &Summary,
    command: Value,
    points: Option<&[Vector3<f64>]>,
    out: Option<&Path>,
) -> Result<()> {
    let Some(path) = out else {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    };
    summary.write(path)?;
    let mut record = RunRecord::new(command, summary, path);
    if let Some(points) = points {
        record = record.with_input(points);
    }
    let written = record.write()?;
    tracing::info!(out = %path.display(), record = %written.display(), "wrote");
    Ok(())
}

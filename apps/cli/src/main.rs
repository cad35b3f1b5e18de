// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Manifold-Lite CLI: load a Wavefront OBJ mesh, build its half-edge table
//! and report whether the surface is a 2-manifold.
//!
//! # Exit codes
//!
//! - `0` the mesh is manifold
//! - `1` the mesh could not be read, parsed or processed
//! - `2` the mesh is not manifold

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use manifold_lite_topology::Mesh;

mod config;
mod report;

use config::{Config, LogFormat, DEFAULT_MESH_NAME};
use report::{FirstFace, MeshSummary};

#[derive(Parser)]
#[command(name = "manifold-lite")]
#[command(version, about = "Half-edge construction and 2-manifold checks for OBJ meshes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a mesh and print a summary.
    Check {
        /// Path to an OBJ file.
        path: Option<PathBuf>,

        /// Mesh name used in messages.
        #[arg(short, long, default_value = DEFAULT_MESH_NAME)]
        name: String,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Classify a mesh and print its first face in detail.
    Inspect {
        /// Path to an OBJ file.
        path: Option<PathBuf>,

        /// Mesh name used in messages.
        #[arg(short, long, default_value = DEFAULT_MESH_NAME)]
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_logging(config.log_format);

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
    {
        tracing::warn!(error = %e, "Using default rayon thread pool");
    }

    let result = match cli.command {
        Commands::Check { path, name, json } => {
            let path = path.unwrap_or_else(|| config.default_path.clone());
            check(&path, &name, json)
        }
        Commands::Inspect { path, name } => {
            let path = path.unwrap_or_else(|| config.default_path.clone());
            inspect(&path, &name)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,manifold_lite=debug".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Reads, imports, builds edges and classifies.
fn process(path: &Path, name: &str) -> Result<Mesh> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut mesh = Mesh::from_obj_str(name, &text)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    mesh.build_edges().context("Failed to build half-edges")?;
    let manifold = mesh.check_manifold().context("Failed to classify mesh")?;

    tracing::info!(
        mesh = %name,
        path = %path.display(),
        faces = mesh.face_count(),
        manifold,
        "Processed mesh"
    );
    Ok(mesh)
}

fn check(path: &Path, name: &str, json: bool) -> Result<bool> {
    let mesh = process(path, name)?;
    let summary = MeshSummary::new(&mesh, path);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
    } else {
        print!("{summary}");
    }
    Ok(summary.manifold.unwrap_or(false))
}

fn inspect(path: &Path, name: &str) -> Result<bool> {
    let mesh = process(path, name)?;
    print!("{}", MeshSummary::new(&mesh, path));
    println!();
    print!("{}", FirstFace(&mesh));
    Ok(mesh.is_manifold().unwrap_or(false))
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! One-shot pipeline runner.
//!
//! Loads the two raw tables once, runs the full
//! filter → bin/area → validate → adapt pipeline, and emits the three
//! renderer payloads as a single JSON document. A UI shell re-invokes
//! this on every selection change; there is no incremental update
//! path, recomputation is cheap at city scale.

mod pipeline;

use std::path::PathBuf;

use clap::Parser;
use school_map_presentation::LayerSelection;

#[derive(Parser)]
#[command(name = "school_map_cli")]
#[command(about = "Prepares Chicago school and police beat data for chart and map renderers")]
struct Args {
    /// Path to the CPS school locations CSV.
    #[arg(long, default_value = "CPS_School_Locations_SY1415.csv")]
    schools: PathBuf,

    /// Path to the police beat boundaries CSV.
    #[arg(long, default_value = "PoliceBeatDec2012.csv")]
    beats: PathBuf,

    /// School type to include (repeatable). Defaults to every observed
    /// type.
    #[arg(long = "school-type")]
    school_types: Vec<String>,

    /// Map layer to emit: school-locations, police-beats, or both.
    #[arg(long, default_value_t = LayerSelection::default())]
    layer: LayerSelection,

    /// Write the JSON payload to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let args = Args::parse();

    let selected = (!args.school_types.is_empty())
        .then(|| args.school_types.iter().cloned().collect());

    let payload = pipeline::run(&args.schools, &args.beats, selected, args.layer)?;
    let json = serde_json::to_string_pretty(&payload)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            log::info!("Wrote renderer payload to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

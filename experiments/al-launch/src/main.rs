use std::path::PathBuf;

use alstream_core::{
    compose, init_tracing, load_if_present, load_or_init, resolve, BaseLearnerChoice, EngineSettings, LaunchArgs,
    LearnerChoice,
};
use anyhow::{bail, Context, Result};
use tracing::{info, warn};

const DEFAULT_CONFIG_PATH: &str = "alstream/launch.json";

fn main() -> Result<()> {
    init_tracing();

    let args = match LaunchArgs::parse_from_env() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("{}", usage());
            std::process::exit(2);
        }
    };

    if args.help_requested() {
        println!("{}", usage());
        return Ok(());
    }

    let config = resolve(args.learner(), args.base_learner(), args.budget())
        .context("invalid experiment configuration")?;

    let config_path = args
        .config()
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    // A dry run leaves the filesystem untouched.
    let settings: EngineSettings = if args.dry_run() {
        load_if_present(&config_path)?.unwrap_or_default()
    } else {
        load_or_init(&config_path, EngineSettings::default)?
    };

    let command = compose(&config, &settings).context("failed to compose engine command")?;
    println!("{command}");

    if args.dry_run() {
        return Ok(());
    }

    info!(
        learner = %config.learner(),
        base_learner = %config.base_learner(),
        budget = %config.budget(),
        "starting engine"
    );
    let status = command
        .to_process()
        .status()
        .with_context(|| format!("failed to start engine binary '{}'", command.program()))?;

    if !status.success() {
        warn!(%status, "engine run failed");
        bail!("engine exited with {status}");
    }

    info!("engine run finished");
    Ok(())
}

fn usage() -> String {
    format!(
        "Usage: alstream-launch -l <learner> -B <baseLearner> -b <budget> [-c <config.json>] [-n] [-h]\n\
         \n\
         Learners: {}\n\
         Base learners: {}\n\
         \n\
         -c  engine settings file (default {})\n\
         -n  print the engine command without running it",
        LearnerChoice::accepted_names().join(", "),
        BaseLearnerChoice::accepted_names().join(", "),
        DEFAULT_CONFIG_PATH
    )
}

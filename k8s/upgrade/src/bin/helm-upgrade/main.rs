use clap::Parser;
use helm_upgrade::{
    config::{ConfigFile, Sink},
    error::Result,
    preflight_validations::validate_helmv3_in_path,
    tracing_telemetry::init_tracing,
};
use opts::CliArgs;
use std::io;
use tracing::{error, info};

mod opts;

fn main() -> Result<()> {
    let opts = CliArgs::parse();
    init_tracing(opts.fmt_style(), opts.ansi_colours(), opts.verbose());

    upgrade(&opts).map_err(|error| {
        error!(%error, "Failed to upgrade Helm release");
        error
    })
}

/// This function handles the following tasks -- 1. Merging the configuration file into the
/// command line arguments, 2. Validating the helm binary, 3. Running the upgrade.
fn upgrade(opts: &CliArgs) -> Result<()> {
    let file = match opts.config() {
        Some(path) => ConfigFile::from_path(path)?,
        None => ConfigFile::default(),
    };

    let (builder, upgrade) = opts.resolve(&file)?;
    let config = builder
        .with_stdout(Sink::new(io::stdout()))
        .with_stderr(Sink::new(io::stderr()))
        .build()?;

    if !opts.skip_preflight_validation() {
        validate_helmv3_in_path(config.command_factory().as_ref())?;
        info!("Validated helm v3 in $PATH");
    }

    upgrade.execute(&config)?;
    info!(
        release = upgrade.release(),
        chart = upgrade.chart(),
        "Upgraded Helm release"
    );

    Ok(())
}

use clap::{ArgAction, Parser};
use helm_upgrade::{
    config::{Config, ConfigBuilder, ConfigFile},
    constant::DEFAULT_KUBECONFIG_PATH,
    error::{HomeDirAbsent, MissingUpgradeInput, Result},
    tracing_telemetry::FmtStyle,
    upgrade::Upgrade,
};
use std::path::{Path, PathBuf};

/// These are the supported cli configuration options for the upgrade.
#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"), version)]
#[command(about = "Installs or upgrades a Helm release", long_about = None)]
pub(crate) struct CliArgs {
    /// This is the name of the Helm release.
    #[arg(long)]
    release: Option<String>,

    /// This is the Helm chart to install or upgrade to, e.g. repo/chart or a chart directory.
    #[arg(long)]
    chart: Option<String>,

    /// This is the kubeconfig filepath. Defaults to $HOME/.kube/config. Path lists, as
    /// $KUBECONFIG may hold, are rejected because helm takes a single file here.
    #[arg(
        long = "kubeconfig",
        env = "KUBECONFIG",
        value_name = "PATH",
        value_parser = single_kube_config
    )]
    kube_config: Option<String>,

    /// This is the Kubernetes Namespace for the Helm release.
    #[arg(short, long, env = "HELM_NAMESPACE")]
    namespace: Option<String>,

    /// Enable helm's verbose output and echo the generated helm command.
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Log at debug level. RUST_LOG takes precedence.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// This is a yaml file with defaults for kubeconfig, namespace, debug, chart and release.
    #[arg(long, value_name = "FILE_PATH")]
    config: Option<PathBuf>,

    /// If set then this skips the check for a helm v3 binary in $PATH.
    #[arg(long, default_value_t = false)]
    skip_preflight_validation: bool,

    /// Formatting style to be used while logging.
    #[arg(value_enum, default_value_t = FmtStyle::Pretty, short, long)]
    fmt_style: FmtStyle,

    /// Use ANSI colors for the logs.
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    ansi_colors: bool,
}

impl CliArgs {
    /// This returns the configuration file path, if any.
    pub(crate) fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// This returns true if debug level logs were requested.
    pub(crate) fn verbose(&self) -> bool {
        self.verbose
    }

    /// This decides to skip the helm binary validation or not.
    pub(crate) fn skip_preflight_validation(&self) -> bool {
        self.skip_preflight_validation
    }

    /// This returns formatting style to be used.
    pub(crate) fn fmt_style(&self) -> FmtStyle {
        self.fmt_style
    }

    /// This returns ansi_colours arg.
    pub(crate) fn ansi_colours(&self) -> bool {
        self.ansi_colors
    }

    /// Merges the command line with the configuration file into a config builder and the
    /// upgrade request. Command line values win.
    pub(crate) fn resolve(&self, file: &ConfigFile) -> Result<(ConfigBuilder, Upgrade)> {
        let release = pick(self.release.as_deref(), file.release())
            .ok_or(MissingUpgradeInput { name: "release" }.build())?;
        let chart = pick(self.chart.as_deref(), file.chart())
            .ok_or(MissingUpgradeInput { name: "chart" }.build())?;

        let kube_config = match pick(self.kube_config.as_deref(), file.kube_config()) {
            Some(path) => path.to_string(),
            None => default_kube_config()?,
        };

        let mut builder = Config::builder()
            .with_kube_config(kube_config)
            .with_debug(self.debug || file.debug().unwrap_or_default());

        if let Some(ns) = pick(self.namespace.as_deref(), file.namespace()) {
            builder = builder.with_namespace(ns);
        }

        Ok((builder, Upgrade::new(chart, release)))
    }
}

/// The first value which is set.
fn pick<'a>(cli: Option<&'a str>, file: Option<&'a str>) -> Option<&'a str> {
    cli.or(file)
}

/// Accepts a single kubeconfig filepath, not a list of them.
fn single_kube_config(value: &str) -> std::result::Result<String, String> {
    if std::env::split_paths(value).count() > 1 {
        return Err(format!(
            "'{value}' is a list of kubeconfig files, helm takes a single file"
        ));
    }
    Ok(value.to_string())
}

/// $HOME/.kube/config
fn default_kube_config() -> Result<String> {
    let home = std::env::var_os("HOME").ok_or(HomeDirAbsent.build())?;
    Ok(PathBuf::from(home)
        .join(DEFAULT_KUBECONFIG_PATH)
        .to_string_lossy()
        .to_string())
}

use tracing_subscriber::EnvFilter;

/// Formatting style of the log lines.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FmtStyle {
    /// Multi-line, human readable.
    #[default]
    Pretty,
    /// Single-line, human readable.
    Compact,
    /// Newline delimited json.
    Json,
}

/// Installs the global tracing subscriber, which writes to stderr. RUST_LOG overrides the
/// default level, which is 'debug' if verbose is set and 'info' otherwise. This is independent
/// of helm's --debug.
pub fn init_tracing(style: FmtStyle, ansi_colours: bool, verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi_colours)
        .with_writer(std::io::stderr);

    match style {
        FmtStyle::Pretty => builder.pretty().init(),
        FmtStyle::Compact => builder.compact().init(),
        FmtStyle::Json => builder.json().init(),
    }
}

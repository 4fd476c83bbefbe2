use snafu::Snafu;
use std::{path::PathBuf, process::ExitStatus};

/// For use with multiple fallible operations which may fail for different reasons, but are
/// defined withing the same scope and must return to the outer scope (calling scope) using
/// the try operator -- '?'.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[snafu(context(suffix(false)))]
pub enum Error {
    /// Error for when a Helm command could not be spawned or waited on.
    #[snafu(display(
        "Failed to run Helm command,\ncommand: {},\nargs: {:?},\ncommand_error: {}",
        command,
        args,
        source
    ))]
    HelmCommand {
        source: std::io::Error,
        command: String,
        args: Vec<String>,
    },

    /// Error for when a command exits with a non-zero exit status.
    #[snafu(display(
        "Command exited unsuccessfully,\ncommand: {},\nargs: {:?},\nstatus: {}",
        command,
        args,
        status
    ))]
    CommandExitStatus {
        command: String,
        args: Vec<String>,
        status: ExitStatus,
    },

    /// Error for when a child process' output stream could not be copied into its sink.
    #[snafu(display(
        "Failed to copy {} of command {} into its sink: {}",
        stream,
        command,
        source
    ))]
    StreamCopy {
        source: std::io::Error,
        command: String,
        stream: String,
    },

    /// Error for when the thread copying a child process' output stream panicked.
    #[snafu(display("Thread copying {} of command {} panicked", stream, command))]
    StreamCopyThread { command: String, stream: String },

    /// Error for when the upgrade configuration is built without a kubeconfig filepath.
    #[snafu(display("No kubeconfig filepath was set for the upgrade configuration"))]
    KubeConfigAbsent,

    /// Error for when the default kubeconfig filepath cannot be derived.
    #[snafu(display("Failed to derive the default kubeconfig filepath: $HOME is not set"))]
    HomeDirAbsent,

    /// Error for when a required upgrade input is missing from both the command line and the
    /// configuration file.
    #[snafu(display(
        "No value for '{}' was found on the command line or in the configuration file",
        name
    ))]
    MissingUpgradeInput { name: String },

    /// Error for when a std::str::Utf8Error is generated.
    #[snafu(display("Failed to convert byte slice to string: {}", source))]
    U8VectorToString { source: std::str::Utf8Error },

    /// Error for when regular expression parsing or compilation fails.
    #[snafu(display("Failed to compile regex {}: {}", expression, source))]
    RegexCompile {
        source: regex::Error,
        expression: String,
    },

    /// Error for when Helm v3.x.y is not present in $PATH.
    #[snafu(display("Helm version {} does not start with 'v3.x.y'", version))]
    HelmVersion { version: String },

    /// Error for when reading a file fails.
    #[snafu(display("Failed to read file {}: {}", filepath.display(), source))]
    ReadingFile {
        source: std::io::Error,
        filepath: PathBuf,
    },

    /// Error for when yaml could not be parsed from a file.
    #[snafu(display("Failed to parse YAML at {}: {}", filepath.display(), source))]
    YamlParseFromFile {
        source: serde_yaml::Error,
        filepath: PathBuf,
    },
}

/// A wrapper type to remove repeated Result<T, Error> returns.
pub type Result<T, E = Error> = std::result::Result<T, E>;

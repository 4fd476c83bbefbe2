use crate::{
    command::CommandFactory,
    config::Sink,
    constant::HELM_BIN,
    error::{HelmVersion, RegexCompile, Result, U8VectorToString},
    vec_to_strings,
};
use regex::Regex;
use snafu::ResultExt;
use std::{
    str,
    sync::{Arc, Mutex, PoisonError},
};
use tracing::debug;

/// Validate that the helm v3 binary is present in the shell's $PATH.
pub fn validate_helmv3_in_path(factory: &dyn CommandFactory) -> Result<()> {
    let args: Vec<String> = vec_to_strings!["version", "--short"];

    debug!(command = HELM_BIN, ?args, "Helm version command");

    // Execute `helm version` to verify if the binary exists.
    let stdout = Arc::new(Mutex::new(Vec::<u8>::new()));
    let mut command = factory.command(HELM_BIN, args);
    command.stdout(Sink::from_shared(stdout.clone()));
    command.run()?;

    let output = stdout
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    let stdout_str = str::from_utf8(output.as_slice()).context(U8VectorToString)?;
    debug!(stdout=%stdout_str, "Helm version command standard output");

    // Parse based on regex, to validate if the version string (semver) is v3.x.
    let regex: &str = r"^(v3\.[0-9]+\.[0-9])";
    if !Regex::new(regex)
        .context(RegexCompile {
            expression: regex.to_string(),
        })?
        .is_match(stdout_str)
    {
        return HelmVersion {
            version: stdout_str.trim().to_string(),
        }
        .fail();
    }

    Ok(())
}

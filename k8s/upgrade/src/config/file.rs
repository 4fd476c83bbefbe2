use crate::error::{ReadingFile, Result, YamlParseFromFile};
use serde::Deserialize;
use snafu::ResultExt;
use std::{fs, path::Path};
use tracing::debug;

/// This struct is used to deserialize the optional yaml configuration file. Every key is
/// optional, values from the command line take precedence over the ones in the file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(rename = "kubeconfig")]
    kube_config: Option<String>,
    namespace: Option<String>,
    debug: Option<bool>,
    chart: Option<String>,
    release: Option<String>,
}

impl ConfigFile {
    /// Reads and parses the yaml file at the given path.
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let filepath = path.as_ref().to_path_buf();
        let contents = fs::read(filepath.as_path()).context(ReadingFile {
            filepath: filepath.clone(),
        })?;

        let file: Self =
            serde_yaml::from_slice(contents.as_slice()).context(YamlParseFromFile {
                filepath: filepath.clone(),
            })?;
        debug!(filepath = %filepath.display(), ?file, "Parsed configuration file");

        Ok(file)
    }

    /// The kubeconfig filepath.
    pub fn kube_config(&self) -> Option<&str> {
        self.kube_config.as_deref()
    }

    /// The Namespace of the helm release.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The debug toggle.
    pub fn debug(&self) -> Option<bool> {
        self.debug
    }

    /// The chart to install or upgrade to.
    pub fn chart(&self) -> Option<&str> {
        self.chart.as_deref()
    }

    /// The helm release name.
    pub fn release(&self) -> Option<&str> {
        self.release.as_deref()
    }
}

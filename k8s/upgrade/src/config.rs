use crate::{
    command::{CommandFactory, ProcessCommandFactory},
    error::{KubeConfigAbsent, Result},
};
use std::{fmt, sync::Arc};

/// Contains the yaml configuration file.
pub mod file;
/// Contains the shared output stream handle.
pub mod sink;

pub use file::ConfigFile;
pub use sink::Sink;

/// This is a builder for the upgrade Config.
#[derive(Default)]
pub struct ConfigBuilder {
    namespace: Option<String>,
    kube_config: Option<String>,
    debug: bool,
    stdout: Option<Sink>,
    stderr: Option<Sink>,
    command_factory: Option<Arc<dyn CommandFactory>>,
}

impl ConfigBuilder {
    /// This is a builder option to add the Namespace of the helm release.
    #[must_use]
    pub fn with_namespace<J>(mut self, ns: J) -> Self
    where
        J: ToString,
    {
        self.namespace = Some(ns.to_string());
        self
    }

    /// This is a builder option to add the kubeconfig filepath. This is mandatory.
    #[must_use]
    pub fn with_kube_config<J>(mut self, kube_config: J) -> Self
    where
        J: ToString,
    {
        self.kube_config = Some(kube_config.to_string());
        self
    }

    /// This enables helm's debug output and the echo of the generated command.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// This sets the sink for the standard output of helm.
    #[must_use]
    pub fn with_stdout(mut self, sink: Sink) -> Self {
        self.stdout = Some(sink);
        self
    }

    /// This sets the sink for the standard error of helm.
    #[must_use]
    pub fn with_stderr(mut self, sink: Sink) -> Self {
        self.stderr = Some(sink);
        self
    }

    /// This replaces the default process-backed command factory.
    #[must_use]
    pub fn with_command_factory<F>(mut self, factory: F) -> Self
    where
        F: CommandFactory + 'static,
    {
        self.command_factory = Some(Arc::new(factory));
        self
    }

    /// Build the Config.
    pub fn build(self) -> Result<Config> {
        let kube_config = self.kube_config.ok_or(KubeConfigAbsent.build())?;

        Ok(Config {
            namespace: self.namespace,
            kube_config,
            debug: self.debug,
            stdout: self.stdout,
            stderr: self.stderr,
            command_factory: self
                .command_factory
                .unwrap_or_else(|| Arc::new(ProcessCommandFactory) as Arc<dyn CommandFactory>),
        })
    }
}

/// Caller supplied options for an upgrade. This is read-only once built.
#[derive(Clone)]
pub struct Config {
    namespace: Option<String>,
    kube_config: String,
    debug: bool,
    stdout: Option<Sink>,
    stderr: Option<Sink>,
    command_factory: Arc<dyn CommandFactory>,
}

impl Config {
    /// This creates an empty builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The Namespace of the helm release, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The kubeconfig filepath.
    pub fn kube_config(&self) -> &str {
        self.kube_config.as_str()
    }

    /// Is debug output enabled.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// The sink for the standard output of helm.
    pub fn stdout(&self) -> Option<&Sink> {
        self.stdout.as_ref()
    }

    /// The sink for the standard error of helm, also used for the generated command echo.
    pub fn stderr(&self) -> Option<&Sink> {
        self.stderr.as_ref()
    }

    /// The factory for runnable commands.
    pub fn command_factory(&self) -> &Arc<dyn CommandFactory> {
        &self.command_factory
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("namespace", &self.namespace)
            .field("kube_config", &self.kube_config)
            .field("debug", &self.debug)
            .field("stdout", &self.stdout)
            .field("stderr", &self.stderr)
            .finish_non_exhaustive()
    }
}

use crate::{
    command::HelmCommand,
    config::Config,
    constant::{GENERATED_COMMAND_PREFIX, HELM_BIN},
    error::Result,
    vec_to_strings,
};
use std::io::Write;
use tracing::{trace, warn};

/// A request to install the chart as the release, or to upgrade the release to the chart if
/// it is already installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upgrade {
    chart: String,
    release: String,
}

impl Upgrade {
    /// Creates an upgrade request. Neither value is validated, helm does that.
    pub fn new<C, R>(chart: C, release: R) -> Self
    where
        C: ToString,
        R: ToString,
    {
        Self {
            chart: chart.to_string(),
            release: release.to_string(),
        }
    }

    /// The chart reference, e.g. a repo/chart name, a chart directory or an archive.
    pub fn chart(&self) -> &str {
        self.chart.as_str()
    }

    /// The helm release name.
    pub fn release(&self) -> &str {
        self.release.as_str()
    }

    /// Arguments for
    /// `helm [--debug] --kubeconfig <path> [--namespace <ns>] upgrade --install <release> <chart>`.
    pub fn args(&self, cfg: &Config) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();

        if cfg.debug() {
            args.push("--debug".to_string());
        }

        args.extend(vec_to_strings!["--kubeconfig", cfg.kube_config()]);

        if let Some(ns) = cfg.namespace().filter(|ns| !ns.is_empty()) {
            args.extend(vec_to_strings!["--namespace", ns]);
        }

        args.extend(vec_to_strings!["upgrade", "--install", self.release, self.chart]);

        args
    }

    /// Builds the helm command with the configured sinks attached. If debug is enabled, the
    /// command line is echoed to the stderr sink.
    pub fn prepare(&self, cfg: &Config) -> PreparedUpgrade {
        let args = self.args(cfg);
        trace!(command = HELM_BIN, ?args, "Helm upgrade command");

        let mut command = cfg.command_factory().command(HELM_BIN, args);

        if let Some(sink) = cfg.stdout() {
            command.stdout(sink.clone());
        }
        if let Some(sink) = cfg.stderr() {
            command.stderr(sink.clone());
        }

        if cfg.debug() {
            if let Some(mut sink) = cfg.stderr().cloned() {
                let line = format!("{GENERATED_COMMAND_PREFIX}: '{command}'\n");
                if let Err(error) = sink.write_all(line.as_bytes()) {
                    warn!(%error, "Failed to echo the generated helm command");
                }
            }
        }

        PreparedUpgrade { command }
    }

    /// Runs `helm upgrade --install` and blocks until helm exits.
    pub fn execute(&self, cfg: &Config) -> Result<()> {
        self.prepare(cfg).run()
    }
}

/// A helm command which is ready to run.
pub struct PreparedUpgrade {
    command: Box<dyn HelmCommand>,
}

impl PreparedUpgrade {
    /// The rendered command line.
    pub fn command_line(&self) -> String {
        self.command.to_string()
    }

    /// Runs the command. Errors are returned as they come from the command.
    pub fn run(mut self) -> Result<()> {
        self.command.run()
    }
}

#[cfg(test)]
mod tests {
    use super::Upgrade;
    use crate::{
        command::{CommandFactory, HelmCommand},
        config::{Config, Sink},
        constant::HELM_BIN,
        error::{Error, HelmCommand as HelmCommandError, Result},
        vec_to_strings,
    };
    use snafu::IntoError;
    use std::{
        fmt, io,
        sync::{Arc, Mutex},
    };

    /// Calls seen by a FakeCommand, in order.
    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Command { path: String, args: Vec<String> },
        Stdout,
        Stderr,
        Run,
    }

    #[derive(Clone, Default)]
    struct FakeFactory {
        calls: Arc<Mutex<Vec<Call>>>,
        fail_run: bool,
    }

    impl FakeFactory {
        fn failing() -> Self {
            Self {
                fail_run: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    struct FakeCommand {
        path: String,
        args: Vec<String>,
        calls: Arc<Mutex<Vec<Call>>>,
        fail_run: bool,
    }

    impl fmt::Display for FakeCommand {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} {}", self.path, self.args.join(" "))
        }
    }

    impl HelmCommand for FakeCommand {
        fn stdout(&mut self, _sink: Sink) {
            self.calls.lock().unwrap().push(Call::Stdout);
        }

        fn stderr(&mut self, _sink: Sink) {
            self.calls.lock().unwrap().push(Call::Stderr);
        }

        fn run(&mut self) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Run);
            if self.fail_run {
                return Err(HelmCommandError {
                    command: self.path.as_str(),
                    args: self.args.clone(),
                }
                .into_error(io::Error::new(io::ErrorKind::NotFound, "helm not in PATH")));
            }
            Ok(())
        }
    }

    impl CommandFactory for FakeFactory {
        fn command(&self, path: &str, args: Vec<String>) -> Box<dyn HelmCommand> {
            self.calls.lock().unwrap().push(Call::Command {
                path: path.to_string(),
                args: args.clone(),
            });
            Box::new(FakeCommand {
                path: path.to_string(),
                args,
                calls: self.calls.clone(),
                fail_run: self.fail_run,
            })
        }
    }

    fn shared_buffer() -> (Arc<Mutex<Vec<u8>>>, Sink) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = Sink::from_shared(buffer.clone());
        (buffer, sink)
    }

    fn contents(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn test_prepare() {
        let factory = FakeFactory::default();
        let (_, stdout) = shared_buffer();
        let (_, stderr) = shared_buffer();
        let cfg = Config::builder()
            .with_kube_config("/root/.kube/config")
            .with_stdout(stdout)
            .with_stderr(stderr)
            .with_command_factory(factory.clone())
            .build()
            .unwrap();
        let upgrade = Upgrade::new("at40", "jonas_brothers_only_human");

        upgrade.execute(&cfg).unwrap();

        assert_eq!(
            factory.calls(),
            vec![
                Call::Command {
                    path: HELM_BIN.to_string(),
                    args: vec_to_strings![
                        "--kubeconfig",
                        "/root/.kube/config",
                        "upgrade",
                        "--install",
                        "jonas_brothers_only_human",
                        "at40"
                    ],
                },
                Call::Stdout,
                Call::Stderr,
                Call::Run,
            ]
        );
    }

    #[test]
    fn test_prepare_namespace_flag() {
        let factory = FakeFactory::default();
        let cfg = Config::builder()
            .with_namespace("melt")
            .with_kube_config("/root/.kube/config")
            .with_command_factory(factory.clone())
            .build()
            .unwrap();
        let upgrade = Upgrade::new("at40", "shaed_trampoline");

        upgrade.execute(&cfg).unwrap();

        assert_eq!(
            factory.calls(),
            vec![
                Call::Command {
                    path: HELM_BIN.to_string(),
                    args: vec_to_strings![
                        "--kubeconfig",
                        "/root/.kube/config",
                        "--namespace",
                        "melt",
                        "upgrade",
                        "--install",
                        "shaed_trampoline",
                        "at40"
                    ],
                },
                Call::Run,
            ]
        );
    }

    #[test]
    fn test_prepare_debug_flag() {
        let factory = FakeFactory::default();
        let (stdout_buffer, stdout) = shared_buffer();
        let (stderr_buffer, stderr) = shared_buffer();
        let cfg = Config::builder()
            .with_debug(true)
            .with_kube_config("/root/.kube/config")
            .with_stdout(stdout)
            .with_stderr(stderr)
            .with_command_factory(factory.clone())
            .build()
            .unwrap();
        let upgrade = Upgrade::new("at40", "lewis_capaldi_someone_you_loved");

        let prepared = upgrade.prepare(&cfg);

        let want = format!(
            "Generated command: '{HELM_BIN} --debug --kubeconfig /root/.kube/config upgrade \
             --install lewis_capaldi_someone_you_loved at40'\n"
        );
        assert_eq!(contents(&stderr_buffer), want);
        assert_eq!(contents(&stdout_buffer), "");
        // Nothing has run yet.
        assert!(!factory.calls().contains(&Call::Run));

        prepared.run().unwrap();
        assert_eq!(contents(&stderr_buffer), want);
    }

    #[test]
    fn debug_without_stderr_sink_drops_the_echo() {
        let factory = FakeFactory::default();
        let (stdout_buffer, stdout) = shared_buffer();
        let cfg = Config::builder()
            .with_debug(true)
            .with_kube_config("/root/.kube/config")
            .with_stdout(stdout)
            .with_command_factory(factory.clone())
            .build()
            .unwrap();

        Upgrade::new("at40", "mabel_dont_call_me").execute(&cfg).unwrap();

        assert_eq!(contents(&stdout_buffer), "");
        assert_eq!(factory.calls().last(), Some(&Call::Run));
    }

    #[test]
    fn debug_flag_comes_first() {
        let cfg = Config::builder()
            .with_debug(true)
            .with_namespace("melt")
            .with_kube_config("/root/.kube/config")
            .with_command_factory(FakeFactory::default())
            .build()
            .unwrap();

        let args = Upgrade::new("at40", "sam_smith_dancing_with_a_stranger").args(&cfg);

        assert_eq!(
            args,
            vec_to_strings![
                "--debug",
                "--kubeconfig",
                "/root/.kube/config",
                "--namespace",
                "melt",
                "upgrade",
                "--install",
                "sam_smith_dancing_with_a_stranger",
                "at40"
            ]
        );
    }

    #[test]
    fn empty_values_pass_through() {
        let cfg = Config::builder()
            .with_namespace("")
            .with_kube_config("")
            .with_command_factory(FakeFactory::default())
            .build()
            .unwrap();

        let args = Upgrade::new("", "").args(&cfg);

        assert_eq!(
            args,
            vec_to_strings!["--kubeconfig", "", "upgrade", "--install", "", ""]
        );
    }

    #[test]
    fn args_are_deterministic() {
        let cfg = Config::builder()
            .with_debug(true)
            .with_namespace("melt")
            .with_kube_config("/root/.kube/config")
            .with_command_factory(FakeFactory::default())
            .build()
            .unwrap();
        let upgrade = Upgrade::new("at40", "shaed_trampoline");

        assert_eq!(upgrade.args(&cfg), upgrade.args(&cfg));
    }

    #[test]
    fn command_line_renders_the_prepared_command() {
        let cfg = Config::builder()
            .with_kube_config("/root/.kube/config")
            .with_command_factory(FakeFactory::default())
            .build()
            .unwrap();

        let prepared = Upgrade::new("at40", "shaed_trampoline").prepare(&cfg);

        assert_eq!(
            prepared.command_line(),
            format!(
                "{HELM_BIN} --kubeconfig /root/.kube/config upgrade --install shaed_trampoline at40"
            )
        );
    }

    #[test]
    fn run_failure_is_returned_unchanged() {
        let factory = FakeFactory::failing();
        let cfg = Config::builder()
            .with_kube_config("/root/.kube/config")
            .with_command_factory(factory.clone())
            .build()
            .unwrap();

        let result = Upgrade::new("at40", "shaed_trampoline").execute(&cfg);

        match result {
            Err(Error::HelmCommand {
                source,
                command,
                args,
            }) => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
                assert_eq!(source.to_string(), "helm not in PATH");
                assert_eq!(command, HELM_BIN);
                assert_eq!(args.last().map(String::as_str), Some("at40"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(factory.calls().last(), Some(&Call::Run));
    }
}

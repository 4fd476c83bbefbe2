use crate::{
    config::Sink,
    error::{
        CommandExitStatus, HelmCommand as HelmCommandError, Result, StreamCopy, StreamCopyThread,
    },
};
use snafu::{ensure, ResultExt};
use std::{
    fmt,
    io::{self, Read, Write},
    process::{Command, Stdio},
    thread::{self, JoinHandle},
};
use tracing::{debug, trace};

/// A runnable command bound to an executable and its arguments. The Display implementation
/// renders the command line as `<path> <args joined by single spaces>`.
pub trait HelmCommand: fmt::Display + Send {
    /// Sends the standard output of the command into the sink.
    fn stdout(&mut self, sink: Sink);

    /// Sends the standard error of the command into the sink.
    fn stderr(&mut self, sink: Sink);

    /// Runs the command and blocks until it exits. Non-zero exits are errors.
    fn run(&mut self) -> Result<()>;
}

/// Creates runnable commands. Swapping the factory replaces how commands are executed.
pub trait CommandFactory: Send + Sync {
    /// Binds a command to an executable path and its arguments.
    fn command(&self, path: &str, args: Vec<String>) -> Box<dyn HelmCommand>;
}

/// The default CommandFactory, which runs commands as child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessCommandFactory;

impl CommandFactory for ProcessCommandFactory {
    fn command(&self, path: &str, args: Vec<String>) -> Box<dyn HelmCommand> {
        Box::new(ProcessCommand::new(path, args))
    }
}

/// A command which runs as a child process. Output streams with a sink are piped into it,
/// the others are inherited from this process.
#[derive(Debug)]
pub struct ProcessCommand {
    path: String,
    args: Vec<String>,
    stdout: Option<Sink>,
    stderr: Option<Sink>,
}

impl ProcessCommand {
    /// Binds a command to the executable and its arguments.
    pub fn new<P>(path: P, args: Vec<String>) -> Self
    where
        P: ToString,
    {
        Self {
            path: path.to_string(),
            args,
            stdout: None,
            stderr: None,
        }
    }

    /// Waits for a stream copying thread, if there is one.
    fn join_forwarder(
        &self,
        forwarder: Option<JoinHandle<io::Result<u64>>>,
        stream: &str,
    ) -> Result<()> {
        let Some(handle) = forwarder else {
            return Ok(());
        };

        let copied = handle
            .join()
            .map_err(|_| {
                StreamCopyThread {
                    command: self.path.as_str(),
                    stream,
                }
                .build()
            })?
            .context(StreamCopy {
                command: self.path.as_str(),
                stream,
            })?;
        debug!(command = %self.path, stream, bytes = copied, "Forwarded command output");

        Ok(())
    }
}

impl fmt::Display for ProcessCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            return write!(f, "{}", self.path);
        }
        write!(f, "{} {}", self.path, self.args.join(" "))
    }
}

impl HelmCommand for ProcessCommand {
    fn stdout(&mut self, sink: Sink) {
        self.stdout = Some(sink);
    }

    fn stderr(&mut self, sink: Sink) {
        self.stderr = Some(sink);
    }

    fn run(&mut self) -> Result<()> {
        let command = self.path.as_str();
        trace!(%command, args = ?self.args, "Running command");

        let mut process = Command::new(command);
        process.args(self.args.as_slice());
        if self.stdout.is_some() {
            process.stdout(Stdio::piped());
        }
        if self.stderr.is_some() {
            process.stderr(Stdio::piped());
        }

        let mut child = process.spawn().context(HelmCommandError {
            command,
            args: self.args.clone(),
        })?;

        let stdout_forwarder = forward(child.stdout.take(), self.stdout.clone());
        let stderr_forwarder = forward(child.stderr.take(), self.stderr.clone());

        let waited = child.wait().context(HelmCommandError {
            command,
            args: self.args.clone(),
        });

        // Both forwarders are joined before any error is returned.
        let stdout_forwarded = self.join_forwarder(stdout_forwarder, "stdout");
        let stderr_forwarded = self.join_forwarder(stderr_forwarder, "stderr");

        let status = waited?;
        stdout_forwarded?;
        stderr_forwarded?;

        debug!(%command, %status, "Command exited");
        ensure!(
            status.success(),
            CommandExitStatus {
                command,
                args: self.args.clone(),
                status
            }
        );

        Ok(())
    }
}

/// Copies a piped child stream into its sink on a separate thread, until the stream is closed.
fn forward<R>(reader: Option<R>, sink: Option<Sink>) -> Option<JoinHandle<io::Result<u64>>>
where
    R: Read + Send + 'static,
{
    let (mut reader, mut sink) = reader.zip(sink)?;

    Some(thread::spawn(move || {
        let copied = io::copy(&mut reader, &mut sink)?;
        sink.flush()?;
        Ok(copied)
    }))
}

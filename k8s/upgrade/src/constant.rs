/// This is the name of the Helm executable. It is looked up in $PATH when the command is run.
pub const HELM_BIN: &str = "helm";

/// This is the kubeconfig filepath, relative to $HOME, which is used when none is specified.
pub const DEFAULT_KUBECONFIG_PATH: &str = ".kube/config";

/// Prefix of the line which echoes the helm command when debug output is enabled.
pub(crate) const GENERATED_COMMAND_PREFIX: &str = "Generated command";

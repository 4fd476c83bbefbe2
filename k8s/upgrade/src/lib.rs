//! Installs or upgrades a Helm release by composing a `helm upgrade --install` command line from
//! a [`config::Config`] and an [`upgrade::Upgrade`] request, and handing it to a
//! [`command::CommandFactory`] for execution.

/// Module for the command capability and its process-backed implementation.
pub mod command;
/// Module for shared helpers.
pub(crate) mod common;
/// Module for upgrade related constants.
pub mod constant;
/// Module for the upgrade configuration, its output sinks and the yaml configuration file.
pub mod config;
/// Module for errors.
pub mod error;
/// Validations before running the upgrade.
pub mod preflight_validations;
/// Module for logging setup.
pub mod tracing_telemetry;
/// Module for the upgrade request and its argument builder.
pub mod upgrade;

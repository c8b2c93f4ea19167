//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--json, --color, --verbose, --config) are inherited by all subcommands
//! - Flags left unset fall back to the layered configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ColorMode;
use crate::domain::value_objects::Namespace;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl From<ColorWhen> for ColorMode {
    fn from(value: ColorWhen) -> Self {
        match value {
            ColorWhen::Auto => ColorMode::Auto,
            ColorWhen::Always => ColorMode::Always,
            ColorWhen::Never => ColorMode::Never,
        }
    }
}

/// kdeploy - ordered, readiness-gated Kubernetes rollouts
#[derive(Parser, Debug)]
#[command(name = "kdeploy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events on stdout instead of console progress
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ./kdeploy.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Target namespace and its rendered manifests
#[derive(clap::Args, Debug, Clone)]
pub struct TargetArgs {
    /// Kubeconfig file used for every kubectl call
    #[arg(short, long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Namespace to deploy into
    #[arg(short, long, value_parser = parse_namespace)]
    pub namespace: Namespace,

    /// Root of the rendered manifest tree
    #[arg(short, long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drain jobs, apply every resource group in order, then prune drift
    Deploy {
        #[command(flatten)]
        target: TargetArgs,

        /// Fail on kubectl client/server version skew
        #[arg(long)]
        version_checks: bool,

        /// Report orphans at the end instead of deleting them
        #[arg(long)]
        prune_dry_run: bool,
    },

    /// Delete resources no manifest declares
    Prune {
        #[command(flatten)]
        target: TargetArgs,

        /// Report orphans without deleting them
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the resources declared by the manifest tree (no cluster access)
    Inventory {
        /// Root of the rendered manifest tree
        #[arg(short, long, value_name = "DIR")]
        template_dir: Option<PathBuf>,
    },
}

fn parse_namespace(value: &str) -> Result<Namespace, String> {
    Namespace::parse(value).map_err(|e| e.to_string())
}

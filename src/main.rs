//! kdeploy CLI - ordered, readiness-gated Kubernetes rollouts
//!
//! Usage: kdeploy <COMMAND>
//!
//! Commands:
//!   deploy     Drain jobs, apply every resource group in order, then prune drift
//!   prune      Delete resources no manifest declares
//!   inventory  Print the resources declared by the manifest tree

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kdeploy::application::validation;
use kdeploy::config::{ColorMode, Config, OutputFormat};
use kdeploy::domain::ports::NoopEventSink;
use kdeploy::presentation::cli::{Cli, Commands, TargetArgs};
use kdeploy::presentation::{
    create_deploy_use_case, create_event_sink, create_renderer, ReportRenderer,
};
use kdeploy::ui::{detect_capabilities, TerminalCapabilities};
use kdeploy::DeployOptions;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = match Settings::resolve(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            let renderer = create_renderer(cli.json, detect_capabilities(ColorMode::Auto));
            report_error(&err, renderer.as_ref(), cli.json);
            return ExitCode::FAILURE;
        }
    };

    let json = settings.json();
    let renderer = create_renderer(json, settings.caps);
    match run(cli, &settings, renderer.as_ref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, renderer.as_ref(), json);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` / `-vv` raise the default from warn.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "kdeploy=info,warn",
        _ => "kdeploy=debug,info",
    };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// JSON errors join the event stream on stdout; text errors go to stderr.
fn report_error(err: &anyhow::Error, renderer: &dyn ReportRenderer, json: bool) {
    let line = renderer.render_error(&format!("{:#}", err));
    if json {
        println!("{}", line);
    } else {
        eprintln!("{}", line);
    }
}

/// Configuration after CLI flags are applied
struct Settings {
    config: Config,
    caps: TerminalCapabilities,
}

impl Settings {
    fn resolve(cli: &Cli) -> Result<Self> {
        let (mut config, warnings) = Config::load_layered(cli.config.as_deref())?;
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        if cli.json {
            config.output.format = OutputFormat::Json;
        }
        if let Some(color) = cli.color {
            config.output.color = color.into();
        }
        let caps = detect_capabilities(config.output.color);
        Ok(Self { config, caps })
    }

    fn json(&self) -> bool {
        self.config.output.format == OutputFormat::Json
    }

    fn template_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.unwrap_or_else(|| self.config.deploy.template_dir.clone())
    }

    fn kubeconfig(&self, target: &TargetArgs) -> Option<PathBuf> {
        target
            .kubeconfig
            .clone()
            .or_else(|| self.config.kubectl.kubeconfig.clone())
    }
}

fn run(cli: Cli, settings: &Settings, renderer: &dyn ReportRenderer) -> Result<()> {

    match cli.command {
        Commands::Deploy {
            target,
            version_checks,
            prune_dry_run,
        } => {
            let kubeconfig = settings.kubeconfig(&target);
            let events = create_event_sink(settings.config.output.format, settings.caps, "deploy");
            let use_case =
                create_deploy_use_case(&settings.config.kubectl.binary, kubeconfig.clone(), events);

            let mut options =
                DeployOptions::new(target.namespace.clone(), settings.template_dir(target.template_dir))
                    .with_version_checks(version_checks || settings.config.deploy.version_checks)
                    .with_prune_dry_run(prune_dry_run);
            if let Some(kubeconfig) = kubeconfig {
                options = options.with_kubeconfig(kubeconfig);
            }

            let report = use_case.execute(&options)?;
            println!("{}", renderer.render_deploy(&report, &target.namespace));
        }

        Commands::Prune { target, dry_run } => {
            let kubeconfig = settings.kubeconfig(&target);
            validation::validate_kubeconfig(kubeconfig.as_deref())?;

            let events = create_event_sink(settings.config.output.format, settings.caps, "prune");
            let use_case = create_deploy_use_case(&settings.config.kubectl.binary, kubeconfig, events);

            let template_dir = settings.template_dir(target.template_dir);
            let report = use_case.prune(&target.namespace, &template_dir, dry_run)?;
            println!("{}", renderer.render_prune(&report, &target.namespace));
        }

        Commands::Inventory { template_dir } => {
            let template_dir = settings.template_dir(template_dir);
            if !template_dir.is_dir() {
                bail!("template directory does not exist: {}", template_dir.display());
            }

            let use_case =
                create_deploy_use_case(&settings.config.kubectl.binary, None, Arc::new(NoopEventSink));
            let inventory = use_case.desired_inventory(&template_dir)?;
            println!("{}", renderer.render_inventory(&inventory));
        }
    }

    Ok(())
}

//! kubev-install - installer for the kubev release binary
//!
//! Resolves a release, downloads and verifies it, and installs the binary
//! into `INSTALL_DIR`. Logs go to stderr; the exit status is 0 on success,
//! 1 on failure, and 128 + the signal number when stopped by SIGINT, SIGTERM
//! or SIGHUP.

mod cli;

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use kubev_install_core::{InstallPlan, Installer, InstallerConfig, ReleaseSource};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

/// Signals that stop a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shutdown {
    Interrupt,
    Terminate,
    Hangup,
}

impl Shutdown {
    fn name(self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
            Self::Hangup => "SIGHUP",
        }
    }

    /// Shell convention: 128 + signal number
    fn exit_code(self) -> u8 {
        match self {
            Self::Interrupt => 130,
            Self::Terminate => 143,
            Self::Hangup => 129,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let installer = match build_config(&cli).and_then(|config| Ok(Installer::new(config)?)) {
        Ok(installer) => installer,
        Err(err) => {
            error!("FATAL: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    // The losing future is dropped before the winning arm runs, so a signal
    // removes the workspace before the FATAL line is written.
    tokio::select! {
        result = run(&installer, cli.dry_run) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!(stage = %err.stage(), "FATAL: {}", err);
                ExitCode::FAILURE
            }
        },
        signal = shutdown_signal() => {
            error!("FATAL: received {}, installation aborted", signal.name());
            ExitCode::from(signal.exit_code())
        }
    }
}

/// Resolve once a stop signal arrives
#[cfg(unix)]
async fn shutdown_signal() -> Shutdown {
    use tokio::signal::unix::{signal, Signal, SignalKind};

    // A handler that could not be installed never fires.
    async fn recv(handler: std::io::Result<Signal>) -> Option<()> {
        match handler {
            Ok(mut handler) => handler.recv().await,
            Err(_) => std::future::pending().await,
        }
    }

    tokio::select! {
        Ok(()) = tokio::signal::ctrl_c() => Shutdown::Interrupt,
        Some(()) = recv(signal(SignalKind::terminate())) => Shutdown::Terminate,
        Some(()) = recv(signal(SignalKind::hangup())) => Shutdown::Hangup,
        else => std::future::pending().await,
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Shutdown {
    match tokio::signal::ctrl_c().await {
        Ok(()) => Shutdown::Interrupt,
        Err(_) => std::future::pending().await,
    }
}

async fn run(installer: &Installer, dry_run: bool) -> kubev_install_core::Result<()> {
    if dry_run {
        let plan = installer.plan().await?;
        log_plan(&plan);
        return Ok(());
    }

    installer.run().await.map(|_| ())
}

fn log_plan(plan: &InstallPlan) {
    info!("Dry run, nothing will be downloaded");
    info!("  version:  {} ({})", plan.version, plan.version.source);
    info!("  platform: {}", plan.platform);
    info!("  archive:  {}", plan.artifacts.archive_url);
    info!("  checksum: {}", plan.artifacts.manifest_url);
    info!("  target:   {}", plan.target.display());
}

/// Turn parsed arguments into an installer configuration
fn build_config(cli: &Cli) -> Result<InstallerConfig> {
    let install_dir = match &cli.install_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to determine current directory")?,
    };

    let mut source = ReleaseSource::default()
        .with_repo_slug(&cli.repo)
        .ok_or_else(|| anyhow!("invalid repository '{}', expected OWNER/NAME", cli.repo))?;
    if let Some(url) = &cli.api_url {
        source.api_url = url.clone();
    }
    if let Some(url) = &cli.download_url {
        source.download_url = url.clone();
    }

    Ok(InstallerConfig::new(install_dir)
        .with_source(source)
        .with_pinned_version(cli.version_tag.clone())
        .with_extra_tools(&cli.require)
        .with_github_token(cli.github_token.clone())
        .with_progress(!cli.no_progress && !cli.quiet))
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("info"),
                1 => EnvFilter::new("debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

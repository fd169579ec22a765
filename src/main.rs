use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use micromanager_setup::installer;
use micromanager_setup::smoke::RunMode;

/// Installer and configuration generator for the Micromanager POS camera edge stack
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Installation directory for the generated configuration
    #[arg(short, long, default_value = "/opt/micromanager")]
    install_dir: PathBuf,

    /// App-only smoke test: FIFO serial device, no companion services
    #[arg(long, conflicts_with = "full_smoke_test")]
    smoke_test: bool,

    /// Full-stack smoke test: FIFO serial device, all services
    #[arg(long)]
    full_smoke_test: bool,
}

impl Args {
    fn mode(&self) -> RunMode {
        if self.smoke_test {
            RunMode::SmokeTest
        } else if self.full_smoke_test {
            RunMode::FullSmokeTest
        } else {
            RunMode::Install
        }
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting Micromanager setup");
    info!("Installation directory: {:?}", args.install_dir);
    info!("Run mode: {:?}", args.mode());

    installer::run(args.mode(), &args.install_dir)?;

    info!("Setup completed successfully");
    Ok(())
}

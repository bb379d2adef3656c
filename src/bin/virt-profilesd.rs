//! virt-profilesd: HTTP daemon serving the profile catalogue and the
//! preset-merge endpoint.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use virt_profiles::config::ServiceConfig;
use virt_profiles::logging::init_logging;
use virt_profiles::server;

#[derive(Parser, Debug)]
#[command(name = "virt-profilesd")]
#[command(about = "Preset merge service for virtual machine domain specifications")]
struct Args {
    /// Interface to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding the profile catalogue
    #[arg(long)]
    profiles: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ServiceConfig::load(args.config.as_deref())?;

    // CLI flags override the file and environment layers
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(profiles) = args.profiles {
        config.profiles_dir = profiles;
    }
    config.validate()?;

    init_logging(&config.logging)?;

    info!(profiles_dir = %config.profiles_dir.display(), "profiles catalogue");
    info!(addr = %config.listen_address(), "starting virt-profilesd");

    server::run_server(&config).await?;

    Ok(())
}

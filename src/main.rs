use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use wifi_qr::{
    config::{self, Config},
    form, logging, server, AuthType, WifiCredentials,
};

#[derive(Parser)]
#[command(name = "wifi-qr")]
#[command(about = "Generate QR codes that join a WiFi network when scanned")]
#[command(version)]
struct Cli {
    /// Config file to use (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CredentialArgs {
    /// SSID of the network
    ssid: String,

    /// Password for the network
    #[arg(short, long, default_value = "")]
    password: String,

    /// Authentication type (WPA, WEP or nopass)
    #[arg(short, long, default_value = form::DEFAULT_AUTH)]
    auth: String,

    /// Mark the network as hidden
    #[arg(long)]
    hidden: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web interface
    Serve {
        /// Address to bind to
        #[arg(short, long)]
        bind: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Pixels per QR module
        #[arg(long)]
        box_size: Option<u32>,
    },

    /// Print the WIFI: payload for a network
    Payload {
        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Render a QR code PNG for a network
    Render {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Output file path (defaults to wifi_qr_<ssid>_<timestamp>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pixels per QR module
        #[arg(long)]
        box_size: Option<u32>,
    },

    /// Show the effective configuration
    ShowConfig,

    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => config::config_path()?,
    };

    match cli.command {
        Commands::Serve {
            bind,
            port,
            box_size,
        } => cmd_serve(&config_path, bind, port, box_size).await,
        Commands::Payload { credentials } => cmd_payload(credentials),
        Commands::Render {
            credentials,
            output,
            box_size,
        } => cmd_render(&config_path, credentials, output, box_size),
        Commands::ShowConfig => cmd_show_config(&config_path),
        Commands::InitConfig { force } => cmd_init_config(&config_path, force),
    }
}

impl CredentialArgs {
    fn into_credentials(self) -> Result<WifiCredentials> {
        let ssid = self.ssid.trim();
        if ssid.is_empty() {
            bail!("SSID must not be empty");
        }

        Ok(WifiCredentials {
            ssid: ssid.to_string(),
            password: self.password,
            auth: AuthType::from(self.auth.to_uppercase().as_str()),
            hidden: self.hidden,
        })
    }
}

fn load_config(path: &Path, box_size: Option<u32>) -> Result<Config> {
    let mut cfg = Config::load_from(path)?;
    if let Some(size) = box_size {
        cfg.qr.box_size = size;
    }
    cfg.validate()?;
    Ok(cfg)
}

async fn cmd_serve(
    config_path: &Path,
    bind: Option<String>,
    port: Option<u16>,
    box_size: Option<u32>,
) -> Result<()> {
    let mut cfg = load_config(config_path, box_size)?;
    if let Some(bind) = bind {
        cfg.server.bind = bind;
    }
    if let Some(port) = port {
        cfg.server.port = port;
    }
    cfg.validate()?;

    let config = server::ServerConfig {
        bind: cfg.server.bind.clone(),
        port: cfg.server.port,
        renderer: cfg.renderer(),
    };
    server::run_server(config).await
}

fn cmd_payload(credentials: CredentialArgs) -> Result<()> {
    let credentials = credentials.into_credentials()?;
    println!("{}", credentials.payload());
    Ok(())
}

fn cmd_render(
    config_path: &Path,
    credentials: CredentialArgs,
    output: Option<PathBuf>,
    box_size: Option<u32>,
) -> Result<()> {
    let cfg = load_config(config_path, box_size)?;
    let credentials = credentials.into_credentials()?;

    let png = cfg
        .renderer()
        .render_png(&credentials.payload())
        .context("Failed to render QR code")?;

    let output = output
        .unwrap_or_else(|| PathBuf::from(form::download_filename(&credentials.ssid, Utc::now())));
    std::fs::write(&output, png)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(ssid = %credentials.ssid, path = %output.display(), "wrote QR code");
    println!("Saved to {}", output.display());

    Ok(())
}

fn cmd_show_config(config_path: &Path) -> Result<()> {
    println!("Config file: {}", config_path.display());
    if !config_path.exists() {
        println!("(not found, using defaults)");
    }
    println!();

    let cfg = Config::load_from(config_path)?;

    println!("{:<20} {}", "SETTING", "VALUE");
    println!("{}", "-".repeat(40));
    println!("{:<20} {}", "server.bind", cfg.server.bind);
    println!("{:<20} {}", "server.port", cfg.server.port);
    println!("{:<20} {}", "qr.box_size", cfg.qr.box_size);
    println!("{:<20} {}", "qr.border", cfg.qr.border);
    println!("{:<20} {:?}", "qr.error_correction", cfg.qr.error_correction);

    Ok(())
}

fn cmd_init_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {} (use --force to overwrite)",
            config_path.display()
        );
    }

    Config::default().save_to(config_path)?;
    println!("Wrote default config to {}", config_path.display());

    Ok(())
}

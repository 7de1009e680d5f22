//! fileupload CLI - run the upload server or push a file to one
//!
//! ```bash
//! fileupload serve                        # Start HTTP server (port 8080)
//! fileupload serve --allow jpg --allow png --max-size 5242880
//! fileupload send photo.png               # POST to http://localhost:8080/upload
//! ```

use clap::{Parser, Subcommand};
use fileupload::{send_file, server::start_server, ServerConfig, DEFAULT_UPLOAD_URL, FAILURE_MESSAGE};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fileupload")]
#[command(about = "Single-file multipart upload server and client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on (default: UPLOAD_PORT or 8080)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory for stored uploads (default: UPLOAD_STORAGE_DIR)
        #[arg(short, long)]
        storage_dir: Option<PathBuf>,

        /// Maximum file size in bytes (default: UPLOAD_MAX_SIZE or 5 MiB)
        #[arg(long)]
        max_size: Option<u64>,

        /// Accepted file extension, repeatable (default: any)
        #[arg(long = "allow")]
        allow: Vec<String>,
    },

    /// Upload a file to a running server
    Send {
        /// File to upload
        file: PathBuf,

        /// Upload endpoint
        #[arg(short, long, default_value = DEFAULT_UPLOAD_URL)]
        url: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            port,
            storage_dir,
            max_size,
            allow,
        } => cmd_serve(port, storage_dir, max_size, allow).await,

        Commands::Send { file, url } => cmd_send(&file, &url).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(
    port: Option<u16>,
    storage_dir: Option<PathBuf>,
    max_size: Option<u64>,
    allow: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_env()?;

    if let Some(port) = port {
        config.port = port;
    }
    if let Some(dir) = storage_dir {
        config.storage_dir = dir;
    }
    if let Some(max_size) = max_size {
        config.policy.max_size = max_size;
    }
    if !allow.is_empty() {
        config.policy = config.policy.with_extensions(allow);
    }

    start_server(config).await
}

async fn cmd_send(file: &Path, url: &str) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📤 Uploading: {}", file.display());

    match send_file(url, file, |percent| eprintln!("   Upload Progress: {}%", percent)).await {
        Ok(response) => {
            println!("{}", response.message);
            if let Some(key) = response.key {
                eprintln!("   💾 Stored as: {} ({} bytes)", key, response.size);
            }
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, "upload failed");
            Err(FAILURE_MESSAGE.into())
        }
    }
}

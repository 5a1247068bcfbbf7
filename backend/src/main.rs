//! imagedrop CLI
//!
//! ```bash
//! imagedrop serve                        # Start HTTP server (port 3000)
//! imagedrop list                         # Show stored media, newest first
//! imagedrop migrate --bucket bs2gcs      # Copy blobs into the bucket
//! imagedrop cleanup                      # Delete blobs already in the bucket
//! imagedrop push -e <endpoint> a.png     # Upload files like the browser does
//! ```

use clap::{Parser, Subcommand};
use imagedrop::{
    cleanup, migrate, FsObjectStore, MediaRegistry, MigrationReport, ServerConfig, UploadClient,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imagedrop")]
#[command(about = "Image uploads with one-time URLs and blob store migration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// List stored media, newest first
    List {
        /// Maximum number of records
        #[arg(short, long, default_value = "999")]
        limit: usize,
    },

    /// Copy blobs into the bucket (keeps the blobs)
    Migrate {
        /// Target bucket (default: IMAGEDROP_BUCKET or bs2gcs)
        #[arg(short, long)]
        bucket: Option<String>,
    },

    /// Delete blobs of records already copied to the bucket
    Cleanup,

    /// Upload local files through an upload-URL endpoint
    Push {
        /// Upload-URL endpoint
        #[arg(short, long, default_value = "http://localhost:3000/api/upload_url")]
        endpoint: String,

        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { port } => cmd_serve(port).await,
        Commands::List { limit } => cmd_list(limit),
        Commands::Migrate { bucket } => cmd_migrate(bucket),
        Commands::Cleanup => cmd_cleanup(),
        Commands::Push { endpoint, files } => cmd_push(&endpoint, &files).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env(port);
    imagedrop::server::start_server(config).await?;
    Ok(())
}

fn cmd_list(limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env(imagedrop::config::DEFAULT_PORT);
    let registry = MediaRegistry::open(config.media_dir());

    if registry.is_empty() {
        eprintln!("📋 No media stored yet.");
        eprintln!("   Use 'imagedrop push <file>' against a running server to add some.");
        return Ok(());
    }

    eprintln!("📋 Stored media ({}):\n", registry.len());
    for record in registry.list_recent(limit) {
        println!("  🖼️  {} ({})", record.filename, record.id);
        println!("     URL: {}", record.url);
        println!("     GCS key: {}", record.gs_key.as_deref().unwrap_or("-"));
        println!("     Blob key: {}", record.blob_key.as_deref().unwrap_or("-"));
        println!("     Updated: {}", record.updated.to_rfc3339());
        println!();
    }
    Ok(())
}

fn print_report(report: &MigrationReport) {
    eprintln!("\n📊 Results:");
    eprintln!("   Scanned:       {}", report.scanned);
    eprintln!("   Migrated:      {}", report.migrated);
    eprintln!("   Copied:        {}", report.copied);
    eprintln!("   Orphaned:      {}", report.orphaned);
    eprintln!("   Deleted blobs: {}", report.deleted_blobs);
}

fn cmd_migrate(bucket: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_env(imagedrop::config::DEFAULT_PORT);
    if let Some(bucket) = bucket {
        config = config.with_bucket(bucket);
    }

    eprintln!("🚚 Migrating blobs into bucket '{}'", config.bucket);
    let mut registry = MediaRegistry::open(config.media_dir());
    let blobs = FsObjectStore::new(config.blobs_dir());
    let bucket_store = FsObjectStore::new(config.bucket_dir());

    let report = migrate(&mut registry, &blobs, &bucket_store, &config.bucket)?;
    print_report(&report);
    Ok(())
}

fn cmd_cleanup() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env(imagedrop::config::DEFAULT_PORT);

    eprintln!("🗑️  Removing migrated blobs");
    let mut registry = MediaRegistry::open(config.media_dir());
    let blobs = FsObjectStore::new(config.blobs_dir());

    let report = cleanup(&mut registry, &blobs)?;
    print_report(&report);
    Ok(())
}

async fn cmd_push(endpoint: &str, files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📤 Uploading {} file(s) via {}", files.len(), endpoint);

    let client = UploadClient::new(endpoint);
    let items = client.upload_paths(files).await?;

    eprintln!("✅ {} item(s) stored", items.len());
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

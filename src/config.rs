use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub assets_dir: String,
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_region: String,
    pub jwt_secret: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Video hosting API with S3-backed uploads")]
pub struct Args {
    /// Host to bind to (overrides CLIPSERVE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides CLIPSERVE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory where public assets (thumbnails) are stored (overrides CLIPSERVE_ASSETS_DIR)
    #[arg(long)]
    pub assets_dir: Option<String>,

    /// Database URL (overrides CLIPSERVE_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// S3 bucket receiving uploaded videos (overrides CLIPSERVE_S3_BUCKET)
    #[arg(long)]
    pub s3_bucket: Option<String>,

    /// Region of the S3 bucket (overrides CLIPSERVE_S3_REGION)
    #[arg(long)]
    pub s3_region: Option<String>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("CLIPSERVE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("CLIPSERVE_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing CLIPSERVE_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 8091,
            Err(err) => return Err(err).context("reading CLIPSERVE_PORT"),
        };
        let env_assets = env::var("CLIPSERVE_ASSETS_DIR").unwrap_or_else(|_| "./assets".into());
        let env_db = env::var("CLIPSERVE_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/clipserve.db".into());
        let env_bucket = env::var("CLIPSERVE_S3_BUCKET").unwrap_or_else(|_| "clipserve".into());
        let env_region = env::var("CLIPSERVE_S3_REGION").unwrap_or_else(|_| "us-east-1".into());

        // The JWT secret has no safe default; it gates every mutating endpoint.
        let jwt_secret = env::var("CLIPSERVE_JWT_SECRET").context("reading CLIPSERVE_JWT_SECRET")?;

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            assets_dir: args.assets_dir.unwrap_or(env_assets),
            database_url: args.database_url.unwrap_or(env_db),
            s3_bucket: args.s3_bucket.unwrap_or(env_bucket),
            s3_region: args.s3_region.unwrap_or(env_region),
            jwt_secret,
        };

        Ok((cfg, args.migrate))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

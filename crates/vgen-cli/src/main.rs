//! vgen binary.

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use vgen_cli::{init_tracing, AppConfig, Cli, Command, GenerationPipeline};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("rustls crypto provider already installed");
    }

    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let pipeline = GenerationPipeline::from_config(&config)?;

    match cli.command {
        Command::Generate(args) => {
            let report = pipeline.run(args.request(), &args.options()).await?;

            info!(run_id = %report.run_id, "Video saved: {}", report.result.video_path.display());
            if let Some(verdict) = &report.verdict {
                info!("Approved for production: {}", verdict.approved);
            }
            if let Some(url) = &report.public_url {
                info!("Public URL: {}", url);
            }
            for warning in &report.warnings {
                warn!("{}", warning);
            }
            println!("{}", report.result.video_path.display());
        }
        Command::Review {
            path,
            review_prompt,
        } => {
            let verdict = pipeline.review_file(&path, &review_prompt).await?;
            if let Some(analysis) = &verdict.analysis {
                println!("{}", analysis);
            }
            if !verdict.approved {
                anyhow::bail!("{} was not approved", path.display());
            }
        }
        Command::Upload { path } => {
            let url = pipeline
                .upload_file(&path)
                .await
                .with_context(|| format!("Failed to upload {}", path.display()))?;
            println!("{}", url);
        }
    }

    Ok(())
}

//! Covenant - concurrent contract extraction and ingestion pipeline.

use clap::Parser;
use covenant_cli::{Cli, Config, Formatter};
use covenant_llm::GeminiClient;
use covenant_pipeline::{Pipeline, PipelineConfig};
use covenant_store::{BigQueryClient, GcsClient};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let formatter = Formatter::new(true);
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(1);
    }
}

async fn run() -> covenant_cli::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let formatter = Formatter::new(!cli.no_color);

    let prefix = cli.prefix.unwrap_or_else(|| config.prefix.clone());

    let mut objects = match &config.gcs_endpoint {
        Some(endpoint) => GcsClient::new(endpoint.clone(), config.bucket.clone()),
        None => GcsClient::for_bucket(config.bucket.clone()),
    };
    if let Some(token) = &config.access_token {
        objects = objects.with_access_token(token.clone());
    }

    let mut service = match &config.llm_endpoint {
        Some(endpoint) => GeminiClient::new(endpoint.clone(), config.model.clone()),
        None => GeminiClient::default_endpoint(config.model.clone()),
    };
    if let Some(key) = &config.api_key {
        service = service.with_api_key(key.clone());
    }

    let mut records = match &config.bq_endpoint {
        Some(endpoint) => BigQueryClient::new(
            endpoint.clone(),
            config.project.clone(),
            config.dataset.clone(),
            config.table.clone(),
        ),
        None => BigQueryClient::for_table(
            config.project.clone(),
            config.dataset.clone(),
            config.table.clone(),
        ),
    };
    if let Some(token) = &config.access_token {
        records = records.with_access_token(token.clone());
    }

    let pipeline_config = PipelineConfig {
        concurrency: cli.workers,
        batch_size: cli.batch_size,
        reprocess_all: cli.reprocess_all,
        ..Default::default()
    };

    let pipeline = Pipeline::new(objects, service, records, pipeline_config)?;
    let summary = pipeline.run(&prefix).await?;

    // Per-item failures are not run failures; the process still exits 0
    if summary.failed > 0 {
        println!(
            "{}",
            formatter.warning(&format!("{} documents failed extraction", summary.failed))
        );
    } else {
        println!("{}", formatter.success("Run completed with no extraction failures"));
    }
    println!("{}", formatter.format_summary(&summary));

    Ok(())
}

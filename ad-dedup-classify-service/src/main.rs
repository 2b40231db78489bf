mod ingest;
mod util;

use ad_dedup_service::classify::Classifier;
use ad_dedup_service::dto::ClassifyConfig;
use ad_dedup_service::error::ServiceError;
use ad_dedup_service::partition::partition;
use ad_dedup_service::response::make_response_payload;
use ad_dedup_service::util::get_region;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use lazy_static::lazy_static;
use rusoto_core::{Client, Region};
use rusoto_s3::S3Client;
use serde_json::Value;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

lazy_static! {
    // AWS Region
    static ref REGION: Result<Region, ServiceError> = get_region();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .without_time()
        .init();
    run(service_fn(process)).await?;
    Ok(())
}

async fn process(event: LambdaEvent<ClassifyConfig>) -> Result<Value, Error> {
    let (config, _context) = event.into_parts();
    let result = classify(config).await;
    make_response_payload(result)
}

async fn classify(config: ClassifyConfig) -> Result<Value, ServiceError> {
    let classifier = Classifier::new(config.dedup_options())?;
    let region = REGION.as_ref().map_err(Clone::clone)?;
    let client = S3Client::new_with_client(Client::shared(), region.clone());

    let start = Instant::now();
    let batch = util::pull_data_file(&client, &config.data, &config.source).await?;
    info!(
        records = batch.records.len(),
        secs = start.elapsed().as_secs_f64(),
        "file ingested"
    );

    let start = Instant::now();
    let verdicts = classifier.classify(&batch.records);
    info!(
        duplicates = verdicts.iter().filter(|&&d| d).count(),
        metric = %config.metric,
        secs = start.elapsed().as_secs_f64(),
        "dedupe completed"
    );

    let split = partition(batch.records, &verdicts)?;
    util::push_result_files(&client, &config.data, &batch.columns, split).await
}

use crate::ingest::{read_batch, write_batch, Batch};
use ad_dedup_service::dto::{ClassifyResult, DataFile};
use ad_dedup_service::error::ServiceError;
use ad_dedup_service::partition::{BatchSummary, Partition};
use ad_dedup_service::util::{download_object_from_s3, output_location, upload_object_to_s3};
use chrono::Utc;
use rusoto_s3::S3Client;
use serde_json::Value;

pub async fn pull_data_file(
    client: &S3Client,
    data: &DataFile,
    source: &str,
) -> Result<Batch, ServiceError> {
    let bytes = download_object_from_s3(client, data).await?;
    read_batch(&bytes, source, Utc::now())
}

pub async fn push_result_files(
    client: &S3Client,
    data: &DataFile,
    columns: &[String],
    partition: Partition,
) -> Result<Value, ServiceError> {
    let summary = BatchSummary::from_partition(&partition);
    let cleaned = output_location(data, "cleaned");
    let duplicates = output_location(data, "duplicates");
    upload_object_to_s3(client, write_batch(columns, &partition.cleaned, false)?, &cleaned).await?;
    upload_object_to_s3(
        client,
        write_batch(columns, &partition.duplicates, true)?,
        &duplicates,
    )
    .await?;
    let result = ClassifyResult {
        cleaned,
        duplicates,
        summary,
    };
    serde_json::to_value(result).map_err(ServiceError::internal_server_error)
}

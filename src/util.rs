use crate::dto::DataFile;
use crate::error::ServiceError;
use futures::stream::TryStreamExt;
use rusoto_core::Region;
use rusoto_s3::{GetObjectRequest, PutObjectRequest, S3Client, S3};
use std::env;
use std::str::FromStr;
use tracing::debug;

pub fn get_region() -> Result<Region, ServiceError> {
    let name = get_env_var("REGION")?;
    Region::from_str(&name)
        .map_err(|_| ServiceError::internal_server_error(format!("Unable to parse region {}", name)))
}

pub fn get_env_var(name: &str) -> Result<String, ServiceError> {
    env::var(name).map_err(|_| {
        ServiceError::internal_server_error(format!("Environment variable '{}' not found", name))
    })
}

/// Result file for `input`: `/input` in the bucket becomes `/output` and `suffix`
/// replaces the file name's extension.
pub fn output_location(input: &DataFile, suffix: &str) -> DataFile {
    let (dir, file_name) = match input.key.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, input.key.as_str()),
    };
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    let key = match dir {
        Some(dir) => format!("{dir}/{stem}_{suffix}.csv"),
        None => format!("{stem}_{suffix}.csv"),
    };
    DataFile {
        bucket: input.bucket.replace("/input", "/output"),
        key,
    }
}

pub async fn download_object_from_s3(
    client: &S3Client,
    file: &DataFile,
) -> Result<Vec<u8>, ServiceError> {
    let request = GetObjectRequest {
        bucket: file.bucket.clone(),
        key: file.key.clone(),
        ..Default::default()
    };
    let mut object = client
        .get_object(request)
        .await
        .map_err(ServiceError::internal_server_error)?;
    let body = object
        .body
        .take()
        .ok_or_else(|| ServiceError::internal_server_error("Unable to extract body"))?;
    let bytes: Vec<u8> = body
        .map_ok(|b| b.to_vec())
        .try_concat()
        .await
        .map_err(ServiceError::internal_server_error)?;
    debug!(bucket = %file.bucket, key = %file.key, bytes = bytes.len(), "downloaded object");
    Ok(bytes)
}

pub async fn upload_object_to_s3(
    client: &S3Client,
    object: Vec<u8>,
    file: &DataFile,
) -> Result<(), ServiceError> {
    let size = object.len();
    let request = PutObjectRequest {
        bucket: file.bucket.clone(),
        key: file.key.clone(),
        body: Some(object.into()),
        content_type: Some(String::from("text/csv")),
        ..Default::default()
    };
    client
        .put_object(request)
        .await
        .map_err(ServiceError::internal_server_error)?;
    debug!(bucket = %file.bucket, key = %file.key, bytes = size, "uploaded object");
    Ok(())
}

use aws_sdk_s3::primitives::ByteStream;

use super::block_on;

/// Object storage scoped to a single bucket.
pub trait ObjectStore {
    fn read_object(&self, key: &str) -> Result<Vec<u8>, String>;
    fn write_object(&self, key: &str, body: &[u8]) -> Result<(), String>;
}

pub struct S3ObjectStore {
    bucket: String,
    s3_client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(bucket: impl Into<String>, s3_client: aws_sdk_s3::Client) -> Self {
        Self {
            bucket: bucket.into(),
            s3_client,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl ObjectStore for S3ObjectStore {
    fn read_object(&self, key: &str) -> Result<Vec<u8>, String> {
        let bucket = self.bucket.clone();
        let object_key = key.to_string();
        let client = self.s3_client.clone();

        block_on(async move {
            let output = client
                .get_object()
                .bucket(&bucket)
                .key(&object_key)
                .send()
                .await
                .map_err(|error| {
                    format!("failed to read s3://{bucket}/{object_key}: {error}")
                })?;
            let body = output.body.collect().await.map_err(|error| {
                format!("failed to stream s3://{bucket}/{object_key}: {error}")
            })?;
            Ok(body.into_bytes().to_vec())
        })
    }

    fn write_object(&self, key: &str, body: &[u8]) -> Result<(), String> {
        let bucket = self.bucket.clone();
        let object_key = key.to_string();
        let body_bytes = body.to_vec();
        let client = self.s3_client.clone();

        block_on(async move {
            client
                .put_object()
                .bucket(&bucket)
                .key(&object_key)
                .body(ByteStream::from(body_bytes))
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to write s3://{bucket}/{object_key}: {error}"))
        })
    }
}

use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::primitives::ByteStream;
use std::sync::{Arc, Mutex};

use crate::error::StorageError;

// 1. StorageService Contract
/// StorageService
///
/// The contract for every interaction with object storage. Handlers only see this
/// trait, so the S3 client (MinIO locally, any S3-compatible service in production)
/// and the in-memory mock are interchangeable.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ensures the configured bucket exists. Used in `Env::Local` to provision MinIO.
    async fn ensure_bucket_exists(&self);

    /// Stores `bytes` under `key` and returns the object's public URL.
    ///
    /// # Arguments
    /// * `key`: The object key (path + filename) in the bucket.
    /// * `content_type`: The MIME type recorded on the object (e.g., "image/png").
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Removes the object stored under `key`.
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;
}

// 2. The Real Implementation (S3/MinIO)
/// S3StorageClient
///
/// The concrete implementation using the AWS SDK for S3.
/// `force_path_style(true)` is required for MinIO and most S3-compatible gateways.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket_name: String,
    public_base_url: String,
}

impl S3StorageClient {
    /// new
    ///
    /// Constructs the S3 client from the storage section of `AppConfig`.
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
        public_base_url: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        let client = s3::Client::from_conf(config);

        Self {
            client,
            bucket_name: bucket.to_string(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    /// ensure_bucket_exists
    ///
    /// CreateBucket is idempotent for our purposes; an "already owned" error is ignored.
    async fn ensure_bucket_exists(&self) {
        if let Err(err) = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await
        {
            tracing::debug!(bucket = %self.bucket_name, error = %err, "create_bucket skipped");
        }
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let key = sanitize_key(key);

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError(e.to_string()))?;

        Ok(format!("{}/{}", self.public_base_url, key))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(sanitize_key(key))
            .send()
            .await
            .map_err(|e| StorageError(e.to_string()))?;
        Ok(())
    }
}

/// sanitize_key
///
/// Strips directory navigation components (`..`, `.`) and empty segments from an
/// object key so a crafted name cannot escape the upload prefix.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

// 3. The Mock Implementation (For Tests)
/// StoredObject
///
/// What `MockStorageService` remembers about each upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

/// MockStorageService
///
/// An in-memory `StorageService` for tests. Records every stored and deleted key so
/// assertions can inspect what the handlers did, and can be told to fail.
#[derive(Clone, Default)]
pub struct MockStorageService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
    objects: Arc<Mutex<Vec<StoredObject>>>,
    deleted: Arc<Mutex<Vec<String>>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Objects currently held, in upload order.
    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().map(|o| o.clone()).unwrap_or_default()
    }

    /// Keys passed to `delete_object`, in call order.
    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {
        // No-op in mock environment.
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        if self.should_fail {
            return Err(StorageError("Mock Storage Error: Simulation requested".into()));
        }

        let key = sanitize_key(key);
        if let Ok(mut objects) = self.objects.lock() {
            objects.push(StoredObject {
                key: key.clone(),
                content_type: content_type.to_string(),
                size: bytes.len(),
            });
        }

        Ok(format!("http://localhost:9000/mock-bucket/{key}"))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError("Mock Storage Error: Simulation requested".into()));
        }

        let key = sanitize_key(key);
        if let Ok(mut objects) = self.objects.lock() {
            objects.retain(|object| object.key != key);
        }
        if let Ok(mut deleted) = self.deleted.lock() {
            deleted.push(key);
        }
        Ok(())
    }
}

/// StorageState
///
/// The shared handle to the storage service held in `AppState`.
pub type StorageState = Arc<dyn StorageService>;

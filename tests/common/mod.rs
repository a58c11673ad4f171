#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storage_retry::metadata::*;
use storage_retry::*;

pub fn transient_error() -> Status {
    Status::new(StatusCode::Unavailable, "try-again")
}

pub fn permanent_error() -> Status {
    Status::new(StatusCode::NotFound, "not-found")
}

/// In-memory transport: each operation fails with the queued statuses, then succeeds.
#[derive(Default)]
pub struct ScriptedTransport {
    failures: Mutex<HashMap<&'static str, VecDeque<Status>>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue `statuses` as the next results of `operation`.
    pub fn fail_with(&self, operation: &'static str, statuses: impl IntoIterator<Item = Status>) {
        self.failures.lock().unwrap().entry(operation).or_default().extend(statuses);
    }

    pub fn fail_times(&self, operation: &'static str, times: usize, status: Status) {
        self.fail_with(operation, std::iter::repeat(status).take(times));
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls.lock().unwrap().get(operation).copied().unwrap_or(0)
    }

    fn attempt(&self, request: &dyn StorageRequest) -> Result<(), Status> {
        let operation = request.operation_name();
        *self.calls.lock().unwrap().entry(operation).or_default() += 1;
        match self.failures.lock().unwrap().get_mut(operation).and_then(VecDeque::pop_front) {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }
}

fn acl(entity: &ObjectAclEntity, role: &str) -> ObjectAccessControl {
    ObjectAccessControl {
        bucket: entity.bucket_name.clone(),
        object: entity.object_name.clone(),
        entity: entity.entity.clone(),
        role: role.to_string(),
        etag: String::new(),
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn list_buckets(&self, request: &ListBucketsRequest) -> StatusOr<ListBucketsResponse> {
        self.attempt(request)?;
        Ok(ListBucketsResponse::default())
    }

    async fn create_bucket(&self, request: &CreateBucketRequest) -> StatusOr<BucketMetadata> {
        self.attempt(request)?;
        Ok(request.metadata.clone())
    }

    async fn get_bucket_metadata(
        &self,
        request: &GetBucketMetadataRequest,
    ) -> StatusOr<BucketMetadata> {
        self.attempt(request)?;
        Ok(BucketMetadata::new(request.bucket_name.clone()))
    }

    async fn delete_bucket(&self, request: &DeleteBucketRequest) -> StatusOr<EmptyResponse> {
        self.attempt(request)?;
        Ok(EmptyResponse)
    }

    async fn update_bucket(&self, request: &UpdateBucketRequest) -> StatusOr<BucketMetadata> {
        self.attempt(request)?;
        Ok(request.metadata.clone())
    }

    async fn list_objects(&self, request: &ListObjectsRequest) -> StatusOr<ListObjectsResponse> {
        self.attempt(request)?;
        Ok(ListObjectsResponse::default())
    }

    async fn insert_object(&self, request: &InsertObjectRequest) -> StatusOr<ObjectMetadata> {
        self.attempt(request)?;
        let mut metadata = ObjectMetadata::new(&*request.bucket_name, &*request.object_name);
        metadata.size = request.contents.len() as u64;
        Ok(metadata)
    }

    async fn copy_object(&self, request: &CopyObjectRequest) -> StatusOr<ObjectMetadata> {
        self.attempt(request)?;
        Ok(ObjectMetadata::new(&*request.destination_bucket, &*request.destination_object))
    }

    async fn get_object_metadata(
        &self,
        request: &GetObjectMetadataRequest,
    ) -> StatusOr<ObjectMetadata> {
        self.attempt(request)?;
        Ok(ObjectMetadata::new(&*request.bucket_name, &*request.object_name))
    }

    async fn delete_object(&self, request: &DeleteObjectRequest) -> StatusOr<EmptyResponse> {
        self.attempt(request)?;
        Ok(EmptyResponse)
    }

    async fn update_object(&self, request: &UpdateObjectRequest) -> StatusOr<ObjectMetadata> {
        self.attempt(request)?;
        Ok(request.metadata.clone())
    }

    async fn patch_object(&self, request: &PatchObjectRequest) -> StatusOr<ObjectMetadata> {
        self.attempt(request)?;
        let mut metadata = ObjectMetadata::new(&*request.bucket_name, &*request.object_name);
        if let Some(content_type) = &request.patch.content_type {
            metadata.content_type = content_type.clone();
        }
        Ok(metadata)
    }

    async fn list_object_acl(
        &self,
        request: &ListObjectAclRequest,
    ) -> StatusOr<ListObjectAclResponse> {
        self.attempt(request)?;
        Ok(ListObjectAclResponse::default())
    }

    async fn create_object_acl(
        &self,
        request: &CreateObjectAclRequest,
    ) -> StatusOr<ObjectAccessControl> {
        self.attempt(request)?;
        Ok(acl(&request.0.target, &request.0.role))
    }

    async fn get_object_acl(&self, request: &GetObjectAclRequest) -> StatusOr<ObjectAccessControl> {
        self.attempt(request)?;
        Ok(acl(&request.0, "READER"))
    }

    async fn delete_object_acl(&self, request: &DeleteObjectAclRequest) -> StatusOr<EmptyResponse> {
        self.attempt(request)?;
        Ok(EmptyResponse)
    }

    async fn update_object_acl(
        &self,
        request: &UpdateObjectAclRequest,
    ) -> StatusOr<ObjectAccessControl> {
        self.attempt(request)?;
        Ok(acl(&request.0.target, &request.0.role))
    }

    async fn list_notifications(
        &self,
        request: &ListNotificationsRequest,
    ) -> StatusOr<ListNotificationsResponse> {
        self.attempt(request)?;
        Ok(ListNotificationsResponse::default())
    }

    async fn create_notification(
        &self,
        request: &CreateNotificationRequest,
    ) -> StatusOr<NotificationMetadata> {
        self.attempt(request)?;
        let mut metadata = request.metadata.clone();
        metadata.id = "test-notification-1".to_string();
        Ok(metadata)
    }

    async fn get_notification(
        &self,
        request: &GetNotificationRequest,
    ) -> StatusOr<NotificationMetadata> {
        self.attempt(request)?;
        Ok(NotificationMetadata { id: request.notification_id.clone(), ..Default::default() })
    }

    async fn delete_notification(
        &self,
        request: &DeleteNotificationRequest,
    ) -> StatusOr<EmptyResponse> {
        self.attempt(request)?;
        Ok(EmptyResponse)
    }
}

/// Retry client allowing `maximum_failures` transient errors, with microsecond backoff.
pub fn retry_client(
    transport: Arc<ScriptedTransport>,
    maximum_failures: usize,
    sleeper: TrackingSleeper,
) -> RetryClient<ScriptedTransport> {
    let retrier = Retrier::builder()
        .retry_policy(LimitedErrorCountRetryPolicy::new(maximum_failures))
        .backoff_policy(
            ExponentialBackoffPolicy::new(
                Duration::from_micros(1),
                Duration::from_micros(5),
                2.0,
            )
            .unwrap()
            .with_jitter(Jitter::None),
        )
        .with_sleeper(sleeper)
        .build();
    RetryClient::new(transport, retrier)
}

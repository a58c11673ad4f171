//! A `Transport` decorator that retries every call.
//!
//! [`RetryClient`] forwards each storage operation to the wrapped transport through a
//! [`Retrier`]. Because it implements [`Transport`] itself, application code does not need to
//! know whether it talks to a raw transport or a retrying one.
//!
//! The `Transport` methods report failures as a plain [`Status`]; the termination reason is
//! logged. Callers that need the reason run requests through [`RetryClient::retrier`] directly.

use crate::metadata::{
    BucketMetadata, EmptyResponse, ListBucketsResponse, ListNotificationsResponse,
    ListObjectAclResponse, ListObjectsResponse, NotificationMetadata, ObjectAccessControl,
    ObjectMetadata,
};
use crate::request::*;
use crate::transport::Transport;
use crate::{Retrier, Status, StatusOr};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Wraps a transport and runs every call through a retry loop.
pub struct RetryClient<T: ?Sized> {
    inner: Arc<T>,
    retrier: Retrier,
}

impl<T: ?Sized> Clone for RetryClient<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone(), retrier: self.retrier.clone() }
    }
}

impl<T: ?Sized> std::fmt::Debug for RetryClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryClient")
            .field("inner", &"<transport>")
            .field("retrier", &self.retrier)
            .finish()
    }
}

impl<T> RetryClient<T>
where
    T: Transport + ?Sized,
{
    pub fn new(inner: Arc<T>, retrier: Retrier) -> Self {
        Self { inner, retrier }
    }

    /// Wrap `inner` with the default policies.
    pub fn with_default_policies(inner: Arc<T>) -> Self {
        Self::new(inner, Retrier::default())
    }

    pub fn inner(&self) -> &Arc<T> {
        &self.inner
    }

    pub fn retrier(&self) -> &Retrier {
        &self.retrier
    }

    async fn call<R, Resp, Op, Fut>(&self, request: &R, operation: Op) -> StatusOr<Resp>
    where
        R: StorageRequest,
        Op: FnMut() -> Fut,
        Fut: Future<Output = StatusOr<Resp>>,
    {
        self.retrier.execute(request, operation).await.map_err(Status::from)
    }
}

#[async_trait]
impl<T> Transport for RetryClient<T>
where
    T: Transport + ?Sized,
{
    async fn list_buckets(&self, request: &ListBucketsRequest) -> StatusOr<ListBucketsResponse> {
        self.call(request, || self.inner.list_buckets(request)).await
    }

    async fn create_bucket(&self, request: &CreateBucketRequest) -> StatusOr<BucketMetadata> {
        self.call(request, || self.inner.create_bucket(request)).await
    }

    async fn get_bucket_metadata(
        &self,
        request: &GetBucketMetadataRequest,
    ) -> StatusOr<BucketMetadata> {
        self.call(request, || self.inner.get_bucket_metadata(request)).await
    }

    async fn delete_bucket(&self, request: &DeleteBucketRequest) -> StatusOr<EmptyResponse> {
        self.call(request, || self.inner.delete_bucket(request)).await
    }

    async fn update_bucket(&self, request: &UpdateBucketRequest) -> StatusOr<BucketMetadata> {
        self.call(request, || self.inner.update_bucket(request)).await
    }

    async fn list_objects(&self, request: &ListObjectsRequest) -> StatusOr<ListObjectsResponse> {
        self.call(request, || self.inner.list_objects(request)).await
    }

    async fn insert_object(&self, request: &InsertObjectRequest) -> StatusOr<ObjectMetadata> {
        self.call(request, || self.inner.insert_object(request)).await
    }

    async fn copy_object(&self, request: &CopyObjectRequest) -> StatusOr<ObjectMetadata> {
        self.call(request, || self.inner.copy_object(request)).await
    }

    async fn get_object_metadata(
        &self,
        request: &GetObjectMetadataRequest,
    ) -> StatusOr<ObjectMetadata> {
        self.call(request, || self.inner.get_object_metadata(request)).await
    }

    async fn delete_object(&self, request: &DeleteObjectRequest) -> StatusOr<EmptyResponse> {
        self.call(request, || self.inner.delete_object(request)).await
    }

    async fn update_object(&self, request: &UpdateObjectRequest) -> StatusOr<ObjectMetadata> {
        self.call(request, || self.inner.update_object(request)).await
    }

    async fn patch_object(&self, request: &PatchObjectRequest) -> StatusOr<ObjectMetadata> {
        self.call(request, || self.inner.patch_object(request)).await
    }

    async fn list_object_acl(
        &self,
        request: &ListObjectAclRequest,
    ) -> StatusOr<ListObjectAclResponse> {
        self.call(request, || self.inner.list_object_acl(request)).await
    }

    async fn create_object_acl(
        &self,
        request: &CreateObjectAclRequest,
    ) -> StatusOr<ObjectAccessControl> {
        self.call(request, || self.inner.create_object_acl(request)).await
    }

    async fn get_object_acl(&self, request: &GetObjectAclRequest) -> StatusOr<ObjectAccessControl> {
        self.call(request, || self.inner.get_object_acl(request)).await
    }

    async fn delete_object_acl(&self, request: &DeleteObjectAclRequest) -> StatusOr<EmptyResponse> {
        self.call(request, || self.inner.delete_object_acl(request)).await
    }

    async fn update_object_acl(
        &self,
        request: &UpdateObjectAclRequest,
    ) -> StatusOr<ObjectAccessControl> {
        self.call(request, || self.inner.update_object_acl(request)).await
    }

    async fn list_notifications(
        &self,
        request: &ListNotificationsRequest,
    ) -> StatusOr<ListNotificationsResponse> {
        self.call(request, || self.inner.list_notifications(request)).await
    }

    async fn create_notification(
        &self,
        request: &CreateNotificationRequest,
    ) -> StatusOr<NotificationMetadata> {
        self.call(request, || self.inner.create_notification(request)).await
    }

    async fn get_notification(
        &self,
        request: &GetNotificationRequest,
    ) -> StatusOr<NotificationMetadata> {
        self.call(request, || self.inner.get_notification(request)).await
    }

    async fn delete_notification(
        &self,
        request: &DeleteNotificationRequest,
    ) -> StatusOr<EmptyResponse> {
        self.call(request, || self.inner.delete_notification(request)).await
    }
}

//! The transport interface: one network round trip per call.
//!
//! Implementations encode the request, send it, and decode the response. They never retry;
//! that is the job of [`RetryClient`](crate::RetryClient), which wraps any `Transport` and is a
//! `Transport` itself. Implementations are shared across concurrent calls and must be safe for
//! concurrent use.

use crate::metadata::{
    BucketMetadata, EmptyResponse, ListBucketsResponse, ListNotificationsResponse,
    ListObjectAclResponse, ListObjectsResponse, NotificationMetadata, ObjectAccessControl,
    ObjectMetadata,
};
use crate::request::*;
use crate::StatusOr;
use async_trait::async_trait;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn list_buckets(&self, request: &ListBucketsRequest) -> StatusOr<ListBucketsResponse>;
    async fn create_bucket(&self, request: &CreateBucketRequest) -> StatusOr<BucketMetadata>;
    async fn get_bucket_metadata(
        &self,
        request: &GetBucketMetadataRequest,
    ) -> StatusOr<BucketMetadata>;
    async fn delete_bucket(&self, request: &DeleteBucketRequest) -> StatusOr<EmptyResponse>;
    async fn update_bucket(&self, request: &UpdateBucketRequest) -> StatusOr<BucketMetadata>;

    async fn list_objects(&self, request: &ListObjectsRequest) -> StatusOr<ListObjectsResponse>;
    async fn insert_object(&self, request: &InsertObjectRequest) -> StatusOr<ObjectMetadata>;
    async fn copy_object(&self, request: &CopyObjectRequest) -> StatusOr<ObjectMetadata>;
    async fn get_object_metadata(
        &self,
        request: &GetObjectMetadataRequest,
    ) -> StatusOr<ObjectMetadata>;
    async fn delete_object(&self, request: &DeleteObjectRequest) -> StatusOr<EmptyResponse>;
    async fn update_object(&self, request: &UpdateObjectRequest) -> StatusOr<ObjectMetadata>;
    async fn patch_object(&self, request: &PatchObjectRequest) -> StatusOr<ObjectMetadata>;

    async fn list_object_acl(
        &self,
        request: &ListObjectAclRequest,
    ) -> StatusOr<ListObjectAclResponse>;
    async fn create_object_acl(
        &self,
        request: &CreateObjectAclRequest,
    ) -> StatusOr<ObjectAccessControl>;
    async fn get_object_acl(&self, request: &GetObjectAclRequest)
        -> StatusOr<ObjectAccessControl>;
    async fn delete_object_acl(&self, request: &DeleteObjectAclRequest)
        -> StatusOr<EmptyResponse>;
    async fn update_object_acl(
        &self,
        request: &UpdateObjectAclRequest,
    ) -> StatusOr<ObjectAccessControl>;

    async fn list_notifications(
        &self,
        request: &ListNotificationsRequest,
    ) -> StatusOr<ListNotificationsResponse>;
    async fn create_notification(
        &self,
        request: &CreateNotificationRequest,
    ) -> StatusOr<NotificationMetadata>;
    async fn get_notification(
        &self,
        request: &GetNotificationRequest,
    ) -> StatusOr<NotificationMetadata>;
    async fn delete_notification(
        &self,
        request: &DeleteNotificationRequest,
    ) -> StatusOr<EmptyResponse>;
}

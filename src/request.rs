//! Storage requests as seen by the retry machinery.
//!
//! The retry loop never looks at request fields. It needs two facts, exposed through
//! [`StorageRequest`]: what kind of operation the request is, and whether it carries a
//! precondition that makes repeating it safe. Each request type decides the second fact itself,
//! because the precondition that matters differs per operation:
//!
//! | request | safe to repeat when |
//! |---|---|
//! | reads and lists | always |
//! | `CreateBucket` | always (a duplicate fails with already-exists) |
//! | `DeleteBucket` | `if_metageneration_match` |
//! | `UpdateBucket` | `if_metageneration_match` or `if_match_etag` |
//! | `InsertObject`, `CopyObject` | `if_generation_match` |
//! | `DeleteObject` | `generation` or `if_generation_match` |
//! | `UpdateObject`, `PatchObject` | `if_metageneration_match` |
//! | object ACL create/update/delete | always (they set one entity's role) |
//! | `CreateNotification` | never |
//! | `DeleteNotification` | always (ids are unique) |

use crate::metadata::{
    BucketMetadata, NotificationMetadata, ObjectMetadata, ObjectMetadataPatch,
};
use std::fmt;

/// Coarse classification of a storage operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Get or list; never changes server state.
    Read,
    Create,
    /// Update or patch.
    Update,
    Delete,
}

impl OperationKind {
    pub fn is_read_only(&self) -> bool {
        matches!(self, OperationKind::Read)
    }
}

/// Facts about a request that the retry machinery needs.
pub trait StorageRequest: Send + Sync + fmt::Debug {
    /// Name used in logs and error messages, e.g. `DeleteObject`.
    fn operation_name(&self) -> &'static str;

    fn operation_kind(&self) -> OperationKind;

    /// True when the request carries a precondition that makes a repeated attempt safe.
    fn has_idempotency_precondition(&self) -> bool;
}

impl<R: StorageRequest + ?Sized> StorageRequest for &R {
    fn operation_name(&self) -> &'static str {
        (**self).operation_name()
    }

    fn operation_kind(&self) -> OperationKind {
        (**self).operation_kind()
    }

    fn has_idempotency_precondition(&self) -> bool {
        (**self).has_idempotency_precondition()
    }
}

macro_rules! storage_request {
    ($ty:ident, $name:literal, $kind:ident, |$req:ident| $safe:expr) => {
        impl StorageRequest for $ty {
            fn operation_name(&self) -> &'static str {
                $name
            }

            fn operation_kind(&self) -> OperationKind {
                OperationKind::$kind
            }

            fn has_idempotency_precondition(&self) -> bool {
                let $req = self;
                $safe
            }
        }
    };
}

// Buckets

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListBucketsRequest {
    pub project_id: String,
    pub prefix: Option<String>,
    pub page_token: Option<String>,
}

impl ListBucketsRequest {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self { project_id: project_id.into(), ..Self::default() }
    }
}

storage_request!(ListBucketsRequest, "ListBuckets", Read, |_r| true);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateBucketRequest {
    pub project_id: String,
    pub metadata: BucketMetadata,
}

impl CreateBucketRequest {
    pub fn new(project_id: impl Into<String>, metadata: BucketMetadata) -> Self {
        Self { project_id: project_id.into(), metadata }
    }
}

storage_request!(CreateBucketRequest, "CreateBucket", Create, |_r| true);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetBucketMetadataRequest {
    pub bucket_name: String,
}

impl GetBucketMetadataRequest {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self { bucket_name: bucket_name.into() }
    }
}

storage_request!(GetBucketMetadataRequest, "GetBucketMetadata", Read, |_r| true);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteBucketRequest {
    pub bucket_name: String,
    pub if_metageneration_match: Option<i64>,
}

impl DeleteBucketRequest {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self { bucket_name: bucket_name.into(), ..Self::default() }
    }

    pub fn with_if_metageneration_match(mut self, metageneration: i64) -> Self {
        self.if_metageneration_match = Some(metageneration);
        self
    }
}

storage_request!(DeleteBucketRequest, "DeleteBucket", Delete, |r| r
    .if_metageneration_match
    .is_some());

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateBucketRequest {
    pub metadata: BucketMetadata,
    pub if_metageneration_match: Option<i64>,
    pub if_match_etag: Option<String>,
}

impl UpdateBucketRequest {
    pub fn new(metadata: BucketMetadata) -> Self {
        Self { metadata, ..Self::default() }
    }

    pub fn with_if_metageneration_match(mut self, metageneration: i64) -> Self {
        self.if_metageneration_match = Some(metageneration);
        self
    }

    pub fn with_if_match_etag(mut self, etag: impl Into<String>) -> Self {
        self.if_match_etag = Some(etag.into());
        self
    }
}

storage_request!(UpdateBucketRequest, "UpdateBucket", Update, |r| r
    .if_metageneration_match
    .is_some()
    || r.if_match_etag.is_some());

// Objects

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListObjectsRequest {
    pub bucket_name: String,
    pub prefix: Option<String>,
    pub page_token: Option<String>,
}

impl ListObjectsRequest {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self { bucket_name: bucket_name.into(), ..Self::default() }
    }
}

storage_request!(ListObjectsRequest, "ListObjects", Read, |_r| true);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InsertObjectRequest {
    pub bucket_name: String,
    pub object_name: String,
    pub contents: Vec<u8>,
    /// `Some(0)` means "only if the object does not exist yet".
    pub if_generation_match: Option<i64>,
}

impl InsertObjectRequest {
    pub fn new(
        bucket_name: impl Into<String>,
        object_name: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
            contents: contents.into(),
            if_generation_match: None,
        }
    }

    pub fn with_if_generation_match(mut self, generation: i64) -> Self {
        self.if_generation_match = Some(generation);
        self
    }
}

storage_request!(InsertObjectRequest, "InsertObject", Create, |r| r
    .if_generation_match
    .is_some());

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CopyObjectRequest {
    pub source_bucket: String,
    pub source_object: String,
    pub destination_bucket: String,
    pub destination_object: String,
    pub if_generation_match: Option<i64>,
}

impl CopyObjectRequest {
    pub fn new(
        source_bucket: impl Into<String>,
        source_object: impl Into<String>,
        destination_bucket: impl Into<String>,
        destination_object: impl Into<String>,
    ) -> Self {
        Self {
            source_bucket: source_bucket.into(),
            source_object: source_object.into(),
            destination_bucket: destination_bucket.into(),
            destination_object: destination_object.into(),
            if_generation_match: None,
        }
    }

    pub fn with_if_generation_match(mut self, generation: i64) -> Self {
        self.if_generation_match = Some(generation);
        self
    }
}

storage_request!(CopyObjectRequest, "CopyObject", Create, |r| r.if_generation_match.is_some());

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetObjectMetadataRequest {
    pub bucket_name: String,
    pub object_name: String,
    pub generation: Option<i64>,
}

impl GetObjectMetadataRequest {
    pub fn new(bucket_name: impl Into<String>, object_name: impl Into<String>) -> Self {
        Self { bucket_name: bucket_name.into(), object_name: object_name.into(), generation: None }
    }
}

storage_request!(GetObjectMetadataRequest, "GetObjectMetadata", Read, |_r| true);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteObjectRequest {
    pub bucket_name: String,
    pub object_name: String,
    /// Delete this specific generation.
    pub generation: Option<i64>,
    pub if_generation_match: Option<i64>,
}

impl DeleteObjectRequest {
    pub fn new(bucket_name: impl Into<String>, object_name: impl Into<String>) -> Self {
        Self { bucket_name: bucket_name.into(), object_name: object_name.into(), ..Self::default() }
    }

    pub fn with_generation(mut self, generation: i64) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn with_if_generation_match(mut self, generation: i64) -> Self {
        self.if_generation_match = Some(generation);
        self
    }
}

storage_request!(DeleteObjectRequest, "DeleteObject", Delete, |r| r.generation.is_some()
    || r.if_generation_match.is_some());

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateObjectRequest {
    pub metadata: ObjectMetadata,
    pub if_metageneration_match: Option<i64>,
}

impl UpdateObjectRequest {
    pub fn new(metadata: ObjectMetadata) -> Self {
        Self { metadata, if_metageneration_match: None }
    }

    pub fn with_if_metageneration_match(mut self, metageneration: i64) -> Self {
        self.if_metageneration_match = Some(metageneration);
        self
    }
}

storage_request!(UpdateObjectRequest, "UpdateObject", Update, |r| r
    .if_metageneration_match
    .is_some());

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatchObjectRequest {
    pub bucket_name: String,
    pub object_name: String,
    pub patch: ObjectMetadataPatch,
    pub if_metageneration_match: Option<i64>,
}

impl PatchObjectRequest {
    pub fn new(
        bucket_name: impl Into<String>,
        object_name: impl Into<String>,
        patch: ObjectMetadataPatch,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
            patch,
            if_metageneration_match: None,
        }
    }

    pub fn with_if_metageneration_match(mut self, metageneration: i64) -> Self {
        self.if_metageneration_match = Some(metageneration);
        self
    }
}

storage_request!(PatchObjectRequest, "PatchObject", Update, |r| r
    .if_metageneration_match
    .is_some());

// Object ACLs

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListObjectAclRequest {
    pub bucket_name: String,
    pub object_name: String,
}

impl ListObjectAclRequest {
    pub fn new(bucket_name: impl Into<String>, object_name: impl Into<String>) -> Self {
        Self { bucket_name: bucket_name.into(), object_name: object_name.into() }
    }
}

storage_request!(ListObjectAclRequest, "ListObjectAcl", Read, |_r| true);

/// Identifies one ACL entry; shared by get and delete.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectAclEntity {
    pub bucket_name: String,
    pub object_name: String,
    pub entity: String,
}

impl ObjectAclEntity {
    pub fn new(
        bucket_name: impl Into<String>,
        object_name: impl Into<String>,
        entity: impl Into<String>,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
            entity: entity.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetObjectAclRequest(pub ObjectAclEntity);

storage_request!(GetObjectAclRequest, "GetObjectAcl", Read, |_r| true);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteObjectAclRequest(pub ObjectAclEntity);

storage_request!(DeleteObjectAclRequest, "DeleteObjectAcl", Delete, |_r| true);

/// Grants `role` to an entity. Create and update share the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectAclGrant {
    pub target: ObjectAclEntity,
    pub role: String,
}

impl ObjectAclGrant {
    pub fn new(target: ObjectAclEntity, role: impl Into<String>) -> Self {
        Self { target, role: role.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateObjectAclRequest(pub ObjectAclGrant);

storage_request!(CreateObjectAclRequest, "CreateObjectAcl", Create, |_r| true);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateObjectAclRequest(pub ObjectAclGrant);

storage_request!(UpdateObjectAclRequest, "UpdateObjectAcl", Update, |_r| true);

// Notifications

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListNotificationsRequest {
    pub bucket_name: String,
}

impl ListNotificationsRequest {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self { bucket_name: bucket_name.into() }
    }
}

storage_request!(ListNotificationsRequest, "ListNotifications", Read, |_r| true);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateNotificationRequest {
    pub bucket_name: String,
    pub metadata: NotificationMetadata,
}

impl CreateNotificationRequest {
    pub fn new(bucket_name: impl Into<String>, metadata: NotificationMetadata) -> Self {
        Self { bucket_name: bucket_name.into(), metadata }
    }
}

// The server assigns the id, so a repeated create makes a duplicate.
storage_request!(CreateNotificationRequest, "CreateNotification", Create, |_r| false);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetNotificationRequest {
    pub bucket_name: String,
    pub notification_id: String,
}

impl GetNotificationRequest {
    pub fn new(bucket_name: impl Into<String>, notification_id: impl Into<String>) -> Self {
        Self { bucket_name: bucket_name.into(), notification_id: notification_id.into() }
    }
}

storage_request!(GetNotificationRequest, "GetNotification", Read, |_r| true);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteNotificationRequest {
    pub bucket_name: String,
    pub notification_id: String,
}

impl DeleteNotificationRequest {
    pub fn new(bucket_name: impl Into<String>, notification_id: impl Into<String>) -> Self {
        Self { bucket_name: bucket_name.into(), notification_id: notification_id.into() }
    }
}

storage_request!(DeleteNotificationRequest, "DeleteNotification", Delete, |_r| true);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_report_read_kind() {
        let reads: Vec<Box<dyn StorageRequest>> = vec![
            Box::new(ListBucketsRequest::new("p")),
            Box::new(GetBucketMetadataRequest::new("b")),
            Box::new(ListObjectsRequest::new("b")),
            Box::new(GetObjectMetadataRequest::new("b", "o")),
            Box::new(ListObjectAclRequest::new("b", "o")),
            Box::new(GetObjectAclRequest(ObjectAclEntity::new("b", "o", "allUsers"))),
            Box::new(ListNotificationsRequest::new("b")),
            Box::new(GetNotificationRequest::new("b", "n")),
        ];
        for request in reads {
            assert!(request.operation_kind().is_read_only(), "{}", request.operation_name());
        }
    }

    #[test]
    fn delete_object_needs_a_generation_precondition() {
        let plain = DeleteObjectRequest::new("b", "o");
        assert_eq!(plain.operation_kind(), OperationKind::Delete);
        assert!(!plain.has_idempotency_precondition());
        assert!(plain.clone().with_generation(7).has_idempotency_precondition());
        assert!(plain.with_if_generation_match(7).has_idempotency_precondition());
    }

    #[test]
    fn insert_with_zero_generation_match_is_safe() {
        let request = InsertObjectRequest::new("b", "o", "payload");
        assert!(!request.has_idempotency_precondition());
        assert!(request.with_if_generation_match(0).has_idempotency_precondition());
    }

    #[test]
    fn update_bucket_accepts_either_precondition() {
        let request = UpdateBucketRequest::new(BucketMetadata::new("b"));
        assert!(!request.has_idempotency_precondition());
        assert!(request.clone().with_if_metageneration_match(3).has_idempotency_precondition());
        assert!(request.with_if_match_etag("CAE=").has_idempotency_precondition());
    }

    #[test]
    fn notification_create_is_never_safe_but_delete_is() {
        let create = CreateNotificationRequest::new("b", NotificationMetadata::new("t", "NONE"));
        assert!(!create.has_idempotency_precondition());
        assert!(DeleteNotificationRequest::new("b", "n").has_idempotency_precondition());
    }

    #[test]
    fn references_forward_to_the_request() {
        let request = PatchObjectRequest::new("b", "o", ObjectMetadataPatch::default())
            .with_if_metageneration_match(1);
        let by_ref: &dyn StorageRequest = &&request;
        assert_eq!(by_ref.operation_name(), "PatchObject");
        assert_eq!(by_ref.operation_kind(), OperationKind::Update);
        assert!(by_ref.has_idempotency_precondition());
    }
}

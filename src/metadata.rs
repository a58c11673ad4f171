//! Payload types exchanged with the transport.
//!
//! These are plain values. Encoding them for the wire is the transport's job.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BucketMetadata {
    pub name: String,
    pub location: String,
    pub storage_class: String,
    pub metageneration: i64,
    pub etag: String,
    pub labels: BTreeMap<String, String>,
}

impl BucketMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectMetadata {
    pub bucket: String,
    pub name: String,
    pub generation: i64,
    pub metageneration: i64,
    pub size: u64,
    pub content_type: String,
    pub etag: String,
    pub metadata: BTreeMap<String, String>,
}

impl ObjectMetadata {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self { bucket: bucket.into(), name: name.into(), ..Self::default() }
    }
}

/// Partial update of an object's mutable fields. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectMetadataPatch {
    pub content_type: Option<String>,
    pub metadata: BTreeMap<String, Option<String>>,
}

/// One entry of an object's access control list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectAccessControl {
    pub bucket: String,
    pub object: String,
    pub entity: String,
    pub role: String,
    pub etag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationMetadata {
    pub id: String,
    pub topic: String,
    pub payload_format: String,
    pub object_name_prefix: String,
    pub event_types: Vec<String>,
    pub custom_attributes: BTreeMap<String, String>,
    pub etag: String,
}

impl NotificationMetadata {
    pub fn new(topic: impl Into<String>, payload_format: impl Into<String>) -> Self {
        Self { topic: topic.into(), payload_format: payload_format.into(), ..Self::default() }
    }

    pub fn with_object_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.object_name_prefix = prefix.into();
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_types.push(event_type.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListBucketsResponse {
    pub items: Vec<BucketMetadata>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListObjectsResponse {
    pub items: Vec<ObjectMetadata>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListObjectAclResponse {
    pub items: Vec<ObjectAccessControl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListNotificationsResponse {
    pub items: Vec<NotificationMetadata>,
}

/// Response of operations that return no payload, such as deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmptyResponse;

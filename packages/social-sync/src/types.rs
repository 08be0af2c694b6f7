//! Data types shared by the sync pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Name of the custom field holding a precomputed summary.
pub const SUMMARY_FIELD: &str = "summary";

/// Identifier of a post in the host's store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Kind of content the host just saved.
///
/// The host reports this as a loose string; unknown values are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    Post,
    Page,
    Attachment,
    Other(String),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Post => "post",
            ContentType::Page => "page",
            ContentType::Attachment => "attachment",
            ContentType::Other(s) => s,
        }
    }
}

impl From<&str> for ContentType {
    fn from(s: &str) -> Self {
        match s {
            "post" => ContentType::Post,
            "page" => ContentType::Page,
            "attachment" => ContentType::Attachment,
            other => ContentType::Other(other.to_string()),
        }
    }
}

impl From<String> for ContentType {
    fn from(s: String) -> Self {
        ContentType::from(s.as_str())
    }
}

impl From<ContentType> for String {
    fn from(t: ContentType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility of a saved post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Visibility {
    Draft,
    Publish,
    Private,
    Hidden,
    Password,
    Waiting,
    Other(String),
}

/// Stored post status. The host writes the same vocabulary it uses for
/// visibility on the publish form.
pub type PostStatus = Visibility;

impl Visibility {
    pub fn as_str(&self) -> &str {
        match self {
            Visibility::Draft => "draft",
            Visibility::Publish => "publish",
            Visibility::Private => "private",
            Visibility::Hidden => "hidden",
            Visibility::Password => "password",
            Visibility::Waiting => "waiting",
            Visibility::Other(s) => s,
        }
    }
}

impl From<&str> for Visibility {
    fn from(s: &str) -> Self {
        match s {
            "draft" => Visibility::Draft,
            "publish" => Visibility::Publish,
            "private" => Visibility::Private,
            "hidden" => Visibility::Hidden,
            "password" => Visibility::Password,
            "waiting" => Visibility::Waiting,
            other => Visibility::Other(other.to_string()),
        }
    }
}

impl From<String> for Visibility {
    fn from(s: String) -> Self {
        Visibility::from(s.as_str())
    }
}

impl From<Visibility> for String {
    fn from(v: Visibility) -> Self {
        v.as_str().to_string()
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// "Publish finished" notification from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishEvent {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub visibility: Visibility,
    #[serde(default)]
    pub title: String,
    /// Host identifier of the saved post, when the hook provides it
    #[serde(default)]
    pub post_id: Option<PostId>,
}

impl PublishEvent {
    /// A published post event with the given title.
    pub fn published_post(title: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Post,
            visibility: Visibility::Publish,
            title: title.into(),
            post_id: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<ContentType>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_visibility(mut self, visibility: impl Into<Visibility>) -> Self {
        self.visibility = visibility.into();
        self
    }

    pub fn with_post_id(mut self, id: u64) -> Self {
        self.post_id = Some(PostId(id));
        self
    }
}

/// A post as read from the host's store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: PostId,
    pub title: String,
    /// Body as stored by the editor (HTML or markdown with a marker comment)
    pub raw_body: String,
    pub created_at: DateTime<Utc>,
    pub status: PostStatus,
    pub content_type: ContentType,
    #[serde(default)]
    pub custom_fields: HashMap<String, String>,
}

impl PostRecord {
    /// A published post created now.
    pub fn new(id: u64, title: impl Into<String>, raw_body: impl Into<String>) -> Self {
        Self {
            id: PostId(id),
            title: title.into(),
            raw_body: raw_body.into(),
            created_at: Utc::now(),
            status: Visibility::Publish,
            content_type: ContentType::Post,
            custom_fields: HashMap::new(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_status(mut self, status: impl Into<PostStatus>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<ContentType>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(name.into(), value.into());
        self
    }

    /// Non-empty value of a custom field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.custom_fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Criteria for the post lookup. Matches are ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub content_type: ContentType,
    pub status: PostStatus,
    pub title: String,
    /// Narrows the lookup to one post when the hook reports its id
    pub id: Option<PostId>,
}

impl PostQuery {
    /// Published posts with exactly this title.
    pub fn published_post(title: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Post,
            status: Visibility::Publish,
            title: title.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: PostId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn matches(&self, record: &PostRecord) -> bool {
        record.content_type == self.content_type
            && record.status == self.status
            && record.title == self.title
            && self.id.map_or(true, |id| record.id == id)
    }
}

/// JSON body of `POST /api/v1/statuses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub status: String,
    pub visibility: String,
    pub content_type: String,
}

impl StatusPayload {
    /// Public markdown status with the given text.
    pub fn public_markdown(text: impl Into<String>) -> Self {
        Self {
            status: text.into(),
            visibility: "public".to_string(),
            content_type: "text/markdown".to_string(),
        }
    }
}

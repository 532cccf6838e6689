// SPDX-License-Identifier: MPL-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

impl SocialLinks {
    /// All three links present but blank, the shape sent on sign-up.
    pub fn blank() -> Self {
        Self {
            website: Some(String::new()),
            twitter: Some(String::new()),
            linkedin: Some(String::new()),
        }
    }
}

/// A writer as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriterRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl WriterRecord {
    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

/// Posts carry either the populated writer or just its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WriterRef {
    Record(Box<WriterRecord>),
    Id(String),
}

impl WriterRef {
    pub fn id(&self) -> &str {
        match self {
            WriterRef::Record(w) => &w.id,
            WriterRef::Id(id) => id,
        }
    }

    pub fn record(&self) -> Option<&WriterRecord> {
        match self {
            WriterRef::Record(w) => Some(w),
            WriterRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    /// Markdown source
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Order-preserving; duplicates allowed
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
    pub writer: WriterRef,
    /// Explicit illustration, overrides the picked one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /writer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWriter {
    pub name: String,
    pub email: String,
    pub bio: String,
    pub profile_image: String,
    pub social_links: SocialLinks,
    pub is_active: bool,
}

/// Partial writer change. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriterUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl WriterUpdate {
    pub fn apply_to(&self, writer: &mut WriterRecord) {
        if let Some(name) = &self.name {
            writer.name = name.clone();
        }
        if let Some(email) = &self.email {
            writer.email = email.clone();
        }
        if let Some(bio) = &self.bio {
            writer.bio = Some(bio.clone());
        }
        if let Some(image) = &self.profile_image {
            writer.profile_image = Some(image.clone());
        }
        if let Some(links) = &self.social_links {
            writer.social_links = links.clone();
        }
        if let Some(active) = self.is_active {
            writer.is_active = active;
        }
    }
}

/// Body of `POST /blog` and `PUT /blog/:id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
    /// Writer id
    pub writer: String,
}

/// Query parameters accepted by `GET /blog`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PostFilter {
    pub writer: Option<String>,
    pub tag: Option<String>,
    pub published: Option<bool>,
}

impl PostFilter {
    pub fn by_writer(writer_id: impl Into<String>) -> Self {
        Self {
            writer: Some(writer_id.into()),
            ..Self::default()
        }
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(writer) = &self.writer {
            pairs.push(("writer".to_string(), writer.clone()));
        }
        if let Some(tag) = &self.tag {
            pairs.push(("tag".to_string(), tag.clone()));
        }
        if let Some(published) = self.published {
            pairs.push(("isPublished".to_string(), published.to_string()));
        }
        pairs
    }
}

/// Uniform shape of every post listing: `{ "blogs": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostList {
    pub blogs: Vec<BlogPost>,
}

/// Uniform shape of every writer listing: `{ "writers": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriterList {
    pub writers: Vec<WriterRecord>,
}

impl WriterList {
    pub fn find_by_email(&self, email: &str) -> Option<&WriterRecord> {
        self.writers.iter().find(|w| w.has_email(email))
    }
}

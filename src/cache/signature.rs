// SPDX-License-Identifier: MPL-2.0

use crate::api::{ApiRequest, PostFilter, Resource};
use std::fmt;

/// Identity of a cached query: operation plus parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuerySignature {
    ListPosts(PostFilter),
    GetPost(String),
    ListWriters,
    GetWriter(String),
}

/// What a query depends on, and what a mutation makes stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Every post listing, whatever its filter
    Posts,
    Post(String),
    /// The writer listing
    Writers,
    Writer(String),
}

impl QuerySignature {
    pub fn resource(&self) -> Resource {
        match self {
            QuerySignature::ListPosts(_) | QuerySignature::GetPost(_) => Resource::Blog,
            QuerySignature::ListWriters | QuerySignature::GetWriter(_) => Resource::Writer,
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            QuerySignature::ListPosts(_) => Tag::Posts,
            QuerySignature::GetPost(id) => Tag::Post(id.clone()),
            QuerySignature::ListWriters => Tag::Writers,
            QuerySignature::GetWriter(id) => Tag::Writer(id.clone()),
        }
    }

    pub fn is_invalidated_by(&self, tags: &[Tag]) -> bool {
        let own = self.tag();
        tags.contains(&own)
    }

    pub fn request(&self) -> ApiRequest {
        let endpoint = self.resource().endpoint();
        match self {
            QuerySignature::ListPosts(filter) => {
                ApiRequest::get(endpoint).with_query(filter.query_pairs())
            }
            QuerySignature::ListWriters => ApiRequest::get(endpoint),
            QuerySignature::GetPost(id) | QuerySignature::GetWriter(id) => {
                ApiRequest::get(format!("{endpoint}/{id}"))
            }
        }
    }
}

impl fmt::Display for QuerySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuerySignature::ListPosts(filter) => {
                write!(f, "listPosts(")?;
                for (i, (k, v)) in filter.query_pairs().iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{k}={v}")?;
                }
                write!(f, ")")
            }
            QuerySignature::GetPost(id) => write!(f, "getPost({id})"),
            QuerySignature::ListWriters => write!(f, "listWriters()"),
            QuerySignature::GetWriter(id) => write!(f, "getWriter({id})"),
        }
    }
}

/// Tags invalidated by each mutation.
pub mod invalidates {
    use super::Tag;

    pub fn create_post() -> Vec<Tag> {
        vec![Tag::Posts]
    }

    pub fn change_post(id: &str) -> Vec<Tag> {
        vec![Tag::Posts, Tag::Post(id.to_string())]
    }

    pub fn create_writer() -> Vec<Tag> {
        vec![Tag::Writers]
    }

    pub fn change_writer(id: &str) -> Vec<Tag> {
        vec![Tag::Writers, Tag::Writer(id.to_string())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_mutations_hit_every_listing() {
        let filtered = QuerySignature::ListPosts(PostFilter::by_writer("w1"));
        let all = QuerySignature::ListPosts(PostFilter::default());
        let tags = invalidates::create_post();

        assert!(filtered.is_invalidated_by(&tags));
        assert!(all.is_invalidated_by(&tags));
        assert!(!QuerySignature::GetPost("p1".into()).is_invalidated_by(&tags));
        assert!(!QuerySignature::ListWriters.is_invalidated_by(&tags));
    }

    #[test]
    fn change_targets_only_that_record() {
        let tags = invalidates::change_writer("w1");
        assert!(QuerySignature::GetWriter("w1".into()).is_invalidated_by(&tags));
        assert!(!QuerySignature::GetWriter("w2".into()).is_invalidated_by(&tags));
        assert!(QuerySignature::ListWriters.is_invalidated_by(&tags));
    }

    #[test]
    fn request_paths() {
        assert_eq!(QuerySignature::GetPost("p1".into()).request().path, "/blog/p1");
        let list = QuerySignature::ListPosts(PostFilter::by_writer("w1")).request();
        assert_eq!(list.path, "/blog");
        assert_eq!(list.query, vec![("writer".to_string(), "w1".to_string())]);
    }

    #[test]
    fn display_names() {
        assert_eq!(
            QuerySignature::ListPosts(PostFilter::by_writer("w1")).to_string(),
            "listPosts(writer=w1)"
        );
        assert_eq!(QuerySignature::ListWriters.to_string(), "listWriters()");
    }
}

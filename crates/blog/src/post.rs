use serde::{Deserialize, Serialize};

use garage_core::{DomainResult, FieldSpec, Fields, Record, RecordId, Resource, ResourceDescriptor};

/// Descriptor for blog posts (`/posts`, table `posts`).
pub static POSTS: ResourceDescriptor = ResourceDescriptor {
    slug: "posts",
    table: "posts",
    title: "Posts",
    fields: &[
        FieldSpec::text("title", "Title"),
        FieldSpec::text("author", "Author"),
        FieldSpec::text("body", "Body"),
    ],
    counter: None,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub author: String,
    pub body: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            body: body.into(),
        }
    }
}

impl Resource for BlogPost {
    const DESCRIPTOR: &'static ResourceDescriptor = &POSTS;

    type Draft = PostDraft;

    fn into_fields(draft: PostDraft) -> Fields {
        Fields::new()
            .text("title", draft.title)
            .text("author", draft.author)
            .text("body", draft.body)
    }

    fn from_record(record: Record) -> DomainResult<Self> {
        let f = &record.fields;
        Ok(Self {
            id: record.id,
            title: f.require_text("title")?,
            author: f.require_text("author")?,
            body: f.require_text("body")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garage_core::{DomainError, check};

    #[test]
    fn posts_have_no_counter() {
        assert!(POSTS.counter_field().is_none());
    }

    #[test]
    fn empty_body_is_rejected() {
        let fields = BlogPost::into_fields(PostDraft::new("Hello", "Ana", ""));
        match check(&POSTS, fields) {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("body")),
            other => panic!("Expected Validation error for empty body, got {other:?}"),
        }
    }

    #[test]
    fn record_maps_back_to_post() {
        let fields = check(&POSTS, BlogPost::into_fields(PostDraft::new("New stock", "Ana", "Three Corollas arrived."))).unwrap();
        let post = BlogPost::from_record(Record { id: RecordId::new(3), fields }).unwrap();
        assert_eq!(post.id, RecordId::new(3));
        assert_eq!(post.title, "New stock");
        assert_eq!(post.author, "Ana");
    }
}

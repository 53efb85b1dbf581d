//! Community posts with append-only replies and like counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filter::{matches_any, CategoryFilter};
use crate::record::{require, split_list, Record, RecordMeta, Validate, ValidationError};

/// Author name shown for anonymous posts and replies.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    #[default]
    Question,
    Experience,
    Support,
    Tip,
    Celebration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityReply {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub author_name: String,
    pub content: String,
    pub likes: u32,
    pub created_at: DateTime<Utc>,
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyDraft {
    pub content: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl Validate for ReplyDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("content", &self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityPostDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: PostCategory,
    /// Comma separated, as typed in the tag field
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl Validate for CommunityPostDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("content", &self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub category: PostCategory,
    pub tags: Vec<String>,
    pub likes: u32,
    pub replies: Vec<CommunityReply>,
    pub is_anonymous: bool,
}

fn display_author(author_name: &str, is_anonymous: bool) -> String {
    let name = author_name.trim();
    if is_anonymous || name.is_empty() {
        ANONYMOUS_AUTHOR.to_string()
    } else {
        name.to_string()
    }
}

impl CommunityPost {
    pub fn like(&mut self) {
        self.likes = self.likes.saturating_add(1);
    }

    /// Appends a reply authored by `user_id`. Existing replies are never
    /// edited or removed.
    pub fn add_reply(&mut self, user_id: &str, draft: ReplyDraft) -> Result<CommunityReply, ValidationError> {
        draft.validate()?;
        let reply = CommunityReply {
            id: Uuid::new_v4().to_string(),
            post_id: self.id.clone(),
            user_id: user_id.to_string(),
            author_name: display_author(&draft.author_name, draft.is_anonymous),
            content: draft.content.trim().to_string(),
            likes: 0,
            created_at: Utc::now(),
            is_anonymous: draft.is_anonymous,
        };
        self.replies.push(reply.clone());
        Ok(reply)
    }

    /// Returns false when no reply has `reply_id`.
    pub fn like_reply(&mut self, reply_id: &str) -> bool {
        match self.replies.iter_mut().find(|reply| reply.id == reply_id) {
            Some(reply) => {
                reply.likes = reply.likes.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Case-insensitive match on title or content.
    pub fn matches_search(&self, query: &str) -> bool {
        matches_any(query, [self.title.as_str(), self.content.as_str()])
    }
}

impl Record for CommunityPost {
    type Draft = CommunityPostDraft;
    const COLLECTION: &'static str = "community_posts";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(meta: RecordMeta, draft: CommunityPostDraft) -> Self {
        let mut post = Self {
            id: meta.id,
            user_id: meta.user_id,
            created_at: meta.created_at,
            author_name: String::new(),
            title: String::new(),
            content: String::new(),
            category: PostCategory::default(),
            tags: Vec::new(),
            likes: 0,
            replies: Vec::new(),
            is_anonymous: false,
        };
        post.replace(draft);
        post
    }

    /// Replaces the authored fields; likes and replies are kept.
    fn replace(&mut self, draft: CommunityPostDraft) {
        self.author_name = display_author(&draft.author_name, draft.is_anonymous);
        self.title = draft.title.trim().to_string();
        self.content = draft.content.trim().to_string();
        self.category = draft.category;
        self.tags = split_list(&draft.tags);
        self.is_anonymous = draft.is_anonymous;
    }
}

pub fn filter_posts<'a>(
    posts: &'a [CommunityPost],
    query: &str,
    category: &CategoryFilter<PostCategory>,
) -> Vec<&'a CommunityPost> {
    posts
        .iter()
        .filter(|post| post.matches_search(query) && category.accepts(&post.category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, content: &str, category: PostCategory) -> CommunityPost {
        CommunityPost::from_draft(
            RecordMeta::new("parent-1"),
            CommunityPostDraft {
                title: title.to_string(),
                content: content.to_string(),
                category,
                tags: "routine, transition, ".to_string(),
                author_name: "Maria".to_string(),
                is_anonymous: false,
            },
        )
    }

    #[test]
    fn test_tags_parsed_from_comma_list() {
        let p = post("Changes in routine", "Any tips?", PostCategory::Question);
        assert_eq!(p.tags, vec!["routine", "transition"]);
        assert_eq!(p.author_name, "Maria");
        assert_eq!(p.likes, 0);
    }

    #[test]
    fn test_anonymous_hides_author() {
        let p = CommunityPost::from_draft(
            RecordMeta::new("parent-1"),
            CommunityPostDraft {
                title: "Small victory".to_string(),
                content: "Eye contact during the whole conversation!".to_string(),
                category: PostCategory::Celebration,
                tags: String::new(),
                author_name: "Maria".to_string(),
                is_anonymous: true,
            },
        );
        assert_eq!(p.author_name, ANONYMOUS_AUTHOR);
    }

    #[test]
    fn test_replies_are_append_only_with_own_likes() {
        let mut p = post("Changes in routine", "Any tips?", PostCategory::Question);
        p.like();
        p.like();

        let first_id = p
            .add_reply("parent-2", ReplyDraft { content: "Visual boards!".to_string(), author_name: "João".to_string(), is_anonymous: false })
            .unwrap()
            .id;
        p.add_reply("parent-3", ReplyDraft { content: "Social stories".to_string(), author_name: String::new(), is_anonymous: false })
            .unwrap();

        assert!(p
            .add_reply("parent-3", ReplyDraft { content: "  ".to_string(), author_name: String::new(), is_anonymous: false })
            .is_err());

        assert!(p.like_reply(&first_id));
        assert!(!p.like_reply("nope"));

        assert_eq!(p.likes, 2);
        assert_eq!(p.replies.len(), 2);
        assert_eq!(p.replies[0].likes, 1);
        assert_eq!(p.replies[0].post_id, p.id);
        assert_eq!(p.replies[1].likes, 0);
        assert_eq!(p.replies[1].author_name, ANONYMOUS_AUTHOR);
    }

    #[test]
    fn test_filter_by_text_and_category() {
        let posts = vec![
            post("Changes in routine", "Any tips?", PostCategory::Question),
            post("AAC app", "Free app that helps communication", PostCategory::Tip),
            post("Small victory", "First full conversation", PostCategory::Celebration),
        ];

        assert_eq!(filter_posts(&posts, "", &CategoryFilter::All).len(), 3);
        assert_eq!(filter_posts(&posts, "APP", &CategoryFilter::All).len(), 1);
        assert_eq!(filter_posts(&posts, "", &CategoryFilter::Only(PostCategory::Tip))[0].title, "AAC app");
        assert!(filter_posts(&posts, "routine", &CategoryFilter::Only(PostCategory::Tip)).is_empty());
    }
}

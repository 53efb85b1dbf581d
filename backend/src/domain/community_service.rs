//! Likes and replies on community posts.

use shared::{CommunityPost, CommunityReply, ReplyDraft, Validate};
use tracing::info;

use crate::domain::controller::EntityController;
use crate::domain::entity_service::EntityService;
use crate::domain::errors::AppError;

fn like_reply_in(post: &mut CommunityPost, reply_id: &str) -> Result<(), AppError> {
    if post.like_reply(reply_id) {
        Ok(())
    } else {
        Err(AppError::not_found("community_replies", reply_id))
    }
}

impl EntityService<CommunityPost> {
    pub async fn like_post(&self, user_id: &str, post_id: &str) -> Result<CommunityPost, AppError> {
        let post = self
            .modify(user_id, post_id, |post| {
                post.like();
                Ok(())
            })
            .await?;
        info!("Post {} now has {} likes", post_id, post.likes);
        Ok(post)
    }

    pub async fn add_reply(
        &self,
        user_id: &str,
        post_id: &str,
        draft: ReplyDraft,
    ) -> Result<CommunityReply, AppError> {
        draft.validate()?;
        let author = user_id.to_string();
        let post = self
            .modify(user_id, post_id, move |post| {
                post.add_reply(&author, draft)?;
                Ok(())
            })
            .await?;

        let reply = post
            .replies
            .last()
            .cloned()
            .ok_or_else(|| AppError::not_found("community_replies", post_id))?;
        info!("Added reply {} to post {}", reply.id, post_id);
        Ok(reply)
    }

    pub async fn like_reply(
        &self,
        user_id: &str,
        post_id: &str,
        reply_id: &str,
    ) -> Result<CommunityPost, AppError> {
        self.modify(user_id, post_id, |post| like_reply_in(post, reply_id))
            .await
    }
}

impl EntityController<CommunityPost> {
    pub async fn like_post(&mut self, post_id: &str) -> Result<CommunityPost, AppError> {
        self.apply(post_id, "like", |post| {
            post.like();
            Ok(())
        })
        .await
    }

    pub async fn add_reply(&mut self, post_id: &str, draft: ReplyDraft) -> Result<CommunityReply, AppError> {
        draft.validate()?;
        let author = self.owner_id();
        let post = self
            .apply(post_id, "reply to", move |post| {
                post.add_reply(&author, draft)?;
                Ok(())
            })
            .await?;
        post.replies
            .last()
            .cloned()
            .ok_or_else(|| AppError::not_found("community_replies", post_id))
    }

    pub async fn like_reply(&mut self, post_id: &str, reply_id: &str) -> Result<CommunityPost, AppError> {
        let reply_id = reply_id.to_string();
        self.apply(post_id, "like", move |post| like_reply_in(post, &reply_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{DbConnection, EntityRepository};
    use shared::{CommunityPostDraft, PostCategory};

    fn post_draft() -> CommunityPostDraft {
        CommunityPostDraft {
            title: "Changes in routine".to_string(),
            content: "How do you prepare for school holidays?".to_string(),
            category: PostCategory::Question,
            tags: "routine, holidays".to_string(),
            author_name: "Maria".to_string(),
            is_anonymous: false,
        }
    }

    fn reply(content: &str) -> ReplyDraft {
        ReplyDraft {
            content: content.to_string(),
            author_name: "João".to_string(),
            is_anonymous: false,
        }
    }

    async fn setup_service() -> EntityService<CommunityPost> {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        EntityService::new(Arc::new(EntityRepository::<CommunityPost>::new(db)))
    }

    #[tokio::test]
    async fn test_likes_and_replies_persist() {
        let service = setup_service().await;
        let post = service.create("parent-1", post_draft()).await.unwrap();

        service.like_post("parent-1", &post.id).await.unwrap();
        let first = service.add_reply("parent-1", &post.id, reply("Visual calendar")).await.unwrap();
        service.add_reply("parent-1", &post.id, reply("Social stories")).await.unwrap();
        service.like_reply("parent-1", &post.id, &first.id).await.unwrap();

        let stored = service.get("parent-1", &post.id).await.unwrap();
        assert_eq!(stored.likes, 1);
        assert_eq!(stored.replies.len(), 2);
        assert_eq!(stored.replies[0].content, "Visual calendar");
        assert_eq!(stored.replies[0].likes, 1);
        assert_eq!(stored.replies[1].likes, 0);
    }

    #[tokio::test]
    async fn test_blank_reply_and_unknown_reply() {
        let service = setup_service().await;
        let post = service.create("parent-1", post_draft()).await.unwrap();

        assert!(matches!(
            service.add_reply("parent-1", &post.id, reply(" ")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.like_reply("parent-1", &post.id, "nope").await,
            Err(AppError::NotFound { .. })
        ));
        assert!(service.get("parent-1", &post.id).await.unwrap().replies.is_empty());
    }

    #[tokio::test]
    async fn test_controller_keeps_list_in_step() {
        let service = setup_service().await;
        let mut controller = EntityController::new(service.clone(), Some("parent-1".to_string()));
        let post = controller.create(post_draft()).await.unwrap();

        controller.like_post(&post.id).await.unwrap();
        let added = controller.add_reply(&post.id, reply("Try a countdown")).await.unwrap();
        controller.like_reply(&post.id, &added.id).await.unwrap();

        let listed = controller.find(&post.id).unwrap();
        assert_eq!(listed.likes, 1);
        assert_eq!(listed.replies[0].likes, 1);
        assert_eq!(listed.replies[0].user_id, "parent-1");
        assert_eq!(service.get("parent-1", &post.id).await.unwrap(), *listed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_likes_and_replies_are_all_kept() {
        let service = setup_service().await;
        let post = service.create("parent-1", post_draft()).await.unwrap();

        let mut tasks = Vec::new();
        for i in 0..10 {
            let likes = service.clone();
            let post_id = post.id.clone();
            tasks.push(tokio::spawn(async move {
                likes.like_post("parent-1", &post_id).await.map(|_| ())
            }));

            let replies = service.clone();
            let post_id = post.id.clone();
            tasks.push(tokio::spawn(async move {
                replies
                    .add_reply("parent-1", &post_id, reply(&format!("Idea {i}")))
                    .await
                    .map(|_| ())
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = service.get("parent-1", &post.id).await.unwrap();
        assert_eq!(stored.likes, 10);
        assert_eq!(stored.replies.len(), 10);
    }

    #[tokio::test]
    async fn test_controller_keeps_other_sessions_edits() {
        let service = setup_service().await;
        let mut phone = EntityController::new(service.clone(), Some("parent-1".to_string()));
        let mut tablet = EntityController::new(service.clone(), Some("parent-1".to_string()));
        let post = phone.create(post_draft()).await.unwrap();
        tablet.load().await.unwrap();

        phone.add_reply(&post.id, reply("From the phone")).await.unwrap();
        let seen = tablet.like_post(&post.id).await.unwrap();

        assert_eq!(seen.likes, 1);
        assert_eq!(seen.replies.len(), 1);
        assert_eq!(service.get("parent-1", &post.id).await.unwrap().replies.len(), 1);
    }
}

use std::sync::Arc;

use chrono::Utc;

use crate::error::{
    AppError, AppResult, ALREADY_LIKED, COMMENT_NOT_FOUND, NOT_LIKED, NOT_OWNER, POST_NOT_FOUND,
};
use crate::extractors::CurrentUser;
use crate::posts::model::{Comment, Like, NewPost, Post, PostInput};
use crate::posts::store::PostStore;
use crate::posts::validation::validate_post_input;

/// Post operations on top of a [`PostStore`].
///
/// Every mutation is a read-modify-write of the whole document: fetch the
/// post, change it in memory, write it back. Two concurrent mutations of the
/// same post can therefore overwrite each other.
#[derive(Clone)]
pub struct PostManager {
    store: Arc<dyn PostStore>,
}

impl PostManager {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Post>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get(&self, id: &str) -> AppResult<Post> {
        self.find(id).await
    }

    pub async fn create(&self, caller: &CurrentUser, input: PostInput) -> AppResult<Post> {
        validate_post_input(&input).map_err(AppError::Validation)?;

        let post = NewPost {
            user: caller.id.clone(),
            text: input.text,
            name: input.name,
            avatar: input.avatar,
            date: Utc::now(),
        };

        Ok(self.store.insert(post).await?)
    }

    pub async fn like(&self, caller: &CurrentUser, id: &str) -> AppResult<Post> {
        let mut post = self.find(id).await?;

        if post.liked_by(&caller.id) {
            return Err(AppError::Conflict(ALREADY_LIKED));
        }

        post.likes.insert(
            0,
            Like {
                user: caller.id.clone(),
            },
        );
        Ok(self.store.update(&post).await?)
    }

    pub async fn unlike(&self, caller: &CurrentUser, id: &str) -> AppResult<Post> {
        let mut post = self.find(id).await?;

        let index = post
            .likes
            .iter()
            .position(|like| like.user == caller.id)
            .ok_or(AppError::Conflict(NOT_LIKED))?;

        post.likes.remove(index);
        Ok(self.store.update(&post).await?)
    }

    pub async fn add_comment(
        &self,
        caller: &CurrentUser,
        id: &str,
        input: PostInput,
    ) -> AppResult<Post> {
        validate_post_input(&input).map_err(AppError::Validation)?;

        let mut post = self.find(id).await?;

        post.comments.insert(
            0,
            Comment {
                id: uuid::Uuid::now_v7().to_string(),
                user: caller.id.clone(),
                text: input.text,
                name: input.name,
                avatar: input.avatar,
                date: Utc::now(),
            },
        );
        Ok(self.store.update(&post).await?)
    }

    /// Any authenticated caller may remove any comment; neither the comment
    /// author nor the post owner is checked.
    pub async fn remove_comment(
        &self,
        _caller: &CurrentUser,
        id: &str,
        comment_id: &str,
    ) -> AppResult<()> {
        let mut post = self.find(id).await?;

        let index = post
            .comment_position(comment_id)
            .ok_or(AppError::NotFound(COMMENT_NOT_FOUND))?;

        post.comments.remove(index);
        self.store.update(&post).await?;
        Ok(())
    }

    pub async fn delete(&self, caller: &CurrentUser, id: &str) -> AppResult<()> {
        let post = self.find(id).await?;

        if post.user != caller.id {
            return Err(AppError::Unauthorized(NOT_OWNER));
        }

        if !self.store.delete(&post.id).await? {
            return Err(AppError::NotFound(POST_NOT_FOUND));
        }
        Ok(())
    }

    async fn find(&self, id: &str) -> AppResult<Post> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(POST_NOT_FOUND))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A user-authored text post with its likes and comments embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub user: String,
    pub text: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    /// Most recent first. At most one entry per user.
    #[serde(default)]
    pub likes: Vec<Like>,
    /// Most recent first.
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub user: String,
    pub text: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub date: DateTime<Utc>,
}

/// A post that has not been stored yet. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub user: String,
    pub text: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub date: DateTime<Utc>,
}

impl NewPost {
    pub fn into_post(self, id: String) -> Post {
        Post {
            id,
            user: self.user,
            text: self.text,
            name: self.name,
            avatar: self.avatar,
            likes: Vec::new(),
            comments: Vec::new(),
            date: self.date,
        }
    }
}

/// Request body shared by "create post" and "add comment".
///
/// Any `user` field in the incoming JSON is dropped on deserialization; the
/// owner always comes from the authenticated caller.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PostInput {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 300,
        message = "Text must be between 1 and 300 characters"
    ))]
    pub text: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(length(max = 2048, message = "Avatar must be at most 2048 characters"))]
    pub avatar: Option<String>,
}

impl Post {
    pub fn liked_by(&self, user: &str) -> bool {
        self.likes.iter().any(|like| like.user == user)
    }

    pub fn comment_position(&self, comment_id: &str) -> Option<usize> {
        self.comments.iter().position(|c| c.id == comment_id)
    }
}

//! The fixed suite: sixteen steps run in declaration order.
//!
//! Each step is a row of static facts (method, expected status, gating,
//! prerequisite, capture rule) plus two builders that read the session: the
//! endpoint path and the JSON payload.

use serde_json::{json, Value};

use super::client::HttpMethod;
use super::context::TestContext;
use super::state::SessionState;

/// Message recorded when a step needs a blog that was never created
pub const NO_BLOG_ID: &str = "No blog ID available";

/// An identifier a step lifts out of a successful response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    AuthToken,
    UserId,
    CategoryId,
    BlogId,
    CommentId,
}

impl Capture {
    /// JSON pointers tried in order; the first present value wins.
    ///
    /// Categories come back as `id`, `_id` or `categoryId` depending on the
    /// server build, so all three are accepted.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Capture::AuthToken => &["/data/token"],
            Capture::UserId => &["/data/user/id"],
            Capture::CategoryId => &[
                "/data/category/id",
                "/data/category/_id",
                "/data/category/categoryId",
            ],
            Capture::BlogId => &["/data/blog/id"],
            Capture::CommentId => &["/data/comment/id"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Capture::AuthToken => "auth token",
            Capture::UserId => "user ID",
            Capture::CategoryId => "category ID",
            Capture::BlogId => "blog ID",
            Capture::CommentId => "comment ID",
        }
    }

    /// Pull the identifier out of a response body.
    ///
    /// Null, empty strings and non-scalar values are treated as absent.
    /// Numeric ids are kept in their decimal form.
    pub fn extract(self, body: &Value) -> Option<String> {
        self.candidates().iter().find_map(|pointer| {
            match body.pointer(pointer)? {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }
        })
    }
}

/// Session value a step cannot run without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    BlogId,
}

impl Prerequisite {
    pub fn is_met(self, session: &SessionState) -> bool {
        match self {
            Prerequisite::BlogId => session.captured(Capture::BlogId).is_some(),
        }
    }

    pub fn missing_message(self) -> &'static str {
        match self {
            Prerequisite::BlogId => NO_BLOG_ID,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    HealthCheck,
    UserRegistration,
    UserLogin,
    GetUserProfile,
    UpdateUserProfile,
    CreateCategory,
    GetAllCategories,
    CreateBlogPost,
    GetAllBlogs,
    GetBlogById,
    UpdateBlog,
    PublishBlog,
    CreateComment,
    GetCommentsByBlog,
    ToggleLikeBlog,
    GetLikeStatus,
}

impl Step {
    /// Execution order
    pub const ALL: [Step; 16] = [
        Step::HealthCheck,
        Step::UserRegistration,
        Step::UserLogin,
        Step::GetUserProfile,
        Step::UpdateUserProfile,
        Step::CreateCategory,
        Step::GetAllCategories,
        Step::CreateBlogPost,
        Step::GetAllBlogs,
        Step::GetBlogById,
        Step::UpdateBlog,
        Step::PublishBlog,
        Step::CreateComment,
        Step::GetCommentsByBlog,
        Step::ToggleLikeBlog,
        Step::GetLikeStatus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::HealthCheck => "Health Check",
            Step::UserRegistration => "User Registration",
            Step::UserLogin => "User Login",
            Step::GetUserProfile => "Get User Profile",
            Step::UpdateUserProfile => "Update User Profile",
            Step::CreateCategory => "Create Category",
            Step::GetAllCategories => "Get All Categories",
            Step::CreateBlogPost => "Create Blog Post",
            Step::GetAllBlogs => "Get All Blogs",
            Step::GetBlogById => "Get Blog By ID",
            Step::UpdateBlog => "Update Blog",
            Step::PublishBlog => "Publish Blog",
            Step::CreateComment => "Create Comment",
            Step::GetCommentsByBlog => "Get Comments By Blog",
            Step::ToggleLikeBlog => "Toggle Like Blog",
            Step::GetLikeStatus => "Get Like Status",
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Step::HealthCheck
            | Step::GetUserProfile
            | Step::GetAllCategories
            | Step::GetAllBlogs
            | Step::GetBlogById
            | Step::GetCommentsByBlog
            | Step::GetLikeStatus => HttpMethod::Get,
            Step::UserRegistration
            | Step::UserLogin
            | Step::CreateCategory
            | Step::CreateBlogPost
            | Step::PublishBlog
            | Step::CreateComment
            | Step::ToggleLikeBlog => HttpMethod::Post,
            Step::UpdateUserProfile | Step::UpdateBlog => HttpMethod::Put,
        }
    }

    /// Whether the session token is attached
    pub fn auth_required(self) -> bool {
        !matches!(
            self,
            Step::HealthCheck
                | Step::UserRegistration
                | Step::UserLogin
                | Step::GetAllCategories
                | Step::GetAllBlogs
                | Step::GetBlogById
                | Step::GetCommentsByBlog
        )
    }

    pub fn expected_status(self) -> u16 {
        match self {
            Step::UserRegistration
            | Step::CreateCategory
            | Step::CreateBlogPost
            | Step::CreateComment => 201,
            _ => 200,
        }
    }

    /// A failed gating step stops the run
    pub fn is_gating(self) -> bool {
        matches!(
            self,
            Step::HealthCheck | Step::UserRegistration | Step::UserLogin
        )
    }

    pub fn prerequisite(self) -> Option<Prerequisite> {
        match self {
            Step::GetBlogById
            | Step::UpdateBlog
            | Step::PublishBlog
            | Step::CreateComment
            | Step::GetCommentsByBlog
            | Step::ToggleLikeBlog
            | Step::GetLikeStatus => Some(Prerequisite::BlogId),
            _ => None,
        }
    }

    pub fn capture(self) -> Option<Capture> {
        match self {
            Step::UserRegistration => Some(Capture::UserId),
            Step::UserLogin => Some(Capture::AuthToken),
            Step::CreateCategory => Some(Capture::CategoryId),
            Step::CreateBlogPost => Some(Capture::BlogId),
            Step::CreateComment => Some(Capture::CommentId),
            _ => None,
        }
    }

    /// Endpoint relative to the API prefix
    pub fn endpoint(self, session: &SessionState) -> String {
        let blog_id = session.captured(Capture::BlogId).unwrap_or("{blogId}");
        match self {
            Step::HealthCheck => "health".to_string(),
            Step::UserRegistration => "users/register".to_string(),
            Step::UserLogin => "users/login".to_string(),
            Step::GetUserProfile | Step::UpdateUserProfile => "users/profile".to_string(),
            Step::CreateCategory | Step::GetAllCategories => "categories".to_string(),
            Step::CreateBlogPost | Step::GetAllBlogs => "blogs".to_string(),
            Step::GetBlogById | Step::UpdateBlog => format!("blogs/{}", blog_id),
            Step::PublishBlog => format!("blogs/{}/publish", blog_id),
            Step::CreateComment => "comments".to_string(),
            Step::GetCommentsByBlog => format!("comments/blog/{}", blog_id),
            Step::ToggleLikeBlog => "likes/toggle".to_string(),
            Step::GetLikeStatus => format!("likes/status/blog/{}", blog_id),
        }
    }

    /// Request body, `None` for steps that send none
    pub fn payload(self, context: &TestContext, session: &SessionState) -> Option<Value> {
        let user = &context.user;
        match self {
            Step::UserRegistration => Some(json!({
                "email": user.email,
                "username": user.username,
                "password": user.password,
                "firstName": user.first_name,
                "lastName": user.last_name,
            })),
            Step::UserLogin => Some(json!({
                "email": user.email,
                "password": user.password,
            })),
            Step::UpdateUserProfile => Some(json!({
                "firstName": "Updated",
                "lastName": "User",
                "bio": "This is my updated bio",
            })),
            Step::CreateCategory => Some(json!({
                "name": format!("Test Category {}", context.time_tag()),
                "description": "A test category for blogs",
            })),
            Step::CreateBlogPost => Some(json!({
                "title": format!("Test Blog Post {}", context.time_tag()),
                "content": "<h1>Test Content</h1><p>This is a test blog post with HTML content.</p>",
                "excerpt": "This is a test excerpt",
                "categoryId": session.captured(Capture::CategoryId),
                "tags": ["test", "blog", "api"],
                "status": "draft",
                "isPublic": true,
            })),
            Step::UpdateBlog => Some(json!({
                "title": format!("Updated Blog Post {}", context.time_tag()),
                "content": "<h1>Updated Content</h1><p>This blog post has been updated.</p>",
            })),
            Step::PublishBlog => Some(json!({})),
            Step::CreateComment => Some(json!({
                "blogId": session.captured(Capture::BlogId),
                "content": "This is a test comment on the blog post.",
            })),
            Step::ToggleLikeBlog => Some(json!({
                "targetId": session.captured(Capture::BlogId),
                "targetType": "blog",
            })),
            Step::HealthCheck
            | Step::GetUserProfile
            | Step::GetAllCategories
            | Step::GetAllBlogs
            | Step::GetBlogById
            | Step::GetCommentsByBlog
            | Step::GetLikeStatus => None,
        }
    }
}

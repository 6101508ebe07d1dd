//! Domain types and models

pub mod analytics;
pub mod content;
pub mod credentials;
pub mod payload;
pub mod request;
pub mod session;
pub mod user;

pub use analytics::{AnalyticsOverview, DailyViews};
pub use content::{
    Category, CategoryInput, Comment, CommentStatus, NewComment, Post, PostInput, PostQuery,
    PostStatus, Tag, TagInput,
};
pub use credentials::{CredentialKey, CredentialPair, RefreshRequest, RefreshedCredentials};
pub use payload::{Envelope, ErrorPayload, Paginated};
pub use request::{HttpMethod, RequestDescriptor};
pub use session::SessionExpired;
pub use user::{AuthSession, LoginRequest, RegisterRequest, User, UserQuery, UserRole};

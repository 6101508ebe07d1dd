//! Typed blog and admin endpoints
//!
//! Thin wrappers over [`ApiClient`] that build the request, unwrap the
//! `{ data }` envelope and decode it into domain types. Identifiers are
//! percent-encoded before they become path segments.

use std::sync::Arc;

use inkpost_domain::{
    AnalyticsOverview, AuthSession, Category, CategoryInput, Comment, CommentStatus, CredentialKey,
    Envelope, LoginRequest, NewComment, Paginated, Post, PostInput, PostQuery, RefreshRequest,
    RegisterRequest, RequestDescriptor, Tag, TagInput, User, UserQuery, UserRole,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, instrument, warn};
use urlencoding::encode;

use super::client::ApiClient;
use super::errors::ApiError;

/// Blog and admin API operations
#[derive(Clone)]
pub struct BlogApi {
    client: Arc<ApiClient>,
}

impl BlogApi {
    /// Endpoints over a shared client
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// The underlying client
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    async fn data<T: DeserializeOwned>(&self, request: RequestDescriptor) -> Result<T, ApiError> {
        let envelope: Envelope<T> = self.client.send(request).await?;
        Ok(envelope.into_data())
    }

    async fn discard(&self, request: RequestDescriptor) -> Result<(), ApiError> {
        self.client.execute(request).await.map(|_| ())
    }

    // === Auth ===

    /// Sign in and persist the issued credential pair
    ///
    /// # Errors
    ///
    /// Returns error if the credentials are rejected or cannot be stored
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<User, ApiError> {
        let session: AuthSession = self.data(RequestDescriptor::post("/auth/login").json(request)?).await?;
        self.client.store().store_pair(&session.credentials).await?;

        info!(user_id = %session.user.id, "signed in");
        Ok(session.user)
    }

    /// Create an account; the server signs the new user in
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        let session: AuthSession =
            self.data(RequestDescriptor::post("/auth/register").json(request)?).await?;
        self.client.store().store_pair(&session.credentials).await?;

        info!(user_id = %session.user.id, "registered");
        Ok(session.user)
    }

    /// Sign out
    ///
    /// The server call is best effort; local credentials are cleared whether
    /// or not it succeeds.
    ///
    /// # Errors
    ///
    /// Returns error only if the local credential store cannot be cleared
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let store = self.client.store();

        match store.get(CredentialKey::RefreshToken).await {
            Ok(Some(refresh_token)) => {
                let body = RefreshRequest { refresh_token };
                // An expired session here is not worth a refresh or a redirect.
                let result = match RequestDescriptor::post("/auth/logout").json(&body) {
                    Ok(request) => self.discard(request.without_refresh()).await,
                    Err(e) => Err(e.into()),
                };
                if let Err(e) = result {
                    warn!(error = %e, "server-side logout failed");
                }
            }
            Ok(None) => debug!("no refresh credential, skipping server-side logout"),
            Err(e) => warn!(error = %e, "could not read refresh credential"),
        }

        store.clear().await?;
        info!("signed out");
        Ok(())
    }

    /// The signed-in user
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.data(RequestDescriptor::get("/auth/me")).await
    }

    // === Posts ===

    /// List posts with pagination and filters
    #[instrument(skip(self))]
    pub async fn list_posts(&self, query: &PostQuery) -> Result<Paginated<Post>, ApiError> {
        let request = RequestDescriptor::get("/posts")
            .query_opt("page", query.page)
            .query_opt("limit", query.limit)
            .query_opt("search", query.search.as_deref())
            .query_opt("category", query.category.as_deref())
            .query_opt("tag", query.tag.as_deref())
            .query_opt("status", query.status.as_ref());

        let page: Paginated<Post> = self.data(request).await?;
        debug!(count = page.items.len(), total = page.total, "posts listed");
        Ok(page)
    }

    /// Get a post by id or slug
    #[instrument(skip(self))]
    pub async fn get_post(&self, id_or_slug: &str) -> Result<Post, ApiError> {
        self.data(RequestDescriptor::get(format!("/posts/{}", encode(id_or_slug)))).await
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_post(&self, input: &PostInput) -> Result<Post, ApiError> {
        let post: Post = self.data(RequestDescriptor::post("/posts").json(input)?).await?;
        info!(post_id = %post.id, "post created");
        Ok(post)
    }

    #[instrument(skip(self, input))]
    pub async fn update_post(&self, id: &str, input: &PostInput) -> Result<Post, ApiError> {
        let path = format!("/posts/{}", encode(id));
        self.data(RequestDescriptor::put(path).json(input)?).await
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: &str) -> Result<(), ApiError> {
        self.discard(RequestDescriptor::delete(format!("/posts/{}", encode(id)))).await
    }

    // === Categories & tags ===

    /// All categories
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.data(RequestDescriptor::get("/categories")).await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        self.data(RequestDescriptor::post("/categories").json(input)?).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_category(
        &self,
        id: &str,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        let path = format!("/categories/{}", encode(id));
        self.data(RequestDescriptor::put(path).json(input)?).await
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.discard(RequestDescriptor::delete(format!("/categories/{}", encode(id)))).await
    }

    /// All tags
    pub async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.data(RequestDescriptor::get("/tags")).await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_tag(&self, input: &TagInput) -> Result<Tag, ApiError> {
        self.data(RequestDescriptor::post("/tags").json(input)?).await
    }

    #[instrument(skip(self))]
    pub async fn delete_tag(&self, id: &str) -> Result<(), ApiError> {
        self.discard(RequestDescriptor::delete(format!("/tags/{}", encode(id)))).await
    }

    // === Comments ===

    /// Comments on a post, oldest first
    #[instrument(skip(self))]
    pub async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, ApiError> {
        self.data(RequestDescriptor::get(format!("/posts/{}/comments", encode(post_id)))).await
    }

    #[instrument(skip(self, comment))]
    pub async fn create_comment(
        &self,
        post_id: &str,
        comment: &NewComment,
    ) -> Result<Comment, ApiError> {
        let path = format!("/posts/{}/comments", encode(post_id));
        self.data(RequestDescriptor::post(path).json(comment)?).await
    }

    /// Approve, reject or flag a comment
    #[instrument(skip(self))]
    pub async fn moderate_comment(
        &self,
        id: &str,
        status: CommentStatus,
    ) -> Result<Comment, ApiError> {
        let path = format!("/comments/{}", encode(id));
        self.data(RequestDescriptor::patch(path).json(&json!({ "status": status }))?).await
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, id: &str) -> Result<(), ApiError> {
        self.discard(RequestDescriptor::delete(format!("/comments/{}", encode(id)))).await
    }

    // === Admin ===

    #[instrument(skip(self))]
    pub async fn list_users(&self, query: &UserQuery) -> Result<Paginated<User>, ApiError> {
        let request = RequestDescriptor::get("/admin/users")
            .query_opt("page", query.page)
            .query_opt("limit", query.limit)
            .query_opt("search", query.search.as_deref())
            .query_opt("role", query.role.as_ref());

        self.data(request).await
    }

    #[instrument(skip(self))]
    pub async fn update_user_role(&self, id: &str, role: UserRole) -> Result<User, ApiError> {
        let path = format!("/admin/users/{}/role", encode(id));
        let user: User = self.data(RequestDescriptor::patch(path).json(&json!({ "role": role }))?).await?;
        info!(user_id = %user.id, role = %user.role, "user role updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.discard(RequestDescriptor::delete(format!("/admin/users/{}", encode(id)))).await
    }

    /// Dashboard totals and daily views
    pub async fn analytics_overview(&self) -> Result<AnalyticsOverview, ApiError> {
        self.data(RequestDescriptor::get("/admin/analytics/overview")).await
    }
}

#[cfg(test)]
mod tests {
    use inkpost_domain::CredentialPair;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::ApiClientConfig;
    use crate::storage::MemoryCredentialStore;

    fn api_for(server: &MockServer, store: Arc<MemoryCredentialStore>) -> BlogApi {
        let config = ApiClientConfig { base_url: server.uri(), ..Default::default() };
        BlogApi::new(Arc::new(ApiClient::builder().config(config).store(store).build().unwrap()))
    }

    #[tokio::test]
    async fn ids_are_percent_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/posts/a%2Fb"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let api = api_for(&server, Arc::new(MemoryCredentialStore::new()));
        api.delete_post("a/b").await.unwrap();
    }

    #[tokio::test]
    async fn logout_clears_store_even_when_server_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .and(body_json(json!({ "refreshToken": "R1" })))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::with_pair(&CredentialPair::new("T1", "R1")));
        let api = api_for(&server, store.clone());

        api.logout().await.unwrap();
        assert!(store.is_empty());
    }
}

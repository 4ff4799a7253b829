//! The posts resource client: request building, transport and token storage
//! wired together.

use tracing::{debug, warn};

use crate::client::{parse_payload, PostsClient, RequestOptions};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Payload};
use crate::storage::{Storage, TokenStorage};
use crate::transport::Transport;
use crate::types::{PageParams, Post, PostDraft};

/// Posts API over a transport `T`, with its bearer token kept in `S`.
///
/// The token is read from storage for every request, so a token stored or
/// cleared between calls takes effect on the next one.
#[derive(Debug)]
pub struct PostsApi<T, S> {
    client: PostsClient,
    transport: T,
    tokens: TokenStorage<S>,
}

impl<T: Transport, S: Storage> PostsApi<T, S> {
    pub fn new(client: PostsClient, transport: T, tokens: TokenStorage<S>) -> Self {
        Self { client, transport, tokens }
    }

    pub fn client(&self) -> &PostsClient {
        &self.client
    }

    pub fn tokens(&self) -> &TokenStorage<S> {
        &self.tokens
    }

    /// Issue a request for `path` and return its payload.
    pub fn request(&self, path: &str, options: RequestOptions) -> Result<Payload, ApiError> {
        let token = self.tokens.token()?;
        let request = self.client.build_request(path, options, token.as_deref());
        parse_payload(self.send(request)?)
    }

    /// There is no login route on the back end yet.
    pub fn login(&self, _email: &str, _password: &str) -> Result<(), ApiError> {
        Err(ApiError::LoginNotImplemented)
    }

    /// Search when `query` has non-whitespace content, list a page otherwise.
    pub fn get_posts(&self, query: Option<&str>, page: PageParams) -> Result<Vec<Post>, ApiError> {
        let token = self.tokens.token()?;
        let request = match query.filter(|q| !q.trim().is_empty()) {
            Some(query) => self.client.build_search_posts(query, token.as_deref()),
            None => self.client.build_list_posts(page, token.as_deref()),
        };
        self.client.parse_posts(self.send(request)?)
    }

    pub fn get_post(&self, id: &str) -> Result<Post, ApiError> {
        let token = self.tokens.token()?;
        let request = self.client.build_get_post(id, token.as_deref());
        self.client.parse_post(self.send(request)?)
    }

    pub fn create_post(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        let token = self.tokens.token()?;
        let request = self.client.build_create_post(draft, token.as_deref())?;
        self.client.parse_post(self.send(request)?)
    }

    pub fn update_post(&self, id: &str, draft: &PostDraft) -> Result<Post, ApiError> {
        let token = self.tokens.token()?;
        let request = self.client.build_update_post(id, draft, token.as_deref())?;
        self.client.parse_post(self.send(request)?)
    }

    pub fn delete_post(&self, id: &str) -> Result<Payload, ApiError> {
        let token = self.tokens.token()?;
        let request = self.client.build_delete_post(id, token.as_deref());
        self.client.parse_delete_post(self.send(request)?)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method;
        let url = request.path.clone();
        debug!(%method, %url, authorized = request.header("authorization").is_some(), "sending request");

        let response = self.transport.execute(request).inspect_err(|e| {
            warn!(%method, %url, error = %e, "request failed before a response arrived");
        })?;
        if !response.is_success() {
            warn!(%method, %url, status = response.status, "server returned an error status");
        }
        Ok(response)
    }
}

//! Stateless HTTP request builder and response parser for the posts API.
//!
//! # Design
//! `PostsClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`; [`PostsApi`](crate::api::PostsApi) wires
//! the two together over a transport. The bearer token is passed in per call
//! so it always reflects what storage holds at request time.

use crate::error::ApiError;
use crate::http::{merge_headers, HttpMethod, HttpRequest, HttpResponse, Payload};
use crate::types::{to_back, BackPost, PageParams, Post, PostDraft};

const JSON: &str = "application/json";

/// Method, body and extra headers for a generic request.
///
/// `headers` are merged last, so they override the defaults on collision.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { method: HttpMethod::Get, body: None, headers: Vec::new() }
    }
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self { method, ..Default::default() }
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Synchronous, stateless client for the posts API.
#[derive(Debug, Clone)]
pub struct PostsClient {
    base_url: String,
}

impl PostsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `path` relative to the base URL.
    ///
    /// Headers are, in order: `Content-Type: application/json`, the bearer
    /// token when one is present, then the caller's headers.
    pub fn build_request(&self, path: &str, options: RequestOptions, token: Option<&str>) -> HttpRequest {
        let mut headers = vec![("Content-Type".to_string(), JSON.to_string())];
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        merge_headers(&mut headers, options.headers);

        HttpRequest {
            method: options.method,
            path: format!("{}{path}", self.base_url),
            headers,
            body: options.body,
        }
    }

    pub fn build_list_posts(&self, page: PageParams, token: Option<&str>) -> HttpRequest {
        let path = format!("/posts?limit={}&page={}", page.limit, page.page);
        self.build_request(&path, RequestOptions::default(), token)
    }

    pub fn build_search_posts(&self, query: &str, token: Option<&str>) -> HttpRequest {
        let path = format!("/posts/search?search={}", urlencoding::encode(query));
        self.build_request(&path, RequestOptions::default(), token)
    }

    pub fn build_get_post(&self, id: &str, token: Option<&str>) -> HttpRequest {
        self.build_request(&post_path(id), RequestOptions::default(), token)
    }

    pub fn build_create_post(&self, draft: &PostDraft, token: Option<&str>) -> Result<HttpRequest, ApiError> {
        let body = serialize(&to_back(draft))?;
        Ok(self.build_request("/posts", RequestOptions::new(HttpMethod::Post).with_body(body), token))
    }

    /// The path id always wins over any id already present in `draft`.
    pub fn build_update_post(
        &self,
        id: &str,
        draft: &PostDraft,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let draft = PostDraft { id: Some(id.to_string()), ..draft.clone() };
        let body = serialize(&to_back(&draft))?;
        Ok(self.build_request(&post_path(id), RequestOptions::new(HttpMethod::Put).with_body(body), token))
    }

    pub fn build_delete_post(&self, id: &str, token: Option<&str>) -> HttpRequest {
        self.build_request(&post_path(id), RequestOptions::new(HttpMethod::Delete), token)
    }

    /// Parse a list or search response.
    pub fn parse_posts(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        let records: Vec<BackPost> = parse_payload(response)?.into_json()?;
        Ok(records.into_iter().map(Post::from).collect())
    }

    /// Parse a get, create or update response.
    pub fn parse_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        let record: BackPost = parse_payload(response)?.into_json()?;
        Ok(record.into())
    }

    pub fn parse_delete_post(&self, response: HttpResponse) -> Result<Payload, ApiError> {
        parse_payload(response)
    }
}

/// Turn a response into a `Payload`, or an `ApiError::Http` for non-2xx.
///
/// The error message is the response body, or `HTTP <status>` when the body
/// is empty. Successful responses are parsed as JSON only when the content
/// type says so; anything else (a bare 204 included) comes back as text.
pub fn parse_payload(response: HttpResponse) -> Result<Payload, ApiError> {
    if !response.is_success() {
        let message = if response.body.is_empty() {
            format!("HTTP {}", response.status)
        } else {
            response.body
        };
        return Err(ApiError::Http { status: response.status, message });
    }

    if response.content_type().contains(JSON) {
        serde_json::from_str(&response.body)
            .map(Payload::Json)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    } else {
        Ok(Payload::Text(response.body))
    }
}

fn post_path(id: &str) -> String {
    format!("/posts/{}", urlencoding::encode(id))
}

fn serialize(record: &BackPost) -> Result<String, ApiError> {
    serde_json::to_string(record).map_err(|e| ApiError::Serialization(e.to_string()))
}

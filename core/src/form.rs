//! Headless controller for the "new post" form.
//!
//! Holds field values plus the loading and error state a UI renders, and
//! turns a submit into a `create_post` call. On success the caller gets the
//! route to navigate to.

use tracing::info;

use crate::api::PostsApi;
use crate::storage::Storage;
use crate::transport::Transport;
use crate::types::PostDraft;

/// Shown when a failed submit produced an error with no message.
pub const CREATE_FAILED_FALLBACK: &str = "failed to create post";

/// Which fields a submit sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormVariant {
    /// Title, author and content only.
    #[default]
    Basic,
    /// Also sends disciplina and turma.
    WithClassification,
}

#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub title: String,
    pub author: String,
    pub content: String,
    pub disciplina: String,
    pub turma: String,
    variant: FormVariant,
    loading: bool,
    error: Option<String>,
}

impl PostForm {
    pub fn new(variant: FormVariant) -> Self {
        Self { variant, ..Default::default() }
    }

    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a UI should enable its submit control. `submit` blocks until
    /// the request finishes, so this only reads `false` to a renderer that
    /// observes the form from another handle while the call is in flight.
    pub fn can_submit(&self) -> bool {
        !self.loading
    }

    /// Message of the last failed submit, cleared when a new one starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The draft a submit sends for the current field values.
    pub fn draft(&self) -> PostDraft {
        let mut draft = PostDraft {
            title: Some(self.title.clone()),
            author: Some(self.author.clone()),
            content: Some(self.content.clone()),
            ..Default::default()
        };
        if self.variant == FormVariant::WithClassification {
            draft.disciplina = Some(self.disciplina.clone());
            draft.turma = Some(self.turma.clone()).filter(|t| !t.is_empty());
        }
        draft
    }

    /// Create the post. Returns the route of the new post on success; on
    /// failure the message is kept in [`error`](Self::error).
    pub fn submit<T: Transport, S: Storage>(&mut self, api: &PostsApi<T, S>) -> Option<String> {
        self.loading = true;
        self.error = None;

        let outcome = api.create_post(&self.draft());
        self.loading = false;

        match outcome {
            Ok(post) => {
                info!(id = %post.id, "post created");
                Some(format!("/post/{}", post.id))
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(if message.is_empty() { CREATE_FAILED_FALLBACK.to_string() } else { message });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PostsClient;
    use crate::error::ApiError;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::storage::{MemoryStorage, TokenStorage};

    struct Fixed(Result<HttpResponse, String>);

    impl Transport for Fixed {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.0.clone().map_err(ApiError::Transport)
        }
    }

    fn api(outcome: Result<HttpResponse, String>) -> PostsApi<Fixed, MemoryStorage> {
        PostsApi::new(
            PostsClient::new("http://api.test"),
            Fixed(outcome),
            TokenStorage::new("fiap.jwt", MemoryStorage::new()),
        )
    }

    fn filled(variant: FormVariant) -> PostForm {
        let mut form = PostForm::new(variant);
        form.title = "Frações".into();
        form.author = "Ana".into();
        form.content = "Somando frações".into();
        form.disciplina = "Matemática".into();
        form
    }

    #[test]
    fn basic_variant_leaves_classification_out() {
        let draft = filled(FormVariant::Basic).draft();
        assert_eq!(draft.title.as_deref(), Some("Frações"));
        assert_eq!(draft.disciplina, None);
        assert_eq!(draft.turma, None);
    }

    #[test]
    fn classification_variant_sends_disciplina() {
        let draft = filled(FormVariant::WithClassification).draft();
        assert_eq!(draft.disciplina.as_deref(), Some("Matemática"));
        assert_eq!(draft.turma, None);
    }

    #[test]
    fn success_navigates_to_new_post() {
        let created = HttpResponse {
            status: 201,
            headers: vec![("content-type".into(), "application/json".into())],
            body: r#"{"id":"abc","titulo":"Frações","autor":"Ana","conteudo":"x","disciplina":""}"#.into(),
        };
        let mut form = filled(FormVariant::Basic);
        assert_eq!(form.submit(&api(Ok(created))).as_deref(), Some("/post/abc"));
        assert!(!form.is_loading());
        assert_eq!(form.error(), None);
    }

    #[test]
    fn failure_shows_server_message() {
        let rejected = HttpResponse { status: 400, headers: Vec::new(), body: "Title required".into() };
        let mut form = PostForm::new(FormVariant::Basic);
        assert_eq!(form.submit(&api(Ok(rejected))), None);
        assert_eq!(form.error(), Some("Title required"));
        assert!(form.can_submit());
    }

    #[test]
    fn resubmit_after_failure_clears_previous_error() {
        let rejected = HttpResponse { status: 400, headers: Vec::new(), body: "Title required".into() };
        let created = HttpResponse {
            status: 201,
            headers: vec![("content-type".into(), "application/json".into())],
            body: r#"{"id":"p2","titulo":"t","autor":"a","conteudo":"c","disciplina":""}"#.into(),
        };
        let mut form = filled(FormVariant::Basic);
        assert_eq!(form.submit(&api(Ok(rejected))), None);
        assert!(form.can_submit());
        assert_eq!(form.submit(&api(Ok(created))).as_deref(), Some("/post/p2"));
        assert_eq!(form.error(), None);
    }

    #[test]
    fn empty_error_message_uses_fallback() {
        let mut form = filled(FormVariant::Basic);
        assert_eq!(form.submit(&api(Err(String::new()))), None);
        assert_eq!(form.error(), Some(CREATE_FAILED_FALLBACK));
        assert!(!form.is_loading());
    }
}

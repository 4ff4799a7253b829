use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

/// A post as the back end stores and returns it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Postagem {
    pub id: String,
    pub disciplina: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turma: Option<String>,
    pub titulo: String,
    pub conteudo: String,
    pub autor: String,
    pub created_at: String,
}

/// Create/replace payload. `disciplina` must be present, even if empty.
#[derive(Debug, Deserialize)]
pub struct PostagemInput {
    #[serde(default)]
    pub id: Option<String>,
    pub disciplina: String,
    #[serde(default)]
    pub turma: Option<String>,
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub conteudo: String,
    #[serde(default)]
    pub autor: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search: String,
}

pub type Db = Arc<RwLock<Vec<Postagem>>>;

#[derive(Clone, Default)]
pub struct AppState {
    pub db: Db,
    /// When set, writes require `Authorization: Bearer <token>`.
    pub token: Option<String>,
}

/// Errors answered as plain-text bodies.
#[derive(Debug)]
pub enum ServerError {
    Validation(&'static str),
    Unauthorized,
    NotFound,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ServerError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ServerError::NotFound => (StatusCode::NOT_FOUND, "Post not found"),
        };
        (status, message).into_response()
    }
}

pub fn app() -> Router {
    router(AppState::default())
}

/// Same routes, with writes guarded by `token`.
pub fn app_with_token(token: impl Into<String>) -> Router {
    router(AppState { token: Some(token.into()), ..Default::default() })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/search", get(search_posts))
        .route("/posts/{id}", get(get_post).put(update_post).delete(delete_post))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock posts server listening");
    }
    axum::serve(listener, router).await
}

async fn list_posts(State(state): State<AppState>, Query(params): Query<ListParams>) -> Json<Vec<Postagem>> {
    let limit = params.limit.unwrap_or(20);
    let page = params.page.unwrap_or(1).max(1);
    let posts = state.db.read().await;
    let offset = (page - 1).saturating_mul(limit);
    Json(posts.iter().skip(offset).take(limit).cloned().collect())
}

async fn search_posts(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<Vec<Postagem>> {
    let needle = params.search.trim().to_lowercase();
    let posts = state.db.read().await;
    let hits = posts
        .iter()
        .filter(|p| {
            [&p.titulo, &p.conteudo, &p.autor, &p.disciplina]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    Json(hits)
}

async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Postagem>, ServerError> {
    let posts = state.db.read().await;
    posts.iter().find(|p| p.id == id).cloned().map(Json).ok_or(ServerError::NotFound)
}

async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<PostagemInput>,
) -> Result<(StatusCode, Json<Postagem>), ServerError> {
    authorize(&state, &headers)?;
    validate(&input)?;
    let post = Postagem {
        id: Uuid::new_v4().to_string(),
        disciplina: input.disciplina,
        turma: input.turma,
        titulo: input.titulo,
        conteudo: input.conteudo,
        autor: input.autor,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    debug!(id = %post.id, "created post");
    state.db.write().await.push(post.clone());
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<PostagemInput>,
) -> Result<Json<Postagem>, ServerError> {
    authorize(&state, &headers)?;
    if input.id.as_deref().is_some_and(|body_id| body_id != id) {
        return Err(ServerError::Validation("Id mismatch"));
    }
    validate(&input)?;
    let mut posts = state.db.write().await;
    let post = posts.iter_mut().find(|p| p.id == id).ok_or(ServerError::NotFound)?;
    post.disciplina = input.disciplina;
    post.turma = input.turma;
    post.titulo = input.titulo;
    post.conteudo = input.conteudo;
    post.autor = input.autor;
    Ok(Json(post.clone()))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ServerError> {
    authorize(&state, &headers)?;
    let mut posts = state.db.write().await;
    let index = posts.iter().position(|p| p.id == id).ok_or(ServerError::NotFound)?;
    posts.remove(index);
    Ok(StatusCode::NO_CONTENT)
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ServerError> {
    let Some(expected) = state.token.as_deref() else {
        return Ok(());
    };
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if presented == Some(expected) {
        Ok(())
    } else {
        Err(ServerError::Unauthorized)
    }
}

fn validate(input: &PostagemInput) -> Result<(), ServerError> {
    if input.titulo.trim().is_empty() {
        return Err(ServerError::Validation("Title required"));
    }
    if input.autor.trim().is_empty() {
        return Err(ServerError::Validation("Author required"));
    }
    if input.conteudo.trim().is_empty() {
        return Err(ServerError::Validation("Content required"));
    }
    Ok(())
}

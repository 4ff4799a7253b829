//! Post records in the two shapes the client deals with, and the mapping
//! between them.
//!
//! # Design
//! `Post` is what callers work with; `BackPost` is what goes over the wire.
//! The mapping is lossy and defaulting rather than validating: required back
//! fields that the caller left out are sent as empty strings and the server
//! decides whether that is acceptable.

use serde::{Deserialize, Deserializer, Serialize};

/// A post in the shape callers work with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub author: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disciplina: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turma: Option<String>,
}

/// A partially filled post, used as input to create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disciplina: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turma: Option<String>,
}

/// A post in the server's wire shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackPost {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub disciplina: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turma: Option<String>,
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub conteudo: String,
    #[serde(default)]
    pub autor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<BackPost> for Post {
    fn from(back: BackPost) -> Self {
        Post {
            id: back.id.unwrap_or_default(),
            title: back.titulo,
            author: back.autor,
            content: back.conteudo,
            summary: None,
            created_at: back.created_at,
            disciplina: Some(back.disciplina),
            turma: back.turma,
        }
    }
}

impl From<&PostDraft> for BackPost {
    fn from(draft: &PostDraft) -> Self {
        BackPost {
            id: draft.id.clone(),
            titulo: draft.title.clone().unwrap_or_default(),
            autor: draft.author.clone().unwrap_or_default(),
            conteudo: draft.content.clone().unwrap_or_default(),
            disciplina: draft.disciplina.clone().unwrap_or_default(),
            turma: draft.turma.clone(),
            created_at: None,
        }
    }
}

impl From<Post> for PostDraft {
    fn from(post: Post) -> Self {
        PostDraft {
            id: Some(post.id),
            title: Some(post.title),
            author: Some(post.author),
            content: Some(post.content),
            summary: post.summary,
            created_at: post.created_at,
            disciplina: post.disciplina,
            turma: post.turma,
        }
    }
}

/// Map a wire record to the caller's shape.
pub fn to_front(back: BackPost) -> Post {
    back.into()
}

/// Map a (partial) caller record to the wire shape.
pub fn to_back(draft: &PostDraft) -> BackPost {
    draft.into()
}

/// Pagination for the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub limit: u32,
    pub page: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self { limit: 20, page: 1 }
    }
}

/// Accept `"abc"`, `42` or `null` for an id; numbers are stringified.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    }))
}

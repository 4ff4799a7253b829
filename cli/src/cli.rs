use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use posts_core::{
    ApiConfig, FileStorage, FormVariant, PageParams, Payload, PostDraft, PostForm, PostsApi, PostsClient,
    TokenStorage, UreqTransport,
};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(author, version, about = "Command-line client for the posts API")]
pub struct Cli {
    /// JSON file holding the persisted bearer token.
    #[arg(long, env = "POSTS_STORAGE_PATH", default_value = ".posts-storage.json")]
    pub storage: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List a page of posts.
    List {
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search posts.
    Search { query: String },
    /// Show one post.
    Get { id: String },
    /// Create a post through the new-post form.
    Create(PostFields),
    /// Replace a post.
    Update {
        id: String,
        #[command(flatten)]
        fields: PostFields,
    },
    /// Delete a post.
    Delete { id: String },
    /// Log in (not supported by the back end yet).
    Login { email: String, password: String },
    /// Inspect or change the stored bearer token.
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Debug, Args)]
pub struct PostFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    #[arg(long)]
    pub disciplina: Option<String>,
    #[arg(long)]
    pub turma: Option<String>,
}

impl PostFields {
    fn into_draft(self) -> PostDraft {
        PostDraft {
            title: self.title,
            author: self.author,
            content: self.content,
            disciplina: self.disciplina,
            turma: self.turma,
            ..Default::default()
        }
    }

    fn has_classification(&self) -> bool {
        self.disciplina.is_some() || self.turma.is_some()
    }
}

#[derive(Debug, Subcommand)]
pub enum TokenAction {
    Set { token: String },
    Clear,
    /// Print the storage key the token lives under.
    Key,
}

type Api = PostsApi<UreqTransport, FileStorage>;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("Failed to load configuration")?;
    tracing::debug!(base_url = %config.base_url, storage = %cli.storage.display(), "configuration loaded");

    let api: Api = PostsApi::new(
        PostsClient::new(&config.base_url),
        UreqTransport::new(),
        TokenStorage::new(config.jwt_storage_key, FileStorage::new(cli.storage)),
    );

    match cli.command {
        Command::List { limit, page } => print_json(&api.get_posts(None, PageParams { limit, page })?),
        Command::Search { query } => print_json(&api.get_posts(Some(&query), PageParams::default())?),
        Command::Get { id } => print_json(&api.get_post(&id)?),
        Command::Create(fields) => create(&api, fields),
        Command::Update { id, fields } => print_json(&api.update_post(&id, &fields.into_draft())?),
        Command::Delete { id } => match api.delete_post(&id)? {
            Payload::Json(value) => print_json(&value),
            Payload::Text(text) if text.is_empty() => Ok(()),
            Payload::Text(text) => {
                println!("{text}");
                Ok(())
            }
        },
        Command::Login { email, password } => Ok(api.login(&email, &password)?),
        Command::Token { action } => token(&api, action),
    }
}

fn create(api: &Api, fields: PostFields) -> anyhow::Result<()> {
    let variant = if fields.has_classification() { FormVariant::WithClassification } else { FormVariant::Basic };
    let mut form = PostForm::new(variant);
    form.title = fields.title.unwrap_or_default();
    form.author = fields.author.unwrap_or_default();
    form.content = fields.content.unwrap_or_default();
    form.disciplina = fields.disciplina.unwrap_or_default();
    form.turma = fields.turma.unwrap_or_default();

    match form.submit(api) {
        Some(route) => {
            println!("{route}");
            Ok(())
        }
        None => anyhow::bail!("{}", form.error().unwrap_or(posts_core::form::CREATE_FAILED_FALLBACK)),
    }
}

fn token(api: &Api, action: TokenAction) -> anyhow::Result<()> {
    let tokens = api.tokens();
    match action {
        TokenAction::Set { token } => tokens.set_token(&token)?,
        TokenAction::Clear => tokens.clear()?,
        TokenAction::Key => println!("{}", tokens.key()),
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("serialize output")?);
    Ok(())
}

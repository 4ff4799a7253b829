use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_token, Postagem};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn body_text(response: axum::response::Response) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

const VALID: &str = r#"{"titulo":"Frações","autor":"Ana","conteudo":"Somando","disciplina":"Matemática"}"#;

// --- list ---

#[tokio::test]
async fn list_posts_empty() {
    let resp = app().oneshot(get("/posts")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<Postagem> = body_json(resp).await;
    assert!(posts.is_empty());
}

#[tokio::test]
async fn list_posts_huge_page_is_empty() {
    let resp = app()
        .oneshot(get(&format!("/posts?limit=2&page={}", usize::MAX)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<Postagem> = body_json(resp).await;
    assert!(posts.is_empty());
}

#[tokio::test]
async fn list_posts_huge_limit_past_first_page_is_empty() {
    let resp = app()
        .oneshot(get(&format!("/posts?limit={}&page=3", usize::MAX)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<Postagem> = body_json(resp).await;
    assert!(posts.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_post_returns_201_with_id_and_timestamp() {
    let resp = app().oneshot(json_request("POST", "/posts", VALID)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Postagem = body_json(resp).await;
    assert_eq!(post.titulo, "Frações");
    assert!(!post.id.is_empty());
    assert!(chrono::DateTime::parse_from_rfc3339(&post.created_at).is_ok());
}

#[tokio::test]
async fn create_post_without_title_returns_plain_text_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/posts",
            r#"{"titulo":"","autor":"Ana","conteudo":"x","disciplina":""}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(resp).await, "Title required");
}

#[tokio::test]
async fn create_post_missing_disciplina_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/posts", r#"{"titulo":"t","autor":"a","conteudo":"c"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_post_requires_token_when_configured() {
    let resp = app_with_token("secret")
        .oneshot(json_request("POST", "/posts", VALID))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(resp).await, "Unauthorized");

    let mut request = json_request("POST", "/posts", VALID);
    request
        .headers_mut()
        .insert(http::header::AUTHORIZATION, "Bearer secret".parse().unwrap());
    let resp = app_with_token("secret").oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn reads_are_public_when_token_configured() {
    let resp = app_with_token("secret").oneshot(get("/posts")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- get ---

#[tokio::test]
async fn get_post_not_found() {
    let resp = app().oneshot(get("/posts/missing")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "Post not found");
}

// --- update ---

#[tokio::test]
async fn update_post_not_found() {
    let resp = app()
        .oneshot(json_request("PUT", "/posts/missing", VALID))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_post_rejects_mismatched_body_id() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/posts/a",
            r#"{"id":"b","titulo":"t","autor":"a","conteudo":"c","disciplina":""}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(resp).await, "Id mismatch");
}

// --- delete ---

#[tokio::test]
async fn delete_post_not_found() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/posts/missing")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create two posts
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/posts", VALID))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Postagem = body_json(resp).await;
    let id = created.id.clone();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/posts",
            r#"{"titulo":"Fotossíntese","autor":"Bia","conteudo":"Plantas","disciplina":"Ciências","turma":"7B"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // list pages
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/posts?limit=1&page=2"))
        .await
        .unwrap();
    let page: Vec<Postagem> = body_json(resp).await;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].titulo, "Fotossíntese");
    assert_eq!(page[0].turma.as_deref(), Some("7B"));

    // search is case-insensitive
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/posts/search?search=FRA%C3%87%C3%95ES"))
        .await
        .unwrap();
    let hits: Vec<Postagem> = body_json(resp).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, id);

    // update replaces every field
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/posts/{id}"),
            &format!(r#"{{"id":"{id}","titulo":"Frações II","autor":"Ana","conteudo":"Subtraindo","disciplina":""}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Postagem = body_json(resp).await;
    assert_eq!(updated.titulo, "Frações II");
    assert_eq!(updated.disciplina, "");
    assert_eq!(updated.created_at, created.created_at);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/posts/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/posts/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

//! JSON REST API for the Reclaim lost-and-found board.
//!
//! Exposes an axum [`Router`] backed by any
//! [`BoardStore`](reclaim_core::store::BoardStore) and
//! [`MediaStore`](reclaim_core::media::MediaStore). TLS and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", reclaim_api::api_router(state))
//! ```

pub mod admin;
pub mod auth;
pub mod claims;
pub mod error;
pub mod media;
pub mod posts;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, patch, post},
};
use reclaim_core::{media::MediaStore, store::BoardStore};

pub use error::ApiError;
pub use media::LocalMediaStore;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, M> {
  pub store: Arc<S>,
  pub media: Arc<M>,
}

// Manual impl: `S` and `M` sit behind `Arc`s and need not be `Clone`
// themselves.
impl<S, M> Clone for AppState<S, M> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), media: self.media.clone() }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, M>(state: AppState<S, M>) -> Router<()>
where
  S: BoardStore + 'static,
  M: MediaStore + 'static,
{
  Router::new()
    // Identity
    .route("/register", post(users::register::<S, M>))
    .route("/login", post(users::login::<S, M>))
    // Posts
    .route("/posts", get(posts::list::<S, M>).post(posts::create::<S, M>))
    // Claims
    .route("/claims", post(claims::create::<S, M>))
    .route("/claims/{post_id}", get(claims::list_for_post::<S, M>))
    // Moderation
    .route("/admin/posts/pending", get(admin::pending_posts::<S, M>))
    .route("/admin/posts/approved", get(admin::approved_posts::<S, M>))
    .route("/admin/posts/{post_id}/claims", get(admin::post_claims::<S, M>))
    .route("/admin/posts/{post_id}/approve", patch(admin::approve_post::<S, M>))
    .route("/admin/claims/{claim_id}/approve", patch(admin::approve_claim::<S, M>))
    .route("/admin/claims/{claim_id}", delete(admin::reject_claim::<S, M>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use reclaim_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn make_state() -> AppState<SqliteStore, LocalMediaStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let uploads: PathBuf =
      std::env::temp_dir().join(format!("reclaim-api-test-{}", Uuid::new_v4()));
    AppState {
      store: Arc::new(store),
      media: Arc::new(LocalMediaStore::new(uploads, "/uploads")),
    }
  }

  async fn send(
    state: AppState<SqliteStore, LocalMediaStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = api_router(state)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn register(
    state: &AppState<SqliteStore, LocalMediaStore>,
    username: &str,
  ) -> Uuid {
    let (status, body) = send(
      state.clone(),
      "POST",
      "/register",
      Some(json!({
        "username": username,
        "password": "secret",
        "email": format!("{username}@example.com"),
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    Uuid::parse_str(body["user_id"].as_str().unwrap()).unwrap()
  }

  /// Multipart body for `POST /posts` with text parts and an optional image.
  fn multipart_post(
    owner_id: Uuid,
    title: &str,
    image: Option<&[u8]>,
  ) -> (String, Vec<u8>) {
    let boundary = "reclaimtestboundary";
    let mut body = Vec::new();
    for (name, value) in [
      ("owner_id", owner_id.to_string()),
      ("title", title.to_owned()),
      ("description", "found on a bench".to_owned()),
      ("location", "main quad".to_owned()),
    ] {
      body.extend_from_slice(
        format!(
          "--{boundary}\r\nContent-Disposition: form-data; \
           name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .as_bytes(),
      );
    }
    if let Some(data) = image {
      body.extend_from_slice(
        format!(
          "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; \
           filename=\"item.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
      );
      body.extend_from_slice(data);
      body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
  }

  async fn create_post(
    state: &AppState<SqliteStore, LocalMediaStore>,
    owner_id: Uuid,
    title: &str,
    image: Option<&[u8]>,
  ) -> Value {
    let (content_type, body) = multipart_post(owner_id, title, image);
    let resp = api_router(state.clone())
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/posts")
          .header(header::CONTENT_TYPE, content_type)
          .body(Body::from(body))
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── Identity ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_returns_profile_without_credential() {
    let state = make_state().await;
    let (status, body) = send(
      state,
      "POST",
      "/register",
      Some(json!({
        "username": "alice",
        "password": "secret",
        "email": "alice@example.com",
      })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["is_admin"], false);
    assert!(body.get("password_hash").is_none(), "hash leaked: {body}");
    assert!(body.get("password").is_none());
  }

  #[tokio::test]
  async fn duplicate_username_returns_400() {
    let state = make_state().await;
    register(&state, "alice").await;

    let (status, body) = send(
      state,
      "POST",
      "/register",
      Some(json!({
        "username": "alice",
        "password": "other",
        "email": "alice2@example.com",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("alice"));
  }

  #[tokio::test]
  async fn register_with_empty_username_returns_400() {
    let state = make_state().await;
    let (status, _) = send(
      state,
      "POST",
      "/register",
      Some(json!({ "username": " ", "password": "x", "email": "a@b.c" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn login_round_trip_and_rejections() {
    let state = make_state().await;
    register(&state, "alice").await;

    let (status, body) = send(
      state.clone(),
      "POST",
      "/login",
      Some(json!({ "username": "alice", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert!(body.get("password_hash").is_none());

    let (status, _) = send(
      state.clone(),
      "POST",
      "/login",
      Some(json!({ "username": "alice", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unknown user gets the same answer as a wrong password.
    let (status, body) = send(
      state,
      "POST",
      "/login",
      Some(json!({ "username": "mallory", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid username or password");
  }

  // ── Posts ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_post_with_image_stores_media_ref() {
    let state = make_state().await;
    let owner = register(&state, "alice").await;

    let post = create_post(&state, owner, "red scarf", Some(b"\x89PNG....")).await;
    assert_eq!(post["title"], "red scarf");
    assert_eq!(post["status"], "pending");
    assert_eq!(post["claimed"], "unclaimed");
    let image_ref = post["image_ref"].as_str().unwrap();
    assert!(image_ref.starts_with("/uploads/"), "image_ref: {image_ref}");
  }

  #[tokio::test]
  async fn create_post_without_title_returns_400() {
    let state = make_state().await;
    let owner = register(&state, "alice").await;

    let (content_type, body) = multipart_post(owner, " ", None);
    let resp = api_router(state)
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/posts")
          .header(header::CONTENT_TYPE, content_type)
          .body(Body::from(body))
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn pending_posts_are_hidden_until_approved() {
    let state = make_state().await;
    let owner = register(&state, "alice").await;
    let post = create_post(&state, owner, "umbrella", None).await;
    let post_id = post["post_id"].as_str().unwrap().to_owned();

    let (_, listed) =
      send(state.clone(), "GET", "/posts?status=published", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);

    // The owner still sees it.
    let (_, own) = send(
      state.clone(),
      "GET",
      &format!("/posts?owner_id={owner}"),
      None,
    )
    .await;
    assert_eq!(own.as_array().unwrap().len(), 1);
    assert_eq!(own[0]["username"], "alice");

    let (status, approved) = send(
      state.clone(),
      "PATCH",
      &format!("/admin/posts/{post_id}/approve"),
      Some(json!({ "approve": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "published");

    let (_, listed) =
      send(state, "GET", "/posts?status=published", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["post_id"].as_str().unwrap(), post_id);
  }

  #[tokio::test]
  async fn approving_missing_post_returns_404() {
    let state = make_state().await;
    let (status, _) = send(
      state,
      "PATCH",
      &format!("/admin/posts/{}/approve", Uuid::new_v4()),
      Some(json!({ "approve": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Claims ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn claim_filing_validation_and_not_found() {
    let state = make_state().await;
    let owner = register(&state, "alice").await;
    let claimant = register(&state, "bob").await;
    let post = create_post(&state, owner, "wallet", None).await;
    let post_id = post["post_id"].as_str().unwrap().to_owned();

    // Missing post → 404, nothing stored.
    let (status, _) = send(
      state.clone(),
      "POST",
      "/claims",
      Some(json!({
        "post_id": Uuid::new_v4(),
        "claimant_id": claimant,
        "reason": "mine",
        "contact_info": "555-0100",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Empty reason → 400.
    let (status, _) = send(
      state.clone(),
      "POST",
      "/claims",
      Some(json!({
        "post_id": post_id,
        "claimant_id": claimant,
        "reason": "",
        "contact_info": "555-0100",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Valid claim → 201, listed for the post.
    let (status, claim) = send(
      state.clone(),
      "POST",
      "/claims",
      Some(json!({
        "post_id": post_id,
        "claimant_id": claimant,
        "reason": "it's mine",
        "contact_info": "555-0100",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(claim["status"], "pending");

    let (_, claims) =
      send(state, "GET", &format!("/claims/{post_id}"), None).await;
    assert_eq!(claims.as_array().unwrap().len(), 1);
    assert_eq!(claims[0]["username"], "bob");
  }

  #[tokio::test]
  async fn approving_a_claim_resolves_the_post_and_competitors() {
    let state = make_state().await;
    let owner = register(&state, "alice").await;
    let bob = register(&state, "bob").await;
    let carol = register(&state, "carol").await;
    let post = create_post(&state, owner, "wallet", None).await;
    let post_id = post["post_id"].as_str().unwrap().to_owned();

    let mut claim_ids = Vec::new();
    for claimant in [bob, carol] {
      let (status, claim) = send(
        state.clone(),
        "POST",
        "/claims",
        Some(json!({
          "post_id": post_id,
          "claimant_id": claimant,
          "reason": "it's mine",
          "contact_info": "555-0100",
        })),
      )
      .await;
      assert_eq!(status, StatusCode::CREATED);
      claim_ids.push(claim["claim_id"].as_str().unwrap().to_owned());
    }

    let (status, resolution) = send(
      state.clone(),
      "PATCH",
      &format!("/admin/claims/{}/approve", claim_ids[0]),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "approve failed: {resolution}");
    assert_eq!(resolution["outcome"], "approved");
    assert_eq!(resolution["discarded"], 1);
    assert_eq!(resolution["claim"]["status"], "approved");

    // Only the winning claim remains; the post is claimed.
    let (_, claims) =
      send(state.clone(), "GET", &format!("/claims/{post_id}"), None).await;
    assert_eq!(claims.as_array().unwrap().len(), 1);
    assert_eq!(claims[0]["claim_id"].as_str().unwrap(), claim_ids[0]);

    let (_, own) = send(
      state.clone(),
      "GET",
      &format!("/posts?owner_id={owner}"),
      None,
    )
    .await;
    assert_eq!(own[0]["claimed"], "claimed");

    // A late claim can be filed but never approved.
    let (status, late) = send(
      state.clone(),
      "POST",
      "/claims",
      Some(json!({
        "post_id": post_id,
        "claimant_id": carol,
        "reason": "still mine",
        "contact_info": "555-0100",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
      state,
      "PATCH",
      &format!("/admin/claims/{}/approve", late["claim_id"].as_str().unwrap()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "expected conflict: {body}");
  }

  #[tokio::test]
  async fn rejecting_a_claim_removes_it() {
    let state = make_state().await;
    let owner = register(&state, "alice").await;
    let bob = register(&state, "bob").await;
    let post = create_post(&state, owner, "wallet", None).await;
    let post_id = post["post_id"].as_str().unwrap().to_owned();

    let (_, claim) = send(
      state.clone(),
      "POST",
      "/claims",
      Some(json!({
        "post_id": post_id,
        "claimant_id": bob,
        "reason": "mine",
        "contact_info": "555-0100",
      })),
    )
    .await;
    let claim_id = claim["claim_id"].as_str().unwrap().to_owned();

    let (status, resolution) = send(
      state.clone(),
      "DELETE",
      &format!("/admin/claims/{claim_id}"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolution["outcome"], "rejected");

    let (_, claims) =
      send(state.clone(), "GET", &format!("/claims/{post_id}"), None).await;
    assert!(claims.as_array().unwrap().is_empty());

    // The post is untouched.
    let (_, own) = send(
      state,
      "GET",
      &format!("/posts?owner_id={owner}"),
      None,
    )
    .await;
    assert_eq!(own[0]["claimed"], "unclaimed");
  }

  #[tokio::test]
  async fn rejecting_the_approved_claim_returns_400() {
    let state = make_state().await;
    let owner = register(&state, "alice").await;
    let bob = register(&state, "bob").await;
    let post = create_post(&state, owner, "wallet", None).await;
    let post_id = post["post_id"].as_str().unwrap().to_owned();

    let (_, claim) = send(
      state.clone(),
      "POST",
      "/claims",
      Some(json!({
        "post_id": post_id,
        "claimant_id": bob,
        "reason": "mine",
        "contact_info": "555-0100",
      })),
    )
    .await;
    let claim_id = claim["claim_id"].as_str().unwrap().to_owned();

    let (status, _) = send(
      state.clone(),
      "PATCH",
      &format!("/admin/claims/{claim_id}/approve"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
      state.clone(),
      "DELETE",
      &format!("/admin/claims/{claim_id}"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "expected conflict: {body}");

    // The winning claim is still on record.
    let (_, claims) =
      send(state, "GET", &format!("/claims/{post_id}"), None).await;
    assert_eq!(claims.as_array().unwrap().len(), 1);
    assert_eq!(claims[0]["status"], "approved");
  }

  #[tokio::test]
  async fn resolving_a_missing_claim_returns_404() {
    let state = make_state().await;
    let (status, _) = send(
      state.clone(),
      "PATCH",
      &format!("/admin/claims/{}/approve", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
      state,
      "DELETE",
      &format!("/admin/claims/{}", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}

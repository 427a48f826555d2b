use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use ai_llm_service::{LlmModelConfig, LlmProvider, LlmService};
use api::{
    app,
    core::{app_state::AppState, worker::ReviewWorker},
};
use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, Response, StatusCode},
    routing::{get, post},
};
use http_body_util::BodyExt;
use mockito::{Matcher, Server};
use mr_reviewer::{
    ReviewContext,
    git_providers::{GitLabClient, ProviderConfig},
    review::ReviewGenerator,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const SIGNATURE: &str = "🤖 AI 코드 리뷰";
const UNUSED: &str = "http://127.0.0.1:9";

fn state(gitlab_url: &str, llm_url: &str, timeout: Duration) -> Arc<AppState> {
    let gitlab = GitLabClient::new(&ProviderConfig {
        base_url: gitlab_url.to_string(),
        token: "glpat-test".into(),
        timeout,
    })
    .unwrap();
    let llm = LlmService::new(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: "qwen3:14b".into(),
        endpoint: llm_url.to_string(),
        api_key: None,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(5),
    })
    .unwrap();
    Arc::new(AppState::from_parts(
        ReviewContext {
            gitlab,
            generator: ReviewGenerator::new(llm),
        },
        ReviewWorker::new(2),
        Duration::from_secs(5),
    ))
}

async fn send(state: &Arc<AppState>, req: Request<Body>) -> (StatusCode, Value) {
    let resp: Response<Body> = app(state.clone()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn hook(event: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook/gitlab")
        .header("content-type", "application/json")
        .header("X-Gitlab-Event", event)
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn mr_event(action: &str) -> Value {
    json!({
        "object_kind": "merge_request",
        "user": {"username": "alice"},
        "project": {"id": 42},
        "object_attributes": {
            "action": action,
            "iid": 7,
            "target_project_id": 42,
            "title": "Add retry to client",
            "description": "Retries idempotent calls"
        }
    })
}

fn note_event(body: &str, noteable_type: &str) -> Value {
    json!({
        "object_kind": "note",
        "user": {"username": "alice"},
        "project": {"id": 42},
        "object_attributes": {
            "note": body,
            "noteable_type": noteable_type,
            "noteable_id": 900,
            "noteable_iid": 7
        }
    })
}

const CHANGES: &str = r#"{"changes":[
    {"old_path":"README.md","new_path":"README.md","diff":"+docs"},
    {"old_path":"main.go","new_path":"main.go","diff":"+func main() {}"}
]}"#;

/// Mockito server that fails the test if GitLab is contacted at all.
async fn untouched_gitlab() -> (mockito::ServerGuard, mockito::Mock, mockito::Mock) {
    let mut server = Server::new_async().await;
    let get = server.mock("GET", Matcher::Any).expect(0).create_async().await;
    let post = server.mock("POST", Matcher::Any).expect(0).create_async().await;
    (server, get, post)
}

#[tokio::test]
async fn test_endpoint_echoes_method() {
    let st = state(UNUSED, UNUSED, Duration::from_secs(1));
    for method in ["GET", "POST"] {
        let req = Request::builder()
            .method(method)
            .uri("/test")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&st, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "success", "method": method, "message": "Test endpoint is working"})
        );
    }
}

#[tokio::test]
async fn webhook_get_reports_active() {
    let st = state(UNUSED, UNUSED, Duration::from_secs(1));
    let req = Request::builder()
        .uri("/webhook/gitlab")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&st, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "success", "message": "Webhook endpoint is active"})
    );
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let st = state(UNUSED, UNUSED, Duration::from_secs(1));
    let req = Request::builder()
        .method("POST")
        .uri("/webhook/gitlab")
        .header("content-type", "application/json")
        .body(Body::from("{\"object_kind\": "))
        .unwrap();
    let (status, body) = send(&st, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": "error", "message": "invalid JSON"}));
}

#[tokio::test]
async fn closed_merge_request_is_ignored() {
    let (gitlab, get, post) = untouched_gitlab().await;
    let st = state(&gitlab.url(), UNUSED, Duration::from_secs(1));

    let (status, body) = send(&st, hook("Merge Request Hook", &mr_event("close"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");
    assert_eq!(st.worker.in_flight(), 0);

    st.worker.drain().await;
    get.assert_async().await;
    post.assert_async().await;
}

#[tokio::test]
async fn note_on_commit_is_ignored_without_api_calls() {
    let (gitlab, get, post) = untouched_gitlab().await;
    let st = state(&gitlab.url(), UNUSED, Duration::from_secs(1));

    let (status, body) = send(&st, hook("Note Hook", &note_event("/review 확인", "Commit"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");

    st.worker.drain().await;
    get.assert_async().await;
    post.assert_async().await;
}

#[tokio::test]
async fn notes_without_trigger_or_from_bot_are_ignored() {
    let (gitlab, get, post) = untouched_gitlab().await;
    let st = state(&gitlab.url(), UNUSED, Duration::from_secs(1));

    for text in ["LGTM, merging", "## 🤖 AI 코드 리뷰\n\n/review 리뷰 결과"] {
        let (status, body) = send(&st, hook("Note Hook", &note_event(text, "MergeRequest"))).await;
        assert_eq!(status, StatusCode::OK, "{text}");
        assert_eq!(body["status"], "ignored", "{text}");
    }
    assert_eq!(st.worker.in_flight(), 0);

    st.worker.drain().await;
    get.assert_async().await;
    post.assert_async().await;
}

#[tokio::test]
async fn unsupported_kind_is_ignored() {
    let st = state(UNUSED, UNUSED, Duration::from_secs(1));
    let (status, body) = send(&st, hook("Push Hook", &json!({"object_kind": "push"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");
}

#[tokio::test]
async fn opened_merge_request_gets_one_signed_review() {
    let mut gitlab = Server::new_async().await;
    let mut llm = Server::new_async().await;

    gitlab
        .mock("GET", "/api/v4/projects/42/merge_requests/7/changes")
        .match_header("private-token", "glpat-test")
        .with_status(200)
        .with_body(CHANGES)
        .expect(1)
        .create_async()
        .await;
    let generate = llm
        .mock("POST", "/api/generate")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("MR 제목: Add retry to client".into()),
            Matcher::Regex("파일: main.go".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"response":"재시도 횟수 상한이 필요합니다.","done":true}"#)
        .expect(1)
        .create_async()
        .await;
    let note = gitlab
        .mock("POST", "/api/v4/projects/42/merge_requests/7/notes")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(SIGNATURE.into()),
            Matcher::Regex("재시도 횟수 상한이 필요합니다.".into()),
        ]))
        .with_status(201)
        .with_body(r#"{"id":1}"#)
        .expect(1)
        .create_async()
        .await;

    let st = state(&gitlab.url(), &llm.url(), Duration::from_secs(2));
    let (status, body) = send(&st, hook("Merge Request Hook", &mr_event("open"))).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "accepted");

    st.worker.drain().await;
    generate.assert_async().await;
    note.assert_async().await;
}

#[tokio::test]
async fn review_command_posts_attributed_review() {
    let mut gitlab = Server::new_async().await;
    let mut llm = Server::new_async().await;

    gitlab
        .mock("GET", "/api/v4/projects/42/merge_requests/7/changes")
        .with_status(200)
        .with_body(CHANGES)
        .create_async()
        .await;
    gitlab
        .mock("GET", "/api/v4/projects/42/merge_requests/7")
        .with_status(200)
        .with_body(r#"{"id":900,"iid":7,"title":"Fetched title","description":"d"}"#)
        .expect(1)
        .create_async()
        .await;
    llm.mock("POST", "/api/generate")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("사용자 요청: please check null checks".into()),
            Matcher::Regex("MR 제목: Fetched title".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"response":"null 체크 누락 없음","done":true}"#)
        .create_async()
        .await;
    let note = gitlab
        .mock("POST", "/api/v4/projects/42/merge_requests/7/notes")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(SIGNATURE.into()),
            Matcher::Regex("@alice님의 요청".into()),
        ]))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;

    let st = state(&gitlab.url(), &llm.url(), Duration::from_secs(2));
    let payload = note_event("/analyze please check null checks", "MergeRequest");
    let (status, body) = send(&st, hook("Note Hook", &payload)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "accepted");

    st.worker.drain().await;
    note.assert_async().await;
}

/// Accepts connections and never answers; counts accepted sockets.
async fn hanging_server() -> (String, Arc<AtomicUsize>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((sock, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            held.push(sock);
        }
    });
    (url, accepted)
}

#[tokio::test]
async fn full_review_posts_nothing_when_diff_fetch_times_out() {
    let (url, accepted) = hanging_server().await;
    let st = state(&url, UNUSED, Duration::from_millis(300));

    let (status, _) = send(&st, hook("Merge Request Hook", &mr_event("update"))).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    st.worker.drain().await;
    // Only the diff request reached GitLab; no note was attempted.
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}

type Posted = Arc<Mutex<Vec<String>>>;

async fn post_note(State(posted): State<Posted>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let text = body["body"].as_str().unwrap_or_default().to_string();
    posted.lock().unwrap().push(text);
    (StatusCode::CREATED, Json(json!({"id": 1})))
}

async fn slow_changes() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({"changes": []}))
}

#[tokio::test]
async fn note_review_posts_single_fallback_when_diff_fetch_times_out() {
    let posted: Posted = Arc::default();
    let fake = Router::new()
        .route(
            "/api/v4/projects/{id}/merge_requests/{iid}/changes",
            get(slow_changes),
        )
        .route(
            "/api/v4/projects/{id}/merge_requests/{iid}/notes",
            post(post_note),
        )
        .with_state(posted.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, fake).await.unwrap();
    });

    let st = state(&url, UNUSED, Duration::from_millis(300));
    let (status, _) = send(&st, hook("Note Hook", &note_event("@bot 봐주세요", "MergeRequest"))).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    st.worker.drain().await;
    let posted = posted.lock().unwrap();
    assert_eq!(posted.len(), 1);
    assert!(posted[0].contains(SIGNATURE));
    assert!(posted[0].contains("변경 사항을 가져올 수 없어"));
}

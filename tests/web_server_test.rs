use axum::http::StatusCode;
use axum_test::TestServer;
use naavi::advisor::Advisor;
use naavi::constants::{FINAL_OPTIONS, FINAL_PROMPT, INTRO_MESSAGE, QUESTIONS};
use naavi::web_server::{app, ServerConfig};
use naavi::ChatReply;
use serde_json::json;
use std::path::PathBuf;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn repo_config() -> ServerConfig {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    ServerConfig {
        templates_dir: root.join("templates"),
        static_dir: root.join("static"),
    }
}

fn offline_advisor() -> Advisor {
    Advisor::new("http://127.0.0.1:9", "test-key", "gpt-4")
}

fn test_server(advisor: Advisor) -> TestServer {
    TestServer::new(app(&repo_config(), advisor)).unwrap()
}

async fn chat(server: &TestServer, user_input: &str) -> ChatReply {
    let response = server
        .post("/process_chat")
        .form(&[("user_input", user_input)])
        .await;
    response.assert_status_ok();
    response.json::<ChatReply>()
}

#[tokio::test]
async fn test_interview_asks_questions_in_order() {
    let server = test_server(offline_advisor());

    assert_eq!(chat(&server, "hello").await, ChatReply::question(QUESTIONS[0]));
    assert_eq!(chat(&server, "B.Tech").await, ChatReply::question(QUESTIONS[1]));
    assert_eq!(chat(&server, "Study in Germany").await, ChatReply::question(QUESTIONS[2]));
    assert_eq!(chat(&server, "Limited budget").await, ChatReply::options(FINAL_OPTIONS));
    // Still the options afterwards
    assert_eq!(chat(&server, "Other").await, ChatReply::options(FINAL_OPTIONS));
}

#[tokio::test]
async fn test_index_renders_page_and_resets_interview() {
    let server = test_server(offline_advisor());
    chat(&server, "hello").await;
    chat(&server, "answer").await;

    let page = server.get("/").await;
    page.assert_status_ok();
    let html = page.text();
    assert!(html.contains(INTRO_MESSAGE));
    assert!(html.contains(r#"id="chat-container""#));
    assert!(html.contains(r#"id="user-input""#));
    assert!(html.contains(r#"id="send-btn""#));

    assert_eq!(chat(&server, "hello again").await, ChatReply::question(QUESTIONS[0]));
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let server = test_server(offline_advisor());
    let script = server.get("/static/script.js").await;
    script.assert_status_ok();
    assert!(script.text().contains("user_input="));

    server
        .get("/static/missing.js")
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_user_input_is_rejected() {
    let server = test_server(offline_advisor());
    let response = server
        .post("/process_chat")
        .form(&[("something_else", "x")])
        .expect_failure()
        .await;
    assert!(response.status_code().is_client_error());
}

#[test_log::test(tokio::test)]
async fn test_final_option_returns_roadmap() {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4",
            "max_tokens": 4096,
            "messages": [
                {"role": "user", "content": "B.Tech"},
                {"role": "user", "content": "Other"},
                {"role": "user", "content": FINAL_PROMPT},
            ],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Pathway 1: ..."}}]
        })))
        .expect(1)
        .mount(&llm)
        .await;

    let server = test_server(Advisor::new(&llm.uri(), "test-key", "gpt-4"));
    chat(&server, "hello").await;
    chat(&server, "B.Tech").await;

    let response = server
        .post("/process_final_option")
        .form(&[("user_input", "Other")])
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<ChatReply>(), ChatReply::response("Pathway 1: ..."));
}

#[tokio::test]
async fn test_final_option_rate_limited() {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&llm)
        .await;

    let server = test_server(Advisor::new(&llm.uri(), "test-key", "gpt-4"));
    let response = server
        .post("/process_final_option")
        .form(&[("user_input", "Other")])
        .expect_failure()
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.json::<ChatReply>(),
        ChatReply::error("Rate limit exceeded. Please try again later.")
    );
}

#[tokio::test]
async fn test_final_option_service_failure() {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&llm)
        .await;

    let server = test_server(Advisor::new(&llm.uri(), "test-key", "gpt-4"));
    let response = server
        .post("/process_final_option")
        .form(&[("user_input", "Other")])
        .expect_failure()
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<ChatReply>(),
        ChatReply::error("Sorry, something went wrong with the AI service. Please try again later.")
    );
}

#[tokio::test]
async fn test_final_option_unreachable_advisor() {
    let server = test_server(offline_advisor());
    let response = server
        .post("/process_final_option")
        .form(&[("user_input", "Other")])
        .expect_failure()
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_custom_templates_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("chat.html"),
        "{{ intro_message }}|{{ chat_path }}",
    )
    .unwrap();
    let config = ServerConfig {
        templates_dir: dir.path().to_path_buf(),
        static_dir: dir.path().to_path_buf(),
    };
    let server = TestServer::new(app(&config, offline_advisor())).unwrap();

    let page = server.get("/").await;
    page.assert_status_ok();
    assert!(page.text().starts_with(INTRO_MESSAGE));
}

#[tokio::test]
async fn test_missing_template_reports_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = ServerConfig {
        templates_dir: dir.path().to_path_buf(),
        static_dir: dir.path().to_path_buf(),
    };
    let server = TestServer::new(app(&config, offline_advisor())).unwrap();

    let page = server.get("/").expect_failure().await;
    page.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let reply = page.json::<ChatReply>();
    assert!(reply.error_text().unwrap().starts_with("Internal Server Error"));
}

use super::*;

fn template() -> PromptTemplate {
    PromptTemplate::new("test", "test template", "You are a test assistant.")
}

#[tokio::test]
async fn test_process_text() {
    let body = serde_json::to_string(&CompletionResponse {
        choices: vec![CompletionChoiceResponse {
            message: CompletionMessageResponse {
                content: Some("Hello there!".to_string()),
            },
        }],
    })
    .expect("serialize response");

    let mut server = mockito::Server::new_async().await;

    let completion_handler = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .match_header("Authorization", "Bearer test_token")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "You are a test assistant."},
                {"role": "user", "content": "Hello"}
            ],
        })))
        .with_body(body)
        .create();

    let provider = OpenAI::default()
        .with_endpoint(&server.url())
        .with_api_key("test_token");

    let res = provider
        .process_text("Hello", &template(), None)
        .await
        .expect("Failed to process text");

    assert_eq!(res, "Hello there!");
    completion_handler.assert();
}

#[tokio::test]
async fn test_process_text_empty_content() {
    let body = serde_json::to_string(&CompletionResponse {
        choices: vec![CompletionChoiceResponse {
            message: CompletionMessageResponse { content: None },
        }],
    })
    .expect("serialize response");

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(body)
        .create();

    let provider = OpenAI::default().with_endpoint(&server.url());

    let res = provider
        .process_text("Hello", &template(), None)
        .await
        .expect("Failed to process text");

    // Missing content is reported as an empty reply, not an error
    assert_eq!(res, "");
}

#[tokio::test]
async fn test_process_text_model_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(404)
        .with_body(
            r#"{"error": {"message": "model does not exist", "type": "not_found"}}"#,
        )
        .create();

    let provider = OpenAI::default().with_endpoint(&server.url());

    let res = provider
        .process_text("Hello", &template(), Some("no-such-model".to_string()))
        .await
        .expect("known API errors should become reply strings");

    assert_eq!(res, "Error: Model not found. Please check the model name.");
}

#[tokio::test]
async fn test_process_text_unknown_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body(r#"{"error": {"message": "boom", "type": "server_error"}}"#)
        .create();

    let provider = OpenAI::default().with_endpoint(&server.url());

    let res = provider.process_text("Hello", &template(), None).await;
    assert!(res.is_err(), "unknown API errors should propagate");
}

#[tokio::test]
async fn test_process_text_uses_requested_model() {
    let body = serde_json::to_string(&CompletionResponse {
        choices: vec![CompletionChoiceResponse {
            message: CompletionMessageResponse {
                content: Some("ok".to_string()),
            },
        }],
    })
    .expect("serialize response");

    let mut server = mockito::Server::new_async().await;
    let handler = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "model": "llama-3.3-70b-versatile",
        })))
        .with_body(body)
        .create();

    let provider = OpenAI::default().with_endpoint(&server.url());
    provider
        .process_text(
            "Hello",
            &template(),
            Some("llama-3.3-70b-versatile".to_string()),
        )
        .await
        .expect("Failed to process text");
    handler.assert();
}

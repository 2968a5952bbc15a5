use super::*;

fn fake_audio_file(name: &str) -> String {
    let path = std::env::temp_dir().join(format!("palaver-test-{}-{}", std::process::id(), name));
    std::fs::write(&path, b"RIFF....WAVEfmt ").expect("write fake audio");
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn test_transcribe_file() {
    let body = serde_json::to_string(&TranscriptionResponse {
        text: "Guten Tag zusammen.".to_string(),
        segments: vec![TranscriptionSegment {
            avg_logprob: -0.1,
            no_speech_prob: 0.01,
        }],
    })
    .expect("serialize response");

    let mut server = mockito::Server::new_async().await;
    let handler = server
        .mock("POST", "/v1/audio/transcriptions")
        .with_status(200)
        .match_header("Authorization", "Bearer test_token")
        .with_body(body)
        .create();

    let path = fake_audio_file("ok.wav");
    let transcriber = Whisper::default()
        .with_endpoint(&server.url())
        .with_api_key("test_token")
        .with_language("de");

    let text = transcriber
        .transcribe_file(&path, None)
        .await
        .expect("Failed to transcribe");

    assert_eq!(text, "Guten Tag zusammen.");
    handler.assert();
    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_transcribe_file_retries_default_model() {
    let body = serde_json::to_string(&TranscriptionResponse {
        text: "hello".to_string(),
        segments: vec![],
    })
    .expect("serialize response");

    let mut server = mockito::Server::new_async().await;
    // First call with the unknown model 404s, the retry succeeds. Both hit
    // the same path, so match on the model carried in the multipart body.
    let not_found = server
        .mock("POST", "/v1/audio/transcriptions")
        .match_body(mockito::Matcher::Regex("no-such-model".to_string()))
        .with_status(404)
        .with_body(r#"{"error": {"message": "unknown model", "type": "not_found"}}"#)
        .expect(1)
        .create();
    let ok = server
        .mock("POST", "/v1/audio/transcriptions")
        .match_body(mockito::Matcher::Regex("whisper-1".to_string()))
        .with_status(200)
        .with_body(body)
        .expect(1)
        .create();

    let path = fake_audio_file("retry.wav");
    let transcriber = Whisper::default().with_endpoint(&server.url());

    let text = transcriber
        .transcribe_file(&path, Some("no-such-model".to_string()))
        .await
        .expect("Failed to transcribe");

    assert_eq!(text, "hello");
    not_found.assert();
    ok.assert();
    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_transcribe_missing_file() {
    let transcriber = Whisper::default();
    let res = transcriber
        .transcribe_file("/nonexistent/audio.wav", None)
        .await;
    assert!(res.is_err());
}

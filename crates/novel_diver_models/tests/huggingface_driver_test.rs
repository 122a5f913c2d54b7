//! Drives the HuggingFace fallback loop against a local canned HTTP server.

use novel_diver_error::GenerationErrorKind;
use novel_diver_models::{HuggingFaceDriver, HuggingFaceSettings, StoryDriver};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one canned `(status line, body)` per connection, recording request heads.
async fn serve(responses: Vec<(&'static str, String)>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            log.lock().unwrap().push(request);

            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
    });

    (format!("http://{}/models/", addr), seen)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buffer);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let lower = line.to_ascii_lowercase();
                    lower
                        .strip_prefix("content-length:")
                        .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                })
                .unwrap_or(0);
            if buffer.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

fn settings(api_url: String, models: &[&str]) -> HuggingFaceSettings {
    HuggingFaceSettings {
        api_url,
        models: models.iter().map(|m| m.to_string()).collect(),
        timeout_secs: 5,
        ..HuggingFaceSettings::default()
    }
}

fn long_story() -> String {
    "The lanterns of the night market flicker as you step forward. ".repeat(2)
}

#[tokio::test]
async fn first_usable_model_wins() {
    let body = serde_json::json!([{ "generated_text": long_story() }]).to_string();
    let (url, seen) = serve(vec![("200 OK", body)]).await;

    let driver = HuggingFaceDriver::new("hf_secret", &settings(url, &["org/model-a"])).unwrap();
    let text = driver.generate("Begin an exciting fantasy adventure").await.unwrap();
    assert_eq!(text, long_story());

    let requests = seen.lock().unwrap();
    assert!(requests[0].starts_with("POST /models/org/model-a "));
    let lower = requests[0].to_ascii_lowercase();
    assert!(lower.contains("authorization: bearer hf_secret"));
    assert!(requests[0].contains("\"return_full_text\":false"));
}

#[tokio::test]
async fn failing_and_short_models_are_skipped() {
    let short = serde_json::json!([{ "generated_text": "too short" }]).to_string();
    let good = serde_json::json!({ "generated_text": "ok" }).to_string();
    let (url, seen) = serve(vec![
        ("503 Service Unavailable", "{\"error\":\"loading\"}".to_string()),
        ("200 OK", short),
        ("200 OK", good),
    ])
    .await;

    let driver =
        HuggingFaceDriver::new("hf_secret", &settings(url, &["a/one", "b/two", "c/three"])).unwrap();
    let text = driver.generate("prompt").await.unwrap();

    assert_eq!(text, "ok");
    assert_eq!(seen.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn exhausted_models_report_failure() {
    let (url, _seen) = serve(vec![
        ("500 Internal Server Error", "{}".to_string()),
        ("200 OK", "[]".to_string()),
    ])
    .await;

    let driver = HuggingFaceDriver::new("hf_secret", &settings(url, &["a/one", "b/two"])).unwrap();
    let err = driver.generate("prompt").await.unwrap_err();

    assert!(matches!(err.kind, GenerationErrorKind::Unknown(_)));
    assert!(err.to_string().contains("All Hugging Face models failed"));
}

#[tokio::test]
async fn probe_classifies_status_codes() {
    let (url, _seen) = serve(vec![("401 Unauthorized", "{}".to_string())]).await;
    let driver = HuggingFaceDriver::new("bad", &settings(url, &["a/one"])).unwrap();

    let err = driver.probe().await.unwrap_err();
    assert!(matches!(err.kind, GenerationErrorKind::Authentication(_)));
}

//! Drives the adapter against a one-shot local HTTP server.

use futures_util::StreamExt;
use guru_core::{
    credential::Credential,
    error::GuruError,
    generic::{GenericMessage, GenericRole},
    model::Model,
    provider::{ChatCompleteParameters, StreamingChatProvider},
};
use guru_openai::OpenAiAdapterBuilder;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    sync::oneshot,
};

/// Accept one connection, capture the raw request, answer with `response`.
async fn serve_once(response: String) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        tx.send(request).ok();
    });

    (format!("http://{addr}/openai/v1"), rx)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&raw);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if raw.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8(raw).unwrap()
}

fn sse_chunk(content: &str, finish: Option<&str>) -> String {
    let finish = finish.map_or("null".to_string(), |f| format!("\"{f}\""));
    format!(
        "data: {{\"id\":\"c\",\"object\":\"chat.completion.chunk\",\"created\":1,\"model\":\"llama-3.1-8b-instant\",\"choices\":[{{\"index\":0,\"delta\":{{\"content\":{}}},\"finish_reason\":{finish}}}]}}\n\n",
        serde_json::to_string(content).unwrap()
    )
}

fn params(key: &str) -> ChatCompleteParameters {
    ChatCompleteParameters::new(
        vec![
            GenericMessage::system("You are GuruGPT."),
            GenericMessage::new("🚀 trends?", GenericRole::User),
        ],
        Model::default(),
        Credential::new(key).unwrap(),
    )
}

#[tokio::test]
async fn streams_text_deltas_in_order() {
    let body = format!(
        "{}{}{}{}data: [DONE]\n\n",
        sse_chunk("", None),
        sse_chunk("AI", None),
        sse_chunk(" trends", None),
        sse_chunk("", Some("stop")),
    );
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n{body}"
    );
    let (base_url, request) = serve_once(response).await;

    let adapter = OpenAiAdapterBuilder::new()
        .with_base_url(base_url)
        .build()
        .unwrap();

    let deltas: Vec<String> = adapter
        .chat_complete_stream(params("gsk_test"))
        .map(|d| d.unwrap())
        .collect()
        .await;
    assert_eq!(deltas, vec!["AI", " trends"]);

    let request = request.await.unwrap();
    assert!(request.starts_with("POST /openai/v1/chat/completions "));
    let lower = request.to_ascii_lowercase();
    assert!(lower.contains("authorization: bearer gsk_test"));
    assert!(lower.contains("accept: text/event-stream"));

    let json_start = request.find("\r\n\r\n").unwrap() + 4;
    let sent: serde_json::Value = serde_json::from_str(&request[json_start..]).unwrap();
    assert_eq!(sent["stream"], true);
    assert_eq!(sent["model"], "llama-3.1-8b-instant");
    assert_eq!(sent["messages"][0]["role"], "system");
    assert_eq!(sent["messages"][1]["content"], "🚀 trends?");
}

#[tokio::test]
async fn unauthorized_is_an_authentication_error() {
    let body = r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#;
    let response = format!(
        "HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let (base_url, _request) = serve_once(response).await;

    let adapter = OpenAiAdapterBuilder::new()
        .with_base_url(base_url)
        .build()
        .unwrap();

    let out: Vec<_> = adapter.chat_complete_stream(params("gsk_bad")).collect().await;
    assert_eq!(out.len(), 1);
    assert!(matches!(&out[0], Err(GuruError::Authentication(m)) if m.contains("Invalid API Key")));
}

#[tokio::test]
async fn error_frame_after_partial_output_is_remote() {
    let body = format!(
        "{}data: {{\"error\":{{\"message\":\"over capacity\"}}}}\n\n",
        sse_chunk("Par", None)
    );
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n{body}"
    );
    let (base_url, _request) = serve_once(response).await;

    let adapter = OpenAiAdapterBuilder::new()
        .with_base_url(base_url)
        .build()
        .unwrap();

    let out: Vec<_> = adapter.chat_complete_stream(params("gsk_test")).collect().await;
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].as_ref().unwrap(), "Par");
    assert!(matches!(&out[1], Err(GuruError::Remote(m)) if m.contains("over capacity")));
}

#[tokio::test]
async fn body_closed_mid_reply_is_remote() {
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n{}",
        sse_chunk("Par", None)
    );
    let (base_url, _request) = serve_once(response).await;

    let adapter = OpenAiAdapterBuilder::new()
        .with_base_url(base_url)
        .build()
        .unwrap();

    let out: Vec<_> = adapter.chat_complete_stream(params("gsk_test")).collect().await;
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].as_ref().unwrap(), "Par");
    assert!(matches!(&out[1], Err(GuruError::Remote(m)) if m.contains("before completion")));
}

#[tokio::test]
async fn unreadable_error_body_is_still_reported() {
    // Promises more bytes than it sends, so reading the body fails.
    let response = "HTTP/1.1 502 Bad Gateway\r\nContent-Type: text/plain\r\nContent-Length: 64\r\nConnection: close\r\n\r\nupstr"
        .to_string();
    let (base_url, _request) = serve_once(response).await;

    let adapter = OpenAiAdapterBuilder::new()
        .with_base_url(base_url)
        .build()
        .unwrap();

    let out: Vec<_> = adapter.chat_complete_stream(params("gsk_test")).collect().await;
    assert!(matches!(
        out.as_slice(),
        [Err(GuruError::Remote(m))] if m.contains("502") && m.contains("could not be read")
    ));
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let adapter = OpenAiAdapterBuilder::new()
        .with_base_url(format!("http://{addr}/v1"))
        .build()
        .unwrap();

    let out: Vec<_> = adapter.chat_complete_stream(params("gsk_test")).collect().await;
    assert!(matches!(out.as_slice(), [Err(GuruError::Transport(_))]));
}

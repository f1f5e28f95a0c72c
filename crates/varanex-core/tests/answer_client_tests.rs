use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use varanex_core::{AnswerClient, AnswerError, HttpAnswerClient};

/// Serve exactly one HTTP response and hand back the raw request.
async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (base_url, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[tokio::test]
async fn test_successful_answer_is_returned_verbatim() {
    let (base_url, server) = serve_once("200 OK", r#"{"answer":"  42\n\n**bold**  "}"#).await;
    let client = HttpAnswerClient::new(base_url);

    let answer = client.ask("meaning of life").await.unwrap();
    assert_eq!(answer, "  42\n\n**bold**  ");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /ask HTTP/1.1"));
    assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
    assert!(request.ends_with(r#"{"question":"meaning of life"}"#));
}

#[tokio::test]
async fn test_extra_response_fields_are_ignored() {
    let (base_url, server) =
        serve_once("200 OK", r#"{"answer":"yes","model":"llama","tokens":12}"#).await;
    let client = HttpAnswerClient::new(format!("{base_url}/"));

    assert_eq!(client.ask("ok?").await.unwrap(), "yes");
    server.await.unwrap();
}

#[tokio::test]
async fn test_non_success_status_is_failure() {
    let (base_url, server) =
        serve_once("500 Internal Server Error", r#"{"error":"model offline"}"#).await;
    let client = HttpAnswerClient::new(base_url);

    match client.ask("hello").await {
        Err(AnswerError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("model offline"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_missing_answer_field_is_malformed() {
    let (base_url, server) = serve_once("200 OK", r#"{"reply":"wrong field"}"#).await;
    let client = HttpAnswerClient::new(base_url);

    assert!(matches!(
        client.ask("hello").await,
        Err(AnswerError::Malformed(_))
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let (base_url, server) = serve_once("200 OK", "<html>gateway</html>").await;
    let client = HttpAnswerClient::new(base_url);

    assert!(matches!(
        client.ask("hello").await,
        Err(AnswerError::Malformed(_))
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn test_refused_connection_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpAnswerClient::new(format!("http://{addr}"));
    assert!(matches!(
        client.ask("hello").await,
        Err(AnswerError::Transport(_))
    ));
}

//! Integration tests for Telegram forwarding against a mock Bot API.

use kimchi_core::{NotificationRequest, ProxyError};
use kimchi_notification::{NotificationError, NotificationSender, TelegramConfig, TelegramForwarder};
use mockito::{Matcher, Server};
use secrecy::SecretString;
use serde_json::json;

const TOKEN: &str = "123456:test-token";

fn forwarder(server: &Server, token: Option<&str>) -> TelegramForwarder {
    let token = token.map(|t| SecretString::new(t.into()));
    TelegramForwarder::new(TelegramConfig::new(server.url(), token).with_timeout_secs(5)).unwrap()
}

fn request() -> NotificationRequest {
    NotificationRequest::new("123456789", "<b>김프 알림</b> 3.2%").unwrap()
}

#[tokio::test]
async fn test_forward_posts_html_message() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", format!("/bot{}/sendMessage", TOKEN).as_str())
        .match_body(Matcher::Json(json!({
            "chat_id": "123456789",
            "text": "<b>김프 알림</b> 3.2%",
            "parse_mode": "HTML"
        })))
        .with_status(200)
        .with_body(r#"{"ok":true,"result":{"message_id":1}}"#)
        .create_async()
        .await;

    forwarder(&server, Some(TOKEN)).forward(&request()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_token_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let sender = forwarder(&server, None);
    assert!(!sender.is_configured());

    let err = sender.forward(&request()).await.unwrap_err();
    assert!(matches!(err, NotificationError::MissingCredential));
    assert_eq!(ProxyError::from(err).status_code(), 500);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rejection_surfaces_description() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", format!("/bot{}/sendMessage", TOKEN).as_str())
        .with_status(400)
        .with_body(r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#)
        .create_async()
        .await;

    let err = forwarder(&server, Some(TOKEN))
        .forward(&request())
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("chat not found"));
    assert!(!message.contains(TOKEN));
}

#[tokio::test]
async fn test_ok_false_with_success_status_is_rejection() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", format!("/bot{}/sendMessage", TOKEN).as_str())
        .with_status(200)
        .with_body(r#"{"ok":false,"description":"Forbidden: bot was blocked by the user"}"#)
        .create_async()
        .await;

    let err = forwarder(&server, Some(TOKEN))
        .forward(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, NotificationError::Rejected { .. }));
}

#[tokio::test]
async fn test_rate_limited_reads_retry_after() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", format!("/bot{}/sendMessage", TOKEN).as_str())
        .with_status(429)
        .with_body(r#"{"ok":false,"description":"Too Many Requests","parameters":{"retry_after":17}}"#)
        .create_async()
        .await;

    let err = forwarder(&server, Some(TOKEN))
        .forward(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, NotificationError::RateLimited(17)));
}

#[tokio::test]
async fn test_truncated_success_body_is_network_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // 200 헤더만 보내고 본문 중간에 연결을 끊는 서버
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"ok\":tr",
            )
            .await;
        let _ = socket.shutdown().await;
    });

    let token = Some(SecretString::new(TOKEN.into()));
    let config = TelegramConfig::new(format!("http://{addr}"), token).with_timeout_secs(5);
    let sender = TelegramForwarder::new(config).unwrap();

    let err = sender.forward(&request()).await.unwrap_err();
    assert!(matches!(err, NotificationError::NetworkError(_)), "{err:?}");
    assert!(!err.to_string().contains(TOKEN));
}

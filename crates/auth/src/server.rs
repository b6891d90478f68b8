//! Loopback listener that receives the OAuth redirect.

use crate::error::AuthError;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{info, warn};

const SUCCESS_PAGE: &str = "HTTP/1.1 200 OK\r\n\
    Content-Type: text/html\r\nConnection: close\r\n\r\n\
    <html><body><h1>Authentication successful!</h1>\
    <p>You can close this window and return to the terminal.</p></body></html>";

const FAILURE_PAGE: &str = "HTTP/1.1 400 Bad Request\r\n\
    Content-Type: text/html\r\nConnection: close\r\n\r\n\
    <html><body><h1>Authentication failed.</h1>\
    <p>Return to the terminal for details.</p></body></html>";

pub struct CallbackServer {
    listener: TcpListener,
    state: String,
    redirect_uri: String,
}

impl CallbackServer {
    /// Bind the first free port among `ports`.
    pub async fn bind(host: &str, ports: &[u16], state: String) -> Option<Self> {
        for &port in ports {
            match TcpListener::bind((host, port)).await {
                Ok(listener) => {
                    let port = listener.local_addr().map(|a| a.port()).unwrap_or(port);
                    return Some(Self {
                        listener,
                        state,
                        redirect_uri: format!("http://{}:{}/", host, port),
                    });
                }
                Err(e) => warn!("Cannot listen on {}:{}: {}", host, port, e),
            }
        }
        None
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub async fn wait_for_code(&self, timeout: Duration) -> Result<String, AuthError> {
        info!("Waiting for authorization on {}", self.redirect_uri);

        let accept_loop = async {
            loop {
                let (mut socket, _) = self
                    .listener
                    .accept()
                    .await
                    .map_err(|e| AuthError::FlowAborted(e.to_string()))?;

                let mut buffer = vec![0; 8192];
                let n = socket
                    .read(&mut buffer)
                    .await
                    .map_err(|e| AuthError::FlowAborted(e.to_string()))?;
                let request = String::from_utf8_lossy(&buffer[..n]);

                match parse_callback(&request, &self.state) {
                    Some(Ok(code)) => {
                        let _ = socket.write_all(SUCCESS_PAGE.as_bytes()).await;
                        return Ok(code);
                    }
                    Some(Err(e)) => {
                        let _ = socket.write_all(FAILURE_PAGE.as_bytes()).await;
                        return Err(e);
                    }
                    None => {
                        let _ = socket
                            .write_all(b"HTTP/1.1 404 Not Found\r\nConnection: close\r\n\r\n")
                            .await;
                    }
                }
            }
        };

        match tokio::time::timeout(timeout, accept_loop).await {
            Ok(result) => result,
            Err(_) => Err(AuthError::FlowAborted(format!(
                "no authorization received within {} seconds",
                timeout.as_secs()
            ))),
        }
    }
}

/// Inspect one raw HTTP request.
///
/// `None` means the request is not the redirect and should be ignored.
pub fn parse_callback(request: &str, expected_state: &str) -> Option<Result<String, AuthError>> {
    let first_line = request.lines().next()?;
    let target = first_line.split_whitespace().nth(1)?;
    let query = target.split_once('?').map(|(_, q)| q)?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match &*key {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Some(Err(AuthError::FlowAborted(format!(
            "consent denied: {}",
            error
        ))));
    }

    let code = code?;
    if state.as_deref() != Some(expected_state) {
        warn!("Ignoring callback with mismatched state");
        return None;
    }

    Some(Ok(code))
}

/// Accept either a bare verification code or the full redirect URL.
pub fn extract_code(input: &str) -> Result<String, AuthError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AuthError::FlowAborted("no verification code entered".to_string()));
    }

    if let Some((_, query)) = input.split_once('?') {
        return url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| *key == "code")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| AuthError::FlowAborted("no code found in URL".to_string()));
    }

    Ok(input.to_string())
}

pub async fn read_code_from_stdin() -> Result<String, AuthError> {
    println!("Enter verification code (or paste the redirect URL): ");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(|e| AuthError::FlowAborted(e.to_string()))?;
    extract_code(&line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::net::TcpStream;

    async fn send_request(addr: SocketAddr, target: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", target);
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    async fn local_server(state: &str) -> (CallbackServer, SocketAddr) {
        let server = CallbackServer::bind("127.0.0.1", &[0], state.to_string())
            .await
            .unwrap();
        let addr = server.listener.local_addr().unwrap();
        (server, addr)
    }

    #[test]
    fn test_parse_callback_with_code() {
        let request = "GET /?state=xyz&code=4%2F0Abc HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let code = parse_callback(request, "xyz").unwrap().unwrap();
        assert_eq!(code, "4/0Abc");
    }

    #[test]
    fn test_parse_callback_ignores_state_mismatch() {
        let request = "GET /?state=evil&code=abc HTTP/1.1\r\n\r\n";
        assert!(parse_callback(request, "xyz").is_none());
    }

    #[test]
    fn test_parse_callback_ignores_unrelated_requests() {
        assert!(parse_callback("GET /favicon.ico HTTP/1.1\r\n\r\n", "xyz").is_none());
        assert!(parse_callback("", "xyz").is_none());
    }

    #[test]
    fn test_parse_callback_denied() {
        let request = "GET /?error=access_denied&state=xyz HTTP/1.1\r\n\r\n";
        let result = parse_callback(request, "xyz").unwrap();
        assert!(matches!(result, Err(AuthError::FlowAborted(_))));
    }

    #[test]
    fn test_extract_code() {
        assert_eq!(extract_code("  4/abc \n").unwrap(), "4/abc");
        assert_eq!(
            extract_code("http://localhost:8080/?state=s&code=4%2Fabc&scope=x").unwrap(),
            "4/abc"
        );
        assert!(extract_code("\n").is_err());
        assert!(extract_code("http://localhost:8080/?state=s").is_err());
    }

    #[tokio::test]
    async fn test_wait_for_code_skips_mismatched_state() {
        let (server, addr) = local_server("xyz").await;

        let client = tokio::spawn(async move {
            let favicon = send_request(addr, "/favicon.ico").await;
            let forged = send_request(addr, "/?state=evil&code=stolen").await;
            let genuine = send_request(addr, "/?state=xyz&code=4%2Fgood").await;
            (favicon, forged, genuine)
        });

        let code = server.wait_for_code(Duration::from_secs(5)).await.unwrap();
        assert_eq!(code, "4/good");

        let (favicon, forged, genuine) = client.await.unwrap();
        assert!(favicon.starts_with("HTTP/1.1 404"));
        assert!(forged.starts_with("HTTP/1.1 404"));
        assert!(genuine.starts_with("HTTP/1.1 200"));
        assert!(genuine.contains("Authentication successful"));
    }

    #[tokio::test]
    async fn test_wait_for_code_times_out_after_mismatched_state() {
        let (server, addr) = local_server("xyz").await;

        let client =
            tokio::spawn(async move { send_request(addr, "/?state=evil&code=stolen").await });

        let result = server.wait_for_code(Duration::from_millis(500)).await;
        assert!(matches!(result, Err(AuthError::FlowAborted(_))));
        assert!(client.await.unwrap().starts_with("HTTP/1.1 404"));
    }

    #[tokio::test]
    async fn test_wait_for_code_denied_consent() {
        let (server, addr) = local_server("xyz").await;

        let client = tokio::spawn(async move {
            send_request(addr, "/?error=access_denied&state=xyz").await
        });

        let result = server.wait_for_code(Duration::from_secs(5)).await;
        match result {
            Err(AuthError::FlowAborted(message)) => assert!(message.contains("access_denied")),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(client.await.unwrap().starts_with("HTTP/1.1 400"));
    }

    #[tokio::test]
    async fn test_bind_reports_redirect_uri() {
        let server = CallbackServer::bind("127.0.0.1", &[0], "s".to_string())
            .await
            .unwrap();
        assert!(server.redirect_uri().starts_with("http://127.0.0.1:"));
        assert!(server.redirect_uri().ends_with('/'));
    }
}

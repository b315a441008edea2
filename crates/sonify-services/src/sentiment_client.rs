//! Client for the remote sentiment-analysis service

use sonify_core::{SentimentConfig, SentimentError, SentimentResult};
use tracing::debug;

/// Text -> sentiment collaborator
pub trait SentimentAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<SentimentResult, SentimentError>;
}

/// Posts the text as a form field and reads `{type, score}` from the JSON reply.
///
/// Speaks the RapidAPI convention: `X-RapidAPI-Key` / `X-RapidAPI-Host` headers.
pub struct HttpSentimentClient {
    config: SentimentConfig,
    agent: ureq::Agent,
}

impl HttpSentimentClient {
    pub fn new(config: SentimentConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout())
            .build();
        Self { config, agent }
    }

    pub fn config(&self) -> &SentimentConfig {
        &self.config
    }
}

impl SentimentAnalyzer for HttpSentimentClient {
    fn analyze(&self, text: &str) -> Result<SentimentResult, SentimentError> {
        if !self.config.is_configured() {
            return Err(SentimentError::NotConfigured);
        }

        debug!(url = %self.config.url, chars = text.chars().count(), "Requesting sentiment");

        let mut request = self.agent.post(&self.config.url);
        if !self.config.api_key.is_empty() {
            request = request.set("X-RapidAPI-Key", &self.config.api_key);
        }
        if !self.config.api_host.is_empty() {
            request = request.set("X-RapidAPI-Host", &self.config.api_host);
        }

        let response = request.send_form(&[("text", text)]).map_err(|e| match e {
            ureq::Error::Status(code, _) => SentimentError::Status(code),
            ureq::Error::Transport(t) => SentimentError::Request(t.to_string()),
        })?;

        let result: SentimentResult = response
            .into_json()
            .map_err(|e| SentimentError::Malformed(e.to_string()))?;

        debug!(kind = %result.kind, score = result.score, "Sentiment received");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    /// Serve one HTTP request with a canned reply; returns the URL and the raw request
    fn serve_once(status: &str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/sentiment", listener.local_addr().unwrap());
        let status = status.to_string();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let length = text[..head_end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let reply = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (url, handle)
    }

    fn client(url: String) -> HttpSentimentClient {
        HttpSentimentClient::new(SentimentConfig {
            url,
            api_key: "secret".into(),
            api_host: "sentiment.example".into(),
            timeout_secs: 5,
        })
    }

    #[test]
    fn test_not_configured() {
        let client = HttpSentimentClient::new(SentimentConfig::default());
        assert_eq!(client.analyze("hi"), Err(SentimentError::NotConfigured));
    }

    #[test]
    fn test_success() {
        let (url, server) =
            serve_once("200 OK", r#"{"type":"negative","score":-0.8,"ratio":-1}"#);
        let result = client(url).analyze("bad day").unwrap();
        assert_eq!(result, SentimentResult::new("negative", -0.8));

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /sentiment"));
        assert!(request.contains("text=bad+day") || request.contains("text=bad%20day"));
        let lower = request.to_ascii_lowercase();
        assert!(lower.contains("x-rapidapi-key: secret"));
        assert!(lower.contains("x-rapidapi-host: sentiment.example"));
        assert!(lower.contains("application/x-www-form-urlencoded"));
    }

    #[test]
    fn test_status_error() {
        let (url, server) = serve_once("500 Internal Server Error", "{}");
        assert_eq!(client(url).analyze("x"), Err(SentimentError::Status(500)));
        server.join().unwrap();
    }

    #[test]
    fn test_malformed_body() {
        let (url, server) = serve_once("200 OK", r#"{"message":"quota exceeded"}"#);
        assert!(matches!(client(url).analyze("x"), Err(SentimentError::Malformed(_))));
        server.join().unwrap();
    }

    #[test]
    fn test_score_passed_through_unclamped() {
        let (url, server) = serve_once("200 OK", r#"{"type":"positive","score":1.6}"#);
        let result = client(url).analyze("great").unwrap();
        assert_eq!(result.score, 1.6);
        server.join().unwrap();
    }

    #[test]
    fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);
        assert!(matches!(client(url).analyze("x"), Err(SentimentError::Request(_))));
    }
}

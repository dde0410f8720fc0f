use std::future::Future;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::ReaderConfig;
use crate::docs::types::{Answer, Document, ErrorBody, PdfResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("error connecting to server: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The two request/response contracts the reader depends on.
pub trait ReaderBackend {
    fn get_pdf(&self, title: &str) -> impl Future<Output = Result<Document, ClientError>>;

    fn ask_question(
        &self,
        title: &str,
        question: &str,
    ) -> impl Future<Output = Result<Answer, ClientError>>;
}

pub struct ReaderClient {
    client: reqwest::Client,
    base_url: String,
}

impl ReaderClient {
    pub fn new(config: &ReaderConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.api_base.clone(),
        })
    }

    /// Resolve an endpoint path against the base URL.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let url = self.endpoint(path);
        debug!(url = %url, "request");

        let resp = self.client.get(&url).query(query).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        decode_response(status, &text)
    }
}

impl ReaderBackend for ReaderClient {
    async fn get_pdf(&self, title: &str) -> Result<Document, ClientError> {
        let resp: PdfResponse = self.get_json("get_pdf", &[("title", title)]).await?;
        Ok(Document::from_pdf_data(resp.pdf_data, title))
    }

    async fn ask_question(&self, title: &str, question: &str) -> Result<Answer, ClientError> {
        self.get_json("askquestion", &[("title", title), ("question", question)])
            .await
    }
}

/// Turn a status and body into either the expected payload or a
/// [`ClientError::Server`] carrying the `{ error }` message.
pub fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ClientError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|e| e.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        return Err(ClientError::Server {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::Text;

    #[test]
    fn test_endpoint_joins_paths() {
        let config = ReaderConfig::default().with_api_base(Some("http://host/api/".to_string()));
        let client = ReaderClient::new(&config).unwrap();
        assert_eq!(client.endpoint("get_pdf"), "http://host/api/get_pdf");
    }

    #[test]
    fn test_decode_answer() {
        let answer: Answer = decode_response(
            StatusCode::OK,
            r#"{"answer": "**Yes.**", "annotations": "Call me Ishmael"}"#,
        )
        .unwrap();
        assert_eq!(answer.answer, "**Yes.**");
        assert_eq!(answer.annotations, "Call me Ishmael");
    }

    #[test]
    fn test_decode_answer_without_annotations() {
        let answer: Answer = decode_response(StatusCode::OK, r#"{"answer": "No span."}"#).unwrap();
        assert_eq!(answer.annotations, "");
    }

    #[test]
    fn test_decode_pdf_response() {
        let resp: PdfResponse = decode_response(
            StatusCode::OK,
            r#"{"pdf_data": {"title": "T", "author": "A", "filename": "t.pdf", "text_content": "body"}}"#,
        )
        .unwrap();
        let doc = Document::from_pdf_data(resp.pdf_data, "T");
        assert_eq!(doc.body, Text::Flat("body".to_string()));
    }

    #[test]
    fn test_decode_server_error_message() {
        let err = decode_response::<Answer>(StatusCode::NOT_FOUND, r#"{"error": "PDF not found"}"#)
            .unwrap_err();
        match err {
            ClientError::Server { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "PDF not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_server_error_without_body() {
        let err = decode_response::<Answer>(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "server returned 500: Internal Server Error"
        );
    }

    #[test]
    fn test_decode_malformed_success_body() {
        let err = decode_response::<Answer>(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}

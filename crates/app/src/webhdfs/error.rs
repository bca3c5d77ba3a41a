use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum WebHdfsError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("namenode URL cannot carry a path: {0}")]
    InvalidNamenode(String),
    #[error("{exception} (HTTP {status}): {message}")]
    Remote {
        status: StatusCode,
        exception: String,
        message: String,
    },
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
    #[error("redirect without a Location header")]
    MissingLocation,
    #[error("namenode answered false to {0}")]
    Refused(&'static str),
}

#[derive(Debug, Deserialize)]
struct RemoteExceptionBody {
    #[serde(rename = "RemoteException")]
    remote_exception: RemoteException,
}

#[derive(Debug, Deserialize)]
struct RemoteException {
    exception: String,
    #[serde(default)]
    message: String,
}

impl WebHdfsError {
    /// Build an error from a non-success response, decoding the WebHDFS
    /// `RemoteException` body when there is one.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return e.into(),
        };
        match serde_json::from_str::<RemoteExceptionBody>(&body) {
            Ok(parsed) => WebHdfsError::Remote {
                status,
                exception: parsed.remote_exception.exception,
                message: parsed.remote_exception.message,
            },
            Err(_) => WebHdfsError::HttpStatus(status, body),
        }
    }
}

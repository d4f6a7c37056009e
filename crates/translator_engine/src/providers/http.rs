use futures_util::StreamExt;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{ErrorKind, TranslateError};

use super::RequestLimits;

pub(crate) struct HttpReply {
    pub(crate) status: StatusCode,
    pub(crate) body: Vec<u8>,
}

/// Sends the request and reads the whole body, enforcing the size limit.
///
/// A non-2xx status is not an error here; each provider classifies it.
pub(crate) async fn execute(
    request: reqwest::RequestBuilder,
    limits: RequestLimits,
    label: &str,
) -> Result<HttpReply, TranslateError> {
    let request = match limits.request_timeout {
        Some(timeout) => request.timeout(timeout),
        None => request,
    };

    let response = request
        .send()
        .await
        .map_err(|err| map_reqwest_error(err, label))?;
    let status = response.status();

    if let Some(content_len) = response.content_length() {
        if content_len > limits.max_response_bytes {
            return Err(too_large(label, limits.max_response_bytes, content_len));
        }
    }

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|err| map_reqwest_error(err, label))?;
        let next_len = body.len() as u64 + chunk.len() as u64;
        if next_len > limits.max_response_bytes {
            return Err(too_large(label, limits.max_response_bytes, next_len));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(HttpReply { status, body })
}

pub(crate) fn parse_body<T: DeserializeOwned>(
    body: &[u8],
    label: &str,
) -> Result<T, TranslateError> {
    serde_json::from_slice(body).map_err(|err| {
        TranslateError::new(
            ErrorKind::Protocol,
            format!("Unexpected response format from {label}: {err}"),
        )
    })
}

fn map_reqwest_error(err: reqwest::Error, label: &str) -> TranslateError {
    let message = if err.is_timeout() {
        format!("{label} request timed out")
    } else {
        format!("{label} request failed: {err}")
    };
    TranslateError::new(ErrorKind::Transport, message)
}

fn too_large(label: &str, max_bytes: u64, actual: u64) -> TranslateError {
    TranslateError::new(
        ErrorKind::Transport,
        format!("{label} response too large (max {max_bytes}, actual {actual})"),
    )
}

/// `429 Too Many Requests`, or just the code when there is no canonical reason.
pub(crate) fn describe_status(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

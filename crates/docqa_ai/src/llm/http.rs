use docqa_core::domain::BackendFailure;
use serde::de::DeserializeOwned;

/// Longest slice of an error body kept in failure details.
const BODY_SNIPPET_CHARS: usize = 200;

/// Map an HTTP status onto the failure taxonomy.
///
/// Timeouts, rate limits and server errors are worth retrying later; every
/// other client error means the request itself is wrong.
pub(crate) fn classify_status(status: u16, detail: String) -> BackendFailure {
    match status {
        408 | 425 | 429 => BackendFailure::Transient(detail),
        500..=599 => BackendFailure::Transient(detail),
        400..=499 => BackendFailure::Permanent(detail),
        _ => BackendFailure::Transient(detail),
    }
}

pub(crate) fn classify_error(provider: &str, err: ureq::Error) -> BackendFailure {
    match err {
        ureq::Error::Status(code, resp) => {
            let body = resp.into_string().unwrap_or_default();
            classify_status(
                code,
                format!(
                    "{provider}: status={code}; body={}",
                    snippet(&body, BODY_SNIPPET_CHARS)
                ),
            )
        }
        ureq::Error::Transport(t) => {
            BackendFailure::Transient(format!("{provider}: transport error: {t}"))
        }
    }
}

pub(crate) fn decode<T: DeserializeOwned>(
    provider: &str,
    resp: ureq::Response,
) -> Result<T, BackendFailure> {
    resp.into_json::<T>().map_err(|e| {
        BackendFailure::Transient(format!("{provider}: malformed response body: {e}"))
    })
}

pub(crate) fn encode<T: serde::Serialize>(
    provider: &str,
    req: &T,
) -> Result<serde_json::Value, BackendFailure> {
    serde_json::to_value(req).map_err(|e| {
        BackendFailure::Permanent(format!("{provider}: failed to encode request: {e}"))
    })
}

/// Reject blank completions; they carry no answer and no sentinel.
pub(crate) fn non_empty(provider: &str, text: String) -> Result<String, BackendFailure> {
    if text.trim().is_empty() {
        return Err(BackendFailure::Transient(format!(
            "{provider}: completion was empty"
        )));
    }
    Ok(text)
}

fn snippet(text: &str, max_chars: usize) -> String {
    let t = text.trim();
    if t.chars().count() <= max_chars {
        return t.to_string();
    }
    let mut s: String = t.chars().take(max_chars).collect();
    s.push_str("...");
    s
}

use std::sync::Arc;

use serde::Serialize;

use super::request::HeaderVec;

/// Final response produced by the kernel pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderVec,
    /// Response body
    pub body: String,
}

impl Response {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// `text/html` response.
    #[must_use]
    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self::with_content_type(status, "text/html; charset=utf-8", body.into())
    }

    /// `text/plain` response.
    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::with_content_type(status, "text/plain; charset=utf-8", body.into())
    }

    /// `application/json` response with `value` serialized as the body.
    pub fn json<T: Serialize + ?Sized>(status: u16, value: &T) -> serde_json::Result<Self> {
        let body = serde_json::to_string(value)?;
        Ok(Self::with_content_type(status, "application/json", body))
    }

    fn with_content_type(status: u16, content_type: &str, body: String) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), content_type.to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Get a header by name (case-insensitive).
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_response() {
        let res = Response::json(201, &json!({ "id": 7 })).unwrap();
        assert_eq!(res.status, 201);
        assert_eq!(res.get_header("Content-Type"), Some("application/json"));
        assert_eq!(res.body, r#"{"id":7}"#);
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut res = Response::text(200, "ok");
        res.set_header("Content-Type", "text/csv");
        assert_eq!(res.headers.len(), 1);
        assert_eq!(res.get_header("content-type"), Some("text/csv"));
    }
}

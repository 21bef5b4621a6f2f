//! Low-level REST client for the moderation backend.
//!
//! Handles the request/response conventions shared by every endpoint:
//! JSON bodies with an explicit charset, tolerant response decoding and the
//! mapping of failures onto [`ApiError`].

use log::debug;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::config::{Config, JSON_CONTENT_TYPE};
use crate::error_handling::{categorize_reqwest_error, http_error, ApiError, InitializationError};
use crate::initialization::init_client;

/// Client of the moderation backend.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn is_json_content(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.contains("application/json") || ct.contains("+json")
        })
        .unwrap_or(false)
}

/// Reads a response body into JSON following the backend conventions.
///
/// - `204` on `DELETE` is an empty object
/// - a JSON content type is parsed as JSON (an empty body is an empty object)
/// - anything else is parsed as JSON on a best-effort basis, falling back to
///   an empty object
///
/// Non-2xx statuses become `ApiError::Http` with the body's message.
pub(crate) async fn read_response(
    response: Response,
    method: &Method,
) -> Result<(StatusCode, Value), ApiError> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT && *method == Method::DELETE {
        return Ok((status, empty_object()));
    }

    let json_declared = is_json_content(response.headers());
    let text = response
        .text()
        .await
        .map_err(|e| categorize_reqwest_error(&e))?;

    let value = if text.trim().is_empty() {
        empty_object()
    } else if json_declared {
        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) if status.is_success() => {
                return Err(ApiError::Decode {
                    status: status.as_u16(),
                    message: e.to_string(),
                })
            }
            Err(_) => empty_object(),
        }
    } else {
        serde_json::from_str(&text).unwrap_or_else(|_| empty_object())
    };

    if !status.is_success() {
        return Err(http_error(status.as_u16(), &value));
    }
    Ok((status, value))
}

/// Deserializes a decoded body into `T`.
pub(crate) fn decode<T: DeserializeOwned>(status: StatusCode, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        status: status.as_u16(),
        message: e.to_string(),
    })
}

/// Decodes a list that is either a bare array or wrapped under one of `keys`.
pub(crate) fn decode_list<T: DeserializeOwned>(
    status: StatusCode,
    value: Value,
    keys: &[&str],
) -> Result<Vec<T>, ApiError> {
    match value {
        Value::Array(_) => decode(status, value),
        Value::Object(mut map) => {
            let wrapped = keys.iter().find_map(|k| match map.remove(*k) {
                Some(list @ Value::Array(_)) => Some(list),
                _ => None,
            });
            match wrapped {
                Some(list) => decode(status, list),
                None if map.is_empty() => Ok(Vec::new()),
                None => Err(ApiError::Decode {
                    status: status.as_u16(),
                    message: format!("expected a list under one of {keys:?}"),
                }),
            }
        }
        Value::Null => Ok(Vec::new()),
        other => Err(ApiError::Decode {
            status: status.as_u16(),
            message: format!("expected a list, got {other}"),
        }),
    }
}

impl ApiClient {
    /// Creates a client for `base_url` using an existing HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::InvalidBaseUrlError` if `base_url` is not
    /// an absolute http(s) URL.
    pub fn new(base_url: &str, http: reqwest::Client) -> Result<Self, InitializationError> {
        let parsed = Url::parse(base_url).map_err(|e| InitializationError::InvalidBaseUrlError {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(InitializationError::InvalidBaseUrlError {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from the library configuration.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let http = init_client(config)?;
        Self::new(&config.api_base_url, http)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The shared HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends a request and returns the decoded JSON body.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<(StatusCode, Value), ApiError> {
        let url = self.endpoint(path);
        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            let bytes = serde_json::to_vec(&body).map_err(|e| ApiError::Decode {
                status: 0,
                message: e.to_string(),
            })?;
            request = request.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(bytes);
        }

        debug!("{} {}", method, url);
        let response = request.send().await.map_err(|e| {
            let err = categorize_reqwest_error(&e);
            debug!("{} {} failed: {}", method, url, e);
            err
        })?;
        debug!("{} {} -> {}", method, url, response.status());
        read_response(response, &method).await
    }

    fn to_body<B: Serialize>(body: &B) -> Result<Value, ApiError> {
        serde_json::to_value(body).map_err(|e| ApiError::Decode {
            status: 0,
            message: e.to_string(),
        })
    }

    /// `GET` returning `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let (status, value) = self.send(Method::GET, path, query, None).await?;
        decode(status, value)
    }

    /// `GET` returning a list, bare or wrapped under one of `keys`.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        keys: &[&str],
    ) -> Result<Vec<T>, ApiError> {
        let (status, value) = self.send(Method::GET, path, query, None).await?;
        decode_list(status, value, keys)
    }

    /// `POST` with a JSON body, returning `T`.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = Self::to_body(body)?;
        let (status, value) = self.send(Method::POST, path, &[], Some(body)).await?;
        decode(status, value)
    }

    /// `PUT` with a JSON body, returning `T`.
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = Self::to_body(body)?;
        let (status, value) = self.send(Method::PUT, path, &[], Some(body)).await?;
        decode(status, value)
    }

    /// `DELETE`; the response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, &[], None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let http = reqwest::Client::new();
        assert!(ApiClient::new("not a url", http.clone()).is_err());
        assert!(ApiClient::new("ftp://backend", http).is_err());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:8000/", reqwest::Client::new()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.endpoint("/parsing/runs"),
            "http://localhost:8000/parsing/runs"
        );
        assert_eq!(client.endpoint("keywords"), "http://localhost:8000/keywords");
    }

    #[test]
    fn test_decode_list_bare_and_wrapped() {
        let bare: Vec<i32> = decode_list(StatusCode::OK, json!([1, 2]), &["items"]).unwrap();
        assert_eq!(bare, vec![1, 2]);

        let wrapped: Vec<i32> =
            decode_list(StatusCode::OK, json!({"total": 2, "items": [3, 4]}), &["entries", "items"])
                .unwrap();
        assert_eq!(wrapped, vec![3, 4]);

        let empty: Vec<i32> = decode_list(StatusCode::OK, json!({}), &["items"]).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_decode_list_rejects_unknown_shape() {
        let result: Result<Vec<i32>, _> =
            decode_list(StatusCode::OK, json!({"data": 1}), &["items"]);
        assert!(matches!(result, Err(ApiError::Decode { status: 200, .. })));
    }
}

//! Authenticated JSON-over-HTTP client with retries.

use std::time::Duration;

use {
    reqwest::{
        Method,
        header::{CONTENT_TYPE, HeaderMap, HeaderValue},
    },
    secrecy::{ExposeSecret, Secret},
    serde::de::DeserializeOwned,
    serde_json::Value,
    tracing::debug,
};

use crate::{
    Error, Result,
    retry::{RetryPolicy, default_should_retry, retry},
};

const USER_AGENT: &str = concat!("herald/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<Secret<String>>,
    policy: RetryPolicy,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: Option<Secret<String>>) -> Result<Self> {
        url::Url::parse(base_url).map_err(|source| Error::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::external("build HTTP client", e))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            policy: RetryPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// One request, no retries. Non-2xx statuses become [`Error::Api`].
    pub async fn request_once(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut req = self.http.request(method.clone(), self.url(path));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key.expose_secret());
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| {
            let context = if e.is_timeout() {
                "request timeout"
            } else {
                "request failed"
            };
            Error::external(context, e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        debug!(%method, path, status = status.as_u16(), "API call succeeded");

        let text = resp
            .text()
            .await
            .map_err(|e| Error::external("read response body", e))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Retry `request_once` under this client's policy and `should_retry`.
    pub async fn call<P>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        should_retry: P,
    ) -> Result<Value>
    where
        P: Fn(&Error, u32) -> bool,
    {
        retry(&self.policy, should_retry, || {
            self.request_once(method.clone(), path, body)
        })
        .await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self
            .call(Method::GET, path, None, default_should_retry)
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, mockito::Matcher, serde_json::json};

    fn client(server: &mockito::ServerGuard, key: Option<&str>) -> ApiClient {
        ApiClient::new(&server.url(), key.map(|k| Secret::new(k.to_string())))
            .unwrap()
            .with_policy(RetryPolicy {
                max_attempts: 3,
                backoff_base: Duration::from_millis(1),
            })
    }

    #[tokio::test]
    async fn sends_auth_content_type_and_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/context")
            .match_header("authorization", "Bearer sk-test")
            .match_header("content-type", "application/json")
            .match_header("user-agent", Matcher::Regex("^herald/".into()))
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .expect(1)
            .create_async()
            .await;

        let value: Value = client(&server, Some("sk-test"))
            .get("/context")
            .await
            .unwrap();
        assert_eq!(value, json!({"ok": true}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unauthorized_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/context")
            .with_status(401)
            .expect(1)
            .create_async()
            .await;

        let err = client(&server, None)
            .get::<Value>("context")
            .await
            .unwrap_err();
        mock.assert_async().await;
        assert!(matches!(err, Error::ApiCallFailed { attempts: 1, .. }));
        assert_eq!(err.last_error().to_string(), "API error: 401 Unauthorized");
    }

    #[tokio::test]
    async fn service_unavailable_uses_every_attempt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/context")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let err = client(&server, None)
            .get::<Value>("/context")
            .await
            .unwrap_err();
        mock.assert_async().await;
        assert!(matches!(err, Error::ApiCallFailed { attempts: 3, .. }));
    }

    #[tokio::test]
    async fn call_sends_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/memories")
            .match_body(Matcher::Json(json!({"text": "remember"})))
            .with_status(201)
            .with_body("")
            .create_async()
            .await;

        let body = json!({"text": "remember"});
        let value = client(&server, None)
            .call(Method::POST, "/memories", Some(&body), default_should_retry)
            .await
            .unwrap();
        assert!(value.is_null());
        mock.assert_async().await;
    }

    #[test]
    fn rejects_malformed_base_url() {
        assert!(matches!(
            ApiClient::new("not a url", None),
            Err(Error::InvalidUrl { .. })
        ));
    }
}

//! HTTPS client for theme asset mutations.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use super::RemoteTheme;
use super::error::RemoteError;
use super::graphql::{ASSET_CREATE, ASSET_DELETE, AssetInput, Request, Variables, check_response};

/// Admin API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2023-04";

/// Header carrying the access token.
pub const DEFAULT_AUTH_HEADER: &str = "X-Shopify-Access-Token";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and as whom remote operations run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeTarget {
    pub endpoint: Url,
    pub theme_id: String,
    pub access_token: String,
    pub auth_header: String,
}

/// Build the GraphQL endpoint for a store.
///
/// Bare hosts (`shop.myshopify.com`) get `https://`; a URL that already has
/// a scheme is used as given.
///
/// ```ignore
/// endpoint("shop.myshopify.com", "2023-04")
/// // -> https://shop.myshopify.com/admin/api/2023-04/graphql.json
/// ```
pub fn endpoint(store_url: &str, api_version: &str) -> Result<Url, url::ParseError> {
    let store = store_url.trim().trim_end_matches('/');
    let base = if store.contains("://") {
        store.to_string()
    } else {
        format!("https://{store}")
    };
    Url::parse(&format!("{base}/admin/api/{api_version}/graphql.json"))
}

/// Theme asset client. Owns its connection pool.
#[derive(Debug, Clone)]
pub struct ShopifyClient {
    http: reqwest::Client,
    target: ThemeTarget,
}

impl ShopifyClient {
    pub fn new(target: ThemeTarget) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("framework/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, target })
    }

    pub fn target(&self) -> &ThemeTarget {
        &self.target
    }

    /// POST one mutation and check the response.
    ///
    /// Success is HTTP 200 with no top-level `errors` and no `userErrors`.
    async fn execute(
        &self,
        operation: &'static str,
        query: &'static str,
        input: AssetInput<'_>,
    ) -> Result<(), RemoteError> {
        let request = Request {
            query,
            variables: Variables { input },
        };

        let response = self
            .http
            .post(self.target.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(
                self.target.auth_header.as_str(),
                self.target.access_token.as_str(),
            )
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        check_response(operation, &body)
    }
}

impl RemoteTheme for ShopifyClient {
    async fn upload(&self, key: &str, content: &str) -> Result<(), RemoteError> {
        let input = AssetInput {
            key,
            content: Some(content),
            theme_id: &self.target.theme_id,
        };
        self.execute("assetCreate", ASSET_CREATE, input).await
    }

    async fn delete(&self, key: &str) -> Result<(), RemoteError> {
        let input = AssetInput {
            key,
            content: None,
            theme_id: &self.target.theme_id,
        };
        self.execute("assetDelete", ASSET_DELETE, input).await
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::thread::JoinHandle;

    use super::*;

    /// What the mock endpoint received.
    struct Captured {
        method: String,
        url: String,
        headers: Vec<(String, String)>,
        body: String,
    }

    impl Captured {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(field, _)| field.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        }
    }

    /// Serve a single request with a canned response.
    fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<Captured>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();

        let handle = std::thread::spawn(move || {
            let mut request = server.recv().unwrap();
            let mut received = String::new();
            request.as_reader().read_to_string(&mut received).unwrap();

            let captured = Captured {
                method: request.method().to_string(),
                url: request.url().to_string(),
                headers: request
                    .headers()
                    .iter()
                    .map(|h| (h.field.to_string(), h.value.to_string()))
                    .collect(),
                body: received,
            };

            request
                .respond(tiny_http::Response::from_string(body).with_status_code(status))
                .unwrap();
            captured
        });

        (format!("http://{addr}"), handle)
    }

    fn client_for(store_url: &str) -> ShopifyClient {
        ShopifyClient::new(ThemeTarget {
            endpoint: endpoint(store_url, DEFAULT_API_VERSION).unwrap(),
            theme_id: "123456".into(),
            access_token: "shpat_test".into(),
            auth_header: DEFAULT_AUTH_HEADER.into(),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_for_bare_host() {
        let url = endpoint("shop.myshopify.com", "2024-01").unwrap();
        assert_eq!(
            url.as_str(),
            "https://shop.myshopify.com/admin/api/2024-01/graphql.json"
        );
    }

    #[test]
    fn test_endpoint_keeps_scheme_and_trims_slash() {
        let url = endpoint("http://127.0.0.1:8080/", "2023-04").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/admin/api/2023-04/graphql.json"
        );
    }

    #[tokio::test]
    async fn test_upload_sends_asset_create() {
        let (url, server) = serve_once(
            200,
            r#"{"data":{"assetCreate":{"asset":{"key":"sections/hero.liquid"},"userErrors":[]}}}"#,
        );

        client_for(&url)
            .upload("sections/hero.liquid", "<div>hi</div>")
            .await
            .unwrap();

        let captured = server.join().unwrap();
        assert_eq!(captured.method, "POST");
        assert_eq!(captured.url, "/admin/api/2023-04/graphql.json");
        assert_eq!(captured.header("x-shopify-access-token"), Some("shpat_test"));
        assert!(
            captured
                .header("content-type")
                .is_some_and(|v| v.starts_with("application/json"))
        );

        let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        assert!(body["query"].as_str().unwrap().contains("assetCreate"));
        assert_eq!(body["variables"]["input"]["key"], "sections/hero.liquid");
        assert_eq!(body["variables"]["input"]["content"], "<div>hi</div>");
        assert_eq!(body["variables"]["input"]["themeId"], "123456");
    }

    #[tokio::test]
    async fn test_delete_sends_asset_delete() {
        let (url, server) = serve_once(
            200,
            r#"{"data":{"assetDelete":{"deletedAssetId":"x","userErrors":[]}}}"#,
        );

        client_for(&url).delete("snippets/x.liquid").await.unwrap();

        let captured = server.join().unwrap();
        let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        assert!(body["query"].as_str().unwrap().contains("assetDelete"));
        assert_eq!(body["variables"]["input"]["key"], "snippets/x.liquid");
        assert!(body["variables"]["input"].get("content").is_none());
    }

    #[tokio::test]
    async fn test_non_200_reports_status_and_body() {
        let (url, server) = serve_once(401, "[API] Invalid API key or access token");

        let err = client_for(&url).upload("a.liquid", "").await.unwrap_err();
        server.join().unwrap();

        match err {
            RemoteError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "[API] Invalid API key or access token");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_graphql_errors_are_failures() {
        let (url, server) = serve_once(200, r#"{"errors":[{"message":"Throttled"}]}"#);

        let err = client_for(&url).delete("a.liquid").await.unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, RemoteError::GraphQl { status: 200, .. }));
        assert!(err.to_string().contains("Throttled"));
    }

    #[tokio::test]
    async fn test_custom_auth_header() {
        let (url, server) = serve_once(
            200,
            r#"{"data":{"assetDelete":{"deletedAssetId":"x","userErrors":[]}}}"#,
        );

        let mut target = client_for(&url).target().clone();
        target.auth_header = "X-Custom-Token".into();
        ShopifyClient::new(target)
            .unwrap()
            .delete("a.liquid")
            .await
            .unwrap();

        let captured = server.join().unwrap();
        assert_eq!(captured.header("x-custom-token"), Some("shpat_test"));
        assert_eq!(captured.header("x-shopify-access-token"), None);
    }
}

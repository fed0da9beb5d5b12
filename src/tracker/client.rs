use log::{debug, info};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{Result, SyncError};

use super::types::{FieldInfo, Issue, SearchPage};

pub(crate) const DEFAULT_PAGE_SIZE: usize = 50;

/// Jira REST client used by the query stage.
pub struct JiraClient {
    client: Client,
    base_url: Url,
    token: Token,
    page_size: usize,
}

impl JiraClient {
    /// Creates a client for a Jira instance.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built or
    /// `base_url` is not a valid URL.
    pub fn new(base_url: &str, token: Token, page_size: usize) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("jirasheets/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to create HTTP client: {e}")))?;

        let mut base_url = Url::parse(base_url)
            .map_err(|e| SyncError::Config(format!("Invalid tracker URL: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            token,
            page_size: page_size.max(1),
        })
    }

    /// Base URL used for issue browse links, without a trailing slash.
    pub fn browse_base(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SyncError::Config(format!("Invalid tracker endpoint {path}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(SyncError::Api {
                service: "Jira",
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches one page of search results starting at `start_at`.
    ///
    /// An empty page means there are no further results.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the tracker answers with a
    /// non-success status, or the body cannot be decoded.
    pub async fn search_page(&self, jql: &str, start_at: usize) -> Result<Vec<Issue>> {
        let mut url = self.endpoint("rest/api/2/search")?;
        url.query_pairs_mut()
            .append_pair("jql", jql)
            .append_pair("startAt", &start_at.to_string())
            .append_pair("maxResults", &self.page_size.to_string())
            .append_pair("expand", "changelog");

        let page: SearchPage = self.get_json(url).await?;
        debug!(
            "Search page at {} returned {} of {} issues",
            page.start_at,
            page.issues.len(),
            page.total
        );

        Ok(page.issues)
    }

    /// Fetches every issue matching `jql`, one page at a time.
    ///
    /// Pages are requested sequentially with an offset cursor until the
    /// tracker returns an empty page.
    ///
    /// # Errors
    ///
    /// Propagates the first failing page request.
    pub async fn search_all(&self, jql: &str) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        let mut start_at = 0;

        loop {
            let page = self.search_page(jql, start_at).await?;
            if page.is_empty() {
                break;
            }
            start_at += page.len();
            issues.extend(page);
        }

        info!("Fetched {} issues", issues.len());
        Ok(issues)
    }

    /// Lists every field the tracker knows about.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn fields(&self) -> Result<Vec<FieldInfo>> {
        let url = self.endpoint("rest/api/2/field")?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::Server, page_size: usize) -> JiraClient {
        JiraClient::new(&server.url(), Token::from("jira-token"), page_size).unwrap()
    }

    fn issues_body(keys: &[&str]) -> String {
        let issues: Vec<_> = keys
            .iter()
            .map(|key| json!({"key": key, "fields": {"summary": format!("Summary {key}")}}))
            .collect();
        json!({"startAt": 0, "total": keys.len(), "issues": issues}).to_string()
    }

    #[test]
    fn test_invalid_base_url() {
        let result = JiraClient::new("not a url", Token::from("t"), 50);
        assert!(matches!(result, Err(SyncError::Config(_))));
    }

    #[test]
    fn test_browse_base_has_no_trailing_slash() {
        let client = JiraClient::new("https://jira.riscv.org/", Token::from("t"), 50).unwrap();
        assert_eq!(client.browse_base(), "https://jira.riscv.org");
    }

    #[tokio::test]
    async fn test_search_all_pages_until_empty() {
        let mut server = mockito::Server::new_async().await;
        let jql = "project = RVS ORDER BY updated DESC";

        let first = server
            .mock("GET", "/rest/api/2/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("jql".into(), jql.into()),
                Matcher::UrlEncoded("startAt".into(), "0".into()),
                Matcher::UrlEncoded("maxResults".into(), "2".into()),
            ]))
            .match_header("authorization", "Bearer jira-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(issues_body(&["RVS-1", "RVS-2"]))
            .create_async()
            .await;
        let second = server
            .mock("GET", "/rest/api/2/search")
            .match_query(Matcher::UrlEncoded("startAt".into(), "2".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(issues_body(&["RVS-3"]))
            .create_async()
            .await;
        let last = server
            .mock("GET", "/rest/api/2/search")
            .match_query(Matcher::UrlEncoded("startAt".into(), "3".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(issues_body(&[]))
            .create_async()
            .await;

        let issues = client_for(&server, 2).search_all(jql).await.unwrap();

        let keys: Vec<&str> = issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["RVS-1", "RVS-2", "RVS-3"]);
        first.assert_async().await;
        second.assert_async().await;
        last.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/2/search")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body("The value 'RVX' does not exist for the field 'project'.")
            .create_async()
            .await;

        let err = client_for(&server, 50)
            .search_all("project = RVX")
            .await
            .unwrap_err();

        match err {
            SyncError::Api {
                service,
                status,
                message,
            } => {
                assert_eq!(service, "Jira");
                assert_eq!(status, 400);
                assert!(message.contains("RVX"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_json_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/2/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client_for(&server, 50)
            .search_page("project = RVS", 0)
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Json(_)), "got {err}");
    }

    #[tokio::test]
    async fn test_fields_lists_custom_fields() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/2/field")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {"id": "summary", "name": "Summary", "custom": false},
                    {"id": "customfield_10402", "name": "Governing Committee", "custom": true}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let fields = client_for(&server, 50).fields().await.unwrap();

        assert_eq!(fields.len(), 2);
        assert!(fields[1].custom);
        assert_eq!(fields[1].id, "customfield_10402");
    }
}

use async_trait::async_trait;
use chrono::SecondsFormat;
use pulse_core::{ActivitySource, ActivityWindow, Identity, SourceError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

// ─── Constants ────────────────────────────────────────────────────────────

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("pulse/", env!("CARGO_PKG_VERSION"));
/// Cap on the single page we fetch; pagination is out of scope, so a
/// very busy identity reads as "at least 100".
const PER_PAGE: &str = "100";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// How much of an error body to keep in the failure message.
const BODY_EXCERPT_CHARS: usize = 200;

// ─── Minimal payload shapes ───────────────────────────────────────────────

// Only the array-of-objects shape matters; the count is the array
// length. One required field per item type keeps the check honest
// without modeling the whole payload.

#[derive(Debug, Deserialize)]
struct CommitItem {
    #[allow(dead_code)]
    sha: String,
}

#[derive(Debug, Deserialize)]
struct IssueItem {
    #[allow(dead_code)]
    number: u64,
}

// ─── GithubSource ─────────────────────────────────────────────────────────

/// [`ActivitySource`] backed by the GitHub REST API, scoped to a single
/// repository. Each query is one best-effort request for one page of a
/// list endpoint; the count is the page length.
pub struct GithubSource {
    client: reqwest::Client,
    api_url: String,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl GithubSource {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        GithubSource {
            client: reqwest::Client::new(),
            api_url: pulse_core::config::DEFAULT_API_URL.to_string(),
            owner: owner.into(),
            repo: repo.into(),
            token: None,
        }
    }

    /// Override the API base URL (tests point this at a mock server).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Attach a bearer token, sent as `Authorization: Bearer <token>`.
    /// Unauthenticated requests work but hit a much lower rate limit.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Fetch one page of a list endpoint and return its length after an
    /// explicit shape check: the payload must be a JSON array of
    /// `T`-shaped objects, otherwise the query fails as `Schema`.
    async fn list_len<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<u64, SourceError> {
        tracing::debug!(url = %url, "github request");

        let mut req = self
            .client
            .get(url)
            .query(query)
            .timeout(REQUEST_TIMEOUT)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = &self.token {
            req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let resp = req
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let items: Vec<T> =
            serde_json::from_str(&body).map_err(|e| SourceError::Schema(e.to_string()))?;
        Ok(items.len() as u64)
    }
}

#[async_trait]
impl ActivitySource for GithubSource {
    async fn commit_count(
        &self,
        identity: &Identity,
        window: &ActivityWindow,
    ) -> Result<u64, SourceError> {
        let url = format!(
            "{}/repos/{}/{}/commits",
            self.api_url, self.owner, self.repo
        );
        let since = window.since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let until = window.until.to_rfc3339_opts(SecondsFormat::Secs, true);
        self.list_len::<CommitItem>(
            &url,
            &[
                ("author", identity.as_str()),
                ("since", since.as_str()),
                ("until", until.as_str()),
                ("per_page", PER_PAGE),
            ],
        )
        .await
    }

    async fn issue_count(
        &self,
        identity: &Identity,
        window: &ActivityWindow,
    ) -> Result<u64, SourceError> {
        let url = format!("{}/repos/{}/{}/issues", self.api_url, self.owner, self.repo);
        // The issues endpoint has no `until` parameter; the window ends
        // at the invocation's "now", so `since` alone bounds it.
        let since = window.since.to_rfc3339_opts(SecondsFormat::Secs, true);
        self.list_len::<IssueItem>(
            &url,
            &[
                ("creator", identity.as_str()),
                ("since", since.as_str()),
                ("state", "all"),
                ("per_page", PER_PAGE),
            ],
        )
        .await
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_EXCERPT_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(BODY_EXCERPT_CHARS).collect();
        format!("{cut}...")
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use mockito::Matcher;
    use pulse_core::{check_activity_in, SnapshotStatus};

    fn window() -> ActivityWindow {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        ActivityWindow::trailing(ChronoDuration::hours(24), now)
    }

    fn alice() -> Identity {
        Identity::from("alice")
    }

    fn source(server: &mockito::ServerGuard) -> GithubSource {
        GithubSource::new("acme", "widget").with_api_url(server.url())
    }

    #[tokio::test]
    async fn commit_count_is_single_page_length() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/acme/widget/commits")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("author".into(), "alice".into()),
                Matcher::UrlEncoded("since".into(), "2024-06-14T12:00:00Z".into()),
                Matcher::UrlEncoded("until".into(), "2024-06-15T12:00:00Z".into()),
                Matcher::UrlEncoded("per_page".into(), "100".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"sha":"a1"},{"sha":"b2"}]"#)
            .create_async()
            .await;

        let count = source(&server)
            .commit_count(&alice(), &window())
            .await
            .unwrap();
        assert_eq!(count, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn issue_count_filters_by_creator_and_since() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/acme/widget/issues")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("creator".into(), "alice".into()),
                Matcher::UrlEncoded("since".into(), "2024-06-14T12:00:00Z".into()),
                Matcher::UrlEncoded("state".into(), "all".into()),
                Matcher::UrlEncoded("per_page".into(), "100".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"number":7}]"#)
            .create_async()
            .await;

        let count = source(&server)
            .issue_count(&alice(), &window())
            .await
            .unwrap();
        assert_eq!(count, 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_page_reads_as_zero() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/acme/widget/commits")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let count = source(&server)
            .commit_count(&alice(), &window())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn non_success_status_is_a_status_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/acme/widget/commits")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let err = source(&server)
            .commit_count(&alice(), &window())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 500, .. }));
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[tokio::test]
    async fn rate_limited_status_is_a_status_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/acme/widget/issues")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"message":"API rate limit exceeded"}"#)
            .create_async()
            .await;

        let err = source(&server)
            .issue_count(&alice(), &window())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 403, .. }));
    }

    #[tokio::test]
    async fn non_array_payload_is_a_schema_failure() {
        // GitHub error payloads are objects; the shape check must reject
        // them instead of misreading a length.
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/acme/widget/commits")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"message":"Bad credentials"}"#)
            .create_async()
            .await;

        let err = source(&server)
            .commit_count(&alice(), &window())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Schema(_)));
    }

    #[tokio::test]
    async fn items_missing_required_fields_are_a_schema_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/acme/widget/commits")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"["not-an-object"]"#)
            .create_async()
            .await;

        let err = source(&server)
            .commit_count(&alice(), &window())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Schema(_)));
    }

    #[tokio::test]
    async fn token_is_sent_as_bearer_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/acme/widget/commits")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer t0ken")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        source(&server)
            .with_token(Some("t0ken".to_string()))
            .commit_count(&alice(), &window())
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn no_token_sends_no_auth_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/acme/widget/commits")
            .match_query(Matcher::Any)
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        source(&server)
            .commit_count(&alice(), &window())
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn user_agent_and_api_version_are_always_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/acme/widget/issues")
            .match_query(Matcher::Any)
            .match_header("user-agent", Matcher::Regex("^pulse/".into()))
            .match_header("x-github-api-version", API_VERSION)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        source(&server)
            .issue_count(&alice(), &window())
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_failure() {
        // Point at a port nothing listens on.
        let github = GithubSource::new("acme", "widget").with_api_url("http://127.0.0.1:9");
        let err = github
            .commit_count(&alice(), &window())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Transport(_)));
    }

    // ── End to end through the checker ──────────────────────────────

    #[tokio::test]
    async fn checker_over_github_source_isolates_a_failing_identity() {
        let mut server = mockito::Server::new_async().await;
        for (path, author_key) in [("commits", "author"), ("issues", "creator")] {
            server
                .mock("GET", format!("/repos/acme/widget/{path}").as_str())
                .match_query(Matcher::AllOf(vec![Matcher::UrlEncoded(
                    author_key.into(),
                    "alice".into(),
                )]))
                .with_status(200)
                .with_body(if path == "commits" {
                    r#"[{"sha":"a1"},{"sha":"b2"}]"#
                } else {
                    "[]"
                })
                .create_async()
                .await;
        }
        // bob's commit query breaks; his issue query would succeed.
        server
            .mock("GET", "/repos/acme/widget/commits")
            .match_query(Matcher::AllOf(vec![Matcher::UrlEncoded(
                "author".into(),
                "bob".into(),
            )]))
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;
        server
            .mock("GET", "/repos/acme/widget/issues")
            .match_query(Matcher::AllOf(vec![Matcher::UrlEncoded(
                "creator".into(),
                "bob".into(),
            )]))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let github = source(&server);
        let roster = vec![Identity::from("alice"), Identity::from("bob")];
        let snapshot = check_activity_in(&github, &roster, window()).await.unwrap();

        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.records[0].commit_count, 2);
        assert!(snapshot.records[0].active);
        assert!(!snapshot.records[0].failed);
        assert!(snapshot.records[1].failed);
        assert!(snapshot.partial);
        assert_eq!(snapshot.status(), SnapshotStatus::PartialFailure);
    }
}

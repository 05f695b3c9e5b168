//! TMDb v3 implementation of the `CatalogClient` port.

use std::time::Duration;

use async_trait::async_trait;
use marquee_core::catalog::{CatalogClient, Item, ItemId, Page};
use marquee_core::config::MarqueeConfig;
use marquee_core::error::{MarqueeError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::dto::{MovieDetailDto, MovieListDto};

/// Catalog client backed by the TMDb v3 REST API.
///
/// The API key travels as the `api_key` query parameter. Every request is
/// bounded by the configured timeout; there is no automatic retry.
#[derive(Clone)]
pub struct TmdbCatalogClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

/// Error body TMDb returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct StatusBody {
    status_message: Option<String>,
}

impl TmdbCatalogClient {
    pub fn new(config: &MarqueeConfig) -> Self {
        Self::with_base_url(&config.base_url, &config.api_key, config.request_timeout())
    }

    pub fn with_base_url(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {} {:?}", path, query);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StatusBody>(&body)
                .ok()
                .and_then(|parsed| parsed.status_message)
                .unwrap_or_else(|| status.to_string());
            tracing::warn!("Catalog returned {} for {}: {}", status, path, message);
            return Err(MarqueeError::http_status(
                status.as_u16(),
                format!("catalog returned {}: {}", status, message),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MarqueeError::network(format!("Failed to decode catalog response: {}", e)))
    }

    fn transport_error(&self, path: &str, err: reqwest::Error) -> MarqueeError {
        if err.is_timeout() {
            tracing::warn!("Catalog request {} timed out after {:?}", path, self.timeout);
            MarqueeError::network(format!("request timed out after {:?}", self.timeout))
        } else {
            tracing::warn!("Catalog request {} failed: {}", path, err);
            MarqueeError::network(format!("request failed: {}", err))
        }
    }
}

fn check_page(page: u32) -> Result<()> {
    if page == 0 {
        return Err(MarqueeError::invalid_input("page index is 1-based"));
    }
    Ok(())
}

#[async_trait]
impl CatalogClient for TmdbCatalogClient {
    async fn trending(&self, page: u32) -> Result<Page> {
        check_page(page)?;
        let body: MovieListDto = self
            .get_json("/trending/movie/week", &[("page", page.to_string())])
            .await?;
        Ok(body.into_page(page))
    }

    async fn search(&self, query: &str, page: u32) -> Result<Page> {
        check_page(page)?;
        let query = query.trim();
        if query.is_empty() {
            return Err(MarqueeError::invalid_input("search query must not be empty"));
        }
        let body: MovieListDto = self
            .get_json(
                "/search/movie",
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;
        Ok(body.into_page(page))
    }

    async fn item_detail(&self, id: ItemId) -> Result<Item> {
        let body: MovieDetailDto = self
            .get_json(
                &format!("/movie/{}", id),
                &[("append_to_response", "credits,videos".to_string())],
            )
            .await?;
        Ok(body.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::discovery::DiscoveryMode;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> TmdbCatalogClient {
        TmdbCatalogClient::with_base_url(&server.url(), "test-key", Duration::from_secs(5))
    }

    fn list_body(ids: std::ops::Range<u64>, page: u32, total_pages: u32) -> String {
        let results: Vec<String> = ids
            .map(|id| {
                format!(
                    r#"{{"id": {}, "title": "Movie {}", "release_date": "2020-01-01", "vote_average": 7.0, "poster_path": null}}"#,
                    id, id
                )
            })
            .collect();
        format!(
            r#"{{"page": {}, "results": [{}], "total_pages": {}}}"#,
            page,
            results.join(","),
            total_pages
        )
    }

    #[tokio::test]
    async fn test_trending_sends_key_and_page() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/trending/movie/week")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_key".into(), "test-key".into()),
                Matcher::UrlEncoded("page".into(), "2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(list_body(20..40, 2, 9))
            .create_async()
            .await;

        let page = client_for(&server).trending(2).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 9);
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.items[0].id, 20);
    }

    #[tokio::test]
    async fn test_search_encodes_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_key".into(), "test-key".into()),
                Matcher::UrlEncoded("query".into(), "the dark knight".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(list_body(0..3, 1, 1))
            .create_async()
            .await;

        let mode = DiscoveryMode::from_query("  the dark knight ");
        let page = client_for(&server).fetch_page(&mode, 1).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.items.len(), 3);
    }

    #[tokio::test]
    async fn test_item_detail_appends_credits_and_videos() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/movie/268")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_key".into(), "test-key".into()),
                Matcher::UrlEncoded("append_to_response".into(), "credits,videos".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{
                    "id": 268, "title": "Batman", "release_date": "1989-06-23",
                    "vote_average": 7.2, "poster_path": "/b.jpg",
                    "overview": "The Dark Knight of Gotham City.",
                    "genres": [{"id": 14, "name": "Fantasy"}],
                    "credits": {"cast": [{"name": "Michael Keaton", "character": "Batman", "order": 0}]},
                    "videos": {"results": [{"key": "dgC9Q0uhX70", "site": "YouTube", "type": "Trailer"}]}
                }"#,
            )
            .create_async()
            .await;

        let item = client_for(&server).item_detail(268).await.unwrap();

        mock.assert_async().await;
        let detail = item.detail.unwrap();
        assert_eq!(detail.genres, vec!["Fantasy"]);
        assert_eq!(detail.cast[0].name, "Michael Keaton");
        assert_eq!(
            detail.trailer.and_then(|t| t.url()).as_deref(),
            Some("https://www.youtube.com/watch?v=dgC9Q0uhX70")
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_network_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/trending/movie/week")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"status_code": 7, "status_message": "Invalid API key."}"#)
            .create_async()
            .await;

        let err = client_for(&server).trending(1).await.unwrap_err();
        assert!(matches!(
            err,
            MarqueeError::NetworkFailure { status: Some(401), ref message } if message.contains("Invalid API key")
        ));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_server_error_is_retryable() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = client_for(&server).search("dune", 1).await.unwrap_err();
        assert!(err.is_network());
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_undecodable_body_is_network_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/trending/movie/week")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client_for(&server).trending(1).await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_failure() {
        let client =
            TmdbCatalogClient::with_base_url("http://127.0.0.1:1", "k", Duration::from_secs(2));
        let err = client.trending(1).await.unwrap_err();
        assert!(err.is_network());
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_silent_server_times_out_as_retryable_network_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold connections without ever answering.
        let silent = tokio::spawn(async move {
            let mut held = Vec::new();
            loop {
                if let Ok((socket, _)) = listener.accept().await {
                    held.push(socket);
                }
            }
        });

        let client = TmdbCatalogClient::with_base_url(
            &format!("http://{}", addr),
            "k",
            Duration::from_millis(100),
        );
        let err = tokio::time::timeout(Duration::from_secs(5), client.trending(1))
            .await
            .expect("client timeout should fire first")
            .unwrap_err();
        silent.abort();

        assert!(err.is_network());
        assert!(err.is_retryable());
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_invalid_arguments_never_hit_the_network() {
        let client =
            TmdbCatalogClient::with_base_url("http://127.0.0.1:1", "k", Duration::from_secs(2));
        assert!(matches!(
            client.trending(0).await,
            Err(MarqueeError::InvalidInput(_))
        ));
        assert!(matches!(
            client.search("   ", 1).await,
            Err(MarqueeError::InvalidInput(_))
        ));
    }
}

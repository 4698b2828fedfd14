use super::model::{
    ApiResponse, Category, CategoryId, EditorPick, Page, Story, StoryId, TopStory,
};
use crate::config::RuntimeConfig;
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub const fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub const fn first(per_page: u32) -> Self {
        Self::new(1, per_page)
    }
}

/// Read-only view of the content API. Screens and search only see this trait.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn categories(&self) -> ApiResult<Vec<Category>>;
    async fn category_stories(&self, id: CategoryId, req: PageRequest) -> ApiResult<Page<Story>>;
    async fn editor_picks(&self, req: PageRequest) -> ApiResult<Page<EditorPick>>;
    async fn top_stories(&self) -> ApiResult<Vec<TopStory>>;
    async fn latest_stories(&self, req: PageRequest) -> ApiResult<Page<Story>>;
    async fn missed_stories(&self, req: PageRequest) -> ApiResult<Page<Story>>;
    async fn story(&self, id: StoryId) -> ApiResult<Story>;
}

/// HTTP client for `https://api.agcnewsnet.com/api/general`.
#[derive(Debug, Clone)]
pub struct ContentApi {
    client: Client,
    base: String,
}

impl ContentApi {
    pub fn new(cfg: &RuntimeConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(&cfg.user_agent)
            .gzip(true)
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Self::with_client(client, &cfg.api_base)
    }

    fn with_client(client: Client, api_base: &str) -> ApiResult<Self> {
        // validate once up front so endpoint() only fails on bad paths
        Url::parse(api_base)?;
        Ok(Self {
            client,
            base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str, req: Option<PageRequest>) -> ApiResult<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base, path))?;
        if let Some(r) = req {
            url.query_pairs_mut()
                .append_pair("page", &r.page.to_string())
                .append_pair("per_page", &r.per_page.to_string());
        }
        Ok(url)
    }

    async fn get_bytes(&self, url: &Url) -> ApiResult<Vec<u8>> {
        log::debug!("GET {}", url);
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        // Stream with a max size limit
        let max = max_body_bytes();
        let mut stream = resp.bytes_stream();
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = stream.next().await {
            let c = chunk?;
            if buf.len() + c.len() > max {
                return Err(ApiError::TooLarge {
                    url: url.to_string(),
                    limit: max,
                });
            }
            buf.extend_from_slice(&c);
        }
        Ok(buf)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let bytes = self.get_bytes(&url).await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::decode(url.as_str(), e))
    }

    async fn get_page<T: DeserializeOwned>(&self, url: Url) -> ApiResult<Page<T>> {
        let resp: ApiResponse<T> = self.get_json(url).await?;
        Ok(resp.data)
    }
}

#[async_trait]
impl ContentSource for ContentApi {
    async fn categories(&self) -> ApiResult<Vec<Category>> {
        let url = self.endpoint("categories", None)?;
        Ok(self.get_page(url).await?.data)
    }

    async fn category_stories(&self, id: CategoryId, req: PageRequest) -> ApiResult<Page<Story>> {
        let url = self.endpoint(&format!("categories/{}/stories", id), Some(req))?;
        self.get_page(url).await
    }

    async fn editor_picks(&self, req: PageRequest) -> ApiResult<Page<EditorPick>> {
        let url = self.endpoint("editor-picks", Some(req))?;
        self.get_page(url).await
    }

    async fn top_stories(&self) -> ApiResult<Vec<TopStory>> {
        let url = self.endpoint("top-stories", None)?;
        Ok(self.get_page(url).await?.data)
    }

    async fn latest_stories(&self, req: PageRequest) -> ApiResult<Page<Story>> {
        let url = self.endpoint("stories/latest-stories", Some(req))?;
        self.get_page(url).await
    }

    async fn missed_stories(&self, req: PageRequest) -> ApiResult<Page<Story>> {
        let url = self.endpoint("stories/missed-stories", Some(req))?;
        self.get_page(url).await
    }

    async fn story(&self, id: StoryId) -> ApiResult<Story> {
        let url = self.endpoint(&format!("stories/{}", id), None)?;
        let body: Value = self.get_json(url.clone()).await?;
        extract_story(&body).map_err(|e| match e {
            ApiError::Decode { source, .. } => ApiError::decode(url.as_str(), source),
            other => other,
        })
    }
}

/// Story detail bodies are not consistently wrapped: the story lives at
/// `story`, `data.story` or `data`, first non-null wins.
pub fn extract_story(body: &Value) -> ApiResult<Story> {
    let present = |v: Option<&Value>| v.filter(|x| !x.is_null()).cloned();
    let candidate = present(body.get("story"))
        .or_else(|| present(body.get("data").and_then(|d| d.get("story"))))
        .or_else(|| present(body.get("data")))
        .ok_or(ApiError::StoryNotFound)?;
    let story: Story =
        serde_json::from_value(candidate).map_err(|e| ApiError::decode("story", e))?;
    if story.title.trim().is_empty() {
        return Err(ApiError::StoryNotFound);
    }
    Ok(story)
}

fn max_body_bytes() -> usize {
    // 5 MB cap
    5 * 1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response on loopback and returns a client for it.
    async fn serve_once(status: &str, body: Vec<u8>) -> ContentApi {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(&body);
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = sock.read(&mut buf).await;
            // the client hangs up early when it rejects the body
            let _ = sock.write_all(&response).await;
            let _ = sock.shutdown().await;
        });
        // loopback must not go through a proxy from the environment
        let client = Client::builder().no_proxy().build().unwrap();
        ContentApi::with_client(client, &format!("http://{}", addr)).unwrap()
    }

    #[tokio::test]
    async fn decodes_a_served_page() {
        let body = json!({
            "message": "ok",
            "data": {"data": [{"category_id": 1, "category_name": "Politics"}]}
        });
        let api = serve_once("200 OK", body.to_string().into_bytes()).await;
        let cats = api.categories().await.unwrap();
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].category_name, "Politics");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let api = serve_once("404 Not Found", b"{}".to_vec()).await;
        match api.top_stories().await {
            Err(ApiError::Status { url, status }) => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert!(url.ends_with("/top-stories"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let api = serve_once("200 OK", b"<html>maintenance</html>".to_vec()).await;
        let res = api.latest_stories(PageRequest::first(8)).await;
        assert!(matches!(res, Err(ApiError::Decode { url, .. }) if url.contains("latest-stories")));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let api = serve_once("200 OK", vec![b' '; max_body_bytes() + 1]).await;
        let res = api.missed_stories(PageRequest::first(5)).await;
        assert!(matches!(res, Err(ApiError::TooLarge { limit, .. }) if limit == max_body_bytes()));
    }

    fn api() -> ContentApi {
        let cfg = RuntimeConfig {
            api_base: "https://api.agcnewsnet.com/api/general/".into(),
            ..RuntimeConfig::default()
        };
        ContentApi::new(&cfg).unwrap()
    }

    #[test]
    fn builds_paginated_endpoint() {
        let url = api()
            .endpoint("categories/2/stories", Some(PageRequest::new(3, 10)))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.agcnewsnet.com/api/general/categories/2/stories?page=3&per_page=10"
        );
    }

    #[test]
    fn builds_plain_endpoint() {
        let url = api().endpoint("top-stories", None).unwrap();
        assert_eq!(url.as_str(), "https://api.agcnewsnet.com/api/general/top-stories");
    }

    #[test]
    fn rejects_invalid_base() {
        let cfg = RuntimeConfig {
            api_base: "not a url".into(),
            ..RuntimeConfig::default()
        };
        assert!(matches!(ContentApi::new(&cfg), Err(ApiError::Url(_))));
    }

    #[test]
    fn extracts_story_from_each_envelope() {
        let bare = json!({"story": {"id": 1, "title": "A"}});
        let nested = json!({"data": {"story": {"id": 2, "title": "B"}}});
        let data = json!({"message": "ok", "data": {"id": 3, "title": "C"}});
        assert_eq!(extract_story(&bare).unwrap().id, 1);
        assert_eq!(extract_story(&nested).unwrap().id, 2);
        assert_eq!(extract_story(&data).unwrap().id, 3);
    }

    #[test]
    fn story_without_title_is_not_found() {
        let body = json!({"data": {"id": 4, "title": ""}});
        assert!(matches!(extract_story(&body), Err(ApiError::StoryNotFound)));
        let body = json!({"data": null});
        assert!(matches!(extract_story(&body), Err(ApiError::StoryNotFound)));
    }
}

//! StaticFetcher / OfflineFetcher - 開発・テスト用の JsonFetcher
//!
//! # 学習ポイント
//! - URL prefix でルーティング（クエリ文字列は気にしない）
//! - tokio::time::sleep による遅延注入（paused time のテストで使える）

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::FetchError;
use crate::ports::JsonFetcher;

#[derive(Debug, Clone)]
enum Reply {
    Json(serde_json::Value),
    Status(u16),
}

#[derive(Debug, Clone)]
struct Route {
    prefix: String,
    reply: Reply,
    delay: Option<Duration>,
}

/// StaticFetcher は URL prefix ごとに固定のレスポンスを返す
///
/// # 使用例
/// ```ignore
/// let fetcher = StaticFetcher::new()
///     .with_json("https://api.example.com/price", json!({...}))
///     .with_status("https://api.example.com/posts", 503);
/// ```
///
/// どのルートにも一致しない URL は Network エラー。
#[derive(Debug, Default)]
pub struct StaticFetcher {
    routes: Vec<Route>,
    calls: Mutex<HashMap<String, usize>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn route(mut self, prefix: &str, reply: Reply) -> Self {
        self.routes.retain(|r| r.prefix != prefix);
        self.routes.push(Route {
            prefix: prefix.to_string(),
            reply,
            delay: None,
        });
        self
    }

    pub fn with_json(self, prefix: &str, body: serde_json::Value) -> Self {
        self.route(prefix, Reply::Json(body))
    }

    pub fn with_status(self, prefix: &str, status: u16) -> Self {
        self.route(prefix, Reply::Status(status))
    }

    /// 既存ルートに遅延を付ける（ルートが無ければ何もしない）
    pub fn with_delay(mut self, prefix: &str, delay: Duration) -> Self {
        if let Some(route) = self.routes.iter_mut().find(|r| r.prefix == prefix) {
            route.delay = Some(delay);
        }
        self
    }

    /// `prefix` に一致したリクエストの回数
    pub fn calls(&self, prefix: &str) -> usize {
        let calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        calls.get(prefix).copied().unwrap_or(0)
    }

    fn find(&self, url: &str) -> Option<&Route> {
        // 長い prefix を優先
        self.routes
            .iter()
            .filter(|r| url.starts_with(&r.prefix))
            .max_by_key(|r| r.prefix.len())
    }
}

#[async_trait]
impl JsonFetcher for StaticFetcher {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let Some(route) = self.find(url) else {
            return Err(FetchError::network(url, "no route"));
        };

        {
            let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
            *calls.entry(route.prefix.clone()).or_default() += 1;
        }

        if let Some(delay) = route.delay {
            tokio::time::sleep(delay).await;
        }

        match &route.reply {
            Reply::Json(body) => Ok(body.clone()),
            Reply::Status(status) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
        }
    }
}

/// OfflineFetcher は常に失敗する（全ウィジェットが fallback になる）
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

#[async_trait]
impl JsonFetcher for OfflineFetcher {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        Err(FetchError::network(url, "offline"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use serde_json::json;

    #[tokio::test]
    async fn routes_by_prefix_and_counts_calls() {
        let fetcher = StaticFetcher::new()
            .with_json("http://a/price", json!({"ok": true}))
            .with_status("http://a/posts", 503);

        let body = fetcher.get_json("http://a/price?ids=x").await.unwrap();
        assert_eq!(body["ok"], true);

        let err = fetcher.get_json("http://a/posts?_limit=5").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));

        assert_eq!(fetcher.calls("http://a/price"), 1);
        assert_eq!(fetcher.calls("http://a/posts"), 1);
    }

    #[tokio::test]
    async fn unknown_url_is_a_network_error() {
        let err = StaticFetcher::new().get_json("http://nowhere").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    async fn longest_prefix_wins() {
        let fetcher = StaticFetcher::new()
            .with_json("http://a/", json!(1))
            .with_json("http://a/b", json!(2));
        assert_eq!(fetcher.get_json("http://a/b/c").await.unwrap(), json!(2));
        assert_eq!(fetcher.get_json("http://a/x").await.unwrap(), json!(1));
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_applied() {
        let fetcher = StaticFetcher::new()
            .with_json("http://a", json!(null))
            .with_delay("http://a", Duration::from_secs(5));
        let start = tokio::time::Instant::now();
        fetcher.get_json("http://a").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn offline_always_fails() {
        assert!(OfflineFetcher.get_json("http://a").await.is_err());
    }
}

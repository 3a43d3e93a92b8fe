//! HttpFetcher - reqwest による JsonFetcher 実装

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::FetchError;
use crate::ports::JsonFetcher;

/// 1 つの reqwest::Client を使い回す
///
/// タイムアウトはクライアント単位で設定する。タイムアウトも他の通信失敗と
/// 同じく `FetchError::Network` になる。
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<serde_json::Value>().await.map_err(|e| {
            if e.is_decode() {
                FetchError::parse(e)
            } else {
                FetchError::network(url, e)
            }
        })
    }
}

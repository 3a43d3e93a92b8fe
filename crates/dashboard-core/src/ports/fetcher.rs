//! JsonFetcher port - リモート API への唯一の出口
//!
//! DataSource はこの trait 越しにしか通信しない。テストでは StaticFetcher で
//! 成功・失敗・遅延を差し込む。
//!
//! # 実装
//! - HttpFetcher: reqwest（本番用）
//! - StaticFetcher: URL ごとの固定レスポンス
//! - OfflineFetcher: 常に Network エラー

use async_trait::async_trait;

use crate::domain::FetchError;

/// GET して JSON を返す
///
/// # エラー
/// - 通信失敗・非 2xx → `FetchError::Network` / `FetchError::Status`
/// - ボディが JSON でない → `FetchError::Parse`
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;
}

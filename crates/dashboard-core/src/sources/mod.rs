//! Sources - リモート API から 1 回分のスナップショットを取る DataSource
//!
//! # 契約
//! - `fetch()` は失敗しない。失敗はすべて fallback 値 + ErrorKind になる
//! - `fetch_live()` の中で起きたエラー（通信・非 2xx・形の不一致）は
//!   この境界の外に出ない
//! - 乱数は RandomSource 経由（fallback をテストで固定できる）

pub mod activity;
pub mod market;
pub mod weather;

pub use self::activity::ActivitySource;
pub use self::market::MarketSource;
pub use self::weather::WeatherSource;

use async_trait::async_trait;

use crate::domain::{FetchError, Fetched};

/// DataSource は 1 種類の外部データの取得方法と、その代替値を知っている
///
/// 実装するのは `fetch_live` と `fallback` だけ。`fetch` は provided method で、
/// エラーを fallback に畳み込む。
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    type Output: Clone + Send + Sync + 'static;

    /// ログ・ステータス表示用の名前
    fn name(&self) -> &'static str;

    /// リモートを叩いてドメインの形にする
    async fn fetch_live(&self) -> Result<Self::Output, FetchError>;

    /// 代替値（乱数を含んでよい）
    fn fallback(&self) -> Self::Output;

    async fn fetch(&self) -> Fetched<Self::Output> {
        match self.fetch_live().await {
            Ok(value) => {
                tracing::debug!(event = "source.live", source = self.name());
                Fetched::Live(value)
            }
            Err(err) => {
                tracing::warn!(
                    event = "source.fallback",
                    source = self.name(),
                    error = %err,
                    "fetch failed, using fallback data"
                );
                Fetched::Fallback {
                    value: self.fallback(),
                    cause: err.kind(),
                }
            }
        }
    }
}

/// JSON を型に変換する。形が違えば Parse エラー。
pub(crate) fn decode<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, FetchError> {
    Ok(serde_json::from_value(body)?)
}

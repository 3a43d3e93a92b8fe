//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **HttpFetcher**: reqwest による本番用 JsonFetcher
//! - **StaticFetcher / OfflineFetcher**: 開発・テスト用 JsonFetcher
//! - **MemoryStore / FileStore**: KeyValueStore
//! - **TracingSink / MemorySink**: NotificationSink
//! - **ThreadRandom / SeededRandom / SequenceRandom**: RandomSource

pub mod file_store;
pub mod http;
pub mod memory_store;
pub mod random;
pub mod sinks;
pub mod static_fetcher;

// 主要な型を再エクスポート
pub use self::file_store::FileStore;
pub use self::http::HttpFetcher;
pub use self::memory_store::MemoryStore;
pub use self::random::{SeededRandom, SequenceRandom, ThreadRandom};
pub use self::sinks::{MemorySink, TracingSink};
pub use self::static_fetcher::{OfflineFetcher, StaticFetcher};

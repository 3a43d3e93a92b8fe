//! KeyValueStore port - 文字列キーの永続ストア
//!
//! ブラウザの localStorage 相当。設定・タスク・テーマの保存に使う。
//!
//! # 実装
//! - MemoryStore: テスト・オフライン用
//! - FileStore: JSON ファイル 1 つに全キーを保存（CLI 用）

use crate::domain::StoreError;

/// KeyValueStore は get/set/remove だけを持つ
///
/// # Thread Safety
/// - `Send + Sync` を要求（Arc で共有する）
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// 存在しないキーの remove はエラーにしない
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

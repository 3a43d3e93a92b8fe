//! Errors - エラー型と分類
//!
//! - FetchError: DataSource の境界で捕捉され、fallback に畳み込まれる
//! - StoreError: KeyValueStore の失敗（設定保存の通知に使う）

use thiserror::Error;

/// ErrorKind は fetch 失敗の分類
///
/// WidgetState.last_error に残る診断情報。UI 側で live/fallback を区別する以上の
/// 意味は持たない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// リクエスト失敗 or 非 2xx
    Network,
    /// レスポンスの形が期待と違う
    Parse,
}

/// A failed remote fetch. Never escapes a DataSource.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response shape: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn network(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Network {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn parse(message: impl ToString) -> Self {
        Self::Parse(message.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network { .. } | FetchError::Status { .. } => ErrorKind::Network,
            FetchError::Parse(_) => ErrorKind::Parse,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::parse(err)
    }
}

/// StoreError は KeyValueStore の操作エラー
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store contents are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("{0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_network_collapse_to_network_kind() {
        let status = FetchError::Status {
            url: "http://x".to_string(),
            status: 503,
        };
        assert_eq!(status.kind(), ErrorKind::Network);
        assert_eq!(FetchError::network("http://x", "refused").kind(), ErrorKind::Network);
        assert_eq!(FetchError::parse("missing field").kind(), ErrorKind::Parse);
    }

    #[test]
    fn serde_errors_become_parse_errors() {
        let err = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let fetch: FetchError = err.into();
        assert_eq!(fetch.kind(), ErrorKind::Parse);
    }
}

//! State - ウィジェットの状態と遷移
//!
//! # 状態遷移
//! - Idle → Loading（begin）
//! - Loading → Idle + Live/Fallback（complete）
//! - Loading → Idle（abandon: キャンセル時）
//!
//! 遷移はすべて「古い状態を受け取って新しい状態を返す」関数で表現する。
//! 購読側（UI バインディング）は遷移ロジックを持たない。

use serde::{Deserialize, Serialize};

use super::errors::ErrorKind;

/// Where the current value of a widget came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    /// Placeholder value; nothing has been fetched yet.
    Initial,
    Live,
    Fallback,
}

/// Result of one DataSource invocation.
///
/// There is no error variant: a failed fetch still carries a renderable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Live(T),
    Fallback { value: T, cause: ErrorKind },
}

impl<T> Fetched<T> {
    pub fn origin(&self) -> DataOrigin {
        match self {
            Fetched::Live(_) => DataOrigin::Live,
            Fetched::Fallback { .. } => DataOrigin::Fallback,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Fetched::Live(value) | Fetched::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Fetched::Live(value) | Fetched::Fallback { value, .. } => value,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Fetched::Live(_))
    }
}

/// Reactive state record a widget renders from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetState<T> {
    pub loading: bool,
    pub data: T,
    pub last_error: Option<ErrorKind>,
    pub origin: DataOrigin,
}

impl<T> WidgetState<T> {
    pub fn new(initial: T) -> Self {
        Self {
            loading: false,
            data: initial,
            last_error: None,
            origin: DataOrigin::Initial,
        }
    }

    /// Fetch started.
    pub fn begin(self) -> Self {
        Self {
            loading: true,
            ..self
        }
    }

    /// Fetch finished, live or fallback.
    pub fn complete(self, fetched: Fetched<T>) -> Self {
        let origin = fetched.origin();
        let last_error = match &fetched {
            Fetched::Live(_) => None,
            Fetched::Fallback { cause, .. } => Some(*cause),
        };
        Self {
            loading: false,
            data: fetched.into_value(),
            last_error,
            origin,
        }
    }

    /// Fetch will never be committed (widget torn down or schedule cancelled).
    pub fn abandon(self) -> Self {
        Self {
            loading: false,
            ..self
        }
    }
}

impl<T: Default> Default for WidgetState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

//! RandomSource port - 乱数の抽象化
//!
//! fallback データ生成は全部ここを通す。テストでは SeededRandom や
//! SequenceRandom を渡して結果を固定する。

/// RandomSource は [0, 1) の一様乱数を返す
///
/// object-safe にするため、範囲指定などはすべて `unit()` の上に載せた
/// provided method で表現する。
pub trait RandomSource: Send + Sync {
    /// Uniform in [0, 1).
    fn unit(&self) -> f64;

    /// Uniform integer in [low, high). `high <= low` returns `low`.
    fn range_i64(&self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        let span = (high - low) as f64;
        let offset = ((self.unit() * span).floor() as i64).clamp(0, high - low - 1);
        low + offset
    }

    /// Uniform float in [low, high).
    fn range_f64(&self, low: f64, high: f64) -> f64 {
        low + self.unit() * (high - low)
    }

    /// Uniform index in [0, len). `len` must be non-zero.
    fn index(&self, len: usize) -> usize {
        self.range_i64(0, len as i64) as usize
    }

    /// True with probability `p`.
    fn chance(&self, p: f64) -> bool {
        self.unit() < p
    }
}

/// Pick one element uniformly.
pub fn pick<'a, T>(rng: &dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(rng.index(items.len()))
    }
}

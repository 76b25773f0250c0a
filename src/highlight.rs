use std::time::{Duration, Instant};

pub const DEFAULT_DECAY: Duration = Duration::from_secs(2);

/// 最後の入力からの経過時間で選択ハイライトを消す
///
/// 表示用の状態のみで、選択やスクロールには影響しない
#[derive(Debug, Clone, Copy)]
pub struct Highlight {
    last_input: Instant,
    threshold: Duration,
}

impl Highlight {
    /// 起動直後はハイライトを表示する
    pub fn new(now: Instant, threshold: Duration) -> Self {
        Self {
            last_input: now,
            threshold,
        }
    }

    pub fn record_activity(&mut self, now: Instant) {
        self.last_input = now;
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_input) < self.threshold
    }
}

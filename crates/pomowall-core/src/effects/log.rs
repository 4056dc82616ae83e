//! Side-effect execution logging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The individual effects a transition can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Sound,
    WallpaperApply,
    WallpaperRestore,
    Notification,
    Persist,
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EffectKind::Sound => "sound",
            EffectKind::WallpaperApply => "wallpaper apply",
            EffectKind::WallpaperRestore => "wallpaper restore",
            EffectKind::Notification => "notification",
            EffectKind::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// Result of running a single effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectResult {
    pub effect: EffectKind,
    pub status: ExecutionStatus,
}

/// Status of effect execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Effect ran
    Success,
    /// Effect failed; the error was logged and swallowed
    Failed {
        /// Human-readable reason for failure
        reason: String,
    },
    /// Effect did not apply (disabled, nothing configured)
    Skipped {
        /// Human-readable reason for skip
        reason: String,
    },
}

/// Everything one event triggered, in execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectLog {
    pub executed_at: DateTime<Utc>,
    pub results: Vec<EffectResult>,
}

impl EffectLog {
    pub fn new(results: Vec<EffectResult>) -> Self {
        Self {
            executed_at: Utc::now(),
            results,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn success_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ExecutionStatus::Success))
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ExecutionStatus::Failed { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ExecutionStatus::Skipped { .. }))
            .count()
    }

    /// Effects in the order they ran.
    pub fn effects(&self) -> Vec<EffectKind> {
        self.results.iter().map(|r| r.effect).collect()
    }

    pub fn status_of(&self, effect: EffectKind) -> Option<&ExecutionStatus> {
        self.results
            .iter()
            .find(|r| r.effect == effect)
            .map(|r| &r.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_status() {
        let log = EffectLog::new(vec![
            EffectResult {
                effect: EffectKind::Sound,
                status: ExecutionStatus::Success,
            },
            EffectResult {
                effect: EffectKind::Notification,
                status: ExecutionStatus::Failed {
                    reason: "no dbus".into(),
                },
            },
            EffectResult {
                effect: EffectKind::WallpaperApply,
                status: ExecutionStatus::Skipped {
                    reason: "no wallpaper selected".into(),
                },
            },
        ]);

        assert_eq!(log.success_count(), 1);
        assert_eq!(log.failure_count(), 1);
        assert_eq!(log.skipped_count(), 1);
        assert_eq!(
            log.effects(),
            vec![
                EffectKind::Sound,
                EffectKind::Notification,
                EffectKind::WallpaperApply
            ]
        );
        assert!(log.status_of(EffectKind::Persist).is_none());
    }
}

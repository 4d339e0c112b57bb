//! Trace history configuration.

use crate::trace::TracePolicy;

/// Which eviction policy the trace uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracePolicyKind {
    /// Unique pixels only, no time-based eviction
    Dedup,

    /// Half a period of history
    TimeWindow,
}

impl TracePolicyKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dedup" => Some(Self::Dedup),
            "window" | "time-window" => Some(Self::TimeWindow),
            _ => None,
        }
    }
}

/// Trace buffer parameters
#[derive(Debug, Clone)]
pub struct TraceConfig {
    pub policy: TracePolicyKind,

    /// Hard cap on stored points, regardless of policy
    /// 4096 ≈ 68 s of history at 60 FPS
    pub max_points: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            policy: TracePolicyKind::TimeWindow,
            max_points: 4096,
        }
    }
}

impl TraceConfig {
    /// Runtime policy for an animation with the given period
    pub fn policy_for(&self, period_s: f64) -> TracePolicy {
        match self.policy {
            TracePolicyKind::Dedup => TracePolicy::Dedup,
            TracePolicyKind::TimeWindow => TracePolicy::TimeWindow {
                window_s: period_s / 2.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_names() {
        assert_eq!(TracePolicyKind::from_name("Dedup"), Some(TracePolicyKind::Dedup));
        assert_eq!(
            TracePolicyKind::from_name("window"),
            Some(TracePolicyKind::TimeWindow)
        );
        assert_eq!(TracePolicyKind::from_name("ring"), None);
    }

    #[test]
    fn test_window_is_half_period() {
        let config = TraceConfig::default();
        assert_eq!(
            config.policy_for(8.0),
            TracePolicy::TimeWindow { window_s: 4.0 }
        );

        let config = TraceConfig {
            policy: TracePolicyKind::Dedup,
            ..Default::default()
        };
        assert_eq!(config.policy_for(8.0), TracePolicy::Dedup);
    }
}

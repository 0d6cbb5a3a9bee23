//! Realtime delivery configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Subscriber queue and transport timing.
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// Pending events held per subscriber before the oldest is dropped
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Consecutive evictions without a read before a subscriber is dropped.
    /// Defaults to `queue_capacity`.
    pub stall_threshold: Option<usize>,

    /// Idle interval for SSE keep-alive comments
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,

    /// Bound on a single push to a connection
    #[serde(default = "default_push_timeout")]
    pub push_timeout_secs: u64,
}

impl RealtimeConfig {
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    pub fn push_timeout(&self) -> Duration {
        Duration::from_secs(self.push_timeout_secs)
    }

    pub fn stall_threshold(&self) -> usize {
        self.stall_threshold.unwrap_or(self.queue_capacity)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        if !(15..=30).contains(&self.keep_alive_secs) {
            return Err(ValidationError::InvalidKeepAlive);
        }
        if !(1..=60).contains(&self.push_timeout_secs) {
            return Err(ValidationError::InvalidPushTimeout);
        }
        Ok(())
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            stall_threshold: None,
            keep_alive_secs: default_keep_alive(),
            push_timeout_secs: default_push_timeout(),
        }
    }
}

fn default_queue_capacity() -> usize {
    256
}

fn default_keep_alive() -> u64 {
    20
}

fn default_push_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_defaults() {
        let config = RealtimeConfig::default();
        assert_eq!(config.queue_capacity, 256);
        assert_eq!(config.stall_threshold(), 256);
        assert_eq!(config.keep_alive(), Duration::from_secs(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_keep_alive_window() {
        for secs in [14, 31] {
            let config = RealtimeConfig {
                keep_alive_secs: secs,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidKeepAlive));
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = RealtimeConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidQueueCapacity));
    }
}

use std::time::Duration;

/// Delay before reconnect attempt number `attempt` (1-based):
/// 1s, 2s, 5s, 10s, 30s, then 60s max.
pub fn reconnect_backoff(attempt: u32) -> Duration {
    let secs = match attempt {
        0 | 1 => 1,
        2 => 2,
        3 => 5,
        4 => 10,
        5 => 30,
        _ => 60,
    };
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_schedule() {
        let secs: Vec<u64> = (1..=8).map(|n| reconnect_backoff(n).as_secs()).collect();
        assert_eq!(secs, vec![1, 2, 5, 10, 30, 60, 60, 60]);
        assert_eq!(reconnect_backoff(0), Duration::from_secs(1));
    }
}

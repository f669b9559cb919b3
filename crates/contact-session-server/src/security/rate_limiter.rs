use dashmap::DashMap;
use std::collections::VecDeque;
use std::net::IpAddr;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Sliding-window attempt counter per client IP.
///
/// A check prunes the caller's own window. Other idle IPs are only dropped
/// by [`RateLimiter::sweep`], which the server runs on an interval.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_attempts: usize,
    hits: DashMap<IpAddr, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_attempts: usize) -> Self {
        Self {
            window,
            max_attempts,
            hits: DashMap::new(),
        }
    }

    /// Returns `true` when `ip` is over the limit. Rejected attempts are not
    /// recorded.
    pub fn check(&self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now())
    }

    pub fn check_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut entry = self.hits.entry(ip).or_default();
        let window = entry.value_mut();
        prune(window, now, self.window);

        if window.len() >= self.max_attempts {
            warn!("Rate limit hit for {} ({} attempts in window)", ip, window.len());
            return true;
        }

        window.push_back(now);
        debug!("Rate limiter: {} has {} attempts in window", ip, window.len());
        false
    }

    /// Drop every IP whose window is empty. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let before = self.hits.len();
        self.hits.retain(|_, window| {
            prune(window, now, self.window);
            !window.is_empty()
        });
        let removed = before.saturating_sub(self.hits.len());

        if removed > 0 {
            info!("Rate limiter swept {} idle clients", removed);
        }
        removed
    }

    /// Number of tracked client IPs.
    pub fn tracked_clients(&self) -> usize {
        self.hits.len()
    }
}

fn prune(window: &mut VecDeque<Instant>, now: Instant, span: Duration) {
    while let Some(&oldest) = window.front() {
        if now.saturating_duration_since(oldest) >= span {
            window.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn test_allows_up_to_max_then_limits() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 20);
        let now = Instant::now();

        for _ in 0..20 {
            assert!(!limiter.check_at(ip(1), now));
        }
        assert!(limiter.check_at(ip(1), now));
        assert!(limiter.check_at(ip(1), now + Duration::from_secs(59)));
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let now = Instant::now();

        assert!(!limiter.check_at(ip(1), now));
        assert!(limiter.check_at(ip(1), now));
        assert!(!limiter.check_at(ip(2), now));
    }

    #[test]
    fn test_window_slides() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 2);
        let start = Instant::now();

        assert!(!limiter.check_at(ip(1), start));
        assert!(!limiter.check_at(ip(1), start + Duration::from_secs(30)));
        assert!(limiter.check_at(ip(1), start + Duration::from_secs(59)));

        // First hit is exactly one window old and no longer counts.
        assert!(!limiter.check_at(ip(1), start + Duration::from_secs(60)));
        assert!(limiter.check_at(ip(1), start + Duration::from_secs(61)));
    }

    #[test]
    fn test_rejected_attempts_are_not_recorded() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();

        assert!(!limiter.check_at(ip(1), start));
        for secs in 1..60 {
            assert!(limiter.check_at(ip(1), start + Duration::from_secs(secs)));
        }
        // Only the first accepted attempt counted, so the window reopens at 60s.
        assert!(!limiter.check_at(ip(1), start + Duration::from_secs(60)));
    }

    #[test]
    fn test_sweep_evicts_idle_clients() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 5);
        let start = Instant::now();

        limiter.check_at(ip(1), start);
        limiter.check_at(ip(2), start + Duration::from_secs(30));
        assert_eq!(limiter.tracked_clients(), 2);

        assert_eq!(limiter.sweep_at(start + Duration::from_secs(45)), 0);
        assert_eq!(limiter.sweep_at(start + Duration::from_secs(75)), 1);
        assert_eq!(limiter.tracked_clients(), 1);
        assert_eq!(limiter.sweep_at(start + Duration::from_secs(120)), 1);
        assert_eq!(limiter.tracked_clients(), 0);
    }
}

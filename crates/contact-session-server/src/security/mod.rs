pub mod client_ip;
pub mod rate_limiter;

pub use client_ip::ClientIp;
pub use rate_limiter::RateLimiter;

pub mod base64;

/// Seconds since the unix epoch.
pub fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

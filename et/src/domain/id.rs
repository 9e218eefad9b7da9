//! Record ID generation and timestamps

use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a fresh, time-ordered record ID
pub fn generate_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Current time as Unix milliseconds
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_now_ms_positive() {
        assert!(now_ms() > 0);
    }
}

use std::env;

use super::types::{ConfigError, DuplicatePolicy, Environment};

pub(super) fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

pub(super) fn env_or_default(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}

pub(super) fn parse_u16(field: &'static str, value: String) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidValue { field, value })
}

pub(super) fn parse_u64(field: &'static str, value: String) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidValue { field, value })
}

pub(super) fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES" | "on" | "ON")
}

pub(super) fn parse_environment(value: Option<String>) -> Environment {
    match value.as_deref().map(|item| item.to_lowercase()) {
        Some(ref val) if val == "production" || val == "prod" => Environment::Production,
        Some(ref val) if val == "staging" => Environment::Staging,
        Some(ref val) if val == "test" || val == "testing" => Environment::Test,
        _ => Environment::Development,
    }
}

pub(super) fn parse_duplicate_policy(value: Option<String>) -> Result<DuplicatePolicy, ConfigError> {
    match value.map(|item| item.trim().to_ascii_lowercase()) {
        None => Ok(DuplicatePolicy::KeepLast),
        Some(ref val) if val == "keep_last" || val == "last" => Ok(DuplicatePolicy::KeepLast),
        Some(ref val) if val == "keep_first" || val == "first" => Ok(DuplicatePolicy::KeepFirst),
        Some(ref val) if val == "reject" => Ok(DuplicatePolicy::Reject),
        Some(val) => Err(ConfigError::InvalidValue { field: "SYNC_DUPLICATE_POLICY", value: val }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_variants() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("yes"));
        assert!(parse_bool("on"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
    }

    #[test]
    fn parse_environment_variants() {
        assert_eq!(parse_environment(Some("prod".to_string())), Environment::Production);
        assert_eq!(parse_environment(Some("production".to_string())), Environment::Production);
        assert_eq!(parse_environment(Some("staging".to_string())), Environment::Staging);
        assert_eq!(parse_environment(Some("testing".to_string())), Environment::Test);
        assert_eq!(parse_environment(None), Environment::Development);
    }

    #[test]
    fn parse_duplicate_policy_defaults_to_keep_last() {
        assert_eq!(parse_duplicate_policy(None).expect("default"), DuplicatePolicy::KeepLast);
    }

    #[test]
    fn parse_duplicate_policy_variants() {
        assert_eq!(
            parse_duplicate_policy(Some("keep_first".to_string())).expect("keep_first"),
            DuplicatePolicy::KeepFirst
        );
        assert_eq!(
            parse_duplicate_policy(Some("LAST".to_string())).expect("last"),
            DuplicatePolicy::KeepLast
        );
        assert_eq!(
            parse_duplicate_policy(Some("reject".to_string())).expect("reject"),
            DuplicatePolicy::Reject
        );
    }

    #[test]
    fn parse_duplicate_policy_rejects_unknown_values() {
        let err = parse_duplicate_policy(Some("newest".to_string())).expect_err("invalid");
        assert!(matches!(err, ConfigError::InvalidValue { field: "SYNC_DUPLICATE_POLICY", .. }));
    }

    #[test]
    fn parse_u64_rejects_garbage() {
        assert!(parse_u64("SYNC_BACKOFF_SECONDS", "ten".to_string()).is_err());
        assert_eq!(parse_u64("SYNC_BACKOFF_SECONDS", "10".to_string()).expect("ok"), 10);
    }
}

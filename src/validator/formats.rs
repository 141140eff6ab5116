use once_cell::sync::Lazy;
use regex::Regex;

/// Format regexes reproduced verbatim from §6. Each is compiled once — the
/// `once_cell::sync::Lazy` pattern this codebase's parser-generator lineage
/// already uses for its own lexeme patterns — rather than recompiled on
/// every `validate` call.
static DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})$").unwrap()
});
static DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?$").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static URI: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap());
static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});
static IPV4: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").unwrap());
static IPV6: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([0-9a-f]{1,4}:){7}[0-9a-f]{1,4}$").unwrap());

/// Checks `value` against the named format. Unrecognized format names pass
/// silently (§4.3 "Unrecognized formats pass silently").
pub(crate) fn check_format(name: &str, value: &str) -> bool {
    match name {
        "date-time" => DATE_TIME.is_match(value),
        "date" => DATE.is_match(value),
        "time" => TIME.is_match(value),
        "email" => EMAIL.is_match(value),
        "uri" => URI.is_match(value),
        "uuid" => UUID.is_match(value),
        "ipv4" => IPV4.is_match(value),
        "ipv6" => IPV6.is_match(value),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_time_format() {
        assert!(check_format("date-time", "2024-01-01T00:00:00Z"));
        assert!(!check_format("date-time", "not-a-date"));
    }

    #[test]
    fn uuid_is_case_insensitive() {
        assert!(check_format("uuid", "550E8400-E29B-41D4-A716-446655440000"));
        assert!(check_format("uuid", "550e8400-e29b-41d4-a716-446655440000"));
    }

    #[test]
    fn unknown_format_passes() {
        assert!(check_format("made-up-format", "anything"));
    }

    #[test]
    fn ipv4_rejects_garbage() {
        assert!(check_format("ipv4", "192.168.0.1"));
        assert!(!check_format("ipv4", "not-an-ip"));
    }
}

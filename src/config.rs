/// Engine configuration parsed from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of detection results the opening detector remembers.
    pub opening_cache_size: usize,
    /// Book skill, 0 (any book move) to 20 (only the strongest).
    pub book_skill: u8,
    /// Whether callers should consult the opening book at all.
    pub book_enabled: bool,
}

pub const DEFAULT_OPENING_CACHE_SIZE: usize = 1000;
pub const DEFAULT_BOOK_SKILL: u8 = 10;
pub const MAX_BOOK_SKILL: u8 = 20;

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        EngineConfig {
            opening_cache_size: lookup("CHESS_OPENING_CACHE_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_OPENING_CACHE_SIZE),
            book_skill: lookup("CHESS_BOOK_SKILL")
                .and_then(|v| v.parse::<u8>().ok())
                .map_or(DEFAULT_BOOK_SKILL, |skill| skill.min(MAX_BOOK_SKILL)),
            book_enabled: lookup("CHESS_BOOK_ENABLED")
                .map_or(true, |v| !matches!(v.as_str(), "0" | "false" | "no" | "off")),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            opening_cache_size: DEFAULT_OPENING_CACHE_SIZE,
            book_skill: DEFAULT_BOOK_SKILL,
            book_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.opening_cache_size, 1000);
        assert_eq!(config.book_skill, 10);
        assert!(config.book_enabled);
    }

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        assert_eq!(EngineConfig::from_lookup(lookup(&[])), EngineConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("CHESS_OPENING_CACHE_SIZE", "64"),
            ("CHESS_BOOK_SKILL", "17"),
            ("CHESS_BOOK_ENABLED", "false"),
        ]));
        assert_eq!(config.opening_cache_size, 64);
        assert_eq!(config.book_skill, 17);
        assert!(!config.book_enabled);
    }

    #[test]
    fn skill_is_clamped_and_garbage_ignored() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("CHESS_OPENING_CACHE_SIZE", "lots"),
            ("CHESS_BOOK_SKILL", "99"),
        ]));
        assert_eq!(config.opening_cache_size, 1000);
        assert_eq!(config.book_skill, 20);
    }
}

//! Configuration parser (verb module)
//!
//! Transforms YAML files into a ServiceConfig.

use std::path::Path;
use crate::config::ServiceConfig;
use crate::error::ParseError;

/// Parse a configuration from a YAML file
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ServiceConfig, ParseError> {
    let path_str = path.as_ref().display().to_string();
    let contents = std::fs::read_to_string(&path).map_err(|e| ParseError::Io {
        path: path_str,
        source: e,
    })?;
    parse_str(&contents)
}

/// Parse a configuration from a YAML string
pub fn parse_str(yaml: &str) -> Result<ServiceConfig, ParseError> {
    let config: ServiceConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{UnknownFilterPolicy, MAX_ROWS};
    use crate::emitter::Dialect;

    #[test]
    fn test_parse_full_config() {
        let config = parse_str(
            "dialect: sqlite\n\
             database: analytics.db\n\
             default_limit: 250\n\
             max_rows: 5000\n\
             unknown_filters: reject\n",
        )
        .unwrap();
        assert_eq!(config.dialect, Dialect::Sqlite);
        assert_eq!(config.database.as_deref(), Some("analytics.db"));
        assert_eq!(config.default_limit, 250);
        assert_eq!(config.unknown_filters, UnknownFilterPolicy::Reject);

        let options = config.compile_options();
        assert_eq!(options.max_rows, 5000);
        assert_eq!(options.clamp_limit(None), 250);
    }

    #[test]
    fn test_parse_defaults() {
        let config = parse_str("{}").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.dialect, Dialect::Postgres);
        assert_eq!(config.unknown_filters, UnknownFilterPolicy::Ignore);
    }

    #[test]
    fn test_max_rows_capped_at_hard_ceiling() {
        let config = parse_str("max_rows: 1000000").unwrap();
        assert_eq!(config.compile_options().max_rows, MAX_ROWS);
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse_str("not: [valid: yaml");
        assert!(matches!(result, Err(ParseError::Yaml { .. })));
    }

    #[test]
    fn test_parse_rejects_unknown_keys_and_bad_values() {
        assert!(parse_str("max_row: 10").is_err());
        assert!(parse_str("dialect: oracle").is_err());
        assert!(matches!(parse_str("max_rows: 0"), Err(ParseError::Invalid(_))));
        assert!(matches!(parse_str("default_limit: -1"), Err(ParseError::Invalid(_))));
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_file("does/not/exist.yaml").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.yaml"));
    }
}

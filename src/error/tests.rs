//! Tests for error handling system

#[cfg(test)]
mod tests {
    use super::super::*;
    use std::io;
    use std::path::PathBuf;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn test_error_severity() {
        assert_eq!(CruiseError::permission_denied("src").severity(), ErrorSeverity::Warning);
        assert_eq!(
            CruiseError::io_error(io::Error::new(io::ErrorKind::NotFound, "not found")).severity(),
            ErrorSeverity::Error
        );
        assert_eq!(CruiseError::config_error("Invalid config").severity(), ErrorSeverity::Critical);
        assert_eq!(
            CruiseError::malformed_rule("no-circular", "bad regex").severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(CruiseError::unknown_module_system("systemjs").severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_is_critical() {
        assert!(CruiseError::rule_set_parse(".cruiser-rules.json", "unknown field").is_critical());
        assert!(!CruiseError::analysis_error("oops").is_critical());
    }

    #[test]
    fn test_user_message() {
        let msg = CruiseError::permission_denied("/test/path").user_message();
        assert!(msg.contains("/test/path"));
        assert!(msg.contains("permission denied"));

        let msg = CruiseError::json_parse_error("/test/rules.json", json_error()).user_message();
        assert!(msg.contains("/test/rules.json"));
        assert!(msg.contains("Invalid JSON"));

        let msg = CruiseError::malformed_rule("no-orphans", "from.path is not a valid regex").user_message();
        assert!(msg.contains("no-orphans"));
        assert!(msg.contains("from.path"));

        let msg = CruiseError::unknown_module_system("systemjs").user_message();
        assert!(msg.contains("systemjs"));
        assert!(msg.contains("tsType"));
    }

    #[test]
    fn test_error_factory_methods() {
        match CruiseError::io_error(io::Error::new(io::ErrorKind::NotFound, "not found")) {
            CruiseError::Io { source, .. } => assert_eq!(source.kind(), io::ErrorKind::NotFound),
            other => panic!("Expected Io error, got {:?}", other),
        }

        match CruiseError::json_parse_error("/test/package.json", json_error()) {
            CruiseError::JsonParse { file, .. } => assert_eq!(file, PathBuf::from("/test/package.json")),
            other => panic!("Expected JsonParse error, got {:?}", other),
        }

        match CruiseError::malformed_rule("r", "m") {
            CruiseError::MalformedRule { rule, message, .. } => {
                assert_eq!(rule, "r");
                assert_eq!(message, "m");
            }
            other => panic!("Expected MalformedRule error, got {:?}", other),
        }
    }

    #[test]
    fn test_handle_error() {
        assert!(handle_error(CruiseError::permission_denied("/test/path")).is_none());
        assert!(handle_error(CruiseError::io_error(io::Error::new(io::ErrorKind::NotFound, "not found"))).is_none());
        assert!(handle_error(CruiseError::config_error("Invalid config")).is_some());
    }
}

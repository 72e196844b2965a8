/// Error code registry for commonkit
///
/// Error codes are organized by category:
/// - 1000-1999: Iterable errors
/// - 2000-2999: Loader errors
/// - 3000-3999: File listing errors
/// - 4000-4999: Logging errors
/// - 5000-5999: Cache errors
/// - 6000-6999: Configuration errors
pub struct ErrorCode;

impl ErrorCode {
    // Iterable errors (1000-1999)
    pub const ITER_EMPTY_INPUT: u16 = 1001;
    pub const ITER_INCONSISTENT_VALUES: u16 = 1002;

    // Loader errors (2000-2999)
    pub const LOADER_LOAD_FAILED: u16 = 2001;
    pub const LOADER_NOT_FOUND: u16 = 2002;

    // File listing errors (3000-3999)
    pub const FILES_PATH_NOT_FOUND: u16 = 3001;
    pub const FILES_INVALID_PATTERN: u16 = 3002;
    pub const FILES_WALK_FAILED: u16 = 3003;

    // Logging errors (4000-4999)
    pub const LOGGING_INVALID_FORMAT: u16 = 4001;

    // Cache errors (5000-5999)
    pub const CACHE_POISONED: u16 = 5001;

    // Configuration errors (6000-6999)
    pub const CONFIG_READ_FAILED: u16 = 6001;
    pub const CONFIG_PARSE_ERROR: u16 = 6002;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        1001 => "Iterable was empty",
        1002 => "Iterable yielded values that are not all equal",

        2001 => "Dynamic library failed to load",
        2002 => "Named unit not found on the search path",

        3001 => "Path is neither a file nor a directory",
        3002 => "Invalid glob pattern",
        3003 => "Directory traversal failed",

        4001 => "Invalid log format template or date format",

        5001 => "Memoization cache is poisoned",

        6001 => "Failed to read settings file",
        6002 => "Failed to parse settings",

        _ => "Unknown error code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_have_descriptions() {
        assert_eq!(
            describe_error_code(ErrorCode::ITER_EMPTY_INPUT),
            "Iterable was empty"
        );
        assert_eq!(
            describe_error_code(ErrorCode::CACHE_POISONED),
            "Memoization cache is poisoned"
        );
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(describe_error_code(9999), "Unknown error code");
    }
}

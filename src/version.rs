//! Version information for maindock
//!
//! Values are taken from Cargo.toml at build time.

/// The version of maindock, set at build time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the application
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// The description of the application
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get the full version string
pub fn full_version() -> String {
    if is_dev_build() {
        format!("{} v{} (development build)", APP_NAME, VERSION)
    } else {
        format!("{} v{}", APP_NAME, VERSION)
    }
}

/// Check if this is a development build
pub fn is_dev_build() -> bool {
    VERSION.contains("dev") || VERSION.ends_with("-SNAPSHOT")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "maindock");
        assert!(!APP_DESCRIPTION.is_empty());
    }

    #[test]
    fn test_full_version() {
        let full = full_version();
        assert!(full.contains(APP_NAME));
        assert!(full.contains(VERSION));
        assert!(!is_dev_build());
        assert!(!full.contains("development build"));
    }
}

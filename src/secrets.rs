//! API key lookup for sources that accept registration keys.
//!
//! Keys are resolved from the environment first, then from a local
//! `secrets.toml` key-value file, and default to the empty string. Adapters
//! tolerate empty keys: FRED issues unauthenticated requests and BLS omits
//! the registration field entirely.

use once_cell::sync::Lazy;
use std::path::PathBuf;

/// Environment variable overriding the secrets file location.
const SECRETS_PATH_VAR: &str = "ECON_SECRETS_PATH";

/// Default secrets file, relative to the working directory.
const DEFAULT_SECRETS_FILE: &str = "secrets.toml";

static SECRETS: Lazy<toml::Table> = Lazy::new(load_secrets_file);

fn secrets_path() -> PathBuf {
    std::env::var(SECRETS_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SECRETS_FILE))
}

/// A missing or malformed secrets file is not an error: the downloader runs
/// unauthenticated in that case.
fn load_secrets_file() -> toml::Table {
    let path = secrets_path();
    match std::fs::read_to_string(&path) {
        Ok(contents) => match contents.parse::<toml::Table>() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable secrets file");
                toml::Table::new()
            }
        },
        Err(_) => toml::Table::new(),
    }
}

/// Look up a secret by key.
///
/// Resolution order: environment variable, then the secrets file, then the
/// empty string. An empty environment value falls through to the file.
pub fn get_secret(key: &str) -> String {
    if let Ok(value) = std::env::var(key) {
        if !value.is_empty() {
            return value;
        }
    }

    match SECRETS.get(key) {
        Some(toml::Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_wins() {
        std::env::set_var("ECON_TEST_SECRET_A", "from-env");
        assert_eq!(get_secret("ECON_TEST_SECRET_A"), "from-env");
        std::env::remove_var("ECON_TEST_SECRET_A");
    }

    #[test]
    fn test_missing_key_is_empty() {
        assert_eq!(get_secret("ECON_TEST_SECRET_MISSING"), "");
    }
}

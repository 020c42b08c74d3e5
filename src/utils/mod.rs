//! Utility helpers
//!
//! Condition classification plus small host probes shared by segments and the
//! config loader.

pub mod condition;

use std::env;
use std::path::PathBuf;

/// Number of logical CPUs, used to normalize load averages.
#[must_use]
pub fn cpu_count() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// Base directory for user-level configuration.
///
/// `XDG_CONFIG_HOME` is honored explicitly so tests (and users overriding it
/// on platforms where [`dirs::config_dir`] ignores the variable) get a
/// predictable location.
#[must_use]
pub fn config_base_dir() -> Option<PathBuf> {
    if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg));
        }
    }

    dirs::config_dir()
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use super::*;

    #[test]
    fn cpu_count_is_positive() {
        assert!(cpu_count() >= 1);
    }

    #[test]
    #[serial_test::serial]
    fn config_base_dir_respects_xdg_override() {
        let original = env::var_os("XDG_CONFIG_HOME");
        env::set_var("XDG_CONFIG_HOME", "/tmp/xdg-probe");

        assert_eq!(config_base_dir(), Some(PathBuf::from("/tmp/xdg-probe")));

        restore_env("XDG_CONFIG_HOME", original);
    }

    #[test]
    #[serial_test::serial]
    fn config_base_dir_falls_back_to_platform_dir() {
        let original = env::var_os("XDG_CONFIG_HOME");
        env::remove_var("XDG_CONFIG_HOME");

        assert_eq!(config_base_dir(), dirs::config_dir());

        restore_env("XDG_CONFIG_HOME", original);
    }

    fn restore_env(key: &str, value: Option<OsString>) {
        if let Some(val) = value {
            env::set_var(key, val);
        } else {
            env::remove_var(key);
        }
    }
}

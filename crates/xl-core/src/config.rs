use std::sync::OnceLock;

fn env_true(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|val| {
        let trimmed = val.trim();
        !trimmed.is_empty() && !matches!(trimmed, "0" | "false" | "FALSE" | "False")
    })
}

fn bool_from_env(key: &str) -> bool {
    env_true(key).unwrap_or(false)
}

/// Downgrades recoverable invariant checks (e.g. type-argument arity) to warnings.
pub fn lossy_mode() -> bool {
    static LOSSY: OnceLock<bool> = OnceLock::new();
    *LOSSY.get_or_init(|| bootstrap_mode() || bool_from_env("XL_LOSSY"))
}

pub fn bootstrap_mode() -> bool {
    static BOOT: OnceLock<bool> = OnceLock::new();
    *BOOT.get_or_init(|| std::env::var_os("XL_BOOTSTRAP").is_some())
}

/// Forces the pipeline to process compilation units one at a time.
pub fn serial_mode() -> bool {
    static SERIAL: OnceLock<bool> = OnceLock::new();
    *SERIAL.get_or_init(|| bool_from_env("XL_SERIAL"))
}

pub fn verbose_diagnostics() -> bool {
    static VERBOSE: OnceLock<bool> = OnceLock::new();
    *VERBOSE.get_or_init(|| bool_from_env("XL_VERBOSE"))
}

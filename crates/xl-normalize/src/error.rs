use xl_core::error::Error;

/// Create an internal invariant violation; these abort the compilation.
pub fn internal_error(message: impl Into<String>) -> Error {
    Error::internal_invariant(message)
}

/// Macro to return early with an internal invariant violation
#[macro_export]
macro_rules! invariant_bail {
    ($($arg:tt)*) => {
        return Err($crate::error::internal_error(format!($($arg)*)))
    };
}

/// Macro to ensure a condition holds, or return an internal invariant violation
#[macro_export]
macro_rules! invariant_ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::invariant_bail!($($arg)*);
        }
    };
}

// Passes - normalization passes that implement NormalizationPass

pub mod insert_casts_on_nullability_mismatch;

pub use insert_casts_on_nullability_mismatch::*;

// xl-normalize: type-directed normalization passes
//
// Architecture:
// - conversion: traversal that discovers implicit conversion points and hands them to a
//   pluggable `ContextRewriter`
// - pass: the `NormalizationPass` contract every pipeline stage implements
// - passes: concrete passes
// - type_algebra: denotability, projection and type-argument co-iteration

pub mod conversion;
pub mod error;
pub mod pass;
pub mod passes;
pub mod type_algebra;

pub use conversion::*;
pub use pass::*;
pub use passes::*;

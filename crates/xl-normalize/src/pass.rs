// NormalizationPass trait - interface for pipeline stages

use xl_core::ast::CompilationUnit;
use xl_core::error::Result;

/// A pipeline stage that rewrites one compilation unit in place.
///
/// Passes run in the fixed order defined by the pipeline. They carry no per-unit state,
/// so one instance may run on several units concurrently.
pub trait NormalizationPass: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply_to(&self, unit: &mut CompilationUnit) -> Result<()>;
}

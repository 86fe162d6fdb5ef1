use std::sync::Arc;

use xl_core::ast::{CompilationUnit, Expr};
use xl_core::config;
use xl_core::error::Result;
use xl_core::types::{TypeDescriptor, TypeStore};
use xl_core::{debug, trace};

use crate::conversion::{ContextRewriter, ConversionContextVisitor};
use crate::pass::NormalizationPass;
use crate::type_algebra::{
    is_denotable, paired_type_arguments, project, ArityMismatch, SeenTypeVariables,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastInsertionOptions {
    pub arity_mismatch: ArityMismatch,
}

impl CastInsertionOptions {
    pub fn strict() -> Self {
        Self {
            arity_mismatch: ArityMismatch::Fail,
        }
    }

    pub fn lossy() -> Self {
        Self {
            arity_mismatch: ArityMismatch::Ignore,
        }
    }

    /// Lossy when `XL_LOSSY` or `XL_BOOTSTRAP` is set, strict otherwise.
    pub fn from_env() -> Self {
        if config::lossy_mode() {
            Self::lossy()
        } else {
            Self::strict()
        }
    }
}

impl Default for CastInsertionOptions {
    fn default() -> Self {
        Self::strict()
    }
}

/// Inserts casts where a value flows into a position whose type is stricter about
/// nullability, either at the top level or inside its type arguments.
///
/// Downstream the nullability of type arguments is erased, so the mismatch would
/// otherwise go unchecked. Only denotable targets get a cast.
#[derive(Debug, Clone, Default)]
pub struct InsertCastsOnNullabilityMismatch {
    options: CastInsertionOptions,
}

impl InsertCastsOnNullabilityMismatch {
    pub fn new(options: CastInsertionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CastInsertionOptions {
        self.options
    }
}

impl NormalizationPass for InsertCastsOnNullabilityMismatch {
    fn name(&self) -> &'static str {
        "insert-casts-on-nullability-mismatch"
    }

    fn apply_to(&self, unit: &mut CompilationUnit) -> Result<()> {
        let store = Arc::clone(unit.type_store());
        let mut visitor = ConversionContextVisitor::new(NullabilityCastPolicy {
            store: &store,
            arity_mismatch: self.options.arity_mismatch,
            inserted: 0,
        });
        visitor.visit_compilation_unit(unit)?;
        debug!(
            "{}: inserted {} casts in {}",
            self.name(),
            visitor.rewriter().inserted,
            unit.path.display()
        );
        Ok(())
    }
}

struct NullabilityCastPolicy<'a> {
    store: &'a TypeStore,
    arity_mismatch: ArityMismatch,
    inserted: usize,
}

impl ContextRewriter for NullabilityCastPolicy<'_> {
    // Qualifier types are inferred from the expression itself.
    fn rewrite_member_qualifier_context(
        &mut self,
        _inferred: &TypeDescriptor,
        _actual: &TypeDescriptor,
        expr: Expr,
    ) -> Result<Expr> {
        Ok(expr)
    }

    fn rewrite_type_conversion_context(
        &mut self,
        inferred: &TypeDescriptor,
        _actual: &TypeDescriptor,
        expr: Expr,
    ) -> Result<Expr> {
        let target = project(inferred, self.store)?;
        if !needs_cast(&expr.ty, &target, self.store, self.arity_mismatch)? {
            return Ok(expr);
        }
        trace!("cast at {}: {} -> ({}) {}", expr.span, expr.ty, target, expr);
        self.inserted += 1;
        Ok(Expr::cast(expr, target))
    }
}

/// Whether a value of type `from` needs an explicit cast to be used as `to`.
pub fn needs_cast(
    from: &TypeDescriptor,
    to: &TypeDescriptor,
    store: &TypeStore,
    arity_mismatch: ArityMismatch,
) -> Result<bool> {
    if !is_denotable(to, store, &mut SeenTypeVariables::new())? {
        return Ok(false);
    }
    if from.is_nullable() && !to.is_nullable() {
        return Ok(true);
    }
    type_arguments_need_cast(from, to, store, arity_mismatch)
}

pub fn type_arguments_need_cast(
    from: &TypeDescriptor,
    to: &TypeDescriptor,
    store: &TypeStore,
    arity_mismatch: ArityMismatch,
) -> Result<bool> {
    let pairs = paired_type_arguments(from, to, store, arity_mismatch)?;
    for (from_argument, to_argument) in &pairs {
        if type_argument_needs_cast(from_argument, to_argument, store, arity_mismatch)? {
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn type_argument_needs_cast(
    from: &TypeDescriptor,
    to: &TypeDescriptor,
    store: &TypeStore,
    arity_mismatch: ArityMismatch,
) -> Result<bool> {
    // Wildcard arguments are sometimes inferred as concrete types in the tree.
    if from.is_wildcard_or_capture() && !to.is_wildcard_or_capture() {
        return Ok(true);
    }
    if from.is_nullable() != to.is_nullable() {
        return Ok(true);
    }
    type_arguments_need_cast(from, to, store, arity_mismatch)
}

//! Conversion contexts: the program points where a value flows into a position that
//! expects a (possibly different) type.
//!
//! [`ConversionContextVisitor`] finds them; a [`ContextRewriter`] decides what to do at each.

mod visitor;

pub use visitor::*;

use xl_core::ast::Expr;
use xl_core::error::Result;
use xl_core::types::TypeDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionContextKind {
    /// Local initializers, assignment values, array literal elements, conditional branches.
    Assignment,
    FieldInitializer,
    Return,
    /// Method and constructor arguments.
    MethodInvocation,
    /// Qualifier of a field access or method call. Its inferred type is its own type.
    MemberQualifier,
    /// Operand of an explicit cast.
    Cast,
    /// Conditions of `if`, `while` and `?:`.
    BooleanCondition,
}

/// One conversion point, alive only for the duration of a rewriter call.
#[derive(Debug, Clone, Copy)]
pub struct ConversionContext<'a> {
    pub inferred: &'a TypeDescriptor,
    pub actual: &'a TypeDescriptor,
    pub kind: ConversionContextKind,
}

impl<'a> ConversionContext<'a> {
    pub fn new(
        kind: ConversionContextKind,
        inferred: &'a TypeDescriptor,
        actual: &'a TypeDescriptor,
    ) -> Self {
        Self {
            inferred,
            actual,
            kind,
        }
    }

    /// Hands `expr` to the rewriter method matching this context's kind.
    pub fn dispatch<R>(self, rewriter: &mut R, expr: Expr) -> Result<Expr>
    where
        R: ContextRewriter + ?Sized,
    {
        let (inferred, actual) = (self.inferred, self.actual);
        match self.kind {
            ConversionContextKind::Assignment => {
                rewriter.rewrite_assignment_context(inferred, actual, expr)
            }
            ConversionContextKind::FieldInitializer => {
                rewriter.rewrite_field_initializer_context(inferred, actual, expr)
            }
            ConversionContextKind::Return => {
                rewriter.rewrite_return_context(inferred, actual, expr)
            }
            ConversionContextKind::MethodInvocation => {
                rewriter.rewrite_method_invocation_context(inferred, actual, expr)
            }
            ConversionContextKind::MemberQualifier => {
                rewriter.rewrite_member_qualifier_context(inferred, actual, expr)
            }
            ConversionContextKind::Cast => rewriter.rewrite_cast_context(inferred, actual, expr),
            ConversionContextKind::BooleanCondition => {
                rewriter.rewrite_boolean_conversion_context(inferred, actual, expr)
            }
        }
    }
}

/// Rewrite policy invoked at every conversion point.
///
/// Every method receives the expression by value and returns its replacement; returning
/// it unchanged leaves the tree as is. Assignment, field initializer, return, method
/// invocation and member qualifier contexts all forward to
/// [`Self::rewrite_type_conversion_context`] unless overridden.
pub trait ContextRewriter {
    fn rewrite_type_conversion_context(
        &mut self,
        _inferred: &TypeDescriptor,
        _actual: &TypeDescriptor,
        expr: Expr,
    ) -> Result<Expr> {
        Ok(expr)
    }

    fn rewrite_assignment_context(
        &mut self,
        inferred: &TypeDescriptor,
        actual: &TypeDescriptor,
        expr: Expr,
    ) -> Result<Expr> {
        self.rewrite_type_conversion_context(inferred, actual, expr)
    }

    fn rewrite_field_initializer_context(
        &mut self,
        inferred: &TypeDescriptor,
        actual: &TypeDescriptor,
        expr: Expr,
    ) -> Result<Expr> {
        self.rewrite_type_conversion_context(inferred, actual, expr)
    }

    fn rewrite_return_context(
        &mut self,
        inferred: &TypeDescriptor,
        actual: &TypeDescriptor,
        expr: Expr,
    ) -> Result<Expr> {
        self.rewrite_type_conversion_context(inferred, actual, expr)
    }

    fn rewrite_method_invocation_context(
        &mut self,
        inferred: &TypeDescriptor,
        actual: &TypeDescriptor,
        expr: Expr,
    ) -> Result<Expr> {
        self.rewrite_type_conversion_context(inferred, actual, expr)
    }

    /// The inferred type here is the qualifier's own type, so policies comparing inferred
    /// against actual types should usually override this.
    fn rewrite_member_qualifier_context(
        &mut self,
        inferred: &TypeDescriptor,
        actual: &TypeDescriptor,
        expr: Expr,
    ) -> Result<Expr> {
        self.rewrite_type_conversion_context(inferred, actual, expr)
    }

    fn rewrite_cast_context(
        &mut self,
        _inferred: &TypeDescriptor,
        _actual: &TypeDescriptor,
        expr: Expr,
    ) -> Result<Expr> {
        Ok(expr)
    }

    fn rewrite_boolean_conversion_context(
        &mut self,
        _inferred: &TypeDescriptor,
        _actual: &TypeDescriptor,
        expr: Expr,
    ) -> Result<Expr> {
        Ok(expr)
    }
}

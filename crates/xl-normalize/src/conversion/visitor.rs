use xl_core::ast::{
    Block, ClassDecl, CompilationUnit, Expr, ExprAssign, ExprCast, ExprKind, FieldDecl, Member,
    MethodDescriptor, Stmt, StmtLocal,
};
use xl_core::error::Result;
use xl_core::types::TypeDescriptor;

use crate::conversion::{ConversionContext, ConversionContextKind, ContextRewriter};
use crate::{invariant_bail, invariant_ensure};

/// Walks a compilation unit bottom-up and applies a [`ContextRewriter`] at every
/// conversion point.
///
/// Children are rewritten before the context that encloses them, so a rewriter always
/// sees already normalized operands.
pub struct ConversionContextVisitor<R> {
    rewriter: R,
    /// Return type of each enclosing method body; `None` for initializer blocks.
    return_types: Vec<Option<TypeDescriptor>>,
}

impl<R: ContextRewriter> ConversionContextVisitor<R> {
    pub fn new(rewriter: R) -> Self {
        Self {
            rewriter,
            return_types: Vec::new(),
        }
    }

    pub fn rewriter(&self) -> &R {
        &self.rewriter
    }

    pub fn into_rewriter(self) -> R {
        self.rewriter
    }

    pub fn visit_compilation_unit(&mut self, unit: &mut CompilationUnit) -> Result<()> {
        for class in &mut unit.classes {
            self.visit_class(class)?;
        }
        Ok(())
    }

    pub fn visit_class(&mut self, class: &mut ClassDecl) -> Result<()> {
        for member in &mut class.members {
            self.visit_member(member)?;
        }
        Ok(())
    }

    fn visit_member(&mut self, member: &mut Member) -> Result<()> {
        match member {
            Member::Field(FieldDecl {
                descriptor,
                initializer,
            }) => {
                if let Some(init) = initializer {
                    self.visit_expr(init)?;
                    self.rewrite_slot(
                        init,
                        ConversionContextKind::FieldInitializer,
                        &descriptor.ty,
                    )?;
                }
                Ok(())
            }
            Member::Method(method) => match &mut method.body {
                Some(body) => {
                    self.with_return_type(Some(method.descriptor.return_type.clone()), |this| {
                        this.visit_block(body)
                    })
                }
                None => Ok(()),
            },
            Member::Initializer(block) => {
                self.with_return_type(None, |this| this.visit_block(block))
            }
            Member::Class(class) => self.visit_class(class),
        }
    }

    fn with_return_type(
        &mut self,
        return_type: Option<TypeDescriptor>,
        f: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        self.return_types.push(return_type);
        let result = f(self);
        self.return_types.pop();
        result
    }

    fn visit_block(&mut self, block: &mut Block) -> Result<()> {
        for stmt in &mut block.stmts {
            self.visit_stmt(stmt)?;
        }
        Ok(())
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) -> Result<()> {
        match stmt {
            Stmt::Local(StmtLocal { ty, init, .. }) => {
                if let Some(init) = init {
                    self.visit_expr(init)?;
                    self.rewrite_slot(init, ConversionContextKind::Assignment, ty)?;
                }
            }
            Stmt::Expr(expr) | Stmt::Throw(expr) => self.visit_expr(expr)?,
            Stmt::Return(ret) => {
                if let Some(value) = &mut ret.value {
                    self.visit_expr(value)?;
                    let Some(Some(return_type)) = self.return_types.last().cloned() else {
                        invariant_bail!(
                            "return with a value outside of a method body at {}",
                            ret.span
                        );
                    };
                    self.rewrite_slot(value, ConversionContextKind::Return, &return_type)?;
                }
            }
            Stmt::If(stmt_if) => {
                self.visit_condition(&mut stmt_if.cond)?;
                self.visit_block(&mut stmt_if.then)?;
                if let Some(elze) = &mut stmt_if.elze {
                    self.visit_block(elze)?;
                }
            }
            Stmt::While(stmt_while) => {
                self.visit_condition(&mut stmt_while.cond)?;
                self.visit_block(&mut stmt_while.body)?;
            }
            Stmt::Block(block) => self.visit_block(block)?,
        }
        Ok(())
    }

    fn visit_condition(&mut self, cond: &mut Expr) -> Result<()> {
        self.visit_expr(cond)?;
        self.rewrite_slot(
            cond,
            ConversionContextKind::BooleanCondition,
            &TypeDescriptor::boolean(),
        )
    }

    pub fn visit_expr(&mut self, expr: &mut Expr) -> Result<()> {
        let Expr { ty, kind, span } = expr;
        match kind {
            ExprKind::Literal(_) | ExprKind::Local(_) | ExprKind::This => {}
            ExprKind::FieldAccess(access) => {
                if let Some(qualifier) = &mut access.qualifier {
                    self.visit_qualifier(qualifier)?;
                }
            }
            ExprKind::Invoke(invoke) => {
                if let Some(qualifier) = &mut invoke.qualifier {
                    self.visit_qualifier(qualifier)?;
                }
                self.visit_arguments(&invoke.method, &mut invoke.args)?;
            }
            ExprKind::New(new) => self.visit_arguments(&new.constructor, &mut new.args)?,
            ExprKind::Assign(ExprAssign { target, value }) => {
                self.visit_expr(target)?;
                self.visit_expr(value)?;
                self.rewrite_slot(value, ConversionContextKind::Assignment, &target.ty)?;
            }
            ExprKind::Cast(ExprCast { expr: operand, ty: target }) => {
                self.visit_expr(operand)?;
                self.rewrite_slot(operand, ConversionContextKind::Cast, target)?;
            }
            ExprKind::BinOp(bin_op) => {
                self.visit_expr(&mut bin_op.lhs)?;
                self.visit_expr(&mut bin_op.rhs)?;
            }
            ExprKind::UnOp(un_op) => self.visit_expr(&mut un_op.val)?,
            ExprKind::Conditional(conditional) => {
                self.visit_condition(&mut conditional.cond)?;
                for branch in [&mut conditional.then, &mut conditional.elze] {
                    self.visit_expr(branch)?;
                    self.rewrite_slot(branch, ConversionContextKind::Assignment, ty)?;
                }
            }
            ExprKind::ArrayLiteral(array) => {
                let TypeDescriptor::Array(array_ty) = &*ty else {
                    invariant_bail!("array literal at {} has non-array type {}", span, ty);
                };
                for element in &mut array.elements {
                    self.visit_expr(element)?;
                    self.rewrite_slot(
                        element,
                        ConversionContextKind::Assignment,
                        &array_ty.component,
                    )?;
                }
            }
            ExprKind::Index(index) => {
                self.visit_expr(&mut index.array)?;
                self.visit_expr(&mut index.index)?;
            }
        }
        Ok(())
    }

    fn visit_qualifier(&mut self, qualifier: &mut Expr) -> Result<()> {
        self.visit_expr(qualifier)?;
        let inferred = qualifier.ty.clone();
        self.rewrite_slot(qualifier, ConversionContextKind::MemberQualifier, &inferred)
    }

    fn visit_arguments(&mut self, method: &MethodDescriptor, args: &mut [Expr]) -> Result<()> {
        let arity = method.parameter_types.len();
        if method.varargs {
            invariant_ensure!(
                arity > 0 && args.len() + 1 >= arity,
                "{} arguments passed to varargs method {} with {} parameters",
                args.len(),
                method.name,
                arity
            );
        } else {
            invariant_ensure!(
                args.len() == arity,
                "{} arguments passed to method {} with {} parameters",
                args.len(),
                method.name,
                arity
            );
        }

        let arg_count = args.len();
        for (position, arg) in args.iter_mut().enumerate() {
            self.visit_expr(arg)?;
            let inferred = parameter_type_at(method, position, arg_count, &arg.ty)?;
            self.rewrite_slot(arg, ConversionContextKind::MethodInvocation, &inferred)?;
        }
        Ok(())
    }

    /// Replaces `slot` with whatever the rewriter makes of it in the given context.
    fn rewrite_slot(
        &mut self,
        slot: &mut Expr,
        kind: ConversionContextKind,
        inferred: &TypeDescriptor,
    ) -> Result<()> {
        let expr = std::mem::take(slot);
        let actual = expr.ty.clone();
        *slot = ConversionContext::new(kind, inferred, &actual).dispatch(&mut self.rewriter, expr)?;
        Ok(())
    }
}

/// Type expected for the argument at `position`.
///
/// Trailing arguments of a varargs call expect the component type of the last parameter,
/// except for a single array argument in the varargs position, which is passed through.
fn parameter_type_at(
    method: &MethodDescriptor,
    position: usize,
    arg_count: usize,
    arg_ty: &TypeDescriptor,
) -> Result<TypeDescriptor> {
    let parameters = &method.parameter_types;
    let last = parameters.len().saturating_sub(1);
    if !method.varargs || position < last {
        return Ok(parameters[position].clone());
    }

    let TypeDescriptor::Array(varargs_ty) = &parameters[last] else {
        invariant_bail!(
            "varargs parameter of {} has non-array type {}",
            method.name,
            parameters[last]
        );
    };
    let passes_array = arg_count == parameters.len() && matches!(arg_ty, TypeDescriptor::Array(_));
    if passes_array {
        Ok(parameters[last].clone())
    } else {
        Ok(varargs_ty.component.as_ref().clone())
    }
}

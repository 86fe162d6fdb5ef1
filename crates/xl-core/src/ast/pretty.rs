//! Source-like rendering of the AST.
//!
//! Expressions render on one line through `Display`; units, classes and statements go
//! through `PrettyPrintable` so nesting follows `PrettyOptions::indent_size`.

use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::ast::{
    Block, ClassDecl, CompilationUnit, Expr, ExprKind, Literal, Member, Stmt, UnOpKind,
};
use crate::pretty::{escape_literal, PrettyCtx, PrettyPrintable};

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Boolean(value) => write!(f, "{}", value),
            Literal::Int(value) => write!(f, "{}", value),
            Literal::Double(value) => write!(f, "{:?}", value),
            Literal::Char(ch) => {
                let mut buf = [0; 4];
                write!(f, "'{}'", escape_literal(ch.encode_utf8(&mut buf), '\''))
            }
            Literal::String(value) => write!(f, "\"{}\"", escape_literal(value, '"')),
        }
    }
}

/// Operands that would read ambiguously without parentheses.
fn needs_parens(expr: &Expr) -> bool {
    matches!(
        expr.kind,
        ExprKind::Cast(_)
            | ExprKind::BinOp(_)
            | ExprKind::Assign(_)
            | ExprKind::Conditional(_)
            | ExprKind::UnOp(_)
    )
}

struct Operand<'a>(&'a Expr);

impl Display for Operand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if needs_parens(self.0) {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(literal) => write!(f, "{}", literal),
            ExprKind::Local(name) => write!(f, "{}", name),
            ExprKind::This => write!(f, "this"),
            ExprKind::FieldAccess(access) => match &access.qualifier {
                Some(qualifier) => write!(f, "{}.{}", Operand(qualifier), access.field.name),
                None => write!(f, "{}", access.field.name),
            },
            ExprKind::Invoke(invoke) => {
                if let Some(qualifier) = &invoke.qualifier {
                    write!(f, "{}.", Operand(qualifier))?;
                }
                write!(f, "{}({})", invoke.method.name, invoke.args.iter().join(", "))
            }
            ExprKind::New(new) => write!(f, "new {}({})", self.ty, new.args.iter().join(", ")),
            ExprKind::Assign(assign) => write!(f, "{} = {}", assign.target, assign.value),
            ExprKind::Cast(cast) => write!(f, "({}) {}", cast.ty, Operand(&cast.expr)),
            ExprKind::BinOp(bin_op) => write!(
                f,
                "{} {} {}",
                Operand(&bin_op.lhs),
                bin_op.kind.symbol(),
                Operand(&bin_op.rhs)
            ),
            ExprKind::UnOp(un_op) => {
                let symbol = match un_op.op {
                    UnOpKind::Not => "!",
                    UnOpKind::Neg => "-",
                };
                write!(f, "{}{}", symbol, Operand(&un_op.val))
            }
            ExprKind::Conditional(conditional) => write!(
                f,
                "{} ? {} : {}",
                Operand(&conditional.cond),
                Operand(&conditional.then),
                Operand(&conditional.elze)
            ),
            ExprKind::ArrayLiteral(array) => write!(f, "{{{}}}", array.elements.iter().join(", ")),
            ExprKind::Index(index) => write!(f, "{}[{}]", Operand(&index.array), index.index),
        }
    }
}

fn type_annotation(expr: &Expr, ctx: &PrettyCtx<'_>) -> String {
    if ctx.options.show_types {
        format!(" // : {}", expr.ty)
    } else {
        String::new()
    }
}

impl PrettyPrintable for CompilationUnit {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        ctx.writeln(f, format!("// {}", self.path.display()))?;
        for class in &self.classes {
            class.fmt_pretty(f, ctx)?;
        }
        Ok(())
    }
}

impl PrettyPrintable for ClassDecl {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        let declaration = &self.declaration;
        let header = if declaration.type_parameters.is_empty() {
            format!("class {} {{", declaration.simple_name())
        } else {
            format!(
                "class {}<{}> {{",
                declaration.simple_name(),
                declaration
                    .type_parameters
                    .iter()
                    .map(|parameter| parameter.name.as_ref())
                    .join(", ")
            )
        };
        ctx.writeln(f, header)?;
        ctx.with_indent(|ctx| {
            for member in &self.members {
                member.fmt_pretty(f, ctx)?;
            }
            Ok(())
        })?;
        ctx.writeln(f, "}")
    }
}

impl PrettyPrintable for Member {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        match self {
            Member::Field(field) => {
                let descriptor = &field.descriptor;
                let modifier = if descriptor.is_static { "static " } else { "" };
                match &field.initializer {
                    Some(init) => ctx.writeln(
                        f,
                        format!("{}{} {} = {};", modifier, descriptor.ty, descriptor.name, init),
                    ),
                    None => ctx.writeln(
                        f,
                        format!("{}{} {};", modifier, descriptor.ty, descriptor.name),
                    ),
                }
            }
            Member::Method(method) => {
                let descriptor = &method.descriptor;
                let params = descriptor
                    .parameter_types
                    .iter()
                    .zip(method.parameters.iter())
                    .map(|(ty, name)| format!("{} {}", ty, name))
                    .join(", ");
                let header = if descriptor.is_constructor {
                    format!("<init>({})", params)
                } else {
                    format!("{} {}({})", descriptor.return_type, descriptor.name, params)
                };
                match &method.body {
                    Some(body) => {
                        ctx.writeln(f, format!("{} {{", header))?;
                        ctx.with_indent(|ctx| fmt_block_stmts(body, f, ctx))?;
                        ctx.writeln(f, "}")
                    }
                    None => ctx.writeln(f, format!("{};", header)),
                }
            }
            Member::Initializer(block) => {
                ctx.writeln(f, "{")?;
                ctx.with_indent(|ctx| fmt_block_stmts(block, f, ctx))?;
                ctx.writeln(f, "}")
            }
            Member::Class(class) => class.fmt_pretty(f, ctx),
        }
    }
}

fn fmt_block_stmts(block: &Block, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
    for stmt in &block.stmts {
        stmt.fmt_pretty(f, ctx)?;
    }
    Ok(())
}

impl PrettyPrintable for Stmt {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        match self {
            Stmt::Local(local) => match &local.init {
                Some(init) => ctx.writeln(
                    f,
                    format!(
                        "{} {} = {};{}",
                        local.ty,
                        local.name,
                        init,
                        type_annotation(init, ctx)
                    ),
                ),
                None => ctx.writeln(f, format!("{} {};", local.ty, local.name)),
            },
            Stmt::Expr(expr) => ctx.writeln(f, format!("{};{}", expr, type_annotation(expr, ctx))),
            Stmt::Return(ret) => match &ret.value {
                Some(value) => ctx.writeln(
                    f,
                    format!("return {};{}", value, type_annotation(value, ctx)),
                ),
                None => ctx.writeln(f, "return;"),
            },
            Stmt::If(stmt_if) => {
                ctx.writeln(f, format!("if ({}) {{", stmt_if.cond))?;
                ctx.with_indent(|ctx| fmt_block_stmts(&stmt_if.then, f, ctx))?;
                if let Some(elze) = &stmt_if.elze {
                    ctx.writeln(f, "} else {")?;
                    ctx.with_indent(|ctx| fmt_block_stmts(elze, f, ctx))?;
                }
                ctx.writeln(f, "}")
            }
            Stmt::While(stmt_while) => {
                ctx.writeln(f, format!("while ({}) {{", stmt_while.cond))?;
                ctx.with_indent(|ctx| fmt_block_stmts(&stmt_while.body, f, ctx))?;
                ctx.writeln(f, "}")
            }
            Stmt::Block(block) => {
                ctx.writeln(f, "{")?;
                ctx.with_indent(|ctx| fmt_block_stmts(block, f, ctx))?;
                ctx.writeln(f, "}")
            }
            Stmt::Throw(expr) => ctx.writeln(f, format!("throw {};", expr)),
        }
    }
}

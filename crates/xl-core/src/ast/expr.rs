use crate::ast::{FieldDescriptor, Ident, MethodDescriptor};
use crate::span::Span;
use crate::types::{PrimitiveType, TypeDescriptor};

pub type BExpr = Box<Expr>;

common_enum! {
    pub enum Literal {
        Null,
        Boolean(bool),
        Int(i64),
        Double(f64),
        Char(char),
        String(String),
    }
}

common_enum! {
    #[derive(Copy, Eq, Hash)]
    pub enum BinOpKind {
        Add,
        Sub,
        Mul,
        Div,
        Rem,
        Eq,
        Ne,
        Lt,
        Le,
        Gt,
        Ge,
        And,
        Or,
    }
}

impl BinOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Rem => "%",
            BinOpKind::Eq => "==",
            BinOpKind::Ne => "!=",
            BinOpKind::Lt => "<",
            BinOpKind::Le => "<=",
            BinOpKind::Gt => ">",
            BinOpKind::Ge => ">=",
            BinOpKind::And => "&&",
            BinOpKind::Or => "||",
        }
    }
}

common_enum! {
    #[derive(Copy, Eq, Hash)]
    pub enum UnOpKind {
        Not,
        Neg,
    }
}

common_enum! {
    /// Expr is an expression that produces a value of its attached type
    pub enum ExprKind {
        Literal(Literal),
        Local(Ident),
        This,
        FieldAccess(ExprFieldAccess),
        Invoke(ExprInvoke),
        New(ExprNew),
        Assign(ExprAssign),
        Cast(ExprCast),
        BinOp(ExprBinOp),
        UnOp(ExprUnOp),
        Conditional(ExprConditional),
        ArrayLiteral(ExprArrayLiteral),
        Index(ExprIndex),
    }
}

common_struct! {
    pub struct Expr {
        #[serde(default)]
        pub span: Span,
        pub ty: TypeDescriptor,
        pub kind: ExprKind,
    }
}

common_struct! {
    pub struct ExprFieldAccess {
        /// `None` for static fields and implicit `this`.
        pub qualifier: Option<BExpr>,
        pub field: FieldDescriptor,
    }
}

common_struct! {
    pub struct ExprInvoke {
        pub qualifier: Option<BExpr>,
        pub method: MethodDescriptor,
        pub args: Vec<Expr>,
    }
}

common_struct! {
    pub struct ExprNew {
        pub constructor: MethodDescriptor,
        pub args: Vec<Expr>,
    }
}

common_struct! {
    pub struct ExprAssign {
        pub target: BExpr,
        pub value: BExpr,
    }
}

common_struct! {
    pub struct ExprCast {
        pub expr: BExpr,
        pub ty: TypeDescriptor,
    }
}

common_struct! {
    pub struct ExprBinOp {
        pub kind: BinOpKind,
        pub lhs: BExpr,
        pub rhs: BExpr,
    }
}

common_struct! {
    pub struct ExprUnOp {
        pub op: UnOpKind,
        pub val: BExpr,
    }
}

common_struct! {
    pub struct ExprConditional {
        pub cond: BExpr,
        pub then: BExpr,
        pub elze: BExpr,
    }
}

common_struct! {
    pub struct ExprArrayLiteral {
        pub elements: Vec<Expr>,
    }
}

common_struct! {
    pub struct ExprIndex {
        pub array: BExpr,
        pub index: BExpr,
    }
}

impl Default for Expr {
    /// A `null` of type `void`; only used as a stand-in while a node is being rewritten.
    fn default() -> Self {
        Expr::new(ExprKind::Literal(Literal::Null), TypeDescriptor::void())
    }
}

impl Expr {
    pub fn new(kind: ExprKind, ty: TypeDescriptor) -> Self {
        Self {
            span: Span::null(),
            ty,
            kind,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Overrides the attached type, e.g. with a call-site specialized return type.
    pub fn with_ty(mut self, ty: TypeDescriptor) -> Self {
        self.ty = ty;
        self
    }

    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    pub fn literal(literal: Literal, ty: TypeDescriptor) -> Expr {
        Expr::new(ExprKind::Literal(literal), ty)
    }

    pub fn null(ty: TypeDescriptor) -> Expr {
        Expr::literal(Literal::Null, ty.to_nullable())
    }

    pub fn bool(value: bool) -> Expr {
        Expr::literal(Literal::Boolean(value), PrimitiveType::Boolean.into())
    }

    pub fn int(value: i64) -> Expr {
        Expr::literal(Literal::Int(value), PrimitiveType::Int.into())
    }

    pub fn local(name: impl Into<Ident>, ty: TypeDescriptor) -> Expr {
        Expr::new(ExprKind::Local(name.into()), ty)
    }

    pub fn this(ty: TypeDescriptor) -> Expr {
        Expr::new(ExprKind::This, ty)
    }

    pub fn field_access(qualifier: Option<Expr>, field: FieldDescriptor) -> Expr {
        let ty = field.ty.clone();
        Expr::new(
            ExprKind::FieldAccess(ExprFieldAccess {
                qualifier: qualifier.map(Box::new),
                field,
            }),
            ty,
        )
    }

    pub fn invoke(qualifier: Option<Expr>, method: MethodDescriptor, args: Vec<Expr>) -> Expr {
        let ty = method.return_type.clone();
        Expr::new(
            ExprKind::Invoke(ExprInvoke {
                qualifier: qualifier.map(Box::new),
                method,
                args,
            }),
            ty,
        )
    }

    pub fn new_instance(
        ty: TypeDescriptor,
        constructor: MethodDescriptor,
        args: Vec<Expr>,
    ) -> Expr {
        Expr::new(ExprKind::New(ExprNew { constructor, args }), ty)
    }

    pub fn assign(target: Expr, value: Expr) -> Expr {
        let ty = target.ty.clone();
        Expr::new(
            ExprKind::Assign(ExprAssign {
                target: Box::new(target),
                value: Box::new(value),
            }),
            ty,
        )
    }

    /// Wraps `expr` so that its static type becomes `ty`.
    pub fn cast(expr: Expr, ty: TypeDescriptor) -> Expr {
        let span = expr.span;
        Expr::new(
            ExprKind::Cast(ExprCast {
                expr: Box::new(expr),
                ty: ty.clone(),
            }),
            ty,
        )
        .with_span(span)
    }

    pub fn bin_op(kind: BinOpKind, lhs: Expr, rhs: Expr, ty: TypeDescriptor) -> Expr {
        Expr::new(
            ExprKind::BinOp(ExprBinOp {
                kind,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }),
            ty,
        )
    }

    pub fn un_op(op: UnOpKind, val: Expr) -> Expr {
        let ty = val.ty.clone();
        Expr::new(
            ExprKind::UnOp(ExprUnOp {
                op,
                val: Box::new(val),
            }),
            ty,
        )
    }

    pub fn conditional(cond: Expr, then: Expr, elze: Expr, ty: TypeDescriptor) -> Expr {
        Expr::new(
            ExprKind::Conditional(ExprConditional {
                cond: Box::new(cond),
                then: Box::new(then),
                elze: Box::new(elze),
            }),
            ty,
        )
    }

    pub fn array_literal(ty: TypeDescriptor, elements: Vec<Expr>) -> Expr {
        Expr::new(ExprKind::ArrayLiteral(ExprArrayLiteral { elements }), ty)
    }

    pub fn index(array: Expr, index: Expr, ty: TypeDescriptor) -> Expr {
        Expr::new(
            ExprKind::Index(ExprIndex {
                array: Box::new(array),
                index: Box::new(index),
            }),
            ty,
        )
    }

    pub fn is_cast(&self) -> bool {
        matches!(self.kind, ExprKind::Cast(_))
    }

    pub fn as_cast(&self) -> Option<&ExprCast> {
        match &self.kind {
            ExprKind::Cast(cast) => Some(cast),
            _ => None,
        }
    }
}

use crate::ast::{Expr, Ident};
use crate::span::Span;
use crate::types::TypeDescriptor;

common_enum! {
    pub enum Stmt {
        Local(StmtLocal),
        Expr(Expr),
        Return(StmtReturn),
        If(StmtIf),
        While(StmtWhile),
        Block(Block),
        Throw(Expr),
    }
}

common_struct! {
    #[derive(Default)]
    pub struct Block {
        pub stmts: Vec<Stmt>,
    }
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }
}

common_struct! {
    pub struct StmtLocal {
        #[serde(default)]
        pub span: Span,
        pub name: Ident,
        pub ty: TypeDescriptor,
        pub init: Option<Expr>,
    }
}

common_struct! {
    pub struct StmtReturn {
        #[serde(default)]
        pub span: Span,
        pub value: Option<Expr>,
    }
}

common_struct! {
    pub struct StmtIf {
        pub cond: Expr,
        pub then: Block,
        pub elze: Option<Block>,
    }
}

common_struct! {
    pub struct StmtWhile {
        pub cond: Expr,
        pub body: Block,
    }
}

impl Stmt {
    pub fn local(name: impl Into<Ident>, ty: TypeDescriptor, init: Option<Expr>) -> Stmt {
        Stmt::Local(StmtLocal {
            span: Span::null(),
            name: name.into(),
            ty,
            init,
        })
    }

    pub fn expr(expr: Expr) -> Stmt {
        Stmt::Expr(expr)
    }

    pub fn ret(value: Option<Expr>) -> Stmt {
        Stmt::Return(StmtReturn {
            span: Span::null(),
            value,
        })
    }

    pub fn if_(cond: Expr, then: Block, elze: Option<Block>) -> Stmt {
        Stmt::If(StmtIf { cond, then, elze })
    }

    pub fn while_(cond: Expr, body: Block) -> Stmt {
        Stmt::While(StmtWhile { cond, body })
    }
}

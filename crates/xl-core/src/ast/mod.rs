//! AST are trees, so Box<T> is fine
//!
//! Every expression carries the `TypeDescriptor` resolved for it by the front-end; the
//! normalization passes never compute types from scratch.

use crate::types::{TypeDeclaration, TypeDescriptor, TypeStore};
use std::path::PathBuf;
use std::sync::Arc;

mod expr;
mod ident;
mod pretty;
mod stmt;

pub use expr::*;
pub use ident::*;
pub use stmt::*;

/// The AST of one source file, owned exclusively by whichever pass is running on it.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub path: PathBuf,
    pub types: Arc<TypeStore>,
    pub classes: Vec<ClassDecl>,
}

impl CompilationUnit {
    pub fn new(path: impl Into<PathBuf>, types: Arc<TypeStore>) -> Self {
        Self {
            path: path.into(),
            types,
            classes: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: ClassDecl) -> Self {
        self.classes.push(class);
        self
    }

    pub fn type_store(&self) -> &Arc<TypeStore> {
        &self.types
    }
}

impl PartialEq for CompilationUnit {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && Arc::ptr_eq(&self.types, &other.types)
            && self.classes == other.classes
    }
}

common_struct! {
    pub struct ClassDecl {
        pub declaration: Arc<TypeDeclaration>,
        pub members: Vec<Member>,
    }
}

impl ClassDecl {
    pub fn new(declaration: Arc<TypeDeclaration>) -> Self {
        Self {
            declaration,
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: impl Into<Member>) -> Self {
        self.members.push(member.into());
        self
    }
}

common_enum! {
    pub enum Member {
        Field(FieldDecl),
        Method(MethodDecl),
        Initializer(Block),
        Class(ClassDecl),
    }
}

impl From<FieldDecl> for Member {
    fn from(field: FieldDecl) -> Self {
        Member::Field(field)
    }
}

impl From<MethodDecl> for Member {
    fn from(method: MethodDecl) -> Self {
        Member::Method(method)
    }
}

impl From<ClassDecl> for Member {
    fn from(class: ClassDecl) -> Self {
        Member::Class(class)
    }
}

common_struct! {
    pub struct FieldDescriptor {
        pub name: Ident,
        pub ty: TypeDescriptor,
        pub is_static: bool,
    }
}

impl FieldDescriptor {
    pub fn new(name: impl Into<Ident>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            is_static: false,
        }
    }
}

common_struct! {
    pub struct FieldDecl {
        pub descriptor: FieldDescriptor,
        pub initializer: Option<Expr>,
    }
}

impl FieldDecl {
    pub fn new(descriptor: FieldDescriptor, initializer: Option<Expr>) -> Self {
        Self {
            descriptor,
            initializer,
        }
    }
}

common_struct! {
    /// Signature of a method or constructor as seen at call sites.
    pub struct MethodDescriptor {
        pub name: Ident,
        pub parameter_types: Vec<TypeDescriptor>,
        pub return_type: TypeDescriptor,
        /// The last parameter is an array that absorbs trailing arguments.
        pub varargs: bool,
        pub is_constructor: bool,
        pub is_static: bool,
    }
}

impl MethodDescriptor {
    pub fn new(
        name: impl Into<Ident>,
        parameter_types: Vec<TypeDescriptor>,
        return_type: TypeDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            parameter_types,
            return_type,
            varargs: false,
            is_constructor: false,
            is_static: false,
        }
    }

    pub fn constructor(parameter_types: Vec<TypeDescriptor>) -> Self {
        Self {
            is_constructor: true,
            ..Self::new("<init>", parameter_types, TypeDescriptor::void())
        }
    }

    pub fn with_varargs(mut self) -> Self {
        self.varargs = true;
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

common_struct! {
    pub struct MethodDecl {
        pub descriptor: MethodDescriptor,
        pub parameters: Vec<Ident>,
        /// `None` for abstract and native methods.
        pub body: Option<Block>,
    }
}

impl MethodDecl {
    pub fn new(descriptor: MethodDescriptor, parameters: Vec<Ident>, body: Block) -> Self {
        Self {
            descriptor,
            parameters,
            body: Some(body),
        }
    }
}

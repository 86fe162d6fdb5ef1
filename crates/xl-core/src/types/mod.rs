//! Type descriptor algebra.
//!
//! Descriptors are immutable values with shared (`Arc`) storage, so cloning one is cheap
//! and never copies argument lists. Type-variable bounds are not stored inline; they live
//! in the [`TypeStore`] keyed by [`TypeVarId`], which keeps self-referential bounds such as
//! `T extends Comparable<T>` free of reference cycles.

use itertools::Itertools;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

mod declaration;
mod store;

pub use declaration::*;
pub use store::*;

pub type TypeVarId = u32;

common_enum! {
    #[derive(Copy, Eq, Hash)]
    pub enum PrimitiveType {
        Boolean,
        Byte,
        Short,
        Char,
        Int,
        Long,
        Float,
        Double,
        Void,
    }
}

impl PrimitiveType {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }
}

common_enum! {
    #[derive(Eq, Hash)]
    pub enum TypeDescriptor {
        Primitive(PrimitiveType),
        Declared(DeclaredType),
        Array(ArrayType),
        TypeVariable(TypeVariable),
        Union(UnionType),
        Intersection(IntersectionType),
    }
}

common_struct! {
    /// A reference to a nominal, possibly generic, declaration.
    ///
    /// An empty argument list on a generic declaration denotes the raw type.
    #[derive(Eq, Hash)]
    pub struct DeclaredType {
        pub declaration: Arc<TypeDeclaration>,
        pub nullable: bool,
        pub type_arguments: Arc<[TypeDescriptor]>,
    }
}

impl DeclaredType {
    pub fn is_raw(&self) -> bool {
        self.type_arguments.is_empty() && self.declaration.is_generic()
    }
}

common_struct! {
    #[derive(Eq, Hash)]
    pub struct ArrayType {
        pub component: Arc<TypeDescriptor>,
        pub nullable: bool,
    }
}

common_enum! {
    #[derive(Copy, Eq, Hash)]
    pub enum TypeVariableKind {
        /// A type parameter declared on a class or method.
        Parameter,
        Wildcard,
        /// A synthesized variable standing for a call-site-fixed wildcard instantiation.
        Capture,
    }
}

common_struct! {
    #[derive(Eq, Hash)]
    pub struct TypeVariable {
        pub id: TypeVarId,
        pub name: Arc<str>,
        pub kind: TypeVariableKind,
        pub nullable: bool,
    }
}

impl TypeVariable {
    pub fn is_wildcard_or_capture(&self) -> bool {
        matches!(
            self.kind,
            TypeVariableKind::Wildcard | TypeVariableKind::Capture
        )
    }

    pub fn with_nullability(&self, nullable: bool) -> TypeVariable {
        TypeVariable {
            nullable,
            ..self.clone()
        }
    }
}

common_struct! {
    #[derive(Eq, Hash)]
    pub struct UnionType {
        pub types: Arc<[TypeDescriptor]>,
    }
}

common_struct! {
    #[derive(Eq, Hash)]
    pub struct IntersectionType {
        pub types: Arc<[TypeDescriptor]>,
    }
}

impl TypeDescriptor {
    /// Non-nullable reference to `declaration` with the given type arguments.
    pub fn declared(
        declaration: &Arc<TypeDeclaration>,
        type_arguments: impl IntoIterator<Item = TypeDescriptor>,
    ) -> TypeDescriptor {
        TypeDescriptor::Declared(DeclaredType {
            declaration: declaration.clone(),
            nullable: false,
            type_arguments: type_arguments.into_iter().collect(),
        })
    }

    pub fn array(component: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::Array(ArrayType {
            component: Arc::new(component),
            nullable: false,
        })
    }

    pub fn union(types: impl IntoIterator<Item = TypeDescriptor>) -> TypeDescriptor {
        TypeDescriptor::Union(UnionType {
            types: types.into_iter().collect(),
        })
    }

    pub fn intersection(types: impl IntoIterator<Item = TypeDescriptor>) -> TypeDescriptor {
        TypeDescriptor::Intersection(IntersectionType {
            types: types.into_iter().collect(),
        })
    }

    pub fn boolean() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveType::Boolean)
    }

    pub fn void() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveType::Void)
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            TypeDescriptor::Primitive(_) => false,
            TypeDescriptor::Declared(declared) => declared.nullable,
            TypeDescriptor::Array(array) => array.nullable,
            TypeDescriptor::TypeVariable(variable) => variable.nullable,
            TypeDescriptor::Union(union) => union.types.iter().any(|ty| ty.is_nullable()),
            TypeDescriptor::Intersection(intersection) => {
                intersection.types.iter().all(|ty| ty.is_nullable())
            }
        }
    }

    pub fn is_wildcard_or_capture(&self) -> bool {
        self.as_type_variable()
            .is_some_and(TypeVariable::is_wildcard_or_capture)
    }

    pub fn as_type_variable(&self) -> Option<&TypeVariable> {
        match self {
            TypeDescriptor::TypeVariable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn as_declared(&self) -> Option<&DeclaredType> {
        match self {
            TypeDescriptor::Declared(declared) => Some(declared),
            _ => None,
        }
    }

    pub fn to_nullable(&self) -> TypeDescriptor {
        self.with_nullability(true)
    }

    pub fn to_non_nullable(&self) -> TypeDescriptor {
        self.with_nullability(false)
    }

    /// Replaces the type variables named in `bindings`. A nullable use (`E?`) of a
    /// bound variable yields the nullable form of its replacement.
    pub fn substitute(&self, bindings: &HashMap<TypeVarId, TypeDescriptor>) -> TypeDescriptor {
        match self {
            TypeDescriptor::Primitive(_) => self.clone(),
            TypeDescriptor::Declared(declared) => TypeDescriptor::Declared(DeclaredType {
                type_arguments: declared
                    .type_arguments
                    .iter()
                    .map(|argument| argument.substitute(bindings))
                    .collect(),
                ..declared.clone()
            }),
            TypeDescriptor::Array(array) => TypeDescriptor::Array(ArrayType {
                component: Arc::new(array.component.substitute(bindings)),
                nullable: array.nullable,
            }),
            TypeDescriptor::TypeVariable(variable) => match bindings.get(&variable.id) {
                Some(bound) if variable.nullable => bound.to_nullable(),
                Some(bound) => bound.clone(),
                None => self.clone(),
            },
            TypeDescriptor::Union(union) => {
                TypeDescriptor::union(union.types.iter().map(|ty| ty.substitute(bindings)))
            }
            TypeDescriptor::Intersection(intersection) => TypeDescriptor::intersection(
                intersection.types.iter().map(|ty| ty.substitute(bindings)),
            ),
        }
    }

    fn with_nullability(&self, nullable: bool) -> TypeDescriptor {
        match self {
            TypeDescriptor::Primitive(_) => self.clone(),
            TypeDescriptor::Declared(declared) => TypeDescriptor::Declared(DeclaredType {
                nullable,
                ..declared.clone()
            }),
            TypeDescriptor::Array(array) => TypeDescriptor::Array(ArrayType {
                nullable,
                ..array.clone()
            }),
            TypeDescriptor::TypeVariable(variable) => {
                TypeDescriptor::TypeVariable(variable.with_nullability(nullable))
            }
            TypeDescriptor::Union(union) => TypeDescriptor::union(
                union.types.iter().map(|ty| ty.with_nullability(nullable)),
            ),
            TypeDescriptor::Intersection(intersection) => TypeDescriptor::intersection(
                intersection
                    .types
                    .iter()
                    .map(|ty| ty.with_nullability(nullable)),
            ),
        }
    }
}

impl From<PrimitiveType> for TypeDescriptor {
    fn from(primitive: PrimitiveType) -> Self {
        TypeDescriptor::Primitive(primitive)
    }
}

impl From<TypeVariable> for TypeDescriptor {
    fn from(variable: TypeVariable) -> Self {
        TypeDescriptor::TypeVariable(variable)
    }
}

impl From<DeclaredType> for TypeDescriptor {
    fn from(declared: DeclaredType) -> Self {
        TypeDescriptor::Declared(declared)
    }
}

fn nullable_suffix(nullable: bool) -> &'static str {
    if nullable {
        "?"
    } else {
        ""
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(primitive) => write!(f, "{}", primitive.name()),
            TypeDescriptor::Declared(declared) => {
                write!(f, "{}", declared.declaration.simple_name())?;
                if !declared.type_arguments.is_empty() {
                    write!(f, "<{}>", declared.type_arguments.iter().join(", "))?;
                }
                write!(f, "{}", nullable_suffix(declared.nullable))
            }
            TypeDescriptor::Array(array) => {
                write!(f, "{}[]{}", array.component, nullable_suffix(array.nullable))
            }
            TypeDescriptor::TypeVariable(variable) => match variable.kind {
                TypeVariableKind::Parameter => {
                    write!(f, "{}{}", variable.name, nullable_suffix(variable.nullable))
                }
                TypeVariableKind::Wildcard => write!(f, "?"),
                TypeVariableKind::Capture => write!(f, "capture#{}", variable.id),
            },
            TypeDescriptor::Union(union) => write!(f, "{}", union.types.iter().join(" | ")),
            TypeDescriptor::Intersection(intersection) => {
                write!(f, "{}", intersection.types.iter().join(" & "))
            }
        }
    }
}

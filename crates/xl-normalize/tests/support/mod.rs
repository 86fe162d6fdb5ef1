//! Shared test fixtures for xl-normalize integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use xl_core::ast::{
    Block, ClassDecl, CompilationUnit, Expr, FieldDecl, FieldDescriptor, Ident, Member,
    MethodDecl, MethodDescriptor, Stmt,
};
use xl_core::error::Result;
use xl_core::types::{TypeDeclaration, TypeDescriptor, TypeStore, TypeStoreBuilder, TypeVariable};
use xl_normalize::{ContextRewriter, ConversionContextVisitor};

/// A small universe: `String`, `Integer`, `Number`, `Box<T>`, `List<E>`, `Map<K, V>`,
/// `ArrayList<E> implements List<E>`, `HashMap<K, V> implements Map<K, V>`,
/// `Comparable<T>`, one anonymous class and the `Holder` class tests put members in.
pub struct Fixture {
    pub store: Arc<TypeStore>,
    pub string: Arc<TypeDeclaration>,
    pub integer: Arc<TypeDeclaration>,
    pub number: Arc<TypeDeclaration>,
    pub boxed: Arc<TypeDeclaration>,
    pub list: Arc<TypeDeclaration>,
    pub map: Arc<TypeDeclaration>,
    pub array_list: Arc<TypeDeclaration>,
    pub hash_map: Arc<TypeDeclaration>,
    pub comparable: Arc<TypeDeclaration>,
    pub anonymous: Arc<TypeDeclaration>,
    pub holder: Arc<TypeDeclaration>,
    /// `? extends Number`
    pub extends_number: TypeVariable,
    /// `? super Integer`
    pub super_integer: TypeVariable,
    /// Unbounded `?`
    pub unbounded: TypeVariable,
    /// `T extends Comparable<T>`
    pub comparable_t: TypeVariable,
    /// A capture whose upper bound is `Comparable<itself>`.
    pub comparable_capture: TypeVariable,
}

impl Fixture {
    pub fn new() -> Self {
        let mut builder = TypeStoreBuilder::new();
        let string = builder.declare_class("java.lang.String", &[]);
        let integer = builder.declare_class("java.lang.Integer", &[]);
        let number = builder.declare_class("java.lang.Number", &[]);
        let boxed = builder.declare_class("test.Box", &["T"]);
        let list = builder.declare_class("java.util.List", &["E"]);
        let map = builder.declare_class("java.util.Map", &["K", "V"]);
        let array_list = builder.declare_class("java.util.ArrayList", &["E"]);
        let hash_map = builder.declare_class("java.util.HashMap", &["K", "V"]);
        let own_parameters = |declaration: &Arc<TypeDeclaration>| {
            declaration
                .type_parameters
                .iter()
                .cloned()
                .map(TypeDescriptor::from)
                .collect::<Vec<_>>()
        };
        let list_of_e = TypeDescriptor::declared(&list, own_parameters(&array_list));
        builder.add_supertype(&array_list, list_of_e);
        let map_of_k_v = TypeDescriptor::declared(&map, own_parameters(&hash_map));
        builder.add_supertype(&hash_map, map_of_k_v);
        let comparable = builder.declare_class("java.lang.Comparable", &["T"]);
        let anonymous = builder.declare_anonymous_class("test.Holder$1");
        let holder = builder.declare_class("test.Holder", &[]);

        let extends_number = builder.wildcard(Some(TypeDescriptor::declared(&number, [])), None);
        let super_integer = builder.wildcard(None, Some(TypeDescriptor::declared(&integer, [])));
        let unbounded = builder.wildcard(None, None);

        let comparable_t = builder.type_parameter("T", None);
        let bound =
            TypeDescriptor::declared(&comparable, [TypeDescriptor::from(comparable_t.clone())]);
        builder.set_upper_bound(&comparable_t, bound);

        let comparable_capture = builder.capture(None, None);
        let bound = TypeDescriptor::declared(
            &comparable,
            [TypeDescriptor::from(comparable_capture.clone())],
        );
        builder.set_upper_bound(&comparable_capture, bound);

        Self {
            store: Arc::new(builder.build()),
            string,
            integer,
            number,
            boxed,
            list,
            map,
            array_list,
            hash_map,
            comparable,
            anonymous,
            holder,
            extends_number,
            super_integer,
            unbounded,
            comparable_t,
            comparable_capture,
        }
    }

    pub fn string(&self) -> TypeDescriptor {
        TypeDescriptor::declared(&self.string, [])
    }

    pub fn integer(&self) -> TypeDescriptor {
        TypeDescriptor::declared(&self.integer, [])
    }

    pub fn number(&self) -> TypeDescriptor {
        TypeDescriptor::declared(&self.number, [])
    }

    pub fn boxed(&self, argument: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::declared(&self.boxed, [argument])
    }

    pub fn list(&self, element: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::declared(&self.list, [element])
    }

    pub fn map(&self, key: TypeDescriptor, value: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::declared(&self.map, [key, value])
    }

    pub fn array_list(&self, element: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::declared(&self.array_list, [element])
    }

    pub fn hash_map(&self, key: TypeDescriptor, value: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::declared(&self.hash_map, [key, value])
    }

    pub fn comparable(&self, argument: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::declared(&self.comparable, [argument])
    }

    pub fn anonymous(&self) -> TypeDescriptor {
        TypeDescriptor::declared(&self.anonymous, [])
    }

    pub fn holder(&self) -> TypeDescriptor {
        TypeDescriptor::declared(&self.holder, [])
    }

    /// A compilation unit holding a single `Holder` class with the given members.
    pub fn unit(&self, members: Vec<Member>) -> CompilationUnit {
        let mut class = ClassDecl::new(self.holder.clone());
        class.members = members;
        CompilationUnit::new("Holder.java", self.store.clone()).with_class(class)
    }
}

pub fn method(
    name: &str,
    parameters: Vec<(&str, TypeDescriptor)>,
    return_type: TypeDescriptor,
    body: Vec<Stmt>,
) -> Member {
    let (names, types): (Vec<Ident>, Vec<TypeDescriptor>) = parameters
        .into_iter()
        .map(|(name, ty)| (Ident::new(name), ty))
        .unzip();
    MethodDecl::new(
        MethodDescriptor::new(name, types, return_type),
        names,
        Block::new(body),
    )
    .into()
}

pub fn field(name: &str, ty: TypeDescriptor, initializer: Expr) -> Member {
    FieldDecl::new(FieldDescriptor::new(name, ty), Some(initializer)).into()
}

/// Every cast in the unit, rendered as source.
pub fn rendered_casts(unit: &CompilationUnit) -> Result<Vec<String>> {
    Ok(collect_casts(unit)?
        .into_iter()
        .map(|cast| cast.to_string())
        .collect())
}

/// Target types of every cast in the unit, in traversal order.
pub fn cast_targets(unit: &CompilationUnit) -> Result<Vec<TypeDescriptor>> {
    Ok(collect_casts(unit)?.into_iter().map(|cast| cast.ty).collect())
}

fn collect_casts(unit: &CompilationUnit) -> Result<Vec<Expr>> {
    #[derive(Default)]
    struct CastCollector {
        casts: Vec<Expr>,
    }

    impl ContextRewriter for CastCollector {
        fn rewrite_cast_context(
            &mut self,
            inferred: &TypeDescriptor,
            _actual: &TypeDescriptor,
            expr: Expr,
        ) -> Result<Expr> {
            self.casts.push(Expr::cast(expr.clone(), inferred.clone()));
            Ok(expr)
        }
    }

    let mut unit = unit.clone();
    let mut visitor = ConversionContextVisitor::new(CastCollector::default());
    visitor.visit_compilation_unit(&mut unit)?;
    Ok(visitor.into_rewriter().casts)
}

use pretty_assertions::assert_eq;
use std::sync::Arc;
use xl_core::ast::{
    BinOpKind, Block, ClassDecl, CompilationUnit, Expr, FieldDecl, FieldDescriptor, Ident,
    Literal, MethodDecl, MethodDescriptor, Stmt,
};
use xl_core::pretty::{pretty, PrettyOptions};
use xl_core::types::{PrimitiveType, TypeDescriptor, TypeStoreBuilder};

#[test]
fn test_unit_renders_as_source() {
    let mut builder = TypeStoreBuilder::new();
    let string = TypeDescriptor::declared(&builder.declare_class("java.lang.String", &[]), []);
    let counter = builder.declare_class("demo.Counter", &[]);
    let int: TypeDescriptor = PrimitiveType::Int.into();
    let store = Arc::new(builder.build());

    let count = FieldDescriptor::new("count", int.clone());
    let body = Block::new(vec![
        Stmt::if_(
            Expr::bin_op(
                BinOpKind::Gt,
                Expr::local("step", int.clone()),
                Expr::int(0),
                TypeDescriptor::boolean(),
            ),
            Block::new(vec![Stmt::expr(Expr::assign(
                Expr::field_access(
                    Some(Expr::this(TypeDescriptor::declared(&counter, []))),
                    count.clone(),
                ),
                Expr::local("step", int.clone()),
            ))]),
            None,
        ),
        Stmt::ret(Some(Expr::cast(Expr::null(string.clone()), string.clone()))),
    ]);
    let unit = CompilationUnit::new("demo/Counter.java", store).with_class(
        ClassDecl::new(counter.clone())
            .with_member(FieldDecl::new(count, Some(Expr::int(0))))
            .with_member(MethodDecl::new(
                MethodDescriptor::new("bump", vec![int.clone()], string.to_nullable()),
                vec![Ident::new("step")],
                body,
            )),
    );

    let expected = "\
// demo/Counter.java
class Counter {
    int count = 0;
    String? bump(int step) {
        if (step > 0) {
            this.count = step;
        }
        return (String) null;
    }
}
";
    assert_eq!(pretty(&unit, PrettyOptions::default()).to_string(), expected);

    let typed = pretty(
        &unit,
        PrettyOptions {
            show_types: true,
            ..PrettyOptions::default()
        },
    )
    .to_string();
    assert!(typed.contains("return (String) null; // : String"));
}

#[test]
fn test_literals_are_escaped_for_their_quotes() {
    let mut builder = TypeStoreBuilder::new();
    let string = TypeDescriptor::declared(&builder.declare_class("java.lang.String", &[]), []);
    let text = Expr::literal(Literal::String("say \"hi\"\n\u{1}".to_string()), string);
    assert_eq!(text.to_string(), r#""say \"hi\"\n\u0001""#);

    let quote = Expr::literal(Literal::Char('\''), PrimitiveType::Char.into());
    assert_eq!(quote.to_string(), r"'\''");
    let double_quote = Expr::literal(Literal::Char('"'), PrimitiveType::Char.into());
    assert_eq!(double_quote.to_string(), "'\"'");
}

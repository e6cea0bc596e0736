use fob_infer::{Category, InferError, InferOptions, Inference, SymbolTable, TableOptions, TagValue, Value};

fn compile(source: &str) -> (Inference, SymbolTable) {
    compile_with(source, InferOptions::default(), TableOptions::default())
}

fn compile_with(source: &str, options: InferOptions, table: TableOptions) -> (Inference, SymbolTable) {
    let mut inference = Inference::new(options);
    inference
        .compile("test.js", source)
        .expect("compilation should succeed");
    let table = inference.symbols(table);
    (inference, table)
}

#[test]
fn number_declaration_is_typed_and_valued() {
    let (inference, table) = compile("var a = 10;");

    let a = inference.symbol(table.get("a").expect("a is listed"));
    assert_eq!(a.types.to_string(), "number");
    assert_eq!(a.value, Value::Number(10.0));
}

#[test]
fn documented_parameter_gets_type_and_description() {
    let (mut inference, _) = compile("/** @param {string} x The name. */\nfunction F(x) {}");

    let f = inference.find_symbol("F", None).expect("F resolves");
    let func = inference.symbol(f).value.as_object().expect("F is an object");
    let params = inference.function(func).expect("F is a function").params.clone();
    assert_eq!(params.len(), 1);

    let x = inference.symbol(params[0]);
    assert_eq!(x.name, "x");
    assert!(x.types.contains(Category::String));
    assert_eq!(x.tags.text("desc"), Some("The name."));
}

#[test]
fn lends_moves_literal_members_into_named_object() {
    let (inference, table) = compile("var O = {};\n/** @lends O */ ({ p: 1 });");

    let p = inference.symbol(table.get("O.p").expect("O.p is listed"));
    assert_eq!(p.value, Value::Number(1.0));
    let members: Vec<&str> = table
        .ids()
        .filter(|id| *id == "p" || id.ends_with(".p"))
        .collect();
    assert_eq!(members, vec!["O.p"]);
}

#[test]
fn object_create_prototype_derives_extends() {
    let (inference, table) =
        compile("function A(){}\nfunction B(){}\nB.prototype = Object.create(A.prototype);");

    let b = inference.symbol(table.get("B").expect("B is listed"));
    assert_eq!(b.tags.get("extends"), Some(&TagValue::Text("A".into())));
    assert!(inference.symbol(table.get("A").expect("A")).tags.get("extends").is_none());
}

#[test]
fn undeclared_globals_are_placeholders_unless_strict() {
    let (inference, table) = compile_with(
        "foo.bar;",
        InferOptions::default(),
        TableOptions { missing: true },
    );
    for id in ["foo", "foo.bar"] {
        let symbol = inference.symbol(table.get(id).expect("placeholder is listed"));
        assert!(symbol.is_missing(), "{id} should be missing");
    }

    let (mut lenient, _) = compile("foo.bar;");
    assert!(matches!(
        lenient.try_find_symbol("foo.bar", None),
        Err(InferError::Unresolved { .. })
    ));

    let mut strict = Inference::new(InferOptions {
        strict: true,
        ..InferOptions::default()
    });
    let error = strict.compile("test.js", "foo.bar;").expect_err("strict fails");
    assert!(matches!(error, InferError::Unresolved { name } if name == "foo"));
}

#[test]
fn endless_loop_stops_at_the_bound() {
    let options = InferOptions {
        max_loops: 50,
        ..InferOptions::default()
    };
    let (inference, table) = compile_with(
        "var x = 0;\nwhile (true) { x++; }",
        options,
        TableOptions::default(),
    );
    let x = inference.symbol(table.get("x").expect("x is listed"));
    assert_eq!(x.value, Value::Number(50.0));
}

#[test]
fn repeated_access_returns_the_same_placeholder() {
    let mut inference = Inference::default();
    inference.compile("test.js", "var ns = {};").expect("compile");

    let first = inference.resolve_symbol("ns.later");
    let second = inference.resolve_symbol("ns.later");
    assert_eq!(first, second);
    assert!(inference.symbol(first).is_missing());
}

#[test]
fn units_share_the_global_namespace() {
    let mut inference = Inference::default();
    inference
        .compile("lib.js", "function Base() {}\nBase.prototype.run = function() {};")
        .expect("lib");
    inference
        .compile("app.js", "function Derived() {}\nDerived.prototype = new Base();")
        .expect("app");

    let table = inference.symbols(TableOptions::default());
    let derived = inference.symbol(table.get("Derived").expect("Derived"));
    assert_eq!(derived.tags.text("extends"), Some("Base"));
    assert_eq!(
        inference.symbol(table.get("Base#run").expect("Base#run")).source().as_deref(),
        Some("lib.js#2")
    );
}

#[test]
fn records_render_signatures() {
    let (inference, table) = compile(
        "/**\n * @param {number} a\n * @returns {string}\n */\nfunction label(a) { return 'n' + a; }",
    );
    let records = table.records(&inference);
    let label = records
        .iter()
        .find(|record| record.id == "label")
        .expect("label record");
    assert_eq!(
        label.signature.as_deref(),
        Some("function label(a:number):string")
    );
    assert_eq!(label.types, "function");
}

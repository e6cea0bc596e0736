//! The annotated fixture exercises most documentation tags together with the
//! prototype, for-in and builtin inference they interact with.

use fob_infer::{Category, InferOptions, Inference, Symbol, SymbolTable, TableOptions, TagValue, Value};

const FIXTURE: &str = include_str!("fixtures/fixture.js");

struct Fixture {
    inference: Inference,
    table: SymbolTable,
}

impl Fixture {
    fn load() -> Self {
        let mut inference = Inference::new(InferOptions {
            debug: true,
            ..InferOptions::default()
        });
        inference
            .compile("fixture.js", FIXTURE)
            .expect("fixture should compile");
        let table = inference.symbols(TableOptions::default());
        Self { inference, table }
    }

    fn get(&self, id: &str) -> &Symbol {
        let symbol = self
            .table
            .get(id)
            .unwrap_or_else(|| panic!("{id} should be listed"));
        self.inference.symbol(symbol)
    }

    fn tag(&self, id: &str, tag: &str) -> Option<&TagValue> {
        self.get(id).tags.get(tag)
    }

    fn text(&self, id: &str, tag: &str) -> Option<&str> {
        self.get(id).tags.text(tag)
    }

    fn params(&self, id: &str) -> Vec<&Symbol> {
        let func = self.get(id).value.as_object().expect("function value");
        self.inference
            .function(func)
            .expect("function data")
            .params
            .iter()
            .map(|param| self.inference.symbol(*param))
            .collect()
    }
}

#[test]
fn functions_and_globals_are_listed() {
    let fixture = Fixture::load();
    for id in [
        "Doctor", "deprecated", "deprecated2", "param0", "param1", "param2", "param3", "param4",
        "param5", "param6", "private", "protected", "public", "returns1", "returns2", "returns3",
        "constructor", "final", "Person", "Const", "Constant", "Teacher", "global", "globalObj",
    ] {
        assert!(fixture.table.contains(id), "{id} should be listed");
    }

    assert!(fixture.get("Doctor").types.contains(Category::Function));
    assert_eq!(fixture.get("Const").value, Value::Number(100.0));
    assert_eq!(fixture.get("Constant").value, Value::String("200".into()));
    assert_eq!(fixture.get("global").value, Value::Number(100.0));
    assert!(fixture.get("globalObj").types.contains(Category::Object));
    assert!(fixture.table.contains("globalObj.abstract"));
    assert_eq!(fixture.get("Person").source().as_deref(), Some("fixture.js#8"));
}

#[test]
fn parameters_come_from_code_and_tags() {
    let fixture = Fixture::load();

    let param0 = fixture.params("param0");
    assert_eq!(param0.len(), 1);
    assert_eq!(param0[0].name, "targetName");
    assert!(param0[0].types.contains(Category::String));
    assert!(param0[0].types.contains(Category::Number));
    assert_eq!(param0[0].types.other(), ["Array<String>".to_string()]);
    assert_eq!(
        param0[0].tags.text("desc"),
        Some("The name (or names) of what to find.")
    );

    let param2 = fixture.params("param2");
    assert_eq!(param2.len(), 2);
    assert_eq!(param2[0].name, "callback");
    assert!(param2[0].types.contains(Category::Function));
    assert!(param2[1].types.contains(Category::Object));

    assert_eq!(fixture.params("param3")[0].name, "id");

    let param4 = fixture.params("param4");
    assert_eq!(param4[0].name, "...");
    assert_eq!(param4[0].tags.text("desc"), Some("Two or more elements."));
}

#[test]
fn prototypes_use_hash_ids() {
    let fixture = Fixture::load();

    assert!(fixture.get("Doctor#").tags.has("proto"));
    let say = fixture.get("Doctor#say");
    assert!(say.types.contains(Category::Function));
    assert_eq!(say.tags.text("desc"), Some("Says nothing"));

    assert!(fixture.get("prototype").types.contains(Category::Function));
    assert!(!fixture.get("prototype").tags.has("proto"));

    let static_var = fixture.get("Doctor.staticVar");
    assert_eq!(static_var.value, Value::Number(300.0));
    assert!(static_var.tags.has("readonly"));
    assert!(static_var.tags.has("static"));
    assert!(!static_var.tags.has("global"));
}

#[test]
fn unary_operators_are_evaluated() {
    let fixture = Fixture::load();
    let value = |id: &str| fixture.get(id).value.clone();

    assert_eq!(value("unary.type"), Value::String("string".into()));
    assert!(fixture.get("unary.type").types.contains(Category::String));
    assert_eq!(value("unary.fn"), Value::String("function".into()));
    assert_eq!(value("unary.obj"), Value::String("object".into()));
    assert_eq!(value("unary.str"), Value::String("string".into()));
    assert_eq!(value("unary.num"), Value::String("number".into()));
    assert_eq!(value("unary.plus"), Value::Number(10.0));
    assert_eq!(value("unary.neg"), Value::Number(-10.0));
    assert_eq!(value("unary.und"), Value::Undefined);
    assert_eq!(value("unary.del"), Value::Bool(true));
}

#[test]
fn for_in_walks_the_known_properties() {
    let fixture = Fixture::load();

    assert_eq!(fixture.get("i").value, Value::String("CANCELCANCEL".into()));
    assert_eq!(fixture.get("enumerate.OKOK").value, Value::String("OK".into()));
    assert_eq!(
        fixture.get("enumerate.CANCELCANCEL").value,
        Value::String("CANCEL".into())
    );
}

#[test]
fn builtins_stay_hidden_but_reachable() {
    let fixture = Fixture::load();

    assert!(!fixture.get("Object.create").is_missing());
    assert!(!fixture.table.contains("Object"));
    assert!(!fixture.table.contains("window"));
}

#[test]
fn file_documentation_lands_on_the_unit() {
    let fixture = Fixture::load();
    let file = fixture.inference.file("fixture.js").expect("unit registered");
    let tags = &fixture.inference.symbol(file.symbol).tags;

    assert_eq!(tags.text("author"), Some("Giancarlo Bellido"));
    assert_eq!(tags.text("license"), Some("GPLv2"));
    assert_eq!(tags.text("desc"), Some("Test file for cxl-docs"));
    assert!(fixture.tag("Person", "author").is_none());
}

#[test]
fn structural_tags() {
    let fixture = Fixture::load();

    assert!(fixture.get("globalObj.abstract").tags.has("abstract"));
    assert!(fixture.get("globalObj.virtual").tags.has("abstract"));
    assert_eq!(fixture.text("scope", "alias"), Some("<root>"));
    assert_eq!(fixture.text("deprecated2", "alias"), Some("deprecated"));
    assert!(fixture.get("Hurl").tags.has("class"));
    assert!(fixture.get("Const").tags.has("constant"));
    assert!(fixture.get("Constant").tags.has("constant"));
    assert_eq!(fixture.tag("constructor", "constructor"), Some(&TagValue::Flag(true)));
    assert!(fixture.get("constructor").tags.has("namespace"));
    assert!(fixture.get("enumerate").tags.has("enum"));
    assert!(fixture.get("mixin").tags.has("mixin"));
    assert!(fixture.get("Person#say").tags.has("method"));
    assert!(fixture.get("Person#property").tags.has("property"));
    assert!(fixture.get("enumerate.CANCEL").tags.has("property"));
}

#[test]
fn authorship_and_lifecycle_tags() {
    let fixture = Fixture::load();

    assert_eq!(
        fixture.text("Doctor", "author"),
        Some("Author Name <email@gmail.com>")
    );
    assert_eq!(fixture.text("Doctor", "copyright"), Some("Copyright Message"));
    assert!(fixture.get("deprecated").tags.has("deprecated"));
    assert_eq!(fixture.text("deprecated2", "deprecated"), Some("since v2.0"));
    assert_eq!(fixture.text("requires", "requires"), Some("cxl"));
    assert_eq!(fixture.text("since", "since"), Some("1.2.3"));
    assert_eq!(fixture.text("since", "version"), Some("1.2.3"));
    assert_eq!(
        fixture.text("summary", "summary"),
        Some("I do not like green eggs and ham!")
    );
}

#[test]
fn inheritance_is_derived_and_declared() {
    let fixture = Fixture::load();

    assert_eq!(fixture.text("Doctor", "extends"), Some("Person"));
    assert_eq!(fixture.text("deprecated", "extends"), Some("Person"));
    assert_eq!(fixture.text("Teacher", "extends"), Some("Person"));
}

#[test]
fn lends_and_constructs_build_person() {
    let fixture = Fixture::load();

    for id in ["Person#say", "Person#private", "Person#protected", "lends", "lends.prop1"] {
        assert!(fixture.table.contains(id), "{id} should be listed");
    }
    assert_eq!(fixture.text("Person#initialize", "constructs"), Some("Person"));
    assert!(fixture.get("Person#private").tags.has("private"));
    assert!(fixture.get("Person").tags.has("class"));
}

#[test]
fn named_and_external_symbols() {
    let fixture = Fixture::load();

    assert!(fixture.table.contains("highlightSearchTerm"));
    assert!(fixture.get("String").tags.has("external"));
    assert_eq!(
        fixture.text("String", "see"),
        Some(
            "{@link https://developer.mozilla.org/en/JavaScript/Reference/Global_Objects/String String}"
        )
    );
    assert!(fixture.get("Hurl#snowball").tags.has("event"));
    assert!(fixture.get("Hurl#footballMatch").tags.has("event"));
    assert_eq!(fixture.tag("callback", "callback"), Some(&TagValue::Flag(true)));
    assert!(fixture.get("requestResponseCallback").tags.has("callback"));
}

#[test]
fn visibility_and_ignore() {
    let fixture = Fixture::load();

    assert!(fixture.get("private").tags.has("private"));
    assert!(!fixture.get("private").tags.has("public"));
    assert!(fixture.get("protected").tags.has("protected"));
    assert!(fixture.get("public").tags.has("public"));
    assert!(fixture.get("global").tags.has("global"));
    assert!(fixture.get("Constant").tags.has("global"));

    assert!(fixture.tag("ignore", "desc").is_none());
    assert!(fixture.tag("ignored", "desc").is_some());
}

#[test]
fn returns_this_throws_and_todo() {
    let fixture = Fixture::load();

    assert_eq!(
        fixture.text("returns1", "returns"),
        Some("The names of the found item(s).")
    );
    let returns1 = fixture.get("returns1").value.as_object().expect("function");
    let returns = fixture
        .inference
        .function(returns1)
        .and_then(|data| data.returns.as_ref())
        .expect("declared return type");
    assert_eq!(returns.other(), ["Array<String>".to_string()]);
    assert_eq!(
        fixture.text("returns3", "returns"),
        Some("An object to be passed to {returns1}.")
    );

    let throws1 = fixture.get("throws1");
    assert_eq!(
        throws1.tags.get("throws"),
        Some(&TagValue::List(vec![
            "{ErrorType}".into(),
            "Throws an error message.".into()
        ]))
    );
    assert_eq!(
        throws1.tags.get("todo"),
        Some(&TagValue::List(vec![
            "Make it work.".into(),
            "Second".into(),
            "Third".into()
        ]))
    );

    let func = throws1.value.as_object().expect("function");
    let scope = fixture.inference.function(func).expect("function data").scope;
    let this = fixture
        .inference
        .object(scope)
        .own("this")
        .map(|this| fixture.inference.symbol(this))
        .expect("this binding");
    assert_eq!(this.tags.text("desc"), Some("description for symbol."));
    assert_eq!(this.types.other(), ["Type".to_string()]);
}

#[test]
fn declared_types() {
    let fixture = Fixture::load();

    let type1 = fixture.get("type1");
    assert!(type1.types.contains(Category::String));
    assert_eq!(type1.types.other(), ["Array<string>".to_string()]);
    assert_eq!(fixture.get("type2").types.other(), ["integer".to_string()]);
}

//! Tests for the signature index and callee resolution.

use detrail::call::Callee;
use detrail::signatures::SignatureIndex;
use detrail::value::ArgValue;
use ruff_python_parser::parse_module;

fn index_of(source: &str) -> SignatureIndex {
    let parsed = parse_module(source).expect("test module should parse");
    SignatureIndex::build(&parsed.into_syntax().body)
}

fn function(name: &str) -> Callee {
    Callee::Function {
        name: name.to_owned(),
    }
}

fn static_call(class: &str, name: &str) -> Callee {
    Callee::Static {
        class: class.to_owned(),
        name: name.to_owned(),
    }
}

fn int(text: &str) -> ArgValue {
    ArgValue::Int(text.to_owned())
}

#[test]
fn module_level_function_defaults_are_indexed() {
    let index = index_of("def f(a, b=2, c=3):\n    pass\n");
    let defaults = index.defaults_for(&function("f"), None, 3);
    assert!(defaults.get(0).is_none());
    assert!(defaults.get(1).is_some_and(|v| v.proven_equal(&int("2"))));
    assert!(defaults.get(2).is_some_and(|v| v.proven_equal(&int("3"))));
}

#[test]
fn positions_past_the_declaration_are_unknown() {
    let index = index_of("def f(a=1):\n    pass\n");
    let defaults = index.defaults_for(&function("f"), None, 3);
    assert!(defaults.get(0).is_some());
    assert!(defaults.get(1).is_none());
    assert!(defaults.get(2).is_none());
}

#[test]
fn positional_only_parameters_count_toward_positions() {
    let index = index_of("def f(a, /, b=5):\n    pass\n");
    let defaults = index.defaults_for(&function("f"), None, 2);
    assert!(defaults.get(0).is_none());
    assert!(defaults.get(1).is_some_and(|v| v.proven_equal(&int("5"))));
}

#[test]
fn unknown_names_resolve_to_nothing() {
    let index = index_of("def f(a=1):\n    pass\n");
    let defaults = index.defaults_for(&function("g"), None, 1);
    assert!(defaults.get(0).is_none());
}

#[test]
fn redefined_functions_resolve_to_nothing() {
    let index = index_of("def f(a=1):\n    pass\n\ndef f(a=2):\n    pass\n");
    let defaults = index.defaults_for(&function("f"), None, 1);
    assert!(defaults.get(0).is_none());
}

#[test]
fn decorated_functions_resolve_to_nothing() {
    let index = index_of("@lru_cache\ndef f(a=1):\n    pass\n");
    let defaults = index.defaults_for(&function("f"), None, 1);
    assert!(defaults.get(0).is_none());
}

#[test]
fn assignment_over_a_def_resolves_to_nothing() {
    let index = index_of("def f(a=1):\n    pass\n\nf = wrap(f)\n");
    let defaults = index.defaults_for(&function("f"), None, 1);
    assert!(defaults.get(0).is_none());
}

#[test]
fn instance_methods_shift_for_self() {
    let source = "\
class C:
    def m(self, a=1, b=2):
        pass
";
    let index = index_of(source);
    let defaults = index.defaults_for(
        &Callee::Method {
            name: "m".to_owned(),
        },
        Some("C"),
        2,
    );
    assert!(defaults.get(0).is_some_and(|v| v.proven_equal(&int("1"))));
    assert!(defaults.get(1).is_some_and(|v| v.proven_equal(&int("2"))));
}

#[test]
fn self_calls_outside_a_class_resolve_to_nothing() {
    let source = "\
class C:
    def m(self, a=1):
        pass
";
    let index = index_of(source);
    let defaults = index.defaults_for(
        &Callee::Method {
            name: "m".to_owned(),
        },
        None,
        1,
    );
    assert!(defaults.get(0).is_none());
}

#[test]
fn class_reached_instance_methods_do_not_shift() {
    let source = "\
class C:
    def m(self, a=1):
        pass
";
    let index = index_of(source);
    let defaults = index.defaults_for(&static_call("C", "m"), None, 2);
    // Position 0 is the explicit instance; position 1 lines up with `a`.
    assert!(defaults.get(0).is_none());
    assert!(defaults.get(1).is_some_and(|v| v.proven_equal(&int("1"))));
}

#[test]
fn classmethods_shift_for_cls() {
    let source = "\
class C:
    @classmethod
    def make(cls, size=10):
        pass
";
    let index = index_of(source);
    let defaults = index.defaults_for(&static_call("C", "make"), None, 1);
    assert!(defaults.get(0).is_some_and(|v| v.proven_equal(&int("10"))));
}

#[test]
fn staticmethods_do_not_shift() {
    let source = "\
class C:
    @staticmethod
    def pack(size=10):
        pass
";
    let index = index_of(source);
    let defaults = index.defaults_for(&static_call("C", "pack"), None, 1);
    assert!(defaults.get(0).is_some_and(|v| v.proven_equal(&int("10"))));
}

#[test]
fn unknown_decorators_poison_the_method() {
    let source = "\
class C:
    @property
    def m(self, a=1):
        pass
";
    let index = index_of(source);
    let defaults = index.defaults_for(&static_call("C", "m"), None, 2);
    assert!(defaults.get(1).is_none());
}

#[test]
fn constructors_resolve_through_init() {
    let source = "\
class Point:
    def __init__(self, x=0, y=0):
        pass
";
    let index = index_of(source);
    assert!(index.is_class("Point"));
    let defaults = index.defaults_for(&function("Point"), None, 2);
    assert!(defaults.get(0).is_some_and(|v| v.proven_equal(&int("0"))));
    assert!(defaults.get(1).is_some_and(|v| v.proven_equal(&int("0"))));
}

#[test]
fn classes_without_init_resolve_to_nothing() {
    let index = index_of("class Empty:\n    pass\n");
    assert!(index.is_class("Empty"));
    let defaults = index.defaults_for(&function("Empty"), None, 1);
    assert!(defaults.get(0).is_none());
}

#[test]
fn decorated_classes_are_skipped_entirely() {
    let source = "\
@dataclass
class Config:
    def __init__(self, debug=False):
        pass
";
    let index = index_of(source);
    assert!(!index.is_class("Config"));
    let defaults = index.defaults_for(&static_call("Config", "__init__"), None, 2);
    assert!(defaults.get(1).is_none());
}

#[test]
fn receiver_and_dynamic_callees_resolve_to_nothing() {
    let index = index_of("def f(a=1):\n    pass\n");
    let receiver = Callee::Receiver {
        name: "f".to_owned(),
    };
    assert!(index.defaults_for(&receiver, None, 1).get(0).is_none());
    assert!(index.defaults_for(&Callee::Dynamic, None, 1).get(0).is_none());
}

#[test]
fn unrepresentable_defaults_never_match() {
    let index = index_of("def f(a=make()):\n    pass\n");
    let defaults = index.defaults_for(&function("f"), None, 1);
    // The slot exists but its value is opaque; nothing proves equal to it.
    match defaults.get(0) {
        Some(value) => assert!(!value.proven_equal(value)),
        None => {}
    }
}

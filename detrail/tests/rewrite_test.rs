//! End-to-end rewrite tests: source text in, rewritten source text out.

use detrail::engine::Detrail;
use std::path::Path;

/// Rewrites a snippet; `None` means the source is already clean.
fn rewrite(source: &str) -> Option<String> {
    Detrail::default()
        .rewrite_source(source, Path::new("snippet.py"))
        .expect("snippet should parse")
        .rewritten
}

fn rewritten(source: &str) -> String {
    rewrite(source).expect("snippet should change")
}

#[test]
fn removes_a_fully_redundant_argument_list() {
    let source = "def greet(name=\"world\", punct=\"!\"):\n    pass\n\ngreet(\"world\", \"!\")\n";
    let result = rewritten(source);
    assert!(result.ends_with("greet()\n"), "got: {result}");
}

#[test]
fn removes_only_the_matching_tail() {
    let source = "def f(a=1, b=2):\n    pass\n\nf(5, 2)\n";
    assert!(rewritten(source).ends_with("f(5)\n"));
}

#[test]
fn an_early_match_alone_is_not_removable() {
    // Position 0 matches its default, but removing it would shift the
    // binding of position 1.
    let source = "def f(a=1, b=2):\n    pass\n\nf(1, 3)\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn a_mismatched_last_argument_blocks_every_earlier_match() {
    let source = "def f(a=1, b=2, c=3):\n    pass\n\nf(1, 2, 9)\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn arguments_swallowed_by_a_vararg_are_kept() {
    // Position 1 lands in *rest, which has no default to compare against,
    // so even the matching position 0 stays.
    let source = "def f(a=1, *rest):\n    pass\n\nf(1, 2)\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn builtin_calls_are_left_alone() {
    let source = "print(\"a\", \"b\")\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn a_user_definition_shadowing_a_builtin_is_still_skipped() {
    // The call site cannot be trusted to reach the shadowing definition.
    let source = "def len(x, strict=True):\n    return 0\n\nlen([1], True)\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn zero_argument_calls_are_untouched() {
    let source = "def f(a=1):\n    pass\n\nf()\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn keyword_arguments_disable_the_rewrite() {
    let source = "def f(a=1, b=2, c=3):\n    pass\n\nf(1, 2, c=3)\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn starred_arguments_disable_the_rewrite() {
    let source = "def f(a=1, b=2):\n    pass\n\nargs = [1]\nf(1, *args)\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn arguments_after_a_spread_are_untouched() {
    // The parameter position of `2` depends on how many values the spread
    // expands to.
    let source = "def f(a=1, b=2):\n    pass\n\nargs = [1]\nf(*args, 2)\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn unknown_functions_are_untouched() {
    let source = "import lib\n\nlib.call(1, 2)\nother(1, 2)\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn decorated_functions_are_not_trusted() {
    let source = "@cache\ndef f(a=1, b=2):\n    pass\n\nf(1, 2)\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn reassigned_function_names_are_not_trusted() {
    let source = "def f(a=1):\n    pass\n\nf = make_stub()\nf(1)\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn self_method_calls_are_rewritten() {
    let source = "\
class Greeter:
    def greet(self, name=\"world\", punct=\"!\"):
        pass

    def run(self):
        self.greet(\"world\", \"!\")
";
    assert!(rewritten(source).ends_with("self.greet()\n"));
}

#[test]
fn calls_through_an_unknown_receiver_are_untouched() {
    let source = "\
class Greeter:
    def greet(self, name=\"world\"):
        pass

g = make_greeter()
g.greet(\"world\")
";
    assert_eq!(rewrite(source), None);
}

#[test]
fn class_reached_methods_keep_the_explicit_instance() {
    let source = "\
class Greeter:
    def greet(self, name=\"world\", punct=\"!\"):
        pass

def run(g):
    Greeter.greet(g, \"world\", \"!\")
";
    assert!(rewritten(source).ends_with("Greeter.greet(g)\n"));
}

#[test]
fn classmethod_calls_shift_past_cls() {
    let source = "\
class Box:
    @classmethod
    def make(cls, size=10):
        return cls()

Box.make(10)
";
    assert!(rewritten(source).ends_with("Box.make()\n"));
}

#[test]
fn staticmethod_calls_do_not_shift() {
    let source = "\
class Box:
    @staticmethod
    def pack(size=10):
        pass

Box.pack(10)
";
    assert!(rewritten(source).ends_with("Box.pack()\n"));
}

#[test]
fn constructor_calls_use_init_defaults() {
    let source = "\
class Point:
    def __init__(self, x=0, y=0):
        self.x = x
        self.y = y

p = Point(0, 0)
";
    assert!(rewritten(source).ends_with("p = Point()\n"));
}

#[test]
fn dotted_constant_defaults_match_by_spelling() {
    let source = "\
import config

def connect(timeout=config.TIMEOUT):
    pass

connect(config.TIMEOUT)
";
    assert!(rewritten(source).ends_with("connect()\n"));
}

#[test]
fn call_valued_defaults_are_never_matched() {
    // `make()` may return anything; same spelling proves nothing.
    let source = "def f(a=make()):\n    pass\n\nf(make())\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn container_defaults_match_by_content() {
    let source = "def f(tags=(\"a\", \"b\")):\n    pass\n\nf((\"a\", \"b\"))\n";
    assert!(rewritten(source).ends_with("f()\n"));
}

#[test]
fn suppression_comment_keeps_the_call() {
    let source = "def f(a=1, b=2):\n    pass\n\nf(1, 2)  # noqa: DTR001\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn pragma_comment_keeps_the_call() {
    let source = "def f(a=1, b=2):\n    pass\n\nf(1, 2)  # pragma: no detrail\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn nested_calls_are_rewritten_independently() {
    let source = "def f(a=1, b=2):\n    pass\n\ndef g(x):\n    return x\n\ng(f(1, 2))\n";
    assert!(rewritten(source).ends_with("g(f())\n"));
}

#[test]
fn multiline_calls_collapse_to_empty_parens() {
    let source = "\
def configure(host=\"localhost\", port=8080, debug=False):
    pass

configure(
    \"localhost\",
    8080,
    False,
)
";
    assert!(rewritten(source).ends_with("configure()\n"));
}

#[test]
fn multiline_calls_with_a_live_argument_stay_put() {
    let source = "\
def configure(host=\"localhost\", port=8080, debug=False):
    pass

configure(
    \"localhost\",
    8080,
    True,
)
";
    assert_eq!(rewrite(source), None);
}

#[test]
fn several_call_sites_are_rewritten_in_one_pass() {
    let source = "\
def f(a=1, b=2):
    pass

f(1, 2)
f(5, 2)
f(5, 9)
";
    let result = rewritten(source);
    assert!(result.contains("f()\n"));
    assert!(result.contains("f(5)\n"));
    assert!(result.contains("f(5, 9)\n"));
}

#[test]
fn rewriting_is_idempotent() {
    let source = "def f(a=1, b=2):\n    pass\n\nf(1, 2)\nf(5, 2)\n";
    let once = rewritten(source);
    assert_eq!(rewrite(&once), None);
}

#[test]
fn removed_arguments_can_be_reconstructed_from_the_defaults() {
    let source = "def f(a=1, b=2):\n    pass\n\nf(5, 2)\n";
    let result = rewritten(source);
    assert!(result.ends_with("f(5)\n"));
    // Reinserting the declared default at the removed position restores the
    // original call.
    let reconstructed = result.replace("f(5)", "f(5, 2)");
    assert_eq!(reconstructed, source);
}

#[test]
fn int_formatting_is_insignificant() {
    let source = "def f(limit=1_000):\n    pass\n\nf(1000)\n";
    assert!(rewritten(source).ends_with("f()\n"));
}

#[test]
fn string_quoting_is_insignificant() {
    let source = "def f(mode='strict'):\n    pass\n\nf(\"strict\")\n";
    assert!(rewritten(source).ends_with("f()\n"));
}

#[test]
fn int_does_not_match_float_default() {
    let source = "def f(scale=1.0):\n    pass\n\nf(1)\n";
    assert_eq!(rewrite(source), None);
}

#[test]
fn negative_number_defaults_match() {
    let source = "def f(offset=-1):\n    pass\n\nf(-1)\n";
    assert!(rewritten(source).ends_with("f()\n"));
}

#[test]
fn findings_carry_location_and_counts() {
    let source = "def f(a=1, b=2):\n    pass\n\nf(5, 2)\n";
    let rewrite = Detrail::default()
        .rewrite_source(source, Path::new("pkg/app.py"))
        .expect("snippet should parse");
    assert_eq!(rewrite.findings.len(), 1);
    assert_eq!(rewrite.arguments_removable, 1);
    let finding = &rewrite.findings[0];
    assert_eq!(finding.rule_id, "DTR001");
    assert_eq!(finding.line, 4);
    assert_eq!(finding.col, 1);
    assert_eq!(finding.callee, "f");
    assert_eq!(finding.removable, 1);
}

#[test]
fn calls_inside_default_expressions_are_rewritten() {
    let source = "\
def f(a=1, b=2):
    pass

def g(x=f(1, 2)):
    pass
";
    assert!(rewritten(source).contains("def g(x=f()):"));
}

#[test]
fn parse_errors_are_reported_not_swallowed() {
    let err = Detrail::default()
        .rewrite_source("def broken(:\n", Path::new("broken.py"))
        .expect_err("syntax error should be reported");
    assert!(err.error.contains("parse"));
}

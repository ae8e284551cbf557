//! Python detection with indentation extents

use super::{row, summarize};
use crate::extract::{extract, FunctionKind, LanguageFamily};

const MODULE: &str = "import os

class Outer:
    class Inner:
        def method(self, a,
                   b):
            return a + b

        # trailing comment
    def __init__(self):
        pass

async def fetch(url):
    def helper():
        return url
    return helper()

def last():
    return 1
";

#[test]
fn test_module_definitions() {
    let records = extract(MODULE, LanguageFamily::Python);

    assert_eq!(
        summarize(&records),
        vec![
            row(FunctionKind::Method, "Outer.Inner.method", 5, 7),
            row(FunctionKind::Constructor, "Outer.__init__", 10, 11),
            row(FunctionKind::AsyncFunction, "fetch", 13, 16),
            row(FunctionKind::Function, "helper", 14, 15),
            row(FunctionKind::Function, "last", 18, 19),
        ]
    );
}

#[test]
fn test_one_line_definition() {
    let records = extract("def f(): return 1\nx = f()\n", LanguageFamily::Python);
    assert_eq!(
        summarize(&records),
        vec![row(FunctionKind::Function, "f", 1, 1)]
    );
}

#[test]
fn test_function_nested_in_method_keeps_class_prefix() {
    let source = "class Service:\n    def run(self):\n        def step():\n            pass\n        step()\n";
    let records = extract(source, LanguageFamily::Python);

    assert_eq!(
        summarize(&records),
        vec![
            row(FunctionKind::Method, "Service.run", 2, 5),
            row(FunctionKind::Function, "Service.step", 3, 4),
        ]
    );
}

#[test]
fn test_unbalanced_signature_runs_to_end_of_file() {
    let records = extract("def broken(a,\n    b", LanguageFamily::Python);
    assert_eq!(
        summarize(&records),
        vec![row(FunctionKind::Function, "broken", 1, 2)]
    );
}

#[test]
fn test_tabs_count_as_eight_columns() {
    let source = "class T:\n\tdef m(self):\n\t\treturn 1\n        def n(self):\n\t\tpass\n";
    let records = extract(source, LanguageFamily::Python);

    assert_eq!(
        summarize(&records),
        vec![
            row(FunctionKind::Method, "T.m", 2, 3),
            row(FunctionKind::Method, "T.n", 4, 5),
        ]
    );
}

#[test]
fn test_brackets_in_default_strings_do_not_extend_signature() {
    let source = "import os\ndef f(x=\"(\"): return x\nvalue = 1\n";
    let records = extract(source, LanguageFamily::Python);
    assert_eq!(
        summarize(&records),
        vec![row(FunctionKind::Function, "f", 2, 2)]
    );
}

#[test]
fn test_closing_paren_at_baseline_ends_signature() {
    let source = "\
def build(
    name,
    size=\"[big]\",  # trailing (
):
    return name
print(build('x'))
";
    let records = extract(source, LanguageFamily::Python);
    assert_eq!(
        summarize(&records),
        vec![row(FunctionKind::Function, "build", 1, 5)]
    );
}

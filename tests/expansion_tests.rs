//! End-to-end expansion tests against an in-memory host.

mod common;

use std::path::PathBuf;

use common::{
    assert_both, config, diagnostic_kinds, expand, expand_both, host_with, math_host, MATH,
};
use inline_expand::{ErrorCategory, ExpandConfig, InlineError, Strategy};

#[test]
fn two_sites_expand_in_one_transform() {
    let source = "var a = %inline('./lib/math').double(x);\nvar b = %inline('./lib/math').square(y + 1);\n";
    let (reparse, sweep) = assert_both(
        &[("src/lib/math.js", MATH)],
        source,
        "var a = x * 2;\nvar b = (y + 1) * (y + 1);\n",
    );
    for run in [&reparse, &sweep] {
        assert!(run.host.diagnostics.is_empty());
        assert!(run.host.cacheable);
        assert_eq!(run.host.dependencies, vec![PathBuf::from("src/lib/math.js")]);
    }
}

#[test]
fn every_export_idiom_is_inlinable() {
    let idioms = "\
function twice(x) { return x * 2; }
var half = function (x) { return x / 2; };
module.exports = { twice, half, neg: function (x) { return -x; } };
";
    let util = "export default class Util {\n  static inc(x) { return x + 1; }\n}\n";
    let source = "\
t = %inline('./lib/idioms').twice(a);
h = %inline('./lib/idioms').half(b);
n = %inline('./lib/idioms').neg(c);
i = %inline('./lib/util').inc(d);
";
    assert_both(
        &[("src/lib/idioms.js", idioms), ("src/lib/util.js", util)],
        source,
        "t = a * 2;\nh = b / 2;\nn = -c;\ni = d + 1;\n",
    );
}

#[test]
fn statement_sites_splice_whole_bodies() {
    let source = "function run() {\n  %inline('./lib/math').report('total', sum);\n  return sum;\n}\n";
    assert_both(
        &[("src/lib/math.js", MATH)],
        source,
        "function run() {\n  console.log('total');\n  console.log(sum);\n  return sum;\n}\n",
    );
}

#[test]
fn arity_mismatch_degrades_to_placeholder() {
    let source = "var a = %inline('./lib/math').clamp(v, 0);\nvar b = %inline('./lib/math').double(v);\n";
    let expected = "var a = (void 0 /* %inline failed: 'clamp' takes 3 argument(s) but 2 were supplied */);\nvar b = v * 2;\n";
    let (reparse, sweep) = assert_both(&[("src/lib/math.js", MATH)], source, expected);
    for run in [&reparse, &sweep] {
        assert!(matches!(
            run.host.diagnostics.as_slice(),
            [InlineError::ArityMismatch {
                expected: 3,
                actual: 2,
                ..
            }]
        ));
        assert_eq!(run.host.diagnostics[0].category(), ErrorCategory::Expansion);
    }
}

#[test]
fn missing_module_reports_tried_paths() {
    let source = "%inline('./nope').f(1);\nok();\n";
    let (reparse, sweep) = expand_both(&[], source);
    for run in [&reparse, &sweep] {
        assert!(run
            .output
            .starts_with("/* %inline failed: cannot find module './nope' (tried src/nope, src/nope.js) */"));
        assert!(run.output.ends_with("\nok();\n"));
        assert_eq!(diagnostic_kinds(&run.host.diagnostics), vec!["module_not_found"]);
        assert!(run.host.dependencies.is_empty());
    }
}

#[test]
fn unknown_function_lists_available_exports() {
    let mut host = math_host();
    let output = expand(
        &mut host,
        "x = %inline('./lib/math').cube(2);",
        &ExpandConfig::default(),
    );
    assert!(output.starts_with("x = (void 0 /* %inline failed: function 'cube' is not exported by './lib/math' */"));
    match host.diagnostics.as_slice() {
        [InlineError::UnknownFunction {
            available, help, ..
        }] => {
            assert_eq!(available, &["clamp", "double", "report", "square"]);
            assert!(help.contains("double"));
        }
        other => panic!("unexpected diagnostics {:?}", other),
    }
}

#[test]
fn unparseable_module_is_a_syntax_diagnostic() {
    let (reparse, sweep) = expand_both(
        &[("src/lib/broken.js", "export function (")],
        "y = %inline('./lib/broken').f(1);\nz = 2;\n",
    );
    for run in [&reparse, &sweep] {
        assert!(run.output.contains("%inline failed: failed to parse module './lib/broken'"));
        assert!(run.output.ends_with("\nz = 2;\n"));
        assert_eq!(diagnostic_kinds(&run.host.diagnostics), vec!["parse"]);
        assert_eq!(run.host.diagnostics[0].category(), ErrorCategory::Syntax);
    }
}

#[test]
fn host_syntax_error_returns_source_unchanged() {
    let mut host = math_host();
    let source = "var a = %inline('./lib/math').double(1);\nvar = ;\n";
    let output = expand(&mut host, source, &ExpandConfig::default());
    assert_eq!(output, source);
    assert_eq!(diagnostic_kinds(&host.diagnostics), vec!["host_syntax"]);
}

#[test]
fn sites_inside_arguments_expand_on_later_passes() {
    let mut host = math_host();
    let output = expand(
        &mut host,
        "r = %inline('./lib/math').double(%inline('./lib/math').square(z));",
        &ExpandConfig::default(),
    );
    assert_eq!(output, "r = (z * z) * 2;");
    assert!(host.diagnostics.is_empty());
}

#[test]
fn only_reparse_is_range_exact_within_a_line() {
    let source = "a = %inline('./lib/math').double(1); b = %inline('./lib/math').double(2);\n";
    let (reparse, sweep) = expand_both(&[("src/lib/math.js", MATH)], source);
    assert_eq!(reparse.output, "a = 1 * 2; b = 2 * 2;\n");
    assert_eq!(
        sweep.output,
        "a = 1 * 2; b = %inline('./lib/math').double(2);\n"
    );
}

#[test]
fn shadowed_parameters_survive_inlining() {
    let module = "\
export function count(n) {
  for (var n = 0; n < 3; n++) {
    tick(n);
  }
}
export function scale(k) {
  return items.map((k) => k * 2).concat([k]);
}
";
    let source = "%inline('./lib/loops').count(limit);\nout = %inline('./lib/loops').scale(factor);\n";
    assert_both(
        &[("src/lib/loops.js", module)],
        source,
        "for (var n = 0; n < 3; n++) {\n  tick(n);\n}\nout = items.map((k) => k * 2).concat([factor]);\n",
    );
}

// ============================================================================
// NESTED EXPANSION
// ============================================================================

const OUTER: &str = "export function outer(x) {\n  return %inline('./inner').inner(x + 1);\n}\n";
const INNER: &str = "export function inner(y) { return y * 3; }\n";

#[test]
fn nested_sites_need_recursive_mode() {
    let mut host = host_with(&[("src/lib/outer.js", OUTER), ("src/lib/inner.js", INNER)]);
    let output = expand(
        &mut host,
        "r = %inline('./lib/outer').outer(v);",
        &ExpandConfig::default(),
    );
    assert!(output.starts_with("r = (void 0 /* %inline failed: "));
    assert_eq!(diagnostic_kinds(&host.diagnostics), vec!["nested_expansion"]);
}

#[test]
fn recursive_mode_expands_target_modules_first() {
    for strategy in [Strategy::Reparse, Strategy::Sweep] {
        let mut host = host_with(&[("src/lib/outer.js", OUTER), ("src/lib/inner.js", INNER)]);
        let config = ExpandConfig {
            recursive: true,
            ..config(strategy)
        };
        let output = expand(&mut host, "r = %inline('./lib/outer').outer(v);\n", &config);
        assert_eq!(output, "r = (v + 1) * 3;\n", "{:?}", strategy);
        assert!(host.diagnostics.is_empty());
        assert_eq!(
            host.dependencies,
            vec![
                PathBuf::from("src/lib/outer.js"),
                PathBuf::from("src/lib/inner.js")
            ]
        );
    }
}

#[test]
fn self_including_module_is_a_cycle() {
    let mut host = host_with(&[(
        "src/lib/loop.js",
        "export function f(x) { return %inline('./loop').f(x); }\n",
    )]);
    let config = ExpandConfig {
        recursive: true,
        ..ExpandConfig::default()
    };
    let output = expand(&mut host, "r = %inline('./lib/loop').f(1);", &config);
    assert_eq!(output, "r = void 0;");
    assert_eq!(diagnostic_kinds(&host.diagnostics), vec!["cycle"]);
}

#[test]
fn nesting_depth_is_limited() {
    let mut host = host_with(&[("src/lib/outer.js", OUTER), ("src/lib/inner.js", INNER)]);
    let config = ExpandConfig {
        recursive: true,
        max_depth: 0,
        ..ExpandConfig::default()
    };
    expand(&mut host, "r = %inline('./lib/outer').outer(v);", &config);
    match host.diagnostics.as_slice() {
        [error @ InlineError::RecursionLimit { limit: 0, .. }] => {
            assert_eq!(error.category(), ErrorCategory::Limit)
        }
        other => panic!("unexpected diagnostics {:?}", other),
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn extensions_control_module_lookup() {
    let mut host = host_with(&[("src/lib/math.mjs", MATH)]);
    let source = "a = %inline('./lib/math').double(1);";
    let output = expand(&mut host, source, &ExpandConfig::default());
    assert!(output.contains("cannot find module"));

    let mut host = host_with(&[("src/lib/math.mjs", MATH)]);
    let config = ExpandConfig {
        extensions: vec![".mjs".to_string()],
        ..ExpandConfig::default()
    };
    assert_eq!(expand(&mut host, source, &config), "a = 1 * 2;");
    assert_eq!(host.dependencies, vec![PathBuf::from("src/lib/math.mjs")]);
}

#[test]
fn yaml_configuration_drives_expansion() {
    let config = ExpandConfig::from_yaml_str(
        "strategy: sweep\nsubstitution: sequential\n",
        std::path::Path::new("inline.yaml"),
    )
    .unwrap();
    let mut host = host_with(&[(
        "src/lib/ops.js",
        "export function sub(a, b) { return a - b; }\n",
    )]);
    let output = expand(&mut host, "d = %inline('./lib/ops').sub(b, 1);\n", &config);
    assert_eq!(output, "d = 1 - 1;\n");
}

#[test]
fn modern_host_syntax_expands_with_both_strategies() {
    let host = "\
function* ids() {
  let i = 0;
  while (true) yield i++;
}
class Counter {
  #count = 0;
  static zero = 0;
  static { Counter.ready = true; }
  bump() { return ++this.#count; }
}
outer: for (const k of ids()) {
  if (k > 2) break outer;
}
const café = 21;
const label = html`<b>${café}</b>`
";
    let source = format!("{host}var y = %inline('./lib/math').double(café);\n");
    let expected = format!("{host}var y = café * 2;\n");
    let (reparse, sweep) = assert_both(&[("src/lib/math.js", MATH)], &source, &expected);
    for run in [&reparse, &sweep] {
        assert!(run.host.diagnostics.is_empty());
    }
}

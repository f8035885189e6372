//! Multi-module compilation tests
//!
//! Programs are assembled from an in-memory loader so import resolution, module emission order,
//! cycle detection and helper selection can be checked without touching the filesystem.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use slither::diagnostics::ErrorKind;
use slither::frontend::module::MemoryLoader;
use slither::{CompileOptions, Compiler, compile};

fn pretty_options() -> CompileOptions {
    CompileOptions::default().with_beautify(true).with_omit_baselib(true)
}

#[test]
fn test_imported_module_is_wrapped_and_exported() {
    let loader = MemoryLoader::new().with_module("util", "def twice(x):\n    return x * 2\n");
    let out = Compiler::new()
        .with_loader(loader)
        .compile("from util import twice\ny = twice(2)\n", &pretty_options())
        .unwrap();
    insta::assert_snapshot!(out.code, @r#"
var _$sl_modules = {};
_$sl_modules["util"] = {};
(function() {
    function twice(x) {
        return x * 2;
    }
    _$sl_modules["util"].twice = twice;
})();
var twice, y;
twice = _$sl_modules["util"].twice;
y = twice(2);
"#);
}

#[test]
fn test_package_tables_link_to_parents() {
    let loader = MemoryLoader::new().with_module("pkg.sub", "def f():\n    pass\n");
    let out = Compiler::new()
        .with_loader(loader)
        .compile("import pkg.sub\npkg.sub.f()\n", &pretty_options())
        .unwrap();
    insta::assert_snapshot!(out.code, @r#"
var _$sl_modules = {};
_$sl_modules["pkg"] = {};
_$sl_modules["pkg.sub"] = {};
_$sl_modules["pkg"]["sub"] = _$sl_modules["pkg.sub"];
(function() {
    function f() {}
    _$sl_modules["pkg.sub"].f = f;
})();
var pkg;
pkg = _$sl_modules["pkg"];
pkg.sub.f();
"#);
}

#[test]
fn test_aliased_import_binds_the_full_module() {
    let loader = MemoryLoader::new().with_module("pkg.sub", "def f():\n    pass\n");
    let out = Compiler::new()
        .with_loader(loader)
        .compile("import pkg.sub as s\ns.f()\n", &CompileOptions::default().with_omit_baselib(true))
        .unwrap();
    assert!(out.code.ends_with("var s;s=_$sl_modules[\"pkg.sub\"];s.f()"), "{}", out.code);
}

#[test]
fn test_dependencies_are_emitted_before_importers_once() {
    let loader = MemoryLoader::new()
        .with_module("base", "def b():\n    return 1\n")
        .with_module("left", "import base\ndef l():\n    return base.b()\n")
        .with_module("right", "import base\ndef r():\n    return base.b()\n");
    let out = Compiler::new()
        .with_loader(loader)
        .compile("import left\nimport right\n", &CompileOptions::default())
        .unwrap();
    assert_eq!(out.modules, vec!["base", "left", "right"]);
    assert_eq!(out.code.matches("function b()").count(), 1);
    let base_at = out.code.find("function b()").unwrap();
    let left_at = out.code.find("function l()").unwrap();
    let right_at = out.code.find("function r()").unwrap();
    assert!(base_at < left_at && left_at < right_at);
}

#[test]
fn test_import_cycle_names_both_modules() {
    let loader = MemoryLoader::new()
        .with_module("a", "import b\n")
        .with_module("b", "import a\n");
    let err = Compiler::new()
        .with_loader(loader)
        .compile("import a\n", &CompileOptions::default())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Import);
    assert!(err.message.contains("'a'"), "{}", err.message);
    assert!(err.message.contains("'b'"), "{}", err.message);
    assert_eq!(err.file.as_deref(), Some("b.pyj"));
}

#[test]
fn test_missing_module_reports_search_roots() {
    let options = CompileOptions::default().with_base_dir("src").with_lib_dir("lib");
    let err = Compiler::new()
        .with_loader(MemoryLoader::new())
        .compile("import nowhere\n", &options)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Import);
    assert!(err.message.contains("nowhere"), "{}", err.message);
    assert_eq!(err.notes, vec!["searched: src, lib".to_string()]);
    assert_eq!(err.line, 1);
}

#[test]
fn test_unknown_import_name_is_a_warning() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let captured = Rc::clone(&seen);
    let loader = MemoryLoader::new().with_module("util", "def known():\n    pass\n");
    let out = Compiler::new()
        .with_loader(loader)
        .with_warning_sink(Box::new(move |w| captured.borrow_mut().push(w.to_string())))
        .compile("from util import unknown\n", &CompileOptions::default())
        .unwrap();
    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings[0].message.contains("unknown"), "{:?}", out.warnings);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_imported_classes_construct_with_new() {
    let loader = MemoryLoader::new().with_module("shapes", "class Square:\n    pass\n");
    let out = Compiler::new()
        .with_loader(loader)
        .compile("from shapes import Square\ns = Square()\n", &CompileOptions::default())
        .unwrap();
    assert!(out.code.ends_with("s=new Square()"), "{}", out.code);
}

// ============================================================================
// Runtime helpers
// ============================================================================

#[test]
fn test_no_helpers_for_plain_programs() {
    let out = compile("x = 1\ny = x + 2\n", &CompileOptions::default()).unwrap();
    assert!(out.baselib_usage.is_empty());
    assert_eq!(out.code, "var x,y;x=1;y=x+2");
}

#[test]
fn test_range_only_program_emits_only_range() {
    let out = compile("r = range(5)\n", &CompileOptions::default()).unwrap();
    assert_eq!(out.baselib_usage, vec!["range"]);
    assert!(out.code.starts_with("function range("), "{}", out.code);
    assert_eq!(out.code.matches("function ").count(), 1, "{}", out.code);
    assert!(out.code.ends_with("var r;r=range(5)"), "{}", out.code);
}

#[test]
fn test_helpers_are_collected_across_modules() {
    let loader = MemoryLoader::new().with_module("util", "def has(k, d):\n    return k in d\n");
    let out = Compiler::new()
        .with_loader(loader)
        .compile("import util\nfor x in xs:\n    print(x)\n", &CompileOptions::default())
        .unwrap();
    assert_eq!(out.baselib_usage, vec!["in", "iterable", "print"]);
    let helpers_end = out.code.find("var _$sl_modules").unwrap();
    let prelude = &out.code[..helpers_end];
    assert!(prelude.contains("function _$sl_in("));
    assert!(prelude.contains("function _$sl_Iterable("));
    assert!(prelude.contains("function print("));
}

#[test]
fn test_omit_baselib_keeps_usage_report() {
    let out = compile("y = a[::2]\n", &CompileOptions::default().with_omit_baselib(true)).unwrap();
    assert_eq!(out.baselib_usage, vec!["eslice"]);
    assert_eq!(out.code, "var y;y=_$sl_eslice(a,2)");
}

// ============================================================================
// Position maps and the filesystem loader
// ============================================================================

#[test]
fn test_position_map_covers_every_module() {
    let loader = MemoryLoader::new().with_module("util", "def f():\n    return 1\n");
    let options = CompileOptions::default()
        .with_source_map(true)
        .with_filename("main.pyj")
        .with_beautify(true)
        .with_omit_baselib(true);
    let out = Compiler::new()
        .with_loader(loader)
        .compile("import util\nx = util.f()\n", &options)
        .unwrap();
    let map = out.position_map.expect("position map requested");
    assert_eq!(map.sources(), ["util.pyj".to_string(), "main.pyj".to_string()]);
    assert!(map.mappings().iter().any(|m| m.source_index == 0));
    assert!(map.mappings().iter().any(|m| m.source_index == 1 && m.original_line == 1));

    let json = map.to_json();
    assert_eq!(json["version"], 3);
    assert!(json["names"].as_array().unwrap().iter().any(|n| n == "x"));
}

#[test]
fn test_no_position_map_unless_requested() {
    let out = compile("x = 1\n", &CompileOptions::default()).unwrap();
    assert!(out.position_map.is_none());
}

/// Scratch directory under the system temp dir, removed on drop.
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("slither-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

#[test]
fn test_filesystem_loader_searches_base_then_lib_dirs() {
    let scratch = ScratchDir::new("fs-loader");
    let base = scratch.0.join("app");
    let lib = scratch.0.join("lib");
    fs::create_dir_all(base.join("pkg")).unwrap();
    fs::create_dir_all(&lib).unwrap();
    fs::write(base.join("pkg").join("__init__.pyj"), "def p():\n    pass\n").unwrap();
    fs::write(lib.join("extra.pyj"), "def e():\n    pass\n").unwrap();

    let options = CompileOptions::default()
        .with_base_dir(&base)
        .with_lib_dir(&lib)
        .with_omit_baselib(true);
    let out = compile("import pkg\nimport extra\n", &options).unwrap();
    assert_eq!(out.modules, vec!["pkg", "extra"]);
    assert!(out.code.contains("function p(){}"), "{}", out.code);
    assert!(out.code.contains("function e(){}"), "{}", out.code);
}

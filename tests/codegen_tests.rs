//! End-to-end code generation tests
//!
//! Small canonical programs are compiled in beautified mode and compared against inline
//! snapshots; behavior-level checks use plain assertions on compact output.
//!
//! Review snapshot changes: `cargo insta review`

use slither::{CompileOptions, compile};

/// Beautified output without runtime helpers.
fn pretty(source: &str) -> String {
    let options = CompileOptions::default().with_beautify(true).with_omit_baselib(true);
    compile(source, &options).expect("compile failed").code
}

/// Compact output without runtime helpers.
fn compact(source: &str) -> String {
    let options = CompileOptions::default().with_omit_baselib(true);
    compile(source, &options).expect("compile failed").code
}

// ============================================================================
// Snapshots
// ============================================================================

#[test]
fn test_if_elif_else_codegen() {
    let source = "def clamp(x, lo, hi):\n    if lo <= x <= hi:\n        return x\n    elif x < lo:\n        return lo\n    else:\n        return hi\n";
    insta::assert_snapshot!(pretty(source), @r"
function clamp(x, lo, hi) {
    if (lo <= x && x <= hi) {
        return x;
    } else if (x < lo) {
        return lo;
    } else {
        return hi;
    }
}
");
}

#[test]
fn test_try_except_finally_codegen() {
    let source = "try:\n    f()\nexcept TypeError, ValueError as e:\n    a(e)\nexcept:\n    b()\nfinally:\n    c()\n";
    insta::assert_snapshot!(pretty(source), @r"
var e;
try {
    f();
} catch (_$sl_Exception) {
    if (_$sl_Exception instanceof TypeError || _$sl_Exception instanceof ValueError) {
        e = _$sl_Exception;
        a(e);
    } else {
        b();
    }
} finally {
    c();
}
");
}

#[test]
fn test_list_comprehension_codegen() {
    let source = "ys = [x * 2 for x in xs if x]\n";
    insta::assert_snapshot!(pretty(source), @r"
var ys;
ys = (function() {
    var _$sl_Idx, _$sl_Iter = _$sl_Iterable(xs), _$sl_Result = [], x;
    for (_$sl_Idx = 0; _$sl_Idx < _$sl_Iter.length; _$sl_Idx++) {
        x = _$sl_Iter[_$sl_Idx];
        if (x) {
            _$sl_Result.push(x * 2);
        }
    }
    return _$sl_Result;
}).call(this);
");
}

#[test]
fn test_switch_codegen() {
    let source = "switch x:\n    case 1:\n        a()\n        break\n    default:\n        b()\n";
    insta::assert_snapshot!(pretty(source), @r"
switch (x) {
    case 1:
        a();
        break;
    default:
        b();
}
");
}

#[test]
fn test_class_with_base_and_mixin_codegen() {
    let source = "class Dog(Animal, Walker):\n    legs = 4\n    def __init__(self, name):\n        self.name = name\n    def speak(self):\n        return self.name\n";
    insta::assert_snapshot!(pretty(source), @r"
function Dog() {
    Dog.prototype.__init__.apply(this, arguments);
}
_$sl_extends(Dog, Animal);
_$sl_mixin(Dog.prototype, Walker.prototype);
Dog.prototype.__init__ = function __init__(name) {
    var self = this;
    self.name = name;
};
Dog.prototype.legs = 4;
Dog.prototype.speak = function speak() {
    var self = this;
    return self.name;
};
");
}

#[test]
fn test_counting_loops_codegen() {
    let source = "for i in range(n - 1):\n    for j in range(1, 10, 3):\n        f(i, j)\n";
    insta::assert_snapshot!(pretty(source), @r"
var _$sl_End1, i, j;
for (i = 0, _$sl_End1 = n - 1; i < _$sl_End1; i++) {
    for (j = 1; j < 10; j += 3) {
        f(i, j);
    }
}
");
}

// ============================================================================
// Behavior
// ============================================================================

#[test]
fn test_static_call_uses_class_property_and_instance_call_uses_prototype() {
    let source = concat!(
        "class Counter:\n",
        "    @staticmethod\n",
        "    def create():\n",
        "        return Counter()\n",
        "    def bump(self):\n",
        "        return 1\n",
        "c = Counter.create()\n",
        "Counter.bump(c)\n",
    );
    let out = compact(source);
    assert!(out.contains("Counter.create=function create(){"), "{out}");
    assert!(out.contains("c=Counter.create()"), "{out}");
    assert!(out.contains("Counter.prototype.bump=function bump(){"), "{out}");
    assert!(out.ends_with("Counter.prototype.bump.call(c)"), "{out}");
}

#[test]
fn test_known_class_calls_become_construction() {
    let out = compact("class Point:\n    pass\np = Point(1, 2)\n");
    assert!(out.ends_with("p=new Point(1,2)"), "{out}");
}

#[test]
fn test_decorated_function_is_wrapped() {
    let out = pretty("@memo\n@trace\ndef f():\n    return 1\n");
    assert!(out.starts_with("var f = memo(trace(function f() {\n    return 1;\n}));"), "{out}");
}

#[test]
fn test_auto_bind_rebinds_methods_in_constructor() {
    let options = CompileOptions::default()
        .with_beautify(true)
        .with_omit_baselib(true)
        .with_auto_bind(true);
    let out = compile("class A:\n    def m(self):\n        pass\n", &options).unwrap().code;
    assert!(out.starts_with("function A() {\n    this.m = _$sl_bind(this.m, this);\n}\n"), "{out}");
}

#[test]
fn test_slices_lower_to_slice_and_eslice() {
    assert_eq!(compact("y = arr[1:4]\n"), "var y;y=arr.slice(1,4)");
    assert_eq!(compact("y = arr[1:4:2]\n"), "var y;y=_$sl_eslice(arr,2,1,4)");
}

#[test]
fn test_delete_and_membership() {
    assert_eq!(compact("del obj.key\n"), "delete obj.key");
    assert_eq!(compact("if k not in d:\n    d[k] = 1\n"), "if(!_$sl_in(k,d)){d[k]=1}");
}

#[test]
fn test_compound_power_and_floor_assignments_expand() {
    assert_eq!(compact("x **= 2\n"), "var x;x=Math.pow(x,2)");
    assert_eq!(compact("x //= y\n"), "var x;x=Math.floor(x/y)");
}

#[test]
fn test_numbers_use_shortest_spelling() {
    assert_eq!(compact("f(1000, 0.5, 255, 1099511627775)\n"), "f(1e3,.5,255,0xffffffffff)");
}

#[test]
fn test_overflowing_literal_prints_as_division() {
    assert_eq!(compact("f(1e400, a % 1e400, 1e400 * 2)\n"), "f(1/0,a%(1/0),1/0*2)");
}

#[test]
fn test_nonlocal_names_are_not_redeclared() {
    let out = pretty("def outer():\n    n = 0\n    def inner():\n        nonlocal n\n        n += 1\n    return inner\n");
    assert!(out.contains("    var n;\n"), "{out}");
    assert!(!out.contains("        var n;"), "{out}");
}

#[test]
fn test_comments_pass_through() {
    let options = CompileOptions::default()
        .with_beautify(true)
        .with_omit_baselib(true)
        .with_comments(true);
    let out = compile("# set up\nx = 1\n", &options).unwrap().code;
    assert!(out.contains("// set up\nx = 1;\n"), "{out}");
}

#[test]
fn test_ascii_only_escapes_strings() {
    let options = CompileOptions::default().with_omit_baselib(true).with_ascii_only(true);
    let out = compile("s = \"caf\u{e9}\"\n", &options).unwrap().code;
    assert_eq!(out, "var s;s=\"caf\\u00e9\"");
}

#[test]
fn test_max_line_len_breaks_after_statements() {
    let options = CompileOptions::default().with_omit_baselib(true).with_max_line_len(10);
    let out = compile("aaaa = 1\nbbbb = 2\ncccc = 3\n", &options).unwrap().code;
    assert!(out.lines().count() > 1, "{out}");
    assert!(out.lines().all(|l| l.len() <= 20), "{out}");
}

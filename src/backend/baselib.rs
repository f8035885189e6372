//! Runtime helper ("baselib") sources.
//!
//! Each helper is a self-contained JavaScript function keyed by [`HelperId`]. The generator emits
//! only the helpers a program references, in registry order.

use slither_core::lang::helpers::{self, HelperId};
use slither_syntax::ast::BaselibUsage;

/// JavaScript source for one helper.
pub fn source(id: HelperId) -> &'static str {
    match id {
        HelperId::Bind => {
            r#"function _$sl_bind(fn, thisArg) {
    if (fn.orig) fn = fn.orig;
    if (thisArg === false) return fn;
    var ret = function() {
        return fn.apply(thisArg, arguments);
    };
    ret.orig = fn;
    return ret;
}"#
        }
        HelperId::Extends => {
            r#"function _$sl_extends(child, parent) {
    child.prototype = Object.create(parent.prototype);
    child.prototype.constructor = child;
}"#
        }
        HelperId::In => {
            r#"function _$sl_in(val, arr) {
    if (typeof arr.indexOf === "function") return arr.indexOf(val) !== -1;
    return arr.hasOwnProperty(val);
}"#
        }
        HelperId::Iterable => {
            r#"function _$sl_Iterable(iterable) {
    if (iterable.constructor === [].constructor || iterable.constructor === "".constructor) return iterable;
    if (typeof iterable.length === "number") return Array.prototype.slice.call(iterable);
    return Object.keys(iterable);
}"#
        }
        HelperId::Range => {
            r#"function range(start, stop, step) {
    if (arguments.length <= 1) {
        stop = start || 0;
        start = 0;
    }
    step = arguments[2] || 1;
    var length = Math.max(Math.ceil((stop - start) / step), 0);
    var idx = 0;
    var range = new Array(length);
    while (idx < length) {
        range[idx++] = start;
        start += step;
    }
    return range;
}"#
        }
        HelperId::Eslice => {
            r#"function _$sl_eslice(arr, step, start, end) {
    var result = [];
    arr = arr.slice();
    if (step < 0) {
        step = -step;
        arr.reverse();
        if (typeof start !== "undefined") start = arr.length - start - 1;
        if (typeof end !== "undefined") end = arr.length - end - 1;
    }
    if (typeof start === "undefined") start = 0;
    if (typeof end === "undefined") end = arr.length;
    for (var i = start; i < end; i += step) result.push(arr[i]);
    return result;
}"#
        }
        HelperId::Mixin => {
            r#"function _$sl_mixin(target, source, overwrite) {
    for (var i in source) {
        if (source.hasOwnProperty(i) && (overwrite || typeof target[i] === "undefined")) target[i] = source[i];
    }
}"#
        }
        HelperId::Print => {
            r#"function print() {
    if (typeof console === "object") console.log.apply(console, arguments);
}"#
        }
        HelperId::GetAttr => {
            r#"function getattr(obj, name) {
    return obj[name];
}"#
        }
        HelperId::SetAttr => {
            r#"function setattr(obj, name, value) {
    obj[name] = value;
}"#
        }
        HelperId::HasAttr => {
            r#"function hasattr(obj, name) {
    return name in obj;
}"#
        }
        HelperId::SymbolFor => {
            r#"var _$sl_symbolfor = typeof Symbol === "function" && typeof Symbol.for === "function" ? Symbol.for : function(name) {
    return "_$sl_symbol_" + name;
};"#
        }
    }
}

/// Concatenated sources of every helper in `usage`, registry order, one per line block.
pub fn emit(usage: &BaselibUsage) -> String {
    let selected: Vec<HelperId> = helpers::HELPERS
        .iter()
        .map(|h| h.id)
        .filter(|id| usage.contains(*id))
        .collect();
    tracing::debug!(
        helpers = ?selected.iter().map(|id| helpers::key(*id)).collect::<Vec<_>>(),
        "selected baselib helpers"
    );
    selected.iter().map(|id| format!("{}\n", source(*id))).collect()
}

/// Usage-report keys for `usage`, registry order.
pub fn usage_keys(usage: &BaselibUsage) -> Vec<&'static str> {
    helpers::HELPERS
        .iter()
        .filter(|h| usage.contains(h.id))
        .map(|h| h.key)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_helper_defines_its_js_name() {
        for h in helpers::HELPERS {
            let src = source(h.id);
            assert!(
                src.starts_with(&format!("function {}(", h.js_name)) || src.starts_with(&format!("var {} ", h.js_name)),
                "{} does not define {}",
                h.key,
                h.js_name
            );
        }
    }

    #[test]
    fn test_emit_only_selected_helpers() {
        let mut usage = BaselibUsage::default();
        assert_eq!(emit(&usage), "");
        usage.mark(HelperId::Range);
        let out = emit(&usage);
        assert!(out.starts_with("function range("));
        assert!(!out.contains("_$sl_"));
        assert_eq!(usage_keys(&usage), ["range"]);
    }

    #[test]
    fn test_emit_follows_registry_order() {
        let mut usage = BaselibUsage::default();
        usage.mark(HelperId::Print);
        usage.mark(HelperId::Bind);
        let out = emit(&usage);
        assert!(out.find("_$sl_bind").unwrap() < out.find("function print").unwrap());
        assert_eq!(usage_keys(&usage), ["bind", "print"]);
    }
}

//! Runtime helper ("baselib") vocabulary.
//!
//! The code generator may prepend a small set of JavaScript support functions to its output. Each
//! helper has a stable [`HelperId`], a short key used in usage reports, and the JavaScript name the
//! generated code calls it by. The parser sets a usage flag per helper; only flagged helpers are
//! emitted.
//!
//! ## Notes
//! - [`HELPERS`] is in emission order. Generators must iterate it rather than a hash set so output
//!   is deterministic.
//! - Helpers with a `trigger` are user-callable builtins: a call to a free name spelled like the
//!   trigger sets the helper's flag.
//!
//! ## Examples
//! ```rust
//! use slither_core::lang::helpers::{self, HelperId};
//!
//! assert_eq!(helpers::from_trigger("range"), Some(HelperId::Range));
//! assert_eq!(helpers::js_name(HelperId::Extends), "_$sl_extends");
//! ```

/// Prefix reserved for compiler-generated identifiers.
pub const INTERNAL_PREFIX: &str = "_$sl_";

/// Stable identifier for every runtime helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HelperId {
    Bind,
    Extends,
    In,
    Iterable,
    Range,
    Eslice,
    Mixin,
    Print,
    GetAttr,
    SetAttr,
    HasAttr,
    SymbolFor,
}

/// Metadata for a runtime helper.
#[derive(Debug, Clone, Copy)]
pub struct HelperInfo {
    pub id: HelperId,
    /// Short key used in usage reports (`baselib_usage`).
    pub key: &'static str,
    /// Name the generated code refers to.
    pub js_name: &'static str,
    /// Free-function call spelling that activates the helper, if it is user-callable.
    pub trigger: Option<&'static str>,
}

/// Registry of all helpers, in emission order.
pub const HELPERS: &[HelperInfo] = &[
    info(HelperId::Bind, "bind", "_$sl_bind", None),
    info(HelperId::Extends, "extends", "_$sl_extends", None),
    info(HelperId::In, "in", "_$sl_in", None),
    info(HelperId::Iterable, "iterable", "_$sl_Iterable", None),
    info(HelperId::Range, "range", "range", Some("range")),
    info(HelperId::Eslice, "eslice", "_$sl_eslice", None),
    info(HelperId::Mixin, "mixin", "_$sl_mixin", None),
    info(HelperId::Print, "print", "print", Some("print")),
    info(HelperId::GetAttr, "getattr", "getattr", Some("getattr")),
    info(HelperId::SetAttr, "setattr", "setattr", Some("setattr")),
    info(HelperId::HasAttr, "hasattr", "hasattr", Some("hasattr")),
    info(HelperId::SymbolFor, "symbolfor", "_$sl_symbolfor", None),
];

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: HelperId) -> &'static HelperInfo {
    HELPERS.iter().find(|h| h.id == id).expect("helper info missing")
}

/// Usage-report key.
pub fn key(id: HelperId) -> &'static str {
    info_for(id).key
}

/// Name emitted in generated code.
pub fn js_name(id: HelperId) -> &'static str {
    info_for(id).js_name
}

/// Resolve a user-callable builtin name to its helper.
pub fn from_trigger(name: &str) -> Option<HelperId> {
    HELPERS.iter().find(|h| h.trigger == Some(name)).map(|h| h.id)
}

/// Lookup by usage-report key.
pub fn from_key(key: &str) -> Option<HelperId> {
    HELPERS.iter().find(|h| h.key == key).map(|h| h.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: HelperId, key: &'static str, js_name: &'static str, trigger: Option<&'static str>) -> HelperInfo {
    HelperInfo {
        id,
        key,
        js_name,
        trigger,
    }
}

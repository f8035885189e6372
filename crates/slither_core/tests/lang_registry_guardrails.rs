use std::collections::HashMap;

use slither_core::lang::atoms;
use slither_core::lang::helpers;
use slither_core::lang::keywords;
use slither_core::lang::operators::{self, Fixity};
use slither_core::lang::punctuation;

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate keyword spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
    }
}

#[test]
fn operator_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, operators::OperatorId> = HashMap::new();

    for info in operators::OPERATORS {
        assert_eq!(
            operators::from_str(info.spelling),
            Some(info.id),
            "operator spelling not resolvable: {}",
            info.spelling
        );
        if let Some(prev) = seen.insert(info.spelling, info.id) {
            panic!("duplicate operator spelling {:?}: {:?} and {:?}", info.spelling, prev, info.id);
        }
    }
}

#[test]
fn word_operators_collide_with_nothing() {
    for info in operators::OPERATORS.iter().filter(|o| o.is_keyword_spelling) {
        assert_eq!(keywords::from_str(info.spelling), None, "{} is also a keyword", info.spelling);
        assert_eq!(atoms::from_str(info.spelling), None, "{} is also an atom", info.spelling);
    }
    for info in keywords::KEYWORDS {
        assert_eq!(atoms::from_str(info.canonical), None, "{} is also an atom", info.canonical);
    }
}

#[test]
fn binary_operators_have_precedence() {
    for info in operators::OPERATORS {
        let binary = matches!(info.fixity, Fixity::Infix | Fixity::InfixOrPrefix);
        assert_eq!(
            binary,
            info.precedence > operators::precedence::NONE,
            "precedence/fixity mismatch for {:?}",
            info.id
        );
    }
}

#[test]
fn reserved_spellings_are_not_surface_operators() {
    for &spelling in operators::RESERVED_SPELLINGS {
        assert_eq!(operators::from_str(spelling), None, "{spelling} must not be a surface operator");
        assert!(spelling.chars().all(operators::is_operator_char));
    }
}

#[test]
fn symbol_operators_use_operator_chars() {
    for info in operators::OPERATORS.iter().filter(|o| !o.is_keyword_spelling) {
        assert!(
            info.spelling.chars().all(operators::is_operator_char),
            "operator {} uses a character outside the operator alphabet",
            info.spelling
        );
        for c in info.spelling.chars() {
            assert_eq!(punctuation::from_char(c), None, "{c} is both punctuation and operator");
        }
    }
}

#[test]
fn helper_keys_and_names_unique() {
    let mut keys = HashMap::new();
    let mut names = HashMap::new();
    for info in helpers::HELPERS {
        assert_eq!(helpers::from_key(info.key), Some(info.id));
        assert!(keys.insert(info.key, info.id).is_none(), "duplicate helper key {}", info.key);
        assert!(
            names.insert(info.js_name, info.id).is_none(),
            "duplicate helper name {}",
            info.js_name
        );
    }
}

//! Numeric literal formatting.
//!
//! Every number is printed as the shortest of its equivalent encodings: plain decimal, hex,
//! octal and scientific. Candidates are tried in that order and the first shortest one wins, so
//! the choice is stable for identical input.

/// Largest integer every encoding represents exactly (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Shortest JavaScript spelling of `value`.
///
/// Octal candidates are skipped when `strict` is set, since strict mode rejects legacy octal
/// literals. Non-finite values print as divisions (`1/0`, `0/0`), never as the `Infinity` and
/// `NaN` globals; they carry multiplicative precedence.
pub fn format_number(value: f64, strict: bool) -> String {
    if value.is_nan() {
        return "0/0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "1/0" } else { "-1/0" }.to_string();
    }
    if value < 0.0 {
        return format!("-{}", format_number(-value, strict));
    }

    let mut decimal = format!("{value}");
    if let Some(fraction) = decimal.strip_prefix("0.") {
        decimal = format!(".{fraction}");
    }

    let mut candidates = vec![decimal.clone()];
    if value.fract() == 0.0 && value < MAX_EXACT_INT {
        let int = value as u64;
        candidates.push(format!("0x{int:x}"));
        if !strict && int > 0 {
            candidates.push(format!("0{int:o}"));
        }
        let digits = decimal.trim_end_matches('0');
        let zeros = decimal.len() - digits.len();
        if zeros > 0 && !digits.is_empty() {
            candidates.push(format!("{digits}e{zeros}"));
        }
    } else if value.fract() == 0.0 {
        let digits = decimal.trim_end_matches('0');
        let zeros = decimal.len() - digits.len();
        if zeros > 0 {
            candidates.push(format!("{digits}e{zeros}"));
        }
    } else if let Some(fraction) = decimal.strip_prefix('.') {
        let significant = fraction.trim_start_matches('0');
        let leading = fraction.len() - significant.len();
        if leading > 0 {
            candidates.push(format!("{significant}e-{}", leading + significant.len()));
        }
    }

    candidates
        .into_iter()
        .fold(None::<String>, |best, c| match best {
            Some(b) if b.len() <= c.len() => Some(b),
            _ => Some(c),
        })
        .unwrap_or(decimal)
}

/// Format a number as its canonical decimal string.
///
/// The shortest decimal that round-trips to the same `f64`, never in
/// exponent notation, always carrying a fractional part (`15` -> `15.0`).
/// Non-finite values keep Rust's spelling (`inf`, `-inf`, `NaN`).
pub fn format_number(n: f64) -> String {
    let mut out = n.to_string();
    if n.is_finite() && !out.contains('.') {
        out.push_str(".0");
    }
    out
}

//! Number formatting that matches what the scan front-end has always
//! written into exports (`Number.prototype.toFixed` / `String(number)`).

/// Format `value` with exactly `digits` decimals.
///
/// Rounds the exact binary value to nearest; exact ties round away from zero.
/// Rust's `{:.N}` resolves exact ties to even, so ties are detected and
/// handled here. Non-finite values and magnitudes of 1e21 or more fall back
/// to [`js_number_string`].
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() || value.abs() >= 1e21 {
        return js_number_string(value);
    }
    // -0.0 prints without a sign
    let value = if value == 0.0 { 0.0 } else { value };

    // A tie needs at most digits + 1 binary fractional digits, in which case
    // the decimal expansion at digits + 1 places is exact.
    let scaled = value * 2f64.powi(digits as i32 + 1);
    if scaled.fract() == 0.0 {
        let exact = format!("{:.*}", digits + 1, value.abs());
        if let Some(kept) = exact.strip_suffix('5') {
            let kept = kept.strip_suffix('.').unwrap_or(kept);
            let rounded = increment_decimal(kept);
            return if value < 0.0 { format!("-{}", rounded) } else { rounded };
        }
    }

    format!("{:.*}", digits, value)
}

/// Add one unit in the last place to an unsigned decimal string.
fn increment_decimal(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    let mut carry = true;
    for b in bytes.iter_mut().rev() {
        if !carry {
            break;
        }
        match *b {
            b'.' => continue,
            b'9' => *b = b'0',
            _ => {
                *b += 1;
                carry = false;
            }
        }
    }
    let mut out = String::from_utf8(bytes).unwrap_or_default();
    if carry {
        out.insert(0, '1');
    }
    out
}

/// Plain number display: integral values without a fractional part,
/// otherwise the shortest round-trip representation. Magnitudes of 1e21 or
/// more and below 1e-6 use exponent form (`1e+22`, `1.5e-7`).
pub fn js_number_string(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else if value == 0.0 {
        "0".to_string()
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        let exp = format!("{:e}", value);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        }
    } else {
        format!("{}", value)
    }
}

/// `"1"` / `"0"` flag used for every boolean export column.
pub fn flag(value: bool) -> String {
    if value { "1".to_string() } else { "0".to_string() }
}

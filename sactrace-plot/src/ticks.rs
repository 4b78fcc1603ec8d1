/// Writes a tick value in thousands, e.g. `1500` as `1.5k` and `2000` as `2k`.
///
/// The fractional part keeps the leading zeros of the remainder, so `2050` is `2.05k`.
pub fn k_notation(tick: f64) -> String {
    let tick = tick.round() as i64;
    let thousands = tick.div_euclid(1000);
    let rest = tick.rem_euclid(1000);
    let rest_str = rest.to_string();
    let stripped = rest_str.trim_end_matches('0');
    if stripped.is_empty() {
        format!("{}k", thousands)
    } else {
        format!(
            "{}.{}{}k",
            thousands,
            "0".repeat(3 - rest_str.len()),
            stripped
        )
    }
}

/// Default tick label of a plain axis.
pub(crate) fn plain(tick: f64) -> String {
    let rounded = (tick * 1e4).round() / 1e4;
    format!("{}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_k_notation() {
        assert_eq!(k_notation(1500.0), "1.5k");
        assert_eq!(k_notation(2000.0), "2k");
        assert_eq!(k_notation(2050.0), "2.05k");
        assert_eq!(k_notation(2005.0), "2.005k");
        assert_eq!(k_notation(0.0), "0k");
        assert_eq!(k_notation(120000.0), "120k");
        assert_eq!(k_notation(-500.0), "-1.5k");
    }

    #[test]
    fn test_k_notation_rounds_near_integer_ticks() {
        assert_eq!(k_notation(-1e-14), "0k");
        assert_eq!(k_notation(-2.78e-17), "0k");
        assert_eq!(k_notation(999.9999999), "1k");
        assert_eq!(k_notation(1499.9999), "1.5k");
        assert_eq!(k_notation(-999.9999999), "-1k");
    }
}

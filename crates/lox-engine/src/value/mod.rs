//! The Lox runtime value type, with two interchangeable encodings
//! selected at build time.
//!
//! Both `tagged::Value` and `nanbox::Value` expose the exact same public
//! surface (`nil`/`boolean`/`number`/`obj` constructors, `is_*`/`as_*`
//! queries, `is_falsey`, `type_name`, `Display`, `PartialEq`), so the rest
//! of the engine is written once against `Value` and never matches on the
//! feature flag itself.

#[cfg(not(feature = "nan-boxing"))]
mod tagged;
#[cfg(not(feature = "nan-boxing"))]
pub use tagged::Value;

#[cfg(feature = "nan-boxing")]
mod nanbox;
#[cfg(feature = "nan-boxing")]
pub use nanbox::Value;

/// `%g`'s default precision (significant digits) when none is given, as
/// used by `printf("%g", ...)` in `examples/original_source/c/source/value.c`.
const SIG_FIGS: i32 = 6;

/// Format a number the way clox's `printf("%g", ...)` does: whichever of
/// `%e`/`%f` is shorter at 6 significant digits, with trailing fractional
/// zeros (and a bare trailing `.`) stripped.
///
/// `%g` switches to scientific notation once the decimal exponent falls
/// outside `[-4, precision)` — so `1000000.0` prints `1e+06` and
/// `0.0000001` prints `1e-07`, not their literal decimal expansions.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n.is_sign_positive() {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    if n == 0.0 {
        return if n.is_sign_negative() {
            "-0".to_string()
        } else {
            "0".to_string()
        };
    }

    let sign = if n.is_sign_negative() { "-" } else { "" };
    let magnitude = n.abs();

    // Render at `SIG_FIGS` significant digits first so the exponent used
    // to pick `%e` vs `%f` is the one `%g` itself would compute.
    let scientific = format!("{:.*e}", (SIG_FIGS - 1) as usize, magnitude);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .expect("Rust's `{:e}` formatting always includes an exponent");
    let exponent: i32 = exponent.parse().expect("exponent is a valid integer");

    let body = if exponent >= -4 && exponent < SIG_FIGS {
        let decimals = (SIG_FIGS - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{magnitude:.decimals$}"))
    } else {
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            if exponent < 0 { "-" } else { "+" },
            exponent.abs()
        )
    };
    format!("{sign}{body}")
}

/// Drop trailing `0`s after a decimal point, then the point itself if
/// nothing remains after it — `"3.50000"` -> `"3.5"`, `"3.00000"` -> `"3"`.
/// A string with no `.` (already an integer) is returned unchanged.
fn strip_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Obj, ObjString};
    use crate::gc::{GcRef, Heap, ObjKind};

    #[test]
    fn falsey_values_are_nil_and_false() {
        assert!(Value::nil().is_falsey());
        assert!(Value::boolean(false).is_falsey());
        assert!(!Value::boolean(true).is_falsey());
        assert!(!Value::number(0.0).is_falsey());
    }

    #[test]
    fn numbers_format_without_trailing_zero() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(3.5), "3.5");
    }

    #[test]
    fn large_and_small_magnitudes_switch_to_scientific_notation() {
        assert_eq!(format_number(1000000.0), "1e+06");
        assert_eq!(format_number(123456789.0), "1.23457e+08");
        assert_eq!(format_number(0.0000001), "1e-07");
    }

    #[test]
    fn exponent_just_inside_the_fixed_range_stays_decimal() {
        assert_eq!(format_number(100000.0), "100000");
        assert_eq!(format_number(0.0001), "0.0001");
    }

    #[test]
    fn negative_numbers_keep_their_sign_in_both_notations() {
        assert_eq!(format_number(-3.5), "-3.5");
        assert_eq!(format_number(-1000000.0), "-1e+06");
    }

    #[test]
    fn strings_compare_by_identity_through_interning() {
        let mut heap = Heap::new();
        let a: GcRef<ObjString> = heap.alloc(ObjKind::Str, ObjString::new("hi"));
        let b: GcRef<ObjString> = heap.alloc(ObjKind::Str, ObjString::new("hi"));
        assert_eq!(Value::obj(Obj::Str(a)), Value::obj(Obj::Str(a)));
        assert_ne!(Value::obj(Obj::Str(a)), Value::obj(Obj::Str(b)));
    }
}

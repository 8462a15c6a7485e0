use std::fmt;
use num_complex::Complex64 as C64;

/// Tagged scalar at the head of every expression node.
///
/// String atoms keep their surrounding double quotes exactly as tokenized,
/// so the stored text of a symbol and of a string stay distinguishable by
/// their first byte and property keys written from the language keep their
/// quotes.
#[derive(Clone, Debug, Default)]
pub enum Atom {
    #[default]
    None,
    Number(f64),
    Complex(C64),
    Symbol(String),
    String(String),
}

impl Atom {
    pub fn symbol(s: &str) -> Self { Atom::Symbol(s.to_string()) }

    /// Wrap `text` in double quotes and store it as a string atom.
    pub fn string_literal(text: &str) -> Self {
        return Atom::String(format!("\"{}\"", text));
    }

    pub fn is_none(&self) -> bool { matches!(self, Atom::None) }

    pub fn is_number(&self) -> bool { matches!(self, Atom::Number(_)) }

    pub fn is_complex(&self) -> bool { matches!(self, Atom::Complex(_)) }

    pub fn is_symbol(&self) -> bool { matches!(self, Atom::Symbol(_)) }

    pub fn is_string(&self) -> bool { matches!(self, Atom::String(_)) }

    /// Real projection: complex atoms yield their real part, non-numeric
    /// atoms yield zero.
    pub fn as_number(&self) -> f64 {
        return match self {
            Atom::Number(x) => *x,
            Atom::Complex(z) => z.re,
            _ => 0.0,
        };
    }

    /// Complex projection: real numbers are promoted, non-numeric atoms
    /// yield zero.
    pub fn as_complex(&self) -> C64 {
        return match self {
            Atom::Number(x) => C64::new(*x, 0.0),
            Atom::Complex(z) => *z,
            _ => C64::new(0.0, 0.0),
        };
    }

    /// Symbol text with any surrounding quote characters stripped.
    pub fn as_symbol(&self) -> String {
        return match self {
            Atom::Symbol(s) => s.clone(),
            Atom::String(s) => s.trim_matches('"').to_string(),
            _ => String::new(),
        };
    }

    /// The symbol name when this atom is a bare symbol, `None` otherwise.
    /// Strings never dispatch as operators, so they are excluded here.
    pub fn symbol_text(&self) -> Option<&str> {
        return match self {
            Atom::Symbol(s) => Some(s.as_str()),
            _ => None,
        };
    }

    /// Stored text of the atom; strings keep their quotes.
    pub fn as_string(&self) -> String {
        return match self {
            Atom::None => String::new(),
            Atom::Number(x) => format!("{}", x),
            Atom::Complex(z) => format!("({},{})", z.re, z.im),
            Atom::Symbol(s) => s.clone(),
            Atom::String(s) => s.clone(),
        };
    }
}

/// Absolute difference within twice the machine epsilon; false for NaN.
fn close(l: f64, r: f64) -> bool {
    let diff: f64 = (l - r).abs();
    return !diff.is_nan() && diff <= 2.0 * f64::EPSILON;
}

impl PartialEq for Atom {
    fn eq(&self, other: &Atom) -> bool {
        return match (self, other) {
            (Atom::None, Atom::None) => true,
            (Atom::Number(l), Atom::Number(r)) => close(*l, *r),
            (Atom::Complex(l), Atom::Complex(r))
                => close(l.re, r.re) && close(l.im, r.im),
            (Atom::Symbol(l), Atom::Symbol(r)) => l == r,
            (Atom::String(l), Atom::String(r)) => l == r,
            _ => false,
        };
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.as_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_equality_is_epsilon_tolerant() {
        assert_eq!(Atom::Number(1.0), Atom::Number(1.0 + f64::EPSILON));
        assert_ne!(Atom::Number(1.0), Atom::Number(1.0 + 1e-9));
        assert_ne!(Atom::Number(f64::NAN), Atom::Number(f64::NAN));
    }

    #[test]
    fn complex_equality_checks_both_parts() {
        let a = Atom::Complex(C64::new(1.0, -2.0));
        let b = Atom::Complex(C64::new(1.0, -2.0));
        let c = Atom::Complex(C64::new(1.0, 2.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(
            Atom::Complex(C64::new(f64::NAN, 0.0)),
            Atom::Complex(C64::new(f64::NAN, 0.0)),
        );
    }

    #[test]
    fn kinds_never_compare_equal_across_tags() {
        assert_ne!(Atom::Number(0.0), Atom::Complex(C64::new(0.0, 0.0)));
        assert_ne!(Atom::Symbol("x".into()), Atom::String("\"x\"".into()));
        assert_ne!(Atom::None, Atom::Number(0.0));
    }

    #[test]
    fn symbol_projection_strips_quotes() {
        assert_eq!(Atom::string_literal("point").as_symbol(), "point");
        assert_eq!(Atom::symbol("point").as_symbol(), "point");
        assert_eq!(Atom::string_literal("point").as_string(), "\"point\"");
    }

    #[test]
    fn numeric_projections_promote() {
        assert_eq!(Atom::Number(3.0).as_complex(), C64::new(3.0, 0.0));
        assert_eq!(Atom::Complex(C64::new(3.0, 4.0)).as_number(), 3.0);
        assert_eq!(Atom::symbol("x").as_number(), 0.0);
    }

    #[test]
    fn display_formats() {
        assert_eq!(format!("{}", Atom::Number(6.0)), "6");
        assert_eq!(format!("{}", Atom::Complex(C64::new(3.0, 1.0))), "(3,1)");
        assert_eq!(format!("{}", Atom::string_literal("hi")), "\"hi\"");
        assert_eq!(format!("{}", Atom::None), "");
    }
}

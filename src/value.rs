use std::fmt;

/// A runtime value. Equality is same-tag value equality; operands of
/// different tags are never equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
        }
    }

}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                // the i64 cast saturates at 2^63, so only take it for
                // magnitudes it can represent
                if n.fract() == 0f64 && n.abs() < i64::MAX as f64 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn integral_numbers_print_without_fraction() {
        assert_eq!(Value::Number(4.0).to_string(), "4");
        assert_eq!(Value::Number(-12.0).to_string(), "-12");
        assert_eq!(Value::Number(3.5).to_string(), "3.5");
    }

    #[test]
    fn huge_integral_numbers_do_not_saturate() {
        assert_eq!(Value::Number(1e19).to_string(), "10000000000000000000");
        assert_eq!(Value::Number(-1e19).to_string(), "-10000000000000000000");
    }

    #[test]
    fn truthiness_follows_tag_rules() {
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Number(0.5).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(Value::Str("x".to_owned()).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
    }

    #[test]
    fn cross_tag_values_are_never_equal() {
        assert_ne!(Value::Number(1.0), Value::Bool(true));
        assert_ne!(Value::Str("1".to_owned()), Value::Number(1.0));
        assert_eq!(Value::Number(2.0), Value::Number(2.0));
    }
}

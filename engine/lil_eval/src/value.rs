//! Runtime values.

use std::borrow::Cow;

/// One evaluated value.
///
/// Symbols borrow from the source buffer when they come straight from an
/// atom and own their text when produced by `format`; `Cow` keeps both
/// cases behind one type without copying the common path.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<'src> {
    Int(i32),
    Float(f32),
    Sym(Cow<'src, str>),
}

impl Value<'_> {
    /// Type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Sym(_) => "symbol",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(Value::Int(1).type_name(), "int");
        assert_eq!(Value::Float(1.0).type_name(), "float");
        assert_eq!(Value::Sym(Cow::Borrowed("x")).type_name(), "symbol");
    }
}

//! attribute values as seen by rules
//!
//! Rules never evaluate expressions. A value is either a literal the parser already knows
//! ([Literal]) or an expression that is copied around verbatim ([Value::Opaque]).
use hcl_edit::expr::Expression;
use hcl_edit::structure::Attribute;
use hcl_edit::{Decorate, Decorated, Formatted, Ident, Number};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Bool(bool),
    Number(Number),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_expression(self) -> Expression {
        match self {
            Literal::String(value) => Expression::String(Decorated::new(value)),
            Literal::Bool(value) => Expression::Bool(Decorated::new(value)),
            Literal::Number(value) => Expression::Number(Formatted::new(value)),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_owned())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(value) => write!(f, "{value:?}"),
            Literal::Bool(value) => write!(f, "{value}"),
            Literal::Number(value) => write!(f, "{value}"),
        }
    }
}

/// Value of an attribute
///
/// Anything that is not a plain literal (references, interpolations, function calls, collections)
/// is [Value::Opaque] and only ever copied or rewritten by prefix.
#[derive(Debug, Clone)]
pub enum Value {
    Literal(Literal),
    Opaque(Expression),
}

impl Value {
    pub fn literal(&self) -> Option<&Literal> {
        match self {
            Value::Literal(literal) => Some(literal),
            Value::Opaque(_) => None,
        }
    }

    pub fn into_expression(self) -> Expression {
        match self {
            Value::Literal(literal) => literal.into_expression(),
            Value::Opaque(expr) => expr,
        }
    }
}

impl From<&Expression> for Value {
    fn from(expr: &Expression) -> Self {
        match expr {
            Expression::String(value) => Value::Literal(Literal::String(value.value().clone())),
            Expression::Bool(value) => Value::Literal(Literal::Bool(*value.value())),
            Expression::Number(value) => Value::Literal(Literal::Number(value.value().clone())),
            other => Value::Opaque(other.clone()),
        }
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        Value::Literal(literal)
    }
}

/// Returns the attribute name
pub fn name(attribute: &Attribute) -> &str {
    attribute.key.value().as_str()
}

/// Classifies the value of an attribute
pub fn value(attribute: &Attribute) -> Value {
    Value::from(&attribute.value)
}

/// Returns the value expression with its surrounding whitespace removed
pub fn raw_value(attribute: &Attribute) -> Expression {
    let mut expr = attribute.value.clone();
    *expr.decor_mut() = Default::default();
    expr
}

pub(crate) fn new_attribute(name: &str, mut value: Expression) -> Attribute {
    value.decor_mut().set_prefix(" ");
    value.decor_mut().set_suffix("");

    let mut key = Decorated::new(Ident::new(name));
    key.decor_mut().set_suffix(" ");
    Attribute::new(key, value)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(expr: &str) -> Value {
        let expr: Expression = expr.parse().unwrap();
        Value::from(&expr)
    }

    #[test]
    fn literals() {
        assert_eq!(parse(r#""private""#).literal(), Some(&Literal::from("private")));
        assert_eq!(parse("true").literal(), Some(&Literal::Bool(true)));
        assert!(matches!(parse("90"), Value::Literal(Literal::Number(_))));
    }

    #[test]
    fn opaque() {
        for expr in [
            "var.enabled",
            r#""tfedit-${count.index}""#,
            "toset([\"a\"])",
            "[\"READ\"]",
            "{}",
        ] {
            assert!(matches!(parse(expr), Value::Opaque(_)), "{expr}");
        }
    }

    #[test]
    fn literal_expression() {
        assert_eq!(Literal::from("Enabled").into_expression().to_string(), r#""Enabled""#);
        assert_eq!(Literal::Bool(false).into_expression().to_string(), "false");
    }
}

use crate::statement::FunctionDecl;
use std::{fmt, rc::Rc};

#[derive(Debug, Clone)]
pub enum Val {
    Num(f64),
    String(Rc<str>),
    Bool(bool),
    Null,
    Function(Rc<FunctionDecl>),
}

impl Val {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Num(_) => "number",
            Self::String(_) => "string",
            Self::Bool(_) => "boolean",
            Self::Null => "null",
            Self::Function(_) => "function",
        }
    }
}

// Functions compare by identity, everything else by value.
impl PartialEq for Val {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Num(a), Self::Num(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::String(x) => write!(f, "{}", x),
            Self::Num(x) => write!(f, "{}", format_number(*x)),
            Self::Bool(true) => write!(f, "khara"),
            Self::Bool(false) => write!(f, "khota"),
            Self::Function(func) => write!(f, "<karya {}>", func.name),
            Self::Null => write!(f, "shunya"),
        }
    }
}

/// Shortest decimal form that reads back to the same number. Integral values
/// print without a fraction; very large and very small magnitudes switch to
/// exponent notation with an explicit exponent sign.
pub fn format_number(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }

    let magnitude = x.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return x.to_string();
    }

    let exp = format!("{x:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

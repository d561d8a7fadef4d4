use std::fmt;

use crate::block::Block;
use crate::error::Error;
use crate::format::directive::{Conversion, Directive};

/// A positional argument for [`Block::format`].
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArg {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A nested block, fused row by row with the surrounding template.
    Block(Block),
}

impl FormatArg {
    pub fn type_name(&self) -> &'static str {
        match self {
            FormatArg::Str(_) => "String",
            FormatArg::Int(_) => "Int",
            FormatArg::Float(_) => "Float",
            FormatArg::Bool(_) => "Bool",
            FormatArg::Block(_) => "Block",
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            FormatArg::Int(n) => Some(*n as f64),
            FormatArg::Float(n) => Some(*n),
            FormatArg::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FormatArg::Str(_) | FormatArg::Block(_) => None,
        }
    }

    /// Render this argument for a single directive.
    pub(crate) fn render(&self, directive: &Directive<'_>) -> Result<String, Error> {
        let flags = directive.parse_flags()?;
        let malformed = |reason: String| Error::MalformedDirective {
            directive: directive.text.to_string(),
            reason,
            span: directive.span.clone(),
        };

        match directive.conversion {
            Conversion::Str => {
                let text = self.to_string();
                Ok(match flags.precision {
                    Some(precision) => text.chars().take(precision).collect(),
                    None => text,
                })
            }
            Conversion::Int => match self {
                FormatArg::Int(n) => Ok(n.to_string()),
                FormatArg::Bool(b) => Ok(u8::from(*b).to_string()),
                FormatArg::Float(n) if n.is_finite() => {
                    // `+ 0.0` folds a negative zero into zero.
                    Ok(format!("{:.0}", n.trunc() + 0.0))
                }
                FormatArg::Float(n) => Err(malformed(format!(
                    "cannot convert {} to an integer",
                    float_text(*n)
                ))),
                other => Err(malformed(format!(
                    "%d requires a number, got {}",
                    other.type_name()
                ))),
            },
            Conversion::Float => {
                let Some(n) = self.as_number() else {
                    return Err(malformed(format!(
                        "%f requires a number, got {}",
                        self.type_name()
                    )));
                };
                if n.is_nan() {
                    return Ok("nan".to_string());
                }
                Ok(format!("{:.*}", flags.precision.unwrap_or(6), n))
            }
        }
    }
}

/// Shortest round-trip text, switching to exponent form outside `[1e-4, 1e16)`.
fn float_text(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return n.to_string();
    }

    let magnitude = n.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let text = format!("{:e}", n);
        return match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let exponent: i32 = exponent.parse().unwrap_or(0);
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
            }
            None => text,
        };
    }

    if n == n.trunc() {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

impl fmt::Display for FormatArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatArg::Str(s) => f.write_str(s),
            FormatArg::Int(n) => write!(f, "{}", n),
            FormatArg::Float(n) => f.write_str(&float_text(*n)),
            FormatArg::Bool(b) => write!(f, "{}", b),
            FormatArg::Block(block) => write!(f, "{}", block),
        }
    }
}

impl From<&str> for FormatArg {
    fn from(s: &str) -> Self {
        FormatArg::Str(s.to_string())
    }
}

impl From<String> for FormatArg {
    fn from(s: String) -> Self {
        FormatArg::Str(s)
    }
}

impl From<i32> for FormatArg {
    fn from(n: i32) -> Self {
        FormatArg::Int(n.into())
    }
}

impl From<i64> for FormatArg {
    fn from(n: i64) -> Self {
        FormatArg::Int(n)
    }
}

impl From<u32> for FormatArg {
    fn from(n: u32) -> Self {
        FormatArg::Int(n.into())
    }
}

impl From<usize> for FormatArg {
    fn from(n: usize) -> Self {
        match i64::try_from(n) {
            Ok(n) => FormatArg::Int(n),
            Err(_) => FormatArg::Float(n as f64),
        }
    }
}

impl From<f64> for FormatArg {
    fn from(n: f64) -> Self {
        FormatArg::Float(n)
    }
}

impl From<bool> for FormatArg {
    fn from(b: bool) -> Self {
        FormatArg::Bool(b)
    }
}

impl From<Block> for FormatArg {
    fn from(block: Block) -> Self {
        FormatArg::Block(block)
    }
}

impl From<&Block> for FormatArg {
    fn from(block: &Block) -> Self {
        FormatArg::Block(block.clone())
    }
}

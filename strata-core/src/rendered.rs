use crate::{Value, truncate_long};
use std::fmt::{self, Display, Formatter};

/// The artifact handed to a driver: engine-agnostic SQL text with `?`
/// placeholders and the parameter values to bind, in placeholder order.
/// Produced deterministically from a validated tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rendered {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Rendered {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for Rendered {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))?;
        if !self.params.is_empty() {
            f.write_str(" [")?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                param.fmt(f)?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

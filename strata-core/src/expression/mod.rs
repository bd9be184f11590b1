mod aggregate;
mod binary_op;
mod expr;
mod ordered;
mod unary_op;

pub use aggregate::*;
pub use binary_op::*;
pub use expr::*;
pub use ordered::*;
pub use unary_op::*;

mod as_value;
mod column;
mod command;
mod connection;
mod driver;
mod error;
mod executor;
mod expression;
mod join;
mod prepared;
mod rendered;
mod row;
mod schema;
mod select;
mod table_ref;
mod util;
mod validator;
mod value;
mod writer;

pub use as_value::*;
pub use column::*;
pub use command::*;
pub use connection::*;
pub use driver::*;
pub use error::*;
pub use executor::*;
pub use expression::*;
pub use join::*;
pub use prepared::*;
pub use rendered::*;
pub use row::*;
pub use schema::*;
pub use select::*;
pub use table_ref::*;
pub use util::*;
pub use value::*;
pub use writer::*;

pub type Result<T> = std::result::Result<T, Error>;

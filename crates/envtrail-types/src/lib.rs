pub mod domain;
pub mod error;
pub mod pointer;
pub mod record;

pub use domain::*;
pub use error::{Error, Result};
pub use pointer::*;
pub use record::*;

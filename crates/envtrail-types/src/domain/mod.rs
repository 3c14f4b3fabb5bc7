mod hash;
mod preview;
mod session;
mod week;

pub use hash::*;
pub use preview::*;
pub use session::*;
pub use week::*;

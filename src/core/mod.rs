pub mod constants;
pub mod session;

pub use session::*;

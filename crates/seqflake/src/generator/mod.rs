mod atomic;
mod common;
mod interface;
mod lock;
mod mutex;

pub use atomic::*;
pub use interface::*;
pub use lock::*;
pub(crate) use mutex::*;

mod interface;
mod os;
mod thread;

pub use interface::*;
pub use os::*;
pub use thread::*;

mod coupon;
mod inventory;
mod window;

pub use coupon::*;
pub use inventory::*;
pub use window::*;

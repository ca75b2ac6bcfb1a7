mod expense;
mod expense_list;
mod money;
mod ordering;

pub use expense::*;
pub use expense_list::*;
pub use money::*;
pub use ordering::*;

mod projectdtos;
mod userdtos;

pub use projectdtos::*;
pub use userdtos::*;

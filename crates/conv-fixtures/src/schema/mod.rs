mod parser;
mod types;
mod validator;

pub use parser::{parse_plan, parse_plan_str};
pub use types::*;
pub use validator::validate_plan;

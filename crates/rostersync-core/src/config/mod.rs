pub mod parser;
pub mod types;
pub mod validator;

pub use parser::{parse_job, parse_job_str};
pub use types::JobConfig;
pub use validator::validate_job;

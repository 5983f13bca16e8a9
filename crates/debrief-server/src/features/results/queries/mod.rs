pub mod get_result;

pub use get_result::GetResultQuery;

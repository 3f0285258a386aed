pub mod consent;
pub mod esign;
pub mod http;

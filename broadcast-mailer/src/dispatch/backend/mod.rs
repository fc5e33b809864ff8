//! Mail dispatch backends

pub mod console;
pub mod http;

pub mod client;
pub mod functions;
pub mod prompts;

pub use client::*;
pub use functions::*;
pub use prompts::*;

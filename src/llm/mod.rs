pub mod anthropic;
pub mod client;
pub mod openai;
pub mod prompts;

#[cfg(test)]
pub(crate) mod fake;

pub use anthropic::*;
pub use client::*;
pub use openai::*;
pub use prompts::*;

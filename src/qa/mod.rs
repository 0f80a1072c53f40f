pub mod interface;
pub mod client;

pub use interface::{AskRequest, AskResponse, QuestionAnswerer};
pub use client::ExtractiveQa;

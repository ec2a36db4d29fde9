//! SQL tokenizer.
//!
//! Turns SQL text into a lossless [`TokenStream`]: whitespace and comments
//! are kept as tokens so the source can be reproduced exactly.

mod keywords;
mod position;
mod token;
mod tokenizer;

pub use keywords::KeywordTable;
pub use position::Position;
pub use token::{Token, TokenKind, TokenStream};
pub use tokenizer::Tokenizer;

//! Lexical and grammatical recognition for plan lines
//!
//! Contains the tokenizer and the line-shape recognizer. Both are purely
//! syntactic; all meaning (time inference, directives, overlap) lives in
//! [`crate::analysis`].

mod grammar;
mod token;
pub mod tokenizer;

pub use grammar::{
    recognize, CategoryPart, DirectiveArg, DirectiveLine, LineShape, TaskLine, TaskPart,
};
pub use token::{Span, Token, TokenKind};
pub use tokenizer::{
    parse_duration_literal, parse_time_literal, tokenize_line, TimeStyle, TokenizedLine,
};

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParserError {
    #[error("Parser error: {0}")]
    Syntax(String),
    #[error("Parser error: no parsed rule found")]
    EmptyParse,
    #[error("Parser error: unexpected rule in {0}: {1}")]
    UnexpectedRule(String, String),
}

use crate::data::{Environment, ParseResult};
use crate::diagnostics::Result;
use crate::token::Token;

use super::{failure, success, Frame};

/// Parses every token in order; the first failure discards everything.
pub(super) fn seq(frame: &Frame, tokens: &[Token], env: &Environment) -> Result<ParseResult> {
    let mut current = env.add_branch(frame.token);
    for token in tokens {
        match frame.parse(token, &current)? {
            ParseResult::Success(next) => current = next,
            ParseResult::Failure(_) => return failure(env),
        }
    }
    success(current.close_branch()?)
}

/// Tries each token against the same environment; the first success wins.
pub(super) fn cho(frame: &Frame, tokens: &[Token], env: &Environment) -> Result<ParseResult> {
    let branched = env.add_branch(frame.token);
    for token in tokens {
        if let ParseResult::Success(next) = frame.parse(token, &branched)? {
            return success(next.close_branch()?);
        }
    }
    failure(env)
}

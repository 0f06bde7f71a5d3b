use crate::data::{Environment, ParseResult};
use crate::diagnostics::Result;
use crate::expression::Expression;
use crate::token::Token;

use super::{failure, success, Frame};

pub(super) fn opt(frame: &Frame, token: &Token, env: &Environment) -> Result<ParseResult> {
    match frame.parse(token, &env.add_branch(frame.token))? {
        ParseResult::Success(next) => success(next.close_branch()?),
        ParseResult::Failure(_) => success(env.clone()),
    }
}

/// A false guard succeeds without consuming input or opening a branch.
pub(super) fn pre(frame: &Frame, token: &Token, predicate: &Expression, env: &Environment) -> Result<ParseResult> {
    if !predicate.eval(env, &frame.encoding)? {
        return success(env.clone());
    }
    match frame.parse(token, &env.add_branch(frame.token))? {
        ParseResult::Success(next) => success(next.close_branch()?),
        ParseResult::Failure(_) => failure(env),
    }
}

pub(super) fn post(frame: &Frame, token: &Token, predicate: &Expression, env: &Environment) -> Result<ParseResult> {
    match frame.parse(token, &env.add_branch(frame.token))? {
        ParseResult::Success(next) if predicate.eval(&next, &frame.encoding)? => {
            success(next.close_branch()?)
        }
        _ => failure(env),
    }
}

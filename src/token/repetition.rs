//! Repetition. Each iteration runs in a loop, so the number of repetitions
//! never adds to the nesting depth of a parse.

use crate::data::{Environment, ParseResult};
use crate::diagnostics::Result;
use crate::expression::{Expression, ValueExpression};
use crate::token::Token;

use super::{failure, single_count, success, Frame};

/// Zero or more: stops at the first failing attempt and keeps everything before it.
/// An iteration that leaves the offset where it was also ends the run and is
/// dropped.
pub(super) fn rep(frame: &Frame, token: &Token, env: &Environment) -> Result<ParseResult> {
    let mut current = env.add_branch(frame.token);
    while let ParseResult::Success(next) = frame.parse(token, &current)? {
        if next.offset == current.offset {
            break;
        }
        current = next;
    }
    success(current.close_branch()?)
}

/// Exactly `n`: a shorter run fails the token.
pub(super) fn rep_n(frame: &Frame, token: &Token, n: &ValueExpression, env: &Environment) -> Result<ParseResult> {
    let Some(count) = single_count(n, env, &frame.encoding)? else {
        return failure(env);
    };
    let mut current = env.add_branch(frame.token);
    for _ in 0..count {
        match frame.parse(token, &current)? {
            ParseResult::Success(next) => current = next,
            ParseResult::Failure(_) => return failure(env),
        }
    }
    success(current.close_branch()?)
}

/// Repeats while `predicate` holds before each iteration; any failing iteration fails the token.
pub(super) fn rep_while(
    frame: &Frame,
    token: &Token,
    predicate: &Expression,
    env: &Environment,
) -> Result<ParseResult> {
    let mut current = env.add_branch(frame.token);
    while predicate.eval(&current, &frame.encoding)? {
        match frame.parse(token, &current)? {
            ParseResult::Success(next) => current = next,
            ParseResult::Failure(_) => return failure(env),
        }
    }
    success(current.close_branch()?)
}

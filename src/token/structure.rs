//! Tokens that parse away from the current position or by name.

use std::rc::Rc;

use log::debug;

use crate::data::{DataExpressionSource, Environment, ParseReference, ParseResult, Source};
use crate::diagnostics::{EngineError, Result};
use crate::expression::ValueExpression;
use crate::token::Token;

use super::{failure, single_count, success, Frame};

/// Parses `token` at `address` inside a branch and then returns to the
/// current offset.
///
/// When the graph already holds a structure starting at `address`, a
/// reference to it is added instead. This is what terminates cyclic data.
pub(super) fn sub(frame: &Frame, token: &Token, address: &ValueExpression, env: &Environment) -> Result<ParseResult> {
    let Some(address) = single_count(address, env, &frame.encoding)? else {
        return failure(env);
    };
    let branched = env.add_branch(frame.token);
    if env.graph.has_graph_at(address) {
        debug!("{:?} at {}: referencing structure at {}", frame.token, env.offset, address);
        let reference = ParseReference::new(address, frame.token.clone());
        return success(branched.add_reference(reference).close_branch()?);
    }
    match frame.parse(token, &branched.seek(address))? {
        ParseResult::Success(next) => success(next.close_branch()?.seek(env.offset)),
        ParseResult::Failure(_) => failure(env),
    }
}

/// Parses `token` over the bytes of each value `data` yields, earliest
/// first, and then returns to the current source and offset.
pub(super) fn tie(frame: &Frame, token: &Token, data: &ValueExpression, env: &Environment) -> Result<ParseResult> {
    let values = data.eval(env, &frame.encoding)?;
    if values.is_empty() || values.contains_empty() {
        return failure(env);
    }
    let mut current = env.add_branch(frame.token);
    for index in (0..values.len()).rev() {
        let source = Source::DataExpression(Rc::new(DataExpressionSource::new(
            data.clone(),
            index,
            env.clone(),
            frame.encoding,
        )));
        match frame.parse(token, &current.with_source(source, 0))? {
            ParseResult::Success(next) => current = next,
            ParseResult::Failure(_) => return failure(env),
        }
    }
    success(current.with_source(env.source.clone(), env.offset).close_branch()?)
}

/// Parses the token named `reference`, found among the definitions of the
/// graph built so far.
pub(super) fn token_ref(frame: &Frame, reference: &str, env: &Environment) -> Result<ParseResult> {
    let Some(token) = lookup(env, reference) else {
        return Err(EngineError::UnresolvedToken {
            name: reference.to_string(),
        });
    };
    debug!("{:?} resolved to {:?}", frame.token, token);
    frame.parse(&token, env)
}

fn lookup(env: &Environment, name: &str) -> Option<Token> {
    let root = env.graph.definition().into_iter();
    let nested = env.graph.items().filter_map(|item| item.definition());
    root.chain(nested).find(|token| token.name() == name).cloned()
}

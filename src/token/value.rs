use crate::data::{Environment, ParseResult, ParseValue, Slice};
use crate::diagnostics::Result;
use crate::expression::{Expression, ValueExpression};

use super::{failure, single_count, success, Frame};

/// Binds the next `size` bytes under the frame's scope.
///
/// Only availability is checked; the bytes are read when something first
/// looks at the value.
pub(super) fn def(
    frame: &Frame,
    size: &ValueExpression,
    predicate: &Expression,
    env: &Environment,
) -> Result<ParseResult> {
    let Some(size) = single_count(size, env, &frame.encoding)? else {
        return failure(env);
    };
    let Some(end) = env.offset.checked_add(size) else {
        return failure(env);
    };
    let Some(slice) = Slice::create(env.source.clone(), env.offset, size)? else {
        return failure(env);
    };
    let value = ParseValue::new(
        frame.scope,
        frame.token.clone(),
        slice,
        frame.encoding,
        env.next_sequence_id(),
    );
    let next = env.add_value(value).seek(end);
    if !predicate.eval(&next, &frame.encoding)? {
        return failure(env);
    }
    success(next)
}

pub(super) fn nod(frame: &Frame, size: &ValueExpression, env: &Environment) -> Result<ParseResult> {
    match single_count(size, env, &frame.encoding)?.and_then(|size| env.offset.checked_add(size)) {
        Some(end) => success(env.seek(end)),
        None => failure(env),
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::{con, def, def_with, eq_num, nod, reference, sub};
    use crate::data::{Environment, Source};
    use crate::encoding::Encoding;

    fn env(data: Vec<u8>) -> Environment {
        Environment::new(Source::from_bytes(data))
    }

    #[test]
    fn def_binds_and_advances() {
        let result = def("a", con(2)).parse(&env(vec![1, 2, 3]), &Encoding::default()).unwrap();
        let next = result.success().unwrap();
        assert_eq!(next.offset, 2);
        let value = next.graph.get("a").unwrap();
        assert_eq!(value.offset(), 0);
        assert_eq!(value.size(), 2);
        assert_eq!(&*value.bytes().unwrap(), &[1, 2]);
    }

    #[test]
    fn def_past_end_fails_unchanged() {
        let start = env(vec![1]);
        let result = def("a", con(2)).parse(&start, &Encoding::default()).unwrap();
        assert!(!result.succeeded());
        assert_eq!(result.environment(), &start);
    }

    #[test]
    fn def_size_must_be_single_and_non_negative() {
        let start = env(vec![1, 2]);
        let negative = def("a", sub(con(0), con(1)));
        assert!(!negative.parse(&start, &Encoding::signed()).unwrap().succeeded());
        let unbound = def("a", reference("missing"));
        assert!(!unbound.parse(&start, &Encoding::default()).unwrap().succeeded());
    }

    #[test]
    fn predicate_sees_the_new_value() {
        let token = def_with("a", con(1), eq_num(con(1)));
        assert!(token.parse(&env(vec![1]), &Encoding::default()).unwrap().succeeded());
        assert!(!token.parse(&env(vec![2]), &Encoding::default()).unwrap().succeeded());
    }

    #[test]
    fn nod_skips_without_binding() {
        let next = nod(con(3)).parse(&env(vec![]), &Encoding::default()).unwrap().success().unwrap();
        assert_eq!(next.offset, 3);
        assert!(next.graph.is_empty());
    }
}

use std::fmt;
use std::rc::Rc;

use crate::data::ParseResult;
use crate::token::Token;

/// A hook invoked with the token and the outcome of an attempt.
pub type Callback = Rc<dyn Fn(&Token, &ParseResult)>;

/// Observers notified after every token attempt.
///
/// Callbacks see the outcome but cannot influence it.
///
/// # Examples
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use strata::data::Callbacks;
///
/// let count = Rc::new(Cell::new(0));
/// let seen = Rc::clone(&count);
/// let callbacks = Callbacks::new().with_generic(move |_, _| seen.set(seen.get() + 1));
/// assert!(callbacks.has_generic());
/// ```
#[derive(Clone, Default)]
pub struct Callbacks {
    generic: Option<Callback>,
    tokens: Vec<(Token, Callback)>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the callback invoked for every token.
    pub fn with_generic(self, callback: impl Fn(&Token, &ParseResult) + 'static) -> Self {
        Self {
            generic: Some(Rc::new(callback)),
            ..self
        }
    }

    /// Adds a callback invoked only for `token`.
    pub fn with_token(mut self, token: &Token, callback: impl Fn(&Token, &ParseResult) + 'static) -> Self {
        self.tokens.push((token.clone(), Rc::new(callback)));
        self
    }

    pub fn has_generic(&self) -> bool {
        self.generic.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.generic.is_none() && self.tokens.is_empty()
    }

    pub fn handle(&self, token: &Token, result: &ParseResult) {
        if let Some(generic) = &self.generic {
            generic(token, result);
        }
        for (target, callback) in &self.tokens {
            if target == token {
                callback(token, result);
            }
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("generic", &self.generic.is_some())
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

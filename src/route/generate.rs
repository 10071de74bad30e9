//! URL generation from a compiled [`RoutePattern`].

use std::ops::ControlFlow;

use tracing::debug;

use super::pattern::{RoutePattern, Token};
use super::RouteError;
use crate::http::{Params, DEFAULT_ACTION, DEFAULT_CONTROLLER, DEFAULT_MODULE};

impl RoutePattern {
    /// Build a concrete URL from `params`.
    ///
    /// `module`, `controller` and `action` fall back to the default routing
    /// identity. An optional group whose own placeholders are not all
    /// supplied is dropped together with everything after it; a missing
    /// placeholder outside any optional group is an error. The catch-all
    /// suffix emits nothing. A non-empty `query` is appended as `?query`, a
    /// non-empty `fragment` as `#fragment`.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidParams`] naming every missing required placeholder.
    pub fn build(&self, params: &Params, query: &str, fragment: &str) -> Result<String, RouteError> {
        let mut url = String::with_capacity(self.as_str().len() + query.len() + fragment.len() + 2);

        if self.placeholders().is_empty() {
            push_literals(&self.tokens, &mut url);
        } else {
            let lookup = Lookup { params };
            let mut missing = Vec::new();
            if render(&self.tokens, lookup, &mut url, &mut missing).is_break() {
                debug!(
                    pattern = %self.as_str(),
                    url = %url,
                    "Optional group with unresolved params dropped"
                );
            }
            if !missing.is_empty() {
                return Err(RouteError::InvalidParams {
                    pattern: self.as_str().to_string(),
                    missing,
                });
            }
        }

        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }
        if !fragment.is_empty() {
            url.push('#');
            url.push_str(fragment);
        }
        Ok(url)
    }
}

/// Caller params layered over the default routing identity.
#[derive(Clone, Copy)]
struct Lookup<'p> {
    params: &'p Params,
}

impl<'p> Lookup<'p> {
    fn get(self, name: &str) -> Option<&'p str> {
        self.params.get(name).map(String::as_str).or(match name {
            "module" => Some(DEFAULT_MODULE),
            "controller" => Some(DEFAULT_CONTROLLER),
            "action" => Some(DEFAULT_ACTION),
            _ => None,
        })
    }
}

fn push_literals(tokens: &[Token], url: &mut String) {
    for token in tokens {
        match token {
            Token::Literal(text) => url.push_str(text),
            Token::Optional(children) => push_literals(children, url),
            Token::Placeholder(_) => {}
        }
    }
}

fn render(
    tokens: &[Token],
    lookup: Lookup<'_>,
    url: &mut String,
    missing: &mut Vec<String>,
) -> ControlFlow<()> {
    for token in tokens {
        match token {
            Token::Literal(text) => url.push_str(text),
            Token::Placeholder(name) => match lookup.get(name) {
                Some(value) => url.push_str(value),
                None => {
                    if !missing.contains(name) {
                        missing.push(name.clone());
                    }
                }
            },
            Token::Optional(children) => {
                if !own_placeholders_resolved(children, lookup) {
                    return ControlFlow::Break(());
                }
                render(children, lookup, url, missing)?;
            }
        }
    }
    ControlFlow::Continue(())
}

/// Placeholders directly inside a group; nested groups decide for themselves.
fn own_placeholders_resolved(tokens: &[Token], lookup: Lookup<'_>) -> bool {
    tokens.iter().all(|token| match token {
        Token::Placeholder(name) => lookup.get(name).is_some(),
        _ => true,
    })
}

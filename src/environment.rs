use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;

/// One lexical frame: a name→value mapping with a link to the enclosing
/// frame.  Frames are shared (`Rc<RefCell<_>>`) because any number of
/// closures may capture the same frame.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    pub fn define(&mut self, name: &str, value: Value) {
        debug!("Defining '{}'", name);

        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(LoxError::runtime(
                name.line,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);

            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(LoxError::runtime(
                name.line,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// Read `name` from the frame exactly `distance` hops up the chain.  The
    /// resolver guarantees the frame exists; a missing binding reads as nil.
    pub fn get_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &str) -> Value {
        Self::ancestor(env, distance)
            .borrow()
            .values
            .get(name)
            .cloned()
            .unwrap_or(Value::Nil)
    }

    /// Write `name` in the frame exactly `distance` hops up the chain.
    pub fn assign_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &Token, value: Value) {
        Self::ancestor(env, distance)
            .borrow_mut()
            .values
            .insert(name.lexeme.clone(), value);
    }

    fn ancestor(env: &Rc<RefCell<Environment>>, distance: usize) -> Rc<RefCell<Environment>> {
        let mut current: Rc<RefCell<Environment>> = Rc::clone(env);

        for _ in 0..distance {
            let next: Rc<RefCell<Environment>> = current
                .borrow()
                .enclosing
                .clone()
                .expect("resolver recorded a depth deeper than the frame chain");

            current = next;
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn name(lexeme: &str) -> Token {
        Token::new(TokenType::IDENTIFIER, lexeme.to_string(), 1)
    }

    #[test]
    fn define_then_get() {
        let mut env = Environment::new();
        env.define("a", Value::Number(1.0));

        assert!(matches!(env.get(&name("a")), Ok(Value::Number(n)) if n == 1.0));
    }

    #[test]
    fn get_walks_enclosing_chain() {
        let outer = Rc::new(RefCell::new(Environment::new()));
        outer.borrow_mut().define("a", Value::Number(1.0));

        let inner = Environment::with_enclosing(Rc::clone(&outer));

        assert!(matches!(inner.get(&name("a")), Ok(Value::Number(n)) if n == 1.0));
    }

    #[test]
    fn undefined_variable_errors() {
        let env = Environment::new();

        assert!(env.get(&name("missing")).is_err());
    }

    #[test]
    fn get_at_reads_exact_frame() {
        let outer = Rc::new(RefCell::new(Environment::new()));
        outer.borrow_mut().define("a", Value::Number(1.0));

        let inner = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(&outer))));
        inner.borrow_mut().define("a", Value::Number(2.0));

        assert!(matches!(Environment::get_at(&inner, 0, "a"), Value::Number(n) if n == 2.0));
        assert!(matches!(Environment::get_at(&inner, 1, "a"), Value::Number(n) if n == 1.0));
    }
}

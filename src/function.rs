use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

use log::debug;

use crate::class::LoxInstance;
use crate::environment::Environment;
use crate::error::Result;
use crate::interpreter::{Flow, Interpreter};
use crate::stmt::FunctionDecl;
use crate::value::Value;

/// A user-defined function: its declaration plus the frame it closed over.
#[derive(Clone)]
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: Rc<RefCell<Environment>>,
    is_initializer: bool,
}

impl LoxFunction {
    pub fn new(
        declaration: Rc<FunctionDecl>,
        closure: Rc<RefCell<Environment>>,
        is_initializer: bool,
    ) -> Self {
        LoxFunction {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    /// Call with already-evaluated arguments.  The caller has checked arity.
    pub fn call<W: Write>(
        &self,
        interpreter: &mut Interpreter<W>,
        arguments: Vec<Value>,
    ) -> Result<Value> {
        debug!("Calling <fn {}>", self.name());

        let environment: Rc<RefCell<Environment>> = Rc::new(RefCell::new(
            Environment::with_enclosing(Rc::clone(&self.closure)),
        ));

        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            environment.borrow_mut().define(&param.lexeme, argument);
        }

        let flow: Flow = interpreter.execute_block(&self.declaration.body, environment)?;

        // An initializer always hands back its instance, whatever the body did.
        if self.is_initializer {
            return Ok(Environment::get_at(&self.closure, 0, "this"));
        }

        match flow {
            Flow::Return(value) => Ok(value),

            _ => Ok(Value::Nil),
        }
    }

    /// Produce a copy of this method whose closure holds `this`.
    pub fn bind(&self, instance: &Rc<RefCell<LoxInstance>>) -> LoxFunction {
        let environment: Rc<RefCell<Environment>> = Rc::new(RefCell::new(
            Environment::with_enclosing(Rc::clone(&self.closure)),
        ));

        environment
            .borrow_mut()
            .define("this", Value::Instance(Rc::clone(instance)));

        LoxFunction::new(
            Rc::clone(&self.declaration),
            environment,
            self.is_initializer,
        )
    }
}

impl fmt::Debug for LoxFunction {
    // The closure chain can be cyclic; never walk it while printing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoxFunction")
            .field("name", &self.name())
            .field("arity", &self.arity())
            .finish()
    }
}

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info};

use crate::class::{LoxClass, LoxInstance};
use crate::environment::Environment;
use crate::error::{LoxError, Result};
use crate::expr::{Expr, ExprId, LiteralValue};
use crate::function::LoxFunction;
use crate::reporter::ErrorReporter;
use crate::stmt::Stmt;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// How a statement finished.  `Break` unwinds to the nearest loop and
/// `Return` to the nearest function call; both are ordinary values, never
/// errors.
#[derive(Debug)]
pub enum Flow {
    Normal,
    Break,
    Return(Value),
}

pub struct Interpreter<W: Write> {
    output: W,
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<ExprId, usize>,
}

impl<W: Write> Interpreter<W> {
    /// Program output (the `print` statement) goes to `output`; the binary
    /// passes stdout, tests pass a buffer.
    pub fn new(output: W) -> Self {
        let globals: Rc<RefCell<Environment>> = Rc::new(RefCell::new(Environment::new()));

        globals.borrow_mut().define(
            "clock",
            Value::NativeFunction {
                name: "clock".to_string(),
                arity: 0,
                func: clock_native,
            },
        );

        Interpreter {
            output,
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
        }
    }

    /// Consume the interpreter and hand back its output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Record a binding distance for a resolvable expression node.  Called by
    /// the resolver; absence of an entry means "global".
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        debug!("Noting local {} at depth {}", id, depth);

        self.locals.insert(id, depth);
    }

    /// Run a resolved program.  A runtime error halts execution, goes to the
    /// reporter, and is handed back so the driver can map it to an exit code.
    pub fn interpret(
        &mut self,
        statements: &[Stmt],
        reporter: &mut dyn ErrorReporter,
    ) -> Result<()> {
        info!("Interpreting {} statement(s)", statements.len());

        for statement in statements {
            if let Err(e) = self.execute(statement) {
                if let LoxError::Runtime { line, message } = &e {
                    reporter.runtime_error(*line, message);
                }

                return Err(e);
            }
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────────

    fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;

                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value: Value = self.evaluate(expr)?;

                writeln!(self.output, "{}", value)?;

                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value: Value = if let Some(expr) = initializer {
                    self.evaluate(expr)?
                } else {
                    Value::Nil
                };

                self.environment.borrow_mut().define(&name.lexeme, value);

                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let enclosed: Rc<RefCell<Environment>> = Rc::new(RefCell::new(
                    Environment::with_enclosing(Rc::clone(&self.environment)),
                ));

                self.execute_block(statements, enclosed)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if is_truthy(&self.evaluate(condition)?) {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                while is_truthy(&self.evaluate(condition)?) {
                    match self.execute(body)? {
                        Flow::Normal => {}

                        Flow::Break => break,

                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }

                Ok(Flow::Normal)
            }

            Stmt::Break => Ok(Flow::Break),

            Stmt::Function(declaration) => {
                let function = LoxFunction::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );

                self.environment
                    .borrow_mut()
                    .define(&declaration.name.lexeme, Value::Function(Rc::new(function)));

                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value: Value = if let Some(expr) = value {
                    self.evaluate(expr)?
                } else {
                    Value::Nil
                };

                Ok(Flow::Return(value))
            }

            Stmt::Class { name, methods } => {
                // Two-step definition so methods can close over the scope
                // that already knows the class name.
                self.environment.borrow_mut().define(&name.lexeme, Value::Nil);

                let mut method_table: HashMap<String, LoxFunction> = HashMap::new();

                for method in methods {
                    let is_initializer: bool = method.name.lexeme == "init";

                    method_table.insert(
                        method.name.lexeme.clone(),
                        LoxFunction::new(
                            Rc::clone(method),
                            Rc::clone(&self.environment),
                            is_initializer,
                        ),
                    );
                }

                let class = LoxClass::new(name.lexeme.clone(), method_table);

                self.environment
                    .borrow_mut()
                    .assign(name, Value::Class(Rc::new(class)))?;

                Ok(Flow::Normal)
            }
        }
    }

    /// Run `statements` inside `environment`, restoring the previous frame on
    /// every exit path.  Break/Return short-circuit the rest of the block.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<Flow> {
        let previous: Rc<RefCell<Environment>> = Rc::clone(&self.environment);

        self.environment = environment;

        let mut flow: Flow = Flow::Normal;

        for statement in statements {
            match self.execute(statement) {
                Ok(Flow::Normal) => {}

                Ok(other) => {
                    flow = other;
                    break;
                }

                Err(e) => {
                    self.environment = Rc::clone(&previous);
                    return Err(e);
                }
            }
        }

        self.environment = previous;

        Ok(flow)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────────

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(evaluate_literal(literal)),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => self.evaluate_logical(left, operator, right),

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value: Value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => {
                        Environment::assign_at(&self.environment, distance, name, value.clone());
                    }

                    None => {
                        self.globals.borrow_mut().assign(name, value.clone())?;
                    }
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                closing_paren,
                arguments,
            } => self.evaluate_call(callee, closing_paren, arguments),

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => LoxInstance::get(&instance, name),

                _ => Err(LoxError::runtime(
                    name.line,
                    "Only instances have properties.",
                )),
            },

            Expr::Set {
                object,
                name,
                value,
            } => match self.evaluate(object)? {
                Value::Instance(instance) => {
                    let value: Value = self.evaluate(value)?;

                    instance.borrow_mut().set(name, value.clone());

                    Ok(value)
                }

                _ => Err(LoxError::runtime(name.line, "Only instances have fields.")),
            },

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),

            // The resolver rejects every `super`; this arm is unreachable in
            // a program that made it past resolution.
            Expr::Super { keyword, .. } => Err(LoxError::runtime(
                keyword.line,
                "Can't use 'super' in a class with no superclass.",
            )),
        }
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => Ok(Environment::get_at(&self.environment, distance, &name.lexeme)),

            None => self.globals.borrow().get(name),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<Value> {
        let value: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::MINUS => match value {
                Value::Number(n) => Ok(Value::Number(-n)),

                _ => Err(LoxError::runtime(
                    operator.line,
                    "Operand must be a number.",
                )),
            },

            TokenType::BANG => Ok(Value::Bool(!is_truthy(&value))),

            _ => Err(LoxError::runtime(operator.line, "Invalid unary operator.")),
        }
    }

    fn evaluate_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left_val: Value = self.evaluate(left)?;

        // Short-circuit: hand back the deciding operand itself.
        match operator.token_type {
            TokenType::OR if is_truthy(&left_val) => Ok(left_val),

            TokenType::AND if !is_truthy(&left_val) => Ok(left_val),

            _ => self.evaluate(right),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left_val: Value = self.evaluate(left)?;
        let right_val: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::PLUS => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),

                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),

                _ => Err(LoxError::runtime(
                    operator.line,
                    "Operands must be two numbers or two strings.",
                )),
            },

            TokenType::MINUS => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),

                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers.")),
            },

            TokenType::STAR => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),

                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers.")),
            },

            TokenType::SLASH => match (left_val, right_val) {
                // IEEE semantics; dividing by zero yields an infinity.
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),

                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers.")),
            },

            TokenType::EQUAL_EQUAL => Ok(Value::Bool(is_equal(&left_val, &right_val))),

            TokenType::BANG_EQUAL => Ok(Value::Bool(!is_equal(&left_val, &right_val))),

            TokenType::GREATER => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a > b)),

                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers.")),
            },

            TokenType::GREATER_EQUAL => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a >= b)),

                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers.")),
            },

            TokenType::LESS => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a < b)),

                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers.")),
            },

            TokenType::LESS_EQUAL => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a <= b)),

                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers.")),
            },

            _ => Err(LoxError::runtime(operator.line, "Invalid binary operator.")),
        }
    }

    fn evaluate_call(
        &mut self,
        callee: &Expr,
        closing_paren: &Token,
        arguments: &[Expr],
    ) -> Result<Value> {
        let callee_val: Value = self.evaluate(callee)?;

        let mut arg_values: Vec<Value> = Vec::with_capacity(arguments.len());

        for argument in arguments {
            arg_values.push(self.evaluate(argument)?);
        }

        let arity: usize = match &callee_val {
            Value::Function(function) => function.arity(),

            Value::Class(class) => class.arity(),

            Value::NativeFunction { arity, .. } => *arity,

            _ => {
                return Err(LoxError::runtime(
                    closing_paren.line,
                    "Can only call functions and classes.",
                ));
            }
        };

        if arg_values.len() != arity {
            return Err(LoxError::runtime(
                closing_paren.line,
                format!(
                    "Expected {} arguments but got {}.",
                    arity,
                    arg_values.len()
                ),
            ));
        }

        match callee_val {
            Value::Function(function) => function.call(self, arg_values),

            Value::Class(class) => LoxClass::call(&class, self, arg_values),

            Value::NativeFunction { func, .. } => {
                func(&arg_values).map_err(|msg| LoxError::runtime(closing_paren.line, msg))
            }

            _ => unreachable!("non-callables rejected above"),
        }
    }
}

fn evaluate_literal(literal: &LiteralValue) -> Value {
    match literal {
        LiteralValue::Number(n) => Value::Number(*n),

        LiteralValue::Str(s) => Value::Str(s.clone()),

        LiteralValue::True => Value::Bool(true),

        LiteralValue::False => Value::Bool(false),

        LiteralValue::Nil => Value::Nil,
    }
}

/// `nil` and `false` are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Nil => false,

        Value::Bool(b) => *b,

        _ => true,
    }
}

fn is_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Nil, Value::Nil) => true,

        (Value::Number(a), Value::Number(b)) => a == b,

        (Value::Str(a), Value::Str(b)) => a == b,

        (Value::Bool(a), Value::Bool(b)) => a == b,

        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),

        (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),

        (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),

        _ => false,
    }
}

fn clock_native(_args: &[Value]) -> std::result::Result<Value, String> {
    let timestamp: f64 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| format!("Clock error: {}", e))?
        .as_millis() as f64;

    Ok(Value::Number(timestamp))
}

//! Static resolution pass for the Rox interpreter.
//!
//! This module performs a single AST walk to:
//! 1. **Build lexical scopes**: maintains a stack of maps tracking declared
//!    (not yet defined) and fully defined names in each nested block or
//!    function, along with whether each name was ever referenced.
//! 2. **Enforce static rules**: reports errors such as redeclaration in the
//!    same scope, reading a variable in its own initializer, invalid `return`
//!    outside functions, returning a value from an initializer, illegal use
//!    of `this` outside of class methods, any use of `super` (classes have no
//!    superclass), and locals that are never used.
//! 3. **Record binding distances**: for every variable occurrence
//!    (`Expr::Variable`, `Expr::Assign`, `Expr::This`), calls back into the
//!    interpreter to note whether it is a local (and at what depth) or a
//!    global.  This lets the runtime climb exactly the right number of
//!    environment frames.
//!
//! Diagnostics accumulate in the reporter over the whole program; the
//! resolver never stops early.  The driver refuses to run a program whose
//! resolution reported anything.
//!
//! The top level deliberately has no scope: top-level names live in the
//! globals frame and are not depth-tracked.

use std::collections::HashMap;
use std::io::Write;

use log::{debug, info};

use crate::expr::{Expr, ExprId};
use crate::interpreter::Interpreter;
use crate::reporter::ErrorReporter;
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::Token;

/// Are we inside a user function?  Used to validate `return`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Method,
    Initializer,
}

/// Are we inside a class body?  Used to validate `this`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
}

/// Per-name bookkeeping inside one scope.
#[derive(Debug)]
struct VariableStatus {
    /// Declaration site, for diagnostics.
    token: Token,
    defined: bool,
    used: bool,
}

pub struct Resolver<'i, 'r, W: Write> {
    interpreter: &'i mut Interpreter<W>,
    reporter: &'r mut dyn ErrorReporter,
    scopes: Vec<HashMap<String, VariableStatus>>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'i, 'r, W: Write> Resolver<'i, 'r, W> {
    pub fn new(interpreter: &'i mut Interpreter<W>, reporter: &'r mut dyn ErrorReporter) -> Self {
        info!("Resolver instantiated");

        Resolver {
            interpreter,
            reporter,
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    /// Walk all top‑level statements, accumulating diagnostics as we go.
    pub fn resolve(&mut self, statements: &[Stmt]) {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );

        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statement resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expr) | Stmt::Print(expr) => {
                // 1. Resolve the inner expression of expression/print statements
                self.resolve_expr(expr);
            }

            Stmt::Var { name, initializer } => {
                // 1. Declare the variable name (present but not yet defined)
                self.declare(name);

                // 2. Resolve the initializer expression, if any
                if let Some(expr) = initializer {
                    self.resolve_expr(expr);
                }

                // 3. Define the variable so it's readable from here on
                self.define(name);
            }

            Stmt::Block(statements) => {
                // 1. Push a new anonymous scope for `{ … }`
                self.begin_scope();

                for s in statements {
                    self.resolve_stmt(s);
                }

                // 2. Pop the block scope
                self.end_scope();
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);

                self.resolve_stmt(then_branch);

                if let Some(eb) = else_branch.as_deref() {
                    self.resolve_stmt(eb);
                }
            }

            Stmt::While { condition, body } => {
                self.resolve_expr(condition);

                self.resolve_stmt(body);
            }

            Stmt::Break => {
                // Loop placement was checked by the parser.
            }

            Stmt::Function(declaration) => {
                // 1. Declare and define the name up front (allow recursion)
                self.declare(&declaration.name);
                self.define(&declaration.name);

                // 2. Resolve parameters and body under a function context
                self.resolve_function(FunctionType::Function, declaration);
            }

            Stmt::Return { keyword, value } => {
                // 1. Ensure we're inside a function or initializer
                if self.current_function == FunctionType::None {
                    self.reporter
                        .parse_error(keyword, "Can't return from top-level code.");
                }

                if let Some(expr) = value {
                    // 2. In an initializer, only bare `return;` is allowed
                    if self.current_function == FunctionType::Initializer {
                        self.reporter
                            .parse_error(keyword, "Can't return a value from an initializer.");
                    }

                    self.resolve_expr(expr);
                }
            }

            Stmt::Class { name, methods } => {
                // 1. Save and enter the class context
                let enclosing_class: ClassType = self.current_class;

                self.current_class = ClassType::Class;

                // 2. Declare & define the class name so methods can refer to it
                self.declare(name);
                self.define(name);

                // 3. Open the implicit `this` scope for the method bodies.
                //    `this` counts as used whether or not a method mentions it.
                self.begin_scope();

                if let Some(scope) = self.scopes.last_mut() {
                    scope.insert(
                        "this".to_string(),
                        VariableStatus {
                            token: name.clone(),
                            defined: true,
                            used: true,
                        },
                    );
                }

                // 4. Resolve each method; `init` gets the initializer context
                for method in methods {
                    let kind: FunctionType = if method.name.lexeme == "init" {
                        FunctionType::Initializer
                    } else {
                        FunctionType::Method
                    };

                    self.resolve_function(kind, method);
                }

                // 5. Close the `this` scope
                self.end_scope();

                // 6. Restore the outer class context
                self.current_class = enclosing_class;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expression resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {
                // Literals have no sub‑expressions
            }

            Expr::Grouping(inner) => {
                self.resolve_expr(inner);
            }

            Expr::Unary { right, .. } => {
                self.resolve_expr(right);
            }

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }

            Expr::Variable { id, name } => {
                // 1. Prevent reading a variable in its own initializer
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.lexeme).is_some_and(|status| !status.defined) {
                        self.reporter.parse_error(
                            name,
                            "Can't read local variable in its own initializer.",
                        );
                    }
                }

                // 2. Bind this occurrence at its lexical depth
                self.resolve_local(*id, name);
            }

            Expr::Assign { id, name, value } => {
                // Resolve the right‑hand side first, then bind the target
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee);

                for arg in arguments {
                    self.resolve_expr(arg);
                }
            }

            Expr::Get { object, .. } => {
                self.resolve_expr(object);
            }

            Expr::Set { object, value, .. } => {
                self.resolve_expr(object);
                self.resolve_expr(value);
            }

            Expr::This { id, keyword } => {
                // `this` only makes sense inside class methods
                if self.current_class == ClassType::None {
                    self.reporter
                        .parse_error(keyword, "Can't use 'this' outside of a class.");

                    return;
                }

                self.resolve_local(*id, keyword);
            }

            Expr::Super { keyword, .. } => {
                // Classes have no superclass clause, so no `super` ever binds.
                if self.current_class == ClassType::None {
                    self.reporter
                        .parse_error(keyword, "Can't use 'super' outside of a class.");
                } else {
                    self.reporter.parse_error(
                        keyword,
                        "Can't use 'super' in a class with no superclass.",
                    );
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Function helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter a fresh scope for a function's parameters + body.
    ///
    /// `kind` distinguishes plain functions, methods, and initializers.
    fn resolve_function(&mut self, kind: FunctionType, declaration: &FunctionDecl) {
        // 1. Save the enclosing function context so we can restore it later
        let enclosing: FunctionType = self.current_function;

        self.current_function = kind;

        // 2. Begin a new lexical scope for the parameters & body
        self.begin_scope();

        // 3. Declare and immediately define each parameter
        for param in &declaration.params {
            self.declare(param);
            self.define(param);
        }

        // 4. Resolve the body under the current context
        for stmt in &declaration.body {
            self.resolve_stmt(stmt);
        }

        // 5. End the function scope, sweeping for unused locals
        self.end_scope();

        // 6. Restore the previous function context
        self.current_function = enclosing;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope management
    // ─────────────────────────────────────────────────────────────────────────

    #[inline]
    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pop the innermost scope, reporting any local that was never read.
    fn end_scope(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            for status in scope.values() {
                if !status.used {
                    self.reporter
                        .parse_error(&status.token, "Local variable is unused.");
                }
            }
        }
    }

    fn declare(&mut self, name: &Token) {
        // Top level: globals are not tracked
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };

        if scope.contains_key(&name.lexeme) {
            self.reporter
                .parse_error(name, "Already a variable with this name in this scope.");
        }

        scope.insert(
            name.lexeme.clone(),
            VariableStatus {
                token: name.clone(),
                defined: false,
                used: false,
            },
        );
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            if let Some(status) = scope.get_mut(&name.lexeme) {
                status.defined = true;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding‑distance helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Record this occurrence as a local at depth `d`, or leave it for the
    /// globals frame if no scope defines it.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        // 1. Search each scope from innermost outward
        for (depth, scope) in self.scopes.iter_mut().rev().enumerate() {
            if let Some(status) = scope.get_mut(&name.lexeme) {
                if status.defined {
                    debug!("Resolved '{}' at depth {}", name.lexeme, depth);

                    status.used = true;

                    // 2. Tell the interpreter about the local binding
                    self.interpreter.resolve(id, depth);

                    return;
                }
            }
        }

        // 3. Not found in any scope → it's a global
        debug!("Resolved '{}' as global", name.lexeme);
    }
}

use std::rc::Rc;

use log::{debug, info};

use crate::error::{LoxError, Result};
use crate::expr::{Expr, ExprId, LiteralValue};
use crate::reporter::ErrorReporter;
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::{Token, TokenType};

/*
program     := declaration* EOF
declaration := varDecl | funDecl | classDecl | statement
varDecl     := "var" IDENT ("=" expression)? ";"
funDecl     := "fun" function
function    := IDENT "(" params? ")" block
classDecl   := "class" IDENT "{" function* "}"
statement   := exprStmt | printStmt | ifStmt | whileStmt | forStmt
             | breakStmt | returnStmt | block
expression  := assignment
assignment  := (call ".")? IDENT "=" assignment | logic_or
logic_or    := logic_and ("or" logic_and)*
logic_and   := equality ("and" equality)*
equality    := comparison (("!="|"==") comparison)*
comparison  := term ((">"|">="|"<"|"<=") term)*
term        := factor (("+"|"-") factor)*
factor      := unary (("/"|"*") unary)*
unary       := ("!"|"-") unary | call
call        := primary ( "(" args? ")" | "." IDENT )*
primary     := NUMBER | STRING | "true" | "false" | "nil"
             | "(" expression ")" | IDENT | "this" | "super" "." IDENT
*/

const MAX_ARITY: usize = 255;

pub struct Parser<'r> {
    tokens: Vec<Token>,
    current: usize,
    reporter: &'r mut dyn ErrorReporter,
    loop_depth: usize,
}

impl<'r> Parser<'r> {
    pub fn new(tokens: Vec<Token>, reporter: &'r mut dyn ErrorReporter) -> Self {
        let mut tokens = tokens;

        // The cursor helpers rely on a trailing EOF sentinel.
        if !tokens.last().is_some_and(Token::is_eof) {
            let line: usize = tokens.last().map_or(1, |t| t.line);

            tokens.push(Token::new(TokenType::EOF, String::new(), line));
        }

        Parser {
            tokens,
            current: 0,
            reporter,
            loop_depth: 0,
        }
    }

    /// Parse the whole program.  Syntax errors go to the reporter; the parser
    /// synchronises and keeps collecting the statements it can make sense of.
    pub fn parse(&mut self) -> Vec<Stmt> {
        info!("Beginning parse over {} token(s)", self.tokens.len());

        let mut statements: Vec<Stmt> = Vec::new();

        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),

                Err(e) => {
                    debug!("Parse error, synchronising: {}", e);

                    self.synchronize();
                }
            }
        }

        statements
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Declarations and statements
    // ─────────────────────────────────────────────────────────────────────────

    fn declaration(&mut self) -> Result<Stmt> {
        if self.match_tokens(&[TokenType::VAR]) {
            return self.var_declaration();
        }

        if self.match_tokens(&[TokenType::FUN]) {
            return Ok(Stmt::Function(self.function("function")?));
        }

        if self.match_tokens(&[TokenType::CLASS]) {
            return self.class_declaration();
        }

        self.statement()
    }

    fn var_declaration(&mut self) -> Result<Stmt> {
        let name: Token = self.consume(&TokenType::IDENTIFIER, "Expect variable name.")?;

        let initializer: Option<Expr> = if self.match_tokens(&[TokenType::EQUAL]) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            &TokenType::SEMICOLON,
            "Expect ';' after variable declaration.",
        )?;

        Ok(Stmt::Var { name, initializer })
    }

    fn class_declaration(&mut self) -> Result<Stmt> {
        let name: Token = self.consume(&TokenType::IDENTIFIER, "Expect class name.")?;

        self.consume(&TokenType::LEFT_BRACE, "Expect '{' before class body.")?;

        let mut methods: Vec<Rc<FunctionDecl>> = Vec::new();

        while !self.check(&TokenType::RIGHT_BRACE) && !self.is_at_end() {
            methods.push(self.function("method")?);
        }

        self.consume(&TokenType::RIGHT_BRACE, "Expect '}' after class body.")?;

        Ok(Stmt::Class { name, methods })
    }

    fn function(&mut self, kind: &str) -> Result<Rc<FunctionDecl>> {
        let name: Token =
            self.consume(&TokenType::IDENTIFIER, &format!("Expect {} name.", kind))?;

        self.consume(
            &TokenType::LEFT_PAREN,
            &format!("Expect '(' after {} name.", kind),
        )?;

        let mut params: Vec<Token> = Vec::new();

        if !self.check(&TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= MAX_ARITY {
                    // Non-fatal: report and keep parsing.
                    let token: Token = self.peek().clone();

                    self.reporter
                        .parse_error(&token, "Can't have more than 255 parameters.");
                }

                params.push(self.consume(&TokenType::IDENTIFIER, "Expect parameter name.")?);

                if !self.match_tokens(&[TokenType::COMMA]) {
                    break;
                }
            }
        }

        self.consume(&TokenType::RIGHT_PAREN, "Expect ')' after parameters.")?;

        self.consume(
            &TokenType::LEFT_BRACE,
            &format!("Expect '{{' before {} body.", kind),
        )?;

        let body: Vec<Stmt> = self.block()?;

        Ok(Rc::new(FunctionDecl { name, params, body }))
    }

    fn statement(&mut self) -> Result<Stmt> {
        if self.match_tokens(&[TokenType::PRINT]) {
            return self.print_statement();
        }

        if self.match_tokens(&[TokenType::IF]) {
            return self.if_statement();
        }

        if self.match_tokens(&[TokenType::WHILE]) {
            return self.while_statement();
        }

        if self.match_tokens(&[TokenType::FOR]) {
            return self.for_statement();
        }

        if self.match_tokens(&[TokenType::BREAK]) {
            return self.break_statement();
        }

        if self.match_tokens(&[TokenType::RETURN]) {
            return self.return_statement();
        }

        if self.match_tokens(&[TokenType::LEFT_BRACE]) {
            return Ok(Stmt::Block(self.block()?));
        }

        self.expression_statement()
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        let value: Expr = self.expression()?;

        self.consume(&TokenType::SEMICOLON, "Expect ';' after value.")?;

        Ok(Stmt::Print(value))
    }

    fn if_statement(&mut self) -> Result<Stmt> {
        self.consume(&TokenType::LEFT_PAREN, "Expect '(' after 'if'.")?;

        let condition: Expr = self.expression()?;

        self.consume(&TokenType::RIGHT_PAREN, "Expect ')' after if condition.")?;

        let then_branch: Box<Stmt> = Box::new(self.statement()?);

        let else_branch: Option<Box<Stmt>> = if self.match_tokens(&[TokenType::ELSE]) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt> {
        self.consume(&TokenType::LEFT_PAREN, "Expect '(' after 'while'.")?;

        let condition: Expr = self.expression()?;

        self.consume(&TokenType::RIGHT_PAREN, "Expect ')' after condition.")?;

        self.loop_depth += 1;

        let body = self.statement();

        self.loop_depth -= 1;

        Ok(Stmt::While {
            condition,
            body: Box::new(body?),
        })
    }

    /// `for` is pure sugar: it is rewritten into a block holding the
    /// initializer and a `while` loop whose body appends the increment.
    fn for_statement(&mut self) -> Result<Stmt> {
        self.consume(&TokenType::LEFT_PAREN, "Expect '(' after 'for'.")?;

        let initializer: Option<Stmt> = if self.match_tokens(&[TokenType::SEMICOLON]) {
            None
        } else if self.match_tokens(&[TokenType::VAR]) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition: Option<Expr> = if !self.check(&TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(&TokenType::SEMICOLON, "Expect ';' after loop condition.")?;

        let increment: Option<Expr> = if !self.check(&TokenType::RIGHT_PAREN) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(&TokenType::RIGHT_PAREN, "Expect ')' after for clauses.")?;

        self.loop_depth += 1;

        let body = self.statement();

        self.loop_depth -= 1;

        let mut body: Stmt = body?;

        if let Some(incr) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(incr)]);
        }

        let condition: Expr = condition.unwrap_or(Expr::Literal(LiteralValue::True));

        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(init) = initializer {
            body = Stmt::Block(vec![init, body]);
        }

        Ok(body)
    }

    fn break_statement(&mut self) -> Result<Stmt> {
        let keyword: Token = self.previous().clone();

        if self.loop_depth == 0 {
            return Err(self.error(&keyword, "Must be inside a loop to use 'break'."));
        }

        self.consume(&TokenType::SEMICOLON, "Expect ';' after 'break'.")?;

        Ok(Stmt::Break)
    }

    fn return_statement(&mut self) -> Result<Stmt> {
        let keyword: Token = self.previous().clone();

        let value: Option<Expr> = if !self.check(&TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(&TokenType::SEMICOLON, "Expect ';' after return value.")?;

        Ok(Stmt::Return { keyword, value })
    }

    fn block(&mut self) -> Result<Vec<Stmt>> {
        let mut statements: Vec<Stmt> = Vec::new();

        while !self.check(&TokenType::RIGHT_BRACE) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }

        self.consume(&TokenType::RIGHT_BRACE, "Expect '}' after block.")?;

        Ok(statements)
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let expr: Expr = self.expression()?;

        self.consume(&TokenType::SEMICOLON, "Expect ';' after expression.")?;

        Ok(Stmt::Expression(expr))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────────

    fn expression(&mut self) -> Result<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr> {
        let expr: Expr = self.or()?;

        if self.match_tokens(&[TokenType::EQUAL]) {
            let equals: Token = self.previous().clone();
            let value: Expr = self.assignment()?;

            match expr {
                Expr::Variable { name, .. } => {
                    return Ok(Expr::Assign {
                        id: ExprId::fresh(),
                        name,
                        value: Box::new(value),
                    });
                }

                Expr::Get { object, name } => {
                    return Ok(Expr::Set {
                        object,
                        name,
                        value: Box::new(value),
                    });
                }

                _ => {
                    // Non-fatal: keep the LHS, discard the value expression.
                    self.reporter
                        .parse_error(&equals, "Invalid assignment target.");
                }
            }
        }

        Ok(expr)
    }

    fn or(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.and()?;

        while self.match_tokens(&[TokenType::OR]) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.and()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn and(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.equality()?;

        while self.match_tokens(&[TokenType::AND]) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.equality()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.comparison()?;

        while self.match_tokens(&[TokenType::BANG_EQUAL, TokenType::EQUAL_EQUAL]) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.comparison()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.term()?;

        while self.match_tokens(&[
            TokenType::GREATER,
            TokenType::GREATER_EQUAL,
            TokenType::LESS,
            TokenType::LESS_EQUAL,
        ]) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.term()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.factor()?;

        while self.match_tokens(&[TokenType::MINUS, TokenType::PLUS]) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.factor()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.unary()?;

        while self.match_tokens(&[TokenType::SLASH, TokenType::STAR]) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.unary()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.match_tokens(&[TokenType::BANG, TokenType::MINUS]) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.unary()?;

            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }

        self.call()
    }

    fn call(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.primary()?;

        loop {
            if self.match_tokens(&[TokenType::LEFT_PAREN]) {
                expr = self.finish_call(expr)?;
            } else if self.match_tokens(&[TokenType::DOT]) {
                let name: Token =
                    self.consume(&TokenType::IDENTIFIER, "Expect property name after '.'.")?;

                expr = Expr::Get {
                    object: Box::new(expr),
                    name,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr> {
        let mut arguments: Vec<Expr> = Vec::new();

        if !self.check(&TokenType::RIGHT_PAREN) {
            loop {
                if arguments.len() >= MAX_ARITY {
                    // Non-fatal: report and keep parsing.
                    let token: Token = self.peek().clone();

                    self.reporter
                        .parse_error(&token, "Can't have more than 255 arguments.");
                }

                arguments.push(self.expression()?);

                if !self.match_tokens(&[TokenType::COMMA]) {
                    break;
                }
            }
        }

        let closing_paren: Token =
            self.consume(&TokenType::RIGHT_PAREN, "Expect ')' after arguments.")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            closing_paren,
            arguments,
        })
    }

    fn primary(&mut self) -> Result<Expr> {
        if self.match_tokens(&[
            TokenType::NUMBER(0.0),
            TokenType::STRING(String::new()),
            TokenType::TRUE,
            TokenType::FALSE,
            TokenType::NIL,
        ]) {
            let literal: LiteralValue = match &self.previous().token_type {
                TokenType::NUMBER(n) => LiteralValue::Number(*n),

                TokenType::STRING(s) => LiteralValue::Str(s.clone()),

                TokenType::TRUE => LiteralValue::True,

                TokenType::FALSE => LiteralValue::False,

                _ => LiteralValue::Nil,
            };

            return Ok(Expr::Literal(literal));
        }

        if self.match_tokens(&[TokenType::IDENTIFIER]) {
            return Ok(Expr::Variable {
                id: ExprId::fresh(),
                name: self.previous().clone(),
            });
        }

        if self.match_tokens(&[TokenType::THIS]) {
            return Ok(Expr::This {
                id: ExprId::fresh(),
                keyword: self.previous().clone(),
            });
        }

        if self.match_tokens(&[TokenType::SUPER]) {
            let keyword: Token = self.previous().clone();

            self.consume(&TokenType::DOT, "Expect '.' after 'super'.")?;

            let method: Token =
                self.consume(&TokenType::IDENTIFIER, "Expect superclass method name.")?;

            return Ok(Expr::Super {
                id: ExprId::fresh(),
                keyword,
                method,
            });
        }

        if self.match_tokens(&[TokenType::LEFT_PAREN]) {
            let expr: Expr = self.expression()?;

            self.consume(&TokenType::RIGHT_PAREN, "Expect ')' after expression.")?;

            return Ok(Expr::Grouping(Box::new(expr)));
        }

        let token: Token = self.peek().clone();

        Err(self.error(&token, "Expect expression."))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cursor helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn match_tokens(&mut self, types: &[TokenType]) -> bool {
        for token_type in types {
            if self.check(token_type) {
                self.advance();

                return true;
            }
        }

        false
    }

    fn consume(&mut self, token_type: &TokenType, message: &str) -> Result<Token> {
        if self.check(token_type) {
            return Ok(self.advance().clone());
        }

        let token: Token = self.peek().clone();

        Err(self.error(&token, message))
    }

    fn check(&self, token_type: &TokenType) -> bool {
        if self.is_at_end() {
            return token_type == &TokenType::EOF;
        }

        &self.peek().token_type == token_type
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    /// Report a syntax error and hand back the error value that triggers
    /// panic-mode recovery in the caller.
    fn error(&mut self, token: &Token, message: &str) -> LoxError {
        self.reporter.parse_error(token, message);

        LoxError::parse(token.line, message)
    }

    /// Skip tokens until a statement boundary: just past a semicolon, or just
    /// before a keyword that can begin a declaration.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().token_type == TokenType::SEMICOLON {
                return;
            }

            match self.peek().token_type {
                TokenType::CLASS
                | TokenType::FUN
                | TokenType::VAR
                | TokenType::FOR
                | TokenType::IF
                | TokenType::WHILE
                | TokenType::PRINT
                | TokenType::RETURN => return,

                _ => {}
            }

            self.advance();
        }
    }
}

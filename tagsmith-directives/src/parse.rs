//! Compiling directive expressions into calls.

use crate::{Directive, DirectiveError};

/// A literal or variable argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Str(String),
    Int(i64),
    Bool(bool),
    Null,
    /// `$name`, resolved against the template context.
    Var(String),
}

/// A named call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Arg>,
}

impl Call {
    pub fn new(name: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// A factory call followed by shortcuts applied to its result, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub call: Call,
    pub chain: Vec<Call>,
}

/// Compile the text between a directive's parentheses.
pub fn compile(directive: Directive, expression: &str) -> Result<Expr, DirectiveError> {
    let expr = match directive {
        Directive::Icon => compile_icon(expression)?,
        Directive::Html => Parser::new(expression).expr()?,
    };
    trace!(%directive, expression, chain = expr.chain.len(), "compiled directive");
    Ok(expr)
}

fn compile_icon(expression: &str) -> Result<Expr, DirectiveError> {
    let icon = expression.trim().trim_matches(|c| c == '\'' || c == '"');
    let arg = match icon.strip_prefix('$') {
        Some(var) => {
            if !is_ident(var) {
                return Err(DirectiveError::Syntax {
                    message: format!("invalid variable name `{icon}`"),
                    position: 0,
                });
            }
            Arg::Var(var.to_string())
        }
        None => Arg::Str(icon.to_string()),
    };
    Ok(Expr {
        call: Call::new("icon", vec![arg]),
        chain: Vec::new(),
    })
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Recursive-descent parser over `name(args)->name(args)...`.
struct Parser<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Parser<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, DirectiveError> {
        Err(DirectiveError::Syntax {
            message: message.into(),
            position: self.pos,
        })
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), DirectiveError> {
        if self.eat(token) {
            Ok(())
        } else {
            match self.peek() {
                Some(c) => self.error(format!("expected `{token}`, found `{c}`")),
                None => self.error(format!("expected `{token}`, found end of input")),
            }
        }
    }

    fn expr(&mut self) -> Result<Expr, DirectiveError> {
        self.skip_ws();
        // `Html::div()` reads the same as `div()`.
        self.eat("Html::");
        let call = self.call()?;
        let mut chain = Vec::new();
        loop {
            self.skip_ws();
            if self.peek().is_none() {
                break;
            }
            self.expect("->")?;
            self.skip_ws();
            chain.push(self.call()?);
        }
        Ok(Expr { call, chain })
    }

    fn call(&mut self) -> Result<Call, DirectiveError> {
        let name = self.ident()?;
        self.skip_ws();
        self.expect("(")?;
        let mut args = Vec::new();
        self.skip_ws();
        if !self.eat(")") {
            loop {
                self.skip_ws();
                args.push(self.arg()?);
                self.skip_ws();
                if self.eat(")") {
                    break;
                }
                self.expect(",")?;
            }
        }
        Ok(Call { name, args })
    }

    fn ident(&mut self) -> Result<String, DirectiveError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump();
        }
        let ident = &self.src[start..self.pos];
        if !is_ident(ident) {
            self.pos = start;
            return self.error("expected a name");
        }
        Ok(ident.to_string())
    }

    fn arg(&mut self) -> Result<Arg, DirectiveError> {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.bump();
                self.string(quote).map(Arg::Str)
            }
            Some('$') => {
                self.bump();
                self.ident().map(Arg::Var)
            }
            Some(c) if c == '-' || c.is_ascii_digit() => self.int(),
            Some(_) => {
                let start = self.pos;
                let word = self.ident()?;
                match word.to_ascii_lowercase().as_str() {
                    "true" => Ok(Arg::Bool(true)),
                    "false" => Ok(Arg::Bool(false)),
                    "null" => Ok(Arg::Null),
                    _ => {
                        self.pos = start;
                        self.error(format!("unexpected `{word}`"))
                    }
                }
            }
            None => self.error("expected an argument, found end of input"),
        }
    }

    /// The body of a quoted string, after the opening quote.
    fn string(&mut self, quote: char) -> Result<String, DirectiveError> {
        let start = self.pos;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some(c) if c == quote || c == '\\' => out.push(c),
                    Some('n') if quote == '"' => out.push('\n'),
                    Some('t') if quote == '"' => out.push('\t'),
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => break,
                },
                Some(c) => out.push(c),
                None => break,
            }
        }
        self.pos = start;
        self.error("unterminated string")
    }

    fn int(&mut self) -> Result<Arg, DirectiveError> {
        let start = self.pos;
        self.eat("-");
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        match text.parse() {
            Ok(n) => Ok(Arg::Int(n)),
            Err(_) => {
                self.pos = start;
                self.error(format!("invalid integer `{text}`"))
            }
        }
    }
}

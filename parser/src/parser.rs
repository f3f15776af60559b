//! FILENAME: parser/src/parser.rs
//! PURPOSE: Builds the infix component sequence from a validated token
//! stream.
//! CONTEXT: Third stage of the pipeline. Runs after `validator::validate`
//! has already accepted the token stream, so grammar violations here would
//! be a bug in the validator rather than bad user input. A leading unary
//! `+`/`-` folds to a single net sign and, if negative, is rewritten as an
//! implicit `(0 - primary)` wrapped in parentheses — the parens keep the
//! sign bound to the primary alone, so a later shunting-yard pass can't
//! re-level it against whatever binary operator precedes the term.

use crate::ast::{Argument, BuiltinFunction, Component};
use crate::error::FormulaError;
use crate::token::{Operator, Token};

pub fn parse(tokens: &[Token]) -> Result<Vec<Component>, FormulaError> {
    let mut p = Builder { tokens, pos: 0 };
    let components = p.expr()?;
    Ok(components)
}

struct Builder<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Builder<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expr(&mut self) -> Result<Vec<Component>, FormulaError> {
        let mut out = self.term()?;
        while let Some(Token::Operator(op)) = self.peek().cloned() {
            self.advance();
            out.push(Component::Operator(op));
            out.extend(self.term()?);
        }
        Ok(out)
    }

    /// Strips a leading run of `+`/`-` tokens, folding them to a single net
    /// sign (an even number of `-` cancels out; an odd number negates; `+`
    /// is always the identity). A net negation wraps the primary as
    /// `(0 - primary)` so the sign is an atomic unit from shunting-yard's
    /// point of view: without the parens, `2*-3` would flatten to the infix
    /// `2 * 0 - 3` and convert as `(2*0)-3`, not `2*(0-3)`.
    fn term(&mut self) -> Result<Vec<Component>, FormulaError> {
        let mut negate = false;
        while let Some(Token::Operator(op @ (Operator::Plus | Operator::Minus))) =
            self.peek().cloned()
        {
            self.advance();
            if op == Operator::Minus {
                negate = !negate;
            }
        }

        let primary = self.primary()?;
        if !negate {
            return Ok(primary);
        }

        let mut out = Vec::with_capacity(primary.len() + 4);
        out.push(Component::LParen);
        out.push(Component::Number(0.0));
        out.push(Component::Operator(Operator::Minus));
        out.extend(primary);
        out.push(Component::RParen);
        Ok(out)
    }

    fn primary(&mut self) -> Result<Vec<Component>, FormulaError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(vec![Component::Number(n)]),
            Some(Token::CellRef(c)) => Ok(vec![Component::CellRef(c)]),
            Some(Token::Function(name)) => self.function_call(&name),
            Some(Token::LParen) => {
                let mut out = vec![Component::LParen];
                out.extend(self.expr()?);
                match self.advance() {
                    Some(Token::RParen) => out.push(Component::RParen),
                    _ => return Err(FormulaError::UnmatchedOpenParen { pos: self.pos }),
                }
                Ok(out)
            }
            Some(other) => Err(FormulaError::UnexpectedToken {
                token: format!("{}", other),
                pos: self.pos - 1,
            }),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    fn function_call(&mut self, name: &str) -> Result<Vec<Component>, FormulaError> {
        let func = BuiltinFunction::from_name(name)
            .ok_or_else(|| FormulaError::UnknownFunction { name: name.to_string() })?;

        self.advance(); // '('

        let mut args = vec![self.argument()?];
        while let Some(Token::Semicolon) = self.peek() {
            self.advance();
            args.push(self.argument()?);
        }
        self.advance(); // ')'

        Ok(vec![Component::FunctionCall { func, args }])
    }

    fn argument(&mut self) -> Result<Argument, FormulaError> {
        if let Some(Token::CellRef(a)) = self.peek().cloned() {
            if let Some(Token::Colon) = self.tokens.get(self.pos + 1) {
                self.advance();
                self.advance();
                let b = match self.advance() {
                    Some(Token::CellRef(b)) => b,
                    _ => {
                        return Err(FormulaError::MalformedRange {
                            pos: self.pos.saturating_sub(1),
                        })
                    }
                };
                return Ok(Argument::Range(crate::coord::CellRange::new(a, b)));
            }
        }
        Ok(Argument::Expression(self.expr()?))
    }
}

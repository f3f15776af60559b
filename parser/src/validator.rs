//! FILENAME: parser/src/validator.rs
//! PURPOSE: Recursive-descent grammar check over a token stream.
//! CONTEXT: Second stage of the pipeline. The validator never builds a
//! tree — it only accepts or rejects, so the infix builder that follows it
//! can assume a well-formed stream and skip its own error handling.
//!
//! GRAMMAR:
//!   expr      := term (operator term)*
//!   term      := ('+' | '-')* primary
//!   primary   := NUMBER | CELLREF | function_call | '(' expr ')'
//!   function  := FUNCTION '(' argument (';' argument)* ')'
//!   argument  := CELLREF ':' CELLREF | expr

use crate::error::FormulaError;
use crate::token::Token;

pub fn validate(tokens: &[Token]) -> Result<(), FormulaError> {
    if tokens.is_empty() {
        return Err(FormulaError::EmptyFormula);
    }
    let mut v = Validator { tokens, pos: 0 };
    v.expr()?;
    if v.pos != v.tokens.len() {
        return Err(FormulaError::UnexpectedToken {
            token: format!("{}", v.tokens[v.pos]),
            pos: v.pos,
        });
    }
    Ok(())
}

struct Validator<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Validator<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expr(&mut self) -> Result<(), FormulaError> {
        self.term()?;
        while let Some(Token::Operator(_)) = self.peek() {
            self.advance();
            self.term()?;
        }
        Ok(())
    }

    fn term(&mut self) -> Result<(), FormulaError> {
        while let Some(Token::Operator(op)) = self.peek() {
            match op {
                crate::token::Operator::Plus | crate::token::Operator::Minus => {
                    self.advance();
                }
                _ => break,
            }
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<(), FormulaError> {
        match self.advance().cloned() {
            Some(Token::Number(_)) => Ok(()),
            Some(Token::CellRef(_)) => Ok(()),
            Some(Token::Function(name)) => self.function_call(name),
            Some(Token::LParen) => {
                let open_pos = self.pos - 1;
                self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(()),
                    _ => Err(FormulaError::UnmatchedOpenParen { pos: open_pos }),
                }
            }
            Some(other) => Err(FormulaError::UnexpectedToken {
                token: format!("{}", other),
                pos: self.pos - 1,
            }),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    fn function_call(&mut self, name: String) -> Result<(), FormulaError> {
        match self.advance() {
            Some(Token::LParen) => {}
            _ => return Err(FormulaError::UnexpectedEnd),
        }

        if let Some(Token::RParen) = self.peek() {
            return Err(FormulaError::EmptyFunctionCall { name });
        }

        self.argument()?;
        while let Some(Token::Semicolon) = self.peek() {
            self.advance();
            self.argument()?;
        }

        match self.advance() {
            Some(Token::RParen) => Ok(()),
            _ => Err(FormulaError::UnmatchedOpenParen { pos: self.pos.saturating_sub(1) }),
        }
    }

    /// An argument is either a cell range (`A1:B2`) or a full expression.
    /// Ranges are only legal here, so we look ahead for the `:` before
    /// falling back to a general expression.
    fn argument(&mut self) -> Result<(), FormulaError> {
        if let Some(Token::CellRef(_)) = self.peek() {
            if let Some(Token::Colon) = self.tokens.get(self.pos + 1) {
                self.advance();
                self.advance();
                return match self.advance() {
                    Some(Token::CellRef(_)) => Ok(()),
                    _ => Err(FormulaError::MalformedRange { pos: self.pos.saturating_sub(1) }),
                };
            }
        }
        self.expr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn check(input: &str) -> Result<(), FormulaError> {
        let tokens = Tokenizer::tokenize(input).unwrap();
        validate(&tokens)
    }

    #[test]
    fn accepts_simple_arithmetic() {
        assert!(check("A1 + 2 * B2").is_ok());
    }

    #[test]
    fn accepts_leading_unary() {
        assert!(check("-A1 + 2").is_ok());
        assert!(check("+2").is_ok());
    }

    #[test]
    fn accepts_function_with_range() {
        assert!(check("SUMA(A1:A10;2;B1)").is_ok());
    }

    #[test]
    fn accepts_nested_function() {
        assert!(check("MAX(SUMA(A1:A2);MIN(B1:B2))").is_ok());
    }

    #[test]
    fn rejects_empty_formula() {
        assert!(matches!(check(""), Err(FormulaError::EmptyFormula)));
    }

    #[test]
    fn rejects_empty_function_call() {
        assert!(matches!(
            check("SUMA()"),
            Err(FormulaError::EmptyFunctionCall { .. })
        ));
    }

    #[test]
    fn rejects_unmatched_parens() {
        assert!(check("(1 + 2").is_err());
        assert!(check("1 + 2)").is_err());
    }

    #[test]
    fn rejects_trailing_operator() {
        assert!(check("1 +").is_err());
    }

    #[test]
    fn rejects_malformed_range() {
        assert!(check("SUMA(A1:2)").is_err());
    }

    #[test]
    fn rejects_double_binary_operator() {
        assert!(check("1 + * 2").is_err());
    }

    #[test]
    fn rejects_range_outside_function_argument() {
        assert!(check("A1:A2").is_err());
    }
}

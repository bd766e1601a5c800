//! Recursive-descent parser for formula expressions.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | CELL | '(' expr ')'
//! ```

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::lexer::{Spanned, Token, tokenize};
use super::FormulaParseError;

pub(crate) fn parse_expression(input: &str) -> Result<Expr, FormulaParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(FormulaParseError::Empty);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;
    match parser.tokens.get(parser.pos) {
        Some(extra) => Err(unexpected(extra)),
        None => Ok(expr),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

fn unexpected(spanned: &Spanned) -> FormulaParseError {
    FormulaParseError::UnexpectedToken {
        found: spanned.token.to_string(),
        offset: spanned.offset,
    }
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn next(&mut self) -> Result<Spanned, FormulaParseError> {
        let spanned = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(FormulaParseError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(spanned)
    }

    fn expr(&mut self) -> Result<Expr, FormulaParseError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, FormulaParseError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, FormulaParseError> {
        let op = match self.peek() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Minus,
            _ => return self.primary(),
        };
        self.pos += 1;
        let operand = self.unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn primary(&mut self) -> Result<Expr, FormulaParseError> {
        let spanned = self.next()?;
        match spanned.token {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Cell(pos) => Ok(Expr::Cell(pos)),
            Token::LParen => {
                let inner = self.expr()?;
                let close = self.next()?;
                if close.token == Token::RParen {
                    Ok(inner)
                } else {
                    Err(unexpected(&close))
                }
            }
            _ => Err(unexpected(&spanned)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Position;

    #[test]
    fn test_precedence_and_associativity() {
        let expr = parse_expression("1-2-3").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Sub,
                left: Box::new(Expr::Binary {
                    op: BinaryOp::Sub,
                    left: Box::new(Expr::Number(1.0)),
                    right: Box::new(Expr::Number(2.0)),
                }),
                right: Box::new(Expr::Number(3.0)),
            }
        );

        let expr = parse_expression("A1+B1*2").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Add,
                left: Box::new(Expr::Cell(Position::new(0, 0))),
                right: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    left: Box::new(Expr::Cell(Position::new(0, 1))),
                    right: Box::new(Expr::Number(2.0)),
                }),
            }
        );
    }

    #[test]
    fn test_nested_unary() {
        let expr = parse_expression("--1").unwrap();
        assert_eq!(
            expr,
            Expr::Unary {
                op: UnaryOp::Minus,
                operand: Box::new(Expr::Unary {
                    op: UnaryOp::Minus,
                    operand: Box::new(Expr::Number(1.0)),
                }),
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_expression("   "), Err(FormulaParseError::Empty));
        assert_eq!(parse_expression("1+"), Err(FormulaParseError::UnexpectedEnd));
        assert_eq!(parse_expression("(1+2"), Err(FormulaParseError::UnexpectedEnd));
        assert_eq!(
            parse_expression("1+2)"),
            Err(FormulaParseError::UnexpectedToken {
                found: ")".to_string(),
                offset: 3
            })
        );
        assert_eq!(
            parse_expression("A1 B1"),
            Err(FormulaParseError::UnexpectedToken {
                found: "B1".to_string(),
                offset: 3
            })
        );
        assert!(matches!(
            parse_expression("*2"),
            Err(FormulaParseError::UnexpectedToken { .. })
        ));
    }
}

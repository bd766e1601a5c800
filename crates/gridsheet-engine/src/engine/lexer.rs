//! Formula tokenizer.
//!
//! Splits formula text into numbers, cell references, operators and
//! parentheses. Whitespace between tokens is skipped.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::FormulaParseError;
use super::Position;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Cell(Position),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Cell(pos) => write!(f, "{}", pos),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// A token together with the byte offset it started at.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(
            r"^(?:(?<number>(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)|(?<cell>[A-Za-z]+[0-9]+)|(?<op>[-+*/()]))",
        )
        .expect("formula token regex must compile")
    })
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Spanned>, FormulaParseError> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    while offset < input.len() {
        let rest = &input[offset..];
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            break;
        }
        offset += rest.len() - trimmed.len();

        let Some(caps) = token_re().captures(trimmed) else {
            let found = trimmed.chars().next().unwrap_or_default();
            return Err(FormulaParseError::UnexpectedChar { found, offset });
        };

        let (token, len) = if let Some(m) = caps.name("number") {
            let n = m
                .as_str()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| FormulaParseError::InvalidNumber(m.as_str().to_string()))?;
            (Token::Number(n), m.len())
        } else if let Some(m) = caps.name("cell") {
            let pos = Position::from_a1(m.as_str())
                .ok_or_else(|| FormulaParseError::InvalidReference(m.as_str().to_string()))?;
            (Token::Cell(pos), m.len())
        } else {
            let op = &caps["op"];
            let token = match op {
                "+" => Token::Plus,
                "-" => Token::Minus,
                "*" => Token::Star,
                "/" => Token::Slash,
                "(" => Token::LParen,
                _ => Token::RParen,
            };
            (token, op.len())
        };

        tokens.push(Spanned { token, offset });
        offset += len;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn test_tokenize_expression() {
        assert_eq!(
            kinds(" A1 + 2.5*(b2) "),
            vec![
                Token::Cell(Position::new(0, 0)),
                Token::Plus,
                Token::Number(2.5),
                Token::Star,
                Token::LParen,
                Token::Cell(Position::new(1, 1)),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_number_forms() {
        assert_eq!(kinds(".5"), vec![Token::Number(0.5)]);
        assert_eq!(kinds("1e3"), vec![Token::Number(1000.0)]);
        assert_eq!(kinds("25E-2"), vec![Token::Number(0.25)]);
    }

    #[test]
    fn test_tokenize_offsets() {
        let tokens = tokenize("1 +  A1").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 2, 5]);
    }

    #[test]
    fn test_tokenize_rejects_unknown_characters() {
        assert_eq!(
            tokenize("1 $ 2"),
            Err(FormulaParseError::UnexpectedChar {
                found: '$',
                offset: 2
            })
        );
        assert!(matches!(
            tokenize("ABC"),
            Err(FormulaParseError::UnexpectedChar { found: 'A', .. })
        ));
    }

    #[test]
    fn test_tokenize_rejects_overflowing_numbers() {
        assert!(matches!(
            tokenize("1e999"),
            Err(FormulaParseError::InvalidNumber(_))
        ));
    }
}

//! Formula expression tree: printing and evaluation.

use std::fmt::{self, Write};

use super::{CellLookup, FormulaError, FormulaErrorCategory, FormulaValue, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
        }
    }

    /// `a op (b op2 c)` may only drop its parentheses for `+` and `*`.
    fn is_associative(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Mul)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Expr {
    Number(f64),
    Cell(Position),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 4;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(_) | Expr::Cell(_) => ATOM_PRECEDENCE,
            Expr::Unary { .. } => UNARY_PRECEDENCE,
            Expr::Binary { op, .. } => op.precedence(),
        }
    }

    /// Push every cell this expression reads, in source order.
    pub(crate) fn collect_cells(&self, out: &mut Vec<Position>) {
        match self {
            Expr::Number(_) => {}
            Expr::Cell(pos) => out.push(*pos),
            Expr::Unary { operand, .. } => operand.collect_cells(out),
            Expr::Binary { left, right, .. } => {
                left.collect_cells(out);
                right.collect_cells(out);
            }
        }
    }

    pub(crate) fn evaluate(&self, lookup: &dyn CellLookup) -> FormulaValue {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Cell(pos) => {
                if !pos.is_valid() {
                    return Err(FormulaError::new(FormulaErrorCategory::Ref));
                }
                match lookup.lookup(*pos) {
                    Some(value) => value.to_number(),
                    None => Ok(0.0),
                }
            }
            Expr::Unary { op, operand } => {
                let v = operand.evaluate(lookup)?;
                Ok(match op {
                    UnaryOp::Plus => v,
                    UnaryOp::Minus => -v,
                })
            }
            Expr::Binary { op, left, right } => {
                let l = left.evaluate(lookup)?;
                let r = right.evaluate(lookup)?;
                let result = match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                };
                if result.is_finite() {
                    Ok(result)
                } else {
                    Err(FormulaError::new(FormulaErrorCategory::Arithmetic))
                }
            }
        }
    }

    fn write_operand(&self, f: &mut fmt::Formatter<'_>, parens: bool) -> fmt::Result {
        if parens {
            f.write_char('(')?;
            write!(f, "{}", self)?;
            f.write_char(')')
        } else {
            write!(f, "{}", self)
        }
    }
}

/// Prints the expression without whitespace and with only the parentheses
/// the precedence rules require.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Cell(pos) => write!(f, "{}", pos),
            Expr::Unary { op, operand } => {
                f.write_char(match op {
                    UnaryOp::Plus => '+',
                    UnaryOp::Minus => '-',
                })?;
                operand.write_operand(f, operand.precedence() < UNARY_PRECEDENCE)
            }
            Expr::Binary { op, left, right } => {
                let prec = op.precedence();
                left.write_operand(f, left.precedence() < prec)?;
                f.write_char(op.symbol())?;
                let right_prec = right.precedence();
                let parens = right_prec < prec || (right_prec == prec && !op.is_associative());
                right.write_operand(f, parens)
            }
        }
    }
}

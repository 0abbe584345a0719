//! Shunting-yard evaluation of a token stream.
//!
//! Two stacks: operands (numbers) and pending operators/parentheses. `*` and
//! `/` bind tighter than `+` and `-`; equal precedence associates left to
//! right, so `8-3-2` is `3`.

use super::config::{DivisionByZero, EngineConfig};
use super::error::EvalError;
use super::tokenize::{Operator, Token};

#[derive(Clone, Copy, Debug)]
enum Pending {
    Binary(Operator),
    Negate,
    Open,
}

impl Pending {
    fn precedence(self) -> u8 {
        match self {
            Pending::Binary(op) => op.precedence(),
            Pending::Negate => 3,
            Pending::Open => 0,
        }
    }
}

struct Stacks<'c> {
    operands: Vec<f64>,
    operators: Vec<Pending>,
    config: &'c EngineConfig,
}

impl Stacks<'_> {
    fn pop_operand(&mut self) -> Result<f64, EvalError> {
        self.operands
            .pop()
            .ok_or_else(|| EvalError::malformed("missing operand"))
    }

    fn apply(&mut self, pending: Pending) -> Result<(), EvalError> {
        let value = match pending {
            Pending::Binary(op) => {
                let rhs = self.pop_operand()?;
                let lhs = self.pop_operand()?;
                apply_operator(op, lhs, rhs, self.config)?
            }
            Pending::Negate => -self.pop_operand()?,
            Pending::Open => return Err(EvalError::malformed("unbalanced parentheses")),
        };
        self.operands.push(value);
        Ok(())
    }

    /// Apply pending operators while they bind at least as tightly as `incoming`.
    fn reduce_for(&mut self, incoming: Operator) -> Result<(), EvalError> {
        while let Some(&top) = self.operators.last() {
            if matches!(top, Pending::Open) || top.precedence() < incoming.precedence() {
                break;
            }
            self.operators.pop();
            self.apply(top)?;
        }
        Ok(())
    }

    fn close_group(&mut self) -> Result<(), EvalError> {
        loop {
            match self.operators.pop() {
                Some(Pending::Open) => return Ok(()),
                Some(pending) => self.apply(pending)?,
                None => return Err(EvalError::malformed("unbalanced parentheses")),
            }
        }
    }
}

/// Evaluate tokens into a single number.
pub fn evaluate<I>(tokens: I, config: &EngineConfig) -> Result<f64, EvalError>
where
    I: IntoIterator<Item = Result<Token, EvalError>>,
{
    let mut stacks = Stacks {
        operands: Vec::new(),
        operators: Vec::new(),
        config,
    };

    for token in tokens {
        match token? {
            Token::Number(n) => stacks.operands.push(n),
            Token::Operator(op) => {
                stacks.reduce_for(op)?;
                stacks.operators.push(Pending::Binary(op));
            }
            Token::Negate => stacks.operators.push(Pending::Negate),
            Token::Open => stacks.operators.push(Pending::Open),
            Token::Close => stacks.close_group()?,
        }
    }

    while let Some(pending) = stacks.operators.pop() {
        stacks.apply(pending)?;
    }

    match stacks.operands.as_slice() {
        [value] => Ok(*value),
        [] => Err(EvalError::malformed("empty expression")),
        _ => Err(EvalError::malformed("missing operator")),
    }
}

fn apply_operator(op: Operator, lhs: f64, rhs: f64, config: &EngineConfig) -> Result<f64, EvalError> {
    Ok(match op {
        Operator::Add => lhs + rhs,
        Operator::Sub => lhs - rhs,
        Operator::Mul => lhs * rhs,
        Operator::Div if rhs == 0.0 => match config.division_by_zero {
            DivisionByZero::Error => return Err(EvalError::DivisionByZero),
            DivisionByZero::Infinity => f64::INFINITY,
        },
        Operator::Div => lhs / rhs,
    })
}

/// Tokenize and evaluate an expression that contains no cell references.
pub fn evaluate_expression(expr: &str, config: &EngineConfig) -> Result<f64, EvalError> {
    evaluate(super::tokenize::tokenize(expr), config)
}

//! Tokenizer for arithmetic expressions whose cell references have already
//! been replaced by values.
//!
//! A `-` in operand position (start of input, after an operator or `(`) is a
//! sign: directly before a digit it becomes part of the number literal,
//! anywhere else it becomes a [`Token::Negate`] prefix.
//!
//! `inf` and `NaN` are number literals too: they are what a non-finite cell
//! value looks like once it has been substituted into a referencing formula.

use std::iter::{FusedIterator, Peekable};
use std::str::CharIndices;

use super::error::EvalError;

/// Spellings of non-finite values as written by `format_number`.
const NON_FINITE_LITERALS: [&str; 2] = ["inf", "NaN"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    fn from_char(c: char) -> Option<Operator> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
    /// Unary minus in front of a parenthesis or another sign.
    Negate,
    Open,
    Close,
}

/// Lazy left-to-right tokenizer. Yields at most one error, then stops.
pub struct Tokenizer<'a> {
    expr: &'a str,
    chars: Peekable<CharIndices<'a>>,
    expect_operand: bool,
    failed: bool,
}

/// Tokenize an expression.
pub fn tokenize(expr: &str) -> Tokenizer<'_> {
    Tokenizer {
        expr,
        chars: expr.char_indices().peekable(),
        expect_operand: true,
        failed: false,
    }
}

impl Tokenizer<'_> {
    fn number(&mut self, start: usize) -> Result<Token, EvalError> {
        let mut end = start;
        // Optional sign, only reached when the caller saw `-` in operand position.
        if let Some((i, '-')) = self.chars.peek().copied() {
            self.chars.next();
            end = i + 1;
        }
        if let Some(word) = self.non_finite_at(end) {
            for _ in 0..word.len() {
                self.chars.next();
            }
            end += word.len();
        } else {
            while let Some(&(i, c)) = self.chars.peek() {
                if !(c.is_ascii_digit() || c == '.') {
                    break;
                }
                self.chars.next();
                end = i + c.len_utf8();
            }
        }
        let literal = &self.expr[start..end];
        if literal.matches('.').count() > 1 {
            return Err(EvalError::malformed(format!("invalid number literal '{}'", literal)));
        }
        literal
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| EvalError::malformed(format!("invalid number literal '{}'", literal)))
    }

    fn non_finite_at(&self, at: usize) -> Option<&'static str> {
        let rest = self.expr.get(at..)?;
        NON_FINITE_LITERALS
            .into_iter()
            .find(|word| rest.starts_with(*word))
    }

    fn sign_before_literal(&self, minus_at: usize) -> bool {
        self.expr[minus_at + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
            || self.non_finite_at(minus_at + 1).is_some()
    }

    fn next_token(&mut self) -> Option<Result<Token, EvalError>> {
        while self.chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
        let &(i, c) = self.chars.peek()?;

        let token = if c.is_ascii_digit() || c == '.' || self.non_finite_at(i).is_some() {
            self.number(i)
        } else if c == '-' && self.expect_operand {
            if self.sign_before_literal(i) {
                self.number(i)
            } else {
                self.chars.next();
                return Some(Ok(Token::Negate));
            }
        } else if let Some(op) = Operator::from_char(c) {
            self.chars.next();
            Ok(Token::Operator(op))
        } else if c == '(' {
            self.chars.next();
            Ok(Token::Open)
        } else if c == ')' {
            self.chars.next();
            Ok(Token::Close)
        } else {
            Err(EvalError::malformed(format!("unexpected character '{}'", c)))
        };

        self.expect_operand = matches!(token, Ok(Token::Operator(_)) | Ok(Token::Open));
        Some(token)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, EvalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let token = self.next_token()?;
        self.failed = token.is_err();
        Some(token)
    }
}

impl FusedIterator for Tokenizer<'_> {}

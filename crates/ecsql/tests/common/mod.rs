//! Test-only ECSQL expression parser
//!
//! Reads back the value expressions the render walk produces: literals,
//! parameters, casts, unary and binary operators, function calls and IIF.
//! Parentheses are kept on the node they enclose so that rendering the
//! parsed tree reproduces the input text.

#![allow(dead_code)]

use ecsql::ast::{BinarySqlOperator, CastTarget, UnarySqlOperator};
use ecsql::types::DateTimeComponent;
use ecsql::Exp;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(String),
    Str(String),
    Ident(String),
    Named(String),
    Question,
    Op(&'static str),
    LParen,
    RParen,
    Comma,
    Dot,
    Brackets,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' => i += 1,
            '0'..='9' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                tokens.push(Token::Number(chars[start..i].iter().collect()));
            }
            '\'' => {
                let mut value = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        None => return Err("unterminated string".into()),
                        Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                            value.push('\'');
                            i += 2;
                        }
                        Some('\'') => {
                            i += 1;
                            break;
                        }
                        Some(ch) => {
                            value.push(*ch);
                            i += 1;
                        }
                    }
                }
                tokens.push(Token::Str(value));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            ':' => {
                let start = i + 1;
                i += 1;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Named(chars[start..i].iter().collect()));
            }
            '?' => {
                tokens.push(Token::Question);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '.' => {
                tokens.push(Token::Dot);
                i += 1;
            }
            '[' if chars.get(i + 1) == Some(&']') => {
                tokens.push(Token::Brackets);
                i += 2;
            }
            _ => {
                let two: String = chars[i..(i + 2).min(chars.len())].iter().collect();
                let op = ["||", "<<", ">>"]
                    .into_iter()
                    .find(|op| *op == two)
                    .or_else(|| {
                        ["+", "-", "*", "/", "%", "&", "|", "~"]
                            .into_iter()
                            .find(|op| op.starts_with(c))
                    })
                    .ok_or_else(|| format!("unexpected character '{}'", c))?;
                tokens.push(Token::Op(op));
                i += op.len();
            }
        }
    }
    Ok(tokens)
}

fn binary_operator(symbol: &str) -> Option<BinarySqlOperator> {
    use BinarySqlOperator::*;
    [
        Plus, Minus, Multiply, Divide, Modulo, BitwiseAnd, BitwiseOr, ShiftLeft, ShiftRight,
        Concat,
    ]
    .into_iter()
    .find(|op| op.symbol() == symbol)
}

fn unary_operator(symbol: &str) -> Option<UnarySqlOperator> {
    use UnarySqlOperator::*;
    [Plus, Minus, BitwiseNot]
        .into_iter()
        .find(|op| op.symbol() == symbol)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            other => Err(format!("expected {:?}, got {:?}", expected, other)),
        }
    }

    fn keyword(&mut self, keyword: &str) -> Result<(), String> {
        match self.next() {
            Some(Token::Ident(word)) if word.eq_ignore_ascii_case(keyword) => Ok(()),
            other => Err(format!("expected {}, got {:?}", keyword, other)),
        }
    }

    fn binary(&mut self, min_precedence: u8) -> Result<Exp, String> {
        let mut lhs = self.unary()?;
        while let Some(Token::Op(symbol)) = self.peek() {
            let Some(op) = binary_operator(symbol) else {
                break;
            };
            if op.precedence() < min_precedence {
                break;
            }
            self.pos += 1;
            let rhs = self.binary(op.precedence() + 1)?;
            lhs = Exp::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Exp, String> {
        if let Some(Token::Op(symbol)) = self.peek() {
            if let Some(op) = unary_operator(symbol) {
                self.pos += 1;
                let operand = self.unary()?;
                return Ok(Exp::unary(op, operand));
            }
        }
        self.primary()
    }

    fn arguments(&mut self) -> Result<Vec<Exp>, String> {
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.binary(0)?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                other => return Err(format!("expected ',' or ')', got {:?}", other)),
            }
        }
    }

    fn cast(&mut self) -> Result<Exp, String> {
        self.expect(Token::LParen)?;
        let operand = self.binary(0)?;
        self.keyword("AS")?;
        let Some(Token::Ident(first)) = self.next() else {
            return Err("expected cast target".into());
        };
        let mut target = if self.peek() == Some(&Token::Dot) {
            self.pos += 1;
            let Some(Token::Ident(name)) = self.next() else {
                return Err("expected cast target name".into());
            };
            CastTarget::qualified(first, name)
        } else {
            CastTarget::primitive(first)
        };
        if self.peek() == Some(&Token::Brackets) {
            self.pos += 1;
            target = target.array();
        }
        self.expect(Token::RParen)?;
        Ok(Exp::cast(operand, target))
    }

    fn primary(&mut self) -> Result<Exp, String> {
        match self.next() {
            Some(Token::Number(raw)) if raw.contains('.') => Ok(Exp::double_literal(raw)),
            Some(Token::Number(raw)) => match raw.parse::<i32>() {
                Ok(value) => Ok(Exp::integer_literal(value)),
                Err(_) => raw
                    .parse::<i64>()
                    .map(Exp::long_literal)
                    .map_err(|e| e.to_string()),
            },
            Some(Token::Str(value)) => Ok(Exp::string_literal(value)),
            Some(Token::Question) => Ok(Exp::parameter()),
            Some(Token::Named(name)) => Ok(Exp::named_parameter(name)),
            Some(Token::LParen) => {
                let inner = self.binary(0)?;
                self.expect(Token::RParen)?;
                Ok(inner.parenthesized())
            }
            Some(Token::Ident(word)) => self.word(word),
            other => Err(format!("unexpected token {:?}", other)),
        }
    }

    fn word(&mut self, word: String) -> Result<Exp, String> {
        let date_time = match word.to_ascii_uppercase().as_str() {
            "NULL" => return Ok(Exp::null_literal()),
            "TRUE" => return Ok(Exp::boolean_literal(true)),
            "FALSE" => return Ok(Exp::boolean_literal(false)),
            "CAST" => return self.cast(),
            "DATE" => Some(DateTimeComponent::Date),
            "TIME" => Some(DateTimeComponent::TimeOfDay),
            "TIMESTAMP" => Some(DateTimeComponent::DateAndTime),
            _ => None,
        };
        if let Some(component) = date_time {
            return match self.next() {
                Some(Token::Str(raw)) => Ok(Exp::date_time_literal(component, raw)),
                other => Err(format!("expected literal text after {}, got {:?}", word, other)),
            };
        }

        let args = self.arguments()?;
        if word.eq_ignore_ascii_case("IIF") {
            let [condition, then_exp, else_exp]: [Exp; 3] = args
                .try_into()
                .map_err(|_| "IIF expects three arguments".to_string())?;
            return Ok(Exp::iif(condition, then_exp, else_exp));
        }
        Ok(Exp::function_call(word, None, args))
    }
}

/// Parse a value expression
pub fn parse_expression(input: &str) -> Result<Exp, String> {
    let mut parser = Parser {
        tokens: tokenize(input)?,
        pos: 0,
    };
    let exp = parser.binary(0)?;
    match parser.peek() {
        None => Ok(exp),
        Some(token) => Err(format!("trailing input at {:?}", token)),
    }
}

/// Parse a value expression and expect success
#[track_caller]
pub fn parse_expression_ok(input: &str) -> Exp {
    match parse_expression(input) {
        Ok(exp) => exp,
        Err(e) => panic!("Failed to parse expression '{}': {}", input, e),
    }
}

use crate::domain::entities::LinkError;
use std::fmt;

/// Deepest allowed nesting of groups, commutators and conjugates.
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub position: usize,
    pub message: String,
}

impl ParseError {
    fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at offset {})", self.message, self.position)
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for LinkError {
    fn from(err: ParseError) -> Self {
        LinkError::Parse {
            position: err.position,
            message: err.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMove {
    pub outer_layer: Option<u32>,
    pub inner_layer: Option<u32>,
    pub family: String,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    Move(BlockMove),
    Group {
        nested: Sequence,
        amount: i32,
    },
    Commutator {
        a: Sequence,
        b: Sequence,
        amount: i32,
    },
    Conjugate {
        a: Sequence,
        b: Sequence,
        amount: i32,
    },
    Pause,
    NewLine,
    Comment(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    pub units: Vec<Unit>,
}

impl Sequence {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Parses a move sequence such as `R U R' U'`, `(R U)2`, `[R, U]` or `[F: [R, U]]`.
pub fn parse(input: &str) -> Result<Sequence, ParseError> {
    let mut parser = Parser {
        chars: input.chars().collect(),
        pos: 0,
        depth: 0,
    };
    let sequence = parser.parse_sequence()?;
    if let Some(c) = parser.peek() {
        return Err(ParseError::new(parser.pos, format!("unexpected '{c}'")));
    }
    Ok(sequence)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_spaces(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(ParseError::new(
                self.pos,
                format!("expected '{expected}', found '{c}'"),
            )),
            None => Err(ParseError::new(
                self.pos,
                format!("expected '{expected}', found end of input"),
            )),
        }
    }

    fn parse_sequence(&mut self) -> Result<Sequence, ParseError> {
        let mut units = Vec::new();
        loop {
            self.skip_spaces();
            match self.peek() {
                None | Some(')' | ']' | ',' | ':') => break,
                Some('\n') => {
                    self.pos += 1;
                    units.push(Unit::NewLine);
                }
                Some('.') => {
                    self.pos += 1;
                    units.push(Unit::Pause);
                }
                Some('/') => units.push(self.parse_comment()?),
                Some(_) => {
                    units.push(self.parse_repeatable()?);
                    self.check_separator()?;
                }
            }
        }
        Ok(Sequence { units })
    }

    fn check_separator(&self) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c.is_ascii_alphanumeric() || c == '(' || c == '[' => Err(
                ParseError::new(self.pos, format!("missing space before '{c}'")),
            ),
            _ => Ok(()),
        }
    }

    fn parse_comment(&mut self) -> Result<Unit, ParseError> {
        let start = self.pos;
        self.expect('/')?;
        if self.peek() != Some('/') {
            return Err(ParseError::new(start, "unexpected '/'"));
        }
        self.pos += 1;
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.pos += 1;
        }
        Ok(Unit::Comment(text))
    }

    fn parse_nested(&mut self) -> Result<Sequence, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new(self.pos, "nesting too deep"));
        }
        self.depth += 1;
        let nested = self.parse_sequence();
        self.depth -= 1;
        nested
    }

    fn parse_repeatable(&mut self) -> Result<Unit, ParseError> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let nested = self.parse_nested()?;
                self.expect(')')?;
                let amount = self.parse_amount()?;
                Ok(Unit::Group { nested, amount })
            }
            Some('[') => {
                self.pos += 1;
                let a = self.parse_nested()?;
                let separator = self.pos;
                match self.bump() {
                    Some(',') => {
                        let b = self.parse_nested()?;
                        self.expect(']')?;
                        let amount = self.parse_amount()?;
                        Ok(Unit::Commutator { a, b, amount })
                    }
                    Some(':') => {
                        let b = self.parse_nested()?;
                        self.expect(']')?;
                        let amount = self.parse_amount()?;
                        Ok(Unit::Conjugate { a, b, amount })
                    }
                    _ => Err(ParseError::new(separator, "expected ',' or ':' inside brackets")),
                }
            }
            Some(c) if c.is_ascii_digit() || c.is_ascii_alphabetic() => {
                self.parse_block_move().map(Unit::Move)
            }
            Some(c) => Err(ParseError::new(self.pos, format!("unexpected '{c}'"))),
            None => Err(ParseError::new(self.pos, "unexpected end of input")),
        }
    }

    fn parse_number(&mut self) -> Result<Option<u32>, ParseError> {
        let start = self.pos;
        let mut value: Option<u32> = None;
        while let Some(c) = self.peek() {
            let Some(digit) = c.to_digit(10) else {
                break;
            };
            value = Some(
                value
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(digit))
                    .ok_or_else(|| ParseError::new(start, "number is too large"))?,
            );
            self.pos += 1;
        }
        Ok(value)
    }

    fn parse_block_move(&mut self) -> Result<BlockMove, ParseError> {
        let start = self.pos;
        let outer_layer = self.parse_number()?;
        let mut inner_layer = None;
        if outer_layer.is_some() && self.peek() == Some('-') {
            self.pos += 1;
            inner_layer = Some(
                self.parse_number()?
                    .ok_or_else(|| ParseError::new(self.pos, "expected inner layer number"))?,
            );
        }

        let family_start = self.pos;
        let family = match self.bump() {
            Some(c @ ('U' | 'F' | 'R' | 'B' | 'L' | 'D')) => {
                if self.peek() == Some('w') {
                    self.pos += 1;
                    format!("{c}w")
                } else {
                    c.to_string()
                }
            }
            Some(c @ ('u' | 'f' | 'r' | 'b' | 'l' | 'd')) => c.to_string(),
            Some(c @ ('x' | 'y' | 'z' | 'M' | 'E' | 'S' | 'm' | 'e' | 's')) => {
                if outer_layer.is_some() {
                    return Err(ParseError::new(
                        start,
                        format!("'{c}' does not take a layer prefix"),
                    ));
                }
                c.to_string()
            }
            Some(c) => {
                return Err(ParseError::new(
                    family_start,
                    format!("unknown move family '{c}'"),
                ));
            }
            None => return Err(ParseError::new(family_start, "expected a move family")),
        };

        if let (Some(outer), Some(inner)) = (outer_layer, inner_layer) {
            if outer > inner {
                return Err(ParseError::new(start, "outer layer exceeds inner layer"));
            }
        }
        if outer_layer == Some(0) || inner_layer == Some(0) {
            return Err(ParseError::new(start, "layer numbers start at 1"));
        }

        let amount = self.parse_amount()?;
        Ok(BlockMove {
            outer_layer,
            inner_layer,
            family,
            amount,
        })
    }

    fn parse_amount(&mut self) -> Result<i32, ParseError> {
        let start = self.pos;
        let magnitude = match self.parse_number()? {
            Some(n) => i32::try_from(n)
                .map_err(|_| ParseError::new(start, "repetition count is too large"))?,
            None => 1,
        };
        let mut amount = magnitude;
        if self.peek() == Some('\'') {
            self.pos += 1;
            amount = -magnitude;
        }
        if self.peek() == Some('\'') {
            return Err(ParseError::new(self.pos, "malformed amount"));
        }
        Ok(amount)
    }
}

fn amount_suffix(amount: i32) -> String {
    match amount {
        1 => String::new(),
        -1 => "'".to_string(),
        n if n < 0 => format!("{}'", n.unsigned_abs()),
        n => n.to_string(),
    }
}

impl fmt::Display for BlockMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(outer) = self.outer_layer {
            write!(f, "{outer}")?;
        }
        if let Some(inner) = self.inner_layer {
            write!(f, "-{inner}")?;
        }
        write!(f, "{}{}", self.family, amount_suffix(self.amount))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Move(block_move) => write!(f, "{block_move}"),
            Unit::Group { nested, amount } => write!(f, "({nested}){}", amount_suffix(*amount)),
            Unit::Commutator { a, b, amount } => {
                write!(f, "[{a}, {b}]{}", amount_suffix(*amount))
            }
            Unit::Conjugate { a, b, amount } => {
                write!(f, "[{a}: {b}]{}", amount_suffix(*amount))
            }
            Unit::Pause => write!(f, "."),
            Unit::NewLine => writeln!(f),
            Unit::Comment(text) => write!(f, "//{text}"),
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut previous: Option<&Unit> = None;
        for unit in &self.units {
            if let Some(prev) = previous {
                if !matches!(prev, Unit::NewLine) && !matches!(unit, Unit::NewLine) {
                    write!(f, " ")?;
                }
            }
            write!(f, "{unit}")?;
            previous = Some(unit);
        }
        Ok(())
    }
}

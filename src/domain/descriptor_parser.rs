//! Descriptor text parser.
//!
//! Grammar, one descriptor per `;`-separated item:
//!
//! ```text
//! descriptor := kind (key '=' value)*
//! value      := token (',' token)*
//! token      := integer | float | true | false | word | "quoted" | 'quoted'
//! ```
//!
//! `params`, `col_names` and `col_numbers` take lists; every other key takes a
//! single token. Errors carry the character offset into the whole input.

use crate::domain::descriptor::{ColNames, IndicatorDescriptor};
use crate::domain::error::ParseError;
use crate::domain::value::ParamValue;

struct Token {
    text: String,
    quoted: bool,
    position: usize,
}

impl Token {
    fn value(&self) -> ParamValue {
        if self.quoted {
            ParamValue::Str(self.text.clone())
        } else {
            ParamValue::parse(&self.text)
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn at_end_of_item(&mut self) -> bool {
        self.skip_whitespace();
        matches!(self.peek(), None | Some(';'))
    }

    fn error(&self, message: impl Into<String>, position: usize) -> ParseError {
        ParseError {
            message: message.into(),
            position,
        }
    }

    fn found(&self) -> String {
        self.peek()
            .map(|c| format!("'{}'", c))
            .unwrap_or_else(|| "end of input".to_string())
    }

    fn parse_ident(&mut self, what: &str) -> Result<String, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(self.error(format!("expected {}, found {}", what, self.found()), start));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            _ => Err(self.error(
                format!("expected '{}', found {}", expected, self.found()),
                self.pos,
            )),
        }
    }

    fn parse_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let body = self.pos;
                while let Some(ch) = self.advance() {
                    if ch == quote {
                        return Ok(Token {
                            text: self.input[body..self.pos - 1].to_string(),
                            quoted: true,
                            position: start,
                        });
                    }
                }
                Err(self.error("unterminated string", start))
            }
            _ => {
                while let Some(ch) = self.peek() {
                    if ch.is_whitespace() || ch == ',' || ch == ';' || ch == '=' {
                        break;
                    }
                    self.advance();
                }
                if start == self.pos {
                    return Err(self.error(format!("expected value, found {}", self.found()), start));
                }
                Ok(Token {
                    text: self.input[start..self.pos].to_string(),
                    quoted: false,
                    position: start,
                })
            }
        }
    }

    fn parse_list(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = vec![self.parse_token()?];
        loop {
            self.skip_whitespace();
            if self.peek() != Some(',') {
                return Ok(tokens);
            }
            self.advance();
            tokens.push(self.parse_token()?);
        }
    }

    fn parse_descriptor(&mut self) -> Result<IndicatorDescriptor, ParseError> {
        let kind = self.parse_ident("indicator kind")?;
        let mut descriptor = IndicatorDescriptor::new(kind);
        let mut seen: Vec<String> = Vec::new();

        while !self.at_end_of_item() {
            let key_pos = self.pos;
            let key = self.parse_ident("parameter name")?;
            if seen.contains(&key) {
                return Err(self.error(format!("'{}' given twice", key), key_pos));
            }
            self.expect_char('=')?;
            let tokens = self.parse_list()?;

            match key.as_str() {
                "params" => {
                    descriptor.params = tokens.iter().map(Token::value).collect();
                }
                "col_names" => {
                    let names: Vec<String> = tokens.into_iter().map(|t| t.text).collect();
                    descriptor.col_names = Some(match <[String; 1]>::try_from(names) {
                        Ok([single]) => ColNames::Single(single),
                        Err(names) => ColNames::Many(names),
                    });
                }
                "col_numbers" => {
                    let numbers = tokens
                        .iter()
                        .map(|t| {
                            t.text.parse::<usize>().map_err(|_| {
                                self.error(
                                    format!("col_numbers expects indices, found '{}'", t.text),
                                    t.position,
                                )
                            })
                        })
                        .collect::<Result<Vec<usize>, ParseError>>()?;
                    descriptor.col_numbers = Some(numbers);
                }
                _ => {
                    if let [token] = tokens.as_slice() {
                        descriptor.kwargs.insert(key.clone(), token.value());
                    } else {
                        return Err(self.error(
                            format!("'{}' takes a single value", key),
                            tokens[1].position,
                        ));
                    }
                }
            }
            seen.push(key);
        }
        Ok(descriptor)
    }

    fn parse(&mut self) -> Result<Vec<IndicatorDescriptor>, ParseError> {
        let mut descriptors = Vec::new();
        loop {
            if self.at_end_of_item() {
                if self.peek().is_none() {
                    break;
                }
                self.advance();
                continue;
            }
            descriptors.push(self.parse_descriptor()?);
        }
        if descriptors.is_empty() {
            return Err(self.error("expected indicator kind, found end of input", self.pos));
        }
        Ok(descriptors)
    }
}

/// Parse a `;`-separated list of descriptors.
pub fn parse(input: &str) -> Result<Vec<IndicatorDescriptor>, ParseError> {
    Parser::new(input).parse()
}

/// Parse exactly one descriptor.
pub fn parse_one(input: &str) -> Result<IndicatorDescriptor, ParseError> {
    let mut descriptors = parse(input)?;
    if descriptors.len() != 1 {
        return Err(ParseError {
            message: format!("expected one descriptor, found {}", descriptors.len()),
            position: 0,
        });
    }
    Ok(descriptors.remove(0))
}

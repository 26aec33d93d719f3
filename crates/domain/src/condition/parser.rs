use serde_json::{Number, Value};

use super::{Condition, ConditionParseError, FactPath, Operand};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Number(Number),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Bang,
    AndAnd,
}

/// Deepest nesting of `!`, `&&`, parentheses and lists a condition may use.
pub(super) const MAX_DEPTH: usize = 64;

pub(super) fn parse(source: &str) -> Result<Condition, ConditionParseError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(error_at(0, "condition is empty"));
    }

    let mut parser = Parser {
        tokens,
        index: 0,
        end: source.len(),
        depth: 0,
    };
    let condition = parser.parse_expression()?;

    if let Some((position, token)) = parser.tokens.get(parser.index) {
        return Err(error_at(
            *position,
            format!("unexpected trailing token {token:?}"),
        ));
    }

    Ok(condition)
}

fn error_at(position: usize, message: impl Into<String>) -> ConditionParseError {
    ConditionParseError {
        position,
        message: message.into(),
    }
}

fn tokenize(source: &str) -> Result<Vec<(usize, Token)>, ConditionParseError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(position, character)) = chars.peek() {
        match character {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' | ')' | '[' | ']' | ',' | '.' | '!' => {
                chars.next();
                let token = match character {
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    '[' => Token::LBracket,
                    ']' => Token::RBracket,
                    ',' => Token::Comma,
                    '.' => Token::Dot,
                    _ => Token::Bang,
                };
                tokens.push((position, token));
            }
            '&' => {
                chars.next();
                match chars.next() {
                    Some((_, '&')) => tokens.push((position, Token::AndAnd)),
                    _ => return Err(error_at(position, "expected '&&'")),
                }
            }
            '"' | '\'' => {
                chars.next();
                let quote = character;
                let mut content = String::new();
                let mut closed = false;

                while let Some((_, next)) = chars.next() {
                    match next {
                        '\\' => match chars.next() {
                            Some((_, escaped)) => content.push(escaped),
                            None => break,
                        },
                        c if c == quote => {
                            closed = true;
                            break;
                        }
                        c => content.push(c),
                    }
                }

                if !closed {
                    return Err(error_at(position, "unterminated string literal"));
                }
                tokens.push((position, Token::Str(content)));
            }
            c if c.is_ascii_digit() || c == '-' => {
                let mut literal = String::new();
                literal.push(c);
                chars.next();

                while let Some(&(next_position, next)) = chars.peek() {
                    let continues_decimal = next == '.'
                        && source[next_position + 1..]
                            .chars()
                            .next()
                            .is_some_and(|after| after.is_ascii_digit());
                    if next.is_ascii_digit() || continues_decimal {
                        literal.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }

                tokens.push((position, Token::Number(parse_number(position, &literal)?)));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut identifier = String::new();

                while let Some(&(_, next)) = chars.peek() {
                    if next.is_alphanumeric() || next == '_' {
                        identifier.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }

                tokens.push((position, Token::Ident(identifier)));
            }
            other => {
                return Err(error_at(
                    position,
                    format!("unexpected character '{other}'"),
                ));
            }
        }
    }

    Ok(tokens)
}

fn parse_number(position: usize, literal: &str) -> Result<Number, ConditionParseError> {
    let invalid = || error_at(position, format!("invalid number '{literal}'"));

    if literal.contains('.') {
        let value = literal.parse::<f64>().map_err(|_| invalid())?;
        return Number::from_f64(value).ok_or_else(invalid);
    }

    literal
        .parse::<i64>()
        .map(Number::from)
        .map_err(|_| invalid())
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    index: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|(_, token)| token)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.index)
            .map(|(position, _)| *position)
            .unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).map(|(_, token)| token.clone());
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token, label: &str) -> Result<(), ConditionParseError> {
        let position = self.position();
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(error_at(
                position,
                format!("expected {label}, found {token:?}"),
            )),
            None => Err(error_at(position, format!("expected {label}, found end of input"))),
        }
    }

    fn descend(&mut self) -> Result<(), ConditionParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(error_at(self.position(), "condition nested too deeply"));
        }

        Ok(())
    }

    // Each conjunct deepens the left-leaning `And` chain by one level.
    fn parse_expression(&mut self) -> Result<Condition, ConditionParseError> {
        let outer_depth = self.depth;
        let mut left = self.parse_unary()?;

        while self.peek() == Some(&Token::AndAnd) {
            self.advance();
            self.descend()?;
            let right = self.parse_unary()?;
            left = Condition::And(Box::new(left), Box::new(right));
        }

        self.depth = outer_depth;
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Condition, ConditionParseError> {
        if self.peek() == Some(&Token::Bang) {
            self.advance();
            self.descend()?;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Condition::Not(Box::new(inner)));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Condition, ConditionParseError> {
        let position = self.position();
        match self.advance() {
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.parse_expression()?;
                self.expect(Token::RParen, "')'")?;
                self.depth -= 1;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                self.expect(Token::LParen, "'(' after function name")?;
                let arguments = self.parse_arguments()?;
                Self::build_call(position, name.as_str(), arguments)
            }
            Some(token) => Err(error_at(
                position,
                format!("expected a function call, found {token:?}"),
            )),
            None => Err(error_at(position, "expected a function call")),
        }
    }

    fn build_call(
        position: usize,
        name: &str,
        arguments: Vec<Operand>,
    ) -> Result<Condition, ConditionParseError> {
        let arity = arguments.len();
        let mut arguments = arguments.into_iter();

        match (name, arity) {
            ("always", 0) => Ok(Condition::Always),
            ("equals" | "in" | "in_group", 2) => {
                let (Some(first), Some(second)) = (arguments.next(), arguments.next()) else {
                    return Err(error_at(position, "missing arguments"));
                };
                Ok(match name {
                    "equals" => Condition::Equals(first, second),
                    "in" => Condition::In(first, second),
                    _ => Condition::InGroup(first, second),
                })
            }
            ("always" | "equals" | "in" | "in_group", _) => Err(error_at(
                position,
                format!("function '{name}' called with {arity} argument(s)"),
            )),
            _ => Err(error_at(position, format!("unknown function '{name}'"))),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Operand>, ConditionParseError> {
        let mut arguments = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.advance();
            return Ok(arguments);
        }

        loop {
            arguments.push(self.parse_operand()?);

            let position = self.position();
            match self.advance() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(arguments),
                Some(token) => {
                    return Err(error_at(
                        position,
                        format!("expected ',' or ')', found {token:?}"),
                    ));
                }
                None => return Err(error_at(position, "unclosed argument list")),
            }
        }
    }

    fn parse_operand(&mut self) -> Result<Operand, ConditionParseError> {
        let position = self.position();
        match self.advance() {
            Some(Token::Str(content)) => Ok(Operand::Literal(Value::String(content))),
            Some(Token::Number(number)) => Ok(Operand::Literal(Value::Number(number))),
            Some(Token::LBracket) => {
                self.descend()?;
                let list = self.parse_list()?;
                self.depth -= 1;
                Ok(list)
            }
            Some(Token::Ident(name)) => match name.as_str() {
                "true" => Ok(Operand::Literal(Value::Bool(true))),
                "false" => Ok(Operand::Literal(Value::Bool(false))),
                "null" => Ok(Operand::Literal(Value::Null)),
                _ => self.parse_path(name),
            },
            Some(token) => Err(error_at(
                position,
                format!("expected an operand, found {token:?}"),
            )),
            None => Err(error_at(position, "expected an operand")),
        }
    }

    fn parse_list(&mut self) -> Result<Operand, ConditionParseError> {
        let mut items = Vec::new();
        if self.peek() == Some(&Token::RBracket) {
            self.advance();
            return Ok(Operand::List(items));
        }

        loop {
            items.push(self.parse_operand()?);

            let position = self.position();
            match self.advance() {
                Some(Token::Comma) => continue,
                Some(Token::RBracket) => return Ok(Operand::List(items)),
                Some(token) => {
                    return Err(error_at(
                        position,
                        format!("expected ',' or ']', found {token:?}"),
                    ));
                }
                None => return Err(error_at(position, "unclosed list")),
            }
        }
    }

    fn parse_path(&mut self, root: String) -> Result<Operand, ConditionParseError> {
        let mut segments = vec![root];

        while self.peek() == Some(&Token::Dot) {
            self.advance();
            let position = self.position();
            match self.advance() {
                Some(Token::Ident(segment)) => segments.push(segment),
                Some(Token::Number(number)) if number.is_u64() => {
                    segments.push(number.to_string());
                }
                _ => return Err(error_at(position, "expected a name after '.'")),
            }
        }

        Ok(Operand::Path(FactPath::new(segments)))
    }
}

//! Formula tokenizer and recursive-descent parser.
//!
//! Grammar (whitespace is insignificant, a leading `=` is optional):
//!
//! ```text
//! formula := part
//! part    := in | count | if | sum | "(" part OP part ")" | DATE | NUMBER | range | cell
//! sum     := "SUM" "(" range ")"
//! count   := "COUNT" "(" range ")"
//! if      := "IF" "(" part OP part ")" "THEN" cell "ELSE" cell
//! in      := "IN" "(" range "," part ")"
//! range   := cell ":" cell
//! OP      := "+" | "-" | "*" | "/" | ">" | "<"
//! DATE    := YYYY-MM-DD
//! NUMBER  := digit+ ("." digit+)?
//! ```

use chrono::NaiveDate;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::ast::{BinaryOp, Expr, Formula, Range};
use super::{CellRef, ParseError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Keyword {
    Sum,
    Count,
    If,
    Then,
    Else,
    In,
}

impl Keyword {
    fn from_ident(ident: &str) -> Option<Keyword> {
        match ident {
            "SUM" => Some(Keyword::Sum),
            "COUNT" => Some(Keyword::Count),
            "IF" => Some(Keyword::If),
            "THEN" => Some(Keyword::Then),
            "ELSE" => Some(Keyword::Else),
            "IN" => Some(Keyword::In),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Keyword::Sum => "SUM",
            Keyword::Count => "COUNT",
            Keyword::If => "IF",
            Keyword::Then => "THEN",
            Keyword::Else => "ELSE",
            Keyword::In => "IN",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum TokenKind {
    Equals,
    Number(f64),
    Date(NaiveDate),
    Cell(CellRef),
    Keyword(Keyword),
    Op(BinaryOp),
    LParen,
    RParen,
    Colon,
    Comma,
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::Date(d) => write!(f, "date {}", d.format("%Y-%m-%d")),
            TokenKind::Cell(c) => write!(f, "cell {}", c),
            TokenKind::Keyword(k) => write!(f, "'{}'", k.as_str()),
            TokenKind::Op(op) => write!(f, "'{}'", op),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::End => write!(f, "end of formula"),
        }
    }
}

#[derive(Clone, Debug)]
struct Token {
    kind: TokenKind,
    position: usize,
}

fn date_re() -> &'static Regex {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    DATE_RE.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("date regex must compile")
    })
}

fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() {
            if let Some(m) = date_re().find(&text[i..]) {
                let literal = m.as_str();
                let date = NaiveDate::parse_from_str(literal, "%Y-%m-%d").map_err(|_| {
                    ParseError::new(start, format!("invalid date {}", literal))
                })?;
                i += literal.len();
                tokens.push(Token {
                    kind: TokenKind::Date(date),
                    position: start,
                });
                continue;
            }

            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i + 1 < bytes.len() && bytes[i] == b'.' && bytes[i + 1].is_ascii_digit() {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            let literal = &text[start..i];
            let n = literal
                .parse::<f64>()
                .map_err(|_| ParseError::new(start, format!("invalid number {}", literal)))?;
            tokens.push(Token {
                kind: TokenKind::Number(n),
                position: start,
            });
            continue;
        }

        if c.is_ascii_alphabetic() {
            while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                i += 1;
            }
            let letters_end = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let word = &text[start..i];

            let kind = if i > letters_end {
                let cell = CellRef::from_str(word).ok_or_else(|| {
                    ParseError::new(start, format!("invalid cell reference {}", word))
                })?;
                TokenKind::Cell(cell)
            } else {
                let keyword = Keyword::from_ident(word).ok_or_else(|| {
                    ParseError::new(start, format!("unknown identifier {}", word))
                })?;
                TokenKind::Keyword(keyword)
            };
            tokens.push(Token {
                kind,
                position: start,
            });
            continue;
        }

        let kind = match c {
            b'=' => TokenKind::Equals,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            _ => match BinaryOp::from_symbol(c as char) {
                Some(op) => TokenKind::Op(op),
                None => {
                    let ch = text[start..].chars().next().unwrap_or('?');
                    return Err(ParseError::new(
                        start,
                        format!("unexpected character {:?}", ch),
                    ));
                }
            },
        };
        i += 1;
        tokens.push(Token {
            kind,
            position: start,
        });
    }

    tokens.push(Token {
        kind: TokenKind::End,
        position: text.len(),
    });
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // The token stream always ends with `End`, and `advance` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::End {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError::new(
            token.position,
            format!("expected {} but found {}", expected, token.kind),
        )
    }

    fn expect(&mut self, expected: TokenKind, description: &str) -> Result<(), ParseError> {
        if self.peek().kind == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(description))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        self.expect(
            TokenKind::Keyword(keyword),
            &format!("'{}'", keyword.as_str()),
        )
    }

    fn expect_cell(&mut self) -> Result<CellRef, ParseError> {
        match &self.peek().kind {
            TokenKind::Cell(cell) => {
                let cell = cell.clone();
                self.advance();
                Ok(cell)
            }
            _ => Err(self.unexpected("a cell reference")),
        }
    }

    fn expect_op(&mut self) -> Result<BinaryOp, ParseError> {
        match self.peek().kind {
            TokenKind::Op(op) => {
                self.advance();
                Ok(op)
            }
            _ => Err(self.unexpected("an operator")),
        }
    }

    fn parse_formula(&mut self) -> Result<Formula, ParseError> {
        if self.peek().kind == TokenKind::Equals {
            self.advance();
        }
        if self.peek().kind == TokenKind::End {
            return Err(self.unexpected("an expression"));
        }
        let root = self.parse_part()?;
        if self.peek().kind != TokenKind::End {
            return Err(self.unexpected("end of formula"));
        }
        Ok(Formula { root })
    }

    fn parse_part(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Keyword(Keyword::Sum) => {
                self.advance();
                Ok(Expr::Sum(self.parse_call_range()?))
            }
            TokenKind::Keyword(Keyword::Count) => {
                self.advance();
                Ok(Expr::Count(self.parse_call_range()?))
            }
            TokenKind::Keyword(Keyword::In) => {
                self.advance();
                self.expect(TokenKind::LParen, "'('")?;
                let range = self.parse_range()?;
                self.expect(TokenKind::Comma, "','")?;
                let needle = self.parse_part()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(Expr::In {
                    range,
                    needle: Box::new(needle),
                })
            }
            TokenKind::Keyword(Keyword::If) => {
                self.advance();
                let condition = self.parse_parenthesized()?;
                self.expect_keyword(Keyword::Then)?;
                let then = self.expect_cell()?;
                self.expect_keyword(Keyword::Else)?;
                let otherwise = self.expect_cell()?;
                Ok(Expr::If {
                    condition: Box::new(condition),
                    then,
                    otherwise,
                })
            }
            TokenKind::LParen => self.parse_parenthesized(),
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Number(n))
            }
            TokenKind::Date(d) => {
                self.advance();
                Ok(Expr::Date(d))
            }
            TokenKind::Cell(cell) => {
                if *self.peek_kind(1) == TokenKind::Colon {
                    Ok(Expr::Spill(self.parse_range()?))
                } else {
                    self.advance();
                    Ok(Expr::Cell(cell))
                }
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// `"(" part OP part ")"`
    fn parse_parenthesized(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LParen, "'('")?;
        let lhs = self.parse_part()?;
        let op = self.expect_op()?;
        let rhs = self.parse_part()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Expr::binary(op, lhs, rhs))
    }

    /// `"(" range ")"`
    fn parse_call_range(&mut self) -> Result<Range, ParseError> {
        self.expect(TokenKind::LParen, "'('")?;
        let range = self.parse_range()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(range)
    }

    fn parse_range(&mut self) -> Result<Range, ParseError> {
        let position = self.peek().position;
        let start = self.expect_cell()?;
        self.expect(TokenKind::Colon, "':'")?;
        let end = self.expect_cell()?;
        Range::new(start, end).map_err(|message| ParseError::new(position, message))
    }
}

/// Parse formula text (with or without the leading `=`) into a [`Formula`].
pub fn parse_formula(text: &str) -> Result<Formula, ParseError> {
    let tokens = tokenize(text)?;
    Parser { tokens, pos: 0 }.parse_formula()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    fn range(start: &str, end: &str) -> Range {
        Range::new(cell(start), cell(end)).unwrap()
    }

    #[test]
    fn test_parse_cell() {
        let formula = parse_formula("=A1").unwrap();
        assert_eq!(formula.root, Expr::Cell(cell("A1")));
    }

    #[test]
    fn test_leading_equals_is_optional() {
        assert_eq!(parse_formula("A1"), parse_formula("=A1"));
    }

    #[test]
    fn test_parse_nested_parts() {
        let formula = parse_formula("=((A1 * 2) - (2 + 2))").unwrap();
        let expected = Expr::binary(
            BinaryOp::Sub,
            Expr::binary(BinaryOp::Mul, Expr::Cell(cell("A1")), Expr::Number(2.0)),
            Expr::binary(BinaryOp::Add, Expr::Number(2.0), Expr::Number(2.0)),
        );
        assert_eq!(formula.root, expected);
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        assert_eq!(parse_formula("=(A1/5)"), parse_formula("= ( A1 / 5 )"));
    }

    #[test]
    fn test_parse_aggregates() {
        assert_eq!(
            parse_formula("=SUM(A1:A2)").unwrap().root,
            Expr::Sum(range("A1", "A2"))
        );
        assert_eq!(
            parse_formula("=COUNT(A1:A3)").unwrap().root,
            Expr::Count(range("A1", "A3"))
        );
        assert_eq!(
            parse_formula("=IN(A1:A3, 10)").unwrap().root,
            Expr::In {
                range: range("A1", "A3"),
                needle: Box::new(Expr::Number(10.0)),
            }
        );
    }

    #[test]
    fn test_bare_range_is_spill() {
        assert_eq!(
            parse_formula("=A1:A3").unwrap().root,
            Expr::Spill(range("A1", "A3"))
        );
    }

    #[test]
    fn test_parse_if() {
        let formula = parse_formula("=IF((A1 + A2) > 10) THEN A3 ELSE A1").unwrap();
        assert_eq!(
            formula.root,
            Expr::If {
                condition: Box::new(Expr::binary(
                    BinaryOp::Gt,
                    Expr::binary(BinaryOp::Add, Expr::Cell(cell("A1")), Expr::Cell(cell("A2"))),
                    Expr::Number(10.0),
                )),
                then: cell("A3"),
                otherwise: cell("A1"),
            }
        );
    }

    #[test]
    fn test_parse_date_and_decimal() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(parse_formula("=2024-01-05").unwrap().root, Expr::Date(date));
        assert_eq!(parse_formula("=2.5").unwrap().root, Expr::Number(2.5));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let err = parse_formula("=2024-02-30").unwrap_err();
        assert_eq!(err.position, 1);
    }

    #[test]
    fn test_empty_formula_is_rejected() {
        assert!(parse_formula("=").is_err());
        assert!(parse_formula("   ").is_err());
    }

    #[test]
    fn test_only_one_top_level_part() {
        let err = parse_formula("=A1 A2").unwrap_err();
        assert_eq!(err.position, 4);
        assert!(err.message.contains("end of formula"));
    }

    #[test]
    fn test_unbalanced_parens_report_position() {
        let err = parse_formula("=(A1 + 2").unwrap_err();
        assert_eq!(err.position, 8);
    }

    #[test]
    fn test_unknown_identifier() {
        let err = parse_formula("=AVG(A1:A2)").unwrap_err();
        assert_eq!(err.position, 1);
        assert!(err.message.contains("AVG"));
    }

    #[test]
    fn test_multi_column_range_is_rejected() {
        let err = parse_formula("=SUM(A1:B2)").unwrap_err();
        assert_eq!(err.position, 5);
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        assert!(parse_formula("=A3:A1").is_err());
    }

    #[test]
    fn test_unexpected_character() {
        let err = parse_formula("=(A1 % 2)").unwrap_err();
        assert_eq!(err.position, 5);
    }

    #[test]
    fn test_display_round_trips() {
        for text in [
            "=((A1 * 2) - (2 + 2))",
            "=SUM(A1:A2)",
            "=IN(A1:A3, 10)",
            "=IF(A1 > 10) THEN A3 ELSE A1",
            "=B1:B4",
        ] {
            assert_eq!(parse_formula(text).unwrap().to_string(), text);
        }
    }
}

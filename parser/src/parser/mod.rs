//! Parser for EQL query text.
//!
//! Grammar:
//!
//! ```text
//! query     := [ or_expr ] [ "order" "by" order ( "," order )* ] EOF
//! or_expr   := and_expr ( OR and_expr )*
//! and_expr  := primary ( AND primary )*
//! primary   := "(" or_expr ")" | condition
//! condition := path operator [ operand ]
//! path      := IDENT [ "[" "]" ] ( "." IDENT [ "[" "]" ] )*
//! order     := path ( "asc" | "desc" )
//! ```

mod condition;

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::lexer::{Lexer, Token, TokenKind};
use eql_core::{Direction, Order, Predicate};

// ==================== PARSER STATE ====================

/// Parser state.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    eof: Token,
}

impl Parser {
    /// Create a new parser from query text.
    pub fn new(input: &str) -> ParseResult<Self> {
        let tokens = Lexer::new(input).tokenize()?;
        let eof = tokens
            .last()
            .cloned()
            .unwrap_or_else(|| Token::eof(input.len(), 1, 1));
        Ok(Self {
            tokens,
            pos: 0,
            eof,
        })
    }
}

// ==================== TOKEN HELPERS ====================

impl Parser {
    pub(crate) fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    pub(crate) fn peek_nth(&self, n: usize) -> &Token {
        self.tokens.get(self.pos + n).unwrap_or(&self.eof)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn check_ident(&self, name: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(s) if s.eq_ignore_ascii_case(name))
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.name()))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("property name")),
        }
    }

    /// Error for the current token, which was not what the grammar expects.
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError::unexpected_token(token.span, expected, &token.kind.describe())
    }

    fn at_order_by(&self) -> bool {
        self.check_ident("order")
            && matches!(&self.peek_nth(1).kind, TokenKind::Ident(s) if s.eq_ignore_ascii_case("by"))
    }
}

// ==================== QUERY ====================

impl Parser {
    /// Parse a complete query.
    pub fn parse_query(&mut self) -> ParseResult<RawQuery> {
        let predicate = if self.check(&TokenKind::Eof) || self.at_order_by() {
            None
        } else {
            Some(self.parse_or()?)
        };

        let orders = if self.at_order_by() {
            self.advance();
            self.advance();
            self.parse_orders()?
        } else {
            Vec::new()
        };

        if !self.check(&TokenKind::Eof) {
            let expected = if predicate.is_some() && orders.is_empty() {
                "AND, OR, ORDER BY or end of input"
            } else {
                "end of input"
            };
            return Err(self.unexpected(expected));
        }

        Ok(RawQuery { predicate, orders })
    }

    fn parse_or(&mut self) -> ParseResult<Predicate<RawCondition>> {
        let mut items = vec![self.parse_and()?];
        while self.check(&TokenKind::Or) {
            self.advance();
            items.push(self.parse_and()?);
        }
        Ok(Predicate::any_of(items))
    }

    fn parse_and(&mut self) -> ParseResult<Predicate<RawCondition>> {
        let mut items = vec![self.parse_primary()?];
        while self.check(&TokenKind::And) {
            self.advance();
            items.push(self.parse_primary()?);
        }
        Ok(Predicate::all_of(items))
    }

    fn parse_primary(&mut self) -> ParseResult<Predicate<RawCondition>> {
        if self.check(&TokenKind::LParen) {
            self.advance();
            let inner = self.parse_or()?;
            self.expect(&TokenKind::RParen)?;
            Ok(inner)
        } else {
            Ok(Predicate::Condition(self.parse_condition()?))
        }
    }

    fn parse_orders(&mut self) -> ParseResult<Vec<Order<String>>> {
        let mut orders = Vec::new();
        loop {
            let property = self.parse_path()?;
            let direction = if self.check_ident("asc") {
                Direction::Asc
            } else if self.check_ident("desc") {
                Direction::Desc
            } else {
                return Err(ParseError::new(
                    ParseErrorKind::MissingDirection {
                        property,
                        found: self.peek().kind.describe(),
                    },
                    self.peek().span,
                ));
            };
            self.advance();
            orders.push(Order::new(property, direction));

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(orders)
    }

    /// Parse a property path, returning its canonical text.
    pub(crate) fn parse_path(&mut self) -> ParseResult<String> {
        let mut path = self.expect_ident()?;
        loop {
            if self.check(&TokenKind::LBracket) {
                self.advance();
                self.expect(&TokenKind::RBracket)?;
                path.push_str("[]");
            }
            if !self.check(&TokenKind::Dot) {
                break;
            }
            self.advance();
            path.push('.');
            path.push_str(&self.expect_ident()?);
        }
        Ok(path)
    }
}

// ==================== PUBLIC API ====================

/// Parse EQL text into an Abstract Query.
pub fn parse_query(input: &str) -> ParseResult<RawQuery> {
    Parser::new(input)?.parse_query()
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use eql_core::Operator;
    use pretty_assertions::assert_eq;

    fn cond(property: &str, operator: Operator, operand: Operand) -> Predicate<RawCondition> {
        Predicate::Condition(RawCondition::new(property, operator, operand))
    }

    fn token(t: &str) -> Operand {
        Operand::Token(t.to_string())
    }

    // ==================== STRUCTURE TESTS ====================

    #[test]
    fn test_empty_query_matches_everything() {
        assert_eq!(parse_query("").unwrap(), RawQuery::all());
        assert_eq!(parse_query("   ").unwrap(), RawQuery::all());
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let query = parse_query("a = 1 or b = 2 and c = 3").unwrap();
        assert_eq!(
            query.predicate,
            Some(Predicate::Or(vec![
                cond("a", Operator::Eq, Operand::Integer(1)),
                Predicate::And(vec![
                    cond("b", Operator::Eq, Operand::Integer(2)),
                    cond("c", Operator::Eq, Operand::Integer(3)),
                ]),
            ]))
        );
    }

    #[test]
    fn test_parentheses_group() {
        let query = parse_query("(a = 1 or b = 2) and c = 3").unwrap();
        assert_eq!(
            query.predicate,
            Some(Predicate::And(vec![
                Predicate::Or(vec![
                    cond("a", Operator::Eq, Operand::Integer(1)),
                    cond("b", Operator::Eq, Operand::Integer(2)),
                ]),
                cond("c", Operator::Eq, Operand::Integer(3)),
            ]))
        );
    }

    #[test]
    fn test_junctions_are_left_to_right() {
        let query = parse_query("a = 1 and b = 2 and c = 3").unwrap();
        assert_eq!(
            query.predicate.unwrap().conditions().iter().map(|c| c.property.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_order_by() {
        let query = parse_query("order by id DESC, group.name asc").unwrap();
        assert_eq!(query.predicate, None);
        assert_eq!(
            query.orders,
            vec![
                Order::desc("id".to_string()),
                Order::asc("group.name".to_string())
            ]
        );

        let query = parse_query("status = BROKE ORDER BY number asc").unwrap();
        assert_eq!(query.predicate, Some(cond("status", Operator::Eq, token("BROKE"))));
        assert_eq!(query.orders, vec![Order::asc("number".to_string())]);
    }

    #[test]
    fn test_contextual_keywords_as_property_names() {
        let query = parse_query("order = 1 and empty is empty order by by desc").unwrap();
        let conditions = query.predicate.as_ref().unwrap().conditions();
        assert_eq!(conditions[0].property, "order");
        assert_eq!(conditions[1].property, "empty");
        assert_eq!(conditions[1].operator, Operator::IsEmpty);
        assert_eq!(query.orders, vec![Order::desc("by".to_string())]);
    }

    #[test]
    fn test_paths() {
        let query = parse_query("books[].authors[].name = 'x'").unwrap();
        assert_eq!(
            query.predicate,
            Some(cond("books[].authors[].name", Operator::Eq, Operand::String("x".into())))
        );
    }

    // ==================== ERROR TESTS ====================

    #[test]
    fn test_missing_direction() {
        let err = parse_query("order by number desc, id").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::MissingDirection {
                property: "id".into(),
                found: "end of input".into(),
            }
        );
        assert_eq!(err.position(), 24);
        assert!(err.to_string().contains("ASC or DESC after 'id'"), "{}", err);
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = parse_query("id = one two").unwrap_err();
        assert_eq!(err.found(), Some("identifier 'two'"));
        assert_eq!(err.column(), 10);
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(parse_query("(a = 1 or b = 2").is_err());
        assert!(parse_query("a = 1)").is_err());
    }

    #[test]
    fn test_missing_operand() {
        let err = parse_query("id =").unwrap_err();
        assert_eq!(err.found(), Some("end of input"));
    }
}

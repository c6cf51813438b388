//! Condition parsing: property path, operator and operand.

use super::Parser;
use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::lexer::TokenKind;
use eql_core::Operator;

impl Parser {
    pub(crate) fn parse_condition(&mut self) -> ParseResult<RawCondition> {
        let property = self.parse_path()?;
        let operator = self.parse_operator()?;
        if operator.is_unary() {
            return Ok(RawCondition::unary(property, operator));
        }
        let operand = self.parse_operand(operator)?;
        Ok(RawCondition::new(property, operator, operand))
    }

    fn parse_operator(&mut self) -> ParseResult<Operator> {
        let operator = match self.peek().kind {
            TokenKind::Eq => Operator::Eq,
            TokenKind::NotEq => Operator::Neq,
            TokenKind::Lt => Operator::Lt,
            TokenKind::LtEq => Operator::Le,
            TokenKind::Gt => Operator::Gt,
            TokenKind::GtEq => Operator::Ge,
            TokenKind::Like => Operator::Like,
            TokenKind::ILike => Operator::ILike,
            TokenKind::Contains => Operator::Contains,
            TokenKind::In => Operator::In,
            TokenKind::Not => {
                self.advance();
                let negated = match self.peek().kind {
                    TokenKind::Like => Operator::NotLike,
                    TokenKind::ILike => Operator::NotILike,
                    TokenKind::Contains => Operator::NotContains,
                    TokenKind::In => Operator::NotIn,
                    _ => return Err(self.unexpected("LIKE, ILIKE, CONTAINS or IN after NOT")),
                };
                self.advance();
                return Ok(negated);
            }
            TokenKind::Is => {
                self.advance();
                let negated = self.check(&TokenKind::Not);
                if negated {
                    self.advance();
                }
                let operator = if self.check(&TokenKind::Null) {
                    if negated {
                        Operator::IsNotNull
                    } else {
                        Operator::IsNull
                    }
                } else if self.check_ident("empty") {
                    if negated {
                        Operator::IsNotEmpty
                    } else {
                        Operator::IsEmpty
                    }
                } else {
                    return Err(self.unexpected("NULL or EMPTY after IS"));
                };
                self.advance();
                return Ok(operator);
            }
            _ => return Err(self.unexpected("operator")),
        };
        self.advance();
        Ok(operator)
    }

    fn parse_operand(&mut self, operator: Operator) -> ParseResult<Operand> {
        if self.check(&TokenKind::LParen) {
            if !operator.accepts_list() {
                return Err(ParseError::new(
                    ParseErrorKind::ListNotAllowed { operator },
                    self.peek().span,
                ));
            }
            self.advance();
            let mut items = vec![self.parse_literal()?];
            while self.check(&TokenKind::Comma) {
                self.advance();
                items.push(self.parse_literal()?);
            }
            self.expect(&TokenKind::RParen)?;
            return Ok(Operand::List(items));
        }

        let literal = self.parse_literal()?;
        if operator.takes_list() {
            Ok(Operand::List(vec![literal]))
        } else {
            Ok(literal)
        }
    }

    fn parse_literal(&mut self) -> ParseResult<Operand> {
        let operand = match self.peek().kind.clone() {
            TokenKind::String(s) => Operand::String(s),
            TokenKind::Int(i) => Operand::Integer(i),
            TokenKind::Float(f) => Operand::Decimal(f),
            TokenKind::Null => Operand::Null,
            TokenKind::Ident(name) if matches!(self.peek_nth(1).kind, TokenKind::LParen) => {
                return self.parse_function(name);
            }
            TokenKind::Ident(name) => Operand::Token(name),
            _ => return Err(self.unexpected("value")),
        };
        self.advance();
        Ok(operand)
    }

    fn parse_function(&mut self, name: String) -> ParseResult<Operand> {
        let name_token = self.advance();
        let Some(function) = Function::lookup(&name) else {
            return Err(ParseError::new(ParseErrorKind::UnknownFunction(name), name_token.span));
        };
        self.expect(&TokenKind::LParen)?;
        if !self.check(&TokenKind::RParen) {
            return Err(ParseError::new(
                ParseErrorKind::FunctionArguments {
                    function,
                    found: self.peek().kind.describe(),
                },
                self.peek().span,
            ));
        }
        self.advance();
        Ok(Operand::Function(function))
    }
}

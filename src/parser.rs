use crate::ast::{BinaryOp, Expr};
use crate::error::{L10nError, L10nResult};

/// Deepest nesting of parentheses, `!` and `?:` the parser accepts.
pub const MAX_DEPTH: usize = 64;

/// Most operator nodes one expression may hold. Real gettext rules use a few dozen.
pub const MAX_NODES: usize = 256;

/// The two fields of a gettext `Plural-Forms` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralForms {
    pub nplurals: usize,
    pub plural: Expr,
}

/// A parser for gettext `Plural-Forms` headers and plural expressions.
///
/// The expression language is the C subset gettext accepts: the variable `n`,
/// unsigned integer literals, parentheses, `!`, the arithmetic, relational,
/// equality and logical operators, and the ternary `?:`, with C precedence.
///
/// Nesting and expression size are bounded by [`MAX_DEPTH`] and [`MAX_NODES`],
/// so a hostile header yields a parse error instead of exhausting the stack.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
    depth: usize,
    nodes: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            input,
            position: 0,
            depth: 0,
            nodes: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Consumes the current character and advances the position.
    /// Returns the character that was consumed, or None if at the end of input.
    fn consume(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.consume();
        }
    }

    fn error<T>(&self, message: impl Into<String>) -> L10nResult<T> {
        Err(L10nError::PluralParse {
            offset: self.position,
            message: message.into(),
        })
    }

    /// Consumes `token` after optional whitespace if it is next in the input.
    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.input[self.position..].starts_with(token) {
            self.position += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> L10nResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            self.error(format!("expected '{}'", token))
        }
    }

    fn enter(&mut self) -> L10nResult<()> {
        if self.depth >= MAX_DEPTH {
            return self.error("expression nested too deeply");
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Counts one operator node of the tree being built.
    fn add_node(&mut self) -> L10nResult<()> {
        self.nodes += 1;
        if self.nodes > MAX_NODES {
            return self.error("expression has too many operators");
        }
        Ok(())
    }

    fn parse_identifier(&mut self) -> &'a str {
        let input = self.input;
        self.skip_whitespace();
        let start = self.position;
        while let Some(c) = self.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            self.consume();
        }
        &input[start..self.position]
    }

    fn parse_number(&mut self) -> L10nResult<u64> {
        self.skip_whitespace();
        let start = self.position;
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            self.consume();
        }
        let digits = &self.input[start..self.position];
        if digits.is_empty() {
            self.position = start;
            return self.error("expected a number");
        }
        digits.parse::<u64>().map_err(|e| L10nError::PluralParse {
            offset: start,
            message: format!("invalid number '{}': {}", digits, e),
        })
    }

    /// Parses a full header such as
    /// `nplurals=3; plural=n == 1 ? 0 : n != 0 && n % 1000000 == 0 ? 1 : 2;`.
    ///
    /// Fields may come in either order and the final semicolon is optional.
    pub fn parse_header(&mut self) -> L10nResult<PluralForms> {
        let mut nplurals: Option<usize> = None;
        let mut plural: Option<Expr> = None;

        loop {
            self.skip_whitespace();
            if self.peek().is_none() {
                break;
            }
            let field_start = self.position;
            let name = self.parse_identifier();
            match name {
                "nplurals" => {
                    if nplurals.is_some() {
                        self.position = field_start;
                        return self.error("duplicate 'nplurals' field");
                    }
                    self.expect("=")?;
                    let start = self.position;
                    let value = self.parse_number()?;
                    let value = usize::try_from(value).map_err(|_| L10nError::PluralParse {
                        offset: start,
                        message: format!("nplurals value {} is out of range", value),
                    })?;
                    nplurals = Some(value);
                }
                "plural" => {
                    if plural.is_some() {
                        self.position = field_start;
                        return self.error("duplicate 'plural' field");
                    }
                    self.expect("=")?;
                    plural = Some(self.parse_expression()?);
                }
                "" => return self.error("expected 'nplurals' or 'plural'"),
                other => {
                    self.position = field_start;
                    return self.error(format!("unknown field '{}'", other));
                }
            }
            self.skip_whitespace();
            if self.peek().is_none() {
                break;
            }
            self.expect(";")?;
        }

        match (nplurals, plural) {
            (Some(nplurals), Some(plural)) => Ok(PluralForms { nplurals, plural }),
            (None, _) => self.error("missing 'nplurals' field"),
            (_, None) => self.error("missing 'plural' field"),
        }
    }

    /// Parses a bare expression and requires the whole input to be consumed.
    pub fn parse(&mut self) -> L10nResult<Expr> {
        let expr = self.parse_expression()?;
        self.skip_whitespace();
        if self.peek().is_some() {
            return self.error("unexpected trailing input");
        }
        Ok(expr)
    }

    fn parse_expression(&mut self) -> L10nResult<Expr> {
        self.enter()?;
        let expr = self.parse_ternary();
        self.leave();
        expr
    }

    /// `?:` is right-associative: `a ? b : c ? d : e` is `a ? b : (c ? d : e)`.
    fn parse_ternary(&mut self) -> L10nResult<Expr> {
        let cond = self.parse_or()?;
        if !self.eat("?") {
            return Ok(cond);
        }
        self.add_node()?;
        let then = self.parse_expression()?;
        self.expect(":")?;
        let otherwise = self.parse_expression()?;
        Ok(Expr::ternary(cond, then, otherwise))
    }

    fn parse_or(&mut self) -> L10nResult<Expr> {
        let mut lhs = self.parse_and()?;
        while self.eat("||") {
            self.add_node()?;
            let rhs = self.parse_and()?;
            lhs = Expr::binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> L10nResult<Expr> {
        let mut lhs = self.parse_equality()?;
        while self.eat("&&") {
            self.add_node()?;
            let rhs = self.parse_equality()?;
            lhs = Expr::binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> L10nResult<Expr> {
        let mut lhs = self.parse_relational()?;
        loop {
            let op = if self.eat("==") {
                BinaryOp::Eq
            } else if self.eat("!=") {
                BinaryOp::Ne
            } else {
                break;
            };
            self.add_node()?;
            let rhs = self.parse_relational()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_relational(&mut self) -> L10nResult<Expr> {
        let mut lhs = self.parse_additive()?;
        loop {
            // two-character operators first
            let op = if self.eat("<=") {
                BinaryOp::Le
            } else if self.eat(">=") {
                BinaryOp::Ge
            } else if self.eat("<") {
                BinaryOp::Lt
            } else if self.eat(">") {
                BinaryOp::Gt
            } else {
                break;
            };
            self.add_node()?;
            let rhs = self.parse_additive()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> L10nResult<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = if self.eat("+") {
                BinaryOp::Add
            } else if self.eat("-") {
                BinaryOp::Sub
            } else {
                break;
            };
            self.add_node()?;
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> L10nResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = if self.eat("*") {
                BinaryOp::Mul
            } else if self.eat("/") {
                BinaryOp::Div
            } else if self.eat("%") {
                BinaryOp::Rem
            } else {
                break;
            };
            self.add_node()?;
            let rhs = self.parse_unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> L10nResult<Expr> {
        self.skip_whitespace();
        // `!=` belongs to the equality level, never reaches here as a prefix
        if self.peek() == Some('!') && !self.input[self.position..].starts_with("!=") {
            self.consume();
            self.add_node()?;
            self.enter()?;
            let inner = self.parse_unary();
            self.leave();
            return Ok(Expr::Not(Box::new(inner?)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> L10nResult<Expr> {
        self.skip_whitespace();
        match self.peek() {
            Some('n') => {
                let start = self.position;
                let name = self.parse_identifier();
                if name != "n" {
                    self.position = start;
                    return self.error(format!("unknown variable '{}'", name));
                }
                Ok(Expr::N)
            }
            Some(c) if c.is_ascii_digit() => Ok(Expr::Literal(self.parse_number()?)),
            Some('(') => {
                self.consume();
                let inner = self.parse_expression()?;
                self.expect(")")?;
                Ok(inner)
            }
            Some(c) => self.error(format!("unexpected character '{}'", c)),
            None => self.error("unexpected end of expression"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ES_PR_FORMS: &str = "nplurals=3; plural=n == 1 ? 0 : n != 0 && n % 1000000 == 0 ? 1 : 2;";

    #[test]
    fn test_parse_header() {
        let forms = Parser::new(ES_PR_FORMS).parse_header().unwrap();
        assert_eq!(forms.nplurals, 3);
        assert_eq!(
            forms.plural.to_string(),
            "((n == 1) ? 0 : (((n != 0) && ((n % 1000000) == 0)) ? 1 : 2))"
        );
    }

    #[test]
    fn test_parse_header_field_order_and_spacing() {
        let forms = Parser::new("  plural = (n != 1) ;nplurals = 2")
            .parse_header()
            .unwrap();
        assert_eq!(forms.nplurals, 2);
        assert_eq!(
            forms.plural,
            Expr::binary(BinaryOp::Ne, Expr::N, Expr::Literal(1))
        );
    }

    #[test]
    fn test_parse_header_missing_field() {
        let err = Parser::new("nplurals=2;").parse_header().unwrap_err();
        assert!(matches!(err, L10nError::PluralParse { .. }));
        assert!(err.to_string().contains("missing 'plural'"));
    }

    #[test]
    fn test_parse_header_unknown_field() {
        let err = Parser::new("nplurals=2; plurals=n != 1;")
            .parse_header()
            .unwrap_err();
        assert_eq!(
            err,
            L10nError::PluralParse {
                offset: 12,
                message: "unknown field 'plurals'".to_string()
            }
        );
    }

    #[test]
    fn test_precedence() {
        let expr = Parser::new("n + 2 * 3 == 7 || n < 1").parse().unwrap();
        assert_eq!(expr.to_string(), "(((n + (2 * 3)) == 7) || (n < 1))");
    }

    #[test]
    fn test_left_associative_arithmetic() {
        let expr = Parser::new("n - 1 - 1").parse().unwrap();
        assert_eq!(expr.to_string(), "((n - 1) - 1)");
    }

    #[test]
    fn test_right_associative_ternary() {
        let expr = Parser::new("n==0 ? 0 : n==1 ? 1 : 2").parse().unwrap();
        assert_eq!(expr.to_string(), "((n == 0) ? 0 : ((n == 1) ? 1 : 2))");
    }

    #[test]
    fn test_not_versus_not_equal() {
        let expr = Parser::new("!(n != 1)").parse().unwrap();
        assert_eq!(expr.to_string(), "!(n != 1)");
    }

    #[test]
    fn test_deep_parentheses_rejected() {
        let input = format!("{}n{}", "(".repeat(10_000), ")".repeat(10_000));
        let err = Parser::new(&input).parse().unwrap_err();
        assert_eq!(
            err,
            L10nError::PluralParse {
                offset: MAX_DEPTH - 1,
                message: "expression nested too deeply".to_string()
            }
        );
    }

    #[test]
    fn test_long_not_chain_rejected() {
        let input = format!("{}n", "!".repeat(10_000));
        let err = Parser::new(&input).parse().unwrap_err();
        assert!(matches!(err, L10nError::PluralParse { .. }));
    }

    #[test]
    fn test_nested_ternaries_rejected() {
        let input = format!("{}0", "n ? 1 : ".repeat(10_000));
        let err = Parser::new(&input).parse().unwrap_err();
        assert!(err.to_string().contains("nested too deeply"));
    }

    #[test]
    fn test_long_operator_chain_rejected() {
        let input = format!("n{}", " + n".repeat(10_000));
        let err = Parser::new(&input).parse().unwrap_err();
        assert!(err.to_string().contains("too many operators"));
    }

    #[test]
    fn test_nesting_within_limit() {
        let depth = MAX_DEPTH - 1;
        let input = format!("{}n{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(Parser::new(&input).parse().unwrap(), Expr::N);
    }

    #[test]
    fn test_nplurals_out_of_range() {
        let err = Parser::new("nplurals=99999999999999999999; plural=0;")
            .parse_header()
            .unwrap_err();
        assert!(matches!(err, L10nError::PluralParse { offset: 9, .. }));
    }

    #[test]
    fn test_error_offsets() {
        let err = Parser::new("n == 1 ? 0").parse().unwrap_err();
        assert_eq!(
            err,
            L10nError::PluralParse {
                offset: 10,
                message: "expected ':'".to_string()
            }
        );

        let err = Parser::new("n = 1").parse().unwrap_err();
        assert!(matches!(err, L10nError::PluralParse { offset: 2, .. }));

        let err = Parser::new("x > 1").parse().unwrap_err();
        assert!(matches!(err, L10nError::PluralParse { offset: 0, .. }));

        let err = Parser::new("(n > 1").parse().unwrap_err();
        assert!(err.to_string().contains("expected ')'"));
    }
}

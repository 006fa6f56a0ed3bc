use crate::error::{L10nError, L10nResult};

/// Binary operators of the gettext plural expression language, C semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// The quantity `n`
    N,
    Literal(u64),
    Not(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// `cond ? then : otherwise`
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn ternary(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::Ternary(Box::new(cond), Box::new(then), Box::new(otherwise))
    }

    /// Evaluates the expression for `n`.
    ///
    /// Arithmetic wraps like the unsigned long of the C grammar; division or
    /// remainder by zero is an error. `&&`, `||` and `?:` short-circuit, so the
    /// branches are tried in the order they are written.
    pub fn evaluate(&self, n: u64) -> L10nResult<u64> {
        match self {
            Expr::N => Ok(n),
            Expr::Literal(value) => Ok(*value),
            Expr::Not(inner) => Ok(truth(inner.evaluate(n)? == 0)),
            Expr::Ternary(cond, then, otherwise) => {
                if cond.evaluate(n)? != 0 {
                    then.evaluate(n)
                } else {
                    otherwise.evaluate(n)
                }
            }
            Expr::Binary(BinaryOp::And, lhs, rhs) => {
                if lhs.evaluate(n)? == 0 {
                    return Ok(0);
                }
                Ok(truth(rhs.evaluate(n)? != 0))
            }
            Expr::Binary(BinaryOp::Or, lhs, rhs) => {
                if lhs.evaluate(n)? != 0 {
                    return Ok(1);
                }
                Ok(truth(rhs.evaluate(n)? != 0))
            }
            Expr::Binary(op, lhs, rhs) => {
                let left = lhs.evaluate(n)?;
                let right = rhs.evaluate(n)?;
                match op {
                    BinaryOp::Mul => Ok(left.wrapping_mul(right)),
                    BinaryOp::Div => left.checked_div(right).ok_or_else(|| {
                        L10nError::PluralEval(format!("division by zero in '{}'", self))
                    }),
                    BinaryOp::Rem => left.checked_rem(right).ok_or_else(|| {
                        L10nError::PluralEval(format!("modulo by zero in '{}'", self))
                    }),
                    BinaryOp::Add => Ok(left.wrapping_add(right)),
                    BinaryOp::Sub => Ok(left.wrapping_sub(right)),
                    BinaryOp::Lt => Ok(truth(left < right)),
                    BinaryOp::Le => Ok(truth(left <= right)),
                    BinaryOp::Gt => Ok(truth(left > right)),
                    BinaryOp::Ge => Ok(truth(left >= right)),
                    BinaryOp::Eq => Ok(truth(left == right)),
                    BinaryOp::Ne => Ok(truth(left != right)),
                    // short-circuit arms above
                    BinaryOp::And | BinaryOp::Or => unreachable!(),
                }
            }
        }
    }
}

fn truth(value: bool) -> u64 {
    if value { 1 } else { 0 }
}

/// Fully parenthesised rendering, so the parsed structure is visible.
impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::N => write!(f, "n"),
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Not(inner) => write!(f, "!{}", inner),
            Expr::Binary(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            Expr::Ternary(cond, then, otherwise) => {
                write!(f, "({} ? {} : {})", cond, then, otherwise)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_arithmetic() {
        // n % 10 + 1
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::binary(BinaryOp::Rem, Expr::N, Expr::Literal(10)),
            Expr::Literal(1),
        );
        assert_eq!(expr.evaluate(27).unwrap(), 8);
        assert_eq!(expr.to_string(), "((n % 10) + 1)");
    }

    #[test]
    fn test_evaluate_division_by_zero() {
        let expr = Expr::binary(BinaryOp::Div, Expr::N, Expr::Literal(0));
        assert!(matches!(expr.evaluate(5), Err(L10nError::PluralEval(_))));
    }

    #[test]
    fn test_and_short_circuits() {
        // n != 0 && 100 % n == 0 must not divide by zero for n = 0
        let expr = Expr::binary(
            BinaryOp::And,
            Expr::binary(BinaryOp::Ne, Expr::N, Expr::Literal(0)),
            Expr::binary(
                BinaryOp::Eq,
                Expr::binary(BinaryOp::Rem, Expr::Literal(100), Expr::N),
                Expr::Literal(0),
            ),
        );
        assert_eq!(expr.evaluate(0).unwrap(), 0);
        assert_eq!(expr.evaluate(20).unwrap(), 1);
        assert_eq!(expr.evaluate(30).unwrap(), 0);
    }

    #[test]
    fn test_not_and_ternary() {
        let expr = Expr::ternary(
            Expr::Not(Box::new(Expr::N)),
            Expr::Literal(7),
            Expr::Literal(9),
        );
        assert_eq!(expr.evaluate(0).unwrap(), 7);
        assert_eq!(expr.evaluate(3).unwrap(), 9);
        assert_eq!(expr.to_string(), "(!n ? 7 : 9)");
    }
}

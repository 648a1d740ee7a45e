use analyzer_core::Position;
use std::fmt;

/// Syntax tree for dealer predicates.
///
/// Only built, never parsed: `Display` writes it out in the dealer language
/// with the minimum parentheses needed to keep its structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Binary operation: left op right
    BinaryOp {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary operation: op expr
    UnaryOp { op: UnaryOp, expr: Box<Expr> },

    /// Function call: func(args...)
    FunctionCall { func: Function, args: Vec<Expr> },

    /// Integer literal
    Literal(i32),

    /// Position identifier (north, south, east, west)
    Position(Position),

    /// Shape pattern for matching hand distributions
    ShapePattern(ShapePattern),

    /// Variable reference (e.g. semibalanced_north)
    Variable(String),
}

/// Shape pattern for hand distribution matching
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePattern {
    /// List of shape specifications combined with + and -
    pub specs: Vec<ShapeSpec>,
}

/// A single shape specification (possibly with operators)
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpec {
    /// Whether this is included (+) or excluded (-)
    pub include: bool,
    /// The actual shape
    pub shape: Shape,
}

/// A shape distribution pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Wildcard shape: "54xx" means 5 spades, 4 hearts, any minors
    Wildcard([Option<u8>; 4]),
    /// Any suit order: "any 4333"
    AnyDistribution([u8; 4]),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Eq,
    Le,
    Ge,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
}

/// Built-in hand functions used by the compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// High Card Points (A=4, K=3, Q=2, J=1)
    Hcp,
    Spades,
    Hearts,
    Diamonds,
    Clubs,
    Shape,
}

impl Function {
    pub fn name(&self) -> &'static str {
        match self {
            Function::Hcp => "hcp",
            Function::Spades => "spades",
            Function::Hearts => "hearts",
            Function::Diamonds => "diamonds",
            Function::Clubs => "clubs",
            Function::Shape => "shape",
        }
    }

    /// Length function for a suit
    pub fn length_of(suit: analyzer_core::Suit) -> Self {
        match suit {
            analyzer_core::Suit::Spades => Function::Spades,
            analyzer_core::Suit::Hearts => Function::Hearts,
            analyzer_core::Suit::Diamonds => Function::Diamonds,
            analyzer_core::Suit::Clubs => Function::Clubs,
        }
    }
}

impl BinaryOp {
    fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
        }
    }

    /// Binding strength; higher binds tighter
    fn precedence(&self) -> u8 {
        match self {
            BinaryOp::And => 1,
            _ => 2,
        }
    }
}

impl Expr {
    /// Helper to create a binary operation
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Helper to create a unary operation
    pub fn unary(op: UnaryOp, expr: Expr) -> Self {
        Expr::UnaryOp {
            op,
            expr: Box::new(expr),
        }
    }

    /// Helper to create a function call with a single argument
    pub fn call(func: Function, arg: Expr) -> Self {
        Expr::FunctionCall {
            func,
            args: vec![arg],
        }
    }

    /// Helper to create a function call with multiple arguments
    pub fn call_multi(func: Function, args: Vec<Expr>) -> Self {
        Expr::FunctionCall { func, args }
    }

    /// Left-nested conjunction of all clauses; `None` when there are none
    pub fn all(clauses: impl IntoIterator<Item = Expr>) -> Option<Expr> {
        clauses
            .into_iter()
            .reduce(|acc, clause| Expr::binary(BinaryOp::And, acc, clause))
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::BinaryOp { op, .. } => op.precedence(),
            Expr::UnaryOp { .. } => 3,
            _ => 4,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min_precedence: u8) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::BinaryOp { op, left, right } => {
                let p = op.precedence();
                left.fmt_operand(f, p)?;
                write!(f, " {} ", op.symbol())?;
                // comparisons do not chain, so a nested right comparison needs parens
                right.fmt_operand(f, p + 1)
            }
            Expr::UnaryOp { op: UnaryOp::Not, expr } => {
                write!(f, "not ")?;
                expr.fmt_operand(f, 3)
            }
            Expr::FunctionCall { func, args } => {
                write!(f, "{}(", func.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Position(position) => write!(f, "{}", position.name()),
            Expr::ShapePattern(pattern) => write!(f, "{}", pattern),
            Expr::Variable(name) => write!(f, "{}", name),
        }
    }
}

impl fmt::Display for ShapePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, spec) in self.specs.iter().enumerate() {
            match (i, spec.include) {
                (0, true) => {}
                (0, false) => write!(f, "- ")?,
                (_, true) => write!(f, " + ")?,
                (_, false) => write!(f, " - ")?,
            }
            write!(f, "{}", spec.shape)?;
        }
        Ok(())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Wildcard(lengths) => {
                for len in lengths {
                    match len {
                        Some(len) => write!(f, "{}", len_char(*len))?,
                        None => write!(f, "x")?,
                    }
                }
                Ok(())
            }
            Shape::AnyDistribution(lengths) => {
                write!(f, "any ")?;
                for len in lengths {
                    write!(f, "{}", len_char(*len))?;
                }
                Ok(())
            }
        }
    }
}

/// Dealer writes suit lengths of 10+ as a single character (T, J, Q, K)
fn len_char(len: u8) -> char {
    match len {
        0..=9 => (b'0' + len) as char,
        10 => 'T',
        11 => 'J',
        12 => 'Q',
        _ => 'K',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_comparison() {
        let ast = Expr::binary(
            BinaryOp::Ge,
            Expr::call(Function::Hcp, Expr::Position(Position::North)),
            Expr::Literal(15),
        );
        assert_eq!(ast.to_string(), "hcp(north) >= 15");
    }

    #[test]
    fn test_render_conjunction() {
        let ast = Expr::all([
            Expr::binary(
                BinaryOp::Eq,
                Expr::call(Function::Spades, Expr::Position(Position::East)),
                Expr::Literal(5),
            ),
            Expr::binary(
                BinaryOp::Le,
                Expr::call(Function::Hcp, Expr::Position(Position::East)),
                Expr::Literal(10),
            ),
        ])
        .unwrap();
        assert_eq!(ast.to_string(), "spades(east) == 5 && hcp(east) <= 10");
    }

    #[test]
    fn test_right_nested_conjunction_is_parenthesized() {
        let ast = Expr::binary(
            BinaryOp::And,
            Expr::Variable("a".into()),
            Expr::binary(BinaryOp::And, Expr::Variable("b".into()), Expr::Variable("c".into())),
        );
        assert_eq!(ast.to_string(), "a && (b && c)");
    }

    #[test]
    fn test_render_shape_pattern() {
        let pattern = ShapePattern {
            specs: vec![
                ShapeSpec {
                    include: true,
                    shape: Shape::AnyDistribution([4, 3, 3, 3]),
                },
                ShapeSpec {
                    include: true,
                    shape: Shape::AnyDistribution([4, 4, 3, 2]),
                },
                ShapeSpec {
                    include: false,
                    shape: Shape::Wildcard([Some(5), None, None, None]),
                },
                ShapeSpec {
                    include: true,
                    shape: Shape::Wildcard([Some(10), Some(1), None, Some(1)]),
                },
            ],
        };
        let call = Expr::call_multi(
            Function::Shape,
            vec![Expr::Position(Position::West), Expr::ShapePattern(pattern)],
        );
        assert_eq!(
            call.to_string(),
            "shape(west, any 4333 + any 4432 - 5xxx + T1x1)"
        );
    }

    #[test]
    fn test_render_not() {
        let ast = Expr::unary(UnaryOp::Not, Expr::Variable("balanced_north".into()));
        assert_eq!(ast.to_string(), "not balanced_north");
    }
}

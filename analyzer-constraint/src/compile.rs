use crate::ast::{BinaryOp, Expr, Function, Shape, ShapePattern, ShapeSpec, UnaryOp};
use crate::constraint::{InvalidRangeError, SeatConstraint, ShapePreset, MAX_SUIT_LENGTH};
use analyzer_core::{Position, Suit};
use std::collections::BTreeMap;
use std::fmt;

const BALANCED: [[u8; 4]; 3] = [[4, 3, 3, 3], [4, 4, 3, 2], [5, 3, 3, 2]];
const SEMI_BALANCED_EXTRA: [[u8; 4]; 2] = [[5, 4, 2, 2], [6, 3, 2, 2]];

/// A named sub-expression declared ahead of the condition
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: String,
    pub expr: Expr,
}

/// A predicate ready to hand to the deal generator.
///
/// `Display` writes one `name = expr` line per definition followed by the
/// `condition` line, which is exactly the block a dealer script expects.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPredicate {
    pub definitions: Vec<Definition>,
    pub condition: Expr,
}

impl CompiledPredicate {
    /// Predicate accepting every deal
    pub fn always() -> Self {
        CompiledPredicate {
            definitions: Vec::new(),
            condition: Expr::Literal(1),
        }
    }

    /// The condition expression as dealer text
    pub fn condition_text(&self) -> String {
        self.condition.to_string()
    }
}

impl fmt::Display for CompiledPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for def in &self.definitions {
            writeln!(f, "{} = {}", def.name, def.expr)?;
        }
        write!(f, "condition {}", self.condition)
    }
}

/// Compile per-seat constraints into a single dealer predicate.
///
/// Seats are visited N, E, S, W. Within a seat the clauses are suit lengths
/// (S, H, D, C), then the HCP pair, then the shape preset. A suit with
/// `min == max` yields one `==` clause; otherwise `>=` is written only when
/// `min > 0` and `<=` only when `max < 13`. The HCP bounds are always written.
pub fn compile(
    constraints: &BTreeMap<Position, SeatConstraint>,
) -> Result<CompiledPredicate, InvalidRangeError> {
    let mut definitions = Vec::new();
    let mut clauses = Vec::new();

    for (&seat, constraint) in constraints {
        constraint.validate(seat)?;
        let hand = || Expr::Position(seat);

        for suit in Suit::PBN_ORDER {
            let range = constraint.suit(suit);
            let length = || Expr::call(Function::length_of(suit), hand());
            if range.is_exact() {
                clauses.push(Expr::binary(BinaryOp::Eq, length(), Expr::Literal(range.min)));
                continue;
            }
            if range.min > 0 {
                clauses.push(Expr::binary(BinaryOp::Ge, length(), Expr::Literal(range.min)));
            }
            if range.max < MAX_SUIT_LENGTH {
                clauses.push(Expr::binary(BinaryOp::Le, length(), Expr::Literal(range.max)));
            }
        }

        let hcp = || Expr::call(Function::Hcp, hand());
        clauses.push(Expr::binary(BinaryOp::Ge, hcp(), Expr::Literal(constraint.hcp.min)));
        clauses.push(Expr::binary(BinaryOp::Le, hcp(), Expr::Literal(constraint.hcp.max)));

        if let Some(preset) = constraint.shape {
            clauses.push(preset_clause(seat, preset, &mut definitions));
        }
    }

    Ok(CompiledPredicate {
        definitions,
        condition: Expr::all(clauses).unwrap_or(Expr::Literal(1)),
    })
}

fn preset_clause(seat: Position, preset: ShapePreset, definitions: &mut Vec<Definition>) -> Expr {
    match preset {
        ShapePreset::Balanced => shape_call(seat, any_of(&BALANCED)),
        ShapePreset::Unbalanced => {
            Expr::unary(UnaryOp::Not, shape_call(seat, any_of(&BALANCED)))
        }
        ShapePreset::SemiBalanced => {
            let mut specs = any_of(&BALANCED);
            specs.extend(any_of(&SEMI_BALANCED_EXTRA));
            define(definitions, format!("semibalanced_{}", seat.name()), shape_call(seat, specs))
        }
        ShapePreset::BalancedWithoutMajor => {
            let mut specs = any_of(&BALANCED);
            for major in [Suit::Spades, Suit::Hearts] {
                specs.push(ShapeSpec {
                    include: false,
                    shape: Shape::Wildcard(five_in(major)),
                });
            }
            define(
                definitions,
                format!("balanced_no_major_{}", seat.name()),
                shape_call(seat, specs),
            )
        }
    }
}

fn define(definitions: &mut Vec<Definition>, name: String, expr: Expr) -> Expr {
    definitions.push(Definition {
        name: name.clone(),
        expr,
    });
    Expr::Variable(name)
}

fn any_of(patterns: &[[u8; 4]]) -> Vec<ShapeSpec> {
    patterns
        .iter()
        .map(|&lengths| ShapeSpec {
            include: true,
            shape: Shape::AnyDistribution(lengths),
        })
        .collect()
}

/// `5xxx` or `x5xx` style wildcard for a five-card suit
fn five_in(suit: Suit) -> [Option<u8>; 4] {
    let mut lengths = [None; 4];
    if let Some(slot) = Suit::PBN_ORDER.iter().position(|&s| s == suit) {
        lengths[slot] = Some(5);
    }
    lengths
}

fn shape_call(seat: Position, specs: Vec<ShapeSpec>) -> Expr {
    Expr::call_multi(
        Function::Shape,
        vec![
            Expr::Position(seat),
            Expr::ShapePattern(ShapePattern { specs }),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Range;

    fn single(seat: Position, constraint: SeatConstraint) -> BTreeMap<Position, SeatConstraint> {
        BTreeMap::from([(seat, constraint)])
    }

    #[test]
    fn test_exact_spades_only() {
        let constraint = SeatConstraint {
            spades: Range::exactly(5),
            ..SeatConstraint::default()
        };
        let predicate = compile(&single(Position::East, constraint)).unwrap();
        let text = predicate.condition_text();

        assert!(text.contains("spades(east) == 5"));
        assert!(!text.contains("hearts("));
        assert!(!text.contains("diamonds("));
        assert!(!text.contains("clubs("));
        assert_eq!(
            text,
            "spades(east) == 5 && hcp(east) >= 0 && hcp(east) <= 40"
        );
    }

    #[test]
    fn test_bounds_written_only_when_restrictive() {
        let constraint = SeatConstraint {
            hearts: Range::new(4, 13),
            diamonds: Range::new(0, 2),
            clubs: Range::new(3, 6),
            hcp: Range::new(11, 15),
            ..SeatConstraint::default()
        };
        let predicate = compile(&single(Position::West, constraint)).unwrap();
        assert_eq!(
            predicate.condition_text(),
            "hearts(west) >= 4 && diamonds(west) <= 2 && clubs(west) >= 3 && \
             clubs(west) <= 6 && hcp(west) >= 11 && hcp(west) <= 15"
        );
    }

    #[test]
    fn test_seat_order_is_fixed() {
        let mut constraints = BTreeMap::new();
        constraints.insert(Position::West, SeatConstraint::default());
        constraints.insert(Position::East, SeatConstraint::default());

        let text = compile(&constraints).unwrap().condition_text();
        let east = text.find("hcp(east)").unwrap();
        let west = text.find("hcp(west)").unwrap();
        assert!(east < west);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let mut constraints = BTreeMap::new();
        constraints.insert(
            Position::East,
            SeatConstraint {
                spades: Range::new(2, 4),
                shape: Some(ShapePreset::SemiBalanced),
                ..SeatConstraint::default()
            },
        );
        constraints.insert(
            Position::West,
            SeatConstraint {
                hcp: Range::new(6, 9),
                shape: Some(ShapePreset::Unbalanced),
                ..SeatConstraint::default()
            },
        );

        let first = compile(&constraints).unwrap().to_string();
        for _ in 0..10 {
            assert_eq!(compile(&constraints).unwrap().to_string(), first);
        }
    }

    #[test]
    fn test_no_constraints_accepts_everything() {
        let predicate = compile(&BTreeMap::new()).unwrap();
        assert_eq!(predicate, CompiledPredicate::always());
        assert_eq!(predicate.to_string(), "condition 1");
    }

    #[test]
    fn test_balanced_and_unbalanced() {
        let balanced = SeatConstraint {
            shape: Some(ShapePreset::Balanced),
            ..SeatConstraint::default()
        };
        let text = compile(&single(Position::North, balanced)).unwrap().condition_text();
        assert!(text.ends_with("&& shape(north, any 4333 + any 4432 + any 5332)"));

        let unbalanced = SeatConstraint {
            shape: Some(ShapePreset::Unbalanced),
            ..SeatConstraint::default()
        };
        let text = compile(&single(Position::North, unbalanced)).unwrap().condition_text();
        assert!(text.ends_with("&& not shape(north, any 4333 + any 4432 + any 5332)"));
    }

    #[test]
    fn test_named_presets_emit_definitions() {
        let mut constraints = BTreeMap::new();
        constraints.insert(
            Position::East,
            SeatConstraint {
                shape: Some(ShapePreset::SemiBalanced),
                ..SeatConstraint::default()
            },
        );
        constraints.insert(
            Position::South,
            SeatConstraint {
                shape: Some(ShapePreset::BalancedWithoutMajor),
                ..SeatConstraint::default()
            },
        );

        let predicate = compile(&constraints).unwrap();
        assert_eq!(
            predicate.to_string(),
            "semibalanced_east = shape(east, any 4333 + any 4432 + any 5332 + any 5422 + any 6322)\n\
             balanced_no_major_south = shape(south, any 4333 + any 4432 + any 5332 - 5xxx - x5xx)\n\
             condition hcp(east) >= 0 && hcp(east) <= 40 && semibalanced_east && \
             hcp(south) >= 0 && hcp(south) <= 40 && balanced_no_major_south"
        );
    }

    #[test]
    fn test_invalid_range_rejected() {
        let constraint = SeatConstraint {
            diamonds: Range::new(5, 3),
            ..SeatConstraint::default()
        };
        let err = compile(&single(Position::South, constraint)).unwrap_err();
        assert_eq!(err.seat, Position::South);
        assert_eq!(err.field, "diamonds");

        let constraint = SeatConstraint {
            hcp: Range::new(10, 41),
            ..SeatConstraint::default()
        };
        assert!(compile(&single(Position::South, constraint)).is_err());
    }
}

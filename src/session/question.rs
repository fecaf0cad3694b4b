use rand::Rng;
use rand::rngs::SmallRng;

use crate::session::attempt::{ALL_OPERATIONS, Operation};

/// Session-level operation choice: a concrete operation, or a new random one
/// per question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationChoice {
    Fixed(Operation),
    Mixed,
}

impl OperationChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationChoice::Fixed(op) => op.as_str(),
            OperationChoice::Mixed => "Mixed",
        }
    }

    pub fn pick(self, rng: &mut SmallRng) -> Operation {
        match self {
            OperationChoice::Fixed(op) => op,
            OperationChoice::Mixed => ALL_OPERATIONS[rng.gen_range(0..ALL_OPERATIONS.len())],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub operation: Operation,
    pub digits: u8,
    pub lhs: i64,
    pub rhs: i64,
    pub answer: i64,
}

impl Question {
    pub fn text(&self) -> String {
        format!("{} {} {}", self.lhs, self.operation.symbol(), self.rhs)
    }
}

/// Operand range for a digit tier. Tier 1 starts at 2 so ×1 and ÷1 never
/// show up as questions.
fn operand_range(digits: u8) -> (i64, i64) {
    match digits {
        0 | 1 => (2, 9),
        d => {
            let d = d.min(4) as u32;
            (10i64.pow(d - 1), 10i64.pow(d) - 1)
        }
    }
}

pub fn generate(operation: Operation, digits: u8, rng: &mut SmallRng) -> Question {
    let (lo, hi) = operand_range(digits);
    match operation {
        Operation::Addition => {
            let lhs = rng.gen_range(lo..=hi);
            let rhs = rng.gen_range(lo..=hi);
            Question {
                operation,
                digits,
                lhs,
                rhs,
                answer: lhs + rhs,
            }
        }
        Operation::Subtraction => {
            // Larger operand first so answers are never negative.
            let a = rng.gen_range(lo..=hi);
            let b = rng.gen_range(lo..=hi);
            let (lhs, rhs) = if a >= b { (a, b) } else { (b, a) };
            Question {
                operation,
                digits,
                lhs,
                rhs,
                answer: lhs - rhs,
            }
        }
        Operation::Multiplication => {
            // Second operand capped at two digits to keep mental-math scale.
            let (rlo, rhi) = operand_range(digits.min(2));
            let lhs = rng.gen_range(lo..=hi);
            let rhs = rng.gen_range(rlo..=rhi);
            Question {
                operation,
                digits,
                lhs,
                rhs,
                answer: lhs * rhs,
            }
        }
        Operation::Division => {
            // Build the dividend from divisor × quotient so the answer is exact.
            let (dlo, dhi) = operand_range(digits.min(2));
            let divisor = rng.gen_range(dlo..=dhi);
            let quotient = rng.gen_range(lo..=hi);
            Question {
                operation,
                digits,
                lhs: divisor * quotient,
                rhs: divisor,
                answer: quotient,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn test_addition_answer_consistent() {
        let mut rng = rng();
        for _ in 0..200 {
            let q = generate(Operation::Addition, 2, &mut rng);
            assert_eq!(q.answer, q.lhs + q.rhs);
            assert!((10..=99).contains(&q.lhs));
            assert!((10..=99).contains(&q.rhs));
        }
    }

    #[test]
    fn test_subtraction_never_negative() {
        let mut rng = rng();
        for _ in 0..200 {
            let q = generate(Operation::Subtraction, 3, &mut rng);
            assert!(q.answer >= 0);
            assert_eq!(q.answer, q.lhs - q.rhs);
        }
    }

    #[test]
    fn test_division_always_exact() {
        let mut rng = rng();
        for _ in 0..200 {
            let q = generate(Operation::Division, 2, &mut rng);
            assert_eq!(q.lhs % q.rhs, 0);
            assert_eq!(q.answer, q.lhs / q.rhs);
            assert!(q.rhs > 1, "divisor must be at least 2, got {}", q.rhs);
        }
    }

    #[test]
    fn test_single_digit_tier_avoids_trivial_operands() {
        let mut rng = rng();
        for _ in 0..200 {
            let q = generate(Operation::Multiplication, 1, &mut rng);
            assert!((2..=9).contains(&q.lhs));
            assert!((2..=9).contains(&q.rhs));
        }
    }

    #[test]
    fn test_mixed_choice_covers_all_operations() {
        let mut rng = rng();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(OperationChoice::Mixed.pick(&mut rng));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_question_text_uses_operation_symbol() {
        let q = Question {
            operation: Operation::Division,
            digits: 1,
            lhs: 8,
            rhs: 2,
            answer: 4,
        };
        assert_eq!(q.text(), "8 ÷ 2");
    }
}

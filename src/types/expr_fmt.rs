use super::expr::*;
use std::fmt;

// ==========================================
// Precedence
// ==========================================

#[derive(PartialEq, PartialOrd, Copy, Clone)]
enum Precedence {
    Sum = 10,     // +, -
    Product = 20, // *
    Dice = 30,    // d
    Call = 50,    // atoms, names, wrappers written as calls
}

impl Expr {
    fn precedence(&self) -> Precedence {
        match self {
            Expr::Binary(BinaryOp { op, .. }) => match op {
                BinOp::Add | BinOp::Sub => Precedence::Sum,
                BinOp::Mul => Precedence::Product,
                BinOp::Max | BinOp::Min => Precedence::Call,
            },
            Expr::RollOne { .. } | Expr::RollN { .. } => Precedence::Dice,
            // Multi-word names read badly glued to a `d`
            Expr::WeaponRef(_) | Expr::SpellRef(_) => Precedence::Sum,
            Expr::Token(Token::NamedDie(_)) => Precedence::Sum,
            Expr::Token(_)
            | Expr::Literal(_)
            | Expr::Critical(_)
            | Expr::Advantage(_)
            | Expr::Disadvantage(_)
            | Expr::Value(_) => Precedence::Call,
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, e: &Expr, min: Precedence) -> fmt::Result {
    if e.precedence() < min {
        write!(f, "({})", e)
    } else {
        write!(f, "{}", e)
    }
}

// ==========================================
// Display
// ==========================================

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(n) => write!(f, "{}", n),
            Token::NamedDie(name) => f.write_str(name),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Token(t) => write!(f, "{}", t),
            Expr::Literal(n) => write!(f, "{}", n),
            Expr::Binary(BinaryOp { lhs, op, rhs }) => {
                let symbol = match op {
                    BinOp::Add => "+",
                    BinOp::Sub => "-",
                    BinOp::Mul => "*",
                    BinOp::Max => return write!(f, "max({},{})", lhs, rhs),
                    BinOp::Min => return write!(f, "min({},{})", lhs, rhs),
                };
                let prec = self.precedence();
                write_operand(f, lhs, prec)?;
                f.write_str(symbol)?;
                // Right operands of equal precedence need parentheses: a-(b-c)
                if rhs.precedence() <= prec {
                    write!(f, "({})", rhs)
                } else {
                    write!(f, "{}", rhs)
                }
            }
            Expr::RollOne { sides } => {
                f.write_str("d")?;
                write_operand(f, sides, Precedence::Call)
            }
            Expr::RollN { count, sides } => {
                write_operand(f, count, Precedence::Call)?;
                f.write_str("d")?;
                write_operand(f, sides, Precedence::Call)
            }
            Expr::Critical(inner) => write!(f, "critical({})", inner),
            Expr::Advantage(inner) => write!(f, "advantage({})", inner),
            Expr::Disadvantage(inner) => write!(f, "disadvantage({})", inner),
            Expr::WeaponRef(name) => f.write_str(name),
            Expr::SpellRef(SpellRef { name, level }) => match level {
                Some(level) => write!(f, "{} at level {}", name, level),
                None => f.write_str(name),
            },
            Expr::Value(inner) => write!(f, "({})", inner),
        }
    }
}

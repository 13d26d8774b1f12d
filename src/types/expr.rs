// ==========================================
// AST data structures
// ==========================================

/// Leaves the parser hands over unresolved; the number pass turns them into literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Int(i64),
    NamedDie(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    // Only produced by advantage / disadvantage rewriting
    Max,
    Min,
}

impl BinOp {
    /// Saturates instead of overflowing.
    pub fn apply(self, lhs: i64, rhs: i64) -> i64 {
        match self {
            BinOp::Add => lhs.saturating_add(rhs),
            BinOp::Sub => lhs.saturating_sub(rhs),
            BinOp::Mul => lhs.saturating_mul(rhs),
            BinOp::Max => lhs.max(rhs),
            BinOp::Min => lhs.min(rhs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryOp {
    pub lhs: Box<Expr>,
    pub op: BinOp,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellRef {
    pub name: String,
    pub level: Option<Box<Expr>>,
}

// Expression definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Token(Token),
    Literal(i64),
    Binary(BinaryOp),
    RollOne { sides: Box<Expr> },
    RollN { count: Box<Expr>, sides: Box<Expr> },
    Critical(Box<Expr>),
    Advantage(Box<Expr>),
    Disadvantage(Box<Expr>),
    WeaponRef(String),
    SpellRef(SpellRef),
    Value(Box<Expr>),
}

impl Expr {
    pub fn int(value: i64) -> Self {
        Expr::Token(Token::Int(value))
    }

    pub fn named_die(name: impl Into<String>) -> Self {
        Expr::Token(Token::NamedDie(name.into()))
    }

    pub fn literal(value: i64) -> Self {
        Expr::Literal(value)
    }

    pub fn binary(lhs: Expr, op: BinOp, rhs: Expr) -> Self {
        Expr::Binary(BinaryOp {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        })
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Self {
        Expr::binary(lhs, BinOp::Add, rhs)
    }

    pub fn roll_one(sides: Expr) -> Self {
        Expr::RollOne {
            sides: Box::new(sides),
        }
    }

    pub fn roll_n(count: Expr, sides: Expr) -> Self {
        Expr::RollN {
            count: Box::new(count),
            sides: Box::new(sides),
        }
    }

    pub fn critical(inner: Expr) -> Self {
        Expr::Critical(Box::new(inner))
    }

    pub fn advantage(inner: Expr) -> Self {
        Expr::Advantage(Box::new(inner))
    }

    pub fn disadvantage(inner: Expr) -> Self {
        Expr::Disadvantage(Box::new(inner))
    }

    pub fn weapon(name: impl Into<String>) -> Self {
        Expr::WeaponRef(name.into())
    }

    pub fn spell(name: impl Into<String>, level: Option<Expr>) -> Self {
        Expr::SpellRef(SpellRef {
            name: name.into(),
            level: level.map(Box::new),
        })
    }

    pub fn value(inner: Expr) -> Self {
        Expr::Value(Box::new(inner))
    }

    /// Only single or repeated rolls can be taken with advantage.
    pub fn is_dice(&self) -> bool {
        matches!(self, Expr::RollOne { .. } | Expr::RollN { .. })
    }

    /// Number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        let children = match self {
            Expr::Token(_) | Expr::Literal(_) | Expr::WeaponRef(_) => 0,
            Expr::Binary(b) => b.lhs.node_count() + b.rhs.node_count(),
            Expr::RollOne { sides } => sides.node_count(),
            Expr::RollN { count, sides } => count.node_count() + sides.node_count(),
            Expr::Critical(inner)
            | Expr::Advantage(inner)
            | Expr::Disadvantage(inner)
            | Expr::Value(inner) => inner.node_count(),
            Expr::SpellRef(spell) => spell.level.as_ref().map_or(0, |level| level.node_count()),
        };
        1 + children
    }

    /// Moves the node out, leaving a zero literal behind.
    pub fn take(&mut self) -> Expr {
        std::mem::replace(self, Expr::Literal(0))
    }
}

//! The rewriting passes. A roll runs them in this order: number, dnd_knowledge,
//! simplify, critical, simplify again, evaluate.

pub mod critical;
pub mod dnd_knowledge;
pub mod evaluate;
pub mod number;
pub mod simplify;

pub use critical::rewrite_critical;
pub use dnd_knowledge::resolve_knowledge;
pub use evaluate::evaluate;
pub use number::normalize_numbers;
pub use simplify::simplify;

pub mod expr;
pub mod expr_fmt;
pub mod expr_rewriter;

//! Hard constraint encoder (§4.4) and soft constraint / objective builder
//! (§4.3), kept as sibling modules since both operate on the same
//! [`crate::variables::DecisionVariables`] and are dispatched together by
//! [`crate::solver`].

pub mod hard;
pub mod soft;

pub use hard::{encode_all, ConstraintFamily};
pub use soft::{build_objective, objective_expression};

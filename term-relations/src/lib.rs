//! `term-relations` provides relational combinators over term graphs,
//! built on the `logic-stream` goal engine.
//!
//! Every combinator is a relation: it returns a `Goal`, and works in
//! whichever direction its arguments allow.
//!
//!  - `applyo` relates a compound term to its operator and operands;
//!  - `mapo`, `map_anyo`, and `eq_length` relate sequences
//!    elementwise;
//!  - `reduceo` relates a term to what one or more applications of a
//!    relation reach from it;
//!  - `walko` relates two term graphs node by node.
//!
//! The combinators only fail; they never panic or return errors on
//! terms they cannot take apart.  Recursion always goes through
//! `logic_stream::defer`, so deep terms and unbounded searches run in
//! constant stack space, and callers bound unbounded searches by
//! taking finitely many results.
mod apply;
mod config;
mod map;
mod reduce;
mod walk;

#[cfg(test)]
mod proptest_tests;

pub use apply::applyo;
pub use apply::applyo_with;
pub use config::MapConfig;
pub use config::MapPolicy;
pub use config::Relation;
pub use config::WalkConfig;
pub use map::always;
pub use map::eq_length;
pub use map::map_anyo;
pub use map::mapo;
pub use reduce::reduceo;
pub use walk::walko;

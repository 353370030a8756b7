//! `logic-stream` is the search substrate for relational programs: a
//! small, miniKanren-style engine where goals map a substitution to
//! a lazy stream of extended substitutions.
//!
//! The pieces are minimal: terms (`Term`, `Var`), the
//! persistent substitution (`State`) with unification and
//! reification, streams with suspensions (`Stream`), the goal algebra
//! (`eq`, `and`, `or`, `defer`, ...), the primitive sequence
//! relations (`conso`, `nullo`), and the `Decompose` protocol that
//! defines which terms are compound.  Higher-level relations only
//! ever build goals out of these; they never look inside a goal or a
//! stream.
//!
//! Search is single-threaded and lazy.  Consumers pull states from a
//! `Stream` iterator and may stop at any point; nothing needs to be
//! cleaned up when a stream is dropped half-way.
mod decompose;
mod goal;
mod sequence;
mod state;
mod stream;
mod term;
mod var;

#[cfg(test)]
mod proptest_tests;

pub use decompose::Decompose;
pub use decompose::DecomposeError;
pub use decompose::ExprProtocol;
pub use decompose::SequenceProtocol;
pub use goal::and;
pub use goal::defer;
pub use goal::eq;
pub use goal::fail;
pub use goal::or;
pub use goal::or_ordered;
pub use goal::run;
pub use goal::run_all;
pub use goal::succeed;
pub use goal::Goal;
pub use sequence::conso;
pub use sequence::nullo;
pub use state::State;
pub use stream::Stream;
pub use stream::StreamIter;
pub use term::Ground;
pub use term::SeqKind;
pub use term::Term;
pub use var::Var;

//! The decomposition protocol splits compound terms into an operator
//! and an operand sequence, and builds compound terms back from such
//! pairs.
//!
//! Whether a term is compound is a property of the value, not of its
//! type: the same `Term::Cons` can be an expression under one
//! protocol and an opaque list under another.  Callers pick the
//! protocol; relations built on top of it treat every
//! `DecomposeError` as a plain failure to match.
use crate::SeqKind;
use crate::Term;
use thiserror::Error;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DecomposeError {
    #[error("{0} is not a compound term")]
    NotCompound(Term),

    #[error("expected {expected:?} terminator, found {found:?}")]
    WrongTerminator { expected: SeqKind, found: SeqKind },

    #[error("operands {0} are not a sequence")]
    ImproperOperands(Term),
}

/// A `Decompose` implementation defines which terms are compound,
/// and how to take them apart and put them back together.
///
/// For any term `t` that `operator` and `operands` accept,
/// `construct(&operator(t)?, &operands(t)?)` must return `t`.
pub trait Decompose {
    /// # Errors
    ///
    /// Returns `Err` when `term` is not compound under this protocol.
    fn operator(&self, term: &Term) -> Result<Term, DecomposeError>;

    /// # Errors
    ///
    /// Returns `Err` when `term` is not compound under this protocol.
    fn operands(&self, term: &Term) -> Result<Term, DecomposeError>;

    /// # Errors
    ///
    /// Returns `Err` when `operands` isn't a valid operand sequence.
    fn construct(&self, operator: &Term, operands: &Term) -> Result<Term, DecomposeError>;
}

/// Returns an error unless `seq`'s spine ends in a variable or in a
/// terminator accepted by `accept`.
fn check_spine(
    seq: &Term,
    accept: impl Fn(SeqKind) -> Result<(), DecomposeError>,
    not_a_sequence: impl FnOnce() -> DecomposeError,
) -> Result<(), DecomposeError> {
    match seq.spine().1 {
        Term::Var(_) => Ok(()),
        Term::Nil(kind) => accept(*kind),
        _ => Err(not_a_sequence()),
    }
}

fn expect_expr(kind: SeqKind) -> Result<(), DecomposeError> {
    if kind == SeqKind::Expr {
        Ok(())
    } else {
        Err(DecomposeError::WrongTerminator {
            expected: SeqKind::Expr,
            found: kind,
        })
    }
}

/// Only `Expr`-terminated chains are compound: `f(1, 2)` decomposes
/// into `f` and `e(1, 2)`, while `[f, 1, 2]` is opaque.  Chains whose
/// tail is still unbound are accepted, since they may yet become
/// expressions.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExprProtocol;

impl ExprProtocol {
    fn split<'a>(&self, term: &'a Term) -> Result<(&'a Term, &'a Term), DecomposeError> {
        match term {
            Term::Cons(head, tail, _) => {
                check_spine(term, expect_expr, || {
                    DecomposeError::NotCompound(term.clone())
                })?;
                Ok((&**head, &**tail))
            }
            _ => Err(DecomposeError::NotCompound(term.clone())),
        }
    }
}

impl Decompose for ExprProtocol {
    fn operator(&self, term: &Term) -> Result<Term, DecomposeError> {
        self.split(term).map(|(operator, _)| operator.clone())
    }

    fn operands(&self, term: &Term) -> Result<Term, DecomposeError> {
        self.split(term).map(|(_, operands)| operands.clone())
    }

    fn construct(&self, operator: &Term, operands: &Term) -> Result<Term, DecomposeError> {
        check_spine(operands, expect_expr, || {
            DecomposeError::ImproperOperands(operands.clone())
        })?;
        Ok(Term::cons(operator.clone(), operands.clone()))
    }
}

/// Every non-empty sequence is compound, whatever its terminator:
/// the head is the operator, and the tail the operands.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequenceProtocol;

impl Decompose for SequenceProtocol {
    fn operator(&self, term: &Term) -> Result<Term, DecomposeError> {
        term.car()
            .cloned()
            .ok_or_else(|| DecomposeError::NotCompound(term.clone()))
    }

    fn operands(&self, term: &Term) -> Result<Term, DecomposeError> {
        term.cdr()
            .cloned()
            .ok_or_else(|| DecomposeError::NotCompound(term.clone()))
    }

    fn construct(&self, operator: &Term, operands: &Term) -> Result<Term, DecomposeError> {
        check_spine(operands, |_| Ok(()), || {
            DecomposeError::ImproperOperands(operands.clone())
        })?;
        Ok(Term::cons(operator.clone(), operands.clone()))
    }
}

#[test]
fn test_expr_round_trip() {
    let term = Term::expr(Term::sym("f"), vec![Term::int(1), Term::int(2)]);
    let protocol = ExprProtocol;

    let operator = protocol.operator(&term).expect("compound");
    let operands = protocol.operands(&term).expect("compound");
    assert_eq!(operator, Term::sym("f"));
    assert_eq!(
        operands,
        Term::sequence(SeqKind::Expr, vec![Term::int(1), Term::int(2)])
    );
    assert_eq!(protocol.construct(&operator, &operands), Ok(term));
}

#[test]
fn test_expr_rejects_atoms_and_lists() {
    let protocol = ExprProtocol;

    assert_eq!(
        protocol.operator(&Term::int(1)),
        Err(DecomposeError::NotCompound(Term::int(1)))
    );
    assert_eq!(
        protocol.operands(&Term::list(vec![Term::sym("f"), Term::int(1)])),
        Err(DecomposeError::WrongTerminator {
            expected: SeqKind::Expr,
            found: SeqKind::List
        })
    );
    assert!(protocol.operator(&Term::nil(SeqKind::Expr)).is_err());
    assert!(protocol
        .construct(&Term::sym("f"), &Term::list(vec![Term::int(1)]))
        .is_err());
    assert_eq!(
        protocol.construct(&Term::sym("f"), &Term::int(1)),
        Err(DecomposeError::ImproperOperands(Term::int(1)))
    );
}

#[test]
fn test_expr_accepts_open_chains() {
    let protocol = ExprProtocol;
    let open = Term::cons(Term::sym("f"), Term::var("rest"));

    assert_eq!(protocol.operator(&open), Ok(Term::sym("f")));
    assert!(protocol
        .construct(&Term::sym("g"), &Term::cons(Term::int(1), Term::var("rest")))
        .is_ok());
}

#[test]
fn test_sequence_protocol() {
    let protocol = SequenceProtocol;
    let list = Term::list(vec![Term::sym("f"), Term::int(1)]);

    assert_eq!(protocol.operator(&list), Ok(Term::sym("f")));
    assert_eq!(protocol.operands(&list), Ok(Term::list(vec![Term::int(1)])));
    assert_eq!(
        protocol.construct(&Term::sym("f"), &Term::list(vec![Term::int(1)])),
        Ok(list)
    );
    assert!(protocol.operator(&Term::nil(SeqKind::List)).is_err());
}

#[test]
fn test_error_messages() {
    assert_eq!(
        DecomposeError::NotCompound(Term::int(3)).to_string(),
        "3 is not a compound term"
    );
    assert_eq!(
        DecomposeError::WrongTerminator {
            expected: SeqKind::Expr,
            found: SeqKind::Tuple
        }
        .to_string(),
        "expected Expr terminator, found Tuple"
    );
}

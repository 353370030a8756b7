//! Terms are the values relations talk about: logic variables, opaque
//! atoms, and cons chains.
//!
//! There is a single sequence constructor, `Cons`.  What kind of
//! sequence a chain represents only shows up at its end, in the
//! `Nil` terminator: `[1, 2]`, `(1, 2)` and the expression `f(1, 2)`
//! share the same cons cells, and differ in their `SeqKind`.  A
//! compound (decomposable) term is thus just a chain whose head is
//! the operator and whose tail is the operand sequence; which
//! terminators count is up to the `Decompose` protocol in use.
use crate::Var;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::rc::Rc;

/// The representation of a sequence terminator (the "null marker
/// type").  Two sequences can only be related when their
/// terminators agree.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SeqKind {
    List,
    Tuple,
    /// Expression tuples: the head is an operator, the rest operands.
    Expr,
}

/// Comparing, hashing and dropping terms all walk the term with an
/// explicit stack, so arbitrarily deep terms are fine.
///
/// Cons cells are built with `Term::cons`, which records whether the
/// cell contains any variable.
#[derive(Clone, Debug)]
pub enum Term {
    Var(Var),
    Int(i64),
    Sym(Rc<str>),
    Cons(Rc<Term>, Rc<Term>, Ground),
    Nil(SeqKind),
}

/// Whether a cons cell is free of logic variables.  A ground term
/// stays ground under every substitution, so walks over terms can
/// skip ground cells wholesale.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ground(bool);

impl PartialEq for Term {
    fn eq(&self, other: &Term) -> bool {
        let mut pending = vec![(self, other)];

        while let Some((lhs, rhs)) = pending.pop() {
            match (lhs, rhs) {
                (Term::Cons(lhs_head, lhs_tail, _), Term::Cons(rhs_head, rhs_tail, _)) => {
                    if !Rc::ptr_eq(lhs_tail, rhs_tail) {
                        pending.push((&**lhs_tail, &**rhs_tail));
                    }
                    if !Rc::ptr_eq(lhs_head, rhs_head) {
                        pending.push((&**lhs_head, &**rhs_head));
                    }
                }
                (Term::Var(x), Term::Var(y)) if x == y => {}
                (Term::Int(x), Term::Int(y)) if x == y => {}
                (Term::Sym(x), Term::Sym(y)) if x == y => {}
                (Term::Nil(x), Term::Nil(y)) if x == y => {}
                _ => return false,
            }
        }

        true
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut pending = vec![self];

        while let Some(term) = pending.pop() {
            std::mem::discriminant(term).hash(state);
            match term {
                Term::Var(var) => var.hash(state),
                Term::Int(value) => value.hash(state),
                Term::Sym(name) => name.hash(state),
                Term::Nil(kind) => kind.hash(state),
                Term::Cons(head, tail, _) => {
                    pending.push(tail);
                    pending.push(head);
                }
            }
        }
    }
}

/// Placeholder swapped into cons cells as they are taken apart.
fn leaf() -> Rc<Term> {
    thread_local! {
        static LEAF: Rc<Term> = Rc::new(Term::Nil(SeqKind::List));
    }

    LEAF.try_with(Rc::clone)
        .unwrap_or_else(|_| Rc::new(Term::Nil(SeqKind::List)))
}

/// Moves `child` to `pending` if nobody else holds it.
fn detach(child: &mut Rc<Term>, pending: &mut Vec<Term>) {
    if Rc::strong_count(child) == 1 {
        if let Ok(owned) = Rc::try_unwrap(std::mem::replace(child, leaf())) {
            pending.push(owned);
        }
    }
}

fn detach_children(term: &mut Term, pending: &mut Vec<Term>) {
    if let Term::Cons(head, tail, _) = term {
        detach(head, pending);
        detach(tail, pending);
    }
}

impl Drop for Term {
    fn drop(&mut self) {
        let mut pending = Vec::new();

        detach_children(self, &mut pending);
        while let Some(mut term) = pending.pop() {
            detach_children(&mut term, &mut pending);
        }
    }
}

impl Term {
    /// Returns a term for a fresh logic variable called `name`.
    #[must_use]
    pub fn var(name: &'static str) -> Self {
        Term::Var(Var::fresh(name))
    }

    #[must_use]
    pub fn int(value: i64) -> Self {
        Term::Int(value)
    }

    #[must_use]
    pub fn sym(name: &str) -> Self {
        Term::Sym(name.into())
    }

    #[must_use]
    pub fn cons(head: Term, tail: Term) -> Self {
        let ground = Ground(head.is_ground() && tail.is_ground());
        Term::Cons(Rc::new(head), Rc::new(tail), ground)
    }

    #[must_use]
    pub fn nil(kind: SeqKind) -> Self {
        Term::Nil(kind)
    }

    /// Builds the proper sequence of `items`, terminated by `kind`.
    #[must_use]
    pub fn sequence<I>(kind: SeqKind, items: I) -> Self
    where
        I: IntoIterator<Item = Term>,
        I::IntoIter: DoubleEndedIterator,
    {
        items
            .into_iter()
            .rev()
            .fold(Term::Nil(kind), |tail, head| Term::cons(head, tail))
    }

    #[must_use]
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Term>,
        I::IntoIter: DoubleEndedIterator,
    {
        Self::sequence(SeqKind::List, items)
    }

    #[must_use]
    pub fn tuple<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Term>,
        I::IntoIter: DoubleEndedIterator,
    {
        Self::sequence(SeqKind::Tuple, items)
    }

    /// Builds the compound term `operator(operands...)`.
    #[must_use]
    pub fn expr<I>(operator: Term, operands: I) -> Self
    where
        I: IntoIterator<Item = Term>,
        I::IntoIter: DoubleEndedIterator,
    {
        Term::cons(operator, Self::sequence(SeqKind::Expr, operands))
    }

    #[inline]
    #[must_use]
    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    #[inline]
    #[must_use]
    pub fn as_var(&self) -> Option<Var> {
        match self {
            Term::Var(var) => Some(*var),
            _ => None,
        }
    }

    /// Returns true iff no variable occurs in this term.
    #[inline]
    #[must_use]
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Var(_) => false,
            Term::Cons(_, _, Ground(ground)) => *ground,
            _ => true,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_cons(&self) -> bool {
        matches!(self, Term::Cons(..))
    }

    #[must_use]
    pub fn car(&self) -> Option<&Term> {
        match self {
            Term::Cons(head, _, _) => Some(head),
            _ => None,
        }
    }

    #[must_use]
    pub fn cdr(&self) -> Option<&Term> {
        match self {
            Term::Cons(_, tail, _) => Some(tail),
            _ => None,
        }
    }

    /// Returns the heads along this term's cons spine, and the first
    /// non-cons tail (the term itself if it isn't a cons cell).
    #[must_use]
    pub fn spine(&self) -> (Vec<&Term>, &Term) {
        let mut heads = Vec::new();
        let mut current = self;

        while let Term::Cons(head, tail, _) = current {
            heads.push(&**head);
            current = tail;
        }

        (heads, current)
    }

    /// Returns the terminator of a proper sequence, `None` for open
    /// (variable-tailed) or improper chains and for non-sequences.
    #[must_use]
    pub fn terminator(&self) -> Option<SeqKind> {
        match self.spine().1 {
            Term::Nil(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Returns the elements of a proper sequence.
    #[must_use]
    pub fn to_vec(&self) -> Option<Vec<Term>> {
        let (heads, tail) = self.spine();

        match tail {
            Term::Nil(_) => Some(heads.into_iter().cloned().collect()),
            _ => None,
        }
    }
}

impl From<Var> for Term {
    fn from(var: Var) -> Self {
        Term::Var(var)
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::Int(value)
    }
}

impl From<i32> for Term {
    fn from(value: i32) -> Self {
        Term::Int(value.into())
    }
}

impl From<&str> for Term {
    fn from(name: &str) -> Self {
        Term::sym(name)
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[&Term]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }

    Ok(())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(var) => write!(f, "{}", var),
            Term::Int(value) => write!(f, "{}", value),
            Term::Sym(name) => write!(f, "{}", name),
            Term::Nil(SeqKind::List) => write!(f, "[]"),
            Term::Nil(SeqKind::Tuple) => write!(f, "()"),
            Term::Nil(SeqKind::Expr) => write!(f, "e()"),
            Term::Cons(..) => {
                let (heads, tail) = self.spine();

                match tail {
                    Term::Nil(SeqKind::List) => {
                        write!(f, "[")?;
                        write_items(f, &heads)?;
                        write!(f, "]")
                    }
                    Term::Nil(SeqKind::Tuple) => {
                        write!(f, "(")?;
                        write_items(f, &heads)?;
                        write!(f, ")")
                    }
                    Term::Nil(SeqKind::Expr) => {
                        write!(f, "{}(", heads[0])?;
                        write_items(f, &heads[1..])?;
                        write!(f, ")")
                    }
                    _ => {
                        write!(f, "(")?;
                        write_items(f, &heads)?;
                        write!(f, " . {})", tail)
                    }
                }
            }
        }
    }
}

#[test]
fn test_sequence_shapes() {
    let list = Term::list(vec![Term::int(1), Term::int(2)]);
    let tuple = Term::tuple(vec![Term::int(1), Term::int(2)]);

    assert_eq!(list.terminator(), Some(SeqKind::List));
    assert_eq!(tuple.terminator(), Some(SeqKind::Tuple));
    // Same cells, different terminators.
    assert_ne!(list, tuple);
    assert_eq!(list.to_vec(), tuple.to_vec());
    assert_eq!(list.car(), Some(&Term::int(1)));
    assert_eq!(
        list.cdr(),
        Some(&Term::cons(Term::int(2), Term::nil(SeqKind::List)))
    );
}

#[test]
fn test_open_chain() {
    let open = Term::cons(Term::int(1), Term::var("tail"));

    assert!(!open.is_ground());
    assert!(!Term::list(vec![Term::int(1), open.clone()]).is_ground());
    assert!(Term::list(vec![Term::int(1), Term::sym("a")]).is_ground());

    assert_eq!(open.terminator(), None);
    assert_eq!(open.to_vec(), None);
    assert!(open.is_cons());
    assert_eq!(Term::int(3).terminator(), None);
    assert_eq!(Term::int(3).spine().0.len(), 0);
}

#[test]
fn test_display() {
    let add = Term::expr(
        Term::sym("add"),
        vec![Term::int(1), Term::expr(Term::sym("neg"), vec![Term::int(2)])],
    );
    assert_eq!(format!("{}", add), "add(1, neg(2))");
    assert_eq!(
        format!("{}", Term::list(vec![Term::int(1), Term::sym("a")])),
        "[1, a]"
    );
    assert_eq!(format!("{}", Term::tuple(vec![Term::int(1)])), "(1)");
    assert_eq!(format!("{}", Term::nil(SeqKind::Expr)), "e()");
    assert_eq!(
        format!("{}", Term::cons(Term::int(1), Term::int(2))),
        "(1 . 2)"
    );
}

#[test]
fn test_deep_terms() {
    use std::collections::hash_map::DefaultHasher;

    fn nest(depth: usize) -> Term {
        (0..depth).fold(Term::sym("z"), |inner, _| {
            Term::expr(Term::sym("s"), vec![inner])
        })
    }

    let (lhs, rhs) = (nest(100_000), nest(100_000));
    assert_eq!(lhs, rhs);
    assert_ne!(lhs, nest(99_999));

    let mut lhs_hasher = DefaultHasher::new();
    let mut rhs_hasher = DefaultHasher::new();
    lhs.hash(&mut lhs_hasher);
    rhs.hash(&mut rhs_hasher);
    assert_eq!(lhs_hasher.finish(), rhs_hasher.finish());

    // Long spines and deep nesting both drop without recursing.
    drop(lhs);
    drop(Term::list((0..100_000).map(Term::int).collect::<Vec<_>>()));
}

//! A `State` is the substitution a goal threads through the search:
//! a map from logic variables to terms.
//!
//! States are persistent.  Extending a state never affects other
//! holders of the same state: bindings live in an `im_rc::HashMap`,
//! so every branch of a disjunction shares the bindings made before
//! it, and extending a state costs a logarithmic number of node
//! copies rather than a copy of the whole map.  Bindings are
//! occurs-checked, so walking a variable always terminates.
//!
//! Nothing here recurses on the shape of a term: `occurs`, `unify`
//! and `reify` all keep their pending work on explicit stacks, and
//! `occurs` and `reify` skip ground subterms.
use crate::Term;
use crate::Var;
use im_rc::HashMap;

#[derive(Clone, Debug, Default)]
pub struct State {
    bindings: HashMap<Var, Term>,
}

/// Pending work for `State::reify`.
enum Reify {
    /// Resolve this term and push the result.
    Visit(Term),
    /// Pop a tail, then a head, and push their cons cell.
    Cons,
}

impl State {
    /// Returns the empty substitution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Follows variable bindings from `term` until we hit an unbound
    /// variable or a non-variable term.
    #[must_use]
    pub fn walk(&self, term: &Term) -> Term {
        let mut current = term.clone();

        while let Some(var) = current.as_var() {
            match self.bindings.get(&var) {
                Some(next) => current = next.clone(),
                None => break,
            }
        }

        current
    }

    /// Returns true iff `var` appears in `term` under this
    /// substitution.
    #[must_use]
    pub fn occurs(&self, var: Var, term: &Term) -> bool {
        let mut pending = vec![term.clone()];

        while let Some(term) = pending.pop() {
            if term.is_ground() {
                continue;
            }

            match &self.walk(&term) {
                Term::Var(other) if *other == var => return true,
                Term::Cons(head, tail, _) => {
                    pending.push((**head).clone());
                    pending.push((**tail).clone());
                }
                _ => {}
            }
        }

        false
    }

    /// Returns a new state where `var` is bound to `term`, or `None`
    /// if that binding would be cyclic.
    #[must_use]
    pub fn extend(&self, var: Var, term: Term) -> Option<State> {
        let mut ret = self.clone();
        if ret.bind(var, term) {
            Some(ret)
        } else {
            None
        }
    }

    /// Binds `var` in place.
    fn bind(&mut self, var: Var, term: Term) -> bool {
        if self.occurs(var, &term) {
            tracing::trace!(%var, %term, "occurs check rejected binding");
            return false;
        }

        self.bindings.insert(var, term);
        true
    }

    /// Unifies `u` and `v`, and returns the extended state on
    /// success.
    #[must_use]
    pub fn unify(&self, u: &Term, v: &Term) -> Option<State> {
        let mut state = self.clone();
        let mut pending = vec![(u.clone(), v.clone())];

        while let Some((u, v)) = pending.pop() {
            let u = state.walk(&u);
            let v = state.walk(&v);

            match (&u, &v) {
                (Term::Var(x), Term::Var(y)) if x == y => {}
                (Term::Var(x), _) => {
                    if !state.bind(*x, v.clone()) {
                        return None;
                    }
                }
                (_, Term::Var(y)) => {
                    if !state.bind(*y, u.clone()) {
                        return None;
                    }
                }
                (Term::Cons(u_head, u_tail, _), Term::Cons(v_head, v_tail, _)) => {
                    // Heads are popped first.
                    pending.push(((**u_tail).clone(), (**v_tail).clone()));
                    pending.push(((**u_head).clone(), (**v_head).clone()));
                }
                _ if u == v => {}
                _ => return None,
            }
        }

        Some(state)
    }

    /// Resolves `term` as deeply as this substitution allows.  Unbound
    /// variables are left in place.
    #[must_use]
    pub fn reify(&self, term: &Term) -> Term {
        let mut tasks = vec![Reify::Visit(term.clone())];
        let mut done: Vec<Term> = Vec::new();

        while let Some(task) = tasks.pop() {
            match task {
                Reify::Visit(term) if term.is_ground() => done.push(term),
                Reify::Visit(term) => {
                    let walked = self.walk(&term);
                    let children = match &walked {
                        Term::Cons(head, tail, _) if !walked.is_ground() => {
                            Some(((**head).clone(), (**tail).clone()))
                        }
                        _ => None,
                    };

                    match children {
                        Some((head, tail)) => {
                            tasks.push(Reify::Cons);
                            tasks.push(Reify::Visit(tail));
                            tasks.push(Reify::Visit(head));
                        }
                        None => done.push(walked),
                    }
                }
                Reify::Cons => {
                    if let (Some(tail), Some(head)) = (done.pop(), done.pop()) {
                        done.push(Term::cons(head, tail));
                    }
                }
            }
        }

        done.pop().unwrap_or_else(|| term.clone())
    }
}

#[test]
fn test_walk_chain() {
    let x = Var::fresh("x");
    let y = Var::fresh("y");
    let z = Var::fresh("z");

    let state = State::new()
        .extend(x, Term::Var(y))
        .and_then(|s| s.extend(y, Term::Var(z)))
        .and_then(|s| s.extend(z, Term::int(4)))
        .expect("acyclic");

    assert_eq!(state.walk(&Term::Var(x)), Term::int(4));
    assert_eq!(state.len(), 3);
}

#[test]
fn test_extend_is_persistent() {
    let x = Var::fresh("x");
    let empty = State::new();
    let bound = empty.extend(x, Term::int(1)).expect("ok");

    assert!(empty.is_empty());
    assert_eq!(empty.walk(&Term::Var(x)), Term::Var(x));
    assert_eq!(bound.walk(&Term::Var(x)), Term::int(1));
}

#[test]
fn test_occurs_check() {
    let x = Var::fresh("x");
    let cyclic = Term::list(vec![Term::int(1), Term::Var(x)]);

    assert!(State::new().extend(x, cyclic.clone()).is_none());
    assert!(State::new().unify(&Term::Var(x), &cyclic).is_none());
}

#[test]
fn test_unify_structures() {
    let x = Var::fresh("x");
    let tail = Var::fresh("tail");

    let lhs = Term::cons(Term::Var(x), Term::Var(tail));
    let rhs = Term::list(vec![Term::int(1), Term::int(2)]);
    let state = State::new().unify(&lhs, &rhs).expect("unifies");

    assert_eq!(state.reify(&Term::Var(x)), Term::int(1));
    assert_eq!(state.reify(&Term::Var(tail)), Term::list(vec![Term::int(2)]));
    assert_eq!(state.reify(&lhs), rhs);
}

#[test]
fn test_unify_clash() {
    let list = Term::list(vec![Term::int(1)]);
    let tuple = Term::tuple(vec![Term::int(1)]);

    assert!(State::new().unify(&list, &tuple).is_none());
    assert!(State::new().unify(&Term::int(1), &Term::int(2)).is_none());
    assert!(State::new().unify(&Term::sym("a"), &Term::int(2)).is_none());
    assert!(State::new()
        .unify(&list, &Term::list(vec![Term::int(1), Term::int(2)]))
        .is_none());
}

#[test]
fn test_reify_leaves_unbound() {
    let x = Var::fresh("x");
    let y = Var::fresh("y");
    let state = State::new().extend(x, Term::int(3)).expect("ok");
    let term = Term::expr(Term::sym("f"), vec![Term::Var(x), Term::Var(y)]);

    assert_eq!(
        state.reify(&term),
        Term::expr(Term::sym("f"), vec![Term::int(3), Term::Var(y)])
    );
}

#[test]
fn test_reify_deep_term() {
    let x = Var::fresh("x");
    let mut term = Term::Var(x);
    let mut expected = Term::int(0);
    for _ in 0..100_000 {
        term = Term::expr(Term::sym("s"), vec![term]);
        expected = Term::expr(Term::sym("s"), vec![expected]);
    }

    let state = State::new().extend(x, Term::int(0)).expect("ok");
    assert_eq!(state.reify(&term), expected);
}

#[test]
fn test_branches_share_bindings() {
    let vars: Vec<Var> = (0..1_000).map(|_| Var::fresh("v")).collect();
    let mut state = State::new();
    for (index, var) in vars.iter().enumerate() {
        let branch = state.clone();
        state = state.extend(*var, Term::int(index as i64)).expect("fresh");
        assert_eq!(branch.len(), index);
    }

    assert_eq!(state.len(), vars.len());
    assert_eq!(state.walk(&Term::Var(vars[999])), Term::int(999));
}

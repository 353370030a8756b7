//! Logic variables are opaque placeholders that a `State` may bind.
//!
//! A variable is identified by its sequence id alone; the name only
//! helps when printing terms.  Variables are cheap (`Copy`) because
//! relations mint several of them every time they unfold one more
//! level of a search tree.

/// A logic variable.
///
/// The implicit order on variables sorts by sequence id (ascending),
/// i.e., by creation order.
#[derive(Clone, Copy, Debug, Eq)]
pub struct Var {
    sequence: u64,
    name: &'static str,
}

impl Var {
    /// Returns a fresh unique variable called `name`.
    #[must_use]
    pub fn fresh(name: &'static str) -> Self {
        #[cfg(not(tarpaulin_include))]
        fn id() -> u64 {
            use std::sync::atomic::{AtomicU64, Ordering};
            static VAR_COUNTER: AtomicU64 = AtomicU64::new(1);

            VAR_COUNTER.fetch_add(1, Ordering::Relaxed)
        }

        Self {
            sequence: id(),
            name,
        }
    }

    #[inline]
    #[must_use]
    pub fn sequence(self) -> u64 {
        self.sequence
    }

    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        self.name
    }
}

impl std::hash::Hash for Var {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.sequence.hash(state);
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
    }
}

impl PartialOrd for Var {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Var {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sequence.cmp(&other.sequence)
    }
}

impl std::fmt::Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_{}.{}", self.name, self.sequence)
    }
}

#[test]
fn test_fresh() {
    let v0 = Var::fresh("x");
    let v1 = Var::fresh("y");

    assert!(v0 < v1);
    assert_ne!(v0, v1);
    assert_eq!(v0.name(), "x");
}

#[test]
fn test_eq_hash() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::Hash;
    use std::hash::Hasher;

    let v0 = Var::fresh("a");
    let v0_copy = v0;
    // v0 and v1 should be distinct, despite their name.
    let v1 = Var::fresh("a");

    assert_eq!(v0, v0_copy);
    assert_ne!(v0, v1);

    let mut h0 = DefaultHasher::new();
    let mut h0_copy = DefaultHasher::new();

    v0.hash(&mut h0);
    v0_copy.hash(&mut h0_copy);
    assert_eq!(h0.finish(), h0_copy.finish());
}

#[test]
fn test_display() {
    let v = Var::fresh("q");
    assert_eq!(format!("{}", v), format!("_q.{}", v.sequence()));
}

//! Per-call configuration for the sequence maps and graph walks.
//!
//! The sequence and walk relations take a handful of knobs (what
//! terminator to assume when neither side determines one, whether an
//! all-empty match is acceptable, how to aggregate over operands).
//! Rather than thread loose flags through recursive calls, each entry
//! point accepts one configuration value with documented defaults.
use crate::map::map_all;
use crate::map::map_any;
use crate::map::AnyCursor;
use logic_stream::Decompose;
use logic_stream::Goal;
use logic_stream::SeqKind;
use logic_stream::SequenceProtocol;
use logic_stream::Term;
use std::rc::Rc;

/// A binary relation: a function from two terms to the goal that
/// relates them.
pub type Relation = Rc<dyn Fn(Term, Term) -> Goal>;

/// Configures `mapo` and `map_anyo`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MapConfig {
    /// Terminator used for the empty sequences when neither side
    /// already ends in one.
    pub terminator: SeqKind,
    /// Whether two empty sequences match on the initial call.  When
    /// false, at least one pair of elements must exist.  Recursive
    /// calls on the tails always accept empty sequences under
    /// `mapo`.
    pub null_succeeds_at_first_call: bool,
    /// `map_anyo` only: whether to act as if the relation had already
    /// held for some earlier pair.  When true, elementwise-equal
    /// sequences match even if the relation never holds.
    pub any_succeeded: bool,
}

impl MapConfig {
    /// Defaults for `mapo`: lists, and empty sequences match.
    #[must_use]
    pub fn all() -> Self {
        Self {
            terminator: SeqKind::List,
            null_succeeds_at_first_call: true,
            any_succeeded: false,
        }
    }

    /// Defaults for `map_anyo`: lists, and the relation must hold for
    /// at least one pair.
    #[must_use]
    pub fn any() -> Self {
        Self {
            terminator: SeqKind::List,
            null_succeeds_at_first_call: false,
            any_succeeded: false,
        }
    }

    #[must_use]
    pub fn with_terminator(self, terminator: SeqKind) -> Self {
        Self { terminator, ..self }
    }

    #[must_use]
    pub fn with_null_succeeds(self, null_succeeds_at_first_call: bool) -> Self {
        Self {
            null_succeeds_at_first_call,
            ..self
        }
    }

    #[must_use]
    pub fn with_any_succeeded(self, any_succeeded: bool) -> Self {
        Self {
            any_succeeded,
            ..self
        }
    }
}

/// How `walko` aggregates the recursive walk over operand sequences.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MapPolicy {
    /// Every operand must be related (`mapo`).
    All,
    /// At least one operand must be related, the others stay equal
    /// (`map_anyo`).
    Any,
}

impl MapPolicy {
    /// Relates sequences `a` and `b` elementwise with `relation`,
    /// under this policy.
    #[must_use]
    pub fn map(self, relation: Relation, a: Term, b: Term, config: MapConfig) -> Goal {
        match self {
            MapPolicy::All => map_all(
                relation,
                a,
                b,
                config.terminator,
                config.null_succeeds_at_first_call,
            ),
            MapPolicy::Any => map_any(
                relation,
                a,
                b,
                config.terminator,
                config.null_succeeds_at_first_call,
                AnyCursor::first(config.any_succeeded),
            ),
        }
    }
}

/// Configures `walko`.
#[derive(Clone)]
pub struct WalkConfig {
    /// When set, compound terms are split into operator and operands:
    /// this relation must hold between the operators, and only the
    /// operands are walked.  When unset, a compound term is walked as
    /// one flat sequence, operator included.
    pub operator_relation: Option<Relation>,
    /// Terminator for operand sequences that aren't determined by
    /// either graph.  Defaults to `SeqKind::Expr`.
    pub terminator: SeqKind,
    /// Defaults to `MapPolicy::Any`.
    pub policy: MapPolicy,
    /// Passed on to the sequence map at each level.  Defaults to true.
    pub null_succeeds_at_first_call: bool,
    /// Decides which terms are compound.  Defaults to
    /// `SequenceProtocol`: every non-empty sequence.
    pub protocol: Rc<dyn Decompose>,
}

impl WalkConfig {
    #[must_use]
    pub fn with_operator_relation<R>(self, relation: R) -> Self
    where
        R: Fn(Term, Term) -> Goal + 'static,
    {
        Self {
            operator_relation: Some(Rc::new(relation)),
            ..self
        }
    }

    #[must_use]
    pub fn with_terminator(self, terminator: SeqKind) -> Self {
        Self { terminator, ..self }
    }

    #[must_use]
    pub fn with_policy(self, policy: MapPolicy) -> Self {
        Self { policy, ..self }
    }

    #[must_use]
    pub fn with_null_succeeds(self, null_succeeds_at_first_call: bool) -> Self {
        Self {
            null_succeeds_at_first_call,
            ..self
        }
    }

    #[must_use]
    pub fn with_protocol(self, protocol: impl Decompose + 'static) -> Self {
        Self {
            protocol: Rc::new(protocol),
            ..self
        }
    }

    /// Returns the configuration for the sequence map at each level.
    #[must_use]
    pub fn map_config(&self) -> MapConfig {
        MapConfig {
            terminator: self.terminator,
            null_succeeds_at_first_call: self.null_succeeds_at_first_call,
            any_succeeded: false,
        }
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            operator_relation: None,
            terminator: SeqKind::Expr,
            policy: MapPolicy::Any,
            null_succeeds_at_first_call: true,
            protocol: Rc::new(SequenceProtocol),
        }
    }
}

impl std::fmt::Debug for WalkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkConfig")
            .field("operator_relation", &self.operator_relation.is_some())
            .field("terminator", &self.terminator)
            .field("policy", &self.policy)
            .field("null_succeeds_at_first_call", &self.null_succeeds_at_first_call)
            .finish()
    }
}

#[test]
fn test_map_defaults() {
    assert!(MapConfig::all().null_succeeds_at_first_call);
    assert!(!MapConfig::any().null_succeeds_at_first_call);
    assert_eq!(MapConfig::all().terminator, SeqKind::List);
    assert_eq!(
        MapConfig::any().with_terminator(SeqKind::Tuple).terminator,
        SeqKind::Tuple
    );
    assert!(MapConfig::any().with_any_succeeded(true).any_succeeded);
}

#[test]
fn test_walk_defaults() {
    let config = WalkConfig::default();

    assert!(config.operator_relation.is_none());
    assert_eq!(config.terminator, SeqKind::Expr);
    assert_eq!(config.policy, MapPolicy::Any);
    assert_eq!(
        config.map_config(),
        MapConfig::any()
            .with_terminator(SeqKind::Expr)
            .with_null_succeeds(true)
    );

    let config = config
        .with_policy(MapPolicy::All)
        .with_operator_relation(|a: Term, b: Term| logic_stream::eq(a, b));
    assert!(config.operator_relation.is_some());
    assert_eq!(config.policy, MapPolicy::All);
}

//! Foreign key resolution.
//!
//! Records are drafted with every foreign key unset. Before a batch is
//! flushed, the resolver samples each reference from the ids the store has
//! already committed for the parent kind. Ids are 1-based and contiguous
//! because the store assigns them in insertion order.

use rand::Rng;
use seed_core::{EntityKind, Record, ReferenceDomain, RunPlan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Committed row counts per entity kind.
///
/// Counts only grow during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedCounts(BTreeMap<EntityKind, u64>);

impl CommittedCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: EntityKind) -> u64 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Record `rows` newly committed rows of `kind`; returns the new total.
    pub fn advance(&mut self, kind: EntityKind, rows: u64) -> u64 {
        let total = self.0.entry(kind).or_insert(0);
        *total += rows;
        *total
    }

    /// Raise the count for `kind` to `rows` if it is lower.
    pub fn raise_to(&mut self, kind: EntityKind, rows: u64) {
        let total = self.0.entry(kind).or_insert(0);
        *total = (*total).max(rows);
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, u64)> + '_ {
        self.0.iter().map(|(kind, rows)| (*kind, *rows))
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}

impl fmt::Display for CommittedCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for kind in EntityKind::ALL {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{kind}={}", self.get(kind))?;
        }
        Ok(())
    }
}

/// Why a record could not be given a required reference.
///
/// Never fatal: the orchestrator drops the record and counts it as skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("no committed {parent} to reference from {child}")]
    NoParents { child: EntityKind, parent: EntityKind },

    #[error("{child} sampled {parent} id {sampled}, only {committed} committed")]
    ParentNotCommitted {
        child: EntityKind,
        parent: EntityKind,
        sampled: u64,
        committed: u64,
    },
}

impl ResolutionError {
    /// The parent kind that could not be referenced.
    pub fn parent(&self) -> EntityKind {
        match self {
            ResolutionError::NoParents { parent, .. } => *parent,
            ResolutionError::ParentNotCommitted { parent, .. } => *parent,
        }
    }
}

/// Fills in foreign keys from committed parent counts.
#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    domain: ReferenceDomain,
    configured: BTreeMap<EntityKind, u64>,
}

impl ReferenceResolver {
    pub fn new(plan: &RunPlan) -> Self {
        Self {
            domain: plan.reference_domain,
            configured: plan
                .phases()
                .iter()
                .map(|phase| (phase.kind, phase.volume))
                .collect(),
        }
    }

    pub fn domain(&self) -> ReferenceDomain {
        self.domain
    }

    /// Resolve every foreign key of `record` in place.
    ///
    /// A user with no resolvable department keeps a null `department_id`;
    /// every other reference is required.
    pub fn resolve<R: Rng>(
        &self,
        record: &mut Record,
        rng: &mut R,
        committed: &CommittedCounts,
    ) -> Result<(), ResolutionError> {
        let child = record.kind();
        match record {
            Record::Department(_) | Record::Category(_) => {}
            Record::User(user) => {
                user.department_id = self
                    .sample(child, EntityKind::Department, rng, committed)
                    .ok();
            }
            Record::Product(product) => {
                product.category_id =
                    Some(self.sample(child, EntityKind::Category, rng, committed)?);
            }
            Record::Order(order) => {
                order.user_id = Some(self.sample(child, EntityKind::User, rng, committed)?);
            }
            Record::OrderItem(item) => {
                item.order_id = Some(self.sample(child, EntityKind::Order, rng, committed)?);
                item.product_id = Some(self.sample(child, EntityKind::Product, rng, committed)?);
            }
        }
        Ok(())
    }

    fn sample<R: Rng>(
        &self,
        child: EntityKind,
        parent: EntityKind,
        rng: &mut R,
        committed: &CommittedCounts,
    ) -> Result<u64, ResolutionError> {
        let committed = committed.get(parent);
        let upper = match self.domain {
            ReferenceDomain::Committed => committed,
            ReferenceDomain::Configured => self.configured.get(&parent).copied().unwrap_or(0),
        };
        if upper == 0 || committed == 0 {
            return Err(ResolutionError::NoParents { child, parent });
        }

        let sampled = rng.random_range(1..=upper);
        if sampled > committed {
            return Err(ResolutionError::ParentNotCommitted {
                child,
                parent,
                sampled,
                committed,
            });
        }
        Ok(sampled)
    }
}

use std::fmt;

use log::{debug, trace};

use crate::fields::FieldId;

/// Position of a job in the execution order. Jobs of equal rank form a stage
/// group; groups execute in increasing rank order.
pub type Rank = i32;

/// The type of a kernel: read the environment, update the state in place.
pub type JobFn<E, S, F> = fn(&E, &mut S) -> Result<(), F>;




/**
 * The entity domain a job fans out over.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domain {
    Nodes,
    Cells,
    Global,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Nodes => write!(f, "nodes"),
            Domain::Cells => write!(f, "cells"),
            Domain::Global => write!(f, "global"),
        }
    }
}




/**
 * A named kernel tagged with its rank and its declared read and write sets.
 * The kernel itself is responsible for fanning out over its entity domain;
 * the scheduler only sequences kernels and places barriers between ranks.
 */
pub struct Job<E, S, F> {
    pub name: &'static str,
    pub rank: Rank,
    pub domain: Domain,
    pub reads: &'static [FieldId],
    pub writes: &'static [FieldId],
    pub run: JobFn<E, S, F>,
}

impl<E, S, F> Clone for Job<E, S, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, S, F> Copy for Job<E, S, F> {}

impl<E, S, F> fmt::Debug for Job<E, S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @{} [{}]", self.name, self.rank, self.domain)
    }
}




/**
 * All jobs of one rank. Their write sets are disjoint, and none of them
 * reads a field another one writes, so they may run in any order (or
 * concurrently) between the barriers on either side.
 */
#[derive(Debug)]
pub struct StageGroup<E, S, F> {
    rank: Rank,
    jobs: Vec<Job<E, S, F>>,
}

impl<E, S, F> StageGroup<E, S, F> {
    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn jobs(&self) -> &[Job<E, S, F>] {
        &self.jobs
    }
}




#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    WriteWrite,
    ReadWrite,
}

/**
 * A pair of same-rank jobs that touch the same field, at least one of them
 * writing it.
 */
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    pub rank: Rank,
    pub field: FieldId,
    pub first: &'static str,
    pub second: &'static str,
    pub kind: ConflictKind,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ConflictKind::WriteWrite => write!(f, "@{}: {} written by both {} and {}", self.rank, self.field, self.first, self.second),
            ConflictKind::ReadWrite => write!(f, "@{}: {} read by {} while {} writes it", self.rank, self.field, self.first, self.second),
        }
    }
}

/**
 * Identifies the job that failed, and its rank, alongside the job's own
 * error value.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct JobFailure<F> {
    pub job: &'static str,
    pub rank: Rank,
    pub fault: F,
}




/**
 * Return every read/write hazard between jobs that share a rank. An empty
 * result means the ranks encode a valid partial order.
 */
pub fn conflicts<E, S, F>(jobs: &[Job<E, S, F>]) -> Vec<Conflict> {
    let mut result = Vec::new();

    for (a, ja) in jobs.iter().enumerate() {
        for jb in jobs[a + 1..].iter().filter(|jb| jb.rank == ja.rank) {
            for &field in ja.writes {
                if jb.writes.contains(&field) {
                    result.push(Conflict { rank: ja.rank, field, first: ja.name, second: jb.name, kind: ConflictKind::WriteWrite });
                }
                if jb.reads.contains(&field) {
                    result.push(Conflict { rank: ja.rank, field, first: jb.name, second: ja.name, kind: ConflictKind::ReadWrite });
                }
            }
            for &field in jb.writes {
                if ja.reads.contains(&field) {
                    result.push(Conflict { rank: ja.rank, field, first: ja.name, second: jb.name, kind: ConflictKind::ReadWrite });
                }
            }
        }
    }
    result
}




/**
 * A precomputed, totally ordered list of stage groups. Execution runs the
 * groups in rank order; each job returns only after its data-parallel loop
 * has completed, which is the barrier between ranks.
 */
#[derive(Debug)]
pub struct Schedule<E, S, F> {
    groups: Vec<StageGroup<E, S, F>>,
}

impl<E, S, F> Schedule<E, S, F> {

    /**
     * Sort the jobs by rank (keeping the given order among equal ranks) and
     * group them. In debug builds, panics if two same-rank jobs conflict.
     */
    pub fn new(mut jobs: Vec<Job<E, S, F>>) -> Self {
        jobs.sort_by_key(|job| job.rank);

        let hazards = conflicts(&jobs);
        debug_assert!(
            hazards.is_empty(),
            "same-rank jobs conflict: {}",
            hazards.iter().map(Conflict::to_string).collect::<Vec<_>>().join("; "));

        let mut groups: Vec<StageGroup<E, S, F>> = Vec::new();

        for job in jobs {
            match groups.last_mut() {
                Some(group) if group.rank == job.rank => group.jobs.push(job),
                _ => groups.push(StageGroup { rank: job.rank, jobs: vec![job] }),
            }
        }
        Self { groups }
    }

    pub fn groups(&self) -> &[StageGroup<E, S, F>] {
        &self.groups
    }

    /**
     * Return the number of jobs over all groups.
     */
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.jobs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job<E, S, F>> {
        self.groups.iter().flat_map(|g| g.jobs.iter())
    }

    /**
     * Split into the groups ranked below `rank` and the rest.
     */
    pub fn split_before(self, rank: Rank) -> (Self, Self) {
        let (lower, upper): (Vec<_>, Vec<_>) = self.groups.into_iter().partition(|g| g.rank < rank);
        (Self { groups: lower }, Self { groups: upper })
    }

    /**
     * Reverse the job order inside every group. Ranks are unchanged, so for
     * a conflict-free schedule the results must be identical.
     */
    pub fn reversed_within_groups(mut self) -> Self {
        for group in &mut self.groups {
            group.jobs.reverse();
        }
        self
    }

    /**
     * Log the group layout, one line per rank.
     */
    pub fn log_layout(&self, label: &str) {
        for group in &self.groups {
            let jobs: Vec<_> = group.jobs.iter().map(|j| format!("{} [{}]", j.name, j.domain)).collect();
            debug!("{} @{}: {}", label, group.rank, jobs.join(", "));
        }
    }

    /**
     * Run every group in rank order. Stops at the first failing job.
     */
    pub fn execute(&self, env: &E, state: &mut S) -> Result<(), JobFailure<F>> {
        for group in &self.groups {
            for job in &group.jobs {
                trace!("run {:?}", job);
                (job.run)(env, state).map_err(|fault| JobFailure { job: job.name, rank: job.rank, fault })?;
            }
        }
        Ok(())
    }
}

//! Ordered membership change batches and their per-statement outcomes.

use crate::domain::{ChangeErrors, ChangeFailure, OperationKind, Segment};

/// One add or remove against a single segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipStatement {
    kind: OperationKind,
    segment: Segment,
}

impl MembershipStatement {
    pub fn add(segment: Segment) -> Self {
        Self {
            kind: OperationKind::Add,
            segment,
        }
    }

    pub fn remove(segment: Segment) -> Self {
        Self {
            kind: OperationKind::Remove,
            segment,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }
}

/// Validated statements in application order: every removal precedes every
/// addition, and each list keeps the caller's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipBatch {
    statements: Vec<MembershipStatement>,
}

impl MembershipBatch {
    pub fn new(to_add: Vec<Segment>, to_remove: Vec<Segment>) -> Self {
        let statements = to_remove
            .into_iter()
            .map(MembershipStatement::remove)
            .chain(to_add.into_iter().map(MembershipStatement::add))
            .collect();
        Self { statements }
    }

    pub fn statements(&self) -> &[MembershipStatement] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }
}

/// Result of attempting one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementOutcome {
    statement: MembershipStatement,
    result: Result<(), ChangeFailure>,
}

impl StatementOutcome {
    pub fn statement(&self) -> &MembershipStatement {
        &self.statement
    }

    pub fn result(&self) -> &Result<(), ChangeFailure> {
        &self.result
    }
}

/// Outcomes of a batch, in the order statements were attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    outcomes: Vec<StatementOutcome>,
}

impl BatchOutcome {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(capacity),
        }
    }

    /// Mark every statement in `batch` as failed with `failure`.
    ///
    /// Used when the store cannot be reached at all.
    pub fn all_failed(batch: &MembershipBatch, failure: ChangeFailure) -> Self {
        let mut outcome = Self::with_capacity(batch.len());
        for statement in batch.statements() {
            outcome.record(statement.clone(), Err(failure.clone()));
        }
        outcome
    }

    pub fn record(&mut self, statement: MembershipStatement, result: Result<(), ChangeFailure>) {
        self.outcomes.push(StatementOutcome { statement, result });
    }

    pub fn outcomes(&self) -> &[StatementOutcome] {
        &self.outcomes
    }

    /// Statements that took effect, in application order.
    pub fn applied(&self) -> impl Iterator<Item = &MembershipStatement> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .map(|outcome| &outcome.statement)
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|outcome| outcome.result.is_err())
    }

    /// Failures keyed by slug; the last failure per slug wins.
    pub fn errors(&self) -> ChangeErrors {
        let mut errors = ChangeErrors::default();
        for outcome in &self.outcomes {
            if let Err(failure) = &outcome.result {
                errors.record(outcome.statement.segment.slug(), failure.clone());
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn seg(slug: &str) -> Segment {
        Segment::new(slug).expect("valid slug")
    }

    #[rstest]
    fn removals_come_before_additions() {
        let batch = MembershipBatch::new(vec![seg("a1"), seg("a2")], vec![seg("r1"), seg("r2")]);

        let order: Vec<_> = batch
            .statements()
            .iter()
            .map(|s| (s.kind(), s.segment().slug().to_owned()))
            .collect();

        assert_eq!(
            order,
            vec![
                (OperationKind::Remove, "r1".to_owned()),
                (OperationKind::Remove, "r2".to_owned()),
                (OperationKind::Add, "a1".to_owned()),
                (OperationKind::Add, "a2".to_owned()),
            ]
        );
    }

    #[rstest]
    fn outcome_separates_applied_from_failed() {
        let batch = MembershipBatch::new(vec![seg("x"), seg("y")], vec![seg("x")]);
        let mut outcome = BatchOutcome::default();
        let mut results = vec![
            Ok(()),
            Err(ChangeFailure::RelationAlreadyExists),
            Ok(()),
        ]
        .into_iter();
        for statement in batch.statements() {
            outcome.record(statement.clone(), results.next().expect("result per statement"));
        }

        let applied: Vec<_> = outcome.applied().cloned().collect();
        assert_eq!(
            applied,
            vec![
                MembershipStatement::remove(seg("x")),
                MembershipStatement::add(seg("y")),
            ]
        );
        assert!(outcome.has_failures());
        assert_eq!(
            outcome.errors().get("x"),
            Some(&ChangeFailure::RelationAlreadyExists)
        );
    }

    #[rstest]
    fn all_failed_marks_every_statement() {
        let batch = MembershipBatch::new(vec![seg("a")], vec![seg("b")]);
        let outcome = BatchOutcome::all_failed(&batch, ChangeFailure::Internal);

        assert_eq!(outcome.applied().count(), 0);
        let errors = outcome.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("a"), Some(&ChangeFailure::Internal));
        assert_eq!(errors.get("b"), Some(&ChangeFailure::Internal));
    }
}

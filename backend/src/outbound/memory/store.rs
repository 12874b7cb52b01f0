//! Mutex-guarded segment, relation, and ledger state.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    HistoryRepository, HistoryRepositoryError, SegmentRepository, SegmentRepositoryError,
};
use crate::domain::{
    BatchOutcome, ChangeFailure, HistoryPeriod, MembershipBatch, MembershipStatement, Operation,
    OperationKind, Segment, UserId,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Default)]
struct StoreState {
    /// Slug to surrogate id; ids grow monotonically like a serial column.
    segments: BTreeMap<String, u64>,
    next_segment_id: u64,
    relations: BTreeSet<(UserId, u64)>,
    operations: Vec<Operation>,
}

impl StoreState {
    fn segment_id(&self, slug: &str) -> Option<u64> {
        self.segments.get(slug).copied()
    }

    fn apply(&mut self, user_id: UserId, statement: &MembershipStatement) -> Result<(), ChangeFailure> {
        let slug = statement.segment().slug();
        match statement.kind() {
            OperationKind::Remove => {
                let removed = self
                    .segment_id(slug)
                    .is_some_and(|id| self.relations.remove(&(user_id, id)));
                if removed {
                    Ok(())
                } else {
                    Err(ChangeFailure::RelationNotFound)
                }
            }
            OperationKind::Add => {
                let id = self
                    .segment_id(slug)
                    .ok_or(ChangeFailure::SegmentNotFound)?;
                if self.relations.insert((user_id, id)) {
                    Ok(())
                } else {
                    Err(ChangeFailure::RelationAlreadyExists)
                }
            }
        }
    }
}

/// Shared in-memory store implementing [`SegmentRepository`] and
/// [`HistoryRepository`].
#[derive(Debug, Default)]
pub struct InMemorySegmentStore {
    state: Mutex<StoreState>,
}

impl InMemorySegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Option<MutexGuard<'_, StoreState>> {
        self.state.lock().ok()
    }

    fn lock_segments(&self) -> Result<MutexGuard<'_, StoreState>, SegmentRepositoryError> {
        self.lock()
            .ok_or_else(|| SegmentRepositoryError::query(POISONED))
    }

    fn lock_history(&self) -> Result<MutexGuard<'_, StoreState>, HistoryRepositoryError> {
        self.lock()
            .ok_or_else(|| HistoryRepositoryError::query(POISONED))
    }
}

#[async_trait]
impl SegmentRepository for InMemorySegmentStore {
    async fn store(&self, segment: &Segment) -> Result<(), SegmentRepositoryError> {
        let mut state = self.lock_segments()?;
        if state.segments.contains_key(segment.slug()) {
            return Err(SegmentRepositoryError::already_exists(segment.slug()));
        }
        state.next_segment_id += 1;
        let id = state.next_segment_id;
        state.segments.insert(segment.slug().to_owned(), id);
        Ok(())
    }

    async fn delete(&self, segment: &Segment) -> Result<(), SegmentRepositoryError> {
        let mut state = self.lock_segments()?;
        let id = state
            .segments
            .remove(segment.slug())
            .ok_or_else(|| SegmentRepositoryError::not_found(segment.slug()))?;
        state.relations.retain(|(_, segment_id)| *segment_id != id);
        Ok(())
    }

    async fn change_user_segments(
        &self,
        user_id: UserId,
        batch: &MembershipBatch,
    ) -> BatchOutcome {
        let Some(mut state) = self.lock() else {
            return BatchOutcome::all_failed(batch, ChangeFailure::Internal);
        };
        let mut outcome = BatchOutcome::with_capacity(batch.len());
        for statement in batch.statements() {
            let result = state.apply(user_id, statement);
            outcome.record(statement.clone(), result);
        }
        outcome
    }

    async fn user_segments(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Segment>, SegmentRepositoryError> {
        let state = self.lock_segments()?;
        let mut held: Vec<(u64, &str)> = state
            .segments
            .iter()
            .filter(|(_, id)| state.relations.contains(&(user_id, **id)))
            .map(|(slug, id)| (*id, slug.as_str()))
            .collect();
        if held.is_empty() {
            return Err(SegmentRepositoryError::no_segments(user_id));
        }
        held.sort_unstable_by_key(|(id, _)| *id);
        held.into_iter()
            .map(|(_, slug)| {
                Segment::new(slug).map_err(|err| SegmentRepositoryError::query(err.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl HistoryRepository for InMemorySegmentStore {
    async fn append(&self, operations: &[Operation]) -> Result<(), HistoryRepositoryError> {
        let mut state = self.lock_history()?;
        if let Some(missing) = operations
            .iter()
            .find(|op| !state.segments.contains_key(op.segment().slug()))
        {
            return Err(HistoryRepositoryError::segment_not_found(
                missing.segment().slug(),
            ));
        }
        state.operations.extend_from_slice(operations);
        Ok(())
    }

    async fn for_period(
        &self,
        period: HistoryPeriod,
    ) -> Result<Vec<Operation>, HistoryRepositoryError> {
        let state = self.lock_history()?;
        Ok(state
            .operations
            .iter()
            .filter(|op| period.contains(op.recorded_at()))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    //! Contract coverage for the in-memory adapter.

    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;

    fn seg(slug: &str) -> Segment {
        Segment::new(slug).expect("valid slug")
    }

    #[fixture]
    fn store() -> InMemorySegmentStore {
        InMemorySegmentStore::new()
    }

    async fn seeded(store: InMemorySegmentStore, slugs: &[&str]) -> InMemorySegmentStore {
        for slug in slugs {
            store.store(&seg(slug)).await.expect("store segment");
        }
        store
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_store_is_rejected(store: InMemorySegmentStore) {
        let store = seeded(store, &["a"]).await;
        let err = store.store(&seg("a")).await.expect_err("duplicate");
        assert_eq!(err, SegmentRepositoryError::already_exists("a"));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_delete_is_not_found(store: InMemorySegmentStore) {
        let err = store.delete(&seg("ghost")).await.expect_err("missing");
        assert_eq!(err, SegmentRepositoryError::not_found("ghost"));
    }

    #[rstest]
    #[tokio::test]
    async fn batch_reports_each_statement(store: InMemorySegmentStore) {
        let store = seeded(store, &["a", "b"]).await;
        let user = UserId::new(1);
        let batch = MembershipBatch::new(vec![seg("a"), seg("a"), seg("nope")], vec![seg("b")]);

        let outcome = store.change_user_segments(user, &batch).await;

        let results: Vec<_> = outcome
            .outcomes()
            .iter()
            .map(|o| o.result().clone())
            .collect();
        assert_eq!(
            results,
            vec![
                Err(ChangeFailure::RelationNotFound),
                Ok(()),
                Err(ChangeFailure::RelationAlreadyExists),
                Err(ChangeFailure::SegmentNotFound),
            ]
        );
        let held = store.user_segments(user).await.expect("user holds a");
        assert_eq!(held, vec![seg("a")]);
    }

    #[rstest]
    #[tokio::test]
    async fn remove_then_readd_succeeds(store: InMemorySegmentStore) {
        let store = seeded(store, &["x"]).await;
        let user = UserId::new(2);
        store
            .change_user_segments(user, &MembershipBatch::new(vec![seg("x")], vec![]))
            .await;

        let outcome = store
            .change_user_segments(user, &MembershipBatch::new(vec![seg("x")], vec![seg("x")]))
            .await;

        assert!(!outcome.has_failures());
        assert_eq!(store.user_segments(user).await, Ok(vec![seg("x")]));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_cascades_relations(store: InMemorySegmentStore) {
        let store = seeded(store, &["keep", "drop"]).await;
        let user = UserId::new(3);
        store
            .change_user_segments(
                user,
                &MembershipBatch::new(vec![seg("keep"), seg("drop")], vec![]),
            )
            .await;

        store.delete(&seg("drop")).await.expect("delete segment");

        assert_eq!(store.user_segments(user).await, Ok(vec![seg("keep")]));
    }

    #[rstest]
    #[tokio::test]
    async fn user_without_relations_reports_no_segments(store: InMemorySegmentStore) {
        let err = store
            .user_segments(UserId::new(4))
            .await
            .expect_err("no relations");
        assert_eq!(err, SegmentRepositoryError::no_segments(4_i64));
    }

    #[rstest]
    #[tokio::test]
    async fn append_rejects_missing_segment_without_writing(store: InMemorySegmentStore) {
        let store = seeded(store, &["a"]).await;
        let at = Utc
            .with_ymd_and_hms(2023, 8, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let ops = [
            Operation::new(UserId::new(1), seg("a"), OperationKind::Add, at),
            Operation::new(UserId::new(1), seg("gone"), OperationKind::Add, at),
        ];

        let err = store.append(&ops).await.expect_err("missing segment");
        assert_eq!(err, HistoryRepositoryError::segment_not_found("gone"));

        let period = HistoryPeriod::new(2023, 8).expect("valid period");
        assert!(store.for_period(period).await.expect("read").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn for_period_uses_half_open_month(store: InMemorySegmentStore) {
        let store = seeded(store, &["a"]).await;
        let inside = Utc
            .with_ymd_and_hms(2023, 8, 31, 23, 59, 59)
            .single()
            .expect("valid timestamp");
        let boundary = Utc
            .with_ymd_and_hms(2023, 9, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let ops = [
            Operation::new(UserId::new(1), seg("a"), OperationKind::Add, inside),
            Operation::new(UserId::new(1), seg("a"), OperationKind::Remove, boundary),
        ];
        store.append(&ops).await.expect("append");

        let august = store
            .for_period(HistoryPeriod::new(2023, 8).expect("valid period"))
            .await
            .expect("read");
        let september = store
            .for_period(HistoryPeriod::new(2023, 9).expect("valid period"))
            .await
            .expect("read");

        assert_eq!(august, vec![ops[0].clone()]);
        assert_eq!(september, vec![ops[1].clone()]);
    }
}

//! Builders selecting repository adapters and wiring the membership service.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use user_segmentation::domain::ports::{HistoryRepository, SegmentRepository};
use user_segmentation::domain::{PartialHistoryPolicy, SegmentMembershipService};
use user_segmentation::inbound::http::state::HttpState;
use user_segmentation::outbound::memory::InMemorySegmentStore;
use user_segmentation::outbound::persistence::{
    DbPool, DieselHistoryRepository, DieselSegmentRepository, PoolConfig, PoolError,
};

use super::ServerConfig;

/// Wire one service over the given repositories into every handler port.
fn wire_service<S, H>(
    segments: Arc<S>,
    history: Arc<H>,
    clock: Arc<dyn Clock>,
    policy: PartialHistoryPolicy,
) -> HttpState
where
    S: SegmentRepository + 'static,
    H: HistoryRepository + 'static,
{
    let service = SegmentMembershipService::new(segments, history, clock).with_policy(policy);
    HttpState::from_service(Arc::new(service))
}

/// Build HTTP state backed by PostgreSQL when a database URL is configured,
/// otherwise by a process-local in-memory store.
///
/// # Errors
/// Returns [`PoolError`] when the connection pool cannot be built.
pub(crate) async fn build_http_state(config: &ServerConfig) -> Result<HttpState, PoolError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match config.database_url.as_deref() {
        Some(url) => {
            let pool =
                DbPool::new(PoolConfig::new(url).with_max_size(config.pool_max_size)).await?;
            info!(max_size = config.pool_max_size, "database pool ready");
            Ok(wire_service(
                Arc::new(DieselSegmentRepository::new(pool.clone())),
                Arc::new(DieselHistoryRepository::new(pool)),
                clock,
                config.history_policy,
            ))
        }
        None => {
            warn!("no database URL configured; segments and history are kept in memory");
            let store = Arc::new(InMemorySegmentStore::new());
            Ok(wire_service(
                store.clone(),
                store,
                clock,
                config.history_policy,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use rstest::rstest;
    use user_segmentation::domain::ports::ChangeUserSegmentsRequest;
    use user_segmentation::domain::UserId;

    use super::*;

    fn in_memory_config() -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_url: None,
            pool_max_size: 1,
            history_policy: PartialHistoryPolicy::SkipOnFailure,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn in_memory_state_shares_one_store() {
        let state = build_http_state(&in_memory_config())
            .await
            .expect("in-memory state");

        state
            .segments
            .create_segment("AVITO_VOICE_MESSAGES".to_owned())
            .await
            .expect("create segment");
        let errors = state
            .membership
            .change_user_segments(ChangeUserSegmentsRequest {
                user_id: UserId::new(1000),
                add: vec!["AVITO_VOICE_MESSAGES".to_owned()],
                remove: Vec::new(),
            })
            .await
            .expect("change segments");
        assert!(errors.is_empty());

        let segments = state
            .membership_query
            .user_segments(UserId::new(1000))
            .await
            .expect("list segments");
        assert_eq!(segments.len(), 1);
    }
}

//! Session aggregation
//!
//! Builds `SessionWithDetails` read-models by joining a session with its
//! activity, spot and bookings. A dangling activity or spot reference
//! leaves the field empty instead of failing the join.

use futures::future::join_all;
use tracing::debug;

use crate::gateway::{BookingGateway, GatewayError, GatewayResult};
use crate::models::{Session, SessionWithDetails};

/// Treat a missing joined record as absent
fn optional<T>(result: GatewayResult<T>) -> GatewayResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(GatewayError::NotFound { kind, id }) => {
            debug!("Joined {} {} is missing", kind, id);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Resolve the references of an already loaded session
pub async fn resolve<G>(gateway: &G, session: Session) -> GatewayResult<SessionWithDetails>
where
    G: BookingGateway + ?Sized,
{
    let (activity, spot, customer_sessions) = futures::join!(
        gateway.get_activity_by_id(&session.activity),
        gateway.get_spot_by_id(&session.spot),
        gateway.customer_sessions_for(&session.id),
    );

    Ok(SessionWithDetails {
        activity: optional(activity)?,
        spot: optional(spot)?,
        customer_sessions: customer_sessions?,
        session,
    })
}

/// Build the read-model for one session
pub async fn aggregate<G>(gateway: &G, session_id: &str) -> GatewayResult<SessionWithDetails>
where
    G: BookingGateway + ?Sized,
{
    let session = gateway.get_session_by_id(session_id).await?;
    resolve(gateway, session).await
}

/// Build the read-model for every session, resolving them concurrently.
///
/// Output order follows the gateway's session order.
pub async fn aggregate_all<G>(gateway: &G) -> GatewayResult<Vec<SessionWithDetails>>
where
    G: BookingGateway + ?Sized,
{
    let sessions = gateway.fetch_sessions().await?;
    let count = sessions.len();

    let resolved = join_all(sessions.into_iter().map(|session| resolve(gateway, session))).await;
    let details = resolved.into_iter().collect::<GatewayResult<Vec<_>>>()?;

    debug!("Aggregated {} sessions", count);
    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::db::{queries, Database};
    use crate::fixtures::{activity, booking, session_on, spot};
    use crate::gateway::SqliteGateway;
    use crate::models::CustomerStatus;

    async fn seeded() -> SqliteGateway {
        let gateway = SqliteGateway::new(Arc::new(Database::in_memory().unwrap()));
        gateway.create_activity(activity("a1", "Kayak")).await.unwrap();
        gateway.create_spot(spot("p1", "Calanques")).await.unwrap();
        gateway.create_session(session_on("s1", 2024, 6, 5)).await.unwrap();
        gateway.create_session(session_on("s2", 2024, 7, 1)).await.unwrap();
        gateway
            .create_customer_session(booking("c1", "s1", 2, 120.0, CustomerStatus::Waiting))
            .await
            .unwrap();
        gateway
    }

    #[tokio::test]
    async fn test_aggregate_joins_all_references() {
        let gateway = seeded().await;
        let item = aggregate(&gateway, "s1").await.unwrap();

        assert_eq!(item.activity_name(), Some("Kayak"));
        assert_eq!(item.spot_name(), Some("Calanques"));
        assert_eq!(item.customer_sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_activity_yields_empty_field() {
        let gateway = seeded().await;
        // Bypass the reference check to leave a dangling activity id
        gateway
            .database()
            .with_connection(|conn| queries::delete_activity(conn, "a1"))
            .unwrap();

        let item = aggregate(&gateway, "s1").await.unwrap();
        assert!(item.activity.is_none());
        assert_eq!(item.spot_name(), Some("Calanques"));
    }

    #[tokio::test]
    async fn test_missing_session_is_not_found() {
        let gateway = seeded().await;
        assert!(matches!(
            aggregate(&gateway, "nope").await,
            Err(GatewayError::NotFound { kind: "session", .. })
        ));
    }

    #[tokio::test]
    async fn test_aggregate_all_keeps_session_order() {
        let gateway = seeded().await;
        let all = aggregate_all(&gateway).await.unwrap();

        let ids: Vec<&str> = all.iter().map(|d| d.session.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2"]);
        assert!(all[1].customer_sessions.is_empty());
    }
}

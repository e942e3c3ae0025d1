//! Best-effort webhook relay to an external workflow endpoint.
//!
//! Delivery is fire-and-forget: the engine spawns a detached task per
//! fired plan and never awaits it. The outcome only moves a shared
//! connection-status flag; it cannot fail a tick, and the local log entry
//! is written whether or not delivery succeeds.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::context::MemberContext;
use crate::member::{Member, MembershipType};
use crate::plan::AutomationPlan;

/// Hard timeout on one relay request.
const RELAY_TIMEOUT: Duration = Duration::from_secs(2);

/// Last observed state of the external endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// No delivery attempted yet.
    Unknown,
    Connected,
    /// Network failure or timeout.
    Disconnected,
    /// Endpoint reachable but returned a non-2xx status.
    Error,
}

/// Reduced member projection sent on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberProjection {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub membership_type: MembershipType,
    pub expiry_date: NaiveDate,
}

impl From<&Member> for MemberProjection {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            phone: m.phone.clone(),
            email: m.email.clone(),
            membership_type: m.membership_type,
            expiry_date: m.expiry_date,
        }
    }
}

/// Reduced context projection sent on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextProjection {
    pub days_until_expiry: i64,
    pub engagement_score: u8,
    pub is_vip: bool,
}

impl From<&MemberContext> for ContextProjection {
    fn from(ctx: &MemberContext) -> Self {
        Self {
            days_until_expiry: ctx.days_until_expiry,
            engagement_score: ctx.engagement_score,
            is_vip: ctx.is_vip,
        }
    }
}

/// One outbound relay body.
#[derive(Debug, Clone, Serialize)]
pub struct RelayPayload {
    pub source: &'static str,
    pub plan: AutomationPlan,
    pub member: Option<MemberProjection>,
    pub context: ContextProjection,
}

impl RelayPayload {
    pub fn new(plan: &AutomationPlan, member: Option<&Member>, ctx: &MemberContext) -> Self {
        Self {
            source: "gymflow",
            plan: plan.clone(),
            member: member.map(MemberProjection::from),
            context: ContextProjection::from(ctx),
        }
    }
}

/// Handle to the relay endpoint. Cheap to clone; clones share the
/// connection-status flag.
#[derive(Debug, Clone)]
pub struct WebhookRelay {
    client: reqwest::Client,
    base_url: String,
    status: Arc<Mutex<ConnectionStatus>>,
}

impl WebhookRelay {
    /// Build a relay against `base_url` (no trailing slash needed).
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(RELAY_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            status: Arc::new(Mutex::new(ConnectionStatus::Unknown)),
        })
    }

    /// Last observed endpoint status.
    pub fn status(&self) -> ConnectionStatus {
        self.status
            .lock()
            .map(|s| *s)
            .unwrap_or(ConnectionStatus::Unknown)
    }

    /// Fire-and-forget delivery. Spawns a detached task; never blocks the
    /// caller and never propagates failure. Without a tokio runtime the
    /// delivery is dropped (status flag untouched).
    pub fn dispatch(&self, workflow_id: &str, payload: RelayPayload) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            eprintln!("relay: no async runtime, skipping delivery to {workflow_id}");
            return;
        };
        let relay = self.clone();
        let workflow_id = workflow_id.to_string();
        handle.spawn(async move {
            relay.deliver(&workflow_id, &payload).await;
        });
    }

    /// Perform one delivery attempt and record the resulting status.
    ///
    /// Exposed so tests (and callers that want to await delivery) can
    /// observe the outcome; `dispatch` is this wrapped in a spawned task.
    pub async fn deliver(&self, workflow_id: &str, payload: &RelayPayload) -> ConnectionStatus {
        let url = format!("{}/webhook/{}", self.base_url, workflow_id);
        let body = json!(payload);

        let status = match self.client.post(&url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => ConnectionStatus::Connected,
            Ok(resp) => {
                eprintln!("relay: {url} returned HTTP {}", resp.status());
                ConnectionStatus::Error
            }
            Err(err) => {
                eprintln!("relay: {url} unreachable: {err}");
                ConnectionStatus::Disconnected
            }
        };

        if let Ok(mut flag) = self.status.lock() {
            *flag = status;
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::MemberStatus;
    use crate::plan::{default_catalog, PlanId};
    use chrono::{TimeZone, Utc};

    fn payload() -> RelayPayload {
        let plan = default_catalog()
            .into_iter()
            .find(|p| p.id == PlanId::ExpiryReminder7d)
            .unwrap();
        let now = Utc.with_ymd_and_hms(2026, 8, 31, 12, 0, 0).unwrap();
        let mut ctx = MemberContext::placeholder(now);
        ctx.member_id = "m-1".to_string();
        ctx.member_name = "Han Sohee".to_string();
        ctx.status = MemberStatus::Active;
        ctx.days_until_expiry = 7;
        ctx.engagement_score = 80;
        RelayPayload::new(&plan, None, &ctx)
    }

    #[test]
    fn payload_serializes_expected_shape() {
        let body = serde_json::to_value(payload()).unwrap();
        assert_eq!(body["source"], "gymflow");
        assert_eq!(body["plan"]["id"], "retention_001");
        assert_eq!(body["context"]["days_until_expiry"], 7);
        assert_eq!(body["context"]["engagement_score"], 80);
        assert!(body["member"].is_null());
    }

    #[tokio::test]
    async fn successful_delivery_sets_connected() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/webhook/wf_expiry_7d")
            .with_status(200)
            .create_async()
            .await;

        let relay = WebhookRelay::new(server.url()).unwrap();
        assert_eq!(relay.status(), ConnectionStatus::Unknown);

        let status = relay.deliver("wf_expiry_7d", &payload()).await;
        assert_eq!(status, ConnectionStatus::Connected);
        assert_eq!(relay.status(), ConnectionStatus::Connected);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_2xx_sets_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/webhook/wf_expiry_7d")
            .with_status(500)
            .create_async()
            .await;

        let relay = WebhookRelay::new(server.url()).unwrap();
        let status = relay.deliver("wf_expiry_7d", &payload()).await;
        assert_eq!(status, ConnectionStatus::Error);
    }

    #[tokio::test]
    async fn unreachable_endpoint_sets_disconnected() {
        // Nothing listens on this port.
        let relay = WebhookRelay::new("http://127.0.0.1:9").unwrap();
        let status = relay.deliver("wf_x", &payload()).await;
        assert_eq!(status, ConnectionStatus::Disconnected);
        assert_eq!(relay.status(), ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn status_is_shared_across_clones() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/webhook/wf_x")
            .with_status(204)
            .create_async()
            .await;

        let relay = WebhookRelay::new(server.url()).unwrap();
        let clone = relay.clone();
        clone.deliver("wf_x", &payload()).await;
        assert_eq!(relay.status(), ConnectionStatus::Connected);
    }
}

//! `reqwest`-backed implementation of [`BackendGateway`].

use super::auth::TokenProvider;
use super::models::{
    AssignUnitRequest, AssignUnitResponse, AssignmentStatusRequest, CandidatesBundle,
    PendingInterventionsBundle, StaticDataBundle, UnitStatusRequest,
};
use super::{BackendGateway, CandidatesResult, GatewayError, StaticDataResult};
use crate::domain::{AssignmentRole, PendingIntervention};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Per-call timeout policy (spec.md §5): connect, read and write apply to
/// their respective HTTP verbs — GETs use the read timeout, POST/PATCH use
/// the write timeout — while the client's connect timeout always applies.
#[derive(Debug, Clone, Copy)]
pub struct GatewayTimeouts {
    pub connect: Duration,
    pub read: Duration,
    pub write: Duration,
}

impl Default for GatewayTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            read: Duration::from_secs(30),
            write: Duration::from_secs(10),
        }
    }
}

pub struct ReqwestBackendGateway {
    base_url: String,
    client: Client,
    tokens: Arc<TokenProvider>,
    timeouts: GatewayTimeouts,
}

impl ReqwestBackendGateway {
    pub fn new(base_url: impl Into<String>, tokens: Arc<TokenProvider>, timeouts: GatewayTimeouts) -> Self {
        let client = Client::builder()
            .connect_timeout(timeouts.connect)
            .build()
            .expect("reqwest client configuration is valid");

        Self {
            base_url: base_url.into(),
            client,
            tokens,
            timeouts,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.tokens.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, GatewayError> {
        let builder = self
            .client
            .get(self.url(path))
            .timeout(self.timeouts.read);
        let builder = self.authorize(builder).await;

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Unavailable(format!(
                "status {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }

    async fn write_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let builder = self
            .client
            .request(method, self.url(path))
            .timeout(self.timeouts.write)
            .json(body);
        let builder = self.authorize(builder).await;

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Unavailable(format!(
                "status {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }

    async fn write_no_content<B: serde::Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<(), GatewayError> {
        let builder = self
            .client
            .request(method, self.url(path))
            .timeout(self.timeouts.write)
            .json(body);
        let builder = self.authorize(builder).await;

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        match response.status() {
            s if s.is_success() => Ok(()),
            s => Err(GatewayError::Unavailable(format!("status {s}"))),
        }
    }
}

#[async_trait]
impl BackendGateway for ReqwestBackendGateway {
    async fn get_static_data(&self) -> Option<StaticDataResult> {
        match self.get_json::<StaticDataBundle>("/v1/dispatch/static").await {
            Ok(bundle) => Some(StaticDataResult {
                config: bundle.config,
                unit_types: bundle.unit_types,
                event_types: bundle.event_types,
                bases: bundle.bases,
            }),
            Err(err) => {
                tracing::warn!(error = %err, "static data fetch failed");
                None
            }
        }
    }

    async fn get_candidates(&self, intervention_id: &str) -> Option<CandidatesResult> {
        let path = format!("/v1/interventions/{intervention_id}/candidates");
        match self.get_json::<CandidatesBundle>(&path).await {
            Ok(bundle) => Some(CandidatesResult {
                event_severity: bundle.event_severity,
                recommended_unit_types: bundle.recommended_unit_types,
                candidates: bundle.candidates,
            }),
            Err(err) => {
                tracing::warn!(error = %err, intervention_id, "candidates fetch failed");
                None
            }
        }
    }

    async fn get_pending_interventions(&self) -> Option<Vec<PendingIntervention>> {
        match self
            .get_json::<PendingInterventionsBundle>("/v1/dispatch/pending")
            .await
        {
            Ok(bundle) => Some(bundle.interventions),
            Err(err) => {
                tracing::warn!(error = %err, "pending interventions fetch failed");
                None
            }
        }
    }

    async fn assign_unit(
        &self,
        intervention_id: &str,
        unit_id: &str,
        role: AssignmentRole,
    ) -> Option<String> {
        let path = format!("/v1/interventions/{intervention_id}/assignments");
        let body = AssignUnitRequest {
            unit_id,
            role: role.as_str(),
        };
        match self
            .write_json::<_, AssignUnitResponse>(reqwest::Method::POST, &path, &body)
            .await
        {
            Ok(response) => Some(response.id),
            Err(err) => {
                tracing::warn!(error = %err, intervention_id, unit_id, "assignment failed");
                None
            }
        }
    }

    async fn release_assignment(&self, assignment_id: &str) -> bool {
        let path = format!("/v1/assignments/{assignment_id}/status");
        let body = AssignmentStatusRequest { status: "released" };
        match self
            .write_no_content(reqwest::Method::PATCH, &path, &body)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, assignment_id, "release failed");
                false
            }
        }
    }

    async fn update_unit_status(&self, unit_id: &str, status: &str) -> bool {
        let path = format!("/v1/units/{unit_id}/status");
        let body = UnitStatusRequest { status };
        match self
            .write_no_content(reqwest::Method::PATCH, &path, &body)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, unit_id, "unit status update failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Base, ConfigItem, EventType, UnitType};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> ReqwestBackendGateway {
        let tokens = Arc::new(TokenProvider::disabled(Client::new()));
        ReqwestBackendGateway::new(server.uri(), tokens, GatewayTimeouts::default())
    }

    #[tokio::test]
    async fn get_static_data_parses_bundle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/dispatch/static"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "config": [{"key": "weight_travel_time", "value": 2.0}],
                "unit_types": [{"code": "FPT", "label": "Fire Pumper", "capabilities": []}],
                "event_types": [{"code": "FIRE", "label": "Fire", "recommended_unit_types": ["FPT"]}],
                "bases": [{"code": "B1", "label": "Base One", "reserve_target": 2}]
            })))
            .mount(&server)
            .await;

        let gw = gateway(&server);
        let result = gw.get_static_data().await.expect("bundle");
        assert_eq!(result.config.len(), 1);
        assert_eq!(result.unit_types, vec![UnitType {
            code: "FPT".to_string(),
            label: "Fire Pumper".to_string(),
            capabilities: vec![],
            nominal_speed_kmh: None,
        }]);
        assert_eq!(result.event_types, vec![EventType {
            code: "FIRE".to_string(),
            label: "Fire".to_string(),
            recommended_unit_types: vec!["FPT".to_string()],
        }]);
        assert_eq!(result.bases, vec![Base {
            code: "B1".to_string(),
            label: "Base One".to_string(),
            reserve_target: 2,
        }]);
        let _ = ConfigItem { key: "x".into(), value: 0.0 };
    }

    #[tokio::test]
    async fn get_static_data_returns_none_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/dispatch/static"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let gw = gateway(&server);
        assert!(gw.get_static_data().await.is_none());
    }

    #[tokio::test]
    async fn assign_unit_posts_expected_body_and_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/interventions/INT-1/assignments"))
            .and(body_json(serde_json::json!({"unit_id": "U1", "role": "lead"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "ASG-1"})))
            .mount(&server)
            .await;

        let gw = gateway(&server);
        let id = gw.assign_unit("INT-1", "U1", AssignmentRole::Lead).await;
        assert_eq!(id, Some("ASG-1".to_string()));
    }

    #[tokio::test]
    async fn release_assignment_reports_failure_as_false() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/assignments/ASG-1/status"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let gw = gateway(&server);
        assert!(!gw.release_assignment("ASG-1").await);
    }
}

// Two-phase confirmation state machine for "delete all data".
//
// Idle -> PreviewRequested -> Confirming -> Deleting -> Result -> Idle
//
// The preview request never mutates anything; only the confirmed request
// does. A failure at any step lands back in a dialog state carrying an
// error message, and retries are user-triggered re-invocations.

use serde::{Deserialize, Serialize};

use crate::backend::{BackendClient, DeletePreviewResponse, DeleteResultResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum DeleteFlowState {
    Idle,
    /// Count preview in flight
    PreviewRequested,
    /// Dialog open, showing what a confirmed deletion would remove
    Confirming {
        preview: DeletePreviewResponse,
        error: Option<String>,
    },
    /// Confirmed deletion in flight
    Deleting,
    /// Per-store breakdown of what happened
    Result { result: DeleteResultResponse },
}

impl DeleteFlowState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DeleteFlowState::Idle)
    }
}

/// Drives the state machine against the backend. Holds no backend data of
/// its own; only the current phase.
pub struct DeleteFlow {
    state: DeleteFlowState,
}

impl DeleteFlow {
    pub fn new() -> Self {
        Self {
            state: DeleteFlowState::Idle,
        }
    }

    pub fn state(&self) -> &DeleteFlowState {
        &self.state
    }

    /// Phase one: fetch the counts a confirmed deletion would remove. On
    /// failure the flow resets to Idle and the error message is handed to
    /// the caller to display.
    pub async fn request_preview(
        &mut self,
        client: &BackendClient,
    ) -> Result<DeleteFlowState, String> {
        self.state = DeleteFlowState::PreviewRequested;
        match client.delete_all_preview().await {
            Ok(preview) => {
                self.state = DeleteFlowState::Confirming {
                    preview,
                    error: None,
                };
                Ok(self.state.clone())
            }
            Err(e) => {
                log::error!("Delete preview failed: {}", e);
                self.state = DeleteFlowState::Idle;
                Err(format!("Failed to get data preview. {}", e))
            }
        }
    }

    /// Phase two: the mutating request. Only legal from Confirming.
    pub async fn confirm(&mut self, client: &BackendClient) -> DeleteFlowState {
        let DeleteFlowState::Confirming { preview, .. } = self.state.clone() else {
            log::warn!("Confirm requested outside the Confirming phase, ignoring");
            return self.state.clone();
        };

        self.state = DeleteFlowState::Deleting;
        match client.delete_all_confirm().await {
            Ok(result) => {
                if result.success {
                    log::info!("Delete-all completed: {}", result.message);
                } else {
                    log::warn!("Delete-all partially failed: {}", result.message);
                }
                self.state = DeleteFlowState::Result { result };
            }
            Err(e) => {
                log::error!("Delete confirmation failed: {}", e);
                // Back to the dialog with the error attached; no auto-retry
                self.state = DeleteFlowState::Confirming {
                    preview,
                    error: Some(format!("Failed to delete data. {}", e)),
                };
            }
        }
        self.state.clone()
    }

    /// Close the dialog from any phase.
    pub fn dismiss(&mut self) -> DeleteFlowState {
        self.state = DeleteFlowState::Idle;
        self.state.clone()
    }
}

impl Default for DeleteFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendConfig;

    fn unreachable_client() -> BackendClient {
        BackendClient::new(BackendConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
        })
    }

    fn confirming_state() -> DeleteFlowState {
        let preview: DeletePreviewResponse = serde_json::from_str(
            r#"{
                "success": false,
                "message": "Confirmation required. This will delete all data permanently.",
                "data_to_delete": {"postgresql_photos": 4, "pinecone_vectors": 4},
                "confirmation_required": true
            }"#,
        )
        .unwrap();
        DeleteFlowState::Confirming {
            preview,
            error: None,
        }
    }

    #[tokio::test]
    async fn test_preview_failure_returns_to_idle_with_message() {
        let mut flow = DeleteFlow::new();
        let err = flow.request_preview(&unreachable_client()).await.unwrap_err();
        assert!(err.starts_with("Failed to get data preview."));
        assert!(flow.state().is_idle());
    }

    #[tokio::test]
    async fn test_confirm_outside_confirming_is_ignored() {
        let mut flow = DeleteFlow::new();
        let state = flow.confirm(&unreachable_client()).await;
        assert!(state.is_idle());
    }

    #[tokio::test]
    async fn test_failed_confirm_returns_to_dialog_with_error() {
        let mut flow = DeleteFlow::new();
        flow.state = confirming_state();

        let state = flow.confirm(&unreachable_client()).await;
        match state {
            DeleteFlowState::Confirming { preview, error } => {
                assert_eq!(preview.data_to_delete.postgresql_photos, 4);
                assert!(error.unwrap().starts_with("Failed to delete data."));
            }
            other => panic!("expected Confirming, got {:?}", other),
        }
    }

    #[test]
    fn test_dismiss_resets_to_idle() {
        let mut flow = DeleteFlow::new();
        flow.state = confirming_state();
        assert!(flow.dismiss().is_idle());
    }

    #[test]
    fn test_state_serializes_with_phase_tag() {
        let json = serde_json::to_value(DeleteFlowState::Idle).unwrap();
        assert_eq!(json["phase"], "idle");
        let json = serde_json::to_value(&confirming_state()).unwrap();
        assert_eq!(json["phase"], "confirming");
    }
}

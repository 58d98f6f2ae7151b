//! RequestFinalApprovalHandler - asks for the second approval.

use std::sync::Arc;

use crate::application::services::{TransitionOutcome, WorkflowEngine};
use crate::domain::document::WorkflowError;
use crate::domain::foundation::{CommandMetadata, DocumentId};
use crate::domain::workflow::TransitionRequest;

#[derive(Debug, Clone)]
pub struct RequestFinalApprovalCommand {
    pub document_id: DocumentId,
}

pub struct RequestFinalApprovalHandler {
    engine: Arc<WorkflowEngine>,
}

impl RequestFinalApprovalHandler {
    pub fn new(engine: Arc<WorkflowEngine>) -> Self {
        Self { engine }
    }

    pub async fn handle(
        &self,
        cmd: RequestFinalApprovalCommand,
        metadata: CommandMetadata,
    ) -> Result<TransitionOutcome, WorkflowError> {
        self.engine
            .transition(cmd.document_id, TransitionRequest::RequestFinalApproval, &metadata)
            .await
    }
}

//! Send-payment tool definition.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domains::ledger::{PaymentRequest, TransactionOutcome, TransactionRequest};
use crate::domains::network::{Network, NetworkRegistry};
use crate::domains::tools::definitions::common::{
    algos_to_micro, note_bytes, submit, transaction_lines, validate_address,
    validate_optional_address,
};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the payment tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSendParams {
    /// The Algorand address sending the payment.
    pub sender: String,

    /// The Algorand address receiving the payment.
    pub receiver: String,

    /// The amount of Algos to send.
    pub amount: f64,

    /// Optional note to include with the transaction.
    #[serde(default)]
    pub note: Option<String>,

    /// Optional address to close the remainder of the sender's account to.
    #[serde(default)]
    pub close_remainder_to: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

pub struct PaymentSendTool {
    registry: Arc<NetworkRegistry>,
}

#[derive(Debug)]
pub struct PaymentReceipt {
    pub network: Network,
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
    pub outcome: TransactionOutcome,
}

#[async_trait]
impl ToolDefinition for PaymentSendTool {
    const NAME: &'static str = "payment_send";
    const DESCRIPTION: &'static str = "Send Algos from one account to another";
    const FAILURE_CONTEXT: &'static str = "Error sending payment";

    type Params = PaymentSendParams;
    type Output = PaymentReceipt;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(amount = params.amount))]
    async fn run(&self, params: PaymentSendParams) -> Result<PaymentReceipt, ToolError> {
        let request = PaymentRequest {
            sender: validate_address("sender", &params.sender)?,
            receiver: validate_address("receiver", &params.receiver)?,
            amount: algos_to_micro("amount", params.amount)?,
            close_remainder_to: validate_optional_address(
                "closeRemainderTo",
                params.close_remainder_to.as_deref(),
            )?,
            note: note_bytes(params.note.as_deref()),
        };
        let (sender, receiver) = (request.sender.clone(), request.receiver.clone());

        let (network, outcome) =
            submit(&self.registry, TransactionRequest::Payment(request)).await?;
        info!("Payment {} confirmed on {}", outcome.tx_id, network);

        Ok(PaymentReceipt {
            network,
            sender,
            receiver,
            amount: params.amount,
            outcome,
        })
    }

    fn render(output: &PaymentReceipt) -> String {
        let mut lines = vec![
            "Payment Transaction Successful:".to_string(),
            String::new(),
            format!("Network: {}", output.network),
            format!("From: {}", output.sender),
            format!("To: {}", output.receiver),
            format!("Amount: {} Algos", output.amount),
            String::new(),
            "Transaction Details:".to_string(),
        ];
        lines.extend(transaction_lines(&output.outcome));
        lines.join("\n")
    }
}

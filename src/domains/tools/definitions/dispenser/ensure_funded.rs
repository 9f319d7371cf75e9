//! Ensure-funded tool definition.
//!
//! Tops an account up from the LocalNet dispenser. The network scope is
//! checked before any client call, so nothing is sent from other networks.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domains::ledger::FundingReceipt;
use crate::domains::network::{Network, NetworkRegistry};
use crate::domains::tools::definitions::common::{
    algos_to_micro, format_round, validate_address,
};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the ensure-funded tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DispenserEnsureFundedParams {
    /// The Algorand address to fund.
    pub address: String,

    /// The minimum balance in Algos to ensure.
    pub amount: f64,
}

pub struct DispenserEnsureFundedTool {
    registry: Arc<NetworkRegistry>,
}

#[derive(Debug)]
pub struct FundingResult {
    pub address: String,
    pub amount: f64,
    /// `None` when the account already held enough.
    pub receipt: Option<FundingReceipt>,
}

#[async_trait]
impl ToolDefinition for DispenserEnsureFundedTool {
    const NAME: &'static str = "dispenser_ensure_funded";
    const DESCRIPTION: &'static str =
        "Ensure an account has sufficient funds using the LocalNet dispenser";
    const FAILURE_CONTEXT: &'static str = "Error funding account";

    type Params = DispenserEnsureFundedParams;
    type Output = FundingResult;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(address = %params.address, amount = params.amount))]
    async fn run(&self, params: DispenserEnsureFundedParams) -> Result<FundingResult, ToolError> {
        self.registry
            .require("Dispenser funding", Network::Localnet)?;
        let address = validate_address("address", &params.address)?;
        let min_balance = algos_to_micro("amount", params.amount)?;

        let receipt = self
            .registry
            .client_for(Network::Localnet)
            .ensure_funded(&address, min_balance)
            .await?;
        if receipt.is_none() {
            info!("{} already holds at least {}", address, min_balance);
        }

        Ok(FundingResult {
            address,
            amount: params.amount,
            receipt,
        })
    }

    fn render(output: &FundingResult) -> String {
        let Some(receipt) = &output.receipt else {
            return format!(
                "Account {} already has sufficient funds ({} Algos).",
                output.address, output.amount
            );
        };
        [
            "Funding Operation Successful:".to_string(),
            String::new(),
            format!("Account: {}", output.address),
            format!("Amount: {} Algos", output.amount),
            String::new(),
            "Transaction Details:".to_string(),
            format!(
                "Transaction Group ID: {}",
                receipt.group_id.as_deref().unwrap_or("N/A")
            ),
            format!("Transaction IDs: {}", receipt.tx_ids.join(", ")),
            format!("Confirmation Round: {}", format_round(receipt.confirmed_round)),
            "Transaction Type: Payment".to_string(),
            format!("Sender: {}", receipt.sender),
            String::new(),
            "Note: The account now has sufficient funds for operations.".to_string(),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::ledger::testing::{DISPENSER_ADDRESS, MockNetworks};
    use crate::domains::tools::definitions::test_support::{ALICE, call, is_error, text};

    fn args(amount: f64) -> serde_json::Value {
        serde_json::json!({ "address": ALICE, "amount": amount })
    }

    #[tokio::test]
    async fn test_funds_on_localnet() {
        let mocks = MockNetworks::new();
        let result = call::<DispenserEnsureFundedTool>(&mocks, Network::Localnet, args(10.0)).await;

        assert!(!is_error(&result));
        let message = text(&result);
        assert!(message.starts_with("Funding Operation Successful:"));
        assert!(message.contains("Amount: 10 Algos"));
        assert!(message.contains("Transaction Group ID: N/A"));
        assert!(message.contains("Transaction IDs: TESTTXID"));
        assert!(message.contains("Confirmation Round: 42"));
        assert!(message.contains(&format!("Sender: {}", DISPENSER_ADDRESS)));
    }

    #[tokio::test]
    async fn test_already_funded() {
        let mocks = MockNetworks::new();
        mocks.localnet.set_already_funded(true);
        let result = call::<DispenserEnsureFundedTool>(&mocks, Network::Localnet, args(1.5)).await;

        assert_eq!(
            text(&result),
            format!("Account {} already has sufficient funds (1.5 Algos).", ALICE)
        );
    }

    #[tokio::test]
    async fn test_rejected_off_localnet_without_delegation() {
        for network in [Network::Testnet, Network::Mainnet] {
            let mocks = MockNetworks::new();
            let result = call::<DispenserEnsureFundedTool>(&mocks, network, args(1.0)).await;

            assert!(is_error(&result));
            assert_eq!(
                text(&result),
                format!(
                    "Error funding account: Dispenser funding is only available on localnet. Current network: {}",
                    network
                )
            );
            assert_eq!(mocks.total_calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_negative_amount() {
        let mocks = MockNetworks::new();
        let result = call::<DispenserEnsureFundedTool>(&mocks, Network::Localnet, args(-1.0)).await;

        assert!(is_error(&result));
        assert_eq!(mocks.total_calls(), 0);
    }
}

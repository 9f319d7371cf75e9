//! Result rendering shared by the application tools.

use crate::domains::ledger::{OnComplete, TransactionOutcome};
use crate::domains::tools::definitions::common::{
    render_abi_return, render_logs, transaction_lines,
};

/// Which kind of application transaction was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Create,
    Update,
    Delete,
    Call,
}

impl AppAction {
    fn actor(self) -> &'static str {
        match self {
            AppAction::Create => "Creator",
            AppAction::Update => "Updater",
            AppAction::Delete => "Deleter",
            AppAction::Call => "Caller",
        }
    }
}

/// Typed result of an application tool.
#[derive(Debug)]
pub struct AppReceipt {
    pub action: AppAction,
    /// Target application; `None` on create, where the outcome carries it.
    pub app_id: Option<u64>,
    pub sender: String,
    /// ABI method signature, for method calls.
    pub method: Option<String>,
    /// Arguments as the caller gave them.
    pub arguments: Vec<String>,
    pub on_complete: OnComplete,
    pub outcome: TransactionOutcome,
}

impl AppReceipt {
    fn heading(&self) -> &'static str {
        match (self.action, self.method.is_some()) {
            (AppAction::Create, _) => "Application Created Successfully:",
            (AppAction::Update, _) => "Application Updated Successfully:",
            (AppAction::Delete, _) => "Application Deleted Successfully:",
            (AppAction::Call, true) => "Application Method Call Successful:",
            (AppAction::Call, false) => "Application Call Successful:",
        }
    }

    pub fn render(&self) -> String {
        let app_id = self
            .app_id
            .or(self.outcome.app_id)
            .map_or_else(|| "unknown".to_string(), |id| id.to_string());

        let mut lines = vec![
            self.heading().to_string(),
            String::new(),
            format!("Application ID: {}", app_id),
            format!("{}: {}", self.action.actor(), self.sender),
        ];
        if let Some(method) = &self.method {
            let label = if self.action == AppAction::Call {
                "Method"
            } else {
                "Method Called"
            };
            lines.push(format!("{}: {}", label, method));
        }
        let arguments = if self.arguments.is_empty() {
            "None".to_string()
        } else {
            self.arguments.join(", ")
        };
        lines.push(format!("Arguments: {}", arguments));
        lines.push(format!("On Complete: {}", self.on_complete));
        lines.push(String::new());
        lines.push("Transaction Details:".to_string());
        lines.extend(transaction_lines(&self.outcome));
        lines.push(String::new());
        lines.extend(render_abi_return(self.outcome.abi_return.as_ref()));
        lines.push(String::new());
        lines.extend(render_logs(&self.outcome.logs));
        lines.join("\n")
    }
}

//! Common utilities shared across tool modules.
//!
//! Input validation helpers, the failure/hint formatting used at the handler
//! boundary, and renderers for confirmation data.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rmcp::model::{CallToolResult, Content};
use tracing::warn;

use crate::domains::ledger::{AbiReturn, MicroAlgos, TransactionOutcome, TransactionRequest};
use crate::domains::network::{Network, NetworkRegistry};
use crate::domains::tools::ToolError;

/// Algorand addresses are 58 characters of RFC 4648 base32.
const ADDRESS_LENGTH: usize = 58;

/// Known failure substrings and the hint shown with them.
const TROUBLESHOOTING_HINTS: [(&str, &str); 4] = [
    (
        "invalid ApplicationArgs index",
        "This error typically occurs when trying to access application arguments that weren't provided. Make sure you're passing the required arguments.",
    ),
    (
        "err opcode executed",
        "The contract explicitly rejected the transaction with an 'err' opcode. Check your TEAL logic and arguments.",
    ),
    (
        "return arg 0 wanted type uint64",
        "TEAL expects method returns to be properly formatted. For strings, use 'log' instead of direct returns, or implement proper ARC-4 return formatting.",
    ),
    (
        "program assembly failed",
        "There's a syntax error in your TEAL code. Check for typos, missing opcodes, or incorrect arguments.",
    ),
];

// ============================================================================
// Results
// ============================================================================

/// Hint for a recognised failure message.
pub fn troubleshooting_hint(message: &str) -> Option<&'static str> {
    TROUBLESHOOTING_HINTS
        .iter()
        .find(|(needle, _)| message.contains(needle))
        .map(|(_, hint)| *hint)
}

/// Error result of the form `"<context>: <cause>"`, plus a tip when one applies.
pub fn failure_result(context: &str, error: &ToolError) -> CallToolResult {
    let cause = error.to_string();
    let mut text = format!("{}: {}", context, cause);
    if let Some(hint) = troubleshooting_hint(&cause) {
        text.push_str("\n\nTip: ");
        text.push_str(hint);
    }
    CallToolResult::error(vec![Content::text(text)])
}

// ============================================================================
// Validation
// ============================================================================

/// Check that `value` has the shape of an Algorand address.
///
/// Only length and alphabet are checked; the checksum is left to the node.
pub fn validate_address(field: &str, value: &str) -> Result<String, ToolError> {
    let value = value.trim();
    let well_formed = value.len() == ADDRESS_LENGTH
        && value
            .chars()
            .all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c));
    if well_formed {
        Ok(value.to_string())
    } else {
        Err(ToolError::invalid_arguments(format!(
            "{} is not a valid Algorand address: '{}'",
            field, value
        )))
    }
}

/// Like [`validate_address`], treating an absent or empty value as `None`.
pub fn validate_optional_address(
    field: &str,
    value: Option<&str>,
) -> Result<Option<String>, ToolError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(address) => validate_address(field, address).map(Some),
    }
}

/// Parse a decimal application or asset id.
pub fn parse_id(field: &str, value: &str) -> Result<u64, ToolError> {
    value.trim().parse().map_err(|_| {
        ToolError::invalid_arguments(format!(
            "{} must be a numeric id, got '{}'",
            field, value
        ))
    })
}

/// Convert an Algo amount to microAlgos.
pub fn algos_to_micro(field: &str, algos: f64) -> Result<MicroAlgos, ToolError> {
    MicroAlgos::from_algos(algos).ok_or_else(|| {
        ToolError::invalid_arguments(format!(
            "{} must be a non-negative number of Algos, got {}",
            field, algos
        ))
    })
}

/// Notes are sent as UTF-8 bytes; an empty note is no note.
pub fn note_bytes(note: Option<&str>) -> Option<Vec<u8>> {
    note.filter(|n| !n.is_empty()).map(|n| n.as_bytes().to_vec())
}

// ============================================================================
// Delegation
// ============================================================================

/// Log a warning for write operations on mainnet.
pub fn warn_on_mainnet(network: Network, operation: &str) {
    if network == Network::Mainnet {
        warn!("{} requested on mainnet", operation);
    }
}

/// Send `request` through the active network's client.
pub async fn submit(
    registry: &NetworkRegistry,
    request: TransactionRequest,
) -> Result<(Network, TransactionOutcome), ToolError> {
    let network = registry.current_network();
    warn_on_mainnet(network, request.kind());
    let outcome = registry.client_for(network).submit(request).await?;
    Ok((network, outcome))
}

// ============================================================================
// Rendering
// ============================================================================

/// Confirmation round, or "Pending".
pub fn format_round(round: Option<u64>) -> String {
    round.map_or_else(|| "Pending".to_string(), |r| r.to_string())
}

/// `Transaction ID` and `Confirmation Round` lines.
pub fn transaction_lines(outcome: &TransactionOutcome) -> [String; 2] {
    [
        format!("Transaction ID: {}", outcome.tx_id),
        format!(
            "Confirmation Round: {}",
            format_round(outcome.confirmed_round)
        ),
    ]
}

/// Render one application log entry with its hex form.
///
/// UTF-8 logs are shown as text (pretty-printed when they hold JSON); other
/// logs are shown as base64.
pub fn render_log(log: &[u8]) -> String {
    let hex = hex::encode(log);
    match std::str::from_utf8(log) {
        Ok(decoded) => {
            let looks_like_json = (decoded.starts_with('{') && decoded.ends_with('}'))
                || (decoded.starts_with('[') && decoded.ends_with(']'));
            if looks_like_json {
                if let Some(pretty) = serde_json::from_str::<serde_json::Value>(decoded)
                    .ok()
                    .and_then(|v| serde_json::to_string_pretty(&v).ok())
                {
                    return format!("{} (hex: {})", pretty, hex);
                }
            }
            format!("{} (hex: {})", decoded, hex)
        }
        Err(_) => format!("Base64: {} (hex: {})", STANDARD.encode(log), hex),
    }
}

/// `Raw Transaction Logs:` section.
pub fn render_logs(logs: &[Vec<u8>]) -> Vec<String> {
    let mut lines = vec!["Raw Transaction Logs:".to_string()];
    if logs.is_empty() {
        lines.push("- No logs found in this transaction".to_string());
    } else {
        lines.extend(logs.iter().map(|log| format!("- {}", render_log(log))));
    }
    lines
}

/// ABI return section.
pub fn render_abi_return(abi_return: Option<&AbiReturn>) -> Vec<String> {
    match abi_return {
        Some(AbiReturn::Value { value, return_type }) => vec![
            "Method Return Value:".to_string(),
            value.to_string(),
            format!("Return Type: {}", return_type),
        ],
        Some(AbiReturn::DecodeError(e)) => vec![
            "Method Return Error:".to_string(),
            format!("Error decoding return value: {}", e),
        ],
        None => vec![
            "Method Return Value:".to_string(),
            "No return value".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::ledger::LedgerError;
    use crate::domains::tools::definitions::test_support::{ALICE, text};

    #[test]
    fn test_hints() {
        assert!(
            troubleshooting_hint("logic eval error: invalid ApplicationArgs index 0")
                .unwrap()
                .starts_with("This error typically occurs")
        );
        assert!(troubleshooting_hint("program assembly failed: line 3").is_some());
        assert!(troubleshooting_hint("overspend").is_none());
    }

    #[test]
    fn test_failure_result_without_hint() {
        let err = ToolError::from(LedgerError::rejected("overspend"));
        let result = failure_result("Error sending payment", &err);
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(text(&result), "Error sending payment: overspend");
    }

    #[test]
    fn test_validate_address() {
        assert_eq!(validate_address("sender", ALICE).unwrap(), ALICE);
        assert!(validate_address("sender", "alice").is_err());
        assert!(validate_address("sender", &ALICE.replace('A', "1")).is_err());
        let err = validate_address("receiver", "nope").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid arguments: receiver is not a valid Algorand address: 'nope'"
        );
    }

    #[test]
    fn test_optional_address_treats_empty_as_absent() {
        assert_eq!(validate_optional_address("manager", None).unwrap(), None);
        assert_eq!(validate_optional_address("manager", Some("")).unwrap(), None);
        assert_eq!(
            validate_optional_address("manager", Some(ALICE)).unwrap(),
            Some(ALICE.to_string())
        );
        assert!(validate_optional_address("manager", Some("x")).is_err());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("appId", " 1234 ").unwrap(), 1234);
        assert!(parse_id("appId", "-1").is_err());
        assert!(parse_id("appId", "abc").is_err());
    }

    #[test]
    fn test_algos_to_micro() {
        assert_eq!(algos_to_micro("amount", 0.5).unwrap(), MicroAlgos(500_000));
        assert!(algos_to_micro("amount", -0.5).is_err());
    }

    #[test]
    fn test_note_bytes() {
        assert_eq!(note_bytes(Some("hi")), Some(b"hi".to_vec()));
        assert_eq!(note_bytes(Some("")), None);
        assert_eq!(note_bytes(None), None);
    }

    #[test]
    fn test_render_log_variants() {
        assert_eq!(render_log(b"hello"), "hello (hex: 68656c6c6f)");
        assert_eq!(
            render_log(br#"{"a":1}"#),
            "{\n  \"a\": 1\n} (hex: 7b2261223a317d)"
        );
        assert_eq!(render_log(b"{oops}"), "{oops} (hex: 7b6f6f70737d)");
        assert_eq!(render_log(&[0xff, 0x00]), "Base64: /wA= (hex: ff00)");
    }

    #[test]
    fn test_render_logs_empty() {
        assert_eq!(
            render_logs(&[]),
            vec!["Raw Transaction Logs:", "- No logs found in this transaction"]
        );
    }

    #[test]
    fn test_render_abi_return() {
        let value = AbiReturn::Value {
            value: serde_json::json!(42),
            return_type: "uint64".into(),
        };
        assert_eq!(
            render_abi_return(Some(&value)),
            vec!["Method Return Value:", "42", "Return Type: uint64"]
        );
        assert_eq!(
            render_abi_return(Some(&AbiReturn::DecodeError("bad".into())))[1],
            "Error decoding return value: bad"
        );
        assert_eq!(render_abi_return(None)[1], "No return value");
    }

    #[test]
    fn test_format_round() {
        assert_eq!(format_round(Some(7)), "7");
        assert_eq!(format_round(None), "Pending");
    }
}

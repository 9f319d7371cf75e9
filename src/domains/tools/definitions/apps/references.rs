//! Parameter groups shared by every application tool, and their conversion
//! into the ledger request model.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::domains::ledger::{
    AppPrograms, BoxReference, OnComplete, StateSchema, TransactionReferences,
};
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{note_bytes, parse_id, validate_address};

/// Lowest TEAL version accepted for new or updated programs.
pub const MIN_TEAL_VERSION: u32 = 8;

/// Lease field length in bytes.
pub const LEASE_LENGTH: usize = 32;

// ============================================================================
// Parameter groups
// ============================================================================

/// On-completion actions a caller may choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, JsonSchema)]
pub enum OnCompleteParam {
    #[default]
    NoOp,
    OptIn,
    CloseOut,
}

impl From<OnCompleteParam> for OnComplete {
    fn from(value: OnCompleteParam) -> Self {
        match value {
            OnCompleteParam::NoOp => OnComplete::NoOp,
            OnCompleteParam::OptIn => OnComplete::OptIn,
            OnCompleteParam::CloseOut => OnComplete::CloseOut,
        }
    }
}

/// A box reference: a bare name, or a name with the owning application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum BoxReferenceParam {
    /// Box name of the called application (encoded as UTF-8 bytes).
    Name(String),
    Qualified {
        /// Box name (encoded as UTF-8 bytes).
        name: String,
        /// Application id as a decimal string (defaults to the called app).
        #[serde(default, rename = "appId")]
        app_id: Option<String>,
    },
}

/// Foreign references, note and lease.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceParams {
    /// Account addresses referenced by the transaction (`txna Accounts i`).
    #[serde(default)]
    pub account_references: Option<Vec<String>>,

    /// Application ids as decimal strings (`txna Applications i`).
    #[serde(default)]
    pub app_references: Option<Vec<String>>,

    /// Asset ids as decimal strings (`txna Assets i`).
    #[serde(default)]
    pub asset_references: Option<Vec<String>>,

    /// Box references for accessing application box storage.
    #[serde(default)]
    pub box_references: Option<Vec<BoxReferenceParam>>,

    /// Optional note to include with the transaction (encoded as UTF-8 bytes).
    #[serde(default)]
    pub note: Option<String>,

    /// Optional lease (base64, at most 32 bytes) enforcing mutual exclusion of transactions.
    #[serde(default)]
    pub lease: Option<String>,
}

impl ReferenceParams {
    /// Convert into the ledger representation, validating every entry.
    pub fn normalize(&self) -> Result<TransactionReferences, ToolError> {
        let accounts = self
            .account_references
            .iter()
            .flatten()
            .map(|a| validate_address("accountReferences", a))
            .collect::<Result<_, _>>()?;
        let apps = self
            .app_references
            .iter()
            .flatten()
            .map(|id| parse_id("appReferences", id))
            .collect::<Result<_, _>>()?;
        let assets = self
            .asset_references
            .iter()
            .flatten()
            .map(|id| parse_id("assetReferences", id))
            .collect::<Result<_, _>>()?;
        let boxes = self
            .box_references
            .iter()
            .flatten()
            .map(box_reference)
            .collect::<Result<_, _>>()?;
        let lease = match self.lease.as_deref() {
            None | Some("") => None,
            Some(lease) => Some(lease_bytes(lease)?),
        };

        Ok(TransactionReferences {
            accounts,
            apps,
            assets,
            boxes,
            note: note_bytes(self.note.as_deref()),
            lease,
        })
    }
}

fn box_reference(param: &BoxReferenceParam) -> Result<BoxReference, ToolError> {
    match param {
        BoxReferenceParam::Name(name) => Ok(BoxReference {
            app_id: 0,
            name: name.as_bytes().to_vec(),
        }),
        BoxReferenceParam::Qualified { name, app_id } => Ok(BoxReference {
            app_id: match app_id.as_deref() {
                None | Some("") => 0,
                Some(id) => parse_id("boxReferences.appId", id)?,
            },
            name: name.as_bytes().to_vec(),
        }),
    }
}

/// State allocation of a new application.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaParams {
    /// Number of global integer variables (default: 0, max: 64).
    #[serde(default)]
    pub global_ints: Option<u64>,

    /// Number of global byte slice variables (default: 0, max: 64).
    #[serde(default)]
    pub global_bytes: Option<u64>,

    /// Number of local integer variables per account (default: 0, max: 16).
    #[serde(default)]
    pub local_ints: Option<u64>,

    /// Number of local byte slice variables per account (default: 0, max: 16).
    #[serde(default)]
    pub local_bytes: Option<u64>,

    /// Number of extra 2KB program pages (default: 0, max: 3).
    #[serde(default)]
    pub extra_pages: Option<u32>,
}

impl SchemaParams {
    /// A schema is sent only when at least one count was given.
    pub fn schema(&self) -> Option<StateSchema> {
        let given = [
            self.global_ints,
            self.global_bytes,
            self.local_ints,
            self.local_bytes,
        ];
        if given.iter().all(Option::is_none) {
            return None;
        }
        Some(StateSchema {
            global_ints: self.global_ints.unwrap_or(0),
            global_byte_slices: self.global_bytes.unwrap_or(0),
            local_ints: self.local_ints.unwrap_or(0),
            local_byte_slices: self.local_bytes.unwrap_or(0),
        })
    }
}

/// Approval and clear-state TEAL sources.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgramParams {
    /// TEAL approval program (must declare `#pragma version 8` or higher).
    pub approval_program: String,

    /// TEAL clear state program (must declare `#pragma version 8` or higher).
    pub clear_state_program: String,
}

impl ProgramParams {
    /// Check both pragmas and hand the sources over.
    pub fn validate(&self) -> Result<AppPrograms, ToolError> {
        let supported = |source: &str| teal_version(source).is_some_and(|v| v >= MIN_TEAL_VERSION);
        if !supported(&self.approval_program) || !supported(&self.clear_state_program) {
            return Err(ToolError::invalid_arguments(format!(
                "TEAL code must use #pragma version {} or higher for both approval and clear state programs",
                MIN_TEAL_VERSION
            )));
        }
        Ok(AppPrograms {
            approval: self.approval_program.clone(),
            clear_state: self.clear_state_program.clone(),
        })
    }
}

// ============================================================================
// Decoding and validation
// ============================================================================

/// Bare application arguments: strict base64 when valid, UTF-8 bytes otherwise.
///
/// Short words made only of base64 characters with a length divisible by four
/// ("init", "vote") decode as base64, not as their text.
pub fn decode_app_arg(arg: &str) -> Vec<u8> {
    STANDARD
        .decode(arg)
        .unwrap_or_else(|_| arg.as_bytes().to_vec())
}

/// Lease bytes: base64 when valid, UTF-8 otherwise, zero-padded to 32 bytes.
pub fn lease_bytes(lease: &str) -> Result<[u8; LEASE_LENGTH], ToolError> {
    let raw = decode_app_arg(lease);
    if raw.len() > LEASE_LENGTH {
        return Err(ToolError::invalid_arguments(format!(
            "lease must be at most {} bytes, got {}",
            LEASE_LENGTH,
            raw.len()
        )));
    }
    let mut padded = [0u8; LEASE_LENGTH];
    padded[..raw.len()].copy_from_slice(&raw);
    Ok(padded)
}

/// Version number of the first `#pragma version N` directive.
pub fn teal_version(source: &str) -> Option<u32> {
    source.match_indices("#pragma").find_map(|(start, directive)| {
        let rest = &source[start + directive.len()..];
        let rest = strip_whitespace(rest)?.strip_prefix("version")?;
        let rest = strip_whitespace(rest)?;
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    })
}

/// Strip leading whitespace, requiring at least one character of it.
fn strip_whitespace(s: &str) -> Option<&str> {
    let trimmed = s.trim_start();
    (trimmed.len() < s.len()).then_some(trimmed)
}

/// Check that `signature` looks like `name(arg,types)returns`.
///
/// Argument and return types are not parsed; the ledger client does that.
pub fn validate_method_signature(signature: &str) -> Result<String, ToolError> {
    let invalid = || {
        ToolError::invalid_arguments(format!(
            "method must be an ABI signature like 'add(uint64,uint64)uint64', got '{}'",
            signature
        ))
    };
    if signature.is_empty() || signature.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let open = signature.find('(').ok_or_else(invalid)?;
    if open == 0 {
        return Err(invalid());
    }

    // Find the parenthesis closing the argument list; tuples nest.
    let mut depth = 0usize;
    let mut close = None;
    for (i, c) in signature[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close.ok_or_else(invalid)?;
    if close + 1 == signature.len() {
        return Err(invalid());
    }
    Ok(signature.to_string())
}

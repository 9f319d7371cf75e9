//! ARC-4 method calls: selector, argument encoding and return decoding.
//!
//! Covers the scalar and byte-string types used by typical contracts plus the
//! `account`, `asset` and `application` reference types. Tuples, general
//! arrays, transaction arguments and more than 14 arguments are refused.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};

use super::account::{decode_address, encode_address, sha512_256};
use super::{AbiReturn, LedgerError, TransactionReferences};

/// Prefix of the log line carrying a method's return value.
pub const RETURN_PREFIX: [u8; 4] = [0x15, 0x1f, 0x7c, 0x75];

/// Arguments that fit directly in `ApplicationArgs` beside the selector.
pub const MAX_ARGS: usize = 14;

/// A supported ARC-4 type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiType {
    Uint(u16),
    Byte,
    Bool,
    Address,
    String,
    DynamicBytes,
    StaticBytes(usize),
    Account,
    Asset,
    Application,
}

impl AbiType {
    fn parse(name: &str) -> Result<Self, LedgerError> {
        let unsupported = || LedgerError::encoding(format!("unsupported ABI type '{}'", name));
        let ty = match name {
            "byte" => AbiType::Byte,
            "bool" => AbiType::Bool,
            "address" => AbiType::Address,
            "string" => AbiType::String,
            "byte[]" => AbiType::DynamicBytes,
            "account" => AbiType::Account,
            "asset" => AbiType::Asset,
            "application" => AbiType::Application,
            _ => {
                if let Some(bits) = name.strip_prefix("uint") {
                    let bits: u16 = bits.parse().map_err(|_| unsupported())?;
                    if bits == 0 || bits > 512 || bits % 8 != 0 {
                        return Err(unsupported());
                    }
                    AbiType::Uint(bits)
                } else if let Some(len) = name
                    .strip_prefix("byte[")
                    .and_then(|rest| rest.strip_suffix(']'))
                {
                    AbiType::StaticBytes(len.parse().map_err(|_| unsupported())?)
                } else {
                    return Err(unsupported());
                }
            }
        };
        Ok(ty)
    }

    fn is_reference(self) -> bool {
        matches!(
            self,
            AbiType::Account | AbiType::Asset | AbiType::Application
        )
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Uint(bits) => write!(f, "uint{}", bits),
            AbiType::Byte => f.write_str("byte"),
            AbiType::Bool => f.write_str("bool"),
            AbiType::Address => f.write_str("address"),
            AbiType::String => f.write_str("string"),
            AbiType::DynamicBytes => f.write_str("byte[]"),
            AbiType::StaticBytes(len) => write!(f, "byte[{}]", len),
            AbiType::Account => f.write_str("account"),
            AbiType::Asset => f.write_str("asset"),
            AbiType::Application => f.write_str("application"),
        }
    }
}

/// A parsed method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    signature: String,
    args: Vec<AbiType>,
    /// `None` for `void`.
    returns: Option<AbiType>,
}

impl Method {
    pub fn parse(signature: &str) -> Result<Self, LedgerError> {
        let invalid =
            || LedgerError::encoding(format!("malformed method signature '{}'", signature));
        let open = signature.find('(').ok_or_else(invalid)?;
        let close = signature.rfind(')').ok_or_else(invalid)?;
        if open == 0 || close < open {
            return Err(invalid());
        }

        let arg_list = &signature[open + 1..close];
        if arg_list.contains('(') {
            return Err(LedgerError::encoding("tuple arguments are not supported"));
        }
        let args = if arg_list.is_empty() {
            Vec::new()
        } else {
            arg_list
                .split(',')
                .map(AbiType::parse)
                .collect::<Result<Vec<_>, _>>()?
        };
        if args.len() > MAX_ARGS {
            return Err(LedgerError::encoding(format!(
                "methods with more than {} arguments are not supported",
                MAX_ARGS
            )));
        }

        let returns = match &signature[close + 1..] {
            "" => return Err(invalid()),
            "void" => None,
            name => {
                let ty = AbiType::parse(name)?;
                if ty.is_reference() {
                    return Err(LedgerError::encoding(format!(
                        "'{}' cannot be a return type",
                        ty
                    )));
                }
                Some(ty)
            }
        };

        Ok(Self {
            signature: signature.to_string(),
            args,
            returns,
        })
    }

    /// First four bytes of the signature hash.
    pub fn selector(&self) -> [u8; 4] {
        let digest = sha512_256(self.signature.as_bytes());
        [digest[0], digest[1], digest[2], digest[3]]
    }

    /// Application arguments for a call: selector first, then each value.
    ///
    /// Reference arguments are appended to `references` when missing and
    /// encoded as their index into the matching foreign array.
    pub fn encode_arguments(
        &self,
        values: &[String],
        sender: &str,
        app_id: u64,
        references: &mut TransactionReferences,
    ) -> Result<Vec<Vec<u8>>, LedgerError> {
        if values.len() != self.args.len() {
            return Err(LedgerError::encoding(format!(
                "{} expects {} arguments, got {}",
                self.signature,
                self.args.len(),
                values.len()
            )));
        }

        let mut encoded = Vec::with_capacity(values.len() + 1);
        encoded.push(self.selector().to_vec());
        for (index, (ty, value)) in self.args.iter().zip(values).enumerate() {
            let bytes = match ty {
                AbiType::Account => account_index(value, sender, references).map(|i| vec![i]),
                AbiType::Asset => asset_index(value, references).map(|i| vec![i]),
                AbiType::Application => {
                    application_index(value, app_id, references).map(|i| vec![i])
                }
                _ => encode_value(*ty, value),
            }
            .map_err(|e| {
                let reason = match e {
                    LedgerError::Encoding(reason) => reason,
                    other => other.to_string(),
                };
                LedgerError::encoding(format!("argument {} ({}): {}", index, ty, reason))
            })?;
            encoded.push(bytes);
        }
        Ok(encoded)
    }

    /// Decode the return value from a confirmed call's logs.
    pub fn decode_return(&self, logs: &[Vec<u8>]) -> Option<AbiReturn> {
        let ty = self.returns?;
        let payload = logs
            .iter()
            .rev()
            .find_map(|log| log.strip_prefix(&RETURN_PREFIX[..]));
        let result = match payload {
            Some(payload) => decode_value(ty, payload),
            None => Err("no return value was logged".to_string()),
        };
        Some(match result {
            Ok(value) => AbiReturn::Value {
                value,
                return_type: ty.to_string(),
            },
            Err(e) => AbiReturn::DecodeError(e),
        })
    }
}

// ============================================================================
// Encoding
// ============================================================================

fn encode_value(ty: AbiType, value: &str) -> Result<Vec<u8>, LedgerError> {
    let value = value.trim();
    match ty {
        AbiType::Uint(bits) => encode_uint(bits, value),
        AbiType::Byte => value
            .parse::<u8>()
            .map(|b| vec![b])
            .map_err(|_| LedgerError::encoding(format!("'{}' is not a byte", value))),
        AbiType::Bool => match value.to_lowercase().as_str() {
            "true" | "1" => Ok(vec![0x80]),
            "false" | "0" => Ok(vec![0x00]),
            _ => Err(LedgerError::encoding(format!("'{}' is not a bool", value))),
        },
        AbiType::Address => Ok(decode_address(value)?.to_vec()),
        AbiType::String => length_prefixed(value.as_bytes()),
        AbiType::DynamicBytes => length_prefixed(&byte_string(value)),
        AbiType::StaticBytes(len) => {
            let bytes = byte_string(value);
            if bytes.len() != len {
                return Err(LedgerError::encoding(format!(
                    "expected {} bytes, got {}",
                    len,
                    bytes.len()
                )));
            }
            Ok(bytes)
        }
        AbiType::Account | AbiType::Asset | AbiType::Application => Err(LedgerError::encoding(
            "reference types are encoded as indexes",
        )),
    }
}

fn encode_uint(bits: u16, value: &str) -> Result<Vec<u8>, LedgerError> {
    let parsed: u128 = value
        .parse()
        .map_err(|_| LedgerError::encoding(format!("'{}' is not an unsigned integer", value)))?;
    if bits < 128 && parsed >> bits != 0 {
        return Err(LedgerError::encoding(format!(
            "{} does not fit in uint{}",
            parsed, bits
        )));
    }
    let width = usize::from(bits / 8);
    let be = parsed.to_be_bytes();
    let mut out = vec![0u8; width.saturating_sub(be.len())];
    out.extend_from_slice(&be[be.len().saturating_sub(width)..]);
    Ok(out)
}

/// Base64 when it decodes, UTF-8 otherwise.
fn byte_string(value: &str) -> Vec<u8> {
    STANDARD
        .decode(value)
        .unwrap_or_else(|_| value.as_bytes().to_vec())
}

fn length_prefixed(bytes: &[u8]) -> Result<Vec<u8>, LedgerError> {
    let len = u16::try_from(bytes.len())
        .map_err(|_| LedgerError::encoding("value longer than 65535 bytes"))?;
    let mut out = len.to_be_bytes().to_vec();
    out.extend_from_slice(bytes);
    Ok(out)
}

fn index_byte(index: usize) -> Result<u8, LedgerError> {
    u8::try_from(index).map_err(|_| LedgerError::encoding("too many foreign references"))
}

/// Index 0 is the sender; others follow the foreign accounts, 1-based.
fn account_index(
    value: &str,
    sender: &str,
    references: &mut TransactionReferences,
) -> Result<u8, LedgerError> {
    let address = value.trim();
    decode_address(address)?;
    if address == sender {
        return Ok(0);
    }
    let position = match references.accounts.iter().position(|a| a == address) {
        Some(position) => position,
        None => {
            references.accounts.push(address.to_string());
            references.accounts.len() - 1
        }
    };
    index_byte(position + 1)
}

/// Assets are indexed 0-based into the foreign assets.
fn asset_index(value: &str, references: &mut TransactionReferences) -> Result<u8, LedgerError> {
    let id = parse_reference_id(value)?;
    let position = match references.assets.iter().position(|a| *a == id) {
        Some(position) => position,
        None => {
            references.assets.push(id);
            references.assets.len() - 1
        }
    };
    index_byte(position)
}

/// Index 0 is the called application; others follow the foreign apps, 1-based.
fn application_index(
    value: &str,
    app_id: u64,
    references: &mut TransactionReferences,
) -> Result<u8, LedgerError> {
    let id = parse_reference_id(value)?;
    if app_id != 0 && id == app_id {
        return Ok(0);
    }
    let position = match references.apps.iter().position(|a| *a == id) {
        Some(position) => position,
        None => {
            references.apps.push(id);
            references.apps.len() - 1
        }
    };
    index_byte(position + 1)
}

fn parse_reference_id(value: &str) -> Result<u64, LedgerError> {
    value
        .trim()
        .parse()
        .map_err(|_| LedgerError::encoding(format!("'{}' is not an id", value)))
}

// ============================================================================
// Decoding
// ============================================================================

fn decode_value(ty: AbiType, bytes: &[u8]) -> Result<Value, String> {
    let expect_len = |len: usize| {
        if bytes.len() == len {
            Ok(())
        } else {
            Err(format!(
                "{} needs {} bytes, the log holds {}",
                ty,
                len,
                bytes.len()
            ))
        }
    };
    match ty {
        AbiType::Uint(bits) => {
            expect_len(usize::from(bits / 8))?;
            let (high, low) = bytes.split_at(bytes.len().saturating_sub(16));
            if high.iter().any(|b| *b != 0) {
                return Ok(json!(format!("0x{}", hex::encode(bytes))));
            }
            let value = low.iter().fold(0u128, |acc, b| (acc << 8) | u128::from(*b));
            Ok(match u64::try_from(value) {
                Ok(small) => json!(small),
                Err(_) => json!(value.to_string()),
            })
        }
        AbiType::Byte => {
            expect_len(1)?;
            Ok(json!(bytes[0]))
        }
        AbiType::Bool => {
            expect_len(1)?;
            Ok(json!(bytes[0] & 0x80 != 0))
        }
        AbiType::Address => {
            expect_len(32)?;
            let mut key = [0u8; 32];
            key.copy_from_slice(bytes);
            Ok(json!(encode_address(&key)))
        }
        AbiType::String => {
            let content = strip_length_prefix(bytes)?;
            String::from_utf8(content.to_vec())
                .map(Value::String)
                .map_err(|_| "string return is not valid UTF-8".to_string())
        }
        AbiType::DynamicBytes => Ok(json!(STANDARD.encode(strip_length_prefix(bytes)?))),
        AbiType::StaticBytes(len) => {
            expect_len(len)?;
            Ok(json!(STANDARD.encode(bytes)))
        }
        AbiType::Account | AbiType::Asset | AbiType::Application => {
            Err(format!("'{}' cannot be a return type", ty))
        }
    }
}

fn strip_length_prefix(bytes: &[u8]) -> Result<&[u8], String> {
    if bytes.len() < 2 {
        return Err("missing length prefix".to_string());
    }
    let (prefix, content) = bytes.split_at(2);
    let len = usize::from(u16::from_be_bytes([prefix[0], prefix[1]]));
    if content.len() != len {
        return Err(format!(
            "length prefix says {} bytes, found {}",
            len,
            content.len()
        ));
    }
    Ok(content)
}

//! Wire form of transactions: building, canonical msgpack encoding and signing.
//!
//! Field names are the protocol's short keys. Structs declare their fields in
//! sorted key order and skip zero values, which together give the canonical
//! encoding the network hashes and verifies.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

use super::abi::Method;
use super::account::{SigningAccount, decode_address, sha512_256};
use super::{
    AppArguments, AppCallRequest, AssetCreateRequest, LedgerError, OnComplete, StateSchema,
    TransactionReferences, TransactionRequest,
};

/// Rounds a transaction stays valid after its first valid round.
pub const VALIDITY_WINDOW: u64 = 1000;

/// Domain separator prepended before hashing or signing a transaction.
const TX_TAG: &[u8] = b"TX";

const METADATA_HASH_LENGTH: usize = 32;

fn is_zero(value: &u64) -> bool {
    *value == 0
}

fn is_zero_u32(value: &u32) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_empty_bytes(value: &ByteBuf) -> bool {
    value.is_empty()
}

/// A transaction in wire form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    #[serde(skip_serializing_if = "is_zero")]
    pub aamt: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aclose: Option<ByteBuf>,
    #[serde(skip_serializing_if = "is_false")]
    pub afrz: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub amt: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub apaa: Vec<ByteBuf>,
    #[serde(skip_serializing_if = "is_zero")]
    pub apan: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apap: Option<ByteBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apar: Option<AssetParams>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub apas: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub apat: Vec<ByteBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub apbx: Vec<BoxRef>,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub apep: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub apfa: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apgs: Option<Schema>,
    #[serde(skip_serializing_if = "is_zero")]
    pub apid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apls: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apsu: Option<ByteBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arcv: Option<ByteBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asnd: Option<ByteBuf>,
    #[serde(skip_serializing_if = "is_zero")]
    pub caid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<ByteBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fadd: Option<ByteBuf>,
    #[serde(skip_serializing_if = "is_zero")]
    pub faid: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub fee: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub fv: u64,
    #[serde(rename = "gen", skip_serializing_if = "String::is_empty")]
    pub genesis_id: String,
    pub gh: ByteBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grp: Option<ByteBuf>,
    #[serde(skip_serializing_if = "is_zero")]
    pub lv: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lx: Option<ByteBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<ByteBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rcv: Option<ByteBuf>,
    pub snd: ByteBuf,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub xaid: u64,
}

/// Asset parameters of a create or reconfigure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub am: Option<ByteBuf>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub an: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub au: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<ByteBuf>,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub dc: u32,
    #[serde(skip_serializing_if = "is_false")]
    pub df: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f: Option<ByteBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m: Option<ByteBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<ByteBuf>,
    #[serde(skip_serializing_if = "is_zero")]
    pub t: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub un: String,
}

impl AssetParams {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// State allocation of an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    #[serde(skip_serializing_if = "is_zero")]
    pub nbs: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub nui: u64,
}

impl Schema {
    /// `None` when nothing is allocated; an empty map is not canonical.
    fn allocated(ints: u64, byte_slices: u64) -> Option<Self> {
        (ints > 0 || byte_slices > 0).then_some(Self {
            nbs: byte_slices,
            nui: ints,
        })
    }
}

/// A box reference: `i` indexes the foreign apps, 0 meaning the called app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxRef {
    #[serde(skip_serializing_if = "is_zero")]
    pub i: u64,
    #[serde(skip_serializing_if = "is_empty_bytes")]
    pub n: ByteBuf,
}

/// A transaction with its single signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub sig: ByteBuf,
    pub txn: Transaction,
}

/// Network parameters every transaction is built against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedParams {
    pub fee: u64,
    pub first_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: Vec<u8>,
}

/// Compiled application programs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPrograms {
    pub approval: Vec<u8>,
    pub clear_state: Vec<u8>,
}

/// A built transaction and the method whose return value to decode, if any.
#[derive(Debug)]
pub struct Prepared {
    pub transaction: Transaction,
    pub method: Option<Method>,
}

// ============================================================================
// Building
// ============================================================================

fn address(value: &str) -> Result<ByteBuf, LedgerError> {
    Ok(ByteBuf::from(decode_address(value)?.to_vec()))
}

fn optional_address(value: Option<&str>) -> Result<Option<ByteBuf>, LedgerError> {
    value.map(address).transpose()
}

fn bytes(value: Option<&[u8]>) -> Option<ByteBuf> {
    value
        .filter(|b| !b.is_empty())
        .map(|b| ByteBuf::from(b.to_vec()))
}

fn header(
    kind: &str,
    sender: &str,
    params: &SuggestedParams,
    note: Option<&[u8]>,
) -> Result<Transaction, LedgerError> {
    Ok(Transaction {
        kind: kind.to_string(),
        snd: address(sender)?,
        fee: params.fee,
        fv: params.first_valid,
        lv: params.first_valid + VALIDITY_WINDOW,
        genesis_id: params.genesis_id.clone(),
        gh: ByteBuf::from(params.genesis_hash.clone()),
        note: bytes(note),
        ..Default::default()
    })
}

/// Build the wire transaction for `request`.
///
/// `programs` must hold the compiled TEAL of an application create or update.
/// An asset opt-out must already name its creator.
pub fn build(
    request: &TransactionRequest,
    params: &SuggestedParams,
    programs: Option<&CompiledPrograms>,
) -> Result<Prepared, LedgerError> {
    let transaction = match request {
        TransactionRequest::Payment(r) => Transaction {
            amt: r.amount.0,
            rcv: Some(address(&r.receiver)?),
            close: optional_address(r.close_remainder_to.as_deref())?,
            ..header("pay", &r.sender, params, r.note.as_deref())?
        },
        TransactionRequest::AssetCreate(r) => Transaction {
            apar: Some(asset_create_params(r)?),
            ..header("acfg", &r.sender, params, r.note.as_deref())?
        },
        TransactionRequest::AssetConfig(r) => {
            let apar = AssetParams {
                m: optional_address(r.manager.as_deref())?,
                r: optional_address(r.reserve.as_deref())?,
                f: optional_address(r.freeze.as_deref())?,
                c: optional_address(r.clawback.as_deref())?,
                ..Default::default()
            };
            // With no parameters the same transaction destroys the asset.
            if apar.is_empty() {
                return Err(LedgerError::rejected(
                    "Asset configuration must set at least one of manager, reserve, freeze or clawback",
                ));
            }
            Transaction {
                caid: r.asset_id,
                apar: Some(apar),
                ..header("acfg", &r.sender, params, r.note.as_deref())?
            }
        }
        TransactionRequest::AssetTransfer(r) => Transaction {
            xaid: r.asset_id,
            aamt: r.amount,
            arcv: Some(address(&r.receiver)?),
            asnd: optional_address(r.clawback_target.as_deref())?,
            aclose: optional_address(r.close_asset_to.as_deref())?,
            ..header("axfer", &r.sender, params, r.note.as_deref())?
        },
        TransactionRequest::AssetOptIn(r) => Transaction {
            xaid: r.asset_id,
            arcv: Some(address(&r.sender)?),
            ..header("axfer", &r.sender, params, r.note.as_deref())?
        },
        TransactionRequest::AssetOptOut(r) => {
            let creator = r.creator.as_deref().ok_or_else(|| {
                LedgerError::rejected(format!("Creator of asset {} is unknown", r.asset_id))
            })?;
            Transaction {
                xaid: r.asset_id,
                arcv: Some(address(creator)?),
                aclose: Some(address(creator)?),
                ..header("axfer", &r.sender, params, r.note.as_deref())?
            }
        }
        TransactionRequest::AssetFreeze(r) => Transaction {
            faid: r.asset_id,
            fadd: Some(address(&r.account)?),
            afrz: r.frozen,
            ..header("afrz", &r.sender, params, r.note.as_deref())?
        },
        TransactionRequest::AssetDestroy(r) => Transaction {
            caid: r.asset_id,
            ..header("acfg", &r.sender, params, r.note.as_deref())?
        },
        TransactionRequest::AppCall(call) => return build_app_call(call, params, programs),
    };

    Ok(Prepared {
        transaction,
        method: None,
    })
}

fn asset_create_params(r: &AssetCreateRequest) -> Result<AssetParams, LedgerError> {
    let metadata_hash = match r.metadata_hash.as_deref() {
        None | Some("") => None,
        Some(hash) => Some(ByteBuf::from(metadata_hash(hash)?)),
    };
    Ok(AssetParams {
        t: r.total,
        dc: r.decimals.unwrap_or(0),
        df: r.default_frozen.unwrap_or(false),
        an: r.asset_name.clone().unwrap_or_default(),
        un: r.unit_name.clone().unwrap_or_default(),
        au: r.url.clone().unwrap_or_default(),
        am: metadata_hash,
        m: optional_address(r.manager.as_deref())?,
        r: optional_address(r.reserve.as_deref())?,
        f: optional_address(r.freeze.as_deref())?,
        c: optional_address(r.clawback.as_deref())?,
    })
}

/// Metadata hash bytes: base64 when it decodes to 32 bytes, UTF-8 otherwise.
fn metadata_hash(value: &str) -> Result<Vec<u8>, LedgerError> {
    if let Ok(decoded) = STANDARD.decode(value) {
        if decoded.len() == METADATA_HASH_LENGTH {
            return Ok(decoded);
        }
    }
    if value.len() == METADATA_HASH_LENGTH {
        return Ok(value.as_bytes().to_vec());
    }
    Err(LedgerError::encoding(format!(
        "metadata hash must be {} bytes",
        METADATA_HASH_LENGTH
    )))
}

fn on_completion_code(on_complete: OnComplete) -> u64 {
    match on_complete {
        OnComplete::NoOp => 0,
        OnComplete::OptIn => 1,
        OnComplete::CloseOut => 2,
        OnComplete::UpdateApplication => 4,
        OnComplete::DeleteApplication => 5,
    }
}

fn build_app_call(
    call: &AppCallRequest,
    params: &SuggestedParams,
    programs: Option<&CompiledPrograms>,
) -> Result<Prepared, LedgerError> {
    let app_id = call.app_id.unwrap_or(0);
    let needs_programs =
        call.app_id.is_none() || call.on_complete == OnComplete::UpdateApplication;
    if needs_programs && programs.is_none() {
        return Err(LedgerError::rejected(
            "Application create and update need compiled programs",
        ));
    }
    let programs = programs.filter(|_| needs_programs);

    let mut references = call.references.clone();
    let (args, method) = match &call.arguments {
        AppArguments::Bare(args) => (args.clone(), None),
        AppArguments::Abi { method, args } => {
            let method = Method::parse(method)?;
            let encoded = method.encode_arguments(args, &call.sender, app_id, &mut references)?;
            (encoded, Some(method))
        }
    };
    let boxes = box_refs(&mut references, app_id);
    let TransactionReferences {
        accounts,
        apps,
        assets,
        note,
        lease,
        ..
    } = references;

    let schema = call.schema.unwrap_or_default();
    let StateSchema {
        global_ints,
        global_byte_slices,
        local_ints,
        local_byte_slices,
    } = schema;

    let transaction = Transaction {
        apid: app_id,
        apan: on_completion_code(call.on_complete),
        apap: programs.map(|p| ByteBuf::from(p.approval.clone())),
        apsu: programs.map(|p| ByteBuf::from(p.clear_state.clone())),
        apgs: Schema::allocated(global_ints, global_byte_slices),
        apls: Schema::allocated(local_ints, local_byte_slices),
        apep: call.extra_pages.unwrap_or(0),
        apaa: args.into_iter().map(ByteBuf::from).collect(),
        apat: accounts
            .iter()
            .map(|a| address(a))
            .collect::<Result<_, _>>()?,
        apfa: apps,
        apas: assets,
        apbx: boxes,
        lx: lease.map(|l| ByteBuf::from(l.to_vec())),
        ..header("appl", &call.sender, params, note.as_deref())?
    };

    Ok(Prepared { transaction, method })
}

/// Box references, adding each box's application to the foreign apps if needed.
fn box_refs(references: &mut TransactionReferences, app_id: u64) -> Vec<BoxRef> {
    let boxes = std::mem::take(&mut references.boxes);
    boxes
        .into_iter()
        .map(|b| {
            let i = if b.app_id == 0 || b.app_id == app_id {
                0
            } else {
                let position = match references.apps.iter().position(|a| *a == b.app_id) {
                    Some(position) => position,
                    None => {
                        references.apps.push(b.app_id);
                        references.apps.len() - 1
                    }
                };
                position as u64 + 1
            };
            BoxRef {
                i,
                n: ByteBuf::from(b.name),
            }
        })
        .collect()
}

// ============================================================================
// Signing
// ============================================================================

pub(super) fn signing_bytes(transaction: &Transaction) -> Result<Vec<u8>, LedgerError> {
    let mut message = TX_TAG.to_vec();
    message.extend(rmp_serde::to_vec_named(transaction)?);
    Ok(message)
}

/// Sign `transaction`, returning its 52-character id and the encoded signed
/// transaction.
pub fn sign(
    transaction: Transaction,
    account: &SigningAccount,
) -> Result<(String, Vec<u8>), LedgerError> {
    if transaction.snd.as_slice() != account.public_key().as_slice() {
        return Err(LedgerError::rejected(format!(
            "{} cannot sign for a different sender",
            account.address()
        )));
    }
    let message = signing_bytes(&transaction)?;
    let tx_id = BASE32_NOPAD.encode(&sha512_256(&message));
    let signed = SignedTransaction {
        sig: ByteBuf::from(account.sign(&message).to_vec()),
        txn: transaction,
    };
    Ok((tx_id, rmp_serde::to_vec_named(&signed)?))
}

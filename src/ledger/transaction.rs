//! System Program transfer transactions
//!
//! Builds the legacy Solana message for a single lamport transfer, signs it,
//! and serialises it in the cluster's wire format. Only the pieces a plain
//! transfer needs are implemented.

use crate::ledger::{Checkpoint, TransactionId};
use crate::storage::keys::{validate_address, Address, KeyError, Keypair, SIGNATURE_LENGTH};

/// System Program id (`11111111111111111111111111111111`)
pub const SYSTEM_PROGRAM_ID: Address = Address::from_bytes([0u8; 32]);

/// System Program instruction index for `Transfer`
const SYSTEM_TRANSFER_INDEX: u32 = 2;

/// Parse a transfer recipient
///
/// The System Program itself is refused: it is already in every transfer's
/// account list.
pub fn validate_recipient(address: &str) -> Result<Address, KeyError> {
    let address = validate_address(address)?;
    if address == SYSTEM_PROGRAM_ID {
        return Err(KeyError::ReservedAddress(address.to_base58()));
    }
    Ok(address)
}

/// A lamport transfer between two accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferInstruction {
    pub from: Address,
    pub to: Address,
    pub lamports: u64,
}

impl TransferInstruction {
    pub fn new(from: Address, to: Address, lamports: u64) -> Self {
        Self { from, to, lamports }
    }

    fn data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(12);
        data.extend_from_slice(&SYSTEM_TRANSFER_INDEX.to_le_bytes());
        data.extend_from_slice(&self.lamports.to_le_bytes());
        data
    }
}

/// Transfer anchored to a checkpoint, with the sender as fee payer
#[derive(Debug, Clone)]
pub struct UnsignedTransaction {
    instruction: TransferInstruction,
    checkpoint: Checkpoint,
    message: Vec<u8>,
}

impl UnsignedTransaction {
    pub fn new(instruction: TransferInstruction, checkpoint: Checkpoint) -> Self {
        let message = compile_message(&instruction, &checkpoint);
        Self {
            instruction,
            checkpoint,
            message,
        }
    }

    pub fn instruction(&self) -> &TransferInstruction {
        &self.instruction
    }

    pub fn fee_payer(&self) -> Address {
        self.instruction.from
    }

    pub fn checkpoint(&self) -> &Checkpoint {
        &self.checkpoint
    }

    /// Serialized message, the bytes that get signed
    pub fn message_bytes(&self) -> &[u8] {
        &self.message
    }

    /// Sign with the fee payer's keypair
    pub fn sign(&self, keypair: &Keypair) -> Result<SignedTransaction, KeyError> {
        if keypair.address() != self.fee_payer() {
            return Err(KeyError::Corrupted(format!(
                "signing key {} does not match fee payer {}",
                keypair.address(),
                self.fee_payer()
            )));
        }
        Ok(SignedTransaction {
            signature: keypair.sign(&self.message),
            message: self.message.clone(),
            last_valid_block_height: self.checkpoint.last_valid_block_height(),
        })
    }
}

/// Signed transaction ready for submission
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    signature: [u8; SIGNATURE_LENGTH],
    message: Vec<u8>,
    last_valid_block_height: u64,
}

impl SignedTransaction {
    pub fn signature(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.signature
    }

    /// The id the cluster will report for this transaction
    pub fn id(&self) -> TransactionId {
        TransactionId::new(bs58::encode(self.signature).into_string())
    }

    pub fn message_bytes(&self) -> &[u8] {
        &self.message
    }

    /// Last block height at which the cluster will still accept this transaction
    pub fn last_valid_block_height(&self) -> u64 {
        self.last_valid_block_height
    }

    /// Wire format: signature count, signatures, message
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + SIGNATURE_LENGTH + self.message.len());
        encode_compact_u16(1, &mut out);
        out.extend_from_slice(&self.signature);
        out.extend_from_slice(&self.message);
        out
    }
}

/// Encode a length as Solana's compact-u16 (1-3 bytes, 7 bits per byte)
pub fn encode_compact_u16(value: u16, out: &mut Vec<u8>) {
    let mut rem = value;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(byte);
            return;
        }
        byte |= 0x80;
        out.push(byte);
    }
}

fn compile_message(instruction: &TransferInstruction, checkpoint: &Checkpoint) -> Vec<u8> {
    // Signer/writable sender first, writable recipient, read-only program last.
    // A self-transfer collapses sender and recipient into one key.
    let mut account_keys = vec![instruction.from];
    let to_index = if instruction.to == instruction.from {
        0u8
    } else {
        account_keys.push(instruction.to);
        1u8
    };
    account_keys.push(SYSTEM_PROGRAM_ID);
    let program_index = (account_keys.len() - 1) as u8;

    let mut message = Vec::with_capacity(3 + 1 + 32 * account_keys.len() + 32 + 20);

    // Header: required signatures, read-only signed, read-only unsigned
    message.extend_from_slice(&[1, 0, 1]);

    encode_compact_u16(account_keys.len() as u16, &mut message);
    for key in &account_keys {
        message.extend_from_slice(key.as_bytes());
    }

    message.extend_from_slice(checkpoint.blockhash());

    encode_compact_u16(1, &mut message);
    message.push(program_index);
    encode_compact_u16(2, &mut message);
    message.extend_from_slice(&[0, to_index]);
    let data = instruction.data();
    encode_compact_u16(data.len() as u16, &mut message);
    message.extend_from_slice(&data);

    message
}

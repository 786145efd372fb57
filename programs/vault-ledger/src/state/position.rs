use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

/// Seed prefix for position PDAs
pub const POSITION_SEED: &[u8] = b"position";

/// One depositor's claim on one vault.
///
/// Created inside the depositor's first deposit and never closed; a position
/// whose shares have been fully withdrawn simply holds zero.
#[derive(BorshSerialize, BorshDeserialize, Debug)]
pub struct Position {
    pub is_initialized: bool,
    pub bump: u8,
    pub vault: Pubkey,
    pub depositor: Pubkey,
    pub shares: u64,
}

impl Position {
    pub const LEN: usize = 1 + 1 + 32 + 32 + 8;

    pub fn new(vault: Pubkey, depositor: Pubkey, bump: u8) -> Self {
        Self {
            is_initialized: true,
            bump,
            vault,
            depositor,
            shares: 0,
        }
    }

    /// Canonical position address for a (vault, depositor) pair
    pub fn find_address(vault: &Pubkey, depositor: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[POSITION_SEED, vault.as_ref(), depositor.as_ref()],
            program_id,
        )
    }
}

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

/// Seed prefix for the vault PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Pool-level state for one asset mint.
///
/// The pool's asset balance is NOT stored here. It lives in the pool token
/// account and is re-read at the start of every operation, so transfers made
/// straight to the pool account are picked up by the next conversion instead
/// of drifting out of sync with a cached copy.
#[derive(BorshSerialize, BorshDeserialize, Debug)]
pub struct Vault {
    pub is_initialized: bool,
    pub bump: u8,
    /// The one asset this pool accepts
    pub asset_mint: Pubkey,
    /// Pool token account (the vault PDA's associated token account)
    pub asset_account: Pubkey,
    /// Cached from the mint for transfer_checked
    pub asset_decimals: u8,
    /// Total claim units outstanding across all positions
    pub total_shares: u64,
}

impl Vault {
    pub const LEN: usize = 1 + 1 + 32 + 32 + 1 + 8;

    pub fn new(asset_mint: Pubkey, asset_account: Pubkey, asset_decimals: u8, bump: u8) -> Self {
        Self {
            is_initialized: true,
            bump,
            asset_mint,
            asset_account,
            asset_decimals,
            total_shares: 0,
        }
    }

    /// Canonical vault address for an asset mint
    pub fn find_address(asset_mint: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[VAULT_SEED, asset_mint.as_ref()], program_id)
    }
}

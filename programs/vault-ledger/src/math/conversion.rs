use solana_program::program_error::ProgramError;

use crate::error::VaultError;

/// Shares minted for a deposit of `amount` against the pool totals read
/// before any funds move.
///
/// An empty pool (zero shares outstanding, including one drained back to
/// zero) bootstraps at 1:1. Otherwise the mint is
/// `floor(amount * total_shares / total_assets)`; rounding down is what keeps
/// a depositor from ever minting claim on more than they brought. A result of
/// zero is valid - the deposit is absorbed by existing holders.
pub fn shares_for_deposit(
    amount: u64,
    total_shares: u64,
    total_assets: u64,
) -> Result<u64, ProgramError> {
    if total_shares == 0 {
        return Ok(amount);
    }

    // Shares outstanding against an empty pool cannot be produced by
    // deposit/withdraw; treat it as a fatal accounting fault.
    if total_assets == 0 {
        return Err(VaultError::DivideByZero.into());
    }

    let shares = (amount as u128)
        .checked_mul(total_shares as u128)
        .ok_or(VaultError::ArithmeticOverflow)?
        / total_assets as u128;

    u64::try_from(shares).map_err(|_| VaultError::ArithmeticOverflow.into())
}

/// Assets paid out for burning `shares` against the pool totals read before
/// any mutation.
///
/// `floor(shares * total_assets / total_shares)`; rounding down means a
/// redeemer can never extract more per share than the pool currently backs.
/// A result of zero is valid - small enough share counts burn for nothing.
pub fn assets_for_withdraw(
    shares: u64,
    total_shares: u64,
    total_assets: u64,
) -> Result<u64, ProgramError> {
    if total_shares == 0 {
        return Err(VaultError::DivideByZero.into());
    }

    let assets = (shares as u128)
        .checked_mul(total_assets as u128)
        .ok_or(VaultError::ArithmeticOverflow)?
        / total_shares as u128;

    u64::try_from(assets).map_err(|_| VaultError::ArithmeticOverflow.into())
}

//! SPL token and associated-token-account CPI helpers

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    program::{invoke, invoke_signed},
};
use spl_token::instruction::transfer_checked;

/// Pull assets from a depositor's token account into the pool. The depositor
/// signed the transaction, so their signature authorizes the transfer.
pub fn transfer_from_depositor<'a>(
    token_program: &AccountInfo<'a>,
    from: &AccountInfo<'a>,
    mint: &AccountInfo<'a>,
    to: &AccountInfo<'a>,
    authority: &AccountInfo<'a>,
    amount: u64,
    decimals: u8,
) -> ProgramResult {
    let transfer_instruction = transfer_checked(
        token_program.key,
        from.key,
        mint.key,
        to.key,
        authority.key,
        &[authority.key],
        amount,
        decimals,
    )?;

    invoke(
        &transfer_instruction,
        &[
            from.clone(),
            mint.clone(),
            to.clone(),
            authority.clone(),
            token_program.clone(),
        ],
    )
}

/// Push assets from the pool to a depositor's token account, signed by the
/// vault PDA that owns the pool account.
#[allow(clippy::too_many_arguments)]
pub fn transfer_from_pool<'a>(
    token_program: &AccountInfo<'a>,
    from: &AccountInfo<'a>,
    mint: &AccountInfo<'a>,
    to: &AccountInfo<'a>,
    vault_account: &AccountInfo<'a>,
    amount: u64,
    decimals: u8,
    vault_seeds: &[&[u8]],
) -> ProgramResult {
    let transfer_instruction = transfer_checked(
        token_program.key,
        from.key,
        mint.key,
        to.key,
        vault_account.key,
        &[],
        amount,
        decimals,
    )?;

    invoke_signed(
        &transfer_instruction,
        &[
            from.clone(),
            mint.clone(),
            to.clone(),
            vault_account.clone(),
            token_program.clone(),
        ],
        &[vault_seeds],
    )
}

/// Create the pool token account as the vault PDA's associated token account.
pub fn create_pool_account<'a>(
    payer: &AccountInfo<'a>,
    pool: &AccountInfo<'a>,
    vault: &AccountInfo<'a>,
    mint: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    token_program: &AccountInfo<'a>,
) -> ProgramResult {
    let instruction = spl_associated_token_account::instruction::create_associated_token_account(
        payer.key,
        vault.key,
        mint.key,
        token_program.key,
    );

    invoke(
        &instruction,
        &[
            payer.clone(),
            pool.clone(),
            vault.clone(),
            mint.clone(),
            system_program.clone(),
            token_program.clone(),
        ],
    )
}

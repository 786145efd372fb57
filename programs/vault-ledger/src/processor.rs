use borsh::BorshDeserialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::invoke_signed,
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};

use crate::{
    error::VaultError,
    instruction::VaultInstruction,
    math::conversion,
    state::{Position, Vault, POSITION_SEED, VAULT_SEED},
    token,
};

pub struct Processor;

impl Processor {
    fn borsh_deserialize_unchecked<T: BorshDeserialize>(data: &[u8]) -> Result<T, ProgramError> {
        let mut cursor: &[u8] = data;
        T::deserialize(&mut cursor).map_err(|_| ProgramError::InvalidAccountData)
    }

    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = VaultInstruction::unpack(instruction_data)?;

        match instruction {
            VaultInstruction::InitializeVault => {
                msg!("Instruction: InitializeVault");
                Self::process_initialize_vault(accounts, program_id)
            }
            VaultInstruction::Deposit { amount } => {
                msg!("Instruction: Deposit");
                Self::process_deposit(accounts, program_id, amount)
            }
            VaultInstruction::Withdraw { shares } => {
                msg!("Instruction: Withdraw");
                Self::process_withdraw(accounts, program_id, shares)
            }
        }
    }

    fn process_initialize_vault(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer_info = next_account_info(account_info_iter)?;
        let vault_info = next_account_info(account_info_iter)?;
        let mint_info = next_account_info(account_info_iter)?;
        let pool_info = next_account_info(account_info_iter)?;
        let token_program_info = next_account_info(account_info_iter)?;
        let _ata_program_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !payer_info.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }

        let (vault_pubkey, vault_bump) = Vault::find_address(mint_info.key, program_id);
        if vault_pubkey != *vault_info.key {
            return Err(VaultError::InvalidPDA.into());
        }
        if !vault_info.data_is_empty() {
            return Err(VaultError::AlreadyInitialized.into());
        }

        let expected_pool =
            spl_associated_token_account::get_associated_token_address(&vault_pubkey, mint_info.key);
        if expected_pool != *pool_info.key {
            return Err(VaultError::PoolAccountMismatch.into());
        }

        let rent = Rent::get()?;
        let vault_lamports = rent.minimum_balance(Vault::LEN);

        invoke_signed(
            &system_instruction::create_account(
                payer_info.key,
                vault_info.key,
                vault_lamports,
                Vault::LEN as u64,
                program_id,
            ),
            &[
                payer_info.clone(),
                vault_info.clone(),
                system_program_info.clone(),
            ],
            &[&[VAULT_SEED, mint_info.key.as_ref(), &[vault_bump]]],
        )?;

        token::create_pool_account(
            payer_info,
            pool_info,
            vault_info,
            mint_info,
            system_program_info,
            token_program_info,
        )?;

        let mint_state = spl_token::state::Mint::unpack(&mint_info.data.borrow())?;

        let vault = Vault::new(*mint_info.key, *pool_info.key, mint_state.decimals, vault_bump);
        borsh::to_writer(&mut vault_info.try_borrow_mut_data()?.as_mut(), &vault)
            .map_err(|_| ProgramError::InvalidAccountData)?;

        msg!("Vault initialized for mint {}", mint_info.key);
        Ok(())
    }

    fn process_deposit(
        accounts: &[AccountInfo],
        program_id: &Pubkey,
        amount: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let depositor_info = next_account_info(account_info_iter)?;
        let depositor_token_info = next_account_info(account_info_iter)?;
        let vault_info = next_account_info(account_info_iter)?;
        let pool_info = next_account_info(account_info_iter)?;
        let position_info = next_account_info(account_info_iter)?;
        let mint_info = next_account_info(account_info_iter)?;
        let token_program_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !depositor_info.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }
        if amount == 0 {
            return Err(VaultError::ZeroDepositAmount.into());
        }

        let mut vault = Self::load_vault(vault_info, mint_info.key, program_id)?;
        if *mint_info.key != vault.asset_mint {
            return Err(VaultError::MintMismatch.into());
        }
        if *pool_info.key != vault.asset_account {
            return Err(VaultError::PoolAccountMismatch.into());
        }

        let (position_pubkey, position_bump) =
            Position::find_address(vault_info.key, depositor_info.key, program_id);
        if position_pubkey != *position_info.key {
            return Err(VaultError::InvalidPDA.into());
        }

        // Pool balance before any funds move; the conversion must not see the
        // incoming transfer.
        let total_assets = spl_token::state::Account::unpack(&pool_info.data.borrow())?.amount;

        let shares_to_mint = conversion::shares_for_deposit(amount, vault.total_shares, total_assets)?;

        token::transfer_from_depositor(
            token_program_info,
            depositor_token_info,
            mint_info,
            pool_info,
            depositor_info,
            amount,
            vault.asset_decimals,
        )?;

        let mut position = if position_info.data_is_empty() {
            let rent = Rent::get()?;
            let position_lamports = rent.minimum_balance(Position::LEN);

            invoke_signed(
                &system_instruction::create_account(
                    depositor_info.key,
                    position_info.key,
                    position_lamports,
                    Position::LEN as u64,
                    program_id,
                ),
                &[
                    depositor_info.clone(),
                    position_info.clone(),
                    system_program_info.clone(),
                ],
                &[&[
                    POSITION_SEED,
                    vault_info.key.as_ref(),
                    depositor_info.key.as_ref(),
                    &[position_bump],
                ]],
            )?;

            Position::new(*vault_info.key, *depositor_info.key, position_bump)
        } else {
            let position: Position =
                Self::borsh_deserialize_unchecked(&position_info.data.borrow())?;
            if !position.is_initialized {
                return Err(VaultError::NotInitialized.into());
            }
            if position.depositor != *depositor_info.key || position.vault != *vault_info.key {
                return Err(VaultError::PositionMismatch.into());
            }
            position
        };

        position.shares = position
            .shares
            .checked_add(shares_to_mint)
            .ok_or(VaultError::ArithmeticOverflow)?;
        vault.total_shares = vault
            .total_shares
            .checked_add(shares_to_mint)
            .ok_or(VaultError::ArithmeticOverflow)?;

        borsh::to_writer(&mut position_info.try_borrow_mut_data()?.as_mut(), &position)
            .map_err(|_| ProgramError::InvalidAccountData)?;
        borsh::to_writer(&mut vault_info.try_borrow_mut_data()?.as_mut(), &vault)
            .map_err(|_| ProgramError::InvalidAccountData)?;

        msg!("Deposited {} for {} shares", amount, shares_to_mint);
        Ok(())
    }

    fn process_withdraw(
        accounts: &[AccountInfo],
        program_id: &Pubkey,
        shares: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let depositor_info = next_account_info(account_info_iter)?;
        let depositor_token_info = next_account_info(account_info_iter)?;
        let vault_info = next_account_info(account_info_iter)?;
        let pool_info = next_account_info(account_info_iter)?;
        let position_info = next_account_info(account_info_iter)?;
        let mint_info = next_account_info(account_info_iter)?;
        let token_program_info = next_account_info(account_info_iter)?;

        if !depositor_info.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }
        if shares == 0 {
            return Err(VaultError::ZeroShareAmount.into());
        }

        let mut vault = Self::load_vault(vault_info, mint_info.key, program_id)?;
        if *mint_info.key != vault.asset_mint {
            return Err(VaultError::MintMismatch.into());
        }
        if *pool_info.key != vault.asset_account {
            return Err(VaultError::PoolAccountMismatch.into());
        }

        let (position_pubkey, _) =
            Position::find_address(vault_info.key, depositor_info.key, program_id);
        if position_pubkey != *position_info.key {
            return Err(VaultError::InvalidPDA.into());
        }
        // No position account means no shares were ever minted to this actor
        if position_info.data_is_empty() {
            return Err(VaultError::InsufficientShares.into());
        }

        let mut position: Position =
            Self::borsh_deserialize_unchecked(&position_info.data.borrow())?;
        if !position.is_initialized {
            return Err(VaultError::NotInitialized.into());
        }
        if position.depositor != *depositor_info.key || position.vault != *vault_info.key {
            return Err(VaultError::PositionMismatch.into());
        }
        if shares > position.shares {
            return Err(VaultError::InsufficientShares.into());
        }

        let total_assets = spl_token::state::Account::unpack(&pool_info.data.borrow())?.amount;

        let assets_out = conversion::assets_for_withdraw(shares, vault.total_shares, total_assets)?;

        position.shares = position
            .shares
            .checked_sub(shares)
            .ok_or(VaultError::ArithmeticOverflow)?;
        vault.total_shares = vault
            .total_shares
            .checked_sub(shares)
            .ok_or(VaultError::ArithmeticOverflow)?;

        borsh::to_writer(&mut position_info.try_borrow_mut_data()?.as_mut(), &position)
            .map_err(|_| ProgramError::InvalidAccountData)?;
        borsh::to_writer(&mut vault_info.try_borrow_mut_data()?.as_mut(), &vault)
            .map_err(|_| ProgramError::InvalidAccountData)?;

        // A failed transfer aborts the transaction and unwinds the share burn
        // above, so the operation stays atomic.
        let asset_mint = vault.asset_mint;
        token::transfer_from_pool(
            token_program_info,
            pool_info,
            mint_info,
            depositor_token_info,
            vault_info,
            assets_out,
            vault.asset_decimals,
            &[VAULT_SEED, asset_mint.as_ref(), &[vault.bump]],
        )?;

        msg!("Withdrew {} for {} shares", assets_out, shares);
        Ok(())
    }

    fn load_vault(
        vault_info: &AccountInfo,
        mint: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Vault, ProgramError> {
        let (vault_pubkey, _) = Vault::find_address(mint, program_id);
        if vault_pubkey != *vault_info.key {
            return Err(VaultError::InvalidPDA.into());
        }
        if vault_info.owner != program_id || vault_info.data_is_empty() {
            return Err(VaultError::NotInitialized.into());
        }

        let vault: Vault = Self::borsh_deserialize_unchecked(&vault_info.data.borrow())?;
        if !vault.is_initialized {
            return Err(VaultError::NotInitialized.into());
        }
        Ok(vault)
    }
}

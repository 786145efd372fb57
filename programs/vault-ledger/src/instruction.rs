use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub enum VaultInstruction {
    /// Create the vault for one asset mint, with its pool token account
    /// Accounts:
    /// 0. `[signer, writable]` Payer
    /// 1. `[writable]` Vault PDA
    /// 2. `[]` Asset mint
    /// 3. `[writable]` Pool token account (vault PDA's associated token account)
    /// 4. `[]` Token program
    /// 5. `[]` Associated token program
    /// 6. `[]` System program
    InitializeVault,

    /// Move `amount` of the asset into the pool and credit proportional shares
    /// Accounts:
    /// 0. `[signer, writable]` Depositor (pays rent for a new position)
    /// 1. `[writable]` Depositor token account
    /// 2. `[writable]` Vault PDA
    /// 3. `[writable]` Pool token account
    /// 4. `[writable]` Position PDA
    /// 5. `[]` Asset mint
    /// 6. `[]` Token program
    /// 7. `[]` System program
    Deposit {
        amount: u64,
    },

    /// Burn `shares` and pay out the proportional slice of the pool
    /// Accounts:
    /// 0. `[signer]` Depositor
    /// 1. `[writable]` Depositor token account
    /// 2. `[writable]` Vault PDA
    /// 3. `[writable]` Pool token account
    /// 4. `[writable]` Position PDA
    /// 5. `[]` Asset mint
    /// 6. `[]` Token program
    Withdraw {
        shares: u64,
    },
}

impl VaultInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        let (&variant, rest) = input
            .split_first()
            .ok_or(ProgramError::InvalidInstructionData)?;

        match variant {
            0 => Ok(Self::InitializeVault),
            1 => Self::try_from_slice(rest).map_err(|_| ProgramError::InvalidInstructionData),
            2 => Self::try_from_slice(rest).map_err(|_| ProgramError::InvalidInstructionData),
            _ => Err(ProgramError::InvalidInstructionData),
        }
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(16);
        match self {
            Self::InitializeVault => {
                buf.push(0);
            }
            Self::Deposit { .. } => {
                buf.push(1);
                buf.extend_from_slice(&self.try_to_vec().unwrap());
            }
            Self::Withdraw { .. } => {
                buf.push(2);
                buf.extend_from_slice(&self.try_to_vec().unwrap());
            }
        }
        buf
    }
}

pub fn initialize_vault(
    program_id: &Pubkey,
    payer: &Pubkey,
    vault: &Pubkey,
    mint: &Pubkey,
    pool: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*vault, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(*pool, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: VaultInstruction::InitializeVault.pack(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn deposit(
    program_id: &Pubkey,
    depositor: &Pubkey,
    depositor_token: &Pubkey,
    vault: &Pubkey,
    pool: &Pubkey,
    position: &Pubkey,
    mint: &Pubkey,
    amount: u64,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*depositor, true),
            AccountMeta::new(*depositor_token, false),
            AccountMeta::new(*vault, false),
            AccountMeta::new(*pool, false),
            AccountMeta::new(*position, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: VaultInstruction::Deposit { amount }.pack(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn withdraw(
    program_id: &Pubkey,
    depositor: &Pubkey,
    depositor_token: &Pubkey,
    vault: &Pubkey,
    pool: &Pubkey,
    position: &Pubkey,
    mint: &Pubkey,
    shares: u64,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*depositor, true),
            AccountMeta::new(*depositor_token, false),
            AccountMeta::new(*vault, false),
            AccountMeta::new(*pool, false),
            AccountMeta::new(*position, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data: VaultInstruction::Withdraw { shares }.pack(),
    }
}

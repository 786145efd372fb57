use num_derive::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, FromPrimitive, PartialEq)]
pub enum VaultError {
    #[error("Invalid instruction")]
    InvalidInstruction = 0,

    #[error("Vault not initialized")]
    NotInitialized = 1,

    #[error("Vault already initialized")]
    AlreadyInitialized = 2,

    #[error("Invalid PDA")]
    InvalidPDA = 3,

    #[error("Asset mint does not match vault")]
    MintMismatch = 4,

    #[error("Pool token account does not match vault")]
    PoolAccountMismatch = 5,

    #[error("Deposit amount must be greater than zero")]
    ZeroDepositAmount = 6,

    #[error("Share amount must be greater than zero")]
    ZeroShareAmount = 7,

    #[error("Insufficient shares")]
    InsufficientShares = 8,

    #[error("Position does not belong to depositor")]
    PositionMismatch = 9,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 10,

    #[error("Divide by zero")]
    DivideByZero = 11,
}

impl PrintProgramError for VaultError {
    fn print<E>(&self) {
        use solana_program::msg;
        msg!("VaultError: {}", self);
    }
}

impl From<VaultError> for ProgramError {
    fn from(e: VaultError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for VaultError {
    fn type_of() -> &'static str {
        "VaultError"
    }
}

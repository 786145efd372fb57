//! Shared banks-client fixture: program, asset mint, funded depositors, and
//! account-read helpers that stand in for the client-side read surface.

#![allow(dead_code)]

use borsh::BorshDeserialize;
use solana_program::{instruction::Instruction, program_pack::Pack, pubkey::Pubkey, system_instruction};
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use spl_associated_token_account::get_associated_token_address;
use spl_token::state::{Account as TokenAccount, Mint};
use vault_ledger::{
    instruction as vault_instruction,
    state::{Position, Vault},
};

pub const DECIMALS: u8 = 6;

pub struct VaultFixture {
    pub context: ProgramTestContext,
    pub program_id: Pubkey,
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub pool: Pubkey,
}

pub struct TestUser {
    pub keypair: Keypair,
    pub token_account: Pubkey,
}

impl TestUser {
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}

/// Spin up the program, create the asset mint, initialize the vault, and
/// fund `user_count` depositors with `initial_tokens` each.
pub async fn setup(user_count: usize, initial_tokens: u64) -> (VaultFixture, Vec<TestUser>) {
    let program_id = vault_ledger::id();
    let program_test = ProgramTest::new(
        "vault_ledger",
        program_id,
        processor!(vault_ledger::process),
    );

    let mut context = program_test.start_with_context().await;
    let payer_pubkey = context.payer.pubkey();
    let rent = context.banks_client.get_rent().await.expect("rent");

    // Asset mint with the payer as mint authority
    let mint = Keypair::new();
    let create_mint_ixs = [
        system_instruction::create_account(
            &payer_pubkey,
            &mint.pubkey(),
            rent.minimum_balance(Mint::LEN),
            Mint::LEN as u64,
            &spl_token::id(),
        ),
        spl_token::instruction::initialize_mint(
            &spl_token::id(),
            &mint.pubkey(),
            &payer_pubkey,
            None,
            DECIMALS,
        )
        .unwrap(),
    ];
    let blockhash = context.last_blockhash;
    let tx = Transaction::new_signed_with_payer(
        &create_mint_ixs,
        Some(&payer_pubkey),
        &[&context.payer, &mint],
        blockhash,
    );
    context
        .banks_client
        .process_transaction(tx)
        .await
        .expect("create mint");

    let (vault, _) = Vault::find_address(&mint.pubkey(), &program_id);
    let pool = get_associated_token_address(&vault, &mint.pubkey());

    let mut fixture = VaultFixture {
        context,
        program_id,
        mint: mint.pubkey(),
        vault,
        pool,
    };

    let init_ix = vault_instruction::initialize_vault(
        &fixture.program_id,
        &payer_pubkey,
        &fixture.vault,
        &fixture.mint,
        &fixture.pool,
    );
    send_tx(&mut fixture, &[init_ix], &[])
        .await
        .expect("initialize vault");

    let mut users = Vec::with_capacity(user_count);
    for _ in 0..user_count {
        let keypair = Keypair::new();
        let token_account = Keypair::new();
        let fund_ixs = [
            system_instruction::transfer(&payer_pubkey, &keypair.pubkey(), 1_000_000_000),
            system_instruction::create_account(
                &payer_pubkey,
                &token_account.pubkey(),
                rent.minimum_balance(TokenAccount::LEN),
                TokenAccount::LEN as u64,
                &spl_token::id(),
            ),
            spl_token::instruction::initialize_account(
                &spl_token::id(),
                &token_account.pubkey(),
                &fixture.mint,
                &keypair.pubkey(),
            )
            .unwrap(),
            spl_token::instruction::mint_to(
                &spl_token::id(),
                &fixture.mint,
                &token_account.pubkey(),
                &payer_pubkey,
                &[],
                initial_tokens,
            )
            .unwrap(),
        ];
        send_tx(&mut fixture, &fund_ixs, &[&token_account])
            .await
            .expect("fund user");

        users.push(TestUser {
            keypair,
            token_account: token_account.pubkey(),
        });
    }

    (fixture, users)
}

/// Send a transaction with a fresh blockhash so back-to-back identical
/// instructions never collide on the same signature.
pub async fn send_tx(
    fixture: &mut VaultFixture,
    instructions: &[Instruction],
    extra_signers: &[&Keypair],
) -> Result<(), BanksClientError> {
    let blockhash = fixture
        .context
        .get_new_latest_blockhash()
        .await
        .expect("blockhash");

    let mut signers: Vec<&Keypair> = vec![&fixture.context.payer];
    signers.extend_from_slice(extra_signers);

    let tx = Transaction::new_signed_with_payer(
        instructions,
        Some(&fixture.context.payer.pubkey()),
        &signers,
        blockhash,
    );
    fixture.context.banks_client.process_transaction(tx).await
}

pub async fn deposit(
    fixture: &mut VaultFixture,
    user: &TestUser,
    amount: u64,
) -> Result<(), BanksClientError> {
    let (position, _) = Position::find_address(&fixture.vault, &user.pubkey(), &fixture.program_id);
    let ix = vault_instruction::deposit(
        &fixture.program_id,
        &user.pubkey(),
        &user.token_account,
        &fixture.vault,
        &fixture.pool,
        &position,
        &fixture.mint,
        amount,
    );
    send_tx(fixture, &[ix], &[&user.keypair]).await
}

pub async fn withdraw(
    fixture: &mut VaultFixture,
    user: &TestUser,
    shares: u64,
) -> Result<(), BanksClientError> {
    let (position, _) = Position::find_address(&fixture.vault, &user.pubkey(), &fixture.program_id);
    let ix = vault_instruction::withdraw(
        &fixture.program_id,
        &user.pubkey(),
        &user.token_account,
        &fixture.vault,
        &fixture.pool,
        &position,
        &fixture.mint,
        shares,
    );
    send_tx(fixture, &[ix], &[&user.keypair]).await
}

/// Out-of-band transfer straight into the pool token account, bypassing the
/// deposit path entirely.
pub async fn donate_to_pool(
    fixture: &mut VaultFixture,
    user: &TestUser,
    amount: u64,
) -> Result<(), BanksClientError> {
    let ix = spl_token::instruction::transfer_checked(
        &spl_token::id(),
        &user.token_account,
        &fixture.mint,
        &fixture.pool,
        &user.pubkey(),
        &[],
        amount,
        DECIMALS,
    )
    .unwrap();
    send_tx(fixture, &[ix], &[&user.keypair]).await
}

pub async fn total_shares(fixture: &mut VaultFixture) -> u64 {
    let account = fixture
        .context
        .banks_client
        .get_account(fixture.vault)
        .await
        .expect("vault read")
        .expect("vault exists");
    let vault = Vault::try_from_slice(&account.data).unwrap();
    vault.total_shares
}

pub async fn total_assets(fixture: &mut VaultFixture) -> u64 {
    let pool = fixture.pool;
    token_balance(fixture, &pool).await
}

pub async fn shares_of(fixture: &mut VaultFixture, depositor: &Pubkey) -> u64 {
    let (position, _) = Position::find_address(&fixture.vault, depositor, &fixture.program_id);
    match fixture
        .context
        .banks_client
        .get_account(position)
        .await
        .expect("position read")
    {
        Some(account) => Position::try_from_slice(&account.data).unwrap().shares,
        None => 0,
    }
}

pub async fn token_balance(fixture: &mut VaultFixture, token_account: &Pubkey) -> u64 {
    let account = fixture
        .context
        .banks_client
        .get_account(*token_account)
        .await
        .expect("token account read")
        .expect("token account exists");
    TokenAccount::unpack(&account.data).unwrap().amount
}

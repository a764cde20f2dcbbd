use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{constants::*, errors::*, states::*};

/// ========================================
/// Account Structs
/// ========================================

/// Accounts required for initializing the game
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The global game config account (PDA)
    #[account(
        init,
        payer = admin,
        space = 8 + GameConfig::INIT_SPACE,
        seeds = [CONFIG],
        bump
    )]
    pub config: Account<'info, GameConfig>,

    /// The all-time donation ledger (PDA)
    #[account(
        init,
        payer = admin,
        space = 8 + DonorBoard::INITIAL_SIZE,
        seeds = [DONOR_BOARD],
        bump
    )]
    pub donor_board: Account<'info, DonorBoard>,

    /// Treasury token account holding every pool's jackpot funds (PDA,
    /// authority is the config PDA)
    #[account(
        init,
        payer = admin,
        seeds = [TREASURY],
        bump,
        token::mint = payment_mint,
        token::authority = config,
    )]
    pub treasury: Account<'info, TokenAccount>,

    /// Mint entries and donations are denominated in
    pub payment_mint: Account<'info, Mint>,

    /// Wallet that collects house fees
    /// CHECK: Stored for reference; fees are paid to house_token_account
    pub house_fee_recipient: AccountInfo<'info>,

    /// Token account house fees are paid to (must belong to the recipient
    /// and use the payment mint)
    #[account(
        constraint = house_token_account.mint == payment_mint.key() @ BubblePopError::InvalidHouseAccount,
        constraint = house_token_account.owner == house_fee_recipient.key() @ BubblePopError::InvalidHouseAccount,
    )]
    pub house_token_account: Account<'info, TokenAccount>,

    /// Authority allowed to deliver randomness fulfillments
    /// CHECK: Any address; stored in config and enforced on fulfill_draw
    pub oracle_authority: AccountInfo<'info>,

    /// The admin account that will own the game
    #[account(mut)]
    pub admin: Signer<'info>,
    /// Token program for treasury creation
    pub token_program: Program<'info, Token>,
    /// System program for account creation
    pub system_program: Program<'info, System>,
}

/// Accounts required for creating a new pool
#[derive(Accounts)]
#[instruction(pool_id: u8)]
pub struct CreatePool<'info> {
    /// The global game config account (PDA)
    #[account(
        mut,
        has_one = admin,
        seeds = [CONFIG],
        bump = config.bump,
    )]
    pub config: Account<'info, GameConfig>,

    /// The pool state account to create (PDA)
    #[account(
        init,
        payer = admin,
        space = 8 + Pool::INITIAL_SIZE,
        seeds = [POOL, &[pool_id]],
        bump
    )]
    pub pool: Account<'info, Pool>,

    /// Admin account (must match config.admin)
    #[account(mut)]
    pub admin: Signer<'info>,
    /// System program for account creation
    pub system_program: Program<'info, System>,
}

/// Accounts required for admin config updates (automation, oracle, transfer)
#[derive(Accounts)]
pub struct AdminUpdate<'info> {
    /// The global game config account (PDA)
    #[account(
        mut,
        has_one = admin,
        seeds = [CONFIG],
        bump = config.bump,
    )]
    pub config: Account<'info, GameConfig>,

    /// Admin account (must match config.admin)
    pub admin: Signer<'info>,
}

/// Accounts required for clearing a stuck randomness request
#[derive(Accounts)]
#[instruction(pool_id: u8)]
pub struct EmergencyResetVrf<'info> {
    /// The global game config account (PDA)
    #[account(
        has_one = admin,
        seeds = [CONFIG],
        bump = config.bump,
    )]
    pub config: Account<'info, GameConfig>,

    /// The pool whose pending request is cleared
    #[account(
        mut,
        seeds = [POOL, &[pool_id]],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    /// Admin account (must match config.admin)
    pub admin: Signer<'info>,
}

/// Accounts required for entering a pool
#[derive(Accounts)]
#[instruction(pool_id: u8)]
pub struct Enter<'info> {
    /// The global game config account (PDA)
    #[account(
        seeds = [CONFIG],
        bump = config.bump,
    )]
    pub config: Account<'info, GameConfig>,

    /// The pool being entered; grows by one entrant pubkey
    #[account(
        mut,
        seeds = [POOL, &[pool_id]],
        bump = pool.bump,
        // Reallocate space for one more entry (32 bytes per pubkey)
        realloc = pool.to_account_info().data_len() + 32,
        realloc::payer = user,
        realloc::zero = false,
    )]
    pub pool: Account<'info, Pool>,

    /// User entering the pool
    #[account(mut)]
    pub user: Signer<'info>,

    /// User's token account paying the entry price
    #[account(
        mut,
        constraint = user_token_account.mint == config.payment_mint @ BubblePopError::MintMismatch,
        constraint = user_token_account.owner == user.key() @ BubblePopError::AccountMismatch,
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// Treasury token account receiving the entry price (PDA)
    #[account(
        mut,
        seeds = [TREASURY],
        bump = config.treasury_bump,
    )]
    pub treasury: Account<'info, TokenAccount>,

    /// Token program for the payment transfer
    pub token_program: Program<'info, Token>,
    /// System program for reallocation
    pub system_program: Program<'info, System>,
}

/// Accounts required for donating to a pool's jackpot
#[derive(Accounts)]
#[instruction(pool_id: u8)]
pub struct Donate<'info> {
    /// The global game config account (PDA)
    #[account(
        seeds = [CONFIG],
        bump = config.bump,
    )]
    pub config: Account<'info, GameConfig>,

    /// The pool receiving the donation; may grow by one donor entry
    #[account(
        mut,
        seeds = [POOL, &[pool_id]],
        bump = pool.bump,
        // Reallocate space for one more donor entry
        realloc = pool.to_account_info().data_len() + DonorEntry::SPACE,
        realloc::payer = donor,
        realloc::zero = false,
    )]
    pub pool: Account<'info, Pool>,

    /// The all-time donation ledger; grows by one record
    #[account(
        mut,
        seeds = [DONOR_BOARD],
        bump = donor_board.bump,
        // Reallocate space for one more donation record
        realloc = donor_board.to_account_info().data_len() + DonationRecord::SPACE,
        realloc::payer = donor,
        realloc::zero = false,
    )]
    pub donor_board: Account<'info, DonorBoard>,

    /// Donor funding the jackpot
    #[account(mut)]
    pub donor: Signer<'info>,

    /// Donor's token account paying the donation
    #[account(
        mut,
        constraint = donor_token_account.mint == config.payment_mint @ BubblePopError::MintMismatch,
        constraint = donor_token_account.owner == donor.key() @ BubblePopError::AccountMismatch,
    )]
    pub donor_token_account: Account<'info, TokenAccount>,

    /// Treasury token account receiving the donation (PDA)
    #[account(
        mut,
        seeds = [TREASURY],
        bump = config.treasury_bump,
    )]
    pub treasury: Account<'info, TokenAccount>,

    /// Token program for the payment transfer
    pub token_program: Program<'info, Token>,
    /// System program for reallocation
    pub system_program: Program<'info, System>,
}

/// Accounts required for ending an elapsed grace period
#[derive(Accounts)]
#[instruction(pool_id: u8)]
pub struct EndGracePeriod<'info> {
    /// The pool whose grace period is rolled over
    #[account(
        mut,
        seeds = [POOL, &[pool_id]],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    /// Anyone may crank the rollover once the grace period has elapsed
    pub cranker: Signer<'info>,
}

/// Accounts required for requesting a draw (normal or forced)
#[derive(Accounts)]
#[instruction(pool_id: u8)]
pub struct RequestDraw<'info> {
    /// The global game config carrying the request id counter (PDA)
    #[account(
        mut,
        seeds = [CONFIG],
        bump = config.bump,
    )]
    pub config: Account<'info, GameConfig>,

    /// The pool to draw
    #[account(
        mut,
        seeds = [POOL, &[pool_id]],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    /// Anyone may request a draw; eligibility is enforced on pool state
    pub requester: Signer<'info>,
}

/// Accounts required for fulfilling a draw with oracle randomness
#[derive(Accounts)]
#[instruction(pool_id: u8)]
pub struct FulfillDraw<'info> {
    /// The global game config account (PDA)
    #[account(
        seeds = [CONFIG],
        bump = config.bump,
    )]
    pub config: Account<'info, GameConfig>,

    /// The pool the randomness belongs to
    #[account(
        mut,
        seeds = [POOL, &[pool_id]],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    /// Oracle authority delivering the randomness
    #[account(address = config.oracle_authority @ BubblePopError::UnauthorizedOracle)]
    pub oracle: Signer<'info>,

    /// Treasury token account paying out the jackpot (PDA)
    #[account(
        mut,
        seeds = [TREASURY],
        bump = config.treasury_bump,
    )]
    pub treasury: Account<'info, TokenAccount>,

    /// Winner's token account for the payout
    /// CHECK: Validated in the handler once the winner is known
    #[account(mut)]
    pub winner_token_account: AccountInfo<'info>,

    /// Token account house fees are paid to
    #[account(
        mut,
        address = config.house_token_account @ BubblePopError::InvalidHouseAccount,
    )]
    pub house_token_account: Account<'info, TokenAccount>,

    /// Token program for the payout transfers
    pub token_program: Program<'info, Token>,
}

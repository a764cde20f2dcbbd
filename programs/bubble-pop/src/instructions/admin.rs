use anchor_lang::prelude::*;

use crate::{contexts::*, errors::BubblePopError, events::*, states::GameParams};

/// ========================================
/// Admin Instructions
/// ========================================

/// Initialize the bubble pop game
///
/// Creates the global config, the shared treasury token account and the
/// all-time donor board. The caller becomes the admin. Automation starts
/// disabled; pools are created separately.
///
/// Args:
/// - ctx: Context containing config, donor_board, treasury and admin accounts
/// - params: Economic and scheduling parameters shared by every pool
///
/// Returns: Result indicating success or failure
///
/// Constraints:
/// - params must be internally consistent (fees below 100%, cap at or above
///   base, cap within the denominator, positive durations)
pub fn initialize(ctx: Context<Initialize>, params: GameParams) -> Result<()> {
    params.validate()?;

    let config = &mut ctx.accounts.config;
    config.admin = ctx.accounts.admin.key();
    config.oracle_authority = ctx.accounts.oracle_authority.key();
    config.payment_mint = ctx.accounts.payment_mint.key();
    config.house_fee_recipient = ctx.accounts.house_fee_recipient.key();
    config.house_token_account = ctx.accounts.house_token_account.key();
    config.bump = ctx.bumps.config;
    config.treasury_bump = ctx.bumps.treasury;
    config.pool_count = 0;
    // request id 0 is reserved as the "no pending request" marker
    config.next_request_id = 1;
    config.house_fee_bps = params.house_fee_bps;
    config.rollover_bps = params.rollover_bps;
    config.grace_period_duration = params.grace_period_duration;
    config.escalation_period = params.escalation_period;
    config.base_chance = params.base_chance;
    config.cap_chance = params.cap_chance;
    config.chance_denominator = params.chance_denominator;
    config.max_round_duration = params.max_round_duration;
    config.automation_enabled = false;
    config.min_entries_for_draw = params.min_entries_for_draw;
    config.min_interval_between_draws = params.min_interval_between_draws;

    ctx.accounts.donor_board.bump = ctx.bumps.donor_board;

    emit!(GameInitialized {
        admin: ctx.accounts.admin.key(),
        payment_mint: config.payment_mint,
        oracle_authority: config.oracle_authority,
        config: config.key(),
    });
    Ok(())
}

/// Create the next pool
///
/// Pools carry a fixed entry price and run their rounds independently.
/// Ids are sequential; the first round opens immediately.
///
/// Args:
/// - ctx: Context containing config, the new pool PDA and admin
/// - pool_id: Must equal the current pool count
/// - entry_price: Fixed price per entry in payment mint units
///
/// Returns: Result indicating success or failure
pub fn create_pool(ctx: Context<CreatePool>, pool_id: u8, entry_price: u64) -> Result<()> {
    require!(entry_price > 0, BubblePopError::InvalidAmount);
    require_eq!(
        pool_id,
        ctx.accounts.config.pool_count,
        BubblePopError::InvalidPoolId
    );

    let clock = Clock::get()?;
    let config = &mut ctx.accounts.config;
    let pool = &mut ctx.accounts.pool;

    pool.pool_id = pool_id;
    pool.bump = ctx.bumps.pool;
    pool.entry_price = entry_price;
    pool.jackpot = 0;
    pool.round_id = 1;
    pool.round_start_time = clock.unix_timestamp;
    pool.last_payout_time = clock.unix_timestamp;
    pool.in_grace_period = false;
    pool.grace_period_end = 0;
    pool.vrf_pending = false;
    pool.pending_request_id = 0;
    pool.pending_forced = false;
    pool.last_winner = Pubkey::default();
    pool.last_win_amount = 0;
    pool.entries = Vec::new();
    pool.donors = Vec::new();

    config.pool_count = config
        .pool_count
        .checked_add(1)
        .ok_or(BubblePopError::MathOverflow)?;

    emit!(PoolCreated {
        pool_id,
        entry_price,
        round_start_time: pool.round_start_time,
    });
    Ok(())
}

/// Update the automation configuration
///
/// Controls whether the off-chain keeper should trigger draws at all, how
/// many entries a pool needs before an automated draw, and the minimum
/// spacing between automated draws.
///
/// Args:
/// - ctx: Context containing config and admin
/// - enabled: Whether automation should run
/// - min_entries_for_draw: Entry threshold for automated draws (at least 1)
/// - min_interval_between_draws: Spacing in seconds (non-negative)
///
/// Returns: Result indicating success or failure
pub fn set_automation_config(
    ctx: Context<AdminUpdate>,
    enabled: bool,
    min_entries_for_draw: u64,
    min_interval_between_draws: i64,
) -> Result<()> {
    require!(min_entries_for_draw >= 1, BubblePopError::InvalidConfig);
    require!(
        min_interval_between_draws >= 0,
        BubblePopError::InvalidConfig
    );

    let config = &mut ctx.accounts.config;
    config.automation_enabled = enabled;
    config.min_entries_for_draw = min_entries_for_draw;
    config.min_interval_between_draws = min_interval_between_draws;

    emit!(AutomationConfigUpdated {
        admin: ctx.accounts.admin.key(),
        enabled,
        min_entries_for_draw,
        min_interval_between_draws,
    });
    Ok(())
}

/// Rotate the oracle authority allowed to fulfill draws
///
/// Outstanding requests stay pending and can be fulfilled by the new
/// authority (or cleared with emergency_reset_vrf).
pub fn set_oracle_authority(ctx: Context<AdminUpdate>, new_oracle: Pubkey) -> Result<()> {
    let config = &mut ctx.accounts.config;
    let previous_oracle = config.oracle_authority;
    config.oracle_authority = new_oracle;

    emit!(OracleAuthorityUpdated {
        previous_oracle,
        new_oracle,
    });
    Ok(())
}

/// Transfer admin privileges to a new account
///
/// Changes the admin of the game to a new public key.
/// Only the current admin can perform this operation.
pub fn transfer_admin(ctx: Context<AdminUpdate>, new_admin: Pubkey) -> Result<()> {
    let config = &mut ctx.accounts.config;
    let previous_admin = config.admin;
    config.admin = new_admin;

    emit!(AdminTransferred {
        previous_admin,
        new_admin,
    });
    Ok(())
}

/// Clear a randomness request that will never be fulfilled
///
/// Recovery hatch for an oracle that stopped calling back: clears the
/// pending request so a new draw can be started. Jackpot, entries and round
/// state are untouched, and a late fulfillment of the abandoned id is
/// silently ignored.
///
/// Args:
/// - ctx: Context containing config, the stuck pool and admin
/// - pool_id: Pool whose request is cleared
///
/// Returns: Result indicating success or failure
///
/// Constraints:
/// - The pool must actually have an outstanding request
pub fn emergency_reset_vrf(ctx: Context<EmergencyResetVrf>, pool_id: u8) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let request_id = pool.emergency_reset()?;

    msg!(
        "cleared pending draw request {} on pool {}",
        request_id,
        pool_id
    );

    emit!(EmergencyVrfReset {
        pool_id,
        request_id,
    });
    Ok(())
}

use anchor_lang::prelude::*;

use crate::{contexts::*, events::*, helpers::transfer_to_treasury};

/// ========================================
/// User Instructions
/// ========================================

/// Enter a pool
///
/// The entrant pays the pool's fixed entry price into the treasury and is
/// appended to the current round's entry list. Repeat entries are allowed
/// and each one is a separate chance to win. If a previous round's grace
/// period has already expired, it is rolled over here before the entry is
/// taken, so the first entrant after a payout opens the next round.
///
/// Process:
/// 1. Roll over an expired grace period (lazy rollover)
/// 2. Validate pool state and capacity, credit the jackpot, append the entrant
/// 3. Debit the entry price into the treasury
///
/// Args:
/// - ctx: Context containing config, pool, treasury and the entrant
/// - pool_id: Pool to enter
///
/// Returns: Result indicating success or failure
///
/// Constraints:
/// - The pool must not be inside an active grace period
pub fn enter(ctx: Context<Enter>, pool_id: u8) -> Result<()> {
    let clock = Clock::get()?;
    let pool = &mut ctx.accounts.pool;
    let player = ctx.accounts.user.key();

    // ============ ENTRY RECORDING ============
    let outcome = pool.record_entry(player, clock.unix_timestamp)?;
    if outcome.rolled_over {
        emit!(GracePeriodEnded {
            pool_id,
            round_id: pool.round_id,
        });
    }
    let entry_price = pool.entry_price;

    // ============ PAYMENT PROCESSING ============
    transfer_to_treasury(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.user_token_account.to_account_info(),
        ctx.accounts.treasury.to_account_info(),
        ctx.accounts.user.to_account_info(),
        entry_price,
    )?;

    emit!(EntrySubmitted {
        pool_id,
        player,
        entry_index: outcome.entry_index,
        slot: clock.slot,
    });
    Ok(())
}

/// Donate to a pool's jackpot
///
/// Donations sweeten the jackpot without buying a chance to win. They are
/// accepted in any pool state (including grace periods), accumulate per
/// donor on the current round's ledger, and are appended to the all-time
/// donor board backing the rolling leaderboard.
///
/// Args:
/// - ctx: Context containing config, pool, donor_board, treasury and donor
/// - pool_id: Pool to donate to
/// - amount: Donation in payment mint units (must be positive)
///
/// Returns: Result indicating success or failure
pub fn donate(ctx: Context<Donate>, pool_id: u8, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let pool = &mut ctx.accounts.pool;
    let donor = ctx.accounts.donor.key();

    // ============ LEDGER UPDATES ============
    let new_jackpot = pool.record_donation(donor, amount)?;
    ctx.accounts
        .donor_board
        .record(pool_id, donor, amount, clock.unix_timestamp)?;

    // ============ PAYMENT PROCESSING ============
    transfer_to_treasury(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.donor_token_account.to_account_info(),
        ctx.accounts.treasury.to_account_info(),
        ctx.accounts.donor.to_account_info(),
        amount,
    )?;

    emit!(DonationReceived {
        pool_id,
        donor,
        amount,
        new_jackpot,
    });
    Ok(())
}

/// End an elapsed grace period and open the next round
///
/// Permissionless crank: anyone may roll the pool over once the post-payout
/// cool-down has passed. Clears the entry list, bumps the round id and
/// restarts the odds escalation clock; the rollover seed stays in the
/// jackpot.
///
/// Args:
/// - ctx: Context containing the pool and any signer
/// - pool_id: Pool to roll over
///
/// Returns: Result indicating success or failure
///
/// Constraints:
/// - The pool must be in a grace period whose deadline has passed
pub fn end_grace_period(ctx: Context<EndGracePeriod>, pool_id: u8) -> Result<()> {
    let clock = Clock::get()?;
    let pool = &mut ctx.accounts.pool;

    pool.end_grace(clock.unix_timestamp)?;

    emit!(GracePeriodEnded {
        pool_id,
        round_id: pool.round_id,
    });
    Ok(())
}

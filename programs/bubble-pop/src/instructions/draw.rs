use anchor_lang::prelude::*;

use crate::{
    contexts::*,
    errors::BubblePopError,
    events::*,
    helpers::{transfer_from_treasury, validate_payout_account},
    states::DrawOutcome,
};

/// ========================================
/// Draw Instructions
/// ========================================

/// Request a randomness draw for a pool
///
/// Permissionless: the automation keeper (or anyone) may trigger a draw
/// whenever the pool state allows one. Assigns the next correlation id,
/// records it on the pool and parks the pool awaiting randomness. The
/// oracle fulfills asynchronously via fulfill_draw.
///
/// Args:
/// - ctx: Context containing config (request id counter) and the pool
/// - pool_id: Pool to draw
///
/// Returns: Result indicating success or failure
///
/// Constraints:
/// - The pool must have entries, be outside any grace period, and have no
///   outstanding request
pub fn request_draw(ctx: Context<RequestDraw>, pool_id: u8) -> Result<()> {
    process_request(ctx, pool_id, false)
}

/// Request a forced draw that is guaranteed to select a winner
///
/// Available once the round has outlived the maximum round duration, so a
/// jackpot can never be stranded by an unlucky streak of rolls.
///
/// Args:
/// - ctx: Context containing config (request id counter) and the pool
/// - pool_id: Pool to draw
///
/// Returns: Result indicating success or failure
///
/// Constraints:
/// - Same as request_draw, plus the round must have reached its maximum
///   duration
pub fn request_forced_draw(ctx: Context<RequestDraw>, pool_id: u8) -> Result<()> {
    process_request(ctx, pool_id, true)
}

fn process_request(ctx: Context<RequestDraw>, pool_id: u8, forced: bool) -> Result<()> {
    let clock = Clock::get()?;
    let config = &mut ctx.accounts.config;
    let pool = &mut ctx.accounts.pool;

    // ============ REQUEST ID ASSIGNMENT ============
    let request_id = config.next_request_id;
    config.next_request_id = request_id
        .checked_add(1)
        .ok_or(BubblePopError::MathOverflow)?;

    // ============ POOL STATE TRANSITION ============
    pool.begin_draw(config, request_id, forced, clock.unix_timestamp)?;

    if forced {
        emit!(ForcedDrawRequested {
            pool_id,
            request_id,
        });
    } else {
        emit!(RandomnessRequested {
            pool_id,
            request_id,
            total_entries: pool.entry_count(),
            win_chance: pool.current_win_chance(config, clock.unix_timestamp),
        });
    }
    Ok(())
}

/// Deliver oracle randomness and settle a pending draw
///
/// Only the configured oracle authority may call this. A stale, unknown or
/// replayed request id is logged and ignored without error, so a duplicate
/// or late delivery can never corrupt pool state. On a winning outcome the
/// jackpot is split and paid from the treasury; on a losing roll the pool
/// simply reopens with everything intact.
///
/// Process:
/// 1. Drop the fulfillment unless it matches the outstanding request
/// 2. Apply the seed: win-or-lose roll, then winner selection
/// 3. On a win, validate the winner's token account and pay out
///
/// Args:
/// - ctx: Context containing config, pool, treasury and payout accounts
/// - pool_id: Pool the randomness belongs to
/// - request_id: Correlation id assigned by the matching request
/// - randomness: 32-byte oracle seed
///
/// Returns: Result indicating success or failure
///
/// Constraints:
/// - The signer must be the configured oracle authority
/// - On a win, winner_token_account must belong to the drawn winner and use
///   the payment mint (a mismatch aborts and leaves the request pending)
pub fn fulfill_draw(
    ctx: Context<FulfillDraw>,
    pool_id: u8,
    request_id: u64,
    randomness: [u8; 32],
) -> Result<()> {
    let clock = Clock::get()?;
    let config = &ctx.accounts.config;
    let pool = &mut ctx.accounts.pool;

    // ============ REQUEST CORRELATION ============
    if !pool.matches_pending(request_id) {
        msg!(
            "ignoring randomness for request {}: pool {} has no matching pending request",
            request_id,
            pool_id
        );
        return Ok(());
    }

    // ============ SETTLEMENT ============
    let outcome = pool.settle_draw(config, &randomness, clock.unix_timestamp)?;

    match outcome {
        DrawOutcome::NoWin { odds } => {
            emit!(NoWinnerThisRoll {
                pool_id,
                request_id,
                current_odds: odds,
            });
        }
        DrawOutcome::Winner {
            winner,
            winner_index,
            payout,
            house_fee,
        } => {
            msg!(
                "pool {} round won by entry {} ({})",
                pool_id,
                winner_index,
                winner
            );

            // ============ PAYOUT EXECUTION ============
            validate_payout_account(
                &ctx.accounts.winner_token_account,
                &winner,
                &config.payment_mint,
            )?;

            transfer_from_treasury(
                ctx.accounts.token_program.to_account_info(),
                ctx.accounts.treasury.to_account_info(),
                ctx.accounts.winner_token_account.to_account_info(),
                ctx.accounts.config.to_account_info(),
                config.bump,
                payout,
            )?;
            if house_fee > 0 {
                transfer_from_treasury(
                    ctx.accounts.token_program.to_account_info(),
                    ctx.accounts.treasury.to_account_info(),
                    ctx.accounts.house_token_account.to_account_info(),
                    ctx.accounts.config.to_account_info(),
                    config.bump,
                    house_fee,
                )?;
            }

            emit!(WinnerSelected {
                pool_id,
                winner,
                amount: payout,
                house_fee,
                request_id,
            });
            emit!(GracePeriodStarted {
                pool_id,
                end_time: pool.grace_period_end,
            });
        }
    }
    Ok(())
}

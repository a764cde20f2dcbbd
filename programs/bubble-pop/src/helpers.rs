use crate::{constants::*, errors::BubblePopError};

use anchor_lang::prelude::*;

/// ========================================
/// Odds and Payout Math
/// ========================================

/// Computes the current win chance numerator for a round.
///
/// The chance climbs linearly from `base_chance` at round start to
/// `cap_chance` once `escalation_period` seconds have elapsed, and stays
/// at the cap afterwards. All math is integer, widened to u128 for the
/// intermediate product, so results are deterministic.
///
/// Args:
/// - round_start_time: Unix timestamp the round opened
/// - now: Current unix timestamp
/// - base_chance: Chance numerator at round start
/// - cap_chance: Chance numerator once fully escalated
/// - escalation_period: Seconds to climb from base to cap
///
/// Returns: The chance numerator at `now`, over the configured denominator
pub fn win_chance(
    round_start_time: i64,
    now: i64,
    base_chance: u64,
    cap_chance: u64,
    escalation_period: i64,
) -> u64 {
    // A clock that reads earlier than round start counts as zero elapsed
    let elapsed = now.saturating_sub(round_start_time).max(0);
    if escalation_period <= 0 || elapsed >= escalation_period {
        return cap_chance;
    }
    let span = cap_chance.saturating_sub(base_chance);
    let escalated = (span as u128 * elapsed as u128) / escalation_period as u128;
    base_chance.saturating_add(escalated as u64)
}

/// Three-way split of a jackpot at payout time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JackpotSplit {
    pub payout: u64,
    pub house_fee: u64,
    pub rollover: u64,
}

/// Splits a jackpot into winner payout, house fee and next-round seed.
///
/// The house fee and rollover are basis-point floors; the winner receives
/// the remainder, so the three parts always sum to the input jackpot
/// exactly and the rollover is the exact seed of the next round.
pub fn split_jackpot(jackpot: u64, house_fee_bps: u16, rollover_bps: u16) -> Result<JackpotSplit> {
    let house_fee = ((jackpot as u128 * house_fee_bps as u128) / BPS_DENOMINATOR as u128) as u64;
    let rollover = ((jackpot as u128 * rollover_bps as u128) / BPS_DENOMINATOR as u128) as u64;
    let payout = jackpot
        .checked_sub(house_fee)
        .and_then(|rest| rest.checked_sub(rollover))
        .ok_or(BubblePopError::MathOverflow)?;

    Ok(JackpotSplit {
        payout,
        house_fee,
        rollover,
    })
}

/// ========================================
/// Randomness Derivation
/// ========================================

/// Derives the two independent sub-values used to settle a draw from a
/// single 32-byte oracle seed.
///
/// Bytes 0..8 (little-endian) select the winner index, bytes 8..16 produce
/// the win-or-lose roll. Both consumers reduce their word modulo their own
/// range, so the two outcomes never share bits.
pub fn randomness_words(randomness: &[u8; 32]) -> (u64, u64) {
    let mut index_bytes = [0u8; 8];
    let mut roll_bytes = [0u8; 8];
    index_bytes.copy_from_slice(&randomness[0..8]);
    roll_bytes.copy_from_slice(&randomness[8..16]);
    (
        u64::from_le_bytes(index_bytes),
        u64::from_le_bytes(roll_bytes),
    )
}

/// ========================================
/// Token Transfer Helpers
/// ========================================

/// Debits `amount` from a payer's token account into the treasury.
///
/// The payer signs the transfer themselves; standard SPL token CPI.
pub fn transfer_to_treasury<'info>(
    token_program: AccountInfo<'info>,
    from: AccountInfo<'info>,
    treasury: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    let cpi_accounts = anchor_spl::token::Transfer {
        from,
        to: treasury,
        authority,
    };
    let cpi_ctx = CpiContext::new(token_program, cpi_accounts);
    anchor_spl::token::transfer(cpi_ctx, amount)
}

/// Pays `amount` out of the treasury, signed by the config PDA.
pub fn transfer_from_treasury<'info>(
    token_program: AccountInfo<'info>,
    treasury: AccountInfo<'info>,
    recipient: AccountInfo<'info>,
    config: AccountInfo<'info>,
    config_bump: u8,
    amount: u64,
) -> Result<()> {
    let bump = [config_bump];
    let seeds: &[&[u8]] = &[CONFIG, &bump];
    let signer_seeds = &[seeds];

    let cpi_accounts = anchor_spl::token::Transfer {
        from: treasury,
        to: recipient,
        authority: config,
    };
    let cpi_ctx = CpiContext::new_with_signer(token_program, cpi_accounts, signer_seeds);
    anchor_spl::token::transfer(cpi_ctx, amount)
}

/// Validates that a payout destination is a token account owned by the
/// expected wallet and denominated in the expected mint.
///
/// The winner is only known once the oracle seed has been applied, so this
/// check runs in the handler rather than as an account constraint. A
/// mismatch aborts the transaction and leaves the pending request intact.
pub fn validate_payout_account(
    account: &AccountInfo,
    expected_owner: &Pubkey,
    expected_mint: &Pubkey,
) -> Result<()> {
    // ============ OWNERSHIP VERIFICATION ============
    require_keys_eq!(
        *account.owner,
        anchor_spl::token::ID,
        BubblePopError::InvalidWinnerAccount
    );

    // ============ ACCOUNT MATCHING ============
    let token_account =
        anchor_spl::token::TokenAccount::try_deserialize(&mut account.data.borrow().as_ref())?;
    require_keys_eq!(
        token_account.owner,
        *expected_owner,
        BubblePopError::InvalidWinnerAccount
    );
    require_keys_eq!(
        token_account.mint,
        *expected_mint,
        BubblePopError::InvalidWinnerAccount
    );

    Ok(())
}

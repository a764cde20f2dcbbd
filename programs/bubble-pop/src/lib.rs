//! Bubble Pop Program
//!
//! A Solana program that implements a pooled, chance-based payout game where users can:
//! - Pay a fixed entry price into one of several independent jackpot pools
//! - Win the accumulated jackpot through draws whose odds escalate the longer a round runs
//!
//! Draws are requested on-chain and fulfilled asynchronously by a randomness oracle,
//! correlated by request id. The program supports jackpot donations with a rolling donor
//! leaderboard, post-payout grace periods, forced draws for expired rounds, and admin
//! controls for automation scheduling and oracle rotation.

#![allow(deprecated)]
#![allow(unexpected_cfgs)]
use anchor_lang::prelude::*;

pub mod constants;
pub mod contexts;
pub mod errors;
pub mod events;
pub mod helpers;
pub mod instructions;
pub mod states;

use contexts::*;
use states::GameParams;

declare_id!("BKUqbhhZ6jU75eKp1Z1CAik55JBadmL259pYRLvpyKiL");

#[program]
pub mod bubble_pop {
    use super::*;

    // ========================================
    // Admin Instructions
    // ========================================

    /// Initialize the game: global config, treasury and donor board
    pub fn initialize(ctx: Context<Initialize>, params: GameParams) -> Result<()> {
        instructions::admin::initialize(ctx, params)
    }

    /// Create the next pool with a fixed entry price
    pub fn create_pool(ctx: Context<CreatePool>, pool_id: u8, entry_price: u64) -> Result<()> {
        instructions::admin::create_pool(ctx, pool_id, entry_price)
    }

    /// Update the automation (keeper) configuration
    pub fn set_automation_config(
        ctx: Context<AdminUpdate>,
        enabled: bool,
        min_entries_for_draw: u64,
        min_interval_between_draws: i64,
    ) -> Result<()> {
        instructions::admin::set_automation_config(
            ctx,
            enabled,
            min_entries_for_draw,
            min_interval_between_draws,
        )
    }

    /// Rotate the oracle authority allowed to fulfill draws
    pub fn set_oracle_authority(ctx: Context<AdminUpdate>, new_oracle: Pubkey) -> Result<()> {
        instructions::admin::set_oracle_authority(ctx, new_oracle)
    }

    /// Transfer admin privileges to a new account
    pub fn transfer_admin(ctx: Context<AdminUpdate>, new_admin: Pubkey) -> Result<()> {
        instructions::admin::transfer_admin(ctx, new_admin)
    }

    /// Clear a randomness request that will never be fulfilled
    pub fn emergency_reset_vrf(ctx: Context<EmergencyResetVrf>, pool_id: u8) -> Result<()> {
        instructions::admin::emergency_reset_vrf(ctx, pool_id)
    }

    // ========================================
    // User Instructions
    // ========================================

    /// Pay the entry price for one chance in the pool's current round
    pub fn enter(ctx: Context<Enter>, pool_id: u8) -> Result<()> {
        instructions::user::enter(ctx, pool_id)
    }

    /// Donate to a pool's jackpot without buying a chance to win
    pub fn donate(ctx: Context<Donate>, pool_id: u8, amount: u64) -> Result<()> {
        instructions::user::donate(ctx, pool_id, amount)
    }

    /// Roll an elapsed grace period over into the next round (permissionless)
    pub fn end_grace_period(ctx: Context<EndGracePeriod>, pool_id: u8) -> Result<()> {
        instructions::user::end_grace_period(ctx, pool_id)
    }

    // ========================================
    // Draw Instructions
    // ========================================

    /// Request a randomness draw for a pool (permissionless)
    pub fn request_draw(ctx: Context<RequestDraw>, pool_id: u8) -> Result<()> {
        instructions::draw::request_draw(ctx, pool_id)
    }

    /// Request a guaranteed-winner draw for an expired round (permissionless)
    pub fn request_forced_draw(ctx: Context<RequestDraw>, pool_id: u8) -> Result<()> {
        instructions::draw::request_forced_draw(ctx, pool_id)
    }

    /// Deliver oracle randomness and settle a pending draw (oracle only)
    pub fn fulfill_draw(
        ctx: Context<FulfillDraw>,
        pool_id: u8,
        request_id: u64,
        randomness: [u8; 32],
    ) -> Result<()> {
        instructions::draw::fulfill_draw(ctx, pool_id, request_id, randomness)
    }
}

/// Events module for the Bubble Pop program
/// Contains all event structures that are emitted by the program instructions
/// for off-chain tracking and monitoring.
use anchor_lang::prelude::*;

/// Emitted when the game is initialized
#[event]
pub struct GameInitialized {
    pub admin: Pubkey,
    pub payment_mint: Pubkey,
    pub oracle_authority: Pubkey,
    pub config: Pubkey,
}

/// Emitted when a new pool is created
#[event]
pub struct PoolCreated {
    pub pool_id: u8,
    pub entry_price: u64,
    pub round_start_time: i64,
}

/// Emitted when a player enters a pool
#[event]
pub struct EntrySubmitted {
    pub pool_id: u8,
    pub player: Pubkey,
    pub entry_index: u64,
    pub slot: u64,
}

/// Emitted when a donation is credited to a pool's jackpot
#[event]
pub struct DonationReceived {
    pub pool_id: u8,
    pub donor: Pubkey,
    pub amount: u64,
    pub new_jackpot: u64,
}

/// Emitted when a draw is requested and randomness is awaited
#[event]
pub struct RandomnessRequested {
    pub pool_id: u8,
    pub request_id: u64,
    pub total_entries: u64,
    pub win_chance: u64,
}

/// Emitted when a forced draw is requested for an expired round
#[event]
pub struct ForcedDrawRequested {
    pub pool_id: u8,
    pub request_id: u64,
}

/// Emitted when a draw settles with a winner
#[event]
pub struct WinnerSelected {
    pub pool_id: u8,
    pub winner: Pubkey,
    pub amount: u64,
    pub house_fee: u64,
    pub request_id: u64,
}

/// Emitted when a draw settles without a winner
#[event]
pub struct NoWinnerThisRoll {
    pub pool_id: u8,
    pub request_id: u64,
    pub current_odds: u64,
}

/// Emitted when a payout opens a pool's grace period
#[event]
pub struct GracePeriodStarted {
    pub pool_id: u8,
    pub end_time: i64,
}

/// Emitted when a grace period is rolled over into a fresh round
#[event]
pub struct GracePeriodEnded {
    pub pool_id: u8,
    pub round_id: u64,
}

/// Emitted when the admin clears a stuck randomness request
#[event]
pub struct EmergencyVrfReset {
    pub pool_id: u8,
    pub request_id: u64,
}

/// Emitted when the automation configuration changes
#[event]
pub struct AutomationConfigUpdated {
    pub admin: Pubkey,
    pub enabled: bool,
    pub min_entries_for_draw: u64,
    pub min_interval_between_draws: i64,
}

/// Emitted when the oracle authority is rotated
#[event]
pub struct OracleAuthorityUpdated {
    pub previous_oracle: Pubkey,
    pub new_oracle: Pubkey,
}

/// Emitted when admin privileges are transferred
#[event]
pub struct AdminTransferred {
    pub previous_admin: Pubkey,
    pub new_admin: Pubkey,
}

use anchor_lang::prelude::*;
/// Constants module for the Bubble Pop program
///
/// Contains all program-wide constants, default game parameters
/// and PDA seed values.

/// Denominator for basis-point fee math
#[constant]
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Default house fee taken from each payout, in basis points (2.5%)
#[constant]
pub const DEFAULT_HOUSE_FEE_BPS: u16 = 250;

/// Default share of each payout held back to seed the next round, in basis points (7.5%)
#[constant]
pub const DEFAULT_ROLLOVER_BPS: u16 = 750;

/// Default post-payout grace period, in seconds (15 minutes)
#[constant]
pub const DEFAULT_GRACE_PERIOD: i64 = 900;

/// Default period over which the win chance climbs from base to cap (14 days)
#[constant]
pub const DEFAULT_ESCALATION_PERIOD: i64 = 14 * 86_400;

/// Default win chance numerator at round start (100 ppm = 0.01%)
#[constant]
pub const DEFAULT_BASE_CHANCE: u64 = 100;

/// Default win chance numerator once fully escalated (700 ppm = 0.07%)
#[constant]
pub const DEFAULT_CAP_CHANCE: u64 = 700;

/// Default win chance denominator (parts per million)
#[constant]
pub const DEFAULT_CHANCE_DENOMINATOR: u64 = 1_000_000;

/// Default round age after which a forced draw becomes available (90 days)
#[constant]
pub const DEFAULT_MAX_ROUND_DURATION: i64 = 90 * 86_400;

/// Default minimum entries before the automation checker requests a draw
#[constant]
pub const DEFAULT_MIN_ENTRIES_FOR_DRAW: u64 = 1;

/// Default minimum spacing between automated draws, in seconds (4 hours)
#[constant]
pub const DEFAULT_MIN_INTERVAL_BETWEEN_DRAWS: i64 = 14_400;

/// Rolling window for the all-time donor leaderboard (365 days)
#[constant]
pub const DONOR_LEADERBOARD_WINDOW: i64 = 365 * 86_400;

/// Maximum number of entries a single round can hold
#[constant]
pub const MAX_ENTRIES_PER_ROUND: usize = 10_000;

/// Maximum number of distinct donors tracked per round
#[constant]
pub const MAX_ROUND_DONORS: usize = 1_000;

/// Maximum number of records the all-time donation ledger can hold
#[constant]
pub const MAX_DONATION_RECORDS: usize = 10_000;

/// Seeds for PDA derivation

/// Seed for the global config PDA
#[constant]
pub const CONFIG: &[u8] = b"config";

/// Seed prefix for pool PDAs (suffixed with the pool id)
#[constant]
pub const POOL: &[u8] = b"pool";

/// Seed for the treasury token account PDA
#[constant]
pub const TREASURY: &[u8] = b"treasury";

/// Seed for the all-time donor board PDA
#[constant]
pub const DONOR_BOARD: &[u8] = b"donor_board";

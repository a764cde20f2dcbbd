/// Error definitions for the Bubble Pop program
///
/// Contains all custom error types that can be returned by the program instructions.
use anchor_lang::prelude::*;

/// Custom error codes for the bubble pop program
#[error_code]
pub enum BubblePopError {
    #[msg("The pool id is unknown or out of sequence.")]
    InvalidPoolId,
    #[msg("Amount must be greater than zero.")]
    InvalidAmount,
    #[msg("The game parameters are inconsistent.")]
    InvalidConfig,
    #[msg("The pool is in its post-payout grace period.")]
    PoolInGracePeriod,
    #[msg("The grace period has not elapsed yet.")]
    GracePeriodNotOver,
    #[msg("The pool is not in a grace period.")]
    NotInGracePeriod,
    #[msg("The pool has no entries this round.")]
    NoEntries,
    #[msg("A randomness request is already pending for this pool.")]
    VrfRequestPending,
    #[msg("No randomness request is pending for this pool.")]
    NoVrfRequestPending,
    #[msg("The round has not reached its maximum duration yet.")]
    RoundNotExpired,
    #[msg("The round entry list has reached its maximum capacity.")]
    EntryLimitReached,
    #[msg("The round donor list has reached its maximum capacity.")]
    DonorLimitReached,
    #[msg("The all-time donation ledger has reached its maximum capacity.")]
    DonationLogFull,
    #[msg("Arithmetic overflow.")]
    MathOverflow,
    #[msg("The selected winner index was out of bounds. This should not happen.")]
    IndexOutOfBounds,
    #[msg("The signer is not the configured oracle authority.")]
    UnauthorizedOracle,
    #[msg("The winner token account does not belong to the drawn winner.")]
    InvalidWinnerAccount,
    #[msg("The house token account does not match the configuration.")]
    InvalidHouseAccount,
    #[msg("Mismatched accounts found")]
    AccountMismatch,
    #[msg("Invalid Mint account")]
    MintMismatch,
}

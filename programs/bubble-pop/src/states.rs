/// States module for the Bubble Pop program
///
/// Contains all account structures and their implementations used to store
/// program state on-chain, plus the pure round state machine the draw
/// instructions drive.
use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::BubblePopError;
use crate::helpers::{randomness_words, split_jackpot, win_chance};

/// Global configuration account for the game
///
/// One per deployment. Stores the admin and oracle authorities, the payment
/// mint, the economic parameters shared by every pool, and the counter that
/// hands out correlation ids for randomness requests.
#[account]
#[derive(InitSpace)]
pub struct GameConfig {
    /// Public key of the admin who controls the game
    pub admin: Pubkey,
    /// Authority allowed to deliver randomness fulfillments
    pub oracle_authority: Pubkey,
    /// Mint entries and donations are denominated in
    pub payment_mint: Pubkey,
    /// Wallet that collects house fees
    pub house_fee_recipient: Pubkey,
    /// Token account house fees are paid to
    pub house_token_account: Pubkey,
    /// PDA bump seed for this account
    pub bump: u8,
    /// PDA bump seed for the treasury token account
    pub treasury_bump: u8,
    /// Number of pools created so far (pool ids are sequential)
    pub pool_count: u8,
    /// Next randomness request correlation id to hand out
    pub next_request_id: u64,
    /// House fee taken from each payout, in basis points
    pub house_fee_bps: u16,
    /// Share of each payout held back to seed the next round, in basis points
    pub rollover_bps: u16,
    /// Seconds a pool stays closed to entries after a payout
    pub grace_period_duration: i64,
    /// Seconds over which the win chance climbs from base to cap
    pub escalation_period: i64,
    /// Win chance numerator at round start
    pub base_chance: u64,
    /// Win chance numerator once fully escalated
    pub cap_chance: u64,
    /// Win chance denominator
    pub chance_denominator: u64,
    /// Round age after which a forced draw becomes available
    pub max_round_duration: i64,
    /// Whether the off-chain automation should trigger draws
    pub automation_enabled: bool,
    /// Minimum entries before automation requests a draw
    pub min_entries_for_draw: u64,
    /// Minimum spacing between automated draws, in seconds
    pub min_interval_between_draws: i64,
}

/// Economic and scheduling parameters supplied at initialization
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameParams {
    pub house_fee_bps: u16,
    pub rollover_bps: u16,
    pub grace_period_duration: i64,
    pub escalation_period: i64,
    pub base_chance: u64,
    pub cap_chance: u64,
    pub chance_denominator: u64,
    pub max_round_duration: i64,
    pub min_entries_for_draw: u64,
    pub min_interval_between_draws: i64,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            house_fee_bps: DEFAULT_HOUSE_FEE_BPS,
            rollover_bps: DEFAULT_ROLLOVER_BPS,
            grace_period_duration: DEFAULT_GRACE_PERIOD,
            escalation_period: DEFAULT_ESCALATION_PERIOD,
            base_chance: DEFAULT_BASE_CHANCE,
            cap_chance: DEFAULT_CAP_CHANCE,
            chance_denominator: DEFAULT_CHANCE_DENOMINATOR,
            max_round_duration: DEFAULT_MAX_ROUND_DURATION,
            min_entries_for_draw: DEFAULT_MIN_ENTRIES_FOR_DRAW,
            min_interval_between_draws: DEFAULT_MIN_INTERVAL_BETWEEN_DRAWS,
        }
    }
}

impl GameParams {
    /// Checks the parameter set is internally consistent
    pub fn validate(&self) -> Result<()> {
        require!(
            (self.house_fee_bps as u64) + (self.rollover_bps as u64) < BPS_DENOMINATOR,
            BubblePopError::InvalidConfig
        );
        require!(
            self.base_chance <= self.cap_chance,
            BubblePopError::InvalidConfig
        );
        require!(
            self.cap_chance <= self.chance_denominator,
            BubblePopError::InvalidConfig
        );
        require!(self.chance_denominator > 0, BubblePopError::InvalidConfig);
        require!(
            self.grace_period_duration > 0,
            BubblePopError::InvalidConfig
        );
        require!(self.escalation_period > 0, BubblePopError::InvalidConfig);
        require!(self.max_round_duration > 0, BubblePopError::InvalidConfig);
        require!(
            self.min_entries_for_draw >= 1,
            BubblePopError::InvalidConfig
        );
        require!(
            self.min_interval_between_draws >= 0,
            BubblePopError::InvalidConfig
        );
        Ok(())
    }
}

/// One donor's accumulated donations in the current round
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DonorEntry {
    pub donor: Pubkey,
    pub amount: u64,
}

impl DonorEntry {
    pub const SPACE: usize = 32 // donor pubkey
    + 8; // amount
}

/// Lifecycle state of a pool, derived from its flags and the clock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolState {
    /// Accepting entries, no draw in flight
    Open,
    /// A randomness request is outstanding
    AwaitingRandomness,
    /// A payout happened recently; entries are rejected until the cool-down ends
    GracePeriod,
}

/// What kind of draw the automation checker recommends, if any
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawEligibility {
    pub draw: bool,
    pub forced: bool,
}

/// Result of recording an entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryOutcome {
    /// Ordinal index of the new entry within the round
    pub entry_index: u64,
    /// Whether an expired grace period was rolled over first
    pub rolled_over: bool,
}

/// Result of applying oracle randomness to a pending draw
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The roll landed inside the win chance (or the draw was forced)
    Winner {
        winner: Pubkey,
        winner_index: u64,
        payout: u64,
        house_fee: u64,
    },
    /// The roll missed; the pool keeps accumulating
    NoWin { odds: u64 },
}

/// State account for a single jackpot pool
///
/// Each pool runs independent rounds: entries accumulate a jackpot, a draw
/// parks the pool while randomness is in flight, and a winning settlement
/// opens a grace period before the next round starts. Uses dynamic resizing
/// to grow the entry and donor lists.
#[account]
pub struct Pool {
    /// Sequential id of this pool (also a PDA seed)
    pub pool_id: u8,
    /// PDA bump seed for this account
    pub bump: u8,
    /// Fixed price of one entry, in payment mint units
    pub entry_price: u64,
    /// Current jackpot, including any rollover seed
    pub jackpot: u64,
    /// Current round number, starting at 1
    pub round_id: u64,
    /// Unix timestamp the current round opened (odds escalate from here)
    pub round_start_time: i64,
    /// Unix timestamp of the most recent winning payout
    pub last_payout_time: i64,
    /// Whether a post-payout grace period has been opened and not yet ended
    pub in_grace_period: bool,
    /// Unix timestamp the grace period elapses (0 when none is open)
    pub grace_period_end: i64,
    /// Whether a randomness request is outstanding
    pub vrf_pending: bool,
    /// Correlation id of the outstanding request (0 when none)
    pub pending_request_id: u64,
    /// Whether the outstanding request is a forced draw
    pub pending_forced: bool,
    /// Winner of the most recent payout
    pub last_winner: Pubkey,
    /// Amount of the most recent payout
    pub last_win_amount: u64,
    /// One pubkey per entry in the current round (duplicates allowed)
    pub entries: Vec<Pubkey>,
    /// Per-donor accumulated donations for the current round
    pub donors: Vec<DonorEntry>,
}

/// Calculate initial size for Pool account allocation
impl Pool {
    pub const INITIAL_SIZE: usize = 1 // pool_id
    + 1 // bump
    + 8 // entry_price
    + 8 // jackpot
    + 8 // round_id
    + 8 // round_start_time
    + 8 // last_payout_time
    + 1 // in_grace_period
    + 8 // grace_period_end
    + 1 // vrf_pending
    + 8 // pending_request_id
    + 1 // pending_forced
    + 32 // last_winner
    + 8 // last_win_amount
    + 4 // entries vector discriminator (empty initially)
    + 4; // donors vector discriminator (empty initially)
}

/// Round state machine, driven by the entry, donation and draw instructions
impl Pool {
    /// Whether a grace period is open and its deadline has not passed
    pub fn grace_active(&self, now: i64) -> bool {
        self.in_grace_period && now < self.grace_period_end
    }

    /// Lifecycle state as seen at `now`
    pub fn state(&self, now: i64) -> PoolState {
        if self.vrf_pending {
            PoolState::AwaitingRandomness
        } else if self.grace_active(now) {
            PoolState::GracePeriod
        } else {
            PoolState::Open
        }
    }

    pub fn is_open(&self, now: i64) -> bool {
        self.state(now) == PoolState::Open
    }

    pub fn entry_count(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Number of entries `player` holds in the current round
    pub fn player_entries(&self, player: &Pubkey) -> u64 {
        self.entries.iter().filter(|entry| *entry == player).count() as u64
    }

    pub fn donor_count(&self) -> u64 {
        self.donors.len() as u64
    }

    /// Accumulated donations of `donor` in the current round
    pub fn donor_amount(&self, donor: &Pubkey) -> u64 {
        self.donors
            .iter()
            .find(|entry| entry.donor == *donor)
            .map(|entry| entry.amount)
            .unwrap_or(0)
    }

    /// Top donors of the current round, largest first.
    ///
    /// The sort is stable and donors are stored in first-donation order, so
    /// ties rank the earlier donor higher.
    pub fn top_donors(&self, max_results: usize) -> Vec<(Pubkey, u64)> {
        let mut totals: Vec<(Pubkey, u64)> = self
            .donors
            .iter()
            .map(|entry| (entry.donor, entry.amount))
            .collect();
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals.truncate(max_results);
        totals
    }

    /// Win chance numerator at `now`, over the configured denominator
    pub fn current_win_chance(&self, config: &GameConfig, now: i64) -> u64 {
        win_chance(
            self.round_start_time,
            now,
            config.base_chance,
            config.cap_chance,
            config.escalation_period,
        )
    }

    /// Whether the round is old enough for a forced draw
    pub fn is_round_expired(&self, config: &GameConfig, now: i64) -> bool {
        now.saturating_sub(self.round_start_time) >= config.max_round_duration
    }

    /// Seconds until a forced draw becomes available (0 once it is)
    pub fn time_until_forced_draw(&self, config: &GameConfig, now: i64) -> i64 {
        self.round_start_time
            .saturating_add(config.max_round_duration)
            .saturating_sub(now)
            .max(0)
    }

    /// Rolls an expired grace period over into a fresh round.
    ///
    /// Returns true if a rollover happened. An unexpired grace period (or a
    /// pool not in grace at all) is left untouched.
    pub fn try_lazy_rollover(&mut self, now: i64) -> bool {
        if self.in_grace_period && now >= self.grace_period_end {
            self.start_new_round(now);
            return true;
        }
        false
    }

    /// Opens the next round: clears the grace flags and the entry list,
    /// restarts the odds escalation clock and bumps the round id. The
    /// jackpot is left as-is so the rollover seed carries over exactly.
    fn start_new_round(&mut self, now: i64) {
        self.in_grace_period = false;
        self.grace_period_end = 0;
        self.entries.clear();
        self.round_start_time = now;
        self.round_id += 1;
    }

    /// Explicitly ends an elapsed grace period and opens the next round
    pub fn end_grace(&mut self, now: i64) -> Result<()> {
        require!(self.in_grace_period, BubblePopError::NotInGracePeriod);
        require!(
            now >= self.grace_period_end,
            BubblePopError::GracePeriodNotOver
        );
        self.start_new_round(now);
        Ok(())
    }

    /// Records one paid entry for `player`.
    ///
    /// An expired grace period is rolled over first; an active one rejects
    /// the entry. Entries are accepted while randomness is in flight and
    /// join the pending draw.
    pub fn record_entry(&mut self, player: Pubkey, now: i64) -> Result<EntryOutcome> {
        let rolled_over = self.try_lazy_rollover(now);
        require!(!self.in_grace_period, BubblePopError::PoolInGracePeriod);
        require!(
            self.entries.len() < MAX_ENTRIES_PER_ROUND,
            BubblePopError::EntryLimitReached
        );

        self.jackpot = self
            .jackpot
            .checked_add(self.entry_price)
            .ok_or(BubblePopError::MathOverflow)?;
        self.entries.push(player);

        Ok(EntryOutcome {
            entry_index: self.entries.len() as u64 - 1,
            rolled_over,
        })
    }

    /// Credits a donation to the jackpot and the round's donor ledger.
    ///
    /// Donations carry no win chance and are accepted in any pool state.
    /// Returns the new jackpot total.
    pub fn record_donation(&mut self, donor: Pubkey, amount: u64) -> Result<u64> {
        require!(amount > 0, BubblePopError::InvalidAmount);

        self.jackpot = self
            .jackpot
            .checked_add(amount)
            .ok_or(BubblePopError::MathOverflow)?;

        match self.donors.iter_mut().find(|entry| entry.donor == donor) {
            Some(entry) => {
                entry.amount = entry
                    .amount
                    .checked_add(amount)
                    .ok_or(BubblePopError::MathOverflow)?;
            }
            None => {
                require!(
                    self.donors.len() < MAX_ROUND_DONORS,
                    BubblePopError::DonorLimitReached
                );
                self.donors.push(DonorEntry { donor, amount });
            }
        }

        Ok(self.jackpot)
    }

    /// Parks the pool awaiting randomness for the given request id.
    ///
    /// At most one request can be outstanding per pool. A grace period
    /// blocks new draws even after its deadline, because the stale entry
    /// list has to be rolled over first.
    pub fn begin_draw(
        &mut self,
        config: &GameConfig,
        request_id: u64,
        forced: bool,
        now: i64,
    ) -> Result<()> {
        require!(!self.entries.is_empty(), BubblePopError::NoEntries);
        require!(!self.in_grace_period, BubblePopError::PoolInGracePeriod);
        require!(!self.vrf_pending, BubblePopError::VrfRequestPending);
        if forced {
            require!(
                self.is_round_expired(config, now),
                BubblePopError::RoundNotExpired
            );
        }

        self.vrf_pending = true;
        self.pending_request_id = request_id;
        self.pending_forced = forced;
        Ok(())
    }

    /// Whether a fulfillment with this id matches the outstanding request
    pub fn matches_pending(&self, request_id: u64) -> bool {
        self.vrf_pending && self.pending_request_id == request_id
    }

    /// Applies oracle randomness to the outstanding draw.
    ///
    /// The pending request is consumed no matter the outcome, so a replay of
    /// the same id no longer matches. On a win the jackpot is split, the
    /// rollover share becomes the next round's seed, the round donors are
    /// cleared, and a grace period opens at `now`.
    pub fn settle_draw(
        &mut self,
        config: &GameConfig,
        randomness: &[u8; 32],
        now: i64,
    ) -> Result<DrawOutcome> {
        let total_entries = self.entries.len() as u64;
        require!(total_entries > 0, BubblePopError::NoEntries);

        let forced = self.pending_forced;
        let odds = self.current_win_chance(config, now);

        // ============ REQUEST CONSUMPTION ============
        self.vrf_pending = false;
        self.pending_request_id = 0;
        self.pending_forced = false;

        // ============ WIN-OR-LOSE ROLL ============
        let (index_word, roll_word) = randomness_words(randomness);
        if !forced {
            let roll = roll_word % config.chance_denominator;
            if roll >= odds {
                return Ok(DrawOutcome::NoWin { odds });
            }
        }

        // ============ WINNER SELECTION ============
        let winner_index = index_word % total_entries;
        let winner = *self
            .entries
            .get(winner_index as usize)
            .ok_or(BubblePopError::IndexOutOfBounds)?;

        // ============ JACKPOT SETTLEMENT ============
        let split = split_jackpot(self.jackpot, config.house_fee_bps, config.rollover_bps)?;
        self.jackpot = split.rollover;
        self.last_winner = winner;
        self.last_win_amount = split.payout;
        self.last_payout_time = now;
        self.donors.clear();
        self.in_grace_period = true;
        self.grace_period_end = now
            .checked_add(config.grace_period_duration)
            .ok_or(BubblePopError::MathOverflow)?;

        Ok(DrawOutcome::Winner {
            winner,
            winner_index,
            payout: split.payout,
            house_fee: split.house_fee,
        })
    }

    /// Clears an outstanding request that will never be fulfilled.
    ///
    /// Returns the abandoned request id. Jackpot, entries and round state
    /// are untouched.
    pub fn emergency_reset(&mut self) -> Result<u64> {
        require!(self.vrf_pending, BubblePopError::NoVrfRequestPending);
        let request_id = self.pending_request_id;
        self.vrf_pending = false;
        self.pending_request_id = 0;
        self.pending_forced = false;
        Ok(request_id)
    }

    /// Pure eligibility check driven by the off-chain automation.
    ///
    /// Mirrors the guards of the draw instructions so a recommended draw
    /// only fails under concurrent state changes.
    pub fn draw_eligibility(&self, config: &GameConfig, now: i64) -> DrawEligibility {
        if !config.automation_enabled {
            return DrawEligibility::default();
        }

        let busy = self.vrf_pending || self.in_grace_period;
        let expired = self.is_round_expired(config, now);
        let interval_elapsed =
            now.saturating_sub(self.last_payout_time) >= config.min_interval_between_draws;

        DrawEligibility {
            draw: !busy
                && self.entry_count() >= config.min_entries_for_draw
                && (interval_elapsed || expired),
            forced: !busy && !self.entries.is_empty() && expired,
        }
    }
}

/// All-time donation ledger shared by every pool
///
/// Append-only record list backing the rolling donor leaderboard. Unlike the
/// per-round donor list on each pool, these records survive payouts.
#[account]
pub struct DonorBoard {
    /// PDA bump seed for this account
    pub bump: u8,
    /// Every donation ever made, in arrival order
    pub records: Vec<DonationRecord>,
}

/// One donation in the all-time ledger
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DonationRecord {
    pub pool_id: u8,
    pub donor: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

impl DonationRecord {
    pub const SPACE: usize = 1 // pool_id
    + 32 // donor pubkey
    + 8 // amount
    + 8; // timestamp
}

/// Calculate initial size for DonorBoard account allocation
impl DonorBoard {
    pub const INITIAL_SIZE: usize = 1 // bump
    + 4; // records vector discriminator (empty initially)
}

impl DonorBoard {
    /// Appends one donation to the ledger
    pub fn record(
        &mut self,
        pool_id: u8,
        donor: Pubkey,
        amount: u64,
        timestamp: i64,
    ) -> Result<()> {
        require!(
            self.records.len() < MAX_DONATION_RECORDS,
            BubblePopError::DonationLogFull
        );
        self.records.push(DonationRecord {
            pool_id,
            donor,
            amount,
            timestamp,
        });
        Ok(())
    }

    pub fn donation_count(&self) -> u64 {
        self.records.len() as u64
    }

    /// Top donors across all pools within the trailing `window` seconds.
    ///
    /// Aggregates per donor in first-seen order then sorts stably by total,
    /// so ties rank the earlier donor higher.
    pub fn top_donors_within(
        &self,
        now: i64,
        window: i64,
        max_results: usize,
    ) -> Vec<(Pubkey, u64)> {
        let cutoff = now.saturating_sub(window);
        let mut totals: Vec<(Pubkey, u64)> = Vec::new();
        for record in self.records.iter().filter(|r| r.timestamp >= cutoff) {
            match totals.iter_mut().find(|(donor, _)| *donor == record.donor) {
                Some((_, total)) => *total = total.saturating_add(record.amount),
                None => totals.push((record.donor, record.amount)),
            }
        }
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals.truncate(max_results);
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;
    const START: i64 = 1_700_000_000;

    fn test_config() -> GameConfig {
        GameConfig {
            admin: Pubkey::new_unique(),
            oracle_authority: Pubkey::new_unique(),
            payment_mint: Pubkey::new_unique(),
            house_fee_recipient: Pubkey::new_unique(),
            house_token_account: Pubkey::new_unique(),
            bump: 255,
            treasury_bump: 255,
            pool_count: 1,
            next_request_id: 1,
            house_fee_bps: DEFAULT_HOUSE_FEE_BPS,
            rollover_bps: DEFAULT_ROLLOVER_BPS,
            grace_period_duration: DEFAULT_GRACE_PERIOD,
            escalation_period: DEFAULT_ESCALATION_PERIOD,
            base_chance: DEFAULT_BASE_CHANCE,
            cap_chance: DEFAULT_CAP_CHANCE,
            chance_denominator: DEFAULT_CHANCE_DENOMINATOR,
            max_round_duration: DEFAULT_MAX_ROUND_DURATION,
            automation_enabled: true,
            min_entries_for_draw: DEFAULT_MIN_ENTRIES_FOR_DRAW,
            min_interval_between_draws: DEFAULT_MIN_INTERVAL_BETWEEN_DRAWS,
        }
    }

    fn test_pool(entry_price: u64) -> Pool {
        Pool {
            pool_id: 0,
            bump: 255,
            entry_price,
            jackpot: 0,
            round_id: 1,
            round_start_time: START,
            last_payout_time: START,
            in_grace_period: false,
            grace_period_end: 0,
            vrf_pending: false,
            pending_request_id: 0,
            pending_forced: false,
            last_winner: Pubkey::default(),
            last_win_amount: 0,
            entries: Vec::new(),
            donors: Vec::new(),
        }
    }

    fn enter_n(pool: &mut Pool, n: usize, now: i64) -> Vec<Pubkey> {
        (0..n)
            .map(|_| {
                let player = Pubkey::new_unique();
                pool.record_entry(player, now).unwrap();
                player
            })
            .collect()
    }

    /// Seed whose first word selects the winner index and whose second word
    /// produces the roll
    fn seed_with(index_word: u64, roll_word: u64) -> [u8; 32] {
        let mut seed = [0u8; 32];
        seed[0..8].copy_from_slice(&index_word.to_le_bytes());
        seed[8..16].copy_from_slice(&roll_word.to_le_bytes());
        seed
    }

    #[test]
    fn entries_accumulate_jackpot_and_ordinals() {
        let mut pool = test_pool(1_000_000);
        let players = enter_n(&mut pool, 3, START + 100);

        assert_eq!(pool.jackpot, 3_000_000);
        assert_eq!(pool.entry_count(), 3);
        assert_eq!(pool.player_entries(&players[1]), 1);

        // a repeat entrant gets another ordinal, not a merge
        let outcome = pool.record_entry(players[0], START + 200).unwrap();
        assert_eq!(outcome.entry_index, 3);
        assert_eq!(pool.player_entries(&players[0]), 2);
    }

    #[test]
    fn entry_rejected_during_active_grace() {
        let mut pool = test_pool(1_000_000);
        pool.in_grace_period = true;
        pool.grace_period_end = START + 900;

        let err = pool
            .record_entry(Pubkey::new_unique(), START + 100)
            .unwrap_err();
        assert_eq!(err, BubblePopError::PoolInGracePeriod.into());
        assert_eq!(pool.jackpot, 0);
    }

    #[test]
    fn entry_after_expired_grace_rolls_over_first() {
        let mut pool = test_pool(1_000_000);
        pool.jackpot = 150_000; // rollover seed from the previous payout
        pool.entries.push(Pubkey::new_unique()); // stale entry from the paid-out round
        pool.in_grace_period = true;
        pool.grace_period_end = START + 900;

        let now = START + 901;
        let player = Pubkey::new_unique();
        let outcome = pool.record_entry(player, now).unwrap();

        assert!(outcome.rolled_over);
        assert_eq!(outcome.entry_index, 0);
        assert_eq!(pool.round_id, 2);
        assert_eq!(pool.round_start_time, now);
        assert!(!pool.in_grace_period);
        assert_eq!(pool.entries, vec![player]);
        assert_eq!(pool.jackpot, 150_000 + 1_000_000);
    }

    #[test]
    fn donations_accumulate_per_donor() {
        let mut pool = test_pool(1_000_000);
        let donor = Pubkey::new_unique();

        pool.record_donation(donor, 500).unwrap();
        let new_jackpot = pool.record_donation(donor, 700).unwrap();

        assert_eq!(pool.donor_count(), 1);
        assert_eq!(pool.donor_amount(&donor), 1_200);
        assert_eq!(new_jackpot, 1_200);
    }

    #[test]
    fn zero_donation_rejected() {
        let mut pool = test_pool(1_000_000);
        let err = pool.record_donation(Pubkey::new_unique(), 0).unwrap_err();
        assert_eq!(err, BubblePopError::InvalidAmount.into());
    }

    #[test]
    fn donations_accepted_during_grace() {
        let mut pool = test_pool(1_000_000);
        pool.in_grace_period = true;
        pool.grace_period_end = START + 900;

        pool.record_donation(Pubkey::new_unique(), 42).unwrap();
        assert_eq!(pool.jackpot, 42);
        // the grace period itself is untouched
        assert!(pool.in_grace_period);
    }

    #[test]
    fn top_donors_sorted_with_earliest_tie_break() {
        let mut pool = test_pool(1_000_000);
        let (a, b, c) = (
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        pool.record_donation(a, 300).unwrap();
        pool.record_donation(b, 500).unwrap();
        pool.record_donation(c, 300).unwrap();

        // a donated before c, so a wins the tie
        assert_eq!(pool.top_donors(2), vec![(b, 500), (a, 300)]);
        assert_eq!(pool.top_donors(10).len(), 3);
    }

    #[test]
    fn begin_draw_guards() {
        let config = test_config();
        let mut pool = test_pool(1_000_000);

        assert_eq!(
            pool.begin_draw(&config, 1, false, START).unwrap_err(),
            BubblePopError::NoEntries.into()
        );

        enter_n(&mut pool, 2, START);

        // forced draws need the round deadline
        assert_eq!(
            pool.begin_draw(&config, 1, true, START + DAY).unwrap_err(),
            BubblePopError::RoundNotExpired.into()
        );

        // even an expired grace period blocks draws until it is ended,
        // because the stale entry list has not been cleared yet
        pool.in_grace_period = true;
        pool.grace_period_end = START + 900;
        assert_eq!(
            pool.begin_draw(&config, 1, false, START + 10_000)
                .unwrap_err(),
            BubblePopError::PoolInGracePeriod.into()
        );
        pool.in_grace_period = false;
        pool.grace_period_end = 0;

        pool.begin_draw(&config, 1, false, START).unwrap();
        assert!(pool.vrf_pending);
        assert_eq!(pool.pending_request_id, 1);
        assert_eq!(pool.state(START), PoolState::AwaitingRandomness);

        // one request per pool at a time
        assert_eq!(
            pool.begin_draw(&config, 2, false, START).unwrap_err(),
            BubblePopError::VrfRequestPending.into()
        );
    }

    #[test]
    fn winning_settlement_pays_and_opens_grace() {
        let config = test_config();
        let mut pool = test_pool(1_000_000);
        let players = enter_n(&mut pool, 2, START);
        pool.record_donation(Pubkey::new_unique(), 10_000).unwrap();
        let jackpot = pool.jackpot;

        pool.begin_draw(&config, 7, false, START).unwrap();

        // at cap odds a roll of 699 wins; index word 2 wraps to entry 0
        let now = START + DEFAULT_ESCALATION_PERIOD;
        let outcome = pool.settle_draw(&config, &seed_with(2, 699), now).unwrap();

        let expected_fee = jackpot * 250 / 10_000;
        let expected_rollover = jackpot * 750 / 10_000;
        let expected_payout = jackpot - expected_fee - expected_rollover;
        assert_eq!(
            outcome,
            DrawOutcome::Winner {
                winner: players[0],
                winner_index: 0,
                payout: expected_payout,
                house_fee: expected_fee,
            }
        );

        assert_eq!(pool.jackpot, expected_rollover);
        assert_eq!(pool.last_winner, players[0]);
        assert_eq!(pool.last_win_amount, expected_payout);
        assert_eq!(pool.last_payout_time, now);
        assert!(!pool.vrf_pending);
        assert!(pool.in_grace_period);
        assert_eq!(pool.grace_period_end, now + DEFAULT_GRACE_PERIOD);
        assert_eq!(pool.state(now), PoolState::GracePeriod);
        // round donors reset on a winning payout
        assert_eq!(pool.donor_count(), 0);
        // the round itself only advances when the grace period ends
        assert_eq!(pool.round_id, 1);
    }

    #[test]
    fn losing_roll_returns_pool_to_open() {
        let config = test_config();
        let mut pool = test_pool(1_000_000);
        enter_n(&mut pool, 2, START);
        pool.record_donation(Pubkey::new_unique(), 10_000).unwrap();
        let jackpot = pool.jackpot;

        pool.begin_draw(&config, 7, false, START).unwrap();

        // fresh round, so odds are the base chance; a roll of 500_000 misses
        let now = START + 60;
        let outcome = pool
            .settle_draw(&config, &seed_with(0, 500_000), now)
            .unwrap();

        assert_eq!(
            outcome,
            DrawOutcome::NoWin {
                odds: DEFAULT_BASE_CHANCE
            }
        );
        assert_eq!(pool.jackpot, jackpot);
        assert_eq!(pool.entry_count(), 2);
        assert_eq!(pool.donor_count(), 1);
        assert!(!pool.vrf_pending);
        assert_eq!(pool.state(now), PoolState::Open);
        assert_eq!(pool.round_id, 1);
    }

    #[test]
    fn forced_draw_wins_on_losing_roll() {
        let config = test_config();
        let mut pool = test_pool(1_000_000);
        let players = enter_n(&mut pool, 3, START);

        let now = START + DEFAULT_MAX_ROUND_DURATION;
        pool.begin_draw(&config, 9, true, now).unwrap();

        // the worst possible roll still selects a winner on a forced draw
        let outcome = pool
            .settle_draw(&config, &seed_with(1, 999_999), now)
            .unwrap();
        match outcome {
            DrawOutcome::Winner {
                winner,
                winner_index,
                ..
            } => {
                assert_eq!(winner_index, 1);
                assert_eq!(winner, players[1]);
            }
            DrawOutcome::NoWin { .. } => panic!("forced draw must select a winner"),
        }
        assert!(pool.in_grace_period);
    }

    #[test]
    fn entries_arriving_while_awaiting_randomness_join_the_draw() {
        let config = test_config();
        let mut pool = test_pool(1_000_000);
        enter_n(&mut pool, 1, START);
        pool.begin_draw(&config, 5, false, START).unwrap();

        let late = Pubkey::new_unique();
        pool.record_entry(late, START + 10).unwrap();
        assert_eq!(pool.entry_count(), 2);

        // index word 1 picks the late entrant
        let outcome = pool
            .settle_draw(&config, &seed_with(1, 0), START + 20)
            .unwrap();
        match outcome {
            DrawOutcome::Winner { winner, .. } => assert_eq!(winner, late),
            DrawOutcome::NoWin { .. } => panic!("expected a winner"),
        }
    }

    #[test]
    fn fulfillment_is_consumed_exactly_once() {
        let config = test_config();
        let mut pool = test_pool(1_000_000);
        enter_n(&mut pool, 2, START);
        pool.begin_draw(&config, 3, false, START).unwrap();

        assert!(pool.matches_pending(3));
        assert!(!pool.matches_pending(4)); // unknown id does not match

        pool.settle_draw(&config, &seed_with(0, 0), START + 60)
            .unwrap();
        assert!(!pool.matches_pending(3)); // replay no longer matches
    }

    #[test]
    fn end_grace_requires_elapsed_grace() {
        let mut pool = test_pool(1_000_000);
        assert_eq!(
            pool.end_grace(START).unwrap_err(),
            BubblePopError::NotInGracePeriod.into()
        );

        pool.entries.push(Pubkey::new_unique());
        pool.in_grace_period = true;
        pool.grace_period_end = START + 900;

        assert_eq!(
            pool.end_grace(START + 899).unwrap_err(),
            BubblePopError::GracePeriodNotOver.into()
        );

        pool.end_grace(START + 900).unwrap();
        assert!(!pool.in_grace_period);
        assert_eq!(pool.grace_period_end, 0);
        assert_eq!(pool.round_id, 2);
        assert_eq!(pool.round_start_time, START + 900);
        assert!(pool.entries.is_empty());
    }

    #[test]
    fn emergency_reset_clears_pending_request_only() {
        let config = test_config();
        let mut pool = test_pool(1_000_000);

        assert_eq!(
            pool.emergency_reset().unwrap_err(),
            BubblePopError::NoVrfRequestPending.into()
        );

        enter_n(&mut pool, 1, START);
        let jackpot = pool.jackpot;
        let now = START + DEFAULT_MAX_ROUND_DURATION;
        pool.begin_draw(&config, 11, true, now).unwrap();

        assert_eq!(pool.emergency_reset().unwrap(), 11);
        assert!(!pool.vrf_pending);
        assert!(!pool.pending_forced);
        assert_eq!(pool.pending_request_id, 0);
        assert_eq!(pool.jackpot, jackpot);
        assert_eq!(pool.entry_count(), 1);

        // the pool can immediately take a new request
        pool.begin_draw(&config, 12, false, now).unwrap();
        assert!(pool.matches_pending(12));
    }

    #[test]
    fn awaiting_and_grace_are_mutually_exclusive() {
        let config = test_config();
        let mut pool = test_pool(1_000_000);
        enter_n(&mut pool, 1, START);

        assert_eq!(pool.state(START), PoolState::Open);
        assert!(pool.is_open(START));

        pool.begin_draw(&config, 1, false, START).unwrap();
        assert_eq!(pool.state(START), PoolState::AwaitingRandomness);
        assert!(!pool.is_open(START));

        // a winning roll clears the pending request and opens grace atomically
        pool.settle_draw(&config, &seed_with(0, 0), START + 60)
            .unwrap();
        assert_eq!(pool.state(START + 60), PoolState::GracePeriod);
        assert!(!pool.vrf_pending);

        // once the deadline passes the pool reads as open to entries again
        let after = START + 60 + DEFAULT_GRACE_PERIOD;
        assert_eq!(pool.state(after), PoolState::Open);
    }

    #[test]
    fn eligibility_checker_cases() {
        let mut config = test_config();
        let mut pool = test_pool(1_000_000);

        // no entries yet
        assert_eq!(
            pool.draw_eligibility(&config, START + DAY),
            DrawEligibility::default()
        );

        enter_n(&mut pool, 1, START);

        // minimum spacing since the last payout not yet reached
        let early = pool.draw_eligibility(&config, START + 100);
        assert!(!early.draw);
        assert!(!early.forced);

        let ready = pool.draw_eligibility(&config, START + DEFAULT_MIN_INTERVAL_BETWEEN_DRAWS);
        assert!(ready.draw);
        assert!(!ready.forced);

        // past the round deadline both draw kinds are recommended
        let late = pool.draw_eligibility(&config, START + DEFAULT_MAX_ROUND_DURATION);
        assert!(late.draw);
        assert!(late.forced);

        // a pending request parks automation
        pool.vrf_pending = true;
        assert_eq!(
            pool.draw_eligibility(&config, START + DAY),
            DrawEligibility::default()
        );
        pool.vrf_pending = false;

        // a grace period parks automation until it is explicitly ended
        pool.in_grace_period = true;
        assert_eq!(
            pool.draw_eligibility(&config, START + DAY),
            DrawEligibility::default()
        );
        pool.in_grace_period = false;

        // disabling automation turns the checker off entirely
        config.automation_enabled = false;
        assert_eq!(
            pool.draw_eligibility(&config, START + DEFAULT_MAX_ROUND_DURATION),
            DrawEligibility::default()
        );
    }

    #[test]
    fn forced_draw_deadline_queries() {
        let config = test_config();
        let pool = test_pool(1_000_000);

        assert_eq!(
            pool.time_until_forced_draw(&config, START),
            DEFAULT_MAX_ROUND_DURATION
        );
        assert_eq!(
            pool.time_until_forced_draw(&config, START + DAY),
            DEFAULT_MAX_ROUND_DURATION - DAY
        );
        assert!(!pool.is_round_expired(&config, START + DAY));

        assert_eq!(
            pool.time_until_forced_draw(&config, START + DEFAULT_MAX_ROUND_DURATION + 5),
            0
        );
        assert!(pool.is_round_expired(&config, START + DEFAULT_MAX_ROUND_DURATION));
    }

    #[test]
    fn rollover_seeds_next_round_exactly() {
        let config = test_config();
        let mut pool = test_pool(1_000_000);
        enter_n(&mut pool, 4, START);
        let first_jackpot = pool.jackpot;

        pool.begin_draw(&config, 1, false, START).unwrap();
        pool.settle_draw(&config, &seed_with(1, 0), START + 10)
            .unwrap();

        let expected_seed = (first_jackpot as u128 * DEFAULT_ROLLOVER_BPS as u128
            / BPS_DENOMINATOR as u128) as u64;
        assert_eq!(pool.jackpot, expected_seed);

        pool.end_grace(START + 10 + DEFAULT_GRACE_PERIOD).unwrap();
        assert_eq!(pool.round_id, 2);
        assert!(pool.entries.is_empty());
        // the seed survives the rollover untouched
        assert_eq!(pool.jackpot, expected_seed);
    }

    #[test]
    fn capacity_caps_enforced() {
        let mut pool = test_pool(1);
        for _ in 0..MAX_ENTRIES_PER_ROUND {
            pool.record_entry(Pubkey::new_unique(), START).unwrap();
        }
        assert_eq!(
            pool.record_entry(Pubkey::new_unique(), START).unwrap_err(),
            BubblePopError::EntryLimitReached.into()
        );

        let mut pool = test_pool(1);
        for _ in 0..MAX_ROUND_DONORS {
            pool.record_donation(Pubkey::new_unique(), 1).unwrap();
        }
        assert_eq!(
            pool.record_donation(Pubkey::new_unique(), 1).unwrap_err(),
            BubblePopError::DonorLimitReached.into()
        );

        let mut board = DonorBoard {
            bump: 255,
            records: Vec::new(),
        };
        for i in 0..MAX_DONATION_RECORDS {
            board
                .record(0, Pubkey::new_unique(), 1, START + i as i64)
                .unwrap();
        }
        assert_eq!(
            board.record(0, Pubkey::new_unique(), 1, START).unwrap_err(),
            BubblePopError::DonationLogFull.into()
        );
    }

    #[test]
    fn donor_board_window_and_aggregation() {
        let mut board = DonorBoard {
            bump: 255,
            records: Vec::new(),
        };
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let now = START + DONOR_LEADERBOARD_WINDOW + 10 * DAY;

        // just outside the window
        board
            .record(0, a, 100, now - DONOR_LEADERBOARD_WINDOW - 1)
            .unwrap();
        board.record(0, a, 400, now - 5 * DAY).unwrap();
        // same donor across pools aggregates
        board.record(1, a, 200, now - DAY).unwrap();
        board.record(1, b, 500, now - 2 * DAY).unwrap();

        assert_eq!(board.donation_count(), 4);

        let top = board.top_donors_within(now, DONOR_LEADERBOARD_WINDOW, 10);
        assert_eq!(top, vec![(a, 600), (b, 500)]);

        let top_one = board.top_donors_within(now, DONOR_LEADERBOARD_WINDOW, 1);
        assert_eq!(top_one, vec![(a, 600)]);
    }

    #[test]
    fn donor_board_tie_break_keeps_earliest_donor() {
        let mut board = DonorBoard {
            bump: 255,
            records: Vec::new(),
        };
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());

        board.record(0, a, 500, START).unwrap();
        board.record(0, b, 500, START + 1).unwrap();

        let top = board.top_donors_within(START + DAY, DONOR_LEADERBOARD_WINDOW, 10);
        assert_eq!(top, vec![(a, 500), (b, 500)]);
    }

    #[test]
    fn game_params_defaults_are_valid() {
        let params = GameParams::default();
        params.validate().unwrap();
        assert_eq!(params.house_fee_bps, DEFAULT_HOUSE_FEE_BPS);
        assert_eq!(params.rollover_bps, DEFAULT_ROLLOVER_BPS);
    }

    #[test]
    fn game_params_validation_rejects_bad_values() {
        let mut params = GameParams::default();
        params.house_fee_bps = 6_000;
        params.rollover_bps = 5_000;
        assert_eq!(
            params.validate().unwrap_err(),
            BubblePopError::InvalidConfig.into()
        );

        let mut params = GameParams::default();
        params.base_chance = 800;
        params.cap_chance = 700;
        assert_eq!(
            params.validate().unwrap_err(),
            BubblePopError::InvalidConfig.into()
        );

        let mut params = GameParams::default();
        params.cap_chance = 2_000_000; // above the denominator
        assert_eq!(
            params.validate().unwrap_err(),
            BubblePopError::InvalidConfig.into()
        );

        let mut params = GameParams::default();
        params.grace_period_duration = 0;
        assert_eq!(
            params.validate().unwrap_err(),
            BubblePopError::InvalidConfig.into()
        );

        let mut params = GameParams::default();
        params.min_entries_for_draw = 0;
        assert_eq!(
            params.validate().unwrap_err(),
            BubblePopError::InvalidConfig.into()
        );
    }
}

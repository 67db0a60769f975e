//! One player's run of matches against the computer.
//!
//! A session owns the current [`MatchEngine`] and listens to it. The opponent
//! answers through the same `process_move` entry the player uses, rewards are
//! applied when the engine reports game over, and the result screen is
//! revealed through the [`Scheduler`] so a draw can linger on the board first.

use crate::ads::AdPacing;
use crate::config::GameConfig;
use crate::scheduler::Scheduler;
use derive_more::Display;
use emojitoe_engine::{
    AiPolicy, Board, Difficulty, EventReceiver, MatchEngine, MatchEvent, MatchOutcome, MatchPhase,
    MoveDisposition, Side, SubscriptionId, drain_events,
};
use emojitoe_progress::{KvStore, ProgressService, RewardResult};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Screen shown once a match is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum ResultScreen {
    /// Player won and a new emoji was unlocked.
    #[display("Victory")]
    Victory,
    /// Player won and every emoji is unlocked.
    #[display("Complete")]
    Complete,
    /// Opponent won.
    #[display("Defeat")]
    Defeat,
    /// Nobody won.
    #[display("Draw")]
    Draw,
}

impl ResultScreen {
    /// Picks the screen for an outcome and the reward it produced.
    pub fn classify(outcome: &MatchOutcome, reward: &RewardResult) -> Self {
        match outcome.winner() {
            Some(Side::Player) if *reward.all_items_unlocked() => Self::Complete,
            Some(Side::Player) if *reward.item_unlocked() => Self::Victory,
            Some(Side::Player) => Self::Complete,
            Some(Side::Opponent) => Self::Defeat,
            None => Self::Draw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionTask {
    Reveal(ResultScreen),
    Unblock,
}

/// Drives matches, the opponent and rewards for one player.
#[derive(Debug)]
pub struct MatchSession<S: KvStore> {
    engine: MatchEngine,
    subscription: SubscriptionId,
    events: EventReceiver,
    progress: ProgressService<S>,
    opponent: AiPolicy,
    rng: StdRng,
    scheduler: Scheduler<SessionTask>,
    ads: AdPacing,
    first: Side,
    draw_reveal_delay: Duration,
    popup_block: Duration,
    result: Option<ResultScreen>,
    closable: bool,
    last_reward: Option<RewardResult>,
    matches_finished: u32,
}

impl<S: KvStore> MatchSession<S> {
    /// Creates a session and starts the first match.
    ///
    /// `seed` drives the opponent's randomness and ad pacing, so equal seeds
    /// replay identically.
    #[instrument(skip(config, progress))]
    pub fn new(config: &GameConfig, progress: ProgressService<S>, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let ads_rng = StdRng::seed_from_u64(rng.next_u64());
        let ads = AdPacing::new(
            *config.ads().matches_per_ad_min(),
            *config.ads().matches_per_ad_max(),
            ads_rng,
        );
        let opponent = AiPolicy::new(*progress.opponent().difficulty(), Side::Opponent);

        let mut engine = MatchEngine::new();
        let (subscription, events) = engine.subscribe_channel();

        let mut session = Self {
            engine,
            subscription,
            events,
            progress,
            opponent,
            rng,
            scheduler: Scheduler::new(),
            ads,
            first: config.first_side(),
            draw_reveal_delay: config.draw_reveal_delay(),
            popup_block: config.popup_block(),
            result: None,
            closable: false,
            last_reward: None,
            matches_finished: 0,
        };
        session.begin();
        session
    }

    fn begin(&mut self) {
        self.engine.start(self.first);
        info!(first = %self.first, difficulty = %self.opponent.difficulty(), "Match begun");
        self.pump();
    }

    /// Plays the player's move, then the opponent's reply if one is due.
    #[instrument(skip(self))]
    pub fn submit_move(&mut self, index: usize) -> MoveDisposition {
        let disposition = self.engine.process_move(index, Side::Player);
        if disposition.is_accepted() {
            self.pump();
        }
        disposition
    }

    /// Drains engine notifications, letting the opponent move on its turn.
    fn pump(&mut self) {
        loop {
            let events = drain_events(&mut self.events);
            if events.is_empty() {
                return;
            }
            for event in events {
                match event {
                    MatchEvent::MoveApplied { index, side } => {
                        debug!(index, side = %side, "Move observed");
                    }
                    MatchEvent::TurnChanged {
                        active: Side::Opponent,
                    } => self.play_opponent(),
                    MatchEvent::TurnChanged { .. } => {}
                    MatchEvent::GameOver(outcome) => self.finish(outcome),
                }
            }
        }
    }

    fn play_opponent(&mut self) {
        if self.engine.phase() != MatchPhase::InProgress
            || self.engine.current_turn() != Some(Side::Opponent)
        {
            return;
        }
        let index = self.opponent.choose_on(self.engine.board(), &mut self.rng);
        if let MoveDisposition::Rejected(reason) = self.engine.process_move(index, Side::Opponent)
        {
            warn!(index, %reason, "Opponent move rejected");
        }
    }

    fn finish(&mut self, outcome: MatchOutcome) {
        let reward = self.progress.resolve_match(&outcome);
        let screen = ResultScreen::classify(&outcome, &reward);
        self.last_reward = Some(reward);
        self.matches_finished += 1;

        let delay = if outcome.line().is_some() {
            Duration::ZERO
        } else {
            self.draw_reveal_delay
        };
        info!(%outcome, %screen, ?delay, "Match resolved");
        self.scheduler.schedule(delay, SessionTask::Reveal(screen));
        self.tick(Duration::ZERO);
    }

    /// Advances the session clock. Returns a result screen revealed by this tick.
    #[instrument(level = "trace", skip(self))]
    pub fn tick(&mut self, elapsed: Duration) -> Option<ResultScreen> {
        let mut revealed = None;
        let mut due = self.scheduler.advance(elapsed);
        // Zero-delay follow-ups run within the same tick.
        while !due.is_empty() {
            for task in due {
                match task {
                    SessionTask::Reveal(screen) => {
                        info!(%screen, "Result revealed");
                        self.result = Some(screen);
                        self.closable = false;
                        self.scheduler.schedule(self.popup_block, SessionTask::Unblock);
                        revealed = Some(screen);
                    }
                    SessionTask::Unblock => self.closable = true,
                }
            }
            due = self.scheduler.advance(Duration::ZERO);
        }
        revealed
    }

    /// Dismisses the result screen and starts the next match.
    ///
    /// Returns `Some(true)` when an interstitial should be shown before play
    /// resumes, and `None` if no result is showing or it cannot be dismissed yet.
    #[instrument(skip(self))]
    pub fn close_result(&mut self) -> Option<bool> {
        if self.result.is_none() || !self.closable {
            debug!("Nothing to dismiss yet");
            return None;
        }
        let show_ad = self.ads.notify_match_finished();
        self.restart();
        Some(show_ad)
    }

    /// Abandons the current match and starts a fresh one.
    ///
    /// Pending reveals are cancelled and the old engine's listener removed.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        self.engine.unsubscribe(self.subscription);

        let mut engine = MatchEngine::new();
        let (subscription, events) = engine.subscribe_channel();
        self.engine = engine;
        self.subscription = subscription;
        self.events = events;
        self.result = None;
        self.closable = false;
        self.opponent = AiPolicy::new(*self.progress.opponent().difficulty(), Side::Opponent);

        debug!(cancelled, "Session restarted");
        self.begin();
    }

    /// Changes the opponent tier, effective from its next move.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.progress.set_difficulty(difficulty);
        self.opponent = AiPolicy::new(difficulty, Side::Opponent);
    }

    /// Opens a bonus reward outside of any match.
    #[instrument(skip(self))]
    pub fn open_bonus(&mut self) -> RewardResult {
        let reward = self.progress.open_bonus();
        self.last_reward = Some(reward);
        reward
    }

    /// The current engine.
    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        self.engine.board()
    }

    /// Phase of the current match.
    pub fn phase(&self) -> MatchPhase {
        self.engine.phase()
    }

    /// The result screen being shown, if any.
    pub fn result_screen(&self) -> Option<ResultScreen> {
        self.result
    }

    /// Whether the result screen accepts dismissal.
    pub fn can_close_result(&self) -> bool {
        self.result.is_some() && self.closable
    }

    /// Reward from the most recent match or bonus.
    pub fn last_reward(&self) -> Option<RewardResult> {
        self.last_reward
    }

    /// Matches finished in this session.
    pub fn matches_finished(&self) -> u32 {
        self.matches_finished
    }

    /// Tasks waiting on the session clock.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Progress and profiles.
    pub fn progress(&self) -> &ProgressService<S> {
        &self.progress
    }

    /// Mutable progress and profiles.
    pub fn progress_mut(&mut self) -> &mut ProgressService<S> {
        &mut self.progress
    }

    /// The opponent's policy.
    pub fn opponent(&self) -> AiPolicy {
        self.opponent
    }
}

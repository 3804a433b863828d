use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use blackjack::{BlackjackError, RoundState};
use tokio::sync::MutexGuard as SourceGuard;

use crate::config::TableConfig;
use crate::error::TableError;
use crate::msg::{TableCommand, TableSnapshot};
use crate::source::{draw_exact, AsyncCardSource, ShuffledShoe};

/// One round at a time against an async card source.
///
/// Actions (`new_round`, `hit`, `stand`) hold the source lock for as long as
/// they run. A second action arriving meanwhile gets [`TableError::Busy`] and
/// changes nothing. The round itself sits behind a short-lived lock that is
/// never held across an `.await`, so [`Table::snapshot`] always answers, even
/// halfway through the dealer's turn.
pub struct Table<S> {
    config: TableConfig,
    source: tokio::sync::Mutex<S>,
    round: Mutex<RoundState>,
    resolving: AtomicBool,
}

impl Table<ShuffledShoe> {
    /// Table backed by a freshly shuffled shoe, seeded from the config when it has a seed.
    pub fn with_shuffled_shoe(config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        let shoe = match config.seed {
            Some(seed) => ShuffledShoe::with_seed(config.rules.num_decks, seed)?,
            None => ShuffledShoe::new(config.rules.num_decks)?,
        };
        Self::new(shoe, config)
    }
}

impl<S: AsyncCardSource> Table<S> {
    pub fn new(source: S, config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        let round = RoundState::new(config.rules)?;
        Ok(Self {
            config,
            source: tokio::sync::Mutex::new(source),
            round: Mutex::new(round),
            resolving: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            round: self.lock_round().snapshot(),
            resolving: self.resolving.load(Ordering::Acquire),
        }
    }

    /// Run a command and return the table as it stands afterwards.
    pub async fn execute(&self, command: TableCommand) -> Result<TableSnapshot, TableError> {
        log::debug!("Executing {command:?}");
        match command {
            TableCommand::NewRound => self.new_round().await,
            TableCommand::Hit => self.hit().await,
            TableCommand::Stand => self.stand().await,
            TableCommand::Snapshot => Ok(self.snapshot()),
        }
    }

    /// Shuffle a fresh shoe and deal.
    ///
    /// A source outage leaves the previous round exactly as it was. An empty
    /// shoe clears the table and halts.
    pub async fn new_round(&self) -> Result<TableSnapshot, TableError> {
        let mut source = self.acquire()?;

        let dealt = match source.shuffle().await {
            Ok(()) => draw_exact(&mut *source, 4).await,
            Err(e) => Err(e),
        };

        match dealt {
            Ok(cards) => self.lock_round().deal(&cards)?,
            Err(e) => return Err(self.fail_round_start(e)),
        }
        Ok(self.snapshot())
    }

    /// Draw one card for the player. Does nothing unless a round is in play.
    pub async fn hit(&self) -> Result<TableSnapshot, TableError> {
        let mut source = self.acquire()?;
        if !self.lock_round().is_playing() {
            return Ok(self.snapshot());
        }

        match draw_exact(&mut *source, 1).await {
            Ok(cards) => self.lock_round().apply_player_card(cards[0]),
            Err(e) => return Err(self.fail(e)),
        }
        Ok(self.snapshot())
    }

    pub async fn stand(&self) -> Result<TableSnapshot, TableError> {
        self.stand_with(|_| {}).await
    }

    /// Stand and play out the dealer's hand.
    ///
    /// `observer` sees the table after every dealer card, then the table waits
    /// `dealer_pacing_ms` before the next draw. If the source drops out midway
    /// the round goes back to where it was before `stand`; so does a stand
    /// whose future is dropped before it completes. An empty shoe keeps the
    /// cards already dealt and halts.
    pub async fn stand_with<F>(&self, mut observer: F) -> Result<TableSnapshot, TableError>
    where
        F: FnMut(&TableSnapshot),
    {
        let mut source = self.acquire()?;

        let saved = {
            let mut round = self.lock_round();
            if !round.is_playing() {
                drop(round);
                return Ok(self.snapshot());
            }
            let saved = round.clone();
            round.reveal = true;
            saved
        };
        let mut resolution = Resolution::begin(self, saved);
        let pacing = self.config.dealer_pacing();

        while self.lock_round().dealer_should_hit() {
            let card = match draw_exact(&mut *source, 1).await {
                Ok(cards) => cards[0],
                Err(e) if e.is_fatal() => {
                    let err = self.fail(e);
                    resolution.commit();
                    return Err(err);
                }
                Err(e) => {
                    log::warn!("Card source failed during stand, rolling back: {e}");
                    return Err(e.into());
                }
            };

            self.lock_round().apply_dealer_card(card);
            observer(&self.snapshot());

            if !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }
        }

        self.lock_round().settle();
        resolution.commit();
        Ok(self.snapshot())
    }

    fn acquire(&self) -> Result<SourceGuard<'_, S>, TableError> {
        self.source.try_lock().map_err(|_| {
            log::debug!("Rejected action: table busy");
            TableError::Busy
        })
    }

    fn lock_round(&self) -> MutexGuard<'_, RoundState> {
        self.round.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Route a source error raised mid-round: an empty shoe halts, anything
    /// else leaves the round untouched.
    fn fail(&self, err: BlackjackError) -> TableError {
        if err.is_fatal() {
            self.lock_round().halt();
        } else {
            log::warn!("Card source failed, round unchanged: {err}");
        }
        err.into()
    }

    fn fail_round_start(&self, err: BlackjackError) -> TableError {
        if err.is_fatal() {
            let mut round = self.lock_round();
            match RoundState::new(self.config.rules) {
                Ok(fresh) => *round = fresh,
                Err(e) => return e.into(),
            }
            round.halt();
        } else {
            log::warn!("Card source failed, round unchanged: {err}");
        }
        err.into()
    }
}

/// Marks a stand in flight. Unless committed, dropping it puts the round back
/// to the state saved when the stand began. Either way `resolving` is cleared.
struct Resolution<'a, S> {
    table: &'a Table<S>,
    saved: Option<RoundState>,
}

impl<'a, S> Resolution<'a, S> {
    fn begin(table: &'a Table<S>, saved: RoundState) -> Self {
        table.resolving.store(true, Ordering::Release);
        Self {
            table,
            saved: Some(saved),
        }
    }

    /// Keep the round as it is and mark the stand finished.
    fn commit(&mut self) {
        self.saved = None;
        self.table.resolving.store(false, Ordering::Release);
    }
}

impl<S> Drop for Resolution<'_, S> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            *self
                .table
                .round
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = saved;
        }
        self.table.resolving.store(false, Ordering::Release);
    }
}

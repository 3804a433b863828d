use std::future::Future;
use std::time::Duration;

use blackjack::{BlackjackError, Card, CardSource, StackedDeck, MAX_DECKS};
use rand::seq::SliceRandom;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

/// A card source that may have to wait on something outside the process.
///
/// Same contract as [`CardSource`]: `draw` hands back exactly `count` cards or
/// fails without consuming any.
pub trait AsyncCardSource: Send {
    fn shuffle(&mut self) -> impl Future<Output = Result<(), BlackjackError>> + Send;

    fn draw(&mut self, count: usize)
        -> impl Future<Output = Result<Vec<Card>, BlackjackError>> + Send;
}

/// Draw and check the source kept its contract.
pub(crate) async fn draw_exact<S: AsyncCardSource + ?Sized>(
    source: &mut S,
    count: usize,
) -> Result<Vec<Card>, BlackjackError> {
    let cards = source.draw(count).await?;
    if cards.len() != count {
        return Err(BlackjackError::ShoeExhausted {
            requested: count,
            available: cards.len(),
        });
    }
    Ok(cards)
}

/// Multi-deck shoe shuffled with ChaCha8.
///
/// Every `shuffle` puts all `num_decks × 52` cards back and shuffles again.
#[derive(Debug, Clone)]
pub struct ShuffledShoe {
    num_decks: u8,
    cards: Vec<Card>,
    rng: ChaCha8Rng,
}

impl ShuffledShoe {
    pub fn new(num_decks: u8) -> Result<Self, BlackjackError> {
        Self::with_rng(num_decks, ChaCha8Rng::from_entropy())
    }

    /// Same seed, same sequence of shoes.
    pub fn with_seed(num_decks: u8, seed: u64) -> Result<Self, BlackjackError> {
        Self::with_rng(num_decks, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(num_decks: u8, rng: ChaCha8Rng) -> Result<Self, BlackjackError> {
        if num_decks == 0 || num_decks > MAX_DECKS {
            return Err(BlackjackError::InvalidRules(format!(
                "Number of decks must be between 1 and {MAX_DECKS}, got {num_decks}"
            )));
        }
        let mut shoe = Self {
            num_decks,
            cards: Vec::with_capacity(52 * num_decks as usize),
            rng,
        };
        shoe.reshuffle();
        Ok(shoe)
    }

    pub fn num_decks(&self) -> u8 {
        self.num_decks
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    fn reshuffle(&mut self) {
        self.cards.clear();
        self.cards
            .extend((0..52 * self.num_decks as usize).map(Card::from_index));
        self.cards.shuffle(&mut self.rng);
        log::debug!("Shuffled a {}-deck shoe", self.num_decks);
    }
}

impl CardSource for ShuffledShoe {
    fn shuffle(&mut self) -> Result<(), BlackjackError> {
        self.reshuffle();
        Ok(())
    }

    fn draw(&mut self, count: usize) -> Result<Vec<Card>, BlackjackError> {
        if count > self.cards.len() {
            return Err(BlackjackError::ShoeExhausted {
                requested: count,
                available: self.cards.len(),
            });
        }
        // top of the shoe is the end of the vec
        let mut drawn = self.cards.split_off(self.cards.len() - count);
        drawn.reverse();
        Ok(drawn)
    }
}

impl AsyncCardSource for ShuffledShoe {
    async fn shuffle(&mut self) -> Result<(), BlackjackError> {
        CardSource::shuffle(self)
    }

    async fn draw(&mut self, count: usize) -> Result<Vec<Card>, BlackjackError> {
        CardSource::draw(self, count)
    }
}

impl AsyncCardSource for StackedDeck {
    async fn shuffle(&mut self) -> Result<(), BlackjackError> {
        CardSource::shuffle(self)
    }

    async fn draw(&mut self, count: usize) -> Result<Vec<Card>, BlackjackError> {
        CardSource::draw(self, count)
    }
}

/// Wraps a source with a fixed wait before every call, the way a remote deck
/// service answers.
#[derive(Debug, Clone)]
pub struct DelayedSource<S> {
    inner: S,
    latency: Duration,
}

impl<S> DelayedSource<S> {
    pub fn new(inner: S, latency: Duration) -> Self {
        Self { inner, latency }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: AsyncCardSource> AsyncCardSource for DelayedSource<S> {
    async fn shuffle(&mut self) -> Result<(), BlackjackError> {
        tokio::time::sleep(self.latency).await;
        self.inner.shuffle().await
    }

    async fn draw(&mut self, count: usize) -> Result<Vec<Card>, BlackjackError> {
        tokio::time::sleep(self.latency).await;
        self.inner.draw(count).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack::{Rank, ShoeCounts};

    #[test]
    fn test_shoe_holds_every_card() {
        let mut shoe = ShuffledShoe::with_seed(2, 1).unwrap();
        assert_eq!(shoe.remaining(), 104);

        let cards = CardSource::draw(&mut shoe, 104).unwrap();
        let mut counts = ShoeCounts::new(2);
        counts.observe_all(&cards);
        assert_eq!(counts.total_remaining(), 0);
        for rank in Rank::ALL {
            assert_eq!(counts.remaining(rank), 0);
        }
    }

    #[test]
    fn test_same_seed_same_shoe() {
        let mut a = ShuffledShoe::with_seed(6, 42).unwrap();
        let mut b = ShuffledShoe::with_seed(6, 42).unwrap();
        assert_eq!(
            CardSource::draw(&mut a, 20).unwrap(),
            CardSource::draw(&mut b, 20).unwrap()
        );
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = ShuffledShoe::with_seed(6, 1).unwrap();
        let mut b = ShuffledShoe::with_seed(6, 2).unwrap();
        assert_ne!(
            CardSource::draw(&mut a, 20).unwrap(),
            CardSource::draw(&mut b, 20).unwrap()
        );
    }

    #[test]
    fn test_short_draw_consumes_nothing() {
        let mut shoe = ShuffledShoe::with_seed(1, 3).unwrap();
        CardSource::draw(&mut shoe, 50).unwrap();
        assert_eq!(
            CardSource::draw(&mut shoe, 3),
            Err(BlackjackError::ShoeExhausted {
                requested: 3,
                available: 2
            })
        );
        assert_eq!(shoe.remaining(), 2);
    }

    #[test]
    fn test_shuffle_refills() {
        let mut shoe = ShuffledShoe::with_seed(1, 3).unwrap();
        CardSource::draw(&mut shoe, 30).unwrap();
        CardSource::shuffle(&mut shoe).unwrap();
        assert_eq!(shoe.remaining(), 52);
    }

    #[test]
    fn test_deck_count_is_checked() {
        assert!(ShuffledShoe::new(0).is_err());
        assert!(ShuffledShoe::with_seed(MAX_DECKS + 1, 0).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_source_waits() {
        let deck = StackedDeck::from_ranks(&[Rank::Ace, Rank::King]);
        let mut source = DelayedSource::new(deck, Duration::from_millis(300));

        let start = tokio::time::Instant::now();
        let cards = draw_exact(&mut source, 2).await.unwrap();
        assert_eq!(cards[0].rank, Rank::Ace);
        assert!(start.elapsed() >= Duration::from_millis(300));
        assert_eq!(source.inner().remaining(), 0);
    }
}

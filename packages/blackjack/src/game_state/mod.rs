use serde::{Deserialize, Serialize};

use crate::advisor::{advise, Advice};
use crate::dealer::{dealer_should_hit, play_dealer};
use crate::source::draw_exact;
use crate::{BlackjackError, Card, CardSource, Hand, ShoeCounts, TableRules};


/// Where the round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    NotStarted,
    Playing,
    Won,
    Lost,
    Draw,
    /// The shoe ran dry mid-round; nothing more happens until the next deal.
    Halted,
}

impl RoundStatus {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            RoundStatus::Won | RoundStatus::Lost | RoundStatus::Draw | RoundStatus::Halted
        )
    }
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub status: RoundStatus,
    pub reveal: bool,
    pub player_cards: Vec<Card>,
    pub player_score: u8,
    pub dealer_cards: Vec<Card>,
    pub dealer_score: u8,
    /// Score of what the player can see: the up-card alone until the reveal.
    pub dealer_visible_score: u8,
    pub remaining: ShoeCounts,
    pub cards_drawn: u32,
    pub advice: Option<Advice>,
}

/// One player against the dealer, one round at a time.
///
/// Every action takes `&mut self`, so a round can never be driven by two
/// callers at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub rules: TableRules,
    pub player_hand: Hand,
    pub dealer_hand: Hand,
    pub status: RoundStatus,
    /// Whether the dealer's hole card may be shown.
    pub reveal: bool,
    pub shoe: ShoeCounts,
}

impl RoundState {
    pub fn new(rules: TableRules) -> Result<Self, BlackjackError> {
        rules.validate()?;
        Ok(Self {
            rules,
            player_hand: Hand::new(),
            dealer_hand: Hand::new(),
            status: RoundStatus::NotStarted,
            reveal: false,
            shoe: ShoeCounts::new(rules.num_decks),
        })
    }

    pub fn player_value(&self) -> u8 {
        self.player_hand.value()
    }

    pub fn dealer_value(&self) -> u8 {
        self.dealer_hand.value()
    }

    pub fn is_playing(&self) -> bool {
        self.status == RoundStatus::Playing
    }

    pub fn cards_drawn(&self) -> u32 {
        self.shoe.drawn()
    }

    // ── Synchronous driver ──

    /// Shuffle a fresh shoe and deal player, dealer, player, dealer.
    ///
    /// `SourceUnavailable` leaves the state untouched; `ShoeExhausted` halts.
    pub fn new_round<S: CardSource + ?Sized>(&mut self, source: &mut S) -> Result<(), BlackjackError> {
        let dealt = source.shuffle().and_then(|()| draw_exact(source, 4));
        match dealt {
            Ok(cards) => self.deal(&cards),
            Err(e) if e.is_fatal() => {
                self.clear();
                Err(self.fail(e))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn hit<S: CardSource + ?Sized>(&mut self, source: &mut S) -> Result<(), BlackjackError> {
        if !self.is_playing() {
            return Ok(());
        }
        let card = draw_exact(source, 1).map_err(|e| self.fail(e))?[0];
        self.apply_player_card(card);
        Ok(())
    }

    pub fn stand<S: CardSource + ?Sized>(&mut self, source: &mut S) -> Result<(), BlackjackError> {
        self.stand_with(source, |_| {})
    }

    /// Stand and let the dealer play, calling `on_card` with the dealer's hand
    /// after every card so a caller can pace the display.
    ///
    /// The dealer plays on a scratch hand. A transient source failure drops it
    /// and the round continues as if `stand` was never called; an exhausted
    /// shoe keeps the cards that did arrive and halts.
    pub fn stand_with<S, F>(&mut self, source: &mut S, on_card: F) -> Result<(), BlackjackError>
    where
        S: CardSource + ?Sized,
        F: FnMut(&Hand),
    {
        if !self.is_playing() {
            return Ok(());
        }

        let mut dealer = self.dealer_hand.clone();
        let result = play_dealer(&mut dealer, source, on_card);

        match result {
            Ok(()) => {
                self.commit_dealer_hand(dealer);
                self.settle();
                Ok(())
            }
            Err(e) if e.is_fatal() => {
                self.commit_dealer_hand(dealer);
                Err(self.fail(e))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // ── Step-wise API ──

    /// Start a round from four freshly drawn cards in deal order.
    pub fn deal(&mut self, cards: &[Card]) -> Result<(), BlackjackError> {
        if cards.len() != 4 {
            return Err(BlackjackError::ShoeExhausted {
                requested: 4,
                available: cards.len(),
            });
        }

        self.player_hand = Hand::from_cards(vec![cards[0], cards[2]]);
        self.dealer_hand = Hand::from_cards(vec![cards[1], cards[3]]);
        self.shoe.reset();
        self.shoe.observe_all(cards);
        self.status = RoundStatus::Playing;
        self.reveal = false;

        log::info!(
            "New round: player {} ({}), dealer shows {}",
            hand_display(&self.player_hand),
            self.player_value(),
            cards[3].to_display()
        );

        self.check_naturals();
        Ok(())
    }

    /// Append a card drawn for the player. A bust ends the round on the spot.
    pub fn apply_player_card(&mut self, card: Card) {
        if !self.is_playing() {
            return;
        }
        self.player_hand.add_card(card);
        self.shoe.observe(&card);

        let value = self.player_value();
        log::debug!("Player hits {}, has {}", card.to_display(), value);
        if value > crate::hand::BLACKJACK {
            log::info!("Player busts with {value}");
            self.finish(RoundStatus::Lost);
        }
    }

    pub fn dealer_should_hit(&self) -> bool {
        self.is_playing() && dealer_should_hit(&self.dealer_hand)
    }

    pub fn apply_dealer_card(&mut self, card: Card) {
        if !self.is_playing() {
            return;
        }
        self.dealer_hand.add_card(card);
        self.shoe.observe(&card);
        log::debug!("Dealer draws {}, has {}", card.to_display(), self.dealer_value());
    }

    /// Compare totals once the dealer has stopped drawing.
    pub fn settle(&mut self) {
        if !self.is_playing() {
            return;
        }
        let player = self.player_value();
        let dealer = self.dealer_value();

        let status = if dealer > crate::hand::BLACKJACK || player > dealer {
            RoundStatus::Won
        } else if dealer > player {
            RoundStatus::Lost
        } else {
            RoundStatus::Draw
        };
        log::info!("Player {player} vs dealer {dealer}: {status:?}");
        self.finish(status);
    }

    pub fn halt(&mut self) {
        log::warn!("Round halted: shoe exhausted");
        self.status = RoundStatus::Halted;
        self.reveal = true;
    }

    // ── Views ──

    /// Advisor output for the current player hand, when the table runs with it.
    pub fn advise(&self) -> Option<Advice> {
        self.rules
            .advisor_enabled
            .then(|| advise(&self.player_hand.cards, &self.shoe))
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let dealer_visible_score = if self.reveal {
            self.dealer_value()
        } else {
            // the first dealer card is the hole card
            self.dealer_hand.cards.get(1).map(|c| c.value()).unwrap_or(0)
        };

        RoundSnapshot {
            status: self.status,
            reveal: self.reveal,
            player_cards: self.player_hand.cards.clone(),
            player_score: self.player_value(),
            dealer_cards: self.dealer_hand.cards.clone(),
            dealer_score: self.dealer_value(),
            dealer_visible_score,
            remaining: self.shoe.clone(),
            cards_drawn: self.shoe.drawn(),
            advice: self.advise(),
        }
    }

    // ── Internals ──

    fn check_naturals(&mut self) {
        let player = self.player_hand.is_blackjack();
        let dealer = self.dealer_hand.is_blackjack();
        let status = match (player, dealer) {
            (true, true) => RoundStatus::Draw,
            (true, false) => RoundStatus::Won,
            (false, true) => RoundStatus::Lost,
            (false, false) => return,
        };
        log::info!("Natural on the deal: {status:?}");
        self.finish(status);
    }

    fn clear(&mut self) {
        self.player_hand = Hand::new();
        self.dealer_hand = Hand::new();
        self.shoe.reset();
    }

    fn commit_dealer_hand(&mut self, dealer: Hand) {
        let start = self.dealer_hand.len();
        self.shoe.observe_all(&dealer.cards[start..]);
        self.dealer_hand = dealer;
    }

    fn finish(&mut self, status: RoundStatus) {
        self.status = status;
        self.reveal = true;
    }

    /// Route a source error: fatal ones halt the round, the rest pass through untouched.
    fn fail(&mut self, err: BlackjackError) -> BlackjackError {
        if err.is_fatal() {
            self.halt();
        } else {
            log::warn!("Card source failed, round unchanged: {err}");
        }
        err
    }
}

fn hand_display(hand: &Hand) -> String {
    hand.cards
        .iter()
        .map(Card::to_display)
        .collect::<Vec<_>>()
        .join(" ")
}

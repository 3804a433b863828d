use crate::rules::DEALER_STAND_VALUE;
use crate::source::draw_exact;
use crate::{BlackjackError, CardSource, Hand};

/// Dealer draws on anything below 17, soft or hard, and stands otherwise.
pub fn dealer_should_hit(hand: &Hand) -> bool {
    hand.value() < DEALER_STAND_VALUE
}

/// Play out the dealer's hand one card at a time.
///
/// Every drawn card is appended and `on_card` sees the hand after each draw.
/// If the source fails, the error is returned and `hand` keeps exactly the
/// cards drawn before the failure. The loop is bounded by the shoe: every card
/// raises the minimum total by at least one.
pub fn play_dealer<S, F>(hand: &mut Hand, source: &mut S, mut on_card: F) -> Result<(), BlackjackError>
where
    S: CardSource + ?Sized,
    F: FnMut(&Hand),
{
    while dealer_should_hit(hand) {
        let card = draw_exact(source, 1)?[0];
        hand.add_card(card);
        log::debug!("Dealer draws {}, has {}", card.to_display(), hand.value());
        on_card(hand);
    }
    log::debug!("Dealer stands with {}", hand.value());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Card, Rank, StackedDeck, Suit};

    fn hand(ranks: &[Rank]) -> Hand {
        Hand::from_cards(ranks.iter().map(|&r| Card::new(r, Suit::Clubs)).collect())
    }

    #[test]
    fn test_dealer_should_hit() {
        assert!(dealer_should_hit(&hand(&[Rank::Ten, Rank::Six])));
        assert!(!dealer_should_hit(&hand(&[Rank::Ten, Rank::Seven])));
    }

    #[test]
    fn test_dealer_stands_on_soft_17() {
        assert!(!dealer_should_hit(&hand(&[Rank::Ace, Rank::Six])));
    }

    #[test]
    fn test_play_dealer_draws_until_17() {
        let mut dealer = hand(&[Rank::Ten, Rank::Two]);
        let mut deck = StackedDeck::from_ranks(&[Rank::Three, Rank::Four, Rank::Nine]);
        play_dealer(&mut dealer, &mut deck, |_| {}).unwrap();
        assert_eq!(dealer.value(), 19);
        assert_eq!(dealer.len(), 4);
        assert_eq!(deck.remaining(), 1);
    }

    #[test]
    fn test_play_dealer_already_standing_draws_nothing() {
        let mut dealer = hand(&[Rank::King, Rank::Queen]);
        let mut deck = StackedDeck::from_ranks(&[Rank::Two]);
        play_dealer(&mut dealer, &mut deck, |_| panic!("no draw expected")).unwrap();
        assert_eq!(deck.remaining(), 1);
    }

    #[test]
    fn test_play_dealer_soft_hand_converts() {
        // A+5 = soft 16, draws a King -> hard 16, draws a 5 -> 21
        let mut dealer = hand(&[Rank::Ace, Rank::Five]);
        let mut deck = StackedDeck::from_ranks(&[Rank::King, Rank::Five]);
        play_dealer(&mut dealer, &mut deck, |_| {}).unwrap();
        assert_eq!(dealer.value(), 21);
    }

    #[test]
    fn test_play_dealer_reports_each_card() {
        let mut dealer = hand(&[Rank::Two, Rank::Two]);
        let mut deck = StackedDeck::from_ranks(&[Rank::Two, Rank::Two, Rank::Ten]);
        let mut seen = Vec::new();
        play_dealer(&mut dealer, &mut deck, |h| seen.push(h.value())).unwrap();
        assert_eq!(seen, vec![6, 8, 18]);
    }

    #[test]
    fn test_play_dealer_exhaustion_is_an_error() {
        let mut dealer = hand(&[Rank::Two, Rank::Three]);
        let mut deck = StackedDeck::from_ranks(&[Rank::Four]);
        let err = play_dealer(&mut dealer, &mut deck, |_| {}).unwrap_err();
        assert!(err.is_fatal());
        // the one card that did arrive stays in the hand
        assert_eq!(dealer.len(), 3);
        assert_eq!(dealer.value(), 9);
    }

    #[test]
    fn test_play_dealer_terminates_on_any_finite_shoe() {
        let all: Vec<Card> = (0..52).map(Card::from_index).collect();
        for start in 0..52 {
            let mut deck = StackedDeck::new(all.iter().cycle().skip(start).take(52).copied());
            let mut dealer = Hand::new();
            match play_dealer(&mut dealer, &mut deck, |_| {}) {
                Ok(()) => assert!(dealer.value() >= 17),
                Err(e) => assert!(e.is_fatal()),
            }
        }
    }
}

use blackjack::{advise, Card, Rank, ShoeCounts, Suit, TableRules};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "bust-odds",
    about = "Chance that the next card busts a blackjack hand, given the cards already seen"
)]
struct Args {
    /// Player cards, comma separated ranks (e.g. "A,7" or "10,6")
    #[arg(long)]
    hand: String,

    /// Other cards already seen this shoe, including the dealer's (e.g. "K,5,9")
    #[arg(long, default_value = "")]
    seen: String,

    /// Number of decks in the shoe
    #[arg(long, env = "BLACKJACK_DECKS", default_value = "6")]
    decks: u8,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = TableRules::new(args.decks, true) {
        log::error!("{e}");
        std::process::exit(1);
    }

    let hand = parse_cards(&args.hand);
    let seen = parse_cards(&args.seen);

    let mut shoe = ShoeCounts::new(args.decks);
    shoe.observe_all(hand.iter().chain(seen.iter()));

    let advice = advise(&hand, &shoe);
    let value = blackjack::calculate_hand_value(&hand);

    eprintln!("Shoe:  {} decks, {} cards seen", args.decks, shoe.drawn());
    eprintln!(
        "Hand:  {} ({}{})",
        hand.iter().map(|c| c.rank.symbol()).collect::<Vec<_>>().join(" "),
        if blackjack::is_soft_hand(&hand) { "soft " } else { "" },
        value
    );

    println!("Bust chance on hit: {:.1}%", advice.bust_probability * 100.0);
    println!("Recommendation:     {:?}", advice.recommendation);
    println!("Rough win chance:   {:.0}%", advice.rough_win_chance * 100.0);
    println!("Remaining:");
    for (rank, count) in shoe.iter() {
        println!("  {:>5}: {count}", rank.name());
    }
}

fn parse_cards(s: &str) -> Vec<Card> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let rank: Rank = part.parse().unwrap_or_else(|e| {
                log::error!("{e}");
                std::process::exit(1);
            });
            // suits carry no weight for the estimate
            Card::new(rank, Suit::Spades)
        })
        .collect()
}

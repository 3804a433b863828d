use std::io::Write;

use blackjack::{Advice, Card, RoundSnapshot, RoundStatus, TableRules};
use blackjack_table::{Table, TableCommand, TableConfig, TableSnapshot};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

type BoxErr = Box<dyn std::error::Error + Send + Sync>;

const HOLE_CARD: &str = "??";

#[derive(Parser)]
#[command(name = "blackjack-console", about = "Play blackjack against the dealer in the terminal")]
struct Cli {
    /// Number of decks in the shoe
    #[arg(long, env = "BLACKJACK_DECKS", default_value_t = 6)]
    decks: u8,

    /// Show bust odds and a hit/stand recommendation
    #[arg(long, env = "BLACKJACK_ADVISOR", default_value_t = true, action = clap::ArgAction::Set)]
    advisor: bool,

    /// Pause between dealer cards, in milliseconds
    #[arg(long, env = "BLACKJACK_PACING_MS", default_value_t = 600)]
    pacing_ms: u64,

    /// Seed for a reproducible shoe
    #[arg(long, env = "BLACKJACK_SEED")]
    seed: Option<u64>,

    /// Print every snapshot as a line of JSON instead of the table view
    #[arg(long, env = "BLACKJACK_JSON")]
    json: bool,
}

impl Cli {
    fn table_config(&self) -> TableConfig {
        let config = TableConfig::new(TableRules {
            num_decks: self.decks,
            advisor_enabled: self.advisor,
        })
        .with_pacing(self.pacing_ms);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        log::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), BoxErr> {
    let config = cli.table_config();
    let table = Table::with_shuffled_shoe(config)?;
    log::info!(
        "Table open: {} decks, advisor {}, pacing {}ms",
        config.rules.num_decks,
        if config.rules.advisor_enabled { "on" } else { "off" },
        config.dealer_pacing_ms
    );

    if !cli.json {
        println!("{}", help_text());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if !cli.json {
            print!("> ");
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "" => continue,
            "q" | "quit" | "exit" => break,
            "?" | "help" => {
                println!("{}", help_text());
                continue;
            }
            _ => {}
        }

        let command: TableCommand = match line.parse() {
            Ok(command) => command,
            Err(e) => {
                println!("{e} (type 'help' for the commands)");
                continue;
            }
        };

        let json = cli.json;
        let result = match command {
            TableCommand::Stand => {
                table
                    .stand_with(|snap| {
                        if json {
                            print_json(snap);
                        } else {
                            println!("Dealer draws... {}", dealer_line(&snap.round));
                        }
                    })
                    .await
            }
            other => table.execute(other).await,
        };

        match result {
            Ok(snap) => show(&snap, json),
            Err(e) if e.is_fatal() => {
                log::error!("{e}");
                show(&table.snapshot(), json);
            }
            Err(e) => println!("{e}"),
        }
    }

    Ok(())
}

fn show(snap: &TableSnapshot, json: bool) {
    if json {
        print_json(snap);
    } else {
        println!("{}", render(snap));
    }
}

fn print_json(snap: &TableSnapshot) {
    match serde_json::to_string(snap) {
        Ok(line) => println!("{line}"),
        Err(e) => log::error!("Failed to encode snapshot: {e}"),
    }
}

fn help_text() -> &'static str {
    "Commands: n/new/deal, h/hit, s/stand, a/advice/show, q/quit"
}

fn cards_line(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_display)
        .collect::<Vec<_>>()
        .join(" ")
}

fn dealer_line(round: &RoundSnapshot) -> String {
    let cards = if round.reveal {
        cards_line(&round.dealer_cards)
    } else {
        round
            .dealer_cards
            .iter()
            .enumerate()
            .map(|(i, card)| if i == 0 { HOLE_CARD.to_string() } else { card.to_display() })
            .collect::<Vec<_>>()
            .join(" ")
    };
    format!("{cards} ({})", round.dealer_visible_score)
}

fn status_line(status: RoundStatus) -> &'static str {
    match status {
        RoundStatus::NotStarted => "Type 'n' to deal.",
        RoundStatus::Playing => "Hit or stand?",
        RoundStatus::Won => "You won!",
        RoundStatus::Lost => "You lost!",
        RoundStatus::Draw => "Draw!",
        RoundStatus::Halted => "The shoe ran out. Type 'n' for a fresh one.",
    }
}

fn render(snap: &TableSnapshot) -> String {
    let round = &snap.round;
    let mut out = String::new();

    if !round.player_cards.is_empty() {
        out.push_str(&format!("Dealer: {}\n", dealer_line(round)));
        out.push_str(&format!(
            "You:    {} ({})\n",
            cards_line(&round.player_cards),
            round.player_score
        ));
    }
    out.push_str(status_line(round.status));

    if let Some(advice) = &round.advice {
        if !round.player_cards.is_empty() {
            out.push('\n');
            out.push_str(&render_advice(round, advice));
        }
    }
    out
}

fn render_advice(round: &RoundSnapshot, advice: &Advice) -> String {
    let mut out = format!(
        "Cards drawn: {}\nAdvice: {:?}\nBust chance: {:.1}%\nWin chance: {:.0}%\nRemaining:",
        round.cards_drawn,
        advice.recommendation,
        advice.bust_probability * 100.0,
        advice.rough_win_chance * 100.0
    );
    for (rank, count) in round.remaining.iter() {
        out.push_str(&format!(" {}:{count}", rank.symbol()));
    }
    out
}

//! `fete sections`: prints the deck the experience would walk.

use anyhow::Result;
use fete_core::config::Config;
use fete_core::deck::EntryAction;

pub fn run(config: &Config) -> Result<()> {
    let deck = config.deck()?;
    for (i, kind) in deck.iter().enumerate() {
        match kind.entry_action() {
            Some(action) => println!("{:>2}  {:<10} {}", i + 1, kind, describe(action)),
            None => println!("{:>2}  {kind}", i + 1),
        }
    }
    Ok(())
}

fn describe(action: EntryAction) -> &'static str {
    match action {
        EntryAction::ConfettiBurst => "confetti on entry",
        EntryAction::StartSlideshow => "starts the photo timer",
        EntryAction::RevealMessage => "types the message (once)",
        EntryAction::ClosingHearts => "hearts on entry",
    }
}

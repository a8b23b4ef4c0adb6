use rallypoint::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

enum Command {
    Start { kind: GameKind, player: PlayerId },
    Join { game: GameId, player: PlayerId },
    Leave { game: GameId, player: PlayerId },
    Show { game: GameId },
    List,
    Sweep,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  start <foosball|pong|chess|darts> <player>
  join <game> <player>
  leave <game> <player>
  show <game>
  list
  sweep
  quit";

fn parse(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["start", kind, player] => Ok(Command::Start {
            kind: kind.parse().map_err(|e| format!("{e}"))?,
            player: PlayerId::new(*player),
        }),
        ["join", game, player] => Ok(Command::Join {
            game: GameId::new(*game),
            player: PlayerId::new(*player),
        }),
        ["leave", game, player] => Ok(Command::Leave {
            game: GameId::new(*game),
            player: PlayerId::new(*player),
        }),
        ["show", game] => Ok(Command::Show { game: GameId::new(*game) }),
        ["list"] => Ok(Command::List),
        ["sweep"] => Ok(Command::Sweep),
        ["help"] | [] => Ok(Command::Help),
        ["quit"] | ["exit"] => Ok(Command::Quit),
        _ => Err(format!("unrecognized command: {line}")),
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => LobbyConfig::load(path)?,
        None => LobbyConfig::default(),
    };

    let (events, mut rx) = mpsc::unbounded_channel::<GameEvent>();
    let server = LobbyServer::builder().config(config).build(events)?;
    let collector = server.spawn_collector();
    let lobby = std::sync::Arc::clone(server.lobby());

    // Stand-in for a chat integration: print every event as a JSON line.
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => println!("event {json}"),
                Err(e) => tracing::warn!(error = %e, "could not encode event"),
            }
        }
    });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse(line.trim()) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match command {
            Command::Start { kind, player } => match lobby.create_or_join(kind, player).await {
                Ok(outcome) => {
                    println!("{} -> {:?}", outcome.game_id, outcome.disposition);
                    if let Some(messages) = lobby.messages(&outcome.game_id).await {
                        match outcome.disposition {
                            JoinDisposition::Created => println!("{}", messages.created),
                            JoinDisposition::AlreadyQueued => println!("{}", messages.queued),
                            JoinDisposition::Joined => println!("{}", messages.roster_summary),
                        }
                    }
                }
                Err(e) => eprintln!("error: {e}"),
            },
            Command::Join { game, player } => match lobby.join(&game, player).await {
                Some(true) => println!("joined {game}"),
                Some(false) => println!("{game} is not accepting that join"),
                None => println!("no such game: {game}"),
            },
            Command::Leave { game, player } => match lobby.leave(&game, &player).await {
                Some(true) => println!("left {game}"),
                Some(false) => println!("{game} is already closed"),
                None => println!("no such game: {game}"),
            },
            Command::Show { game } => match lobby.snapshot(&game).await {
                Some(snapshot) => {
                    let players: Vec<&str> = snapshot.roster.iter().map(PlayerId::as_str).collect();
                    println!(
                        "{game}: {} {} ({}..={}) players=[{}] expires_in={:?}",
                        snapshot.kind,
                        snapshot.state,
                        snapshot.capacity.min,
                        snapshot.capacity.max,
                        players.join(", "),
                        snapshot.expires_in,
                    );
                }
                None => println!("no such game: {game}"),
            },
            Command::List => {
                for id in lobby.game_ids().await {
                    println!("{id}");
                }
            }
            Command::Sweep => {
                let report = lobby.sweep().await;
                println!(
                    "removed {} game(s), {} remaining",
                    report.removed.len(),
                    report.remaining
                );
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    collector.abort();
    Ok(())
}

use engine::{init_logging, label_custom_rules, GameResult, GameState, LogVerbosity, RuleSet, Snapshot};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Command
{
    Draw,                // "d"
    AddPlayer(String),   // "a <name>"
    RemovePlayer(String), // "r <name>"
    NewRule(String),     // "n <text>"
    Show,                // "s"
    Quit,                // "q"
    Invalid,             // anything else
}

fn parse_command(line: &str) -> Command
{
    let line = line.trim();
    let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim().to_string();

    match head
    {
        "d" => Command::Draw,
        "a" => Command::AddPlayer(rest),
        "r" => Command::RemovePlayer(rest),
        "n" => Command::NewRule(rest),
        "s" => Command::Show,
        "q" => Command::Quit,
        _ => Command::Invalid,
    }
}

fn main()
{
    let verbosity = std::env::var("KINGS_CUP_LOG")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(LogVerbosity::Warning);
    init_logging(verbosity);

    let rules = match std::env::var("KINGS_CUP_RULESET")
    {
        Ok(path) => RuleSet::load(path),
        Err(_) => RuleSet::builtin(),
    };
    let rules = match rules
    {
        Ok(rules) => Arc::new(rules),
        Err(e) =>
        {
            tracing::error!("cannot start game: {}", e);
            std::process::exit(1);
        }
    };

    println!("King's Cup");
    println!("Commands:");
    println!("  d         -> draw a card");
    println!("  a <name>  -> add a player");
    println!("  r <name>  -> remove a player");
    println!("  n <text>  -> add a custom rule");
    println!("  s         -> show the table");
    println!("  q         -> quit");
    println!();
    println!("Comma separated list of players:");

    // Stands in for a session store: the game only lives here between commands.
    let mut session: HashMap<String, String> = HashMap::new();
    GameState::from_roster(&read_line(), rules.clone()).serialize().write_to(&mut session);

    loop
    {
        let command = parse_command(&read_line());
        if command == Command::Quit
        {
            break;
        }

        if let Err(e) = apply(&mut session, &rules, command)
        {
            tracing::warn!("{}", e);
            println!("{}", e);
        }
    }
}

fn apply(session: &mut HashMap<String, String>, rules: &Arc<RuleSet>, command: Command) -> GameResult<()>
{
    let mut game = GameState::deserialize(&Snapshot::read_from(&*session)?, rules.clone())?;

    match command
    {
        Command::Draw =>
        {
            let turn = game.take_turn()?;
            println!("\n=== Turn {} ===", turn.turn);
            println!("{} drew the {}", turn.player, turn.card);
            println!("{}: {}", turn.rule_name, turn.rule_text);
            if turn.triggers_custom_rule
            {
                println!("Make a new rule with: n <text>");
            }
            if turn.deck_reshuffled
            {
                println!("That was the last card, the deck has been reshuffled.");
            }
        }
        Command::AddPlayer(name) => game.add_player(&name)?,
        Command::RemovePlayer(name) => game.remove_player(&name)?,
        Command::NewRule(text) => game.add_custom_rule(&text)?,
        Command::Show => describe(&game),
        Command::Quit => {}
        Command::Invalid => println!("Unknown command"),
    }

    game.serialize().write_to(session);
    Ok(())
}

fn describe(game: &GameState)
{
    println!("Turn: {}", game.total_turns());
    println!("Cards left: {}", game.deck().len());
    if !game.last_card().is_empty()
    {
        println!("Last card: {}", game.last_card());
    }

    let players: Vec<String> = game
        .players()
        .iter()
        .enumerate()
        .map(|(i, p)| if i == game.current_player() { format!("[{}]", p) } else { p.clone() })
        .collect();
    println!("Players: {}", players.join(", "));

    for entry in label_custom_rules(game.custom_rules())
    {
        println!("  {}: {}", entry.label, entry.text);
    }
}

fn read_line() -> String
{
    print!("> ");
    let _ = io::stdout().flush();
    let mut input = String::new();
    if io::stdin().read_line(&mut input).unwrap_or(0) == 0
    {
        // EOF behaves like "q".
        return String::from("q");
    }
    input
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn parses_commands()
    {
        assert_eq!(parse_command("d\n"), Command::Draw);
        assert_eq!(parse_command("a  Jo Smith "), Command::AddPlayer("Jo Smith".into()));
        assert_eq!(parse_command("r Jo"), Command::RemovePlayer("Jo".into()));
        assert_eq!(parse_command("n no pointing"), Command::NewRule("no pointing".into()));
        assert_eq!(parse_command("q"), Command::Quit);
        assert_eq!(parse_command("x"), Command::Invalid);
    }

    #[test]
    fn commands_run_against_the_session_map()
    {
        let rules = Arc::new(RuleSet::builtin().unwrap());
        let mut session: HashMap<String, String> = HashMap::new();
        GameState::from_roster("A,B", rules.clone()).serialize().write_to(&mut session);

        apply(&mut session, &rules, Command::Draw).unwrap();
        apply(&mut session, &rules, Command::NewRule("x".into())).unwrap();
        apply(&mut session, &rules, Command::AddPlayer("C".into())).unwrap();
        assert!(apply(&mut session, &rules, Command::RemovePlayer("Z".into())).is_err());

        let snapshot = Snapshot::read_from(&session).unwrap();
        assert_eq!(snapshot.players, "A,B,C");
        assert_eq!(snapshot.total_turns, 1);
        assert_eq!(snapshot.custom_rules, "A|x`");
    }
}

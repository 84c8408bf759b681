use engine::{Card, GameState, RuleSet, Snapshot, Suit};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

fn rules() -> Arc<RuleSet>
{
    Arc::new(RuleSet::builtin().expect("builtin ruleset"))
}

#[derive(Clone, Debug)]
enum Step
{
    Draw,
    Add(String),
    Remove(usize),
    Rule(String),
}

fn step() -> impl Strategy<Value = Step>
{
    prop_oneof![
        4 => Just(Step::Draw),
        1 => "[A-Za-z ,|`]{1,8}".prop_map(Step::Add),
        1 => (0usize..6).prop_map(Step::Remove),
        1 => "[a-z |`]{1,16}".prop_map(Step::Rule),
    ]
}

proptest!
{
    #[test]
    fn card_compact_round_trip(rank in 1u8..=14, suit in 0u8..4)
    {
        let card = Card::new(rank, Suit::from_index(suit).unwrap()).unwrap();
        prop_assert_eq!(Card::from_compact_str(&card.to_compact_string()).unwrap(), card);
    }

    #[test]
    fn reachable_states_survive_the_session_store(steps in prop::collection::vec(step(), 0..80))
    {
        let rules = rules();
        let mut game = GameState::new(["A", "B", "C"], rules.clone());

        for step in steps
        {
            // Rejected actions are part of normal play; they must not corrupt the state.
            let _ = match step
            {
                Step::Draw => game.take_turn().map(|_| ()),
                Step::Add(name) => game.add_player(&name),
                Step::Remove(i) =>
                {
                    let name = game.players().get(i).cloned().unwrap_or_else(|| "nobody".into());
                    game.remove_player(&name)
                }
                Step::Rule(text) => game.add_custom_rule(&text),
            };
        }

        let mut store: HashMap<String, String> = HashMap::new();
        game.serialize().write_to(&mut store);
        let restored = GameState::deserialize(&Snapshot::read_from(&store).unwrap(), rules).unwrap();

        prop_assert_eq!(restored.players(), game.players());
        prop_assert_eq!(restored.deck().cards(), game.deck().cards());
        prop_assert_eq!(restored.custom_rules(), game.custom_rules());
        prop_assert_eq!(restored.total_turns(), game.total_turns());
        prop_assert_eq!(restored.current_player(), game.current_player());
        prop_assert_eq!(restored.last_card(), game.last_card());
        prop_assert_eq!(restored.current_card(), game.current_card());
        prop_assert_eq!(restored.player_who_drew_card(), game.player_who_drew_card());
    }
}

#[test]
fn game_state_json_round_trip()
{
    let mut gs = GameState::from_roster("Ann,Ben", rules());
    gs.take_turn().expect("take turn");
    gs.add_custom_rule("Drink with your left hand").expect("add rule");

    let json = serde_json::to_string(&gs.serialize()).expect("serialize snapshot");
    let snapshot: Snapshot = serde_json::from_str(&json).expect("deserialize snapshot");
    let gs2 = GameState::deserialize(&snapshot, rules()).expect("restore game");

    assert_eq!(gs, gs2);
    assert_eq!(gs2.custom_rules()[0].author, "Ann");
}

#[test]
fn game_survives_a_full_deck_and_more()
{
    let mut gs = GameState::from_roster("A,B,C", rules());
    let mut reshuffles = 0;

    for turn in 1..=120u32
    {
        let snapshot = gs.serialize();
        gs = GameState::deserialize(&snapshot, rules()).expect("restore game");

        let outcome = gs.take_turn().expect("take turn");
        assert_eq!(outcome.turn, turn);
        assert!(outcome.remaining > 0);
        if outcome.deck_reshuffled
        {
            reshuffles += 1;
        }
    }

    assert_eq!(reshuffles, 2);
    assert_eq!(gs.deck().len(), 52 * 3 - 120);
}

use std::collections::HashMap;

use proptest::prelude::*;
use tourney_engine::combat::{Battle, BattleEvent, BattleState, Side};
use tourney_engine::{resolve_match, CombatRules, CreatureRecord, Decision, Dice, Stats, Team};

fn creature(id: u32, name: &str, hp: u32, attack: u32, defense: u32, speed: u32) -> CreatureRecord {
    CreatureRecord::new(id, name, Stats { hp, attack, defense, speed })
}

fn duel_teams() -> (Team, Team) {
    let first = Team::new(1, vec![creature(1, "Alpha", 10, 50, 20, 10)]);
    let second = Team::new(2, vec![creature(2, "Beta", 60, 5, 0, 5)]);
    (first, second)
}

#[test]
fn scripted_duel_plays_out_exactly() {
    let (mut first, mut second) = duel_teams();
    // picks, crit rolls: exchange 1 no crits, exchange 2 Alpha crits.
    let mut dice = Dice::from_scripted(vec![0, 0, 99, 99, 0, 0, 5]);
    let out = resolve_match(&mut first, &mut second, &mut dice, &CombatRules::default());

    assert_eq!(out.winner, Side::First);
    assert_eq!(out.decided_by, Decision::Knockout);
    assert_eq!(out.exchanges, 2);
    let damages: Vec<(u32, bool)> = out
        .events()
        .iter()
        .filter_map(|e| e.strike().map(|s| (s.damage, s.critical)))
        .collect();
    assert_eq!(damages, vec![(50, false), (4, false), (75, true)]);
    assert!(matches!(out.events().last(), Some(BattleEvent::KnockOut { remaining_hp: 0, .. })));

    // The summary keeps the pre-heal numbers; the team itself is back to full.
    assert_eq!(out.summary.team1.members[0].starting_hp, 10);
    assert_eq!(out.summary.team1.members[0].ending_hp, 6);
    assert_eq!(out.summary.team2.members[0].ending_hp, 0);
    assert_eq!(out.summary.match_winner, "Team 1");
    assert_eq!(out.summary.team_winner, "Team 1");
    assert_eq!(out.summary.winner, out.winner_team);
    assert_eq!(out.summary.winner_record().id, out.winner_team);
    assert_eq!(first.members[0].current_hp(), 10);
    assert_eq!(second.members[0].current_hp(), 0);
}

#[test]
fn knockout_skips_the_counter() {
    let first = Team::new(1, vec![creature(1, "Quick", 10, 100, 0, 90)]);
    let second = Team::new(2, vec![creature(2, "Frail", 5, 100, 0, 10)]);
    let (mut first, mut second) = (first, second);
    let out = resolve_match(&mut first, &mut second, &mut Dice::from_seed(3), &CombatRules::default());
    assert_eq!(out.events().len(), 2);
    assert!(matches!(out.events()[0], BattleEvent::Attack(_)));
    assert!(matches!(out.events()[1], BattleEvent::KnockOut { .. }));
    assert_eq!(first.members[0].current_hp(), 10);
}

#[test]
fn ceiling_decides_on_remaining_health() {
    let first = Team::new(1, vec![creature(1, "Wall", 500, 1, 200, 10)]);
    let second = Team::new(2, vec![creature(2, "Pebble", 400, 1, 200, 5)]);
    let (mut first, mut second) = (first, second);
    let rules = CombatRules { turn_ceiling: 10, ..CombatRules::default() };
    let out = resolve_match(&mut first, &mut second, &mut Dice::from_seed(11), &rules);
    assert_eq!(out.decided_by, Decision::TurnCeiling);
    assert_eq!(out.exchanges, 10);
    assert_eq!(out.winner, Side::First);
    assert_eq!(out.summary.team1.members[0].ending_hp, 490);
    assert_eq!(out.summary.team2.members[0].ending_hp, 390);
}

#[test]
fn ceiling_tie_goes_to_second_side() {
    let first = Team::new(1, vec![creature(1, "Left", 100, 1, 200, 10)]);
    let second = Team::new(2, vec![creature(2, "Right", 100, 1, 200, 5)]);
    let (mut first, mut second) = (first, second);
    let rules = CombatRules { turn_ceiling: 7, ..CombatRules::default() };
    let out = resolve_match(&mut first, &mut second, &mut Dice::from_seed(1), &rules);
    assert_eq!(out.decided_by, Decision::TurnCeiling);
    assert_eq!(out.winner, Side::Second);
    assert_eq!(out.winner_team.0, 2);
    // Both took one point per exchange.
    assert_eq!(out.summary.team1.members[0].ending_hp, 93);
    assert_eq!(out.summary.team2.members[0].ending_hp, 93);
    assert_eq!(second.members[0].current_hp(), 100);
}

#[test]
fn winner_record_follows_team_id_not_name() {
    let mut first = Team::new(1, vec![creature(1, "Left", 100, 1, 200, 10)]);
    let mut second = Team::new(2, vec![creature(2, "Right", 100, 1, 200, 5)]);
    second.name = first.name.clone();
    let rules = CombatRules { turn_ceiling: 3, ..CombatRules::default() };
    let out = resolve_match(&mut first, &mut second, &mut Dice::from_seed(1), &rules);
    assert_eq!(out.winner, Side::Second);
    assert_eq!(out.summary.winner.0, 2);
    assert_eq!(out.summary.winner_record().id.0, 2);
    assert_eq!(out.summary.winner_record().members[0].name, "Right");
}

#[test]
fn battle_state_machine_transitions() {
    let (mut first, mut second) = duel_teams();
    let rules = CombatRules::default();
    let mut dice = Dice::from_scripted(vec![0, 0, 99, 99, 0, 0, 5]);
    let mut battle = Battle::new(&mut first, &mut second, &rules);
    assert_eq!(battle.state(), BattleState::AwaitingTurn);
    assert_eq!(battle.step(&mut dice), BattleState::TurnResolved);
    assert_eq!(battle.events().len(), 2);
    assert_eq!(battle.step(&mut dice), BattleState::TurnResolved);
    assert_eq!(battle.step(&mut dice), BattleState::MatchOver);
    assert_eq!(battle.step(&mut dice), BattleState::MatchOver);
    assert_eq!(battle.exchanges(), 2);
    assert!(!battle.team(Side::Second).has_living());
    let out = battle.finish();
    assert_eq!(out.winner, Side::First);
}

fn stat_block() -> impl Strategy<Value = (u32, u32, u32, u32)> {
    (1u32..200, 0u32..150, 0u32..150, 0u32..100)
}

fn roster(first_id: u32) -> impl Strategy<Value = Vec<CreatureRecord>> {
    prop::collection::vec(stat_block(), 1..=6).prop_map(move |stats| {
        stats
            .into_iter()
            .enumerate()
            .map(|(i, (hp, attack, defense, speed))| {
                let id = first_id + i as u32;
                creature(id, &format!("c{id}"), hp, attack, defense, speed)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn every_match_ends_by_knockout_with_one_winner(
        a in roster(1),
        b in roster(100),
        seed in any::<u64>(),
    ) {
        let mut first = Team::new(1, a);
        let mut second = Team::new(2, b);
        let rules = CombatRules::default();
        let out = resolve_match(&mut first, &mut second, &mut Dice::from_seed(seed), &rules);

        // Every exchange deals at least one point, so total health bounds the length.
        prop_assert!(out.exchanges < rules.turn_ceiling);
        prop_assert_eq!(out.decided_by, Decision::Knockout);

        let (winner, loser, loser_record) = match out.winner {
            Side::First => (&first, &second, &out.summary.team2),
            Side::Second => (&second, &first, &out.summary.team1),
        };
        prop_assert!(winner.members.iter().all(|m| m.health.is_full()));
        prop_assert!(!loser.has_living());
        for (m, rec) in loser.members.iter().zip(&loser_record.members) {
            prop_assert!(rec.ending_hp <= m.creature.stats.hp);
            prop_assert_eq!(rec.ending_hp, 0);
        }
    }

    #[test]
    fn downed_members_never_fight_again(
        a in roster(1),
        b in roster(100),
        seed in any::<u64>(),
    ) {
        let mut first = Team::new(1, a);
        let mut second = Team::new(2, b);
        let mut hp: HashMap<(Side, usize), u32> = HashMap::new();
        for (i, m) in first.members.iter().enumerate() {
            hp.insert((Side::First, i), m.current_hp());
        }
        for (i, m) in second.members.iter().enumerate() {
            hp.insert((Side::Second, i), m.current_hp());
        }

        let out = resolve_match(&mut first, &mut second, &mut Dice::from_seed(seed), &CombatRules::default());

        for event in out.events() {
            match event {
                BattleEvent::Attack(s) | BattleEvent::Counter(s) => {
                    prop_assert!(s.damage >= 1);
                    prop_assert!(hp[&(s.attacker.side, s.attacker.slot)] > 0);
                    let target = hp.get_mut(&(s.defender.side, s.defender.slot)).unwrap();
                    prop_assert!(*target > 0);
                    *target = target.saturating_sub(s.damage);
                }
                BattleEvent::KnockOut { creature, remaining_hp } => {
                    prop_assert_eq!(*remaining_hp, 0);
                    prop_assert_eq!(hp[&(creature.side, creature.slot)], 0);
                }
            }
        }
    }

    #[test]
    fn damage_is_never_below_one(
        attack in any::<u32>(),
        defense in any::<u32>(),
        critical in any::<bool>(),
    ) {
        let dmg = tourney_engine::combat::actions::damage_for(attack, defense, critical, &CombatRules::default());
        prop_assert!(dmg >= 1);
    }
}

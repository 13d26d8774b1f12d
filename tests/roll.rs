use critdice::{
    DiceRoller, KnowledgeBase, RandomDice, RollConfig, RollError, ScriptedDice, describe, roll,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const TRIALS: usize = 30;

#[test]
fn test_arithmetic_is_deterministic() {
    assert_eq!(roll("1+1"), Ok((2, vec![])));
    assert_eq!(roll("1+2*3"), Ok((7, vec![])));
    assert_eq!(roll("(1+2)*3"), Ok((9, vec![])));
    assert_eq!(roll("10 minus 2 minus 3"), Ok((5, vec![])));
}

#[test]
fn test_describe() {
    assert_eq!(describe(&[]), "");
    assert_eq!(describe(&[17]), "");
    assert!(describe(&[1, 2]).contains("1 and 2"));
    assert!(describe(&[1, 2, 3, 4]).contains("1, 2, 3 and 4"));
}

#[test]
fn test_flat_damage_weapon() {
    assert_eq!(roll("Blowgun"), Ok((1, vec![])));
}

#[test]
fn test_critical_weapon_rolls_twice() {
    for _ in 0..TRIALS {
        let (total, rolls) = roll("critical longsword").unwrap();
        assert_eq!(rolls.len(), 2);
        assert_eq!(total, rolls.iter().sum::<i64>());
        assert!(rolls.iter().all(|r| (1..=8).contains(r)));
    }
}

#[test]
fn test_advantage_keeps_the_best() {
    for _ in 0..TRIALS {
        let (total, rolls) = roll("to hit with advantage").unwrap();
        assert_eq!(rolls.len(), 2);
        assert_eq!(total, rolls[0].max(rolls[1]));
    }
}

#[test]
fn test_disadvantage_keeps_the_worst() {
    for _ in 0..TRIALS {
        let (total, rolls) = roll("to hit with disadvantage").unwrap();
        assert_eq!(rolls.len(), 2);
        assert_eq!(total, rolls[0].min(rolls[1]));
    }
}

#[test]
fn test_spell_at_base_level() {
    for _ in 0..TRIALS {
        let (total, rolls) = roll("Magic Missile").unwrap();
        assert_eq!(rolls.len(), 1);
        assert!((2..=5).contains(&total), "{}", total);
    }
}

#[test]
fn test_spell_at_named_base_level() {
    assert_eq!(
        roll("magic missile at level 1"),
        Err(RollError::ImpossibleSpell(
            "Sorry, I couldn't determine the additional damage dice for Magic Missile".to_string()
        ))
    );
    for _ in 0..TRIALS {
        let (total, rolls) = roll("fireball at level 3").unwrap();
        assert_eq!(rolls.len(), 8);
        assert!((8..=48).contains(&total), "{}", total);
    }
}

#[test]
fn test_spell_above_base_level() {
    for _ in 0..TRIALS {
        let (total, rolls) = roll("disintegrate at 7th level").unwrap();
        assert_eq!(rolls.len(), 13);
        assert!((53..=118).contains(&total), "{}", total);
    }
}

#[test]
fn test_scaling_dice_count() {
    for _ in 0..TRIALS {
        let (total, rolls) = roll("burning hands at level 4").unwrap();
        assert_eq!(rolls.len(), 6);
        assert!((6..=36).contains(&total), "{}", total);
    }
}

#[test]
fn test_error_kinds() {
    assert!(matches!(roll("fireball at level 1"), Err(RollError::ImpossibleSpell(_))));
    assert!(matches!(roll("light"), Err(RollError::ImpossibleSpell(_))));
    assert!(matches!(roll("gibberish"), Err(RollError::Recognition(_))));
    assert_eq!(
        roll("0d6"),
        Err(RollError::ImpossibleDice("Sorry, I couldn't roll 0 dice.".to_string()))
    );
    assert_eq!(
        roll("2d0"),
        Err(RollError::ImpossibleDice(
            "Sorry, I couldn't roll a 0 sided die.".to_string()
        ))
    );
    assert!(matches!(roll("(1-2)d6"), Err(RollError::ImpossibleDice(_))));
}

#[test]
fn test_default_limits() {
    assert!(matches!(roll("fireball at level 21"), Err(RollError::ImpossibleSpell(_))));
    assert!(matches!(roll("10001d2"), Err(RollError::ImpossibleDice(_))));
}

#[test]
fn test_relaxed_limits() {
    let config = RollConfig {
        dice_count_limit: 20_000,
        spell_level_limit: 30,
        ..RollConfig::default()
    };
    let roller = DiceRoller::with_config(KnowledgeBase::builtin().unwrap(), config);
    assert_eq!(roller.roll("10001d2").unwrap().rolls.len(), 10_001);
    assert_eq!(roller.roll("fireball at level 21").unwrap().rolls.len(), 26);
}

#[test]
fn test_oversized_requests_fail_cleanly() {
    for spec in [
        format!("{}1{}", "(".repeat(1000), ")".repeat(1000)),
        vec!["1"; 20_000].join("+"),
        format!("{}6", "d".repeat(2000)),
    ] {
        assert!(matches!(roll(&spec), Err(RollError::Recognition(_))));
    }
    assert_eq!(roll(&vec!["1"; 1000].join("+")), Ok((1000, vec![])));
}

#[test]
fn test_die_with_rolled_sides() {
    let roller = DiceRoller::new(KnowledgeBase::builtin().unwrap());
    // A d6 picks the side count, then that die is rolled
    let outcome = roller.roll_with("d d6", ScriptedDice::new([4, 3])).unwrap();
    assert_eq!(outcome.rolls, vec![4, 3]);
    assert_eq!(outcome.total, 3);
    let outcome = roller.roll_with("d coin", ScriptedDice::new([2, 1])).unwrap();
    assert_eq!(outcome.rolls, vec![2, 1]);
    assert_eq!(outcome.total, 1);
}

#[test]
fn test_runaway_advantage_is_impossible() {
    let mut spec = "d20".to_string();
    for _ in 0..12 {
        spec = format!("({})d20 with advantage", spec);
    }
    assert!(matches!(roll(&spec), Err(RollError::ImpossibleDice(_))));
}

#[test]
fn test_errors_are_unfulfillable() {
    for spec in ["fireball at level 1", "gibberish", "0d6"] {
        let err = roll(spec).unwrap_err();
        assert!(err.is_unfulfillable(), "{}", spec);
        assert!(err.to_string().starts_with("Sorry"), "{}", err);
    }
}

#[test]
fn test_rolls_are_recorded_in_order() {
    let roller = DiceRoller::new(KnowledgeBase::builtin().unwrap());
    let outcome = roller
        .roll_with("d4 + 1 + d20 + d4", ScriptedDice::new([3, 15, 2]))
        .unwrap();
    assert_eq!(outcome.rolls, vec![3, 15, 2]);
    assert_eq!(outcome.total, 21);
    assert_eq!(outcome.narration(), "You rolled a total of 21 from 3, 15 and 2");
}

#[test]
fn test_seeded_rolls_repeat() {
    let roller = DiceRoller::new(KnowledgeBase::builtin().unwrap());
    let first = roller
        .roll_with("8d6 + 4d8", RandomDice::from_rng(StdRng::seed_from_u64(3)))
        .unwrap();
    let second = roller
        .roll_with("8d6 + 4d8", RandomDice::from_rng(StdRng::seed_from_u64(3)))
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(first.rolls.len(), 12);
}

use critdice::config::RollConfig;
use critdice::error::RollError;
use critdice::grammar::Grammar;
use critdice::knowledge::KnowledgeBase;
use critdice::runtime::DiceRoller;
use critdice::transform::*;
use critdice::types::expr::*;

fn dice(count: i64, sides: i64) -> Expr {
    Expr::roll_n(Expr::literal(count), Expr::literal(sides))
}

fn roller() -> DiceRoller {
    DiceRoller::new(KnowledgeBase::builtin().unwrap())
}

fn compile(text: &str) -> Result<Expr, RollError> {
    roller().compile(text)
}

#[test]
fn test_passes_run_by_hand() {
    let knowledge = KnowledgeBase::builtin().unwrap();
    let grammar = Grammar::new(&knowledge);
    let config = RollConfig::default();

    let expr = grammar.parse("critical club plus 2").unwrap();
    let expr = normalize_numbers(expr, &knowledge).unwrap();
    assert_eq!(
        expr,
        Expr::add(Expr::critical(Expr::weapon("club")), Expr::literal(2))
    );
    let expr = resolve_knowledge(expr, &grammar, &knowledge, &config).unwrap();
    assert_eq!(expr, Expr::add(Expr::critical(dice(1, 4)), Expr::literal(2)));
    let expr = rewrite_critical(simplify(expr).unwrap()).unwrap();
    assert_eq!(expr, Expr::add(dice(2, 4), Expr::literal(2)));
}

#[test]
fn test_weapon_resolution() {
    assert_eq!(compile("Club").unwrap(), dice(1, 4));
    assert_eq!(compile("cLuB").unwrap(), dice(1, 4));
    assert_eq!(compile("Blowgun").unwrap(), Expr::literal(1));
}

#[test]
fn test_spell_resolution() {
    assert_eq!(compile("fireball").unwrap(), dice(8, 6));
    assert_eq!(compile("fireball at level 3").unwrap(), dice(8, 6));
    assert_eq!(compile("fireball at level 5").unwrap(), dice(10, 6));
    assert_eq!(compile("level 5 fireball").unwrap(), dice(10, 6));
    assert_eq!(
        compile("disintegrate at 7th level").unwrap(),
        Expr::add(Expr::add(dice(10, 6), Expr::literal(40)), dice(3, 6))
    );
}

#[test]
fn test_spell_dice_come_from_the_first_match() {
    // "2d8 bludgeoning damage and 4d6 cold damage"
    assert_eq!(compile("ice storm").unwrap(), dice(2, 8));
    assert_eq!(compile("ice storm at level 6").unwrap(), dice(4, 8));
}

#[test]
fn test_named_base_level_needs_scaling_dice() {
    assert!(matches!(
        compile("magic missile at level 1"),
        Err(RollError::ImpossibleSpell(_))
    ));
    assert!(compile("magic missile").is_ok());
}

#[test]
fn test_spell_below_its_level() {
    assert_eq!(
        compile("fireball at level 1"),
        Err(RollError::ImpossibleSpell(
            "Sorry, Fireball is level 3, so I can't cast it at level 1".to_string()
        ))
    );
}

#[test]
fn test_same_sided_dice_merge_after_expansion() {
    assert_eq!(compile("club plus dagger").unwrap(), dice(2, 4));
    assert_eq!(compile("d6 + d6 + 2d6").unwrap(), dice(4, 6));
    assert_eq!(
        compile("3d4 + 2d6").unwrap(),
        Expr::add(dice(3, 4), dice(2, 6))
    );
}

#[test]
fn test_critical_doubles_expanded_dice() {
    assert_eq!(compile("critical longsword").unwrap(), dice(2, 8));
    assert_eq!(compile("critical greatsword").unwrap(), dice(4, 6));
    assert_eq!(
        compile("critical magic missile").unwrap(),
        Expr::add(dice(2, 4), Expr::literal(1))
    );
    assert_eq!(compile("critical fireball at level 4").unwrap(), dice(18, 6));
}

#[test]
fn test_critical_dice_merge_with_neighbours() {
    // 2d8 from the critical hit, then one more d8
    assert_eq!(compile("critical longsword plus d8").unwrap(), dice(3, 8));
}

#[test]
fn test_advantage_duplicates_rolls() {
    let best = Expr::binary(dice(1, 20), BinOp::Max, dice(1, 20));
    assert_eq!(compile("to hit with advantage").unwrap(), best);
    assert_eq!(
        compile("2d6 with disadvantage plus 3").unwrap(),
        Expr::add(
            Expr::binary(dice(2, 6), BinOp::Min, dice(2, 6)),
            Expr::literal(3)
        )
    );
}

#[test]
fn test_named_dice_become_dice() {
    assert_eq!(compile("coin").unwrap(), dice(1, 2));
    assert_eq!(compile("3 cube").unwrap(), dice(3, 6));
    assert_eq!(compile("2 icosahedron").unwrap(), dice(2, 20));
}

#[test]
fn test_arithmetic_survives_untouched() {
    assert_eq!(
        compile("(1 + 2) * 3").unwrap(),
        Expr::binary(
            Expr::add(Expr::literal(1), Expr::literal(2)),
            BinOp::Mul,
            Expr::literal(3)
        )
    );
}

#[test]
fn test_spell_level_limit() {
    let config = RollConfig {
        spell_level_limit: 5,
        ..RollConfig::default()
    };
    let roller = DiceRoller::with_config(KnowledgeBase::builtin().unwrap(), config);
    assert!(roller.compile("fireball at level 5").is_ok());
    assert!(matches!(
        roller.compile("fireball at level 6"),
        Err(RollError::ImpossibleSpell(_))
    ));
}

#[test]
fn test_dice_with_rolled_sides() {
    assert_eq!(compile("d d6").unwrap(), Expr::roll_n(Expr::literal(1), dice(1, 6)));
    assert_eq!(compile("d coin").unwrap().to_string(), "1d(1d2)");
}

#[test]
fn test_compiled_trees_print_compactly() {
    assert_eq!(compile("critical fireball").unwrap().to_string(), "16d6");
    assert_eq!(compile("2d6 with advantage + 1").unwrap().to_string(), "max(2d6,2d6)+1");
}

//! End-to-end scenarios: parse a full recipe, run it, check stdout bytes.
//!
//! Mirrors the concrete source-to-output fixtures used to validate the
//! language's semantics rather than unit-level behavior already covered
//! inside each module.

use chef::error::{ContainerKind, RuntimeErrorKind};
use chef::evaluator::{EvalOptions, Evaluator};
use chef::shuffle::FixedShuffler;
use indoc::indoc;

fn run(source: &str) -> Vec<u8> {
    let recipe = chef::parse(source).expect("valid recipe");
    let mut evaluator = Evaluator::new(&recipe);
    let mut output = Vec::new();
    evaluator
        .run(&mut std::io::empty(), &mut output)
        .expect("valid program");
    output
}

#[test]
fn s1_emits_a_literal_character_via_a_liquid_value() {
    let source = indoc! {"
        Water.

        Ingredients.
        111 ml water

        Method.
        Put water into mixing bowl.
        Pour contents of the mixing bowl into the baking dish.

        Serves 1.
    "};
    assert_eq!(run(source), b"o");
}

#[test]
fn s2_dry_value_prints_as_decimal() {
    let source = indoc! {"
        Salt.

        Ingredients.
        42 g salt

        Method.
        Put salt into mixing bowl.
        Pour contents of the mixing bowl into the baking dish.

        Serves 1.
    "};
    assert_eq!(run(source), b"42");
}

#[test]
fn s3_arithmetic_retains_the_operand_flags() {
    let source = indoc! {"
        Stew.

        Ingredients.
        300 g cherries
        50 g meat

        Method.
        Put cherries into mixing bowl.
        Add meat.
        Pour contents of the mixing bowl into the baking dish.

        Serves 1.
    "};
    // 300 + 50 = 350, printed as the three decimal bytes '3','5','0'.
    assert_eq!(run(source), b"350");
}

#[test]
fn s4_stir_ingredient_rotates_by_value() {
    let source = indoc! {"
        Stones.

        Ingredients.
        2 sticks
        10 stones
        20 skin
        30 bones

        Method.
        Put stones into mixing bowl.
        Put skin into mixing bowl.
        Put bones into mixing bowl.
        Stir sticks into the mixing bowl.
        Pour contents of the mixing bowl into the baking dish.

        Serves 1.
    "};
    // Before stir: [stones, skin, bones] (bones on top).
    // stir(2) rolls the top down 2 places: [bones, stones, skin].
    // Pour preserves that order; Serves drains top-first: skin, stones, bones.
    assert_eq!(run(source), b"201030");
}

#[test]
fn s5_counted_loop_iterates_exactly_the_initial_count() {
    let source = indoc! {"
        Counting.

        Ingredients.
        3 number

        Method.
        Count the number.
        Put number into mixing bowl.
        Crush the number until counted.
        Pour contents of the mixing bowl into the baking dish.

        Serves 1.
    "};
    // number starts at 3 and the body (one push) runs once per pass until
    // the post-body decrement reaches 0: three pushes of the same value.
    assert_eq!(run(source), b"333");
}

#[test]
fn s6_serves_drains_dishes_top_first() {
    let source = indoc! {"
        Magic.

        Ingredients.
        97 ml water
        23 g salt
        55000 ml magic

        Method.
        Put water into mixing bowl.
        Put salt into mixing bowl.
        Put magic into mixing bowl.
        Pour contents of the mixing bowl into the baking dish.

        Serves 1.
    "};
    let output = run(source);
    let text = String::from_utf8(output).expect("valid utf-8");
    assert_eq!(text, "\u{d6d8}23a");
}

#[test]
fn boundary_stir_past_length_moves_top_to_front() {
    let source = indoc! {"
        Rotate.

        Ingredients.
        99 n
        1 a
        2 b

        Method.
        Put a into mixing bowl.
        Put b into mixing bowl.
        Stir n into the mixing bowl.
        Pour contents of the mixing bowl into the baking dish.

        Serves 1.
    "};
    // n = 99 far exceeds the bowl's length; top (b) goes all the way to the
    // front: [b, a]. Serves drains top-first: a, then b.
    assert_eq!(run(source), b"12");
}

#[test]
fn boundary_put_to_one_past_the_count_creates_a_bowl() {
    let source = indoc! {"
        Grow.

        Ingredients.
        7 a

        Method.
        Put a into the 2nd mixing bowl.
        Pour contents of the 2nd mixing bowl into the baking dish.

        Serves 1.
    "};
    assert_eq!(run(source), b"7");
}

#[test]
fn boundary_put_two_past_the_count_is_an_invalid_container_id() {
    let source = indoc! {"
        NoGrow.

        Ingredients.
        7 a

        Method.
        Put a into the 3rd mixing bowl.
    "};
    let recipe = chef::parse(source).expect("valid recipe");
    let mut evaluator = Evaluator::new(&recipe);
    let mut output = Vec::new();
    let err = evaluator
        .run(&mut std::io::empty(), &mut output)
        .unwrap_err();
    assert_eq!(
        err.kind,
        RuntimeErrorKind::InvalidContainerId {
            kind: ContainerKind::MixingBowl,
            id: 3,
        }
    );
}

#[test]
fn boundary_take_rejects_non_integer_input() {
    let source = indoc! {"
        Prompt.

        Ingredients.
        0 n

        Method.
        Take n from refrigerator.
    "};
    let recipe = chef::parse(source).expect("valid recipe");
    let mut evaluator = Evaluator::new(&recipe);
    let mut input: &[u8] = b"not a number\n";
    let mut output = Vec::new();
    let err = evaluator.run(&mut input, &mut output).unwrap_err();
    assert_eq!(
        err.kind,
        RuntimeErrorKind::InvalidInput {
            input: "not a number".to_string()
        }
    );
}

#[test]
fn boundary_repeated_ingredient_declaration_keeps_the_later_value() {
    let source = indoc! {"
        Redeclare.

        Ingredients.
        1 sugar
        2 sugar

        Method.
        Put sugar into mixing bowl.
        Pour contents of the mixing bowl into the baking dish.

        Serves 1.
    "};
    assert_eq!(run(source), b"2");
}

#[test]
fn mix_with_a_fixed_permutation_is_deterministic() {
    let source = indoc! {"
        Shuffle.

        Ingredients.
        1 a
        2 b
        3 c

        Method.
        Put a into mixing bowl.
        Put b into mixing bowl.
        Put c into mixing bowl.
        Mix the mixing bowl well.
        Pour contents of the mixing bowl into the baking dish.

        Serves 1.
    "};
    let recipe = chef::parse(source).expect("valid recipe");
    let mut evaluator = Evaluator::with_options(
        &recipe,
        EvalOptions {
            shuffler: Box::new(FixedShuffler::new(vec![2, 0, 1])),
        },
    );
    let mut output = Vec::new();
    evaluator
        .run(&mut std::io::empty(), &mut output)
        .expect("valid program");
    // permutation [2,0,1] reorders [a,b,c] to [c,a,b]; Serves drains
    // top-first, so b prints first, then a, then c.
    assert_eq!(output, b"213");
}

#[test]
fn missing_loop_end_is_a_runtime_error() {
    let source = indoc! {"
        Broken.

        Ingredients.
        1 number

        Method.
        Count the number.
        Clean mixing bowl.
    "};
    let recipe = chef::parse(source).expect("valid recipe");
    let mut evaluator = Evaluator::new(&recipe);
    let mut output = Vec::new();
    let err = evaluator
        .run(&mut std::io::empty(), &mut output)
        .unwrap_err();
    assert_eq!(
        err.kind,
        RuntimeErrorKind::MissingLoopEnd {
            verb: "Count".to_string()
        }
    );
}

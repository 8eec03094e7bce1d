use guesswork::{Match, MatchPattern, Scorer, ScoringConfig};

fn pinned_scorer(exclude_additive: bool) -> Scorer {
    Scorer::new(ScoringConfig {
        reference_year: 2024,
        exclude_additive,
    })
}

fn candidate_matches() -> Vec<Match> {
    vec![
        Match::new(
            0,
            5,
            "zxcvbn",
            MatchPattern::Dictionary {
                rank: 1,
                reversed: false,
                l33t: false,
                sub: Default::default(),
            },
        ),
        Match::new(6, 8, "123", MatchPattern::Sequence { ascending: true }),
    ]
}

#[test]
fn repeated_runs_produce_identical_results() {
    let scorer = pinned_scorer(false);

    let first = scorer
        .most_guessable_match_sequence("zxcvbn123", candidate_matches())
        .expect("first run");
    let second = scorer
        .most_guessable_match_sequence("zxcvbn123", candidate_matches())
        .expect("second run");
    let third = scorer
        .most_guessable_match_sequence("zxcvbn123", candidate_matches())
        .expect("third run");

    assert_eq!(first.guesses, second.guesses);
    assert_eq!(second.guesses, third.guesses);
    assert_eq!(first.sequence, second.sequence);
    assert_eq!(second.sequence, third.sequence);
}

#[test]
fn separate_scorers_with_same_config_agree() {
    let a = pinned_scorer(false)
        .most_guessable_match_sequence("zxcvbn123", candidate_matches())
        .expect("scorer a");
    let b = pinned_scorer(false)
        .most_guessable_match_sequence("zxcvbn123", candidate_matches())
        .expect("scorer b");
    assert_eq!(a.guesses, b.guesses);
    assert_eq!(a.guesses_log10, b.guesses_log10);
}

#[test]
fn estimate_guesses_is_memoized_and_stable() {
    let scorer = pinned_scorer(false);
    let mut m = candidate_matches().remove(0);

    let first = scorer.estimate_guesses(&mut m, 9).expect("first estimate");
    let slots = (
        m.guesses,
        m.guesses_log10,
        m.base_guesses,
        m.uppercase_variations,
        m.l33t_variations,
    );
    let second = scorer.estimate_guesses(&mut m, 9).expect("second estimate");

    assert_eq!(first, second);
    assert_eq!(
        slots,
        (
            m.guesses,
            m.guesses_log10,
            m.base_guesses,
            m.uppercase_variations,
            m.l33t_variations,
        )
    );
}

#[test]
fn guesses_log10_is_consistent_everywhere() {
    let result = pinned_scorer(false)
        .most_guessable_match_sequence("zxcvbn123", candidate_matches())
        .expect("scoring succeeds");

    assert!((result.guesses_log10 - result.guesses.log10()).abs() < 1e-9);
    for m in &result.sequence {
        let guesses = m.guesses.expect("estimated");
        let log10 = m.guesses_log10.expect("estimated");
        assert!((log10 - guesses.log10()).abs() < 1e-9);
    }
}

#[test]
fn exclude_additive_leaves_exact_factorial_product() {
    let result = pinned_scorer(true)
        .most_guessable_match_sequence("zxcvbn123", candidate_matches())
        .expect("scoring succeeds");

    // recompute l! * product from the selected cover
    let l = result.sequence.len();
    let factorial: f64 = (1..=l).map(|i| i as f64).product();
    let product: f64 = result
        .sequence
        .iter()
        .map(|m| m.guesses.expect("estimated"))
        .product();
    assert_eq!(result.guesses, factorial * product);
}

#[test]
fn additive_term_only_adds_the_length_penalty() {
    let with_additive = pinned_scorer(false)
        .most_guessable_match_sequence("zxcvbn123", candidate_matches())
        .expect("with additive");
    let without_additive = pinned_scorer(true)
        .most_guessable_match_sequence("zxcvbn123", candidate_matches())
        .expect("without additive");

    assert!(with_additive.guesses > without_additive.guesses);
    // both select the two-match cover: the delta is 10000^(2-1)
    assert_eq!(
        with_additive.guesses - without_additive.guesses,
        10_000.0
    );
}

#[test]
fn input_mutation_is_confined_to_output_slots() {
    let scorer = pinned_scorer(false);
    let mut m = candidate_matches().remove(0);
    let original = m.clone();
    scorer.estimate_guesses(&mut m, 9).expect("estimate");

    assert_eq!(m.i, original.i);
    assert_eq!(m.j, original.j);
    assert_eq!(m.token, original.token);
    assert_eq!(m.pattern, original.pattern);
    assert!(m.guesses.is_some());
}

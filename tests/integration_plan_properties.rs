// Property-style checks over many seeds: plan shape, choice lists and
// minute domains hold for every tier of the built-in table.

use std::collections::HashSet;

use clockquest::clock::{ClockTime, Meridiem, TimeFormat};
use clockquest::difficulty::Difficulty;
use clockquest::quest::{allocate_counts, QuestPlanner};
use clockquest::question::{generate_choices, Question, QuestionMode, CHOICE_COUNT};
use clockquest::tiers::TierConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn every_tier_builds_well_formed_plans() {
    let tiers = TierConfig::default();
    for tier in &tiers.tiers {
        let planner = QuestPlanner::for_tier(tier);
        for seed in 0..25u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = planner.build(10, &mut rng);

            assert_eq!(plan.len(), 10, "tier {}", tier.name);
            assert!(plan.count_mode(QuestionMode::Read) >= 1);
            assert!(plan.count_mode(QuestionMode::Set) >= 1);

            let times: Vec<ClockTime> = plan.iter().map(|p| p.question.time()).collect();
            for pair in times.windows(2) {
                assert_ne!(pair[0], pair[1], "tier {} seed {seed}", tier.name);
            }

            for planned in &plan {
                assert!(tier.quest_run_mix.contains_key(&planned.difficulty));
                match &planned.question {
                    Question::Read(q) => {
                        assert_eq!(q.choices.len(), CHOICE_COUNT);
                        let unique: HashSet<&String> = q.choices.iter().collect();
                        assert_eq!(unique.len(), CHOICE_COUNT);
                        assert_eq!(
                            q.choices.iter().filter(|c| **c == q.correct_answer).count(),
                            1
                        );
                    }
                    Question::Set(q) => {
                        assert_ne!(q.start, q.target);
                    }
                }
            }
        }
    }
}

#[test]
fn counts_always_add_up() {
    let tiers = TierConfig::default();
    for tier in &tiers.tiers {
        for total in 0..30usize {
            let counts = allocate_counts(&tier.quest_run_mix, total);
            assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), total);
            for (difficulty, n) in counts {
                assert!(*tier.quest_run_mix.get(&difficulty).unwrap_or(&0.0) > 0.0);
                assert!(n > 0);
            }
        }
    }
}

#[test]
fn hour_questions_sit_on_the_hour() {
    let mut rng = StdRng::seed_from_u64(99);
    let tiers = TierConfig::default();
    let plan = QuestPlanner::for_tier(tiers.tier(0)).build(20, &mut rng);
    assert!(plan.iter().all(|p| p.question.time().minutes == 0));
}

#[test]
fn choices_stay_unique_for_every_difficulty() {
    let mut rng = StdRng::seed_from_u64(2024);
    for difficulty in Difficulty::ALL {
        for hours in 1..=12u32 {
            let correct = ClockTime::new(hours, 0);
            let choices = generate_choices(
                correct,
                difficulty,
                CHOICE_COUNT,
                TimeFormat::WordsPastTo,
                Meridiem::Pm,
                &mut rng,
            );
            let unique: HashSet<&String> = choices.iter().collect();
            assert_eq!(unique.len(), CHOICE_COUNT, "{difficulty} at {correct}");
            assert!(choices.contains(&TimeFormat::WordsPastTo.render(correct, Meridiem::Pm)));
        }
    }
}

//! Integration tests for a playthrough of the embedded content
//!
//! These tests drive the public reducers the way the terminal client does:
//! - Choices and tasks granting XP and crossing level thresholds
//! - Skip charges bypassing a task with a tagged placeholder deliverable
//! - Chapter events drawn once per chapter and resolved once
//! - Undo restoring snapshots in order
//! - Mistake replay and the interview duel with local fallbacks

use ai_pm_sim::content::Catalog;
use ai_pm_sim::core::error::{SimError, SkipDenied};
use ai_pm_sim::game::{Game, UndoOutcome};
use ai_pm_sim::ledger::{MistakeKind, ReplayStep};
use ai_pm_sim::progression::AchievementId;
use ai_pm_sim::state::{DuelPhase, TaskStatus};
use ai_pm_sim::storage::MemoryStore;
use ai_pm_sim::tasks::brief::{self, BriefInput};
use ai_pm_sim::GameConfig;

fn new_game() -> Game {
    let config = GameConfig {
        seed: Some(11),
        ..GameConfig::default()
    };
    Game::new(
        Catalog::embedded().unwrap(),
        config,
        Box::new(MemoryStore::new()),
    )
}

fn submit_brief(game: &mut Game) -> ai_pm_sim::game::ActionReport {
    let scene = game.current_scene().cloned().unwrap();
    let input = BriefInput::parse("Compare three rivals on accuracy; pricing; coverage; latency");
    let outcome = brief::submit(&scene, &input).unwrap();
    game.complete_task(outcome).unwrap()
}

// ============================================================================
// Progression
// ============================================================================

/// Two choices and one task: 10 + 10 + 35 = 55, crossing into Associate PM
/// on the third action only.
#[test]
fn test_level_up_on_third_action() {
    let mut game = new_game();
    assert_eq!(game.state().scene_id, "start");

    let first = game.choose_option("begin").unwrap();
    assert_eq!(game.state().xp, 10);
    assert!(first.level_up.is_none());

    let second = game.choose_option("north_star").unwrap();
    assert_eq!(game.state().xp, 20);
    assert!(second.level_up.is_none());
    assert!(!second.mistake);
    assert_eq!(game.state().scene_id, "c1_competitor");
    assert_eq!(
        game.state().flags.task_status("c1_competitor"),
        TaskStatus::Active
    );

    let third = submit_brief(&mut game);
    assert_eq!(game.state().xp, 55);
    assert_eq!(third.xp.map(|g| g.amount), Some(35));
    assert_eq!(third.level_up.as_deref(), Some("Associate PM"));
    assert!(game.state().achievements.has(AchievementId::FirstTask));
    assert_eq!(game.state().powerups.skip_task_charges, 1);
    assert_eq!(game.state().scene_id, "c1_metrics");
}

#[test]
fn test_resubmitting_task_grants_no_more_xp() {
    let mut game = new_game();
    game.go_to_scene("c1_competitor");
    submit_brief(&mut game);
    let xp = game.state().xp;

    game.go_to_scene("c1_competitor");
    let report = submit_brief(&mut game);
    assert!(report.xp.is_none());
    assert_eq!(game.state().xp, xp);
    assert!(game.state().deliverables.contains_key("c1_competitor"));
}

// ============================================================================
// Skip charges
// ============================================================================

#[test]
fn test_skip_consumes_charge_and_tags_deliverable() {
    let mut game = new_game();
    game.go_to_scene("c1_competitor");
    submit_brief(&mut game);
    assert_eq!(game.state().scene_id, "c1_metrics");
    assert!(game.skip_denied().is_none());
    let xp_before = game.state().xp;

    let report = game.skip_task().unwrap();
    assert_eq!(game.state().powerups.skip_task_charges, 0);
    assert_eq!(game.state().xp, xp_before + 15);
    assert!(report.xp.is_some());

    let deliverable = &game.state().deliverables["c1_metrics"];
    assert!(deliverable.is_skipped());
    assert!(deliverable.title.ends_with("(skipped)"));
    assert_eq!(
        game.state().flags.task_status("c1_metrics"),
        TaskStatus::Completed
    );

    // Both chapter 1 tasks are done: the chapter clear grants the lens
    assert!(game.state().achievements.has(AchievementId::ChapterClear(1)));
    assert!(game.state().powerups.insight_lens);
    assert_eq!(game.state().scene_id, "c2_insight");
}

#[test]
fn test_skip_refusals() {
    let mut game = new_game();
    game.go_to_scene("c1_competitor");
    assert!(matches!(
        game.skip_task(),
        Err(SimError::SkipUnavailable(SkipDenied::NoCharges))
    ));

    game.go_to_scene("c2_bottleneck");
    assert!(matches!(
        game.skip_task(),
        Err(SimError::SkipUnavailable(SkipDenied::NotSkippable))
    ));

    game.go_to_scene("c1_kickoff");
    assert_eq!(game.skip_denied(), Some(SkipDenied::NoTask));
    assert!(game.state().nav_stack.is_empty());
}

// ============================================================================
// Chapter events
// ============================================================================

#[test]
fn test_chapter_event_stable_within_chapter() {
    let mut game = new_game();
    game.go_to_scene("c1_kickoff");
    let first = game.active_chapter_event().map(|e| e.id.clone()).unwrap();

    game.go_to_scene("c1_competitor");
    game.go_to_scene("c1_metrics");
    game.go_to_scene("c1_kickoff");
    let again = game.active_chapter_event().map(|e| e.id.clone()).unwrap();
    assert_eq!(first, again);
    assert_eq!(game.ensure_chapter_event(1).unwrap().event_id, first);
}

#[test]
fn test_wrong_event_option_logs_mistake_once_resolved() {
    let mut game = new_game();
    game.go_to_scene("c2_insight");
    let event = game.active_chapter_event().cloned().unwrap();
    let wrong = event.options[1].id.clone();

    let report = game.resolve_chapter_event(&wrong).unwrap();
    assert!(report.mistake);
    assert_eq!(report.xp.map(|g| g.amount), Some(15));
    assert!(game.state().achievements.has(AchievementId::FirstEvent));

    let mistake = &game.state().mistakes.entries()[0];
    assert_eq!(mistake.kind, MistakeKind::Event);
    assert_eq!(mistake.ref_id, event.id);
    assert_eq!(mistake.scene_id, "c2_insight");

    assert!(game.active_chapter_event().is_none());
    assert!(matches!(
        game.resolve_chapter_event(&wrong),
        Err(SimError::NoActiveEvent)
    ));
}

// ============================================================================
// Undo
// ============================================================================

#[test]
fn test_undo_pops_in_order_then_reports_empty() {
    let mut game = new_game();
    game.choose_option("begin").unwrap();
    game.choose_option("north_star").unwrap();
    submit_brief(&mut game);
    assert_eq!(game.state().nav_stack.len(), 3);

    assert_eq!(
        game.go_back_one_step(),
        UndoOutcome::Restored {
            scene_id: "c1_competitor".into()
        }
    );
    assert_eq!(game.state().xp, 20);
    assert!(game.state().deliverables.is_empty());

    assert_eq!(
        game.go_back_one_step(),
        UndoOutcome::Restored {
            scene_id: "c1_kickoff".into()
        }
    );
    assert_eq!(
        game.go_back_one_step(),
        UndoOutcome::Restored {
            scene_id: "start".into()
        }
    );
    assert_eq!(game.state().xp, 0);
    assert_eq!(game.go_back_one_step(), UndoOutcome::Empty);
    assert_eq!(game.state().scene_id, "start");
}

// ============================================================================
// Mistake replay
// ============================================================================

#[test]
fn test_replay_visits_mistake_scenes_and_rewards_completion() {
    let mut game = new_game();
    assert_eq!(game.start_replay(), None);

    game.go_to_scene("c1_kickoff");
    let report = game.choose_option("vanity_dau").unwrap();
    assert!(report.mistake);
    game.go_to_scene("c2_insight");
    game.choose_option("skip_interviews").unwrap();

    assert_eq!(
        game.mistake_replay_scenes(),
        vec!["c2_insight".to_string(), "c1_kickoff".to_string()]
    );

    let hints_before = game.state().powerups.duel_hint_charges;
    assert_eq!(game.start_replay().as_deref(), Some("c2_insight"));
    let (step, _) = game.advance_replay();
    assert_eq!(step, ReplayStep::Next("c1_kickoff".into()));
    assert_eq!(game.state().scene_id, "c1_kickoff");

    let (step, report) = game.advance_replay();
    assert_eq!(step, ReplayStep::Finished);
    assert!(!game.state().replay.active);
    assert!(report
        .unlocked
        .iter()
        .any(|u| u.id == AchievementId::ReplayComplete.to_string()));
    assert_eq!(game.state().powerups.duel_hint_charges, hints_before + 1);
}

// ============================================================================
// Interview duel (offline)
// ============================================================================

#[test]
fn test_duel_low_score_logs_mistake_high_score_does_not() {
    let mut game = new_game();
    game.start_duel();

    assert!(game.begin_duel_question().unwrap().is_none());
    assert_eq!(game.state().duel.phase, DuelPhase::QuestionShown);
    let question_id = game.state().duel.question.as_ref().unwrap().id.clone();

    assert!(game.begin_duel_answer("I would just ship it").unwrap().is_none());
    assert_eq!(game.state().duel.feedback.as_ref().unwrap().score, 1);
    let mistake = &game.state().mistakes.entries()[0];
    assert_eq!(mistake.kind, MistakeKind::Duel);
    assert_eq!(mistake.ref_id, question_id);

    game.begin_duel_question().unwrap();
    game.begin_duel_answer("Use a confidence threshold with a fallback to a human, and collect feedback")
        .unwrap();
    let score = game.state().duel.feedback.as_ref().unwrap().score;
    assert!(score >= 3);
    assert_eq!(game.state().mistakes.len(), 1);

    let report = game.finish_duel().unwrap();
    assert!(report.unlocked.is_empty());
    assert_eq!(game.state().duel.phase, DuelPhase::Finished);
    assert!(!game.state().duel.active);
    assert_eq!(game.state().xp, 10);
}

#[test]
fn test_duel_rejects_out_of_order_steps() {
    let mut game = new_game();
    assert!(matches!(
        game.begin_duel_answer("anything"),
        Err(SimError::DuelState(_))
    ));
    game.start_duel();
    assert!(matches!(game.use_duel_hint(), Err(SimError::DuelState(_))));
    game.begin_duel_question().unwrap();
    assert!(matches!(game.use_duel_hint(), Err(SimError::NoHintCharges)));
    assert!(matches!(
        game.begin_duel_answer("   "),
        Err(SimError::Validation(_))
    ));
}

// ============================================================================
// Summary
// ============================================================================

#[test]
fn test_portfolio_summary_after_chapter_one() {
    let mut game = new_game();
    game.choose_option("begin").unwrap();
    game.choose_option("north_star").unwrap();
    submit_brief(&mut game);
    let text = game.portfolio_summary();
    assert!(text.contains("Level: Associate PM (55 xp)"));
    assert!(text.contains("- First Deliverable"));
    assert!(text.contains("Mistakes logged: 0"));
}

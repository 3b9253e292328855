use chrono::{Duration, NaiveDate};
use habitquest_core::{
    apply_xp, evaluate_achievements, merge_achievements, AchievementKey, Goal, Habit,
    HabitFrequency, StreakCalculator, User,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

fn habit_with_streak(frequency: HabitFrequency, days: i64, ending_days_ago: i64) -> Habit {
    let mut habit = Habit::new("Journal", frequency);
    for offset in 0..days {
        habit.toggle_completion(today() - Duration::days(ending_days_ago + offset));
    }
    habit
}

#[test]
fn empty_state_unlocks_nothing() {
    let unlocked = evaluate_achievements(&User::default(), &[], &[], today());
    assert!(unlocked.is_empty());
}

#[test]
fn evaluation_does_not_mutate_and_repeats_until_merged() {
    let mut user = User::default();
    let habits = vec![habit_with_streak(HabitFrequency::Weekly, 1, 0)];

    let first = evaluate_achievements(&user, &[], &habits, today());
    let second = evaluate_achievements(&user, &[], &habits, today());
    assert_eq!(first, vec![AchievementKey::FirstHabit]);
    assert_eq!(second, first);
    assert!(user.achievements.is_empty());

    merge_achievements(&mut user, &first);
    assert!(evaluate_achievements(&user, &[], &habits, today()).is_empty());
}

#[test]
fn five_goals_unlocks_at_threshold() {
    let user = User::default();
    let four: Vec<Goal> = (0..4).map(|i| Goal::new(format!("goal {i}"), "misc")).collect();
    assert!(!evaluate_achievements(&user, &four, &[], today()).contains(&AchievementKey::FiveGoals));

    let mut five = four;
    five.push(Goal::new("goal 4", "misc"));
    assert_eq!(
        evaluate_achievements(&user, &five, &[], today()),
        vec![AchievementKey::FiveGoals]
    );
}

#[test]
fn perfect_week_needs_a_current_daily_streak_of_seven() {
    let user = User::default();

    let six = habit_with_streak(HabitFrequency::Daily, 6, 0);
    let unlocked = evaluate_achievements(&user, &[], &[six], today());
    assert!(!unlocked.contains(&AchievementKey::PerfectWeek));

    let seven_ending_yesterday = habit_with_streak(HabitFrequency::Daily, 7, 1);
    let unlocked = evaluate_achievements(&user, &[], &[seven_ending_yesterday], today());
    assert!(unlocked.contains(&AchievementKey::PerfectWeek));

    let stale_seven = habit_with_streak(HabitFrequency::Daily, 7, 2);
    let unlocked = evaluate_achievements(&user, &[], &[stale_seven], today());
    assert_eq!(unlocked, vec![AchievementKey::FirstHabit]);

    let weekly_seven = habit_with_streak(HabitFrequency::Weekly, 7, 0);
    let unlocked = evaluate_achievements(&user, &[], &[weekly_seven], today());
    assert!(!unlocked.contains(&AchievementKey::PerfectWeek));
}

#[test]
fn level_five_unlocks_from_xp() {
    let user = apply_xp(User::default(), 400);
    assert_eq!(user.level, 5);
    assert_eq!(
        evaluate_achievements(&user, &[], &[], today()),
        vec![AchievementKey::LevelFive]
    );
}

#[test]
fn held_keys_survive_when_rule_stops_holding() {
    let mut user = User::default();
    let habits = vec![habit_with_streak(HabitFrequency::Daily, 7, 0)];
    let unlocked = evaluate_achievements(&user, &[], &habits, today());
    merge_achievements(&mut user, &unlocked);
    assert!(user.has_achievement(AchievementKey::PerfectWeek));

    let later = today() + Duration::days(10);
    assert_eq!(StreakCalculator::new(later).current_streak(habits[0].completion_days()), 0);
    let unlocked_later = evaluate_achievements(&user, &[], &habits, later);
    merge_achievements(&mut user, &unlocked_later);
    assert!(user.has_achievement(AchievementKey::PerfectWeek));
    assert!(user.has_achievement(AchievementKey::FirstHabit));
}

#[test]
fn streak_examples_from_today() {
    let calc = StreakCalculator::new(today());
    let d = |n: i64| today() - Duration::days(n);
    assert_eq!(calc.current_streak([d(0)]), 1);
    assert_eq!(calc.current_streak([d(0), d(1), d(2)]), 3);
    assert_eq!(calc.current_streak([d(0), d(2)]), 1);
    assert_eq!(calc.current_streak([d(2)]), 0);
}

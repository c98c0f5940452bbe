//! Daily quote and motivational messages.

use chrono::{Datelike, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::habit::Habit;
use crate::{ledger, schedule, streak};

/// Current streak at which a habit is called out by name.
pub const STREAK_CALLOUT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

const QUOTES: [Quote; 14] = [
    Quote { text: "Excellence is not an act, but a habit. We are what we repeatedly do.", author: "Aristotle" },
    Quote { text: "The secret of your future is hidden in your daily routine.", author: "Mike Murdock" },
    Quote { text: "Motivation is what gets you started. Habit is what keeps you going.", author: "Jim Ryun" },
    Quote { text: "Your habits will determine your future.", author: "Jack Canfield" },
    Quote { text: "Successful people are simply those with successful habits.", author: "Brian Tracy" },
    Quote { text: "First we make our habits, then our habits make us.", author: "Charles C. Noble" },
    Quote { text: "Atomic habits are the building blocks of remarkable results.", author: "James Clear" },
    Quote { text: "Discipline is choosing between what you want now and what you want most.", author: "Abraham Lincoln" },
    Quote { text: "Consistency is the foundation of virtue.", author: "Francis Bacon" },
    Quote { text: "The only way to do great work is to love what you do.", author: "Steve Jobs" },
    Quote { text: "It does not matter how slowly you go as long as you do not stop.", author: "Confucius" },
    Quote { text: "Start where you are. Use what you have. Do what you can.", author: "Arthur Ashe" },
    Quote { text: "The future depends on what you do today.", author: "Mahatma Gandhi" },
    Quote { text: "Don't watch the clock; do what it does. Keep going.", author: "Sam Levenson" },
];

const STREAK: [&str; 4] = [
    "You're on fire! {streak} days of {habit} is incredible!",
    "Consistency is key, and you've got it. {streak} days strong!",
    "Keep that momentum! {habit} is becoming part of who you are.",
    "Unstoppable! {streak} days of dedication to {habit}.",
];

const SUCCESS: [&str; 4] = [
    "Great job completing {habit} today!",
    "One step closer to your goals. Well done with {habit}!",
    "You're making it look easy! {habit} done.",
    "That's how it's done. Stay disciplined!",
];

const MISSING: [&str; 4] = [
    "Don't let {habit} slip! You can do this today.",
    "Every day is a new chance to start again with {habit}.",
    "Remember why you started {habit}. You've got this!",
    "Small steps lead to big changes. Try to fit in {habit} today.",
];

const WELCOME: [&str; 4] = [
    "Ready to conquer your goals today?",
    "A new day means new opportunities for progress.",
    "Small habits, big results. Let's get started!",
    "Discipline is the bridge between goals and accomplishment.",
];

/// Quote of the day. The same date always yields the same quote and any
/// fourteen consecutive dates, across year boundaries too, are distinct.
pub fn daily_quote(date: NaiveDate) -> Quote {
    let len = QUOTES.len() as i32;
    QUOTES[date.num_days_from_ce().rem_euclid(len) as usize]
}

/// Message for the start screen.
///
/// Picks, in order: the first habit with a current streak of at least
/// [`STREAK_CALLOUT`], a random habit that is due today and not yet done, or
/// a generic welcome.
pub fn message<'a, I, R>(habits: I, today: NaiveDate, rng: &mut R) -> String
where
    I: IntoIterator<Item = &'a Habit>,
    R: Rng + ?Sized,
{
    let habits: Vec<&Habit> = habits.into_iter().collect();

    let on_streak = habits.iter().find_map(|h| {
        let current = streak::compute(h, today).current;
        (current >= STREAK_CALLOUT).then_some((*h, current))
    });
    if let Some((habit, current)) = on_streak {
        return fill(pick(&STREAK, rng), &habit.name, Some(current));
    }

    let pending: Vec<&Habit> = habits
        .iter()
        .copied()
        .filter(|h| schedule::is_due(h, today) && !ledger::is_completed(h, today))
        .collect();
    if let Some(habit) = pending.choose(rng) {
        return fill(pick(&MISSING, rng), &habit.name, None);
    }

    pick(&WELCOME, rng).to_string()
}

/// Message shown right after `habit` was marked done.
pub fn completion_message<R: Rng + ?Sized>(habit: &Habit, rng: &mut R) -> String {
    fill(pick(&SUCCESS, rng), &habit.name, None)
}

fn pick<'t, R: Rng + ?Sized>(templates: &'t [&'static str], rng: &mut R) -> &'t str {
    templates.choose(rng).copied().unwrap_or_default()
}

fn fill(template: &str, habit: &str, streak: Option<u32>) -> String {
    let message = template.replace("{habit}", habit);
    match streak {
        Some(n) => message.replace("{streak}", &n.to_string()),
        None => message,
    }
}

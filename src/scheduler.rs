//! Turns a meal plan into exactly three calendar reminders.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{CalendarEvent, EventTime};
use crate::meal_plan::{MealPlanObject, MealSlot, MealType};

pub const REMINDER_COUNT: usize = 3;
pub const DAILY_COOKING_RECURRENCE: &str = "FREQ=DAILY;COUNT=3";

const SHOPPING_SUMMARY: &str = "🛒 Grocery Shopping";
const PREP_SUMMARY: &str = "🍳 Meal Prep Session";
const COOKING_SUMMARY: &str = "🧑‍🍳 Daily Cooking Reminder";
const PLACEHOLDER_SUMMARY: &str = "Placeholder Event";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum ReminderTime {
    #[default]
    Morning,
    Evening,
}

impl ReminderTime {
    fn shopping_hour(&self) -> u32 {
        match self {
            ReminderTime::Morning => 9,
            ReminderTime::Evening => 18,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum CookingWindow {
    #[serde(rename = "6-8 PM")]
    #[value(name = "6-8")]
    SixToEight,
    #[default]
    #[serde(rename = "7-9 PM")]
    #[value(name = "7-9")]
    SevenToNine,
    #[serde(rename = "8-10 PM")]
    #[value(name = "8-10")]
    EightToTen,
}

impl CookingWindow {
    pub fn start_hour(&self) -> u32 {
        match self {
            CookingWindow::SixToEight => 18,
            CookingWindow::SevenToNine => 19,
            CookingWindow::EightToTen => 20,
        }
    }
}

/// Stored with the other choices; the three-event schedule does not vary with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum RemindersPerDay {
    #[default]
    #[serde(rename = "1")]
    #[value(name = "1")]
    One,
    #[serde(rename = "2")]
    #[value(name = "2")]
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPreferences {
    pub reminder_time: ReminderTime,
    pub cooking_time_window: CookingWindow,
    pub reminders_per_day: RemindersPerDay,
}

/// Today's wall-clock `hour:minute` in `now`'s zone, as UTC. Falls back to
/// `now` itself when that local time does not exist (DST gap).
fn local_time_today<Z: TimeZone>(now: &DateTime<Z>, hour: u32, minute: u32) -> DateTime<Utc> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .and_then(|time| {
            now.timezone()
                .from_local_datetime(&now.date_naive().and_time(time))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

fn event(
    summary: &str,
    description: String,
    start: DateTime<Utc>,
    length: Duration,
    time_zone: &str,
) -> CalendarEvent {
    CalendarEvent {
        summary: summary.to_string(),
        description,
        start: EventTime {
            date_time: start,
            time_zone: time_zone.to_string(),
        },
        end: EventTime {
            date_time: start + length,
            time_zone: time_zone.to_string(),
        },
        recurrence: None,
    }
}

fn shopping_description(plan: &MealPlanObject) -> Option<String> {
    let lines: Vec<String> = plan
        .grocery_items()
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(category, items)| format!("{}: {}", category, items.join(", ")))
        .collect();
    if lines.is_empty() {
        return None;
    }
    Some(format!(
        "Here's your shopping list for the 3-day meal plan:\n\n{}",
        lines.join("\n")
    ))
}

fn prep_description(plan: &MealPlanObject) -> Option<String> {
    let days: Vec<String> = plan
        .days()
        .into_iter()
        .filter_map(|day| {
            let slot = MealSlot::new(day, MealType::Dinner);
            let steps = plan.cooking_steps(&slot);
            if steps.is_empty() {
                return None;
            }
            let dinner = plan.meal(&slot).unwrap_or_default();
            Some(format!("\n{}: {}\n- {}", day, dinner, steps.join("\n- ")))
        })
        .collect();
    if days.is_empty() {
        return None;
    }
    Some(format!(
        "Time for your main meal prep session for the next 3 days.\n\nHere is the plan:{}",
        days.join("\n")
    ))
}

fn first_dinner(plan: &MealPlanObject) -> &str {
    plan.days()
        .first()
        .and_then(|day| plan.meal(&MealSlot::new(*day, MealType::Dinner)))
        .unwrap_or_default()
}

/// Builds the shopping, prep and daily cooking reminders for `plan`, anchored
/// on the local date of `now`. Always yields three events: a skipped event is
/// replaced by a zero-length placeholder at `now`.
pub fn generate_reminders<Z: TimeZone>(
    plan: &MealPlanObject,
    prefs: &ReminderPreferences,
    now: &DateTime<Z>,
    time_zone: &str,
) -> [CalendarEvent; REMINDER_COUNT] {
    let window_start = prefs.cooking_time_window.start_hour();

    let shopping = shopping_description(plan).map(|description| {
        event(
            SHOPPING_SUMMARY,
            description,
            local_time_today(now, prefs.reminder_time.shopping_hour(), 0),
            Duration::hours(1),
            time_zone,
        )
    });

    let prep = prep_description(plan).map(|description| {
        event(
            PREP_SUMMARY,
            description,
            local_time_today(now, window_start, 0),
            Duration::minutes(90),
            time_zone,
        )
    });

    let cooking = CalendarEvent {
        recurrence: Some(vec![DAILY_COOKING_RECURRENCE.to_string()]),
        ..event(
            COOKING_SUMMARY,
            format!(
                "Time to cook dinner! Your meal for today is: {}. Check the meal prep event for instructions.",
                first_dinner(plan)
            ),
            local_time_today(now, window_start + 1, 30),
            Duration::minutes(30),
            time_zone,
        )
    };

    debug!(
        shopping = shopping.is_some(),
        prep = prep.is_some(),
        "generated reminders"
    );

    let now_utc = now.with_timezone(&Utc);
    let mut events = [shopping, prep, Some(cooking)].into_iter().flatten();
    std::array::from_fn(|_| {
        events.next().unwrap_or_else(|| {
            event(
                PLACEHOLDER_SUMMARY,
                "This is a placeholder to meet the count requirement.".to_string(),
                now_utc,
                Duration::zero(),
                time_zone,
            )
        })
    })
}

/// Reminders for the wall clock of `zone`, labelled with that zone's name, so
/// the event instants and the calendar's display zone always agree.
pub fn generate_reminders_in_zone(
    plan: &MealPlanObject,
    prefs: &ReminderPreferences,
    now: &DateTime<Utc>,
    zone: Tz,
) -> [CalendarEvent; REMINDER_COUNT] {
    generate_reminders(plan, prefs, &now.with_timezone(&zone), zone.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::generate_google_calendar_link;
    use crate::config::AppConfig;
    use crate::meal_plan::tests::sample_plan;
    use chrono::FixedOffset;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 7, 15, 0).unwrap()
    }

    #[test]
    fn test_default_preferences() {
        let prefs = ReminderPreferences::default();
        assert_eq!(prefs.reminder_time, ReminderTime::Morning);
        assert_eq!(prefs.cooking_time_window, CookingWindow::SevenToNine);
        assert_eq!(prefs.reminders_per_day, RemindersPerDay::One);
        let json = serde_json::to_string(&prefs).unwrap();
        assert_eq!(
            json,
            r#"{"reminderTime":"Morning","cookingTimeWindow":"7-9 PM","remindersPerDay":"1"}"#
        );
    }

    #[test]
    fn test_full_plan_yields_three_real_events() {
        let events = generate_reminders(&sample_plan(), &ReminderPreferences::default(), &now(), "UTC");

        assert_eq!(events[0].summary, SHOPPING_SUMMARY);
        assert_eq!(events[0].start.date_time, Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap());
        assert_eq!(events[0].end.date_time, Utc.with_ymd_and_hms(2024, 3, 10, 10, 0, 0).unwrap());
        assert!(events[0].description.contains("Produce: Onion"));
        assert!(events[0].description.contains("Dairy: Paneer"));
        assert!(!events[0].description.contains("Spices"));

        assert_eq!(events[1].summary, PREP_SUMMARY);
        assert_eq!(events[1].start.date_time, Utc.with_ymd_and_hms(2024, 3, 10, 19, 0, 0).unwrap());
        assert_eq!(events[1].end.date_time, Utc.with_ymd_and_hms(2024, 3, 10, 20, 30, 0).unwrap());
        assert!(events[1].description.contains("Day 1: Paneer Butter Masala\n- Cook paneer"));
        assert!(events[1].description.contains("Day 3: Rice\n- Steam rice"));

        assert_eq!(events[2].summary, COOKING_SUMMARY);
        assert_eq!(events[2].start.date_time, Utc.with_ymd_and_hms(2024, 3, 10, 20, 30, 0).unwrap());
        assert_eq!(events[2].end.date_time, Utc.with_ymd_and_hms(2024, 3, 10, 21, 0, 0).unwrap());
        assert_eq!(events[2].recurrence_rule(), Some(DAILY_COOKING_RECURRENCE));
        assert!(events[2].description.contains("Your meal for today is: Paneer Butter Masala."));
        assert!(events.iter().all(|e| e.start.time_zone == "UTC"));
    }

    #[test]
    fn test_evening_shopping_and_window() {
        let prefs = ReminderPreferences {
            reminder_time: ReminderTime::Evening,
            cooking_time_window: CookingWindow::SixToEight,
            reminders_per_day: RemindersPerDay::Two,
        };
        let events = generate_reminders(&sample_plan(), &prefs, &now(), "UTC");
        assert_eq!(events[0].start.date_time, Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap());
        assert_eq!(events[1].start.date_time, Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap());
        assert_eq!(events[2].start.date_time, Utc.with_ymd_and_hms(2024, 3, 10, 19, 30, 0).unwrap());
    }

    #[test]
    fn test_local_zone_is_respected() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let now = ist.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        let events = generate_reminders(&sample_plan(), &ReminderPreferences::default(), &now, "Asia/Kolkata");
        // 09:00 IST is 03:30 UTC
        assert_eq!(events[0].start.date_time, Utc.with_ymd_and_hms(2024, 3, 10, 3, 30, 0).unwrap());
        assert_eq!(events[0].start.time_zone, "Asia/Kolkata");
    }

    #[test]
    fn test_default_config_keeps_hours_and_label_in_step() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let cet = FixedOffset::east_opt(3600).unwrap();
        let now = cet.with_ymd_and_hms(2024, 1, 10, 7, 0, 0).unwrap();

        let events = generate_reminders_in_zone(
            &sample_plan(),
            &ReminderPreferences::default(),
            &now.with_timezone(&Utc),
            config.time_zone,
        );
        assert_eq!(events[0].start.date_time, Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap());
        assert_eq!(events[0].start.time_zone, "UTC");
        let link = generate_google_calendar_link(&events[0]);
        assert!(link.contains("dates=20240110T090000Z%2F20240110T100000Z"));
        assert!(link.contains("ctz=UTC"));
    }

    #[test]
    fn test_configured_zone_anchors_and_labels() {
        let config = AppConfig::from_sources(|_| None, Some("Europe/Berlin".to_string())).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 6, 0, 0).unwrap();

        let events = generate_reminders_in_zone(&sample_plan(), &ReminderPreferences::default(), &now, config.time_zone);
        // 09:00 in Berlin during winter is 08:00 UTC
        assert_eq!(events[0].start.date_time, Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap());
        assert_eq!(events[2].start.date_time, Utc.with_ymd_and_hms(2024, 1, 10, 19, 30, 0).unwrap());
        assert!(events.iter().all(|e| e.start.time_zone == "Europe/Berlin"));
        assert!(generate_google_calendar_link(&events[0]).contains("ctz=Europe%2FBerlin"));
    }

    #[test]
    fn test_empty_groceries_pad_with_placeholder() {
        let mut plan = sample_plan();
        for items in plan.grocery_list.values_mut() {
            items.clear();
        }
        let events = generate_reminders(&plan, &ReminderPreferences::default(), &now(), "UTC");
        assert_eq!(events[0].summary, PREP_SUMMARY);
        assert_eq!(events[1].summary, COOKING_SUMMARY);
        assert_eq!(events[2].summary, PLACEHOLDER_SUMMARY);
        assert_eq!(events[2].start.date_time, now());
        assert_eq!(events[2].start, events[2].end);
    }

    #[test]
    fn test_no_steps_and_no_groceries_still_three_events() {
        let mut plan = sample_plan();
        plan.grocery_list.clear();
        plan.cooking_sequence.clear();
        let events = generate_reminders(&plan, &ReminderPreferences::default(), &now(), "UTC");
        assert_eq!(events.len(), REMINDER_COUNT);
        assert_eq!(events[0].summary, COOKING_SUMMARY);
        assert_eq!(events[1].summary, PLACEHOLDER_SUMMARY);
        assert_eq!(events[2].summary, PLACEHOLDER_SUMMARY);
    }
}

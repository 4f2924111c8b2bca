use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::meal_plan::MealSlot;
use crate::preferences::{CityType, Diet, KitchenSetup, OptimizationOption, Persona, PreferenceForm};
use crate::scheduler::{CookingWindow, ReminderPreferences, ReminderTime, RemindersPerDay};
use crate::session::SubstituteChoice;

const DEFAULT_PLAN_FILE: &str = "cooksy-plan.json";

/// Cooksy - three-day meal plans from what is already in your kitchen
#[derive(Parser, Debug)]
#[command(name = "cooksy", author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a new plan and save it
    Plan(PlanArgs),

    /// Regenerate a saved plan with an optimization goal
    Optimize {
        #[command(flatten)]
        plan: PlanFile,

        #[arg(short, long, value_enum)]
        goal: OptimizationOption,
    },

    /// Replace one meal of a saved plan
    #[command(group(ArgGroup::new("replacement").required(true).args(["meal", "substitute"])))]
    Swap {
        #[command(flatten)]
        plan: PlanFile,

        /// Meal to replace, e.g. "Day 1:Dinner"
        #[arg(short, long)]
        slot: MealSlot,

        /// Name of the new meal
        #[arg(short, long)]
        meal: Option<String>,

        /// Use the plan's suggested substitute (1 = prep-light, 2 = easy fallback)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
        substitute: Option<u8>,
    },

    /// Exchange two meals of a saved plan and rebalance it
    Move {
        #[command(flatten)]
        plan: PlanFile,

        #[arg(long)]
        from: MealSlot,

        #[arg(long)]
        to: MealSlot,
    },

    /// Print calendar reminders for a saved plan
    Schedule(ScheduleArgs),

    /// Print the grocery list of a saved plan
    Grocery {
        #[command(flatten)]
        plan: PlanFile,

        /// Also write the list as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Suggest a zero-waste recipe from leftover pantry items
    Recipe {
        /// Comma-separated pantry items
        #[arg(short, long)]
        pantry: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PlanFile {
    /// Saved plan file
    #[arg(long = "plan", default_value = DEFAULT_PLAN_FILE)]
    pub path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Prefill budget, time and kitchen from a persona
    #[arg(long, value_enum)]
    pub persona: Option<Persona>,

    #[arg(long, value_enum)]
    pub city: Option<CityType>,

    #[arg(long, value_enum)]
    pub diet: Option<Diet>,

    #[arg(long)]
    pub taste: Option<String>,

    /// Daily budget in rupees
    #[arg(long)]
    pub budget: Option<String>,

    /// Minutes available per meal
    #[arg(long)]
    pub time: Option<String>,

    #[arg(long, value_enum)]
    pub kitchen: Option<KitchenSetup>,

    /// Comma-separated ingredients at hand (at least 3)
    #[arg(short, long, default_value = "")]
    pub ingredients: String,

    /// Comma-separated ingredients that must never appear
    #[arg(long, default_value = "")]
    pub avoid: String,

    #[arg(long, value_enum)]
    pub optimize: Option<OptimizationOption>,

    /// Where to save the plan
    #[arg(short, long, default_value = DEFAULT_PLAN_FILE)]
    pub output: PathBuf,
}

impl PlanArgs {
    /// Form state as typed: persona defaults first, explicit flags on top.
    pub fn to_form(&self) -> PreferenceForm {
        let mut form = self
            .persona
            .map(PreferenceForm::for_persona)
            .unwrap_or_default();
        form.city_type = self.city.or(form.city_type);
        form.diet = self.diet.or(form.diet);
        form.taste = self.taste.clone().or(form.taste);
        if let Some(budget) = &self.budget {
            form.budget = budget.clone();
        }
        if let Some(time) = &self.time {
            form.time = time.clone();
        }
        form.kitchen_setup = self.kitchen.or(form.kitchen_setup);
        form.ingredients = self.ingredients.clone();
        form.avoid_ingredients = self.avoid.clone();
        form
    }
}

#[derive(Args, Debug, Clone)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub plan: PlanFile,

    #[arg(long, value_enum, default_value_t = ReminderTime::Morning)]
    pub reminder_time: ReminderTime,

    /// Evening cooking window
    #[arg(long, value_enum, default_value_t = CookingWindow::SevenToNine)]
    pub window: CookingWindow,

    #[arg(long, value_enum, default_value_t = RemindersPerDay::One)]
    pub per_day: RemindersPerDay,

    /// Write the reminders to an .ics file
    #[arg(long)]
    pub ics: Option<PathBuf>,
}

impl ScheduleArgs {
    pub fn reminder_preferences(&self) -> ReminderPreferences {
        ReminderPreferences {
            reminder_time: self.reminder_time,
            cooking_time_window: self.window,
            reminders_per_day: self.per_day,
        }
    }
}

pub fn substitute_choice(index: u8) -> SubstituteChoice {
    if index == 2 {
        SubstituteChoice::EasyFallback
    } else {
        SubstituteChoice::PrepLight
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

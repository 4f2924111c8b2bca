use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use tracing::{debug, info};

use cooksy::api_connection::Provider;
use cooksy::calendar::{generate_google_calendar_link, generate_ics_file_content};
use cooksy::cli::{parse_args, substitute_choice, Command, PlanArgs, ScheduleArgs};
use cooksy::config::AppConfig;
use cooksy::export::{export_grocery_csv, write_grocery_csv};
use cooksy::meal_plan::{MealPlanObject, MealSlot, MealType};
use cooksy::planner::Planner;
use cooksy::preferences::split_ingredient_list;
use cooksy::saved_plan::SavedPlan;
use cooksy::scheduler::generate_reminders_in_zone;
use cooksy::session::PlanSession;

fn print_plan(plan: &MealPlanObject, budget_fallback: bool) {
    if budget_fallback {
        println!("Your budget was too tight for the full plan, here is a budget alternative.");
    }
    println!("\n{}", plan.plan_title);
    println!("{}", plan.based_on_your_inputs);
    for day in plan.days() {
        println!("\n{day}");
        for meal_type in MealType::ALL {
            let slot = MealSlot::new(day, meal_type);
            println!("  {:<10} {}", meal_type.as_str(), plan.meal(&slot).unwrap_or("-"));
        }
    }
    if !plan.using_your_ingredients.is_empty() {
        println!("\nUsing your ingredients: {}", plan.using_your_ingredients.join(", "));
    }
    if !plan.substitutions.is_empty() {
        println!("\nSubstitutions:");
        for sub in &plan.substitutions {
            println!(
                "  {} ({}): {} / {}",
                sub.original, sub.meal, sub.substitute1, sub.substitute2
            );
        }
    }
}

fn new_session(planner: Planner<Provider>) -> PlanSession<Provider> {
    PlanSession::new(planner).on_stage_change(|stage| debug!(?stage, "stage changed"))
}

async fn restore_session(planner: Planner<Provider>, path: &Path) -> Result<PlanSession<Provider>> {
    let saved = SavedPlan::load(path).await?;
    Ok(PlanSession::restore(planner, saved.preferences, saved.response)
        .on_stage_change(|stage| debug!(?stage, "stage changed")))
}

async fn save_session(session: &PlanSession<Provider>, path: &Path) -> Result<()> {
    let saved = SavedPlan::from_session(session).context("Session holds no plan to save")?;
    saved.save(path).await?;
    if let Some(plan) = session.active_plan() {
        print_plan(plan, saved.response.is_budget_fallback());
    }
    println!("\nPlan saved to {}", path.display());
    Ok(())
}

async fn cmd_plan(planner: Planner<Provider>, args: PlanArgs) -> Result<()> {
    let preferences = args.to_form().validate()?;
    info!(taste = %preferences.taste, budget = preferences.budget, time = preferences.time, "generating plan");

    let mut session = new_session(planner);
    session.create_plan(preferences, args.optimize).await?;
    save_session(&session, &args.output).await
}

async fn cmd_schedule(config: &AppConfig, args: ScheduleArgs) -> Result<()> {
    let saved = SavedPlan::load(&args.plan.path).await?;
    let zone = config.time_zone;
    let events = generate_reminders_in_zone(
        saved.active_plan()?,
        &args.reminder_preferences(),
        &Utc::now(),
        zone,
    );

    for event in &events {
        println!(
            "\n{}  {} - {}",
            event.summary,
            event.start.date_time.with_timezone(&zone).format("%a %d %b %H:%M"),
            event.end.date_time.with_timezone(&zone).format("%H:%M")
        );
        if let Some(rule) = event.recurrence_rule() {
            println!("  repeats: {rule}");
        }
        println!("  {}", generate_google_calendar_link(event));
    }

    if let Some(ics_path) = args.ics {
        tokio::fs::write(&ics_path, generate_ics_file_content(&events))
            .await
            .with_context(|| format!("Failed to write calendar file '{}'", ics_path.display()))?;
        println!("\nCalendar saved to {}", ics_path.display());
    }
    Ok(())
}

async fn cmd_grocery(path: &Path, csv: Option<&Path>) -> Result<()> {
    let saved = SavedPlan::load(path).await?;
    let plan = saved.active_plan()?;
    match csv {
        Some(csv_path) => {
            let rows = export_grocery_csv(plan, csv_path)?;
            println!("Wrote {rows} grocery items to {}", csv_path.display());
        }
        None => {
            write_grocery_csv(plan, std::io::stdout().lock())?;
        }
    }
    Ok(())
}

async fn cmd_recipe(planner: Planner<Provider>, pantry: &str) -> Result<()> {
    let items = split_ingredient_list(pantry);
    anyhow::ensure!(!items.is_empty(), "List at least one pantry item");

    let recipe = planner.generate_zero_waste_recipe(&items).await?;
    println!("\n{}\n{}\n", recipe.recipe_name, recipe.description);
    for ingredient in &recipe.ingredients {
        println!("  - {} ({})", ingredient.name, ingredient.notes);
    }
    println!();
    for (idx, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {}", idx + 1, step);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_args();
    cooksy::logging::init(cli.verbose);

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    info!(model = %config.model, time_zone = config.time_zone.name(), "configuration loaded");

    let planner =
        Planner::new(Provider::openrouter(&config)).with_fast_path_minutes(config.fast_path_minutes);

    match cli.command {
        Command::Plan(args) => cmd_plan(planner, args).await,
        Command::Optimize { plan, goal } => {
            let mut session = restore_session(planner, &plan.path).await?;
            session.optimize(goal).await?;
            save_session(&session, &plan.path).await
        }
        Command::Swap {
            plan,
            slot,
            meal,
            substitute,
        } => {
            let mut session = restore_session(planner, &plan.path).await?;
            match (meal, substitute) {
                (Some(meal), _) => session.swap_meal(&slot, &meal).await?,
                (None, Some(index)) => {
                    session
                        .swap_with_substitute(&slot, substitute_choice(index))
                        .await?
                }
                (None, None) => anyhow::bail!("Pass --meal or --substitute"),
            }
            save_session(&session, &plan.path).await
        }
        Command::Move { plan, from, to } => {
            let mut session = restore_session(planner, &plan.path).await?;
            session.swap_positions(&from, &to).await?;
            save_session(&session, &plan.path).await
        }
        Command::Schedule(args) => cmd_schedule(&config, args).await,
        Command::Grocery { plan, csv } => cmd_grocery(&plan.path, csv.as_deref()).await,
        Command::Recipe { pantry } => cmd_recipe(planner, &pantry).await,
    }
}

//! Prompt templates sent to the generative backend.

use crate::meal_plan::{MealPlanObject, MealSlot};
use crate::preferences::{OptimizationOption, UserPreferences};

/// Strips characters that could break out of the prompt's quoting or JSON framing.
pub fn sanitize_input(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '`' | '"' | '\'' | '{' | '}' | '[' | ']'))
        .collect()
}

fn sanitized_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| sanitize_input(item))
        .collect::<Vec<_>>()
        .join(", ")
}

fn avoid_line(prefs: &UserPreferences) -> Option<String> {
    (!prefs.avoid_ingredients.is_empty()).then(|| {
        format!(
            "- Ingredients to Avoid (Allergies): {}",
            sanitized_list(&prefs.avoid_ingredients)
        )
    })
}

fn numbered(rules: &[String]) -> String {
    rules
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{}. {}", i + 1, rule))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn full_plan_prompt(prefs: &UserPreferences, optimization: Option<OptimizationOption>) -> String {
    let mut inputs = vec![
        format!(
            "- Persona Implied By: Budget ₹{}, Time {} mins/meal",
            prefs.budget, prefs.time
        ),
        format!("- Diet: {}", prefs.diet),
        format!("- Taste Preference: {}", sanitize_input(&prefs.taste)),
        format!("- Available Ingredients: {}", sanitized_list(&prefs.ingredients)),
    ];
    inputs.extend(avoid_line(prefs));
    if let Some(option) = optimization {
        inputs.push(format!("- Optimization Preference: {}", option));
    }

    let mut rules = Vec::new();
    if !prefs.avoid_ingredients.is_empty() {
        rules.push(
            "Allergy Lock: You MUST NOT use any ingredients from the \"Ingredients to Avoid\" list in any part of the meal plan, including substitutions. This is a critical safety constraint."
                .to_string(),
        );
    }
    rules.extend([
        format!(
            "Availability-Aware Planning: For a user with a {} min/meal limit, prioritize simpler meals, especially for dinner. Avoid complex prep.",
            prefs.time
        ),
        "Behavioral Adaptation (Simulated): Assume the user sometimes cooks late or is tired. Ensure dinner recipes are flexible and can be prepared quickly.".to_string(),
        "Invisible Safety Net: For each of the 9 meals, you MUST provide two alternatives in the 'substitutions' array.\n    - 'substitute1' MUST be a simpler, prep-light alternative to the primary meal.\n    - 'substitute2' MUST be a very easy, low-effort fallback meal (e.g., uses pantry staples, requires minimal cooking).\n    - Do not label these as 'backup' or 'failure' options in the generated meal names. Use appealing, simple names.".to_string(),
        "Ingredient Lock: You MUST use at least 3 ingredients from the \"Available Ingredients\" list in the total plan.".to_string(),
        "Grocery List: Categorize all necessary items strictly into \"Produce\", \"Grains\", and \"Spices\".".to_string(),
        "Budget Validation Gate: First, silently estimate the cost of an ideal 3-day meal plan. If it exceeds the user's budget (per day x 3), do NOT generate the ideal plan. Instead, generate ONE simpler, budget-safe meal plan. The output JSON should have 'mainPlan' set to null and 'budgetAlternatives' containing the single budget plan. Otherwise, 'mainPlan' should be populated and 'budgetAlternatives' should be an empty array.".to_string(),
        "Cooking Sequence: Provide a step-by-step cooking sequence for each primary meal for all 3 days.".to_string(),
        "Strict JSON Output: The final output must be a single JSON object adhering to the provided schema.".to_string(),
    ]);

    format!(
        "Role: Adaptive AI meal planning assistant.
Objective: Generate a flexible, adaptive 3-day meal plan (Day 1, Day 2, Day 3) that anticipates real-world user behavior and reduces cognitive load.

User Inputs:
{}

Core Principles & Adaptive Logic:
{}

Output all text in clear, supportive, and neutral language. No corrective tones, storytelling, or emojis.
",
        inputs.join("\n"),
        numbered(&rules)
    )
}

pub fn fast_path_prompt(prefs: &UserPreferences) -> String {
    let mut inputs = vec![
        format!("- Diet: {}", prefs.diet),
        format!("- Available Ingredients: {}", sanitized_list(&prefs.ingredients)),
    ];
    inputs.extend(avoid_line(prefs));

    let mut rules = vec![
        "**Fast Meals Only:** All 9 meals (Breakfast, Lunch, Dinner for 3 days) MUST be very simple and require less than 20 minutes of preparation.".to_string(),
        "**Ingredient Priority:** Prioritize using ingredients from the \"Available Ingredients\" list.".to_string(),
    ];
    if !prefs.avoid_ingredients.is_empty() {
        rules.push(
            "**Allergy Lock:** Never use an ingredient from the \"Ingredients to Avoid\" list, including in substitutions."
                .to_string(),
        );
    }
    rules.extend([
        "**Fallback Meals:** For each of the 9 meals, provide two even simpler alternatives in the 'substitutions' array (e.g., instant noodles, sandwich, scrambled eggs).".to_string(),
        "**Simple Structure:** Generate a valid 'planTitle', 'mealPlan', 'groceryList', 'cookingSequence', and 'substitutions' as per the schema. The 'basedOnYourInputs' field should state \"A fast-path plan generated for a tight schedule.\"".to_string(),
        "**Strict JSON Output:** The final output must be a single JSON object.".to_string(),
    ]);

    format!(
        "Role: High-Speed AI Meal Planner.
Objective: Generate a 3-day meal plan containing ONLY pre-approved, quick-to-make meals (under 20 minutes prep). Skip variety optimization and complex recipe generation. Focus on speed and simplicity.

User Inputs:
{}

Constraints:
{}

Do not perform budget validation or complex optimizations. Generate the 'mainPlan' directly. 'budgetAlternatives' should be an empty array.
",
        inputs.join("\n"),
        numbered(&rules)
    )
}

pub fn meal_swap_prompt(
    plan: &MealPlanObject,
    plan_json: &str,
    slot: &MealSlot,
    new_meal: &str,
    prefs: &UserPreferences,
) -> String {
    let original = plan.meal(slot).unwrap_or_default();
    let new_meal = sanitize_input(new_meal);
    let (day, meal_type) = (&slot.day, slot.meal_type);

    format!(
        "Role: AI Meal Plan Surgeon.
Objective: Perform a single meal swap in an existing JSON meal plan without altering any other meals.

Context:
- User Preferences: Diet is {diet}, budget is ₹{budget}/day, time is {time} mins/meal.
- Original Meal Plan (JSON): {plan_json}
- Swap Request: The user wants to swap \"{original}\" from {meal_type} on {day} with a new meal: \"{new_meal}\".

Instructions:
1. **Preserve All Other Meals:** Do NOT change any meal except for {meal_type} on {day}.
2. **Update the Target Meal:** Change `mealPlan.{day}.{meal_type}` to \"{new_meal}\".
3. **Generate New Cooking Sequence:** Create a new cooking sequence ONLY for \"{new_meal}\".
4. **Recompute Grocery List:** Analyze the entire NEW plan (with the swapped meal) and generate a new, complete `groceryList`. The new list must account for ingredients removed from the original meal and ingredients added for the new one.
5. **Recompute Substitutions:** Generate a new, complete list of `substitutions` for the entire 3-day plan. For the newly swapped meal, provide a new prep-light alternative ('substitute1') and an easy fallback ('substitute2').
6. **Maintain Structure:** The output must be the complete, updated `MealPlanObject` in a single JSON object, matching the provided schema exactly.

Return only the modified JSON object. No explanations.
",
        diet = prefs.diet,
        budget = prefs.budget,
        time = prefs.time,
    )
}

pub fn rebalance_prompt(swapped_plan_json: &str) -> String {
    format!(
        "Role: AI Meal Plan Rebalancer.
Objective: Incrementally update a meal plan after a user-driven swap of two meal positions. Do NOT change the meals themselves; only update the derived properties (grocery list, cooking sequence, substitutions) to be consistent with the new meal arrangement.

Context & Rules:
1. **Input Plan is Truth:** The provided plan JSON contains the new, user-arranged meal schedule. You MUST preserve the 'mealPlan' object exactly as it is given.
2. **Do Not Change Meals:** Do not alter, replace, or re-order any meals within the provided 'mealPlan' structure.
3. **Task 1: Recompute Grocery List:** Analyze the entire new 3-day meal plan and generate a new, complete `groceryList`. This list must accurately reflect all ingredients required for the meals in their new positions.
4. **Task 2: Recompute Cooking Sequence:** Generate a new, complete `cookingSequence` for all 9 meals based on their new days and times.
5. **Task 3: Recompute Substitutions:** Generate a new, complete list of `substitutions` for all 9 meals. Each substitution entry must provide a 'prep-light alternative' (substitute1) and an 'easy fallback' (substitute2).
6. **Maintain Structure:** Preserve the 'planTitle', 'usingYourIngredients', and 'basedOnYourInputs' fields from the input. The output must be the complete, rebalanced `MealPlanObject` in a single JSON object.

Input Swapped Meal Plan (JSON):
{swapped_plan_json}

Return only the rebalanced JSON object. No explanations.
"
    )
}

pub fn zero_waste_recipe_prompt(pantry: &[String]) -> String {
    format!(
        "Role: AI Zero-Waste Chef.
Objective: Create a single, delicious recipe from the items in the user's pantry and leftovers.

Pantry and leftovers: {}

Analysis:
1. Prioritize using the items that seem perishable or are leftovers.
2. Make reasonable assumptions about common pantry staples the user might have (e.g., salt, pepper, oil) if needed to complete the recipe, but clearly mark them as \"Pantry staple\".

Output Requirements:
- Generate a creative and practical recipe name.
- Write a short, enticing description of the dish.
- List all ingredients. For each ingredient, note if it came \"From your pantry\" or is a \"Pantry staple\".
- Provide clear, step-by-step cooking instructions.
- The output must be a single JSON object adhering to the provided schema. No extra text or explanations.
",
        sanitized_list(pantry)
    )
}

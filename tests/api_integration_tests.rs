use cooksy::api_connection::{
    connection::ApiConnectionError,
    endpoints::{ChatCompletionRequest, ChatMessage, Provider},
    strip_code_fences, GenerativeBackend,
};
use cooksy::config::{AppConfig, API_KEY_ENV_VAR};
use cooksy::planner::Planner;
use cooksy::preferences::{CityType, Diet, KitchenSetup, UserPreferences};
use cooksy::schema;
use dotenv::dotenv;
use std::env;

fn setup_test_environment() -> AppConfig {
    dotenv().ok();
    AppConfig::from_env().expect("test environment config should be valid")
}

fn provider_with_key_var(key_var: &str) -> Provider {
    let config = AppConfig {
        api_key_env_var: key_var.to_string(),
        ..AppConfig::default()
    };
    Provider::openrouter(&config)
}

fn hello_request(provider: &Provider) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: provider.model().to_string(),
        messages: vec![ChatMessage::user("Hello")],
        response_format: None,
        temperature: None,
        max_tokens: None,
    }
}

#[tokio::test]
async fn test_missing_api_key_error() {
    let provider = provider_with_key_var("THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    let result = provider.call_chat_completion(hello_request(&provider)).await;
    assert!(matches!(result, Err(ApiConnectionError::MissingApiKey(_))));
    if let Err(ApiConnectionError::MissingApiKey(key_name)) = result {
        assert_eq!(key_name, "THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    }
}

#[tokio::test]
async fn test_missing_api_key_surfaces_through_backend() {
    let provider = provider_with_key_var("THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    let result = provider
        .generate_json("anything", &schema::single_recipe_definition())
        .await;
    assert!(matches!(result, Err(ApiConnectionError::MissingApiKey(_))));
}

#[tokio::test]
#[ignore]
async fn test_successful_recipe_generation() {
    let config = setup_test_environment();
    if env::var(API_KEY_ENV_VAR).is_err() {
        println!("Skipping test_successful_recipe_generation: {} not set.", API_KEY_ENV_VAR);
        return;
    }

    let provider = Provider::openrouter(&config);
    let raw = provider
        .generate_json(
            "Create a simple recipe using rice, onion and tomato.",
            &schema::single_recipe_definition(),
        )
        .await;
    assert!(raw.is_ok(), "API call failed: {:?}", raw.err());
    let raw = raw.unwrap();

    let json_value: Result<serde_json::Value, _> = serde_json::from_str(strip_code_fences(&raw));
    assert!(json_value.is_ok(), "Response content is not valid JSON: '{}'", raw);
    let parsed = json_value.unwrap();
    assert!(parsed.get("recipeName").unwrap().is_string());
    assert!(parsed.get("instructions").unwrap().is_array());
}

#[tokio::test]
#[ignore]
async fn test_successful_plan_generation() {
    let config = setup_test_environment();
    if env::var(API_KEY_ENV_VAR).is_err() {
        println!("Skipping test_successful_plan_generation: {} not set.", API_KEY_ENV_VAR);
        return;
    }

    let planner = Planner::new(Provider::openrouter(&config));
    let prefs = UserPreferences {
        city_type: CityType::Metro,
        diet: Diet::Veg,
        taste: "North Indian".to_string(),
        budget: 500,
        time: 30,
        kitchen_setup: KitchenSetup::Medium,
        ingredients: vec!["rice".into(), "onion".into(), "paneer".into()],
        avoid_ingredients: vec!["peanuts".into()],
    };

    let result = planner.generate_meal_plan(&prefs, None).await;
    assert!(result.is_ok(), "plan generation failed: {:?}", result.err());
    let response = result.unwrap();
    let plan = response.active_plan().unwrap();
    assert_eq!(plan.days().len(), 3);
    assert_eq!(planner.cache().len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_api_error_with_invalid_key() {
    dotenv().ok();

    const INVALID_KEY_ENV_NAME_FOR_THIS_TEST: &str = "ENV_VAR_WITH_BAD_KEY_VALUE";
    unsafe {
        std::env::set_var(INVALID_KEY_ENV_NAME_FOR_THIS_TEST, "this_is_a_deliberately_bad_api_key_string_for_testing");
    }

    let provider = provider_with_key_var(INVALID_KEY_ENV_NAME_FOR_THIS_TEST);
    let result = provider.call_chat_completion(hello_request(&provider)).await;
    assert!(matches!(result, Err(ApiConnectionError::ApiError { .. })), "Expected ApiError, got {:?}", result);
    if let Err(ApiConnectionError::ApiError { status, .. }) = result {
        assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
    }

    unsafe {
        std::env::remove_var(INVALID_KEY_ENV_NAME_FOR_THIS_TEST);
    }
}

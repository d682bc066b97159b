use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use recipe_nexus::config::PagingConfig;
use recipe_nexus::db::SqliteRecipeStore;
use recipe_nexus::service::{RecipeService, Translator};
use recipe_nexus::{RecipeState, recipe_router};
use serde_json::{Value, json};
use tower::ServiceExt;

const BASE_URL: &str = "/api/recipe";

async fn app() -> Router {
    let store = SqliteRecipeStore::connect("sqlite::memory:", 1)
        .await
        .expect("failed to open sqlite pool");
    store.init_schema().await.expect("failed to init schema");
    let state = RecipeState::new(
        RecipeService::new(store),
        Translator::english(),
        PagingConfig {
            default_size: 10,
            max_size: 2000,
        },
    );
    recipe_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(builder.body(body).expect("failed to build request"))
        .await
        .expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = serde_json::from_slice(&bytes).expect("response body was not json");
    (status, value)
}

fn recipe_body(title: &str, vegetarian: bool, servings: i32, ingredients: &[&str]) -> Value {
    json!({
        "title": title,
        "description": "Boiled saba bananas, a classic Filipino snack.",
        "instruction": "Bring water to a boil. Add the bananas and cook until tender.",
        "vegetarian": vegetarian,
        "servings": servings,
        "ingredients": ingredients.iter().map(|n| json!({ "name": n })).collect::<Vec<_>>(),
    })
}

async fn create(app: &Router, body: Value) -> String {
    let (status, resp) = send(app, "POST", BASE_URL, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{resp}");
    resp["result"]["uuid"]
        .as_str()
        .expect("uuid missing in create response")
        .to_string()
}

#[tokio::test]
async fn create_then_get_returns_envelope() {
    let app = app().await;
    let (status, resp) = send(
        &app,
        "POST",
        BASE_URL,
        Some(recipe_body("Nilagang Saging", true, 2, &["4 pieces saba banana", "water"])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["success"], json!(true));
    assert_eq!(resp["message"], json!("Recipe created successfully"));
    assert_eq!(resp["result"]["title"], json!("Nilagang Saging"));
    assert!(resp["result"]["createdAt"].is_string());
    assert_eq!(resp["errors"], Value::Null);

    let uuid = resp["result"]["uuid"].as_str().expect("uuid").to_string();
    let (status, resp) = send(&app, "GET", &format!("{BASE_URL}/{uuid}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], json!("Recipe retrieved successfully"));
    assert_eq!(resp["result"]["uuid"], json!(uuid));
    assert_eq!(resp["result"]["servings"], json!(2));
    assert_eq!(
        resp["result"]["ingredients"],
        json!([{ "name": "4 pieces saba banana" }, { "name": "water" }])
    );
}

#[tokio::test]
async fn invalid_body_lists_field_errors() {
    let app = app().await;
    let (status, resp) = send(
        &app,
        "POST",
        BASE_URL,
        Some(json!({
            "title": " ",
            "description": "ok",
            "instruction": "ok",
            "vegetarian": true,
            "servings": 0,
            "ingredients": [{ "name": "" }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["success"], json!(false));
    assert_eq!(resp["message"], json!("Validation failed"));
    assert_eq!(
        resp["errors"],
        json!([
            "title: Title is required",
            "ingredients[0].name: Ingredient name is required",
            "servings: Servings must be at least 1",
        ])
    );
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = app().await;
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(BASE_URL)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["message"], json!("Malformed request body"));
    assert!(body["errors"].is_array());
}

#[tokio::test]
async fn invalid_uuid_is_a_bad_parameter() {
    let app = app().await;
    for method in ["GET", "DELETE"] {
        let (status, resp) = send(&app, method, &format!("{BASE_URL}/invalid-uuid"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            resp["message"],
            json!("Invalid value for parameter 'uuid', expected UUID")
        );
    }
    let (status, _) = send(
        &app,
        "PUT",
        &format!("{BASE_URL}/invalid-uuid"),
        Some(recipe_body("x", true, 1, &["y"])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_uuid_is_not_found() {
    let app = app().await;
    let uuid = "550e8400-e29b-41d4-a716-446655440000";
    let (status, resp) = send(&app, "GET", &format!("{BASE_URL}/{uuid}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp["success"], json!(false));
    assert_eq!(resp["message"], json!(format!("Recipe not found with UUID: {uuid}")));
    assert_eq!(resp["result"], Value::Null);
}

#[tokio::test]
async fn update_replaces_and_delete_removes() {
    let app = app().await;
    let uuid = create(&app, recipe_body("Soup", false, 2, &["A", "B"])).await;
    let url = format!("{BASE_URL}/{uuid}");

    let (status, resp) = send(&app, "PUT", &url, Some(recipe_body("Soup v2", true, 3, &["C"]))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], json!("Recipe updated successfully"));
    assert_eq!(resp["result"]["title"], json!("Soup v2"));
    assert!(resp["result"]["updatedAt"].is_string());

    let (_, resp) = send(&app, "GET", &url, None).await;
    assert_eq!(resp["result"]["ingredients"], json!([{ "name": "C" }]));
    assert_eq!(resp["result"]["vegetarian"], json!(true));

    let (status, resp) = send(&app, "DELETE", &url, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], json!("Recipe deleted successfully"));
    assert_eq!(resp["result"], Value::Null);

    let (status, _) = send(&app, "GET", &url, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &url, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_with_repeated_and_comma_separated_terms() {
    let app = app().await;
    create(&app, recipe_body("Beef Cabbage", false, 4, &["beef", "cabbage"])).await;
    create(&app, recipe_body("Cabbage Salad", true, 2, &["1 Cabbage", "vinegar"])).await;
    create(&app, recipe_body("Pork Stew", false, 4, &["pork", "potato"])).await;

    let (status, resp) = send(
        &app,
        "GET",
        &format!("{BASE_URL}/search?includedIngredients=cabbage&includedIngredients=potato&excludedIngredients=beef"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], json!("Recipes found"));
    assert_eq!(resp["result"]["totalElements"], json!(2));
    assert_eq!(resp["result"]["content"][0]["title"], json!("Cabbage Salad"));
    assert_eq!(resp["result"]["content"][1]["title"], json!("Pork Stew"));

    let (_, resp) = send(
        &app,
        "GET",
        &format!("{BASE_URL}/search?excludedIngredients=beef,vinegar&servings=4"),
        None,
    )
    .await;
    assert_eq!(resp["result"]["totalElements"], json!(1));
    assert_eq!(resp["result"]["content"][0]["title"], json!("Pork Stew"));
}

#[tokio::test]
async fn search_paginates_and_sorts() {
    let app = app().await;
    for n in 0..11 {
        create(&app, recipe_body(&format!("Dish {n:02}"), true, 2, &["rice"])).await;
    }

    let (_, resp) = send(
        &app,
        "GET",
        &format!("{BASE_URL}/search?vegetarian=true&page=0&size=10&sort=title,desc"),
        None,
    )
    .await;
    let result = &resp["result"];
    assert_eq!(result["content"].as_array().map(Vec::len), Some(10));
    assert_eq!(result["content"][0]["title"], json!("Dish 10"));
    assert_eq!(result["pageNumber"], json!(0));
    assert_eq!(result["pageSize"], json!(10));
    assert_eq!(result["totalElements"], json!(11));
    assert_eq!(result["totalPages"], json!(2));
    assert_eq!(result["last"], json!(false));

    let (_, resp) = send(
        &app,
        "GET",
        &format!("{BASE_URL}/search?vegetarian=true&page=1&size=10"),
        None,
    )
    .await;
    assert_eq!(resp["result"]["content"].as_array().map(Vec::len), Some(1));
    assert_eq!(resp["result"]["last"], json!(true));
}

#[tokio::test]
async fn empty_search_uses_empty_message() {
    let app = app().await;
    create(&app, recipe_body("Toast", true, 1, &["bread"])).await;

    let (status, resp) = send(
        &app,
        "GET",
        &format!("{BASE_URL}/search?instruction=grill"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["success"], json!(true));
    assert_eq!(resp["message"], json!("No recipes found"));
    assert_eq!(resp["result"]["content"], json!([]));
    assert_eq!(resp["result"]["totalElements"], json!(0));
    assert_eq!(resp["result"]["totalPages"], json!(0));
    assert_eq!(resp["result"]["last"], json!(true));
}

#[tokio::test]
async fn bad_search_parameters_are_rejected() {
    let app = app().await;
    let (status, resp) = send(&app, "GET", &format!("{BASE_URL}/search?servings=many"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp["message"],
        json!("Invalid value for parameter 'servings', expected Integer")
    );

    let (status, resp) = send(&app, "GET", &format!("{BASE_URL}/search?vegetarian=abc"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp["message"],
        json!("Invalid value for parameter 'vegetarian', expected Boolean")
    );

    let (status, resp) = send(&app, "GET", &format!("{BASE_URL}/search?sort=calories"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp["message"],
        json!("Invalid value for parameter 'sort', expected a recipe property")
    );
}

#[tokio::test]
async fn unsupported_method_uses_envelope() {
    let app = app().await;
    let (status, resp) = send(&app, "PATCH", BASE_URL, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp["success"], json!(false));
    assert_eq!(resp["message"], json!("Unsupported method: PATCH"));
}

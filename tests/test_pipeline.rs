use std::sync::Arc;

use grocery_list::providers::GroqProvider;
use grocery_list::video::YouTubeClient;
use grocery_list::{
    export_text, generate, Category, DishRequest, MergePolicy, Preferences, RecipeCollector,
    Source,
};
use mockito::{Matcher, Server, ServerGuard};

fn chat_reply(content: &str) -> String {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
    .to_string()
}

fn groq(server: &ServerGuard) -> Box<GroqProvider> {
    Box::new(GroqProvider::with_base_url(
        "gsk-test".to_string(),
        server.url(),
        "llama3-8b-8192".to_string(),
    ))
}

fn dishes(names: &[&str]) -> Vec<DishRequest> {
    names.iter().filter_map(|n| DishRequest::new(n)).collect()
}

fn names(list: &grocery_list::ShoppingList, category: Category) -> Vec<String> {
    list.get(category)
        .unwrap_or_default()
        .iter()
        .map(|i| i.name.clone())
        .collect()
}

/// AI returns three items and no video source is configured
#[tokio::test]
async fn test_pancakes_end_to_end() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer gsk-test")
        .match_body(Matcher::Regex("Pancakes".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_reply(
            r#"{"ingredients": ["1 cup flour", "2 eggs", "1 cup milk"]}"#,
        ))
        .create_async()
        .await;

    let collector = Arc::new(RecipeCollector::new(groq(&server), Preferences::default()));
    let result = generate(collector, dishes(&["Pancakes"]), MergePolicy::PreferAi).await;
    mock.assert_async().await;

    assert!(result.failures.is_empty());
    assert!(result.tutorials.is_empty());

    let list = &result.list;
    assert_eq!(list.categories(), vec![Category::DairyEggs, Category::Pantry]);
    assert_eq!(names(list, Category::Pantry), vec!["flour"]);
    assert_eq!(names(list, Category::DairyEggs), vec!["eggs", "milk"]);
    assert_eq!(list.find("flour").unwrap().quantity.as_deref(), Some("1 cup"));
    assert_eq!(list.find("eggs").unwrap().quantity.as_deref(), Some("2"));

    assert_eq!(
        export_text(list),
        "Dairy & Eggs\n• eggs (2)\n• milk (1 cup)\n\nPantry Staples\n• flour (1 cup)\n"
    );
}

/// One dish's LLM call fails; the other dish still produces a list
#[tokio::test]
async fn test_failed_dish_does_not_block_others() {
    let mut server = Server::new_async().await;
    let _ok = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("Guacamole".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_reply(r#"{"ingredients": ["3 avocados", "1 lime", "salt"]}"#))
        .create_async()
        .await;
    let _failing = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("Lasagna".to_string()))
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"message": "internal error"}}"#)
        .create_async()
        .await;

    let collector = Arc::new(RecipeCollector::new(groq(&server), Preferences::default()));
    let result = generate(
        collector,
        dishes(&["Lasagna", "Guacamole"]),
        MergePolicy::PreferAi,
    )
    .await;

    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].dish, "Lasagna");
    assert!(result.failures[0].message.contains("internal error"));

    assert_eq!(result.list.dishes, vec!["Lasagna", "Guacamole"]);
    assert_eq!(names(&result.list, Category::Produce), vec!["avocados", "lime"]);
    assert_eq!(names(&result.list, Category::Pantry), vec!["salt"]);
}

/// Video transcript ingredients merge with AI ones and fill missing quantities
#[tokio::test]
async fn test_video_ingredients_are_merged() {
    let mut llm = Server::new_async().await;
    let _chat = llm
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_reply(
            r#"{"ingredients": [{"name": "spaghetti", "quantity": "400 g"}, "parmesan cheese", "4 eggs"]}"#,
        ))
        .create_async()
        .await;

    let mut youtube = Server::new_async().await;
    let _search = youtube
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded(
            "q".to_string(),
            "Carbonara recipe cooking".to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"items": [{"id": {"videoId": "carb1"}, "snippet": {"title": "Real Carbonara", "channelTitle": "Nonna"}}]}"#,
        )
        .create_async()
        .await;
    let _transcript = youtube
        .mock("GET", "/api/timedtext")
        .match_query(Matcher::UrlEncoded("v".to_string(), "carb1".to_string()))
        .with_status(200)
        .with_body(
            "<transcript>\
             <text start=\"1\">first fry 150g guanciale</text>\
             <text start=\"4\">then grate 1 cup parmesan cheese.</text>\
             <text start=\"7\">Now add the pasta to the pan and stir well.</text>\
             </transcript>",
        )
        .create_async()
        .await;

    let video = YouTubeClient::with_base_urls("yt-key".to_string(), youtube.url(), youtube.url());
    let collector = Arc::new(
        RecipeCollector::new(groq(&llm), Preferences::default()).with_video(video, 3),
    );

    let result = generate(collector, dishes(&["Carbonara"]), MergePolicy::PreferAi).await;
    let list = &result.list;

    let cheese = list.find("parmesan cheese").unwrap();
    assert_eq!(cheese.quantity.as_deref(), Some("1 cup"));
    assert_eq!(cheese.source, Source::Video);

    let guanciale = list.find("guanciale").unwrap();
    assert_eq!(guanciale.source, Source::Video);
    assert_eq!(guanciale.quantity.as_deref(), Some("150g"));

    assert_eq!(list.find("spaghetti").unwrap().quantity.as_deref(), Some("400 g"));
    assert_eq!(list.find("eggs").unwrap().source, Source::Ai);

    assert_eq!(result.tutorials.len(), 1);
    assert_eq!(result.tutorials[0].url, "https://www.youtube.com/watch?v=carb1");
    assert!(result
        .instructions
        .iter()
        .any(|s| s.contains("add the pasta")));
}

/// A failing video API leaves the AI list untouched
#[tokio::test]
async fn test_video_failure_degrades_silently() {
    let mut llm = Server::new_async().await;
    let _chat = llm
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_reply(r#"["2 cups rice", "1 lb chicken thighs"]"#))
        .create_async()
        .await;

    let mut youtube = Server::new_async().await;
    let _search = youtube
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"error": {"message": "quotaExceeded"}}"#)
        .create_async()
        .await;

    let video = YouTubeClient::with_base_urls("yt-key".to_string(), youtube.url(), youtube.url());
    let collector = Arc::new(
        RecipeCollector::new(groq(&llm), Preferences::default()).with_video(video, 3),
    );

    let result = generate(collector, dishes(&["Chicken Rice"]), MergePolicy::PreferAi).await;

    assert!(result.failures.is_empty());
    assert!(result.tutorials.is_empty());
    assert_eq!(result.list.total_items(), 2);
    assert!(result.list.items().all(|i| i.source == Source::Ai));
}

/// Every tutorial with a readable transcript is listed, skipping ones without
#[tokio::test]
async fn test_tutorials_come_from_read_transcripts() {
    let mut llm = Server::new_async().await;
    let _chat = llm
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_reply(r#"["2 cups basmati rice", "1 onion"]"#))
        .create_async()
        .await;

    let mut youtube = Server::new_async().await;
    let _search = youtube
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"items": [
                {"id": {"videoId": "pil1"}, "snippet": {"title": "Pilaf One", "channelTitle": "A"}},
                {"id": {"videoId": "pil2"}, "snippet": {"title": "Pilaf Two", "channelTitle": "B"}},
                {"id": {"videoId": "pil3"}, "snippet": {"title": "Pilaf Three", "channelTitle": "C"}}
            ]}"#,
        )
        .create_async()
        .await;
    let _first = youtube
        .mock("GET", "/api/timedtext")
        .match_query(Matcher::UrlEncoded("v".to_string(), "pil1".to_string()))
        .with_status(200)
        .with_body("<transcript><text start=\"1\">first rinse 2 cups basmati rice</text></transcript>")
        .create_async()
        .await;
    let _missing = youtube
        .mock("GET", "/api/timedtext")
        .match_query(Matcher::UrlEncoded("v".to_string(), "pil2".to_string()))
        .with_status(404)
        .create_async()
        .await;
    let _third = youtube
        .mock("GET", "/api/timedtext")
        .match_query(Matcher::UrlEncoded("v".to_string(), "pil3".to_string()))
        .with_status(200)
        .with_body("<transcript><text start=\"1\">Now add 2 tbsp butter to the pot.</text></transcript>")
        .create_async()
        .await;

    let video = YouTubeClient::with_base_urls("yt-key".to_string(), youtube.url(), youtube.url());
    let collector = Arc::new(
        RecipeCollector::new(groq(&llm), Preferences::default()).with_video(video, 3),
    );

    let result = generate(collector, dishes(&["Rice Pilaf"]), MergePolicy::PreferAi).await;

    let ids: Vec<&str> = result
        .tutorials
        .iter()
        .map(|t| t.video_id.as_str())
        .collect();
    assert_eq!(ids, vec!["pil1", "pil3"]);
    assert_eq!(result.list.find("butter").unwrap().source, Source::Video);
}

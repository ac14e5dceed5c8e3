// tests/quiz_api.rs

mod common;

use std::collections::HashSet;

use common::{custom_quiz_body, spawn_app};
use serde_json::{Value, json};

#[tokio::test]
async fn create_custom_quiz_returns_201() {
    let app = spawn_app().await;

    let response = app
        .post_json("/quizzes", &custom_quiz_body("Hello World!", 3, 2))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["quiz_id"], "hello-world");
    assert_eq!(body["code_name"], "Hello World!");
    assert_eq!(body["num_questions"], 3);
    assert_eq!(body["min_correct"], 2);
    assert_eq!(body["is_custom_quiz"], true);
    assert!(body.get("categories").is_none());
    assert!(body.get("code_value").is_none());
}

#[tokio::test]
async fn same_label_gets_suffixed_id() {
    let app = spawn_app().await;

    let first: Value = app
        .post_json("/quizzes", &custom_quiz_body("Hello World!", 1, 1))
        .await
        .json()
        .await
        .unwrap();
    let second: Value = app
        .post_json("/quizzes", &custom_quiz_body("Hello World!", 1, 1))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(first["quiz_id"], "hello-world");
    assert_eq!(second["quiz_id"], "hello-world-1");
}

#[tokio::test]
async fn concurrent_creations_with_one_label_get_distinct_ids() {
    let app = spawn_app().await;
    let label = format!("Race {}", uuid::Uuid::new_v4().simple());
    let slug = label.to_lowercase().replace(' ', "-");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = app.client.clone();
            let url = app.url("/quizzes");
            let body = custom_quiz_body(&label, 1, 1);
            tokio::spawn(async move { client.post(url).json(&body).send().await.unwrap() })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let response = handle.await.unwrap();
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.unwrap();
        ids.insert(body["quiz_id"].as_str().unwrap().to_string());
    }

    assert_eq!(ids.len(), 8);
    assert!(ids.contains(&slug));
    for n in 1..8 {
        assert!(ids.contains(&format!("{}-{}", slug, n)));
    }
}

#[tokio::test]
async fn custom_questions_keep_order_and_get_sequential_ids() {
    let app = spawn_app().await;

    let created: Value = app
        .post_json("/quizzes", &custom_quiz_body("Ordered", 4, 1))
        .await
        .json()
        .await
        .unwrap();
    let quiz_id = created["quiz_id"].as_str().unwrap();

    let stored = app.store_quiz(quiz_id).await;
    let questions = stored.questions.unwrap();
    let ids: Vec<i64> = questions.iter().map(|q| q.question_id).collect();
    let prompts: Vec<&str> = questions.iter().map(|q| q.question.as_str()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(
        prompts,
        vec!["Question 1", "Question 2", "Question 3", "Question 4"]
    );
}

#[tokio::test]
async fn create_generated_quiz_echoes_categories() {
    let app = spawn_app().await;
    let history = app.seed_category("History", 5).await;

    let response = app
        .post_json(
            "/quizzes",
            &json!({
                "code_value": "PRIZE",
                "code_name": "History Buff",
                "num_questions": 5,
                "min_correct": 3,
                "is_custom_quiz": false,
                "categories": [history]
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["quiz_id"], "history-buff");
    assert_eq!(body["categories"], json!([history]));
}

#[tokio::test]
async fn create_rejects_invalid_payloads() {
    let app = spawn_app().await;

    let mut cases: Vec<(&str, Value)> = Vec::new();

    let mut body = custom_quiz_body("Empty reward", 1, 1);
    body["code_value"] = json!("");
    cases.push(("empty code_value", body));

    let mut body = custom_quiz_body("x", 1, 1);
    body["code_name"] = json!("n".repeat(101));
    cases.push(("long code_name", body));

    cases.push(("zero questions", {
        let mut body = custom_quiz_body("Zero", 1, 0);
        body["num_questions"] = json!(0);
        body
    }));

    cases.push(("too many questions", {
        let mut body = custom_quiz_body("Many", 1, 0);
        body["num_questions"] = json!(26);
        body
    }));

    cases.push(("threshold above count", custom_quiz_body("Strict", 2, 3)));

    cases.push(("question count mismatch", {
        let mut body = custom_quiz_body("Mismatch", 3, 1);
        body["num_questions"] = json!(2);
        body
    }));

    cases.push(("three answer choices", {
        let mut body = custom_quiz_body("Three", 1, 1);
        body["questions"][0]["answer_choices"]
            .as_array_mut()
            .unwrap()
            .pop();
        body
    }));

    cases.push(("duplicate answer text", {
        let mut body = custom_quiz_body("Dupes", 1, 1);
        body["questions"][0]["answer_choices"][1]["answer_value"] = json!("zero");
        body
    }));

    cases.push(("correct id missing", {
        let mut body = custom_quiz_body("Missing", 1, 1);
        body["questions"][0]["correct_id"] = json!(9);
        body
    }));

    cases.push(("long prompt", {
        let mut body = custom_quiz_body("Long", 1, 1);
        body["questions"][0]["question"] = json!("q".repeat(301));
        body
    }));

    cases.push((
        "generated without categories",
        json!({
            "code_value": "PRIZE",
            "code_name": "No Categories",
            "num_questions": 2,
            "min_correct": 1,
            "is_custom_quiz": false
        }),
    ));

    cases.push((
        "wrong field type",
        json!({
            "code_value": "PRIZE",
            "code_name": "Typed",
            "num_questions": "five",
            "min_correct": 1,
            "is_custom_quiz": false,
            "categories": []
        }),
    ));

    for (name, body) in cases {
        let response = app.post_json("/quizzes", &body).await;
        assert_eq!(response.status().as_u16(), 400, "case: {}", name);
        let error: Value = response.json().await.unwrap();
        assert!(error["error"].is_string(), "case: {}", name);
    }
}

#[tokio::test]
async fn info_returns_metadata_without_reward() {
    let app = spawn_app().await;
    app.post_json("/quizzes", &custom_quiz_body("Info Quiz", 2, 1))
        .await;

    let response = app.get("/quizzes/info-quiz/info").await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["quiz_id"], "info-quiz");
    assert_eq!(body["num_questions"], 2);
    assert_eq!(body["categories"], Value::Null);
    assert_eq!(body["stats"], Value::Null);
    assert!(body.get("code_value").is_none());
}

#[tokio::test]
async fn unknown_quiz_is_404() {
    let app = spawn_app().await;

    assert_eq!(app.get("/quizzes/nope/info").await.status().as_u16(), 404);
    assert_eq!(app.get("/quizzes/nope/questions").await.status().as_u16(), 404);
}

#[tokio::test]
async fn questions_hide_the_answer_key() {
    let app = spawn_app().await;
    app.post_json("/quizzes", &custom_quiz_body("Secret Key", 2, 1))
        .await;

    let response = app.get("/quizzes/secret-key/questions").await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["num_questions"], 2);
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    for question in questions {
        assert!(question.get("correct_id").is_none());
        assert!(question["question_id"].is_i64());
        assert_eq!(question["answer_choices"].as_array().unwrap().len(), 4);
    }
    assert!(body.get("code_value").is_none());
}

#[tokio::test]
async fn custom_questions_are_stable_as_sets() {
    let app = spawn_app().await;
    app.post_json("/quizzes", &custom_quiz_body("Stable", 3, 1))
        .await;

    let choice_sets = |body: &Value| -> Vec<(String, HashSet<String>)> {
        body["questions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|q| {
                let choices = q["answer_choices"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|c| c["answer_value"].as_str().unwrap().to_string())
                    .collect();
                (q["question"].as_str().unwrap().to_string(), choices)
            })
            .collect()
    };

    let first: Value = app.get("/quizzes/stable/questions").await.json().await.unwrap();
    let second: Value = app.get("/quizzes/stable/questions").await.json().await.unwrap();

    assert_eq!(choice_sets(&first), choice_sets(&second));
}

#[tokio::test]
async fn generated_quiz_draws_from_bank() {
    let app = spawn_app().await;
    let science = app.seed_category("Science", 12).await;
    app.seed_category("Sport", 12).await;

    app.post_json(
        "/quizzes",
        &json!({
            "code_value": "PRIZE",
            "code_name": "Science Fair",
            "num_questions": 10,
            "min_correct": 5,
            "is_custom_quiz": false,
            "categories": [science]
        }),
    )
    .await;

    let body: Value = app
        .get("/quizzes/science-fair/questions")
        .await
        .json()
        .await
        .unwrap();
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 10);
    assert!(
        questions
            .iter()
            .all(|q| q["question"].as_str().unwrap().starts_with("Science"))
    );
}

#[tokio::test]
async fn insufficient_bank_questions_is_404_not_short_quiz() {
    let app = spawn_app().await;
    let small = app.seed_category("Small", 5).await;

    let created = app
        .post_json(
            "/quizzes",
            &json!({
                "code_value": "PRIZE",
                "code_name": "Too Big",
                "num_questions": 10,
                "min_correct": 5,
                "is_custom_quiz": false,
                "categories": [small]
            }),
        )
        .await;
    assert_eq!(created.status().as_u16(), 201);

    let response = app.get("/quizzes/too-big/questions").await;
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert!(body.get("questions").is_none());
    assert_eq!(body["error"], "Not enough questions available");
}

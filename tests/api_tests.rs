// tests/api_tests.rs

use std::net::SocketAddr;

use treasure_hunt::{config::Config, hunt::QuestionBank, routes, state::AppState};

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app(time_limit: u64) -> String {
    // 1. Create test configuration and state
    let config = Config {
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        session_secret: "test_secret_for_integration_tests".to_string(),
        session_ttl: 600,
        time_limit,
        title: "Test Hunt".to_string(),
        questions_path: None,
        rust_log: "error".to_string(),
    };

    let state = AppState::new(config, QuestionBank::builtin());

    // 2. Create the router with the app state
    let app = routes::create_router(state);

    // 3. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 4. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// A client that keeps the session cookie between requests.
fn participant() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap()
}

async fn view(client: &reqwest::Client, address: &str) -> serde_json::Value {
    client
        .get(&format!("{}/api/hunt/view", address))
        .send()
        .await
        .expect("Failed to fetch view")
        .json()
        .await
        .expect("Failed to parse view json")
}

/// The built-in clue with id N expects "answerN".
fn expected_answer(view: &serde_json::Value) -> String {
    format!("answer{}", view["question_id"].as_u64().expect("No current clue"))
}

async fn answer(
    client: &reqwest::Client,
    address: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let response = client
        .post(&format!("{}/api/hunt/answer", address))
        .json(&body)
        .send()
        .await
        .expect("Failed to submit answer");
    assert_eq!(response.status().as_u16(), 200);
    response.json().await.unwrap()
}

#[tokio::test]
async fn health_check_works() {
    let address = spawn_app(3600).await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/health", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_path_404() {
    let address = spawn_app(3600).await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn first_visit_issues_session_cookie() {
    let address = spawn_app(3600).await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/hunt/view", address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("Session cookie not set")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("hunt_session="));
    assert!(cookie.contains("HttpOnly"));

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["screen"], "start");
}

#[tokio::test]
async fn forged_cookie_gets_a_fresh_session() {
    let address = spawn_app(3600).await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/hunt/view", address))
        .header("Cookie", "hunt_session=not-a-token")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers().get("set-cookie").is_some());
}

#[tokio::test]
async fn full_hunt_flow() {
    // Arrange
    let address = spawn_app(3600).await;
    let client = participant();

    // 1. Start
    let started = client
        .post(&format!("{}/api/hunt/start", address))
        .send()
        .await
        .expect("Start failed");
    assert_eq!(started.status().as_u16(), 200);
    let started: serde_json::Value = started.json().await.unwrap();
    assert_eq!(started["screen"], "active");
    assert_eq!(started["clue_number"], 1);

    // 2. Starting again is a contract violation
    let again = client
        .post(&format!("{}/api/hunt/start", address))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status().as_u16(), 409);

    // 3. Stopping early is rejected
    let early = client
        .post(&format!("{}/api/hunt/stop", address))
        .send()
        .await
        .unwrap();
    assert_eq!(early.status().as_u16(), 409);

    // 4. A wrong answer does not advance
    let wrong = answer(&client, &address, serde_json::json!({ "answer": "definitely wrong" })).await;
    assert_eq!(wrong["accepted"], false);
    assert_eq!(wrong["current_step"], 0);

    // 5. Answer every clue, padded and upper-cased
    let mut seen = Vec::new();
    for step in 1..=6 {
        let current = view(&client, &address).await;
        assert_eq!(current["screen"], "active");
        seen.push(current["question_id"].as_u64().unwrap());

        let padded = format!("  {}  ", expected_answer(&current).to_uppercase());
        let result = answer(
            &client,
            &address,
            serde_json::json!({ "question_id": current["question_id"], "answer": padded }),
        )
        .await;
        assert_eq!(result["accepted"], true);
        assert_eq!(result["current_step"], step);
    }
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);

    // 6. End screen awaits the stop
    let waiting = view(&client, &address).await;
    assert_eq!(waiting["screen"], "end");
    assert_eq!(waiting["awaiting_stop"], true);

    // 7. Stop
    let stopped = client
        .post(&format!("{}/api/hunt/stop", address))
        .send()
        .await
        .unwrap();
    assert_eq!(stopped.status().as_u16(), 200);
    let stopped: serde_json::Value = stopped.json().await.unwrap();
    assert_eq!(stopped["screen"], "end");
    assert_eq!(stopped["awaiting_stop"], false);
    assert_eq!(stopped["ran_out_of_time"], false);
    assert!(stopped["total_elapsed_seconds"].as_f64().unwrap() < 60.0);

    // 8. Stopping twice is rejected
    let twice = client
        .post(&format!("{}/api/hunt/stop", address))
        .send()
        .await
        .unwrap();
    assert_eq!(twice.status().as_u16(), 409);
}

#[tokio::test]
async fn oversized_answer_is_bad_request() {
    let address = spawn_app(3600).await;
    let client = participant();

    client
        .post(&format!("{}/api/hunt/start", address))
        .send()
        .await
        .unwrap();

    let response = client
        .post(&format!("{}/api/hunt/answer", address))
        .json(&serde_json::json!({ "answer": "x".repeat(500) }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let current = view(&client, &address).await;
    assert_eq!(current["clue_number"], 1);
}

#[tokio::test]
async fn sessions_do_not_share_state() {
    let address = spawn_app(3600).await;
    let alice = participant();
    let bob = participant();

    alice
        .post(&format!("{}/api/hunt/start", address))
        .send()
        .await
        .unwrap();

    assert_eq!(view(&alice, &address).await["screen"], "active");
    assert_eq!(view(&bob, &address).await["screen"], "start");
}

#[tokio::test]
async fn time_limit_forces_completion() {
    // One-second limit so the test does not wait an hour.
    let address = spawn_app(1).await;
    let client = participant();

    client
        .post(&format!("{}/api/hunt/start", address))
        .send()
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;

    let expired = view(&client, &address).await;
    assert_eq!(expired["screen"], "end");
    assert_eq!(expired["ran_out_of_time"], true);
    assert_eq!(expired["total_elapsed_seconds"], 1.0);

    // The expired session can still stop its timer; the total stays pinned.
    let stopped: serde_json::Value = client
        .post(&format!("{}/api/hunt/stop", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stopped["total_elapsed_seconds"], 1.0);
    assert_eq!(stopped["ran_out_of_time"], true);
}

#[tokio::test]
async fn html_page_flow() {
    let address = spawn_app(3600).await;
    let client = participant();

    // Start screen
    let page = client
        .get(&format!("{}/", address))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Welcome, Treasure Hunter!"));
    assert!(page.contains("action=\"/start\""));

    // Start via form; the redirect lands on the first clue
    let page = client
        .post(&format!("{}/start", address))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Clue #1"));

    // Wrong answer via form shows the failure indicator
    let response = client
        .post(&format!("{}/answer", address))
        .form(&[("answer", "wrong")])
        .send()
        .await
        .unwrap();
    assert!(response.url().as_str().ends_with("/?result=wrong"));
    let page = response.text().await.unwrap();
    assert!(page.contains("role=\"alert\""));
    assert!(page.contains("Clue #1"));

    // Correct answer via form moves on
    let current = view(&client, &address).await;
    let id = current["question_id"].as_u64().unwrap().to_string();
    let expected = expected_answer(&current);
    let page = client
        .post(&format!("{}/answer", address))
        .form(&[("question_id", id.as_str()), ("answer", expected.as_str())])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Clue #2"));
    assert!(!page.contains("role=\"alert\""));

    // A stale stop press just re-renders the current screen
    let response = client
        .post(&format!("{}/stop", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().contains("Clue #2"));
}

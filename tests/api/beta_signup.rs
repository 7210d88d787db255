//! tests/api/beta_signup.rs

use crate::helpers::{spawn_app, spawn_app_with, TestApp, CHAT_ID, OPERATOR_EMAIL};
use wiremock::matchers::any;
use wiremock::{Mock, ResponseTemplate};

const SIGNUP_EMAIL: &str = "ursula_le_guin@gmail.com";

#[tokio::test]
async fn beta_signup_returns_200_when_both_channels_deliver() {
    // Arrange
    let app = spawn_app().await;
    app.mock_email_api(200, 1).await;
    app.mock_telegram_api(200, 1).await;

    // Act
    let response = app
        .post_beta_signup(&serde_json::json!({ "email": SIGNUP_EMAIL }))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Thank you for signing up! You'll be notified when the beta is ready."
    );
}

#[tokio::test]
async fn outbound_payloads_contain_the_email_exactly_once() {
    // Arrange
    let app = spawn_app().await;
    app.mock_email_api(200, 1).await;
    app.mock_telegram_api(200, 1).await;

    // Act
    app.post_beta_signup(&serde_json::json!({ "email": SIGNUP_EMAIL }))
        .await;

    // Assert
    let email_request = &TestApp::received_bodies(&app.email_server).await[0];
    assert_eq!(email_request["from"], "noreply@yourdomain.com");
    assert_eq!(email_request["to"], serde_json::json!([OPERATOR_EMAIL]));
    assert_eq!(email_request["subject"], "New Caffeine Clock Beta Signup");
    assert_eq!(email_request.to_string().matches(SIGNUP_EMAIL).count(), 1);

    let chat_request = &TestApp::received_bodies(&app.telegram_server).await[0];
    assert_eq!(chat_request["chat_id"], CHAT_ID.parse::<i64>().unwrap());
    assert_eq!(chat_request.to_string().matches(SIGNUP_EMAIL).count(), 1);
}

#[tokio::test]
async fn email_is_trimmed_before_notifying() {
    // Arrange
    let app = spawn_app().await;
    app.mock_email_api(200, 1).await;
    app.mock_telegram_api(200, 1).await;

    // Act
    let response = app
        .post_beta_signup(&serde_json::json!({ "email": format!("  {}  ", SIGNUP_EMAIL) }))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let chat_request = &TestApp::received_bodies(&app.telegram_server).await[0];
    assert!(chat_request["text"]
        .as_str()
        .unwrap()
        .contains(&format!("Email: {}\n", SIGNUP_EMAIL)));
}

#[tokio::test]
async fn email_api_failure_returns_a_generic_500_and_skips_the_chat() {
    // Arrange
    let app = spawn_app().await;
    app.mock_email_api(500, 1).await;
    app.mock_telegram_api(200, 0).await;

    // Act
    let response = app
        .post_beta_signup(&serde_json::json!({ "email": SIGNUP_EMAIL }))
        .await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "INTERNAL_SERVER_ERROR");
    assert_eq!(
        body["error"]["message"],
        "Failed to process signup. Please try again."
    );
}

#[tokio::test]
async fn chat_api_failure_returns_the_same_generic_500() {
    // Arrange
    let app = spawn_app().await;
    app.mock_email_api(200, 1).await;
    app.mock_telegram_api(400, 1).await;

    // Act
    let response = app
        .post_beta_signup(&serde_json::json!({ "email": SIGNUP_EMAIL }))
        .await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["error"]["message"],
        "Failed to process signup. Please try again."
    );
    // nothing about the chat channel leaks to the user
    assert!(!body.to_string().contains("chat"));
}

#[tokio::test]
async fn missing_email_credentials_still_deliver_to_the_chat() {
    // Arrange
    let app = spawn_app_with(|c| c.email_client.api_key = None).await;
    app.mock_email_api(200, 0).await;
    app.mock_telegram_api(200, 1).await;

    // Act
    let response = app
        .post_beta_signup(&serde_json::json!({ "email": SIGNUP_EMAIL }))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn missing_chat_credentials_succeed_on_email_alone() {
    // Arrange
    let app = spawn_app_with(|c| {
        c.telegram.bot_token = None;
        c.telegram.chat_id = None;
    })
    .await;
    app.mock_email_api(200, 1).await;
    app.mock_telegram_api(200, 0).await;

    // Act
    let response = app
        .post_beta_signup(&serde_json::json!({ "email": SIGNUP_EMAIL }))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn repeated_signups_are_not_deduplicated() {
    // Arrange
    let app = spawn_app().await;
    app.mock_email_api(200, 2).await;
    app.mock_telegram_api(200, 2).await;

    // Act
    for _ in 0..2 {
        let response = app
            .post_beta_signup(&serde_json::json!({ "email": SIGNUP_EMAIL }))
            .await;
        assert_eq!(200, response.status().as_u16());
    }

    // Assert
    // Mock expectations are checked on drop
}

#[tokio::test]
async fn beta_signup_returns_400_for_invalid_emails_without_calling_out() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.telegram_server)
        .await;
    let test_cases = vec![
        ("not-an-email", "Please enter a valid email address", "invalid email"),
        ("@gmail.com", "Please enter a valid email address", "missing local part"),
        ("", "Please enter your email address", "empty email"),
        ("   ", "Please enter your email address", "whitespace email"),
    ];

    for (email, message, description) in test_cases {
        // Act
        let response = app
            .post_beta_signup(&serde_json::json!({ "email": email }))
            .await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert_eq!(body["error"]["message"], message, "payload was {}", description);
    }
}

#[tokio::test]
async fn beta_signup_returns_400_when_data_is_missing() {
    // Arrange
    let app = spawn_app().await;
    let test_cases = vec![
        ("{}", "missing the email"),
        (r#"{"email": 42}"#, "email is not a string"),
        ("email=ursula", "not json"),
    ];

    for (invalid_body, description) in test_cases {
        // Act
        let response = app.post_raw_beta_signup(invalid_body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            // Additional customized error message on test failure
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}

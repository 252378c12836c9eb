//! Contact form validation.
//!
//! Rejected forms never reach the database, so they are checked in-process.
//! Storing a valid submission is covered by the live tests.

use axum::http::StatusCode;
use portfolio_core::SubmissionId;
use portfolio_integration_tests::{TestClient, body_text};
use portfolio_site::models::{ContactForm, NewSubmission, SubmissionError};
use portfolio_site::services::SubmissionEvent;

fn valid_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Ada Lovelace"),
        ("email", "ada@example.com"),
        ("phone", ""),
        ("subject", "Project enquiry"),
        ("message", "Would you be free to chat next week?"),
    ]
}

fn with(field: &str, value: &'static str) -> Vec<(&'static str, &'static str)> {
    valid_fields()
        .into_iter()
        .map(|(k, v)| if k == field { (k, value) } else { (k, v) })
        .collect()
}

#[tokio::test]
async fn test_contact_page_renders() {
    let mut client = TestClient::at_local_hour(12);

    let resp = client.get("/contact").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains(r#"action="/contact""#));
    assert!(!html.contains("Thanks!"));

    let html = body_text(client.get("/contact?sent=true").await).await;
    assert!(html.contains("Thanks! Your message has been sent."));
}

#[tokio::test]
async fn test_blank_required_fields_are_rejected() {
    let mut client = TestClient::at_local_hour(12);

    for (field, label) in [("name", "name"), ("subject", "subject"), ("message", "message")] {
        let resp = client.post_form("/contact", &with(field, "   ")).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{field}");
        let html = body_text(resp).await;
        assert!(html.contains(&format!("Please fill in your {label}.")), "{field}");
    }
}

#[tokio::test]
async fn test_malformed_email_is_rejected() {
    let mut client = TestClient::at_local_hour(12);

    let resp = client.post_form("/contact", &with("email", "not-an-email")).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(resp).await;
    assert!(html.contains("Please enter a valid email address."));
    // The visitor's input is kept
    assert!(html.contains("Project enquiry"));
    assert!(html.contains("Ada Lovelace"));
}

#[tokio::test]
async fn test_unstored_submissions_reach_no_dashboard() {
    let mut client = TestClient::at_local_hour(12);
    let mut feed = client.state().submissions().subscribe();

    let resp = client.post_form("/contact", &with("email", "not-an-email")).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Valid, but the database is unreachable
    let resp = client.post_form("/contact", &valid_fields()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let marker = SubmissionEvent::Deleted {
        id: SubmissionId::new(-1),
    };
    client.state().submissions().publish(marker);
    assert_eq!(feed.next().await, Some(marker));
}

#[test]
fn test_missing_phone_is_accepted() {
    let form = ContactForm {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: None,
        subject: "Project enquiry".to_string(),
        message: "Hello".to_string(),
    };
    let new = NewSubmission::try_from(&form).expect("valid form");
    assert!(new.phone.is_none());

    let blank = ContactForm {
        phone: Some("  ".to_string()),
        ..form
    };
    assert!(NewSubmission::try_from(&blank).expect("valid form").phone.is_none());
}

#[test]
fn test_overlong_message_is_rejected() {
    let form = ContactForm {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        phone: None,
        subject: "Hi".to_string(),
        message: "x".repeat(5001),
    };
    assert!(matches!(
        NewSubmission::try_from(&form),
        Err(SubmissionError::TooLong { field: "message", .. })
    ));
}

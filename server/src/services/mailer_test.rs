use super::*;

fn sample_email() -> ResetEmail {
    ResetEmail {
        to: "ada@example.com".to_owned(),
        name: "Ada".to_owned(),
        link: "http://localhost:3000/reset?token=abc".to_owned(),
        ttl_minutes: 45,
    }
}

#[test]
fn render_template_injects_name_link_and_ttl() {
    let html = render_password_reset(&sample_email());
    assert!(html.contains("Hi Ada,"));
    assert!(html.contains("http://localhost:3000/reset?token=abc"));
    assert!(html.contains("45 minutes"));
    assert!(!html.contains("{{NAME}}"));
    assert!(!html.contains("{{LINK}}"));
    assert!(!html.contains("{{TTL_MINUTES}}"));
}

#[test]
fn account_name_is_rendered_as_text() {
    let email = ResetEmail {
        name: r#"<a href="https://evil.example/steal">Click here to reset</a>"#.to_owned(),
        ..sample_email()
    };
    let html = render_password_reset(&email);
    assert!(!html.contains("<a href=\"https://evil.example"));
    assert!(html.contains("Hi &lt;a href=\"https://evil.example/steal\"&gt;Click here to reset&lt;/a&gt;,"));
}

#[test]
fn account_name_cannot_inject_placeholders() {
    let email = ResetEmail { name: "{{LINK}} {{TTL_MINUTES}}".to_owned(), ..sample_email() };
    let html = render_password_reset(&email);
    assert!(html.contains("Hi {{LINK}} {{TTL_MINUTES}},"));
}

#[tokio::test]
async fn log_mailer_always_succeeds() {
    assert!(LogMailer.send_password_reset(&sample_email()).await.is_ok());
}

#[test]
fn mail_error_display() {
    let err = MailError::Delivery("timeout".into());
    assert_eq!(err.to_string(), "email delivery failed: timeout");
}

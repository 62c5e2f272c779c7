//! Backend-to-UI events and sign-in failure wording.

use client_core::{Alert, Session, UploadForm};

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    SignedIn(Session),
    SignInFailed(String),
    Alert(Alert),
    Navigate(String),
    UploadingChanged(bool),
    FormChanged(UploadForm),
}

pub fn classify_sign_in_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("backend worker startup failure") {
        "Backend worker startup failure; restart the app and retry.".to_string()
    } else if lower.contains("failed to connect")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
        || lower.contains("error sending request")
    {
        "Server unreachable; check URL/network and retry sign-in.".to_string()
    } else if lower.contains("401") || lower.contains("unauthorized") {
        "Sign-in rejected by the server; check the username.".to_string()
    } else {
        format!("Sign-in error: {message}")
    }
}

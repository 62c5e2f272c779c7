//! Backend commands queued from UI to backend worker.

use shared::domain::MediaKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    SignIn {
        server_url: String,
        username: String,
    },
    SetTitle(String),
    SetPrompt(String),
    PickMedia(MediaKind),
    Submit,
}

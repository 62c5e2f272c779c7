use super::*;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::domain::VideoId;
use std::sync::Mutex as StdMutex;
use tokio::sync::{oneshot, Notify};

use crate::AlertKind;

#[derive(Debug, Clone, PartialEq)]
enum FeedbackEvent {
    Alert(Alert),
    Navigate(String),
    Uploading(bool),
    FormChanged(UploadForm),
}

#[derive(Default)]
struct RecordingFeedback {
    events: StdMutex<Vec<FeedbackEvent>>,
}

impl RecordingFeedback {
    fn events(&self) -> Vec<FeedbackEvent> {
        self.events.lock().expect("feedback lock").clone()
    }

    fn alerts(&self) -> Vec<Alert> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                FeedbackEvent::Alert(alert) => Some(alert),
                _ => None,
            })
            .collect()
    }

    fn navigations(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                FeedbackEvent::Navigate(route) => Some(route),
                _ => None,
            })
            .collect()
    }

    fn uploading_changes(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                FeedbackEvent::Uploading(value) => Some(value),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: FeedbackEvent) {
        self.events.lock().expect("feedback lock").push(event);
    }
}

impl FormFeedback for RecordingFeedback {
    fn alert(&self, alert: Alert) {
        self.push(FeedbackEvent::Alert(alert));
    }

    fn navigate(&self, route: &str) {
        self.push(FeedbackEvent::Navigate(route.to_string()));
    }

    fn uploading_changed(&self, uploading: bool) {
        self.push(FeedbackEvent::Uploading(uploading));
    }

    fn form_changed(&self, form: &UploadForm) {
        self.push(FeedbackEvent::FormChanged(form.clone()));
    }
}

struct ScriptedPicker {
    responses: StdMutex<Vec<Result<PickerResponse>>>,
    requests: StdMutex<Vec<PickerRequest>>,
}

impl ScriptedPicker {
    fn new(responses: Vec<Result<PickerResponse>>) -> Self {
        Self {
            responses: StdMutex::new(responses),
            requests: StdMutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<PickerRequest> {
        self.requests.lock().expect("picker lock").clone()
    }
}

#[async_trait]
impl MediaPicker for ScriptedPicker {
    async fn pick(&self, request: PickerRequest) -> Result<PickerResponse> {
        self.requests.lock().expect("picker lock").push(request);
        let mut responses = self.responses.lock().expect("picker lock");
        if responses.is_empty() {
            return Ok(PickerResponse::Cancelled);
        }
        responses.remove(0)
    }
}

struct TestCreator {
    fail_with: Option<String>,
    payloads: StdMutex<Vec<CreateVideoPayload>>,
    started: Arc<Notify>,
    release: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
}

impl TestCreator {
    fn ok() -> Self {
        Self {
            fail_with: None,
            payloads: StdMutex::new(Vec::new()),
            started: Arc::new(Notify::new()),
            release: tokio::sync::Mutex::new(None),
        }
    }

    fn failing(err: impl Into<String>) -> Self {
        Self {
            fail_with: Some(err.into()),
            ..Self::ok()
        }
    }

    fn gated() -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        let creator = Self {
            release: tokio::sync::Mutex::new(Some(rx)),
            ..Self::ok()
        };
        (creator, tx)
    }

    fn payloads(&self) -> Vec<CreateVideoPayload> {
        self.payloads.lock().expect("creator lock").clone()
    }
}

#[async_trait]
impl VideoCreator for TestCreator {
    async fn create(&self, payload: CreateVideoPayload) -> Result<VideoDocument> {
        self.payloads
            .lock()
            .expect("creator lock")
            .push(payload.clone());
        self.started.notify_one();

        let gate = self.release.lock().await.take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if let Some(err) = &self.fail_with {
            return Err(anyhow!(err.clone()));
        }
        Ok(VideoDocument {
            video_id: VideoId(1),
            title: payload.title,
            prompt: payload.prompt,
            thumbnail_url: "http://cdn/thumb.png".to_string(),
            video_url: "http://cdn/clip.mp4".to_string(),
            creator: payload.author_id,
            created_at: "2024-01-01T00:00:00Z".parse().expect("timestamp"),
        })
    }
}

fn asset_a() -> MediaAsset {
    MediaAsset::from_uri("file:///library/cat.mp4").with_mime_type("video/mp4")
}

fn asset_b() -> MediaAsset {
    MediaAsset::from_uri("file:///library/cat.png").with_mime_type("image/png")
}

fn complete_form() -> UploadForm {
    UploadForm::default()
        .with_title("Cat")
        .with_media(MediaKind::Video, asset_a())
        .with_media(MediaKind::Image, asset_b())
        .with_prompt("a cat")
}

async fn fill(controller: &UploadFormController, form: &UploadForm) {
    *controller.form.lock().await = form.clone();
}

fn controller_with(
    picker: Arc<dyn MediaPicker>,
    creator: Arc<dyn VideoCreator>,
    feedback: Arc<RecordingFeedback>,
) -> UploadFormController {
    UploadFormController::new(UserId(42), picker, creator, feedback)
}

#[test]
fn missing_fields_reports_every_gap_in_form_order() {
    assert_eq!(
        UploadForm::default().missing_fields(),
        vec![
            FormField::Title,
            FormField::Video,
            FormField::Thumbnail,
            FormField::Prompt
        ]
    );
    assert!(complete_form().missing_fields().is_empty());
    assert_eq!(
        complete_form().with_title("").to_payload(UserId(1)),
        Err(vec![FormField::Title])
    );
}

#[test]
fn payload_carries_author_and_assets() {
    let payload = complete_form().to_payload(UserId(9)).expect("complete");
    assert_eq!(payload.author_id, UserId(9));
    assert_eq!(payload.video, asset_a());
    assert_eq!(payload.thumbnail, asset_b());
    assert_eq!(payload.title, "Cat");
    assert_eq!(payload.prompt, "a cat");
}

#[tokio::test]
async fn selecting_image_sets_thumbnail_from_first_asset_only() {
    let second = MediaAsset::from_uri("file:///library/other.png");
    let picker = Arc::new(ScriptedPicker::new(vec![Ok(PickerResponse::Selected(vec![
        asset_b(),
        second,
    ]))]));
    let feedback = Arc::new(RecordingFeedback::default());
    let controller = controller_with(picker.clone(), Arc::new(TestCreator::ok()), feedback);
    let before = UploadForm::default()
        .with_title("Cat")
        .with_media(MediaKind::Video, asset_a())
        .with_prompt("a cat");
    fill(&controller, &before).await;

    assert!(controller.select_media(MediaKind::Image).await);

    let after = controller.form().await;
    assert_eq!(after.thumbnail, Some(asset_b()));
    assert_eq!(after.video, before.video);
    assert_eq!(after.title, before.title);
    assert_eq!(after.prompt, before.prompt);
    assert_eq!(picker.requests(), vec![PickerRequest::for_kind(MediaKind::Image)]);
}

#[tokio::test]
async fn selecting_video_sets_video_slot() {
    let picker = Arc::new(ScriptedPicker::new(vec![Ok(PickerResponse::Selected(vec![
        asset_a(),
    ]))]));
    let feedback = Arc::new(RecordingFeedback::default());
    let controller = controller_with(picker, Arc::new(TestCreator::ok()), feedback.clone());
    let before = UploadForm::default()
        .with_media(MediaKind::Image, asset_b())
        .with_title("Cat");
    fill(&controller, &before).await;

    assert!(controller.select_media(MediaKind::Video).await);

    let after = controller.form().await;
    assert_eq!(after.video, Some(asset_a()));
    assert_eq!(after.thumbnail, Some(asset_b()));
    assert_eq!(after.title, "Cat");
    assert!(after.prompt.is_empty());
    assert!(feedback
        .events()
        .contains(&FeedbackEvent::FormChanged(after.clone())));
}

#[tokio::test]
async fn cancelled_or_failed_picker_leaves_form_unchanged() {
    let picker = Arc::new(ScriptedPicker::new(vec![
        Ok(PickerResponse::Cancelled),
        Ok(PickerResponse::Cancelled),
        Err(anyhow!("permission denied")),
        Ok(PickerResponse::Selected(Vec::new())),
    ]));
    let feedback = Arc::new(RecordingFeedback::default());
    let controller = controller_with(picker, Arc::new(TestCreator::ok()), feedback.clone());
    let before = complete_form();
    fill(&controller, &before).await;

    assert!(!controller.select_media(MediaKind::Image).await);
    assert!(!controller.select_media(MediaKind::Video).await);
    assert!(!controller.select_media(MediaKind::Image).await);
    assert!(!controller.select_media(MediaKind::Video).await);

    assert_eq!(controller.form().await, before);
    assert!(feedback.events().is_empty());
}

#[tokio::test]
async fn text_edits_replace_only_their_field() {
    let feedback = Arc::new(RecordingFeedback::default());
    let controller = controller_with(
        Arc::new(ScriptedPicker::new(Vec::new())),
        Arc::new(TestCreator::ok()),
        feedback,
    );

    controller.set_title("Cat").await;
    controller.set_prompt("a cat").await;
    controller.set_title("Dog").await;

    let form = controller.form().await;
    assert_eq!(form.title, "Dog");
    assert_eq!(form.prompt, "a cat");
    assert!(form.video.is_none());
}

#[tokio::test]
async fn successful_submit_alerts_navigates_and_resets() {
    let creator = Arc::new(TestCreator::ok());
    let feedback = Arc::new(RecordingFeedback::default());
    let controller = controller_with(
        Arc::new(ScriptedPicker::new(Vec::new())),
        creator.clone(),
        feedback.clone(),
    );
    fill(&controller, &complete_form()).await;

    let outcome = controller.submit().await;

    match outcome {
        SubmitOutcome::Published(document) => assert_eq!(document.title, "Cat"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    let payloads = creator.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].author_id, UserId(42));
    assert_eq!(payloads[0].video, asset_a());
    assert_eq!(payloads[0].thumbnail, asset_b());

    let alerts = feedback.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::Success);
    assert_eq!(alerts[0].title, "Success!");
    assert_eq!(alerts[0].message, "Post uploaded successfully");
    assert_eq!(feedback.navigations(), vec!["/home".to_string()]);
    assert_eq!(feedback.uploading_changes(), vec![true, false]);

    assert!(controller.form().await.is_empty());
    assert!(!controller.is_uploading());
}

#[tokio::test]
async fn landing_route_is_configurable() {
    let feedback = Arc::new(RecordingFeedback::default());
    let controller = controller_with(
        Arc::new(ScriptedPicker::new(Vec::new())),
        Arc::new(TestCreator::ok()),
        feedback.clone(),
    )
    .with_landing_route("/feed");
    fill(&controller, &complete_form()).await;

    controller.submit().await;

    assert_eq!(feedback.navigations(), vec!["/feed".to_string()]);
}

#[tokio::test]
async fn incomplete_form_warns_and_never_calls_creator() {
    let creator = Arc::new(TestCreator::ok());
    let feedback = Arc::new(RecordingFeedback::default());
    let controller = controller_with(
        Arc::new(ScriptedPicker::new(Vec::new())),
        creator.clone(),
        feedback.clone(),
    );
    fill(
        &controller,
        &UploadForm::default()
            .with_media(MediaKind::Video, asset_a())
            .with_media(MediaKind::Image, asset_b())
            .with_prompt("x"),
    )
    .await;

    let outcome = controller.submit().await;

    assert_eq!(outcome, SubmitOutcome::Incomplete(vec![FormField::Title]));
    assert!(creator.payloads().is_empty());
    assert_eq!(
        feedback.alerts(),
        vec![Alert::warning("Please fill in all required fields")]
    );
    assert!(feedback.uploading_changes().is_empty());
    assert!(feedback.navigations().is_empty());
    assert!(controller.form().await.is_empty());
    assert!(!controller.is_uploading());
}

#[tokio::test]
async fn failed_create_alerts_raw_message_without_navigation() {
    let feedback = Arc::new(RecordingFeedback::default());
    let controller = controller_with(
        Arc::new(ScriptedPicker::new(Vec::new())),
        Arc::new(TestCreator::failing("network down")),
        feedback.clone(),
    );
    fill(&controller, &complete_form()).await;

    let outcome = controller.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed("network down".to_string()));
    let alerts = feedback.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::Error);
    assert_eq!(alerts[0].title, "Error");
    assert!(alerts[0].message.contains("network down"));
    assert!(feedback.navigations().is_empty());
    assert_eq!(feedback.uploading_changes(), vec![true, false]);
    assert!(controller.form().await.is_empty());
    assert!(!controller.is_uploading());
}

#[tokio::test]
async fn uploading_flag_holds_until_creation_completes() {
    let (creator, release) = TestCreator::gated();
    let creator = Arc::new(creator);
    let started = creator.started.clone();
    let feedback = Arc::new(RecordingFeedback::default());
    let controller = Arc::new(controller_with(
        Arc::new(ScriptedPicker::new(Vec::new())),
        creator.clone(),
        feedback.clone(),
    ));
    fill(&controller, &complete_form()).await;
    assert!(!controller.is_uploading());

    let task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit().await }
    });
    started.notified().await;

    assert!(controller.is_uploading());
    assert_eq!(feedback.uploading_changes(), vec![true]);
    assert!(feedback.alerts().is_empty());

    release.send(()).expect("release creator");
    let outcome = task.await.expect("join submit");

    assert!(matches!(outcome, SubmitOutcome::Published(_)));
    assert!(!controller.is_uploading());
    assert_eq!(feedback.uploading_changes(), vec![true, false]);
}

#[tokio::test]
async fn second_submit_while_in_flight_is_ignored() {
    let (creator, release) = TestCreator::gated();
    let creator = Arc::new(creator);
    let started = creator.started.clone();
    let feedback = Arc::new(RecordingFeedback::default());
    let controller = Arc::new(controller_with(
        Arc::new(ScriptedPicker::new(Vec::new())),
        creator.clone(),
        feedback.clone(),
    ));
    fill(&controller, &complete_form()).await;

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit().await }
    });
    started.notified().await;

    let second = controller.submit().await;
    assert_eq!(second, SubmitOutcome::AlreadyInFlight);
    assert_eq!(controller.form().await, complete_form());

    release.send(()).expect("release creator");
    let first = first.await.expect("join submit");

    assert!(matches!(first, SubmitOutcome::Published(_)));
    assert_eq!(creator.payloads().len(), 1);
    assert_eq!(feedback.navigations().len(), 1);
}

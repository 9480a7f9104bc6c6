mod common;

use common::{contact, hauling, image, init_tracing, lead_service, moving, FakeUploader, RecordingLeadRepo};
use estimate_backend::model::service_details::ServiceDetails;
use estimate_backend::service::lead_service::{
    LeadService, SubmissionOutcome, IMAGES_NOT_ATTACHED_MESSAGE, SUBMISSION_FAILED_MESSAGE,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_no_images_stores_lead_without_image_urls() {
    init_tracing();
    let repo = Arc::new(RecordingLeadRepo::default());
    let service = lead_service(repo.clone(), Arc::new(FakeUploader::default()));

    let outcome = service
        .submit_lead(&contact(), &ServiceDetails::CustomHauling(hauling()), &[])
        .await;

    assert!(matches!(outcome, SubmissionOutcome::Submitted { .. }));
    assert_eq!(outcome.notice(), None);
    let lead = outcome.lead().unwrap();
    assert!(lead.id.is_some());
    assert!(lead.form_data.image_urls.is_none());
    assert_eq!(repo.call_count(), 1);
}

#[tokio::test]
async fn test_partial_upload_failure_still_submits() {
    let repo = Arc::new(RecordingLeadRepo::default());
    let uploader = Arc::new(FakeUploader::failing_on(&["b.jpg"]));
    let service = lead_service(repo.clone(), uploader.clone());

    let images = vec![image("a.jpg", 10), image("b.jpg", 10), image("c.jpg", 10)];
    let outcome = service
        .submit_lead(&contact(), &ServiceDetails::Moving(moving()), &images)
        .await;

    match &outcome {
        SubmissionOutcome::SubmittedWithSkippedImages { lead, attached, skipped } => {
            assert_eq!(*attached, 2);
            assert_eq!(*skipped, 1);
            assert_eq!(
                lead.form_data.image_urls,
                Some(vec![
                    "https://cdn.test/lead-images/a.jpg".to_string(),
                    "https://cdn.test/lead-images/c.jpg".to_string(),
                ])
            );
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    // some photos made it, so no notice
    assert_eq!(outcome.notice(), None);
    assert_eq!(repo.call_count(), 1);
    assert_eq!(uploader.uploaded(), vec!["a.jpg", "c.jpg"]);
}

#[tokio::test]
async fn test_all_uploads_failing_omits_image_urls_and_warns() {
    let repo = Arc::new(RecordingLeadRepo::default());
    let uploader = Arc::new(FakeUploader::failing_on(&["a.jpg", "b.jpg"]));
    let service = lead_service(repo.clone(), uploader);

    let outcome = service
        .submit_lead(
            &contact(),
            &ServiceDetails::Moving(moving()),
            &[image("a.jpg", 10), image("b.jpg", 10)],
        )
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.notice(), Some(IMAGES_NOT_ATTACHED_MESSAGE));
    let value = serde_json::to_value(outcome.lead().unwrap()).unwrap();
    assert!(value["form_data"].get("imageUrls").is_none());
    assert_eq!(repo.call_count(), 1);
}

#[tokio::test]
async fn test_hanging_upload_is_skipped_after_timeout() {
    let repo = Arc::new(RecordingLeadRepo::default());
    let uploader = Arc::new(FakeUploader::hanging_on(&["slow.jpg"]));
    let service = lead_service(repo.clone(), uploader);

    let outcome = service
        .submit_lead(
            &contact(),
            &ServiceDetails::Moving(moving()),
            &[image("slow.jpg", 10), image("fast.jpg", 10)],
        )
        .await;

    match outcome {
        SubmissionOutcome::SubmittedWithSkippedImages { attached, skipped, .. } => {
            assert_eq!((attached, skipped), (1, 1));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_store_failure_reports_failed() {
    let repo = Arc::new(RecordingLeadRepo::failing());
    let service = lead_service(repo.clone(), Arc::new(FakeUploader::default()));

    let outcome = service
        .submit_lead(&contact(), &ServiceDetails::CustomHauling(hauling()), &[image("a.jpg", 10)])
        .await;

    assert!(!outcome.is_success());
    assert!(outcome.lead().is_none());
    assert_eq!(outcome.notice(), Some(SUBMISSION_FAILED_MESSAGE));
    assert_eq!(repo.call_count(), 1);
}

#[tokio::test]
async fn test_slow_store_times_out_as_failed() {
    let repo = Arc::new(RecordingLeadRepo::slow(Duration::from_secs(5)));
    let service = lead_service(repo.clone(), Arc::new(FakeUploader::default()));

    let outcome = service
        .submit_lead(&contact(), &ServiceDetails::CustomHauling(hauling()), &[])
        .await;

    match outcome {
        SubmissionOutcome::Failed { reason } => assert!(reason.starts_with("Timeout")),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(repo.stored().is_empty());
}

#[test]
fn test_outcome_serializes_with_status_tag() {
    let outcome = SubmissionOutcome::Failed { reason: "boom".to_string() };
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        serde_json::json!({ "status": "failed", "reason": "boom" })
    );
}

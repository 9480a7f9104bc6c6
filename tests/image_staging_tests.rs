mod common;

use common::{image, init_tracing};
use estimate_backend::config::estimate_conf::{DEFAULT_MAX_IMAGES, DEFAULT_MAX_IMAGE_BYTES};
use estimate_backend::form::{ImageStaging, StageOutcome, StagingNotice};

fn default_staging() -> ImageStaging {
    ImageStaging::new(DEFAULT_MAX_IMAGE_BYTES, DEFAULT_MAX_IMAGES)
}

#[test]
fn test_oversized_file_is_never_staged() {
    init_tracing();
    let mut staging = default_staging();

    let notice = staging
        .stage(image("couch.jpg", DEFAULT_MAX_IMAGE_BYTES + 1))
        .unwrap_err();

    assert!(staging.is_empty());
    assert_eq!(notice.to_string(), "couch.jpg is larger than 5MB");
    assert_eq!(
        notice,
        StagingNotice::TooLarge {
            file_name: "couch.jpg".to_string(),
            size: DEFAULT_MAX_IMAGE_BYTES + 1,
            limit_mb: 5,
        }
    );
}

#[test]
fn test_file_exactly_at_limit_is_staged() {
    let mut staging = default_staging();
    assert_eq!(
        staging.stage(image("exact.jpg", DEFAULT_MAX_IMAGE_BYTES)),
        Ok(StageOutcome::Added)
    );
    assert_eq!(staging.len(), 1);
}

#[test]
fn test_sixth_file_leaves_five_staged() {
    let mut staging = default_staging();
    for i in 0..5 {
        assert_eq!(staging.stage(image(&format!("{i}.jpg"), 10)), Ok(StageOutcome::Added));
    }

    assert_eq!(staging.stage(image("5.jpg", 10)), Ok(StageOutcome::CapReached));

    let names: Vec<&str> = staging.images().iter().map(|i| i.file_name.as_str()).collect();
    assert_eq!(names, vec!["0.jpg", "1.jpg", "2.jpg", "3.jpg", "4.jpg"]);
}

#[test]
fn test_batch_reports_only_oversized_files() {
    let mut staging = ImageStaging::new(100, 3);
    let notices = staging.stage_all(vec![
        image("a.jpg", 10),
        image("huge.png", 101),
        image("b.jpg", 10),
        image("c.jpg", 10),
        image("d.jpg", 10),
    ]);

    assert_eq!(notices.len(), 1);
    assert!(matches!(&notices[0], StagingNotice::TooLarge { file_name, .. } if file_name == "huge.png"));
    assert_eq!(staging.len(), 3);
    assert_eq!(staging.images()[2].file_name, "c.jpg");
}

#[test]
fn test_unstage_by_index_keeps_order() {
    let mut staging = default_staging();
    staging.stage_all(vec![image("a.jpg", 1), image("b.jpg", 1), image("c.jpg", 1)]);

    let removed = staging.unstage(1).expect("index in range");
    assert_eq!(removed.file_name, "b.jpg");

    let names: Vec<&str> = staging.images().iter().map(|i| i.file_name.as_str()).collect();
    assert_eq!(names, vec!["a.jpg", "c.jpg"]);

    assert!(staging.unstage(7).is_none());
    assert_eq!(staging.len(), 2);
}

#[test]
fn test_removing_frees_a_slot() {
    let mut staging = ImageStaging::new(100, 2);
    staging.stage_all(vec![image("a.jpg", 1), image("b.jpg", 1)]);
    assert_eq!(staging.stage(image("c.jpg", 1)), Ok(StageOutcome::CapReached));

    staging.unstage(0);
    assert_eq!(staging.stage(image("c.jpg", 1)), Ok(StageOutcome::Added));
    assert_eq!(staging.len(), 2);
}

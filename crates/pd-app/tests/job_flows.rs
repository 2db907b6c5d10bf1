//! Submission and status flows against the in-memory platform.

use pd_app::*;
use pd_cloud::{ApiCall, JobArgumentWire, MemoryJobApi};
use pd_core::{JobRef, ProjectRef, RecipeRef, RemoteStatus, SimStatus};
use serde_json::json;

fn request<'a>(model_path: &'a std::path::Path, radiance: Option<&str>) -> JobRequest<'a> {
    JobRequest {
        project: ProjectRef::new("ladybug-tools", "demo").unwrap(),
        recipe: RecipeRef::daylight_factor(),
        name: "test".to_string(),
        description: Some("Daylight-factor job for Pollination docs".to_string()),
        inputs: DaylightFactorInputs {
            cpu_count: 50,
            grid_filter: "*".to_string(),
            min_sensor_count: 200,
            radiance_parameters: radiance.map(str::to_string),
        },
        model_path,
    }
}

fn write_model(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("model.hbjson");
    std::fs::write(&path, r#"{"type": "Model", "identifier": "m"}"#).unwrap();
    path
}

#[test]
fn submit_uploads_then_creates() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write_model(&dir);
    let api = MemoryJobApi::new();

    let job = create_job(&api, &request(&model_path, None)).unwrap();
    assert_eq!(job.job_id, "job-1");

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    let ApiCall::Upload { key, .. } = &calls[0] else {
        panic!("first call must be the upload, got {:?}", calls[0]);
    };
    assert!(key.ends_with("/model.hbjson"));

    let ApiCall::CreateJob { body, .. } = &calls[1] else {
        panic!("second call must create the job, got {:?}", calls[1]);
    };
    assert_eq!(body.name, "test");
    assert_eq!(body.arguments.len(), 1);

    let args = serde_json::to_value(&body.arguments[0]).unwrap();
    assert_eq!(
        args,
        json!([
            { "type": "JobArgument", "name": "cpu-count", "value": 50 },
            { "type": "JobArgument", "name": "grid-filter", "value": "*" },
            { "type": "JobArgument", "name": "min-sensor-count", "value": 200 },
            {
                "type": "JobPathArgument",
                "name": "model",
                "source": { "type": "ProjectFolder", "path": key }
            }
        ])
    );
}

#[test]
fn radiance_parameters_are_forwarded() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write_model(&dir);
    let api = MemoryJobApi::new();

    create_job(&api, &request(&model_path, Some("-ab 2 -aa 0.1 -ad 2048 -ar 64"))).unwrap();

    let bodies = api.created_jobs();
    let names: Vec<_> = bodies[0].arguments[0]
        .iter()
        .map(JobArgumentWire::name)
        .collect();
    assert!(names.contains(&"radiance-parameters"));
    assert_eq!(names.len(), 5);
}

#[test]
fn missing_model_file_makes_no_remote_calls() {
    let dir = tempfile::tempdir().unwrap();
    let api = MemoryJobApi::new();
    let absent = dir.path().join("absent.hbjson");

    let err = create_job(&api, &request(&absent, None)).unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert!(api.calls().is_empty());
}

#[test]
fn separate_submissions_use_separate_upload_folders() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write_model(&dir);
    let api = MemoryJobApi::new();

    create_job(&api, &request(&model_path, None)).unwrap();
    create_job(&api, &request(&model_path, None)).unwrap();

    let keys: Vec<_> = api
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            ApiCall::Upload { key, .. } => Some(key),
            _ => None,
        })
        .collect();
    assert_eq!(keys.len(), 2);
    assert_ne!(keys[0], keys[1]);
}

#[test]
fn status_maps_and_links() {
    let api = MemoryJobApi::new();
    let job = JobRef::new("ladybug-tools", "demo", "job-7").unwrap();

    let cases = [
        (RemoteStatus::Created, SimStatus::Incomplete),
        (RemoteStatus::PreProcessing, SimStatus::Incomplete),
        (RemoteStatus::Running, SimStatus::Incomplete),
        (RemoteStatus::Unknown, SimStatus::Incomplete),
        (RemoteStatus::Failed, SimStatus::Failed),
        (RemoteStatus::Cancelled, SimStatus::Cancelled),
        (RemoteStatus::Completed, SimStatus::Complete),
    ];
    for (remote, expected) in cases {
        api.set_status("job-7", remote.clone());
        let report = get_job_status(&api, &job).unwrap();
        assert_eq!(report.status, expected, "{remote}");
        assert_eq!(report.remote, remote);
        assert_eq!(
            report.url,
            "https://app.pollination.cloud/projects/ladybug-tools/demo/jobs/job-7"
        );
    }
}

#[test]
fn each_status_call_fetches_again() {
    let api = MemoryJobApi::new();
    let job = JobRef::new("o", "p", "j").unwrap();
    api.set_status("j", RemoteStatus::Running);

    get_job_status(&api, &job).unwrap();
    api.set_status("j", RemoteStatus::Completed);
    let report = get_job_status(&api, &job).unwrap();

    assert_eq!(report.status, SimStatus::Complete);
    let fetches = api
        .calls()
        .iter()
        .filter(|c| matches!(c, ApiCall::GetJob { .. }))
        .count();
    assert_eq!(fetches, 2);
}

#[test]
fn unknown_job_surfaces_platform_error() {
    let api = MemoryJobApi::new();
    let job = JobRef::new("o", "p", "missing").unwrap();
    let err = get_job_status(&api, &job).unwrap_err();
    assert!(matches!(err, AppError::Cloud(ref e) if e.is_not_found()));
}

#[test]
fn custom_app_url() {
    let api = MemoryJobApi::new();
    let job = JobRef::new("o", "p", "j").unwrap();
    api.set_status("j", RemoteStatus::Running);
    let report = get_job_status_with_app(&api, &job, "http://localhost:3000").unwrap();
    assert_eq!(report.url, "http://localhost:3000/projects/o/p/jobs/j");
}

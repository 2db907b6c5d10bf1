use pd_cloud::*;
use pd_core::{ProjectRef, RecipeRef, RemoteStatus};

fn project() -> ProjectRef {
    ProjectRef::new("ladybug-tools", "demo").unwrap()
}

fn model_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("model.hbjson");
    std::fs::write(&path, r#"{"type": "Model", "identifier": "m"}"#).unwrap();
    path
}

#[test]
fn upload_happens_before_create() {
    let dir = tempfile::tempdir().unwrap();
    let api = MemoryJobApi::new();

    let mut job = NewJob::new(&api, project(), RecipeRef::daylight_factor(), "test")
        .with_upload_folder("inputs");
    let model = job.upload_artifact(&model_file(&dir), ".").unwrap();
    assert_eq!(model.path(), "inputs/model.hbjson");

    let mut args = JobArguments::new();
    args.integer("cpu-count", 2).artifact("model", model);
    job.set_arguments(vec![args]);
    let created = job.create().unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(&calls[0], ApiCall::Upload { key, .. } if key == "inputs/model.hbjson"));
    assert!(matches!(&calls[1], ApiCall::CreateJob { .. }));
    assert_eq!(created.job_id, "job-1");
    assert_eq!(created.project, project());
}

#[test]
fn artifact_not_uploaded_is_rejected() {
    let api = MemoryJobApi::new();
    let mut job = NewJob::new(&api, project(), RecipeRef::daylight_factor(), "test");

    let mut args = JobArguments::new();
    args.artifact("model", ArtifactRef::new("somewhere/model.hbjson"));
    job.set_arguments(vec![args]);

    let err = job.create().unwrap_err();
    assert!(matches!(err, CloudError::ArtifactNotUploaded { ref name, .. } if name == "model"));
    assert!(api.created_jobs().is_empty());
}

#[test]
fn artifact_from_another_job_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let api = MemoryJobApi::new();

    let mut first = NewJob::new(&api, project(), RecipeRef::daylight_factor(), "a");
    let model = first.upload_artifact(&model_file(&dir), ".").unwrap();

    let mut second = NewJob::new(&api, project(), RecipeRef::daylight_factor(), "b");
    let mut args = JobArguments::new();
    args.artifact("model", model);
    second.set_arguments(vec![args]);

    assert!(matches!(
        second.create(),
        Err(CloudError::ArtifactNotUploaded { .. })
    ));
}

#[test]
fn exactly_one_argument_set() {
    let api = MemoryJobApi::new();

    let job = NewJob::new(&api, project(), RecipeRef::daylight_factor(), "none");
    assert!(matches!(
        job.create(),
        Err(CloudError::ArgumentSetCount { count: 0 })
    ));

    let mut job = NewJob::new(&api, project(), RecipeRef::daylight_factor(), "two");
    job.set_arguments(vec![JobArguments::new(), JobArguments::new()]);
    assert!(matches!(
        job.create(),
        Err(CloudError::ArgumentSetCount { count: 2 })
    ));
}

#[test]
fn upload_of_missing_file_fails_without_create() {
    let api = MemoryJobApi::new();
    let mut job = NewJob::new(&api, project(), RecipeRef::daylight_factor(), "x");
    let err = job
        .upload_artifact(std::path::Path::new("/no/such/model.hbjson"), ".")
        .unwrap_err();
    assert!(matches!(err, CloudError::Io { .. }));
    assert!(api.calls().is_empty());
}

#[test]
fn body_carries_recipe_and_description() {
    let api = MemoryJobApi::new();
    let mut job = NewJob::new(&api, project(), RecipeRef::daylight_factor(), "df")
        .with_description("Daylight-factor job");
    let mut args = JobArguments::new();
    args.text("grid-filter", "*");
    job.set_arguments(vec![args]);

    let body = job.body().unwrap();
    assert_eq!(
        body.source,
        "https://api.pollination.cloud/registries/ladybug-tools/recipe/daylight-factor/latest"
    );
    assert_eq!(body.description.as_deref(), Some("Daylight-factor job"));
    assert_eq!(body.arguments.len(), 1);
}

#[test]
fn memory_api_tracks_status() {
    let api = MemoryJobApi::new();
    let job = project().job("job-9").unwrap();
    assert!(api.get_job(&job).unwrap_err().is_not_found());

    api.set_status("job-9", RemoteStatus::Running);
    assert_eq!(api.get_job(&job).unwrap().status.status, RemoteStatus::Running);
}

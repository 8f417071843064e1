//! End-to-end tests for outcome classification flowing into artifacts.

use async_trait::async_trait;
use econ_data_downloader::downloader::DatasetDownloader;
use econ_data_downloader::fetcher::{
    create_fetcher, FetchResult, HttpRunner, RequestOutcome, SourceFetcher,
};
use econ_data_downloader::{DatasetSpec, SourceType};
use serde_json::{json, Value};
use std::sync::Arc;

/// Stub returning one canned outcome regardless of year.
struct CannedFetcher {
    source_type: SourceType,
    payload: Option<Value>,
    status_code: Option<u16>,
}

#[async_trait]
impl SourceFetcher for CannedFetcher {
    fn source_type(&self) -> SourceType {
        self.source_type
    }

    async fn fetch_year(&self, _dataset_id: &str, _year: i32) -> FetchResult<RequestOutcome> {
        Ok(RequestOutcome {
            payload: self.payload.clone(),
            request: json!({"url": "https://stub.test/", "status_code": self.status_code}),
            status_code: self.status_code,
        })
    }
}

async fn run_one_year(
    source_type: SourceType,
    fetcher: &dyn SourceFetcher,
    dir: &std::path::Path,
) -> Value {
    let dataset = DatasetSpec::new("Test", "Series", source_type, "X");
    let downloader = DatasetDownloader::new()
        .with_data_dir(dir)
        .with_year_range(2018, 2018);
    downloader.run(&dataset, fetcher).await.unwrap();

    serde_json::from_str(
        &std::fs::read_to_string(dir.join("raw_json").join("test_series").join("2018.json"))
            .unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_empty_fred_observations_classify_as_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = CannedFetcher {
        source_type: SourceType::Fred,
        payload: Some(json!({"observations": []})),
        status_code: Some(200),
    };

    let artifact = run_one_year(SourceType::Fred, &fetcher, dir.path()).await;
    assert_eq!(artifact["status"], "error");
    assert_eq!(artifact["error_type"], "no_data_in_range");
    assert_eq!(artifact["recommended_action"], "accept_or_change_time_range");
}

#[tokio::test]
async fn test_census_header_only_rows_classify_as_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = CannedFetcher {
        source_type: SourceType::Census,
        payload: Some(json!([["NAME", "P1_001N", "state"]])),
        status_code: Some(200),
    };

    let artifact = run_one_year(SourceType::Census, &fetcher, dir.path()).await;
    assert_eq!(artifact["error_type"], "no_data_in_range");
}

#[tokio::test]
async fn test_not_found_status_maps_to_check_dataset_id() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = CannedFetcher {
        source_type: SourceType::Ecb,
        payload: Some(json!({"non_json_response": "not found", "content_type": "text/plain"})),
        status_code: Some(404),
    };

    let artifact = run_one_year(SourceType::Ecb, &fetcher, dir.path()).await;
    assert_eq!(artifact["status"], "error");
    assert_eq!(artifact["error_type"], "dataset_not_found");
    assert_eq!(artifact["recommended_action"], "fix_request");
}

#[tokio::test]
async fn test_auth_failure_maps_to_check_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = CannedFetcher {
        source_type: SourceType::Fred,
        payload: Some(json!({"error_message": "Bad API key"})),
        status_code: Some(403),
    };

    let artifact = run_one_year(SourceType::Fred, &fetcher, dir.path()).await;
    assert_eq!(artifact["error_type"], "auth_or_access");
    assert_eq!(artifact["recommended_action"], "check_api_key_or_permissions");
}

#[tokio::test]
async fn test_imf_stub_downloads_classify_as_missing_config() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(HttpRunner::new().unwrap());
    let fetcher = create_fetcher(SourceType::Imf, runner);

    let dataset = DatasetSpec::new("IMF", "World GDP Growth", SourceType::Imf, "");
    let downloader = DatasetDownloader::new()
        .with_data_dir(dir.path())
        .with_year_range(2000, 2001);

    let summary = downloader.run(&dataset, fetcher.as_ref()).await.unwrap();
    assert_eq!(summary.ok_years, 0);
    assert_eq!(summary.error_years, 2);

    let artifact: Value = serde_json::from_str(
        &std::fs::read_to_string(
            dir.path()
                .join("raw_json")
                .join("imf_world_gdp_growth")
                .join("2000.json"),
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(artifact["error_type"], "malformed_or_missing_config");
    assert_eq!(artifact["recommended_action"], "fix_request");
    assert!(artifact["response"]["error"]
        .as_str()
        .unwrap()
        .contains("Dataset URL is empty"));
}

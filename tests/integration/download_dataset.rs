//! End-to-end tests for the dataset download executor.
//!
//! Fetchers are stubbed so no network is involved; the tests exercise the
//! full fetch -> classify -> persist path against a temporary data
//! directory.

use async_trait::async_trait;
use econ_data_downloader::downloader::DatasetDownloader;
use econ_data_downloader::fetcher::{FetchError, FetchResult, RequestOutcome, SourceFetcher};
use econ_data_downloader::{DatasetSpec, SourceType};
use serde_json::{json, Value};

/// Stub fetcher returning a fixed payload for every year.
struct FixedPayloadFetcher {
    source_type: SourceType,
    payload: Value,
    status_code: u16,
}

#[async_trait]
impl SourceFetcher for FixedPayloadFetcher {
    fn source_type(&self) -> SourceType {
        self.source_type
    }

    async fn fetch_year(&self, dataset_id: &str, year: i32) -> FetchResult<RequestOutcome> {
        Ok(RequestOutcome {
            payload: Some(self.payload.clone()),
            request: json!({
                "url": format!("https://stub.test/{dataset_id}?year={year}"),
                "status_code": self.status_code,
            }),
            status_code: Some(self.status_code),
        })
    }
}

/// Stub fetcher that always fails with a retryable status.
struct AlwaysFailingFetcher {
    status: u16,
}

#[async_trait]
impl SourceFetcher for AlwaysFailingFetcher {
    fn source_type(&self) -> SourceType {
        SourceType::Fred
    }

    async fn fetch_year(&self, _dataset_id: &str, _year: i32) -> FetchResult<RequestOutcome> {
        Err(FetchError::RetryableStatus {
            status: self.status,
        })
    }
}

fn sample_dataset() -> DatasetSpec {
    DatasetSpec::new(
        "BLS",
        "US Unemployment",
        SourceType::Bls,
        "LNS14000000",
    )
}

fn bls_payload_with_data() -> Value {
    json!({
        "status": "REQUEST_SUCCEEDED",
        "Results": {
            "series": [
                {
                    "seriesID": "LNS14000000",
                    "data": [
                        {"year": "2001", "period": "M12", "value": "5.7"}
                    ]
                }
            ]
        }
    })
}

#[tokio::test]
async fn test_successful_run_writes_year_artifacts_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let downloader = DatasetDownloader::new()
        .with_data_dir(dir.path())
        .with_year_range(2001, 2003);
    let fetcher = FixedPayloadFetcher {
        source_type: SourceType::Bls,
        payload: bls_payload_with_data(),
        status_code: 200,
    };

    let summary = downloader
        .run(&sample_dataset(), &fetcher)
        .await
        .unwrap();

    assert_eq!(summary.ok_years, 3);
    assert_eq!(summary.error_years, 0);
    assert!(summary.errors.is_empty());
    assert_eq!(summary.years.len(), 3);

    let dataset_dir = dir.path().join("raw_json").join("bls_us_unemployment");
    for year in 2001..=2003 {
        assert!(dataset_dir.join(format!("{year}.json")).exists());
    }
    assert!(dataset_dir.join("_summary.json").exists());
}

#[tokio::test]
async fn test_year_artifact_layout_and_field_order() {
    let dir = tempfile::tempdir().unwrap();
    let downloader = DatasetDownloader::new()
        .with_data_dir(dir.path())
        .with_year_range(2005, 2005);
    let fetcher = FixedPayloadFetcher {
        source_type: SourceType::Bls,
        payload: bls_payload_with_data(),
        status_code: 200,
    };

    downloader.run(&sample_dataset(), &fetcher).await.unwrap();

    let artifact_path = dir
        .path()
        .join("raw_json")
        .join("bls_us_unemployment")
        .join("2005.json");
    let text = std::fs::read_to_string(&artifact_path).unwrap();
    let artifact: Value = serde_json::from_str(&text).unwrap();

    let keys: Vec<&str> = artifact
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        vec![
            "metadata",
            "year",
            "request",
            "status",
            "error_type",
            "recommended_action",
            "message",
            "response",
        ]
    );

    assert_eq!(artifact["metadata"]["group"], "BLS");
    assert_eq!(artifact["metadata"]["source_type"], "bls");
    assert_eq!(artifact["metadata"]["start_year"], 2005);
    assert_eq!(artifact["year"], 2005);
    assert_eq!(artifact["status"], "ok");
    assert_eq!(artifact["error_type"], "");
    assert_eq!(artifact["recommended_action"], "none");
    assert_eq!(artifact["message"], "Success");
    assert_eq!(artifact["response"], bls_payload_with_data());
}

#[tokio::test]
async fn test_rerun_overwrites_artifacts_byte_identically() {
    let dir = tempfile::tempdir().unwrap();
    let downloader = DatasetDownloader::new()
        .with_data_dir(dir.path())
        .with_year_range(2010, 2011);
    let fetcher = FixedPayloadFetcher {
        source_type: SourceType::Bls,
        payload: bls_payload_with_data(),
        status_code: 200,
    };
    let dataset = sample_dataset();

    downloader.run(&dataset, &fetcher).await.unwrap();
    let dataset_dir = dir.path().join("raw_json").join("bls_us_unemployment");
    let first_year = std::fs::read(dataset_dir.join("2010.json")).unwrap();
    let first_summary = std::fs::read(dataset_dir.join("_summary.json")).unwrap();

    downloader.run(&dataset, &fetcher).await.unwrap();
    let second_year = std::fs::read(dataset_dir.join("2010.json")).unwrap();
    let second_summary = std::fs::read(dataset_dir.join("_summary.json")).unwrap();

    assert_eq!(first_year, second_year);
    assert_eq!(first_summary, second_summary);
}

#[tokio::test]
async fn test_persistent_rate_limit_is_recorded_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let downloader = DatasetDownloader::new()
        .with_data_dir(dir.path())
        .with_year_range(1999, 2000);
    let fetcher = AlwaysFailingFetcher { status: 429 };
    let dataset = DatasetSpec::new(
        "35 Years",
        "Retirement Expenses (Age 65+)",
        SourceType::Fred,
        "CXUTOTALEXPLB0407M",
    );

    let summary = downloader.run(&dataset, &fetcher).await.unwrap();

    assert_eq!(summary.ok_years, 0);
    assert_eq!(summary.error_years, 2);
    assert_eq!(summary.errors.len(), 2);
    assert_eq!(summary.errors[0]["year"], 1999);
    assert_eq!(summary.errors[0]["error_type"], "rate_limited");
    assert_eq!(summary.errors[0]["recommended_action"], "retry_later");
    assert_eq!(summary.errors[0]["request"], json!({}));

    let artifact: Value = serde_json::from_str(
        &std::fs::read_to_string(
            dir.path()
                .join("raw_json")
                .join("35_years_retirement_expenses_age_65")
                .join("1999.json"),
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(artifact["status"], "error");
    assert_eq!(artifact["error_type"], "rate_limited");
    assert_eq!(artifact["response"], Value::Null);
}

#[tokio::test]
async fn test_summary_rollup_shape() {
    let dir = tempfile::tempdir().unwrap();
    let downloader = DatasetDownloader::new()
        .with_data_dir(dir.path())
        .with_year_range(2020, 2021);
    let fetcher = FixedPayloadFetcher {
        source_type: SourceType::Bls,
        payload: bls_payload_with_data(),
        status_code: 200,
    };

    downloader.run(&sample_dataset(), &fetcher).await.unwrap();

    let summary: Value = serde_json::from_str(
        &std::fs::read_to_string(
            dir.path()
                .join("raw_json")
                .join("bls_us_unemployment")
                .join("_summary.json"),
        )
        .unwrap(),
    )
    .unwrap();

    let keys: Vec<&str> = summary
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["metadata", "totals", "errors", "years"]);

    assert_eq!(summary["totals"]["ok"], 2);
    assert_eq!(summary["totals"]["error"], 0);
    assert_eq!(summary["years"].as_array().unwrap().len(), 2);
    assert_eq!(summary["years"][0]["year"], 2020);
    assert_eq!(summary["years"][0]["status"], "ok");
    assert_eq!(summary["metadata"]["dataset_id"], "LNS14000000");
}

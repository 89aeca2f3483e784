use std::fmt::Display;

use serde::Serialize;

use crate::error::ExtractionError;

/// Wall-clock time spent on one processing batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTiming {
    pub index: usize,
    pub files: usize,
    pub elapsed_ms: u64,
}

/// Counters and timings attached to every extraction result.
///
/// Pipeline fields are filled by [`crate::pipeline::run`]; `plugin`,
/// `version` and `execution_ms` are stamped by the plugin manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub discovered: usize,
    pub filtered: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub batches: Vec<BatchTiming>,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_ms: Option<u64>,
}

impl ExtractionMetadata {
    /// Copy with all timing information cleared, for comparing runs.
    pub fn without_timings(&self) -> Self {
        Self {
            batches: self
                .batches
                .iter()
                .map(|b| BatchTiming {
                    elapsed_ms: 0,
                    ..*b
                })
                .collect(),
            elapsed_ms: 0,
            execution_ms: None,
            ..self.clone()
        }
    }
}

/// Outcome of one `extract` call. Failures are values, never panics or errors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub metadata: ExtractionMetadata,
}

impl<T> ExtractionResult<T> {
    pub fn success(data: T, metadata: ExtractionMetadata) -> Self {
        Self {
            success: true,
            data: Some(data),
            errors: Vec::new(),
            warnings: Vec::new(),
            metadata,
        }
    }

    pub fn failure(error: impl Display, metadata: ExtractionMetadata) -> Self {
        Self {
            success: false,
            data: None,
            errors: vec![error.to_string()],
            warnings: Vec::new(),
            metadata,
        }
    }

    /// A successful run that did nothing, carrying the reason as a warning.
    pub fn noop(warning: impl Into<String>, metadata: ExtractionMetadata) -> Self {
        Self {
            success: true,
            data: None,
            errors: Vec::new(),
            warnings: vec![warning.into()],
            metadata,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn map_data<U>(self, f: impl FnOnce(T) -> U) -> ExtractionResult<U> {
        ExtractionResult {
            success: self.success,
            data: self.data.map(f),
            errors: self.errors,
            warnings: self.warnings,
            metadata: self.metadata,
        }
    }
}

impl<T: Serialize> ExtractionResult<T> {
    /// Erase the summary type to JSON. A summary that cannot be serialized
    /// turns the result into a failure.
    pub fn into_json(self) -> ExtractionResult<serde_json::Value> {
        let ExtractionResult {
            success,
            data,
            errors,
            warnings,
            metadata,
        } = self;
        let data = match data.map(serde_json::to_value).transpose() {
            Ok(data) => data,
            Err(e) => {
                let mut failed = ExtractionResult::failure(ExtractionError::from(e), metadata);
                failed.warnings = warnings;
                return failed;
            }
        };
        ExtractionResult {
            success,
            data,
            errors,
            warnings,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::ser::Error as _;

    use crate::pipeline::result::*;

    #[test]
    fn test_success_and_failure_shapes() {
        let ok = ExtractionResult::success(3, ExtractionMetadata::default());
        assert!(ok.success);
        assert_eq!(ok.data, Some(3));
        assert!(ok.errors.is_empty());

        let failed: ExtractionResult<u8> =
            ExtractionResult::failure("boom", ExtractionMetadata::default());
        assert!(!failed.success);
        assert_eq!(failed.data, None);
        assert_eq!(failed.errors, vec!["boom".to_string()]);
    }

    #[test]
    fn test_into_json() {
        let result = ExtractionResult::success(vec!["a", "b"], ExtractionMetadata::default())
            .with_warning("careful")
            .into_json();
        assert_eq!(result.data, Some(serde_json::json!(["a", "b"])));
        assert_eq!(result.warnings, vec!["careful".to_string()]);
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not today"))
        }
    }

    #[test]
    fn test_into_json_serialization_failure() {
        let result =
            ExtractionResult::success(Unserializable, ExtractionMetadata::default()).into_json();
        assert!(!result.success);
        assert_eq!(
            result.errors,
            vec!["failed to serialize summary: not today".to_string()]
        );
    }

    #[test]
    fn test_metadata_serializes_camel_case() {
        let metadata = ExtractionMetadata {
            discovered: 2,
            filtered: 1,
            processed: 1,
            batches: vec![BatchTiming {
                index: 0,
                files: 1,
                elapsed_ms: 0,
            }],
            ..Default::default()
        };
        insta::assert_snapshot!(serde_json::to_string(&metadata).unwrap(), @r#"{"discovered":2,"filtered":1,"processed":1,"skipped":0,"failed":0,"batches":[{"index":0,"files":1,"elapsedMs":0}],"elapsedMs":0}"#);
    }
}

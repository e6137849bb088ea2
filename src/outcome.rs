//! The JSON result object printed for the calling application.

use serde::Serialize;

/// Metadata describing a successfully written report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportMetadata {
    pub filename: String,
    pub path: String,
    /// File size in bytes.
    #[serde(rename = "tamano")]
    pub size: u64,
    /// Local generation time, ISO-8601.
    #[serde(rename = "generado_en")]
    pub generated_at: String,
    #[serde(rename = "incluir_convenio")]
    pub include_agreement: bool,
    #[serde(rename = "incluir_firmantes")]
    pub include_signers: bool,
}

/// Outcome of one invocation.
///
/// Either `data` or `error` is present, never both; the constructors are the
/// only way to build a value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<ReportMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl GenerationResult {
    /// A successful result carrying the report metadata.
    pub fn succeeded(data: ReportMetadata) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failed result carrying a message for the caller.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&ReportMetadata> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Pretty-printed JSON, as written to stdout.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

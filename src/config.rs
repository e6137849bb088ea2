//! Invocation parameters parsed from the JSON command-line argument.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::GenerationError;

/// Host used when the caller does not provide `db_host`.
pub const DEFAULT_DB_HOST: &str = "localhost";
/// Port used when the caller does not provide `db_port`.
pub const DEFAULT_DB_PORT: u16 = 27017;
/// Database used when the caller does not provide `db_name`.
pub const DEFAULT_DB_NAME: &str = "comfaca_credito";
/// Output directory, relative to the working directory, used without `output_dir`.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "pdfs/solicitudes";

/// Connection parameters for the record store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    /// How long the driver looks for a usable server before giving up.
    /// `None` keeps the driver default of 30 seconds.
    pub server_selection_timeout: Option<Duration>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_owned(),
            port: DEFAULT_DB_PORT,
            database: DEFAULT_DB_NAME.to_owned(),
            server_selection_timeout: None,
        }
    }
}

/// Everything a single report generation needs to know.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub solicitud_id: String,
    pub include_agreement: bool,
    pub include_signers: bool,
    pub output_dir: Option<PathBuf>,
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize)]
struct RawParams {
    solicitud_id: Option<Value>,
    incluir_convenio: Option<bool>,
    incluir_firmantes: Option<bool>,
    output_dir: Option<String>,
    db_host: Option<String>,
    db_port: Option<u16>,
    db_name: Option<String>,
    db_timeout_ms: Option<u64>,
}

impl GenerationRequest {
    /// Creates a request for `solicitud_id` with every optional section enabled.
    pub fn new(solicitud_id: impl Into<String>) -> Self {
        Self {
            solicitud_id: solicitud_id.into(),
            include_agreement: true,
            include_signers: true,
            output_dir: None,
            store: StoreConfig::default(),
        }
    }

    /// Parses the JSON object passed as the single command-line argument.
    pub fn from_json(input: &str) -> Result<Self, GenerationError> {
        let raw: RawParams =
            serde_json::from_str(input).map_err(GenerationError::MalformedArgument)?;

        let solicitud_id = match raw.solicitud_id {
            None | Some(Value::Null) => {
                return Err(GenerationError::MissingParameter("solicitud_id"))
            }
            Some(Value::String(id)) => id,
            Some(Value::Number(number)) => number.to_string(),
            Some(other) => {
                return Err(GenerationError::InvalidParameter {
                    name: "solicitud_id",
                    reason: format!("se esperaba texto, se recibió {other}"),
                })
            }
        };

        if solicitud_id.trim().is_empty() {
            return Err(GenerationError::InvalidParameter {
                name: "solicitud_id",
                reason: "no puede estar vacío".to_owned(),
            });
        }

        let defaults = StoreConfig::default();
        Ok(Self {
            solicitud_id,
            include_agreement: raw.incluir_convenio.unwrap_or(true),
            include_signers: raw.incluir_firmantes.unwrap_or(true),
            output_dir: raw
                .output_dir
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            store: StoreConfig {
                host: raw.db_host.unwrap_or(defaults.host),
                port: raw.db_port.unwrap_or(defaults.port),
                database: raw.db_name.unwrap_or(defaults.database),
                server_selection_timeout: raw.db_timeout_ms.map(Duration::from_millis),
            },
        })
    }

    /// Sets whether the agreement section is rendered.
    pub fn with_agreement(mut self, include: bool) -> Self {
        self.include_agreement = include;
        self
    }

    /// Sets whether the signer section is rendered.
    pub fn with_signers(mut self, include: bool) -> Self {
        self.include_signers = include;
        self
    }

    /// Overrides the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Returns the directory the report is written to.
    ///
    /// Falls back to [`DEFAULT_OUTPUT_SUBDIR`] under the current working directory.
    pub fn resolve_output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(DEFAULT_OUTPUT_SUBDIR),
        }
    }
}

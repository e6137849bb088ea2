//! Error types shared by every stage of report generation.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Classification of a [`GenerationError`], reported in logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed command-line input.
    Argument,
    /// The record store could not be reached or queried.
    Connection,
    /// No record exists for the requested identifier.
    NotFound,
    /// The document could not be assembled or rendered.
    Render,
    /// Filesystem failure, including a missing file after rendering.
    Io,
}

impl ErrorKind {
    /// Returns the stable name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Argument => "ArgumentError",
            Self::Connection => "ConnectionError",
            Self::NotFound => "NotFoundError",
            Self::Render => "RenderError",
            Self::Io => "IOError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while turning an application record into a PDF report.
///
/// The `Display` output is the message handed back to the calling application,
/// so it is written in the same language as the report itself.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Se requiere un argumento JSON con los parámetros")]
    MissingArgument,

    #[error("Error en JSON: {0}")]
    MalformedArgument(#[source] serde_json::Error),

    #[error("Parámetro requerido faltante: {0}")]
    MissingParameter(&'static str),

    #[error("Parámetro inválido: {name} ({reason})")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("No se pudo conectar a la base de datos: {reason}")]
    Connection { reason: String },

    #[error("Solicitud no encontrada: {0}")]
    NotFound(String),

    #[error("Registro de solicitud inválido: {0}")]
    InvalidRecord(String),

    #[error("Error generando PDF: {0}")]
    Render(#[source] genpdf::error::Error),

    #[cfg(feature = "bookmarks")]
    #[error("Error agregando marcadores al PDF: {0}")]
    Bookmarks(#[source] crate::bookmarks::BookmarkError),

    #[error("Error de archivo en {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No se pudo crear el archivo PDF")]
    OutputMissing(PathBuf),
}

impl GenerationError {
    /// Builds a connection error from any displayable driver error.
    pub fn connection(reason: impl fmt::Display) -> Self {
        Self::Connection {
            reason: reason.to_string(),
        }
    }

    /// Wraps an I/O error together with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the coarse kind of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingArgument
            | Self::MalformedArgument(_)
            | Self::MissingParameter(_)
            | Self::InvalidParameter { .. } => ErrorKind::Argument,
            Self::Connection { .. } => ErrorKind::Connection,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidRecord(_) | Self::Render(_) => ErrorKind::Render,
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(_) => ErrorKind::Render,
            Self::Io { .. } | Self::OutputMissing(_) => ErrorKind::Io,
        }
    }
}

impl From<genpdf::error::Error> for GenerationError {
    fn from(err: genpdf::error::Error) -> Self {
        Self::Render(err)
    }
}

#[cfg(feature = "bookmarks")]
impl From<crate::bookmarks::BookmarkError> for GenerationError {
    fn from(err: crate::bookmarks::BookmarkError) -> Self {
        Self::Bookmarks(err)
    }
}

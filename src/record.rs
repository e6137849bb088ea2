//! Typed, read-only view of a stored credit application.
//!
//! Records are written by another application and their field types drift
//! over time, so every field here is optional and deserialized leniently:
//! text accepts numbers and booleans, numbers accept numeric strings, and
//! dates are kept as raw [`Bson`] values for [`crate::format::format_date`].

use mongodb::bson::{self, Bson, Document};
use serde::{Deserialize, Deserializer};

use crate::error::GenerationError;

/// A credit application as stored in the `solicitudes_credito` collection.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ApplicationRecord {
    #[serde(rename = "_id", default)]
    pub id: Option<Bson>,
    #[serde(rename = "numero_solicitud", default, deserialize_with = "lenient_text")]
    pub request_number: Option<String>,
    #[serde(rename = "created_at", default)]
    pub created_at: Option<Bson>,
    #[serde(rename = "estado", default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(rename = "owner_username", default, deserialize_with = "lenient_text")]
    pub owner: Option<String>,
    #[serde(rename = "solicitante", default)]
    pub applicant: Option<Applicant>,
    #[serde(rename = "monto_solicitado", default, deserialize_with = "lenient_number")]
    pub requested_amount: Option<f64>,
    /// Term in months exactly as stored; see [`ApplicationRecord::term_months`].
    #[serde(rename = "plazo_meses", default)]
    pub term: Option<Bson>,
    #[serde(default)]
    pub payload: Option<Payload>,
    #[serde(rename = "documentos", default, deserialize_with = "null_as_default")]
    pub documents: Vec<AttachedDocument>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timeline: Vec<TimelineEvent>,
}

/// The person applying for credit.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Applicant {
    #[serde(rename = "nombres_apellidos", default, deserialize_with = "lenient_text")]
    pub full_name: Option<String>,
    #[serde(rename = "tipo_identificacion", default, deserialize_with = "lenient_text")]
    pub document_type: Option<String>,
    #[serde(rename = "numero_identificacion", default, deserialize_with = "lenient_text")]
    pub document_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(rename = "telefono_movil", default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", default, deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(rename = "ciudad", default, deserialize_with = "lenient_text")]
    pub city: Option<String>,
}

/// Free-form payload attached to the application by the intake form.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Payload {
    #[serde(rename = "linea_credito", default)]
    pub credit_line: Option<CreditLine>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct CreditLine {
    #[serde(rename = "tipcre", default, deserialize_with = "lenient_text")]
    pub kind: Option<String>,
}

/// Descriptor of a file uploaded with the application.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct AttachedDocument {
    #[serde(rename = "nombre_original", default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(rename = "tipo_mime", default, deserialize_with = "lenient_text")]
    pub mime_type: Option<String>,
    #[serde(rename = "fecha_subida", default)]
    pub uploaded_at: Option<Bson>,
}

/// One status change in the application's history.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TimelineEvent {
    #[serde(rename = "fecha", default)]
    pub date: Option<Bson>,
    #[serde(rename = "estado", default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(rename = "detalle", default, deserialize_with = "lenient_text")]
    pub detail: Option<String>,
}

impl ApplicationRecord {
    /// Decodes a raw store document.
    pub fn from_document(document: Document) -> Result<Self, GenerationError> {
        bson::from_document(document).map_err(|err| GenerationError::InvalidRecord(err.to_string()))
    }

    /// Returns the credit line type from the nested payload, if recorded.
    pub fn credit_line_kind(&self) -> Option<&str> {
        self.payload
            .as_ref()
            .and_then(|payload| payload.credit_line.as_ref())
            .and_then(|line| line.kind.as_deref())
    }

    /// Numeric term in months. Fractional terms are kept as they are.
    pub fn term_months(&self) -> Option<f64> {
        self.term.clone().and_then(bson_number)
    }

    /// The term as shown in the credit summary: the stored value, or `0`.
    pub fn term_label(&self) -> String {
        self.term
            .clone()
            .and_then(bson_text)
            .unwrap_or_else(|| "0".to_owned())
    }
}

/// Renders a scalar BSON value as display text. Nulls yield `None`.
pub fn bson_text(value: Bson) -> Option<String> {
    match value {
        Bson::Null | Bson::Undefined => None,
        Bson::String(text) => Some(text),
        Bson::Int32(value) => Some(value.to_string()),
        Bson::Int64(value) => Some(value.to_string()),
        // Doubles keep their decimal point, so 5.0 prints as "5.0".
        Bson::Double(value) => Some(format!("{value:?}")),
        Bson::Boolean(value) => Some(value.to_string()),
        Bson::ObjectId(oid) => Some(oid.to_hex()),
        other => Some(other.to_string()),
    }
}

fn bson_number(value: Bson) -> Option<f64> {
    match value {
        Bson::Int32(value) => Some(f64::from(value)),
        Bson::Int64(value) => Some(value as f64),
        Bson::Double(value) => Some(value),
        Bson::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Bson>::deserialize(deserializer)?.and_then(bson_text))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Bson>::deserialize(deserializer)?.and_then(bson_number))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

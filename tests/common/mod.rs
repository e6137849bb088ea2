#![allow(dead_code)]

use std::collections::HashMap;
use std::net::TcpListener;

use mongodb::bson::{doc, Document};
use solicitud_pdf::{ApplicationRecord, GenerationError, RecordStore};

pub const SAMPLE_ID: &str = "SOL-2024-001";

pub fn sample_document() -> Document {
    doc! {
        "_id": SAMPLE_ID,
        "numero_solicitud": "2024-001",
        "created_at": "2024-03-01T08:15:00Z",
        "estado": "RADICADA",
        "owner_username": "asesor.florencia",
        "solicitante": {
            "nombres_apellidos": "Ana María Pérez Gómez",
            "tipo_identificacion": "CC",
            "numero_identificacion": "1090123456",
            "email": "ana.perez@example.com",
            "telefono_movil": "3001234567",
            "direccion": "Calle 15 # 8-42",
            "ciudad": "Florencia",
        },
        "monto_solicitado": 5_000_000,
        "plazo_meses": 24,
        "payload": { "linea_credito": { "tipcre": "LIBRE INVERSIÓN" } },
        "documentos": [
            { "nombre_original": "cedula.pdf", "tipo_mime": "application/pdf", "fecha_subida": "2024-03-01T08:20:00Z" },
            { "nombre_original": "desprendible_nomina.png", "tipo_mime": "image/png", "fecha_subida": "2024-03-01T08:21:30Z" },
        ],
        "timeline": [
            { "fecha": "2024-03-01T08:15:00Z", "estado": "RADICADA", "detalle": "Solicitud creada por el asesor" },
            { "fecha": "2024-03-02T10:00:00Z", "estado": "EN_ESTUDIO", "detalle": "Documentos validados" },
        ],
    }
}

pub fn sample_record() -> ApplicationRecord {
    ApplicationRecord::from_document(sample_document()).expect("sample record decodes")
}

/// In-memory stand-in for the MongoDB collection.
#[derive(Default)]
pub struct MemoryStore {
    documents: HashMap<String, Document>,
}

impl MemoryStore {
    pub fn with(id: &str, document: Document) -> Self {
        let mut store = Self::default();
        store.documents.insert(id.to_owned(), document);
        store
    }
}

impl RecordStore for MemoryStore {
    fn find_application(&self, id: &str) -> Result<Option<ApplicationRecord>, GenerationError> {
        self.documents
            .get(id)
            .cloned()
            .map(ApplicationRecord::from_document)
            .transpose()
    }
}

/// Store that behaves like an unreachable server.
pub struct UnreachableStore;

impl RecordStore for UnreachableStore {
    fn find_application(&self, _id: &str) -> Result<Option<ApplicationRecord>, GenerationError> {
        Err(GenerationError::connection("server selection timed out"))
    }
}

/// A local TCP port nothing is listening on.
pub fn unused_local_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind an ephemeral port");
    listener.local_addr().expect("local address").port()
}

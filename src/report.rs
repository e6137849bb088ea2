//! Maps an application record onto the fixed report layout.

use chrono::NaiveDate;

use crate::finance::{installment_label, INTEREST_RATE_LABEL};
use crate::format::{format_currency, format_date, text_or_placeholder};
use crate::model::{Block, DataTable, FieldTable, Report, Section};
use crate::record::{Applicant, ApplicationRecord};

/// Title printed at the top of the first page.
pub const REPORT_TITLE: &str = "SOLICITUD DE CRÉDITO";

/// Notice shown instead of the attached documents table when there are none.
pub const NO_DOCUMENTS_NOTICE: &str = "No se han adjuntado documentos";

/// Notice shown instead of the timeline table when there are no events.
pub const NO_TIMELINE_NOTICE: &str = "No hay eventos en el timeline";

/// Stable identifiers of the report sections.
pub mod section_ids {
    pub const REQUEST: &str = "solicitud";
    pub const APPLICANT: &str = "solicitante";
    pub const CREDIT: &str = "credito";
    pub const AGREEMENT: &str = "convenio";
    pub const SIGNERS: &str = "firmantes";
    pub const DOCUMENTS: &str = "documentos";
    pub const TIMELINE: &str = "timeline";
}

// Agreement and signer details are not stored on the record yet.
const AGREEMENT_NAME: &str = "Información del convenio";
const AGREEMENT_COMPANY: &str = "Empresa Ejemplo S.A.";
const AGREEMENT_NIT: &str = "900123456";
const AGREEMENT_STATUS: &str = "Activo";
const SIGNER_NAME: &str = "Información del firmante";
const SIGNER_ROLE: &str = "Cargo del firmante";

/// Switches for the optional sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportOptions {
    pub include_agreement: bool,
    pub include_signers: bool,
    /// Date printed on the signer section.
    pub generated_on: NaiveDate,
}

/// Builds the report for `record`.
///
/// Sections always appear in the same order; the agreement and signer
/// sections are skipped when disabled in `options`.
pub fn build_report(record: &ApplicationRecord, options: &ReportOptions) -> Report {
    let mut report = Report::new(REPORT_TITLE)
        .with_section(request_section(record))
        .with_section(applicant_section(record.applicant.as_ref()))
        .with_section(credit_section(record));

    if options.include_agreement {
        report.push_section(agreement_section());
    }
    if options.include_signers {
        report.push_section(signers_section(options.generated_on));
    }

    report
        .with_section(documents_section(record))
        .with_section(timeline_section(record))
}

fn section(identifier: &str, title: &str) -> Section {
    Section::new(title).with_identifier(Some(identifier.to_owned()))
}

fn request_section(record: &ApplicationRecord) -> Section {
    section(section_ids::REQUEST, "INFORMACIÓN DE LA SOLICITUD").with_block(Block::Fields(
        FieldTable::new(3, 4)
            .with_row(
                "Número de Solicitud:",
                text_or_placeholder(record.request_number.as_deref()),
            )
            .with_row("Fecha de Creación:", format_date(record.created_at.as_ref()))
            .with_row("Estado Actual:", text_or_placeholder(record.status.as_deref()))
            .with_row("Usuario:", text_or_placeholder(record.owner.as_deref())),
    ))
}

fn applicant_section(applicant: Option<&Applicant>) -> Section {
    let fallback = Applicant::default();
    let applicant = applicant.unwrap_or(&fallback);

    section(section_ids::APPLICANT, "DATOS DEL SOLICITANTE").with_block(Block::Fields(
        FieldTable::new(2, 4)
            .with_row(
                "Nombre Completo:",
                text_or_placeholder(applicant.full_name.as_deref()),
            )
            .with_row(
                "Tipo Documento:",
                text_or_placeholder(applicant.document_type.as_deref()),
            )
            .with_row(
                "Número Documento:",
                text_or_placeholder(applicant.document_number.as_deref()),
            )
            .with_row("Email:", text_or_placeholder(applicant.email.as_deref()))
            .with_row("Teléfono:", text_or_placeholder(applicant.phone.as_deref()))
            .with_row("Dirección:", text_or_placeholder(applicant.address.as_deref()))
            .with_row("Ciudad:", text_or_placeholder(applicant.city.as_deref())),
    ))
}

fn credit_section(record: &ApplicationRecord) -> Section {
    section(section_ids::CREDIT, "INFORMACIÓN DEL CRÉDITO").with_block(Block::Fields(
        FieldTable::new(5, 7)
            .with_row(
                "Monto Solicitado:",
                format_currency(record.requested_amount.unwrap_or(0.0)),
            )
            .with_row("Plazo (meses):", record.term_label())
            .with_row(
                "Línea de Crédito:",
                text_or_placeholder(record.credit_line_kind()),
            )
            .with_row("Tasa de Interés:", INTEREST_RATE_LABEL)
            .with_row(
                "Cuota Mensual:",
                installment_label(record.requested_amount, record.term_months()),
            ),
    ))
}

fn agreement_section() -> Section {
    section(section_ids::AGREEMENT, "INFORMACIÓN DEL CONVENIO").with_block(Block::Fields(
        FieldTable::new(2, 4)
            .with_row("Convenio:", AGREEMENT_NAME)
            .with_row("Empresa:", AGREEMENT_COMPANY)
            .with_row("Nit:", AGREEMENT_NIT)
            .with_row("Estado:", AGREEMENT_STATUS),
    ))
}

fn signers_section(generated_on: NaiveDate) -> Section {
    section(section_ids::SIGNERS, "INFORMACIÓN DE FIRMANTES").with_block(Block::Fields(
        FieldTable::new(2, 4)
            .with_row("Firmante 1:", SIGNER_NAME)
            .with_row("Cargo:", SIGNER_ROLE)
            .with_row("Fecha:", generated_on.format("%Y-%m-%d").to_string()),
    ))
}

fn documents_section(record: &ApplicationRecord) -> Section {
    let section = section(section_ids::DOCUMENTS, "DOCUMENTOS ADJUNTOS");
    if record.documents.is_empty() {
        return section
            .without_heading()
            .with_block(Block::notice(NO_DOCUMENTS_NOTICE));
    }

    let mut table = DataTable::new(["Nombre", "Tipo", "Fecha de Subida"], &[3, 2, 2]);
    for document in &record.documents {
        table.push_row([
            text_or_placeholder(document.name.as_deref()),
            text_or_placeholder(document.mime_type.as_deref()),
            format_date(document.uploaded_at.as_ref()),
        ]);
    }
    section.with_block(Block::Table(table))
}

fn timeline_section(record: &ApplicationRecord) -> Section {
    let section = section(section_ids::TIMELINE, "HISTORIAL DE LA SOLICITUD");
    if record.timeline.is_empty() {
        return section
            .without_heading()
            .with_block(Block::notice(NO_TIMELINE_NOTICE));
    }

    let mut table = DataTable::new(["Fecha", "Estado", "Detalle"], &[2, 2, 3]);
    for event in &record.timeline {
        table.push_row([
            format_date(event.date.as_ref()),
            text_or_placeholder(event.status.as_deref()),
            text_or_placeholder(event.detail.as_deref()),
        ]);
    }
    section.with_block(Block::Table(table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AttachedDocument, TimelineEvent};
    use mongodb::bson::Bson;

    fn options(include_agreement: bool, include_signers: bool) -> ReportOptions {
        ReportOptions {
            include_agreement,
            include_signers,
            generated_on: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
        }
    }

    fn identifiers(report: &Report) -> Vec<&str> {
        report
            .sections()
            .iter()
            .filter_map(Section::identifier)
            .collect()
    }

    fn fields<'a>(report: &'a Report, identifier: &str) -> &'a FieldTable {
        match report.section(identifier).unwrap().blocks() {
            [Block::Fields(table)] => table,
            other => panic!("unexpected blocks for {identifier}: {other:?}"),
        }
    }

    #[test]
    fn all_sections_in_order_by_default() {
        let report = build_report(&ApplicationRecord::default(), &options(true, true));
        assert_eq!(report.title(), REPORT_TITLE);
        assert_eq!(
            identifiers(&report),
            vec![
                "solicitud",
                "solicitante",
                "credito",
                "convenio",
                "firmantes",
                "documentos",
                "timeline"
            ]
        );
    }

    #[test]
    fn disabled_flags_omit_optional_sections() {
        let report = build_report(&ApplicationRecord::default(), &options(false, false));
        assert_eq!(
            identifiers(&report),
            vec!["solicitud", "solicitante", "credito", "documentos", "timeline"]
        );

        let report = build_report(&ApplicationRecord::default(), &options(false, true));
        assert!(report.section(section_ids::AGREEMENT).is_none());
        assert!(report.section(section_ids::SIGNERS).is_some());
    }

    #[test]
    fn empty_lists_render_only_a_notice() {
        let report = build_report(&ApplicationRecord::default(), &options(true, true));

        for (identifier, notice) in [
            (section_ids::DOCUMENTS, NO_DOCUMENTS_NOTICE),
            (section_ids::TIMELINE, NO_TIMELINE_NOTICE),
        ] {
            let section = report.section(identifier).unwrap();
            assert!(!section.shows_heading(), "{identifier} should not print its heading");
            let blocks = section.blocks();
            assert_eq!(blocks.len(), 1);
            match &blocks[0] {
                Block::Paragraph(paragraph) => assert_eq!(paragraph.text(), notice),
                other => panic!("expected notice, found {other:?}"),
            }
        }
    }

    #[test]
    fn lists_render_one_row_per_entry() {
        let record = ApplicationRecord {
            documents: vec![
                AttachedDocument {
                    name: Some("cedula.pdf".into()),
                    mime_type: Some("application/pdf".into()),
                    uploaded_at: Some(Bson::String("2024-03-01T08:20:00Z".into())),
                },
                AttachedDocument::default(),
            ],
            timeline: vec![TimelineEvent {
                date: Some(Bson::String("2024-03-01T08:15:00Z".into())),
                status: Some("RADICADA".into()),
                detail: Some("Solicitud creada".into()),
            }],
            ..ApplicationRecord::default()
        };
        let report = build_report(&record, &options(true, true));
        assert!(report.sections().iter().all(Section::shows_heading));

        let Block::Table(documents) = &report.section(section_ids::DOCUMENTS).unwrap().blocks()[0]
        else {
            panic!("documents should render as a table");
        };
        assert_eq!(documents.header(), &["Nombre", "Tipo", "Fecha de Subida"]);
        assert_eq!(
            documents.rows(),
            &[
                vec!["cedula.pdf", "application/pdf", "2024-03-01 08:20:00"],
                vec!["N/A", "N/A", "N/A"],
            ]
        );

        let Block::Table(timeline) = &report.section(section_ids::TIMELINE).unwrap().blocks()[0]
        else {
            panic!("timeline should render as a table");
        };
        assert_eq!(
            timeline.rows(),
            &[vec!["2024-03-01 08:15:00", "RADICADA", "Solicitud creada"]]
        );
    }

    #[test]
    fn credit_summary_uses_amount_and_term() {
        let record = ApplicationRecord {
            requested_amount: Some(5_000_000.0),
            term: Some(Bson::Int32(24)),
            ..ApplicationRecord::default()
        };
        let report = build_report(&record, &options(false, false));
        let credit = fields(&report, section_ids::CREDIT);

        assert_eq!(credit.value("Monto Solicitado:"), Some("$5,000,000.00"));
        assert_eq!(credit.value("Plazo (meses):"), Some("24"));
        assert_eq!(credit.value("Línea de Crédito:"), Some("N/A"));
        assert_eq!(credit.value("Tasa de Interés:"), Some("12% anual"));
        assert_eq!(credit.value("Cuota Mensual:"), Some("$235,367.36"));
    }

    #[test]
    fn fractional_terms_are_shown_and_used_as_stored() {
        let record = ApplicationRecord {
            requested_amount: Some(1_000.0),
            term: Some(Bson::Double(1.0)),
            ..ApplicationRecord::default()
        };
        let report = build_report(&record, &options(false, false));
        let credit = fields(&report, section_ids::CREDIT);

        assert_eq!(credit.value("Plazo (meses):"), Some("1.0"));
        assert_eq!(credit.value("Cuota Mensual:"), Some("$1,010.00"));
    }

    #[test]
    fn missing_loan_terms_fall_back_to_placeholders() {
        let report = build_report(&ApplicationRecord::default(), &options(false, false));
        let credit = fields(&report, section_ids::CREDIT);

        assert_eq!(credit.value("Monto Solicitado:"), Some("$0.00"));
        assert_eq!(credit.value("Plazo (meses):"), Some("0"));
        assert_eq!(credit.value("Cuota Mensual:"), Some("N/A"));
    }

    #[test]
    fn placeholder_sections_ignore_the_record() {
        let report = build_report(&ApplicationRecord::default(), &options(true, true));

        let agreement = fields(&report, section_ids::AGREEMENT);
        assert_eq!(agreement.value("Empresa:"), Some("Empresa Ejemplo S.A."));
        assert_eq!(agreement.value("Nit:"), Some("900123456"));

        let signers = fields(&report, section_ids::SIGNERS);
        assert_eq!(signers.value("Fecha:"), Some("2024-05-17"));
    }

    #[test]
    fn missing_applicant_renders_placeholders() {
        let report = build_report(&ApplicationRecord::default(), &options(false, false));
        let applicant = fields(&report, section_ids::APPLICANT);
        assert_eq!(applicant.rows().len(), 7);
        assert!(applicant.rows().iter().all(|(_, value)| value == "N/A"));
    }
}

//! Supporting documents and filing steps for the Inland Revenue Department.

use serde::Serialize;

use crate::models::IncomeSource;

pub const IRD_PORTAL_URL: &str = "https://eservices.ird.gov.lk";
pub const IRD_CALL_CENTRE: &str = "1944";
pub const IRD_EMAIL: &str = "callcentre@ird.gov.lk";

pub const DISCLAIMER: &str = "This is an estimate only. Actual tax liability may vary based on \
specific deductions, exemptions, and final APIT tables. Please consult a tax professional or the \
IRD for official assessments.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentId {
    Tin,
    T10,
    Wht,
}

/// Follow-up the filer takes to obtain a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentAction {
    EmailEmployer { template: String },
    EmailBank { template: String },
}

impl DocumentAction {
    pub fn template(&self) -> &str {
        match self {
            Self::EmailEmployer { template } | Self::EmailBank { template } => template,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilingDocument {
    pub id: DocumentId,
    pub title: &'static str,
    pub description: &'static str,
    pub action: Option<DocumentAction>,
}

fn employer_template(year_of_assessment: &str) -> String {
    format!(
        "Dear HR,\n\nPlease provide my T-10 certificate for the tax year {year_of_assessment}, \
         showing my total remuneration and the APIT deducted.\n\nThank you."
    )
}

fn bank_template(year_of_assessment: &str) -> String {
    format!(
        "Dear Sir/Madam,\n\nPlease provide the withholding tax (WHT) certificates for interest \
         credited to my accounts during the tax year {year_of_assessment}.\n\nThank you."
    )
}

/// Documents needed for the selected income sources.
///
/// The TIN certificate is always listed first.
pub fn required_documents(
    sources: &[IncomeSource],
    year_of_assessment: &str,
) -> Vec<FilingDocument> {
    let mut docs = vec![FilingDocument {
        id: DocumentId::Tin,
        title: "TIN Certificate",
        description: "Your Taxpayer Identification Number certificate from IRD.",
        action: None,
    }];

    if sources.contains(&IncomeSource::Employment) {
        docs.push(FilingDocument {
            id: DocumentId::T10,
            title: "T-10 Certificate",
            description: "Request this from your employer. It details your total remuneration \
                          and any tax deducted (APIT).",
            action: Some(DocumentAction::EmailEmployer {
                template: employer_template(year_of_assessment),
            }),
        });
    }

    if sources.contains(&IncomeSource::Investment) || sources.contains(&IncomeSource::Business) {
        docs.push(FilingDocument {
            id: DocumentId::Wht,
            title: "WHT Certificates",
            description: "Withholding Tax certificates from banks or financial institutions for \
                          interest income.",
            action: Some(DocumentAction::EmailBank {
                template: bank_template(year_of_assessment),
            }),
        });
    }

    docs
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilingStep {
    pub number: u8,
    pub title: String,
    pub detail: String,
    pub link: Option<&'static str>,
}

/// Steps for submitting the return on IRD e-Services.
pub fn filing_steps(year_of_assessment: &str) -> Vec<FilingStep> {
    vec![
        FilingStep {
            number: 1,
            title: "Log in to IRD e-Services".to_string(),
            detail: "Visit the official Inland Revenue Department portal.".to_string(),
            link: Some(IRD_PORTAL_URL),
        },
        FilingStep {
            number: 2,
            title: "Select \"Return of Income\"".to_string(),
            detail: format!("Choose the assessment year {year_of_assessment}."),
            link: None,
        },
        FilingStep {
            number: 3,
            title: "Enter Your Figures".to_string(),
            detail: "Use the summary from the previous step to fill in your income details."
                .to_string(),
            link: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ids(docs: &[FilingDocument]) -> Vec<DocumentId> {
        docs.iter().map(|d| d.id).collect()
    }

    #[test]
    fn tin_certificate_always_required() {
        let docs = required_documents(&[], "2024/2025");

        assert_eq!(ids(&docs), vec![DocumentId::Tin]);
        assert!(docs[0].action.is_none());
    }

    #[test]
    fn employment_needs_t10_with_employer_email() {
        let docs = required_documents(&[IncomeSource::Employment], "2024/2025");

        assert_eq!(ids(&docs), vec![DocumentId::Tin, DocumentId::T10]);
        let action = docs[1].action.as_ref().unwrap();
        assert!(matches!(action, DocumentAction::EmailEmployer { .. }));
        assert!(action.template().contains("T-10 certificate for the tax year 2024/2025"));
    }

    #[test]
    fn investment_or_business_needs_wht_once() {
        let docs = required_documents(
            &[IncomeSource::Business, IncomeSource::Investment],
            "2024/2025",
        );

        assert_eq!(ids(&docs), vec![DocumentId::Tin, DocumentId::Wht]);
    }

    #[test]
    fn rental_and_other_add_nothing() {
        let docs = required_documents(&[IncomeSource::Rental, IncomeSource::Other], "2024/2025");

        assert_eq!(ids(&docs), vec![DocumentId::Tin]);
    }

    #[test]
    fn every_source_gives_three_documents() {
        let docs = required_documents(IncomeSource::all(), "2024/2025");

        assert_eq!(
            ids(&docs),
            vec![DocumentId::Tin, DocumentId::T10, DocumentId::Wht]
        );
    }

    #[test]
    fn filing_steps_name_the_year() {
        let steps = filing_steps("2024/2025");

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].link, Some(IRD_PORTAL_URL));
        assert_eq!(steps[1].detail, "Choose the assessment year 2024/2025.");
    }
}

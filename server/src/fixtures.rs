//! Sample payloads sent by the invoice routes.
//!
//! The JSON under `server/fixtures/` is compiled into the binary. Invoice
//! templates carry no date and no signing credentials; both are added when
//! a payload is handed out.

use chrono::Local;
use fiscal_core::{
    CancelInvoiceRequest, CreatePdfRequest, FileType, Invoice, InvoiceStatusRequest,
    SendInvoiceRequest, TaxCredential,
};
use serde::Deserialize;
use thiserror::Error;

/// Format of `Invoice::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("fixture {name} is malformed: {source}")]
    Malformed {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// One named invoice template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvoiceFixture {
    Iva16,
    IvaExento,
    IvaTasaCero,
    ByReferences,
    CreditNoteByValues,
    CreditNoteByReferences,
    PaymentComplementByValues,
    PaymentComplementByReferences,
    PaymentUsdMxn,
    PaymentMxnUsd,
    PaymentEurUsd,
    GlobalByValues,
    GlobalByReferences,
}

impl InvoiceFixture {
    pub const ALL: [InvoiceFixture; 13] = [
        InvoiceFixture::Iva16,
        InvoiceFixture::IvaExento,
        InvoiceFixture::IvaTasaCero,
        InvoiceFixture::ByReferences,
        InvoiceFixture::CreditNoteByValues,
        InvoiceFixture::CreditNoteByReferences,
        InvoiceFixture::PaymentComplementByValues,
        InvoiceFixture::PaymentComplementByReferences,
        InvoiceFixture::PaymentUsdMxn,
        InvoiceFixture::PaymentMxnUsd,
        InvoiceFixture::PaymentEurUsd,
        InvoiceFixture::GlobalByValues,
        InvoiceFixture::GlobalByReferences,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InvoiceFixture::Iva16 => "iva-16",
            InvoiceFixture::IvaExento => "iva-exento",
            InvoiceFixture::IvaTasaCero => "iva-tasa-cero",
            InvoiceFixture::ByReferences => "by-references",
            InvoiceFixture::CreditNoteByValues => "credit-note-by-values",
            InvoiceFixture::CreditNoteByReferences => "credit-note-by-references",
            InvoiceFixture::PaymentComplementByValues => "payment-complement-by-values",
            InvoiceFixture::PaymentComplementByReferences => "payment-complement-by-references",
            InvoiceFixture::PaymentUsdMxn => "payment-usd-mxn",
            InvoiceFixture::PaymentMxnUsd => "payment-mxn-usd",
            InvoiceFixture::PaymentEurUsd => "payment-eur-usd",
            InvoiceFixture::GlobalByValues => "global-by-values",
            InvoiceFixture::GlobalByReferences => "global-by-references",
        }
    }

    fn source(self) -> &'static str {
        match self {
            InvoiceFixture::Iva16 => include_str!("../fixtures/invoices/iva-16.json"),
            InvoiceFixture::IvaExento => include_str!("../fixtures/invoices/iva-exento.json"),
            InvoiceFixture::IvaTasaCero => include_str!("../fixtures/invoices/iva-tasa-cero.json"),
            InvoiceFixture::ByReferences => include_str!("../fixtures/invoices/by-references.json"),
            InvoiceFixture::CreditNoteByValues => {
                include_str!("../fixtures/invoices/credit-note-by-values.json")
            }
            InvoiceFixture::CreditNoteByReferences => {
                include_str!("../fixtures/invoices/credit-note-by-references.json")
            }
            InvoiceFixture::PaymentComplementByValues => {
                include_str!("../fixtures/invoices/payment-complement-by-values.json")
            }
            InvoiceFixture::PaymentComplementByReferences => {
                include_str!("../fixtures/invoices/payment-complement-by-references.json")
            }
            InvoiceFixture::PaymentUsdMxn => {
                include_str!("../fixtures/invoices/payment-usd-mxn.json")
            }
            InvoiceFixture::PaymentMxnUsd => {
                include_str!("../fixtures/invoices/payment-mxn-usd.json")
            }
            InvoiceFixture::PaymentEurUsd => {
                include_str!("../fixtures/invoices/payment-eur-usd.json")
            }
            InvoiceFixture::GlobalByValues => {
                include_str!("../fixtures/invoices/global-by-values.json")
            }
            InvoiceFixture::GlobalByReferences => {
                include_str!("../fixtures/invoices/global-by-references.json")
            }
        }
    }
}

/// The issuer's CSD pair, base64-encoded.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub certificate: String,
    pub private_key: String,
    pub password: String,
}

impl Credentials {
    pub fn tax_credentials(&self) -> Vec<TaxCredential> {
        vec![
            TaxCredential {
                base64_file: self.certificate.clone(),
                file_type: FileType::CertificateCsd,
                password: self.password.clone(),
            },
            TaxCredential {
                base64_file: self.private_key.clone(),
                file_type: FileType::PrivateKeyCsd,
                password: self.password.clone(),
            },
        ]
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTemplates {
    pub cancel: CancelInvoiceRequest,
    pub cancel_by_id: CancelInvoiceRequest,
    pub status: InvoiceStatusRequest,
    pub pdf: CreatePdfRequest,
    pub send: SendInvoiceRequest,
}

#[derive(Clone, Debug)]
pub struct Fixtures {
    /// Indexed by `InvoiceFixture as usize`, same order as `ALL`.
    invoices: Vec<Invoice>,
    credentials: Credentials,
    logo: String,
    requests: RequestTemplates,
}

impl Fixtures {
    /// The payloads compiled into the binary.
    pub fn embedded() -> Result<Self, FixtureError> {
        let invoices = InvoiceFixture::ALL
            .iter()
            .map(|&kind| parse(kind.name(), kind.source()))
            .collect::<Result<Vec<Invoice>, _>>()?;
        Ok(Self {
            invoices,
            credentials: parse("credentials", include_str!("../fixtures/credentials.json"))?,
            logo: include_str!("../fixtures/logo.txt").trim().to_string(),
            requests: parse("requests", include_str!("../fixtures/requests.json"))?,
        })
    }

    /// Swap one invoice template.
    pub fn with_invoice(mut self, kind: InvoiceFixture, invoice: Invoice) -> Self {
        self.invoices[kind as usize] = invoice;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = logo.into();
        self
    }

    pub fn with_requests(mut self, requests: RequestTemplates) -> Self {
        self.requests = requests;
        self
    }

    /// The template for `kind`, dated now.
    pub fn invoice(&self, kind: InvoiceFixture) -> Invoice {
        let now = Local::now().format(DATE_FORMAT).to_string();
        self.invoice_at(kind, now)
    }

    /// The template for `kind`, dated `date`. An issuer given by TIN gets
    /// the CSD credentials unless the template already carries some.
    pub fn invoice_at(&self, kind: InvoiceFixture, date: impl Into<String>) -> Invoice {
        let mut invoice = self.invoices[kind as usize].clone();
        invoice.date = Some(date.into());
        if invoice.issuer.is_by_values() && invoice.issuer.tax_credentials.is_empty() {
            invoice.issuer.tax_credentials = self.credentials.tax_credentials();
        }
        invoice
    }

    pub fn cancel_by_values(&self) -> CancelInvoiceRequest {
        let mut request = self.requests.cancel.clone();
        request.tax_credentials = self.credentials.tax_credentials();
        request
    }

    pub fn cancel_by_id(&self, id: &str) -> CancelInvoiceRequest {
        CancelInvoiceRequest {
            id: Some(id.to_string()),
            ..self.requests.cancel_by_id.clone()
        }
    }

    pub fn status_by_values(&self) -> InvoiceStatusRequest {
        self.requests.status.clone()
    }

    pub fn status_by_id(&self, id: &str) -> InvoiceStatusRequest {
        InvoiceStatusRequest {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    pub fn pdf_by_values(&self) -> CreatePdfRequest {
        CreatePdfRequest {
            base64_logo: Some(self.logo.clone()),
            ..self.requests.pdf.clone()
        }
    }

    pub fn pdf_by_id(&self, id: &str) -> CreatePdfRequest {
        CreatePdfRequest {
            invoice_id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn send_by_values(&self) -> SendInvoiceRequest {
        SendInvoiceRequest {
            base64_logo: Some(self.logo.clone()),
            ..self.requests.send.clone()
        }
    }

    pub fn send_by_id(&self, id: &str, email: &str) -> SendInvoiceRequest {
        SendInvoiceRequest {
            invoice_id: id.to_string(),
            to_email: email.to_string(),
            ..Default::default()
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(name: &'static str, raw: &str) -> Result<T, FixtureError> {
    serde_json::from_str(raw).map_err(|source| FixtureError::Malformed { name, source })
}

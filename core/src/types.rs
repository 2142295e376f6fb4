//! Payloads exchanged with the invoicing API.
//!
//! # Design
//! Field names follow the API's camelCase JSON. Everything the API can
//! resolve on its side (catalog descriptions, stored issuers and recipients
//! referenced by `id`) is optional, so the same structs describe both
//! "by values" documents and "by references" documents. Products are not
//! modelled: the server forwards product bodies untouched as JSON values.

use serde::{Deserialize, Serialize};

/// Response envelope wrapping every API answer.
///
/// A failed operation still arrives as an envelope with
/// `succeeded == false`; `data` is then usually absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status_code: Option<u16>,
}

/// Envelope with an untyped payload, as relayed by the server.
pub type JsonResponse = ApiResponse<serde_json::Value>;

/// Kind of CFDI document, taken from `Invoice::type_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvoiceType {
    /// `I`: ingreso.
    Income,
    /// `E`: egreso, used for credit notes.
    CreditNote,
    /// `P`: pago, the payment complement.
    Payment,
}

impl InvoiceType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "I" => Some(InvoiceType::Income),
            "E" => Some(InvoiceType::CreditNote),
            "P" => Some(InvoiceType::Payment),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            InvoiceType::Income => "I",
            InvoiceType::CreditNote => "E",
            InvoiceType::Payment => "P",
        }
    }

    /// Path segment of the creation endpoint for this kind.
    pub fn endpoint(self) -> &'static str {
        match self {
            InvoiceType::Income => "income",
            InvoiceType::CreditNote => "credit-note",
            InvoiceType::Payment => "payment",
        }
    }
}

/// Which half of a CSD pair a `TaxCredential` carries. Serialized as the
/// numeric code the API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FileType {
    CertificateCsd,
    PrivateKeyCsd,
}

impl From<FileType> for u8 {
    fn from(value: FileType) -> Self {
        match value {
            FileType::CertificateCsd => 0,
            FileType::PrivateKeyCsd => 1,
        }
    }
}

impl TryFrom<u8> for FileType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FileType::CertificateCsd),
            1 => Ok(FileType::PrivateKeyCsd),
            other => Err(format!("unknown tax credential file type {other}")),
        }
    }
}

/// One base64-encoded CSD file plus its password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCredential {
    pub base64_file: String,
    pub file_type: FileType,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceIssuer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_regime_code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tax_credentials: Vec<TaxCredential>,
}

impl InvoiceIssuer {
    /// An issuer given by TIN travels with its own signing credentials; one
    /// given by id is resolved (credentials included) by the API.
    pub fn is_by_values(&self) -> bool {
        self.tin.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecipient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_regime_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfdi_use_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A tax line on an item or on a paid invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTax {
    pub tax_code: String,
    pub tax_type_code: String,
    /// Six-decimal rate string, e.g. `"0.160000"`. Absent for `Exento`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<String>,
    pub tax_flag_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    /// Stored product id, for items given by reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_object_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_taxes: Vec<InvoiceTax>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedInvoice {
    pub uuid: String,
    pub relationship_type_code: String,
}

/// Period covered by a global invoice to the general public.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalInformation {
    pub periodicity_code: String,
    pub month_code: String,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidInvoice {
    pub uuid: String,
    pub series: String,
    pub number: String,
    pub currency_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equivalence: Option<f64>,
    pub partiality_number: u32,
    pub sub_total: f64,
    pub previous_balance: f64,
    pub payment_amount: f64,
    pub remaining_balance: f64,
    pub tax_object_code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paid_invoice_taxes: Vec<InvoiceTax>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayment {
    pub payment_date: String,
    pub payment_form_code: String,
    pub currency_code: String,
    pub exchange_rate: f64,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_bank_tin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_bank_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_bank_tin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_bank_account: Option<String>,
    pub paid_invoices: Vec<PaidInvoice>,
}

/// A CFDI 4.0 document to be stamped by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub version_code: String,
    pub series: String,
    /// Local issue time, `yyyy-MM-ddTHH:mm:ss`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_form_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_code: Option<String>,
    pub currency_code: String,
    pub type_code: String,
    pub expedition_zip_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_information: Option<GlobalInformation>,
    pub issuer: InvoiceIssuer,
    pub recipient: InvoiceRecipient,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_invoices: Vec<RelatedInvoice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<InvoiceItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payments: Vec<InvoicePayment>,
}

impl Invoice {
    pub fn invoice_type(&self) -> Option<InvoiceType> {
        InvoiceType::from_code(&self.type_code)
    }
}

/// Cancellation either by values (`invoice_uuid` + `tin` + credentials) or
/// by reference (`id` of an invoice stamped through the API).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelInvoiceRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tin: Option<String>,
    pub cancellation_reason_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tax_credentials: Vec<TaxCredential>,
}

/// SAT status query, by values or by reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceStatusRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_tin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_tin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last8_digits_issuer_signature: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePdfRequest {
    pub invoice_id: String,
    /// Hex colour, e.g. `#FFA500`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64_logo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendInvoiceRequest {
    pub invoice_id: String,
    pub to_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64_logo: Option<String>,
}

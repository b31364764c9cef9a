//! Common regex patterns for Italian business documents.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Financial statement headings and line labels
    pub static ref INCOME_STATEMENT_HEADING: Regex = Regex::new(
        r"(?i)conto\s+economico|income\s+statement"
    ).unwrap();

    pub static ref BALANCE_SHEET_HEADING: Regex = Regex::new(
        r"(?i)stato\s+patrimoniale|balance\s+sheet"
    ).unwrap();

    pub static ref REVENUE_LABEL: Regex = Regex::new(
        r"(?i)1\s*\)\s*(?:ricavi\s+delle\s+vendite\s+e\s+delle\s+prestazioni|sales\s+and\s+service\s+revenues?)"
    ).unwrap();

    pub static ref TOTAL_ASSETS_LABEL: Regex = Regex::new(
        r"(?i)totale\s+(?:dell'\s*)?attivo\b|total\s+assets\b"
    ).unwrap();

    // "Totale attivo circolante" shares the total-assets prefix
    pub static ref CURRENT_ASSETS_LABEL: Regex = Regex::new(
        r"(?i)attivo\s+circolante"
    ).unwrap();

    // Fiscal year-end date in a column header: 31-12-2024 or 31.12.2024
    pub static ref HEADER_DATE: Regex = Regex::new(
        r"\b(\d{2})[-.](\d{2})[-.](\d{4})\b"
    ).unwrap();

    // Amount candidates: consistent thousands separator, optional decimal comma,
    // or four or more bare digits. One- and two-digit tokens never match.
    pub static ref AMOUNT_CANDIDATE: Regex = Regex::new(
        r"\b(?:\d{1,3}(?:\.\d{3})+(?:,\d+)?|\d{1,3}(?: \d{3})+(?:,\d+)?|\d{4,}(?:,\d+)?|\d{1,3},\d+)\b"
    ).unwrap();

    // Legacy revenue patterns, broadest last
    pub static ref LEGACY_TWO_COLUMNS: Regex = Regex::new(
        r"(?i)1\s*\)\s*(?:ricavi\s+delle\s+vendite\s+e\s+delle\s+prestazioni|sales\s+and\s+service\s+revenues?)[^\d\n]*(\d[\d.,]*)[ \t]+(\d[\d.,]*)"
    ).unwrap();

    pub static ref LEGACY_PRODUCTION_BLOCK: Regex = Regex::new(
        r"(?is)A\s*\)\s*(?:valore\s+della\s+produzione|value\s+of\s+production).*?1\s*\)\s*[RS][^\n]*?(\d[\d.,]*)[ \t]+(\d[\d.,]*)"
    ).unwrap();

    pub static ref LEGACY_SINGLE_COLUMN: Regex = Regex::new(
        r"(?im)^\s*1\s*\)\s*(?:ricavi\s+delle\s+vendite\s+e\s+delle\s+prestazioni|sales\s+and\s+service\s+revenues?)[^\d\n]*(\d[\d.,]*)"
    ).unwrap();

    pub static ref LEGACY_NEXT_LINE: Regex = Regex::new(
        r"(?i)1\s*\)\s*(?:ricavi\s+delle\s+vendite\s+e\s+delle\s+prestazioni|sales\s+and\s+service\s+revenues?)[^\n]*\n[ \t]*(\d[\d.,]*)"
    ).unwrap();

    // Registry extract labels
    pub static ref COMPANY_NAME_LABEL: Regex = Regex::new(
        r"(?i)denominazione(?:\s+o\s+ragione\s+sociale)?\s*:\s*(.+)"
    ).unwrap();

    pub static ref COMPANY_FORM_HINT: Regex = Regex::new(
        r"(?i)SOCIET[AÀ]'?|\bS\.?R\.?L\.?(?:\b|$)|\bSRLS?\b|\bS\.?P\.?A\.?(?:\b|$)"
    ).unwrap();

    pub static ref LEGAL_FORM_LABEL: Regex = Regex::new(
        r"(?i)forma\s+giuridica\s*:?\s*(.+)"
    ).unwrap();

    pub static ref CODICE_FISCALE_LABELLED: Regex = Regex::new(
        r"(?i)codice\s*fiscale[^0-9]*([0-9]{11})\b"
    ).unwrap();

    pub static ref PARTITA_IVA_LABELLED: Regex = Regex::new(
        r"(?i)partita\s*iva[^0-9]*([0-9]{11})\b"
    ).unwrap();

    pub static ref TAX_ID_STANDALONE: Regex = Regex::new(
        r"\b([0-9]{11})\b"
    ).unwrap();

    // Personal codice fiscale: 6 letters, 2 digits, letter, 2 digits, letter, 3 digits, letter
    pub static ref PERSONAL_TAX_CODE: Regex = Regex::new(
        r"(?i)\b([A-Z]{6}\d{2}[A-Z]\d{2}[A-Z]\d{3}[A-Z])\b"
    ).unwrap();

    pub static ref ATECO_CONTEXT: Regex = Regex::new(
        r"(?i)ateco|codice\s+(?:di\s+)?attivit"
    ).unwrap();

    pub static ref ATECO_CODE: Regex = Regex::new(
        r"\b(\d{2}\.\d{2}(?:\.\d{1,2})?)\b"
    ).unwrap();

    pub static ref EMPLOYEES_LABEL: Regex = Regex::new(
        r"(?i)(?:numero\s+(?:degli\s+)?)?addetti[^0-9\n]*?(?:\d{2}[/.-]\d{2}[/.-]\d{4}[^0-9\n]*)?(\d+(?:,\d+)?)"
    ).unwrap();

    pub static ref SHAREHOLDERS_HEADING: Regex = Regex::new(
        r"(?i)^\s*(?:elenco\s+(?:dei\s+)?soci|soci\s+e\s+titolari|titolari\s+di\s+quote|soci)\b"
    ).unwrap();

    pub static ref SECTION_BREAK: Regex = Regex::new(
        r"(?i)^\s*(?:amministratori|organi\s+sociali|sindaci|sedi\b|attivit[aà]|storia\b|trasferimenti)"
    ).unwrap();

    pub static ref PERCENTAGE: Regex = Regex::new(
        r"(\d{1,3}(?:,\d+)?)\s*%"
    ).unwrap();

    pub static ref HOLDER_LABELS: Regex = Regex::new(
        r"(?i)(?:\bcodice\s+fiscale\b|\bc\.\s?f\.|\bpartita\s+iva\b|\bpropriet[aà]'?|\bsocio\b|\bquota\b)\s*:?"
    ).unwrap();

    // Tax form line codes
    pub static ref REDDITI_REVENUE: Regex = Regex::new(
        r"\bRF ?2\b"
    ).unwrap();

    pub static ref REDDITI_SIMPLIFIED_REVENUE: Regex = Regex::new(
        r"\bRG ?2\b"
    ).unwrap();

    pub static ref IVA_TURNOVER: Regex = Regex::new(
        r"\bVE ?50\b"
    ).unwrap();
}

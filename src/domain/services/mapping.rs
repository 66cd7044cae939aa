use crate::domain::models::member::MemberImport;
use serde::{Deserialize, Serialize};

/// Canonical member fields an uploaded column can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingField {
    CustomerNumber,
    Salutation,
    FirstName,
    LastName,
    Name2,
    Street,
    PostalCode,
    City,
    Email,
    Phone,
    Mobile,
    CommunicationPreference,
}

/// Known header synonyms, mostly German since that is what member rosters
/// arrive in. Order matters: the substring fallback picks the first entry
/// that matches.
const SYNONYMS: &[(&str, MappingField)] = &[
    ("mitgliedsnummer", MappingField::CustomerNumber),
    ("mitgliedsnr", MappingField::CustomerNumber),
    ("mitglieds nr", MappingField::CustomerNumber),
    ("mitglieds nummer", MappingField::CustomerNumber),
    ("kundennummer", MappingField::CustomerNumber),
    ("kunden nr", MappingField::CustomerNumber),
    ("kdnr", MappingField::CustomerNumber),
    ("kd nr", MappingField::CustomerNumber),
    ("nr", MappingField::CustomerNumber),
    ("nummer", MappingField::CustomerNumber),
    ("id", MappingField::CustomerNumber),
    ("anrede", MappingField::Salutation),
    ("titel", MappingField::Salutation),
    ("vorname", MappingField::FirstName),
    ("first name", MappingField::FirstName),
    ("firstname", MappingField::FirstName),
    ("vname", MappingField::FirstName),
    ("nachname", MappingField::LastName),
    ("last name", MappingField::LastName),
    ("lastname", MappingField::LastName),
    ("familienname", MappingField::LastName),
    ("zuname", MappingField::LastName),
    ("nname", MappingField::LastName),
    ("name2", MappingField::Name2),
    ("name 2", MappingField::Name2),
    ("zusatz", MappingField::Name2),
    ("namenszusatz", MappingField::Name2),
    ("adresszusatz", MappingField::Name2),
    ("c/o", MappingField::Name2),
    ("co", MappingField::Name2),
    ("straße", MappingField::Street),
    ("strasse", MappingField::Street),
    ("street", MappingField::Street),
    ("adresse", MappingField::Street),
    ("straße hausnr", MappingField::Street),
    ("strasse hausnr", MappingField::Street),
    ("plz", MappingField::PostalCode),
    ("postleitzahl", MappingField::PostalCode),
    ("postal code", MappingField::PostalCode),
    ("postalcode", MappingField::PostalCode),
    ("zip", MappingField::PostalCode),
    ("ort", MappingField::City),
    ("stadt", MappingField::City),
    ("city", MappingField::City),
    ("wohnort", MappingField::City),
    ("gemeinde", MappingField::City),
    ("email", MappingField::Email),
    ("e mail", MappingField::Email),
    ("mail", MappingField::Email),
    ("telefon", MappingField::Phone),
    ("telefonnummer", MappingField::Phone),
    ("telefon nummer", MappingField::Phone),
    ("tel", MappingField::Phone),
    ("festnetz", MappingField::Phone),
    ("handy", MappingField::Mobile),
    ("handynummer", MappingField::Mobile),
    ("handy nummer", MappingField::Mobile),
    ("mobil", MappingField::Mobile),
    ("mobiltelefon", MappingField::Mobile),
    ("mobil telefon", MappingField::Mobile),
    ("kommunikationspräferenz", MappingField::CommunicationPreference),
    ("kommunikations präferenz", MappingField::CommunicationPreference),
    ("kontaktpräferenz", MappingField::CommunicationPreference),
    ("kontakt präferenz", MappingField::CommunicationPreference),
    ("präferenz", MappingField::CommunicationPreference),
    ("kontaktweg", MappingField::CommunicationPreference),
];

const REQUIRED_FIELDS: &[(MappingField, &str)] = &[
    (MappingField::CustomerNumber, "customerNumber"),
    (MappingField::FirstName, "firstName"),
    (MappingField::LastName, "lastName"),
    (MappingField::Street, "street"),
    (MappingField::PostalCode, "postalCode"),
    (MappingField::City, "city"),
];

/// Correspondence between canonical fields and uploaded column headers.
/// `None` means the field stays at its default for every imported row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub customer_number: Option<String>,
    pub salutation: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name2: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub communication_preference: Option<String>,
}

impl ColumnMapping {
    fn get(&self, field: MappingField) -> &Option<String> {
        match field {
            MappingField::CustomerNumber => &self.customer_number,
            MappingField::Salutation => &self.salutation,
            MappingField::FirstName => &self.first_name,
            MappingField::LastName => &self.last_name,
            MappingField::Name2 => &self.name2,
            MappingField::Street => &self.street,
            MappingField::PostalCode => &self.postal_code,
            MappingField::City => &self.city,
            MappingField::Email => &self.email,
            MappingField::Phone => &self.phone,
            MappingField::Mobile => &self.mobile,
            MappingField::CommunicationPreference => &self.communication_preference,
        }
    }

    fn set(&mut self, field: MappingField, header: &str) {
        let slot = match field {
            MappingField::CustomerNumber => &mut self.customer_number,
            MappingField::Salutation => &mut self.salutation,
            MappingField::FirstName => &mut self.first_name,
            MappingField::LastName => &mut self.last_name,
            MappingField::Name2 => &mut self.name2,
            MappingField::Street => &mut self.street,
            MappingField::PostalCode => &mut self.postal_code,
            MappingField::City => &mut self.city,
            MappingField::Email => &mut self.email,
            MappingField::Phone => &mut self.phone,
            MappingField::Mobile => &mut self.mobile,
            MappingField::CommunicationPreference => &mut self.communication_preference,
        };
        *slot = Some(header.to_string());
    }

    /// Names of required fields that are still unmapped, in canonical order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .filter(|(field, _)| self.get(*field).is_none())
            .map(|(_, name)| *name)
            .collect()
    }

    /// A mapping can be committed only once every required field has a source
    /// column.
    pub fn is_valid(&self) -> bool {
        self.missing_required().is_empty()
    }
}

/// Lowercases, trims and folds `_`/`-` into spaces so "Mitglieds-Nr" and
/// "mitglieds_nr" both hit the same dictionary entry.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect()
}

/// Suggests a mapping from uploaded headers to canonical fields.
///
/// For each header, an exact dictionary match wins; otherwise the first
/// dictionary entry whose key contains the normalized header (or vice versa)
/// and whose target field is still free gets it. A field is assigned at most
/// once and never reassigned.
pub fn suggest_mapping(headers: &[String]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();

    for header in headers {
        let normalized = normalize_header(header);

        if let Some((_, field)) = SYNONYMS.iter().find(|(key, _)| *key == normalized) {
            if mapping.get(*field).is_none() {
                mapping.set(*field, header);
                continue;
            }
        }

        for (key, field) in SYNONYMS {
            if mapping.get(*field).is_none()
                && (normalized.contains(key) || key.contains(normalized.as_str()))
            {
                mapping.set(*field, header);
                break;
            }
        }
    }

    mapping
}

/// Applies a confirmed mapping to one parsed row. `headers` and `row` are
/// positional; a header that appears twice resolves to its first occurrence,
/// and missing cells read as empty.
pub fn apply_mapping(mapping: &ColumnMapping, headers: &[String], row: &[String]) -> MemberImport {
    let value_of = |column: &Option<String>| -> String {
        column
            .as_ref()
            .and_then(|name| headers.iter().position(|h| h == name))
            .and_then(|idx| row.get(idx))
            .cloned()
            .unwrap_or_default()
    };

    MemberImport {
        customer_number: value_of(&mapping.customer_number),
        salutation: value_of(&mapping.salutation),
        first_name: value_of(&mapping.first_name),
        last_name: value_of(&mapping.last_name),
        name2: value_of(&mapping.name2),
        street: value_of(&mapping.street),
        postal_code: value_of(&mapping.postal_code),
        city: value_of(&mapping.city),
        email: value_of(&mapping.email),
        phone: value_of(&mapping.phone),
        mobile: value_of(&mapping.mobile),
        communication_preference: value_of(&mapping.communication_preference),
    }
}

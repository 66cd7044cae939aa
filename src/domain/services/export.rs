use crate::domain::models::member::Member;

/// Export column headers, in file order. German because that is what the
/// cooperative's spreadsheet users expect.
pub const EXPORT_HEADERS: &[&str] = &[
    "Mitgliedsnummer",
    "Anrede",
    "Vorname",
    "Nachname",
    "Name2",
    "Straße",
    "PLZ",
    "Ort",
    "E-Mail",
    "Telefon",
    "Handy",
    "Kommunikationspräferenz",
    "Notizen",
    "Geändert",
    "Geändert am",
    "Bearbeitungslink",
];

/// Flattens members into export rows, adding the derived columns: modified
/// flag as Ja/Nein, the modification date in German day-first format, and the
/// full edit-link URL.
pub fn export_rows(members: &[Member], base_url: &str) -> Vec<Vec<String>> {
    members
        .iter()
        .map(|member| {
            vec![
                member.customer_number.clone(),
                member.salutation.clone(),
                member.first_name.clone(),
                member.last_name.clone(),
                member.name2.clone(),
                member.street.clone(),
                member.postal_code.clone(),
                member.city.clone(),
                member.email.clone().unwrap_or_default(),
                member.phone.clone().unwrap_or_default(),
                member.mobile.clone().unwrap_or_default(),
                member.communication_preference.clone().unwrap_or_default(),
                member.notes.clone(),
                if member.modified { "Ja" } else { "Nein" }.to_string(),
                member
                    .modified_at
                    .map(|at| at.format("%d.%m.%Y").to_string())
                    .unwrap_or_default(),
                member.edit_link(base_url),
            ]
        })
        .collect()
}

use crate::domain::services::mapping::ColumnMapping;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct MemberQuery {
    pub token: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateMemberRequest {
    pub token: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub communication_preference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ListMembersQuery {
    pub page: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Deserialize)]
pub struct RenewRequest {
    pub weeks: i64,
}

#[derive(Deserialize)]
pub struct DeleteAllRequest {
    pub confirmation: String,
}

#[derive(Deserialize)]
pub struct ImportRequest {
    pub mapping: ColumnMapping,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

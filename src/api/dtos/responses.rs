use crate::domain::models::member::Member;
use serde::Serialize;

#[derive(Serialize)]
pub struct MemberPageResponse {
    pub members: Vec<Member>,
    pub total_count: i64,
    pub page: u32,
    pub page_size: i64,
}

#[derive(Serialize)]
pub struct ImportReport {
    pub total: usize,
    pub inserted: usize,
    pub updated: usize,
}

#[derive(Serialize)]
pub struct BulkRenewReport {
    pub updated: usize,
    pub total: usize,
}

use crate::domain::models::member::{AddressUpdate, Member, MemberImport};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn insert(&self, member: &Member) -> Result<Member, AppError>;

    /// Overwrites profile/address/contact data from an import row and
    /// refreshes the expiry window. Token and change tracking are untouched.
    async fn update_from_import(
        &self,
        customer_number: &str,
        import: &MemberImport,
        expiry: DateTime<Utc>,
    ) -> Result<(), AppError>;

    async fn find_by_customer_number(&self, customer_number: &str) -> Result<Option<Member>, AppError>;

    /// Combined token + expiry lookup. Both predicates run in one query so a
    /// token that expires between check and use cannot slip through.
    async fn find_by_token_live(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Member>, AppError>;

    /// Lookup ignoring expiry. Informational only, used to distinguish
    /// "expired" from "not found" in user-facing messages.
    async fn find_by_token(&self, token: &str) -> Result<Option<Member>, AppError>;

    /// Applies a member self-service update. The statement re-checks the
    /// expiry predicate and snapshots the original address on the first
    /// modification. Returns the number of rows affected (0 means the token
    /// expired or vanished between render and submit).
    async fn update_address(
        &self,
        token: &str,
        update: &AddressUpdate,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError>;

    async fn list_page(&self, limit: i64, offset: i64) -> Result<Vec<Member>, AppError>;
    async fn list_customer_numbers(&self, limit: i64, offset: i64) -> Result<Vec<String>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;

    async fn set_expiry(&self, customer_number: &str, expiry: DateTime<Utc>) -> Result<(), AppError>;

    async fn delete(&self, customer_number: &str) -> Result<(), AppError>;
    async fn delete_all(&self) -> Result<u64, AppError>;
}

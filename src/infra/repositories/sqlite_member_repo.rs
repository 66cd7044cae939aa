use crate::domain::models::member::{none_if_blank, AddressUpdate, Member, MemberImport};
use crate::domain::ports::MemberRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteMemberRepo {
    pool: SqlitePool,
}

impl SqliteMemberRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepo {
    async fn insert(&self, member: &Member) -> Result<Member, AppError> {
        sqlx::query_as::<_, Member>(
            "INSERT INTO members (customer_number, salutation, first_name, last_name, name2, street, postal_code, city, email, phone, mobile, communication_preference, notes, token, expiry_date, modified, modified_at, original_street, original_postal_code, original_city, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&member.customer_number)
        .bind(&member.salutation)
        .bind(&member.first_name)
        .bind(&member.last_name)
        .bind(&member.name2)
        .bind(&member.street)
        .bind(&member.postal_code)
        .bind(&member.city)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(&member.mobile)
        .bind(&member.communication_preference)
        .bind(&member.notes)
        .bind(&member.token)
        .bind(member.expiry_date)
        .bind(member.modified)
        .bind(member.modified_at)
        .bind(&member.original_street)
        .bind(&member.original_postal_code)
        .bind(&member.original_city)
        .bind(member.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update_from_import(
        &self,
        customer_number: &str,
        import: &MemberImport,
        expiry: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE members SET salutation=?, first_name=?, last_name=?, name2=?, street=?, postal_code=?, city=?, email=?, phone=?, mobile=?, communication_preference=?, notes='', expiry_date=? \
             WHERE customer_number=?",
        )
        .bind(&import.salutation)
        .bind(&import.first_name)
        .bind(&import.last_name)
        .bind(&import.name2)
        .bind(&import.street)
        .bind(&import.postal_code)
        .bind(&import.city)
        .bind(none_if_blank(import.email.clone()))
        .bind(none_if_blank(import.phone.clone()))
        .bind(none_if_blank(import.mobile.clone()))
        .bind(none_if_blank(import.communication_preference.clone()))
        .bind(expiry)
        .bind(customer_number)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Member not found".into()));
        }
        Ok(())
    }

    async fn find_by_customer_number(&self, customer_number: &str) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE customer_number = ?")
            .bind(customer_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_token_live(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE token = ? AND expiry_date > ?")
            .bind(token)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_address(
        &self,
        token: &str,
        update: &AddressUpdate,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        // The original_* CASE arms read the pre-update row, so the snapshot
        // is taken exactly once, on the first modification.
        let result = sqlx::query(
            "UPDATE members SET \
               original_street = CASE WHEN modified = 0 THEN street ELSE original_street END, \
               original_postal_code = CASE WHEN modified = 0 THEN postal_code ELSE original_postal_code END, \
               original_city = CASE WHEN modified = 0 THEN city ELSE original_city END, \
               street=?, postal_code=?, city=?, email=?, phone=?, mobile=?, communication_preference=?, notes=?, \
               modified=1, modified_at=? \
             WHERE token = ? AND expiry_date > ?",
        )
        .bind(&update.street)
        .bind(&update.postal_code)
        .bind(&update.city)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(&update.mobile)
        .bind(&update.communication_preference)
        .bind(&update.notes)
        .bind(now)
        .bind(token)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }

    async fn list_page(&self, limit: i64, offset: i64) -> Result<Vec<Member>, AppError> {
        sqlx::query_as::<_, Member>(
            "SELECT * FROM members ORDER BY customer_number ASC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_customer_numbers(&self, limit: i64, offset: i64) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>(
            "SELECT customer_number FROM members ORDER BY customer_number ASC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_expiry(&self, customer_number: &str, expiry: DateTime<Utc>) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE members SET expiry_date = ? WHERE customer_number = ?")
            .bind(expiry)
            .bind(customer_number)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Member not found".into()));
        }
        Ok(())
    }

    async fn delete(&self, customer_number: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM members WHERE customer_number = ?")
            .bind(customer_number)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Member not found".into()));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM members")
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }
}

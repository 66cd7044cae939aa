use crate::domain::models::member::{none_if_blank, AddressUpdate, Member, MemberImport};
use crate::domain::ports::MemberRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresMemberRepo {
    pool: PgPool,
}

impl PostgresMemberRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepo {
    async fn insert(&self, member: &Member) -> Result<Member, AppError> {
        sqlx::query_as::<_, Member>(
            "INSERT INTO members (customer_number, salutation, first_name, last_name, name2, street, postal_code, city, email, phone, mobile, communication_preference, notes, token, expiry_date, modified, modified_at, original_street, original_postal_code, original_city, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21) RETURNING *",
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
            "UPDATE members SET salutation=$1, first_name=$2, last_name=$3, name2=$4, street=$5, postal_code=$6, city=$7, email=$8, phone=$9, mobile=$10, communication_preference=$11, notes='', expiry_date=$12 \
             WHERE customer_number=$13",
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
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE customer_number = $1")
            .bind(customer_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_token_live(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE token = $1 AND expiry_date > $2")
            .bind(token)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE token = $1")
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
        // Column references on the right-hand side of SET read the old row,
        // so the snapshot is taken exactly once, on the first modification.
        let result = sqlx::query(
            "UPDATE members SET \
               original_street = CASE WHEN NOT modified THEN street ELSE original_street END, \
               original_postal_code = CASE WHEN NOT modified THEN postal_code ELSE original_postal_code END, \
               original_city = CASE WHEN NOT modified THEN city ELSE original_city END, \
               street=$1, postal_code=$2, city=$3, email=$4, phone=$5, mobile=$6, communication_preference=$7, notes=$8, \
               modified=TRUE, modified_at=$9 \
             WHERE token = $10 AND expiry_date > $11",
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
            "SELECT * FROM members ORDER BY customer_number ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_customer_numbers(&self, limit: i64, offset: i64) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>(
            "SELECT customer_number FROM members ORDER BY customer_number ASC LIMIT $1 OFFSET $2",
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
        let result = sqlx::query("UPDATE members SET expiry_date = $1 WHERE customer_number = $2")
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
        let result = sqlx::query("DELETE FROM members WHERE customer_number = $1")
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

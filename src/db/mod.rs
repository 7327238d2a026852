use anyhow::Result;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use tracing::{debug, info};

use crate::config::Config;
use crate::models::{ClientPatch, ContactRow, Phone, PhoneNumbers, SearchFilter};

// The deployed schema, reproduced verbatim. Uniqueness and the pattern
// checks are enforced here, not in application code. Note the phone CHECK:
// `_` is a SQL wildcard, so the constraint fixes length and the literal
// characters but not digit-ness.
const CREATE_CLIENT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS client(
    id serial PRIMARY KEY,
    first_name VARCHAR(100) NOT NULL,
    last_name VARCHAR(100) NOT NULL,
    email VARCHAR(100) NOT NULL UNIQUE CHECK (email LIKE '%@%.%')
)
"#;

const CREATE_CLIENT_PHONE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS client_phone(
    id serial PRIMARY KEY,
    id_client integer REFERENCES client(id),
    phone_number varchar(16) NOT NULL UNIQUE CHECK (phone_number LIKE '+7(___)___-__-__')
)
"#;

/// Handle over the single registry connection.
///
/// The registry runs against exactly one `PgConnection` for its whole
/// lifetime; every operation borrows the handle mutably, so there is never
/// more than one statement in flight.
pub struct Database {
    conn: PgConnection,
}

impl Database {
    /// Open the registry connection from loaded settings.
    pub async fn connect(config: &Config) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&config.registry_host)
            .port(config.registry_port)
            .username(&config.registry_user)
            .password(config.password())
            .database(&config.registry_db);

        let conn = PgConnection::connect_with(&options).await?;

        Ok(Self { conn })
    }

    /// Open the registry connection from a URL. Used by the integration
    /// tests, which carry their own `TEST_DATABASE_URL`.
    pub async fn connect_url(url: &str) -> Result<Self> {
        let conn = PgConnection::connect(url).await?;

        Ok(Self { conn })
    }

    /// Close the connection explicitly. Early-error exits fall back to the
    /// connection's drop handling.
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;

        Ok(())
    }

    /// Drop and recreate both tables in one transaction.
    ///
    /// Destructive: any existing rows are lost. Safe to call repeatedly;
    /// both the drop and the creates are guarded with IF (NOT) EXISTS.
    pub async fn create_schema(&mut self) -> Result<()> {
        let mut tx = self.conn.begin().await?;

        sqlx::query("DROP TABLE IF EXISTS client_phone, client CASCADE")
            .execute(&mut *tx)
            .await?;
        sqlx::query(CREATE_CLIENT_TABLE).execute(&mut *tx).await?;
        sqlx::query(CREATE_CLIENT_PHONE_TABLE)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!("client and client_phone tables recreated");

        Ok(())
    }

    /// Insert a client row and return its generated id. When `phones` is
    /// given, the numbers are inserted for the new id right away.
    ///
    /// Duplicate or malformed email surfaces as the database's constraint
    /// violation.
    pub async fn add_client(
        &mut self,
        first_name: &str,
        last_name: &str,
        email: &str,
        phones: Option<PhoneNumbers>,
    ) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO client (first_name, last_name, email)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .fetch_one(&mut self.conn)
        .await?;
        debug!(id, "client inserted");

        if let Some(phones) = phones {
            self.add_phones(id, phones).await?;
        }

        Ok(id)
    }

    /// Insert phone rows for a client, one statement per number, in order.
    ///
    /// Each insert commits on its own; a constraint failure partway through
    /// `Many` leaves the earlier rows in place.
    pub async fn add_phones(&mut self, client_id: i32, phones: PhoneNumbers) -> Result<()> {
        for number in phones.as_slice() {
            sqlx::query(
                r#"
                INSERT INTO client_phone (id_client, phone_number)
                VALUES ($1, $2)
                "#,
            )
            .bind(client_id)
            .bind(number)
            .execute(&mut self.conn)
            .await?;
            debug!(client_id, "phone inserted");
        }

        Ok(())
    }

    /// Apply a patch to a client: one single-column UPDATE per present
    /// field, committed together. Absent fields keep their stored values.
    /// Phones, when given, are appended afterwards, never replaced.
    pub async fn update_client(
        &mut self,
        client_id: i32,
        patch: &ClientPatch,
        phones: Option<PhoneNumbers>,
    ) -> Result<()> {
        let mut tx = self.conn.begin().await?;

        if let Some(first_name) = &patch.first_name {
            sqlx::query("UPDATE client SET first_name = $1 WHERE id = $2")
                .bind(first_name)
                .bind(client_id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(last_name) = &patch.last_name {
            sqlx::query("UPDATE client SET last_name = $1 WHERE id = $2")
                .bind(last_name)
                .bind(client_id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(email) = &patch.email {
            sqlx::query("UPDATE client SET email = $1 WHERE id = $2")
                .bind(email)
                .bind(client_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        if let Some(phones) = phones {
            self.add_phones(client_id, phones).await?;
        }

        Ok(())
    }

    /// Delete the phone row matching both the number and the owning client.
    /// Returns the number of rows removed; a missing pair is a no-op (0).
    pub async fn delete_phone(&mut self, client_id: i32, phone: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM client_phone
            WHERE phone_number = $1 AND id_client = $2
            "#,
        )
        .bind(phone)
        .bind(client_id)
        .execute(&mut self.conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete a client and every phone row that references it, phones first
    /// to satisfy the foreign key, in one transaction. A missing id is a
    /// silent no-op for both statements.
    pub async fn delete_client(&mut self, client_id: i32) -> Result<()> {
        let mut tx = self.conn.begin().await?;

        sqlx::query("DELETE FROM client_phone WHERE id_client = $1")
            .bind(client_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM client WHERE id = $1")
            .bind(client_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(client_id, "client deleted");

        Ok(())
    }

    /// Run the joined lookup for the filter's single criterion.
    ///
    /// Returns `None` without touching the database when no criterion is
    /// set. Otherwise returns every matching row of the inner join, so a
    /// client with no phone rows never matches, whichever field is filtered.
    pub async fn find_clients(&mut self, filter: &SearchFilter) -> Result<Option<Vec<ContactRow>>> {
        let Some((column, value)) = filter.criterion() else {
            return Ok(None);
        };

        // The column name comes from the SearchColumn enum, never from user
        // input; the value itself is bound.
        let sql = format!(
            r#"
            SELECT c.first_name, c.last_name, c.email, cp.phone_number
            FROM client AS c
            JOIN client_phone AS cp ON c.id = cp.id_client
            WHERE {} = $1
            "#,
            column.qualified()
        );

        let rows = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(value)
            .fetch_all(&mut self.conn)
            .await?;

        Ok(Some(rows))
    }

    /// All phone rows for a client, in insertion (id) order.
    pub async fn phones_for_client(&mut self, client_id: i32) -> Result<Vec<Phone>> {
        let phones = sqlx::query_as::<_, Phone>(
            r#"
            SELECT id, id_client, phone_number
            FROM client_phone
            WHERE id_client = $1
            ORDER BY id ASC
            "#,
        )
        .bind(client_id)
        .fetch_all(&mut self.conn)
        .await?;

        Ok(phones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The DDL is an external contract; these strings must match the
    // deployed schema byte for byte.
    #[test]
    fn client_ddl_carries_the_email_check() {
        assert!(CREATE_CLIENT_TABLE.contains("email VARCHAR(100) NOT NULL UNIQUE CHECK (email LIKE '%@%.%')"));
    }

    #[test]
    fn phone_ddl_carries_the_pattern_check_and_foreign_key() {
        assert!(CREATE_CLIENT_PHONE_TABLE
            .contains("phone_number varchar(16) NOT NULL UNIQUE CHECK (phone_number LIKE '+7(___)___-__-__')"));
        assert!(CREATE_CLIENT_PHONE_TABLE.contains("id_client integer REFERENCES client(id)"));
    }
}

//! Postgres-backed inventory store.
//!
//! One certificate maps to one SQL transaction. Materials are read with
//! `SELECT ... FOR UPDATE` so concurrent movements against the same row
//! serialize, and correlative allocation takes a transaction-scoped
//! advisory lock per `(company, kind)` before reading the maximum; the
//! unique index on `(company, kind, correlative)` is the backstop. The
//! schema lives in `crates/infra/schema.sql`.
//!
//! ## Error mapping
//!
//! | SQLx error | StoreError | Scenario |
//! |------------|------------|----------|
//! | Database (unique violation) | `Conflict` | Duplicate correlative or id |
//! | Io / PoolClosed / PoolTimedOut | `Connection` | Connectivity loss |
//! | Any other | `Query` | Constraint/statement failures |
//! | Row decode failure | `Corrupt` | Unexpected column shape/content |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;
use uuid::Uuid;

use brigada_certificates::{AssignmentMode, Certificate, CertificateLine, DocumentKind};
use brigada_core::{
    CertificateId, Company, DomainError, FirefighterId, MaterialId, UserId,
};
use brigada_inventory::{
    CertificateRef, CustodyBalance, Material, MaterialHistoryEntry, MaterialLookup, MovementKind,
};
use brigada_personnel::Firefighter;

use super::r#trait::{InventoryStore, InventoryTx, StoreError};

/// Postgres-backed inventory store.
///
/// Thread-safe; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PgInventoryStore {
    pool: Arc<PgPool>,
}

impl PgInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    async fn lines_for(&self, certificate_id: Uuid) -> Result<Vec<CertificateLine>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT material_id, quantity
            FROM certificate_items
            WHERE certificate_id = $1
            ORDER BY line_no ASC
            "#,
        )
        .bind(certificate_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("lines_for", e))?;

        rows.iter().map(line_from_row).collect()
    }
}

/// One open SQL transaction.
///
/// Dropping without `commit` rolls back (sqlx transaction drop semantics).
pub struct PgInventoryTx {
    tx: Transaction<'static, Postgres>,
}

const MATERIAL_COLUMNS: &str =
    "id, company, product_name, brand, model, code, stock_quantity, category";
const CERTIFICATE_COLUMNS: &str =
    "id, kind, company, correlative, firefighter_id, user_id, date, observations, assignment";

#[async_trait]
impl InventoryTx for PgInventoryTx {
    #[instrument(skip(self), fields(material_id = %id), err)]
    async fn material_for_update(
        &mut self,
        id: MaterialId,
    ) -> Result<Option<Material>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("material_for_update", e))?;

        row.as_ref().map(material_from_row).transpose()
    }

    async fn find_material_for_update(
        &mut self,
        company: Company,
        lookup: &MaterialLookup,
    ) -> Result<Option<Material>, StoreError> {
        let row = match lookup {
            MaterialLookup::ByCode(code) => {
                sqlx::query(&format!(
                    r#"
                    SELECT {MATERIAL_COLUMNS} FROM materials
                    WHERE company = $1 AND code = $2
                    ORDER BY id ASC
                    LIMIT 1
                    FOR UPDATE
                    "#
                ))
                .bind(company.as_str())
                .bind(code)
                .fetch_optional(&mut *self.tx)
                .await
            }
            MaterialLookup::ByDescriptor {
                product_name,
                brand,
                model,
            } => {
                sqlx::query(&format!(
                    r#"
                    SELECT {MATERIAL_COLUMNS} FROM materials
                    WHERE company = $1 AND product_name = $2 AND brand = $3 AND model = $4
                    ORDER BY id ASC
                    LIMIT 1
                    FOR UPDATE
                    "#
                ))
                .bind(company.as_str())
                .bind(product_name)
                .bind(brand)
                .bind(model)
                .fetch_optional(&mut *self.tx)
                .await
            }
        }
        .map_err(|e| map_sqlx_error("find_material_for_update", e))?;

        row.as_ref().map(material_from_row).transpose()
    }

    async fn insert_material(&mut self, material: &Material) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO materials
                (id, company, product_name, brand, model, code, stock_quantity, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(material.id.as_uuid())
        .bind(material.company.as_str())
        .bind(&material.product_name)
        .bind(&material.brand)
        .bind(&material.model)
        .bind(material.code())
        .bind(material.stock_quantity)
        .bind(&material.category)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("insert_material", e))?;

        Ok(())
    }

    async fn set_stock(&mut self, id: MaterialId, stock: i64) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE materials SET stock_quantity = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(stock)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("set_stock", e))?;

        if result.rows_affected() != 1 {
            return Err(StoreError::Query(format!(
                "set_stock: material {id} does not exist"
            )));
        }
        Ok(())
    }

    async fn append_history(&mut self, entry: &MaterialHistoryEntry) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO material_history
                (id, material_id, user_id, kind, quantity_change, current_balance,
                 certificate_kind, certificate_id, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(entry.id)
        .bind(entry.material_id.as_uuid())
        .bind(entry.user_id.as_uuid())
        .bind(entry.kind.as_str())
        .bind(entry.quantity_change)
        .bind(entry.current_balance)
        .bind(entry.certificate.kind_str())
        .bind(entry.certificate.certificate_id().map(|c| *c.as_uuid()))
        .bind(&entry.description)
        .bind(entry.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("append_history", e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(company = %company, kind = kind.as_str()), err)]
    async fn max_correlative(
        &mut self,
        company: Company,
        kind: DocumentKind,
    ) -> Result<i64, StoreError> {
        // Serialize allocation per (company, kind); released at commit/rollback.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("correlative:{}:{}", company.as_str(), kind.as_str()))
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("max_correlative.lock", e))?;

        let row = sqlx::query(
            r#"
            SELECT COALESCE(MAX(correlative), 0) AS max_correlative
            FROM certificates
            WHERE company = $1 AND kind = $2
            "#,
        )
        .bind(company.as_str())
        .bind(kind.as_str())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("max_correlative", e))?;

        row.try_get::<i64, _>("max_correlative")
            .map_err(|e| StoreError::Corrupt(format!("max_correlative: {e}")))
    }

    async fn insert_certificate(&mut self, certificate: &Certificate) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO certificates
                (id, kind, company, correlative, firefighter_id, user_id,
                 date, observations, assignment)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(certificate.id.as_uuid())
        .bind(certificate.kind.as_str())
        .bind(certificate.company.as_str())
        .bind(certificate.correlative)
        .bind(certificate.firefighter_id.as_uuid())
        .bind(certificate.user_id.as_uuid())
        .bind(certificate.date)
        .bind(certificate.observations.as_deref())
        .bind(certificate.assignment.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("insert_certificate", e))?;

        for (line_no, line) in certificate.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO certificate_items (certificate_id, line_no, material_id, quantity)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(certificate.id.as_uuid())
            .bind(line_no as i32)
            .bind(line.material_id.as_uuid())
            .bind(line.quantity)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("insert_certificate.line", e))?;
        }

        Ok(())
    }

    async fn firefighter(&mut self, id: FirefighterId) -> Result<Option<Firefighter>, StoreError> {
        let row = sqlx::query("SELECT id, name, company FROM firefighters WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("firefighter", e))?;

        row.as_ref().map(firefighter_from_row).transpose()
    }

    async fn custody(
        &mut self,
        firefighter_id: FirefighterId,
        material_id: MaterialId,
    ) -> Result<Option<CustodyBalance>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT firefighter_id, material_id, quantity
            FROM assigned_materials
            WHERE firefighter_id = $1 AND material_id = $2
            FOR UPDATE
            "#,
        )
        .bind(firefighter_id.as_uuid())
        .bind(material_id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("custody", e))?;

        row.as_ref().map(custody_from_row).transpose()
    }

    async fn upsert_custody(&mut self, balance: &CustodyBalance) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO assigned_materials (firefighter_id, material_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (firefighter_id, material_id)
            DO UPDATE SET quantity = EXCLUDED.quantity
            "#,
        )
        .bind(balance.firefighter_id.as_uuid())
        .bind(balance.material_id.as_uuid())
        .bind(balance.quantity)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("upsert_custody", e))?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn commit(self) -> Result<(), StoreError> {
        self.tx
            .commit()
            .await
            .map_err(|e| map_sqlx_error("commit", e))
    }
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
    type Tx = PgInventoryTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;
        Ok(PgInventoryTx { tx })
    }

    async fn material(&self, id: MaterialId) -> Result<Option<Material>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("material", e))?;

        row.as_ref().map(material_from_row).transpose()
    }

    async fn material_history(
        &self,
        id: MaterialId,
    ) -> Result<Vec<MaterialHistoryEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, material_id, user_id, kind, quantity_change, current_balance,
                   certificate_kind, certificate_id, description, created_at
            FROM material_history
            WHERE material_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("material_history", e))?;

        rows.iter().map(history_from_row).collect()
    }

    async fn certificate(&self, id: CertificateId) -> Result<Option<Certificate>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {CERTIFICATE_COLUMNS} FROM certificates WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("certificate", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut certificate = certificate_from_row(&row)?;
        certificate.lines = self.lines_for(*id.as_uuid()).await?;
        Ok(Some(certificate))
    }

    async fn certificates(
        &self,
        company: Company,
        kind: DocumentKind,
    ) -> Result<Vec<Certificate>, StoreError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {CERTIFICATE_COLUMNS} FROM certificates
            WHERE company = $1 AND kind = $2
            ORDER BY correlative ASC
            "#
        ))
        .bind(company.as_str())
        .bind(kind.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("certificates", e))?;

        let mut certificates = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut certificate = certificate_from_row(row)?;
            certificate.lines = self.lines_for(*certificate.id.as_uuid()).await?;
            certificates.push(certificate);
        }
        Ok(certificates)
    }

    async fn firefighter(&self, id: FirefighterId) -> Result<Option<Firefighter>, StoreError> {
        let row = sqlx::query("SELECT id, name, company FROM firefighters WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("firefighter", e))?;

        row.as_ref().map(firefighter_from_row).transpose()
    }

    async fn custody_for(
        &self,
        firefighter_id: FirefighterId,
    ) -> Result<Vec<CustodyBalance>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT firefighter_id, material_id, quantity
            FROM assigned_materials
            WHERE firefighter_id = $1
            ORDER BY material_id ASC
            "#,
        )
        .bind(firefighter_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("custody_for", e))?;

        rows.iter().map(custody_from_row).collect()
    }
}

fn map_sqlx_error(op: &str, e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(format!("{op}: {db}"))
        }
        sqlx::Error::Io(_) | sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            StoreError::Connection(format!("{op}: {e}"))
        }
        _ => StoreError::Query(format!("{op}: {e}")),
    }
}

fn corrupt(context: &str) -> impl Fn(sqlx::Error) -> StoreError + '_ {
    move |e| StoreError::Corrupt(format!("{context}: {e}"))
}

fn parse_company(s: &str) -> Result<Company, StoreError> {
    s.parse::<Company>()
        .map_err(|e: DomainError| StoreError::Corrupt(e.to_string()))
}

fn material_from_row(row: &PgRow) -> Result<Material, StoreError> {
    let company: String = row.try_get("company").map_err(corrupt("materials.company"))?;
    Ok(Material {
        id: MaterialId::from_uuid(row.try_get("id").map_err(corrupt("materials.id"))?),
        company: parse_company(&company)?,
        product_name: row
            .try_get("product_name")
            .map_err(corrupt("materials.product_name"))?,
        brand: row.try_get("brand").map_err(corrupt("materials.brand"))?,
        model: row.try_get("model").map_err(corrupt("materials.model"))?,
        code: row.try_get("code").map_err(corrupt("materials.code"))?,
        stock_quantity: row
            .try_get("stock_quantity")
            .map_err(corrupt("materials.stock_quantity"))?,
        category: row
            .try_get("category")
            .map_err(corrupt("materials.category"))?,
    })
}

fn history_from_row(row: &PgRow) -> Result<MaterialHistoryEntry, StoreError> {
    let kind: String = row.try_get("kind").map_err(corrupt("history.kind"))?;
    let certificate_kind: Option<String> = row
        .try_get("certificate_kind")
        .map_err(corrupt("history.certificate_kind"))?;
    let certificate_id: Option<Uuid> = row
        .try_get("certificate_id")
        .map_err(corrupt("history.certificate_id"))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(corrupt("history.created_at"))?;

    Ok(MaterialHistoryEntry {
        id: row.try_get("id").map_err(corrupt("history.id"))?,
        material_id: MaterialId::from_uuid(
            row.try_get("material_id")
                .map_err(corrupt("history.material_id"))?,
        ),
        user_id: UserId::from_uuid(row.try_get("user_id").map_err(corrupt("history.user_id"))?),
        kind: MovementKind::parse(&kind).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        quantity_change: row
            .try_get("quantity_change")
            .map_err(corrupt("history.quantity_change"))?,
        current_balance: row
            .try_get("current_balance")
            .map_err(corrupt("history.current_balance"))?,
        certificate: CertificateRef::from_columns(certificate_kind.as_deref(), certificate_id)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        description: row
            .try_get("description")
            .map_err(corrupt("history.description"))?,
        created_at,
    })
}

fn certificate_from_row(row: &PgRow) -> Result<Certificate, StoreError> {
    let kind: String = row.try_get("kind").map_err(corrupt("certificates.kind"))?;
    let company: String = row
        .try_get("company")
        .map_err(corrupt("certificates.company"))?;
    let assignment: String = row
        .try_get("assignment")
        .map_err(corrupt("certificates.assignment"))?;
    let date: NaiveDate = row.try_get("date").map_err(corrupt("certificates.date"))?;

    Ok(Certificate {
        id: CertificateId::from_uuid(row.try_get("id").map_err(corrupt("certificates.id"))?),
        kind: DocumentKind::parse(&kind).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        company: parse_company(&company)?,
        correlative: row
            .try_get("correlative")
            .map_err(corrupt("certificates.correlative"))?,
        firefighter_id: FirefighterId::from_uuid(
            row.try_get("firefighter_id")
                .map_err(corrupt("certificates.firefighter_id"))?,
        ),
        user_id: UserId::from_uuid(
            row.try_get("user_id")
                .map_err(corrupt("certificates.user_id"))?,
        ),
        date,
        observations: row
            .try_get("observations")
            .map_err(corrupt("certificates.observations"))?,
        assignment: AssignmentMode::parse(&assignment)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        lines: Vec::new(),
    })
}

fn line_from_row(row: &PgRow) -> Result<CertificateLine, StoreError> {
    Ok(CertificateLine {
        material_id: MaterialId::from_uuid(
            row.try_get("material_id")
                .map_err(corrupt("certificate_items.material_id"))?,
        ),
        quantity: row
            .try_get("quantity")
            .map_err(corrupt("certificate_items.quantity"))?,
    })
}

fn firefighter_from_row(row: &PgRow) -> Result<Firefighter, StoreError> {
    let company: String = row
        .try_get("company")
        .map_err(corrupt("firefighters.company"))?;
    Ok(Firefighter {
        id: FirefighterId::from_uuid(row.try_get("id").map_err(corrupt("firefighters.id"))?),
        name: row.try_get("name").map_err(corrupt("firefighters.name"))?,
        company: parse_company(&company)?,
    })
}

fn custody_from_row(row: &PgRow) -> Result<CustodyBalance, StoreError> {
    Ok(CustodyBalance {
        firefighter_id: FirefighterId::from_uuid(
            row.try_get("firefighter_id")
                .map_err(corrupt("assigned_materials.firefighter_id"))?,
        ),
        material_id: MaterialId::from_uuid(
            row.try_get("material_id")
                .map_err(corrupt("assigned_materials.material_id"))?,
        ),
        quantity: row
            .try_get("quantity")
            .map_err(corrupt("assigned_materials.quantity"))?,
    })
}

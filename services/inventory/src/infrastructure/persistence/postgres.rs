//! PostgreSQL repository implementations

use async_trait::async_trait;
use almacen_common::{PagedResult, Pagination};
use almacen_errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entities::{
    AuditEntry, MovementDetail, NewAuditEntry, NewMovement, Product, StockLevel, StockLevelDetail,
    Supplier, User, Warehouse,
};
use crate::domain::movement_type::StockChange;
use crate::domain::repositories::{
    AuditFilter, AuditRepository, MovementFilter, MovementRepository, MovementSummary,
    ProductRepository, StockFilter, StockRepository, SupplierRepository, UserRepository,
    WarehouseRepository,
};

use super::rows::{
    movement_detail_from_row, movement_summary_from_row, user_from_row, AuditEntryRow,
    MovementDetailRow, MovementSummaryRow, ProductRow, StockLevelDetailRow, StockLevelRow,
    SupplierRow, UserRow, WarehouseRow,
};

// ============================================================================
// Movements
// ============================================================================

const MOVEMENT_DETAIL_SELECT: &str = r#"
    SELECT m.id, m.movement_type, m.quantity, m.unit_cost, m.unit_price, m.total_cost,
           m.movement_date, m.reference, m.notes, m.batch_code, m.serial_numbers,
           m.expiration_date, m.customer_id, m.created_at,
           p.id AS product_id, p.sku AS product_sku, p.name AS product_name,
           w.id AS warehouse_id, w.code AS warehouse_code, w.name AS warehouse_name,
           wd.id AS warehouse_dest_id, wd.code AS warehouse_dest_code, wd.name AS warehouse_dest_name,
           s.id AS supplier_id, s.code AS supplier_code, s.name AS supplier_name,
           u.id AS created_by, u.username AS created_by_username, u.display_name AS created_by_display_name
    FROM inventory_movements m
    JOIN products p ON p.id = m.product_id
    JOIN warehouses w ON w.id = m.warehouse_id
    LEFT JOIN warehouses wd ON wd.id = m.warehouse_dest_id
    LEFT JOIN suppliers s ON s.id = m.supplier_id
    JOIN users u ON u.id = m.created_by
"#;

pub struct PostgresMovementRepository {
    pool: PgPool,
}

impl PostgresMovementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovementRepository for PostgresMovementRepository {
    async fn insert(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        movement: &NewMovement,
    ) -> AppResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO inventory_movements (
                movement_type, product_id, warehouse_id, warehouse_dest_id, quantity,
                unit_cost, unit_price, total_cost, movement_date,
                reference, notes, batch_code, serial_numbers, expiration_date,
                customer_id, supplier_id, created_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING id
            "#,
        )
        .bind(movement.movement_type.as_str())
        .bind(movement.product_id)
        .bind(movement.warehouse_id)
        .bind(movement.warehouse_dest_id)
        .bind(movement.quantity)
        .bind(movement.unit_cost)
        .bind(movement.unit_price)
        .bind(movement.total_cost)
        .bind(movement.movement_date)
        .bind(movement.reference.as_deref())
        .bind(movement.notes.as_deref())
        .bind(movement.batch_code.as_deref())
        .bind(movement.serial_numbers.as_deref())
        .bind(movement.expiration_date)
        .bind(movement.customer_id)
        .bind(movement.supplier_id)
        .bind(movement.created_by.0)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert movement: {}", e)))?;

        Ok(id)
    }

    async fn find_detail(&self, id: i64) -> AppResult<Option<MovementDetail>> {
        let sql = format!("{} WHERE m.id = $1", MOVEMENT_DETAIL_SELECT);
        let row = sqlx::query_as::<_, MovementDetailRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to query movement: {}", e)))?;

        row.map(movement_detail_from_row).transpose()
    }

    async fn list(
        &self,
        filter: &MovementFilter,
        pagination: Pagination,
    ) -> AppResult<PagedResult<MovementDetail>> {
        let where_clause = r#"
            WHERE ($1::text IS NULL OR m.movement_type = $1)
              AND ($2::uuid IS NULL OR m.product_id = $2)
              AND ($3::uuid IS NULL OR m.warehouse_id = $3 OR m.warehouse_dest_id = $3)
              AND ($4::timestamptz IS NULL OR m.movement_date >= $4)
              AND ($5::timestamptz IS NULL OR m.movement_date <= $5)
        "#;
        let movement_type = filter.movement_type.map(|t| t.as_str());

        let total: (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM inventory_movements m {}",
            where_clause
        ))
        .bind(movement_type)
        .bind(filter.product_id)
        .bind(filter.warehouse_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count movements: {}", e)))?;

        let rows = sqlx::query_as::<_, MovementDetailRow>(&format!(
            "{} {} ORDER BY m.movement_date DESC, m.id DESC LIMIT $6 OFFSET $7",
            MOVEMENT_DETAIL_SELECT, where_clause
        ))
        .bind(movement_type)
        .bind(filter.product_id)
        .bind(filter.warehouse_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(pagination.page_size as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list movements: {}", e)))?;

        let items = rows
            .into_iter()
            .map(movement_detail_from_row)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PagedResult::new(items, total.0 as u64, &pagination))
    }

    async fn list_for_product(
        &self,
        product_id: Uuid,
        pagination: Pagination,
    ) -> AppResult<PagedResult<MovementDetail>> {
        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM inventory_movements WHERE product_id = $1")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to count movements: {}", e)))?;

        let rows = sqlx::query_as::<_, MovementDetailRow>(&format!(
            "{} WHERE m.product_id = $1 ORDER BY m.movement_date DESC, m.id DESC LIMIT $2 OFFSET $3",
            MOVEMENT_DETAIL_SELECT
        ))
        .bind(product_id)
        .bind(pagination.page_size as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list movements: {}", e)))?;

        let items = rows
            .into_iter()
            .map(movement_detail_from_row)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PagedResult::new(items, total.0 as u64, &pagination))
    }

    async fn summary(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<MovementSummary>> {
        let rows = sqlx::query_as::<_, MovementSummaryRow>(
            r#"
            SELECT m.movement_type,
                   COUNT(*) AS count,
                   COALESCE(SUM(m.quantity), 0)::bigint AS total_quantity,
                   COALESCE(SUM(m.total_cost), 0) AS total_value
            FROM inventory_movements m
            WHERE m.movement_date >= $1 AND m.movement_date < $2
            GROUP BY m.movement_type
            ORDER BY m.movement_type
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to summarize movements: {}", e)))?;

        rows.into_iter().map(movement_summary_from_row).collect()
    }
}

// ============================================================================
// Stock levels
// ============================================================================

pub struct PostgresStockRepository {
    pool: PgPool,
}

impl PostgresStockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StockRepository for PostgresStockRepository {
    async fn stock_for_update(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        product_id: Uuid,
        warehouse_id: Uuid,
    ) -> AppResult<i64> {
        let stock: Option<i64> = sqlx::query_scalar(
            "SELECT stock FROM stock_levels WHERE product_id = $1 AND warehouse_id = $2 FOR UPDATE",
        )
        .bind(product_id)
        .bind(warehouse_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to lock stock row: {}", e)))?;

        Ok(stock.unwrap_or(0))
    }

    async fn apply(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        product_id: Uuid,
        change: &StockChange,
    ) -> AppResult<()> {
        let (sql, warehouse_id, amount) = match change {
            StockChange::Delta { warehouse_id, delta } => (
                r#"
                INSERT INTO stock_levels (product_id, warehouse_id, stock, updated_at)
                VALUES ($1, $2, $3, NOW())
                ON CONFLICT (product_id, warehouse_id)
                DO UPDATE SET stock = stock_levels.stock + EXCLUDED.stock, updated_at = NOW()
                "#,
                *warehouse_id,
                *delta,
            ),
            StockChange::Set { warehouse_id, value } => (
                r#"
                INSERT INTO stock_levels (product_id, warehouse_id, stock, updated_at)
                VALUES ($1, $2, $3, NOW())
                ON CONFLICT (product_id, warehouse_id)
                DO UPDATE SET stock = EXCLUDED.stock, updated_at = NOW()
                "#,
                *warehouse_id,
                *value,
            ),
        };

        sqlx::query(sql)
            .bind(product_id)
            .bind(warehouse_id)
            .bind(amount)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to update stock: {}", e)))?;

        Ok(())
    }

    async fn get(&self, product_id: Uuid, warehouse_id: Uuid) -> AppResult<Option<StockLevel>> {
        let row = sqlx::query_as::<_, StockLevelRow>(
            r#"
            SELECT product_id, warehouse_id, stock, updated_at
            FROM stock_levels
            WHERE product_id = $1 AND warehouse_id = $2
            "#,
        )
        .bind(product_id)
        .bind(warehouse_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to query stock: {}", e)))?;

        Ok(row.map(StockLevel::from))
    }

    async fn list(
        &self,
        filter: &StockFilter,
        pagination: Pagination,
    ) -> AppResult<PagedResult<StockLevelDetail>> {
        let where_clause = r#"
            WHERE ($1::uuid IS NULL OR sl.product_id = $1)
              AND ($2::uuid IS NULL OR sl.warehouse_id = $2)
        "#;

        let total: (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM stock_levels sl {}",
            where_clause
        ))
        .bind(filter.product_id)
        .bind(filter.warehouse_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count stock rows: {}", e)))?;

        let rows = sqlx::query_as::<_, StockLevelDetailRow>(&format!(
            r#"
            SELECT sl.product_id, p.sku AS product_sku, p.name AS product_name,
                   sl.warehouse_id, w.code AS warehouse_code, w.name AS warehouse_name,
                   sl.stock, sl.updated_at
            FROM stock_levels sl
            JOIN products p ON p.id = sl.product_id
            JOIN warehouses w ON w.id = sl.warehouse_id
            {}
            ORDER BY p.sku, w.code
            LIMIT $3 OFFSET $4
            "#,
            where_clause
        ))
        .bind(filter.product_id)
        .bind(filter.warehouse_id)
        .bind(pagination.page_size as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list stock rows: {}", e)))?;

        let items = rows.into_iter().map(StockLevelDetail::from).collect();
        Ok(PagedResult::new(items, total.0 as u64, &pagination))
    }
}

// ============================================================================
// Products
// ============================================================================

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn exists(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        id: Uuid,
    ) -> AppResult<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to check product: {}", e)))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, sku, name, category, unit_cost, active,
                   created_at, created_by, updated_at, updated_by
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to query product: {}", e)))?;

        Ok(row.map(Product::from))
    }

    async fn exists_by_sku(&self, sku: &str) -> AppResult<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE sku = $1)")
            .bind(sku)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check sku: {}", e)))
    }

    async fn save(&self, product: &Product) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, name, category, unit_cost, active,
                created_at, created_by, updated_at, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.category.as_deref())
        .bind(product.unit_cost)
        .bind(product.active)
        .bind(product.audit.created_at)
        .bind(product.audit.created_by.map(|u| u.0))
        .bind(product.audit.updated_at)
        .bind(product.audit.updated_by.map(|u| u.0))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save product: {}", e)))?;

        Ok(())
    }

    async fn update(&self, product: &Product) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, category = $3, unit_cost = $4, active = $5,
                updated_at = $6, updated_by = $7
            WHERE id = $1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.category.as_deref())
        .bind(product.unit_cost)
        .bind(product.active)
        .bind(product.audit.updated_at)
        .bind(product.audit.updated_by.map(|u| u.0))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update product: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("product not found"));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let referenced: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM inventory_movements WHERE product_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check product references: {}", e)))?;

        if referenced {
            return Err(AppError::conflict(
                "product has recorded movements and cannot be deleted",
            ));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query("DELETE FROM stock_levels WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete stock rows: {}", e)))?;

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete product: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("product not found"));
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {}", e)))?;
        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> AppResult<PagedResult<Product>> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count products: {}", e)))?;

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, sku, name, category, unit_cost, active,
                   created_at, created_by, updated_at, updated_by
            FROM products
            ORDER BY sku
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.page_size as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list products: {}", e)))?;

        let items = rows.into_iter().map(Product::from).collect();
        Ok(PagedResult::new(items, total.0 as u64, &pagination))
    }
}

// ============================================================================
// Warehouses
// ============================================================================

pub struct PostgresWarehouseRepository {
    pool: PgPool,
}

impl PostgresWarehouseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WarehouseRepository for PostgresWarehouseRepository {
    async fn exists(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        id: Uuid,
    ) -> AppResult<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM warehouses WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to check warehouse: {}", e)))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Warehouse>> {
        let row = sqlx::query_as::<_, WarehouseRow>(
            r#"
            SELECT id, code, name, location, active,
                   created_at, created_by, updated_at, updated_by
            FROM warehouses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to query warehouse: {}", e)))?;

        Ok(row.map(Warehouse::from))
    }

    async fn save(&self, warehouse: &Warehouse) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO warehouses (
                id, code, name, location, active,
                created_at, created_by, updated_at, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(warehouse.id)
        .bind(&warehouse.code)
        .bind(&warehouse.name)
        .bind(warehouse.location.as_deref())
        .bind(warehouse.active)
        .bind(warehouse.audit.created_at)
        .bind(warehouse.audit.created_by.map(|u| u.0))
        .bind(warehouse.audit.updated_at)
        .bind(warehouse.audit.updated_by.map(|u| u.0))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("warehouse code {} already exists", warehouse.code))
            } else {
                AppError::database(format!("Failed to save warehouse: {}", e))
            }
        })?;

        Ok(())
    }

    async fn update(&self, warehouse: &Warehouse) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE warehouses
            SET name = $2, location = $3, active = $4, updated_at = $5, updated_by = $6
            WHERE id = $1
            "#,
        )
        .bind(warehouse.id)
        .bind(&warehouse.name)
        .bind(warehouse.location.as_deref())
        .bind(warehouse.active)
        .bind(warehouse.audit.updated_at)
        .bind(warehouse.audit.updated_by.map(|u| u.0))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update warehouse: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("warehouse not found"));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let referenced: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM inventory_movements
                WHERE warehouse_id = $1 OR warehouse_dest_id = $1
            ) OR EXISTS(
                SELECT 1 FROM stock_levels WHERE warehouse_id = $1 AND stock <> 0
            )
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check warehouse references: {}", e)))?;

        if referenced {
            return Err(AppError::conflict(
                "warehouse has recorded movements or stock and cannot be deleted",
            ));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query("DELETE FROM stock_levels WHERE warehouse_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete stock rows: {}", e)))?;

        let result = sqlx::query("DELETE FROM warehouses WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete warehouse: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("warehouse not found"));
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {}", e)))?;
        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> AppResult<PagedResult<Warehouse>> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM warehouses")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count warehouses: {}", e)))?;

        let rows = sqlx::query_as::<_, WarehouseRow>(
            r#"
            SELECT id, code, name, location, active,
                   created_at, created_by, updated_at, updated_by
            FROM warehouses
            ORDER BY code
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.page_size as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list warehouses: {}", e)))?;

        let items = rows.into_iter().map(Warehouse::from).collect();
        Ok(PagedResult::new(items, total.0 as u64, &pagination))
    }
}

// ============================================================================
// Suppliers
// ============================================================================

pub struct PostgresSupplierRepository {
    pool: PgPool,
}

impl PostgresSupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SupplierRepository for PostgresSupplierRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Supplier>> {
        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            SELECT id, code, name, email, phone,
                   created_at, created_by, updated_at, updated_by
            FROM suppliers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to query supplier: {}", e)))?;

        Ok(row.map(Supplier::from))
    }

    async fn save(&self, supplier: &Supplier) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO suppliers (
                id, code, name, email, phone,
                created_at, created_by, updated_at, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(supplier.id)
        .bind(&supplier.code)
        .bind(&supplier.name)
        .bind(supplier.email.as_deref())
        .bind(supplier.phone.as_deref())
        .bind(supplier.audit.created_at)
        .bind(supplier.audit.created_by.map(|u| u.0))
        .bind(supplier.audit.updated_at)
        .bind(supplier.audit.updated_by.map(|u| u.0))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("supplier code {} already exists", supplier.code))
            } else {
                AppError::database(format!("Failed to save supplier: {}", e))
            }
        })?;

        Ok(())
    }

    async fn update(&self, supplier: &Supplier) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET name = $2, email = $3, phone = $4, updated_at = $5, updated_by = $6
            WHERE id = $1
            "#,
        )
        .bind(supplier.id)
        .bind(&supplier.name)
        .bind(supplier.email.as_deref())
        .bind(supplier.phone.as_deref())
        .bind(supplier.audit.updated_at)
        .bind(supplier.audit.updated_by.map(|u| u.0))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update supplier: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("supplier not found"));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let referenced: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM inventory_movements WHERE supplier_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check supplier references: {}", e)))?;

        if referenced {
            return Err(AppError::conflict(
                "supplier is referenced by movements and cannot be deleted",
            ));
        }

        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete supplier: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("supplier not found"));
        }
        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> AppResult<PagedResult<Supplier>> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count suppliers: {}", e)))?;

        let rows = sqlx::query_as::<_, SupplierRow>(
            r#"
            SELECT id, code, name, email, phone,
                   created_at, created_by, updated_at, updated_by
            FROM suppliers
            ORDER BY code
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.page_size as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list suppliers: {}", e)))?;

        let items = rows.into_iter().map(Supplier::from).collect();
        Ok(PagedResult::new(items, total.0 as u64, &pagination))
    }
}

// ============================================================================
// Users
// ============================================================================

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, display_name, role, active, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to query user: {}", e)))?;

        row.map(user_from_row).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, display_name, role, active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to query user: {}", e)))?;

        row.map(user_from_row).transpose()
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, display_name, role, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.display_name.as_deref())
        .bind(user.role.as_str())
        .bind(user.active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("username {} already exists", user.username))
            } else {
                AppError::database(format!("Failed to save user: {}", e))
            }
        })?;

        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count users: {}", e)))
    }
}

// ============================================================================
// Audit trail
// ============================================================================

pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const AUDIT_INSERT: &str = r#"
    INSERT INTO audit_log (user_id, action, entity, entity_id, detail)
    VALUES ($1, $2, $3, $4, $5)
"#;

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn record_tx(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        entry: &NewAuditEntry,
    ) -> AppResult<()> {
        sqlx::query(AUDIT_INSERT)
            .bind(entry.user_id)
            .bind(&entry.action)
            .bind(&entry.entity)
            .bind(&entry.entity_id)
            .bind(entry.detail.as_ref())
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to write audit entry: {}", e)))?;
        Ok(())
    }

    async fn record(&self, entry: &NewAuditEntry) -> AppResult<()> {
        sqlx::query(AUDIT_INSERT)
            .bind(entry.user_id)
            .bind(&entry.action)
            .bind(&entry.entity)
            .bind(&entry.entity_id)
            .bind(entry.detail.as_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to write audit entry: {}", e)))?;
        Ok(())
    }

    async fn list(
        &self,
        filter: &AuditFilter,
        pagination: Pagination,
    ) -> AppResult<PagedResult<AuditEntry>> {
        let where_clause = r#"
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR action = $2)
              AND ($3::text IS NULL OR entity = $3)
              AND ($4::timestamptz IS NULL OR created_at >= $4)
              AND ($5::timestamptz IS NULL OR created_at <= $5)
        "#;

        let total: (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM audit_log {}",
            where_clause
        ))
        .bind(filter.user_id)
        .bind(filter.action.as_deref())
        .bind(filter.entity.as_deref())
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count audit entries: {}", e)))?;

        let rows = sqlx::query_as::<_, AuditEntryRow>(&format!(
            r#"
            SELECT id, user_id, action, entity, entity_id, detail, created_at
            FROM audit_log
            {}
            ORDER BY id DESC
            LIMIT $6 OFFSET $7
            "#,
            where_clause
        ))
        .bind(filter.user_id)
        .bind(filter.action.as_deref())
        .bind(filter.entity.as_deref())
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(pagination.page_size as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list audit entries: {}", e)))?;

        let items = rows.into_iter().map(AuditEntry::from).collect();
        Ok(PagedResult::new(items, total.0 as u64, &pagination))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

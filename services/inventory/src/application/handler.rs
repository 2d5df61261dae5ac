//! Movement recording and inventory reads

use std::sync::Arc;

use almacen_adapter_postgres::TransactionManager;
use almacen_common::{PagedResult, Pagination, UserId};
use almacen_errors::{AppError, AppResult};
use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::{
    total_cost, AuditEntry, MovementDetail, NewAuditEntry, NewMovement, StockLevelDetail,
};
use crate::domain::repositories::{
    AuditRepository, MovementRepository, MovementSummary, ProductRepository, StockRepository,
    WarehouseRepository,
};

use super::commands::{CreateMovementCommand, MovementInput};
use super::metrics;
use super::queries::{AuditListQuery, MovementListQuery, StockListQuery, SummaryQuery};
use super::validation::{self, MovementContext};

pub struct MovementHandler {
    tx_manager: TransactionManager,
    movement_repo: Arc<dyn MovementRepository>,
    stock_repo: Arc<dyn StockRepository>,
    product_repo: Arc<dyn ProductRepository>,
    warehouse_repo: Arc<dyn WarehouseRepository>,
    audit_repo: Arc<dyn AuditRepository>,
}

impl MovementHandler {
    pub fn new(
        tx_manager: TransactionManager,
        movement_repo: Arc<dyn MovementRepository>,
        stock_repo: Arc<dyn StockRepository>,
        product_repo: Arc<dyn ProductRepository>,
        warehouse_repo: Arc<dyn WarehouseRepository>,
        audit_repo: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            tx_manager,
            movement_repo,
            stock_repo,
            product_repo,
            warehouse_repo,
            audit_repo,
        }
    }

    /// Record a movement: validate, append the ledger row and update the
    /// stock projection, all inside one transaction.
    ///
    /// Any rejection or write failure rolls the whole transaction back, so
    /// callers see either a fully applied movement or no change at all.
    pub async fn create_movement(
        &self,
        cmd: CreateMovementCommand,
        created_by: UserId,
    ) -> AppResult<MovementDetail> {
        let input = match cmd.validate() {
            Ok(input) => input,
            Err(err) => {
                metrics::record_movement_rejected("invalid_input");
                return Err(err);
            }
        };

        let mut tx = self.tx_manager.begin().await?;

        let ctx = self.gather_context(&mut tx, &input).await?;
        if let Err(err) = validation::check(&input, &ctx) {
            warn!(
                movement_type = %input.movement_type,
                product_id = %input.product_id,
                "movement rejected: {}",
                err.public_message()
            );
            metrics::record_movement_rejected(rejection_reason(&err));
            // Dropping the transaction rolls it back.
            return Err(err);
        }

        let movement = NewMovement {
            movement_type: input.movement_type,
            product_id: input.product_id,
            warehouse_id: input.warehouse_id,
            warehouse_dest_id: if input.movement_type.is_transfer() {
                input.warehouse_dest_id
            } else {
                None
            },
            quantity: input.quantity,
            unit_cost: cmd.unit_cost,
            unit_price: cmd.unit_price,
            total_cost: total_cost(input.quantity, cmd.unit_cost),
            movement_date: cmd.movement_date.unwrap_or_else(Utc::now),
            reference: cmd.reference,
            notes: cmd.notes,
            batch_code: cmd.batch_code,
            serial_numbers: cmd.serial_numbers,
            expiration_date: cmd.expiration_date,
            customer_id: cmd.customer_id,
            supplier_id: cmd.supplier_id,
            created_by,
        };

        let id = self.movement_repo.insert(&mut tx, &movement).await?;

        let changes = input.movement_type.stock_changes(
            input.warehouse_id,
            movement.warehouse_dest_id,
            input.quantity,
        )?;
        for change in &changes {
            self.stock_repo.apply(&mut tx, input.product_id, change).await?;
        }

        let audit = NewAuditEntry::new(created_by.0, "create", "movement", id).with_detail(json!({
            "type": input.movement_type.as_str(),
            "product_id": input.product_id,
            "warehouse_id": input.warehouse_id,
            "quantity": input.quantity,
        }));
        self.audit_repo.record_tx(&mut tx, &audit).await?;

        TransactionManager::commit(tx).await?;

        info!(
            movement_id = id,
            movement_type = %input.movement_type,
            quantity = input.quantity,
            "movement recorded"
        );
        metrics::record_movement_accepted(input.movement_type);

        self.movement_repo
            .find_detail(id)
            .await?
            .ok_or_else(|| AppError::internal("recorded movement not found"))
    }

    /// Collect the validator's inputs inside the open transaction
    ///
    /// For outbound movements the origin stock row is locked with
    /// `SELECT ... FOR UPDATE` before the availability check, so two
    /// concurrent outbound movements serialize on that row instead of both
    /// passing against a stale read. For transfers the origin and
    /// destination rows are locked in ascending warehouse id order to keep
    /// opposite transfers from deadlocking.
    async fn gather_context(
        &self,
        tx: &mut sqlx::Transaction<'static, sqlx::Postgres>,
        input: &MovementInput,
    ) -> AppResult<MovementContext> {
        let product_exists = self.product_repo.exists(tx, input.product_id).await?;
        let warehouse_exists = self.warehouse_repo.exists(tx, input.warehouse_id).await?;
        let dest_warehouse_exists = match input.warehouse_dest_id {
            Some(dest) => Some(self.warehouse_repo.exists(tx, dest).await?),
            None => None,
        };

        let available_stock = if input.movement_type.is_outbound() {
            let mut lock_order = vec![input.warehouse_id];
            if input.movement_type.is_transfer() {
                if let Some(dest) = input.warehouse_dest_id {
                    if dest != input.warehouse_id {
                        lock_order.push(dest);
                    }
                }
            }
            lock_order.sort();

            let mut origin_stock = 0;
            for warehouse_id in lock_order {
                let stock = self
                    .stock_repo
                    .stock_for_update(tx, input.product_id, warehouse_id)
                    .await?;
                if warehouse_id == input.warehouse_id {
                    origin_stock = stock;
                }
            }
            origin_stock
        } else {
            0
        };

        Ok(MovementContext {
            product_exists,
            warehouse_exists,
            dest_warehouse_exists,
            available_stock,
        })
    }

    pub async fn get_movement(&self, id: i64) -> AppResult<MovementDetail> {
        self.movement_repo
            .find_detail(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("movement {} not found", id)))
    }

    pub async fn list_movements(
        &self,
        query: &MovementListQuery,
    ) -> AppResult<PagedResult<MovementDetail>> {
        let filter = query.filter()?;
        self.movement_repo.list(&filter, query.pagination()).await
    }

    pub async fn list_movements_for_product(
        &self,
        product_id: Uuid,
        pagination: Pagination,
    ) -> AppResult<PagedResult<MovementDetail>> {
        self.movement_repo
            .list_for_product(product_id, pagination)
            .await
    }

    pub async fn movement_summary(&self, query: &SummaryQuery) -> AppResult<Vec<MovementSummary>> {
        let (start, end) = query.range()?;
        self.movement_repo.summary(start, end).await
    }

    pub async fn list_stock(
        &self,
        query: &StockListQuery,
    ) -> AppResult<PagedResult<StockLevelDetail>> {
        self.stock_repo
            .list(&query.filter(), query.pagination())
            .await
    }

    pub async fn list_audit(
        &self,
        query: &AuditListQuery,
    ) -> AppResult<PagedResult<AuditEntry>> {
        self.audit_repo
            .list(&query.filter(), query.pagination())
            .await
    }
}

fn rejection_reason(err: &AppError) -> &'static str {
    match err {
        AppError::NotFound(_) => "unknown_entity",
        AppError::Validation(msg) if msg.starts_with("insufficient stock") => "insufficient_stock",
        AppError::Validation(_) => "invalid_input",
        _ => "other",
    }
}

//! End-to-end movement recording against a real database
//!
//! These tests need `DATABASE_URL` pointing at a disposable PostgreSQL
//! instance; they skip silently when it is not set.

use std::sync::Arc;

use almacen_adapter_postgres::{MigrationManager, TransactionManager};
use almacen_common::{AuditInfo, UserId};
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use uuid::Uuid;

use inventory_api::application::commands::CreateMovementCommand;
use inventory_api::application::MovementHandler;
use inventory_api::domain::entities::{Product, User, UserRole, Warehouse};
use inventory_api::domain::repositories::{
    ProductRepository, StockRepository, UserRepository, WarehouseRepository,
};
use inventory_api::infrastructure::migrations::migrations;
use inventory_api::infrastructure::persistence::{
    PostgresAuditRepository, PostgresMovementRepository, PostgresProductRepository,
    PostgresStockRepository, PostgresUserRepository, PostgresWarehouseRepository,
};

static MIGRATED: OnceCell<()> = OnceCell::const_new();

struct Ctx {
    pool: PgPool,
    movements: Arc<MovementHandler>,
    stock: Arc<PostgresStockRepository>,
    user: UserId,
    product: Uuid,
    w1: Uuid,
    w2: Uuid,
}

async fn setup() -> Option<Ctx> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPool::connect(&url).await.expect("database connection");

    MIGRATED
        .get_or_init(|| {
            let pool = pool.clone();
            async move {
                MigrationManager::new(pool)
                    .migrate(&migrations())
                    .await
                    .expect("migrations");
            }
        })
        .await;

    let tag = Uuid::now_v7().simple().to_string();

    let user_repo = PostgresUserRepository::new(pool.clone());
    let user = User {
        id: Uuid::now_v7(),
        username: format!("tester-{}", tag),
        password_hash: "unused".to_string(),
        display_name: None,
        role: UserRole::Operator,
        active: true,
        created_at: Utc::now(),
    };
    user_repo.save(&user).await.expect("seed user");
    let user_id = UserId::from_uuid(user.id);

    let product_repo = PostgresProductRepository::new(pool.clone());
    let product = Product {
        id: Uuid::now_v7(),
        sku: format!("SKU-{}", tag),
        name: "Test product".to_string(),
        category: None,
        unit_cost: None,
        active: true,
        audit: AuditInfo::new(Some(user_id)),
    };
    product_repo.save(&product).await.expect("seed product");

    let warehouse_repo = PostgresWarehouseRepository::new(pool.clone());
    let mut warehouse_ids = Vec::new();
    for suffix in ["A", "B"] {
        let warehouse = Warehouse {
            id: Uuid::now_v7(),
            code: format!("WH-{}-{}", suffix, tag),
            name: format!("Warehouse {}", suffix),
            location: None,
            active: true,
            audit: AuditInfo::new(Some(user_id)),
        };
        warehouse_repo.save(&warehouse).await.expect("seed warehouse");
        warehouse_ids.push(warehouse.id);
    }

    let movements = Arc::new(MovementHandler::new(
        TransactionManager::new(pool.clone()),
        Arc::new(PostgresMovementRepository::new(pool.clone())),
        Arc::new(PostgresStockRepository::new(pool.clone())),
        Arc::new(PostgresProductRepository::new(pool.clone())),
        Arc::new(PostgresWarehouseRepository::new(pool.clone())),
        Arc::new(PostgresAuditRepository::new(pool.clone())),
    ));

    Some(Ctx {
        stock: Arc::new(PostgresStockRepository::new(pool.clone())),
        pool,
        movements,
        user: user_id,
        product: product.id,
        w1: warehouse_ids[0],
        w2: warehouse_ids[1],
    })
}

fn cmd(movement_type: &str, product: Uuid, warehouse: Uuid, quantity: i64) -> CreateMovementCommand {
    CreateMovementCommand {
        movement_type: Some(movement_type.to_string()),
        product_id: Some(product),
        warehouse_id: Some(warehouse),
        warehouse_dest_id: None,
        quantity: Some(quantity),
        unit_cost: None,
        unit_price: None,
        movement_date: None,
        reference: None,
        notes: None,
        batch_code: None,
        serial_numbers: None,
        expiration_date: None,
        customer_id: None,
        supplier_id: None,
    }
}

async fn stock_of(ctx: &Ctx, warehouse: Uuid) -> i64 {
    ctx.stock
        .get(ctx.product, warehouse)
        .await
        .expect("stock lookup")
        .map(|s| s.stock)
        .unwrap_or(0)
}

async fn ledger_count(ctx: &Ctx) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM inventory_movements WHERE product_id = $1")
        .bind(ctx.product)
        .fetch_one(&ctx.pool)
        .await
        .expect("ledger count")
}

#[tokio::test]
async fn test_entrada_transfer_ajuste_scenario() {
    let Some(ctx) = setup().await else { return };

    let mut entrada = cmd("entrada", ctx.product, ctx.w1, 20);
    entrada.unit_cost = Some(Decimal::new(1000, 2)); // 10.00
    let detail = ctx
        .movements
        .create_movement(entrada, ctx.user)
        .await
        .expect("entrada");
    assert_eq!(detail.total_cost, Some(Decimal::new(20000, 2))); // 200.00
    assert_eq!(detail.quantity, 20);
    assert_eq!(stock_of(&ctx, ctx.w1).await, 20);

    let mut transfer = cmd("transferencia", ctx.product, ctx.w1, 8);
    transfer.warehouse_dest_id = Some(ctx.w2);
    let detail = ctx
        .movements
        .create_movement(transfer, ctx.user)
        .await
        .expect("transferencia");
    assert!(detail.warehouse_dest.is_some());
    assert_eq!(stock_of(&ctx, ctx.w1).await, 12);
    assert_eq!(stock_of(&ctx, ctx.w2).await, 8);

    // Ajuste sets an absolute value, not a delta.
    ctx.movements
        .create_movement(cmd("ajuste", ctx.product, ctx.w1, 50), ctx.user)
        .await
        .expect("ajuste");
    assert_eq!(stock_of(&ctx, ctx.w1).await, 50);
    assert_eq!(stock_of(&ctx, ctx.w2).await, 8);
}

#[tokio::test]
async fn test_zero_quantity_rejected_without_side_effects() {
    let Some(ctx) = setup().await else { return };

    for movement_type in ["entrada", "salida", "transferencia", "ajuste"] {
        let err = ctx
            .movements
            .create_movement(cmd(movement_type, ctx.product, ctx.w1, 0), ctx.user)
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "quantity cannot be zero");
    }

    assert_eq!(ledger_count(&ctx).await, 0);
    assert_eq!(stock_of(&ctx, ctx.w1).await, 0);
}

#[tokio::test]
async fn test_insufficient_stock_leaves_state_unchanged() {
    let Some(ctx) = setup().await else { return };

    ctx.movements
        .create_movement(cmd("entrada", ctx.product, ctx.w1, 5), ctx.user)
        .await
        .expect("entrada");

    let err = ctx
        .movements
        .create_movement(cmd("salida", ctx.product, ctx.w1, 10), ctx.user)
        .await
        .unwrap_err();
    assert_eq!(
        err.public_message(),
        "insufficient stock: requested 10, available 5"
    );

    assert_eq!(stock_of(&ctx, ctx.w1).await, 5);
    assert_eq!(ledger_count(&ctx).await, 1);
}

#[tokio::test]
async fn test_transfer_to_same_warehouse_rejected() {
    let Some(ctx) = setup().await else { return };

    ctx.movements
        .create_movement(cmd("entrada", ctx.product, ctx.w1, 10), ctx.user)
        .await
        .expect("entrada");

    let mut transfer = cmd("transferencia", ctx.product, ctx.w1, 5);
    transfer.warehouse_dest_id = Some(ctx.w1);
    let err = ctx
        .movements
        .create_movement(transfer, ctx.user)
        .await
        .unwrap_err();
    assert_eq!(
        err.public_message(),
        "destination warehouse must differ from origin"
    );
    assert_eq!(stock_of(&ctx, ctx.w1).await, 10);
}

#[tokio::test]
async fn test_unknown_product_rejected() {
    let Some(ctx) = setup().await else { return };

    let err = ctx
        .movements
        .create_movement(cmd("entrada", Uuid::now_v7(), ctx.w1, 5), ctx.user)
        .await
        .unwrap_err();
    assert_eq!(err.public_message(), "product not found");
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_round_trip_returns_stock_to_origin() {
    let Some(ctx) = setup().await else { return };

    ctx.movements
        .create_movement(cmd("entrada", ctx.product, ctx.w1, 5), ctx.user)
        .await
        .expect("entrada");
    ctx.movements
        .create_movement(cmd("salida", ctx.product, ctx.w1, 5), ctx.user)
        .await
        .expect("salida");

    assert_eq!(stock_of(&ctx, ctx.w1).await, 0);
    assert_eq!(ledger_count(&ctx).await, 2);
}

#[tokio::test]
async fn test_concurrent_salidas_never_drive_stock_negative() {
    let Some(ctx) = setup().await else { return };

    ctx.movements
        .create_movement(cmd("entrada", ctx.product, ctx.w1, 10), ctx.user)
        .await
        .expect("entrada");

    let a = ctx
        .movements
        .create_movement(cmd("salida", ctx.product, ctx.w1, 6), ctx.user);
    let b = ctx
        .movements
        .create_movement(cmd("salida", ctx.product, ctx.w1, 6), ctx.user);
    let (a, b) = tokio::join!(a, b);

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one concurrent salida may pass");

    let failure = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    assert!(failure
        .public_message()
        .starts_with("insufficient stock: requested 6"));

    assert_eq!(stock_of(&ctx, ctx.w1).await, 4);
}

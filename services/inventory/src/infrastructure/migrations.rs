//! Embedded schema

use almacen_adapter_postgres::Migration;

pub fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "create_users",
            r#"
            CREATE TABLE users (
                id UUID PRIMARY KEY,
                username VARCHAR(100) NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                display_name VARCHAR(200),
                role VARCHAR(20) NOT NULL,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        ),
        Migration::new(
            2,
            "create_master_data",
            r#"
            CREATE TABLE products (
                id UUID PRIMARY KEY,
                sku VARCHAR(100) NOT NULL UNIQUE,
                name VARCHAR(255) NOT NULL,
                category VARCHAR(100),
                unit_cost NUMERIC(14, 2),
                active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL,
                created_by UUID REFERENCES users(id),
                updated_at TIMESTAMPTZ NOT NULL,
                updated_by UUID REFERENCES users(id)
            );

            CREATE TABLE warehouses (
                id UUID PRIMARY KEY,
                code VARCHAR(50) NOT NULL UNIQUE,
                name VARCHAR(255) NOT NULL,
                location VARCHAR(255),
                active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL,
                created_by UUID REFERENCES users(id),
                updated_at TIMESTAMPTZ NOT NULL,
                updated_by UUID REFERENCES users(id)
            );

            CREATE TABLE suppliers (
                id UUID PRIMARY KEY,
                code VARCHAR(50) NOT NULL UNIQUE,
                name VARCHAR(255) NOT NULL,
                email VARCHAR(255),
                phone VARCHAR(50),
                created_at TIMESTAMPTZ NOT NULL,
                created_by UUID REFERENCES users(id),
                updated_at TIMESTAMPTZ NOT NULL,
                updated_by UUID REFERENCES users(id)
            )
            "#,
        ),
        Migration::new(
            3,
            "create_inventory_ledger",
            r#"
            CREATE TABLE inventory_movements (
                id BIGSERIAL PRIMARY KEY,
                movement_type VARCHAR(20) NOT NULL
                    CHECK (movement_type IN ('entrada', 'salida', 'transferencia', 'ajuste')),
                product_id UUID NOT NULL REFERENCES products(id),
                warehouse_id UUID NOT NULL REFERENCES warehouses(id),
                warehouse_dest_id UUID REFERENCES warehouses(id),
                quantity BIGINT NOT NULL CHECK (quantity <> 0),
                unit_cost NUMERIC(14, 2),
                unit_price NUMERIC(14, 2),
                total_cost NUMERIC(14, 2),
                movement_date TIMESTAMPTZ NOT NULL,
                reference VARCHAR(255),
                notes TEXT,
                batch_code VARCHAR(100),
                serial_numbers TEXT,
                expiration_date DATE,
                customer_id UUID,
                supplier_id UUID REFERENCES suppliers(id),
                created_by UUID NOT NULL REFERENCES users(id),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );

            CREATE INDEX idx_movements_product ON inventory_movements (product_id, movement_date DESC);
            CREATE INDEX idx_movements_warehouse ON inventory_movements (warehouse_id);
            CREATE INDEX idx_movements_date ON inventory_movements (movement_date);

            CREATE TABLE stock_levels (
                product_id UUID NOT NULL REFERENCES products(id),
                warehouse_id UUID NOT NULL REFERENCES warehouses(id),
                stock BIGINT NOT NULL DEFAULT 0,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (product_id, warehouse_id)
            )
            "#,
        ),
        Migration::new(
            4,
            "create_audit_log",
            r#"
            CREATE TABLE audit_log (
                id BIGSERIAL PRIMARY KEY,
                user_id UUID NOT NULL,
                action VARCHAR(50) NOT NULL,
                entity VARCHAR(50) NOT NULL,
                entity_id VARCHAR(100) NOT NULL,
                detail JSONB,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );

            CREATE INDEX idx_audit_user ON audit_log (user_id, created_at DESC);
            CREATE INDEX idx_audit_entity ON audit_log (entity, entity_id)
            "#,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_are_unique_and_ordered() {
        let migrations = migrations();
        let mut versions: Vec<i64> = migrations.iter().map(|m| m.version).collect();
        let original = versions.clone();
        versions.sort_unstable();
        versions.dedup();
        assert_eq!(versions, original);
    }
}

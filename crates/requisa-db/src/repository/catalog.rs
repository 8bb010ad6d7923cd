//! # Catalog Repositories
//!
//! Database operations for the plant catalog: areas and machines.
//! Requisitions reference these optionally; neither carries any lifecycle
//! logic of its own.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use requisa_core::{validation, Area, Machine};

use crate::error::{DbError, DbResult};

// =============================================================================
// Areas
// =============================================================================

/// Repository for plant area database operations.
#[derive(Debug, Clone)]
pub struct AreaRepository {
    pool: SqlitePool,
}

impl AreaRepository {
    /// Creates a new AreaRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AreaRepository { pool }
    }

    /// Inserts a new area.
    ///
    /// ## Returns
    /// * `Ok(Area)` - Inserted area
    /// * `Err(DbError::UniqueViolation)` - Code already exists
    pub async fn create_area(&self, code: &str, name: &str) -> DbResult<Area> {
        validation::validate_code(code)?;
        validation::validate_name(name)?;

        debug!(code = %code, "Inserting area");

        let area = Area {
            id: Uuid::new_v4().to_string(),
            code: code.trim().to_string(),
            name: name.trim().to_string(),
        };

        sqlx::query("INSERT INTO areas (id, code, name) VALUES (?1, ?2, ?3)")
            .bind(&area.id)
            .bind(&area.code)
            .bind(&area.name)
            .execute(&self.pool)
            .await?;

        Ok(area)
    }

    /// Gets an area by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Area>> {
        let area = sqlx::query_as::<_, Area>("SELECT id, code, name FROM areas WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(area)
    }

    /// Lists all areas, ordered by code.
    pub async fn list(&self) -> DbResult<Vec<Area>> {
        let areas = sqlx::query_as::<_, Area>("SELECT id, code, name FROM areas ORDER BY code")
            .fetch_all(&self.pool)
            .await?;

        Ok(areas)
    }
}

// =============================================================================
// Machines
// =============================================================================

/// Repository for machine database operations.
#[derive(Debug, Clone)]
pub struct MachineRepository {
    pool: SqlitePool,
}

impl MachineRepository {
    /// Creates a new MachineRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MachineRepository { pool }
    }

    /// Inserts a new machine, optionally tied to an area.
    ///
    /// ## Returns
    /// * `Ok(Machine)` - Inserted machine
    /// * `Err(DbError::NotFound)` - Referenced area does not resolve
    /// * `Err(DbError::UniqueViolation)` - Code already exists
    pub async fn create_machine(
        &self,
        code: &str,
        name: &str,
        area_id: Option<&str>,
    ) -> DbResult<Machine> {
        validation::validate_code(code)?;
        validation::validate_name(name)?;

        if let Some(area_id) = area_id {
            let exists: Option<String> =
                sqlx::query_scalar("SELECT id FROM areas WHERE id = ?1")
                    .bind(area_id)
                    .fetch_optional(&self.pool)
                    .await?;
            if exists.is_none() {
                return Err(DbError::not_found("Area", area_id));
            }
        }

        debug!(code = %code, "Inserting machine");

        let machine = Machine {
            id: Uuid::new_v4().to_string(),
            code: code.trim().to_string(),
            name: name.trim().to_string(),
            area_id: area_id.map(str::to_string),
        };

        sqlx::query("INSERT INTO machines (id, code, name, area_id) VALUES (?1, ?2, ?3, ?4)")
            .bind(&machine.id)
            .bind(&machine.code)
            .bind(&machine.name)
            .bind(machine.area_id.as_deref())
            .execute(&self.pool)
            .await?;

        Ok(machine)
    }

    /// Gets a machine by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Machine>> {
        let machine = sqlx::query_as::<_, Machine>(
            "SELECT id, code, name, area_id FROM machines WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(machine)
    }

    /// Lists all machines, ordered by code.
    pub async fn list(&self) -> DbResult<Vec<Machine>> {
        let machines = sqlx::query_as::<_, Machine>(
            "SELECT id, code, name, area_id FROM machines ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(machines)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

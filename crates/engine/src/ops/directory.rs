//! Directory operations: user/profile creation and lookups.
//!
//! Every profile creation inserts the `users` row and the role profile in
//! one transaction; human-readable ids come from the sequence allocator.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, employees, locations, managers, milk_received, sellers,
    users::{self, Role},
    util::ensure_not_negative,
};

use super::{Engine, integrity_guard, next_sequence_id, normalize_required, with_tx};

/// Per-location seller and inbound-milk statistics for one date.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocationStats {
    pub location_id: String,
    pub location_name: String,
    pub address: String,
    pub seller_count: u64,
    pub milk_received_today: Decimal,
    pub farm_milk_today: Decimal,
    pub inter_seller_milk_today: Decimal,
}

impl Engine {
    /// Create a manager profile (and its user) with the next `managerNNN` id.
    pub async fn create_manager(
        &self,
        username: &str,
        password: &str,
        name: &str,
    ) -> ResultEngine<managers::Model> {
        let username = normalize_required(username, "username")?;
        let name = normalize_required(name, "name")?;

        with_tx!(self, |tx| {
            let user_id = insert_user(&tx, &username, password, Role::Manager).await?;
            let manager_id = next_sequence_id(&tx, "managers", "manager").await?;
            let manager = managers::ActiveModel {
                id: Set(manager_id),
                name: Set(name.clone()),
                user_id: Set(user_id),
                created_at: Set(Utc::now()),
            }
            .insert(&tx)
            .await?;
            Ok(manager)
        })
    }

    /// Create an employee profile under a manager with the next `EMPNNN` id.
    pub async fn create_employee(
        &self,
        manager_id: &str,
        username: &str,
        password: &str,
        name: &str,
        base_salary: Decimal,
    ) -> ResultEngine<employees::Model> {
        let username = normalize_required(username, "username")?;
        let name = normalize_required(name, "name")?;
        ensure_not_negative(base_salary, "base salary")?;

        with_tx!(self, |tx| {
            managers::Entity::find_by_id(manager_id)
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("manager not exists".to_string()))?;

            let user_id = insert_user(&tx, &username, password, Role::Employee).await?;
            let employee_id = next_sequence_id(&tx, "employees", "EMP").await?;
            let employee = employees::ActiveModel {
                id: Set(employee_id),
                name: Set(name.clone()),
                base_salary: Set(base_salary),
                user_id: Set(user_id),
                manager_id: Set(manager_id.to_string()),
                active: Set(true),
                created_at: Set(Utc::now()),
            }
            .insert(&tx)
            .await?;
            Ok(employee)
        })
    }

    pub async fn create_location(&self, name: &str, address: &str) -> ResultEngine<locations::Model> {
        let name = normalize_required(name, "location name")?;
        let address = normalize_required(address, "address")?;

        let location = locations::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name),
            address: Set(address),
            created_at: Set(Utc::now()),
        }
        .insert(&self.database)
        .await?;
        Ok(location)
    }

    /// Create a seller profile (and its user) at an existing location.
    pub async fn create_seller(
        &self,
        location_id: &str,
        username: &str,
        password: &str,
        name: &str,
    ) -> ResultEngine<sellers::Model> {
        let username = normalize_required(username, "username")?;
        let name = normalize_required(name, "name")?;

        with_tx!(self, |tx| {
            locations::Entity::find_by_id(location_id)
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("location not exists".to_string()))?;

            let user_id = insert_user(&tx, &username, password, Role::Seller).await?;
            let seller = sellers::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                name: Set(name.clone()),
                location_id: Set(location_id.to_string()),
                user_id: Set(user_id),
                active: Set(true),
                created_at: Set(Utc::now()),
            }
            .insert(&tx)
            .await?;
            Ok(seller)
        })
    }

    /// Managers whose user account is still active.
    pub async fn list_managers(&self) -> ResultEngine<Vec<managers::Model>> {
        let managers = managers::Entity::find().all(&self.database).await?;
        let user_ids: Vec<String> = managers.iter().map(|m| m.user_id.clone()).collect();
        if user_ids.is_empty() {
            return Ok(managers);
        }

        let active_users: std::collections::HashSet<String> = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids))
            .filter(users::Column::Active.eq(true))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|user| user.id)
            .collect();
        Ok(managers
            .into_iter()
            .filter(|manager| active_users.contains(&manager.user_id))
            .collect())
    }

    /// Admin removes a manager from service. The user account is
    /// deactivated rather than deleted, so issued receipts and daily
    /// records keep their references.
    pub async fn deactivate_manager(&self, manager_id: &str) -> ResultEngine<()> {
        with_tx!(self, |tx| {
            let manager = managers::Entity::find_by_id(manager_id)
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("manager not exists".to_string()))?;
            let user = users::Entity::find_by_id(manager.user_id)
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("user not exists".to_string()))?;

            let mut active: users::ActiveModel = user.into();
            active.active = Set(false);
            active.update(&tx).await?;
            Ok(())
        })
    }

    pub async fn list_active_sellers(&self) -> ResultEngine<Vec<sellers::Model>> {
        Ok(sellers::Entity::find()
            .filter(sellers::Column::Active.eq(true))
            .all(&self.database)
            .await?)
    }

    /// Active employees reporting to a manager.
    pub async fn list_employees(&self, manager_id: &str) -> ResultEngine<Vec<employees::Model>> {
        Ok(employees::Entity::find()
            .filter(employees::Column::ManagerId.eq(manager_id))
            .filter(employees::Column::Active.eq(true))
            .all(&self.database)
            .await?)
    }

    /// Resolve the manager profile behind an authenticated user.
    pub async fn manager_by_user(&self, user_id: &str) -> ResultEngine<managers::Model> {
        managers::Entity::find()
            .filter(managers::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("manager profile not exists".to_string()))
    }

    /// Resolve the seller profile behind an authenticated user.
    pub async fn seller_by_user(&self, user_id: &str) -> ResultEngine<sellers::Model> {
        sellers::Entity::find()
            .filter(sellers::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("seller profile not exists".to_string()))
    }

    /// Resolve the employee profile behind an authenticated user.
    pub async fn employee_by_user(&self, user_id: &str) -> ResultEngine<employees::Model> {
        employees::Entity::find()
            .filter(employees::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("employee profile not exists".to_string()))
    }

    /// Per-location statistics: active seller count plus the day's inbound
    /// milk, split by source.
    pub async fn location_statistics(&self, date: NaiveDate) -> ResultEngine<Vec<LocationStats>> {
        let locations = locations::Entity::find().all(&self.database).await?;

        let mut stats = Vec::with_capacity(locations.len());
        for location in locations {
            let seller_ids: Vec<String> = sellers::Entity::find()
                .filter(sellers::Column::LocationId.eq(location.id.clone()))
                .filter(sellers::Column::Active.eq(true))
                .all(&self.database)
                .await?
                .into_iter()
                .map(|seller| seller.id)
                .collect();
            let seller_count = seller_ids.len() as u64;

            let receipts = if seller_ids.is_empty() {
                Vec::new()
            } else {
                milk_received::Entity::find()
                    .filter(milk_received::Column::SellerId.is_in(seller_ids))
                    .filter(milk_received::Column::Date.eq(date))
                    .all(&self.database)
                    .await?
            };

            let mut total = Decimal::ZERO;
            let mut farm = Decimal::ZERO;
            let mut inter = Decimal::ZERO;
            for receipt in &receipts {
                total += receipt.quantity;
                match receipt.source.as_str() {
                    "from_farm" => farm += receipt.quantity,
                    "inter_seller" => inter += receipt.quantity,
                    _ => {}
                }
            }

            stats.push(LocationStats {
                location_id: location.id,
                location_name: location.name,
                address: location.address,
                seller_count,
                milk_received_today: total,
                farm_milk_today: farm,
                inter_seller_milk_today: inter,
            });
        }

        Ok(stats)
    }
}

/// Insert the identity row for a new profile. Duplicate usernames surface as
/// an integrity error, whether caught by the pre-check or the unique index.
async fn insert_user<C: sea_orm::ConnectionTrait>(
    db: &C,
    username: &str,
    password: &str,
    role: Role,
) -> ResultEngine<String> {
    let existing = users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .count(db)
        .await?;
    if existing > 0 {
        return Err(EngineError::Integrity(format!(
            "username '{username}' already exists"
        )));
    }

    let user_id = Uuid::new_v4().to_string();
    users::ActiveModel {
        id: Set(user_id.clone()),
        username: Set(username.to_string()),
        password: Set(password.to_string()),
        role: Set(role.as_str().to_string()),
        active: Set(true),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .map_err(|err| integrity_guard(err, "username"))?;
    Ok(user_id)
}

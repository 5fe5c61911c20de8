//! Directory endpoints: managers, employees, locations, sellers.

use api_types::staff::{
    EmployeeNew, EmployeeView, LocationNew, LocationStatsView, LocationView, ManagerNew,
    ManagerView, SellerNew, SellerView,
};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState};
use engine::users;

fn manager_view(model: engine::managers::Model) -> ManagerView {
    ManagerView {
        manager_id: model.id,
        name: model.name,
    }
}

fn employee_view(model: engine::employees::Model) -> EmployeeView {
    EmployeeView {
        employee_id: model.id,
        name: model.name,
        base_salary: model.base_salary,
    }
}

fn seller_view(model: engine::sellers::Model) -> SellerView {
    SellerView {
        seller_id: model.id,
        name: model.name,
        location_id: model.location_id,
    }
}

fn require_admin(user: &users::Model) -> Result<(), ServerError> {
    if user.role == engine::Role::Admin.as_str() {
        Ok(())
    } else {
        Err(ServerError::Forbidden)
    }
}

pub async fn create_manager(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ManagerNew>,
) -> Result<Json<ManagerView>, ServerError> {
    require_admin(&user)?;
    let manager = state
        .engine
        .create_manager(&payload.username, &payload.password, &payload.name)
        .await?;
    Ok(Json(manager_view(manager)))
}

pub async fn remove_manager(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    axum::extract::Path(manager_id): axum::extract::Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    require_admin(&user)?;
    state.engine.deactivate_manager(&manager_id).await?;
    Ok(Json(serde_json::json!({"removed": manager_id})))
}

pub async fn list_managers(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<ManagerView>>, ServerError> {
    require_admin(&user)?;
    let managers = state.engine.list_managers().await?;
    Ok(Json(managers.into_iter().map(manager_view).collect()))
}

pub async fn create_employee(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<EmployeeNew>,
) -> Result<Json<EmployeeView>, ServerError> {
    let manager = state.engine.manager_by_user(&user.id).await?;
    let employee = state
        .engine
        .create_employee(
            &manager.id,
            &payload.username,
            &payload.password,
            &payload.name,
            payload.base_salary,
        )
        .await?;
    Ok(Json(employee_view(employee)))
}

pub async fn list_employees(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<EmployeeView>>, ServerError> {
    let manager = state.engine.manager_by_user(&user.id).await?;
    let employees = state.engine.list_employees(&manager.id).await?;
    Ok(Json(employees.into_iter().map(employee_view).collect()))
}

pub async fn create_location(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<LocationNew>,
) -> Result<Json<LocationView>, ServerError> {
    state.engine.manager_by_user(&user.id).await?;
    let location = state
        .engine
        .create_location(&payload.name, &payload.address)
        .await?;
    Ok(Json(LocationView {
        location_id: location.id,
        name: location.name,
        address: location.address,
    }))
}

pub async fn list_locations(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<LocationStatsView>>, ServerError> {
    let stats = state
        .engine
        .location_statistics(crate::server::today())
        .await?;
    Ok(Json(
        stats
            .into_iter()
            .map(|entry| LocationStatsView {
                location_id: entry.location_id,
                location_name: entry.location_name,
                address: entry.address,
                seller_count: entry.seller_count,
                milk_received_today: entry.milk_received_today,
                farm_milk_today: entry.farm_milk_today,
                inter_seller_milk_today: entry.inter_seller_milk_today,
            })
            .collect(),
    ))
}

pub async fn create_seller(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SellerNew>,
) -> Result<Json<SellerView>, ServerError> {
    state.engine.manager_by_user(&user.id).await?;
    let seller = state
        .engine
        .create_seller(
            &payload.location_id,
            &payload.username,
            &payload.password,
            &payload.name,
        )
        .await?;
    Ok(Json(seller_view(seller)))
}

pub async fn list_sellers(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<SellerView>>, ServerError> {
    let sellers = state.engine.list_active_sellers().await?;
    Ok(Json(sellers.into_iter().map(seller_view).collect()))
}

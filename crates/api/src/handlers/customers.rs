//! Handlers for the `/customers` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use crm_core::customer::{
    optional_text, parse_status, require_text, status_or_default, NewCustomer,
};
use crm_core::error::CoreError;
use crm_core::pagination::{PageRequest, Pagination};
use crm_core::types::DbId;
use crm_db::models::customer::{Customer, UpdateCustomer};
use crm_db::repositories::CustomerRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ListCustomersParams;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /customers`.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: Option<String>,
    pub account_number: Option<String>,
    pub phone: Option<String>,
    pub nominee: Option<String>,
    pub nid: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

/// Request body for `PUT /customers/{id}`.
///
/// Omitted `name`, `account_number`, `phone` and `status` keep their current
/// values. `nominee`, `nid` and `notes` describe the full new state: omitting
/// one clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub account_number: Option<String>,
    pub phone: Option<String>,
    pub nominee: Option<String>,
    pub nid: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl CreateCustomerRequest {
    fn validate(self, created_by: DbId) -> Result<NewCustomer, CoreError> {
        Ok(NewCustomer {
            name: require_text("name", self.name.as_deref())?,
            account_number: require_text("account_number", self.account_number.as_deref())?,
            phone: require_text("phone", self.phone.as_deref())?,
            nominee: optional_text(self.nominee.as_deref()),
            nid: optional_text(self.nid.as_deref()),
            notes: optional_text(self.notes.as_deref()),
            status: status_or_default(self.status.as_deref()),
            created_by: Some(created_by),
        })
    }
}

impl UpdateCustomerRequest {
    fn validate(self) -> Result<UpdateCustomer, CoreError> {
        let present = |field: &str, value: Option<String>| {
            value
                .map(|v| require_text(field, Some(&v)))
                .transpose()
        };
        Ok(UpdateCustomer {
            name: present("name", self.name)?,
            account_number: present("account_number", self.account_number)?,
            phone: present("phone", self.phone)?,
            status: parse_status(self.status.as_deref())?,
            nominee: optional_text(self.nominee.as_deref()),
            nid: optional_text(self.nid.as_deref()),
            notes: optional_text(self.notes.as_deref()),
        })
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/customers
///
/// One page of customers, newest first, optionally filtered by `search`.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListCustomersParams>,
) -> AppResult<Json<ListResponse<Customer>>> {
    let page = PageRequest::new(params.page, params.limit);
    let search = params.search_term();

    let data = CustomerRepo::list(&state.pool, search, page.limit, page.offset).await?;
    let total = CustomerRepo::count(&state.pool, search).await?;

    Ok(Json(ListResponse {
        data,
        pagination: Pagination::new(page, total),
    }))
}

/// POST /api/v1/customers
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Customer>>)> {
    let new_customer = input.validate(user.user_id)?;
    let customer = CustomerRepo::create(&state.pool, &new_customer).await?;

    tracing::info!(
        customer_id = %customer.id,
        user_id = %user.user_id,
        "Customer created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: customer })))
}

/// GET /api/v1/customers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Customer>>> {
    let customer = CustomerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: customer }))
}

/// PUT /api/v1/customers/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCustomerRequest>,
) -> AppResult<Json<DataResponse<Customer>>> {
    let changes = input.validate()?;
    let customer = CustomerRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(customer_id = %id, user_id = %user.user_id, "Customer updated");
    Ok(Json(DataResponse { data: customer }))
}

/// DELETE /api/v1/customers/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CustomerRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(customer_id = %id, user_id = %user.user_id, "Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Customer",
        id,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use crm_core::customer::CustomerStatus;
    use uuid::Uuid;

    use super::*;

    fn create_request() -> CreateCustomerRequest {
        CreateCustomerRequest {
            name: Some(" Ada ".into()),
            account_number: Some("1001".into()),
            phone: Some("555".into()),
            nominee: Some("".into()),
            nid: None,
            notes: Some("vip".into()),
            status: None,
        }
    }

    fn update_request() -> UpdateCustomerRequest {
        UpdateCustomerRequest {
            name: None,
            account_number: None,
            phone: None,
            nominee: None,
            nid: None,
            notes: None,
            status: None,
        }
    }

    #[test]
    fn create_trims_and_defaults() {
        let actor = Uuid::new_v4();
        let customer = create_request().validate(actor).unwrap();
        assert_eq!(customer.name, "Ada");
        assert_eq!(customer.nominee, None);
        assert_eq!(customer.notes.as_deref(), Some("vip"));
        assert_eq!(customer.status, CustomerStatus::Active);
        assert_eq!(customer.created_by, Some(actor));
    }

    #[test]
    fn create_rejects_blank_required_field() {
        let request = CreateCustomerRequest {
            phone: Some("  ".into()),
            ..create_request()
        };
        assert_matches!(
            request.validate(Uuid::new_v4()),
            Err(CoreError::Validation(msg)) if msg == "phone is required"
        );
    }

    #[test]
    fn create_defaults_unknown_status_to_active() {
        let request = CreateCustomerRequest {
            status: Some("vip".into()),
            ..create_request()
        };
        let customer = request.validate(Uuid::new_v4()).unwrap();
        assert_eq!(customer.status, CustomerStatus::Active);

        let request = CreateCustomerRequest {
            status: Some("inactive".into()),
            ..create_request()
        };
        let customer = request.validate(Uuid::new_v4()).unwrap();
        assert_eq!(customer.status, CustomerStatus::Inactive);
    }

    #[test]
    fn update_rejects_unknown_status() {
        let request = UpdateCustomerRequest {
            status: Some("vip".into()),
            ..update_request()
        };
        assert_matches!(request.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn update_keeps_omitted_required_fields_and_clears_optionals() {
        let changes = update_request().validate().unwrap();
        assert_eq!(changes.name, None);
        assert_eq!(changes.status, None);
        assert_eq!(changes.nominee, None);

        let changes = UpdateCustomerRequest {
            name: Some(" New ".into()),
            status: Some("lead".into()),
            notes: Some("  ".into()),
            ..update_request()
        }
        .validate()
        .unwrap();
        assert_eq!(changes.name.as_deref(), Some("New"));
        assert_eq!(changes.status, Some(CustomerStatus::Lead));
        assert_eq!(changes.notes, None);
    }

    #[test]
    fn update_rejects_blank_required_field() {
        let request = UpdateCustomerRequest {
            account_number: Some("".into()),
            ..update_request()
        };
        assert_matches!(
            request.validate(),
            Err(CoreError::Validation(msg)) if msg == "account_number is required"
        );
    }
}

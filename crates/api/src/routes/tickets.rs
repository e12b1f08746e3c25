//! Support ticket routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::ticket::{
    CreateTicketRequest, ListTicketsQuery, PostTicketMessageRequest, TicketWithMessages,
    UpdateTicketStatusRequest,
};
use domain::models::{Permission, Ticket, TicketMessage, TicketStatus};
use persistence::repositories::{TicketRepository, TicketScope};
use shared::pagination::Paginated;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_ticket_created;
use crate::middleware::CurrentUser;
use crate::routes::page_request;

fn not_found() -> ApiError {
    ApiError::NotFound("Ticket not found".into())
}

/// Which tickets the caller may list.
pub(crate) fn ticket_scope(user: &CurrentUser) -> TicketScope {
    if user.is_super_admin() {
        return TicketScope::All;
    }
    match user.organization_id {
        Some(organization_id) if user.has_permission(Permission::TicketManage) => {
            TicketScope::Organization {
                organization_id,
                user_id: user.user_id,
            }
        }
        _ => TicketScope::Own {
            user_id: user.user_id,
        },
    }
}

/// Super-admin, or `ticket:manage` in the ticket's organization.
pub(crate) fn is_ticket_staff(user: &CurrentUser, ticket: &Ticket) -> bool {
    if user.is_super_admin() {
        return true;
    }
    match ticket.organization_id {
        Some(org) => user.belongs_to(org) && user.has_permission(Permission::TicketManage),
        None => false,
    }
}

fn can_view(user: &CurrentUser, ticket: &Ticket) -> bool {
    ticket.created_by == user.user_id || is_ticket_staff(user, ticket)
}

async fn visible_ticket(
    repo: &TicketRepository,
    user: &CurrentUser,
    ticket_id: Uuid,
) -> Result<Ticket, ApiError> {
    let ticket = repo.find(ticket_id).await?.ok_or_else(not_found)?;
    if !can_view(user, &ticket) {
        return Err(not_found());
    }
    Ok(ticket)
}

/// POST /api/v1/tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<TicketWithMessages>), ApiError> {
    request.validate()?;

    let ticket = TicketRepository::new(state.pool.clone())
        .create(
            request.organization_id,
            user.user_id,
            user.role,
            &request.subject,
            request.priority.unwrap_or_default(),
            &request.message,
        )
        .await?;

    record_ticket_created();
    info!(
        user_id = %user.user_id,
        ticket_id = %ticket.ticket.id,
        priority = %ticket.ticket.priority,
        "Created ticket"
    );
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /api/v1/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListTicketsQuery>,
) -> Result<Json<Paginated<Ticket>>, ApiError> {
    let page = page_request(&state, query.page, query.per_page);
    let (tickets, total) = TicketRepository::new(state.pool.clone())
        .list(ticket_scope(&user), query.status, page)
        .await?;
    Ok(Json(Paginated::new(tickets, page, total)))
}

/// GET /api/v1/tickets/:ticket_id
pub async fn get_ticket(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketWithMessages>, ApiError> {
    let repo = TicketRepository::new(state.pool.clone());
    let ticket = visible_ticket(&repo, &user, ticket_id).await?;
    let messages = repo.messages(ticket_id).await?;
    Ok(Json(TicketWithMessages { ticket, messages }))
}

/// POST /api/v1/tickets/:ticket_id/messages
///
/// A staff reply on an open ticket moves it to `in_progress`.
pub async fn post_message(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(ticket_id): Path<Uuid>,
    Json(request): Json<PostTicketMessageRequest>,
) -> Result<(StatusCode, Json<TicketMessage>), ApiError> {
    request.validate()?;

    let repo = TicketRepository::new(state.pool.clone());
    let ticket = visible_ticket(&repo, &user, ticket_id).await?;
    let is_staff_reply = is_ticket_staff(&user, &ticket);

    let message = repo
        .post_message(ticket_id, user.user_id, user.role, &request.body, is_staff_reply)
        .await?;

    info!(
        user_id = %user.user_id,
        ticket_id = %ticket_id,
        staff_reply = is_staff_reply,
        "Posted ticket message"
    );
    Ok((StatusCode::CREATED, Json(message)))
}

/// PUT /api/v1/tickets/:ticket_id/status
///
/// Staff may set any status. The creator may only close.
pub async fn update_ticket_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(ticket_id): Path<Uuid>,
    Json(request): Json<UpdateTicketStatusRequest>,
) -> Result<Json<Ticket>, ApiError> {
    let repo = TicketRepository::new(state.pool.clone());
    let ticket = visible_ticket(&repo, &user, ticket_id).await?;

    if !is_ticket_staff(&user, &ticket) && request.status != TicketStatus::Closed {
        return Err(ApiError::Forbidden("You can only close your own ticket".into()));
    }

    let updated = repo
        .update_status(ticket_id, request.status)
        .await?
        .ok_or_else(not_found)?;

    info!(
        user_id = %user.user_id,
        ticket_id = %ticket_id,
        from = %ticket.status,
        to = %updated.status,
        "Changed ticket status"
    );
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::{TicketPriority, UserRole};

    fn user(role: UserRole, org: Option<Uuid>) -> CurrentUser {
        CurrentUser {
            user_id: Uuid::new_v4(),
            role,
            organization_id: org,
        }
    }

    fn ticket(org: Option<Uuid>, created_by: Uuid) -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            organization_id: org,
            created_by,
            subject: "Leaking roof".to_string(),
            status: TicketStatus::Open,
            priority: TicketPriority::High,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            closed_at: None,
        }
    }

    #[test]
    fn test_scope_by_role() {
        let org = Uuid::new_v4();
        assert!(matches!(
            ticket_scope(&user(UserRole::SuperAdmin, None)),
            TicketScope::All
        ));
        assert!(matches!(
            ticket_scope(&user(UserRole::Employee, Some(org))),
            TicketScope::Organization { organization_id, .. } if organization_id == org
        ));
        assert!(matches!(
            ticket_scope(&user(UserRole::Coach, Some(org))),
            TicketScope::Own { .. }
        ));
        assert!(matches!(
            ticket_scope(&user(UserRole::Customer, None)),
            TicketScope::Own { .. }
        ));
    }

    #[test]
    fn test_ticket_staff() {
        let org = Uuid::new_v4();
        let customer = user(UserRole::Customer, None);
        let t = ticket(Some(org), customer.user_id);

        assert!(is_ticket_staff(&user(UserRole::ArenaAdmin, Some(org)), &t));
        assert!(!is_ticket_staff(&user(UserRole::ArenaAdmin, Some(Uuid::new_v4())), &t));
        assert!(!is_ticket_staff(&customer, &t));
        assert!(is_ticket_staff(&user(UserRole::SuperAdmin, None), &t));

        let platform_ticket = ticket(None, customer.user_id);
        assert!(!is_ticket_staff(&user(UserRole::ArenaAdmin, Some(org)), &platform_ticket));
    }

    #[test]
    fn test_creator_can_view() {
        let customer = user(UserRole::Customer, None);
        let t = ticket(None, customer.user_id);
        assert!(can_view(&customer, &t));
        assert!(!can_view(&user(UserRole::Customer, None), &t));
    }
}

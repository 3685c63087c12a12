//! Notification helpers for ledger side effects
//!
//! Request status changes write a notification as the last step of the
//! sequence (status update, connection cache, notification). The status
//! transition is authoritative: a failed notification write is logged and
//! does not fail or roll back the request.

use bizlink_store::{ConnectionRequest, Database, NewNotification, User};

/// Write a notification, logging failures instead of propagating them
pub async fn notify_best_effort(db: &Database, input: NewNotification) {
    if let Err(e) = db.notifications().create(&input).await {
        tracing::warn!(
            error = %e,
            recipient = %input.user_id,
            kind = %input.kind,
            "notification write failed"
        );
    }
}

/// Notify the recipient about a new (or re-sent) connection request
pub fn request_sent(request: &ConnectionRequest, sender: &User) -> NewNotification {
    NewNotification::new(
        &request.to_user,
        "connection_request",
        "New Connection Request",
        format!("{} sent you a connection request", sender.display_name()),
    )
    .with_data(serde_json::json!({
        "request_id": request.id,
        "from_user_id": sender.id,
        "from_user_name": sender.display_name(),
    }))
    .with_icon("🤝")
    .with_link("/connections/requests")
    .with_source("connection")
    // The timestamp distinguishes a revived request from its first send
    .with_dedupe_key(format!(
        "connection_request:{}:{}",
        request.id,
        request.sent_at.timestamp()
    ))
}

/// Notify the sender that their request was accepted or declined
pub fn request_responded(
    request: &ConnectionRequest,
    recipient: &User,
    accepted: bool,
) -> NewNotification {
    let verb = if accepted { "accepted" } else { "declined" };

    NewNotification::new(
        &request.from_user,
        "connection_response",
        format!(
            "Connection Request {}",
            if accepted { "Accepted" } else { "Declined" }
        ),
        format!(
            "{} {} your connection request",
            recipient.display_name(),
            verb
        ),
    )
    .with_data(serde_json::json!({
        "request_id": request.id,
        "to_user_id": recipient.id,
        "to_user_name": recipient.display_name(),
        "action": verb,
    }))
    .with_icon(if accepted { "✅" } else { "❌" })
    .with_link("/connections")
    .with_source("connection")
}

/// Notify the recipient that the sender withdrew their request
pub fn request_withdrawn(request: &ConnectionRequest, sender: &User) -> NewNotification {
    NewNotification::new(
        &request.to_user,
        "connection_withdraw",
        "Connection Request Withdrawn",
        format!("{} withdrew their connection request", sender.display_name()),
    )
    .with_data(serde_json::json!({
        "request_id": request.id,
        "from_user_id": sender.id,
        "from_user_name": sender.display_name(),
    }))
    .with_icon("↩️")
    .with_link("/connections/requests")
    .with_source("connection")
}

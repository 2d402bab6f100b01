//! WebSocket stream of parking events
//!
//! Clients connect to `/api/v1/notifications/ws` and receive every
//! [`EventMessage`] that passes their query filter, e.g.
//! `?area=A&event_types=vehicle_parked,vehicle_exited` or `?plate=BH 1234 ZA`.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::select;
use tracing::{debug, error, info, warn};

use crate::application::events::{EventMessage, SharedEventBus};

/// Query parameters for filtering events
#[derive(Debug, Default, Deserialize)]
pub struct EventFilter {
    /// Only events about this plate (exact match after trimming)
    pub plate: Option<String>,
    /// Only events touching this area code, case-insensitive
    pub area: Option<String>,
    /// Comma-separated event types
    pub event_types: Option<String>,
}

impl EventFilter {
    pub fn matches(&self, message: &EventMessage) -> bool {
        if let Some(plate) = &self.plate {
            if message.event.plate() != plate.trim() {
                return false;
            }
        }

        if let Some(area) = &self.area {
            match message.event.area() {
                Some(event_area) if event_area.eq_ignore_ascii_case(area.trim()) => {}
                _ => return false,
            }
        }

        if let Some(types) = &self.event_types {
            let event_type = message.event.event_type();
            if !types.split(',').any(|t| t.trim() == event_type) {
                return false;
            }
        }

        true
    }
}

#[derive(Clone)]
pub struct NotificationState {
    pub event_bus: SharedEventBus,
}

pub fn create_notification_state(event_bus: SharedEventBus) -> NotificationState {
    NotificationState { event_bus }
}

/// WebSocket upgrade handler for notifications
pub async fn ws_notifications_handler(
    ws: WebSocketUpgrade,
    State(state): State<NotificationState>,
    Query(filter): Query<EventFilter>,
) -> impl IntoResponse {
    info!(
        plate = ?filter.plate,
        area = ?filter.area,
        event_types = ?filter.event_types,
        "New notification WebSocket connection"
    );

    ws.on_upgrade(move |socket| handle_notification_socket(socket, state, filter))
}

async fn handle_notification_socket(
    socket: WebSocket,
    state: NotificationState,
    filter: EventFilter,
) {
    let (mut sender, mut receiver) = socket.split();
    let mut subscriber = state.event_bus.subscribe();

    let welcome = serde_json::json!({
        "type": "connected",
        "message": "Connected to parking event stream",
        "filter": {
            "plate": filter.plate,
            "area": filter.area,
            "event_types": filter.event_types
        }
    });

    if let Err(e) = sender
        .send(Message::Text(welcome.to_string().into()))
        .await
    {
        error!(error = %e, "Failed to send welcome message");
        return;
    }

    loop {
        select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = sender.send(Message::Pong(data)).await {
                            error!(error = %e, "Failed to send pong");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        warn!(error = %e, "Notification socket error");
                        break;
                    }
                    // Clients have nothing to say; inbound text is ignored
                    Some(Ok(_)) => {}
                }
            }

            event = subscriber.recv_matching(|m| filter.matches(m)) => {
                let Some(event_msg) = event else {
                    warn!("Event bus closed");
                    break;
                };

                match serde_json::to_string(&event_msg) {
                    Ok(json) => {
                        if let Err(e) = sender.send(Message::Text(json.into())).await {
                            error!(error = %e, "Failed to send event");
                            break;
                        }
                        debug!(event_type = event_msg.event.event_type(), "Event sent to client");
                    }
                    Err(e) => error!(error = %e, "Failed to serialize event"),
                }
            }
        }
    }

    info!(missed = subscriber.missed(), "Notification WebSocket client disconnected");
}

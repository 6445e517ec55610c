//! Toast queue.
//!
//! Every mutation outcome surfaces as a transient notification. The queue is
//! a bounded FIFO owned by shared state: at most three live toasts (oldest
//! dropped first), each expiring five seconds after creation. The dashboard
//! polls `/admin/notifications` and renders whatever is still live.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::state::AppState;

const TOAST_CAP: usize = 3;
const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    id: Uuid,
    kind: ToastKind,
    message: String,
    description: String,
    expires_at: Instant,
}

#[derive(Debug, Serialize)]
pub struct ToastView {
    pub id: Uuid,
    pub kind: ToastKind,
    pub message: String,
    pub description: String,
}

#[derive(Default)]
pub struct ToastQueue {
    inner: Mutex<VecDeque<Toast>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>, description: impl Into<String>) {
        self.push_at(ToastKind::Success, message.into(), description.into(), Instant::now());
    }

    pub fn error(&self, message: impl Into<String>, description: impl Into<String>) {
        self.push_at(ToastKind::Error, message.into(), description.into(), Instant::now());
    }

    pub fn active(&self) -> Vec<ToastView> {
        self.active_at(Instant::now())
    }

    fn push_at(&self, kind: ToastKind, message: String, description: String, now: Instant) {
        let mut queue = self.inner.lock().unwrap();
        queue.retain(|toast| toast.expires_at > now);
        queue.push_back(Toast {
            id: Uuid::new_v4(),
            kind,
            message,
            description,
            expires_at: now + TOAST_TTL,
        });
        while queue.len() > TOAST_CAP {
            queue.pop_front();
        }
    }

    fn active_at(&self, now: Instant) -> Vec<ToastView> {
        let mut queue = self.inner.lock().unwrap();
        queue.retain(|toast| toast.expires_at > now);
        queue
            .iter()
            .map(|toast| ToastView {
                id: toast.id,
                kind: toast.kind,
                message: toast.message.clone(),
                description: toast.description.clone(),
            })
            .collect()
    }
}

pub async fn notifications_handler(State(state): State<Arc<AppState>>) -> Json<Vec<ToastView>> {
    Json(state.toasts.active())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_at_most_three() {
        let queue = ToastQueue::new();
        for i in 0..5 {
            queue.success(format!("toast {i}"), "");
        }
        let live = queue.active();
        assert_eq!(live.len(), 3);
        // Oldest were dropped.
        assert_eq!(live[0].message, "toast 2");
        assert_eq!(live[2].message, "toast 4");
    }

    #[test]
    fn expired_toasts_are_pruned_on_read() {
        let queue = ToastQueue::new();
        let start = Instant::now();
        queue.push_at(ToastKind::Error, "old".into(), "".into(), start);
        queue.push_at(ToastKind::Success, "new".into(), "".into(), start + Duration::from_secs(4));

        let live = queue.active_at(start + Duration::from_secs(6));
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].message, "new");
        assert_eq!(live[0].kind, ToastKind::Success);
    }
}

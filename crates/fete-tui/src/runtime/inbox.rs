//! Inbox channel types.
//!
//! Timer tasks post their events here; the runtime drains the receiver at
//! the top of every loop iteration.

use tokio::sync::mpsc;

use crate::events::UiEvent;

pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

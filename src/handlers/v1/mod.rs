//! V1 API handlers.

mod sessions;

pub use sessions::{
    create_session, get_session, list_messages, manual_budget, reset_session, send_message,
};

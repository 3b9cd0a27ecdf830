//! Shared builders for engine tests.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use tablehost_domain::{
    GameSession, Money, PaymentHandle, PaymentMethod, SessionUrl, TableName, UserId, UserProfile,
};

use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::ports::{ClockPort, PaymentInstruction, SessionHandle};
use crate::stores::{ActiveSession, SessionSlot};

pub const SESSION_URL: &str = "https://play.example/g/abc";

pub fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

pub fn clock() -> Arc<dyn ClockPort> {
    Arc::new(FixedClock(fixed_now()))
}

pub fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub fn session_url() -> SessionUrl {
    SessionUrl::new(SESSION_URL).unwrap()
}

pub fn dollars(value: f64) -> Money {
    Money::from_dollars(value).unwrap()
}

/// Profile with a Venmo handle and the given table name.
pub fn ready_profile(id: &str, table_name: &str) -> UserProfile {
    let mut profile = UserProfile::new(user(id), id);
    profile.set_payment_handle(PaymentHandle::new(PaymentMethod::Venmo, id).unwrap());
    profile.set_table_name(TableName::new(table_name).unwrap());
    profile
}

pub fn active_session() -> Arc<ActiveSession> {
    Arc::new(ActiveSession::new(
        GameSession::activated(session_url(), fixed_now()),
        SessionHandle::new("h1"),
    ))
}

/// Slot already holding [`active_session`].
pub async fn active_slot() -> (Arc<SessionSlot>, Arc<ActiveSession>) {
    let slot = Arc::new(SessionSlot::new());
    let active = active_session();
    slot.set_active(Arc::clone(&active)).await;
    (slot, active)
}

pub fn instruction(amount: Money) -> PaymentInstruction {
    PaymentInstruction {
        method: PaymentMethod::Venmo,
        handle: "@host".into(),
        message: format!("Send ${} via Venmo to @host with the note \"{}\".", amount, SESSION_URL),
    }
}

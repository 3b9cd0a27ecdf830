//! Value objects - Immutable objects defined by their attributes

mod money;
mod payment;
mod session_url;
mod table_name;

pub use money::{Money, STACK_TOLERANCE};
pub use payment::{PaymentHandle, PaymentMethod};
pub use session_url::SessionUrl;
pub use table_name::TableName;

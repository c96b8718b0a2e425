mod category;
mod message;
mod payment;

pub use category::PaymentCategory;
pub use message::IncomingMessage;
pub use payment::{Payment, PaymentFilter, PaymentOrigin};

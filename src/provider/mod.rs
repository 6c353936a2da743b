pub mod datetime;
pub mod error;
pub mod ticket;
pub mod tz;

pub use datetime::{days_of_month, DateFormat};
pub use error::{Error, ErrorKind, Result};
pub use ticket::{decode_tickets, load_tickets, EventRecord};
pub use tz::Tz;

//! Calendar core of the XIVE ticket app.
//!
//! Tickets fetched from the XIVE API are laid out on a month grid of whole
//! weeks, each day carrying the tickets that fall on it.
//!
//! ```ignore
//! use xive::calendar::{build_month_grid, GridConfig, YearMonth};
//! use xive::provider::decode_tickets;
//!
//! let tickets = decode_tickets(&body)?;
//! let cells = build_month_grid(YearMonth::new(2024, 5)?, &tickets, &GridConfig::default())?;
//! assert_eq!(cells.len(), 42);
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | `calendar` | Month grid builder and its configuration |
//! | `agenda` | Tickets plus the month on screen |
//! | `provider` | Ticket decoding, date parsing, time zones, errors |
//! | `nfc` | Tag payload decoding |
//! | `config` | Config file lookup and loading |

pub mod agenda;
pub mod calendar;
pub mod config;
pub mod nfc;
pub mod provider;

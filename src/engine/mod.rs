mod contiguity;
mod controller;
mod error;
mod pricing;
mod validate;

pub use contiguity::is_contiguous;
pub use controller::{ChannelObserver, FnObserver, GestureState, SelectionController, SelectionObserver};
pub use error::ScheduleError;
pub use pricing::{resolve_price, resolve_price_with_source, resolve_prices, PriceSource};
pub use validate::{check_contiguity, validate, validate_with, CONTIGUITY_MESSAGE};

//! Thumbor url building and signing.
//!
//! ## Example
//!
//! ```
//! use thurl_thumbor::{Adjustments, Builder, Crop};
//!
//! let builder = Builder::new(Some("http://thumbor.com"), Some("abcdefghijklmnopqrstuvwxyz123"));
//!
//! let adjustments = Adjustments::new()
//!     .crop(Crop::new(1, 2, 3, 4))
//!     .size(200, 100)
//!     .filter("blur", [3, 2])
//!     .filter("grayscale", "")
//!     .filter("brightness", "-100");
//!
//! assert_eq!(
//!     builder.build("image.jpg", Some(&adjustments)),
//!     "http://thumbor.com/aTdK7Q0AL0opoBePUBpm6XAReM8=/1x2:3x4/200x100/filters:blur(3,2):grayscale():brightness(-100)/image.jpg"
//! );
//! ```

mod constants;

mod config;
pub use config::Config;

mod key;
pub use key::SecurityKey;

mod filter;
pub use filter::{encode_filters, Filter, FilterArg, FilterArgs, Filters};

mod adjustments;
pub use adjustments::{encode_adjustments, Adjustments, Crop};

mod builder;
pub use builder::Builder;

//! # Button token codec
//!
//! Chat buttons carry at most 64 ASCII characters of opaque data. This crate
//! packs a catalog document reference into that space and unpacks it again
//! when the button is pressed, with no server-side state:
//!
//! ```text
//! search_critical_1_NASTROYKAROUTEROVBazovayapdf
//! └ns──┘ └origin┘ │ └sanitized filename (<= 50)┘
//!                 └ position inside the origin
//! ```
//!
//! Control buttons use `cat_<key>`, `special_<key>` and `back`.

mod callback;
mod error;
mod sanitize;
mod token;

pub use callback::{category_token, special_token, Callback, BACK_TOKEN};
pub use error::{CodecError, Result};
pub use sanitize::{sanitize_filename, MAX_SANITIZED_CHARS, TRANSLITERATIONS};
pub use token::{decode, encode, name_budget, DocumentToken, Namespace, SEPARATOR};

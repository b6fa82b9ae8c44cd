//! Lazy JSON reader.
//!
//! `jsonpeek` exposes a JSON document held in a byte buffer through
//! number, string, array and object views while scanning only as much
//! text as each access requires. No tree of nodes is built: every value
//! is a small handle holding a reference to the source and the byte
//! offset where the value begins, and boundaries are rediscovered by
//! stateless scans whenever they are needed.
//!
//! Editing goes the same way. [`splice`] substitutes a new JSON fragment
//! at the location of an existing value and yields a [`PieceTable`],
//! which shares the untouched bytes of the original and can itself be
//! re-read. A growing buffer fed from an [`std::io::Read`] works through
//! [`StreamSource`], which suspends and resumes scans at value
//! boundaries as input arrives.
//!
//! # Examples
//!
//! ```
//! use jsonpeek::{splice, Text};
//!
//! let text = Text::from(r#"{"Image": {"Width": 800, "IDs": [116, 943]}}"#);
//! let ids = text.root()?.get("Image")?.get("IDs")?;
//! assert_eq!(ids.get(2)?.as_number().unwrap().to_i64()?, 943);
//!
//! let edited = splice(&text, &["Image".into(), "Width".into()], b"1024")?;
//! assert_eq!(
//!     edited.flatten(),
//!     br#"{"Image": {"Width": 1024, "IDs": [116, 943]}}"#
//! );
//! # Ok::<(), jsonpeek::Error>(())
//! ```

mod collections;
mod error;
mod number;
mod path;
mod piece;
mod scan;
mod source;
mod stream;
mod string;
mod value;

pub use collections::{Array, Entries, Items, Object};
pub use error::{Error, Location, Result, SyntaxKind};
pub use number::{Num, Number};
pub use path::Step;
pub use piece::{PieceTable, splice};
pub use scan::end_of_value;
pub use source::{Fragment, MORE_INPUT, Source, TERMINATOR, Text};
pub use stream::StreamSource;
pub use string::{CodePoints, Str};
pub use value::{Kind, Value};

//! # apiforge parser
//!
//! Document service for API specification files: text in (JSON or YAML),
//! canonical tree out, plus dialect detection, serialization and minimal
//! structural validation.
//!
//! ```rust,ignore
//! use apiforge_parser::{parse, serialize, Format};
//!
//! let parsed = parse(source)?;
//! println!("{}", parsed.document.type_name());
//! let yaml = serialize(&parsed.document, Format::Yaml)?;
//! ```

pub mod dialect;
pub mod document;
pub mod error;
pub mod parser;
pub mod path;
pub mod serializer;
pub mod validate;

pub use dialect::{Dialect, CHANNEL_OPERATIONS, HTTP_METHODS};
pub use document::{Document, Format};
pub use error::{ParseError, ParseResult, PathError, SerializeError};
pub use parser::{parse, parse_as, Parsed};
pub use path::{FieldPath, Segment};
pub use serializer::serialize;
pub use validate::{validate, StructuralError, ValidationReport};

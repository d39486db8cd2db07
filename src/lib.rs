//! RPM-style spec file model, serializer, and best-effort parser.
//!
//! The `model` module builds a spec document from typed directives and
//! serializes it to the line-oriented spec format. The `parser` module goes
//! the other way: it recovers a structured mapping from existing spec text
//! without a schema, classifying each line by syntactic cues alone.
//!
//! Round trips are guaranteed at the structured-data level, never byte for
//! byte: comments and blank-line placement may differ after a re-render.

pub mod keys;
pub mod model;
pub mod parser;

//! Conversion between stored votes and the flat objects clients send and receive.

mod input;
mod timestamp;
mod vote_serializer;

pub use input::{InputSource, VoteInput, NON_FIELD_ERRORS};
pub use timestamp::{format_timestamp, parse_timestamp, DATETIME_FORMAT_ERROR};
pub use vote_serializer::{VoteRepresentation, VoteSerializer};

mod vote;

pub use vote::{
    subject_too_long, truncate_to_micros, validate_subject, NewVote, Vote, VoteChanges,
    SUBJECT_MAX_LENGTH,
};

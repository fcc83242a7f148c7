mod vote_routes;

pub use vote_routes::create_votes_router;

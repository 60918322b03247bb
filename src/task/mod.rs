pub mod drive;
pub mod event_feed;
pub mod orchestrate;
pub mod trace;

pub mod compose;
pub mod context;
pub mod outlet;
pub mod research;
pub mod retrieve;
pub mod review;
pub mod workflow;

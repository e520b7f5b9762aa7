pub mod facts;
pub mod report;
pub mod table;

pub mod aggregates;
pub mod export;
pub mod generate;
pub mod report;
pub mod statement;

pub mod content;
pub mod dedup;
pub mod merge;
pub mod run;
pub mod url;

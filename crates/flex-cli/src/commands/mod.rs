pub mod completions;
pub mod export;
pub mod params;
pub mod run;
pub mod variants;

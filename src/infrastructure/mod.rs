pub mod config;
pub mod nlp;
pub mod predictors;
pub mod response;
pub mod tabular;

pub mod batch_pipeline;
pub mod column_normalizer;
pub mod feature_frame_builder;
pub mod prediction_aggregator;
pub mod text_normalizer;
pub mod upload_scoring;

pub mod use_cases;

pub use use_cases::upload_scoring::UploadScoringUseCase;

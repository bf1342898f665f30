pub mod session;
pub mod wire;

pub use session::{Poll, Session, SessionError, SessionState};
pub use wire::{
    ImageId, PredictionId, PredictionJob, PredictionReport, PredictionStatus, UploadedImage,
    Verdict,
};

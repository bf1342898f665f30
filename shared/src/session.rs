//! Pure state machine for one check session: upload -> prediction ->
//! polling -> done, with `Done` and `Failed` absorbing. The frontend's
//! async driver feeds it the outcome of each network step and poll tick.

use crate::wire::{ImageId, PredictionId, PredictionReport};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    ImageReady { image: ImageId },
    JobPending { job: PredictionId, ticks: u32 },
    Done { report: PredictionReport },
    Failed { reason: String },
}

/// What the polling loop should do after an observation.
#[derive(Debug, Clone, PartialEq)]
pub enum Poll {
    /// Non-terminal status; schedule the next tick.
    Continue,
    /// Terminal status observed; the loop must stop, no further ticks.
    Finished(PredictionReport),
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    #[display(fmt = "no image has been uploaded in this session")]
    NoImage,
    #[display(fmt = "an image was already uploaded in this session")]
    ImageAlreadyUploaded,
    #[display(fmt = "a prediction was already requested in this session")]
    PredictionAlreadyStarted,
    #[display(fmt = "no prediction job is active")]
    NoActiveJob,
    #[display(fmt = "observation is for job {} but the session holds {}", got, held)]
    JobMismatch { held: PredictionId, got: PredictionId },
    #[display(fmt = "the session already reached a terminal state")]
    SessionOver,
}

impl std::error::Error for SessionError {}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    state: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            SessionState::Done { .. } | SessionState::Failed { .. }
        )
    }

    pub fn image_uploaded(&mut self, image: ImageId) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::ImageReady { image };
                Ok(())
            }
            SessionState::Done { .. } | SessionState::Failed { .. } => {
                Err(SessionError::SessionOver)
            }
            _ => Err(SessionError::ImageAlreadyUploaded),
        }
    }

    pub fn prediction_started(&mut self, job: PredictionId) -> Result<(), SessionError> {
        match self.state {
            SessionState::ImageReady { .. } => {
                self.state = SessionState::JobPending { job, ticks: 0 };
                Ok(())
            }
            SessionState::Idle => Err(SessionError::NoImage),
            SessionState::JobPending { .. } => Err(SessionError::PredictionAlreadyStarted),
            SessionState::Done { .. } | SessionState::Failed { .. } => {
                Err(SessionError::SessionOver)
            }
        }
    }

    /// Feeds one poll observation into the machine. Observing without an
    /// active job, or for a job this session never requested, is a hard
    /// error rather than a silent no-op.
    pub fn observe(&mut self, report: PredictionReport) -> Result<Poll, SessionError> {
        match &mut self.state {
            SessionState::JobPending { job, ticks } => {
                if report.id != *job {
                    return Err(SessionError::JobMismatch {
                        held: job.clone(),
                        got: report.id,
                    });
                }
                *ticks += 1;
                if report.status.is_terminal() {
                    self.state = SessionState::Done {
                        report: report.clone(),
                    };
                    Ok(Poll::Finished(report))
                } else {
                    Ok(Poll::Continue)
                }
            }
            SessionState::Done { .. } | SessionState::Failed { .. } => {
                Err(SessionError::SessionOver)
            }
            _ => Err(SessionError::NoActiveJob),
        }
    }

    /// Marks the session failed after an operation error. Failing a
    /// finished session is itself an error.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), SessionError> {
        if self.is_terminal() {
            return Err(SessionError::SessionOver);
        }
        self.state = SessionState::Failed {
            reason: reason.into(),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{PredictionStatus, Verdict};

    fn report(id: &str, status: PredictionStatus) -> PredictionReport {
        PredictionReport {
            id: id.into(),
            status,
            cleanliness: None,
            integrity: None,
            model_version: None,
            processing_time_ms: None,
            error_message: None,
        }
    }

    fn session_with_job(job: &str) -> Session {
        let mut session = Session::new();
        session.image_uploaded("img-1".into()).unwrap();
        session.prediction_started(job.into()).unwrap();
        session
    }

    #[test]
    fn happy_path_reaches_done() {
        let mut session = Session::new();
        assert_eq!(*session.state(), SessionState::Idle);

        session.image_uploaded("img-1".into()).unwrap();
        session.prediction_started("job-1".into()).unwrap();

        assert_eq!(
            session.observe(report("job-1", PredictionStatus::Pending)),
            Ok(Poll::Continue)
        );
        assert_eq!(
            session.observe(report("job-1", PredictionStatus::Processing)),
            Ok(Poll::Continue)
        );

        let terminal = report("job-1", PredictionStatus::Completed);
        assert_eq!(
            session.observe(terminal.clone()),
            Ok(Poll::Finished(terminal.clone()))
        );
        assert_eq!(*session.state(), SessionState::Done { report: terminal });
        assert!(session.is_terminal());
    }

    #[test]
    fn pending_ticks_self_loop_and_count() {
        let mut session = session_with_job("job-1");
        for expected in 1..=3 {
            session
                .observe(report("job-1", PredictionStatus::Pending))
                .unwrap();
            match session.state() {
                SessionState::JobPending { ticks, .. } => assert_eq!(*ticks, expected),
                other => panic!("unexpected state {other:?}"),
            }
        }
    }

    #[test]
    fn failed_assessment_still_ends_in_done() {
        let mut session = session_with_job("job-1");
        let mut terminal = report("job-1", PredictionStatus::Failed);
        terminal.error_message = Some("blurry photo".into());

        assert_eq!(
            session.observe(terminal.clone()),
            Ok(Poll::Finished(terminal.clone()))
        );
        assert_eq!(*session.state(), SessionState::Done { report: terminal });
    }

    #[test]
    fn terminal_payload_is_forwarded_verbatim() {
        let mut session = session_with_job("job-1");
        let mut terminal = report("job-1", PredictionStatus::Completed);
        terminal.cleanliness = Some(Verdict {
            status: "dirty".into(),
            confidence: 0.71,
        });
        terminal.integrity = Some(Verdict {
            status: "damaged".into(),
            confidence: 0.95,
        });
        terminal.model_version = Some("v2".into());

        match session.observe(terminal.clone()) {
            Ok(Poll::Finished(forwarded)) => assert_eq!(forwarded, terminal),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn no_observation_past_terminal() {
        let mut session = session_with_job("job-1");
        session
            .observe(report("job-1", PredictionStatus::Completed))
            .unwrap();

        assert_eq!(
            session.observe(report("job-1", PredictionStatus::Completed)),
            Err(SessionError::SessionOver)
        );
    }

    #[test]
    fn observe_without_a_job_is_an_error() {
        let mut session = Session::new();
        assert_eq!(
            session.observe(report("job-1", PredictionStatus::Pending)),
            Err(SessionError::NoActiveJob)
        );

        session.image_uploaded("img-1".into()).unwrap();
        assert_eq!(
            session.observe(report("job-1", PredictionStatus::Pending)),
            Err(SessionError::NoActiveJob)
        );
    }

    #[test]
    fn observation_for_a_foreign_job_is_rejected() {
        let mut session = session_with_job("job-1");
        assert_eq!(
            session.observe(report("job-2", PredictionStatus::Completed)),
            Err(SessionError::JobMismatch {
                held: "job-1".into(),
                got: "job-2".into(),
            })
        );
        // The mismatched observation must not have moved the machine.
        assert!(matches!(
            session.state(),
            SessionState::JobPending { ticks: 0, .. }
        ));
    }

    #[test]
    fn fail_moves_any_non_terminal_state_to_failed() {
        let mut idle = Session::new();
        idle.fail("upload refused").unwrap();
        assert_eq!(
            *idle.state(),
            SessionState::Failed {
                reason: "upload refused".into()
            }
        );

        let mut ready = Session::new();
        ready.image_uploaded("img-1".into()).unwrap();
        ready.fail("prediction refused").unwrap();
        assert!(ready.is_terminal());

        let mut pending = session_with_job("job-1");
        pending.fail("poll transport error").unwrap();
        assert!(pending.is_terminal());
    }

    #[test]
    fn second_failure_is_rejected_and_keeps_the_first_reason() {
        let mut session = session_with_job("job-1");
        session.fail("poll transport error").unwrap();

        assert_eq!(session.fail("late duplicate"), Err(SessionError::SessionOver));
        assert_eq!(
            *session.state(),
            SessionState::Failed {
                reason: "poll transport error".into()
            }
        );
    }

    #[test]
    fn terminal_states_absorb_everything() {
        let mut session = session_with_job("job-1");
        session
            .observe(report("job-1", PredictionStatus::Failed))
            .unwrap();

        assert_eq!(
            session.image_uploaded("img-2".into()),
            Err(SessionError::SessionOver)
        );
        assert_eq!(
            session.prediction_started("job-2".into()),
            Err(SessionError::SessionOver)
        );
        assert_eq!(session.fail("late error"), Err(SessionError::SessionOver));
    }

    #[test]
    fn steps_are_strictly_ordered() {
        let mut session = Session::new();
        assert_eq!(
            session.prediction_started("job-1".into()),
            Err(SessionError::NoImage)
        );

        session.image_uploaded("img-1".into()).unwrap();
        assert_eq!(
            session.image_uploaded("img-2".into()),
            Err(SessionError::ImageAlreadyUploaded)
        );

        session.prediction_started("job-1".into()).unwrap();
        assert_eq!(
            session.prediction_started("job-2".into()),
            Err(SessionError::PredictionAlreadyStarted)
        );
    }
}

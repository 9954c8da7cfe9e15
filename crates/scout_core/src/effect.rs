use crate::{Preferences, ResumeSummary, TaskId};

/// IO requested by [`crate::update`]; executed outside the pure core.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send the chosen file to the resume parser.
    UploadResume {
        file_name: String,
        mime_type: String,
    },
    /// Persist the parsed summary (drops any previous task id).
    StoreResumeSummary(ResumeSummary),
    /// Submit the stored summary plus preferences as a search job.
    LaunchSearch { preferences: Preferences },
    /// Persist the accepted task id.
    StoreTaskId(TaskId),
    /// Begin polling task status, immediately and then on the interval.
    StartPolling(TaskId),
    /// Cancel any active poll loop. Safe when none is running.
    StopPolling,
}

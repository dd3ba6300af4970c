//! Data access port trait.

use crate::domain::error::StudyError;
use crate::domain::frame::Frame;

/// Source of datasets for studies to augment.
pub trait DataPort {
    /// Load the named dataset as a frame indexed by date.
    fn load_frame(&self, name: &str) -> Result<Frame, StudyError>;

    /// Names of the datasets this source can load.
    fn list_datasets(&self) -> Result<Vec<String>, StudyError>;
}

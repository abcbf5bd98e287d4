use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use super::domain::{ApplicationId, JobApplication, NewApplication};
use super::stats::{self, ApplicationStatistics};
use super::storage::{ApplicationStorage, StorageError};

/// Owns the authoritative list of applications and keeps the backing storage in sync.
///
/// Every mutation rewrites the full collection. A failed save does not roll the mutation back,
/// so memory and storage can diverge until the next successful save.
pub struct ApplicationStore<S> {
    storage: S,
    applications: Vec<JobApplication>,
    next_id: Option<ApplicationId>,
    load_error: Option<StorageError>,
}

/// Result of [`ApplicationStore::update_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(JobApplication),
    NotFound(ApplicationId),
    InvalidId(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("application {id} was changed in memory but could not be saved: {source}")]
    Unsaved {
        id: ApplicationId,
        source: StorageError,
    },
    #[error("no application ids left after {last}")]
    IdsExhausted { last: ApplicationId },
}

impl StoreError {
    /// The application changed in memory, if any.
    pub fn application_id(&self) -> Option<ApplicationId> {
        match self {
            StoreError::Unsaved { id, .. } => Some(*id),
            StoreError::IdsExhausted { .. } => None,
        }
    }
}

impl<S: ApplicationStorage> ApplicationStore<S> {
    /// Load the collection from `storage`.
    ///
    /// Missing storage yields an empty store. Unreadable or unparseable storage also yields an
    /// empty store, with the failure kept in [`Self::load_error`]; the stored data is left alone.
    pub fn open(storage: S) -> Self {
        let (applications, load_error) = match storage.load() {
            Ok(Some(applications)) => (applications, None),
            Ok(None) => (Vec::new(), None),
            Err(err) => {
                warn!(source = %storage.describe(), error = %err, "starting with an empty application list");
                (Vec::new(), Some(err))
            }
        };

        let next_id = applications
            .iter()
            .map(|application| application.id)
            .max()
            .map_or(Some(ApplicationId::FIRST), ApplicationId::next);

        info!(
            source = %storage.describe(),
            count = applications.len(),
            ?next_id,
            "application store opened"
        );

        Self {
            storage,
            applications,
            next_id,
            load_error,
        }
    }

    pub fn load_error(&self) -> Option<&StorageError> {
        self.load_error.as_ref()
    }

    /// Id the next [`Self::add`] will assign; `None` when the highest id is `u32::MAX`.
    pub fn next_id(&self) -> Option<ApplicationId> {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    pub fn get(&self, id: ApplicationId) -> Option<&JobApplication> {
        self.applications
            .iter()
            .find(|application| application.id == id)
    }

    /// Assign the next id, append, and save. Nothing changes when ids are exhausted.
    pub fn add(&mut self, new: NewApplication) -> Result<JobApplication, StoreError> {
        let Some(id) = self.next_id else {
            let last = self
                .applications
                .iter()
                .map(|application| application.id)
                .max()
                .unwrap_or(ApplicationId(u32::MAX));
            warn!(%last, "application ids exhausted");
            return Err(StoreError::IdsExhausted { last });
        };
        self.next_id = id.next();

        let application = new.into_application(id);
        self.applications.push(application.clone());
        debug!(%id, company = %application.company, "application added");

        self.persist()
            .map_err(|source| StoreError::Unsaved { id, source })?;
        Ok(application)
    }

    /// All applications in insertion order.
    pub fn list_all(&self) -> &[JobApplication] {
        &self.applications
    }

    /// Applications whose status equals `status`, ignoring case. No partial matches.
    pub fn list_by_status(&self, status: &str) -> Vec<&JobApplication> {
        self.applications
            .iter()
            .filter(|application| application.status_matches(status))
            .collect()
    }

    /// Overwrite `status` and `notes` of the application with `id`, then save.
    pub fn update_status(
        &mut self,
        id: ApplicationId,
        status: impl Into<String>,
        notes: impl Into<String>,
    ) -> Result<UpdateOutcome, StoreError> {
        let Some(application) = self
            .applications
            .iter_mut()
            .find(|application| application.id == id)
        else {
            debug!(%id, "update requested for unknown application");
            return Ok(UpdateOutcome::NotFound(id));
        };

        application.status = status.into();
        application.notes = notes.into();
        let updated = application.clone();
        debug!(%id, status = %updated.status, "application status updated");

        self.persist()
            .map_err(|source| StoreError::Unsaved { id, source })?;
        Ok(UpdateOutcome::Updated(updated))
    }

    /// Same as [`Self::update_status`] but takes the id as typed by the user.
    pub fn update_status_raw(
        &mut self,
        raw_id: &str,
        status: impl Into<String>,
        notes: impl Into<String>,
    ) -> Result<UpdateOutcome, StoreError> {
        match raw_id.parse::<ApplicationId>() {
            Ok(id) => self.update_status(id, status, notes),
            Err(_) => Ok(UpdateOutcome::InvalidId(raw_id.to_string())),
        }
    }

    /// Applications whose company, position or reference number contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<&JobApplication> {
        let needle = term.to_lowercase();
        self.applications
            .iter()
            .filter(|application| application.matches_term(&needle))
            .collect()
    }

    pub fn statistics(&self, today: NaiveDate) -> ApplicationStatistics {
        stats::compute(&self.applications, today)
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.storage.save(&self.applications).map_err(|err| {
            error!(source = %self.storage.describe(), error = %err, "failed to save applications");
            err
        })
    }
}

//! In-process repositories and the filesystem resume store.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    Application, ApplicationFilter, ApplicationId, ApplicationStatus, ResumeHandle,
};
use super::repository::{
    ApplicationRepository, JobRepository, RepositoryError, ResumeStore, ResumeStoreError,
};
use crate::workflows::hiring::jobs::{JobId, JobRequirement};
use crate::workflows::hiring::screening::{DocumentFormat, ResumeDocument};

fn lock<'a, T>(mutex: &'a Mutex<T>, store: &str) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{store} lock poisoned")))
}

/// Mutex-guarded map; every operation holds the lock for its full read-modify-write.
#[derive(Default, Clone)]
pub struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = lock(&self.records, "application store")?;
        let duplicate = guard.values().any(|existing| {
            existing.candidate_id == application.candidate_id
                && existing.job_id == application.job_id
        });
        if duplicate || guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = lock(&self.records, "application store")?;
        Ok(guard.get(id).cloned())
    }

    fn compare_and_set_status(
        &self,
        id: &ApplicationId,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<Application, RepositoryError> {
        let mut guard = lock(&self.records, "application store")?;
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if record.status != expected {
            return Err(RepositoryError::StatusMismatch {
                current: record.status,
            });
        }
        record.status = next;
        Ok(record.clone())
    }

    fn delete(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let mut guard = lock(&self.records, "application store")?;
        Ok(guard.remove(id))
    }

    fn list(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, RepositoryError> {
        let guard = lock(&self.records, "application store")?;
        Ok(guard
            .values()
            .filter(|application| filter.matches(application))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryJobRepository {
    jobs: Arc<Mutex<HashMap<JobId, JobRequirement>>>,
}

impl JobRepository for InMemoryJobRepository {
    fn insert(&self, job: JobRequirement) -> Result<JobRequirement, RepositoryError> {
        let mut guard = lock(&self.jobs, "job store")?;
        if guard.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<JobRequirement>, RepositoryError> {
        let guard = lock(&self.jobs, "job store")?;
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &JobId) -> Result<bool, RepositoryError> {
        let mut guard = lock(&self.jobs, "job store")?;
        Ok(guard.remove(id).is_some())
    }

    fn list(&self) -> Result<Vec<JobRequirement>, RepositoryError> {
        let guard = lock(&self.jobs, "job store")?;
        Ok(guard.values().cloned().collect())
    }
}

/// Keeps resume bytes in memory, keyed by handle.
#[derive(Default, Clone)]
pub struct InMemoryResumeStore {
    files: Arc<Mutex<HashMap<ResumeHandle, Vec<u8>>>>,
}

impl InMemoryResumeStore {
    pub fn contains(&self, handle: &ResumeHandle) -> bool {
        self.files
            .lock()
            .map(|files| files.contains_key(handle))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.files.lock().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResumeStore for InMemoryResumeStore {
    fn store(&self, document: &ResumeDocument) -> Result<ResumeHandle, ResumeStoreError> {
        let handle = ResumeHandle(file_name_for(document));
        self.files
            .lock()
            .map_err(|_| ResumeStoreError::Unavailable("resume store lock poisoned".to_string()))?
            .insert(handle.clone(), document.bytes.clone());
        Ok(handle)
    }

    fn release(&self, handle: &ResumeHandle) -> Result<(), ResumeStoreError> {
        self.files
            .lock()
            .map_err(|_| ResumeStoreError::Unavailable("resume store lock poisoned".to_string()))?
            .remove(handle);
        Ok(())
    }
}

/// Writes each resume as `<uuid>.<ext>` below a single directory.
#[derive(Debug, Clone)]
pub struct FilesystemResumeStore {
    root: PathBuf,
}

impl FilesystemResumeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, handle: &ResumeHandle) -> Result<PathBuf, ResumeStoreError> {
        let name = handle.0.as_str();
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(|ch: char| ch == '/' || ch == '\\')
            && Path::new(name).file_name().is_some();
        if !plain {
            return Err(ResumeStoreError::InvalidHandle(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl ResumeStore for FilesystemResumeStore {
    fn store(&self, document: &ResumeDocument) -> Result<ResumeHandle, ResumeStoreError> {
        fs::create_dir_all(&self.root)?;
        let handle = ResumeHandle(file_name_for(document));
        let path = self.path_for(&handle)?;
        fs::write(&path, &document.bytes)?;
        tracing::debug!(path = %path.display(), bytes = document.bytes.len(), "resume stored");
        Ok(handle)
    }

    fn release(&self, handle: &ResumeHandle) -> Result<(), ResumeStoreError> {
        let path = self.path_for(handle)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "resume already absent");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn file_name_for(document: &ResumeDocument) -> String {
    let extension = DocumentFormat::detect(document)
        .map(DocumentFormat::extension)
        .unwrap_or("bin");
    format!("{}.{extension}", uuid::Uuid::new_v4())
}

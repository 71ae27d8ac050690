use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{ApplicationId, Resident, ResidentId, Scheme, SchemeId};
use super::lifecycle::ReviewDecision;
use super::repository::{
    ApplicationRecord, ApplicationRepository, ResidentRepository, SchemeRepository, StoreError,
};

#[derive(Default)]
struct Tables {
    residents: HashMap<ResidentId, Resident>,
    schemes: HashMap<SchemeId, Scheme>,
    applications: HashMap<ApplicationId, ApplicationRecord>,
}

/// Process-local record store. Every check-and-write runs under one lock.
#[derive(Default, Clone)]
pub struct InMemoryWelfareStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryWelfareStore {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }
}

fn aadhaar_taken(tables: &Tables, aadhaar: &str, except: &ResidentId) -> bool {
    tables
        .residents
        .values()
        .any(|resident| resident.aadhaar == aadhaar && &resident.id != except)
}

fn has_open_application(tables: &Tables, references: impl Fn(&ApplicationRecord) -> bool) -> bool {
    tables
        .applications
        .values()
        .any(|record| record.status.is_open() && references(record))
}

impl ResidentRepository for InMemoryWelfareStore {
    fn insert_resident(&self, resident: Resident) -> Result<Resident, StoreError> {
        let mut tables = self.lock()?;
        if tables.residents.contains_key(&resident.id)
            || aadhaar_taken(&tables, &resident.aadhaar, &resident.id)
        {
            return Err(StoreError::Conflict);
        }
        tables.residents.insert(resident.id.clone(), resident.clone());
        Ok(resident)
    }

    fn update_resident(&self, resident: Resident) -> Result<Resident, StoreError> {
        let mut tables = self.lock()?;
        if !tables.residents.contains_key(&resident.id) {
            return Err(StoreError::NotFound);
        }
        if aadhaar_taken(&tables, &resident.aadhaar, &resident.id) {
            return Err(StoreError::Conflict);
        }
        tables.residents.insert(resident.id.clone(), resident.clone());
        Ok(resident)
    }

    fn fetch_resident(&self, id: &ResidentId) -> Result<Option<Resident>, StoreError> {
        Ok(self.lock()?.residents.get(id).cloned())
    }

    fn list_residents(&self) -> Result<Vec<Resident>, StoreError> {
        let mut residents: Vec<_> = self.lock()?.residents.values().cloned().collect();
        residents.sort_by(|a, b| b.join_date.cmp(&a.join_date).then(b.id.cmp(&a.id)));
        Ok(residents)
    }

    fn delete_resident_if_idle(&self, id: &ResidentId) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        if !tables.residents.contains_key(id) {
            return Err(StoreError::NotFound);
        }
        if has_open_application(&tables, |record| &record.resident_id == id) {
            return Err(StoreError::InUse);
        }
        tables.residents.remove(id);
        Ok(())
    }
}

impl SchemeRepository for InMemoryWelfareStore {
    fn insert_scheme(&self, scheme: Scheme) -> Result<Scheme, StoreError> {
        let mut tables = self.lock()?;
        if tables.schemes.contains_key(&scheme.id) {
            return Err(StoreError::Conflict);
        }
        tables.schemes.insert(scheme.id.clone(), scheme.clone());
        Ok(scheme)
    }

    fn update_scheme(&self, scheme: Scheme) -> Result<Scheme, StoreError> {
        let mut tables = self.lock()?;
        match tables.schemes.get_mut(&scheme.id) {
            Some(existing) => {
                *existing = scheme.clone();
                Ok(scheme)
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn fetch_scheme(&self, id: &SchemeId) -> Result<Option<Scheme>, StoreError> {
        Ok(self.lock()?.schemes.get(id).cloned())
    }

    fn list_schemes(&self) -> Result<Vec<Scheme>, StoreError> {
        let mut schemes: Vec<_> = self.lock()?.schemes.values().cloned().collect();
        schemes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(schemes)
    }

    fn delete_scheme_if_idle(&self, id: &SchemeId) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        if !tables.schemes.contains_key(id) {
            return Err(StoreError::NotFound);
        }
        if has_open_application(&tables, |record| &record.scheme_id == id) {
            return Err(StoreError::InUse);
        }
        tables.schemes.remove(id);
        Ok(())
    }
}

impl ApplicationRepository for InMemoryWelfareStore {
    fn insert_application(
        &self,
        record: ApplicationRecord,
    ) -> Result<ApplicationRecord, StoreError> {
        let mut tables = self.lock()?;
        let duplicate = tables.applications.contains_key(&record.id)
            || tables
                .applications
                .values()
                .any(|existing| existing.targets(&record.resident_id, &record.scheme_id));
        if duplicate {
            return Err(StoreError::Conflict);
        }
        tables.applications.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<ApplicationRecord>, StoreError> {
        Ok(self.lock()?.applications.get(id).cloned())
    }

    fn find_application(
        &self,
        resident_id: &ResidentId,
        scheme_id: &SchemeId,
    ) -> Result<Option<ApplicationRecord>, StoreError> {
        Ok(self
            .lock()?
            .applications
            .values()
            .find(|record| record.targets(resident_id, scheme_id))
            .cloned())
    }

    fn apply_review(
        &self,
        id: &ApplicationId,
        decision: &ReviewDecision,
    ) -> Result<ApplicationRecord, StoreError> {
        let mut tables = self.lock()?;
        let record = tables.applications.get_mut(id).ok_or(StoreError::NotFound)?;
        decision.apply_to(record);
        Ok(record.clone())
    }

    fn list_applications(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        let mut records: Vec<_> = self.lock()?.applications.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }
}

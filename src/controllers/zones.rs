//! Zones view: listing with create, edit and delete

use crate::controllers::LastError;
use crate::controllers::list::LoadingFlag;
use crate::core::entity::{Record, remove_by_id, replace_by_id};
use crate::core::error::{AdminError, AdminResult};
use crate::core::service::AdminBackend;
use crate::core::session::Session;
use crate::core::validation::check;
use crate::entities::{Zone, ZoneDraft, ZoneEdit};
use std::sync::Arc;

/// Controller for delivery zones
///
/// Holds the zone list, the "new zone" draft and at most one zone being
/// edited. Successful mutations are applied to the local list in place of
/// a refetch.
pub struct ZonesController<B: AdminBackend> {
    backend: Arc<B>,
    zones: Vec<Zone>,
    draft: ZoneDraft,
    editing: Option<ZoneEdit>,
    loading: LoadingFlag,
    last_error: Option<LastError>,
}

impl<B: AdminBackend> ZonesController<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            zones: Vec::new(),
            draft: ZoneDraft::default(),
            editing: None,
            loading: LoadingFlag::new(),
            last_error: None,
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn draft(&self) -> &ZoneDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ZoneDraft {
        &mut self.draft
    }

    pub fn editing(&self) -> Option<&ZoneEdit> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut ZoneEdit> {
        self.editing.as_mut()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    pub fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    /// The form is shown while editing, or when there is nothing to list
    pub fn shows_form(&self) -> bool {
        self.editing.is_some() || self.zones.is_empty()
    }

    pub async fn load(&mut self, session: &Session) -> AdminResult<()> {
        let _loading = self.loading.acquire();
        let result = self.backend.list_zones(session).await;
        match result {
            Ok(zones) => {
                tracing::debug!(count = zones.len(), "zones loaded");
                self.zones = zones;
                self.last_error = None;
                Ok(())
            }
            Err(err) => Err(self.record_failure("load", err)),
        }
    }

    /// Submit the draft; on success the new zone is appended and the draft
    /// cleared
    pub async fn create(&mut self, session: &Session) -> AdminResult<Zone> {
        if let Err(err) = check(&self.draft) {
            return Err(self.record_failure("create", err));
        }
        let payload = self.draft.to_payload();

        let _loading = self.loading.acquire();
        let result = self.backend.create_zone(session, &payload).await;
        match result {
            Ok(zone) => {
                tracing::info!(zone_id = %zone.id, name = %zone.name, "zone created");
                self.zones.push(zone.clone());
                self.draft = ZoneDraft::default();
                self.last_error = None;
                Ok(zone)
            }
            Err(err) => Err(self.record_failure("create", err)),
        }
    }

    /// Start editing a listed zone, replacing any edit in progress
    pub fn begin_edit(&mut self, zone_id: &str) -> AdminResult<()> {
        let zone = self
            .zones
            .iter()
            .find(|z| z.id == zone_id)
            .ok_or_else(|| AdminError::not_found(Zone::resource_name_singular(), zone_id))?;
        self.editing = Some(ZoneEdit::from(zone));
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Submit the edit in progress
    ///
    /// Without an edit, or with one lacking an identity, nothing is sent and
    /// `Ok(None)` is returned.
    pub async fn update(&mut self, session: &Session) -> AdminResult<Option<Zone>> {
        let Some(edit) = self.editing.as_ref() else {
            return Ok(None);
        };
        let Some(zone_id) = edit.id.clone() else {
            return Ok(None);
        };
        let payload = edit.to_payload();
        if let Err(err) = check(edit) {
            return Err(self.record_failure("update", err));
        }

        let _loading = self.loading.acquire();
        let result = self.backend.update_zone(session, &zone_id, &payload).await;
        match result {
            Ok(zone) => {
                tracing::info!(zone_id = %zone.id, "zone updated");
                replace_by_id(&mut self.zones, zone.clone());
                self.editing = None;
                self.last_error = None;
                Ok(Some(zone))
            }
            Err(err) => Err(self.record_failure("update", err)),
        }
    }

    /// Delete a zone; on success it is dropped from the list
    pub async fn delete(&mut self, session: &Session, zone_id: &str) -> AdminResult<()> {
        let _loading = self.loading.acquire();
        let result = self.backend.delete_zone(session, zone_id).await;
        match result {
            Ok(()) => {
                tracing::info!(zone_id = %zone_id, "zone deleted");
                remove_by_id(&mut self.zones, zone_id);
                if self
                    .editing
                    .as_ref()
                    .is_some_and(|e| e.id.as_deref() == Some(zone_id))
                {
                    self.editing = None;
                }
                self.last_error = None;
                Ok(())
            }
            Err(err) => Err(self.record_failure("delete", err)),
        }
    }

    fn record_failure(&mut self, action: &'static str, err: AdminError) -> AdminError {
        tracing::warn!(
            action,
            code = err.error_code(),
            error = %err,
            "zone operation failed"
        );
        self.last_error = Some(LastError::from(&err));
        err
    }
}

// ABOUTME: Resolves named service groups from configuration.
// ABOUTME: Expands a group or a single service name into an ordered target list.

use crate::config::{Config, SERVICE_GROUP_SECTION};
use crate::error::{Error, Result};
use crate::types::ServiceName;
use nonempty::NonEmpty;

pub struct GroupResolver<'a> {
    config: &'a Config,
}

impl<'a> GroupResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Services of group `name`, in configured order.
    ///
    /// A missing `service-group` section and a missing group are distinct
    /// failures.
    pub fn resolve(&self, name: &str) -> Result<NonEmpty<ServiceName>> {
        let groups = self
            .config
            .service_groups
            .as_ref()
            .ok_or(Error::ConfigSectionMissing(SERVICE_GROUP_SECTION))?;
        let members = groups
            .get(name)
            .ok_or_else(|| Error::GroupNotFound(name.to_string()))?;
        Ok(members.clone().map(ServiceName::new))
    }

    /// `name` as a group when `is_group` is set, otherwise as one service.
    pub fn targets(&self, name: &str, is_group: bool) -> Result<Vec<ServiceName>> {
        if is_group {
            Ok(self.resolve(name)?.into())
        } else {
            Ok(vec![ServiceName::new(name)])
        }
    }
}

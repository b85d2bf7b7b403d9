use serde::{Deserialize, Serialize};

/// Kickstart data as seen by the add-on.
///
/// Only the add-on section is modelled; other sections of the host document
/// are not our business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickstartDocument {
    #[serde(default)]
    pub addons: Addons,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addons {
    #[serde(default)]
    pub org_rosa_package_remove: PackageRemoveData,
}

/// The add-on section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRemoveData {
    /// Candidate packages
    #[serde(default)]
    pub list: Vec<String>,

    /// Packages chosen for removal
    #[serde(default)]
    pub remove: Vec<String>,
}

impl KickstartDocument {
    pub fn package_remove(&self) -> &PackageRemoveData {
        &self.addons.org_rosa_package_remove
    }

    pub fn package_remove_mut(&mut self) -> &mut PackageRemoveData {
        &mut self.addons.org_rosa_package_remove
    }
}

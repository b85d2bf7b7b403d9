use crate::error::Result;
use crate::service::{PackageRemove, SharedService};

/// Accessor surface of the service used by the spokes.
///
/// Implemented in process for the service itself and over the socket by
/// [`crate::ipc::Client`].
pub trait PackageRemoveProxy {
    /// Current candidate list (`Lines`)
    fn lines(&mut self) -> Result<Vec<String>>;

    /// Replace the selection (`SetLines`)
    fn set_lines(&mut self, names: Vec<String>) -> Result<()>;
}

impl PackageRemoveProxy for PackageRemove {
    fn lines(&mut self) -> Result<Vec<String>> {
        Ok(PackageRemove::lines(self))
    }

    fn set_lines(&mut self, names: Vec<String>) -> Result<()> {
        self.set_selection(names);
        Ok(())
    }
}

impl PackageRemoveProxy for SharedService {
    fn lines(&mut self) -> Result<Vec<String>> {
        Ok(self.lock()?.lines())
    }

    fn set_lines(&mut self, names: Vec<String>) -> Result<()> {
        self.lock()?.set_selection(names);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn service_behind_trait_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("removable_pkgs.list");
        fs::write(&path, "vim\nnano\n").unwrap();

        let shared = SharedService::new(PackageRemove::with_candidates_path(&path));
        let mut proxy: Box<dyn PackageRemoveProxy> = Box::new(shared.clone());

        assert_eq!(proxy.lines().unwrap(), vec!["nano", "vim"]);
        proxy.set_lines(vec!["vim".into()]).unwrap();
        assert_eq!(shared.lock().unwrap().selection(), ["vim"]);
    }
}

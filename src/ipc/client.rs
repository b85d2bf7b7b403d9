use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use super::{Request, Response};
use crate::error::{Error, Result};
use crate::kickstart::KickstartDocument;
use crate::proxy::PackageRemoveProxy;

/// Blocking connection to the service socket
#[derive(Debug)]
pub struct Client {
    reader: BufReader<UnixStream>,
    writer: UnixStream,
}

impl Client {
    pub fn connect(path: &Path) -> Result<Self> {
        let writer = UnixStream::connect(path).map_err(|e| {
            Error::Service(format!(
                "cannot reach package remove service at {}: {}",
                path.display(),
                e
            ))
        })?;
        let reader = BufReader::new(writer.try_clone()?);
        Ok(Self { reader, writer })
    }

    /// Send one request and wait for its response
    pub fn call(&mut self, request: &Request) -> Result<Response> {
        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;

        let mut reply = String::new();
        if self.reader.read_line(&mut reply)? == 0 {
            return Err(Error::protocol("service closed the connection"));
        }

        match serde_json::from_str(&reply)? {
            Response::Error { message } => Err(Error::Service(message)),
            response => Ok(response),
        }
    }

    fn expect_lines(&mut self, request: &Request) -> Result<Vec<String>> {
        match self.call(request)? {
            Response::Lines { names } => Ok(names),
            other => Err(Error::protocol(format!("unexpected response: {:?}", other))),
        }
    }

    fn expect_done(&mut self, request: &Request) -> Result<()> {
        match self.call(request)? {
            Response::Done => Ok(()),
            other => Err(Error::protocol(format!("unexpected response: {:?}", other))),
        }
    }

    pub fn selection(&mut self) -> Result<Vec<String>> {
        self.expect_lines(&Request::Selection)
    }

    pub fn configure(&mut self) -> Result<()> {
        self.expect_done(&Request::Configure)
    }

    pub fn install(&mut self, sysroot: Option<PathBuf>) -> Result<()> {
        self.expect_done(&Request::Install { sysroot })
    }

    pub fn kickstart(&mut self) -> Result<KickstartDocument> {
        match self.call(&Request::Kickstart)? {
            Response::Kickstart { document } => Ok(document),
            other => Err(Error::protocol(format!("unexpected response: {:?}", other))),
        }
    }

    pub fn process_kickstart(&mut self, document: KickstartDocument) -> Result<()> {
        self.expect_done(&Request::ProcessKickstart { document })
    }
}

impl PackageRemoveProxy for Client {
    fn lines(&mut self) -> Result<Vec<String>> {
        self.expect_lines(&Request::Lines)
    }

    fn set_lines(&mut self, names: Vec<String>) -> Result<()> {
        self.expect_done(&Request::SetLines { names })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::{bind, serve};
    use crate::service::{PackageRemove, SharedService};
    use std::fs;

    #[tokio::test(flavor = "multi_thread")]
    async fn socket_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = dir.path().join("removable_pkgs.list");
        fs::write(&candidates, "vim\nnano\n").unwrap();
        fs::create_dir_all(dir.path().join("etc/anaconda")).unwrap();

        let socket = dir.path().join("run/pkgremove.sock");
        let service = SharedService::new(PackageRemove::with_candidates_path(&candidates));
        let listener = bind(&socket).unwrap();
        tokio::spawn(serve(listener, service, dir.path().to_path_buf()));

        let root = dir.path().to_path_buf();
        tokio::task::spawn_blocking(move || {
            let mut client = Client::connect(&socket).unwrap();
            assert_eq!(client.lines().unwrap(), vec!["nano", "vim"]);

            client.set_lines(vec!["vim".into()]).unwrap();
            assert_eq!(client.selection().unwrap(), vec!["vim"]);

            client.install(None).unwrap();
            let written =
                fs::read_to_string(root.join("etc/anaconda/pkgs_to_remove.list")).unwrap();
            assert_eq!(written, "vim\n");

            let err = client.install(Some(root.join("missing"))).unwrap_err();
            assert!(matches!(err, Error::Service(_)));

            let document = client.kickstart().unwrap();
            assert_eq!(document.package_remove().remove, vec!["vim"]);
            assert_eq!(document.package_remove().list, vec!["nano", "vim"]);
        })
        .await
        .unwrap();
    }

    #[test]
    fn connect_to_missing_socket_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Client::connect(&dir.path().join("none.sock")).unwrap_err();
        assert!(matches!(err, Error::Service(_)));
    }
}

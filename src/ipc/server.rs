use std::fs;
use std::future::Future;
use std::io;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, info, warn};

use super::{dispatch, Request, Response};
use crate::error::Result;
use crate::service::SharedService;

/// Bind the service socket, replacing a stale socket file.
///
/// Fails when another service still answers on the socket or when the path
/// is not a socket at all.
pub fn bind(path: &Path) -> Result<UnixListener> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_socket() => {
            if std::os::unix::net::UnixStream::connect(path).is_ok() {
                return Err(io::Error::new(
                    io::ErrorKind::AddrInUse,
                    format!("a service is already listening on {}", path.display()),
                )
                .into());
            }
            debug!("Removing stale socket {}", path.display());
            fs::remove_file(path)?;
        }
        Ok(_) => {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} exists and is not a socket", path.display()),
            )
            .into());
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let listener = UnixListener::bind(path)?;
    info!("Listening on {}", path.display());
    Ok(listener)
}

/// Accept connections forever
pub async fn serve(listener: UnixListener, service: SharedService, sysroot: PathBuf) -> Result<()> {
    loop {
        let (stream, _) = listener.accept().await?;
        let service = service.clone();
        let sysroot = sysroot.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, service, sysroot).await {
                warn!("Connection closed with error: {}", e);
            }
        });
    }
}

/// Accept connections until `shutdown` resolves
pub async fn serve_until<F>(
    listener: UnixListener,
    service: SharedService,
    sysroot: PathBuf,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    tokio::select! {
        result = serve(listener, service, sysroot) => result,
        _ = shutdown => {
            info!("Shutting down service");
            Ok(())
        }
    }
}

async fn handle_connection(
    stream: UnixStream,
    service: SharedService,
    sysroot: PathBuf,
) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                debug!("Request: {:?}", request);
                let service = service.clone();
                let sysroot = sysroot.clone();
                tokio::task::spawn_blocking(move || dispatch(&service, &sysroot, request))
                    .await
                    .unwrap_or_else(|e| Response::error(format!("request handler failed: {}", e)))
            }
            Err(e) => Response::error(format!("malformed request: {}", e)),
        };

        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
    }

    Ok(())
}

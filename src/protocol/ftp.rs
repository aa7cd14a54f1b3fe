//! FTP transport (suppaftp)
//!
//! Passive mode by default, active selectable per binding. Remote listing is
//! an iterative breadth-first scan; inaccessible directories are skipped
//! rather than failing the whole listing.

use std::collections::VecDeque;
use std::fs::File;
use std::io;
use std::net::ToSocketAddrs;
use std::path::Path;
use std::time::Duration;

use suppaftp::list as ftp_list;
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream, Mode, Status};

use crate::config::Binding;
use crate::error::{ConnError, TransferError};
use crate::logging::*;
use crate::protocol::{strip_remote_base, DirStatus, RemoteConnection, Transport};
use crate::types::FileEntry;

pub struct FtpTransport;

impl Transport for FtpTransport {
	fn connect(
		&self,
		binding: &Binding,
		timeout: Duration,
	) -> Result<Box<dyn RemoteConnection>, ConnError> {
		let host = format!("{}:{}", binding.hostname, binding.port);

		let addr = (binding.hostname.as_str(), binding.port)
			.to_socket_addrs()
			.map_err(|e| ConnError::Refused { host: host.clone(), source: e })?
			.next()
			.ok_or_else(|| ConnError::Refused {
				host: host.clone(),
				source: io::Error::new(io::ErrorKind::AddrNotAvailable, "no address resolved"),
			})?;

		let mut stream = FtpStream::connect_timeout(addr, timeout).map_err(|e| match e {
			FtpError::ConnectionError(io_err) if io_err.kind() == io::ErrorKind::TimedOut => {
				ConnError::Timeout { host: host.clone() }
			}
			FtpError::ConnectionError(io_err) => {
				ConnError::Refused { host: host.clone(), source: io_err }
			}
			other => ConnError::Protocol { host: host.clone(), message: other.to_string() },
		})?;

		stream
			.login(binding.username.as_str(), binding.password.as_deref().unwrap_or(""))
			.map_err(|e| ConnError::Auth { host: host.clone(), message: e.to_string() })?;

		let mode = if binding.ftp_passive { Mode::Passive } else { Mode::Active };
		stream.set_mode(mode);
		stream
			.transfer_type(FileType::Binary)
			.map_err(|e| ConnError::Protocol { host: host.clone(), message: e.to_string() })?;

		debug!(host = %host, mode = ?mode, "FTP session established");
		Ok(Box::new(FtpConnection { stream }))
	}
}

pub struct FtpConnection {
	stream: FtpStream,
}

impl RemoteConnection for FtpConnection {
	fn ensure_dir(&mut self, path: &str) -> Result<DirStatus, TransferError> {
		match self.stream.mkdir(path) {
			Ok(()) => Ok(DirStatus::Created),
			// 550: the directory is already there (or otherwise unavailable;
			// a real failure surfaces on the subsequent put)
			Err(FtpError::UnexpectedResponse(resp))
				if resp.status == Status::FileUnavailable =>
			{
				Ok(DirStatus::AlreadyExists)
			}
			Err(e) => Err(TransferError::CreateDir {
				remote_path: path.to_string(),
				message: e.to_string(),
			}),
		}
	}

	fn put(&mut self, local: &Path, remote: &str) -> Result<(), TransferError> {
		let mut file = File::open(local)
			.map_err(|e| TransferError::Local { path: local.to_path_buf(), source: e })?;
		self.stream
			.put_file(remote, &mut file)
			.map(|_| ())
			.map_err(|e| TransferError::Put { remote_path: remote.to_string(), message: e.to_string() })
	}

	fn list(&mut self, remote_base: &str) -> Result<Vec<FileEntry>, TransferError> {
		let base = remote_base.trim_end_matches('/').to_string();
		let mut entries = Vec::new();
		let mut queue: VecDeque<String> = VecDeque::new();
		queue.push_back(base.clone());

		while let Some(dir) = queue.pop_front() {
			let lines = match self.stream.list(Some(&dir)) {
				Ok(lines) => lines,
				Err(e) => {
					// permission errors on individual directories are not fatal
					warn!(path = %dir, error = %e, "skipping unlistable FTP directory");
					continue;
				}
			};

			for line in &lines {
				let parsed = match ftp_list::File::try_from(line.as_str()) {
					Ok(parsed) => parsed,
					Err(e) => {
						debug!(line = %line, error = %e, "unparsable FTP list line");
						continue;
					}
				};
				let name = parsed.name();
				if name == "." || name == ".." {
					continue;
				}

				let full = format!("{}/{}", dir, name);
				let rel = match strip_remote_base(&full, &base) {
					Some(rel) if !rel.is_empty() => rel,
					_ => continue,
				};

				if parsed.is_directory() {
					entries.push(FileEntry::dir(rel));
					queue.push_back(full);
				} else {
					entries.push(FileEntry::file(rel));
				}
			}
		}

		debug!(base = %remote_base, count = entries.len(), "FTP listing complete");
		Ok(entries)
	}
}

impl Drop for FtpConnection {
	fn drop(&mut self) {
		let _ = self.stream.quit();
	}
}


// vim: ts=4

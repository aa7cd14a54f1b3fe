//! SFTP transport (ssh2)
//!
//! Authentication is tried in priority order: explicit key file (the
//! binding's password doubles as the passphrase), SSH agent when neither a
//! key file nor a password is configured, password, and finally the default
//! key locations under `~/.ssh`. Compression is enabled on the session.

use std::collections::VecDeque;
use std::fs::File;
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use ssh2::{Session, Sftp};

use crate::config::Binding;
use crate::error::{ConnError, TransferError};
use crate::logging::*;
use crate::protocol::{strip_remote_base, DirStatus, RemoteConnection, Transport};
use crate::types::FileEntry;

pub struct SftpTransport;

impl Transport for SftpTransport {
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

		let tcp = TcpStream::connect_timeout(&addr, timeout).map_err(|e| {
			if e.kind() == io::ErrorKind::TimedOut {
				ConnError::Timeout { host: host.clone() }
			} else {
				ConnError::Refused { host: host.clone(), source: e }
			}
		})?;

		let mut session = Session::new()
			.map_err(|e| ConnError::Protocol { host: host.clone(), message: e.to_string() })?;
		session.set_compress(true);
		session.set_tcp_stream(tcp);
		session
			.handshake()
			.map_err(|e| ConnError::Protocol { host: host.clone(), message: e.to_string() })?;

		authenticate(&mut session, binding, &host)?;

		let sftp = session
			.sftp()
			.map_err(|e| ConnError::Protocol { host: host.clone(), message: e.to_string() })?;

		debug!(host = %host, "SFTP session established");
		Ok(Box::new(SftpConnection { _session: session, sftp }))
	}
}

/// Try each applicable authentication method until one succeeds
fn authenticate(session: &mut Session, binding: &Binding, host: &str) -> Result<(), ConnError> {
	// explicit key file; the configured password acts as its passphrase
	if let Some(key) = &binding.key_filename {
		let result = session.userauth_pubkey_file(
			&binding.username,
			None,
			key,
			binding.password.as_deref(),
		);
		if result.is_ok() && session.authenticated() {
			debug!(host = %host, "authenticated via key file");
			return Ok(());
		}
	}

	// agent, only when the binding configures neither key nor password
	if binding.key_filename.is_none() && binding.password.is_none() {
		if let Ok(mut agent) = session.agent() {
			if agent.connect().is_ok() && agent.list_identities().is_ok() {
				for identity in agent.identities().unwrap_or_default() {
					if agent.userauth(&binding.username, &identity).is_ok()
						&& session.authenticated()
					{
						debug!(host = %host, "authenticated via agent");
						return Ok(());
					}
				}
			}
		}
	}

	if let Some(password) = &binding.password {
		let result = session.userauth_password(&binding.username, password);
		if result.is_ok() && session.authenticated() {
			debug!(host = %host, "authenticated via password");
			return Ok(());
		}
	}

	// default key locations
	if let Some(ssh_dir) = dirs::home_dir().map(|h| h.join(".ssh")) {
		for name in ["id_ed25519", "id_rsa", "id_ecdsa"] {
			let path = ssh_dir.join(name);
			if path.exists() {
				let result = session.userauth_pubkey_file(&binding.username, None, &path, None);
				if result.is_ok() && session.authenticated() {
					debug!(host = %host, key = name, "authenticated via default key");
					return Ok(());
				}
			}
		}
	}

	Err(ConnError::Auth {
		host: host.to_string(),
		message: "no authentication method succeeded".to_string(),
	})
}

pub struct SftpConnection {
	// keeps the SSH session alive for the lifetime of the SFTP channel
	_session: Session,
	sftp: Sftp,
}

impl RemoteConnection for SftpConnection {
	fn ensure_dir(&mut self, path: &str) -> Result<DirStatus, TransferError> {
		let remote = Path::new(path);
		if self.sftp.stat(remote).is_ok() {
			return Ok(DirStatus::AlreadyExists);
		}
		match self.sftp.mkdir(remote, 0o755) {
			Ok(()) => Ok(DirStatus::Created),
			// racing another worker's create is fine
			Err(_) if self.sftp.stat(remote).is_ok() => Ok(DirStatus::AlreadyExists),
			Err(e) => Err(TransferError::CreateDir {
				remote_path: path.to_string(),
				message: e.to_string(),
			}),
		}
	}

	fn put(&mut self, local: &Path, remote: &str) -> Result<(), TransferError> {
		let mut source = File::open(local)
			.map_err(|e| TransferError::Local { path: local.to_path_buf(), source: e })?;
		let mut target = self.sftp.create(Path::new(remote)).map_err(|e| {
			TransferError::Put { remote_path: remote.to_string(), message: e.to_string() }
		})?;
		io::copy(&mut source, &mut target).map_err(|e| {
			TransferError::Put { remote_path: remote.to_string(), message: e.to_string() }
		})?;
		Ok(())
	}

	fn list(&mut self, remote_base: &str) -> Result<Vec<FileEntry>, TransferError> {
		let base = remote_base.trim_end_matches('/').to_string();
		let mut entries = Vec::new();
		let mut queue: VecDeque<String> = VecDeque::new();
		queue.push_back(base.clone());

		while let Some(dir) = queue.pop_front() {
			let listing = match self.sftp.readdir(Path::new(&dir)) {
				Ok(listing) => listing,
				Err(e) => {
					warn!(path = %dir, error = %e, "skipping unlistable SFTP directory");
					continue;
				}
			};

			for (path, stat) in listing {
				let name = match path.file_name() {
					Some(name) => name.to_string_lossy().to_string(),
					None => continue,
				};
				if name == "." || name == ".." {
					continue;
				}

				let full = format!("{}/{}", dir, name);
				let rel = match strip_remote_base(&full, &base) {
					Some(rel) if !rel.is_empty() => rel,
					_ => continue,
				};

				if stat.is_dir() {
					entries.push(FileEntry::dir(rel));
					queue.push_back(full);
				} else {
					entries.push(FileEntry::file(rel));
				}
			}
		}

		debug!(base = %remote_base, count = entries.len(), "SFTP listing complete");
		Ok(entries)
	}
}

// vim: ts=4

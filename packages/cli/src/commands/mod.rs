pub mod convert;
pub mod info;
pub mod outline;
pub mod validate;

pub use convert::{convert, ConvertArgs};
pub use info::{info, InfoArgs};
pub use outline::{outline, OutlineArgs};
pub use validate::{validate, ValidateArgs};

use crate::host::FsHost;
use anyhow::Result;
use apiforge_workspace::{Workspace, WorkspaceConfig};
use std::path::Path;

/// Load `file` into a workspace configured from `cwd`.
pub(crate) async fn open_workspace(file: &Path, cwd: &str) -> Result<Workspace> {
    let config = WorkspaceConfig::load(cwd)?;
    let mut workspace = Workspace::new(config);
    let host = FsHost::new();
    workspace.load(&host, &file.to_string_lossy()).await?;
    Ok(workspace)
}

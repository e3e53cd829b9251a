use serde::Serialize;

/// Query string for the per-folder database endpoints.
#[derive(Debug, Serialize)]
pub struct FolderQuery<'a> {
    pub folder: &'a str,
}
